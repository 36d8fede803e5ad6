use std::f64::consts::E;

/// Logistic sigmoid, `1 / (1 + e^-x)`.
///
/// Saturates toward 0 and 1 for large magnitudes; NaN propagates unchanged.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

//! Graphviz text helpers shared by every exported element.

pub mod dot;
pub mod syntax;

pub use syntax::check_syntax;

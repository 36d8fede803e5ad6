use std::thread;
use std::time::{Duration, Instant};

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgb, RgbImage};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// RGB color of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridColor(pub [u8; 3]);

impl GridColor {
    pub const BLUE: GridColor = GridColor([0, 0, 255]);
    pub const WHITE: GridColor = GridColor([255, 255, 255]);
}

/// One cell of the animated grid, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridItem {
    pub x: u32,
    pub y: u32,
    pub color: GridColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFrame {
    pub index: u64,
    pub items: Vec<GridItem>,
}

/// `count` blue cells with both coordinates uniform in `0..=extent`.
pub fn random_frame<R: Rng + ?Sized>(index: u64, rng: &mut R, count: usize, extent: u32) -> GridFrame {
    let items = (0..count)
        .map(|_| GridItem {
            x: rng.gen_range(0..=extent),
            y: rng.gen_range(0..=extent),
            color: GridColor::BLUE,
        })
        .collect();
    GridFrame { index, items }
}

/// Raster target for grid frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    /// Pixels per grid cell.
    pub scale: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas { width: 1000, height: 500, scale: 3 }
    }
}

impl Canvas {
    /// White canvas with a `scale`-sized square outline per item; parts that
    /// fall outside the canvas are clipped.
    pub fn rasterize(&self, frame: &GridFrame) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width, self.height, Rgb(GridColor::WHITE.0));
        for item in &frame.items {
            let left = item.x.saturating_mul(self.scale);
            let top = item.y.saturating_mul(self.scale);
            let right = left.saturating_add(self.scale);
            let bottom = top.saturating_add(self.scale);
            for px in left..=right {
                self.plot(&mut img, px, top, item.color);
                self.plot(&mut img, px, bottom, item.color);
            }
            for py in top..=bottom {
                self.plot(&mut img, left, py, item.color);
                self.plot(&mut img, right, py, item.color);
            }
        }
        img
    }

    /// Rasterizes `frame` and encodes it as PNG.
    pub fn encode_png(&self, frame: &GridFrame) -> Result<Vec<u8>> {
        let img = self.rasterize(frame);
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)?;
        Ok(bytes)
    }

    fn plot(&self, img: &mut RgbImage, x: u32, y: u32, color: GridColor) {
        if x < self.width && y < self.height {
            img.put_pixel(x, y, Rgb(color.0));
        }
    }
}

/// Settings for the periodic random-grid animation.
#[derive(Debug, Clone, Copy)]
pub struct AnimationConfig {
    pub frames: u64,
    pub interval: Duration,
    pub items_per_frame: usize,
    pub extent: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            frames: 1000,
            interval: Duration::from_millis(500),
            items_per_frame: 101,
            extent: 50,
        }
    }
}

/// Emits one random frame per interval until `config.frames` have been
/// produced or `on_frame` returns `false`. Returns the number of frames
/// delivered.
pub fn animate<R, F>(rng: &mut R, config: AnimationConfig, mut on_frame: F) -> u64
where
    R: Rng + ?Sized,
    F: FnMut(GridFrame) -> bool,
{
    let mut next_tick = Instant::now();
    for index in 0..config.frames {
        next_tick += config.interval;
        if let Some(wait) = next_tick.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
        let frame = random_frame(index, rng, config.items_per_frame, config.extent);
        if !on_frame(frame) {
            debug!(index, "animation stopped by receiver");
            return index + 1;
        }
    }
    config.frames
}

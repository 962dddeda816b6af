//! Sparse RGBA pixel store, the payload of `layer` values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::color::{BlendMode, Color};

/// Largest width or height a raster may have.
pub const MAX_RASTER_DIMENSION: u32 = 8192;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("raster dimension {0} exceeds the maximum raster size")]
    TooLarge(u32),
    #[error("pixel ({x}, {y}) lies outside a {width}x{height} raster")]
    PixelOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

/// A fixed-size raster storing only the pixels that have been set.
///
/// Unset pixels are transparent. Writes outside `[0, width) x [0, height)`
/// are dropped, which keeps compositing code free of edge checks.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(into = "RasterRecord", try_from = "RasterRecord")]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: HashMap<(u32, u32), Color>,
}

impl Raster {
    /// Create an empty raster. Dimensions are clamped to [`MAX_RASTER_DIMENSION`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.min(MAX_RASTER_DIMENSION),
            height: height.min(MAX_RASTER_DIMENSION),
            pixels: HashMap::new(),
        }
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut raster = Self::new(width, height);
        raster.clear(Some(color));
        raster
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of explicitly stored pixels.
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.contains(x, y) {
            self.pixels.insert((x as u32, y as u32), color);
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.contains(x, y) {
            return None;
        }
        self.pixels.get(&(x as u32, y as u32)).copied()
    }

    /// Drop every pixel, then optionally fill the full bounds with `color`.
    pub fn clear(&mut self, color: Option<Color>) {
        self.pixels.clear();
        let Some(color) = color else {
            return;
        };
        if color.is_transparent() {
            return;
        }
        self.pixels.reserve(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                self.pixels.insert((x, y), color);
            }
        }
    }

    /// Stored pixels as `(x, y, color)`, in no particular order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
        self.pixels.iter().map(|(&(x, y), &c)| (x, y, c))
    }

    /// Row-major RGBA bytes; unset pixels are `[0, 0, 0, 0]`.
    pub fn to_pixel_buffer(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 4];
        for (&(x, y), color) in &self.pixels {
            let offset = (y as usize * self.width as usize + x as usize) * 4;
            buffer[offset..offset + 4].copy_from_slice(&color.to_array());
        }
        buffer
    }

    /// Inverse of [`Raster::to_pixel_buffer`]. Fully transparent pixels are not stored.
    pub fn from_pixel_buffer(buffer: &[u8], width: u32, height: u32) -> Result<Self, RasterError> {
        for dim in [width, height] {
            if dim > MAX_RASTER_DIMENSION {
                return Err(RasterError::TooLarge(dim));
            }
        }
        let expected = width as usize * height as usize * 4;
        if buffer.len() != expected {
            return Err(RasterError::BufferSize {
                width,
                height,
                expected,
                actual: buffer.len(),
            });
        }

        let mut raster = Self::new(width, height);
        for (i, rgba) in buffer.chunks_exact(4).enumerate() {
            if rgba[3] == 0 {
                continue;
            }
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            raster
                .pixels
                .insert((x, y), Color::from_array([rgba[0], rgba[1], rgba[2], rgba[3]]));
        }
        Ok(raster)
    }

    /// Composite `src` onto this raster with its origin at `(offset_x, offset_y)`.
    ///
    /// Source pixels that land outside the bounds are dropped.
    pub fn blend_over(
        &mut self,
        src: &Raster,
        offset_x: i32,
        offset_y: i32,
        opacity: f32,
        mode: BlendMode,
    ) {
        for (x, y, color) in src.pixels() {
            let tx = x as i32 + offset_x;
            let ty = y as i32 + offset_y;
            if !self.contains(tx, ty) {
                continue;
            }
            let dst = self.get_pixel(tx, ty).unwrap_or(Color::TRANSPARENT);
            let out = dst.composite(color, opacity, mode);
            if out.is_transparent() {
                self.pixels.remove(&(tx as u32, ty as u32));
            } else {
                self.set_pixel(tx, ty, out);
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy)]
struct PixelRecord {
    x: u32,
    y: u32,
    color: Color,
}

/// Serialized layout: dimensions plus the stored pixels sorted row-major.
#[derive(Serialize, Deserialize)]
struct RasterRecord {
    width: u32,
    height: u32,
    #[serde(default)]
    pixels: Vec<PixelRecord>,
}

impl From<Raster> for RasterRecord {
    fn from(raster: Raster) -> Self {
        let mut pixels: Vec<PixelRecord> = raster
            .pixels()
            .map(|(x, y, color)| PixelRecord { x, y, color })
            .collect();
        pixels.sort_by_key(|p| (p.y, p.x));
        Self {
            width: raster.width,
            height: raster.height,
            pixels,
        }
    }
}

impl TryFrom<RasterRecord> for Raster {
    type Error = RasterError;

    fn try_from(record: RasterRecord) -> Result<Self, Self::Error> {
        for dim in [record.width, record.height] {
            if dim > MAX_RASTER_DIMENSION {
                return Err(RasterError::TooLarge(dim));
            }
        }
        let mut raster = Raster::new(record.width, record.height);
        for p in record.pixels {
            if p.x >= record.width || p.y >= record.height {
                return Err(RasterError::PixelOutOfBounds {
                    x: p.x,
                    y: p.y,
                    width: record.width,
                    height: record.height,
                });
            }
            raster.pixels.insert((p.x, p.y), p.color);
        }
        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_writes_are_dropped() {
        let mut raster = Raster::new(4, 4);
        raster.set_pixel(-1, 0, Color::WHITE);
        raster.set_pixel(4, 0, Color::WHITE);
        raster.set_pixel(0, 4, Color::WHITE);
        raster.set_pixel(3, 3, Color::WHITE);
        assert_eq!(raster.pixel_count(), 1);
        assert_eq!(raster.get_pixel(3, 3), Some(Color::WHITE));
        assert_eq!(raster.get_pixel(4, 4), None);
    }

    #[test]
    fn test_clear_with_and_without_fill() {
        let mut raster = Raster::new(3, 2);
        raster.set_pixel(0, 0, Color::BLACK);
        raster.clear(None);
        assert!(raster.is_empty());

        raster.clear(Some(Color::WHITE));
        assert_eq!(raster.pixel_count(), 6);

        raster.clear(Some(Color::TRANSPARENT));
        assert!(raster.is_empty());
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original = Raster::new(2, 2);
        original.set_pixel(0, 0, Color::WHITE);
        let mut copy = original.clone();
        copy.set_pixel(1, 1, Color::BLACK);
        assert_eq!(original.pixel_count(), 1);
        assert_eq!(copy.pixel_count(), 2);
    }

    #[test]
    fn test_pixel_buffer_layout() {
        let mut raster = Raster::new(2, 2);
        raster.set_pixel(1, 0, Color::new(1, 2, 3, 4));
        raster.set_pixel(0, 1, Color::new(5, 6, 7, 8));
        let buffer = raster.to_pixel_buffer();
        assert_eq!(buffer, vec![0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0]);

        let restored = Raster::from_pixel_buffer(&buffer, 2, 2).unwrap();
        assert_eq!(restored, raster);
        assert_eq!(restored.pixel_count(), 2);
    }

    #[test]
    fn test_from_pixel_buffer_rejects_bad_length() {
        let err = Raster::from_pixel_buffer(&[0; 7], 1, 2).unwrap_err();
        assert!(matches!(err, RasterError::BufferSize { expected: 8, actual: 7, .. }));
    }

    #[test]
    fn test_dimensions_are_bounded() {
        let raster = Raster::new(MAX_RASTER_DIMENSION + 10, 5);
        assert_eq!(raster.width(), MAX_RASTER_DIMENSION);
        assert!(matches!(
            Raster::from_pixel_buffer(&[], MAX_RASTER_DIMENSION + 1, 0),
            Err(RasterError::TooLarge(_))
        ));
    }

    #[test]
    fn test_blend_over_with_offset_clips_edges() {
        let mut dst = Raster::new(3, 3);
        let src = Raster::filled(2, 2, Color::rgb(255, 0, 0));
        dst.blend_over(&src, 2, 2, 1.0, BlendMode::Normal);
        assert_eq!(dst.pixel_count(), 1);
        assert_eq!(dst.get_pixel(2, 2), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_deserialize_rejects_stray_pixel() {
        let json = r#"{"width": 1, "height": 1, "pixels": [{"x": 3, "y": 0, "color": {"r": 0, "g": 0, "b": 0, "a": 255}}]}"#;
        assert!(serde_json::from_str::<Raster>(json).is_err());
    }
}

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageEncoder, RgbaImage};
use log::info;

use crate::error::LibraryError;
use crate::model::raster::Raster;

/// Dense RGBA copy of `raster`; unset pixels become transparent black.
pub fn to_rgba_image(raster: &Raster) -> Result<RgbaImage, LibraryError> {
    RgbaImage::from_raw(raster.width(), raster.height(), raster.to_pixel_buffer())
        .ok_or_else(|| LibraryError::config("pixel buffer does not match raster dimensions"))
}

/// Write `raster` to `path` as an 8-bit RGBA PNG.
pub fn export_png(raster: &Raster, path: impl AsRef<Path>) -> Result<(), LibraryError> {
    let path = path.as_ref();
    if raster.width() == 0 || raster.height() == 0 {
        return Err(LibraryError::config(format!(
            "cannot export an empty {}x{} raster",
            raster.width(),
            raster.height()
        )));
    }
    let image = to_rgba_image(raster)?;
    let writer = BufWriter::new(File::create(path)?);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Fast, FilterType::NoFilter);
    encoder.write_image(
        image.as_raw(),
        raster.width(),
        raster.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    info!(
        "Exported {}x{} raster to {}",
        raster.width(),
        raster.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::color::Color;

    #[test]
    fn test_rgba_image_matches_pixels() {
        let mut raster = Raster::new(3, 2);
        raster.set_pixel(2, 1, Color::rgb(10, 20, 30));
        let image = to_rgba_image(&raster).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [10, 20, 30, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_export_png_round_trips_through_decoder() {
        let mut raster = Raster::new(4, 4);
        raster.set_pixel(1, 3, Color::WHITE);
        let path = std::env::temp_dir().join(format!("rastergraph-{}.png", uuid::Uuid::new_v4()));

        export_png(&raster, &path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).unwrap();

        let back = Raster::from_pixel_buffer(decoded.as_raw(), 4, 4).unwrap();
        assert_eq!(back, raster);
    }

    #[test]
    fn test_export_rejects_empty_raster() {
        let path = std::env::temp_dir().join("rastergraph-empty.png");
        assert!(matches!(
            export_png(&Raster::new(0, 5), &path),
            Err(LibraryError::Config(_))
        ));
    }
}

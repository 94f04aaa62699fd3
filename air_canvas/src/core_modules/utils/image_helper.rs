pub mod image_helper {
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder, ImageError, RgbImage};
    use std::fs::File;
    use std::io::BufWriter;
    use std::path::Path;

    /// Writes `image` as an 8-bit RGB PNG.
    pub fn save_png<P: AsRef<Path>>(path: P, image: &RgbImage) -> Result<(), ImageError> {
        let output = BufWriter::new(File::create(path)?);
        let encoder = PngEncoder::new(output);

        encoder.write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )?;

        Ok(())
    }

    /// Loads any format the `image` crate understands and converts it to RGB.
    pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage, ImageError> {
        Ok(image::open(path)?.to_rgb8())
    }
}

#[cfg(test)]
mod tests {

    use super::image_helper::*;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("air_canvas_{}_{}", std::process::id(), name))
    }

    #[test]
    fn save_and_reload_gradient_file() {
        let width = 64u32;
        let height = 32u32;
        let image = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 4) as u8, (y * 8) as u8, 128]));
        let path = scratch("gradient_file.png");

        save_png(&path, &image).expect("Error Saving File.");
        let reloaded = load_rgb(&path).expect("Error Loading File.");
        let _ = std::fs::remove_file(&path);

        assert_eq!(reloaded.dimensions(), (width, height));
        assert_eq!(reloaded, image);
    }

    #[test]
    fn non_square_dimensions_are_not_swapped() {
        let image = RgbImage::from_pixel(10, 3, Rgb([255, 0, 255]));
        let path = scratch("wide_file.png");

        save_png(&path, &image).expect("Error Saving File.");
        let reloaded = load_rgb(&path).expect("Error Loading File.");
        let _ = std::fs::remove_file(&path);

        assert_eq!(reloaded.dimensions(), (10, 3));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_rgb(scratch("does_not_exist.png")).is_err());
    }
}

// THEORY:
// The `Pixel` module is the most fundamental unit of the drawing engine. It is a
// "dumb" data container for a single RGB pixel plus the one heuristic the
// compositor needs from it: perceived brightness. It knows nothing about its
// neighbors or about strokes.
//
// Key architectural principles:
// 1.  **Data Purity**: It holds the raw `u8` channel values without interpretation.
//     Conversion to and from `image::Rgb<u8>` is lossless, so the rest of the
//     crate can work on `RgbImage` buffers and drop down to `Pixel` only when it
//     needs a heuristic.
// 2.  **Intrinsic Knowledge**: `luminance` depends only on the pixel itself. It uses
//     the Rec. 601 luma weights, the same weighting video libraries use when they
//     reduce a color frame to grayscale.
// 3.  **Background Sentinel**: An all-zero pixel is the canvas "empty" value. The
//     legacy threshold compositor treats anything darker than a cutoff as empty,
//     which is why `is_background` lives here.

pub mod pixel {
    use image::Rgb;

    pub type Channel = u8;
    pub type Luminance = f64;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        /// The value written by the eraser and by `clear`.
        pub const BACKGROUND: Pixel = Pixel {
            red: 0,
            green: 0,
            blue: 0,
        };

        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Self { red, green, blue }
        }

        /// Luminance estimate (Rec. 601 luma) on the 0..255 scale.
        pub fn luminance(&self) -> Luminance {
            0.299_f64 * self.red as f64 + 0.587_f64 * self.green as f64 + 0.114_f64 * self.blue as f64
        }

        /// True when the pixel is too dark to count as drawn under `threshold`.
        pub fn is_background(&self, threshold: Luminance) -> bool {
            self.luminance() < threshold
        }
    }

    impl From<Rgb<u8>> for Pixel {
        fn from(rgb: Rgb<u8>) -> Self {
            let [red, green, blue] = rgb.0;
            Pixel::new(red, green, blue)
        }
    }

    impl From<&Rgb<u8>> for Pixel {
        fn from(rgb: &Rgb<u8>) -> Self {
            Pixel::from(*rgb)
        }
    }

    impl From<Pixel> for Rgb<u8> {
        fn from(pixel: Pixel) -> Self {
            Rgb([pixel.red, pixel.green, pixel.blue])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;
    use image::Rgb;

    #[test]
    fn background_has_zero_luminance() {
        assert_eq!(Pixel::BACKGROUND.luminance(), 0.0);
        assert!(Pixel::BACKGROUND.is_background(50.0));
    }

    #[test]
    fn white_is_full_scale() {
        let white = Pixel::new(255, 255, 255);
        assert!((white.luminance() - 255.0).abs() < 1e-9);
        assert!(!white.is_background(50.0));
    }

    #[test]
    fn converts_losslessly_through_rgb() {
        let rgb = Rgb([12u8, 200, 77]);
        let pixel = Pixel::from(rgb);
        assert_eq!(pixel, Pixel::new(12, 200, 77));
        assert_eq!(Rgb::<u8>::from(pixel), rgb);
    }

    #[test]
    fn green_dominates_the_weighting() {
        let green = Pixel::new(0, 100, 0).luminance();
        let red = Pixel::new(100, 0, 0).luminance();
        let blue = Pixel::new(0, 0, 100).luminance();
        assert!(green > red && red > blue);
    }
}

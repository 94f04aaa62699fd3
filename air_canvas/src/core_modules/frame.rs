// Helpers for the live frames that flow through the pipeline.

use crate::error::CanvasError;
use image::{Rgb, RgbImage, imageops};

/// Flips a frame left to right so the user sees a mirror image of themselves.
pub fn mirror_horizontal(frame: &RgbImage) -> RgbImage {
    imageops::flip_horizontal(frame)
}

pub fn mirror_horizontal_in_place(frame: &mut RgbImage) {
    imageops::flip_horizontal_in_place(frame);
}

/// Rejects frames that cannot size a canvas.
pub fn validate_frame(frame: &RgbImage) -> Result<(), CanvasError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(CanvasError::EmptyFrame);
    }
    Ok(())
}

/// A frame filled with one color.
pub fn solid_frame(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirroring_swaps_columns() {
        let mut frame = solid_frame(4, 2, Rgb([0, 0, 0]));
        frame.put_pixel(0, 1, Rgb([9, 9, 9]));

        let mirrored = mirror_horizontal(&frame);
        assert_eq!(*mirrored.get_pixel(3, 1), Rgb([9, 9, 9]));
        assert_eq!(*mirrored.get_pixel(0, 1), Rgb([0, 0, 0]));

        let mut in_place = frame.clone();
        mirror_horizontal_in_place(&mut in_place);
        assert_eq!(in_place, mirrored);
    }

    #[test]
    fn empty_frames_are_rejected() {
        assert_eq!(validate_frame(&RgbImage::new(0, 10)), Err(CanvasError::EmptyFrame));
        assert_eq!(validate_frame(&RgbImage::new(10, 0)), Err(CanvasError::EmptyFrame));
        assert!(validate_frame(&RgbImage::new(1, 1)).is_ok());
    }
}

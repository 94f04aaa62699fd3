// THEORY:
// The `Canvas` is the persistent layer that accumulates every stroke of a
// session. It is the same size as the video frame and is composited over each
// live frame before display.
//
// Key architectural principles:
// 1.  **Explicit Coverage**: Next to the RGB buffer the canvas keeps a per-pixel
//     `drawn` mask. Painting sets it, erasing and clearing reset it. The compositor
//     can therefore tell "drawn in a dark color" apart from "never drawn", which a
//     brightness test alone cannot.
// 2.  **Capsule Strokes**: A segment of thickness `t` covers every pixel whose
//     center lies within `t / 2` of the segment. Consecutive segments share their
//     endpoints, so the round caps join them into one continuous stroke.
// 3.  **Clipped Writes**: Endpoints may lie anywhere, including far outside the
//     frame. The rasterizer only ever visits the intersection of the stroke's
//     bounding box with the canvas, so no write can land outside the buffer.
// 4.  **Binary Compositing**: A canvas pixel either replaces the frame pixel or
//     leaves it alone. There is no blending.

use crate::core_modules::config::CompositeMode;
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::point::Point;
use image::{Rgb, RgbImage};

/// What a stroke does to the pixels it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brush {
    Paint { color: Rgb<u8>, thickness: u32 },
    Erase { thickness: u32 },
}

impl Brush {
    pub fn thickness(&self) -> u32 {
        match self {
            Brush::Paint { thickness, .. } | Brush::Erase { thickness } => *thickness,
        }
    }
}

/// Calls `plot` for every in-bounds pixel covered by a capsule of `thickness`
/// around the segment `from -> to`. Returns the number of pixels visited.
pub fn rasterize_segment<F>(
    width: u32,
    height: u32,
    from: Point,
    to: Point,
    thickness: u32,
    mut plot: F,
) -> usize
where
    F: FnMut(u32, u32),
{
    if width == 0 || height == 0 {
        return 0;
    }

    let radius = thickness.max(1) as f64 / 2.0;
    let radius_sq = radius * radius;
    let (ax, ay) = (from.x as f64, from.y as f64);
    let (bx, by) = (to.x as f64, to.y as f64);

    let min_x = (ax.min(bx) - radius).floor().max(0.0);
    let min_y = (ay.min(by) - radius).floor().max(0.0);
    let max_x = (ax.max(bx) + radius).ceil().min((width - 1) as f64);
    let max_y = (ay.max(by) + radius).ceil().min((height - 1) as f64);
    if min_x > max_x || min_y > max_y {
        return 0;
    }

    let (dx, dy) = (bx - ax, by - ay);
    let length_sq = dx * dx + dy * dy;

    let mut visited = 0;
    for y in (min_y as u32)..=(max_y as u32) {
        for x in (min_x as u32)..=(max_x as u32) {
            let (px, py) = (x as f64, y as f64);
            let t = if length_sq == 0.0 {
                0.0
            } else {
                (((px - ax) * dx + (py - ay) * dy) / length_sq).clamp(0.0, 1.0)
            };
            let (cx, cy) = (ax + t * dx, ay + t * dy);
            let distance_sq = (px - cx).powi(2) + (py - cy).powi(2);
            if distance_sq <= radius_sq {
                plot(x, y);
                visited += 1;
            }
        }
    }
    visited
}

/// The persistent stroke layer for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbImage,
    drawn: Vec<bool>,
}

impl Canvas {
    /// Creates an empty (all background) canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
            drawn: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    pub fn is_drawn(&self, x: u32, y: u32) -> bool {
        if x >= self.width() || y >= self.height() {
            return false;
        }
        self.drawn[self.index(x, y)]
    }

    pub fn drawn_pixel_count(&self) -> usize {
        self.drawn.iter().filter(|d| **d).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width() as usize + x as usize
    }

    /// Applies `brush` along the segment `from -> to`. Returns the pixel count touched.
    pub fn stroke_segment(&mut self, from: Point, to: Point, brush: Brush) -> usize {
        let (width, height) = self.dimensions();
        let (value, drawn) = match brush {
            Brush::Paint { color, .. } => (color, true),
            Brush::Erase { .. } => (Rgb::from(Pixel::BACKGROUND), false),
        };
        let image = &mut self.image;
        let mask = &mut self.drawn;
        rasterize_segment(width, height, from, to, brush.thickness(), |x, y| {
            image.put_pixel(x, y, value);
            mask[y as usize * width as usize + x as usize] = drawn;
        })
    }

    /// Applies `brush` as a single round dab.
    pub fn stamp(&mut self, center: Point, brush: Brush) -> usize {
        self.stroke_segment(center, center, brush)
    }

    /// Resets every pixel to background.
    pub fn clear(&mut self) {
        self.image.pixels_mut().for_each(|p| *p = Rgb::from(Pixel::BACKGROUND));
        self.drawn.fill(false);
    }

    /// Replaces covered pixels of `frame` with canvas pixels.
    /// `frame` must have the canvas's dimensions; callers check this first.
    pub fn composite_onto(&self, frame: &mut RgbImage, mode: CompositeMode) {
        debug_assert_eq!(frame.dimensions(), self.dimensions());
        match mode {
            CompositeMode::Mask => {
                for (x, y, pixel) in frame.enumerate_pixels_mut() {
                    if self.drawn[self.index(x, y)] {
                        *pixel = *self.image.get_pixel(x, y);
                    }
                }
            }
            CompositeMode::LumaThreshold(threshold) => {
                for (x, y, pixel) in frame.enumerate_pixels_mut() {
                    let stroke = *self.image.get_pixel(x, y);
                    if !Pixel::from(stroke).is_background(threshold) {
                        *pixel = stroke;
                    }
                }
            }
        }
    }
}

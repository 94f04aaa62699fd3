// THEORY:
// The hand-landmark detector is an external collaborator: a model that finds 21
// keypoints on one hand per frame. This module holds what the engine needs from
// its output, and the pure geometry that turns keypoints into the finger vector
// the `GestureClassifier` consumes.
//
// Key architectural principles:
// 1.  **Detector Agnostic**: Landmarks arrive as pixel coordinates, or as
//     normalized (0..1) coordinates plus the frame size. Nothing here depends on
//     how they were produced.
// 2.  **Finger Heuristics**: A finger counts as "up" when its tip is above its PIP
//     joint (smaller y). The thumb moves sideways rather than up, so it counts as
//     up when its tip is right of the IP joint; this assumes the frame is already
//     mirrored.
// 3.  **Debug Skeleton**: `draw_skeleton` paints the bones and joints straight onto
//     the live frame. It is purely visual and never feeds back into the canvas.
// 4.  **Observation Contract**: `HandObservation` is the whole per-frame input of a
//     session: the finger vector plus the index fingertip used as the pen.

use crate::core_modules::canvas::rasterize_segment;
use crate::core_modules::gesture::FingerVector;
use crate::core_modules::point::Point;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

pub const LANDMARK_COUNT: usize = 21;
pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_FINGER_TIP: usize = 8;
/// Tips of index, middle, ring and pinky.
pub const FINGER_TIP_IDS: [usize; 4] = [8, 12, 16, 20];
/// PIP joints matching `FINGER_TIP_IDS`.
pub const FINGER_PIP_IDS: [usize; 4] = [6, 10, 14, 18];

/// Bones of the hand skeleton as landmark index pairs.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (17, 18), (18, 19), (19, 20),
    (0, 17),
];

const BONE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BONE_THICKNESS: u32 = 2;
const JOINT_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const JOINT_RADIUS: u32 = 5;

/// The 21 keypoints of one hand, in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandLandmarks {
    points: [Point; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Point; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// `None` unless exactly 21 points are given.
    pub fn from_slice(points: &[Point]) -> Option<Self> {
        let points: [Point; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self::new(points))
    }

    /// Scales normalized `(x, y)` coordinates to pixels, truncating toward zero.
    pub fn from_normalized(coords: &[(f32, f32)], width: u32, height: u32) -> Option<Self> {
        let points: Vec<Point> = coords
            .iter()
            .map(|(x, y)| Point::new((x * width as f32) as i32, (y * height as f32) as i32))
            .collect();
        Self::from_slice(&points)
    }

    pub fn points(&self) -> &[Point; LANDMARK_COUNT] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    pub fn index_tip(&self) -> Point {
        self.points[INDEX_FINGER_TIP]
    }

    /// `[thumb, index, middle, ring, pinky]` up flags.
    pub fn fingers_up(&self) -> FingerVector {
        let mut fingers = Vec::with_capacity(5);
        fingers.push(self.points[THUMB_TIP].x > self.points[THUMB_IP].x);
        for (tip, pip) in FINGER_TIP_IDS.iter().zip(FINGER_PIP_IDS.iter()) {
            fingers.push(self.points[*tip].y < self.points[*pip].y);
        }
        fingers
    }

    /// Paints the skeleton onto `frame` for debugging.
    pub fn draw_skeleton(&self, frame: &mut RgbImage) {
        let (width, height) = frame.dimensions();
        for (start, end) in HAND_CONNECTIONS {
            rasterize_segment(width, height, self.points[start], self.points[end], BONE_THICKNESS, |x, y| {
                frame.put_pixel(x, y, BONE_COLOR)
            });
        }
        for point in self.points {
            rasterize_segment(width, height, point, point, JOINT_RADIUS * 2, |x, y| {
                frame.put_pixel(x, y, JOINT_COLOR)
            });
        }
    }
}

/// Everything a session learns about the hand in one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandObservation {
    /// Empty when no hand was detected.
    pub fingers: FingerVector,
    /// The drawing point.
    pub index_tip: Option<Point>,
    pub landmarks: Option<HandLandmarks>,
}

impl HandObservation {
    /// No hand in view.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn new(fingers: FingerVector, index_tip: Option<Point>) -> Self {
        Self {
            fingers,
            index_tip,
            landmarks: None,
        }
    }

    pub fn from_landmarks(landmarks: HandLandmarks) -> Self {
        Self {
            fingers: landmarks.fingers_up(),
            index_tip: Some(landmarks.index_tip()),
            landmarks: Some(landmarks),
        }
    }

    pub fn is_hand_present(&self) -> bool {
        !self.fingers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An open hand with the wrist at the bottom, fingers pointing up.
    fn open_hand() -> [Point; LANDMARK_COUNT] {
        let mut points = [Point::new(100, 200); LANDMARK_COUNT];
        // Thumb sweeps to the right.
        for (i, x) in [(1, 110), (2, 120), (3, 130), (4, 145)] {
            points[i] = Point::new(x, 180);
        }
        // Four fingers: MCP, PIP, DIP, TIP from bottom to top.
        for (finger, base) in [5usize, 9, 13, 17].into_iter().enumerate() {
            let x = 90 + finger as i32 * 10;
            for joint in 0..4 {
                points[base + joint] = Point::new(x, 160 - joint as i32 * 20);
            }
        }
        points
    }

    /// Folds a finger so the tip drops below its PIP joint.
    fn curl(points: &mut [Point; LANDMARK_COUNT], tip: usize) {
        points[tip].y = points[tip - 2].y + 15;
    }

    #[test]
    fn open_hand_has_all_fingers_up() {
        let hand = HandLandmarks::new(open_hand());
        assert_eq!(hand.fingers_up(), vec![true; 5]);
    }

    #[test]
    fn pointing_hand_has_only_index_up() {
        let mut points = open_hand();
        points[THUMB_TIP].x = 120;
        for tip in [12, 16, 20] {
            curl(&mut points, tip);
        }
        let hand = HandLandmarks::new(points);
        assert_eq!(hand.fingers_up(), vec![false, true, false, false, false]);
        assert_eq!(hand.index_tip(), points[INDEX_FINGER_TIP]);
    }

    #[test]
    fn from_slice_requires_21_points() {
        assert!(HandLandmarks::from_slice(&[Point::new(0, 0); 20]).is_none());
        assert!(HandLandmarks::from_slice(&[Point::new(0, 0); 21]).is_some());
    }

    #[test]
    fn normalized_coordinates_scale_and_truncate() {
        let mut coords = vec![(0.0f32, 0.0f32); LANDMARK_COUNT];
        coords[INDEX_FINGER_TIP] = (0.5, 0.999);
        let hand = HandLandmarks::from_normalized(&coords, 640, 480).unwrap();
        assert_eq!(hand.index_tip(), Point::new(320, 479));
    }

    #[test]
    fn observation_from_landmarks_carries_the_index_tip() {
        let hand = HandLandmarks::new(open_hand());
        let observation = HandObservation::from_landmarks(hand.clone());
        assert!(observation.is_hand_present());
        assert_eq!(observation.index_tip, Some(hand.index_tip()));
        assert_eq!(observation.fingers.len(), 5);
        assert!(!HandObservation::absent().is_hand_present());
    }

    #[test]
    fn skeleton_draws_bones_and_joints() {
        let hand = HandLandmarks::new(open_hand());
        let mut frame = RgbImage::new(256, 256);
        hand.draw_skeleton(&mut frame);

        assert_eq!(*frame.get_pixel(90, 150), BONE_COLOR);
        assert_eq!(*frame.get_pixel(100, 200), JOINT_COLOR);
        assert_eq!(*frame.get_pixel(250, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn skeleton_off_frame_is_clipped() {
        let points = [Point::new(-1000, 5000); LANDMARK_COUNT];
        let mut frame = RgbImage::new(32, 32);
        HandLandmarks::new(points).draw_skeleton(&mut frame);
        assert!(frame.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}

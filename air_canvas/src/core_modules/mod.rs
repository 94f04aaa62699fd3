pub mod canvas;
pub mod config;
pub mod drawing_engine;
pub mod frame;
pub mod gesture;
pub mod hand;
pub mod palette;
pub mod pixel;
pub mod point;
pub mod smoothing;
pub mod utils;

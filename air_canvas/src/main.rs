// Demo runner for the `air_canvas` library.
// Plays a short scripted gesture sequence through a session pool and saves the
// last composited frame as a PNG.

use air_canvas::core_modules::utils::image_helper::image_helper::save_png;
use air_canvas::telemetry::init_logging;
use air_canvas::{HandObservation, PipelineConfig, Point, SessionPool};
use image::{Rgb, RgbImage};
use tracing::info;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

fn script() -> Vec<HandObservation> {
    let thumb = vec![true, false, false, false, false];
    let index = vec![false, true, false, false, false];
    let ring = vec![false, false, false, true, false];

    let mut frames = vec![HandObservation::new(thumb, None)];
    // A red zig-zag.
    for step in 0..30 {
        let x = 20 + step * 9;
        let y = if (step / 5) % 2 == 0 { 60 + (step % 5) * 12 } else { 120 - (step % 5) * 12 };
        frames.push(HandObservation::new(index.clone(), Some(Point::new(x, y))));
    }
    frames.push(HandObservation::absent());
    frames.push(HandObservation::new(ring, None));
    // A yellow underline, disjoint from the zig-zag.
    for step in 0..30 {
        frames.push(HandObservation::new(index.clone(), Some(Point::new(20 + step * 9, 190))));
    }
    frames
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging("info")?;
    info!("Air Canvas - Demo Runner");

    let mut pool = SessionPool::new(PipelineConfig::default());
    let session = pool.open_session();

    let background = RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([20, 20, 20]));
    let mut last = None;
    for observation in script() {
        let report = pool.submit(session, background.clone(), observation).await?;
        last = Some(report);
    }

    if let Some(report) = last {
        let path = std::env::temp_dir().join("air_canvas_demo.png");
        save_png(&path, &report.frame)?;
        info!(
            frames = report.frame_index + 1,
            color = %report.color,
            path = %path.display(),
            "demo frame written"
        );
    }

    pool.close_session(session)?;
    Ok(())
}

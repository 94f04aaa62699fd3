use air_canvas::core_modules::utils::image_helper::image_helper::{load_rgb, save_png};
use air_canvas::telemetry::init_logging;
use air_canvas::{CanvasPipeline, HandLandmarks, HandObservation, PipelineConfig, Point};
use anyhow::{Context, Result, anyhow, bail};
use image::{Rgb, RgbImage};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;

/// A recorded gesture session.
#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    /// Image used as every live frame. Overrides `width` and `height`.
    background: Option<PathBuf>,
    frames: Vec<ScriptFrame>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScriptFrame {
    fingers: Vec<bool>,
    tip: Option<Point>,
    /// 21 normalized `[x, y]` pairs. Replaces `fingers` and `tip` when present.
    landmarks: Option<Vec<(f32, f32)>>,
    /// How many consecutive frames this entry stands for.
    repeat: Option<u32>,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

impl ScriptFrame {
    fn observation(&self, width: u32, height: u32) -> Result<HandObservation> {
        match &self.landmarks {
            Some(coords) => {
                let landmarks = HandLandmarks::from_normalized(coords, width, height)
                    .ok_or_else(|| anyhow!("expected 21 landmarks, got {}", coords.len()))?;
                Ok(HandObservation::from_landmarks(landmarks))
            }
            None => Ok(HandObservation::new(self.fingers.clone(), self.tip)),
        }
    }
}

struct Args {
    script: PathBuf,
    output_dir: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().context("--config needs a path")?;
            config = Some(PathBuf::from(path));
        } else {
            positional.push(PathBuf::from(arg));
        }
    }
    if positional.len() != 2 {
        bail!("Usage: visual_tester <script.json> <output_dir> [--config <pipeline.json>]");
    }
    let output_dir = positional.pop().context("missing output directory")?;
    let script = positional.pop().context("missing script path")?;
    Ok(Args {
        script,
        output_dir,
        config,
    })
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn load_script(path: &Path) -> Result<Script> {
    let text = fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing script {}", path.display()))
}

fn background_for(script: &Script, script_path: &Path) -> Result<RgbImage> {
    match &script.background {
        Some(relative) => {
            let path = script_path
                .parent()
                .map(|dir| dir.join(relative))
                .unwrap_or_else(|| relative.clone());
            load_rgb(&path).with_context(|| format!("loading background {}", path.display()))
        }
        None => Ok(RgbImage::from_pixel(script.width, script.height, Rgb([0, 0, 0]))),
    }
}

/// Replays `script` and writes one PNG per frame. Returns the number written.
fn run(script: &Script, background: &RgbImage, config: PipelineConfig, output_dir: &Path) -> Result<usize> {
    fs::create_dir_all(output_dir).with_context(|| format!("creating {}", output_dir.display()))?;

    let (width, height) = background.dimensions();
    let mut pipeline = CanvasPipeline::new(config);
    let mut written = 0;

    for (entry_index, entry) in script.frames.iter().enumerate() {
        let observation = entry
            .observation(width, height)
            .with_context(|| format!("script frame {entry_index}"))?;

        for _ in 0..entry.repeat.unwrap_or(1) {
            let report = match pipeline.process_frame(background.clone(), &observation) {
                Ok(report) => report,
                Err(error) => {
                    warn!(entry = entry_index, %error, "frame skipped");
                    continue;
                }
            };

            let path = output_dir.join(format!("frame_{:04}.png", report.frame_index));
            save_png(&path, &report.frame).with_context(|| format!("writing {}", path.display()))?;
            written += 1;
        }
    }

    Ok(written)
}

fn main() -> Result<()> {
    init_logging("info").map_err(|e| anyhow!(e))?;

    // --- 1. Argument Parsing & Setup ---
    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args)?;

    let config = load_config(args.config.as_deref())?;
    let script = load_script(&args.script)?;
    let background = background_for(&script, &args.script)?;

    // --- 2. Replay ---
    let written = run(&script, &background, config, &args.output_dir)?;

    info!(frames = written, output = %args.output_dir.display(), "Processing complete");
    Ok(())
}

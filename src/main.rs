//! pitchdetect: print the pitch, note, detune and color of each window of a WAV file.

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use serde::Serialize;

use pitchdetect::detector::autocorrelation::AutocorrelationDetector;
use pitchdetect::driver::{Analysis, AudioSource, DetectionLoop, PresentationSink};
use pitchdetect::source::WavSource;
use pitchdetect::DetectorConfig;

/// Track the pitch of a recording window by window
#[derive(Parser)]
#[command(name = "pitchdetect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// WAV file to analyse
    input: PathBuf,

    /// Samples per analysis window
    #[arg(short, long, default_value_t = 1024)]
    window: usize,

    /// Samples between window starts (default: the window size)
    #[arg(long)]
    hop: Option<usize>,

    /// TOML file overriding the detector thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit one JSON object per window
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Line<'a> {
    time: f64,
    #[serde(flatten)]
    analysis: &'a Analysis,
}

struct ConsoleSink {
    json: bool,
    seconds_per_hop: f64,
    windows: usize,
    detected: usize,
}

impl ConsoleSink {
    fn format(&self, analysis: &Analysis) -> Result<String> {
        let time = self.windows as f64 * self.seconds_per_hop;
        if self.json {
            return Ok(serde_json::to_string(&Line { time, analysis })?);
        }
        Ok(match analysis {
            Analysis::Detected(reading) => format!(
                "{:>8.3}s  {:>6.0} Hz  {:<4}  {:<12}  {} on {}",
                time,
                reading.frequency,
                reading.note.to_string(),
                reading.note.detune.to_string(),
                reading.color,
                reading.color.contrast(),
            ),
            Analysis::NotDetected => format!("{:>8.3}s  {:>6} Hz  {:<4}  -- cents", time, "--", "-"),
        })
    }
}

impl PresentationSink for ConsoleSink {
    fn on_result(&mut self, analysis: &Analysis) -> ControlFlow<()> {
        let line = match self.format(analysis) {
            Ok(line) => line,
            Err(e) => {
                warn!("failed to format result: {}", e);
                return ControlFlow::Break(());
            }
        };
        self.windows += 1;
        if analysis.reading().is_some() {
            self.detected += 1;
        }
        // A closed pipe (e.g. `| head`) ends the run quietly.
        match writeln!(io::stdout().lock(), "{}", line) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }
}

/// Window and hop must describe a walkable sequence of windows.
fn check_windowing(window: usize, hop: usize) -> Result<()> {
    if window < 2 {
        bail!("--window must be at least 2 samples, got {}", window);
    }
    if hop == 0 {
        bail!("--hop must be positive");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DetectorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DetectorConfig::default(),
    };
    let hop = cli.hop.unwrap_or(cli.window);
    check_windowing(cli.window, hop)?;

    let source = WavSource::<f32>::open(&cli.input, cli.window, hop)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    info!(
        "{}: {} samples at {} Hz, window {} hop {}",
        cli.input.display(),
        source.samples().len(),
        source.sample_rate(),
        cli.window,
        hop
    );

    let sink = ConsoleSink {
        json: cli.json,
        seconds_per_hop: hop as f64 / source.sample_rate() as f64,
        windows: 0,
        detected: 0,
    };
    let detector = AutocorrelationDetector::<f32>::with_config(cli.window, config);
    let mut detection = DetectionLoop::new(source, detector, sink);
    detection.run().context("detection failed")?;

    let sink = detection.sink();
    info!("pitch found in {} of {} windows", sink.detected, sink.windows);
    if sink.windows == 0 {
        warn!("input is shorter than one window of {} samples", cli.window);
    }
    Ok(())
}

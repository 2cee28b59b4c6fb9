// src/main.rs

use anyhow::{Context, Result};
use std::path::Path;
use surpass_assist::replay::{self, ReplaySource, StreamReport};
use surpass_assist::Config;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path =
        std::env::var("SURPASS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config_exists = Path::new(&config_path).exists();
    let config = if config_exists {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("surpass_assist={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚗 Surpass Assist starting");
    if config_exists {
        info!("✓ Configuration loaded from {}", config_path);
    } else {
        warn!("{} not found, using built-in defaults", config_path);
    }
    info!(
        "Calibration: reference width {:.2}m, focal length {:.0}px | window N={} | safety distance {:.1}m",
        config.calibration.reference_width_m,
        config.calibration.focal_length_px,
        config.tracking.window_size,
        config.safety.safety_distance_m
    );
    if config.safety.unknown_is_surpassable {
        info!("Tracks with fewer than N samples are reported as surpassable");
    }

    let source = ReplaySource::new(config.replay.clone());
    let files = source.find_replay_files()?;
    if files.is_empty() {
        error!("No replay files found in {}", config.replay.input_dir);
        return Ok(());
    }

    let mut reports: Vec<StreamReport> = Vec::with_capacity(files.len());
    let mut failures = 0usize;

    // Each stream gets its own orchestrator on a blocking worker; track state is never shared.
    for batch in files.chunks(config.replay.max_parallel_streams) {
        let mut workers = JoinSet::new();
        for path in batch {
            let path = path.clone();
            let config = config.clone();
            workers.spawn_blocking(move || {
                let result = replay::replay_stream(&path, &config);
                (path, result)
            });
        }

        while let Some(joined) = workers.join_next().await {
            let (path, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    failures += 1;
                    error!("Replay worker panicked: {}", e);
                    continue;
                }
            };
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    failures += 1;
                    error!("Failed to replay {}: {:#}", path.display(), e);
                }
            }
        }
    }

    info!("\n========================================");
    info!("Replayed {} stream(s), {} failed", reports.len(), failures);
    for report in &reports {
        let m = &report.metrics;
        info!(
            "  {}: {} frames | {} advisories | ⚠️  {} unsafe | {} unknown | lane clear {}/{} | {:.1} fps",
            report.stream,
            m.total_frames,
            m.advisories,
            m.unsafe_advisories,
            m.unknown_direction,
            m.left_lane_clear_frames,
            m.frames_with_mask,
            m.fps
        );
        if report.rejected_frames > 0 {
            warn!(
                "  {}: {} frame(s) skipped for arriving out of order",
                report.stream, report.rejected_frames
            );
        }
        if m.mask_contract_violations > 0 {
            warn!(
                "  {}: {} lane mask(s) did not match the frame size",
                report.stream, m.mask_contract_violations
            );
        }
    }

    std::fs::create_dir_all(&config.replay.output_dir)?;
    let summary_path = Path::new(&config.replay.output_dir).join("summary.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&reports)?)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;
    info!("Summary written to {}", summary_path.display());

    Ok(())
}

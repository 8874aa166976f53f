use std::time::Duration;

use chrono::Utc;
use run_tracker_data_management::{read_gpx, StateManager};
use run_tracker_lib::{format, track::Track};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::source;

/// How often time-dependent metrics are refreshed between fixes.
const TICK_INTERVAL: Duration = Duration::from_millis(500);
const STATUS_INTERVAL: Duration = Duration::from_secs(5);

async fn start_state_manager() -> anyhow::Result<StateManager> {
    StateManager::start()
        .await
        .map_err(|err| anyhow::anyhow!("Failed to start state manager: {:?}", err))
}

/// The live session loop: one engine instance, fed by stdin fixes and the
/// periodic tick, snapshotted after every accepted fix.
pub async fn run_live() -> anyhow::Result<()> {
    let state_manager = start_state_manager().await?;

    let mut track = Track::new();
    match state_manager.load_snapshot().await {
        Some(snapshot) => {
            track.restore(snapshot.distance_meters, snapshot.start_time);
            tracing::info!(
                "Resumed session started {} with {} m",
                snapshot.start_time,
                format::format_number(snapshot.distance_meters, 0)
            );
        }
        None => tracing::info!("Starting fresh session"),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(TICK_INTERVAL);
    let mut status = tokio::time::interval(STATUS_INTERVAL);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let Some(fix) = source::parse_fix_line(&line) else {
                            continue;
                        };
                        if track.add(fix) {
                            if let Err(err) = state_manager.save_track(&track).await {
                                tracing::error!("Failed to save track state: {:?}", err);
                            }
                        }
                    }
                    Ok(None) => {
                        tracing::info!("Location source closed");
                        break;
                    }
                    Err(err) => {
                        tracing::error!("Failed to read from location source: {}", err);
                    }
                }
            }
            _ = tick.tick() => {
                track.update_current_time();
            }
            _ = status.tick() => {
                log_status(&track);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Session interrupted");
                break;
            }
        }
    }

    if let Err(err) = state_manager.save_track(&track).await {
        tracing::error!("Failed to save track state: {:?}", err);
    }
    print_summary(&track);
    Ok(())
}

/// Feeds a GPX recording through a fresh engine at full speed. Saved state
/// is not touched.
pub async fn replay(path: &str) -> anyhow::Result<()> {
    let fixes =
        read_gpx(path).map_err(|err| anyhow::anyhow!("Failed to read recording: {:?}", err))?;

    let mut track = Track::new();
    let mut admitted = 0usize;
    let mut accepted = 0usize;
    for fix in fixes {
        let Some(fix) = source::admit(fix) else {
            continue;
        };

        // Pin the session start to the recording, not the wall clock.
        if track.location_count() == 0 {
            track.restore(0.0, fix.timestamp);
        }

        admitted += 1;
        if track.add(fix) {
            accepted += 1;
        }
    }

    tracing::info!("Replayed {} fixes, accepted {}", admitted, accepted);
    print_summary(&track);
    Ok(())
}

pub async fn print_status() -> anyhow::Result<()> {
    let state_manager = start_state_manager().await?;

    match state_manager.load_snapshot().await {
        Some(snapshot) => {
            let elapsed_ms = (Utc::now() - snapshot.start_time).num_milliseconds().max(0);
            println!(
                "Saved session: {} km since {}, {} elapsed",
                format::format_number(snapshot.distance_meters / 1000.0, 2),
                snapshot.start_time,
                format::format_duration(elapsed_ms).map_err(|err| anyhow::anyhow!(err))?,
            );
        }
        None => println!("No saved session"),
    }
    Ok(())
}

pub async fn reset() -> anyhow::Result<()> {
    let state_manager = start_state_manager().await?;

    let track = Track::new();
    state_manager
        .save_track(&track)
        .await
        .map_err(|err| anyhow::anyhow!("Failed to save track state: {:?}", err))?;

    tracing::info!("Saved session reset");
    Ok(())
}

fn log_status(track: &Track) {
    tracing::info!(
        "{} | {} km | {} km/h",
        format::format_duration(track.duration_ms()).unwrap_or_else(|_| "--:--:--".into()),
        format::format_number(track.distance_meters() / 1000.0, 2),
        format::format_number(track.pace_kmh(), 1),
    );
}

fn print_summary(track: &Track) {
    println!(
        "Distance: {} km",
        format::format_number(track.distance_meters() / 1000.0, 2)
    );
    println!(
        "Duration: {}",
        format::format_duration(track.duration_ms()).unwrap_or_else(|_| "--:--:--".into())
    );
    println!(
        "Pace:     {} km/h",
        format::format_number(track.pace_kmh(), 1)
    );
}

//! `render` command implementation.

use std::time::Instant;

use anyhow::{Context, Result};
use hud::{FrameWriter, HudError, RenderContext, SkiaCanvas};
use observability::{FrameOutcome, SessionAggregator};
use tracing::{info, warn};

use super::{load_config, load_nonempty};
use crate::cli::RenderArgs;
use crate::error::CliError;

/// Execute the `render` command
pub fn run_render(args: &RenderArgs) -> Result<()> {
    if args.frames == 0 {
        return Err(CliError::invalid_argument("--frames must be at least 1").into());
    }

    let config = load_config(&args.config)?;
    let samples = load_nonempty(&args.data, Some(&config))?;
    let mut ctx = RenderContext::new(&config, &samples).context("Failed to set up HUD")?;
    let mut canvas = SkiaCanvas::new(args.width, args.height)?;

    info!(
        mode = %config.hud.mode,
        strategy = ctx.strategy_name().unwrap_or("none"),
        width = args.width,
        height = args.height,
        frames = args.frames,
        "Rendering"
    );

    if args.frames == 1 {
        ctx.set_timestamp(args.at)
            .with_context(|| format!("No sample for {}us", args.at))?;
        ctx.render(&mut canvas)?;
        canvas.save_png(&args.out)?;
        println!("Wrote {}", args.out.display());
        return Ok(());
    }

    let mut writer = FrameWriter::new(&args.out_dir, "hud_")
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    let mut session = SessionAggregator::new();

    for i in 0..args.frames {
        let Some(at) = frame_time(args.at, args.step, i) else {
            warn!(frame = i, step_us = args.step, "Frame time overflows, stopping");
            break;
        };
        if let Err(e) = ctx.set_timestamp(at) {
            info!(at_us = at, reason = %e, "Stopping at end of recording");
            break;
        }

        let started = Instant::now();
        let outcome = render_frame(&ctx, &mut canvas, &mut writer);
        session.update_frame(outcome, started.elapsed().as_secs_f64() * 1e3);
    }

    let summary = session.summary();
    println!("{}", summary);
    println!(
        "Wrote {} frames to {}",
        writer.written(),
        writer.base_path().display()
    );

    if summary.failed_frames > 0 {
        return Err(CliError::RenderFailures {
            failed: summary.failed_frames,
            total: summary.total_frames,
        }
        .into());
    }
    Ok(())
}

/// Playback time of frame `index`, `None` past `u64::MAX`
fn frame_time(start_us: u64, step_us: u64, index: u64) -> Option<u64> {
    index.checked_mul(step_us)?.checked_add(start_us)
}

/// Render the current sample and write it out
///
/// Failing frames are logged and counted; the sequence continues.
pub(crate) fn render_frame(
    ctx: &RenderContext<'_>,
    canvas: &mut SkiaCanvas,
    writer: &mut FrameWriter,
) -> FrameOutcome {
    let outcome = match ctx.render(canvas) {
        Ok(()) if ctx.current_sample().is_some() => FrameOutcome::Rendered,
        Ok(()) => FrameOutcome::Empty,
        Err(e) => {
            log_render_error(&e);
            return FrameOutcome::Failed;
        }
    };

    match writer.write(canvas) {
        Ok(_) => outcome,
        Err(_) => FrameOutcome::Failed,
    }
}

fn log_render_error(e: &HudError) {
    match e {
        HudError::RenderStage { stage, source } => {
            warn!(stage = %stage, error = %source, "Frame failed")
        }
        other => warn!(error = %other, "Frame failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{write_config, write_recording};

    fn args(dir: &std::path::Path) -> RenderArgs {
        RenderArgs {
            data: write_recording(dir, 3.0),
            config: write_config(dir, "[hud]\nmode = \"swingboat\"\n"),
            at: 1_000_000,
            width: 640,
            height: 480,
            out: dir.join("frame.png"),
            frames: 1,
            step: 33_333,
            out_dir: dir.join("seq"),
        }
    }

    #[test]
    fn test_single_frame() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path());
        run_render(&args).unwrap();
        assert!(args.out.exists(), "png written");
    }

    #[test]
    fn test_sequence_stops_at_end_of_recording() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.at = 2_500_000;
        args.step = 100_000;
        args.frames = 20;
        run_render(&args).unwrap();

        // 2.5s .. 2.9s; the last sample is at 2.99s
        let written = std::fs::read_dir(&args.out_dir).unwrap().count();
        assert_eq!(written, 5);
        assert!(args.out_dir.join("hud_000004.png").exists());
    }

    #[test]
    fn test_frame_time_overflow() {
        assert_eq!(frame_time(1_000, 500, 4), Some(3_000));
        assert_eq!(frame_time(1, u64::MAX, 1), None);
        assert_eq!(frame_time(0, u64::MAX / 2, 3), None);
    }

    #[test]
    fn test_huge_step_stops_after_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.step = u64::MAX;
        args.frames = 3;
        run_render(&args).unwrap();

        let written = std::fs::read_dir(&args.out_dir).unwrap().count();
        assert_eq!(written, 1);
    }

    #[test]
    fn test_zero_frames_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.frames = 0;
        assert!(run_render(&args).is_err());
    }

    #[test]
    fn test_timestamp_past_end_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.at = 60_000_000;
        let err = run_render(&args).unwrap_err();
        assert!(err.to_string().contains("No sample"), "got: {err}");
    }
}

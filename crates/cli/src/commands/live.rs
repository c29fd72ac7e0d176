//! `live` command implementation.
//!
//! Decodes frames from a non-blocking stdin, rendering one HUD frame per
//! sample. The descriptor is only read after tokio reports it readable.

use std::io;
use std::os::fd::AsFd;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::ReplayConfig;
use hud::{FrameWriter, RenderContext, SkiaCanvas};
use ingestion::{FrameDecoder, IngestionMetrics, PollReadiness, Preprocessor, ReadOutcome, Readiness};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use observability::{FrameOutcome, SessionAggregator};
use tokio::io::unix::AsyncFd;
use tracing::{debug, info, warn};

use super::load_config;
use crate::cli::LiveArgs;

/// Restores the original descriptor flags on drop
struct NonBlocking<F: AsFd> {
    fd: F,
    original: OFlag,
}

impl<F: AsFd> NonBlocking<F> {
    fn enable(fd: F) -> nix::Result<Self> {
        let original = OFlag::from_bits_truncate(fcntl(fd.as_fd(), FcntlArg::F_GETFL)?);
        fcntl(fd.as_fd(), FcntlArg::F_SETFL(original | OFlag::O_NONBLOCK))?;
        Ok(Self { fd, original })
    }
}

impl<F: AsFd> Drop for NonBlocking<F> {
    fn drop(&mut self) {
        if let Err(errno) = fcntl(self.fd.as_fd(), FcntlArg::F_SETFL(self.original)) {
            warn!(error = %errno, "failed to restore stdin flags");
        }
    }
}

/// Per-sample pipeline state
struct LiveSession<'a> {
    ctx: RenderContext<'a>,
    preprocessor: Preprocessor,
    canvas: SkiaCanvas,
    writer: Option<FrameWriter>,
    session: SessionAggregator,
}

impl<'a> LiveSession<'a> {
    fn new(config: &'a ReplayConfig, args: &LiveArgs) -> Result<Self> {
        let writer = args
            .out_dir
            .as_ref()
            .map(|dir| FrameWriter::new(dir, "live_"))
            .transpose()
            .context("Failed to create frame directory")?;

        Ok(Self {
            ctx: RenderContext::new(config, &[]).context("Failed to set up HUD")?,
            preprocessor: Preprocessor::new(config),
            canvas: SkiaCanvas::new(args.width, args.height)?,
            writer,
            session: SessionAggregator::new(),
        })
    }

    /// Preprocess, push and render one decoded sample
    fn handle(&mut self, sample: contracts::Sample) -> Result<()> {
        let sample = match self.preprocessor.process(sample) {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                debug!(time_us = sample.time, "sample outside video window");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "dropping sample");
                return Ok(());
            }
        };
        self.session.update_sample(&sample);
        self.ctx.push_sample(sample);

        let started = Instant::now();
        let outcome = match &mut self.writer {
            Some(writer) => super::render::render_frame(&self.ctx, &mut self.canvas, writer),
            None => match self.ctx.render(&mut self.canvas) {
                Ok(()) => FrameOutcome::Rendered,
                Err(e) => {
                    warn!(error = %e, time_us = sample.time, "Frame failed");
                    FrameOutcome::Failed
                }
            },
        };
        self.session
            .update_frame(outcome, started.elapsed().as_secs_f64() * 1e3);
        Ok(())
    }
}

/// Execute the `live` command
pub async fn run_live(args: &LiveArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let mut live = LiveSession::new(&config, args)?;
    let metrics = Arc::new(IngestionMetrics::new());
    let mut decoder = FrameDecoder::new().with_metrics(metrics.clone());

    let _flags = NonBlocking::enable(io::stdin()).context("Failed to make stdin non-blocking")?;

    info!(mode = %config.hud.mode, "Reading samples from stdin");

    match AsyncFd::new(io::stdin()) {
        Ok(stdin) => drain_async(&stdin, &mut decoder, &mut live).await?,
        Err(e) => {
            // regular files cannot be registered with epoll
            debug!(error = %e, "stdin is not pollable by the reactor, reading directly");
            drain_blocking(&mut decoder, &mut live)?;
        }
    }

    report(&live.session, &metrics);
    Ok(())
}

/// Decode whenever the reactor reports stdin readable, until end of stream
async fn drain_async(
    stdin: &AsyncFd<io::Stdin>,
    decoder: &mut FrameDecoder,
    live: &mut LiveSession<'_>,
) -> Result<()> {
    loop {
        let mut guard = stdin.readable().await?;
        let mut reader = guard.get_ref().get_ref().lock();
        loop {
            match decoder.decode_one(&mut reader)? {
                ReadOutcome::Sample(sample) => live.handle(sample)?,
                ReadOutcome::WouldBlock => break,
                ReadOutcome::Eof => return Ok(()),
            }
        }
        drop(reader);
        guard.clear_ready();
    }
}

fn drain_blocking(decoder: &mut FrameDecoder, live: &mut LiveSession<'_>) -> Result<()> {
    let stdin = io::stdin();
    let mut readiness = PollReadiness;
    loop {
        match decoder.decode_one(&mut stdin.lock())? {
            ReadOutcome::Sample(sample) => live.handle(sample)?,
            ReadOutcome::WouldBlock => readiness.wait_readable(&stdin)?,
            ReadOutcome::Eof => return Ok(()),
        }
    }
}

fn report(session: &SessionAggregator, metrics: &IngestionMetrics) {
    let snapshot = metrics.snapshot();
    info!(
        frames_decoded = snapshot.frames_decoded,
        bytes_read = snapshot.bytes_read,
        would_block = snapshot.would_block,
        decode_errors = snapshot.decode_errors,
        "Stream ended"
    );
    println!("{}", session.summary());
    println!(
        "Decoded {} frames ({} bytes, {} waits)",
        snapshot.frames_decoded, snapshot.bytes_read, snapshot.would_block
    );
}

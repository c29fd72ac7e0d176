//! Bulk loader
//!
//! Drives a `FrameDecoder` until end of stream, waiting for readiness whenever
//! a non-blocking stream has nothing to offer.

use std::io::{self, Read};
use std::os::fd::AsFd;
use std::sync::Arc;

use contracts::Sample;
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tracing::{debug, info};

use crate::config::IngestionMetrics;
use crate::decoder::{FrameDecoder, ReadOutcome};
use crate::error::{IngestionError, Result};

/// Sample array growth step
pub const GROW_CHUNK: usize = 1000;

/// Blocking wait until a stream becomes readable
pub trait Readiness<S: ?Sized> {
    fn wait_readable(&mut self, stream: &S) -> io::Result<()>;
}

/// `poll(2)` on the stream's descriptor, no timeout
#[derive(Debug, Default, Clone, Copy)]
pub struct PollReadiness;

impl<S: AsFd + ?Sized> Readiness<S> for PollReadiness {
    fn wait_readable(&mut self, stream: &S) -> io::Result<()> {
        let mut fds = [PollFd::new(stream.as_fd(), PollFlags::POLLIN)];
        loop {
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => return Ok(()),
                Err(Errno::EINTR) => continue,
                Err(errno) => return Err(io::Error::from(errno)),
            }
        }
    }
}

/// Yields the thread instead of waiting on a descriptor
///
/// For readers without a descriptor (in-memory streams, test doubles).
#[derive(Debug, Default, Clone, Copy)]
pub struct YieldReadiness;

impl<S: ?Sized> Readiness<S> for YieldReadiness {
    fn wait_readable(&mut self, _stream: &S) -> io::Result<()> {
        std::thread::yield_now();
        Ok(())
    }
}

/// Decode every frame of `reader` until end of stream
///
/// The partial array is dropped on any error.
///
/// # Errors
/// - Decoder errors (I/O, truncated frame)
/// - Readiness wait failure
/// - Array growth failure
pub fn load_all<R, W>(reader: &mut R, readiness: &mut W) -> Result<Vec<Sample>>
where
    R: Read + ?Sized,
    W: Readiness<R>,
{
    load_all_with_metrics(reader, readiness, Arc::new(IngestionMetrics::new()))
}

/// `load_all` with shared counters
pub fn load_all_with_metrics<R, W>(
    reader: &mut R,
    readiness: &mut W,
    metrics: Arc<IngestionMetrics>,
) -> Result<Vec<Sample>>
where
    R: Read + ?Sized,
    W: Readiness<R>,
{
    let mut decoder = FrameDecoder::new().with_metrics(metrics);
    let mut samples: Vec<Sample> = Vec::new();

    loop {
        match decoder.decode_one(reader)? {
            ReadOutcome::Sample(sample) => {
                if samples.len() == samples.capacity() {
                    samples.try_reserve_exact(GROW_CHUNK).map_err(|_| {
                        IngestionError::AllocationFailure {
                            requested: samples.len() + GROW_CHUNK,
                        }
                    })?;
                }
                samples.push(sample);
            }
            ReadOutcome::WouldBlock => readiness.wait_readable(reader)?,
            ReadOutcome::Eof => break,
        }
    }

    log_summary(&samples);
    Ok(samples)
}

/// `load_all` on a descriptor-backed stream, waiting with `poll(2)`
pub fn load_all_fd<R: Read + AsFd>(reader: &mut R) -> Result<Vec<Sample>> {
    load_all(reader, &mut PollReadiness)
}

fn log_summary(samples: &[Sample]) {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => info!(
            samples = samples.len(),
            start_us = first.time,
            end_us = last.time,
            duration_us = last.time.saturating_sub(first.time),
            "loaded samples"
        ),
        _ => debug!("stream contained no samples"),
    }
}

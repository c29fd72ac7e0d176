//! Frame decoder
//!
//! Accumulates bytes from a (possibly non-blocking) stream into a single
//! frame-sized staging buffer and decodes a `Sample` once it is full.

use std::io::{ErrorKind, Read};
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use contracts::{Sample, FRAME_SIZE};
use tracing::{error, trace};

use crate::config::IngestionMetrics;
use crate::error::{IngestionError, Result};

/// Result of one `decode_one` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadOutcome {
    /// A full frame was consumed
    Sample(Sample),
    /// The stream has no data right now; retry after readiness
    WouldBlock,
    /// The stream ended on a frame boundary
    Eof,
}

/// Stateful frame decoder
///
/// Partial frames survive across calls, so a non-blocking stream can be
/// drained whenever it becomes readable.
#[derive(Debug)]
pub struct FrameDecoder {
    buf: [u8; FRAME_SIZE],
    pos: usize,
    metrics: Option<Arc<IngestionMetrics>>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            buf: [0; FRAME_SIZE],
            pos: 0,
            metrics: None,
        }
    }

    /// Attach shared counters
    pub fn with_metrics(mut self, metrics: Arc<IngestionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Bytes of the current partial frame
    pub fn buffered(&self) -> usize {
        self.pos
    }

    /// Read until one frame is complete, the stream would block, or it ends
    ///
    /// # Errors
    /// - Read failures other than `Interrupted` / `WouldBlock`
    /// - End of stream with a partial frame buffered
    pub fn decode_one<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<ReadOutcome> {
        while self.pos < FRAME_SIZE {
            match reader.read(&mut self.buf[self.pos..]) {
                Ok(0) => {
                    if self.pos == 0 {
                        return Ok(ReadOutcome::Eof);
                    }
                    self.record_error();
                    return Err(IngestionError::TruncatedFrame {
                        buffered: self.pos,
                        expected: FRAME_SIZE,
                    });
                }
                Ok(n) => {
                    self.pos += n;
                    if let Some(metrics) = &self.metrics {
                        metrics.record_bytes(n);
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    trace!(buffered = self.pos, "stream would block");
                    if let Some(metrics) = &self.metrics {
                        metrics.record_would_block();
                    }
                    return Ok(ReadOutcome::WouldBlock);
                }
                Err(e) => {
                    error!(error = %e, "stream read failed");
                    self.record_error();
                    return Err(e.into());
                }
            }
        }

        self.pos = 0;
        let sample = decode_frame(&self.buf).inspect_err(|_| self.record_error())?;
        if let Some(metrics) = &self.metrics {
            metrics.record_frame();
        }
        Ok(ReadOutcome::Sample(sample))
    }

    fn record_error(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_error();
        }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds-checked little-endian reader over one frame
struct FrameCursor<'a> {
    buf: &'a [u8],
    len: usize,
}

impl<'a> FrameCursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            len: buf.len(),
        }
    }

    fn offset(&self) -> usize {
        self.len - self.buf.remaining()
    }

    fn u64(&mut self, field: &str) -> Result<u64> {
        let offset = self.offset();
        self.buf
            .try_get_u64_le()
            .map_err(|e| overrun(offset, field, e))
    }

    fn f64(&mut self, field: &str) -> Result<f64> {
        let offset = self.offset();
        self.buf
            .try_get_f64_le()
            .map_err(|e| overrun(offset, field, e))
    }

    fn vec<const N: usize>(&mut self, field: &str) -> Result<[f64; N]> {
        let mut out = [0.0; N];
        for v in &mut out {
            *v = self.f64(field)?;
        }
        Ok(out)
    }
}

fn overrun(offset: usize, field: &str, e: bytes::TryGetError) -> IngestionError {
    IngestionError::Decode {
        offset,
        message: format!(
            "field '{field}' needs {} bytes, {} left",
            e.requested, e.available
        ),
    }
}

/// Decode one frame in declaration order
pub fn decode_frame(frame: &[u8]) -> Result<Sample> {
    let mut cur = FrameCursor::new(frame);

    let time = cur.u64("time")?;
    let accel = cur.vec::<3>("accel")?;
    let gyro = cur.vec::<3>("gyro")?;
    let mag = cur.vec::<3>("mag")?;
    let _spare_time = cur.u64("spare_time")?;
    let temperature = cur.f64("temperature")?;
    let pressure = cur.f64("pressure")?;
    let quat = cur.vec::<4>("quat")?;

    Ok(Sample {
        time,
        accel,
        gyro,
        mag,
        temperature,
        pressure,
        quat,
    })
}

/// Encode one frame, the inverse of `decode_frame`
pub fn encode_frame(sample: &Sample, spare_time: u64) -> Bytes {
    let mut out = BytesMut::with_capacity(FRAME_SIZE);
    out.put_u64_le(sample.time);
    for v in sample.accel.iter().chain(&sample.gyro).chain(&sample.mag) {
        out.put_f64_le(*v);
    }
    out.put_u64_le(spare_time);
    out.put_f64_le(sample.temperature);
    out.put_f64_le(sample.pressure);
    for v in &sample.quat {
        out.put_f64_le(*v);
    }
    out.freeze()
}

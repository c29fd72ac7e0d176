//! # Ingestion
//!
//! Sensor sample ingestion module.
//!
//! Responsibilities:
//! - Decode fixed-size binary frames into `Sample`s, tolerating partial reads
//! - Bulk-load a whole stream, waiting on readiness for non-blocking descriptors
//! - Preprocess samples (clock offset, video window, mount orientation, pressure smoothing)
//! - Encode frames and generate synthetic recordings
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{load_all_fd, Preprocessor};
//!
//! let mut file = std::fs::File::open("ride.bin")?;
//! let raw = load_all_fd(&mut file)?;
//! let samples = Preprocessor::new(&config).process_all(raw)?;
//! ```
//!
//! ## Live Decoding
//!
//! ```ignore
//! use ingestion::{FrameDecoder, ReadOutcome};
//!
//! let mut decoder = FrameDecoder::new();
//! match decoder.decode_one(&mut stdin)? {
//!     ReadOutcome::Sample(sample) => ctx.push_sample(sample),
//!     ReadOutcome::WouldBlock => { /* wait for readiness */ }
//!     ReadOutcome::Eof => return Ok(()),
//! }
//! ```

mod config;
mod decoder;
mod error;
mod loader;
mod preprocess;
pub mod synth;

// Re-exports
pub use config::{IngestionMetrics, MetricsSnapshot};
pub use contracts::{Sample, FRAME_SIZE};
pub use decoder::{decode_frame, encode_frame, FrameDecoder, ReadOutcome};
pub use error::{IngestionError, Result};
pub use loader::{
    load_all, load_all_fd, load_all_with_metrics, PollReadiness, Readiness, YieldReadiness,
    GROW_CHUNK,
};
pub use preprocess::Preprocessor;
pub use synth::SwingSynth;

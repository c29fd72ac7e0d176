//! # Analysis
//!
//! Numerical toolkit used by the HUD strategies and the CLI.
//!
//! - Vector/quaternion helpers over `nalgebra` with tolerance-aware normalization
//! - Typed field views over arbitrary record slices
//! - AMPD peak detection, least squares, adaptive thresholding, momentum segmentation
//!
//! ## Usage Example
//!
//! ```ignore
//! use analysis::{ampd, fields, FieldView, Extremum};
//!
//! let view = FieldView::new(&samples, fields::accel)?;
//! let flags = ampd(&view, Extremum::Peak)?;
//! ```

mod ampd;
pub mod fields;
pub mod geometry;
mod lls;
mod momentum;
mod stats;
mod threshold;
mod view;

// Re-exports
pub use ampd::{ampd, Extremum};
pub use geometry::{fuzzy_is_null, FUZZY_EPSILON};
pub use lls::{lls, LineFit};
pub use momentum::pt_momentum;
pub use stats::{mean, stddev};
pub use threshold::thresholding;
pub use view::{Field, FieldView, Scalar, XyView};

pub use contracts::ContractError;

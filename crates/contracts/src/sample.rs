//! Sample - Decoder output
//!
//! One decoded IMU/barometer reading and the wire-frame layout it comes from.

use serde::{Deserialize, Serialize};

/// Size of one encoded frame on the wire, in bytes
///
/// 1 time + 9 vector doubles + 1 spare timestamp + 2 scalar doubles + 4 quaternion doubles.
pub const FRAME_SIZE: usize = 17 * 8;

/// Standard sea-level pressure (hPa)
const SEA_LEVEL_HPA: f64 = 1013.25;

/// Sensor sample
///
/// Immutable once decoded. Arrays of samples are kept sorted by `time`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Timestamp (microseconds)
    pub time: u64,

    /// Acceleration (g)
    pub accel: [f64; 3],

    /// Angular rate (deg/s)
    pub gyro: [f64; 3],

    /// Magnetic field (µT)
    pub mag: [f64; 3],

    /// Temperature (°C)
    pub temperature: f64,

    /// Pressure (hPa)
    pub pressure: f64,

    /// Orientation quaternion, scalar first (w, x, y, z)
    pub quat: [f64; 4],
}

impl Sample {
    /// Timestamp in seconds
    pub fn time_seconds(&self) -> f64 {
        self.time as f64 / 1_000_000.0
    }

    /// Magnitude of the acceleration vector (g)
    pub fn accel_magnitude(&self) -> f64 {
        norm3(&self.accel)
    }

    /// Barometric altitude above sea level (m)
    ///
    /// NOAA pressure-altitude formula, converted from feet.
    pub fn altitude(&self) -> f64 {
        145366.45 * (1.0 - (self.pressure / SEA_LEVEL_HPA).powf(0.190284)) * 0.3048
    }
}

/// Anything carrying a microsecond timestamp
///
/// Lets the time index work over raw samples and downsampled buckets alike.
pub trait Timestamped {
    fn time_us(&self) -> u64;
}

impl Timestamped for Sample {
    fn time_us(&self) -> u64 {
        self.time
    }
}

fn norm3(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size() {
        assert_eq!(FRAME_SIZE, 136);
    }

    #[test]
    fn test_altitude_at_sea_level() {
        let sample = Sample {
            pressure: SEA_LEVEL_HPA,
            ..Default::default()
        };
        assert!(sample.altitude().abs() < 1e-9);
    }

    #[test]
    fn test_altitude_decreases_with_pressure() {
        let low = Sample {
            pressure: 1000.0,
            ..Default::default()
        };
        let high = Sample {
            pressure: 900.0,
            ..Default::default()
        };
        assert!(high.altitude() > low.altitude());
        // ~110 m for 1000 hPa
        assert!((low.altitude() - 110.9).abs() < 1.0, "got {}", low.altitude());
    }

    #[test]
    fn test_accel_magnitude() {
        let sample = Sample {
            accel: [3.0, 0.0, 4.0],
            ..Default::default()
        };
        assert_eq!(sample.accel_magnitude(), 5.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let sample = Sample {
            time: 42,
            quat: [1.0, 0.0, 0.0, 0.0],
            ..Default::default()
        };
        let json = serde_json::to_string(&sample).unwrap();
        let back: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, back);
    }
}

//! Synthetic swing-ride recording
//!
//! Generates an undamped pendulum oscillation in the orientation channel with
//! matching angular rate, load factor and barometric pressure. Used to produce
//! demo data and by tests that need a known swing angle at a known time.

use std::f64::consts::TAU;
use std::io::Write;

use contracts::Sample;

use crate::decoder::encode_frame;
use crate::error::Result;

/// Pressure lapse near sea level (hPa per metre)
const HPA_PER_METRE: f64 = 0.12;

/// Synthetic pendulum parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingSynth {
    /// Sample rate (Hz)
    pub rate_hz: f64,
    /// Recording length (s)
    pub seconds: f64,
    /// Oscillation period (s)
    pub period_s: f64,
    /// Peak swing angle (degrees)
    pub amplitude_deg: f64,
    /// Pivot-to-gondola distance (m)
    pub radius_m: f64,
}

impl Default for SwingSynth {
    fn default() -> Self {
        Self {
            rate_hz: 100.0,
            seconds: 10.0,
            period_s: 10.0,
            amplitude_deg: 60.0,
            radius_m: 12.0,
        }
    }
}

impl SwingSynth {
    /// Swing angle (degrees) at `t` seconds
    pub fn angle_deg(&self, t: f64) -> f64 {
        self.amplitude_deg * (TAU * t / self.period_s).sin()
    }

    /// Number of samples generated
    pub fn len(&self) -> usize {
        (self.seconds * self.rate_hz).max(0.0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `i`
    pub fn sample(&self, i: usize) -> Sample {
        let t = i as f64 / self.rate_hz;
        let theta = self.angle_deg(t).to_radians();
        let amplitude = self.amplitude_deg.to_radians();
        let omega = self.amplitude_deg * TAU / self.period_s * (TAU * t / self.period_s).cos();
        let height = self.radius_m * (1.0 - theta.cos());

        Sample {
            time: (i as f64 * 1_000_000.0 / self.rate_hz).round() as u64,
            accel: [0.0, 0.0, 3.0 * theta.cos() - 2.0 * amplitude.cos()],
            gyro: [omega, 0.0, 0.0],
            mag: [0.0, 20.0, -40.0],
            temperature: 20.0,
            pressure: 1013.25 - HPA_PER_METRE * height,
            // rotation about the x axis
            quat: [(theta / 2.0).cos(), (theta / 2.0).sin(), 0.0, 0.0],
        }
    }

    /// All samples, time-ordered
    pub fn samples(&self) -> Vec<Sample> {
        (0..self.len()).map(|i| self.sample(i)).collect()
    }

    /// Write the recording as wire frames
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<usize> {
        let n = self.len();
        for i in 0..n {
            let sample = self.sample(i);
            out.write_all(&encode_frame(&sample, sample.time))?;
        }
        out.flush()?;
        Ok(n)
    }
}

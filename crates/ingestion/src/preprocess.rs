//! Sample preprocessing
//!
//! Applied to decoded samples before they enter the store or the live render path:
//! monotonic-time check, IMU-clock to video-clock shift, video window trimming,
//! IMU mount orientation and pressure smoothing.

use contracts::{ReplayConfig, Sample};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use tracing::debug;

use crate::error::{IngestionError, Result};

/// Stateful per-stream preprocessor
#[derive(Debug, Clone)]
pub struct Preprocessor {
    clock_offset_us: u64,
    window_start_us: u64,
    window_end_us: Option<u64>,
    /// `None` when the mount orientation is identity
    mount: Option<UnitQuaternion<f64>>,
    pressure_coeff: f64,
    pressure_prev: Option<f64>,
    last_time: Option<u64>,
    seen: usize,
}

impl Preprocessor {
    pub fn new(config: &ReplayConfig) -> Self {
        let [w, x, y, z] = config.data.imu_orientation.to_wxyz();
        let mount = UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z));
        let mount = (mount.angle() != 0.0).then_some(mount);

        Self {
            clock_offset_us: config.data.startoff.saturating_mul(1000),
            window_start_us: config.video.startoff.saturating_mul(1000),
            window_end_us: config.video.end().map(|ms| ms.saturating_mul(1000)),
            mount,
            pressure_coeff: config.data.pressure_coeff,
            pressure_prev: None,
            last_time: None,
            seen: 0,
        }
    }

    /// Process one decoded sample
    ///
    /// Returns `Ok(None)` for samples outside the video window.
    ///
    /// # Errors
    /// - The raw timestamp is earlier than the previous one
    pub fn process(&mut self, mut sample: Sample) -> Result<Option<Sample>> {
        let index = self.seen;
        self.seen += 1;

        if let Some(previous) = self.last_time {
            if sample.time < previous {
                return Err(IngestionError::TimeWentBackwards {
                    index,
                    previous,
                    time: sample.time,
                });
            }
        }
        self.last_time = Some(sample.time);

        self.smooth_pressure(&mut sample);

        sample.time = sample.time.saturating_add(self.clock_offset_us);
        if sample.time < self.window_start_us {
            return Ok(None);
        }
        if self.window_end_us.is_some_and(|end| sample.time > end) {
            return Ok(None);
        }

        if let Some(mount) = &self.mount {
            apply_mount(mount, &mut sample);
        }

        Ok(Some(sample))
    }

    /// Process a whole array, keeping only samples inside the window
    pub fn process_all(&mut self, samples: Vec<Sample>) -> Result<Vec<Sample>> {
        let total = samples.len();
        let mut kept = Vec::with_capacity(total);
        for sample in samples {
            if let Some(sample) = self.process(sample)? {
                kept.push(sample);
            }
        }
        debug!(total, kept = kept.len(), "preprocessed samples");
        Ok(kept)
    }

    fn smooth_pressure(&mut self, sample: &mut Sample) {
        let c = self.pressure_coeff;
        if c > 0.0 {
            if let Some(prev) = self.pressure_prev {
                sample.pressure = (prev * (c - 1.0) + sample.pressure) / c;
            }
        }
        self.pressure_prev = Some(sample.pressure);
    }
}

/// Rotate vectors into the mount frame and compose the orientation
fn apply_mount(mount: &UnitQuaternion<f64>, sample: &mut Sample) {
    let inv = mount.inverse();
    for v in [&mut sample.accel, &mut sample.gyro, &mut sample.mag] {
        let r = inv * Vector3::new(v[0], v[1], v[2]);
        *v = [r.x, r.y, r.z];
    }

    let [w, x, y, z] = sample.quat;
    let q = Quaternion::new(w, x, y, z) * *mount.quaternion();
    sample.quat = [q.w, q.i, q.j, q.k];
}

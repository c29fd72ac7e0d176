//! Fixed-duration bucket downsampling.
//!
//! Vector and scalar fields are averaged per bucket. The orientation is taken
//! from the sample nearest to the bucket center, since averaging quaternions
//! component-wise does not yield a rotation.

use contracts::{ContractError, Sample, Timestamped};
use serde::Serialize;
use tracing::debug;

/// One aggregation window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bucket {
    /// Bucket center (µs)
    pub time: u64,
    pub accel: [f64; 3],
    pub gyro: [f64; 3],
    pub mag: [f64; 3],
    pub temperature: f64,
    pub pressure: f64,
    /// Orientation of the sample nearest to `time`
    pub quat: [f64; 4],
    /// Samples aggregated; 0 for carried-forward or empty buckets
    pub count: usize,
}

impl Bucket {
    pub fn accel_magnitude(&self) -> f64 {
        let [x, y, z] = self.accel;
        (x * x + y * y + z * z).sqrt()
    }

    fn carry_from(prev: &Bucket, time: u64) -> Self {
        Self {
            time,
            count: 0,
            ..*prev
        }
    }
}

impl Timestamped for Bucket {
    fn time_us(&self) -> u64 {
        self.time
    }
}

#[derive(Default)]
struct Accumulator {
    accel: [f64; 3],
    gyro: [f64; 3],
    mag: [f64; 3],
    temperature: f64,
    pressure: f64,
    count: usize,
    nearest: Option<(u64, [f64; 4])>,
}

impl Accumulator {
    fn push(&mut self, sample: &Sample, center: u64) {
        for i in 0..3 {
            self.accel[i] += sample.accel[i];
            self.gyro[i] += sample.gyro[i];
            self.mag[i] += sample.mag[i];
        }
        self.temperature += sample.temperature;
        self.pressure += sample.pressure;
        self.count += 1;

        let distance = sample.time.abs_diff(center);
        if self.nearest.map_or(true, |(best, _)| distance < best) {
            self.nearest = Some((distance, sample.quat));
        }
    }

    fn finish(self, time: u64) -> Bucket {
        let n = self.count as f64;
        let avg = |v: [f64; 3]| [v[0] / n, v[1] / n, v[2] / n];
        Bucket {
            time,
            accel: avg(self.accel),
            gyro: avg(self.gyro),
            mag: avg(self.mag),
            temperature: self.temperature / n,
            pressure: self.pressure / n,
            quat: self.nearest.map(|(_, q)| q).unwrap_or_default(),
            count: self.count,
        }
    }
}

/// Aggregate `samples` into `floor(last_time / bucket_us)` buckets
///
/// Bucket `i` covers `[i*bucket_us, (i+1)*bucket_us)`; samples at or after the
/// end of the last whole bucket are not included. Empty buckets carry the
/// previous bucket forward, an empty first bucket stays zeroed.
///
/// # Errors
/// - `samples` is empty or `bucket_us` is zero
/// - The bucket array cannot be allocated
pub fn downscale(samples: &[Sample], bucket_us: u64) -> Result<Vec<Bucket>, ContractError> {
    if bucket_us == 0 {
        return Err(ContractError::invalid_argument(
            "bucket_us",
            "bucket duration must be > 0",
        ));
    }
    let Some(last) = samples.last() else {
        return Err(ContractError::invalid_argument(
            "samples",
            "cannot downscale an empty series",
        ));
    };

    let count = usize::try_from(last.time / bucket_us)
        .map_err(|_| ContractError::allocation(usize::MAX))?;
    let mut buckets: Vec<Bucket> = Vec::new();
    buckets
        .try_reserve_exact(count)
        .map_err(|_| ContractError::allocation(count))?;

    let mut rest = samples;
    for index in 0..count as u64 {
        let start = index * bucket_us;
        let end = start + bucket_us;
        let center = start + bucket_us / 2;

        let split = rest.partition_point(|s| s.time < end);
        let (inside, tail) = rest.split_at(split);
        rest = tail;

        let mut acc = Accumulator::default();
        for sample in inside.iter().filter(|s| s.time >= start) {
            acc.push(sample, center);
        }

        let bucket = if acc.count > 0 {
            acc.finish(center)
        } else if let Some(prev) = buckets.last() {
            Bucket::carry_from(prev, center)
        } else {
            Bucket {
                time: center,
                ..Default::default()
            }
        };
        buckets.push(bucket);
    }

    debug!(
        samples = samples.len(),
        buckets = buckets.len(),
        bucket_us,
        "downscaled series"
    );
    Ok(buckets)
}

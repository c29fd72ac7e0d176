//! Field accessors for `Sample`

use contracts::Sample;

pub fn accel(s: &Sample) -> &[f64] {
    &s.accel
}

pub fn gyro(s: &Sample) -> &[f64] {
    &s.gyro
}

pub fn mag(s: &Sample) -> &[f64] {
    &s.mag
}

pub fn quat(s: &Sample) -> &[f64] {
    &s.quat
}

pub fn temperature(s: &Sample) -> &[f64] {
    std::slice::from_ref(&s.temperature)
}

pub fn pressure(s: &Sample) -> &[f64] {
    std::slice::from_ref(&s.pressure)
}

/// Timestamp in microseconds
pub fn time_us(s: &Sample) -> f64 {
    s.time as f64
}

/// Timestamp in seconds
pub fn time_seconds(s: &Sample) -> f64 {
    s.time_seconds()
}

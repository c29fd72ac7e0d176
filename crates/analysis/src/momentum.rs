//! Momentum-based peak/trough segmentation
//!
//! Momentum integrates the value slope over the abscissa. While seeking, it
//! accumulates until it first exceeds the initial threshold, which fixes the
//! polarity. Afterwards it decays by `friction` every step and is pushed by
//! the slope in the current polarity; once it drops to zero the tracked
//! extreme becomes a landmark and the polarity flips. The opposite extreme is
//! then searched from the landmark onwards, since it may already have passed.
//! An extreme the series has turned away from before ending is tagged too.

use tracing::trace;

use crate::view::XyView;

enum Phase {
    Seeking { momentum: f64 },
    Executing { polarity: i8, momentum: f64, extreme: (usize, f64) },
}

/// Tag alternating peaks (`+1`) and troughs (`-1`)
pub fn pt_momentum<T>(view: &XyView<'_, T>, friction: f64, initial_min_momentum: f64) -> Vec<i8> {
    let n = view.len();
    let mut landmarks = vec![0i8; n];
    let mut phase = Phase::Seeking { momentum: 0.0 };

    for i in 1..n {
        let dx = view.x(i) - view.x(i - 1);
        let y = view.y(i);
        let step = if dx > 0.0 { y - view.y(i - 1) } else { 0.0 };

        phase = match phase {
            Phase::Seeking { momentum } => {
                let momentum = momentum + step;
                if momentum.abs() > initial_min_momentum {
                    let polarity: i8 = if momentum > 0.0 { 1 } else { -1 };
                    let extreme = extreme_since(view, 0, i, polarity);
                    Phase::Executing {
                        polarity,
                        momentum: momentum.abs(),
                        extreme,
                    }
                } else {
                    Phase::Seeking { momentum }
                }
            }
            Phase::Executing {
                polarity,
                momentum,
                mut extreme,
            } => {
                let p = f64::from(polarity);
                if p * y > p * extreme.1 {
                    extreme = (i, y);
                }
                let momentum = momentum * (1.0 - friction) + p * step;
                if momentum <= 0.0 {
                    landmarks[extreme.0] = polarity;
                    trace!(index = extreme.0, polarity, "landmark");
                    let polarity = -polarity;
                    let extreme = extreme_since(view, extreme.0, i, polarity);
                    Phase::Executing {
                        polarity,
                        momentum: f64::from(polarity) * (y - extreme.1),
                        extreme,
                    }
                } else {
                    Phase::Executing {
                        polarity,
                        momentum,
                        extreme,
                    }
                }
            }
        };
    }

    if let Phase::Executing {
        polarity, extreme, ..
    } = phase
    {
        let p = f64::from(polarity);
        if extreme.0 + 1 < n && p * extreme.1 > p * view.y(n - 1) {
            landmarks[extreme.0] = polarity;
            trace!(index = extreme.0, polarity, "trailing landmark");
        }
    }
    landmarks
}

/// Most extreme element of `start..=end` in `polarity`'s direction, first wins
fn extreme_since<T>(view: &XyView<'_, T>, start: usize, end: usize, polarity: i8) -> (usize, f64) {
    let p = f64::from(polarity);
    let mut best = (start, view.y(start));
    for j in start + 1..=end {
        let y = view.y(j);
        if p * y > p * best.1 {
            best = (j, y);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::FieldView;
    use std::f64::consts::TAU;

    struct Point {
        x: f64,
        y: f64,
    }

    fn y(p: &Point) -> &[f64] {
        std::slice::from_ref(&p.y)
    }

    fn sine_sampled(periods: usize, per_period: usize, amplitude: f64) -> Vec<Point> {
        (0..periods * per_period)
            .map(|i| Point {
                x: i as f64,
                y: amplitude * (TAU * i as f64 / per_period as f64).sin(),
            })
            .collect()
    }

    fn sine(periods: usize, amplitude: f64) -> Vec<Point> {
        sine_sampled(periods, 100, amplitude)
    }

    fn landmarks(points: &[Point]) -> Vec<(usize, i8)> {
        landmarks_with(points, 0.1, 0.5)
    }

    fn landmarks_with(points: &[Point], friction: f64, min_momentum: f64) -> Vec<(usize, i8)> {
        let view = XyView::new(|p: &Point| p.x, FieldView::new(points, y).unwrap());
        pt_momentum(&view, friction, min_momentum)
            .into_iter()
            .enumerate()
            .filter(|(_, l)| *l != 0)
            .collect()
    }

    #[test]
    fn test_sine_half_cycles() {
        let found = landmarks(&sine(3, 1.0));
        assert_eq!(
            found,
            vec![(25, 1), (75, -1), (125, 1), (175, -1), (225, 1), (275, -1)]
        );
    }

    #[test]
    fn test_amplitude_independent() {
        let found = landmarks(&sine(3, 3.0));
        assert_eq!(found.len(), 6, "one landmark per half cycle");
        assert!(found.windows(2).all(|w| w[0].1 == -w[1].1), "alternating");
    }

    #[test]
    fn test_low_friction_keeps_last_trough() {
        let found = landmarks_with(&sine_sampled(3, 50, 5.0), 0.01, 4.0);
        assert_eq!(
            found,
            vec![(12, 1), (37, -1), (62, 1), (88, -1), (112, 1), (137, -1)]
        );
    }

    #[test]
    fn test_half_cycles_across_friction_and_density() {
        for friction in [0.01, 0.1, 0.3, 0.9] {
            for per_period in [12, 37, 50, 1000] {
                for periods in [1, 3] {
                    let found = landmarks_with(&sine_sampled(periods, per_period, 5.0), friction, 4.0);
                    assert_eq!(
                        found.len(),
                        2 * periods,
                        "friction {friction}, {per_period} per period: {found:?}"
                    );
                    assert!(found.windows(2).all(|w| w[0].1 == -w[1].1));
                    assert_eq!(found[0].1, 1, "sine rises first");
                }
            }
        }
    }

    #[test]
    fn test_flat_signal_has_no_landmarks() {
        let points: Vec<Point> = (0..50).map(|i| Point { x: i as f64, y: 1.0 }).collect();
        assert!(landmarks(&points).is_empty());
    }
}

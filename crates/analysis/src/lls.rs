//! Ordinary least squares line fit.

use crate::geometry::fuzzy_is_null;
use crate::view::XyView;

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit the view's value against its abscissa
///
/// A single point, or points sharing one abscissa, give a flat line through
/// the mean value.
pub fn lls<T>(view: &XyView<'_, T>) -> LineFit {
    let n = view.len() as f64;
    let mean_x = (0..view.len()).map(|i| view.x(i)).sum::<f64>() / n;
    let mean_y = (0..view.len()).map(|i| view.y(i)).sum::<f64>() / n;

    let (mut sxx, mut sxy) = (0.0, 0.0);
    for i in 0..view.len() {
        let dx = view.x(i) - mean_x;
        sxx += dx * dx;
        sxy += dx * (view.y(i) - mean_y);
    }

    if fuzzy_is_null(sxx) {
        return LineFit {
            slope: 0.0,
            intercept: mean_y,
        };
    }
    let slope = sxy / sxx;
    LineFit {
        slope,
        intercept: mean_y - slope * mean_x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::FieldView;

    struct Point {
        x: f64,
        y: f64,
    }

    fn y(p: &Point) -> &[f64] {
        std::slice::from_ref(&p.y)
    }

    fn fit(points: &[Point]) -> LineFit {
        let view = XyView::new(|p: &Point| p.x, FieldView::new(points, y).unwrap());
        lls(&view)
    }

    #[test]
    fn test_exact_line() {
        let points: Vec<Point> = (0..20)
            .map(|i| Point {
                x: i as f64,
                y: 2.0 * i as f64 + 3.0,
            })
            .collect();
        let line = fit(&points);
        assert!((line.slope - 2.0).abs() < 1e-12, "slope: {}", line.slope);
        assert!((line.intercept - 3.0).abs() < 1e-12, "intercept: {}", line.intercept);
        assert!((line.at(100.0) - 203.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_point() {
        let line = fit(&[Point { x: 5.0, y: 7.5 }]);
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 7.5);
    }

    #[test]
    fn test_vertical_points() {
        let line = fit(&[Point { x: 1.0, y: 1.0 }, Point { x: 1.0, y: 3.0 }]);
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 2.0);
    }
}

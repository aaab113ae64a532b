//! Occlusion check for the target.
//!
//! Five hit-test samples stand in for a full-area visibility computation: the
//! center plus the four quadrant midpoints.

use crate::geometry::{Point, Rect, Size};
use crate::stage::{Hit, Probe};

const SAMPLE_FRACTIONS: [(f64, f64); 5] = [
    (0.5, 0.5),
    (0.25, 0.25),
    (0.75, 0.25),
    (0.25, 0.75),
    (0.75, 0.75),
];

/// Sample points for `rect`, each kept at least 1px inside the viewport.
pub fn sample_points(rect: Rect, viewport: Size) -> [Point; 5] {
    SAMPLE_FRACTIONS.map(|(fx, fy)| {
        let p = rect.at(fx, fy);
        Point::new(clamp_axis(p.x, viewport.width), clamp_axis(p.y, viewport.height))
    })
}

// min/max rather than f64::clamp: a viewport under 2px must not panic.
fn clamp_axis(v: f64, extent: f64) -> f64 {
    v.max(1.0).min(extent - 1.0)
}

/// True when the target is topmost at every sample point.
pub fn is_target_revealed<P: Probe + ?Sized>(probe: &P) -> bool {
    let rect = probe.target_rect();
    if rect.is_empty() {
        return false;
    }
    sample_points(rect, probe.viewport())
        .iter()
        .all(|p| probe.element_at(*p) == Hit::Target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heart::HeartId;

    /// Target box plus a list of occluded sample points.
    struct FakeProbe {
        rect: Rect,
        covered: Vec<Point>,
    }

    impl Probe for FakeProbe {
        fn viewport(&self) -> Size {
            Size::new(800.0, 600.0)
        }
        fn target_rect(&self) -> Rect {
            self.rect
        }
        fn element_at(&self, point: Point) -> Hit {
            if self.covered.contains(&point) {
                Hit::Heart(HeartId(0))
            } else if self.rect.contains(point) {
                Hit::Target
            } else {
                Hit::Other
            }
        }
    }

    #[test]
    fn zero_area_is_never_revealed() {
        let probe = FakeProbe {
            rect: Rect::new(10.0, 10.0, 0.0, 50.0),
            covered: vec![],
        };
        assert!(!is_target_revealed(&probe));
        let probe = FakeProbe {
            rect: Rect::new(10.0, 10.0, 50.0, 0.0),
            covered: vec![],
        };
        assert!(!is_target_revealed(&probe));
    }

    #[test]
    fn one_covered_sample_blocks_reveal() {
        let rect = Rect::new(100.0, 100.0, 200.0, 100.0);
        let mut probe = FakeProbe {
            rect,
            covered: vec![Point::new(250.0, 175.0)],
        };
        assert!(!is_target_revealed(&probe));
        probe.covered.clear();
        assert!(is_target_revealed(&probe));
    }

    #[test]
    fn samples_are_clamped_into_viewport() {
        let points = sample_points(Rect::new(-100.0, 560.0, 80.0, 80.0), Size::new(800.0, 600.0));
        for p in points {
            assert!(p.x >= 1.0 && p.x <= 799.0);
            assert!(p.y >= 1.0 && p.y <= 599.0);
        }
        assert_eq!(points[0], Point::new(1.0, 599.0));
    }
}

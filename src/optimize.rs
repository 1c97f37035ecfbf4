use geo::{LineString, Simplify};

/// Default tolerance in degrees. Small enough that only duplicate and
/// collinear vertices are removed.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Removes redundant vertices from resolved geometries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Optimizer {
    pub enabled: bool,
    pub epsilon: f64,
}

impl Default for Optimizer {
    fn default() -> Self {
        Optimizer {
            enabled: true,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Optimizer {
    pub fn disabled() -> Self {
        Optimizer {
            enabled: false,
            ..Default::default()
        }
    }

    /// Simplifies an open path. Both endpoints are kept exactly.
    pub fn optimize_path(&self, path: LineString<f64>) -> LineString<f64> {
        if !self.enabled || path.0.len() < 3 {
            return path;
        }
        path.simplify(&self.epsilon)
    }

    /// Simplifies a ring. The result is closed.
    pub fn optimize_ring(&self, mut ring: LineString<f64>) -> LineString<f64> {
        ring.close();
        if !self.enabled || ring.0.len() < 4 {
            return ring;
        }
        let mut optimized = ring.simplify(&self.epsilon);
        optimized.close();
        optimized
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::{Area, Polygon};

    fn ring_area(ring: &LineString<f64>) -> f64 {
        Polygon::new(ring.clone(), vec![]).unsigned_area()
    }

    #[test]
    fn collinear_vertex_is_removed_from_ring() {
        let ring: LineString<f64> =
            vec![(0., 0.), (0.5, 0.), (1., 0.), (1., 1.), (0., 1.), (0., 0.)].into();
        let optimized = Optimizer::default().optimize_ring(ring.clone());

        assert_eq!(optimized.0.len(), 5);
        assert!(optimized.is_closed());
        assert!((ring_area(&optimized) - ring_area(&ring)).abs() < 1e-12);
    }

    #[test]
    fn open_ring_gets_closed() {
        let ring: LineString<f64> = vec![(0., 0.), (1., 0.), (1., 1.)].into();
        let optimized = Optimizer::default().optimize_ring(ring);
        assert_eq!(optimized.0.len(), 4);
        assert!(optimized.is_closed());
    }

    #[test]
    fn path_keeps_endpoints() {
        let path: LineString<f64> =
            vec![(28.80, 47.0), (28.81, 47.0), (28.81, 47.0), (28.82, 47.0), (28.82, 47.01)].into();
        let optimized = Optimizer::default().optimize_path(path.clone());

        assert_eq!(optimized.0.first(), path.0.first());
        assert_eq!(optimized.0.last(), path.0.last());
        assert_eq!(optimized.0.len(), 3);
    }

    #[test]
    fn non_redundant_path_is_unchanged() {
        let path: LineString<f64> = vec![(0., 0.), (1., 1.), (2., 0.), (3., 1.)].into();
        assert_eq!(Optimizer::default().optimize_path(path.clone()), path);
    }

    #[test]
    fn disabled_optimizer_is_identity() {
        let path: LineString<f64> = vec![(0., 0.), (1., 0.), (2., 0.)].into();
        assert_eq!(Optimizer::disabled().optimize_path(path.clone()), path);
    }
}

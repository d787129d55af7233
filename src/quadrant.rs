use crate::models::LoadVector;

pub const DEFAULT_PAD_SIZE: f64 = 400.0;
const EDGE_PADDING: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadrantGeometry {
    center_x: f64,
    center_y: f64,
    max_radius: f64,
}

impl QuadrantGeometry {
    pub fn new(size: f64) -> anyhow::Result<Self> {
        anyhow::ensure!(
            size.is_finite() && size > 2.0 * EDGE_PADDING,
            "pad size must be larger than {}, got {size}",
            2.0 * EDGE_PADDING
        );
        Ok(Self {
            center_x: size / 2.0,
            center_y: size / 2.0,
            max_radius: size / 2.0 - EDGE_PADDING,
        })
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    // y grows downwards on the pad; only intensity saturates at the ring
    pub fn position_to_vector(&self, x: f64, y: f64) -> LoadVector {
        let dx = x - self.center_x;
        let dy = self.center_y - y;
        let distance = dx.hypot(dy);

        LoadVector {
            emotional: dy / self.max_radius,
            activity: dx / self.max_radius,
            intensity: (distance / self.max_radius).min(1.0),
        }
    }

    pub fn vector_to_position(&self, load: &LoadVector) -> (f64, f64) {
        let x = self.center_x + load.activity * self.max_radius;
        let y = self.center_y - load.emotional * self.max_radius;
        (x, y)
    }
}

impl Default for QuadrantGeometry {
    fn default() -> Self {
        Self {
            center_x: DEFAULT_PAD_SIZE / 2.0,
            center_y: DEFAULT_PAD_SIZE / 2.0,
            max_radius: DEFAULT_PAD_SIZE / 2.0 - EDGE_PADDING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn center_is_a_zero_vector() {
        let pad = QuadrantGeometry::default();
        let load = pad.position_to_vector(200.0, 200.0);
        assert_eq!(load, LoadVector::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn top_of_ring_is_pleasant_at_full_intensity() {
        let pad = QuadrantGeometry::default();
        assert_eq!(pad.max_radius(), 160.0);

        let load = pad.position_to_vector(200.0, 40.0);
        assert!(close(load.emotional, 1.0));
        assert!(close(load.activity, 0.0));
        assert!(close(load.intensity, 1.0));
    }

    #[test]
    fn lower_left_is_distressing_input() {
        let pad = QuadrantGeometry::default();
        let load = pad.position_to_vector(120.0, 280.0);
        assert!(close(load.emotional, -0.5));
        assert!(close(load.activity, -0.5));
        assert!(close(load.intensity, 0.5_f64.hypot(0.5)));
    }

    #[test]
    fn intensity_saturates_outside_the_ring() {
        let pad = QuadrantGeometry::default();
        let load = pad.position_to_vector(400.0, 400.0);
        assert!(close(load.intensity, 1.0));
        assert!(load.activity > 1.0);
    }

    #[test]
    fn pad_without_room_for_a_ring_is_rejected() {
        for size in [80.0, 40.0, 0.0, -400.0, f64::NAN, f64::INFINITY] {
            assert!(QuadrantGeometry::new(size).is_err());
        }
        let pad = QuadrantGeometry::new(81.0).unwrap();
        assert!(pad.max_radius() > 0.0);
        assert_eq!(QuadrantGeometry::new(DEFAULT_PAD_SIZE).unwrap(), QuadrantGeometry::default());
    }

    #[test]
    fn position_round_trips_through_vector() {
        let pad = QuadrantGeometry::new(300.0).unwrap();
        let (x, y) = (97.0, 201.5);
        let (back_x, back_y) = pad.vector_to_position(&pad.position_to_vector(x, y));
        assert!(close(x, back_x));
        assert!(close(y, back_y));
    }
}

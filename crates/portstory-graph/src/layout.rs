use portstory_core::Point;

pub trait Layouter {
    /// Positions for `count` nodes arranged around `center`.
    fn place(&self, center: Point, count: usize) -> Vec<Point>;
}

/// Places neighbors on a circle around their center node.
///
/// The first neighbor sits at the top (90°) and the rest follow clockwise in
/// equal steps of `360° / count`. Coordinates are in screen space, so the top of
/// the circle is `center.y - radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularLayouter {
    pub radius: f64,
}

impl Default for CircularLayouter {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
        }
    }
}

impl CircularLayouter {
    pub const DEFAULT_RADIUS: f64 = 250.0;

    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Angle in degrees (counter-clockwise from East) of slot `k` out of `count`.
    pub fn slot_angle(k: usize, count: usize) -> f64 {
        90.0 - k as f64 * 360.0 / count as f64
    }
}

impl Layouter for CircularLayouter {
    fn place(&self, center: Point, count: usize) -> Vec<Point> {
        (0..count)
            .map(|k| {
                let radians = Self::slot_angle(k, count).to_radians();
                Point::new(
                    center.x + self.radius * radians.cos(),
                    center.y - self.radius * radians.sin(),
                )
            })
            .collect()
    }
}

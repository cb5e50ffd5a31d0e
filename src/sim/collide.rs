//! Pointer hit-testing geometry
//!
//! Overlap tests between the primitive shapes a frontend uses to hit-test
//! clicks against parcels, lanes and bays. Shapes are an explicit tagged
//! union; each pair is normalized to a canonical tag order so every
//! combination is written exactly once.

/// A hit-testable region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// A single point (e.g. the pointer position)
    Point { x: f32, y: f32 },
    /// A circle (e.g. a destination bulb)
    Circle { x: f32, y: f32, radius: f32 },
    /// An axis-aligned rectangle (e.g. a parcel or lane)
    Rect { x: f32, y: f32, width: f32, height: f32 },
}

impl Shape {
    fn rank(&self) -> u8 {
        match self {
            Shape::Point { .. } => 0,
            Shape::Circle { .. } => 1,
            Shape::Rect { .. } => 2,
        }
    }
}

/// True when the two shapes overlap. Degenerate shapes (non-positive radius
/// or extent) overlap nothing.
pub fn overlaps(a: Shape, b: Shape) -> bool {
    let (a, b) = if a.rank() <= b.rank() { (a, b) } else { (b, a) };
    match (a, b) {
        (Shape::Point { x: ax, y: ay }, Shape::Point { x: bx, y: by }) => ax == bx && ay == by,
        (Shape::Point { x, y }, Shape::Circle { x: cx, y: cy, radius }) => {
            radius > 0.0 && (x - cx).powi(2) + (y - cy).powi(2) <= radius.powi(2)
        }
        (Shape::Point { x: px, y: py }, Shape::Rect { x, y, width, height }) => {
            width > 0.0
                && height > 0.0
                && px >= x
                && px <= x + width
                && py >= y
                && py <= y + height
        }
        (
            Shape::Circle { x: ax, y: ay, radius: ar },
            Shape::Circle { x: bx, y: by, radius: br },
        ) => ar > 0.0 && br > 0.0 && (ax - bx).powi(2) + (ay - by).powi(2) <= (ar + br).powi(2),
        (Shape::Circle { x: cx, y: cy, radius }, Shape::Rect { x, y, width, height }) => {
            circle_rect(cx, cy, radius, x, y, width, height)
        }
        (
            Shape::Rect { x: ax, y: ay, width: aw, height: ah },
            Shape::Rect { x: bx, y: by, width: bw, height: bh },
        ) => {
            aw > 0.0
                && ah > 0.0
                && bw > 0.0
                && bh > 0.0
                && ax <= bx + bw
                && bx <= ax + aw
                && ay <= by + bh
                && by <= ay + ah
        }
        // normalization above makes the mirrored pairs unreachable
        _ => false,
    }
}

fn circle_rect(cx: f32, cy: f32, radius: f32, x: f32, y: f32, width: f32, height: f32) -> bool {
    if radius <= 0.0 || width <= 0.0 || height <= 0.0 {
        return false;
    }
    let dx = ((cx - x - width / 2.0).abs() - width / 2.0).max(0.0);
    let dy = ((cy - y - height / 2.0).abs() - height / 2.0).max(0.0);
    dx * dx + dy * dy <= radius * radius
}

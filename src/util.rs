// Geometry helpers shared by enemies, projectiles and tower targeting.

pub fn distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    (dx * dx + dy * dy).sqrt()
}

/// Result of moving a point one step toward a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Approach {
    /// The target was within one step; nothing was moved.
    Arrived,
    /// The new position after a full step along the direction vector.
    Moved { x: f64, y: f64 },
}

/// Step from `(x, y)` toward `(tx, ty)` by `speed`. Arrival is reported when the
/// remaining distance is at most one step, so a zero-length vector never divides.
pub fn approach(x: f64, y: f64, tx: f64, ty: f64, speed: f64) -> Approach {
    let dist = distance(x, y, tx, ty);
    if dist <= speed {
        return Approach::Arrived;
    }
    Approach::Moved {
        x: x + (tx - x) / dist * speed,
        y: y + (ty - y) / dist * speed,
    }
}

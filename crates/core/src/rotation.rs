//! Rotation resolver - matrix rotation with a horizontal kick search
//!
//! When the rotated shape collides in place, the resolver tries horizontal
//! offsets in an oscillating pattern (net displacements +1, -1, +2, -2, ...)
//! until one fits. The vertical position is never adjusted. When the next
//! step would reach further than the shape is wide, the rotation is dropped.

use crate::shapes::Shape;
use crate::stage::Stage;

/// Try to rotate a piece at (x, y).
///
/// Returns `Some((rotated_shape, new_x))` for the first legal placement, or
/// `None` if the search gave up (the caller keeps its original shape and x).
pub fn resolve_rotation(
    stage: &Stage,
    shape: &Shape,
    x: i8,
    y: i8,
    clockwise: bool,
) -> Option<(Shape, i8)> {
    let rotated = shape.rotated(clockwise);
    let width = rotated.width() as i8;

    let mut trial_x = x;
    let mut offset: i8 = 1;
    while stage.collides(&rotated, trial_x, y, 0, 0) {
        if offset.abs() > width {
            return None;
        }
        trial_x += offset;
        offset = -(offset + offset.signum());
    }

    Some((rotated, trial_x))
}

//! Integer rasterization of disks, circles, and line segments.
//!
//! All shapes are computed in the local X/Y plane at a fixed depth and
//! returned as [`Point3`] values. Nothing here touches floating point
//! except [`hand_line`], which only uses it to pick the segment's far
//! endpoint; the segment itself is pure integer Bresenham.

use std::collections::BTreeSet;

use crate::point::Point3;

/// Convert a radius or length to a signed coordinate, saturating.
fn signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Every lattice point within `radius + 1.5` of `center`, at `center.z`.
///
/// Candidates come from the square `[-radius, radius]` on both axes around
/// the center, and a candidate `(x, y)` is kept when
/// `sqrt(x^2 + y^2) < radius + 1.5`. The half-voxel tolerance over-includes
/// boundary cells on purpose so a clear over this disk leaves no remnants
/// of anything drawn inside the face. The test runs in exact integer form,
/// `4 * (x^2 + y^2) < (2 * radius + 3)^2`.
pub fn filled_disk(center: Point3, radius: u32) -> BTreeSet<Point3> {
    let r = signed(radius);
    let reach = i64::from(r).saturating_mul(2).saturating_add(3);
    let limit = reach.saturating_mul(reach);

    let mut points = BTreeSet::new();
    for x in r.saturating_neg()..=r {
        for y in r.saturating_neg()..=r {
            let (dx, dy) = (i64::from(x), i64::from(y));
            let dist_sq = dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy));
            if dist_sq.saturating_mul(4) < limit {
                points.insert(Point3::new(
                    center.x.saturating_add(x),
                    center.y.saturating_add(y),
                    center.z,
                ));
            }
        }
    }
    points
}

/// Midpoint-circle outline around `center`, at `center.z`.
///
/// Walks one octant with decision variable `d = (5 - 4r) / 4`, stepping
/// `x` up from 0 while `x <= y` and stepping `y` down whenever `d >= 0`.
/// Every step emits its eight mirror images, so the result may contain
/// duplicates on the diagonals and axes and is not ordered by angle.
/// Treat it as a point set.
pub fn circle_outline(center: Point3, radius: u32) -> Vec<Point3> {
    let r = signed(radius);
    let mut d = 5_i32.saturating_sub(r.saturating_mul(4)) / 4;
    let mut x: i32 = 0;
    let mut y: i32 = r;
    let mut points = Vec::new();

    loop {
        points.extend(octants(center, x, y));
        if d < 0 {
            d = d.saturating_add(x.saturating_mul(2).saturating_add(1));
        } else {
            d = d.saturating_add(x.saturating_sub(y).saturating_mul(2).saturating_add(1));
            y = y.saturating_sub(1);
        }
        x = x.saturating_add(1);
        if x > y {
            break;
        }
    }
    points
}

/// The eight symmetric images of `(x, y)` around `center`.
fn octants(center: Point3, x: i32, y: i32) -> [Point3; 8] {
    let at = |dx: i32, dy: i32| {
        Point3::new(center.x.saturating_add(dx), center.y.saturating_add(dy), center.z)
    };
    [
        at(x, y),
        at(x, y.saturating_neg()),
        at(x.saturating_neg(), y),
        at(x.saturating_neg(), y.saturating_neg()),
        at(y, x),
        at(y, x.saturating_neg()),
        at(y.saturating_neg(), x),
        at(y.saturating_neg(), x.saturating_neg()),
    ]
}

/// Bresenham segment from `(x0, y0)` to `(x1, y1)` at depth `z`.
///
/// The dominant axis is X when `|dx| > |dy|` and Y otherwise. Exactly one
/// point is emitted per step along the dominant axis and both endpoints
/// are included, so the result has `max(|dx|, |dy|) + 1` points and
/// consecutive points are 8-connected.
pub fn line_points(x0: i32, y0: i32, z: i32, x1: i32, y1: i32) -> Vec<Point3> {
    let dx = x1.saturating_sub(x0).saturating_abs();
    let dy = y1.saturating_sub(y0).saturating_abs();
    let sx = x1.saturating_sub(x0).signum();
    let sy = y1.saturating_sub(y0).signum();

    let steps = usize::try_from(dx.max(dy)).unwrap_or(0);
    let mut points = Vec::with_capacity(steps.saturating_add(1));
    let (mut x, mut y) = (x0, y0);

    // The error term is kept doubled so the half-step start stays integral.
    if dx > dy {
        let mut error = dx;
        while x != x1 {
            points.push(Point3::new(x, y, z));
            error = error.saturating_sub(dy.saturating_mul(2));
            if error < 0 {
                y = y.saturating_add(sy);
                error = error.saturating_add(dx.saturating_mul(2));
            }
            x = x.saturating_add(sx);
        }
    } else {
        let mut error = dy;
        while y != y1 {
            points.push(Point3::new(x, y, z));
            error = error.saturating_sub(dx.saturating_mul(2));
            if error < 0 {
                x = x.saturating_add(sx);
                error = error.saturating_add(dy.saturating_mul(2));
            }
            y = y.saturating_add(sy);
        }
    }
    points.push(Point3::new(x, y, z));
    points
}

/// A clock hand: a segment from `origin` toward `angle` radians, `length`
/// voxels long.
///
/// The far endpoint is `(floor(cos(angle) * length), floor(sin(angle) * length))`
/// relative to the origin. Angles run counter-clockwise from local +X.
pub fn hand_line(origin: Point3, angle: f64, length: u32) -> Vec<Point3> {
    let reach = f64::from(length);
    #[allow(clippy::cast_possible_truncation)]
    let end_dx = (angle.cos() * reach).floor() as i32;
    #[allow(clippy::cast_possible_truncation)]
    let end_dy = (angle.sin() * reach).floor() as i32;
    line_points(
        origin.x,
        origin.y,
        origin.z,
        origin.x.saturating_add(end_dx),
        origin.y.saturating_add(end_dy),
    )
}

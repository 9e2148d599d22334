//! Douglas-Peucker reduction for closed outlines.
//!
//! The loop is cut at two far-apart anchors and each arc is refined with an
//! explicit work stack. Kept vertices are marked in place, so the output
//! preserves the input's vertex order.

use crate::models::{Point, Polygon};

/// Simplify a closed loop, keeping vertices further than `tolerance` from
/// the reduced outline. Non-positive tolerances return the loop unchanged.
///
/// The result may have fewer than 3 vertices when the whole loop fits
/// inside the tolerance band; callers decide what to do with those.
pub fn douglas_peucker(polygon: &[Point], tolerance: f32) -> Polygon {
    let n = polygon.len();
    if n <= 3 || tolerance <= 0.0 {
        return polygon.to_vec();
    }

    let (a, b) = anchors(polygon);
    if a == b {
        return polygon.to_vec();
    }

    let limit = tolerance as f64 * tolerance as f64;
    let mut keep = vec![false; n];
    keep[a] = true;
    keep[b] = true;

    // Arcs run forward from the first index to the last, wrapping at n.
    let mut arcs = vec![(a, b), (b, a)];
    while let Some((first, last)) = arcs.pop() {
        let span = (last + n - first) % n;
        let mut split = None;
        let mut max_dist_sq = 0.0f64;
        for step in 1..span {
            let i = (first + step) % n;
            let d = distance_to_chord_squared(polygon[i], polygon[first], polygon[last]);
            if d > max_dist_sq {
                max_dist_sq = d;
                split = Some(i);
            }
        }
        if let Some(i) = split.filter(|_| max_dist_sq > limit) {
            keep[i] = true;
            arcs.push((first, i));
            arcs.push((i, last));
        }
    }

    polygon
        .iter()
        .zip(&keep)
        .filter_map(|(&p, &kept)| kept.then_some(p))
        .collect()
}

/// Two vertices far apart on the loop, found in two linear sweeps: the
/// vertex furthest from vertex 0, then the vertex furthest from that one.
fn anchors(polygon: &[Point]) -> (usize, usize) {
    let a = furthest_from(polygon, 0);
    (a, furthest_from(polygon, a))
}

fn furthest_from(polygon: &[Point], from: usize) -> usize {
    let origin = polygon[from];
    let mut best = from;
    let mut best_dist = 0i64;
    for (i, p) in polygon.iter().enumerate() {
        let d = origin.distance_squared(p);
        if d > best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn distance_to_chord_squared(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let (px, py) = ((p.x - a.x) as f64, (p.y - a.y) as f64);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return px * px + py * py;
    }
    let cross = px * dy - py * dx;
    cross * cross / len_sq
}

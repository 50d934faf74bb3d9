// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Pure helpers over flat vertex sequences (alternating x,y coordinates):
//! bounding boxes, midpoint insertion, rectangle containment, chunking and
//! the polygon self-intersection check.

/// Bounding box of a flat vertex sequence, as `[xmin, ymin, xmax, ymax]`.
///
/// Coordinates are assumed normalized to [0, 1]: the fold starts from the
/// sentinel box `[1.0, 1.0, 0.0, 0.0]` and widens on each sample, so an
/// empty input returns the sentinel. A result with `xmin > xmax` means
/// "no extent".
pub fn bounds(vertices: &[f64]) -> [f64; 4] {
    let mut x_min = 1.0;
    let mut y_min = 1.0;
    let mut x_max = 0.0;
    let mut y_max = 0.0;
    for (idx, &c) in vertices.iter().enumerate() {
        if idx % 2 == 0 {
            if c < x_min {
                x_min = c;
            }
            if c > x_max {
                x_max = c;
            }
        } else {
            if c < y_min {
                y_min = c;
            }
            if c > y_max {
                y_max = c;
            }
        }
    }
    [x_min, y_min, x_max, y_max]
}

/// Insert the midpoint of the edge starting at point `idx` into a flat
/// vertex sequence.
///
/// The midpoint of points `idx` and `(idx + 1) % n` (n = point count) is
/// inserted at position `(idx + 1) % n`, so inserting on the closing edge
/// of a polygon places the new point at the front. All other points keep
/// their relative order. Inputs with fewer than two points are returned
/// unchanged.
pub fn insert_mid_node(vertices: &[f64], idx: usize) -> Vec<f64> {
    let n = vertices.len() / 2;
    if n < 2 || idx >= n {
        return vertices.to_vec();
    }
    let mid_idx = (idx + 1) % n;
    let mx = 0.5 * (vertices[2 * idx] + vertices[2 * mid_idx]);
    let my = 0.5 * (vertices[2 * idx + 1] + vertices[2 * mid_idx + 1]);
    let mut out = Vec::with_capacity(vertices.len() + 2);
    out.extend_from_slice(&vertices[..mid_idx * 2]);
    out.push(mx);
    out.push(my);
    out.extend_from_slice(&vertices[mid_idx * 2..]);
    out
}

/// Check if the bounding box `g` is strictly included in `s`.
///
/// Both boxes are `[xmin, ymin, xmax, ymax]`. All four inequalities are
/// strict: a box touching an edge of `s` is not included.
pub fn is_included_rect(g: &[f64; 4], s: &[f64; 4]) -> bool {
    g[0] > s[0] && g[2] < s[2] && g[1] > s[1] && g[3] < s[3]
}

/// Group a flat sequence into fixed-size chunks.
///
/// The last chunk is short only when the input length is not a multiple of
/// `chunk_size`; for coordinate pairs it is always exact.
pub fn chunk(arr: &[f64], chunk_size: usize) -> Vec<Vec<f64>> {
    arr.chunks(chunk_size).map(|c| c.to_vec()).collect()
}

/// Check whether the segment (a,b)->(c,d) properly crosses (p,q)->(r,s).
///
/// Standard 2x2 determinant method. A zero determinant (parallel or
/// collinear segments) counts as non-intersecting, and endpoint touching is
/// excluded: both interpolation parameters must lie strictly in (0, 1).
#[allow(clippy::too_many_arguments)]
pub fn segments_intersect(
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    p: f64,
    q: f64,
    r: f64,
    s: f64,
) -> bool {
    let det = (c - a) * (s - q) - (r - p) * (d - b);
    if det == 0.0 {
        false
    } else {
        let lambda = ((s - q) * (r - a) + (p - r) * (s - b)) / det;
        let gamma = ((b - d) * (r - a) + (c - a) * (s - b)) / det;
        (0.0 < lambda && lambda < 1.0) && (0.0 < gamma && gamma < 1.0)
    }
}

/// Check that a closed polygon does not self-intersect.
///
/// Treats the flat vertex sequence as a cycle of edges and tests every pair
/// of non-adjacent edges for a proper crossing (edges sharing an endpoint,
/// including the wraparound pair, are skipped). Returns `false` on the
/// first crossing found. O(n^2) in the point count, which is fine for
/// interactive editing.
pub fn is_valid(vertices: &[f64]) -> bool {
    let points = chunk(vertices, 2);
    let n = points.len();
    for idx in 0..n {
        let next_idx = (idx + 1) % n;
        for idx2 in 0..n {
            if idx2 == idx {
                continue;
            }
            let next_idx2 = (idx2 + 1) % n;
            if idx2 == next_idx || next_idx2 == idx {
                continue;
            }
            if segments_intersect(
                points[idx][0],
                points[idx][1],
                points[next_idx][0],
                points[next_idx][1],
                points[idx2][0],
                points[idx2][1],
                points[next_idx2][0],
                points[next_idx2][1],
            ) {
                return false;
            }
        }
    }
    true
}

//! Triangulation boundary: room centers in, index triads out.

/// A room center handed to the triangulator, in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Three indices into the point slice a triangulation was computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triad {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Triad {
    pub fn corners(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

/// Planar triangulation collaborator. The generator hands every room center
/// over, index order matching room order, and turns the returned triads into
/// graph edges. Corners must be in-range and pairwise distinct; the graph
/// build rejects anything else.
pub trait Triangulator {
    fn triangulate(&self, points: &[Point]) -> Vec<Triad>;
}

/// Definition-based Delaunay: a triple is emitted iff its corners are not
/// collinear and no other point lies strictly inside its circumcircle.
/// Quartic in point count, which is fine at room-layout sizes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DelaunayTriangulator;

impl Triangulator for DelaunayTriangulator {
    fn triangulate(&self, points: &[Point]) -> Vec<Triad> {
        let mut triads = Vec::new();
        for a in 0..points.len() {
            for b in (a + 1)..points.len() {
                for c in (b + 1)..points.len() {
                    if is_delaunay_triangle(points, a, b, c) {
                        triads.push(Triad { a, b, c });
                    }
                }
            }
        }
        triads
    }
}

/// Degenerate triangles thinner than this signed area are dropped.
const FLATNESS_EPS: f64 = 1e-9;
/// Slack on the in-circle test so cocircular points do not flip on rounding.
const IN_CIRCLE_EPS: f64 = 1e-9;

fn is_delaunay_triangle(points: &[Point], a: usize, b: usize, c: usize) -> bool {
    let orient = orientation(points[a], points[b], points[c]);
    if orient.abs() <= FLATNESS_EPS {
        return false;
    }
    (0..points.len())
        .filter(|&other| other != a && other != b && other != c)
        .all(|other| {
            !strictly_in_circumcircle(points[a], points[b], points[c], orient, points[other])
        })
}

/// Twice the signed area of the triangle; positive when counterclockwise.
fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// In-circle determinant, sign-normalized by the triangle's orientation.
fn strictly_in_circumcircle(a: Point, b: Point, c: Point, orient: f64, probe: Point) -> bool {
    let ax = a.x - probe.x;
    let ay = a.y - probe.y;
    let bx = b.x - probe.x;
    let by = b.y - probe.y;
    let cx = c.x - probe.x;
    let cy = c.y - probe.y;
    let det = (ax * ax + ay * ay) * (bx * cy - by * cx)
        - (bx * bx + by * by) * (ax * cy - ay * cx)
        + (cx * cx + cy * cy) * (ax * by - ay * bx);
    let signed = if orient > 0.0 { det } else { -det };
    signed > IN_CIRCLE_EPS
}

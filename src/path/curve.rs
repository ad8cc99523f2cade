use std::f64::consts::PI;

use tracing::trace;

use super::convert::{absolute, normalized};
use super::{PathArray, PathSource, Segment};
use crate::errors::Result;

/// Point at parameter `t` on the cubic Bezier `p0, c1, c2, p3`.
pub(crate) fn cubic_point(
    p0: (f64, f64),
    c1: (f64, f64),
    c2: (f64, f64),
    p3: (f64, f64),
    t: f64,
) -> (f64, f64) {
    fn cubic(t: f64, p0: f64, p1: f64, p2: f64, p3: f64) -> f64 {
        let mt = 1. - t;
        mt.powi(3) * p0 + mt * mt * 3. * t * p1 + mt * 3. * t * t * p2 + t.powi(3) * p3
    }
    (
        cubic(t, p0.0, c1.0, c2.0, p3.0),
        cubic(t, p0.1, c1.1, c2.1, p3.1),
    )
}

fn mid_point(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    (a.0 + (b.0 - a.0) * 0.5, a.1 + (b.1 - a.1) * 0.5)
}

fn rotate(p: (f64, f64), rad: f64) -> (f64, f64) {
    let (sin, cos) = rad.sin_cos();
    (p.0 * cos - p.1 * sin, p.0 * sin + p.1 * cos)
}

/// Elevate a straight line to a cubic.
///
/// Control points come from repeated midpoint subdivision rather than
/// thirds of the chord; length and point-at-length results depend on
/// this exact parameterization.
pub fn line_to_cubic(start: (f64, f64), end: (f64, f64)) -> [f64; 6] {
    let p0 = start;
    let p1 = end;
    let p2 = mid_point(p0, p1);
    let p3 = mid_point(p1, p2);
    let p4 = mid_point(p2, p3);
    let p5 = mid_point(p3, p4);
    let p6 = mid_point(p4, p5);
    let cp1 = cubic_point(p0, p2, p4, p6, 0.5);
    let cp2 = cubic_point(p6, p5, p3, p1, 0.);
    [cp1.0, cp1.1, cp2.0, cp2.1, end.0, end.1]
}

/// Standard degree elevation of a quadratic Bezier.
pub fn quad_to_cubic(start: (f64, f64), cp: (f64, f64), end: (f64, f64)) -> [f64; 6] {
    let r13 = 1. / 3.;
    let r23 = 2. / 3.;
    [
        r13 * start.0 + r23 * cp.0,
        r13 * start.1 + r23 * cp.1,
        r13 * end.0 + r23 * cp.0,
        r13 * end.1 + r23 * cp.1,
        end.0,
        end.1,
    ]
}

/// Convert an elliptical arc to one or more cubic segments.
///
/// Each returned entry is the `[x1, y1, x2, y2, x, y]` parameter list of
/// a `C` command; consecutive entries share end/start points and no
/// entry spans more than 120 degrees of the ellipse.
pub fn arc_to_cubic(
    start: (f64, f64),
    rx: f64,
    ry: f64,
    angle: f64,
    large_arc: bool,
    sweep: bool,
    end: (f64, f64),
) -> Vec<[f64; 6]> {
    // "If rx = 0 or ry = 0 then this arc is treated as a straight line segment"
    if rx == 0. || ry == 0. {
        return vec![line_to_cubic(start, end)];
    }
    // "If the endpoints are identical, then this is equivalent to omitting the arc"
    if start == end {
        return vec![[start.0, start.1, start.0, start.1, end.0, end.1]];
    }

    let d120 = PI * 120. / 180.;
    let rad = angle.to_radians();
    let (mut rx, mut ry) = (rx.abs(), ry.abs());

    let (x1, y1) = rotate(start, -rad);
    let (x2, y2) = rotate(end, -rad);

    let x = (x1 - x2) / 2.;
    let y = (y1 - y2) / 2.;
    let h = (x * x) / (rx * rx) + (y * y) / (ry * ry);
    if h > 1. {
        let h = h.sqrt();
        rx *= h;
        ry *= h;
    }
    let rx2 = rx * rx;
    let ry2 = ry * ry;

    let sign = if large_arc == sweep { -1. } else { 1. };
    let k = sign * ((rx2 * ry2 - rx2 * y * y - ry2 * x * x) / (rx2 * y * y + ry2 * x * x))
        .abs()
        .sqrt();
    let cx = (k * rx * y) / ry + (x1 + x2) / 2.;
    let cy = (k * -ry * x) / rx + (y1 + y2) / 2.;

    fn start_angle(px: f64, py: f64, cx: f64, cy: f64, ry: f64) -> f64 {
        let f = ((py - cy) / ry).clamp(-1., 1.).asin();
        let f = (f * 1e9).trunc() / 1e9;
        let f = if px < cx { PI - f } else { f };
        if f < 0. {
            PI * 2. + f
        } else {
            f
        }
    }
    let mut f1 = start_angle(x1, y1, cx, cy, ry);
    let mut f2 = start_angle(x2, y2, cx, cy, ry);
    if sweep && f1 > f2 {
        f1 -= PI * 2.;
    }
    if !sweep && f2 > f1 {
        f2 -= PI * 2.;
    }

    let mut pieces = Vec::new();
    let (mut px, mut py) = (x1, y1);
    let mut a1 = f1;
    loop {
        let last = (f2 - a1).abs() <= d120 || (f2 - a1).is_nan();
        let (a2, ex, ey) = if last {
            (f2, x2, y2)
        } else {
            let a2 = a1 + d120 * if sweep && f2 > a1 { 1. } else { -1. };
            (a2, cx + rx * a2.cos(), cy + ry * a2.sin())
        };
        let t = ((a2 - a1) / 4.).tan();
        let hx = 4. / 3. * rx * t;
        let hy = 4. / 3. * ry * t;
        let m2 = (px - hx * a1.sin(), py + hy * a1.cos());
        let m3 = (ex + hx * a2.sin(), ey - hy * a2.cos());
        pieces.push([m2, m3, (ex, ey)]);
        if last {
            break;
        }
        (px, py, a1) = (ex, ey, a2);
    }
    if pieces.len() > 1 {
        trace!("arc split into {} cubic segments", pieces.len());
    }

    pieces
        .into_iter()
        .map(|[c1, c2, e]| {
            let (c1, c2, e) = (rotate(c1, rad), rotate(c2, rad), rotate(e, rad));
            [c1.0, c1.1, c2.0, c2.1, e.0, e.1]
        })
        .collect()
}

pub(crate) fn curve(path: &PathArray) -> PathArray {
    if path.is_curve() {
        return path.clone();
    }

    let mut result = PathArray::default();
    let mut current = (0., 0.);
    let mut subpath_start = (0., 0.);

    for seg in normalized(&absolute(path)) {
        let p = &seg.params;
        match seg.cmd {
            'M' => {
                current = (p[0], p[1]);
                subpath_start = current;
                result.push(seg);
                continue;
            }
            'A' => {
                for piece in arc_to_cubic(
                    current,
                    p[0],
                    p[1],
                    p[2],
                    p[3] != 0.,
                    p[4] != 0.,
                    (p[5], p[6]),
                ) {
                    result.push(Segment::raw('C', &piece));
                }
            }
            'Q' => {
                let c = quad_to_cubic(current, (p[0], p[1]), (p[2], p[3]));
                result.push(Segment::raw('C', &c));
            }
            'L' => {
                let c = line_to_cubic(current, (p[0], p[1]));
                result.push(Segment::raw('C', &c));
            }
            'Z' => {
                let c = line_to_cubic(current, subpath_start);
                result.push(Segment::raw('C', &c));
            }
            _ => result.push(seg.clone()),
        }
        current = match seg.cmd {
            'Z' => subpath_start,
            _ => seg.end_point().unwrap_or(current),
        };
    }
    result
}

/// Convert every segment after a moveto to a cubic `C` command.
pub fn to_curve<P: PathSource + ?Sized>(path: &P) -> Result<PathArray> {
    Ok(curve(&path.to_path_array()?))
}

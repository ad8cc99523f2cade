use crate::errors::Result;
use crate::path::{cubic_point, curve, PathArray, PathSource};

// 12-point Gauss-Legendre abscissae and weights on [-1, 1]
const GAUSS_T: [f64; 12] = [
    -0.125_233_408_511_468_9,
    0.125_233_408_511_468_9,
    -0.367_831_498_998_180_2,
    0.367_831_498_998_180_2,
    -0.587_317_954_286_617_4,
    0.587_317_954_286_617_4,
    -0.769_902_674_194_304_7,
    0.769_902_674_194_304_7,
    -0.904_117_256_370_474_9,
    0.904_117_256_370_474_9,
    -0.981_560_634_246_719_3,
    0.981_560_634_246_719_3,
];

const GAUSS_C: [f64; 12] = [
    0.249_147_045_813_402_8,
    0.249_147_045_813_402_8,
    0.233_492_536_538_354_8,
    0.233_492_536_538_354_8,
    0.203_167_426_723_065_9,
    0.203_167_426_723_065_9,
    0.160_078_328_543_346_2,
    0.160_078_328_543_346_2,
    0.106_939_325_995_318_4,
    0.106_939_325_995_318_4,
    0.047_175_336_386_511_8,
    0.047_175_336_386_511_8,
];

type Point = (f64, f64);

/// Derivative of a one-dimensional cubic Bezier at `t`.
fn base3(t: f64, p1: f64, p2: f64, p3: f64, p4: f64) -> f64 {
    let t1 = -3. * p1 + 9. * p2 - 9. * p3 + 3. * p4;
    let t2 = t * t1 + 6. * p1 - 12. * p2 + 6. * p3;
    t * t2 - 3. * p1 + 3. * p2
}

/// Arc length of a cubic segment by Gauss-Legendre quadrature.
pub fn cubic_length(start: Point, cp1: Point, cp2: Point, end: Point) -> f64 {
    let half = 0.5;
    let sum: f64 = GAUSS_T
        .iter()
        .zip(GAUSS_C)
        .map(|(t, c)| {
            let ct = half * t + half;
            let xb = base3(ct, start.0, cp1.0, cp2.0, end.0);
            let yb = base3(ct, start.1, cp1.1, cp2.1, end.1);
            c * xb.hypot(yb)
        })
        .sum();
    half * sum
}

/// Signed area between a cubic segment and the origin.
fn cubic_area(start: Point, cp1: Point, cp2: Point, end: Point) -> f64 {
    let (x0, y0) = start;
    let (x1, y1) = cp1;
    let (x2, y2) = cp2;
    let (x3, y3) = end;
    3. * ((y3 - y0) * (x1 + x2) - (x3 - x0) * (y1 + y2) + y1 * (x0 - x2) - x1 * (y0 - y2)
        + y3 * (x2 + x0 / 3.)
        - x3 * (y2 + y0 / 3.))
        / 20.
}

/// Every cubic of the all-cubic form of `path` as `[start, cp1, cp2, end]`.
fn cubics(path: &PathArray) -> Vec<[Point; 4]> {
    let mut current = (0., 0.);
    let mut result = Vec::new();
    for seg in curve(path).iter() {
        let p = &seg.params;
        match seg.cmd {
            'M' => current = (p[0], p[1]),
            'C' => {
                let end = (p[4], p[5]);
                result.push([current, (p[0], p[1]), (p[2], p[3]), end]);
                current = end;
            }
            _ => {}
        }
    }
    result
}

/// Signed area enclosed by a path.
///
/// Positive when the path is drawn clockwise in SVG's y-down coordinates.
pub fn path_area<P: PathSource + ?Sized>(path: &P) -> Result<f64> {
    Ok(cubics(&path.to_path_array()?)
        .into_iter()
        .map(|[s, c1, c2, e]| cubic_area(s, c1, c2, e))
        .sum())
}

/// True if the path is drawn clockwise (non-negative area).
pub fn draw_direction<P: PathSource + ?Sized>(path: &P) -> Result<bool> {
    Ok(path_area(path)? >= 0.)
}

pub fn path_length<P: PathSource + ?Sized>(path: &P) -> Result<f64> {
    Ok(cubics(&path.to_path_array()?)
        .into_iter()
        .map(|[s, c1, c2, e]| cubic_length(s, c1, c2, e))
        .sum())
}

/// Point at the given distance along the path.
///
/// Within a segment the curve parameter is taken as the linear fraction
/// of that segment's length, so the result approximates true arc-length
/// position. Distances outside the path clamp to its first / last point.
pub fn point_at_length<P: PathSource + ?Sized>(path: &P, length: f64) -> Result<(f64, f64)> {
    let path = path.to_path_array()?;
    let start = path
        .segments()
        .first()
        .and_then(|s| s.end_point())
        .unwrap_or_default();
    if length <= 0. {
        return Ok(start);
    }

    let mut total = 0.;
    let mut last = start;
    for [s, c1, c2, e] in cubics(&path) {
        let seg_len = cubic_length(s, c1, c2, e);
        total += seg_len;
        if length > total - seg_len && length <= total {
            let t = 1. - (total - length) / seg_len;
            return Ok(cubic_point(s, c1, c2, e, t));
        }
        last = e;
    }
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::assert_in_delta;

    #[test]
    fn test_gauss_weights() {
        assert_in_delta!(GAUSS_C.iter().sum::<f64>(), 2., 1e-12);
        assert_in_delta!(GAUSS_T.iter().sum::<f64>(), 0., 1e-12);
    }

    #[test]
    fn test_path_length() {
        assert_in_delta!(path_length("M0,0 L10,0").unwrap(), 10., 1e-9);
        assert_in_delta!(path_length("M0 0L3 4").unwrap(), 5., 1e-9);
        assert_in_delta!(path_length("M0 0H10V10H0Z").unwrap(), 40., 1e-9);
        // moves don't add length
        assert_in_delta!(path_length("M0 0L10 0M100 100L110 100").unwrap(), 20., 1e-9);

        let circle = path_length("M0 10A10 10 0 1 0 20 10A10 10 0 1 0 0 10").unwrap();
        assert_in_delta!(circle, 20. * std::f64::consts::PI, 0.1);
    }

    #[test]
    fn test_path_area() {
        // clockwise on screen is positive
        assert_in_delta!(path_area("M0 0L10 0L10 10L0 10Z").unwrap(), 100., 1e-9);
        assert_in_delta!(path_area("M0 0L0 10L10 10L10 0Z").unwrap(), -100., 1e-9);
        assert!(draw_direction("M0 0L10 0L10 10L0 10Z").unwrap());
        assert!(!draw_direction("M0 0L0 10L10 10L10 0Z").unwrap());

        // area doesn't depend on where the shape sits
        assert_in_delta!(path_area("M50 50h10v10h-10z").unwrap(), 100., 1e-9);
    }

    #[test]
    fn test_point_at_length() {
        let pd = "M0 0L10 0L10 10";
        assert_eq!(point_at_length(pd, 0.).unwrap(), (0., 0.));
        assert_eq!(point_at_length(pd, -5.).unwrap(), (0., 0.));
        assert_eq!(point_at_length(pd, 500.).unwrap(), (10., 10.));
        for (len, exp) in [(10., (10., 0.)), (20., (10., 10.))] {
            let (x, y) = point_at_length(pd, len).unwrap();
            assert_in_delta!(x, exp.0, 1e-9);
            assert_in_delta!(y, exp.1, 1e-9);
        }

        // the in-segment parameter is the linear length fraction
        let (x, y) = point_at_length(pd, 5.).unwrap();
        assert_in_delta!(x, 5.6005859375, 1e-9);
        assert_eq!(y, 0.);
        let (x, y) = point_at_length(pd, 15.).unwrap();
        assert_in_delta!(x, 10., 1e-9);
        assert_in_delta!(y, 5.6005859375, 1e-9);
    }
}

use crate::errors::Result;
use crate::path::{cubic_point, curve, PathArray, PathSource};

/// Corners of the box covering every point seen so far.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    min: (f64, f64),
    max: (f64, f64),
}

impl Extent {
    fn at(point: (f64, f64)) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    fn cover(self, (x, y): (f64, f64)) -> Self {
        Self {
            min: (self.min.0.min(x), self.min.1.min(y)),
            max: (self.max.0.max(x), self.max.1.max(y)),
        }
    }

    fn bbox(self) -> PathBBox {
        let (width, height) = (self.max.0 - self.min.0, self.max.1 - self.min.1);
        PathBBox {
            x: self.min.0,
            y: self.min.1,
            width,
            height,
            x2: self.max.0,
            y2: self.max.1,
            cx: self.min.0 + width / 2.,
            cy: self.min.1 + height / 2.,
        }
    }
}

/// Bounding box of a path in the form callers usually want it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde_derive::Serialize))]
pub struct PathBBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub x2: f64,
    pub y2: f64,
    pub cx: f64,
    pub cy: f64,
}

/// Parameters in (0, 1) where one axis of a cubic has a turning point.
///
/// Roots of `a t^2 + b t + c` are taken in the cancellation-free form
/// `q / a`, `c / q`, so near-linear derivatives (elevated lines and
/// quadratics) still find their root. Enormous roots, including those from
/// dividing by zero, become the midpoint, which is always on the curve.
fn stationary_ts(p0: f64, c1: f64, c2: f64, p3: f64) -> Vec<f64> {
    let a = (c2 - 2. * c1 + p0) - (p3 - 2. * c2 + c1);
    let b = 2. * (c1 - p0) - 2. * (c2 - c1);
    let c = p0 - c1;
    let disc = (b * b - 4. * a * c).sqrt();
    let q = -0.5 * (b + b.signum() * disc);
    [q / a, c / q]
        .into_iter()
        .map(|t| if t.abs() > 1e12 { 0.5 } else { t })
        .filter(|t| *t > 0. && *t < 1.)
        .collect()
}

/// Turning points of a cubic on either axis, followed by its end point.
fn cubic_extremes(
    start: (f64, f64),
    cp1: (f64, f64),
    cp2: (f64, f64),
    end: (f64, f64),
) -> impl Iterator<Item = (f64, f64)> {
    let mut ts = stationary_ts(start.0, cp1.0, cp2.0, end.0);
    ts.extend(stationary_ts(start.1, cp1.1, cp2.1, end.1));
    ts.into_iter()
        .map(move |t| cubic_point(start, cp1, cp2, end, t))
        .chain([end])
}

/// Bounding box of a single cubic segment, including its end points.
pub fn cubic_bbox(start: (f64, f64), cp1: (f64, f64), cp2: (f64, f64), end: (f64, f64)) -> PathBBox {
    cubic_extremes(start, cp1, cp2, end)
        .fold(Extent::at(start), Extent::cover)
        .bbox()
}

/// Box of an already-validated path, or `None` when it has no points.
pub(crate) fn bbox_of(path: &PathArray) -> Option<PathBBox> {
    let mut extent: Option<Extent> = None;
    let mut include = |pt| {
        extent = Some(extent.map_or(Extent::at(pt), |e| e.cover(pt)));
    };
    let mut current = (0., 0.);
    for seg in curve(path).iter() {
        let p = &seg.params;
        match seg.cmd {
            'M' => {
                current = (p[0], p[1]);
                include(current);
            }
            'C' => {
                let end = (p[4], p[5]);
                cubic_extremes(current, (p[0], p[1]), (p[2], p[3]), end).for_each(&mut include);
                current = end;
            }
            _ => {}
        }
    }
    extent.map(Extent::bbox)
}

/// Bounding box of a path, following every curve to its extremes.
pub fn path_bbox<P: PathSource + ?Sized>(path: &P) -> Result<PathBBox> {
    Ok(bbox_of(&path.to_path_array()?).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::assert_in_delta;

    #[test]
    fn test_extent() {
        let ext = [(20., 10.), (30., 15.), (25., 30.)]
            .into_iter()
            .fold(Extent::at((10., 0.)), Extent::cover);
        let bb = ext.bbox();
        assert_eq!((bb.x, bb.y, bb.x2, bb.y2), (10., 0., 30., 30.));
        assert_eq!((bb.width, bb.height, bb.cx, bb.cy), (20., 30., 20., 15.));
    }

    #[test]
    fn test_cubic_bbox() {
        // symmetric hump reaches 3/4 of the control point height
        let bb = cubic_bbox((0., 0.), (0., 10.), (10., 10.), (10., 0.));
        assert_in_delta!(bb.y2, 7.5, 1e-9);
        assert_eq!((bb.x, bb.y, bb.x2), (0., 0., 10.));

        let bb = cubic_bbox((0., 0.), (5., 0.), (5., 0.), (10., 0.));
        assert_eq!((bb.x, bb.y, bb.x2, bb.y2), (0., 0., 10., 0.));

        // elevated quadratic: the derivative is linear in t
        let bb = cubic_bbox((0., 0.), (20. / 3., 20. / 3.), (40. / 3., 20. / 3.), (20., 0.));
        assert_in_delta!(bb.y2, 5., 1e-9);
    }

    #[test]
    fn test_path_bbox() {
        let bb = path_bbox("M0 0L10 0L10 10L0 10Z").unwrap();
        assert_eq!((bb.x, bb.y, bb.width, bb.height), (0., 0., 10., 10.));
        assert_eq!((bb.x2, bb.y2, bb.cx, bb.cy), (10., 10., 5., 5.));

        // a lone moveto still counts
        let bb = path_bbox("M5 5L10 10M-5 0").unwrap();
        assert_eq!((bb.x, bb.y, bb.x2, bb.y2), (-5., 0., 10., 10.));

        let bb = path_bbox("M0 10A10 10 0 1 0 20 10A10 10 0 1 0 0 10").unwrap();
        assert_in_delta!(bb.x, 0., 0.05);
        assert_in_delta!(bb.y, 0., 0.05);
        assert_in_delta!(bb.width, 20., 0.05);
        assert_in_delta!(bb.height, 20., 0.05);

        assert!(path_bbox(&PathArray::default()).is_err());
    }
}

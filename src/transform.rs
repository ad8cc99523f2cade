//! Applying 2D / 3D transforms to paths.
//!
//! SVG paths can't express 3D transforms, so points are projected back
//! onto the plane. Arcs survive pure 2D transforms (their radii and
//! rotation are recomputed) and are converted to cubics otherwise.

use std::str::FromStr;

use tracing::{debug, trace};

use crate::errors::{Error, Result};
use crate::geometry::bbox_of;
use crate::matrix::CssMatrix;
use crate::path::{absolute, arc_to_cubic, normalized, PathArray, PathSource, Segment};
use crate::types::{attr_split, strp};

const EPSILON: f64 = 1e-9;

/// A transform option value: a single number or a list of components.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde_derive::Deserialize, serde_derive::Serialize))]
#[cfg_attr(feature = "json", serde(untagged))]
pub enum Components {
    Scalar(f64),
    List(Vec<f64>),
}

impl Components {
    fn get(&self, idx: usize, default: f64) -> f64 {
        match self {
            Self::Scalar(v) if idx == 0 => *v,
            Self::Scalar(_) => default,
            Self::List(v) => v.get(idx).copied().unwrap_or(default),
        }
    }
}

impl FromStr for Components {
    type Err = Error;

    /// Parse `10` or `10,20` / `10 20 30`.
    fn from_str(value: &str) -> Result<Self> {
        let parts = attr_split(value)
            .map(|v| strp(&v))
            .collect::<Result<Vec<_>>>()?;
        match parts.as_slice() {
            [] => Err(Error::InvalidValue("transform".to_string(), value.to_string())),
            [v] => Ok(Self::Scalar(*v)),
            _ => Ok(Self::List(parts)),
        }
    }
}

/// Which transforms to apply, each optional.
///
/// Rotate, skew and scale act about `origin`; when no origin is given
/// the centre of the path's bounding box is used. Angles are in degrees.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde_derive::Deserialize, serde_derive::Serialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct TransformSpec {
    /// `[x, y]` or `[x, y, z]`; a non-zero z gives perspective projection.
    pub origin: Option<Vec<f64>>,
    /// A number translates along x only.
    pub translate: Option<Components>,
    /// A number rotates about the Z axis.
    pub rotate: Option<Components>,
    /// A number skews along x only.
    pub skew: Option<Components>,
    /// A number scales x and y uniformly; absent list entries are 1.
    pub scale: Option<Components>,
}

impl TransformSpec {
    /// Mirror top-to-bottom by rotating half a turn about the X axis.
    pub fn flip_x() -> Self {
        Self {
            rotate: Some(Components::List(vec![180., 0., 0.])),
            ..Default::default()
        }
    }

    /// Mirror left-to-right by rotating half a turn about the Y axis.
    pub fn flip_y() -> Self {
        Self {
            rotate: Some(Components::List(vec![0., 180., 0.])),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.translate.is_none()
            && self.rotate.is_none()
            && self.skew.is_none()
            && self.scale.is_none()
    }

    fn translation(&self) -> Option<(f64, f64, f64)> {
        self.translate
            .as_ref()
            .map(|t| (t.get(0, 0.), t.get(1, 0.), t.get(2, 0.)))
    }

    fn rotation(&self) -> Option<(f64, f64, f64)> {
        self.rotate.as_ref().map(|r| match r {
            Components::Scalar(a) => (0., 0., *a),
            list => (list.get(0, 0.), list.get(1, 0.), list.get(2, 0.)),
        })
    }

    fn skewing(&self) -> Option<(f64, f64)> {
        self.skew.as_ref().map(|s| (s.get(0, 0.), s.get(1, 0.)))
    }

    fn scaling(&self) -> Option<(f64, f64, f64)> {
        self.scale.as_ref().map(|s| match s {
            Components::Scalar(k) => (*k, *k, 1.),
            list => (list.get(0, 1.), list.get(1, 1.), list.get(2, 1.)),
        })
    }

    pub fn has_skew(&self) -> bool {
        self.skewing().is_some_and(|(x, y)| x != 0. || y != 0.)
    }

    /// Composite matrix for this spec, with rotate / skew / scale about `origin`.
    pub fn matrix(&self, origin: (f64, f64)) -> CssMatrix {
        let mut m = CssMatrix::identity();
        if let Some((x, y, z)) = self.translation() {
            m = m.translate(x, y, z);
        }
        if self.rotate.is_some() || self.skew.is_some() || self.scale.is_some() {
            let (ox, oy) = origin;
            m = m.translate(ox, oy, 0.);
            if let Some((x, y, z)) = self.rotation() {
                m = m.rotate(x, y, z);
            }
            if let Some((x, y)) = self.skewing() {
                if x != 0. {
                    m = m.skew_x(x);
                }
                if y != 0. {
                    m = m.skew_y(y);
                }
            }
            if let Some((x, y, z)) = self.scaling() {
                m = m.scale(x, y, z);
            }
            m = m.translate(-ox, -oy, 0.);
        }
        m
    }
}

/// New `(rx, ry, x_axis_rotation)` of an ellipse under the linear map
/// `[a, b, c, d]`.
///
/// The ellipse is treated as the image of the unit circle; the new radii
/// are the square roots of the eigenvalues of `M * Mt` and the rotation
/// follows the major eigenvector. Near-circular images get rotation 0.
pub fn transform_ellipse(m: [f64; 4], rx: f64, ry: f64, angle: f64) -> (f64, f64, f64) {
    let (s, c) = angle.to_radians().sin_cos();
    let ma = [
        rx * (m[0] * c + m[2] * s),
        rx * (m[1] * c + m[3] * s),
        ry * (-m[0] * s + m[2] * c),
        ry * (-m[1] * s + m[3] * c),
    ];

    let j = ma[0] * ma[0] + ma[2] * ma[2];
    let k = ma[1] * ma[1] + ma[3] * ma[3];
    let disc = ((ma[0] - ma[3]).powi(2) + (ma[2] + ma[1]).powi(2))
        * ((ma[0] + ma[3]).powi(2) + (ma[2] - ma[1]).powi(2));
    let jk = (j + k) / 2.;

    if disc < EPSILON * jk {
        let r = jk.sqrt();
        return (r, r, 0.);
    }

    let l = ma[0] * ma[1] + ma[2] * ma[3];
    let disc = disc.sqrt();
    let l1 = jk + disc / 2.;
    let l2 = jk - disc / 2.;

    let ax = if l.abs() < EPSILON && (l1 - k).abs() < EPSILON {
        90.
    } else if l.abs() > (l1 - k).abs() {
        ((l1 - j) / l).atan().to_degrees()
    } else {
        (l / (l1 - k)).atan().to_degrees()
    };

    if ax >= 0. {
        (l1.sqrt(), l2.sqrt(), ax)
    } else {
        (l2.sqrt(), l1.sqrt(), ax + 90.)
    }
}

/// Transform `(x, y)` and project it back to the plane.
///
/// `origin[2]` acts as the viewer distance; offsets from the origin are
/// scaled by `|oz| / |z - oz|`. When that ratio is zero or undefined (no
/// viewer distance) the projection is orthographic.
pub fn projection_2d(m: &CssMatrix, (x, y): (f64, f64), origin: [f64; 3]) -> (f64, f64) {
    let [px, py, pz, _] = m.transform_point(x, y, 0., 1.);
    let [ox, oy, oz] = origin;
    let ratio = oz.abs() / (pz - oz).abs();
    let ratio = if ratio == 0. || !ratio.is_finite() {
        1.
    } else {
        ratio
    };
    ((px - ox) * ratio + ox, (py - oy) * ratio + oy)
}

fn origin_3d(origin: &[f64]) -> [f64; 3] {
    [
        origin.first().copied().unwrap_or_default(),
        origin.get(1).copied().unwrap_or_default(),
        origin.get(2).copied().unwrap_or_default(),
    ]
}

/// Apply a transform spec to a path, returning an absolute path.
pub fn transform_path<P: PathSource + ?Sized>(path: &P, spec: &TransformSpec) -> Result<PathArray> {
    let abs = absolute(&path.to_path_array()?);
    let origin = match &spec.origin {
        Some(o) => origin_3d(o),
        None => {
            let (cx, cy) = bbox_of(&abs).map(|bb| (bb.cx, bb.cy)).unwrap_or_default();
            [cx, cy, 0.]
        }
    };
    let matrix = spec.matrix((origin[0], origin[1]));
    if matrix.is_identity() {
        trace!("identity transform, path unchanged");
        return Ok(abs);
    }
    debug!("transforming path with {matrix}");

    let norm = normalized(&abs);
    let elevate_arcs = !matrix.is_2d() || spec.has_skew();
    let m = &matrix.m;
    let linear = [m[0][0], m[0][1], m[1][0], m[1][1]];
    let mirrored = linear[0] * linear[3] - linear[1] * linear[2] < 0.;
    let project = |x: f64, y: f64| projection_2d(&matrix, (x, y), origin);

    let mut result = PathArray::default();
    // cursor in source coordinates, needed to convert arcs
    let mut current = (0., 0.);
    let mut start = (0., 0.);
    // cursor in output coordinates
    let mut pos = (0., 0.);
    let mut pos_start = (0., 0.);

    for (seg, nseg) in abs.iter().zip(norm.iter()) {
        let p = &seg.params;
        match seg.cmd {
            'A' if elevate_arcs => {
                let np = &nseg.params;
                let pieces = arc_to_cubic(
                    current,
                    np[0],
                    np[1],
                    np[2],
                    np[3] != 0.,
                    np[4] != 0.,
                    (np[5], np[6]),
                );
                for piece in pieces {
                    let mut params = Vec::with_capacity(6);
                    for pt in piece.chunks_exact(2) {
                        pos = project(pt[0], pt[1]);
                        params.extend([pos.0, pos.1]);
                    }
                    result.push(Segment::raw('C', &params));
                }
            }
            'A' => {
                let (rx, ry, angle) = transform_ellipse(linear, p[0], p[1], p[2]);
                let sweep = if mirrored { 1. - p[4] } else { p[4] };
                let end = project(p[5], p[6]);
                if end == pos || rx < EPSILON * ry || ry < EPSILON * rx {
                    debug!("degenerate arc replaced by line to {end:?}");
                    result.push(Segment::raw('L', &[end.0, end.1]));
                } else {
                    result.push(Segment::raw('A', &[rx, ry, angle, p[3], sweep, end.0, end.1]));
                }
                pos = end;
            }
            'L' | 'H' | 'V' => {
                let (x, y) = nseg.end_point().unwrap_or(current);
                let (lx, ly) = project(x, y);
                let seg = if pos.0 != lx && pos.1 != ly {
                    Segment::raw('L', &[lx, ly])
                } else if pos.1 == ly {
                    Segment::raw('H', &[lx])
                } else {
                    Segment::raw('V', &[ly])
                };
                result.push(seg);
                pos = (lx, ly);
            }
            'Z' => {
                result.push(seg.clone());
                pos = pos_start;
            }
            _ => {
                let mut params = Vec::with_capacity(p.len());
                for pt in p.chunks_exact(2) {
                    pos = project(pt[0], pt[1]);
                    params.extend([pos.0, pos.1]);
                }
                if seg.cmd == 'M' {
                    pos_start = pos;
                }
                result.push(Segment::raw(seg.cmd, &params));
            }
        }

        current = match seg.cmd {
            'Z' => start,
            _ => nseg.end_point().unwrap_or(current),
        };
        if seg.cmd == 'M' {
            start = current;
        }
    }
    Ok(result)
}

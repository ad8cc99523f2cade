//! 4x4 homogeneous transform matrix and CSS transform-function parsing.
//!
//! Components are stored row-major as `m[row][col]`, so `m[0][0]` is the
//! CSS `m11` and `m[3][0]`/`m[3][1]` hold the 2D translation (`e`, `f`).
//! Points are treated as row vectors and multiplied on the left.

use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::types::fstr;

const IDENTITY: [[f64; 4]; 4] = [
    [1., 0., 0., 0.],
    [0., 1., 0., 0.],
    [0., 0., 1., 0.],
    [0., 0., 0., 1.],
];

/// Values smaller than this are written as zero by `to_array` / `Display`.
const CLEAN_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CssMatrix {
    pub m: [[f64; 4]; 4],
}

impl Default for CssMatrix {
    fn default() -> Self {
        Self { m: IDENTITY }
    }
}

fn clean(n: f64) -> f64 {
    if n.abs() < CLEAN_EPSILON {
        0.
    } else {
        (n * 1e6).trunc() / 1e6
    }
}

impl CssMatrix {
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build from 6 (`a, b, c, d, e, f`) or 16 (row-major) values.
    pub fn from_array(values: &[f64]) -> Result<Self> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidMatrixInput(format!(
                "non-finite matrix value {bad}"
            )));
        }
        let mut m = IDENTITY;
        match values {
            [a, b, c, d, e, f] => {
                m[0][0] = *a;
                m[0][1] = *b;
                m[1][0] = *c;
                m[1][1] = *d;
                m[3][0] = *e;
                m[3][1] = *f;
            }
            v if v.len() == 16 => {
                for (i, val) in v.iter().enumerate() {
                    m[i / 4][i % 4] = *val;
                }
            }
            v => {
                return Err(Error::InvalidMatrixInput(format!(
                    "expected 6 or 16 values, got {}",
                    v.len()
                )))
            }
        }
        Ok(Self { m })
    }

    /// True if the matrix has no out-of-plane or perspective component.
    pub fn is_2d(&self) -> bool {
        let m = &self.m;
        m[2][0] == 0.
            && m[2][1] == 0.
            && m[2][2] == 1.
            && m[2][3] == 0.
            && m[3][2] == 0.
            && m[3][3] == 1.
    }

    pub fn is_identity(&self) -> bool {
        self.m == IDENTITY
    }

    /// Compose with `other`, which is applied to points first.
    pub fn multiply(&self, other: &CssMatrix) -> Self {
        let mut m = [[0.; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, val) in row.iter_mut().enumerate() {
                *val = (0..4).map(|k| other.m[i][k] * self.m[k][j]).sum();
            }
        }
        Self { m }
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut m = IDENTITY;
        m[3][0] = x;
        m[3][1] = y;
        m[3][2] = z;
        Self { m }
    }

    pub fn scaling(x: f64, y: f64, z: f64) -> Self {
        let mut m = IDENTITY;
        m[0][0] = x;
        m[1][1] = y;
        m[2][2] = z;
        Self { m }
    }

    /// Euler rotation in degrees, about X then Y then Z.
    pub fn rotation(rx: f64, ry: f64, rz: f64) -> Self {
        let (sinx, cosx) = rx.to_radians().sin_cos();
        let (siny, cosy) = ry.to_radians().sin_cos();
        let (sinz, cosz) = rz.to_radians().sin_cos();
        let (sinx, siny, sinz) = (-sinx, -siny, -sinz);

        let mut m = IDENTITY;
        m[0][0] = cosy * cosz;
        m[0][1] = -cosy * sinz;
        m[0][2] = siny;
        m[1][0] = sinx * siny * cosz + cosx * sinz;
        m[1][1] = cosx * cosz - sinx * siny * sinz;
        m[1][2] = -sinx * cosy;
        m[2][0] = sinx * sinz - cosx * siny * cosz;
        m[2][1] = sinx * cosz + cosx * siny * sinz;
        m[2][2] = cosx * cosy;
        Self { m }
    }

    /// Rotation by `angle` degrees about the axis `(x, y, z)`.
    ///
    /// A zero-length axis is treated as the Z axis.
    pub fn axis_angle(x: f64, y: f64, z: f64, angle: f64) -> Self {
        let len = (x * x + y * y + z * z).sqrt();
        let (x, y, z) = if len == 0. {
            (0., 0., 1.)
        } else {
            (x / len, y / len, z / len)
        };
        let (sin_a, cos_a) = (angle * std::f64::consts::PI / 360.).sin_cos();
        let sin_a2 = sin_a * sin_a;
        let (x2, y2, z2) = (x * x, y * y, z * z);

        let mut m = IDENTITY;
        m[0][0] = 1. - 2. * (y2 + z2) * sin_a2;
        m[0][1] = 2. * (x * y * sin_a2 + z * sin_a * cos_a);
        m[0][2] = 2. * (x * z * sin_a2 - y * sin_a * cos_a);
        m[1][0] = 2. * (y * x * sin_a2 - z * sin_a * cos_a);
        m[1][1] = 1. - 2. * (z2 + x2) * sin_a2;
        m[1][2] = 2. * (y * z * sin_a2 + x * sin_a * cos_a);
        m[2][0] = 2. * (z * x * sin_a2 + y * sin_a * cos_a);
        m[2][1] = 2. * (z * y * sin_a2 - x * sin_a * cos_a);
        m[2][2] = 1. - 2. * (x2 + y2) * sin_a2;
        Self { m }
    }

    pub fn skewing_x(angle: f64) -> Self {
        let mut m = IDENTITY;
        m[1][0] = angle.to_radians().tan();
        Self { m }
    }

    pub fn skewing_y(angle: f64) -> Self {
        let mut m = IDENTITY;
        m[0][1] = angle.to_radians().tan();
        Self { m }
    }

    /// Perspective with the viewer `distance` from the z=0 plane.
    ///
    /// A zero or non-finite distance has no matrix form.
    pub fn perspective(distance: f64) -> Result<Self> {
        let w = -1. / distance;
        if !w.is_finite() {
            return Err(Error::InvalidMatrixInput(format!(
                "invalid perspective distance {distance}"
            )));
        }
        let mut m = IDENTITY;
        m[2][3] = w;
        Ok(Self { m })
    }

    pub fn translate(&self, x: f64, y: f64, z: f64) -> Self {
        self.multiply(&Self::translation(x, y, z))
    }

    pub fn scale(&self, x: f64, y: f64, z: f64) -> Self {
        self.multiply(&Self::scaling(x, y, z))
    }

    pub fn rotate(&self, rx: f64, ry: f64, rz: f64) -> Self {
        self.multiply(&Self::rotation(rx, ry, rz))
    }

    pub fn rotate_axis_angle(&self, x: f64, y: f64, z: f64, angle: f64) -> Self {
        self.multiply(&Self::axis_angle(x, y, z, angle))
    }

    pub fn skew_x(&self, angle: f64) -> Self {
        self.multiply(&Self::skewing_x(angle))
    }

    pub fn skew_y(&self, angle: f64) -> Self {
        self.multiply(&Self::skewing_y(angle))
    }

    /// Apply the matrix to the homogeneous point `(x, y, z, w)`.
    pub fn transform_point(&self, x: f64, y: f64, z: f64, w: f64) -> [f64; 4] {
        let p = [x, y, z, w];
        let mut out = [0.; 4];
        for (j, val) in out.iter_mut().enumerate() {
            *val = (0..4).map(|i| p[i] * self.m[i][j]).sum();
        }
        out
    }

    /// Six values `a, b, c, d, e, f` for a 2D matrix, otherwise all sixteen.
    ///
    /// Tiny values are cleaned to zero and everything is truncated to six
    /// decimal places.
    pub fn to_array(&self) -> Vec<f64> {
        let m = &self.m;
        let values: Vec<f64> = if self.is_2d() {
            vec![m[0][0], m[0][1], m[1][0], m[1][1], m[3][0], m[3][1]]
        } else {
            m.iter().flatten().copied().collect()
        };
        values.into_iter().map(clean).collect()
    }
}

impl fmt::Display for CssMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.is_2d() { "matrix" } else { "matrix3d" };
        let values: Vec<String> = self.to_array().into_iter().map(fstr).collect();
        write!(f, "{name}({})", values.join(","))
    }
}

/// A single CSS transform function, e.g. `rotate(45deg)`.
#[derive(Clone, Debug, PartialEq)]
pub enum TransformFunction {
    Matrix(CssMatrix),
    Translate(f64, f64, f64),
    Scale(f64, f64, f64),
    Rotate(f64, f64, f64),
    Rotate3d(f64, f64, f64, f64),
    SkewX(f64),
    SkewY(f64),
    Perspective(f64),
}

impl TransformFunction {
    /// True if this function moves points out of the XY plane.
    fn is_3d(&self) -> bool {
        match self {
            Self::Matrix(m) => !m.is_2d(),
            Self::Translate(_, _, z) => *z != 0.,
            Self::Scale(_, _, z) => *z != 1.,
            Self::Rotate(x, y, _) => *x != 0. || *y != 0.,
            Self::Rotate3d(x, y, _, a) => (*x != 0. || *y != 0.) && *a != 0.,
            _ => false,
        }
    }

    pub fn matrix(&self) -> Result<CssMatrix> {
        Ok(match *self {
            Self::Matrix(m) => m,
            Self::Translate(x, y, z) => CssMatrix::translation(x, y, z),
            Self::Scale(x, y, z) => CssMatrix::scaling(x, y, z),
            Self::Rotate(x, y, z) => CssMatrix::rotation(x, y, z),
            Self::Rotate3d(x, y, z, a) => CssMatrix::axis_angle(x, y, z, a),
            Self::SkewX(a) => CssMatrix::skewing_x(a),
            Self::SkewY(a) => CssMatrix::skewing_y(a),
            Self::Perspective(d) => CssMatrix::perspective(d)?,
        })
    }
}

/// Parse a single argument, converting angle units to degrees.
fn parse_arg(arg: &str) -> Result<f64> {
    let (num, factor) = if let Some(v) = arg.strip_suffix("grad") {
        (v, 0.9)
    } else if let Some(v) = arg.strip_suffix("rad") {
        (v, 180. / std::f64::consts::PI)
    } else if let Some(v) = arg.strip_suffix("deg") {
        (v, 1.)
    } else if let Some(v) = arg.strip_suffix("turn") {
        (v, 360.)
    } else if let Some(v) = arg.strip_suffix("px") {
        (v, 1.)
    } else {
        (arg, 1.)
    };
    num.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * factor)
        .ok_or_else(|| Error::InvalidMatrixInput(format!("invalid argument '{arg}'")))
}

const FUNCTION_NAMES: &[&str] = &[
    "matrix",
    "matrix3d",
    "translate",
    "translate3d",
    "translatex",
    "translatey",
    "translatez",
    "scale",
    "scale3d",
    "scalex",
    "scaley",
    "scalez",
    "rotate",
    "rotate3d",
    "rotatex",
    "rotatey",
    "rotatez",
    "skew",
    "skewx",
    "skewy",
    "perspective",
];

fn zero_small(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|&n| if n.abs() < CLEAN_EPSILON { 0. } else { n })
        .collect()
}

impl FromStr for TransformFunction {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = |msg: &str| Error::InvalidMatrixInput(format!("{msg} in '{value}'"));
        let mut parts = value.splitn(2, '(');
        let name = parts.next().unwrap_or_default().trim();
        let args = parts
            .next()
            .ok_or_else(|| invalid("no transform args"))?
            .strip_suffix(')')
            .ok_or_else(|| invalid("no closing bracket"))?
            .split(',')
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(parse_arg)
            .collect::<Result<Vec<_>>>()?;
        if args.is_empty() {
            return Err(invalid("no transform args"));
        }

        let lname = name.to_lowercase();
        Ok(match (lname.as_str(), args.as_slice()) {
            ("matrix", a) if a.len() == 6 => Self::Matrix(CssMatrix::from_array(&zero_small(a))?),
            ("matrix3d", a) if a.len() == 16 => {
                Self::Matrix(CssMatrix::from_array(&zero_small(a))?)
            }
            ("translate", &[x]) => Self::Translate(x, 0., 0.),
            ("translate", &[x, y]) => Self::Translate(x, y, 0.),
            ("translate3d", &[x, y, z]) => Self::Translate(x, y, z),
            ("translatex", &[x]) => Self::Translate(x, 0., 0.),
            ("translatey", &[y]) => Self::Translate(0., y, 0.),
            ("translatez", &[z]) => Self::Translate(0., 0., z),
            ("scale", &[x]) => Self::Scale(x, x, 1.),
            ("scale", &[x, y]) => Self::Scale(x, y, 1.),
            ("scale3d", &[x, y, z]) => Self::Scale(x, y, z),
            ("scalex", &[x]) => Self::Scale(x, 1., 1.),
            ("scaley", &[y]) => Self::Scale(1., y, 1.),
            ("scalez", &[z]) => Self::Scale(1., 1., z),
            ("rotate" | "rotatez", &[a]) => Self::Rotate(0., 0., a),
            ("rotatex", &[a]) => Self::Rotate(a, 0., 0.),
            ("rotatey", &[a]) => Self::Rotate(0., a, 0.),
            ("rotate3d", &[x, y, z, a]) => Self::Rotate3d(x, y, z, a),
            ("skew" | "skewx", &[a]) => Self::SkewX(a),
            ("skewy", &[a]) => Self::SkewY(a),
            ("perspective", &[d]) => {
                CssMatrix::perspective(d)?;
                Self::Perspective(d)
            }
            (n, _) if FUNCTION_NAMES.contains(&n) => {
                return Err(invalid(&format!("wrong number of arguments for {name}")))
            }
            _ => return Err(invalid(&format!("unknown transform function '{name}'"))),
        })
    }
}

/// Split a transform list such as `translate(10px) rotate(45deg)` into
/// its function tokens.
fn transform_functions(value: &str) -> Result<Vec<TransformFunction>> {
    let mut result = Vec::new();
    for part in value.split_inclusive(')').map(|v| v.trim()) {
        if part.is_empty() {
            continue;
        }
        // 'skew(x, y)' is shorthand for skewX followed by skewY
        if let Some(args) = part
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("skew("))
            .and_then(|_| part.get(5..))
            .and_then(|a| a.strip_suffix(')'))
            .filter(|a| a.contains(','))
        {
            let args: Vec<&str> = args.split(',').map(|a| a.trim()).collect();
            if let [x, y] = args.as_slice() {
                result.push(TransformFunction::SkewX(parse_arg(x)?));
                result.push(TransformFunction::SkewY(parse_arg(y)?));
                continue;
            }
            return Err(Error::InvalidMatrixInput(format!(
                "wrong number of arguments for skew in '{part}'"
            )));
        }
        result.push(part.parse()?);
    }
    Ok(result)
}

impl FromStr for CssMatrix {
    type Err = Error;

    /// Compose a CSS transform list left to right.
    ///
    /// `perspective()` only takes effect when some other function in the
    /// list is three-dimensional.
    fn from_str(value: &str) -> Result<Self> {
        let functions = transform_functions(value)?;
        let is_2d = !functions.iter().any(TransformFunction::is_3d);
        functions
            .iter()
            .filter(|f| !(is_2d && matches!(f, TransformFunction::Perspective(_))))
            .try_fold(CssMatrix::identity(), |m, f| Ok(m.multiply(&f.matrix()?)))
    }
}

//! ## svgpathops - parse, convert, transform and measure SVG path data
//!
//! `svgpathops` works on the `d` attribute of SVG `<path>` elements. Path data
//! is parsed into a [`PathArray`] of [`Segment`]s which can then be converted
//! between absolute, relative, normalized and all-cubic forms, reversed, split,
//! transformed with 2D / 3D affine transforms and measured.
//!
//! ## Library use
//!
//! The individual operations ([`to_absolute`], [`to_curve`], [`transform_path`],
//! [`path_bbox`] and so on) accept either raw path data or an existing
//! [`PathArray`]. For one-shot string processing (as done by the `svgpathops`
//! command-line tool) build a [`ProcessConfig`] and call [`process_str`].
//!
//! Errors are reported via `svgpathops::Result`.
//!
//! ## Example
//!
//! ```
//! let cfg = svgpathops::ProcessConfig {
//!     operation: svgpathops::Operation::Relative,
//!     ..Default::default()
//! };
//!
//! let output = svgpathops::process_str("M10 10L20 20H5", &cfg).unwrap();
//! assert_eq!(output, "M10 10l10 10h-15");
//! ```

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use std::fmt;
use std::io::{BufRead, Cursor, Read, Write};

#[cfg(feature = "cli")]
pub mod cli;
pub mod errors;
mod geometry;
#[cfg(feature = "json")]
pub mod json_api;
mod matrix;
mod path;
mod shape;
mod transform;
mod types;

pub use errors::{Error, Result};
pub use geometry::{
    cubic_bbox, cubic_length, draw_direction, path_area, path_bbox, path_length,
    point_at_length, PathBBox,
};
pub use matrix::{CssMatrix, TransformFunction};
pub use path::{
    arc_to_cubic, arity, is_valid_path, line_to_cubic, normalize, optimize, parse_path,
    path_to_string, quad_to_cubic, reverse_curve, reverse_path, round_path, split_path,
    to_absolute, to_curve, to_relative, PathArray, PathSource, PathSyntax, ReverseMode, Segment,
    SvgPathSyntax,
};
pub use shape::{shape_to_path_element, Shape};
pub use transform::{projection_2d, transform_ellipse, transform_path, Components, TransformSpec};
pub use types::fstr;

use path::rounded;
use types::round_to;

// Allow users of this as a library to easily retrieve the version of svgpathops being used
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options shared by every operation which rounds output or needs an origin.
#[derive(Clone, Debug, PartialEq)]
pub struct PathOptions {
    /// Decimal places kept in output; `None` disables rounding
    pub decimals: Option<u32>,
    /// Transform origin `[x, y, z]`; `None` uses the path's bounding box centre
    pub origin: Option<[f64; 3]>,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            decimals: Some(4),
            origin: None,
        }
    }
}

/// The operation performed by [`process_str`] and friends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "json", derive(serde_derive::Deserialize, serde_derive::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum Operation {
    /// Parse and re-serialize the path data, rounded
    #[cfg_attr(feature = "cli", value(alias = "round"))]
    #[cfg_attr(feature = "json", serde(alias = "round"))]
    Parse,
    /// Convert to absolute commands
    Absolute,
    /// Convert to relative commands
    Relative,
    /// Absolute commands with shorthand expanded
    #[default]
    Normalize,
    /// Convert every segment to a cubic Bezier
    Curve,
    /// Shortest mix of absolute and relative commands
    Optimize,
    /// Reverse the drawing direction
    Reverse,
    /// Reverse the all-cubic form of the path
    ReverseCurve,
    /// Split into one path per sub-path
    Split,
    /// Apply the configured transform
    Transform,
    /// Bounding box
    Bbox,
    /// Total length
    Length,
    /// Signed enclosed area
    Area,
    /// True if drawn clockwise
    Direction,
    /// Point at the configured distance along the path
    PointAtLength,
    /// Check whether the input is valid path data
    Valid,
    /// Convert an SVG shape element to a path element
    Shape,
}

/// Settings for a single invocation of [`process_str`].
///
/// Front-ends such as the `svgpathops` command line tool wrap this with their
/// own settings (input / output locations etc).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessConfig {
    /// What to do with the input
    pub operation: Operation,
    /// Rounding and origin
    pub options: PathOptions,
    /// Transform applied by [`Operation::Transform`]
    pub transform: TransformSpec,
    /// Distance used by [`Operation::PointAtLength`]
    pub length: f64,
    /// Sub-path handling used by [`Operation::Reverse`]
    pub reverse: ReverseMode,
    /// Write output as JSON rather than plain text
    pub json: bool,
}

/// Result of a single operation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde_derive::Serialize))]
#[cfg_attr(feature = "json", serde(untagged))]
pub enum Output {
    Path(PathArray),
    /// One absolute path string per sub-path
    Paths(Vec<String>),
    Number(f64),
    Flag(bool),
    Point { x: f64, y: f64 },
    BBox(PathBBox),
    Text(String),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{p}"),
            Self::Paths(paths) => write!(f, "{}", paths.join("\n")),
            Self::Number(n) => write!(f, "{}", fstr(*n)),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Point { x, y } => write!(f, "{} {}", fstr(*x), fstr(*y)),
            Self::BBox(bb) => write!(
                f,
                "{} {} {} {}",
                fstr(bb.x),
                fstr(bb.y),
                fstr(bb.width),
                fstr(bb.height)
            ),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

fn round_opt(x: f64, decimals: Option<u32>) -> f64 {
    decimals.map_or(x, |d| round_to(x, d))
}

fn round_bbox(bb: PathBBox, decimals: Option<u32>) -> PathBBox {
    let r = |v| round_opt(v, decimals);
    PathBBox {
        x: r(bb.x),
        y: r(bb.y),
        width: r(bb.width),
        height: r(bb.height),
        x2: r(bb.x2),
        y2: r(bb.y2),
        cx: r(bb.cx),
        cy: r(bb.cy),
    }
}

/// Run the configured operation on a path.
///
/// [`Operation::Shape`] needs element markup rather than path data, so is
/// only supported via [`process_text`].
pub fn process<P: PathSource + ?Sized>(path: &P, cfg: &ProcessConfig) -> Result<Output> {
    let decimals = cfg.options.decimals;
    let round = |p: PathArray| Output::Path(rounded(&p, decimals));

    Ok(match cfg.operation {
        Operation::Parse => round(path.to_path_array()?),
        Operation::Absolute => round(to_absolute(path)?),
        Operation::Relative => round(to_relative(path)?),
        Operation::Normalize => round(normalize(path)?),
        Operation::Curve => round(to_curve(path)?),
        Operation::Optimize => Output::Path(optimize(path, decimals)?),
        Operation::Reverse => round(reverse_path(path, cfg.reverse)?),
        Operation::ReverseCurve => round(reverse_curve(path)?),
        Operation::Split => Output::Paths(split_path(path, decimals)?),
        Operation::Transform => {
            let mut spec = cfg.transform.clone();
            if spec.origin.is_none() {
                spec.origin = cfg.options.origin.map(|o| o.to_vec());
            }
            round(transform_path(path, &spec)?)
        }
        Operation::Bbox => Output::BBox(round_bbox(path_bbox(path)?, decimals)),
        Operation::Length => Output::Number(round_opt(path_length(path)?, decimals)),
        Operation::Area => Output::Number(round_opt(path_area(path)?, decimals)),
        Operation::Direction => Output::Flag(draw_direction(path)?),
        Operation::PointAtLength => {
            let (x, y) = point_at_length(path, cfg.length)?;
            Output::Point {
                x: round_opt(x, decimals),
                y: round_opt(y, decimals),
            }
        }
        Operation::Valid => Output::Flag(path.to_path_array().is_ok()),
        Operation::Shape => {
            return Err(Error::UnsupportedShape(
                "expected an SVG shape element, not path data".to_string(),
            ))
        }
    })
}

/// Run the configured operation on text input.
///
/// Surrounding whitespace is ignored.
pub fn process_text(input: &str, cfg: &ProcessConfig) -> Result<Output> {
    let input = input.trim();
    match cfg.operation {
        Operation::Shape => Ok(Output::Text(shape_to_path_element(
            input,
            cfg.options.decimals,
        )?)),
        Operation::Valid => Ok(Output::Flag(is_valid_path(input))),
        _ => process(input, cfg),
    }
}

#[cfg(feature = "json")]
pub(crate) fn render(output: &Output, cfg: &ProcessConfig) -> Result<String> {
    if cfg.json {
        Ok(serde_json::to_string(output)?)
    } else {
        Ok(output.to_string())
    }
}

#[cfg(not(feature = "json"))]
pub(crate) fn render(output: &Output, cfg: &ProcessConfig) -> Result<String> {
    if cfg.json {
        return Err(Error::Cli("JSON output requires the 'json' feature".into()));
    }
    Ok(output.to_string())
}

/// Reads from the `reader` stream, processes it, and writes to `writer`.
///
/// The entire stream is read before any output is written; a trailing
/// newline is added to the output.
pub fn process_stream(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    cfg: &ProcessConfig,
) -> Result<()> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    let output = process_text(&input, cfg)?;
    writeln!(writer, "{}", render(&output, cfg)?)?;
    Ok(())
}

/// Process `input` provided as a string, returning the result as a string.
pub fn process_str<T: Into<String>>(input: T, cfg: &ProcessConfig) -> Result<String> {
    let input = input.into();

    let mut input = Cursor::new(input);
    let mut output: Vec<u8> = vec![];

    process_stream(&mut input, &mut output, cfg)?;

    let output = String::from_utf8(output).map_err(Error::from_err)?;
    Ok(output.trim_end().to_string())
}

/// Process `input` with the named operation and default settings.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn process_string(input: String, operation: String) -> core::result::Result<String, String> {
    let operation = parse_operation(&operation).map_err(|e| e.to_string())?;
    let cfg = ProcessConfig {
        operation,
        ..Default::default()
    };
    process_str(input, &cfg).map_err(|e| e.to_string())
}

/// Handle a JSON request (see [`json_api`]), returning a JSON response.
#[cfg(feature = "json")]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn process_json(input: String) -> String {
    json_api::handle_json(&input)
}

/// Look up an operation by its kebab-case name, e.g. `point-at-length`.
pub fn parse_operation(name: &str) -> Result<Operation> {
    use Operation::*;
    Ok(match name {
        "parse" | "round" => Parse,
        "absolute" => Absolute,
        "relative" => Relative,
        "normalize" => Normalize,
        "curve" => Curve,
        "optimize" => Optimize,
        "reverse" => Reverse,
        "reverse-curve" => ReverseCurve,
        "split" => Split,
        "transform" => Transform,
        "bbox" => Bbox,
        "length" => Length,
        "area" => Area,
        "direction" => Direction,
        "point-at-length" => PointAtLength,
        "valid" => Valid,
        "shape" => Shape,
        _ => return Err(Error::InvalidValue("operation".into(), name.into())),
    })
}

//! Path data model: segments, path arrays and the predicates over them.
//!
//! A [`PathArray`] is an ordered list of [`Segment`]s, each carrying a
//! single command letter and the fixed number of parameters that command
//! takes. Every converter in this crate accepts anything implementing
//! [`PathSource`], so both raw `d` strings and already-parsed arrays can
//! be passed in.

mod convert;
mod curve;
#[cfg(feature = "json")]
mod json;
mod parser;
mod reverse;
mod syntax;

use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::types::fstr;

pub use convert::{
    normalize, optimize, path_to_string, round_path, split_path, to_absolute, to_relative,
};
pub use curve::{arc_to_cubic, line_to_cubic, quad_to_cubic, to_curve};
pub use parser::{is_valid_path, parse_path};
pub use reverse::{reverse_curve, reverse_path, ReverseMode};
pub use syntax::{PathSyntax, SvgPathSyntax};

pub(crate) use convert::{absolute, normalized, rounded, subpaths};
pub(crate) use curve::{cubic_point, curve};

/// Number of parameters taken by the given command letter, if recognised.
pub fn arity(cmd: char) -> Option<usize> {
    match cmd.to_ascii_lowercase() {
        'a' => Some(7),
        'c' => Some(6),
        'h' | 'v' => Some(1),
        'l' | 'm' | 't' => Some(2),
        'q' | 's' => Some(4),
        'z' => Some(0),
        _ => None,
    }
}

/// A single path command and its parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub cmd: char,
    pub params: Vec<f64>,
}

impl Segment {
    /// Create a segment, checking the command letter and parameter count.
    pub fn new(cmd: char, params: &[f64]) -> Result<Self> {
        let seg = Self::raw(cmd, params);
        if seg.is_well_formed() {
            Ok(seg)
        } else {
            Err(Error::syntax(
                0,
                format!("'{cmd}' does not take {} parameter(s)", params.len()),
            ))
        }
    }

    /// Create a segment without validation; used where arity is known.
    pub(crate) fn raw(cmd: char, params: &[f64]) -> Self {
        Self {
            cmd,
            params: params.to_vec(),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        arity(self.cmd) == Some(self.params.len())
    }

    /// The final (x, y) parameter pair, if the segment ends in one.
    ///
    /// Note `H`, `V` and `Z` segments have no such pair.
    pub fn end_point(&self) -> Option<(f64, f64)> {
        match self.params.as_slice() {
            [.., x, y] => Some((*x, *y)),
            _ => None,
        }
    }

    /// Length of the segment when its parts are concatenated with no separators.
    pub(crate) fn compact_len(&self) -> usize {
        1 + self.params.iter().map(|p| fstr(*p).len()).sum::<usize>()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cmd)?;
        let params: Vec<String> = self.params.iter().map(|p| fstr(*p)).collect();
        write!(f, "{}", params.join(" "))
    }
}

/// Ordered sequence of path segments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathArray {
    segments: Vec<Segment>,
}

impl PathArray {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn push(&mut self, seg: Segment) {
        self.segments.push(seg);
    }

    /// Every segment has a recognised command and matching parameter count.
    pub fn is_well_formed(&self) -> bool {
        self.segments.iter().all(Segment::is_well_formed)
    }

    /// Well-formed and every command letter is uppercase.
    pub fn is_absolute(&self) -> bool {
        self.is_well_formed() && self.segments.iter().all(|s| s.cmd.is_ascii_uppercase())
    }

    /// Well-formed and every command after the first is lowercase.
    pub fn is_relative(&self) -> bool {
        self.is_well_formed()
            && self
                .segments
                .iter()
                .skip(1)
                .all(|s| s.cmd.is_ascii_lowercase())
    }

    /// Well-formed and free of shorthand and relative commands.
    pub fn is_normalized(&self) -> bool {
        self.is_well_formed() && self.segments.iter().all(|s| "ACLMQZ".contains(s.cmd))
    }

    /// Well-formed and every segment other than a moveto is a cubic `C`.
    pub fn is_curve(&self) -> bool {
        self.is_well_formed() && self.segments.iter().all(|s| "MC".contains(s.cmd))
    }
}

impl FromIterator<Segment> for PathArray {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PathArray {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathArray {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for PathArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.segments {
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for PathArray {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_path(s)
    }
}

/// Anything which can provide a path array: raw path data or an existing array.
pub trait PathSource {
    fn to_path_array(&self) -> Result<PathArray>;
}

impl PathSource for str {
    fn to_path_array(&self) -> Result<PathArray> {
        parse_path(self)
    }
}

impl PathSource for String {
    fn to_path_array(&self) -> Result<PathArray> {
        parse_path(self)
    }
}

impl PathSource for PathArray {
    /// An already-structured path is cloned rather than re-tokenized.
    fn to_path_array(&self) -> Result<PathArray> {
        if let Some(pos) = self.segments.iter().position(|s| !s.is_well_formed()) {
            return Err(Error::syntax(
                pos,
                format!("malformed '{}' segment", self.segments[pos].cmd),
            ));
        }
        if !self.segments.first().is_some_and(|s| matches!(s.cmd, 'M' | 'm')) {
            return Err(Error::MissingMoveto);
        }
        Ok(self.clone())
    }
}

impl PathSource for [Segment] {
    fn to_path_array(&self) -> Result<PathArray> {
        PathArray::new(self.to_vec()).to_path_array()
    }
}

use super::convert::{absolute, normalized, subpaths};
use super::curve::curve;
use super::{PathArray, PathSource, Segment};
use crate::errors::Result;

/// How multi-subpath input is reversed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "json", derive(serde_derive::Deserialize, serde_derive::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum ReverseMode {
    /// Reverse the entire segment list in one pass
    Whole,
    /// Reverse each sub-path in place, keeping sub-path order
    #[default]
    Subpaths,
    /// As `Subpaths`, but leave the first sub-path untouched
    SubpathsExceptFirst,
}

/// End point of each segment of a normalized path.
fn end_points(norm: &PathArray) -> Vec<(f64, f64)> {
    let mut current = (0., 0.);
    let mut start = (0., 0.);
    norm.iter()
        .map(|seg| {
            match seg.cmd {
                'Z' => current = start,
                'M' => {
                    current = (seg.params[0], seg.params[1]);
                    start = current;
                }
                _ => current = seg.end_point().unwrap_or(current),
            }
            current
        })
        .collect()
}

fn reversed(abs: &PathArray) -> PathArray {
    let norm = normalized(abs);
    let ends = end_points(&norm);
    let segs = abs.segments();
    let n = segs.len();
    if n == 0 {
        return PathArray::default();
    }
    let is_closed = segs[n - 1].cmd == 'Z';

    let mut result: Vec<Segment> = segs
        .iter()
        .zip(norm.iter())
        .enumerate()
        .map(|(i, (seg, data))| {
            let p = &seg.params;
            let d = &data.params;
            let prev = i.checked_sub(1).map(|j| segs[j].cmd);
            let next = segs.get(i + 1).map(|s| s.cmd);
            // each segment now ends where the previous one used to
            let (x, y) = ends[if i > 0 { i - 1 } else { n - 1 }];

            match seg.cmd {
                'M' if is_closed => Segment::raw('Z', &[]),
                'M' => Segment::raw('M', &[x, y]),
                'A' => {
                    let sweep = if p[4] == 1. { 0. } else { 1. };
                    Segment::raw('A', &[p[0], p[1], p[2], p[3], sweep, x, y])
                }
                'C' if next == Some('S') => Segment::raw('S', &[p[0], p[1], x, y]),
                'C' => Segment::raw('C', &[p[2], p[3], p[0], p[1], x, y]),
                'S' if matches!(prev, Some('C' | 'S')) && next != Some('S') => {
                    Segment::raw('C', &[d[2], d[3], d[0], d[1], x, y])
                }
                'S' => Segment::raw('S', &[d[0], d[1], x, y]),
                'Q' if next == Some('T') => Segment::raw('T', &[x, y]),
                'Q' => Segment::raw('Q', &[p[0], p[1], x, y]),
                'T' if matches!(prev, Some('Q' | 'T')) && next != Some('T') => {
                    Segment::raw('Q', &[d[0], d[1], x, y])
                }
                'T' => Segment::raw('T', &[x, y]),
                'Z' => Segment::raw('M', &[x, y]),
                'H' => Segment::raw('H', &[x]),
                'V' => Segment::raw('V', &[y]),
                _ => {
                    let mut params = p[..p.len().saturating_sub(2)].to_vec();
                    params.extend([x, y]);
                    Segment::raw(seg.cmd, &params)
                }
            }
        })
        .collect();

    if is_closed {
        result.reverse();
    } else {
        result[1..].reverse();
    }
    PathArray::new(result)
}

/// Reverse the drawing direction of a path.
///
/// Shorthand `S`/`T` commands are re-derived where the reversed
/// neighbours still allow it, and arc sweep flags are flipped.
pub fn reverse_path<P: PathSource + ?Sized>(path: &P, mode: ReverseMode) -> Result<PathArray> {
    let abs = absolute(&path.to_path_array()?);
    Ok(match mode {
        ReverseMode::Whole => reversed(&abs),
        ReverseMode::Subpaths | ReverseMode::SubpathsExceptFirst => subpaths(&abs)
            .iter()
            .enumerate()
            .flat_map(|(i, sub)| {
                if i == 0 && mode == ReverseMode::SubpathsExceptFirst {
                    sub.clone()
                } else {
                    reversed(sub)
                }
            })
            .collect(),
    })
}

/// Reverse an all-cubic path, converting the input to cubics first if needed.
pub fn reverse_curve<P: PathSource + ?Sized>(path: &P) -> Result<PathArray> {
    let curves = curve(&path.to_path_array()?);
    let mut result = PathArray::default();
    for sub in subpaths(&curves) {
        let mut start = (0., 0.);
        // [start, cp1, cp2, end] of each cubic
        let mut pts = Vec::new();
        for seg in &sub {
            let p = &seg.params;
            if seg.cmd == 'C' {
                pts.push([start, (p[0], p[1]), (p[2], p[3]), (p[4], p[5])]);
            }
            start = seg.end_point().unwrap_or(start);
        }
        result.push(Segment::raw('M', &[start.0, start.1]));
        for [s, c1, c2, _] in pts.into_iter().rev() {
            result.push(Segment::raw('C', &[c2.0, c2.1, c1.0, c1.1, s.0, s.1]));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_whole() {
        for (pd, exp) in [
            ("M0 0L10 0L10 10", "M10 10L10 0L0 0"),
            ("M0 0L10 0L10 10Z", "M10 10L10 0L0 0Z"),
            ("M0 0H10V10", "M10 10V0H0"),
            ("M0 0C0 10 10 10 10 0", "M10 0C10 10 0 10 0 0"),
            ("M0 0A5 5 0 0 1 10 0", "M10 0A5 5 0 0 0 0 0"),
            (
                "M0 0C0 10 10 10 10 0S20 -10 20 0",
                "M20 0C20 -10 10 -10 10 0S0 10 0 0",
            ),
            ("M0 0Q5 10 10 0T20 0", "M20 0Q15 -10 10 0T0 0"),
            ("M0 0L10 0M20 20L30 20", "M30 20L20 20M10 0L0 0"),
            ("m0 0l10 0l0 10", "M10 10L10 0L0 0"),
        ] {
            let rev = reverse_path(pd, ReverseMode::Whole).unwrap();
            assert_eq!(rev.to_string(), exp, "Failed for path: {pd}");
        }
    }

    #[test]
    fn test_reverse_subpaths() {
        let pd = "M0 0L10 0M20 20L30 20";
        assert_eq!(
            reverse_path(pd, ReverseMode::Subpaths).unwrap().to_string(),
            "M10 0L0 0M30 20L20 20"
        );
        assert_eq!(
            reverse_path(pd, ReverseMode::SubpathsExceptFirst)
                .unwrap()
                .to_string(),
            "M0 0L10 0M30 20L20 20"
        );
        // single sub-path is left alone when skipping the first
        assert_eq!(
            reverse_path("M0 0L5 5", ReverseMode::SubpathsExceptFirst)
                .unwrap()
                .to_string(),
            "M0 0L5 5"
        );
    }

    #[test]
    fn test_reverse_twice() {
        for pd in [
            "M0 0L10 0L10 10Z",
            "M1 2C3 4 5 6 7 8L9 0",
            "M0 0A5 5 0 0 1 10 0L20 20",
            "M0 0L5 5M10 10L20 0L30 10Z",
        ] {
            let abs = to_abs(pd);
            let twice = reverse_path(
                &reverse_path(pd, ReverseMode::Subpaths).unwrap(),
                ReverseMode::Subpaths,
            )
            .unwrap();
            assert_eq!(twice, abs, "Failed for path: {pd}");
        }
    }

    fn to_abs(pd: &str) -> PathArray {
        super::super::to_absolute(pd).unwrap()
    }

    #[test]
    fn test_reverse_curve() {
        let rev = reverse_curve("M0 0C1 1 2 2 3 3C4 4 5 5 6 6").unwrap();
        assert_eq!(rev.to_string(), "M6 6C5 5 4 4 3 3C2 2 1 1 0 0");

        let rev = reverse_curve("M0 0L10 0").unwrap();
        assert!(rev.is_curve());
        assert_eq!(rev.segments()[0].params, vec![10., 0.]);
        assert_eq!(rev.segments()[1].end_point(), Some((0., 0.)));
    }
}

use super::{PathArray, PathSource, Segment};
use crate::errors::Result;
use crate::types::round_to;

/// Reflect a previous control point through the current point, or use the
/// current point itself if there is no control point to reflect.
fn reflect(current: (f64, f64), control: Option<(f64, f64)>) -> (f64, f64) {
    match control {
        Some((cx, cy)) => (2. * current.0 - cx, 2. * current.1 - cy),
        None => current,
    }
}

pub(crate) fn absolute(path: &PathArray) -> PathArray {
    let (mut x, mut y) = (0., 0.);
    let (mut mx, mut my) = (0., 0.);

    path.iter()
        .map(|seg| {
            let abs_cmd = seg.cmd.to_ascii_uppercase();
            let p = &seg.params;
            let params: Vec<f64> = if seg.cmd == abs_cmd {
                p.clone()
            } else {
                match abs_cmd {
                    // only the end point of an arc is relative
                    'A' => vec![p[0], p[1], p[2], p[3], p[4], p[5] + x, p[6] + y],
                    'H' => vec![p[0] + x],
                    'V' => vec![p[0] + y],
                    _ => p
                        .iter()
                        .enumerate()
                        .map(|(j, v)| v + if j % 2 == 1 { y } else { x })
                        .collect(),
                }
            };
            match abs_cmd {
                'Z' => (x, y) = (mx, my),
                'H' => x = params[0],
                'V' => y = params[0],
                _ => {
                    if let [.., ex, ey] = params[..] {
                        (x, y) = (ex, ey);
                    }
                    if abs_cmd == 'M' {
                        (mx, my) = (x, y);
                    }
                }
            }
            Segment::raw(abs_cmd, &params)
        })
        .collect()
}

pub(crate) fn relative(path: &PathArray) -> PathArray {
    let (mut x, mut y) = (0., 0.);
    let (mut mx, mut my) = (0., 0.);

    path.iter()
        .enumerate()
        .map(|(i, seg)| {
            let p = &seg.params;
            if i == 0 {
                // the initial moveto is always kept absolute
                (x, y) = (p[0], p[1]);
                (mx, my) = (x, y);
                return Segment::raw('M', &[x, y]);
            }
            let rel_cmd = seg.cmd.to_ascii_lowercase();
            let params: Vec<f64> = if seg.cmd == rel_cmd {
                p.clone()
            } else {
                match rel_cmd {
                    'a' => vec![p[0], p[1], p[2], p[3], p[4], p[5] - x, p[6] - y],
                    'h' => vec![p[0] - x],
                    'v' => vec![p[0] - y],
                    _ => p
                        .iter()
                        .enumerate()
                        .map(|(j, v)| v - if j % 2 == 1 { y } else { x })
                        .collect(),
                }
            };
            match rel_cmd {
                'z' => (x, y) = (mx, my),
                'h' => x += params[0],
                'v' => y += params[0],
                _ => {
                    if let [.., dx, dy] = params[..] {
                        x += dx;
                        y += dy;
                    }
                    if rel_cmd == 'm' {
                        (mx, my) = (x, y);
                    }
                }
            }
            Segment::raw(rel_cmd, &params)
        })
        .collect()
}

/// Expand shorthand commands from an absolute path.
///
/// `H`/`V` become `L`, `S` becomes `C` and `T` becomes `Q`; reflected
/// control points are only used when the previous command was of the
/// same family.
pub(crate) fn normalized(path: &PathArray) -> PathArray {
    let mut current = (0., 0.);
    let mut subpath_start = (0., 0.);
    // previous second control point, set only after 'C'
    let mut cubic_cp2: Option<(f64, f64)> = None;
    // previous control point, set only after 'Q'
    let mut quadratic_cp: Option<(f64, f64)> = None;

    path.iter()
        .map(|seg| {
            let p = &seg.params;
            let out = match seg.cmd {
                'H' => Segment::raw('L', &[p[0], current.1]),
                'V' => Segment::raw('L', &[current.0, p[0]]),
                'S' => {
                    let (cx, cy) = reflect(current, cubic_cp2);
                    Segment::raw('C', &[cx, cy, p[0], p[1], p[2], p[3]])
                }
                'T' => {
                    let (qx, qy) = reflect(current, quadratic_cp);
                    Segment::raw('Q', &[qx, qy, p[0], p[1]])
                }
                _ => seg.clone(),
            };
            let q = &out.params;
            cubic_cp2 = (out.cmd == 'C').then(|| (q[2], q[3]));
            quadratic_cp = (out.cmd == 'Q').then(|| (q[0], q[1]));
            match out.cmd {
                'Z' => current = subpath_start,
                'M' => {
                    current = (q[0], q[1]);
                    subpath_start = current;
                }
                _ => current = out.end_point().unwrap_or(current),
            }
            out
        })
        .collect()
}

pub(crate) fn rounded(path: &PathArray, decimals: Option<u32>) -> PathArray {
    match decimals {
        None => path.clone(),
        Some(d) => path
            .iter()
            .map(|seg| Segment {
                cmd: seg.cmd,
                params: seg.params.iter().map(|v| round_to(*v, d)).collect(),
            })
            .collect(),
    }
}

/// Split an absolute path into its sub-paths, each starting with a moveto.
pub(crate) fn subpaths(path: &PathArray) -> Vec<PathArray> {
    let mut result: Vec<PathArray> = Vec::new();
    for seg in path {
        match result.last_mut() {
            Some(last) if !seg.cmd.eq_ignore_ascii_case(&'m') => last.push(seg.clone()),
            _ => result.push(PathArray::new(vec![seg.clone()])),
        }
    }
    result
}

/// Convert every segment to absolute (uppercase) form.
pub fn to_absolute<P: PathSource + ?Sized>(path: &P) -> Result<PathArray> {
    Ok(absolute(&path.to_path_array()?))
}

/// Convert every segment after the initial moveto to relative (lowercase) form.
pub fn to_relative<P: PathSource + ?Sized>(path: &P) -> Result<PathArray> {
    Ok(relative(&path.to_path_array()?))
}

/// Convert to absolute form and expand shorthand commands.
pub fn normalize<P: PathSource + ?Sized>(path: &P) -> Result<PathArray> {
    Ok(normalized(&absolute(&path.to_path_array()?)))
}

/// Round each parameter to `decimals` places; `None` leaves values untouched.
pub fn round_path<P: PathSource + ?Sized>(path: &P, decimals: Option<u32>) -> Result<PathArray> {
    Ok(rounded(&path.to_path_array()?, decimals))
}

/// Serialize a path, rounding parameters to `decimals` places first.
pub fn path_to_string<P: PathSource + ?Sized>(path: &P, decimals: Option<u32>) -> Result<String> {
    Ok(rounded(&path.to_path_array()?, decimals).to_string())
}

/// Choose, per segment, whichever of the absolute and relative encodings is shorter.
pub fn optimize<P: PathSource + ?Sized>(path: &P, decimals: Option<u32>) -> Result<PathArray> {
    let path = path.to_path_array()?;
    let abs = rounded(&absolute(&path), decimals);
    let rel = rounded(&relative(&path), decimals);

    Ok(abs
        .into_iter()
        .zip(rel)
        .enumerate()
        .map(|(i, (a, r))| {
            if i == 0 || a.compact_len() < r.compact_len() {
                a
            } else {
                r
            }
        })
        .collect())
}

/// Split a path into independent absolute sub-path strings.
pub fn split_path<P: PathSource + ?Sized>(path: &P, decimals: Option<u32>) -> Result<Vec<String>> {
    let abs = rounded(&absolute(&path.to_path_array()?), decimals);
    Ok(subpaths(&abs).iter().map(|p| p.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(cmd: char, params: &[f64]) -> Segment {
        Segment::raw(cmd, params)
    }

    #[test]
    fn test_to_absolute() {
        let path = PathArray::new(vec![
            seg('M', &[0., 0.]),
            seg('l', &[10., 0.]),
            seg('l', &[0., 10.]),
        ]);
        let abs = to_absolute(&path).unwrap();
        assert_eq!(
            abs.segments(),
            &[
                seg('M', &[0., 0.]),
                seg('L', &[10., 0.]),
                seg('L', &[10., 10.]),
            ]
        );
        assert!(abs.is_absolute());

        for (pd, exp) in [
            ("M10 10h5v5h-5z", "M10 10H15V15H10Z"),
            ("M10 10a5 5 30 0 1 10 10", "M10 10A5 5 30 0 1 20 20"),
            ("M1 1c1 1 2 2 3 3s1 1 2 2", "M1 1C2 2 3 3 4 4S5 5 6 6"),
            ("M0 0l5 5zm2 2l1 1", "M0 0L5 5ZM2 2L3 3"),
            ("M0 0l5 5m2 2l1 1", "M0 0L5 5M7 7L8 8"),
            ("M1 2q1 1 2 0t2 0", "M1 2Q2 3 3 2T5 2"),
        ] {
            assert_eq!(to_absolute(pd).unwrap().to_string(), exp, "Failed for path: {pd}");
        }
    }

    #[test]
    fn test_to_relative() {
        for (pd, exp) in [
            ("M10 10H15V15H10Z", "M10 10h5v5h-5z"),
            ("M10 10A5 5 30 0 1 20 20", "M10 10a5 5 30 0 1 10 10"),
            ("M0 0L5 5ZM2 2L3 3", "M0 0l5 5zm2 2l1 1"),
            ("M1 1C2 2 3 3 4 4", "M1 1c1 1 2 2 3 3"),
            ("M0 0l5 5L10 0", "M0 0l5 5l5 -5"),
        ] {
            let rel = to_relative(pd).unwrap();
            assert!(rel.is_relative(), "Failed for path: {pd}");
            assert_eq!(rel.to_string(), exp, "Failed for path: {pd}");
        }
    }

    #[test]
    fn test_normalize() {
        for (pd, exp) in [
            ("M10 10H20V20", "M10 10L20 10L20 20"),
            // S after C reflects the previous second control point
            ("M0 0C0 10 10 10 10 0S20 -10 20 0", "M0 0C0 10 10 10 10 0C10 -10 20 -10 20 0"),
            // S without a preceding curve uses the current point
            ("M0 0L10 0S20 10 20 0", "M0 0L10 0C10 0 20 10 20 0"),
            ("M0 0Q5 10 10 0T20 0", "M0 0Q5 10 10 0Q15 -10 20 0"),
            ("M0 0T10 0", "M0 0Q0 0 10 0"),
            // T after T keeps reflecting
            ("M0 0Q5 10 10 0T20 0T30 0", "M0 0Q5 10 10 0Q15 -10 20 0Q25 10 30 0"),
            // Z returns the cursor to the sub-path start
            ("M5 5L10 5ZH0", "M5 5L10 5ZL0 5"),
        ] {
            let norm = normalize(pd).unwrap();
            assert!(norm.is_normalized(), "Failed for path: {pd}");
            assert_eq!(norm.to_string(), exp, "Failed for path: {pd}");
        }
    }

    #[test]
    fn test_round_and_stringify() {
        let path = "M0.123456 1.5L2.99999 3";
        assert_eq!(path_to_string(path, Some(4)).unwrap(), "M0.1235 1.5L3 3");
        assert_eq!(path_to_string(path, Some(0)).unwrap(), "M0 2L3 3");
        assert_eq!(path_to_string(path, None).unwrap(), "M0.123456 1.5L2.99999 3");
        let rounded = round_path(path, Some(2)).unwrap();
        assert_eq!(rounded.segments()[0].params, vec![0.12, 1.5]);
    }

    #[test]
    fn test_optimize() {
        let opt = optimize("M100 100L110 110L120 100", Some(4)).unwrap();
        assert_eq!(opt.to_string(), "M100 100l10 10l10 -10");

        let opt = optimize("M50 50l-45 -45L100 100", Some(4)).unwrap();
        assert_eq!(opt.to_string(), "M50 50L5 5l95 95");

        // ties go to the relative form
        let opt = optimize("M0 0L1 1", Some(4)).unwrap();
        assert_eq!(opt.to_string(), "M0 0l1 1");
    }

    #[test]
    fn test_split_path() {
        let parts = split_path("M0 0l10 0m5 5l1 1z M1 1", Some(4)).unwrap();
        assert_eq!(parts, vec!["M0 0L10 0", "M15 5L16 6Z", "M1 1"]);
        let parts = split_path("M0 0L1 1", Some(4)).unwrap();
        assert_eq!(parts, vec!["M0 0L1 1"]);
    }
}

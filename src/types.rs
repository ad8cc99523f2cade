use crate::errors::Result;

/// Return a 'minimal' representation of the given number
///
/// Output matches the shortest round-trip formatting used by JavaScript's
/// `Number.prototype.toString`, so integers never carry a decimal point
/// and `-0` is written as `0`.
pub fn fstr(x: f64) -> String {
    if x == 0. {
        return "0".to_string();
    }
    let mut buf = ryu_js::Buffer::new();
    buf.format(x).to_string()
}

/// Round `x` to `decimals` places, leaving integral values untouched.
///
/// Ties round towards positive infinity.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    if x.fract() == 0. || !x.is_finite() {
        return x;
    }
    let scale = 10f64.powi(decimals as i32);
    (x * scale + 0.5).floor() / scale
}

/// Parse a string to an f64
pub fn strp(s: &str) -> Result<f64> {
    Ok(s.trim().parse()?)
}

/// Returns iterator over whitespace-or-comma separated values
pub fn attr_split(input: &str) -> impl Iterator<Item = String> + '_ {
    input
        .split_whitespace()
        .flat_map(|v| v.split(','))
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fstr() {
        assert_eq!(fstr(1.0), "1");
        assert_eq!(fstr(-100.0), "-100");
        assert_eq!(fstr(1.2345678), "1.2345678");
        assert_eq!(fstr(-0.0), "0");
        assert_eq!(fstr(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(fstr(12345678.0), "12345678");
        assert_eq!(fstr(1e21), "1e+21");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(-1.23455, 2), -1.23);
        assert_eq!(round_to(2.5, 0), 3.);
        assert_eq!(round_to(-2.5, 0), -2.);
        assert_eq!(round_to(10., 0), 10.);
        assert_eq!(round_to(0.33333333, 3), 0.333);
    }

    #[test]
    fn test_strp() {
        assert_eq!(strp("1").ok(), Some(1.));
        assert_eq!(strp(" -100 ").ok(), Some(-100.));
        assert_eq!(strp("-0.00123").ok(), Some(-0.00123));
        assert_eq!(strp("1e3").ok(), Some(1000.));
        assert!(strp("1.2.3").is_err());
        assert!(strp("a").is_err());
    }

    #[test]
    fn test_attr_split() {
        let mut parts = attr_split("0,0 10, 20  30,40");
        assert_eq!(parts.next(), Some("0".to_string()));
        assert_eq!(parts.next(), Some("0".to_string()));
        assert_eq!(parts.next(), Some("10".to_string()));
        assert_eq!(parts.next(), Some("20".to_string()));
        assert_eq!(parts.count(), 2);
    }
}

use crate::errors::{Error, Result};

/// Character-level scanner over path data.
pub struct SvgPathSyntax {
    data: Vec<char>,
    index: usize,
}

impl SvgPathSyntax {
    pub fn new(data: &str) -> Self {
        Self {
            data: data.chars().collect(),
            index: 0,
        }
    }
}

impl PathSyntax for SvgPathSyntax {
    fn current(&self) -> Option<char> {
        self.data.get(self.index).copied()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn index(&self) -> usize {
        self.index
    }
}

fn is_path_space(ch: char) -> bool {
    matches!(
        ch,
        '\u{0A}'
            | '\u{0D}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{20}'
            | '\u{09}'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{A0}'
            | '\u{1680}'
            | '\u{180E}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

fn is_digit_start(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.')
}

pub trait PathSyntax {
    fn current(&self) -> Option<char>;
    fn advance(&mut self);
    fn index(&self) -> usize;

    fn at_end(&self) -> bool {
        self.current().is_none()
    }

    fn error(&self, reason: &str) -> Error {
        Error::syntax(self.index(), reason)
    }

    fn check_not_end(&self) -> Result<char> {
        self.current().ok_or_else(|| self.error("unexpected end of data"))
    }

    fn at_command(&self) -> bool {
        self.current()
            .is_some_and(|c| "MmLlHhVvZzCcSsQqTtAa".contains(c))
    }

    /// True if the current character could begin a number.
    fn at_number(&self) -> bool {
        self.current().is_some_and(is_digit_start)
    }

    fn skip_whitespace(&mut self) {
        while self.current().is_some_and(is_path_space) {
            self.advance();
        }
    }

    /// Skip whitespace and at most one comma; returns true if a comma was skipped.
    fn skip_wsp_comma(&mut self) -> bool {
        self.skip_whitespace();
        if self.current() == Some(',') {
            self.advance();
            self.skip_whitespace();
            true
        } else {
            false
        }
    }

    /// Arc flags are exactly one character, '0' or '1'.
    fn read_flag(&mut self) -> Result<f64> {
        let res = match self.check_not_end()? {
            '0' => 0.,
            '1' => 1.,
            c => return Err(self.error(&format!("invalid arc flag '{c}'"))),
        };
        self.advance();
        Ok(res)
    }

    fn read_number(&mut self) -> Result<f64> {
        let start = self.index();
        let mut s = String::new();
        let mut ch = self.check_not_end()?;
        if ch == '+' || ch == '-' {
            s.push(ch);
            self.advance();
            ch = self.check_not_end()?;
        }
        if !ch.is_ascii_digit() && ch != '.' {
            return Err(self.error(&format!("invalid number start '{ch}'")));
        }

        let mut int_digits = false;
        if ch != '.' {
            let zero_first = ch == '0';
            s.push(ch);
            self.advance();
            if zero_first && self.current().is_some_and(|c| c.is_ascii_digit()) {
                return Err(Error::syntax(start, "illegal number: leading zero"));
            }
            while let Some(c) = self.current().filter(char::is_ascii_digit) {
                s.push(c);
                self.advance();
            }
            int_digits = true;
        }

        let mut frac_digits = false;
        if self.current() == Some('.') {
            s.push('.');
            self.advance();
            while let Some(c) = self.current().filter(char::is_ascii_digit) {
                s.push(c);
                self.advance();
                frac_digits = true;
            }
        }
        if !int_digits && !frac_digits {
            return Err(Error::syntax(start, "invalid number: no digits"));
        }

        if let Some(e @ ('e' | 'E')) = self.current() {
            s.push(e);
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.current() {
                s.push(sign);
                self.advance();
            }
            if !self.current().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error("invalid float exponent"));
            }
            while let Some(c) = self.current().filter(char::is_ascii_digit) {
                s.push(c);
                self.advance();
            }
        }

        s.parse()
            .map_err(|_| Error::syntax(start, format!("invalid number '{s}'")))
    }

    fn read_command(&mut self) -> Result<char> {
        let c = self.check_not_end()?;
        if self.at_command() {
            self.advance();
            self.skip_whitespace();
            Ok(c)
        } else {
            Err(self.error(&format!("invalid path command '{c}'")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ps_number() {
        let mut ps = SvgPathSyntax::new("123 4.5  -9.25");
        assert_eq!(ps.read_number().unwrap(), 123.);
        ps.skip_whitespace();
        assert_eq!(ps.read_number().unwrap(), 4.5);
        ps.skip_whitespace();
        assert_eq!(ps.read_number().unwrap(), -9.25);
        assert!(ps.at_end());

        // numbers may be squished together providing the result is unambiguous
        let mut ps = SvgPathSyntax::new("123-4.5.25+5");
        assert_eq!(ps.read_number().unwrap(), 123.);
        assert_eq!(ps.read_number().unwrap(), -4.5);
        assert_eq!(ps.read_number().unwrap(), 0.25);
        assert_eq!(ps.read_number().unwrap(), 5.);

        let mut ps = SvgPathSyntax::new("1e3 -2E-2 +3.5e+2 1.e2");
        assert_eq!(ps.read_number().unwrap(), 1e3);
        ps.skip_whitespace();
        assert_eq!(ps.read_number().unwrap(), -2e-2);
        ps.skip_whitespace();
        assert_eq!(ps.read_number().unwrap(), 3.5e+2);
        ps.skip_whitespace();
        assert_eq!(ps.read_number().unwrap(), 100.);

        // '1e3.5' is '1e3' followed by '.5'
        let mut ps = SvgPathSyntax::new("1e3.5");
        assert_eq!(ps.read_number().unwrap(), 1e3);
        assert_eq!(ps.read_number().unwrap(), 0.5);
    }

    #[test]
    fn test_ps_number_errors() {
        for data in ["09", "-01", ".", "-.", ".e5", "1e", "1e+", "x", "", "+"] {
            let mut ps = SvgPathSyntax::new(data);
            assert!(ps.read_number().is_err(), "Failed for number: {data}");
        }
        // a lone zero followed by a dot is fine
        let mut ps = SvgPathSyntax::new("0.5");
        assert_eq!(ps.read_number().unwrap(), 0.5);
    }

    #[test]
    fn test_ps_flag() {
        let mut ps = SvgPathSyntax::new("0 1,1 0");
        assert_eq!(ps.read_flag().unwrap(), 0.);
        ps.skip_wsp_comma();
        assert_eq!(ps.read_flag().unwrap(), 1.);
        assert!(ps.skip_wsp_comma());
        assert_eq!(ps.read_flag().unwrap(), 1.);
        assert!(!ps.skip_wsp_comma());
        assert_eq!(ps.read_flag().unwrap(), 0.);

        // whitespace is not required around flags
        let mut ps = SvgPathSyntax::new("01");
        assert_eq!(ps.read_flag().unwrap(), 0.);
        assert_eq!(ps.read_flag().unwrap(), 1.);

        let mut ps = SvgPathSyntax::new("2");
        assert!(ps.read_flag().is_err());
        let mut ps = SvgPathSyntax::new("1.0");
        assert_eq!(ps.read_flag().unwrap(), 1.);
        assert!(ps.read_flag().is_err());
    }

    #[test]
    fn test_ps_whitespace() {
        let mut ps = SvgPathSyntax::new("\u{A0}\u{2003}\t\r\n\u{FEFF}M");
        ps.skip_whitespace();
        assert!(ps.at_command());
        assert_eq!(ps.index(), 6);
    }

    #[test]
    fn test_ps_command() {
        let mut ps = SvgPathSyntax::new("M  l");
        assert_eq!(ps.read_command().unwrap(), 'M');
        assert_eq!(ps.read_command().unwrap(), 'l');
        let mut ps = SvgPathSyntax::new("X");
        assert!(matches!(
            ps.read_command(),
            Err(Error::InvalidPathSyntax { index: 0, .. })
        ));
    }
}

use tracing::debug;

use super::syntax::{PathSyntax, SvgPathSyntax};
use super::{arity, PathArray, Segment};
use crate::errors::{Error, Result};

struct PathParser {
    tokens: SvgPathSyntax,
    segments: Vec<Segment>,
}

impl PathParser {
    fn new(data: &str) -> Self {
        PathParser {
            tokens: SvgPathSyntax::new(data),
            segments: Vec::new(),
        }
    }

    /// Scan a command letter followed by as many complete parameter
    /// groups as follow it.
    fn process_instruction(&mut self) -> Result<()> {
        let command = self.tokens.read_command()?;
        let count = arity(command).unwrap_or_default();
        let is_arc = command.eq_ignore_ascii_case(&'a');

        let mut data = Vec::new();
        if count > 0 {
            loop {
                let mut dangling_comma = false;
                for idx in 0..count {
                    let value = if is_arc && (idx == 3 || idx == 4) {
                        self.tokens.read_flag()?
                    } else {
                        self.tokens.read_number()?
                    };
                    data.push(value);
                    dangling_comma = self.tokens.skip_wsp_comma();
                }
                // "The command letter can be eliminated on subsequent commands if the same
                // command is used multiple times in a row"
                if !self.tokens.at_number() {
                    if dangling_comma {
                        return Err(self.tokens.error("trailing comma"));
                    }
                    break;
                }
            }
        }
        self.finalize(command, data);
        Ok(())
    }

    fn finalize(&mut self, command: char, mut data: Vec<f64>) {
        let mut command = command;
        // "If a moveto is followed by multiple pairs of coordinates,
        // the subsequent pairs are treated as implicit lineto commands."
        if command.eq_ignore_ascii_case(&'m') && data.len() > 2 {
            self.segments.push(Segment::raw(command, &data[..2]));
            data.drain(..2);
            command = if command == 'm' { 'l' } else { 'L' };
        }
        let count = arity(command).unwrap_or_default();
        if count == 0 {
            self.segments.push(Segment::raw(command, &[]));
        } else {
            self.segments
                .extend(data.chunks_exact(count).map(|p| Segment::raw(command, p)));
        }
    }

    fn evaluate(mut self) -> Result<PathArray> {
        self.tokens.skip_whitespace();
        if self.tokens.at_end() {
            return Err(self.tokens.error("empty path data"));
        }
        while !self.tokens.at_end() {
            self.process_instruction()?;
        }
        match self.segments.first_mut() {
            Some(first) if first.cmd.eq_ignore_ascii_case(&'m') => first.cmd = 'M',
            _ => return Err(Error::MissingMoveto),
        }
        Ok(PathArray::new(self.segments))
    }
}

/// Parse path data into a `PathArray`.
///
/// Parsing is all-or-nothing: any syntax error discards every segment
/// scanned so far. On success the first command is always `M`.
pub fn parse_path(data: &str) -> Result<PathArray> {
    PathParser::new(data).evaluate().inspect_err(|e| {
        debug!("path parse failed: {e}");
    })
}

/// Check whether `data` is valid path data, without keeping the result.
pub fn is_valid_path(data: &str) -> bool {
    PathParser::new(data).evaluate().is_ok()
}

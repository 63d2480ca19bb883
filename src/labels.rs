//! Audacity label files: `start<TAB>end<TAB>label` per line, times in
//! seconds. Only the start time is used.

use log::{info, warn};
use std::io::{self, Read};
use thiserror::Error;

/// Anything later than this is almost certainly a typo: it is roughly the
/// length of a 4 GiB file of 44.1kHz 16 bit mono.
pub const MAX_START_SECONDS: f64 = 48_660.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// frame offset into the sample data
    pub sample_index: u32,
    /// raw label bytes, no terminator
    pub text: Vec<u8>,
}

/// Why a line of the label file was skipped. None of these are fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LabelError {
    #[error(
        "is not formatted correctly, it should be \"startTime(sec) \\t endTime(sec) \\t Label\""
    )]
    Malformed,
    #[error("has start time {0} which is outside 0 to {1} seconds")]
    OutOfRange(f64, f64),
    #[error("has start time {0} which is past the last addressable sample")]
    IndexOverflow(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedLine {
    pub line: usize, // 1 based
    pub reason: LabelError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelList {
    pub labels: Vec<Label>,
    pub rejected: Vec<RejectedLine>,
}

pub struct LabelParser {
    sample_rate: u32,
    max_start_seconds: f64,
}

impl LabelParser {
    pub fn new(sample_rate: u32) -> LabelParser {
        LabelParser {
            sample_rate,
            max_start_seconds: MAX_START_SECONDS,
        }
    }

    pub fn with_max_start_seconds(mut self, max: f64) -> LabelParser {
        self.max_start_seconds = max;
        self
    }

    pub fn parse<R: Read>(&self, mut source: R) -> io::Result<LabelList> {
        info!("Reading label file.");

        let mut bytes = vec![];
        source.read_to_end(&mut bytes)?;

        let mut list = LabelList::default();
        for (idx, line) in Lines::new(&bytes).enumerate() {
            match self.parse_line(line) {
                Ok(Some(label)) => list.labels.push(label),
                Ok(None) => (),
                Err(reason) => {
                    warn!("Line {} in label file {}", idx + 1, reason);
                    list.rejected.push(RejectedLine {
                        line: idx + 1,
                        reason,
                    });
                }
            }
        }

        info!("Read {} cue locations from label file.", list.labels.len());
        Ok(list)
    }

    /// `Ok(None)` for blank lines.
    pub fn parse_line(
        &self,
        line: &[u8],
    ) -> Result<Option<Label>, LabelError> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let mut fields = line.splitn(3, |&b| b == b'\t');
        let start = fields
            .next()
            .and_then(parse_seconds)
            .ok_or(LabelError::Malformed)?;
        // end time has to be there but isn't used
        fields
            .next()
            .and_then(parse_seconds)
            .ok_or(LabelError::Malformed)?;
        let text = fields
            .next()
            .filter(|t| !t.is_empty())
            .ok_or(LabelError::Malformed)?;

        if !(0.0..=self.max_start_seconds).contains(&start) {
            return Err(LabelError::OutOfRange(start, self.max_start_seconds));
        }

        // cue positions count frames, so the channel count doesn't matter
        let index = (start * f64::from(self.sample_rate)).floor();
        if index > f64::from(u32::MAX) {
            return Err(LabelError::IndexOverflow(start));
        }

        Ok(Some(Label {
            sample_index: index as u32,
            text: text.to_vec(),
        }))
    }
}

fn parse_seconds(field: &[u8]) -> Option<f64> {
    std::str::from_utf8(field)
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
}

/// Splits on LF, CR or CRLF, mixed freely.
struct Lines<'a> {
    rest: &'a [u8],
}

impl<'a> Lines<'a> {
    fn new(bytes: &'a [u8]) -> Lines<'a> {
        Lines { rest: bytes }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.rest.is_empty() {
            return None;
        }

        let rest = self.rest;
        match rest.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                let crlf = rest[i] == b'\r' && rest.get(i + 1) == Some(&b'\n');
                self.rest = &rest[i + if crlf { 2 } else { 1 }..];
                Some(&rest[..i])
            }
            None => {
                self.rest = &[];
                Some(rest)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &[u8]) -> LabelList {
        LabelParser::new(44100).parse(text).unwrap()
    }

    fn label(sample_index: u32, text: &str) -> Label {
        Label {
            sample_index,
            text: text.as_bytes().to_vec(),
        }
    }

    #[test]
    fn single_label() {
        let list = parse(b"0.5\t0.5\tmid\n");
        assert_eq!(list.labels, vec![label(22050, "mid")]);
        assert!(list.rejected.is_empty());
    }

    #[test]
    fn no_trailing_newline() {
        let list = parse(b"0.0\t0.1\ta\n1.0\t1.1\tbb");
        assert_eq!(list.labels, vec![label(0, "a"), label(44100, "bb")]);
    }

    #[test]
    fn line_endings_are_interchangeable() {
        let lf = parse(b"0.0\t0.1\tone\n2.5\t2.5\ttwo\n3\t4\tthree\n");
        let crlf = parse(b"0.0\t0.1\tone\r\n2.5\t2.5\ttwo\r\n3\t4\tthree\r\n");
        let cr = parse(b"0.0\t0.1\tone\r2.5\t2.5\ttwo\r3\t4\tthree\r");
        let mixed = parse(b"0.0\t0.1\tone\r\n2.5\t2.5\ttwo\r3\t4\tthree\n");

        assert_eq!(lf.labels.len(), 3);
        assert_eq!(lf, crlf);
        assert_eq!(lf, cr);
        assert_eq!(lf, mixed);
        assert!(cr.labels.iter().all(|l| !l.text.contains(&b'\r')));
    }

    #[test]
    fn start_time_is_floored() {
        let parser = LabelParser::new(1000);
        let l = parser.parse_line(b"0.9999\t1\tx").unwrap().unwrap();
        assert_eq!(l.sample_index, 999);
    }

    #[test]
    fn label_text_is_verbatim() {
        let list = parse(b"1\t2\t  spaced\ttabbed \\n \xff\n");
        assert_eq!(list.labels[0].text, b"  spaced\ttabbed \\n \xff".to_vec());
    }

    #[test]
    fn long_labels_are_accepted() {
        let text = "x".repeat(2000);
        let line = format!("1\t1\t{}", text);
        let list = parse(line.as_bytes());
        assert_eq!(list.labels[0].text.len(), 2000);
    }

    #[test]
    fn late_start_is_skipped() {
        let list = parse(b"48700.0\t48700.1\tlate\n1.0\t1.0\tok\n");
        assert_eq!(list.labels, vec![label(44100, "ok")]);
        assert_eq!(
            list.rejected,
            vec![RejectedLine {
                line: 1,
                reason: LabelError::OutOfRange(48700.0, MAX_START_SECONDS),
            }]
        );
    }

    #[test]
    fn cap_is_inclusive_and_configurable() {
        assert_eq!(parse(b"48660\t0\tedge\n").labels.len(), 1);

        let parser = LabelParser::new(44100).with_max_start_seconds(10.0);
        assert!(parser.parse_line(b"10\t10\tok").unwrap().is_some());
        assert!(parser.parse_line(b"10.5\t11\tlate").is_err());
    }

    #[test]
    fn negative_start_is_skipped() {
        let list = parse(b"-1\t0\tneg\n");
        assert!(list.labels.is_empty());
        assert_eq!(list.rejected.len(), 1);
    }

    #[test]
    fn index_must_fit() {
        let parser = LabelParser::new(192_000);
        assert_eq!(
            parser.parse_line(b"48000\t48000\thuge"),
            Err(LabelError::IndexOverflow(48000.0))
        );
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let list = parse(
            b"abc\t1\tbad start\n\
              1\tx\tbad end\n\
              2\t2\n\
              3\t3\t\n\
              \\\t1000\t2000\n\
              4\t4\tgood\n",
        );

        assert_eq!(list.labels, vec![label(176_400, "good")]);
        let lines: Vec<_> = list.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4, 5]);
        assert!(list
            .rejected
            .iter()
            .all(|r| r.reason == LabelError::Malformed));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let list = parse(b"\n1\t1\ta\n\n  \r\n2\t2\tb\n\n");
        assert_eq!(list.labels.len(), 2);
        assert!(list.rejected.is_empty());
    }

    #[test]
    fn whitespace_around_times() {
        let list = parse(b" 1.5 \t 2 \tpadded\n");
        assert_eq!(list.labels, vec![label(66150, "padded")]);
    }
}

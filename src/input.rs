//! Validated console input.
//!
//! Every prompt keeps asking until it gets a value that passes validation, and
//! says exactly what was wrong with each rejected line.

use chrono::NaiveDate;
use std::io::{BufRead, Write};
use thiserror::Error;

/// Dates are typed as `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Invalid number format. Try again.")]
    NotANumber,

    #[error("Value must be >= {0}")]
    BelowMinimum(i32),

    #[error("Value must be <= {0}")]
    AboveMaximum(i32),

    #[error("Invalid date format. Use YYYY-MM-DD (e.g. 2025-11-16).")]
    BadDate,

    #[error("Field cannot be empty.")]
    Empty,

    #[error("Input stream closed")]
    Closed,

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Optional inclusive limits for an integer prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl Bounds {
    pub const fn at_least(min: i32) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn between(min: i32, max: i32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

/// Grades and grade thresholds.
pub const GRADE: Bounds = Bounds::between(0, 100);
/// Identities are positive.
pub const IDENTITY: Bounds = Bounds::at_least(1);

pub fn parse_bounded_int(raw: &str, bounds: Bounds) -> Result<i32, InputError> {
    let value: i32 = raw.trim().parse().map_err(|_| InputError::NotANumber)?;
    if let Some(min) = bounds.min {
        if value < min {
            return Err(InputError::BelowMinimum(min));
        }
    }
    if let Some(max) = bounds.max {
        if value > max {
            return Err(InputError::AboveMaximum(max));
        }
    }
    Ok(value)
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, InputError> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    // Enforce the zero-padded shape; chrono alone would also take "2025-1-1".
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(InputError::BadDate);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| InputError::BadDate)
}

pub fn parse_non_empty(raw: &str) -> Result<String, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(trimmed.to_string())
}

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Prints a full line.
    pub fn say(&mut self, message: &str) -> Result<(), InputError> {
        writeln!(self.writer, "{message}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Reads one raw line, without its line ending. EOF is `Closed`.
    pub fn line(&mut self, prompt: &str) -> Result<String, InputError> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;

        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Err(InputError::Closed);
        }
        let trimmed_len = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(trimmed_len);
        Ok(buf)
    }

    pub fn int(&mut self, prompt: &str, bounds: Bounds) -> Result<i32, InputError> {
        self.retry(prompt, |raw| parse_bounded_int(raw, bounds))
    }

    pub fn date(&mut self, prompt: &str) -> Result<NaiveDate, InputError> {
        self.retry(prompt, parse_date)
    }

    /// A trimmed, non-empty line.
    pub fn text(&mut self, prompt: &str) -> Result<String, InputError> {
        self.retry(prompt, parse_non_empty)
    }

    fn retry<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> Result<T, InputError> {
        loop {
            let raw = self.line(prompt)?;
            match parse(&raw) {
                Ok(value) => return Ok(value),
                Err(rejected) => self.say(&rejected.to_string())?,
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn scripted(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    pub(crate) fn output(prompter: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(prompter.writer()).into_owned()
    }

    #[test]
    fn bounded_int_accepts_values_in_range() {
        assert_eq!(parse_bounded_int(" 42 ", GRADE).unwrap(), 42);
        assert_eq!(parse_bounded_int("0", GRADE).unwrap(), 0);
        assert_eq!(parse_bounded_int("100", GRADE).unwrap(), 100);
        assert_eq!(parse_bounded_int("-5", Bounds::default()).unwrap(), -5);
    }

    #[test]
    fn bounded_int_rejections_are_specific() {
        assert!(matches!(
            parse_bounded_int("abc", GRADE),
            Err(InputError::NotANumber)
        ));
        assert!(matches!(
            parse_bounded_int("150", GRADE),
            Err(InputError::AboveMaximum(100))
        ));
        assert!(matches!(
            parse_bounded_int("0", IDENTITY),
            Err(InputError::BelowMinimum(1))
        ));
        assert!(matches!(
            parse_bounded_int("99999999999", Bounds::default()),
            Err(InputError::NotANumber)
        ));
    }

    #[test]
    fn int_prompt_retries_until_valid() {
        let mut prompter = scripted("abc\n150\n-1\n85\n");
        let grade = prompter.int("Grade (0-100): ", GRADE).unwrap();
        assert_eq!(grade, 85);

        let out = output(&prompter);
        assert_eq!(out.matches("Grade (0-100): ").count(), 4);
        assert!(out.contains("Invalid number format. Try again."));
        assert!(out.contains("Value must be <= 100"));
        assert!(out.contains("Value must be >= 0"));
    }

    #[test]
    fn date_requires_the_fixed_format() {
        assert_eq!(
            parse_date("2025-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        for bad in ["2025-1-1", "01-01-2025", "2025/01/01", "2025-02-30", "", "tomorrow"] {
            assert!(matches!(parse_date(bad), Err(InputError::BadDate)), "{bad}");
        }
    }

    #[test]
    fn date_prompt_shows_format_hint() {
        let mut prompter = scripted("16.11.2025\n2025-11-16\n");
        let date = prompter.date("Start date (YYYY-MM-DD): ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 11, 16).unwrap());
        assert!(output(&prompter).contains("Use YYYY-MM-DD"));
    }

    #[test]
    fn text_prompt_rejects_blank_lines_and_trims() {
        let mut prompter = scripted("\n   \n  Ivan Lapin \n");
        assert_eq!(prompter.text("Student name: ").unwrap(), "Ivan Lapin");
        assert_eq!(output(&prompter).matches("Field cannot be empty.").count(), 2);
    }

    #[test]
    fn raw_line_keeps_inner_content_and_drops_line_ending() {
        let mut prompter = scripted(" %Ivan% \r\n");
        assert_eq!(prompter.line("pattern: ").unwrap(), " %Ivan% ");
    }

    #[test]
    fn end_of_input_is_closed() {
        let mut prompter = scripted("abc\n");
        assert!(matches!(
            prompter.int("Count: ", IDENTITY),
            Err(InputError::Closed)
        ));
    }
}

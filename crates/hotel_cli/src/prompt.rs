//! Line-oriented prompts with re-prompt on invalid input.
//!
//! # Invariants
//! - A field is asked again until its parser accepts the line.
//! - End of input is reported as `PromptError::Closed`, never as a field error.
//! - Interactive sessions read through `Terminal`; any `BufRead` works in tests.

use hotel_core::form::{self, FieldError};
use hotel_core::CalendarDate;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

#[derive(Debug)]
pub enum PromptError {
    /// Input reached end of file or was interrupted.
    Closed,
    Io(io::Error),
    Terminal(ReadlineError),
}

impl Display for PromptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "input closed"),
            Self::Io(err) => write!(f, "terminal I/O failed: {err}"),
            Self::Terminal(err) => write!(f, "line editor failed: {err}"),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Closed => None,
            Self::Io(err) => Some(err),
            Self::Terminal(err) => Some(err),
        }
    }
}

impl From<io::Error> for PromptError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ReadlineError> for PromptError {
    fn from(value: ReadlineError) -> Self {
        match value {
            ReadlineError::Eof | ReadlineError::Interrupted => Self::Closed,
            other => Self::Terminal(other),
        }
    }
}

pub type PromptResult<T> = Result<T, PromptError>;

/// Where prompted lines come from.
pub trait LineSource {
    /// Shows `label` and reads one line without its line ending.
    /// Returns `None` at end of input.
    fn read_line(&mut self, label: &str, output: &mut dyn Write) -> PromptResult<Option<String>>;
}

impl<R: BufRead> LineSource for R {
    fn read_line(&mut self, label: &str, output: &mut dyn Write) -> PromptResult<Option<String>> {
        write!(output, "{label}")?;
        output.flush()?;
        let mut buffer = String::new();
        if BufRead::read_line(self, &mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Line editor over the controlling terminal, with in-session history.
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> PromptResult<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, label: &str, output: &mut dyn Write) -> PromptResult<Option<String>> {
        output.flush()?;
        match self.editor.readline(label) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: LineSource, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prints `label` and returns the next raw line without its line ending.
    pub fn line(&mut self, label: &str) -> PromptResult<String> {
        self.input
            .read_line(label, &mut self.output)?
            .ok_or(PromptError::Closed)
    }

    /// Asks for a value until `parse` accepts it.
    pub fn ask<T>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T, FieldError>,
    ) -> PromptResult<T> {
        loop {
            let raw = self.line(label)?;
            match parse(&raw) {
                Ok(value) => return Ok(value),
                Err(err) => self.reject(&err)?,
            }
        }
    }

    /// Asks for year, month and day separately, repeating all three on error.
    pub fn ask_date(&mut self, field: &'static str, label: &str) -> PromptResult<CalendarDate> {
        loop {
            writeln!(self.output, "{label}")?;
            let year = self.line("\tyear: ")?;
            let month = self.line("\tmonth: ")?;
            let day = self.line("\tday: ")?;
            match form::parse_date_parts(field, &year, &month, &day) {
                Ok(date) => return Ok(date),
                Err(err) => self.reject(&err)?,
            }
        }
    }

    fn reject(&mut self, err: &FieldError) -> PromptResult<()> {
        writeln!(self.output, "Invalid input: {err}. Please try again.")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PromptError, Prompter};
    use rustyline::error::ReadlineError;
    use hotel_core::calendar::DateComponent;
    use hotel_core::form;
    use hotel_core::{DateError, FieldError};
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn ask_reprompts_until_value_parses() {
        let mut prompter = prompter("abc\n\n42\n");
        let value = prompter
            .ask("Hotel ID: ", |raw| form::parse_positive("hotel id", raw))
            .unwrap();
        assert_eq!(value, 42);

        let transcript = String::from_utf8(prompter.output().clone()).unwrap();
        assert_eq!(transcript.matches("Hotel ID: ").count(), 3);
        assert_eq!(transcript.matches("Please try again").count(), 2);
    }

    #[test]
    fn ask_date_repeats_all_components_after_zero_day() {
        let mut prompter = prompter("2024\n2\n0\n2024\n2\n29\n");
        let date = prompter.ask_date("booking date", "Booking date").unwrap();
        assert_eq!(date.to_string(), "2024-02-29");

        let transcript = String::from_utf8(prompter.output().clone()).unwrap();
        let missing_day = FieldError::Date {
            field: "booking date",
            source: DateError::MissingField(DateComponent::Day),
        };
        assert!(transcript.contains(&missing_day.to_string()));
    }

    #[test]
    fn end_of_input_is_closed() {
        let mut prompter = prompter("x\n");
        let err = prompter
            .ask("Room: ", |raw| form::parse_integer("room", raw))
            .unwrap_err();
        assert!(matches!(err, PromptError::Closed));
    }

    #[test]
    fn line_strips_crlf() {
        let mut prompter = prompter("Smith\r\n");
        assert_eq!(prompter.line("Last name: ").unwrap(), "Smith");
    }

    #[test]
    fn readline_end_and_interrupt_close_the_prompt() {
        assert!(matches!(
            PromptError::from(ReadlineError::Eof),
            PromptError::Closed
        ));
        assert!(matches!(
            PromptError::from(ReadlineError::Interrupted),
            PromptError::Closed
        ));
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert!(matches!(
            PromptError::from(ReadlineError::Io(io)),
            PromptError::Terminal(_)
        ));
    }
}

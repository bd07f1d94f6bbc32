//! Interactive date session.
//!
//! Reads a count followed by that many `day month year` triples from any
//! [`BufRead`], then writes the entered dates, the weekday of the first one,
//! the day differences from the first date and the sorted list to any
//! [`Write`]. Tokens are whitespace separated and may span lines.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::{Date, DateError, Weekday};

/// Error type for a date session. Any error aborts the whole session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The requested number of dates was zero or negative.
    #[error("The number of dates must be greater than zero (got {0}).")]
    InvalidCount(i64),

    /// A day/month/year triple did not name a real date.
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    /// A token could not be read as an integer.
    #[error("Expected an integer but found {0:?}")]
    MalformedInput(String),

    /// Input ended before a required value.
    #[error("Input ended while reading the {0}")]
    UnexpectedEof(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Options for a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Write prompt text before each value is read
    pub prompts: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { prompts: true }
    }
}

/// Everything the report shows besides the dates as entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Weekday of the first date, present only when more than one date was given
    pub first_weekday: Option<Weekday>,
    /// Day difference from date 1 to each of dates 2..=N
    pub differences: Vec<i64>,
    /// All dates in ascending order
    pub sorted: Vec<Date>,
}

/// Computes the comparisons and ordering reported for a list of dates
pub fn summarize(dates: &[Date]) -> Summary {
    let (first_weekday, differences) = match dates {
        [first, rest @ ..] if !rest.is_empty() => (
            Some(first.day_of_week()),
            rest.iter().map(|d| first.difference_in_days(d)).collect(),
        ),
        _ => (None, Vec::new()),
    };

    let mut sorted = dates.to_vec();
    // Stable, so equal dates keep their input order
    sorted.sort();

    Summary {
        first_weekday,
        differences,
        sorted,
    }
}

/// Whitespace separated tokens pulled from a reader one line at a time
struct Tokens<R> {
    reader:  R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    const fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }

    fn next_int<T: FromStr>(&mut self, what: &'static str) -> Result<T, SessionError> {
        let token = self
            .next_token()?
            .ok_or(SessionError::UnexpectedEof(what))?;
        token
            .parse::<T>()
            .map_err(|_| SessionError::MalformedInput(token))
    }
}

/// A single run of the date session over an input and an output stream
pub struct Session<R, W> {
    tokens:  Tokens<R>,
    out:     W,
    options: SessionOptions,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub const fn new(input: R, output: W, options: SessionOptions) -> Self {
        Self {
            tokens: Tokens::new(input),
            out: output,
            options,
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        if self.options.prompts {
            write!(self.out, "{text}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Reads the date count and then each date.
    ///
    /// # Errors
    /// Fails on a non-positive count, a token that is not an integer, early
    /// end of input, or the first triple that is not a valid date.
    pub fn collect_dates(&mut self) -> Result<Vec<Date>, SessionError> {
        self.prompt("Enter the number of dates to process: ")?;
        let count: i64 = self.tokens.next_int("number of dates")?;
        if count <= 0 {
            return Err(SessionError::InvalidCount(count));
        }
        debug!(count, "reading dates");

        let mut dates = Vec::new();
        for index in 1..=count {
            self.prompt(&format!("\nEnter date {index}:\n"))?;
            self.prompt("Day: ")?;
            let day: i32 = self.tokens.next_int("day")?;
            self.prompt("Month: ")?;
            let month: i32 = self.tokens.next_int("month")?;
            self.prompt("Year: ")?;
            let year: i32 = self.tokens.next_int("year")?;

            let date = Date::new(day, month, year)?;
            debug!(index, %date, "accepted date");
            dates.push(date);
        }
        Ok(dates)
    }

    /// Writes the entered dates, comparisons against the first date, and the
    /// sorted dates.
    ///
    /// # Errors
    /// Fails only if writing to the output fails.
    pub fn report(&mut self, dates: &[Date]) -> Result<(), SessionError> {
        let summary = summarize(dates);

        writeln!(self.out, "\nEntered dates:")?;
        for date in dates {
            writeln!(self.out, "{date}")?;
        }

        if let Some(weekday) = summary.first_weekday {
            writeln!(self.out, "\nDay of the week for the first date: {weekday}")?;
            for (offset, diff) in summary.differences.iter().enumerate() {
                writeln!(
                    self.out,
                    "Difference in days between date 1 and date {}: {diff}",
                    offset + 2
                )?;
            }
        }

        writeln!(self.out, "\nSorted dates:")?;
        for date in &summary.sorted {
            writeln!(self.out, "{date}")?;
        }
        Ok(())
    }

    /// Collects the dates and writes the report. Nothing is reported if
    /// collection fails.
    ///
    /// # Errors
    /// Returns the first error hit while reading or writing.
    pub fn run(&mut self) -> Result<(), SessionError> {
        let dates = self.collect_dates()?;
        self.report(&dates)?;
        info!(count = dates.len(), "session complete");
        Ok(())
    }

    /// Reports the outcome of [`Session::run`] and always writes the closing
    /// line. Consumes the session, releasing the input, and hands back the
    /// output stream.
    ///
    /// # Errors
    /// Fails only if writing to the output fails.
    pub fn finish(mut self, result: Result<(), SessionError>) -> io::Result<W> {
        if let Err(err) = result {
            warn!(error = %err, "session aborted");
            // Prompts end without a newline
            if self.options.prompts {
                writeln!(self.out)?;
            }
            writeln!(self.out, "Error: {err}")?;
        }
        writeln!(self.out, "Program finished.")?;
        self.out.flush()?;
        Ok(self.out)
    }
}

//! Reader for the T5 tab-delimited sector format.
//!
//! See <https://travellermap.com/doc/fileformats#t5-tab-delimited-format>.
//! The first non-blank line is the header; every later line is one world.

use std::collections::HashMap;
use std::io::{BufRead, Lines};

use crate::error::{IngestError, Result};

/// One data line, keyed by header column
#[derive(Debug, Clone)]
pub struct TabRow {
    /// 1-based line number in the source
    pub line: usize,
    fields: HashMap<String, String>,
}

impl TabRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// A column the row cannot be used without
    pub fn required(&self, column: &'static str) -> Result<&str> {
        self.get(column)
            .ok_or(IngestError::MissingColumn { column })
    }

    /// A column that defaults to the empty string when absent
    pub fn optional(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }
}

/// Streams [`TabRow`]s from a tab-delimited source
pub struct TabReader<R> {
    lines: Lines<R>,
    header: Vec<String>,
    line_number: usize,
}

impl<R: BufRead> TabReader<R> {
    /// Read the header line. An empty source yields a reader with no rows.
    pub fn new(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let mut line_number = 0;
        let mut header = Vec::new();

        for line in lines.by_ref() {
            let line = line?;
            line_number += 1;
            let line = clean_line(&line);
            if line.trim().is_empty() {
                continue;
            }
            header = line
                .trim_start_matches('\u{feff}')
                .split('\t')
                .map(|c| c.trim().to_string())
                .collect();
            break;
        }

        Ok(Self {
            lines,
            header,
            line_number,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }
}

impl<R: BufRead> Iterator for TabReader<R> {
    type Item = Result<TabRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            let line = clean_line(&line);
            if line.trim().is_empty() {
                continue;
            }

            // Short rows leave trailing columns absent; extra fields are dropped
            let fields = self
                .header
                .iter()
                .cloned()
                .zip(line.split('\t').map(str::to_string))
                .collect();

            return Some(Ok(TabRow {
                line: self.line_number,
                fields,
            }));
        }
    }
}

fn clean_line(line: &str) -> &str {
    line.trim_end_matches('\r')
}

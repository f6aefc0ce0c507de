//! An iterator over the contig records of a contig report.

use std::io::BufRead;

use crate::report::Line;
use crate::report::Reader;
use crate::report::alignment;
use crate::report::contig;
use crate::report::contig::Element;
use crate::report::line::CONTIG_PREFIX;
use crate::report::reader;

/// The state of the [`Contigs`] iterator.
#[derive(Debug, Eq, PartialEq)]
enum State {
    /// No header has been read yet.
    BeforeHeader,

    /// The last row read closed a contig record (or was the header).
    InBetweenContigs,

    /// Rows of a contig record are being collected.
    ReadingContig,

    /// A row of the current contig record was invalid: every row up to and
    /// including the next contig summary is dropped.
    Skipping,

    /// The underlying reader is exhausted or failed.
    Done,
}

/// An error related to the parsing of contig records.
#[derive(Debug)]
pub enum ParseError {
    /// A row was found before the header.
    MissingHeader(usize),

    /// A second header was found.
    DuplicateHeader(usize),

    /// The file ended before the summary of the last contig record.
    AbruptEnd,

    /// An alignment row could not be parsed.
    InvalidAlignment(alignment::ParseError, usize),

    /// There was an issue reading from the underlying reader.
    Reader(reader::Error),
}

impl ParseError {
    /// Returns whether no more records can be read after the error.
    ///
    /// Only I/O errors are fatal: every other error drops the contig record
    /// it occurred in.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::Reader(reader::Error::Io(_)))
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingHeader(line_no) => {
                write!(f, "found a row before the header: line {line_no}")
            }
            ParseError::DuplicateHeader(line_no) => {
                write!(f, "found a second header: line {line_no}")
            }
            ParseError::AbruptEnd => write!(
                f,
                "the file abruptly ended in the middle of a contig record"
            ),
            ParseError::InvalidAlignment(err, line_no) => {
                write!(f, "invalid alignment at line {line_no}: {err}")
            }
            ParseError::Reader(err) => write!(f, "reader error: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An iterator that traverses the contig records while keeping track of the
/// current state of the reader.
#[derive(Debug)]
pub struct Contigs<'a, T>
where
    T: BufRead,
{
    /// The underlying reader.
    reader: &'a mut Reader<T>,

    /// The current state.
    state: State,

    /// The number of the last line read.
    line_no: usize,

    /// The line buffer.
    buffer: String,

    /// The columns named by the header.
    columns: Option<alignment::Columns>,

    /// The rows of the contig record being collected.
    elements: Vec<Element>,
}

impl<'a, T> Contigs<'a, T>
where
    T: BufRead,
{
    /// Creates a new iterator at the start of a report.
    pub(crate) fn new(reader: &'a mut Reader<T>) -> Self {
        Self {
            reader,
            state: State::BeforeHeader,
            line_no: 0,
            buffer: String::new(),
            columns: None,
            elements: Vec::new(),
        }
    }

    /// Gets the state to return to once a contig record is closed.
    fn idle(&self) -> State {
        match self.columns {
            Some(_) => State::InBetweenContigs,
            None => State::BeforeHeader,
        }
    }

    /// Drops the contig record being collected after an error on `line`.
    fn recover(&mut self, line: &Line) {
        self.elements.clear();

        self.state = match line {
            Line::Contig(_) => self.idle(),
            _ => State::Skipping,
        };
    }
}

impl<T> Iterator for Contigs<'_, T>
where
    T: BufRead,
{
    type Item = Result<contig::Record, Box<ParseError>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state == State::Done {
                return None;
            }

            // (1) Reads the current line. I/O errors end the iteration, while
            // unparseable lines only drop the contig record they belong to.
            let line = match self.reader.read_line(&mut self.buffer) {
                Ok(line) => line,
                Err(err @ reader::Error::Io(_)) => {
                    self.state = State::Done;
                    return Some(Err(Box::new(ParseError::Reader(err))));
                }
                Err(err) => {
                    self.line_no += 1;

                    if self.state == State::Skipping {
                        continue;
                    }

                    // An unparseable summary still closes its record.
                    self.elements.clear();
                    self.state = match self.buffer.starts_with(CONTIG_PREFIX) {
                        true => self.idle(),
                        false => State::Skipping,
                    };

                    return Some(Err(Box::new(ParseError::Reader(err))));
                }
            };

            self.line_no += 1;

            // (2) Checks to see if the line read returned a result. If it did
            // not, we either exit gracefully (in the case that we are between
            // contig records) or error out (in the case that we are in the
            // middle of reading one).
            let line = match line {
                Some(line) => line,
                None => {
                    let state = std::mem::replace(&mut self.state, State::Done);

                    return match state {
                        State::ReadingContig => {
                            self.elements.clear();
                            Some(Err(Box::new(ParseError::AbruptEnd)))
                        }
                        _ => None,
                    };
                }
            };

            // (3) Rows of a dropped contig record are ignored up to and
            // including its summary.
            if self.state == State::Skipping {
                if let Line::Contig(_) = line {
                    self.state = self.idle();
                }

                continue;
            }

            // (4) Performs the associated action given the line and the
            // current state.
            let result = match (&line, self.columns.as_ref()) {
                (Line::Empty, _) => Ok(None),
                (Line::Header(_), Some(_)) => Err(ParseError::DuplicateHeader(self.line_no)),
                (Line::Header(columns), None) => {
                    self.columns = Some(columns.clone());
                    self.state = State::InBetweenContigs;
                    Ok(None)
                }
                (_, None) => Err(ParseError::MissingHeader(self.line_no)),
                (Line::Alignment(fields), Some(columns)) => {
                    match alignment::Record::try_from_fields(columns, fields) {
                        Ok(record) => {
                            self.elements.push(Element::Alignment(record));
                            self.state = State::ReadingContig;
                            Ok(None)
                        }
                        Err(err) => Err(ParseError::InvalidAlignment(err, self.line_no)),
                    }
                }
                (Line::Misassembly(description), Some(_)) => {
                    self.elements.push(Element::Misassembly(description.clone()));
                    self.state = State::ReadingContig;
                    Ok(None)
                }
                (Line::Contig(summary), Some(_)) => {
                    let elements = std::mem::take(&mut self.elements);
                    self.state = State::InBetweenContigs;
                    Ok(Some(contig::Record::new(summary.clone(), elements)))
                }
            };

            // (5) Returns a closed contig record or an error, if any.
            match result {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(err) => {
                    self.recover(&line);
                    return Some(Err(Box::new(err)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    const HEADER: &str = "S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\n";

    fn reader(data: &str) -> Reader<io::Cursor<Vec<u8>>> {
        Reader::new(io::Cursor::new(data.as_bytes().to_vec()))
    }

    #[test]
    fn test_valid_contigs() -> Result<(), Box<dyn std::error::Error>> {
        let data = format!(
            "{HEADER}1\t600\t1\t600\tchr1\tNODE_1\t99.5\tFalse\nrelocation, inconsistency = \
             4400\n5001\t5400\t601\t1000\tchr1\tNODE_1\t99.1\tFalse\nCONTIG\tNODE_1\t1000\t\
             misassembled\n\nCONTIG\tNODE_2\t700\tunaligned\n"
        );

        let mut reader = reader(&data);
        let records = reader.contigs().collect::<Result<Vec<_>, _>>()?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), "NODE_1");
        assert_eq!(records[0].elements().len(), 3);
        assert_eq!(records[0].alignments().count(), 2);
        assert_eq!(records[1].name(), "NODE_2");
        assert!(records[1].elements().is_empty());

        Ok(())
    }

    #[test]
    fn test_rows_before_the_header() {
        let data = "1\t100\t1\t100\tchr1\tNODE_1\t99.5\tFalse\nCONTIG\tNODE_1\t100\tcorrect\n";

        let mut reader = reader(data);
        let mut contigs = reader.contigs();

        let err = contigs.next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "found a row before the header: line 1");
        assert!(!err.is_fatal());
        assert!(contigs.next().is_none());
    }

    #[test]
    fn test_duplicate_header() {
        let data = format!("{HEADER}{HEADER}CONTIG\tNODE_1\t100\tunaligned\n");

        let mut reader = reader(&data);
        let mut contigs = reader.contigs();

        let err = contigs.next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "found a second header: line 2");
        assert!(contigs.next().is_none());
    }

    #[test]
    fn test_abrupt_end() {
        let data = format!("{HEADER}1\t100\t1\t100\tchr1\tNODE_1\t99.5\tFalse\n");

        let mut reader = reader(&data);
        let mut contigs = reader.contigs();

        let err = contigs.next().unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "the file abruptly ended in the middle of a contig record"
        );
        assert!(contigs.next().is_none());
    }

    #[test]
    fn it_recovers_after_an_invalid_alignment() {
        let data = format!(
            "{HEADER}1\t100\t1\t100\tchr1\tNODE_1\thigh\tFalse\nCONTIG\tNODE_1\t100\tcorrect\n\
             1\t50\t1\t50\tchr1\tNODE_2\t99.0\tFalse\nCONTIG\tNODE_2\t50\tcorrect\n"
        );

        let mut reader = reader(&data);
        let mut contigs = reader.contigs();

        let err = contigs.next().unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid alignment at line 2: invalid identity: invalid float literal"
        );

        let record = contigs.next().unwrap().unwrap();
        assert_eq!(record.name(), "NODE_2");
        assert!(contigs.next().is_none());
    }

    #[test]
    fn it_recovers_after_an_invalid_summary() {
        let data = format!(
            "{HEADER}inversion\nCONTIG\tNODE_1\tmany\tcorrect\nCONTIG\tNODE_2\t50\tunaligned\n"
        );

        let mut reader = reader(&data);
        let mut contigs = reader.contigs();

        let err = contigs.next().unwrap().unwrap_err();
        assert!(matches!(*err, ParseError::Reader(reader::Error::Line(_))));

        let record = contigs.next().unwrap().unwrap();
        assert_eq!(record.name(), "NODE_2");
        assert!(contigs.next().is_none());
    }

    #[test]
    fn it_stops_on_io_errors() {
        let err = ParseError::Reader(reader::Error::Io(io::Error::other("closed")));
        assert!(err.is_fatal());
        assert!(!ParseError::AbruptEnd.is_fatal());
    }
}

//! A contig report reader.

use std::io;
use std::io::BufRead;

use crate::report::Line;
use crate::report::contigs::Contigs;
use crate::report::line;

/// The byte order mark some tools write at the start of a report.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A line error.
    Line(line::ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Line(err) => write!(f, "line error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A contig report reader.
#[derive(Debug)]
pub struct Reader<T>
where
    T: BufRead,
{
    /// The underlying reader.
    inner: T,

    /// Whether nothing was read yet.
    fresh: bool,
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a contig report reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\n";
    /// let reader = icarus::report::Reader::new(&data[..]);
    /// ```
    pub fn new(inner: T) -> Self {
        Self { inner, fresh: true }
    }

    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consumes `self` and returns the underlying reader.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Attempts to read the next [`Line`].
    ///
    /// The raw text of the line (without its line ending) is left in
    /// `buffer`. [`None`] is returned at the end of the input.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::report::Line;
    ///
    /// let data = "\u{feff}S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\r\n\ninversion\n";
    /// let mut reader = icarus::report::Reader::new(data.as_bytes());
    ///
    /// let mut buffer = String::new();
    /// assert!(matches!(reader.read_line(&mut buffer)?, Some(Line::Header(_))));
    /// assert!(buffer.starts_with("S1"));
    /// assert!(matches!(reader.read_line(&mut buffer)?, Some(Line::Empty)));
    /// assert_eq!(
    ///     reader.read_line(&mut buffer)?,
    ///     Some(Line::Misassembly(String::from("inversion")))
    /// );
    /// assert!(reader.read_line(&mut buffer)?.is_none());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_line(&mut self, buffer: &mut String) -> Result<Option<Line>, Error> {
        buffer.clear();

        if self.inner.read_line(buffer).map_err(Error::Io)? == 0 {
            return Ok(None);
        }

        let end = buffer.trim_end_matches(['\n', '\r']).len();
        buffer.truncate(end);

        if std::mem::replace(&mut self.fresh, false) && buffer.starts_with(BYTE_ORDER_MARK) {
            buffer.drain(..BYTE_ORDER_MARK.len_utf8());
        }

        buffer.parse::<Line>().map(Some).map_err(Error::Line)
    }

    /// Returns an iterator over the contig records in the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\n\
    ///     1\t100\t1\t100\tchr1\tNODE_1\t99.5\tFalse\n\
    ///     CONTIG\tNODE_1\t100\tcorrect\n";
    /// let mut reader = icarus::report::Reader::new(&data[..]);
    ///
    /// let records = reader
    ///     .contigs()
    ///     .map(|result| result.unwrap())
    ///     .collect::<Vec<_>>();
    /// assert_eq!(records.len(), 1);
    /// assert_eq!(records[0].name(), "NODE_1");
    /// ```
    pub fn contigs(&mut self) -> Contigs<'_, T> {
        Contigs::new(self)
    }
}

impl<T> From<T> for Reader<T>
where
    T: BufRead,
{
    fn from(inner: T) -> Self {
        Self::new(inner)
    }
}

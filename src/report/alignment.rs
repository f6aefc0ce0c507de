//! Alignment rows of a contig report.

use std::num::ParseFloatError;
use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;

use crate::reference;
use crate::report::line::DELIMITER;

/// The value of the ambiguity and best-group columns for a set flag.
const TRUE: &str = "True";

////////////////////////////////////////////////////////////////////////////////////////
// Columns
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to parsing the [`Columns`] of a header line.
#[derive(Debug, Eq, PartialEq)]
pub enum ParseColumnsError {
    /// A required column was not named by the header.
    MissingColumn(&'static str),
}

impl std::fmt::Display for ParseColumnsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseColumnsError::MissingColumn(name) => write!(f, "missing column: {name}"),
        }
    }
}

impl std::error::Error for ParseColumnsError {}

/// The positions of the columns of alignment rows, as named by the header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Columns {
    /// The names of every column in order.
    names: Vec<String>,

    /// The reference start.
    s1: usize,

    /// The reference end.
    e1: usize,

    /// The contig start.
    s2: usize,

    /// The contig end.
    e2: usize,

    /// The reference sequence name.
    reference: usize,

    /// The contig name.
    contig: usize,

    /// The percent identity.
    idy: usize,

    /// The ambiguity flag.
    ambiguous: usize,

    /// Whether the alignment belongs to the best set (optional).
    best: Option<usize>,
}

impl Columns {
    /// Gets the names of the columns.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl std::fmt::Display for Columns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names.join("\t"))
    }
}

impl FromStr for Columns {
    type Err = ParseColumnsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let names = s.split(DELIMITER).map(String::from).collect::<Vec<_>>();
        let find = |name: &'static str| {
            names
                .iter()
                .position(|n| n == name)
                .ok_or(ParseColumnsError::MissingColumn(name))
        };

        Ok(Self {
            s1: find("S1")?,
            e1: find("E1")?,
            s2: find("S2")?,
            e2: find("E2")?,
            reference: find("Reference")?,
            contig: find("Contig")?,
            idy: find("IDY")?,
            ambiguous: find("Ambiguous")?,
            best: find("Best_group").ok(),
            names,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Records
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to parsing an alignment [`Record`].
#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// A field named by the header was missing from the row.
    MissingField(&'static str),

    /// A position could not be parsed.
    InvalidPosition(&'static str, ParseIntError),

    /// The percent identity could not be parsed.
    InvalidIdentity(ParseFloatError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingField(name) => write!(f, "missing field: {name}"),
            ParseError::InvalidPosition(name, err) => write!(f, "invalid {name}: {err}"),
            ParseError::InvalidIdentity(err) => write!(f, "invalid identity: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// A [`Result`](std::result::Result) with a [`ParseError`].
type Result<T> = std::result::Result<T, ParseError>;

/// An alignment of a contig to a reference sequence.
///
/// Positions are 1-based and inclusive, exactly as written in the report.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The name of the reference sequence.
    reference: String,

    /// The reference start (`S1`).
    reference_start: Number,

    /// The reference end (`E1`).
    reference_end: Number,

    /// The name of the contig.
    contig: String,

    /// The contig start (`S2`).
    contig_start: Number,

    /// The contig end (`E2`).
    contig_end: Number,

    /// The percent identity.
    identity: f64,

    /// Whether the contig has multiple equally good alignments.
    ambiguous: bool,

    /// Whether the alignment belongs to the best set of alignments.
    best: bool,
}

impl Record {
    /// Attempts to parse a record from the raw fields of an alignment line.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::report::alignment::Columns;
    /// use icarus::report::alignment::Record;
    ///
    /// let columns = "S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous".parse::<Columns>()?;
    /// let fields = ["4000", "3001", "1", "1000", "chr1", "NODE_7", "98.21", "False"];
    /// let record = Record::try_from_fields(&columns, &fields)?;
    ///
    /// assert_eq!(record.contig(), "NODE_7");
    /// assert_eq!(record.reference_start(), 4000);
    /// assert!(record.is_reverse());
    /// assert!(!record.is_ambiguous());
    /// assert!(record.is_best());
    ///
    /// let span = record.span();
    /// assert_eq!(span.start(), 3001);
    /// assert!(!span.is_forward());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_from_fields<S: AsRef<str>>(columns: &Columns, fields: &[S]) -> Result<Self> {
        let get = |index: usize, name: &'static str| {
            fields
                .get(index)
                .map(|field| field.as_ref().trim())
                .ok_or(ParseError::MissingField(name))
        };

        let position = |index: usize, name: &'static str| {
            get(index, name)?
                .parse::<Number>()
                .map_err(|err| ParseError::InvalidPosition(name, err))
        };

        let flag = |index: usize, name: &'static str| get(index, name).map(|value| value == TRUE);

        Ok(Self {
            reference: get(columns.reference, "Reference")?.to_string(),
            reference_start: position(columns.s1, "S1")?,
            reference_end: position(columns.e1, "E1")?,
            contig: get(columns.contig, "Contig")?.to_string(),
            contig_start: position(columns.s2, "S2")?,
            contig_end: position(columns.e2, "E2")?,
            identity: get(columns.idy, "IDY")?
                .parse::<f64>()
                .map_err(ParseError::InvalidIdentity)?,
            ambiguous: flag(columns.ambiguous, "Ambiguous")?,
            best: match columns.best {
                Some(index) => flag(index, "Best_group")?,
                None => true,
            },
        })
    }

    /// Gets the name of the reference sequence.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Gets the reference start as written.
    pub fn reference_start(&self) -> Number {
        self.reference_start
    }

    /// Gets the reference end as written.
    pub fn reference_end(&self) -> Number {
        self.reference_end
    }

    /// Gets the name of the contig.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Gets the contig start as written.
    pub fn contig_start(&self) -> Number {
        self.contig_start
    }

    /// Gets the contig end as written.
    pub fn contig_end(&self) -> Number {
        self.contig_end
    }

    /// Gets the lower contig position.
    pub fn start_in_contig(&self) -> Number {
        self.contig_start.min(self.contig_end)
    }

    /// Gets the higher contig position.
    pub fn end_in_contig(&self) -> Number {
        self.contig_start.max(self.contig_end)
    }

    /// Gets the percent identity.
    pub fn identity(&self) -> f64 {
        self.identity
    }

    /// Returns whether the contig has multiple equally good alignments.
    pub fn is_ambiguous(&self) -> bool {
        self.ambiguous
    }

    /// Returns whether the alignment belongs to the best set of alignments.
    pub fn is_best(&self) -> bool {
        self.best
    }

    /// Returns whether the contig aligns as its reverse complement.
    pub fn is_reverse(&self) -> bool {
        (self.reference_start > self.reference_end) != (self.contig_start > self.contig_end)
    }

    /// Gets the reference side of the alignment.
    pub fn span(&self) -> reference::Span {
        let strand = if self.is_reverse() {
            Strand::Negative
        } else {
            Strand::Positive
        };

        reference::Span::new(
            self.reference.clone(),
            self.reference_start,
            self.reference_end,
            strand,
        )
    }
}

//! A line within a contig report.

use std::str::FromStr;

use crate::report::alignment;
use crate::report::contig;

/// The delimiter between the fields of a line.
pub const DELIMITER: char = '\t';

/// The prefix of a contig summary line.
pub const CONTIG_PREFIX: &str = "CONTIG";

/// The minimum number of fields of an alignment (or header) line.
///
/// Shorter lines are misassembly descriptions.
pub const MIN_ALIGNMENT_FIELDS: usize = 5;

/// The column that marks the header line.
const HEADER_MARKER: &str = "S1";

/// An error associated with parsing a line of a contig report.
#[derive(Debug)]
pub enum ParseError {
    /// An invalid header line.
    InvalidHeader(alignment::ParseColumnsError, String),

    /// An invalid contig summary line.
    InvalidContig(contig::ParseError, String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidHeader(err, line) => {
                write!(f, "invalid header: {err}\n\nline: {line}")
            }
            ParseError::InvalidContig(err, line) => {
                write!(f, "invalid contig summary: {err}\n\nline: {line}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A line within a contig report.
///
/// Alignment lines are kept as raw fields: they can only be interpreted with
/// the columns named by the header.
#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    /// An empty line.
    Empty,

    /// The header line naming the columns.
    Header(alignment::Columns),

    /// A contig summary line closing a contig record.
    Contig(contig::Summary),

    /// A misassembly description.
    Misassembly(String),

    /// The raw fields of an alignment line.
    Alignment(Vec<String>),
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Empty => write!(f, ""),
            Line::Header(columns) => write!(f, "{columns}"),
            Line::Contig(summary) => write!(f, "{summary}"),
            Line::Misassembly(description) => write!(f, "{description}"),
            Line::Alignment(fields) => write!(f, "{}", fields.join("\t")),
        }
    }
}

impl FromStr for Line {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::Empty);
        }

        let fields = s.split(DELIMITER).collect::<Vec<_>>();

        if fields[0] == CONTIG_PREFIX {
            s.parse::<contig::Summary>()
                .map(Line::Contig)
                .map_err(|e| ParseError::InvalidContig(e, s.into()))
        } else if fields.len() < MIN_ALIGNMENT_FIELDS {
            Ok(Line::Misassembly(s.trim().to_string()))
        } else if fields.contains(&HEADER_MARKER) {
            s.parse::<alignment::Columns>()
                .map(Line::Header)
                .map_err(|e| ParseError::InvalidHeader(e, s.into()))
        } else {
            Ok(Line::Alignment(
                fields.into_iter().map(String::from).collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::SegmentType;

    #[test]
    fn test_valid_lines() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("".parse::<Line>()?, Line::Empty);
        assert_eq!(" \t ".parse::<Line>()?, Line::Empty);

        let line = "S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\tBest_group".parse::<Line>()?;
        assert!(matches!(line, Line::Header(_)));

        let line = "CONTIG\tNODE_1\t1500\tmisassembled".parse::<Line>()?;
        match line {
            Line::Contig(summary) => {
                assert_eq!(summary.name(), "NODE_1");
                assert_eq!(summary.size(), 1500);
                assert_eq!(summary.kind(), SegmentType::Misassembled);
            }
            _ => panic!("expected a contig summary"),
        }

        let line = "relocation, inconsistency = 1383".parse::<Line>()?;
        assert_eq!(
            line,
            Line::Misassembly(String::from("relocation, inconsistency = 1383"))
        );

        let line = "1\t100\t1\t100\tchr1\tNODE_1\t99.9\tFalse".parse::<Line>()?;
        assert!(matches!(line, Line::Alignment(ref fields) if fields.len() == 8));
        assert_eq!(line.to_string(), "1\t100\t1\t100\tchr1\tNODE_1\t99.9\tFalse");

        Ok(())
    }

    #[test]
    fn test_invalid_lines() {
        let err = "S1\tE1\tS2\tE2\tReference\tIDY".parse::<Line>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid header: missing column: Contig\n\nline: S1\tE1\tS2\tE2\tReference\tIDY"
        );

        let err = "CONTIG\tNODE_1\t1500".parse::<Line>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid contig summary: invalid number of fields: expected 4 fields, found 3 \
             fields\n\nline: CONTIG\tNODE_1\t1500"
        );
    }
}

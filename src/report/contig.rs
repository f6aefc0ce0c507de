//! Contig records of a contig report.

use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::position::Number;

use crate::block::ParseSegmentTypeError;
use crate::block::SegmentType;
use crate::report::alignment;
use crate::report::line::CONTIG_PREFIX;
use crate::report::line::DELIMITER;
use crate::structure::Gap;
use crate::structure::Segment;

/// The number of fields in a contig summary line.
const NUM_SUMMARY_FIELDS: usize = 4;

/// The fraction of a contig that must be covered by its last alignment for
/// the contig to have no trailing unaligned stretch.
const TRAILING_COVERAGE: f64 = 0.95;

////////////////////////////////////////////////////////////////////////////////////////
// Summaries
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to parsing a contig [`Summary`].
#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The line did not have the expected number of fields.
    IncorrectNumberOfFields(usize),

    /// The line did not begin with the contig prefix.
    InvalidPrefix(String),

    /// The contig size could not be parsed.
    InvalidSize(ParseIntError),

    /// The contig type could not be parsed.
    InvalidType(ParseSegmentTypeError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields: expected {NUM_SUMMARY_FIELDS} fields, found {fields} \
                 fields"
            ),
            ParseError::InvalidPrefix(prefix) => write!(f, "invalid prefix: {prefix}"),
            ParseError::InvalidSize(err) => write!(f, "invalid size: {err}"),
            ParseError::InvalidType(err) => write!(f, "invalid type: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// The summary line that closes a contig record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Summary {
    /// The name.
    name: String,

    /// The size in bases.
    size: Number,

    /// The declared type.
    kind: SegmentType,
}

impl Summary {
    /// Creates a new summary.
    pub fn new(name: impl Into<String>, size: Number, kind: SegmentType) -> Self {
        Self {
            name: name.into(),
            size,
            kind,
        }
    }

    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the size in bases.
    pub fn size(&self) -> Number {
        self.size
    }

    /// Gets the declared type.
    pub fn kind(&self) -> SegmentType {
        self.kind
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{CONTIG_PREFIX}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.name, self.size, self.kind
        )
    }
}

impl FromStr for Summary {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split(DELIMITER).map(str::trim).collect::<Vec<_>>();

        if fields.len() != NUM_SUMMARY_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(fields.len()));
        }

        if fields[0] != CONTIG_PREFIX {
            return Err(ParseError::InvalidPrefix(fields[0].to_string()));
        }

        let size = fields[2].parse::<Number>().map_err(ParseError::InvalidSize)?;
        let kind = fields[3]
            .parse::<SegmentType>()
            .map_err(ParseError::InvalidType)?;

        Ok(Self::new(fields[1], size, kind))
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Records
////////////////////////////////////////////////////////////////////////////////////////

/// A row owned by a contig record.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// An alignment row.
    Alignment(alignment::Record),

    /// A misassembly description.
    Misassembly(String),
}

/// A contig record: a summary and every row reported since the previous
/// summary.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The summary.
    summary: Summary,

    /// The rows in report order.
    elements: Vec<Element>,
}

impl Record {
    /// Creates a new record.
    pub fn new(summary: Summary, elements: Vec<Element>) -> Self {
        Self { summary, elements }
    }

    /// Gets the summary.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Gets the name.
    pub fn name(&self) -> &str {
        self.summary.name()
    }

    /// Gets the size in bases.
    pub fn size(&self) -> Number {
        self.summary.size()
    }

    /// Gets the declared type.
    pub fn kind(&self) -> SegmentType {
        self.summary.kind()
    }

    /// Gets the rows in report order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Gets the alignments in report order.
    pub fn alignments(&self) -> impl Iterator<Item = &alignment::Record> {
        self.elements.iter().filter_map(|element| match element {
            Element::Alignment(record) => Some(record),
            Element::Misassembly(_) => None,
        })
    }

    /// Returns whether the contig has multiple equally good alignments.
    pub fn is_ambiguous(&self) -> bool {
        self.kind() == SegmentType::Ambiguous
            || self
                .alignments()
                .any(|record| record.is_best() && record.is_ambiguous())
    }

    /// Converts the rows into the segments of the contig.
    ///
    /// Only alignments of the best set are kept. The segments are in contig
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::block::SegmentType;
    /// use icarus::report::alignment::Columns;
    /// use icarus::report::alignment::Record as Alignment;
    /// use icarus::report::contig::Element;
    /// use icarus::report::contig::Record;
    /// use icarus::report::contig::Summary;
    /// use icarus::structure::Gap;
    /// use icarus::structure::misassembly::Kind;
    /// use icarus::structure::segment;
    ///
    /// let columns = "S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous".parse::<Columns>()?;
    /// let first = ["1", "600", "1", "600", "chr1", "NODE_1", "99.0", "False"];
    /// let second = ["5001", "5400", "601", "1000", "chr1", "NODE_1", "99.0", "False"];
    ///
    /// let record = Record::new(
    ///     Summary::new("NODE_1", 1000, SegmentType::Misassembled),
    ///     vec![
    ///         Element::Alignment(Alignment::try_from_fields(&columns, &first)?),
    ///         Element::Misassembly(String::from("relocation, inconsistency = 4400")),
    ///         Element::Alignment(Alignment::try_from_fields(&columns, &second)?),
    ///     ],
    /// );
    ///
    /// let segments = record.segments();
    /// assert_eq!(segments.len(), 3);
    /// assert!(segments[0].is_aligned());
    /// assert_eq!(
    ///     segments[1].kind(),
    ///     &segment::Kind::Gap(Gap::Misassembly(Kind::Relocation))
    /// );
    /// assert_eq!((segments[1].start(), segments[1].end()), (600, 601));
    /// assert!(segments[2].is_aligned());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut misassemblies: Vec<&str> = Vec::new();
        let mut previous: Option<Number> = None;

        for element in &self.elements {
            let record = match element {
                Element::Misassembly(description) => {
                    misassemblies.push(description);
                    continue;
                }
                Element::Alignment(record) if record.is_best() => record,
                Element::Alignment(_) => continue,
            };

            let start = record.start_in_contig();
            let end = record.end_in_contig();
            let last = previous.unwrap_or_default();

            for description in misassemblies.drain(..) {
                segments.push(Segment::gap(
                    Gap::from_description(description),
                    last.min(start),
                    last.max(start),
                ));
            }

            if start > last + 1 {
                let stretch = match previous {
                    Some(_) => Segment::gap(Gap::Skip, last + 1, start - 1),
                    None => Segment::unaligned(last + 1, start - 1),
                };

                segments.push(stretch);
            }

            segments.push(
                Segment::aligned(start, end, record.span()).with_identity(record.identity()),
            );
            previous = Some(end);
        }

        let last = previous.unwrap_or_default();

        for description in misassemblies.drain(..) {
            segments.push(Segment::gap(Gap::from_description(description), last, last));
        }

        if (last as f64) < TRAILING_COVERAGE * self.size() as f64 {
            segments.push(Segment::unaligned(last + 1, self.size()));
        }

        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::alignment::Columns;
    use crate::structure::misassembly;
    use crate::structure::segment::Kind;

    fn alignment(fields: [&str; 8]) -> Element {
        aligned(fields, "True")
    }

    fn aligned(fields: [&str; 8], best: &str) -> Element {
        let columns = "S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\tBest_group"
            .parse::<Columns>()
            .unwrap();

        let mut fields = fields.map(String::from).to_vec();
        fields.push(String::from(best));

        Element::Alignment(alignment::Record::try_from_fields(&columns, &fields).unwrap())
    }

    #[test]
    fn test_summaries() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let summary = "CONTIG\tNODE_2\t4500\tambiguous".parse::<Summary>()?;
        assert_eq!(summary, Summary::new("NODE_2", 4500, SegmentType::Ambiguous));
        assert_eq!(summary.to_string(), "CONTIG\tNODE_2\t4500\tambiguous");

        let err = "CONTIG\tNODE_2\tbig\tcorrect".parse::<Summary>().unwrap_err();
        assert_eq!(err.to_string(), "invalid size: invalid digit found in string");

        let err = "CONTIG\tNODE_2\t10\tgreat".parse::<Summary>().unwrap_err();
        assert_eq!(err.to_string(), "invalid type: invalid segment type: great");

        let err = "SCAFFOLD\tNODE_2\t10\tcorrect".parse::<Summary>().unwrap_err();
        assert_eq!(err.to_string(), "invalid prefix: SCAFFOLD");

        Ok(())
    }

    #[test]
    fn it_adds_unaligned_stretches_at_both_ends() {
        let record = Record::new(
            Summary::new("NODE_1", 1000, SegmentType::Correct),
            vec![alignment(["1", "500", "101", "600", "chr1", "NODE_1", "99.0", "False"])],
        );

        let segments = record.segments();
        assert_eq!(segments.len(), 3);

        assert_eq!(segments[0].kind(), &Kind::Unaligned);
        assert_eq!((segments[0].start(), segments[0].end()), (1, 100));

        assert!(segments[1].is_aligned());
        assert_eq!(segments[1].identity(), Some(99.0));

        assert_eq!(segments[2].kind(), &Kind::Unaligned);
        assert_eq!((segments[2].start(), segments[2].end()), (601, 1000));
    }

    #[test]
    fn it_skips_between_alignments() {
        let record = Record::new(
            Summary::new("NODE_1", 1000, SegmentType::Correct),
            vec![
                alignment(["1", "500", "1", "500", "chr1", "NODE_1", "99.0", "False"]),
                alignment(["503", "1000", "503", "1000", "chr1", "NODE_1", "99.0", "False"]),
            ],
        );

        let segments = record.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].kind(), &Kind::Gap(Gap::Skip));
        assert_eq!((segments[1].start(), segments[1].end()), (501, 502));
    }

    #[test]
    fn it_keeps_trailing_misassemblies_and_drops_extra_alignments() {
        let extra = aligned(
            ["1", "10", "1", "10", "chr1", "NODE_1", "90.0", "True"],
            "False",
        );

        let record = Record::new(
            Summary::new("NODE_1", 960, SegmentType::Misassembled),
            vec![
                alignment(["1", "960", "1", "960", "chr1", "NODE_1", "99.0", "False"]),
                extra,
                Element::Misassembly(String::from("inversion")),
            ],
        );

        let segments = record.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[1].kind(),
            &Kind::Gap(Gap::Misassembly(misassembly::Kind::Inversion))
        );
        assert_eq!((segments[1].start(), segments[1].end()), (960, 960));

        // The extra alignment is ambiguous but not part of the best set.
        assert!(!record.is_ambiguous());
    }

    #[test]
    fn it_treats_unaligned_contigs_as_a_single_stretch() {
        let record = Record::new(Summary::new("NODE_9", 700, SegmentType::Unaligned), Vec::new());

        let segments = record.segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind(), &Kind::Unaligned);
        assert_eq!((segments[0].start(), segments[0].end()), (1, 700));
    }
}

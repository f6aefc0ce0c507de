//! Reference sequences and the corrected coordinate line.
//!
//! In the alignment layout, the reference sequences are laid end-to-end in
//! report order. The position of a reference base on that line is its
//! 1-based position within the sequence plus the cumulative length of every
//! sequence before it (its _offset_).

use std::collections::HashMap;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;

use crate::core::Extent;
use crate::core::Position;
use crate::filter;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to [`References`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A reference sequence was added more than once.
    Duplicate(String),

    /// A reference sequence had a length of zero.
    EmptySequence(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Duplicate(name) => write!(f, "duplicate reference sequence: {name}"),
            Error::EmptySequence(name) => write!(f, "empty reference sequence: {name}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Spans
////////////////////////////////////////////////////////////////////////////////////////

/// The reference side of an alignment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Span {
    /// The name of the reference sequence.
    name: String,

    /// The 1-based start position within the reference sequence.
    start: Number,

    /// The 1-based end position within the reference sequence.
    end: Number,

    /// The orientation of the contig relative to the reference.
    strand: Strand,
}

impl Span {
    /// Creates a new reference span.
    ///
    /// The endpoints are reordered if needed; the orientation of the
    /// alignment is carried by `strand` alone.
    pub fn new(name: impl Into<String>, start: Number, end: Number, strand: Strand) -> Self {
        Self {
            name: name.into(),
            start: start.min(end),
            end: start.max(end),
            strand,
        }
    }

    /// Gets the name of the reference sequence.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the start position.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end position.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the orientation of the alignment.
    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    /// Returns whether the contig aligns to the forward strand.
    pub fn is_forward(&self) -> bool {
        self.strand == Strand::Positive
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// References
////////////////////////////////////////////////////////////////////////////////////////

/// A reference sequence placed on the corrected coordinate line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reference {
    /// The name.
    name: String,

    /// The length.
    length: Number,

    /// The cumulative length of every preceding reference sequence.
    offset: Number,
}

impl Reference {
    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the length.
    pub fn length(&self) -> Number {
        self.length
    }

    /// Gets the offset on the corrected coordinate line.
    pub fn offset(&self) -> Number {
        self.offset
    }

    /// Gets the extent covered by the sequence on the corrected coordinate
    /// line.
    pub fn extent(&self) -> Extent {
        Extent::new(
            self.offset as Position,
            (self.offset + self.length) as Position,
        )
    }

    /// Projects a 1-based position of the sequence onto the corrected
    /// coordinate line.
    pub fn correct(&self, position: Number) -> Position {
        (self.offset + position) as Position
    }
}

impl filter::Span for Reference {
    fn span(&self) -> (Position, Position) {
        let extent = self.extent();
        (extent.start(), extent.end())
    }
}

/// The ordered set of reference sequences.
#[derive(Clone, Debug, Default)]
pub struct References {
    /// The sequences in order.
    inner: Vec<Reference>,

    /// The index of each sequence by name.
    index: HashMap<String, usize>,
}

impl References {
    /// Adds a reference sequence after every sequence added so far.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::reference::References;
    ///
    /// let mut references = References::default();
    /// references.push("chr1", 1000)?;
    /// references.push("chr2", 500)?;
    ///
    /// assert_eq!(references.total_length(), 1500);
    /// assert_eq!(references.get("chr2").unwrap().offset(), 1000);
    /// assert_eq!(references.get("chr2").unwrap().correct(10), 1010.0);
    /// assert!(references.push("chr1", 10).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn push(&mut self, name: impl Into<String>, length: Number) -> Result<()> {
        let name = name.into();

        if self.index.contains_key(&name) {
            return Err(Error::Duplicate(name));
        }

        if length == 0 {
            return Err(Error::EmptySequence(name));
        }

        let offset = self.total_length();
        self.index.insert(name.clone(), self.inner.len());
        self.inner.push(Reference {
            name,
            length,
            offset,
        });

        Ok(())
    }

    /// Attempts to build the references from `(name, length)` pairs.
    pub fn try_from_iter<I, S>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Number)>,
        S: Into<String>,
    {
        let mut references = Self::default();

        for (name, length) in iter {
            references.push(name, length)?;
        }

        Ok(references)
    }

    /// Gets a reference sequence by name.
    pub fn get(&self, name: &str) -> Option<&Reference> {
        self.index.get(name).map(|i| &self.inner[*i])
    }

    /// Returns whether a reference sequence exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Gets the total length of the corrected coordinate line.
    pub fn total_length(&self) -> Number {
        self.inner
            .last()
            .map(|reference| reference.offset + reference.length)
            .unwrap_or_default()
    }

    /// Gets the number of reference sequences.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether there are no reference sequences.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Gets the reference sequences in order.
    pub fn as_slice(&self) -> &[Reference] {
        &self.inner
    }

    /// Projects a reference span onto the corrected coordinate line.
    pub fn correct(&self, span: &Span) -> Option<Extent> {
        let reference = self.get(span.name())?;
        Some(Extent::new(
            reference.correct(span.start()),
            reference.correct(span.end()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_places_references_end_to_end() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let references = References::try_from_iter([("chr1", 100), ("chr2", 50), ("chr3", 25)])?;

        assert_eq!(references.len(), 3);
        assert_eq!(references.total_length(), 175);

        let offsets = references
            .as_slice()
            .iter()
            .map(|reference| reference.offset())
            .collect::<Vec<_>>();
        assert_eq!(offsets, vec![0, 100, 150]);

        let span = Span::new("chr3", 20, 5, Strand::Negative);
        assert_eq!(span.start(), 5);
        assert_eq!(references.correct(&span), Some(Extent::new(155.0, 170.0)));

        let span = Span::new("chrUn", 1, 2, Strand::Positive);
        assert_eq!(references.correct(&span), None);

        Ok(())
    }

    #[test]
    fn it_rejects_duplicate_and_empty_sequences() {
        let err = References::try_from_iter([("chr1", 100), ("chr1", 50)]).unwrap_err();
        assert_eq!(err.to_string(), "duplicate reference sequence: chr1");

        let err = References::try_from_iter([("chr1", 0)]).unwrap_err();
        assert_eq!(err.to_string(), "empty reference sequence: chr1");
    }
}

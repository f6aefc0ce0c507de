//! Raw segments of a contig, as handed to the
//! [`Resolver`](crate::structure::Resolver).

use omics::coordinate::position::Number;

use crate::block::EndSide;
use crate::reference;
use crate::structure::misassembly;

/// The classification of the junction recorded between two alignments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Gap {
    /// The junction is not a misassembly (e.g., a `fake` misassembly).
    Correct,

    /// A stretch of the contig skipped between two alignments.
    Skip,

    /// A misassembly.
    Misassembly(misassembly::Kind),
}

impl Gap {
    /// Classifies a misassembly description.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::structure::misassembly::Kind;
    /// use icarus::structure::segment::Gap;
    ///
    /// assert_eq!(
    ///     Gap::from_description("inversion"),
    ///     Gap::Misassembly(Kind::Inversion)
    /// );
    /// assert_eq!(Gap::from_description("fake: not a misassembly"), Gap::Correct);
    /// ```
    pub fn from_description(description: &str) -> Self {
        match misassembly::Kind::from_description(description) {
            Some(kind) => Gap::Misassembly(kind),
            None => Gap::Correct,
        }
    }
}

/// The kind of a segment.
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    /// An alignment to the reference.
    Aligned(reference::Span),

    /// A stretch of the contig without any alignment.
    Unaligned,

    /// A junction between two alignments.
    Gap(Gap),
}

/// A segment of a contig.
///
/// Coordinates are 1-based and relative to the contig. A segment with `start
/// > end` is malformed and is skipped by the resolver.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// The kind.
    kind: Kind,

    /// The start within the contig.
    start: Number,

    /// The end within the contig.
    end: Number,

    /// An explicit broken end.
    side: Option<EndSide>,

    /// The percent identity of the alignment.
    identity: Option<f64>,
}

impl Segment {
    /// Creates a new segment.
    pub fn new(kind: Kind, start: Number, end: Number) -> Self {
        Self {
            kind,
            start,
            end,
            side: None,
            identity: None,
        }
    }

    /// Creates an aligned segment.
    pub fn aligned(start: Number, end: Number, reference: reference::Span) -> Self {
        Self::new(Kind::Aligned(reference), start, end)
    }

    /// Creates an unaligned segment.
    pub fn unaligned(start: Number, end: Number) -> Self {
        Self::new(Kind::Unaligned, start, end)
    }

    /// Creates a junction segment.
    pub fn gap(gap: Gap, start: Number, end: Number) -> Self {
        Self::new(Kind::Gap(gap), start, end)
    }

    /// Sets an explicit broken end.
    pub fn with_side(mut self, side: EndSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Sets the percent identity.
    pub fn with_identity(mut self, identity: f64) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Gets the kind.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Gets the start within the contig.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end within the contig.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the width within the contig.
    pub fn width(&self) -> Number {
        self.end.saturating_sub(self.start)
    }

    /// Gets the explicit broken end.
    pub fn side(&self) -> Option<EndSide> {
        self.side
    }

    /// Gets the percent identity.
    pub fn identity(&self) -> Option<f64> {
        self.identity
    }

    /// Gets the reference side, if this is an aligned segment.
    pub fn reference(&self) -> Option<&reference::Span> {
        match &self.kind {
            Kind::Aligned(span) => Some(span),
            _ => None,
        }
    }

    /// Returns whether this is an aligned segment.
    pub fn is_aligned(&self) -> bool {
        matches!(self.kind, Kind::Aligned(_))
    }
}

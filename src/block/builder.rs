//! A builder for a [`Block`].

use omics::coordinate::position::Number;

use crate::block::Block;
use crate::block::EndSide;
use crate::block::Id;
use crate::block::SegmentType;
use crate::core::Position;
use crate::reference;
use crate::structure::misassembly;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No identifier was provided to the [`Builder`].
    Id,

    /// No assembly name was provided to the [`Builder`].
    Assembly,

    /// No contig name was provided to the [`Builder`].
    Contig,

    /// No corrected span was provided to the [`Builder`].
    Corrected,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Id => write!(f, "id"),
            MissingError::Assembly => write!(f, "assembly"),
            MissingError::Contig => write!(f, "contig"),
            MissingError::Corrected => write!(f, "corrected span"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug)]
pub enum MultipleError {
    /// The identifier was provided multiple times to the [`Builder`].
    Id,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Id => write!(f, "id"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// An error where a singular field was provided to the [`Builder`] more
    /// than once.
    Multiple(MultipleError),

    /// The corrected span was inverted or not finite.
    InvalidSpan(Position, Position),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
            Error::InvalidSpan(start, end) => write!(f, "invalid corrected span: {start}-{end}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Block`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The unique identifier.
    id: Option<Id>,

    /// The name of the assembly.
    assembly: Option<String>,

    /// The name of the contig.
    contig: Option<String>,

    /// The span on the corrected coordinate line.
    corrected: Option<(Position, Position)>,

    /// The span within the contig.
    contig_span: Option<(Number, Number)>,

    /// The size of the contig.
    size: Option<Number>,

    /// The assembly row.
    lane: usize,

    /// The classification.
    segment_type: SegmentType,

    /// The broken end.
    end_side: EndSide,

    /// The child blocks.
    structure: Vec<Block>,

    /// The reference side of the alignment.
    reference: Option<reference::Span>,

    /// The adjacent misassemblies.
    misassemblies: Vec<misassembly::Kind>,

    /// The percent identity.
    identity: Option<f64>,
}

impl Builder {
    /// Sets the identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::block::Builder;
    /// use icarus::block::Ids;
    ///
    /// let mut ids = Ids::default();
    /// let builder = Builder::default().id(ids.next_id())?;
    /// assert!(builder.id(ids.next_id()).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn id(mut self, id: Id) -> Result<Self> {
        if self.id.is_some() {
            return Err(Error::Multiple(MultipleError::Id));
        }

        self.id = Some(id);
        Ok(self)
    }

    /// Sets the name of the assembly.
    pub fn assembly(mut self, assembly: impl Into<String>) -> Self {
        self.assembly = Some(assembly.into());
        self
    }

    /// Sets the name of the contig.
    pub fn contig(mut self, contig: impl Into<String>) -> Self {
        self.contig = Some(contig.into());
        self
    }

    /// Sets the span on the corrected coordinate line.
    pub fn corrected(mut self, start: Position, end: Position) -> Self {
        self.corrected = Some((start, end));
        self
    }

    /// Sets the 1-based span within the contig.
    ///
    /// When no contig span is provided, the whole contig (`1..=size`) is
    /// assumed.
    pub fn contig_span(mut self, start: Number, end: Number) -> Self {
        self.contig_span = Some((start.min(end), start.max(end)));
        self
    }

    /// Sets the size of the contig.
    ///
    /// When no size is provided, the width of the contig span is assumed.
    pub fn size(mut self, size: Number) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the assembly row.
    pub fn lane(mut self, lane: usize) -> Self {
        self.lane = lane;
        self
    }

    /// Sets the classification.
    pub fn segment_type(mut self, segment_type: SegmentType) -> Self {
        self.segment_type = segment_type;
        self
    }

    /// Sets the broken end.
    pub fn end_side(mut self, side: EndSide) -> Self {
        self.end_side = side;
        self
    }

    /// Sets the child blocks.
    pub fn structure(mut self, structure: Vec<Block>) -> Self {
        self.structure = structure;
        self
    }

    /// Sets the reference side of the alignment.
    pub fn reference(mut self, span: reference::Span) -> Self {
        self.reference = Some(span);
        self
    }

    /// Sets the adjacent misassemblies.
    pub fn misassemblies(mut self, misassemblies: Vec<misassembly::Kind>) -> Self {
        self.misassemblies = misassemblies;
        self
    }

    /// Sets the percent identity.
    pub fn identity(mut self, identity: f64) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Consumes `self` to attempt to build a [`Block`].
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::block::Builder;
    /// use icarus::block::Ids;
    /// use icarus::block::SegmentType;
    ///
    /// let mut ids = Ids::default();
    /// let block = Builder::default()
    ///     .id(ids.next_id())?
    ///     .assembly("spades")
    ///     .contig("NODE_1")
    ///     .corrected(1000.0, 1500.0)
    ///     .contig_span(1, 501)
    ///     .segment_type(SegmentType::Misassembled)
    ///     .try_build()?;
    ///
    /// assert_eq!(block.contig(), "NODE_1");
    /// assert_eq!(block.width(), 500.0);
    /// assert_eq!(block.size(), 501);
    /// assert_eq!(block.non_overlapping_lane(), 0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Block> {
        let id = self.id.ok_or(Error::Missing(MissingError::Id))?;
        let assembly = self
            .assembly
            .ok_or(Error::Missing(MissingError::Assembly))?;
        let contig = self.contig.ok_or(Error::Missing(MissingError::Contig))?;
        let (corrected_start, corrected_end) = self
            .corrected
            .ok_or(Error::Missing(MissingError::Corrected))?;

        if !corrected_start.is_finite()
            || !corrected_end.is_finite()
            || corrected_start > corrected_end
        {
            return Err(Error::InvalidSpan(corrected_start, corrected_end));
        }

        let (contig_start, contig_end) = match (self.contig_span, self.size) {
            (Some(span), _) => span,
            (None, Some(size)) => (1, size),
            (None, None) => (1, (corrected_end - corrected_start).round() as Number),
        };

        let size = self
            .size
            .unwrap_or_else(|| contig_end.saturating_sub(contig_start) + 1);

        Ok(Block {
            id,
            assembly,
            contig,
            corrected_start,
            corrected_end,
            contig_start,
            contig_end,
            size,
            lane: self.lane,
            non_overlapping_lane: 0,
            segment_type: self.segment_type,
            misassembled_end_side: self.end_side,
            structure: self.structure,
            reference: self.reference,
            misassemblies: self.misassemblies,
            identity: self.identity,
            similar: false,
            overlaps: Vec::new(),
            marks: Vec::new(),
            parent: None,
        })
    }
}

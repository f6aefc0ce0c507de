//! Blocks: the typed records drawn by every track.
//!
//! A [`Block`] is either a single alignment of a contig (alignment layout) or
//! a whole contig (contig-size layout). Blocks are constructed once when a
//! report is loaded. The lane fields are set once by the
//! [`Packer`](crate::layout::lanes::Packer), and the cross-block annotations
//! ([`Block::similar()`] and [`Block::overlaps()`]) are set once by the
//! layout passes; blocks are immutable afterwards.

use std::str::FromStr;

use omics::coordinate::position::Number;

use crate::core::Extent;
use crate::core::Position;
use crate::filter;
use crate::reference;
use crate::structure::misassembly;

pub mod builder;

pub use builder::Builder;

////////////////////////////////////////////////////////////////////////////////////////
// Identifiers
////////////////////////////////////////////////////////////////////////////////////////

/// A unique identifier for a [`Block`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id(usize);

impl Id {
    /// Gets the inner value.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A generator of unique [`Id`]s.
#[derive(Debug, Default)]
pub struct Ids(usize);

impl Ids {
    /// Generates the next identifier.
    pub fn next_id(&mut self) -> Id {
        let id = Id(self.0);
        self.0 += 1;
        id
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Segment types
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to parsing a [`SegmentType`].
#[derive(Debug, Eq, PartialEq)]
pub struct ParseSegmentTypeError(String);

impl std::fmt::Display for ParseSegmentTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid segment type: {}", self.0)
    }
}

impl std::error::Error for ParseSegmentTypeError {}

/// The classification of a block.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SegmentType {
    /// A correctly assembled segment or contig.
    #[default]
    Correct,

    /// A segment adjacent to, or a contig containing, a misassembly.
    Misassembled,

    /// A segment or contig without any alignment.
    Unaligned,

    /// A contig with multiple equally good alignments.
    Ambiguous,

    /// A contig below the size threshold (or an aggregate of hidden contigs).
    Short,
}

impl std::fmt::Display for SegmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentType::Correct => write!(f, "correct"),
            SegmentType::Misassembled => write!(f, "misassembled"),
            SegmentType::Unaligned => write!(f, "unaligned"),
            SegmentType::Ambiguous => write!(f, "ambiguous"),
            SegmentType::Short => write!(f, "short"),
        }
    }
}

impl FromStr for SegmentType {
    type Err = ParseSegmentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "correct" => Ok(SegmentType::Correct),
            "misassembled" => Ok(SegmentType::Misassembled),
            "unaligned" => Ok(SegmentType::Unaligned),
            "ambiguous" => Ok(SegmentType::Ambiguous),
            "short" | "small_contigs" => Ok(SegmentType::Short),
            _ => Err(ParseSegmentTypeError(s.to_string())),
        }
    }
}

/// The side of a block at which a misassembly breaks it.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum EndSide {
    /// The block is not broken.
    #[default]
    None,

    /// The block is broken at its left (lower coordinate) end.
    Left,

    /// The block is broken at its right (higher coordinate) end.
    Right,
}

////////////////////////////////////////////////////////////////////////////////////////
// Blocks
////////////////////////////////////////////////////////////////////////////////////////

/// A block.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// The unique identifier.
    id: Id,

    /// The name of the assembly.
    assembly: String,

    /// The name of the contig.
    contig: String,

    /// The start on the corrected coordinate line.
    corrected_start: Position,

    /// The end on the corrected coordinate line.
    corrected_end: Position,

    /// The 1-based start within the contig.
    contig_start: Number,

    /// The 1-based end within the contig.
    contig_end: Number,

    /// The size of the contig.
    size: Number,

    /// The assembly row.
    lane: usize,

    /// The sub-lane within the assembly row.
    non_overlapping_lane: usize,

    /// The classification.
    segment_type: SegmentType,

    /// The broken end (for marker blocks).
    misassembled_end_side: EndSide,

    /// The child blocks of the contig.
    structure: Vec<Block>,

    /// The reference side of the alignment.
    reference: Option<reference::Span>,

    /// The misassemblies adjacent to the block.
    misassemblies: Vec<misassembly::Kind>,

    /// The percent identity of the alignment.
    identity: Option<f64>,

    /// Whether the block is similar across assemblies.
    similar: bool,

    /// The blocks of other contigs that overlap this one.
    overlaps: Vec<Id>,

    /// The NX labels (e.g., `N50`) that end on this block.
    marks: Vec<String>,

    /// The block a broken-end marker was created for.
    parent: Option<Id>,
}

impl Block {
    /// Gets the unique identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Gets the name of the assembly.
    pub fn assembly(&self) -> &str {
        &self.assembly
    }

    /// Gets the name of the contig.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Gets the start on the corrected coordinate line.
    pub fn corrected_start(&self) -> Position {
        self.corrected_start
    }

    /// Gets the end on the corrected coordinate line.
    pub fn corrected_end(&self) -> Position {
        self.corrected_end
    }

    /// Gets the extent on the corrected coordinate line.
    pub fn extent(&self) -> Extent {
        Extent::new(self.corrected_start, self.corrected_end)
    }

    /// Gets the width on the corrected coordinate line.
    pub fn width(&self) -> Position {
        self.corrected_end - self.corrected_start
    }

    /// Gets the 1-based start within the contig.
    pub fn contig_start(&self) -> Number {
        self.contig_start
    }

    /// Gets the 1-based end within the contig.
    pub fn contig_end(&self) -> Number {
        self.contig_end
    }

    /// Gets the size of the contig.
    pub fn size(&self) -> Number {
        self.size
    }

    /// Gets the assembly row.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// Gets the sub-lane within the assembly row.
    pub fn non_overlapping_lane(&self) -> usize {
        self.non_overlapping_lane
    }

    /// Gets the classification.
    pub fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    /// Gets the broken end.
    pub fn misassembled_end_side(&self) -> EndSide {
        self.misassembled_end_side
    }

    /// Returns whether this is a broken-end marker.
    pub fn is_marker(&self) -> bool {
        self.misassembled_end_side != EndSide::None
    }

    /// Gets the child blocks of the contig.
    ///
    /// Aligned children are placed on the reference line. Unaligned children
    /// are placed on the contig line (the contig's offset plus their
    /// contig-relative coordinates).
    pub fn structure(&self) -> &[Block] {
        &self.structure
    }

    /// Gets the reference side of the alignment.
    pub fn reference(&self) -> Option<&reference::Span> {
        self.reference.as_ref()
    }

    /// Gets the misassemblies adjacent to the block.
    pub fn misassemblies(&self) -> &[misassembly::Kind] {
        &self.misassemblies
    }

    /// Gets the percent identity of the alignment.
    pub fn identity(&self) -> Option<f64> {
        self.identity
    }

    /// Returns whether the block is similar across assemblies.
    pub fn similar(&self) -> bool {
        self.similar
    }

    /// Gets the blocks of other contigs that overlap this one.
    pub fn overlaps(&self) -> &[Id] {
        &self.overlaps
    }

    /// Gets the NX labels that end on this block.
    pub fn marks(&self) -> &[String] {
        &self.marks
    }

    /// Gets the block this broken-end marker was created for.
    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Sets the sub-lane.
    pub(crate) fn set_non_overlapping_lane(&mut self, lane: usize) {
        self.non_overlapping_lane = lane;
    }

    /// Marks the block as similar across assemblies.
    pub(crate) fn set_similar(&mut self) {
        self.similar = true;
    }

    /// Records an overlapping block.
    pub(crate) fn push_overlap(&mut self, id: Id) {
        if !self.overlaps.contains(&id) {
            self.overlaps.push(id);
        }
    }

    /// Records an NX label.
    pub(crate) fn push_mark(&mut self, mark: impl Into<String>) {
        self.marks.push(mark.into());
    }

    /// Creates a broken-end marker for this block.
    pub(crate) fn marker(&self, id: Id, side: EndSide) -> Block {
        Block {
            id,
            segment_type: SegmentType::Misassembled,
            misassembled_end_side: side,
            structure: Vec::new(),
            overlaps: Vec::new(),
            marks: Vec::new(),
            parent: Some(self.id),
            ..self.clone()
        }
    }

    /// Creates a top-level copy of this block carrying the contig structure.
    pub(crate) fn with_structure(&self, id: Id, structure: Vec<Block>) -> Block {
        Block {
            id,
            structure,
            ..self.clone()
        }
    }
}

impl filter::Span for Block {
    fn span(&self) -> (Position, Position) {
        (self.corrected_start, self.corrected_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_type_from_str() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("correct".parse::<SegmentType>()?, SegmentType::Correct);
        assert_eq!("Misassembled".parse::<SegmentType>()?, SegmentType::Misassembled);
        assert_eq!("unaligned".parse::<SegmentType>()?, SegmentType::Unaligned);
        assert_eq!("ambiguous".parse::<SegmentType>()?, SegmentType::Ambiguous);
        assert_eq!("small_contigs".parse::<SegmentType>()?, SegmentType::Short);

        let err = "chimeric".parse::<SegmentType>().unwrap_err();
        assert_eq!(err.to_string(), "invalid segment type: chimeric");

        Ok(())
    }

    #[test]
    fn it_generates_unique_ids() {
        let mut ids = Ids::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(b.get(), a.get() + 1);
    }

    #[test]
    fn it_creates_markers() -> Result<(), Box<dyn std::error::Error>> {
        let mut ids = Ids::default();
        let block = Builder::default()
            .id(ids.next_id())?
            .assembly("asm")
            .contig("ctg")
            .corrected(100.0, 200.0)
            .misassemblies(vec![misassembly::Kind::Relocation])
            .try_build()?;

        let marker = block.marker(ids.next_id(), EndSide::Right);
        assert!(marker.is_marker());
        assert!(!block.is_marker());
        assert_eq!(marker.segment_type(), SegmentType::Misassembled);
        assert_eq!(marker.extent(), block.extent());
        assert_eq!(marker.misassemblies(), block.misassemblies());
        assert_ne!(marker.id(), block.id());
        assert_eq!(marker.parent(), Some(block.id()));
        assert_eq!(block.parent(), None);

        Ok(())
    }
}

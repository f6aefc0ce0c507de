//! Breakpoint lines.

use crate::core::Position;
use crate::filter;
use crate::structure::misassembly;

/// A probable misassembly junction drawn across an assembly row.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// The position on the contig line.
    position: Position,

    /// The assembly row.
    lane: usize,

    /// The misassembly type.
    kind: misassembly::Kind,
}

impl Line {
    /// Creates a new breakpoint line.
    pub fn new(position: Position, lane: usize, kind: misassembly::Kind) -> Self {
        Self {
            position,
            lane,
            kind,
        }
    }

    /// Gets the position on the contig line.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Gets the assembly row.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// Gets the misassembly type.
    pub fn kind(&self) -> misassembly::Kind {
        self.kind
    }
}

impl filter::Span for Line {
    fn span(&self) -> (Position, Position) {
        (self.position, self.position)
    }
}

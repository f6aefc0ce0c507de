//! Similar blocks across assemblies.
//!
//! Two alignments from different assemblies are _similar_ when they cover
//! roughly the same stretch of the same reference sequence (each endpoint
//! within a fraction of the block's length) and agree on whether they are
//! misassembled. A block is flagged when enough assemblies contain a similar
//! block, and every block it matched is flagged along with it.

use std::collections::HashMap;

use tracing::debug;

use crate::block::Block;
use crate::block::SegmentType;

/// The default minimum length of a block to be considered.
pub const DEFAULT_MIN_LENGTH: f64 = 10_000.0;

/// The default tolerance on each endpoint, as a fraction of the length.
pub const DEFAULT_EDGE_DELTA: f64 = 0.05;

/// Gets the number of other assemblies that must contain a similar block for
/// a block to be flagged, given the total number of assemblies.
///
/// # Examples
///
/// ```
/// use icarus::layout::similar::threshold;
///
/// assert_eq!(threshold(1), 1);
/// assert_eq!(threshold(2), 1);
/// assert_eq!(threshold(3), 1);
/// assert_eq!(threshold(4), 2);
/// assert_eq!(threshold(9), 4);
/// ```
pub fn threshold(assemblies: usize) -> usize {
    if assemblies <= 2 {
        1
    } else {
        assemblies / 2
    }
}

/// A detector of similar blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct Detector {
    /// The minimum length of a block to be considered.
    min_length: f64,

    /// The tolerance on each endpoint, as a fraction of the length.
    edge_delta: f64,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH, DEFAULT_EDGE_DELTA)
    }
}

impl Detector {
    /// Creates a new detector.
    pub fn new(min_length: f64, edge_delta: f64) -> Self {
        Self {
            min_length,
            edge_delta,
        }
    }

    /// Returns whether `other` covers roughly the same reference stretch as
    /// `block`.
    fn matches(&self, block: &Block, other: &Block) -> bool {
        let (Some(a), Some(b)) = (block.reference(), other.reference()) else {
            return false;
        };

        if a.name() != b.name() {
            return false;
        }

        let delta = self.edge_delta * block.width();
        (other.corrected_start() - block.corrected_start()).abs() <= delta
            && (other.corrected_end() - block.corrected_end()).abs() <= delta
    }

    /// Flags similar blocks, returning how many blocks were flagged.
    ///
    /// `blocks` holds the alignment blocks of every assembly; broken-end
    /// markers are ignored.
    pub fn mark(&self, blocks: &mut [Block]) -> usize {
        let mut assemblies: Vec<&str> = Vec::new();
        let mut members: HashMap<&str, Vec<usize>> = HashMap::new();

        for (i, block) in blocks.iter().enumerate() {
            if block.is_marker() {
                continue;
            }

            let assembly = block.assembly();
            if !members.contains_key(assembly) {
                assemblies.push(assembly);
            }
            members.entry(assembly).or_default().push(i);
        }

        let needed = threshold(assemblies.len());
        let mut flagged = vec![false; blocks.len()];

        for (a, assembly) in assemblies.iter().enumerate() {
            for &i in &members[assembly] {
                let block = &blocks[i];

                if flagged[i] || block.width() < self.min_length {
                    continue;
                }

                let misassembled = block.segment_type() == SegmentType::Misassembled;
                let mut matched = vec![i];

                for (b, other) in assemblies.iter().enumerate() {
                    if a == b {
                        continue;
                    }

                    let found = members[other]
                        .iter()
                        .copied()
                        .find(|&j| self.matches(block, &blocks[j]));

                    if let Some(j) = found {
                        let other_misassembled =
                            blocks[j].segment_type() == SegmentType::Misassembled;
                        if misassembled == other_misassembled {
                            matched.push(j);
                        }
                    }
                }

                if matched.len() - 1 < needed {
                    continue;
                }

                for j in matched {
                    flagged[j] = true;
                }
            }
        }

        let mut total = 0;
        for (block, flag) in blocks.iter_mut().zip(flagged) {
            if flag {
                block.set_similar();
                total += 1;
            }
        }

        debug!("flagged {total} similar block(s)");
        total
    }
}

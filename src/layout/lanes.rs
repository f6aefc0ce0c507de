//! Greedy sub-lane packing.
//!
//! Blocks are visited in start order and each one is placed in the first lane
//! whose last block it does not overlap by more than a tolerance. The
//! tolerance is a fraction of the sizes of both blocks, capped at a fixed
//! number of genomic units, so tiny overlaps between long alignments never
//! open a new lane.
//!
//! ```text
//! lane 1  |=====|      |=========|
//! lane 0     |======|  |====|   |===|
//!         ─────────────────────────────▶ corrected position
//! ```
//!
//! Lanes are inverted once packing is done, so the lane opened first ends up
//! with the highest index.

use std::cmp::Ordering;

use tracing::debug;

use crate::block::Block;
use crate::core::Position;

/// The default cap of the overlap tolerance (in genomic units).
pub const DEFAULT_OVERLAP_CAP: f64 = 500.0;

/// The default fraction of a block's size tolerated as overlap.
pub const DEFAULT_OVERLAP_FRACTION: f64 = 0.1;

/// The bookkeeping for a single lane.
#[derive(Clone, Copy, Debug)]
struct Lane {
    /// The end of the block reaching furthest in the lane.
    last_end: Position,

    /// The size of the block reaching furthest in the lane.
    last_size: Position,
}

/// A sub-lane packer.
#[derive(Clone, Debug, PartialEq)]
pub struct Packer {
    /// The cap of the overlap tolerance.
    overlap_cap: f64,

    /// The fraction of a block's size tolerated as overlap.
    overlap_fraction: f64,
}

impl Default for Packer {
    fn default() -> Self {
        Self::new(DEFAULT_OVERLAP_CAP, DEFAULT_OVERLAP_FRACTION)
    }
}

impl Packer {
    /// Creates a new packer.
    pub fn new(overlap_cap: f64, overlap_fraction: f64) -> Self {
        Self {
            overlap_cap,
            overlap_fraction,
        }
    }

    /// Gets the cap of the overlap tolerance.
    pub fn overlap_cap(&self) -> f64 {
        self.overlap_cap
    }

    /// Gets the fraction of a block's size tolerated as overlap.
    pub fn overlap_fraction(&self) -> f64 {
        self.overlap_fraction
    }

    /// Assigns sub-lanes to a set of `(start, end)` spans.
    ///
    /// The spans are visited in `(start, end, index)` order. The returned
    /// lanes are in input order, already inverted, along with the number of
    /// lanes used.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::layout::Packer;
    ///
    /// let spans = [(0.0, 1000.0), (500.0, 1500.0), (1100.0, 2000.0)];
    /// let (lanes, total) = Packer::default().assign(&spans);
    ///
    /// assert_eq!(total, 2);
    /// assert_eq!(lanes, vec![1, 0, 1]);
    /// ```
    pub fn assign(&self, spans: &[(Position, Position)]) -> (Vec<usize>, usize) {
        let mut order = (0..spans.len()).collect::<Vec<_>>();
        order.sort_by(|a, b| compare(spans[*a], spans[*b]).then(a.cmp(b)));
        self.assign_in_order(spans, &order)
    }

    /// Packs the blocks of a single assembly row, setting their sub-lanes.
    ///
    /// Blocks are visited in `(start, end, id)` order, which makes the
    /// assignment independent of the order of the slice. Returns the number of
    /// lanes used.
    pub fn pack(&self, blocks: &mut [Block]) -> usize {
        let spans = blocks
            .iter()
            .map(|block| (block.corrected_start(), block.corrected_end()))
            .collect::<Vec<_>>();

        let mut order = (0..blocks.len()).collect::<Vec<_>>();
        order.sort_by(|a, b| {
            compare(spans[*a], spans[*b]).then(blocks[*a].id().cmp(&blocks[*b].id()))
        });

        let (lanes, total) = self.assign_in_order(&spans, &order);

        for (block, lane) in blocks.iter_mut().zip(lanes) {
            block.set_non_overlapping_lane(lane);
        }

        debug!("packed {} block(s) into {total} lane(s)", blocks.len());
        total
    }

    /// Runs the greedy assignment over `spans` in the given visiting order.
    fn assign_in_order(
        &self,
        spans: &[(Position, Position)],
        order: &[usize],
    ) -> (Vec<usize>, usize) {
        let mut lanes: Vec<Lane> = Vec::new();
        let mut assigned = vec![0usize; spans.len()];

        for &i in order {
            let (start, end) = spans[i];
            let size = end - start;
            let min_overlap = self.overlap_cap.min(size * self.overlap_fraction);

            let fit = lanes.iter().position(|lane| {
                lane.last_end - start < min_overlap.min(lane.last_size * self.overlap_fraction)
            });

            match fit {
                Some(l) => {
                    let lane = &mut lanes[l];
                    if end >= lane.last_end {
                        lane.last_end = end;
                        lane.last_size = size;
                    }
                    assigned[i] = l;
                }
                None => {
                    lanes.push(Lane {
                        last_end: end,
                        last_size: size,
                    });
                    assigned[i] = lanes.len() - 1;
                }
            }
        }

        let total = lanes.len();
        for lane in assigned.iter_mut() {
            *lane = total - *lane - 1;
        }

        (assigned, total)
    }
}

/// Orders two spans by start, then by end.
fn compare(a: (Position, Position), b: (Position, Position)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1))
}

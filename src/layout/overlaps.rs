//! Overlapping alignments within an assembly.

use std::collections::HashMap;

use rust_lapper as lapper;
use tracing::debug;

use crate::block::Block;
use crate::block::Id;

/// The default overlap (in genomic units) above which two blocks are recorded
/// as overlapping.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// The inner value of the overlap lookup data structure.
type Iv = lapper::Interval<u64, usize>;

/// A detector of overlapping blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct Detector {
    /// The overlap above which two blocks are recorded.
    threshold: f64,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Detector {
    /// Creates a new detector.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Records, on every block, the blocks of other contigs of the same
    /// assembly that overlap it on the same reference sequence by more than
    /// the threshold. Returns the number of overlapping pairs.
    pub fn mark(&self, blocks: &mut [Block]) -> usize {
        let mut groups: HashMap<(&str, &str), Vec<Iv>> = HashMap::new();

        for (i, block) in blocks.iter().enumerate() {
            if block.is_marker() {
                continue;
            }

            let Some(reference) = block.reference() else {
                continue;
            };

            let start = block.corrected_start().floor().max(0.0) as u64;
            let stop = (block.corrected_end().ceil() as u64).max(start + 1);

            groups
                .entry((block.assembly(), reference.name()))
                .or_default()
                .push(Iv { start, stop, val: i });
        }

        let mut pairs: Vec<(usize, usize)> = Vec::new();

        for intervals in groups.into_values() {
            let index = lapper::Lapper::new(intervals.clone());

            for iv in &intervals {
                let a = &blocks[iv.val];

                for other in index.find(iv.start, iv.stop) {
                    if other.val <= iv.val {
                        continue;
                    }

                    let b = &blocks[other.val];
                    if a.contig() == b.contig() {
                        continue;
                    }

                    let overlap = a.corrected_end().min(b.corrected_end())
                        - a.corrected_start().max(b.corrected_start());

                    if overlap > self.threshold {
                        pairs.push((iv.val, other.val));
                    }
                }
            }
        }

        pairs.sort_unstable();

        let ids = blocks.iter().map(|block| block.id()).collect::<Vec<Id>>();
        for (a, b) in &pairs {
            blocks[*a].push_overlap(ids[*b]);
            blocks[*b].push_overlap(ids[*a]);
        }

        debug!("found {} overlapping pair(s)", pairs.len());
        pairs.len()
    }
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use super::*;
    use crate::block::Builder;
    use crate::block::Ids;
    use crate::reference::Span;

    /// Builds an alignment block.
    fn block(ids: &mut Ids, assembly: &str, contig: &str, start: f64, end: f64) -> Block {
        Builder::default()
            .id(ids.next_id())
            .unwrap()
            .assembly(assembly)
            .contig(contig)
            .corrected(start, end)
            .reference(Span::new("chr1", start as u64, end as u64, Strand::Positive))
            .try_build()
            .unwrap()
    }

    #[test]
    fn it_records_overlaps_above_the_threshold() {
        let mut ids = Ids::default();
        let mut blocks = vec![
            block(&mut ids, "a", "c1", 0.0, 1000.0),
            block(&mut ids, "a", "c2", 800.0, 2000.0),
            block(&mut ids, "a", "c3", 1950.0, 3000.0),
            block(&mut ids, "b", "c4", 0.0, 1000.0),
        ];

        assert_eq!(Detector::default().mark(&mut blocks), 1);
        assert_eq!(blocks[0].overlaps(), &[blocks[1].id()]);
        assert_eq!(blocks[1].overlaps(), &[blocks[0].id()]);
        assert!(blocks[2].overlaps().is_empty());
        assert!(blocks[3].overlaps().is_empty());
    }

    #[test]
    fn it_ignores_alignments_of_the_same_contig() {
        let mut ids = Ids::default();
        let mut blocks = vec![
            block(&mut ids, "a", "c1", 0.0, 1000.0),
            block(&mut ids, "a", "c1", 200.0, 1200.0),
        ];

        assert_eq!(Detector::default().mark(&mut blocks), 0);
    }
}

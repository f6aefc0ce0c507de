//! Misassembly structure of contigs.
//!
//! The [`Resolver`] turns the raw segments of a single contig (its
//! alignments, the unaligned stretches and the junctions recorded between
//! alignments) into child [`Block`]s, broken-end markers and
//! [breakpoint lines](breakpoint::Line).
//!
//! A junction between two consecutive alignments `A` and `B` is classified
//! from the segments recorded between them:
//!
//! * any misassembly gives its kind,
//! * otherwise any correct gap (e.g., a `fake` misassembly) makes the
//!   junction correct,
//! * otherwise skipped stretches that are all narrower than the skip
//!   threshold make the junction correct,
//! * otherwise (a wide skip, or nothing recorded at all) the junction is of
//!   an unknown kind.
//!
//! A breakpoint is drawn at the end of `A` when the junction is not correct
//! and the discontinuity between `A` and `B` exceeds the breakpoint
//! tolerance. The discontinuity is the larger of the distance between the
//! two alignments within the contig and the distance between the two
//! reference positions where the contig leaves `A` and enters `B`. Crossing
//! to another reference sequence is an infinite jump.

use omics::coordinate::position::Number;
use tracing::warn;

use crate::block::Block;
use crate::block::Builder;
use crate::block::builder;
use crate::block::EndSide;
use crate::block::Ids;
use crate::block::SegmentType;
use crate::core::Position;
use crate::reference::References;

pub mod breakpoint;
pub mod misassembly;
pub mod segment;

pub use segment::Gap;
pub use segment::Segment;

/// The default discontinuity (in genomic units) above which a breakpoint is
/// drawn.
pub const DEFAULT_BREAKPOINT_TOLERANCE: f64 = 2.0;

/// The default width below which a skipped stretch is not a discontinuity.
pub const DEFAULT_SKIP_THRESHOLD: Number = 5;

////////////////////////////////////////////////////////////////////////////////////////
// Context
////////////////////////////////////////////////////////////////////////////////////////

/// The contig being resolved.
#[derive(Clone, Debug)]
pub struct Context<'a> {
    /// The name of the assembly.
    assembly: &'a str,

    /// The name of the contig.
    contig: &'a str,

    /// The size of the contig.
    size: Number,

    /// The position of the contig on the contig line.
    offset: Position,

    /// The assembly row.
    lane: usize,

    /// Whether the contig has multiple equally good alignments.
    ambiguous: bool,

    /// The classification declared by the report, if any.
    declared: Option<SegmentType>,
}

impl<'a> Context<'a> {
    /// Creates a new context at offset zero in the first assembly row.
    pub fn new(assembly: &'a str, contig: &'a str, size: Number) -> Self {
        Self {
            assembly,
            contig,
            size,
            offset: 0.0,
            lane: 0,
            ambiguous: false,
            declared: None,
        }
    }

    /// Sets the position of the contig on the contig line.
    pub fn offset(mut self, offset: Position) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the assembly row.
    pub fn lane(mut self, lane: usize) -> Self {
        self.lane = lane;
        self
    }

    /// Sets whether the contig is ambiguous.
    pub fn ambiguous(mut self, ambiguous: bool) -> Self {
        self.ambiguous = ambiguous;
        self
    }

    /// Sets the classification declared by the report.
    pub fn declared(mut self, declared: SegmentType) -> Self {
        self.declared = Some(declared);
        self
    }

    /// Returns whether the contig is ambiguous.
    ///
    /// A contig declared ambiguous by the report is ambiguous regardless of
    /// its alignments.
    pub fn is_ambiguous(&self) -> bool {
        self.ambiguous || self.declared == Some(SegmentType::Ambiguous)
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Resolution
////////////////////////////////////////////////////////////////////////////////////////

/// The resolved structure of a contig.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    /// The child blocks in contig order.
    pub structure: Vec<Block>,

    /// The broken-end markers of the aligned children.
    pub markers: Vec<Block>,

    /// The breakpoint lines on the contig line.
    pub breakpoints: Vec<breakpoint::Line>,

    /// The classification of the contig.
    pub kind: SegmentType,
}

impl Resolution {
    /// Gets the aligned children.
    pub fn aligned(&self) -> impl Iterator<Item = &Block> {
        self.structure
            .iter()
            .filter(|block| block.reference().is_some())
    }
}

/// The classification of the junction before or after an alignment.
#[derive(Clone, Debug, PartialEq)]
enum Junction {
    /// Not a misassembly.
    Correct,

    /// A discontinuity nothing was recorded for.
    Unknown,

    /// One or more misassemblies.
    Misassembly(Vec<misassembly::Kind>),
}

impl Junction {
    /// Gets the kind of the breakpoint the junction would produce.
    fn breakpoint_kind(&self) -> Option<misassembly::Kind> {
        match self {
            Junction::Correct => None,
            Junction::Unknown => Some(misassembly::Kind::Unknown),
            Junction::Misassembly(kinds) => kinds.first().copied(),
        }
    }

    /// Gets the recorded misassemblies.
    fn misassemblies(&self) -> &[misassembly::Kind] {
        match self {
            Junction::Misassembly(kinds) => kinds,
            _ => &[],
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Resolver
////////////////////////////////////////////////////////////////////////////////////////

/// A resolver of contig structure.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolver {
    /// The discontinuity above which a breakpoint is drawn.
    breakpoint_tolerance: f64,

    /// The width below which a skipped stretch is not a discontinuity.
    skip_threshold: Number,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKPOINT_TOLERANCE, DEFAULT_SKIP_THRESHOLD)
    }
}

impl Resolver {
    /// Creates a new resolver.
    pub fn new(breakpoint_tolerance: f64, skip_threshold: Number) -> Self {
        Self {
            breakpoint_tolerance,
            skip_threshold,
        }
    }

    /// Gets the discontinuity above which a breakpoint is drawn.
    pub fn breakpoint_tolerance(&self) -> f64 {
        self.breakpoint_tolerance
    }

    /// Gets the width below which a skipped stretch is not a discontinuity.
    pub fn skip_threshold(&self) -> Number {
        self.skip_threshold
    }

    /// Resolves the structure of a contig.
    ///
    /// Malformed segments are logged and skipped; resolution never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::block::Ids;
    /// use icarus::block::SegmentType;
    /// use icarus::reference::References;
    /// use icarus::reference::Span;
    /// use icarus::structure::Context;
    /// use icarus::structure::Gap;
    /// use icarus::structure::Resolver;
    /// use icarus::structure::Segment;
    /// use icarus::structure::misassembly::Kind;
    /// use omics::coordinate::Strand;
    ///
    /// let references = References::try_from_iter([("chr1", 10_000)])?;
    /// let segments = vec![
    ///     Segment::aligned(1, 100, Span::new("chr1", 1, 100, Strand::Positive)),
    ///     Segment::gap(Gap::Misassembly(Kind::Relocation), 100, 200),
    ///     Segment::aligned(200, 300, Span::new("chr1", 5000, 5100, Strand::Positive)),
    /// ];
    ///
    /// let context = Context::new("spades", "NODE_1", 300).offset(1000.0);
    /// let resolution = Resolver::default().resolve(&context, segments, &references, &mut Ids::default());
    ///
    /// assert_eq!(resolution.kind, SegmentType::Misassembled);
    /// assert_eq!(resolution.breakpoints.len(), 1);
    /// assert_eq!(resolution.breakpoints[0].position(), 1100.0);
    /// assert_eq!(resolution.breakpoints[0].kind(), Kind::Relocation);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn resolve(
        &self,
        context: &Context<'_>,
        segments: Vec<Segment>,
        references: &References,
        ids: &mut Ids,
    ) -> Resolution {
        let mut segments = segments
            .into_iter()
            .filter(|segment| accepts(context, segment, references))
            .collect::<Vec<_>>();
        segments.sort_by_key(|segment| segment.start());

        let aligned = segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.is_aligned())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        // (1) Classify the junction before every alignment, plus the stretch
        // after the last one.
        let junctions = (0..=aligned.len())
            .map(|k| {
                let lo = if k == 0 { 0 } else { aligned[k - 1] + 1 };
                let hi = aligned.get(k).copied().unwrap_or(segments.len());
                self.classify(&segments[lo..hi])
            })
            .collect::<Vec<_>>();

        let ambiguous = context.is_ambiguous();

        // (2) Emit breakpoints between consecutive alignments.
        let mut breakpoints = Vec::new();
        if !ambiguous {
            for k in 1..aligned.len() {
                let Some(kind) = junctions[k].breakpoint_kind() else {
                    continue;
                };

                let (a, b) = (&segments[aligned[k - 1]], &segments[aligned[k]]);
                if discontinuity(a, b) > self.breakpoint_tolerance {
                    let position = context.offset + a.end() as Position;
                    breakpoints.push(breakpoint::Line::new(position, context.lane, kind));
                }
            }
        }

        // (3) Build the children and their markers in contig order.
        let mut structure = Vec::new();
        let mut markers = Vec::new();
        let mut misassembled = false;
        let mut k = 0;

        for segment in &segments {
            let result = match segment.kind() {
                segment::Kind::Aligned(span) => {
                    let (before, after) = (&junctions[k], &junctions[k + 1]);
                    k += 1;

                    let Some(extent) = references.correct(span) else {
                        continue;
                    };

                    let mut misassemblies = Vec::new();
                    let mut sides = Vec::new();
                    let segment_type = if ambiguous {
                        SegmentType::Ambiguous
                    } else {
                        misassemblies.extend_from_slice(before.misassemblies());
                        misassemblies.extend_from_slice(after.misassemblies());

                        if !before.misassemblies().is_empty() {
                            sides.push(segment.side().unwrap_or(if span.is_forward() {
                                EndSide::Left
                            } else {
                                EndSide::Right
                            }));
                        }

                        if !after.misassemblies().is_empty() {
                            sides.push(segment.side().unwrap_or(if span.is_forward() {
                                EndSide::Right
                            } else {
                                EndSide::Left
                            }));
                        }

                        sides.dedup();

                        if misassemblies.is_empty() {
                            SegmentType::Correct
                        } else {
                            misassembled = true;
                            SegmentType::Misassembled
                        }
                    };

                    child(context, ids, segment, extent.start(), extent.end())
                        .map(|builder| {
                            let builder = builder
                                .segment_type(segment_type)
                                .reference(span.clone())
                                .misassemblies(misassemblies);

                            match segment.identity() {
                                Some(identity) => builder.identity(identity),
                                None => builder,
                            }
                        })
                        .and_then(Builder::try_build)
                        .map(|block| {
                            for side in sides {
                                markers.push(block.marker(ids.next_id(), side));
                            }
                            block
                        })
                }
                segment::Kind::Unaligned | segment::Kind::Gap(Gap::Skip) => {
                    let start = context.offset + segment.start() as Position;
                    let end = context.offset + segment.end() as Position;

                    child(context, ids, segment, start, end)
                        .map(|builder| builder.segment_type(SegmentType::Unaligned))
                        .and_then(Builder::try_build)
                }
                segment::Kind::Gap(_) => continue,
            };

            match result {
                Ok(block) => structure.push(block),
                Err(err) => warn!(
                    "skipping segment {}-{} of contig {} in {}: {err}",
                    segment.start(),
                    segment.end(),
                    context.contig,
                    context.assembly
                ),
            }
        }

        let kind = match context.declared {
            Some(declared) => declared,
            None if ambiguous => SegmentType::Ambiguous,
            None if aligned.is_empty() => SegmentType::Unaligned,
            None if misassembled || !breakpoints.is_empty() => SegmentType::Misassembled,
            None => SegmentType::Correct,
        };

        Resolution {
            structure,
            markers,
            breakpoints,
            kind,
        }
    }

    /// Classifies the junction made of the segments between two alignments.
    fn classify(&self, between: &[Segment]) -> Junction {
        let kinds = between
            .iter()
            .filter_map(|segment| match segment.kind() {
                segment::Kind::Gap(Gap::Misassembly(kind)) => Some(*kind),
                _ => None,
            })
            .collect::<Vec<_>>();

        if !kinds.is_empty() {
            return Junction::Misassembly(kinds);
        }

        if between
            .iter()
            .any(|segment| matches!(segment.kind(), segment::Kind::Gap(Gap::Correct)))
        {
            return Junction::Correct;
        }

        if !between.is_empty()
            && between
                .iter()
                .all(|segment| segment.width() < self.skip_threshold)
        {
            return Junction::Correct;
        }

        Junction::Unknown
    }
}

/// Starts building a child block of a contig.
fn child(
    context: &Context<'_>,
    ids: &mut Ids,
    segment: &Segment,
    start: Position,
    end: Position,
) -> Result<Builder, builder::Error> {
    Builder::default()
        .assembly(context.assembly)
        .contig(context.contig)
        .corrected(start, end)
        .contig_span(segment.start(), segment.end())
        .size(context.size)
        .lane(context.lane)
        .id(ids.next_id())
}

/// Returns whether a segment is well formed, logging the ones that are not.
fn accepts(context: &Context<'_>, segment: &Segment, references: &References) -> bool {
    if segment.start() > segment.end() {
        warn!(
            "skipping segment {}-{} of contig {} in {}: start is after end",
            segment.start(),
            segment.end(),
            context.contig,
            context.assembly
        );
        return false;
    }

    if let Some(span) = segment.reference() {
        if span.name().is_empty() {
            warn!(
                "skipping alignment {}-{} of contig {} in {}: missing reference sequence",
                segment.start(),
                segment.end(),
                context.contig,
                context.assembly
            );
            return false;
        }

        if !references.contains(span.name()) {
            warn!(
                "skipping alignment {}-{} of contig {} in {}: unknown reference sequence {}",
                segment.start(),
                segment.end(),
                context.contig,
                context.assembly,
                span.name()
            );
            return false;
        }
    }

    true
}

/// Gets the discontinuity between two consecutive alignments.
fn discontinuity(a: &Segment, b: &Segment) -> f64 {
    let within_contig = (b.start() as f64 - a.end() as f64).abs();

    let on_reference = match (a.reference(), b.reference()) {
        (Some(x), Some(y)) if x.name() == y.name() => {
            let leaving = if x.is_forward() { x.end() } else { x.start() };
            let entering = if y.is_forward() { y.start() } else { y.end() };
            (entering as f64 - leaving as f64).abs()
        }
        _ => f64::INFINITY,
    };

    within_contig.max(on_reference)
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use super::*;
    use crate::reference::Span;
    use crate::structure::misassembly::Kind;

    /// Gets the references used by every test.
    fn references() -> References {
        References::try_from_iter([("chr1", 10_000), ("chr2", 5_000)]).unwrap()
    }

    /// Creates a forward alignment.
    fn forward(start: Number, end: Number, ref_start: Number, ref_end: Number) -> Segment {
        Segment::aligned(
            start,
            end,
            Span::new("chr1", ref_start, ref_end, Strand::Positive),
        )
    }

    /// Creates a reverse alignment.
    fn reverse(start: Number, end: Number, ref_start: Number, ref_end: Number) -> Segment {
        Segment::aligned(
            start,
            end,
            Span::new("chr1", ref_start, ref_end, Strand::Negative),
        )
    }

    /// Resolves with the default resolver.
    fn resolve(context: &Context<'_>, segments: Vec<Segment>) -> Resolution {
        Resolver::default().resolve(context, segments, &references(), &mut Ids::default())
    }

    #[test]
    fn it_emits_a_breakpoint_at_a_relocation() {
        let context = Context::new("asm", "ctg", 300).offset(500.0).lane(2);
        let resolution = resolve(
            &context,
            vec![
                forward(0, 100, 1, 100),
                Segment::gap(Gap::Misassembly(Kind::Relocation), 100, 105),
                forward(200, 300, 4000, 4100),
            ],
        );

        assert_eq!(resolution.breakpoints, vec![breakpoint::Line::new(
            600.0,
            2,
            Kind::Relocation
        )]);
        assert_eq!(resolution.kind, SegmentType::Misassembled);

        assert_eq!(resolution.structure.len(), 2);
        for child in &resolution.structure {
            assert_eq!(child.segment_type(), SegmentType::Misassembled);
            assert_eq!(child.misassemblies(), &[Kind::Relocation]);
            assert_eq!(child.lane(), 2);
        }

        // The children are placed on the reference line.
        assert_eq!(resolution.structure[1].corrected_start(), 4000.0);
        assert_eq!(resolution.structure[1].corrected_end(), 4100.0);

        let sides = resolution
            .markers
            .iter()
            .map(|marker| marker.misassembled_end_side())
            .collect::<Vec<_>>();
        assert_eq!(sides, vec![EndSide::Right, EndSide::Left]);
    }

    #[test]
    fn it_ignores_skips_below_the_threshold() {
        let context = Context::new("asm", "ctg", 200);
        let resolution = resolve(
            &context,
            vec![
                forward(0, 100, 1, 100),
                Segment::gap(Gap::Skip, 100, 102),
                forward(103, 200, 103, 200),
            ],
        );

        assert!(resolution.breakpoints.is_empty());
        assert!(resolution.markers.is_empty());
        assert_eq!(resolution.kind, SegmentType::Correct);

        // The skip stays as a placeholder on the contig line.
        let types = resolution
            .structure
            .iter()
            .map(|child| child.segment_type())
            .collect::<Vec<_>>();
        assert_eq!(types, vec![
            SegmentType::Correct,
            SegmentType::Unaligned,
            SegmentType::Correct
        ]);
        assert_eq!(resolution.structure[1].corrected_start(), 100.0);
        assert_eq!(resolution.structure[1].corrected_end(), 102.0);
    }

    #[test]
    fn it_emits_an_unknown_breakpoint_without_a_recorded_junction() {
        let context = Context::new("asm", "ctg", 300);
        let resolution = resolve(
            &context,
            vec![forward(150, 300, 150, 300), forward(0, 100, 1, 100)],
        );

        assert_eq!(resolution.breakpoints.len(), 1);
        assert_eq!(resolution.breakpoints[0].kind(), Kind::Unknown);
        assert_eq!(resolution.breakpoints[0].position(), 100.0);

        // Nothing was recorded as a misassembly, so nothing is broken.
        assert!(resolution.markers.is_empty());
        assert!(
            resolution
                .structure
                .iter()
                .all(|child| child.segment_type() == SegmentType::Correct)
        );
        assert_eq!(resolution.kind, SegmentType::Misassembled);
    }

    #[test]
    fn it_does_not_emit_breakpoints_at_correct_junctions() {
        let context = Context::new("asm", "ctg", 300);
        let resolution = resolve(
            &context,
            vec![
                forward(1, 100, 1, 100),
                Segment::gap(Gap::from_description("fake: not a misassembly"), 100, 150),
                forward(150, 300, 6000, 6150),
            ],
        );

        assert!(resolution.breakpoints.is_empty());
        assert_eq!(resolution.structure.len(), 2);
        assert_eq!(resolution.kind, SegmentType::Correct);
    }

    #[test]
    fn it_does_not_emit_breakpoints_for_tiny_discontinuities() {
        let context = Context::new("asm", "ctg", 200);
        let resolution = resolve(
            &context,
            vec![forward(1, 100, 1, 100), forward(101, 200, 101, 200)],
        );

        assert!(resolution.breakpoints.is_empty());
        assert_eq!(resolution.kind, SegmentType::Correct);
    }

    #[test]
    fn it_treats_a_jump_to_another_sequence_as_a_discontinuity() {
        let context = Context::new("asm", "ctg", 200);
        let resolution = resolve(
            &context,
            vec![
                forward(1, 100, 1, 100),
                Segment::aligned(101, 200, Span::new("chr2", 1, 100, Strand::Positive)),
            ],
        );

        assert_eq!(resolution.breakpoints.len(), 1);
        assert_eq!(resolution.breakpoints[0].kind(), Kind::Unknown);

        // chr2 starts after chr1 on the reference line.
        assert_eq!(resolution.structure[1].corrected_start(), 10_001.0);
    }

    #[test]
    fn it_bypasses_breakpoints_for_ambiguous_contigs() {
        let context = Context::new("asm", "ctg", 300).ambiguous(true);
        let resolution = resolve(
            &context,
            vec![
                forward(0, 100, 1, 100),
                Segment::gap(Gap::Misassembly(Kind::Translocation), 100, 105),
                forward(200, 300, 4000, 4100),
            ],
        );

        assert!(resolution.breakpoints.is_empty());
        assert!(resolution.markers.is_empty());
        assert_eq!(resolution.kind, SegmentType::Ambiguous);
        assert!(
            resolution
                .aligned()
                .all(|child| child.segment_type() == SegmentType::Ambiguous)
        );
    }

    #[test]
    fn it_skips_malformed_segments() {
        let context = Context::new("asm", "ctg", 300);
        let resolution = resolve(
            &context,
            vec![
                forward(100, 1, 1, 100),
                Segment::aligned(1, 50, Span::new("chrUn", 1, 50, Strand::Positive)),
                Segment::aligned(1, 50, Span::new("", 1, 50, Strand::Positive)),
                forward(101, 300, 101, 300),
            ],
        );

        assert_eq!(resolution.structure.len(), 1);
        assert_eq!(resolution.structure[0].contig_start(), 101);
        assert!(resolution.breakpoints.is_empty());
        assert_eq!(resolution.kind, SegmentType::Correct);
    }

    #[test]
    fn it_mirrors_broken_ends_for_reverse_alignments() {
        let context = Context::new("asm", "ctg", 300);
        let resolution = resolve(
            &context,
            vec![
                reverse(0, 100, 4000, 4100),
                Segment::gap(Gap::Misassembly(Kind::Inversion), 100, 105),
                reverse(200, 300, 1, 100),
            ],
        );

        let sides = resolution
            .markers
            .iter()
            .map(|marker| marker.misassembled_end_side())
            .collect::<Vec<_>>();
        assert_eq!(sides, vec![EndSide::Left, EndSide::Right]);
    }

    #[test]
    fn it_prefers_an_explicit_side_over_the_orientation() {
        let context = Context::new("asm", "ctg", 300);
        let resolution = resolve(
            &context,
            vec![
                forward(0, 100, 1, 100).with_side(EndSide::Left),
                Segment::gap(Gap::Misassembly(Kind::Relocation), 100, 105),
                forward(200, 300, 4000, 4100),
            ],
        );

        assert_eq!(resolution.markers[0].misassembled_end_side(), EndSide::Left);
        assert_eq!(resolution.markers[1].misassembled_end_side(), EndSide::Left);
    }

    #[test]
    fn it_classifies_unaligned_and_declared_contigs() {
        let context = Context::new("asm", "ctg", 1000);
        let resolution = resolve(&context, vec![Segment::unaligned(1, 1000)]);

        assert_eq!(resolution.kind, SegmentType::Unaligned);
        assert_eq!(resolution.structure.len(), 1);
        assert!(resolution.aligned().next().is_none());

        let context = Context::new("asm", "ctg", 200).declared(SegmentType::Misassembled);
        let resolution = resolve(&context, vec![forward(1, 200, 1, 200)]);
        assert_eq!(resolution.kind, SegmentType::Misassembled);
    }
}

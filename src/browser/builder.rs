//! A builder for a [`Browser`].

use omics::coordinate::position::Number;
use tracing::debug;
use tracing::info;

use crate::block;
use crate::block::Block;
use crate::block::Ids;
use crate::block::SegmentType;
use crate::browser::Browser;
use crate::browser::Lane;
use crate::browser::Mark;
use crate::browser::Mode;
use crate::browser::Visible;
use crate::browser::positions;
use crate::config::Config;
use crate::core::Extent;
use crate::core::Position;
use crate::report::Assembly;
use crate::report::Report;
use crate::space;
use crate::structure::Context;
use crate::structure::breakpoint;
use crate::track;
use crate::track::Track;
use crate::viewport::Viewport;

/// The default width of the tracks in pixels.
pub const DEFAULT_WIDTH: f64 = 1000.0;

/// The default height of the coverage track in pixels.
pub const DEFAULT_COVERAGE_HEIGHT: f64 = 100.0;

/// The fraction of the domain shown when the browser opens.
const INITIAL_FRACTION: f64 = 0.25;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// The width of the tracks was not a positive number.
    InvalidWidth(f64),

    /// The height of the coverage track was not a positive number.
    InvalidHeight(f64),

    /// The alignment layout needs reference sequences.
    MissingReferences,

    /// Nothing could be laid out.
    EmptyDomain,

    /// A track could not be created.
    Space(space::Error),

    /// A block could not be built.
    Block(block::builder::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidWidth(width) => write!(f, "invalid track width: {width}"),
            Error::InvalidHeight(height) => write!(f, "invalid coverage height: {height}"),
            Error::MissingReferences => {
                write!(f, "the alignment layout requires reference sequences")
            }
            Error::EmptyDomain => write!(f, "nothing to lay out"),
            Error::Space(err) => write!(f, "coordinate space error: {err}"),
            Error::Block(err) => write!(f, "block error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Layouts
////////////////////////////////////////////////////////////////////////////////////////

/// The items produced by a layout.
#[derive(Debug, Default)]
struct Layout {
    /// The rows of the main track.
    lanes: Vec<Lane>,

    /// The top-level blocks.
    blocks: Vec<Block>,

    /// The broken-end markers.
    markers: Vec<Block>,

    /// The breakpoint lines.
    breakpoints: Vec<breakpoint::Line>,

    /// The NX marks.
    marks: Vec<Mark>,

    /// The laid-out domain.
    domain: Extent,

    /// The visible extent when the browser opens.
    initial: Extent,
}

////////////////////////////////////////////////////////////////////////////////////////
// Builder
////////////////////////////////////////////////////////////////////////////////////////

/// A builder for a [`Browser`].
#[derive(Debug)]
pub struct Builder {
    /// The layout.
    mode: Mode,

    /// The width of the tracks in pixels.
    width: f64,

    /// The height of the coverage track in pixels.
    coverage_height: f64,

    /// The tunables.
    config: Config,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            width: DEFAULT_WIDTH,
            coverage_height: DEFAULT_COVERAGE_HEIGHT,
            config: Config::default(),
        }
    }
}

impl Builder {
    /// Sets the layout.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the width of the tracks in pixels.
    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Sets the height of the coverage track in pixels.
    pub fn coverage_height(mut self, height: f64) -> Self {
        self.coverage_height = height;
        self
    }

    /// Sets the tunables.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Consumes `self` and attempts to lay out a [`Report`].
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::browser::Browser;
    /// use icarus::reference::References;
    /// use icarus::report::Assembly;
    /// use icarus::report::Reader;
    /// use icarus::report::Report;
    /// use icarus::track;
    ///
    /// let data = b"S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\n\
    ///     1001\t3000\t1\t2000\tchr1\tNODE_1\t99.5\tFalse\n\
    ///     CONTIG\tNODE_1\t2000\tcorrect\n";
    /// let mut reader = Reader::new(&data[..]);
    ///
    /// let report = Report::builder()
    ///     .references(References::try_from_iter([("chr1", 4000)])?)
    ///     .push_assembly(Assembly::from_reader("spades", &mut reader)?)
    ///     .try_build()?;
    ///
    /// let browser = Browser::builder().width(400.0).try_build_from(&report)?;
    /// assert_eq!(browser.blocks().len(), 1);
    /// assert_eq!(browser.pixel_position(2000.0, track::Id::Mini), 200.0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build_from(self, report: &Report) -> Result<Browser> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::InvalidWidth(self.width));
        }

        if !(self.coverage_height.is_finite() && self.coverage_height > 0.0) {
            return Err(Error::InvalidHeight(self.coverage_height));
        }

        let layout = match self.mode {
            Mode::Alignment => self.alignment_layout(report)?,
            Mode::ContigSize => self.contig_size_layout(report)?,
        };

        if layout.domain.width() <= 0.0 {
            return Err(Error::EmptyDomain);
        }

        info!(
            "laid out {} block(s) and {} marker(s) over {} row(s)",
            layout.blocks.len(),
            layout.markers.len(),
            layout.lanes.len()
        );

        let mut viewport = Viewport::new(layout.domain, self.config.viewport().clone());
        viewport.set_extent(layout.initial);

        let state = *viewport.state();
        let [main, mini, coverage, annotation] = track::Id::ALL;
        let tracks = [
            Track::try_new(main, &state, self.width).map_err(Error::Space)?,
            Track::try_new(mini, &state, self.width).map_err(Error::Space)?,
            Track::try_new(coverage, &state, self.width).map_err(Error::Space)?,
            Track::try_new(annotation, &state, self.width).map_err(Error::Space)?,
        ];

        let coverage_axis = match (report.coverage(), self.mode) {
            (Some(profile), Mode::Alignment) => Some(
                profile
                    .y_space(self.coverage_height)
                    .map_err(Error::Space)?,
            ),
            _ => None,
        };

        let mut browser = Browser {
            mode: self.mode,
            viewport,
            tracks,
            filter: self.config.filter().clone(),
            restore_padding: self.config.restore_padding(),
            width: self.width,
            lanes: layout.lanes,
            blocks: layout.blocks,
            markers: layout.markers,
            breakpoints: layout.breakpoints,
            marks: layout.marks,
            references: report.references().clone(),
            features: report.features().clone(),
            coverage: report.coverage().cloned(),
            coverage_axis,
            visible: Visible::default(),
            subscribers: Vec::new(),
            next_subscription: 0,
        };

        browser.refilter();
        Ok(browser)
    }

    /// Places the alignments of every assembly on the concatenated reference
    /// sequences.
    fn alignment_layout(&self, report: &Report) -> Result<Layout> {
        let references = report.references();
        if references.is_empty() {
            return Err(Error::MissingReferences);
        }

        let resolver = self.config.resolver();
        let mut ids = Ids::default();
        let mut layout = Layout::default();

        for assembly in report.assemblies() {
            let lane = layout.lanes.len();
            let mut blocks = Vec::new();
            let mut markers = Vec::new();

            for contig in assembly.contigs() {
                let context = Context::new(assembly.name(), contig.name(), contig.size())
                    .lane(lane)
                    .ambiguous(contig.is_ambiguous())
                    .declared(contig.kind());
                let resolution =
                    resolver.resolve(&context, contig.segments(), references, &mut ids);

                // (1) Every aligned child becomes a top-level block carrying
                // the whole structure of its contig.
                for child in resolution.aligned() {
                    let top = child.with_structure(ids.next_id(), resolution.structure.clone());

                    // (2) Markers are rebuilt against the top-level block.
                    for marker in &resolution.markers {
                        if marker.parent() == Some(child.id()) {
                            markers.push(top.marker(ids.next_id(), marker.misassembled_end_side()));
                        }
                    }

                    blocks.push(top);
                }
            }

            if blocks.is_empty() {
                debug!("no alignment to lay out for assembly `{}`", assembly.name());
                continue;
            }

            // (3) Pack the row and move the markers onto the sub-lane of
            // their block.
            let sub_lanes = self.config.packer().pack(&mut blocks);
            let index = positions(&blocks);

            for marker in markers.iter_mut() {
                if let Some(i) = marker.parent().and_then(|id| index.get(&id)) {
                    marker.set_non_overlapping_lane(blocks[*i].non_overlapping_lane());
                }
            }

            layout.lanes.push(Lane {
                assembly: assembly.name().to_string(),
                sub_lanes,
            });
            layout.blocks.extend(blocks);
            layout.markers.extend(markers);
        }

        // (4) Cross-assembly passes.
        self.config.similar().mark(&mut layout.blocks);
        self.config.overlaps().mark(&mut layout.blocks);

        let domain = Extent::new(0.0, references.total_length() as Position);
        let half = domain.width() * INITIAL_FRACTION / 2.0;

        layout.initial = Extent::new(domain.center() - half, domain.center() + half);
        layout.domain = domain;

        Ok(layout)
    }

    /// Lays out the contigs of every assembly end-to-end by decreasing size.
    fn contig_size_layout(&self, report: &Report) -> Result<Layout> {
        let references = report.references();
        let resolver = self.config.resolver();
        let mut ids = Ids::default();
        let mut layout = Layout::default();
        let mut longest: Position = 0.0;

        for (lane, assembly) in report.assemblies().iter().enumerate() {
            let sorted = assembly.sorted();
            let shown = sorted.len().min(self.config.max_contigs());
            let mut blocks = Vec::new();
            let mut offset: Position = 0.0;

            for contig in &sorted[..shown] {
                let size = contig.size() as Position;
                let kind = if contig.size() < self.config.min_contig() {
                    SegmentType::Short
                } else if references.is_empty() {
                    contig.kind()
                } else {
                    let context = Context::new(assembly.name(), contig.name(), contig.size())
                        .offset(offset)
                        .lane(lane)
                        .ambiguous(contig.is_ambiguous())
                        .declared(contig.kind());
                    let resolution =
                        resolver.resolve(&context, contig.segments(), references, &mut ids);

                    layout.breakpoints.extend(resolution.breakpoints);
                    resolution.kind
                };

                blocks.push(self.contig_block(
                    &mut ids,
                    assembly.name(),
                    contig.name(),
                    offset,
                    contig.size(),
                    lane,
                    kind,
                )?);
                offset += size;
            }

            // Every contig past the limit is collapsed into a single block.
            let hidden = &sorted[shown..];
            if !hidden.is_empty() {
                let size = hidden.iter().map(|contig| contig.size()).sum();
                let name = format!(
                    "{} hidden contigs shorter than {} bp",
                    hidden.len(),
                    sorted[shown - 1].size()
                );

                blocks.push(self.contig_block(
                    &mut ids,
                    assembly.name(),
                    &name,
                    offset,
                    size,
                    lane,
                    SegmentType::Short,
                )?);
                offset += size as Position;
            }

            self.mark_nx(assembly, lane, shown, &mut blocks, &mut layout.marks);

            longest = longest.max(offset);
            layout.lanes.push(Lane {
                assembly: assembly.name().to_string(),
                sub_lanes: 1,
            });
            layout.blocks.extend(blocks);
        }

        layout.domain = Extent::new(0.0, longest);
        layout.initial = Extent::new(0.0, longest * INITIAL_FRACTION);

        Ok(layout)
    }

    /// Builds the block of a contig in the contig-size layout.
    #[allow(clippy::too_many_arguments)]
    fn contig_block(
        &self,
        ids: &mut Ids,
        assembly: &str,
        contig: &str,
        offset: Position,
        size: Number,
        lane: usize,
        kind: SegmentType,
    ) -> Result<Block> {
        block::Builder::default()
            .id(ids.next_id())
            .and_then(|builder| {
                builder
                    .assembly(assembly)
                    .contig(contig)
                    .corrected(offset, offset + size as Position)
                    .contig_span(1, size)
                    .size(size)
                    .lane(lane)
                    .segment_type(kind)
                    .try_build()
            })
            .map_err(Error::Block)
    }

    /// Marks the contig reaching each NX statistic of an assembly.
    ///
    /// The mark lands on the aggregate block when the contig is hidden.
    fn mark_nx(
        &self,
        assembly: &Assembly,
        lane: usize,
        shown: usize,
        blocks: &mut [Block],
        marks: &mut Vec<Mark>,
    ) {
        let sorted = assembly.sorted();

        for percent in self.config.nx() {
            let Some(value) = assembly.nx(*percent) else {
                continue;
            };

            // The last contig of that size, which ties the statistic to a
            // single spot on the contig line.
            let Some(index) = sorted.iter().rposition(|contig| contig.size() == value) else {
                continue;
            };

            let Some(block) = blocks.get_mut(index.min(shown)) else {
                continue;
            };

            let label = format!("N{percent}");
            block.push_mark(label.clone());
            marks.push(Mark {
                label,
                position: block.corrected_end(),
                lane,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::References;

    fn report(references: References) -> Report {
        Report::builder()
            .references(references)
            .push_assembly(Assembly::new("asm", Vec::new()))
            .try_build()
            .unwrap()
    }

    #[test]
    fn it_rejects_invalid_builders() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let references = References::try_from_iter([("chr1", 1000)])?;

        let err = Builder::default()
            .width(0.0)
            .try_build_from(&report(references.clone()))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid track width: 0");

        let err = Builder::default()
            .coverage_height(f64::NAN)
            .try_build_from(&report(references.clone()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeight(_)));

        let err = Builder::default()
            .try_build_from(&report(References::default()))
            .unwrap_err();
        assert!(matches!(err, Error::MissingReferences));

        let err = Builder::default()
            .mode(Mode::ContigSize)
            .try_build_from(&report(references))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyDomain));

        Ok(())
    }

    #[test]
    fn it_skips_rows_of_empty_assemblies() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let references = References::try_from_iter([("chr1", 1000)])?;
        let browser = Builder::default().try_build_from(&report(references))?;

        assert!(browser.lanes().is_empty());
        assert!(browser.blocks().is_empty());
        assert_eq!(browser.viewport_extent(), Extent::new(375.0, 625.0));

        Ok(())
    }
}

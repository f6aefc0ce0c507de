//! The browser: the single entry point of a renderer.
//!
//! A [`Browser`] owns the [`Viewport`], the four [tracks](Track) and every
//! laid-out item. The renderer asks it where things are
//! ([`Browser::pixel_position()`]) and what to draw
//! ([`Browser::visible_blocks()`] and friends), and forwards user input
//! through the `request_*` methods, which are the only mutators.
//!
//! Every applied change of the viewport runs in the same order: the change is
//! applied, every track is rescaled, the visible sets are recomputed, and
//! only then are the subscribers notified. A subscriber therefore always
//! observes a consistent browser.

use std::collections::HashMap;

use tracing::trace;

use crate::annotation::Feature;
use crate::annotation::Features;
use crate::block;
use crate::block::Block;
use crate::core::Extent;
use crate::core::Position;
use crate::coverage;
use crate::coverage::Profile;
use crate::filter;
use crate::filter::Filter;
use crate::location::Location;
use crate::reference::Reference;
use crate::reference::References;
use crate::space::CoordinateSpace;
use crate::structure::breakpoint;
use crate::track;
use crate::track::Track;
use crate::viewport;
use crate::viewport::Handle;
use crate::viewport::Navigation;
use crate::viewport::Observer as _;
use crate::viewport::Pan;
use crate::viewport::Tick;
use crate::viewport::Viewport;
use crate::viewport::Zoom;

pub mod builder;

pub use builder::Builder;

/// The tolerance (in genomic units) when matching a restored location to a
/// block.
const RESTORE_TOLERANCE: f64 = 1.0;

////////////////////////////////////////////////////////////////////////////////////////
// Layout items
////////////////////////////////////////////////////////////////////////////////////////

/// The layout of the browser.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// Alignments placed on the concatenated reference sequences.
    #[default]
    Alignment,

    /// Contigs of every assembly laid end-to-end by decreasing size.
    ContigSize,
}

/// A row of the main track.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lane {
    /// The name of the assembly.
    assembly: String,

    /// The number of sub-lanes.
    sub_lanes: usize,
}

impl Lane {
    /// Gets the name of the assembly.
    pub fn assembly(&self) -> &str {
        &self.assembly
    }

    /// Gets the number of sub-lanes.
    pub fn sub_lanes(&self) -> usize {
        self.sub_lanes
    }
}

/// An NX mark of the contig-size layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// The label (e.g., `N50`).
    label: String,

    /// The position on the contig line.
    position: Position,

    /// The assembly row.
    lane: usize,
}

impl Mark {
    /// Gets the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Gets the position on the contig line.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Gets the assembly row.
    pub fn lane(&self) -> usize {
        self.lane
    }
}

impl filter::Span for Mark {
    fn span(&self) -> (Position, Position) {
        (self.position, self.position)
    }
}

/// A handle to a viewport subscriber.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Subscription(usize);

/// A viewport subscriber.
type Subscriber = Box<dyn FnMut(&viewport::State)>;

/// The indices of the items visible on the main track.
#[derive(Clone, Debug, Default)]
struct Visible {
    /// The visible blocks.
    blocks: Vec<usize>,

    /// The visible broken-end markers.
    markers: Vec<usize>,

    /// The visible breakpoint lines.
    breakpoints: Vec<usize>,

    /// The visible annotation features.
    features: Vec<usize>,

    /// The visible reference sequences.
    references: Vec<usize>,

    /// The visible NX marks.
    marks: Vec<usize>,
}

////////////////////////////////////////////////////////////////////////////////////////
// Browser
////////////////////////////////////////////////////////////////////////////////////////

/// The browser.
pub struct Browser {
    /// The layout.
    mode: Mode,

    /// The shared viewport.
    viewport: Viewport,

    /// The tracks, in [`track::Id::ALL`] order.
    tracks: [Track; 4],

    /// The visible-set filter.
    filter: Filter,

    /// The padding added on both sides of a restored location.
    restore_padding: f64,

    /// The width of the tracks in pixels.
    width: f64,

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

    /// The reference sequences.
    references: References,

    /// The annotation features.
    features: Features,

    /// The read coverage profile.
    coverage: Option<Profile>,

    /// The depth axis of the coverage track.
    coverage_axis: Option<CoordinateSpace>,

    /// The items visible on the main track.
    visible: Visible,

    /// The viewport subscribers.
    subscribers: Vec<(Subscription, Subscriber)>,

    /// The next subscription.
    next_subscription: usize,
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("mode", &self.mode)
            .field("viewport", &self.viewport)
            .field("lanes", &self.lanes)
            .field("blocks", &self.blocks.len())
            .field("markers", &self.markers.len())
            .field("breakpoints", &self.breakpoints.len())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl Browser {
    /// Gets a [`Builder`] for a browser.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Gets the layout.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Gets the width of the tracks in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Gets a track.
    pub fn track(&self, id: track::Id) -> &Track {
        &self.tracks[index(id)]
    }

    /// Gets the rows of the main track.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Gets every top-level block.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Gets every broken-end marker.
    pub fn markers(&self) -> &[Block] {
        &self.markers
    }

    /// Gets every breakpoint line.
    pub fn breakpoints(&self) -> &[breakpoint::Line] {
        &self.breakpoints
    }

    /// Gets every NX mark.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Gets a top-level block by identifier.
    pub fn block(&self, id: block::Id) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    /// Projects a position onto the pixels of a track.
    pub fn pixel_position(&self, position: Position, track: track::Id) -> f64 {
        self.track(track).to_pixel(position)
    }

    /// Gets the visible blocks of a track.
    ///
    /// The main track holds the blocks and broken-end markers of the visible
    /// extent. The overview track holds every block wide enough to be seen
    /// at the overview scale. The other tracks hold no blocks.
    pub fn visible_blocks(&self, track: track::Id) -> Vec<&Block> {
        match track {
            track::Id::Main => self
                .visible
                .blocks
                .iter()
                .map(|i| &self.blocks[*i])
                .chain(self.visible.markers.iter().map(|i| &self.markers[*i]))
                .collect(),
            track::Id::Mini => {
                let mini = self.track(track::Id::Mini);
                Filter::new(0.0).visible(&self.blocks, self.viewport.domain(), mini.space())
            }
            track::Id::Coverage | track::Id::Annotation => Vec::new(),
        }
    }

    /// Gets the visible breakpoint lines.
    pub fn visible_breakpoints(&self) -> Vec<&breakpoint::Line> {
        pick(&self.breakpoints, &self.visible.breakpoints)
    }

    /// Gets the visible annotation features.
    pub fn visible_features(&self) -> Vec<&Feature> {
        pick(self.features.as_slice(), &self.visible.features)
    }

    /// Gets the visible reference sequences.
    pub fn visible_references(&self) -> Vec<&Reference> {
        pick(self.references.as_slice(), &self.visible.references)
    }

    /// Gets the visible NX marks.
    pub fn visible_marks(&self) -> Vec<&Mark> {
        pick(&self.marks, &self.visible.marks)
    }

    /// Gets the visible extent.
    pub fn viewport_extent(&self) -> Extent {
        self.viewport.current()
    }

    /// Gets a snapshot of the viewport.
    pub fn viewport_state(&self) -> viewport::State {
        *self.viewport.state()
    }

    /// Returns whether an animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.viewport.is_animating()
    }

    /// Gets the interval at which the host should call [`Browser::tick()`]
    /// while an animation is in flight.
    pub fn frame_interval(&self) -> std::time::Duration {
        self.viewport.frame_interval()
    }

    /// Registers a callback run after every applied change of the viewport.
    pub fn on_viewport_change<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&viewport::State) + 'static,
    {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((subscription, Box::new(callback)));
        subscription
    }

    /// Removes a subscriber, returning whether it was registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(s, _)| *s != subscription);
        self.subscribers.len() != before
    }

    /// Zooms in or out by `amount` times the visible width.
    pub fn request_zoom(&mut self, direction: Zoom, amount: f64) -> bool {
        let changed = self.viewport.zoom(direction, amount);
        self.publish_if(changed)
    }

    /// Pans left or right by `amount` times the visible width.
    pub fn request_pan(&mut self, direction: Pan, amount: f64) -> bool {
        let changed = self.viewport.pan(direction, amount);
        self.publish_if(changed)
    }

    /// Moves the visible extent to `extent`, optionally animating the
    /// transition.
    ///
    /// A handle is returned when an animation was started; the host then
    /// calls [`Browser::tick()`] every [`Browser::frame_interval()`].
    pub fn request_go_to(&mut self, extent: Extent, animate: bool) -> Option<Handle> {
        if !animate {
            let changed = self.viewport.set_extent(extent);
            self.publish_if(changed);
            return None;
        }

        match self.viewport.animate_to(extent, None) {
            Navigation::Animating(handle) => Some(handle),
            Navigation::Jumped => {
                self.publish();
                None
            }
            Navigation::Unchanged => None,
        }
    }

    /// Centers the visible extent on `position`.
    pub fn request_center(&mut self, position: Position) -> bool {
        let changed = self.viewport.center_on(position);
        self.publish_if(changed)
    }

    /// Advances the in-flight animation by one frame.
    pub fn tick(&mut self) -> Tick {
        let tick = self.viewport.tick();
        self.publish_if(tick.changed());
        tick
    }

    /// Restores a persisted location, padded on both sides.
    ///
    /// Returns the block matching the location's assembly, contig and
    /// extent, if both names were persisted and such a block exists.
    pub fn restore(&mut self, location: &Location) -> Option<block::Id> {
        let extent = location.extent();
        let changed = self.viewport.set_extent(extent.inflate(self.restore_padding));
        self.publish_if(changed);

        let (assembly, contig) = (location.assembly()?, location.contig()?);

        self.blocks
            .iter()
            .find(|block| {
                block.assembly() == assembly
                    && block.contig() == contig
                    && (block.corrected_start() - extent.start()).abs() <= RESTORE_TOLERANCE
                    && (block.corrected_end() - extent.end()).abs() <= RESTORE_TOLERANCE
            })
            .map(|block| block.id())
    }

    /// Gets the location of the visible extent, with the viewed block if
    /// any.
    pub fn location(&self, block: Option<block::Id>) -> Location {
        let location = Location::new(self.viewport.current());

        match block.and_then(|id| self.block(id)) {
            Some(block) => {
                Location::new(block.extent()).with_block(block.assembly(), block.contig())
            }
            None => location,
        }
    }

    /// Gets the coverage bins of the visible extent, drawn on the coverage
    /// track.
    ///
    /// Coverage is only shown in the alignment layout.
    pub fn coverage_bins(&self) -> Vec<coverage::Bin> {
        match (&self.coverage, self.mode) {
            (Some(profile), Mode::Alignment) => {
                profile.bins(self.viewport.current(), self.width.round() as usize)
            }
            _ => Vec::new(),
        }
    }

    /// Gets the coverage bins of the whole domain, drawn on the overview
    /// track.
    pub fn overview_coverage_bins(&self) -> Vec<coverage::Bin> {
        match (&self.coverage, self.mode) {
            (Some(profile), Mode::Alignment) => {
                profile.bins(self.viewport.domain(), self.width.round() as usize)
            }
            _ => Vec::new(),
        }
    }

    /// Gets the depth axis of the coverage track.
    pub fn coverage_axis(&self) -> Option<&CoordinateSpace> {
        self.coverage_axis.as_ref()
    }

    /// Publishes the change of the viewport when `changed` is set.
    fn publish_if(&mut self, changed: bool) -> bool {
        if changed {
            self.publish();
        }

        changed
    }

    /// Publishes an applied change of the viewport: the tracks are synced,
    /// the visible sets are recomputed and the subscribers are notified, in
    /// that order.
    fn publish(&mut self) {
        let state = *self.viewport.state();
        trace!("viewport changed to {}", state.current());

        for track in self.tracks.iter_mut() {
            track.viewport_changed(&state);
        }

        self.refilter();

        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&state);
        }
    }

    /// Recomputes the items visible on the main track.
    fn refilter(&mut self) {
        let current = self.viewport.current();
        let space = self.tracks[index(track::Id::Main)].space();
        let filter = &self.filter;

        self.visible = Visible {
            blocks: filter.select(&self.blocks, current, space),
            markers: filter.select(&self.markers, current, space),
            breakpoints: filter.select(&self.breakpoints, current, space),
            features: filter.select(self.features.as_slice(), current, space),
            references: filter.select(self.references.as_slice(), current, space),
            marks: filter.select(&self.marks, current, space),
        };
    }
}

/// Gets the position of a track in [`track::Id::ALL`].
fn index(id: track::Id) -> usize {
    match id {
        track::Id::Main => 0,
        track::Id::Mini => 1,
        track::Id::Coverage => 2,
        track::Id::Annotation => 3,
    }
}

/// Picks the items at `indices`.
fn pick<'a, T>(items: &'a [T], indices: &[usize]) -> Vec<&'a T> {
    indices.iter().map(|i| &items[*i]).collect()
}

/// Groups the positions of blocks by identifier.
fn positions(blocks: &[Block]) -> HashMap<block::Id, usize> {
    blocks
        .iter()
        .enumerate()
        .map(|(i, block)| (block.id(), i))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::block::EndSide;
    use crate::block::SegmentType;
    use crate::config::Config;
    use crate::report::Assembly;
    use crate::report::Reader;
    use crate::report::Report;

    const HEADER: &str = "S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\n";

    fn assembly(name: &str, data: &str) -> Assembly {
        let mut reader = Reader::new(data.as_bytes());
        Assembly::from_reader(name, &mut reader).unwrap()
    }

    /// Three assemblies of fifty contigs, each contig aligned once.
    fn report() -> Report {
        let mut builder = Report::builder()
            .references(References::try_from_iter([("chr1", 1_300_000)]).unwrap());

        for a in 0..3 {
            let mut data = String::from(HEADER);

            for i in 0..50 {
                let start = i * 25_000 + a * 50 + 1;
                data.push_str(&format!(
                    "{start}\t{}\t1\t20000\tchr1\tNODE_{i}\t99.0\tFalse\nCONTIG\tNODE_{i}\t20000\t\
                     correct\n",
                    start + 19_999
                ));
            }

            builder = builder.push_assembly(assembly(&format!("asm{a}"), &data));
        }

        builder.try_build().unwrap()
    }

    #[test]
    fn it_draws_tracks_at_the_visible_scale() -> Result<(), Box<dyn std::error::Error>> {
        let data = format!(
            "{HEADER}30001\t50000\t1\t20000\tchr1\tNODE_1\t99.0\tFalse\nCONTIG\tNODE_1\t20000\t\
             correct\n"
        );

        let report = Report::builder()
            .references(References::try_from_iter([("chr1", 100_000)])?)
            .push_assembly(assembly("asm", &data))
            .coverage(Profile::try_new(10, vec![5; 10_000])?)
            .features(Features::new(vec![Feature::new("chr1", "dnaA", 40_200.0, 40_700.0)]))
            .try_build()?;

        let mut browser = Browser::builder().width(1000.0).try_build_from(&report)?;
        browser.request_go_to(Extent::new(40_000.0, 41_000.0), false);

        let bins = browser.coverage_bins();
        assert_eq!(bins.len(), 100);

        let (first, last) = (bins[0].start(), bins[bins.len() - 1].end());
        let coverage = (
            browser.pixel_position(first, track::Id::Coverage),
            browser.pixel_position(last, track::Id::Coverage),
        );
        let main = (
            browser.pixel_position(first, track::Id::Main),
            browser.pixel_position(last, track::Id::Main),
        );
        assert_eq!(coverage, main);
        assert_eq!(coverage, (0.0, 1000.0));

        let features = browser.visible_features();
        assert_eq!(features.len(), 1);
        assert_eq!(
            browser.pixel_position(features[0].start(), track::Id::Annotation),
            200.0
        );
        assert_eq!(
            browser.pixel_position(features[0].end(), track::Id::Annotation),
            700.0
        );

        let overview = browser.overview_coverage_bins();
        assert_eq!(overview[0].start(), 0.0);
        assert_eq!(overview[overview.len() - 1].end(), 100_000.0);
        assert!(overview.len() <= 1000);
        assert_eq!(
            browser.pixel_position(overview[overview.len() - 1].end(), track::Id::Mini),
            1000.0
        );

        Ok(())
    }

    #[test]
    fn it_zooms_in_down_to_the_minimum_extent() -> Result<(), Box<dyn std::error::Error>> {
        let mut browser = Browser::builder().width(1000.0).try_build_from(&report())?;

        let domain = browser.viewport_state().domain();
        assert_eq!(domain, Extent::new(0.0, 1_300_000.0));
        assert_eq!(browser.viewport_extent(), Extent::new(487_500.0, 812_500.0));

        assert!(browser.request_go_to(domain, false).is_none());
        assert_eq!(browser.viewport_extent(), domain);
        assert_eq!(browser.visible_blocks(track::Id::Main).len(), 150);

        let mut width = browser.viewport_extent().width();
        for _ in 0..5 {
            assert!(browser.request_zoom(Zoom::In, 0.25));

            let next = browser.viewport_extent().width();
            assert!(next < width);
            assert!(next >= 10.0);
            width = next;
        }

        for block in browser.visible_blocks(track::Id::Main) {
            assert!(browser
                .viewport_extent()
                .intersects(block.corrected_start(), block.corrected_end()));
        }

        assert_eq!(browser.visible_blocks(track::Id::Mini).len(), 150);
        assert!(browser.visible_blocks(track::Id::Coverage).is_empty());

        Ok(())
    }

    #[test]
    fn it_lays_out_assemblies_in_report_order() -> Result<(), Box<dyn std::error::Error>> {
        let browser = Browser::builder().try_build_from(&report())?;

        let names = browser
            .lanes()
            .iter()
            .map(|lane| lane.assembly())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["asm0", "asm1", "asm2"]);
        assert!(browser.lanes().iter().all(|lane| lane.sub_lanes() == 1));

        // Every contig covers the same stretch in every assembly.
        assert!(browser.blocks().iter().all(|block| block.similar()));
        assert!(browser.blocks().iter().all(|block| block.overlaps().is_empty()));
        assert!(browser.blocks().iter().all(|block| block.structure().len() == 1));

        Ok(())
    }

    #[test]
    fn it_notifies_subscribers_after_each_change() -> Result<(), Box<dyn std::error::Error>> {
        let mut browser = Browser::builder().try_build_from(&report())?;
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let subscription =
            browser.on_viewport_change(move |state| sink.borrow_mut().push(state.current()));

        assert!(browser.request_pan(Pan::Right, 0.5));
        assert_eq!(seen.borrow().as_slice(), &[browser.viewport_extent()]);
        assert_eq!(
            browser.track(track::Id::Main).space().domain(),
            browser.viewport_extent()
        );
        assert_eq!(
            browser.track(track::Id::Mini).brush(),
            Some(browser.viewport_extent())
        );

        // Refused requests publish nothing.
        assert!(!browser.request_zoom(Zoom::In, f64::NAN));
        assert_eq!(seen.borrow().len(), 1);

        assert!(browser.unsubscribe(subscription));
        assert!(!browser.unsubscribe(subscription));
        assert!(browser.request_pan(Pan::Left, 0.5));
        assert_eq!(seen.borrow().len(), 1);

        Ok(())
    }

    #[test]
    fn it_publishes_every_animation_frame() -> Result<(), Box<dyn std::error::Error>> {
        let mut browser = Browser::builder().try_build_from(&report())?;
        let frames = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&frames);
        browser.on_viewport_change(move |_| *counter.borrow_mut() += 1);

        let target = Extent::new(0.0, 100_000.0);
        let handle = browser.request_go_to(target, true);
        assert!(handle.is_some());
        assert!(browser.is_animating());

        let mut ticks = 0;
        while browser.tick().is_running() {
            ticks += 1;
        }

        assert_eq!(browser.viewport_extent(), target);
        assert_eq!(*frames.borrow(), ticks + 1);
        assert!(!browser.is_animating());
        assert_eq!(browser.tick(), Tick::Idle);

        Ok(())
    }

    #[test]
    fn it_stops_cancelled_animations_at_the_last_frame() -> Result<(), Box<dyn std::error::Error>> {
        let mut browser = Browser::builder().try_build_from(&report())?;

        let handle = browser
            .request_go_to(Extent::new(0.0, 100_000.0), true)
            .ok_or("expected an animation")?;

        assert!(browser.tick().changed());
        let extent = browser.viewport_extent();

        handle.cancel();
        assert_eq!(browser.tick(), Tick::Cancelled);
        assert_eq!(browser.viewport_extent(), extent);
        assert!(!browser.is_animating());

        Ok(())
    }

    #[test]
    fn it_restores_a_location() -> Result<(), Box<dyn std::error::Error>> {
        let mut browser = Browser::builder().try_build_from(&report())?;

        let location = Location::from_query("?assembly=asm1&contig=NODE_3&start=75051&end=95050")?;
        let id = browser.restore(&location).ok_or("expected a block")?;

        assert_eq!(browser.viewport_extent(), Extent::new(74_051.0, 96_050.0));
        assert_eq!(browser.block(id).map(|block| block.contig()), Some("NODE_3"));
        assert_eq!(browser.location(Some(id)), location);

        let location = Location::from_query("?start=1000&end=2000")?;
        assert_eq!(browser.restore(&location), None);
        assert_eq!(browser.viewport_extent(), Extent::new(0.0, 3000.0));

        Ok(())
    }

    #[test]
    fn it_marks_broken_ends() -> Result<(), Box<dyn std::error::Error>> {
        let data = format!(
            "{HEADER}1\t600\t1\t600\tchr1\tNODE_1\t99.0\tFalse\nrelocation, inconsistency = \
             4400\n5001\t5400\t601\t1000\tchr1\tNODE_1\t99.0\tFalse\nCONTIG\tNODE_1\t1000\t\
             misassembled\n"
        );

        let report = Report::builder()
            .references(References::try_from_iter([("chr1", 10_000)])?)
            .push_assembly(assembly("asm", &data))
            .try_build()?;

        let mut browser = Browser::builder().try_build_from(&report)?;
        browser.request_go_to(Extent::new(0.0, 10_000.0), false);

        assert_eq!(browser.blocks().len(), 2);
        assert!(browser
            .blocks()
            .iter()
            .all(|block| block.segment_type() == SegmentType::Misassembled));

        let sides = browser
            .markers()
            .iter()
            .map(|marker| marker.misassembled_end_side())
            .collect::<Vec<_>>();
        assert_eq!(sides, vec![EndSide::Right, EndSide::Left]);

        for marker in browser.markers() {
            let parent = marker.parent().and_then(|id| browser.block(id)).ok_or("orphan")?;
            assert_eq!(marker.extent(), parent.extent());
            assert_eq!(marker.non_overlapping_lane(), parent.non_overlapping_lane());
        }

        assert_eq!(browser.visible_blocks(track::Id::Main).len(), 4);
        assert!(browser.visible_breakpoints().is_empty());
        assert_eq!(browser.visible_references().len(), 1);

        Ok(())
    }

    #[test]
    fn it_lays_out_contig_sizes_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
        let mut data = String::from(HEADER);
        for (name, size) in [("a", 400), ("b", 3000), ("c", 5000), ("d", 300), ("e", 2000)] {
            data.push_str(&format!("CONTIG\t{name}\t{size}\tunaligned\n"));
        }

        let report = Report::builder()
            .push_assembly(assembly("asm", &data))
            .try_build()?;

        let config = Config::builder().max_contigs(3).try_build()?;
        let browser = Browser::builder()
            .mode(Mode::ContigSize)
            .config(config)
            .try_build_from(&report)?;

        assert_eq!(
            browser.viewport_state().domain(),
            Extent::new(0.0, 10_700.0)
        );
        assert_eq!(browser.viewport_extent(), Extent::new(0.0, 2675.0));

        let blocks = browser.blocks();
        let names = blocks.iter().map(|block| block.contig()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["c", "b", "e", "2 hidden contigs shorter than 2000 bp"]
        );
        assert_eq!(blocks[1].extent(), Extent::new(5000.0, 8000.0));
        assert_eq!(blocks[0].segment_type(), SegmentType::Unaligned);
        assert_eq!(blocks[3].segment_type(), SegmentType::Short);
        assert_eq!(blocks[3].size(), 700);

        let marks = browser
            .marks()
            .iter()
            .map(|mark| (mark.label(), mark.position()))
            .collect::<Vec<_>>();
        assert_eq!(marks, vec![("N50", 8000.0), ("N75", 10_000.0)]);
        assert_eq!(blocks[1].marks(), &[String::from("N50")]);

        assert!(browser.coverage_bins().is_empty());

        Ok(())
    }
}

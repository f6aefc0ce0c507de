//! Annotation features drawn on the annotation track.

use crate::core::Position;
use crate::filter;

/// A feature (e.g., a gene or an operon) on the reference line.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// The name of the sequence the feature was annotated on.
    container: String,

    /// The name.
    name: String,

    /// The start on the reference line.
    start: Position,

    /// The end on the reference line.
    end: Position,

    /// The lane of the feature's container.
    lane: usize,
}

impl Feature {
    /// Creates a new feature.
    ///
    /// The endpoints are reordered if needed.
    pub fn new(
        container: impl Into<String>,
        name: impl Into<String>,
        start: Position,
        end: Position,
    ) -> Self {
        Self {
            container: container.into(),
            name: name.into(),
            start: start.min(end),
            end: start.max(end),
            lane: 0,
        }
    }

    /// Gets the name of the sequence the feature was annotated on.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the start.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Gets the end.
    pub fn end(&self) -> Position {
        self.end
    }

    /// Gets the lane.
    pub fn lane(&self) -> usize {
        self.lane
    }
}

impl filter::Span for Feature {
    fn span(&self) -> (Position, Position) {
        (self.start, self.end)
    }
}

/// The features of a report, one lane per container.
#[derive(Clone, Debug, Default)]
pub struct Features {
    /// The features in input order.
    inner: Vec<Feature>,

    /// The containers in first-seen order.
    containers: Vec<String>,
}

impl Features {
    /// Creates the features, assigning a lane to every distinct container
    /// in first-seen order.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::annotation::Feature;
    /// use icarus::annotation::Features;
    ///
    /// let features = Features::new(vec![
    ///     Feature::new("chr1", "dnaA", 10.0, 200.0),
    ///     Feature::new("plasmid", "repA", 5000.0, 5300.0),
    ///     Feature::new("chr1", "dnaN", 300.0, 900.0),
    /// ]);
    ///
    /// let lanes = features.as_slice().iter().map(|f| f.lane()).collect::<Vec<_>>();
    /// assert_eq!(lanes, vec![0, 1, 0]);
    /// assert_eq!(features.lanes(), 2);
    /// ```
    pub fn new(features: Vec<Feature>) -> Self {
        let mut containers: Vec<String> = Vec::new();
        let mut inner = features;

        for feature in inner.iter_mut() {
            feature.lane = match containers.iter().position(|c| c == &feature.container) {
                Some(lane) => lane,
                None => {
                    containers.push(feature.container.clone());
                    containers.len() - 1
                }
            };
        }

        Self { inner, containers }
    }

    /// Gets the features.
    pub fn as_slice(&self) -> &[Feature] {
        &self.inner
    }

    /// Gets the number of lanes.
    pub fn lanes(&self) -> usize {
        self.containers.len()
    }

    /// Gets the containers in lane order.
    pub fn containers(&self) -> &[String] {
        &self.containers
    }

    /// Returns whether there are no features.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

//! Display rows following the viewport.

use std::str::FromStr;

use tracing::warn;

use crate::core::Extent;
use crate::core::Position;
use crate::space;
use crate::space::CoordinateSpace;
use crate::viewport;

/// An error related to parsing a track [`Id`].
#[derive(Debug, Eq, PartialEq)]
pub struct ParseError(String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid track: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// The identifier of a track.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Id {
    /// The zoomed track displaying the visible extent.
    Main,

    /// The overview track of the whole domain.
    Mini,

    /// The coverage track.
    Coverage,

    /// The annotation track.
    Annotation,
}

impl Id {
    /// Every track, in display order.
    pub const ALL: [Id; 4] = [Id::Main, Id::Mini, Id::Coverage, Id::Annotation];
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Id::Main => write!(f, "main"),
            Id::Mini => write!(f, "mini"),
            Id::Coverage => write!(f, "coverage"),
            Id::Annotation => write!(f, "annotation"),
        }
    }
}

impl FromStr for Id {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Id::Main),
            "mini" => Ok(Id::Mini),
            "coverage" => Ok(Id::Coverage),
            "annotation" => Ok(Id::Annotation),
            _ => Err(ParseError(s.to_string())),
        }
    }
}

/// A track.
///
/// The overview track maps the whole domain and carries the visible extent as
/// a brush. Every other track maps the visible extent onto its pixels, so the
/// coverage bins and features are drawn at the scale of the main track.
#[derive(Clone, Debug)]
pub struct Track {
    /// The identifier.
    id: Id,

    /// The horizontal coordinate space.
    space: CoordinateSpace,

    /// The highlighted visible extent (overview track only).
    brush: Option<Extent>,
}

impl Track {
    /// Attempts to create a track of `width` pixels for a viewport state.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::track::Id;
    /// use icarus::track::Track;
    /// use icarus::viewport::Viewport;
    ///
    /// let mut viewport = Viewport::new(Extent::new(0.0, 1000.0), Default::default());
    /// viewport.set_extent(Extent::new(250.0, 500.0));
    ///
    /// let main = Track::try_new(Id::Main, viewport.state(), 100.0)?;
    /// assert_eq!(main.to_pixel(250.0), 0.0);
    /// assert_eq!(main.brush(), None);
    ///
    /// let coverage = Track::try_new(Id::Coverage, viewport.state(), 100.0)?;
    /// assert_eq!(coverage.to_pixel(500.0), 100.0);
    ///
    /// let mini = Track::try_new(Id::Mini, viewport.state(), 100.0)?;
    /// assert_eq!(mini.to_pixel(250.0), 25.0);
    /// assert_eq!(mini.brush(), Some(Extent::new(250.0, 500.0)));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(id: Id, state: &viewport::State, width: f64) -> Result<Self, space::Error> {
        let (domain, brush) = match id {
            Id::Mini => (state.domain(), Some(state.current())),
            _ => (state.current(), None),
        };

        Ok(Self {
            id,
            space: CoordinateSpace::linear(domain, width)?,
            brush,
        })
    }

    /// Gets the identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Gets the horizontal coordinate space.
    pub fn space(&self) -> &CoordinateSpace {
        &self.space
    }

    /// Gets the brush.
    pub fn brush(&self) -> Option<Extent> {
        self.brush
    }

    /// Projects a position onto the track's pixels.
    pub fn to_pixel(&self, position: Position) -> f64 {
        self.space.to_pixel(position)
    }
}

impl viewport::Observer for Track {
    fn viewport_changed(&mut self, state: &viewport::State) {
        let domain = match self.id {
            Id::Mini => {
                self.brush = Some(state.current());
                state.domain()
            }
            _ => state.current(),
        };

        if let Err(err) = self.space.rescale(domain) {
            warn!("keeping the previous domain of the {} track: {err}", self.id);
        }
    }
}

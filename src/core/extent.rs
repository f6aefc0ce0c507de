//! A genomic extent along a corrected coordinate line.
//!
//! Every row of the browser shares a single, linear coordinate line. In the
//! alignment layout, the line is the concatenation of every reference
//! sequence; in the contig-size layout, it is the concatenation of the contigs
//! of an assembly. An [`Extent`] is a window `[start, end]` on that line.
//!
//! ## Parsing Extents
//!
//! Extents are parsed from (and displayed as) `<start>-<end>` (e.g.,
//! `1000-2000`). The endpoints are reordered when `start` is greater than
//! `end`, so an extent is never inverted.

use std::num::ParseFloatError;
use std::str::FromStr;

/// A position along the corrected coordinate line.
pub type Position = f64;

/// The delimiter between the start and end of a serialized extent.
const DELIMITER: char = '-';

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to parsing an extent.
#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The value did not have the `<start>-<end>` format.
    InvalidFormat(String),

    /// The start position could not be parsed.
    InvalidStart(ParseFloatError),

    /// The end position could not be parsed.
    InvalidEnd(ParseFloatError),

    /// A position was not a finite number.
    NonFinite(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidFormat(value) => {
                write!(f, "invalid format: expected <start>-<end>, found `{value}`")
            }
            ParseError::InvalidStart(err) => write!(f, "invalid start position: {err}"),
            ParseError::InvalidEnd(err) => write!(f, "invalid end position: {err}"),
            ParseError::NonFinite(value) => write!(f, "non-finite position: `{value}`"),
        }
    }
}

impl std::error::Error for ParseError {}

////////////////////////////////////////////////////////////////////////////////////////
// Extent
////////////////////////////////////////////////////////////////////////////////////////

/// A closed window `[start, end]` along the corrected coordinate line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    /// The start position.
    start: Position,

    /// The end position.
    end: Position,
}

impl Extent {
    /// Creates a new extent, reordering the endpoints if needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    ///
    /// let extent = Extent::new(2000.0, 1000.0);
    /// assert_eq!(extent.start(), 1000.0);
    /// assert_eq!(extent.end(), 2000.0);
    /// ```
    pub fn new(start: Position, end: Position) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Gets the start position.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Gets the end position.
    pub fn end(&self) -> Position {
        self.end
    }

    /// Gets the width of the extent.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    ///
    /// assert_eq!(Extent::new(1000.0, 2000.0).width(), 1000.0);
    /// ```
    pub fn width(&self) -> Position {
        self.end - self.start
    }

    /// Gets the midpoint of the extent.
    pub fn center(&self) -> Position {
        self.start + self.width() / 2.0
    }

    /// Returns whether both endpoints are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    /// Returns whether the position falls within the extent (inclusive).
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Returns whether a `[start, end)` range intersects the extent.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    ///
    /// let extent = Extent::new(1000.0, 2000.0);
    /// assert!(extent.intersects(1500.0, 1600.0));
    /// assert!(extent.intersects(500.0, 1001.0));
    /// assert!(!extent.intersects(2000.0, 2100.0));
    /// assert!(!extent.intersects(0.0, 1000.0));
    /// ```
    pub fn intersects(&self, start: Position, end: Position) -> bool {
        start < self.end && end > self.start
    }

    /// Returns a copy of the extent shifted by `delta`.
    pub fn shift(&self, delta: Position) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Returns a copy of the extent grown by `delta` on both sides.
    ///
    /// A negative `delta` shrinks the extent. The extent never inverts: if the
    /// shrinking would cross the endpoints, both collapse onto the center.
    pub fn inflate(&self, delta: Position) -> Self {
        let start = self.start - delta;
        let end = self.end + delta;

        if start <= end {
            Self { start, end }
        } else {
            let center = self.center();
            Self {
                start: center,
                end: center,
            }
        }
    }

    /// Clamps the extent within `domain`, guaranteeing that the result is at
    /// least `minimum` wide.
    ///
    /// The width is first raised to `minimum` (growing around the center) and
    /// capped at the domain width; the window is then shifted, preserving its
    /// width, until it lies within the domain. When the domain is narrower
    /// than `minimum`, the whole domain is returned. Clamping is idempotent.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    ///
    /// let domain = Extent::new(0.0, 1000.0);
    ///
    /// let clamped = Extent::new(-50.0, 100.0).clamp_within(domain, 10.0);
    /// assert_eq!(clamped, Extent::new(0.0, 150.0));
    ///
    /// let clamped = Extent::new(2000.0, 2100.0).clamp_within(domain, 10.0);
    /// assert_eq!(clamped, Extent::new(900.0, 1000.0));
    ///
    /// let clamped = Extent::new(500.0, 502.0).clamp_within(domain, 10.0);
    /// assert_eq!(clamped, Extent::new(496.0, 506.0));
    /// ```
    pub fn clamp_within(&self, domain: Extent, minimum: Position) -> Self {
        if domain.width() <= minimum {
            return domain;
        }

        let mut extent = *self;

        if extent.width() < minimum {
            extent = extent.inflate((minimum - extent.width()) / 2.0);
        }

        if extent.width() >= domain.width() {
            return domain;
        }

        let width = extent.width();
        let start = extent.start.clamp(domain.start, domain.end - width);

        Self {
            start,
            end: start + width,
        }
    }

    /// Linearly interpolates between `self` (at `t = 0`) and `other` (at `t =
    /// 1`).
    pub fn lerp(&self, other: &Extent, t: f64) -> Self {
        Self::new(
            self.start + (other.start - self.start) * t,
            self.end + (other.end - self.end) * t,
        )
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{DELIMITER}{}", self.start, self.end)
    }
}

impl FromStr for Extent {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .trim()
            .split_once(DELIMITER)
            .ok_or_else(|| ParseError::InvalidFormat(s.to_string()))?;

        let start = start
            .trim()
            .replace(',', "")
            .parse::<Position>()
            .map_err(ParseError::InvalidStart)?;
        let end = end
            .trim()
            .replace(',', "")
            .parse::<Position>()
            .map_err(ParseError::InvalidEnd)?;

        if !start.is_finite() || !end.is_finite() {
            return Err(ParseError::NonFinite(s.to_string()));
        }

        Ok(Self::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_reorders_inverted_endpoints() {
        let extent = Extent::new(10.0, 5.0);
        assert_eq!(extent.start(), 5.0);
        assert_eq!(extent.end(), 10.0);
        assert_eq!(extent.width(), 5.0);
    }

    #[test]
    fn it_parses_and_displays_an_extent() -> Result<(), Box<dyn std::error::Error>> {
        let extent = "1000-2000".parse::<Extent>()?;
        assert_eq!(extent, Extent::new(1000.0, 2000.0));
        assert_eq!(extent.to_string(), "1000-2000");

        let extent = " 1,000 - 2,500 ".parse::<Extent>()?;
        assert_eq!(extent, Extent::new(1000.0, 2500.0));

        let extent = "2000-1000".parse::<Extent>()?;
        assert_eq!(extent, Extent::new(1000.0, 2000.0));

        Ok(())
    }

    #[test]
    fn it_round_trips_a_fractional_extent() -> Result<(), Box<dyn std::error::Error>> {
        let extent = Extent::new(1000.25, 2000.5);
        assert_eq!(extent.to_string().parse::<Extent>()?, extent);
        Ok(())
    }

    #[test]
    fn it_fails_to_parse_invalid_extents() {
        let err = "1000".parse::<Extent>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid format: expected <start>-<end>, found `1000`"
        );

        let err = "a-1000".parse::<Extent>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidStart(_)));

        let err = "1000-b".parse::<Extent>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidEnd(_)));

        let err = "1000-inf".parse::<Extent>().unwrap_err();
        assert!(matches!(err, ParseError::NonFinite(_)));
    }

    #[test]
    fn it_clamps_within_a_domain() {
        let domain = Extent::new(0.0, 1000.0);

        // Already valid.
        let extent = Extent::new(100.0, 200.0);
        assert_eq!(extent.clamp_within(domain, 10.0), extent);

        // Wider than the domain.
        let extent = Extent::new(-100.0, 2000.0);
        assert_eq!(extent.clamp_within(domain, 10.0), domain);

        // Too narrow, at the domain edge.
        let extent = Extent::new(998.0, 1000.0);
        assert_eq!(
            extent.clamp_within(domain, 10.0),
            Extent::new(990.0, 1000.0)
        );

        // A domain narrower than the minimum.
        let extent = Extent::new(1.0, 2.0);
        let tiny = Extent::new(0.0, 5.0);
        assert_eq!(extent.clamp_within(tiny, 10.0), tiny);
    }

    #[test]
    fn it_clamps_idempotently() {
        let domain = Extent::new(0.0, 1000.0);
        let inputs = [
            Extent::new(-500.0, -100.0),
            Extent::new(5.0, 6.0),
            Extent::new(990.0, 4000.0),
            Extent::new(250.0, 750.0),
            Extent::new(-1e9, 1e9),
        ];

        for input in inputs {
            let once = input.clamp_within(domain, 10.0);
            let twice = once.clamp_within(domain, 10.0);
            assert_eq!(once, twice);
            assert!(once.width() >= 10.0);
            assert!(once.start() >= domain.start());
            assert!(once.end() <= domain.end());
        }
    }

    #[test]
    fn it_inflates_and_shrinks() {
        let extent = Extent::new(100.0, 200.0);
        assert_eq!(extent.inflate(10.0), Extent::new(90.0, 210.0));
        assert_eq!(extent.inflate(-10.0), Extent::new(110.0, 190.0));
        assert_eq!(extent.inflate(-100.0), Extent::new(150.0, 150.0));
    }

    #[test]
    fn it_interpolates() {
        let from = Extent::new(0.0, 100.0);
        let to = Extent::new(1000.0, 1200.0);
        assert_eq!(from.lerp(&to, 0.0), from);
        assert_eq!(from.lerp(&to, 1.0), to);
        assert_eq!(from.lerp(&to, 0.5), Extent::new(500.0, 650.0));
    }
}

//! Mappings between the corrected coordinate line and pixels.
//!
//! A [`CoordinateSpace`] maps a genomic domain onto a pixel range, either
//! linearly (every horizontal track) or logarithmically (the depth axis of
//! the coverage track). A space holds nothing but its bounds, so rescaling a
//! space can never leave a stale projection behind.

use crate::core::Extent;

/// The floor applied to every value projected through a logarithmic space.
///
/// Coverage depths of zero are drawn at the floor instead of at negative
/// infinity.
pub const EPSILON: f64 = 0.1;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a [`CoordinateSpace`].
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The domain has zero width.
    EmptyDomain(Extent),

    /// The pixel range has zero width.
    EmptyRange(f64, f64),

    /// A bound was not a finite number.
    NonFinite,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyDomain(domain) => write!(f, "empty domain: {domain}"),
            Error::EmptyRange(start, end) => write!(f, "empty pixel range: {start}-{end}"),
            Error::NonFinite => write!(f, "non-finite bound"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Scales
////////////////////////////////////////////////////////////////////////////////////////

/// The kind of mapping performed by a [`CoordinateSpace`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scale {
    /// A linear mapping.
    Linear,

    /// A logarithmic mapping with every value floored at [`EPSILON`].
    Logarithmic,
}

impl Scale {
    /// Transforms a value into the space in which interpolation happens.
    fn forward(&self, value: f64) -> f64 {
        match self {
            Scale::Linear => value,
            Scale::Logarithmic => value.max(EPSILON).ln(),
        }
    }

    /// The inverse of [`Scale::forward()`].
    fn backward(&self, value: f64) -> f64 {
        match self {
            Scale::Linear => value,
            Scale::Logarithmic => value.exp(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Coordinate spaces
////////////////////////////////////////////////////////////////////////////////////////

/// A mapping from a genomic domain onto a pixel range.
///
/// The pixel range may be inverted (e.g., `(height, 0.0)` for a vertical axis
/// that grows upwards), in which case the mapping is decreasing.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateSpace {
    /// The scale of the mapping.
    scale: Scale,

    /// The genomic domain.
    domain: Extent,

    /// The pixel range.
    pixels: (f64, f64),
}

impl CoordinateSpace {
    /// Attempts to create a new coordinate space.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::space::CoordinateSpace;
    /// use icarus::space::Scale;
    ///
    /// let space = CoordinateSpace::try_new(
    ///     Scale::Linear,
    ///     Extent::new(1000.0, 2000.0),
    ///     (0.0, 100.0),
    /// )?;
    ///
    /// assert_eq!(space.to_pixel(1500.0), 50.0);
    /// assert_eq!(space.to_genomic(25.0), 1250.0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(scale: Scale, domain: Extent, pixels: (f64, f64)) -> Result<Self> {
        validate(scale, domain, pixels)?;

        Ok(Self {
            scale,
            domain,
            pixels,
        })
    }

    /// Attempts to create a new linear coordinate space from `domain` onto
    /// `[0, width]` pixels.
    pub fn linear(domain: Extent, width: f64) -> Result<Self> {
        Self::try_new(Scale::Linear, domain, (0.0, width))
    }

    /// Gets the scale of the space.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Gets the genomic domain of the space.
    pub fn domain(&self) -> Extent {
        self.domain
    }

    /// Gets the pixel range of the space.
    pub fn pixels(&self) -> (f64, f64) {
        self.pixels
    }

    /// Projects a genomic position onto the pixel range.
    ///
    /// Positions outside of the domain extrapolate along the same mapping.
    pub fn to_pixel(&self, position: f64) -> f64 {
        let (d0, d1) = self.transformed_domain();
        let (r0, r1) = self.pixels;

        let t = (self.scale.forward(position) - d0) / (d1 - d0);
        r0 + t * (r1 - r0)
    }

    /// Projects a pixel back onto the genomic domain.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::space::CoordinateSpace;
    /// use icarus::space::Scale;
    ///
    /// let space = CoordinateSpace::try_new(
    ///     Scale::Logarithmic,
    ///     Extent::new(1.0, 1000.0),
    ///     (0.0, 300.0),
    /// )?;
    ///
    /// let pixel = space.to_pixel(10.0);
    /// assert!((pixel - 100.0).abs() < 1e-9);
    /// assert!((space.to_genomic(pixel) - 10.0).abs() < 1e-9);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_genomic(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.transformed_domain();
        let (r0, r1) = self.pixels;

        let t = (pixel - r0) / (r1 - r0);
        self.scale.backward(d0 + t * (d1 - d0))
    }

    /// Replaces the domain while keeping the pixel range.
    ///
    /// If the new domain is invalid, an error is returned and the space is
    /// left unchanged.
    pub fn rescale(&mut self, domain: Extent) -> Result<()> {
        validate(self.scale, domain, self.pixels)?;
        self.domain = domain;
        Ok(())
    }

    /// Gets the domain after the scale's forward transform.
    fn transformed_domain(&self) -> (f64, f64) {
        (
            self.scale.forward(self.domain.start()),
            self.scale.forward(self.domain.end()),
        )
    }
}

/// Validates the bounds of a coordinate space.
fn validate(scale: Scale, domain: Extent, pixels: (f64, f64)) -> Result<()> {
    if !domain.is_finite() || !pixels.0.is_finite() || !pixels.1.is_finite() {
        return Err(Error::NonFinite);
    }

    if scale.forward(domain.start()) == scale.forward(domain.end()) {
        return Err(Error::EmptyDomain(domain));
    }

    if pixels.0 == pixels.1 {
        return Err(Error::EmptyRange(pixels.0, pixels.1));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Asserts that two values are equal within a relative tolerance.
    fn assert_close(a: f64, b: f64) {
        let tolerance = 1e-6 * a.abs().max(b.abs()).max(1.0);
        assert!((a - b).abs() <= tolerance, "{a} != {b}");
    }

    #[test]
    fn it_round_trips_linear_positions() -> Result<()> {
        let space = CoordinateSpace::linear(Extent::new(0.0, 3_000_000.0), 1280.0)?;

        for position in [0.0, 1.0, 1234.5, 999_999.0, 2_999_999.0, 3_000_000.0] {
            assert_close(space.to_genomic(space.to_pixel(position)), position);
        }

        Ok(())
    }

    #[test]
    fn it_round_trips_logarithmic_positions() -> Result<()> {
        let space = CoordinateSpace::try_new(
            Scale::Logarithmic,
            Extent::new(EPSILON, 5000.0),
            (200.0, 0.0),
        )?;

        for position in [EPSILON, 1.0, 7.5, 100.0, 4999.0] {
            assert_close(space.to_genomic(space.to_pixel(position)), position);
        }

        Ok(())
    }

    #[test]
    fn it_is_monotonic_for_increasing_ranges() -> Result<()> {
        let linear = CoordinateSpace::linear(Extent::new(100.0, 200.0), 50.0)?;
        let log = CoordinateSpace::try_new(
            Scale::Logarithmic,
            Extent::new(1.0, 1000.0),
            (0.0, 50.0),
        )?;

        let positions = [-10.0, 0.0, 0.5, 1.0, 99.0, 150.0, 150.5, 200.0, 1e6];

        for space in [linear, log] {
            for pair in positions.windows(2) {
                assert!(space.to_pixel(pair[0]) <= space.to_pixel(pair[1]));
            }
        }

        Ok(())
    }

    #[test]
    fn it_floors_logarithmic_values() -> Result<()> {
        let space = CoordinateSpace::try_new(
            Scale::Logarithmic,
            Extent::new(EPSILON, 1000.0),
            (100.0, 0.0),
        )?;

        assert_eq!(space.to_pixel(0.0), space.to_pixel(EPSILON));
        assert_eq!(space.to_pixel(-5.0), 100.0);

        Ok(())
    }

    #[test]
    fn it_rejects_empty_domains_and_ranges() {
        let err = CoordinateSpace::linear(Extent::new(5.0, 5.0), 100.0).unwrap_err();
        assert_eq!(err.to_string(), "empty domain: 5-5");

        let err = CoordinateSpace::linear(Extent::new(0.0, 5.0), 0.0).unwrap_err();
        assert_eq!(err.to_string(), "empty pixel range: 0-0");

        // Both endpoints are floored onto the same value.
        let err =
            CoordinateSpace::try_new(Scale::Logarithmic, Extent::new(0.0, 0.05), (0.0, 10.0))
                .unwrap_err();
        assert!(matches!(err, Error::EmptyDomain(_)));

        let err = CoordinateSpace::linear(Extent::new(0.0, f64::INFINITY), 10.0).unwrap_err();
        assert_eq!(err, Error::NonFinite);
    }

    #[test]
    fn it_rescales() -> Result<()> {
        let mut space = CoordinateSpace::linear(Extent::new(0.0, 100.0), 100.0)?;
        assert_eq!(space.to_pixel(50.0), 50.0);

        space.rescale(Extent::new(50.0, 150.0))?;
        assert_eq!(space.to_pixel(50.0), 0.0);
        assert_eq!(space.pixels(), (0.0, 100.0));

        assert!(space.rescale(Extent::new(10.0, 10.0)).is_err());
        assert_eq!(space.domain(), Extent::new(50.0, 150.0));

        Ok(())
    }
}

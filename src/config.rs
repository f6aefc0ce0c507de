//! Every tunable of the browser.

use omics::coordinate::position::Number;

use crate::filter::Filter;
use crate::layout::Packer;
use crate::layout::overlaps;
use crate::layout::similar;
use crate::structure::Resolver;
use crate::viewport;

/// The default padding added on both sides of a restored location.
pub const DEFAULT_RESTORE_PADDING: f64 = 1000.0;

/// The default size below which a contig is short.
pub const DEFAULT_MIN_CONTIG: Number = 500;

/// The default number of contigs laid out per assembly in the contig-size
/// layout.
pub const DEFAULT_MAX_CONTIGS: usize = 1000;

/// The default NX statistics marked in the contig-size layout.
pub const DEFAULT_NX: [f64; 2] = [50.0, 75.0];

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a [`Builder`].
#[derive(Debug, PartialEq)]
pub enum Error {
    /// A value was out of range.
    Invalid(&'static str, f64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Invalid(name, value) => write!(f, "invalid {name}: {value}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Configuration
////////////////////////////////////////////////////////////////////////////////////////

/// Every tunable of the browser.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The viewport tunables.
    viewport: viewport::Config,

    /// The sub-lane packer.
    packer: Packer,

    /// The structure resolver.
    resolver: Resolver,

    /// The visible-set filter.
    filter: Filter,

    /// The detector of similar blocks.
    similar: similar::Detector,

    /// The detector of overlapping blocks.
    overlaps: overlaps::Detector,

    /// The padding added on both sides of a restored location.
    restore_padding: f64,

    /// The size below which a contig is short.
    min_contig: Number,

    /// The number of contigs laid out per assembly in the contig-size layout.
    max_contigs: usize,

    /// The NX statistics marked in the contig-size layout.
    nx: Vec<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport: viewport::Config::default(),
            packer: Packer::default(),
            resolver: Resolver::default(),
            filter: Filter::default(),
            similar: similar::Detector::default(),
            overlaps: overlaps::Detector::default(),
            restore_padding: DEFAULT_RESTORE_PADDING,
            min_contig: DEFAULT_MIN_CONTIG,
            max_contigs: DEFAULT_MAX_CONTIGS,
            nx: DEFAULT_NX.to_vec(),
        }
    }
}

impl Config {
    /// Gets a [`Builder`] starting from the default values.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Gets the viewport tunables.
    pub fn viewport(&self) -> &viewport::Config {
        &self.viewport
    }

    /// Gets the sub-lane packer.
    pub fn packer(&self) -> &Packer {
        &self.packer
    }

    /// Gets the structure resolver.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Gets the visible-set filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Gets the detector of similar blocks.
    pub fn similar(&self) -> &similar::Detector {
        &self.similar
    }

    /// Gets the detector of overlapping blocks.
    pub fn overlaps(&self) -> &overlaps::Detector {
        &self.overlaps
    }

    /// Gets the padding added on both sides of a restored location.
    pub fn restore_padding(&self) -> f64 {
        self.restore_padding
    }

    /// Gets the size below which a contig is short.
    pub fn min_contig(&self) -> Number {
        self.min_contig
    }

    /// Gets the number of contigs laid out per assembly in the contig-size
    /// layout.
    pub fn max_contigs(&self) -> usize {
        self.max_contigs
    }

    /// Gets the NX statistics marked in the contig-size layout.
    pub fn nx(&self) -> &[f64] {
        &self.nx
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Builder
////////////////////////////////////////////////////////////////////////////////////////

/// A builder for a [`Config`].
#[derive(Debug, Default)]
pub struct Builder(Config);

impl Builder {
    /// Sets the viewport tunables.
    pub fn viewport(mut self, viewport: viewport::Config) -> Self {
        self.0.viewport = viewport;
        self
    }

    /// Sets the sub-lane packer.
    pub fn packer(mut self, packer: Packer) -> Self {
        self.0.packer = packer;
        self
    }

    /// Sets the structure resolver.
    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.0.resolver = resolver;
        self
    }

    /// Sets the visible-set filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.0.filter = filter;
        self
    }

    /// Sets the detector of similar blocks.
    pub fn similar(mut self, similar: similar::Detector) -> Self {
        self.0.similar = similar;
        self
    }

    /// Sets the detector of overlapping blocks.
    pub fn overlaps(mut self, overlaps: overlaps::Detector) -> Self {
        self.0.overlaps = overlaps;
        self
    }

    /// Sets the padding added on both sides of a restored location.
    pub fn restore_padding(mut self, padding: f64) -> Self {
        self.0.restore_padding = padding;
        self
    }

    /// Sets the size below which a contig is short.
    pub fn min_contig(mut self, size: Number) -> Self {
        self.0.min_contig = size;
        self
    }

    /// Sets the number of contigs laid out per assembly in the contig-size
    /// layout.
    pub fn max_contigs(mut self, count: usize) -> Self {
        self.0.max_contigs = count;
        self
    }

    /// Sets the NX statistics marked in the contig-size layout.
    pub fn nx(mut self, nx: Vec<f64>) -> Self {
        self.0.nx = nx;
        self
    }

    /// Consumes `self` and attempts to build a [`Config`].
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::config::Config;
    /// use icarus::viewport;
    ///
    /// let config = Config::builder().max_contigs(50).nx(vec![50.0, 90.0]).try_build()?;
    /// assert_eq!(config.max_contigs(), 50);
    /// assert_eq!(config.viewport().minimum_extent, 10.0);
    ///
    /// let viewport = viewport::Config {
    ///     minimum_extent: 0.0,
    ///     ..Default::default()
    /// };
    /// let err = Config::builder().viewport(viewport).try_build().unwrap_err();
    /// assert_eq!(err.to_string(), "invalid minimum extent: 0");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Config> {
        let config = self.0;

        let positive = |name: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::Invalid(name, value))
            }
        };

        let non_negative = |name: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(Error::Invalid(name, value))
            }
        };

        positive("minimum extent", config.viewport.minimum_extent)?;
        non_negative("minimum step", config.viewport.minimum_step)?;
        non_negative(
            "frame interval",
            config.viewport.animation.frame_interval.as_secs_f64(),
        )?;
        non_negative("minimum pixel width", config.filter.min_pixel_width())?;
        positive("overlap fraction", config.packer.overlap_fraction())?;
        non_negative("breakpoint tolerance", config.resolver.breakpoint_tolerance())?;
        non_negative("restore padding", config.restore_padding)?;
        positive("maximum contig count", config.max_contigs as f64)?;

        for nx in &config.nx {
            if !(*nx > 0.0 && *nx <= 100.0) {
                return Err(Error::Invalid("NX percentage", *nx));
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.restore_padding(), 1000.0);
        assert_eq!(config.min_contig(), 500);
        assert_eq!(config.max_contigs(), 1000);
        assert_eq!(config.nx(), &[50.0, 75.0]);
        assert_eq!(config.filter().min_pixel_width(), 1.0);
        assert_eq!(config.resolver().skip_threshold(), 5);
    }

    #[test]
    fn it_rejects_invalid_values() {
        let err = Config::builder().max_contigs(0).try_build().unwrap_err();
        assert_eq!(err, Error::Invalid("maximum contig count", 0.0));

        let err = Config::builder().nx(vec![50.0, 150.0]).try_build().unwrap_err();
        assert_eq!(err.to_string(), "invalid NX percentage: 150");

        let err = Config::builder()
            .restore_padding(f64::NAN)
            .try_build()
            .unwrap_err();
        assert!(matches!(err, Error::Invalid("restore padding", _)));
    }
}

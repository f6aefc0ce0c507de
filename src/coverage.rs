//! Read coverage along the reference line.

use crate::core::Extent;
use crate::core::Position;
use crate::space;
use crate::space::CoordinateSpace;
use crate::space::Scale;

/// The default number of reference bases covered by each depth value.
pub const DEFAULT_FACTOR: usize = 10;

/// The number of ticks of the depth axis.
const TICKS: usize = 5;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a coverage [`Profile`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The number of bases per depth value was zero.
    ZeroFactor,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ZeroFactor => write!(f, "coverage factor must be positive"),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////////////////////
// Bins
////////////////////////////////////////////////////////////////////////////////////////

/// The mean depth over a stretch of the reference line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bin {
    /// The start.
    start: Position,

    /// The end.
    end: Position,

    /// The mean depth, or zero when the mean is below one.
    depth: f64,
}

impl Bin {
    /// Gets the start.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Gets the end.
    pub fn end(&self) -> Position {
        self.end
    }

    /// Gets the mean depth.
    pub fn depth(&self) -> f64 {
        self.depth
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Profiles
////////////////////////////////////////////////////////////////////////////////////////

/// A coverage profile.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    /// The number of bases covered by each depth value.
    factor: usize,

    /// The depth values.
    depths: Vec<u32>,
}

impl Profile {
    /// Attempts to create a new profile where each depth covers `factor`
    /// bases.
    pub fn try_new(factor: usize, depths: Vec<u32>) -> Result<Self, Error> {
        if factor == 0 {
            return Err(Error::ZeroFactor);
        }

        Ok(Self { factor, depths })
    }

    /// Gets the number of bases covered by each depth value.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Gets the depth values.
    pub fn depths(&self) -> &[u32] {
        &self.depths
    }

    /// Gets the largest depth value.
    pub fn max_depth(&self) -> u32 {
        self.depths.iter().copied().max().unwrap_or_default()
    }

    /// Computes contiguous bins of mean depth over `extent`, using at most
    /// `max_points` bins.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::coverage::Profile;
    ///
    /// let profile = Profile::try_new(10, vec![4, 8, 0, 0, 2, 2])?;
    /// let bins = profile.bins(Extent::new(0.0, 60.0), 3);
    ///
    /// let depths = bins.iter().map(|bin| bin.depth()).collect::<Vec<_>>();
    /// assert_eq!(depths, vec![6.0, 0.0, 2.0]);
    /// assert_eq!(bins[0].start(), 0.0);
    /// assert_eq!(bins[2].end(), 60.0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn bins(&self, extent: Extent, max_points: usize) -> Vec<Bin> {
        let factor = self.factor as f64;
        let length = extent.width() / factor;

        if length <= 0.0 || max_points == 0 || self.depths.is_empty() {
            return Vec::new();
        }

        let points = length.min(max_points as f64);
        let step = ((length / points).round() as usize).max(1);
        let last = extent.end() / factor;

        let first = (extent.start().max(0.0) / factor / step as f64).floor() as usize * step;
        let mut bins = Vec::new();

        for i in (first..).step_by(step) {
            if i >= self.depths.len() {
                break;
            }

            let window = &self.depths[i..(i + step).min(self.depths.len())];
            let mean =
                window.iter().map(|depth| f64::from(*depth)).sum::<f64>() / window.len() as f64;

            let next = last.min((i + step) as f64);
            let start = if i == first {
                extent.start()
            } else {
                i as f64 * factor
            };

            let end = if next >= last {
                extent.end()
            } else {
                next * factor
            };

            bins.push(Bin {
                start,
                end,
                depth: if mean >= 1.0 { mean } else { 0.0 },
            });

            if next >= last {
                break;
            }
        }

        bins
    }

    /// Gets the top of the depth axis: the largest depth rounded up to the
    /// next tick.
    pub fn next_max(&self) -> f64 {
        let max = f64::from(self.max_depth()).max(1.0);
        let step = tick_step(space::EPSILON, max, TICKS);
        step.max((max / step).ceil() * step)
    }

    /// Attempts to create the logarithmic depth axis of a coverage track that
    /// is `height` pixels tall.
    ///
    /// Depths grow upwards, so the pixel range is `(height, 0)`.
    pub fn y_space(&self, height: f64) -> Result<CoordinateSpace, space::Error> {
        CoordinateSpace::try_new(
            Scale::Logarithmic,
            Extent::new(space::EPSILON, self.next_max()),
            (height, 0.0),
        )
    }
}

/// Gets a round tick step dividing `[start, end]` into roughly `count` ticks.
fn tick_step(start: f64, end: f64, count: usize) -> f64 {
    let raw = (end - start).abs() / count.max(1) as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;

    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    factor * power
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_rejects_a_zero_factor() {
        let err = Profile::try_new(0, vec![1, 2]).unwrap_err();
        assert_eq!(err.to_string(), "coverage factor must be positive");
    }

    #[test]
    fn it_bins_contiguously_within_bounds() -> Result<(), Box<dyn std::error::Error>> {
        let depths = (0..1000).map(|i| (i % 37) as u32).collect::<Vec<_>>();
        let profile = Profile::try_new(DEFAULT_FACTOR, depths)?;

        let extent = Extent::new(1234.0, 7891.0);
        let bins = profile.bins(extent, 100);

        assert!(!bins.is_empty());
        assert!(bins.len() <= 101);
        assert_eq!(bins[0].start(), extent.start());
        assert!(bins[bins.len() - 1].end() <= extent.end());

        for pair in bins.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }

        Ok(())
    }

    #[test]
    fn it_stops_binning_at_the_end_of_the_profile() -> Result<(), Box<dyn std::error::Error>> {
        let profile = Profile::try_new(10, vec![5; 10])?;
        let bins = profile.bins(Extent::new(50.0, 500.0), 1000);

        assert_eq!(bins.len(), 5);
        assert!(bins.iter().all(|bin| bin.depth() == 5.0));
        assert!(profile.bins(Extent::new(500.0, 600.0), 10).is_empty());

        Ok(())
    }

    #[test]
    fn it_uses_a_logarithmic_depth_axis() -> Result<(), Box<dyn std::error::Error>> {
        let profile = Profile::try_new(10, vec![0, 37, 12])?;
        assert_eq!(profile.next_max(), 40.0);

        let space = profile.y_space(100.0)?;
        assert_eq!(space.scale(), Scale::Logarithmic);
        assert!((space.to_pixel(space::EPSILON) - 100.0).abs() < 1e-9);
        assert!(space.to_pixel(40.0).abs() < 1e-9);

        // Zero depths are drawn at the floor.
        assert!((space.to_pixel(0.0) - 100.0).abs() < 1e-9);
        assert!(space.to_pixel(10.0) < space.to_pixel(1.0));

        Ok(())
    }
}

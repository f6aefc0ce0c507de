//! Visible-set filtering.
//!
//! The renderer only ever draws what intersects the visible extent and is
//! wide enough to be seen. The [`Filter`] computes that subset with a single
//! linear scan; the output order is the input order, so repeated calls with
//! the same extent yield the same result.

use crate::core::Extent;
use crate::core::Position;
use crate::space::CoordinateSpace;

/// The default minimum projected width (in pixels) of a visible item.
pub const DEFAULT_MIN_PIXEL_WIDTH: f64 = 1.0;

/// An item spanning `[start, end)` on the corrected coordinate line.
pub trait Span {
    /// Gets the `(start, end)` of the item.
    fn span(&self) -> (Position, Position);
}

/// A visible-set filter.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    /// Items whose projected width does not exceed this value are dropped.
    min_pixel_width: f64,
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PIXEL_WIDTH)
    }
}

impl Filter {
    /// Creates a new filter.
    pub fn new(min_pixel_width: f64) -> Self {
        Self { min_pixel_width }
    }

    /// Gets the minimum projected width of a visible item.
    pub fn min_pixel_width(&self) -> f64 {
        self.min_pixel_width
    }

    /// Returns whether a single item is visible.
    ///
    /// Zero-width items (e.g., breakpoints) are visible whenever they fall
    /// within `current`; every other item must intersect `current` and its
    /// visible part must project wider than the minimum pixel width.
    pub fn is_visible<T: Span>(&self, item: &T, current: Extent, space: &CoordinateSpace) -> bool {
        let (start, end) = item.span();

        if start == end {
            return current.contains(start);
        }

        if !current.intersects(start, end) {
            return false;
        }

        let from = space.to_pixel(start.max(current.start()));
        let to = space.to_pixel(end.min(current.end()));

        (to - from).abs() > self.min_pixel_width
    }

    /// Selects the indices of the visible items, in input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::filter::Filter;
    /// use icarus::filter::Span;
    /// use icarus::space::CoordinateSpace;
    ///
    /// struct Item(f64, f64);
    ///
    /// impl Span for Item {
    ///     fn span(&self) -> (f64, f64) {
    ///         (self.0, self.1)
    ///     }
    /// }
    ///
    /// let current = Extent::new(1000.0, 2000.0);
    /// let space = CoordinateSpace::linear(current, 1000.0)?;
    /// let items = [Item(0.0, 500.0), Item(1500.0, 1600.0), Item(1999.5, 2500.0)];
    ///
    /// assert_eq!(Filter::default().select(&items, current, &space), vec![1]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn select<T: Span>(
        &self,
        items: &[T],
        current: Extent,
        space: &CoordinateSpace,
    ) -> Vec<usize> {
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.is_visible(*item, current, space))
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns the visible items, in input order.
    pub fn visible<'a, T: Span>(
        &self,
        items: &'a [T],
        current: Extent,
        space: &CoordinateSpace,
    ) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| self.is_visible(*item, current, space))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A bare span.
    #[derive(Debug, PartialEq)]
    struct Item(Position, Position);

    impl Span for Item {
        fn span(&self) -> (Position, Position) {
            (self.0, self.1)
        }
    }

    #[test]
    fn it_keeps_intersecting_items_and_drops_the_rest()
    -> Result<(), Box<dyn std::error::Error>> {
        let current = Extent::new(1000.0, 2000.0);
        let space = CoordinateSpace::linear(current, 1000.0)?;
        let filter = Filter::default();

        assert!(filter.is_visible(&Item(1500.0, 1600.0), current, &space));
        assert!(filter.is_visible(&Item(500.0, 1500.0), current, &space));
        assert!(filter.is_visible(&Item(0.0, 5000.0), current, &space));
        assert!(!filter.is_visible(&Item(2000.0, 2100.0), current, &space));
        assert!(!filter.is_visible(&Item(10.0, 1000.0), current, &space));

        Ok(())
    }

    #[test]
    fn it_drops_items_narrower_than_a_pixel() -> Result<(), Box<dyn std::error::Error>> {
        let current = Extent::new(0.0, 1e9);
        let space = CoordinateSpace::linear(current, 10.0)?;
        let filter = Filter::default();

        assert!(!filter.is_visible(&Item(1700.0, 1800.0), current, &space));
        assert!(filter.is_visible(&Item(0.0, 5e8), current, &space));

        Ok(())
    }

    #[test]
    fn it_keeps_zero_width_items_within_the_extent() -> Result<(), Box<dyn std::error::Error>> {
        let current = Extent::new(1000.0, 2000.0);
        let space = CoordinateSpace::linear(current, 1000.0)?;
        let filter = Filter::default();

        assert!(filter.is_visible(&Item(1000.0, 1000.0), current, &space));
        assert!(filter.is_visible(&Item(1500.0, 1500.0), current, &space));
        assert!(!filter.is_visible(&Item(2001.0, 2001.0), current, &space));

        Ok(())
    }

    #[test]
    fn it_selects_deterministically_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let current = Extent::new(100.0, 900.0);
        let space = CoordinateSpace::linear(current, 800.0)?;
        let filter = Filter::default();

        let items = (0..100)
            .map(|i| {
                let start = (i * 37 % 1000) as Position;
                Item(start, start + 20.0)
            })
            .collect::<Vec<_>>();

        let first = filter.select(&items, current, &space);
        let second = filter.select(&items, current, &space);

        assert_eq!(first, second);
        assert!(first.windows(2).all(|pair| pair[0] < pair[1]));

        for (i, item) in items.iter().enumerate() {
            let expected = item.0 < current.end() && item.1 > current.start();
            assert_eq!(first.contains(&i), expected, "item {i}: {item:?}");
        }

        assert_eq!(filter.visible(&items, current, &space).len(), first.len());

        Ok(())
    }
}

//! Core functionality used across the crate.

pub mod extent;

pub use extent::Extent;
pub use extent::Position;

//! Layout passes run once over the blocks of a report.
//!
//! - [`lanes`] assigns each block of an assembly to a sub-lane.
//! - [`similar`] marks blocks that look alike across assemblies.
//! - [`overlaps`] records blocks of different contigs that overlap within an
//!   assembly.

pub mod lanes;
pub mod overlaps;
pub mod similar;

pub use lanes::Packer;

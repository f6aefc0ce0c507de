//! `icarus` is the geometry engine of an alignment browser: it lays out the
//! contigs of one or more genome assemblies against a reference and keeps a
//! set of synchronized tracks in view.
//!
//! The crate is organized around a few pieces:
//!
//! - Reading contig reports with a [`report::Reader`] and gathering them,
//!   with the reference sequences, into a [`report::Report`].
//! - Turning every contig into [blocks](block::Block) through the
//!   [structure resolver](structure::Resolver), which finds misassembled
//!   junctions and broken ends.
//! - Packing the blocks of each assembly into sub-lanes
//!   ([`layout::Packer`]) and flagging blocks that look alike across
//!   assemblies.
//! - A shared [`viewport::Viewport`] that every [track](track::Track)
//!   observes, with zooming, panning and animated transitions.
//! - Selecting what is worth drawing with a [`filter::Filter`].
//!
//! Most users only need a [`Browser`], which ties the pieces together. A
//! browser cannot be instantiated directly: use [`browser::Builder`] and its
//! [`browser::Builder::try_build_from()`] method.
//!
//! ```
//! use icarus::Browser;
//! use icarus::core::Extent;
//! use icarus::reference::References;
//! use icarus::report::Assembly;
//! use icarus::report::Reader;
//! use icarus::report::Report;
//! use icarus::track;
//! use icarus::viewport::Zoom;
//!
//! let data = b"S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\n\
//!     1\t4000\t1\t4000\tchr1\tNODE_1\t99.9\tFalse\n\
//!     CONTIG\tNODE_1\t4000\tcorrect\n\
//!     5001\t9000\t1\t4000\tchr1\tNODE_2\t99.1\tFalse\n\
//!     CONTIG\tNODE_2\t4000\tcorrect\n";
//! let mut reader = Reader::new(&data[..]);
//!
//! let report = Report::builder()
//!     .references(References::try_from_iter([("chr1", 10_000)])?)
//!     .push_assembly(Assembly::from_reader("spades", &mut reader)?)
//!     .try_build()?;
//!
//! let mut browser = Browser::builder().width(1000.0).try_build_from(&report)?;
//! browser.request_go_to(Extent::new(0.0, 10_000.0), false);
//! assert_eq!(browser.visible_blocks(track::Id::Main).len(), 2);
//!
//! browser.request_zoom(Zoom::In, 0.5);
//! browser.request_center(2000.0);
//! assert_eq!(browser.viewport_extent(), Extent::new(0.0, 5000.0));
//! assert_eq!(browser.visible_blocks(track::Id::Main).len(), 1);
//!
//! for block in browser.visible_blocks(track::Id::Main) {
//!     let start = browser.pixel_position(block.corrected_start(), track::Id::Main);
//!     let end = browser.pixel_position(block.corrected_end(), track::Id::Main);
//!     println!("{} {}: {start:.1}px-{end:.1}px", block.assembly(), block.contig());
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod annotation;
pub mod block;
pub mod browser;
pub mod config;
pub mod core;
pub mod coverage;
pub mod filter;
pub mod layout;
pub mod location;
pub mod reference;
pub mod report;
pub mod space;
pub mod structure;
pub mod track;
pub mod viewport;

pub use block::Block;
pub use browser::Browser;
pub use config::Config;
pub use location::Location;
pub use viewport::Viewport;

//! ID3v2 items and utilities
//!
//! ## Important notes
//!
//! See:
//!
//! * [`Id3v2Tag`]
//! * [`Frame`]
//!
//! ## Versions
//!
//! ID3v2.2, ID3v2.3, and ID3v2.4 are all read and written. A tag keeps the version it was read
//! (or created) with, use [`Id3v2Tag::to_version`] to convert it.

mod convert;
mod frame;
pub(crate) mod header;
mod items;
mod order;
pub mod registry;
mod tag;
pub mod util;
mod write;

// Exports

pub use header::{Id3v2TagFlags, Id3v2Version};

pub use tag::{AggregatedFrame, Artwork, Field, FieldKey, FrameAndSubId, Id3v2Tag};

pub use items::*;

pub use convert::convert_frame;
pub use frame::{DeprecatedFrame, Frame, FrameBody, FrameFlags, FrameId};

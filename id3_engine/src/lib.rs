//! Read, convert, and write ID3 metadata.
//!
//! This crate handles the tag-level and frame-level binary protocol of ID3v1/ID3v1.1 and
//! ID3v2.2, ID3v2.3, and ID3v2.4. Locating a tag inside an audio file is left to the caller: tags
//! are read from anything implementing [`Read`](std::io::Read) positioned at the start of the
//! tag, and written to anything implementing [`Write`](std::io::Write).
//!
//! # Examples
//!
//! ## Reading a tag
//!
//! ```rust,no_run
//! # fn main() -> id3_engine::error::Result<()> {
//! use id3_engine::config::ParseOptions;
//! use id3_engine::id3::v2::{FieldKey, Id3v2Tag};
//! use std::fs::File;
//!
//! let mut file = File::open("tag.id3")?;
//! let tag = Id3v2Tag::read_from(&mut file, ParseOptions::new())?;
//!
//! if let Some(title) = tag.get_first(FieldKey::Title)? {
//! 	println!("Title: {title}");
//! }
//! # Ok(()) }
//! ```
//!
//! ## Converting between versions
//!
//! ```rust
//! # fn main() -> id3_engine::error::Result<()> {
//! use id3_engine::config::WriteOptions;
//! use id3_engine::id3::v2::{FieldKey, Id3v2Tag, Id3v2Version};
//!
//! let mut tag = Id3v2Tag::new(Id3v2Version::V4);
//! tag.set(FieldKey::Year, "2001-03-15")?;
//!
//! // The recording time is split into TYER and TDAT
//! let downgraded = tag.to_version(Id3v2Version::V3);
//! assert_eq!(
//! 	downgraded.get_first(FieldKey::Year)?.as_deref(),
//! 	Some("2001-03-15")
//! );
//!
//! let bytes = downgraded.to_bytes(WriteOptions::default())?;
//! assert_eq!(&bytes[..4], b"ID3\x03");
//! # Ok(()) }
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub mod id3;
pub(crate) mod macros;
mod util;

pub use util::text::TextEncoding;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use id3_engine::prelude::*;
	//! ```

	pub use crate::config::{ParseOptions, ParsingMode, WriteOptions};
	pub use crate::id3::v1::Id3v1Tag;
	pub use crate::id3::v2::{FieldKey, Id3v2Tag, Id3v2Version};
}

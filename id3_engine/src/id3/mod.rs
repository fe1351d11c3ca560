//! ID3 specific items
//!
//! ID3v1 is a fixed 128 byte trailer, see [`v1`]. ID3v2 is a variable length tag made up of frames,
//! see [`v2`].

pub mod v1;
pub mod v2;

use crate::error::Result;
use crate::id3::v2::frame::FrameFlags;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, is_synchsafe};
use crate::macros::err;

use byteorder::{BigEndian, ByteOrder};

/// A frame header, as found on disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawFrameHeader {
	/// The ID bytes, 3 or 4 long. These have not been verified.
	pub(crate) id: Vec<u8>,
	pub(crate) size: u32,
	/// The raw flags, always 0 for ID3v2.2
	pub(crate) flags: u16,
}

impl RawFrameHeader {
	/// Read a frame header from the start of `content`
	///
	/// Returns `None` if there aren't enough bytes left for a header.
	pub(crate) fn parse(content: &[u8], version: Id3v2Version) -> Option<Self> {
		let header = content.get(..version.frame_header_len())?;

		Some(match version {
			Id3v2Version::V2 => Self {
				id: header[..3].to_vec(),
				size: BigEndian::read_u24(&header[3..6]),
				flags: 0,
			},
			Id3v2Version::V3 => Self {
				id: header[..4].to_vec(),
				size: BigEndian::read_u32(&header[4..8]),
				flags: BigEndian::read_u16(&header[8..10]),
			},
			Id3v2Version::V4 => {
				let size_bytes = [header[4], header[5], header[6], header[7]];
				let size = u32::from_be_bytes(size_bytes);

				Self {
					id: header[..4].to_vec(),
					size: if is_synchsafe(size_bytes) {
						size.unsynch()
					} else {
						log::warn!(
							"Frame size {size:#010X} is not a synchsafe integer, reading as a plain size"
						);
						size
					},
					flags: BigEndian::read_u16(&header[8..10]),
				}
			},
		})
	}

	/// Parse the raw flags for `version`
	pub(crate) fn frame_flags(&self, version: Id3v2Version) -> FrameFlags {
		match version {
			Id3v2Version::V2 => FrameFlags::default(),
			Id3v2Version::V3 => FrameFlags::parse_id3v23(self.flags),
			Id3v2Version::V4 => FrameFlags::parse_id3v24(self.flags),
		}
	}
}

/// Encode a frame header
///
/// `size` is the size of everything following the header.
///
/// # Errors
///
/// * `size` can't be represented in `version`
pub(crate) fn write_header(
	id: &str,
	size: u32,
	flags: FrameFlags,
	version: Id3v2Version,
) -> Result<Vec<u8>> {
	let mut header = Vec::with_capacity(version.frame_header_len());
	header.extend_from_slice(id.as_bytes());

	match version {
		Id3v2Version::V2 => {
			if size > 0xFF_FFFF {
				err!(TooMuchData);
			}

			header.extend_from_slice(&size.to_be_bytes()[1..]);
		},
		Id3v2Version::V3 => {
			header.extend_from_slice(&size.to_be_bytes());
			header.extend_from_slice(&flags.as_id3v23_bytes().to_be_bytes());
		},
		Id3v2Version::V4 => {
			header.extend_from_slice(&size.synch()?.to_be_bytes());
			header.extend_from_slice(&flags.as_id3v24_bytes().to_be_bytes());
		},
	}

	Ok(header)
}

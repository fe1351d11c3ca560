use super::header::RawFrameHeader;
use super::{Frame, FrameBody, FrameFlags, FrameId};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{Id3Error, Result};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::items::BinaryFrame;
use crate::id3::v2::registry;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, resynchronise};
use crate::macros::id3v2_err;

use std::borrow::Cow;

use byteorder::{BigEndian, ReadBytesExt};

/// The largest decompressed/compressed size ratio accepted for a compressed frame
const MAX_COMPRESSION_RATIO: u64 = 100;

/// The result of reading a single frame
#[derive(Debug)]
pub(crate) enum FrameReadOutcome {
	/// A frame was read
	Frame(Frame),
	/// The frame declared a size of zero
	Empty {
		id: String,
		/// The number of bytes skipped, header included
		size: u32,
	},
	/// Padding (or garbage treated as padding) was reached, no more frames follow
	Padding,
	/// The frame was skipped, the error describes why
	Invalid {
		id: String,
		/// The number of bytes skipped, header included
		size: u32,
		error: Id3Error,
		/// The frame kept as raw bytes, only in [`ParsingMode::Relaxed`]
		raw: Option<Frame>,
	},
	/// The frame claims more data than remains in the tag, no more frames follow
	Overrun,
}

impl FrameReadOutcome {
	/// Read the frame at the start of `content`, advancing past it
	///
	/// `content` must already be resynchronised for ID3v2.2/ID3v2.3 tags with the
	/// unsynchronisation flag set. For ID3v2.4, `tag_unsynchronised` applies the tag-wide
	/// flag to every frame.
	///
	/// # Errors
	///
	/// Only in [`ParsingMode::Strict`], see [`ParsingMode`]
	pub(crate) fn read(
		content: &mut &[u8],
		version: Id3v2Version,
		tag_unsynchronised: bool,
		parse_options: ParseOptions,
	) -> Result<Self> {
		let parse_mode = parse_options.parsing_mode;

		let Some(header) = RawFrameHeader::parse(content, version) else {
			log::trace!("Not enough data left for a frame header, assuming padding");
			return Ok(Self::Padding);
		};

		// Assume we just started reading padding
		if header.id[0] == 0 {
			return Ok(Self::Padding);
		}

		let Some((id, frame_version)) = resolve_id(&header.id, version, parse_options) else {
			if parse_mode == ParsingMode::Strict {
				return Err(id3v2_err!(InvalidFrameIdentifier(header.id)));
			}

			log::warn!(
				"Found an invalid frame ID ({:02X?}), treating the rest of the tag as padding",
				header.id
			);
			return Ok(Self::Padding);
		};

		let header_len = version.frame_header_len();
		let remaining = content.len() - header_len;
		if header.size as usize > remaining {
			if parse_mode == ParsingMode::Strict {
				return Err(id3v2_err!(InvalidFrame(
					"Frame size exceeds the remaining tag data"
				)));
			}

			log::warn!(
				"Frame `{id}` claims {} bytes, only {remaining} remain, stopping",
				header.size
			);
			return Ok(Self::Overrun);
		}

		let frame_data = &content[header_len..header_len + header.size as usize];
		*content = &content[header_len + header.size as usize..];

		let total_size = header.size.saturating_add(header_len as u32);
		if header.size == 0 {
			if parse_mode == ParsingMode::Strict {
				return Err(id3v2_err!(EmptyFrame(id.to_string())));
			}

			log::debug!("Encountered a zero length frame ({id}), skipping");
			return Ok(Self::Empty {
				id: id.to_string(),
				size: total_size,
			});
		}

		let flags = header.frame_flags(version);
		let result = read_content(
			frame_data,
			&id,
			version,
			frame_version,
			flags,
			tag_unsynchronised && version == Id3v2Version::V4,
			parse_mode,
		);

		match result {
			Ok(Some(frame)) => Ok(Self::Frame(frame)),
			Ok(None) => Ok(Self::Overrun),
			Err(ContentError::Framing(error)) => {
				if parse_mode == ParsingMode::Strict {
					return Err(error);
				}

				log::warn!("Failed to read frame `{id}`, skipping: {error}");
				Ok(Self::Invalid {
					id: id.to_string(),
					size: total_size,
					error,
					raw: None,
				})
			},
			Err(ContentError::Body { error, raw, flags }) => {
				if parse_mode == ParsingMode::Strict {
					return Err(id3v2_err!(InvalidDataType(
						id.to_string(),
						"Content does not match the frame type"
					)));
				}

				log::warn!("Failed to parse the content of frame `{id}`, skipping: {error}");

				let raw = (parse_mode == ParsingMode::Relaxed).then(|| {
					Frame::from_parts(
						id.clone(),
						frame_version,
						flags,
						FrameBody::Unsupported(BinaryFrame::new(raw)),
					)
				});

				Ok(Self::Invalid {
					id: id.to_string(),
					size: total_size,
					error,
					raw,
				})
			},
		}
	}
}

enum ContentError {
	/// The sub-headers or compression are malformed
	Framing(Id3Error),
	/// The body could not be parsed
	Body {
		error: Id3Error,
		raw: Vec<u8>,
		flags: FrameFlags,
	},
}

impl From<Id3Error> for ContentError {
	fn from(error: Id3Error) -> Self {
		Self::Framing(error)
	}
}

/// Determine the ID of the frame and the version its body was written for
///
/// Returns `None` if the ID is invalid.
fn resolve_id(
	id_bytes: &[u8],
	version: Id3v2Version,
	parse_options: ParseOptions,
) -> Option<(FrameId, Id3v2Version)> {
	// Some applications make v3 tags with v2 frame IDs.
	// The actual frame header is v3 though
	if version == Id3v2Version::V3 && id_bytes[3] == 0 && parse_options.implicit_conversions {
		let v2_id = &id_bytes[..3];
		if !FrameId::verify_id(v2_id) {
			return None;
		}

		let v2_id = std::str::from_utf8(v2_id).ok()?;
		log::warn!("Found an ID3v2.2 frame ID ({v2_id}) in an ID3v2.3 tag, attempting to upgrade");

		// Forced IDs (ex. PIC) have an ID3v2.2 body, and are converted when added to the tag
		return match registry::convert(Id3v2Version::V2, Id3v2Version::V3, v2_id) {
			Some(upgraded) => Some((FrameId(upgraded.to_owned()), Id3v2Version::V3)),
			None => Some((FrameId(v2_id.to_owned()), Id3v2Version::V2)),
		};
	}

	if !FrameId::verify_id(id_bytes) {
		return None;
	}

	let id = std::str::from_utf8(id_bytes).ok()?;

	// ID3v2.3 frames written to an ID3v2.4 tag, converted when added to the tag
	if version == Id3v2Version::V4
		&& parse_options.implicit_conversions
		&& !registry::is_supported(Id3v2Version::V4, id)
		&& registry::is_supported(Id3v2Version::V3, id)
	{
		log::debug!("Found an ID3v2.3 frame ({id}) in an ID3v2.4 tag");
		return Some((FrameId(id.to_owned()), Id3v2Version::V3));
	}

	Some((FrameId(id.to_owned()), version))
}

fn read_sub_header_byte(data: &mut &[u8]) -> Result<u8> {
	data.read_u8().map_err(|_| id3v2_err!(BadFrameLength))
}

fn read_sub_header_u32(data: &mut &[u8]) -> Result<u32> {
	data.read_u32::<BigEndian>()
		.map_err(|_| id3v2_err!(BadFrameLength))
}

// The sub-headers are found in the order:
//
// ID3v2.3: data length indicator (if compressed) -> encryption method -> group
// ID3v2.4: group -> encryption method -> data length indicator
//
// Then the content itself, which is unsynchronised -> compressed -> encrypted
fn read_content(
	mut data: &[u8],
	id: &FrameId,
	layout: Id3v2Version,
	frame_version: Id3v2Version,
	mut flags: FrameFlags,
	tag_unsynchronised: bool,
	parse_mode: ParsingMode,
) -> std::result::Result<Option<Frame>, ContentError> {
	if layout == Id3v2Version::V4 {
		if let Some(group) = flags.grouping_identity.as_mut() {
			log::trace!("Reading group identifier");
			*group = read_sub_header_byte(&mut data)?;
		}

		if let Some(method) = flags.encryption.as_mut() {
			log::trace!("Reading encryption method symbol");
			*method = read_sub_header_byte(&mut data)?;
		}

		if let Some(len) = flags.data_length_indicator.as_mut() {
			log::trace!("Reading data length indicator");
			*len = read_sub_header_u32(&mut data)?.unsynch();
		}
	} else {
		if flags.compression {
			log::trace!("Reading data length indicator");
			flags.data_length_indicator = Some(read_sub_header_u32(&mut data)?);
		}

		if let Some(method) = flags.encryption.as_mut() {
			log::trace!("Reading encryption method symbol");
			*method = read_sub_header_byte(&mut data)?;
		}

		if let Some(group) = flags.grouping_identity.as_mut() {
			log::trace!("Reading group identifier");
			*group = read_sub_header_byte(&mut data)?;
		}
	}

	if let Some(method) = flags.encryption {
		if method < 0x80 {
			if parse_mode == ParsingMode::Strict {
				return Err(id3v2_err!(InvalidEncryptionMethodSymbol(method)).into());
			}

			log::warn!("Frame `{id}` has an invalid encryption method symbol ({method:#04X})");
		}
	}

	let mut content = Cow::Borrowed(data);
	if flags.unsynchronisation || tag_unsynchronised {
		log::trace!("Resynchronising frame `{id}`");
		content = Cow::Owned(resynchronise(&content));
	}
	flags.unsynchronisation = false;

	// Nothing further we can do with encrypted frames
	if flags.encryption.is_some() {
		if flags.compression && flags.data_length_indicator.is_none() {
			return Err(id3v2_err!(MissingDataLengthIndicator).into());
		}

		return Ok(Some(Frame::from_parts(
			id.clone(),
			frame_version,
			flags,
			FrameBody::Unsupported(BinaryFrame::new(content.into_owned())),
		)));
	}

	if flags.compression {
		match decompress(&content, flags.data_length_indicator)? {
			Some(decompressed) => content = Cow::Owned(decompressed),
			None => {
				log::warn!("Frame `{id}` has an implausible compression ratio, stopping");
				return Ok(None);
			},
		}
	}

	flags.compression = false;
	flags.data_length_indicator = None;

	match FrameBody::parse(id.as_str(), &content, frame_version, parse_mode) {
		Ok(body) => Ok(Some(Frame::from_parts(
			id.clone(),
			frame_version,
			flags,
			body,
		))),
		Err(error) => Err(ContentError::Body {
			error,
			raw: content.into_owned(),
			flags,
		}),
	}
}

/// Returns `None` if the decompressed size is implausible
#[cfg(feature = "id3v2_compression_support")]
fn decompress(content: &[u8], data_length_indicator: Option<u32>) -> Result<Option<Vec<u8>>> {
	use std::io::Read;

	let limit = (content.len() as u64).saturating_mul(MAX_COMPRESSION_RATIO);
	if data_length_indicator.is_some_and(|len| u64::from(len) > limit) {
		return Ok(None);
	}

	let mut decompressed = Vec::new();
	flate2::read::ZlibDecoder::new(content)
		.take(limit + 1)
		.read_to_end(&mut decompressed)
		.map_err(|e| id3v2_err!(Decompression(e)))?;

	if decompressed.len() as u64 > limit {
		return Ok(None);
	}

	Ok(Some(decompressed))
}

#[cfg(not(feature = "id3v2_compression_support"))]
#[allow(clippy::unnecessary_wraps)]
fn decompress(_: &[u8], _: Option<u32>) -> Result<Option<Vec<u8>>> {
	Err(id3v2_err!(CompressedFrameEncountered))
}

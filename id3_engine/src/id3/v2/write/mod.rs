mod frame;

use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::Id3v2Tag;
use crate::id3::v2::header::{Id3v2Header, Id3v2TagFlags, Id3v2Version};
use crate::id3::v2::order::FrameComparator;
use crate::id3::v2::util::synchsafe::{
	SynchsafeInteger, requires_unsynchronisation, unsynchronise,
};
use crate::macros::{err, try_vec};

use std::io::Write;
use std::ops::Not;
use std::sync::OnceLock;

use byteorder::{BigEndian, WriteBytesExt};

fn crc_32_table() -> &'static [u32; 256] {
	static INSTANCE: OnceLock<[u32; 256]> = OnceLock::new();
	INSTANCE.get_or_init(|| {
		let mut crc32_table = [0; 256];

		for n in 0..256 {
			crc32_table[n as usize] = (0..8).fold(n as u32, |acc, _| match acc & 1 {
				1 => 0xEDB8_8320 ^ (acc >> 1),
				_ => acc >> 1,
			});
		}

		crc32_table
	})
}

/// The CRC-32 stored in the extended header
pub(crate) fn crc32(content: &[u8]) -> u32 {
	content
		.iter()
		.fold(!0, |crc, octet| {
			(crc >> 8) ^ crc_32_table()[(((crc & 0xFF) ^ u32::from(*octet)) & 0xFF) as usize]
		})
		.not()
}

impl Id3v2Tag {
	/// Encode the tag, header included
	///
	/// Frames are written in a fixed order (see [`Id3v2Tag`]), with encrypted frames last.
	/// Frames that can't be represented in the tag's version are skipped.
	///
	/// # Errors
	///
	/// * A frame's content can't be encoded (ex. Latin-1 text with characters outside of its range)
	/// * An encrypted frame has an invalid method symbol, or is compressed with no data length indicator
	/// * The tag is too large to be represented
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::{ParseOptions, WriteOptions};
	/// use id3_engine::id3::v2::{FieldKey, Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	/// tag.set(FieldKey::Title, "Foo")?;
	///
	/// let bytes = tag.to_bytes(WriteOptions::new().preferred_padding(0))?;
	/// assert_eq!(bytes, b"ID3\x03\x00\x00\x00\x00\x00\x0ETIT2\x00\x00\x00\x04\x00\x00\x00Foo");
	///
	/// let read = Id3v2Tag::parse(&bytes, ParseOptions::new())?;
	/// assert_eq!(read, tag);
	/// # Ok(()) }
	/// ```
	pub fn to_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		create_tag(self, write_options)
	}

	/// Write the tag to a writer
	///
	/// # Errors
	///
	/// * See [`Id3v2Tag::to_bytes`]
	/// * Writing to `writer` fails
	pub fn write_to<W>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()>
	where
		W: Write,
	{
		let tag = create_tag(self, write_options)?;
		writer.write_all(&tag)?;

		Ok(())
	}
}

fn create_tag(tag: &Id3v2Tag, write_options: WriteOptions) -> Result<Vec<u8>> {
	let version = tag.version();
	log::debug!("Writing {version} tag");

	let mut flags = normalized_flags(*tag.flags(), version);

	let (mut frames, all_frames_unsynchronised) = create_items(tag, write_options)?;

	// The ID3v2.3 CRC covers the frames before unsynchronisation
	let frames_crc = (version == Id3v2Version::V3 && flags.crc).then(|| crc32(&frames));

	flags.unsynchronisation = match version {
		Id3v2Version::V4 => all_frames_unsynchronised,
		_ => write_options.unsynchronisation && requires_unsynchronisation(&frames),
	};

	if flags.unsynchronisation && version != Id3v2Version::V4 {
		log::trace!("Unsynchronising tag");
		frames = unsynchronise(&frames);
	}

	let extended_header_len = extended_header_len(flags, version);
	let padding_len = padding_len(
		tag,
		flags,
		extended_header_len + frames.len(),
		write_options,
	);

	// Frames followed by padding
	let mut body = try_vec![0; frames.len() + padding_len];
	body[..frames.len()].copy_from_slice(&frames);

	let mut extended_header = match version {
		_ if extended_header_len == 0 => Vec::new(),
		Id3v2Version::V3 => {
			create_v3_extended_header(padding_len as u32, frames_crc.unwrap_or_default())?
		},
		// The ID3v2.4 CRC covers the frames and padding
		_ => create_v4_extended_header(flags.crc.then(|| crc32(&body)), flags.restrictions)?,
	};

	// The extended header is included in the tag-wide unsynchronisation
	if flags.unsynchronisation && version == Id3v2Version::V3 {
		extended_header = unsynchronise(&extended_header);
	}

	let Ok(size) = u32::try_from(extended_header.len() + body.len()) else {
		err!(TooMuchData);
	};

	let mut id3v2 = Vec::with_capacity(Id3v2Header::SIZE * 2 + size as usize);
	id3v2.extend_from_slice(b"ID3");
	id3v2.write_u8(version.major())?;
	id3v2.write_u8(0)?;
	id3v2.write_u8(flags.as_byte(version))?;
	id3v2.write_u32::<BigEndian>(size.synch()?)?;

	let header_without_identifier = <[u8; 7]>::try_from(&id3v2[3..10]).unwrap_or_default();

	id3v2.extend_from_slice(&extended_header);
	id3v2.extend_from_slice(&body);

	if version == Id3v2Version::V4 && flags.footer {
		log::trace!("Writing footer");

		id3v2.extend_from_slice(b"3DI");
		id3v2.extend_from_slice(&header_without_identifier);
	}

	Ok(id3v2)
}

// Drops the flags the version has no room for
fn normalized_flags(mut flags: Id3v2TagFlags, version: Id3v2Version) -> Id3v2TagFlags {
	if version != Id3v2Version::V4 {
		flags.footer = false;
		flags.restrictions = None;
	}

	if version == Id3v2Version::V2 {
		flags.crc = false;
		flags.experimental = false;
	}

	flags
}

// Returns the encoded frames, and whether every frame was unsynchronised (ID3v2.4)
fn create_items(tag: &Id3v2Tag, write_options: WriteOptions) -> Result<(Vec<u8>, bool)> {
	let version = tag.version();
	let comparator = FrameComparator::for_version(version);

	let mut frames = tag.frames().collect::<Vec<_>>();
	frames.sort_by(|a, b| comparator.compare(a.id_str(), b.id_str()));

	let mut encrypted = tag.encrypted_frames().collect::<Vec<_>>();
	encrypted.sort_by(|a, b| comparator.compare(a.id_str(), b.id_str()));

	let mut bytes = Vec::new();
	let mut written = 0_usize;
	let mut unsynchronised = 0_usize;
	for frame in frames.into_iter().chain(encrypted) {
		let Some(encoded) = frame::encode_frame(frame, version, write_options)? else {
			continue;
		};

		written += 1;
		if encoded.unsynchronised {
			unsynchronised += 1;
		}

		bytes.extend_from_slice(&encoded.bytes);
	}

	log::trace!("Encoded {written} frames ({} bytes)", bytes.len());
	Ok((bytes, written > 0 && written == unsynchronised))
}

fn extended_header_len(flags: Id3v2TagFlags, version: Id3v2Version) -> usize {
	if !flags.has_extended_header(version) {
		return 0;
	}

	match version {
		Id3v2Version::V2 => 0,
		// The CRC is the only reason to write one
		Id3v2Version::V3 => 14,
		Id3v2Version::V4 => {
			let mut len = 6;
			if flags.crc {
				len += 6;
			}

			if flags.restrictions.is_some() {
				len += 2;
			}

			len
		},
	}
}

fn padding_len(
	tag: &Id3v2Tag,
	flags: Id3v2TagFlags,
	used: usize,
	write_options: WriteOptions,
) -> usize {
	if flags.footer {
		log::trace!("Footer requested, not padding tag");
		return 0;
	}

	if write_options.shrink_padding {
		log::trace!("Shrinking padding");
		return 0;
	}

	if let Some(original_size) = tag.original_size {
		let original_size = original_size as usize;
		if original_size >= used {
			log::trace!("Reusing existing tag space, {} bytes of padding", original_size - used);
			return original_size - used;
		}
	}

	let padding = write_options.preferred_padding.unwrap_or(0) as usize;
	log::trace!("Padding tag with {padding} bytes");
	padding
}

// Size (4, excludes itself)
// Flags (2)
// Padding size (4)
// CRC (4)
fn create_v3_extended_header(padding_len: u32, crc: u32) -> Result<Vec<u8>> {
	let mut header = Vec::with_capacity(14);
	header.write_u32::<BigEndian>(10)?;
	header.write_u16::<BigEndian>(0x8000)?;
	header.write_u32::<BigEndian>(padding_len)?;
	header.write_u32::<BigEndian>(crc)?;

	Ok(header)
}

// Size (4, synchsafe, includes itself)
// Number of flag bytes (1)
// Flags (1)
// CRC (1 + 5), restrictions (1 + 1)
fn create_v4_extended_header(crc: Option<u32>, restrictions: Option<u8>) -> Result<Vec<u8>> {
	let mut header = vec![0; 4];
	header.write_u8(1)?;

	let mut ext_flags = 0_u8;
	if crc.is_some() {
		ext_flags |= 0x20;
	}

	if restrictions.is_some() {
		ext_flags |= 0x10;
	}

	header.write_u8(ext_flags)?;

	if let Some(crc) = crc {
		header.write_u8(5)?;
		header.extend_from_slice(&crc.widening_synch().to_be_bytes()[3..]);
	}

	if let Some(restrictions) = restrictions {
		header.write_u8(1)?;
		header.write_u8(restrictions)?;
	}

	let size = (header.len() as u32).synch()?;
	header[..4].copy_from_slice(&size.to_be_bytes());

	Ok(header)
}

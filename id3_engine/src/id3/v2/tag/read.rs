use super::Id3v2Tag;
use crate::config::ParseOptions;
use crate::error::Result;
use crate::id3::v2::frame::read::FrameReadOutcome;
use crate::id3::v2::header::{ExtendedHeader, Id3v2Header, Id3v2Version};
use crate::id3::v2::util::synchsafe::resynchronise;
use crate::id3::v2::write::crc32;
use crate::macros::try_vec;

use std::borrow::Cow;
use std::io::Read;

impl Id3v2Tag {
	/// Read a tag from a reader positioned at the start of the tag header
	///
	/// The reader is left at the end of the tag (after the footer, if any).
	///
	/// # Errors
	///
	/// * The reader doesn't start with "ID3" ([`ErrorKind::TagNotFound`](crate::error::ErrorKind::TagNotFound))
	/// * The header or extended header is invalid
	/// * The tag is larger than [`GlobalOptions::allocation_limit`](crate::config::GlobalOptions::allocation_limit)
	/// * The reader ends before the declared tag size
	/// * [`ParsingMode::Strict`](crate::config::ParsingMode::Strict): a frame is malformed
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::ParseOptions;
	/// use id3_engine::id3::v2::{FieldKey, Id3v2Tag};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let bytes = b"ID3\x03\x00\x00\x00\x00\x00\x0ETIT2\x00\x00\x00\x04\x00\x00\x00Foo";
	///
	/// let tag = Id3v2Tag::read_from(&mut &bytes[..], ParseOptions::new())?;
	/// assert_eq!(tag.get_first(FieldKey::Title)?.as_deref(), Some("Foo"));
	/// # Ok(()) }
	/// ```
	pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read,
	{
		let mut header_bytes = [0; Id3v2Header::SIZE];
		reader.read_exact(&mut header_bytes)?;

		let header = Id3v2Header::parse(header_bytes, parse_options.parsing_mode)?;

		let mut content = try_vec![0; header.size as usize];
		reader.read_exact(&mut content)?;

		if header.flags.footer {
			let mut footer = [0; Id3v2Header::SIZE];
			reader.read_exact(&mut footer)?;

			if &footer[..3] != b"3DI" {
				log::warn!("Tag footer is missing its identifier, ignoring");
			}
		}

		parse_content(&content, header, parse_options)
	}

	/// Parse a tag from a byte slice starting with the tag header
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::read_from`]
	pub fn parse(data: &[u8], parse_options: ParseOptions) -> Result<Self> {
		let mut reader = data;
		Self::read_from(&mut reader, parse_options)
	}
}

fn parse_content(
	content: &[u8],
	header: Id3v2Header,
	parse_options: ParseOptions,
) -> Result<Id3v2Tag> {
	let version = header.version;
	let mut flags = header.flags;

	// ID3v2.4 tags are unsynchronised per frame
	let content = if flags.unsynchronisation && version != Id3v2Version::V4 {
		log::trace!("Resynchronising tag content");
		Cow::Owned(resynchronise(content))
	} else {
		Cow::Borrowed(content)
	};

	let mut region: &[u8] = &content;
	let mut frames_len = region.len();
	if header.extended_header {
		let extended_header = ExtendedHeader::parse(&mut region, version)?;

		flags.crc = extended_header.crc.is_some();
		flags.restrictions = extended_header.restrictions;

		if let Some(padding_size) = extended_header.padding_size {
			frames_len = region.len().saturating_sub(padding_size as usize);
		} else {
			frames_len = region.len();
		}

		if let Some(expected) = extended_header.crc {
			let covered = match version {
				Id3v2Version::V4 => region,
				_ => &region[..frames_len],
			};

			let actual = crc32(covered);
			if actual != expected {
				log::warn!("Tag CRC mismatch (stored: {expected:#010X}, actual: {actual:#010X})");
			}
		}
	}

	let mut tag = Id3v2Tag::new(version);
	tag.set_flags(flags);

	let mut frames = Vec::new();
	let mut remaining = &region[..frames_len];
	loop {
		match FrameReadOutcome::read(
			&mut remaining,
			version,
			flags.unsynchronisation,
			parse_options,
		)? {
			FrameReadOutcome::Frame(frame) => frames.push(frame),
			FrameReadOutcome::Empty { id, size } => {
				log::trace!("Skipped empty frame `{id}`");
				tag.empty_frame_bytes += u64::from(size);
			},
			FrameReadOutcome::Invalid {
				id,
				size,
				error,
				raw,
			} => {
				log::debug!("Skipped invalid frame `{id}` ({size} bytes): {error}");
				tag.invalid_frame_count += 1;
				frames.extend(raw);
			},
			FrameReadOutcome::Overrun => {
				tag.invalid_frame_count += 1;
				break;
			},
			FrameReadOutcome::Padding => break,
		}
	}

	let consumed = frames_len - remaining.len();
	tag.padding_size = (region.len() - consumed) as u32;
	tag.original_size = Some(header.size);

	log::debug!(
		"Read {} frames, {} bytes of padding",
		frames.len(),
		tag.padding_size
	);

	tag.insert_all(frames);
	Ok(tag)
}

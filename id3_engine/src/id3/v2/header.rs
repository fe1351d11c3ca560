use crate::config::ParsingMode;
use crate::error::Result;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, is_synchsafe, unsynch_u35};
use crate::macros::{err, id3v2_err, parse_mode_choice};

use std::fmt::{Display, Formatter};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

/// The ID3v2 version
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

impl Id3v2Version {
	/// All versions, oldest first
	pub const ALL: [Self; 3] = [Self::V2, Self::V3, Self::V4];

	/// The major version number, as written in the tag header
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::Id3v2Version;
	///
	/// assert_eq!(Id3v2Version::V3.major(), 3);
	/// ```
	pub fn major(self) -> u8 {
		match self {
			Self::V2 => 2,
			Self::V3 => 3,
			Self::V4 => 4,
		}
	}

	/// Get an `Id3v2Version` from its major version number
	pub fn from_major(major: u8) -> Option<Self> {
		match major {
			2 => Some(Self::V2),
			3 => Some(Self::V3),
			4 => Some(Self::V4),
			_ => None,
		}
	}

	/// The length of a frame ID in this version (3 for ID3v2.2, 4 otherwise)
	pub fn id_len(self) -> usize {
		match self {
			Self::V2 => 3,
			Self::V3 | Self::V4 => 4,
		}
	}

	/// The length of a frame header in this version
	pub fn frame_header_len(self) -> usize {
		match self {
			Self::V2 => 6,
			Self::V3 | Self::V4 => 10,
		}
	}
}

impl Display for Id3v2Version {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2.{}", self.major())
	}
}

/// Flags that apply to the entire tag
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Id3v2TagFlags {
	/// Whether or not all frames are unsynchronised. See [`unsynchronise`](crate::id3::v2::util::synchsafe::unsynchronise)
	///
	/// When reading, this reflects the tag as found. When writing, the flag is only set
	/// if [`WriteOptions::unsynchronisation`](crate::config::WriteOptions::unsynchronisation) is enabled
	/// and the content requires it.
	pub unsynchronisation: bool,
	/// Indicates if the tag is in an experimental stage
	pub experimental: bool,
	/// Indicates that the tag includes a footer (ID3v2.4 only)
	///
	/// A footer will be created if the tag is written
	pub footer: bool,
	/// Whether or not to include a CRC-32 in the extended header (ID3v2.3 and ID3v2.4)
	///
	/// This is calculated if the tag is written
	pub crc: bool,
	/// The raw tag restrictions byte, written in the ID3v2.4 extended header
	pub restrictions: Option<u8>,
}

impl Id3v2TagFlags {
	/// Get the byte representation of the flags for `version`
	///
	/// NOTE: The extended header flag is determined by [`Id3v2TagFlags::has_extended_header`]
	pub fn as_byte(&self, version: Id3v2Version) -> u8 {
		let mut byte = 0;

		if self.unsynchronisation {
			byte |= 0x80;
		}

		if self.has_extended_header(version) {
			byte |= 0x40;
		}

		if version == Id3v2Version::V2 {
			return byte;
		}

		if self.experimental {
			byte |= 0x20;
		}

		if version == Id3v2Version::V4 && self.footer {
			byte |= 0x10;
		}

		byte
	}

	/// Whether writing these flags requires an extended header
	pub fn has_extended_header(&self, version: Id3v2Version) -> bool {
		match version {
			Id3v2Version::V2 => false,
			Id3v2Version::V3 => self.crc,
			Id3v2Version::V4 => self.crc || self.restrictions.is_some(),
		}
	}
}

/// The fixed 10 byte tag header
#[derive(Copy, Clone, Debug)]
pub(crate) struct Id3v2Header {
	pub(crate) version: Id3v2Version,
	pub(crate) flags: Id3v2TagFlags,
	/// Whether the header flags declare an extended header
	pub(crate) extended_header: bool,
	/// The size of the tag contents (**DOES NOT INCLUDE THE HEADER/FOOTER**)
	pub(crate) size: u32,
}

impl Id3v2Header {
	pub(crate) const SIZE: usize = 10;

	pub(crate) fn parse(header: [u8; 10], parse_mode: ParsingMode) -> Result<Self> {
		log::debug!("Parsing ID3v2 header");

		if &header[..3] != b"ID3" {
			err!(TagNotFound);
		}

		// Version is stored as [major, minor], but here we don't care about minor revisions unless there's an error.
		let Some(version) = Id3v2Version::from_major(header[3]) else {
			id3v2_err!(@BAIL BadId3v2Version(header[3], header[4]));
		};

		let flags = header[5];

		// Compression was a flag only used in ID3v2.2 (bit 2).
		// At the time the ID3v2.2 specification was written, a compression scheme wasn't decided.
		// The ID3v2.2 standard recommends just ignoring the tag in this case.
		if version == Id3v2Version::V2 && flags & 0x40 == 0x40 {
			id3v2_err!(@BAIL V2Compression);
		}

		let known_flags = match version {
			Id3v2Version::V2 => 0xC0,
			Id3v2Version::V3 => 0xE0,
			Id3v2Version::V4 => 0xF0,
		};

		if flags & !known_flags != 0 {
			log::warn!(
				"Tag header contains unknown flags ({:#04X}), ignoring",
				flags & !known_flags
			);
		}

		let flags_parsed = Id3v2TagFlags {
			unsynchronisation: flags & 0x80 == 0x80,
			experimental: version != Id3v2Version::V2 && flags & 0x20 == 0x20,
			footer: version == Id3v2Version::V4 && flags & 0x10 == 0x10,
			crc: false,         // Retrieved later if applicable
			restrictions: None, // Retrieved later if applicable
		};

		let size_bytes = [header[6], header[7], header[8], header[9]];
		if !is_synchsafe(size_bytes) {
			parse_mode_choice!(
				parse_mode,
				STRICT: err!(TagNotFound),
				DEFAULT: log::warn!("Tag size is not a synchsafe integer, continuing anyway")
			);
		}

		let size = BigEndian::read_u32(&size_bytes).unsynch();
		log::debug!("Found an {version} tag, size: {size}");

		Ok(Self {
			version,
			flags: flags_parsed,
			extended_header: version != Id3v2Version::V2 && flags & 0x40 == 0x40,
			size,
		})
	}
}

/// The optional extended header, found directly after the tag header
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ExtendedHeader {
	/// The number of bytes the extended header occupies, including its size field
	pub(crate) len: u32,
	/// The stored CRC-32 of the tag content
	pub(crate) crc: Option<u32>,
	/// The size of the padding following the frames (ID3v2.3 only)
	pub(crate) padding_size: Option<u32>,
	/// The raw restrictions byte (ID3v2.4 only)
	pub(crate) restrictions: Option<u8>,
	/// Whether the tag is an update of an earlier tag (ID3v2.4 only)
	pub(crate) update: bool,
}

impl ExtendedHeader {
	/// Parse the extended header at the start of `content`, advancing past it
	///
	/// `content` is the remainder of the tag after the 10 byte header, with any
	/// tag-wide unsynchronisation already reversed for ID3v2.3.
	pub(crate) fn parse(content: &mut &[u8], version: Id3v2Version) -> Result<Self> {
		let available = content.len();
		let ext = match version {
			Id3v2Version::V2 => return Ok(Self::default()),
			Id3v2Version::V3 => Self::parse_v3(content)?,
			Id3v2Version::V4 => Self::parse_v4(content)?,
		};

		if ext.len as usize >= available {
			id3v2_err!(@BAIL BadExtendedHeaderSize);
		}

		log::trace!("Parsed extended header: {ext:?}");
		Ok(ext)
	}

	// Size (4, excludes itself, 6 or 10)
	// Flags (2)
	// Padding size (4)
	// CRC (4, optional)
	fn parse_v3(content: &mut &[u8]) -> Result<Self> {
		let size = content.read_u32::<BigEndian>()?;
		if size != 6 && size != 10 {
			id3v2_err!(@BAIL BadExtendedHeaderSize);
		}

		let flags = content.read_u16::<BigEndian>()?;
		let padding_size = content.read_u32::<BigEndian>()?;

		let mut crc = None;
		if flags & 0x8000 == 0x8000 {
			if size != 10 {
				id3v2_err!(@BAIL BadExtendedHeaderSize);
			}

			crc = Some(content.read_u32::<BigEndian>()?);
		} else if size == 10 {
			// Unused CRC space
			let _ = content.read_u32::<BigEndian>()?;
		}

		Ok(Self {
			len: size + 4,
			crc,
			padding_size: Some(padding_size),
			restrictions: None,
			update: false,
		})
	}

	// Size (4, synchsafe, includes itself)
	// Number of flag bytes (1)
	// Flags (1)
	// Flag data, each preceded by a length byte
	fn parse_v4(content: &mut &[u8]) -> Result<Self> {
		let size = content.read_u32::<BigEndian>()?.unsynch();
		if size < 6 {
			id3v2_err!(@BAIL BadExtendedHeaderSize);
		}

		let mut remaining = content
			.get(..size as usize - 4)
			.ok_or_else(|| id3v2_err!(BadExtendedHeaderSize))?;
		*content = &content[size as usize - 4..];

		// Useless byte since there's only 1 byte for flags
		let _num_flag_bytes = remaining.read_u8()?;
		let flags = remaining.read_u8()?;

		let mut ext = Self {
			len: size,
			crc: None,
			padding_size: None,
			restrictions: None,
			update: flags & 0x40 == 0x40,
		};

		if ext.update {
			// No data, only a zero length byte
			let _ = remaining.read_u8()?;
		}

		if flags & 0x20 == 0x20 {
			let _data_length = remaining.read_u8()?;

			let mut crc = [0; 5];
			std::io::Read::read_exact(&mut remaining, &mut crc)?;
			ext.crc = Some(unsynch_u35(crc));
		}

		if flags & 0x10 == 0x10 {
			// The length byte is always 1
			let _data_length = remaining.read_u8()?;
			ext.restrictions = Some(remaining.read_u8()?);
		}

		Ok(ext)
	}
}

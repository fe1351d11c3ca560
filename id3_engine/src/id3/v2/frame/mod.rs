pub(crate) mod content;
pub(crate) mod header;
pub(crate) mod read;

use super::items::{
	AttachedPictureFrame, BinaryFrame, ExtendedTextFrame, ExtendedUrlFrame, KeyValueFrame,
	LanguageFrame, NumberTotalFrame, PopularimeterFrame, TextInformationFrame,
	UniqueFileIdentifierFrame, UrlLinkFrame,
};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::macros::id3v2_err;
use crate::util::text::TextEncoding;

use std::fmt::{Display, Formatter};

/// An `ID3v2` frame ID
///
/// IDs are 3 characters in ID3v2.2, and 4 characters in ID3v2.3 and ID3v2.4. They must
/// start with an uppercase letter, followed by uppercase letters or digits.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct FrameId(pub(crate) String);

impl FrameId {
	/// Attempts to create a `FrameId` from an ID string
	///
	/// NOTE: This will not convert IDs between versions.
	///
	/// # Errors
	///
	/// * `id` contains invalid characters (must be 'A'..='Z' and '0'..='9', starting with a letter)
	/// * `id` is an invalid length (must be 3 or 4)
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::FrameId;
	///
	/// assert!(FrameId::new("TIT2").is_ok());
	/// assert!(FrameId::new("TT2").is_ok());
	/// assert!(FrameId::new("1ABC").is_err());
	/// assert!(FrameId::new("tit2").is_err());
	/// ```
	pub fn new(id: impl Into<String>) -> Result<Self> {
		let id = id.into();
		if !Self::verify_id(id.as_bytes()) {
			return Err(id3v2_err!(InvalidFrameIdentifier(id.into_bytes())));
		}

		Ok(Self(id))
	}

	pub(crate) fn verify_id(id: &[u8]) -> bool {
		matches!(id.len(), 3 | 4)
			&& id[0].is_ascii_uppercase()
			&& id[1..]
				.iter()
				.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
	}

	/// Whether the ID has the width used by `version`
	pub fn fits(&self, version: Id3v2Version) -> bool {
		self.0.len() == version.id_len()
	}

	/// Extracts the string from the ID
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl PartialEq<str> for FrameId {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for FrameId {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

/// The semantic shape of a frame body, fixed by the frame's ID
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BodyShape {
	Text,
	NumberTotal,
	KeyValue,
	UserText,
	UserUrl,
	Url,
	Language,
	UniqueFileIdentifier,
	Picture,
	Popularimeter,
	Binary,
}

#[rustfmt::skip]
pub(crate) fn body_shape(id: &str) -> BodyShape {
	match id {
		"TXXX" | "TXX" => BodyShape::UserText,
		"WXXX" | "WXX" => BodyShape::UserUrl,
		"COMM" | "COM" | "USLT" | "ULT" => BodyShape::Language,
		"UFID" | "UFI" => BodyShape::UniqueFileIdentifier,
		"APIC" | "PIC" => BodyShape::Picture,
		"POPM" | "POP" => BodyShape::Popularimeter,
		"TIPL" | "TMCL" | "IPLS" | "IPL" => BodyShape::KeyValue,
		"TRCK" | "TRK" | "TPOS" | "TPA" => BodyShape::NumberTotal,
		i if i.starts_with('T') => BodyShape::Text,
		i if i.starts_with('W') => BodyShape::Url,
		_ => BodyShape::Binary,
	}
}

/// A frame body that is only valid in the version it was read from
///
/// These are created when a frame has no equivalent in the target version of a conversion
/// (ex. `RVAD` when converting to ID3v2.4). The original body is kept as-is, and is only
/// written if its ID fits the target version and
/// [`WriteOptions::write_deprecated`](crate::config::WriteOptions::write_deprecated) is set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeprecatedFrame {
	/// The version the body was read from
	pub original_version: Id3v2Version,
	/// The original body
	pub body: Box<FrameBody>,
}

/// The content of an [`Frame`]
///
/// The variant is determined by the frame's ID.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameBody {
	/// A "T..." frame (excluding TXXX and the frames below)
	Text(TextInformationFrame),
	/// A "TRCK" or "TPOS" frame
	///
	/// If the content isn't a number/total pair, it is stored as [`FrameBody::Text`]
	NumberTotal(NumberTotalFrame),
	/// A "TIPL", "TMCL", or "IPLS" frame
	KeyValue(KeyValueFrame),
	/// A "TXXX" frame
	UserText(ExtendedTextFrame),
	/// A "WXXX" frame
	UserUrl(ExtendedUrlFrame),
	/// A "W..." (excluding WXXX) frame
	Url(UrlLinkFrame),
	/// A "COMM" or "USLT" frame
	Language(LanguageFrame),
	/// A "UFID" frame
	UniqueFileIdentifier(UniqueFileIdentifierFrame),
	/// An "APIC" or "PIC" frame
	Picture(AttachedPictureFrame),
	/// A "POPM" frame
	Popularimeter(PopularimeterFrame),
	/// A known frame kept as raw bytes (ex. "MCDI")
	Binary(BinaryFrame),
	/// An unknown or encrypted frame, kept as raw bytes
	Unsupported(BinaryFrame),
	/// A frame with no equivalent in the tag's version
	Deprecated(DeprecatedFrame),
}

impl FrameBody {
	/// Parse the body of a frame with the given ID
	///
	/// NOTE: Any compression, encryption, and unsynchronisation must already be undone
	///
	/// # Errors
	///
	/// The content doesn't match the shape expected for `id`
	pub(crate) fn parse(
		id: &str,
		content: &[u8],
		version: Id3v2Version,
		parse_mode: crate::config::ParsingMode,
	) -> Result<Self> {
		log::trace!("Parsing frame content for ID: {id}");

		Ok(match body_shape(id) {
			BodyShape::Text => Self::Text(TextInformationFrame::parse(content, version)?),
			BodyShape::NumberTotal => {
				let text = TextInformationFrame::parse(content, version)?;
				match NumberTotalFrame::from_text(&text) {
					Some(number_total) => Self::NumberTotal(number_total),
					None => {
						log::debug!("{id} is not a number/total pair, storing as text");
						Self::Text(text)
					},
				}
			},
			BodyShape::KeyValue => Self::KeyValue(KeyValueFrame::parse(content, version)?),
			BodyShape::UserText => Self::UserText(ExtendedTextFrame::parse(content, version)?),
			BodyShape::UserUrl => Self::UserUrl(ExtendedUrlFrame::parse(content, version)?),
			BodyShape::Url => Self::Url(UrlLinkFrame::parse(content)?),
			BodyShape::Language => Self::Language(LanguageFrame::parse(content, version)?),
			BodyShape::UniqueFileIdentifier => Self::UniqueFileIdentifier(
				UniqueFileIdentifierFrame::parse(content, parse_mode)?,
			),
			BodyShape::Picture => Self::Picture(AttachedPictureFrame::parse(content, version)?),
			BodyShape::Popularimeter => Self::Popularimeter(PopularimeterFrame::parse(content)?),
			BodyShape::Binary if crate::id3::v2::registry::is_supported(version, id) => {
				Self::Binary(BinaryFrame::parse(content))
			},
			BodyShape::Binary => Self::Unsupported(BinaryFrame::parse(content)),
		})
	}

	/// Whether this body may be used with a frame of the given ID
	pub(crate) fn fits(&self, id: &str) -> bool {
		let shape = body_shape(id);
		match self {
			Self::Unsupported(_) | Self::Deprecated(_) => true,
			// Non-numeric TRCK/TPOS
			Self::Text(_) => matches!(shape, BodyShape::Text | BodyShape::NumberTotal),
			Self::NumberTotal(_) => shape == BodyShape::NumberTotal,
			Self::KeyValue(_) => shape == BodyShape::KeyValue,
			Self::UserText(_) => shape == BodyShape::UserText,
			Self::UserUrl(_) => shape == BodyShape::UserUrl,
			Self::Url(_) => shape == BodyShape::Url,
			Self::Language(_) => shape == BodyShape::Language,
			Self::UniqueFileIdentifier(_) => shape == BodyShape::UniqueFileIdentifier,
			Self::Picture(_) => shape == BodyShape::Picture,
			Self::Popularimeter(_) => shape == BodyShape::Popularimeter,
			Self::Binary(_) => shape == BodyShape::Binary,
		}
	}

	/// Convert the body to its on-disk form for `version`
	///
	/// # Errors
	///
	/// See the `as_bytes` method of the individual items
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		Ok(match self {
			Self::Text(frame) => frame.as_bytes(version, write_options)?,
			Self::NumberTotal(frame) => frame.as_bytes(version, write_options)?,
			Self::KeyValue(frame) => frame.as_bytes(version, write_options)?,
			Self::UserText(frame) => frame.as_bytes(version, write_options)?,
			Self::UserUrl(frame) => frame.as_bytes(version, write_options)?,
			Self::Url(frame) => frame.as_bytes(write_options)?,
			Self::Language(frame) => frame.as_bytes(version, write_options)?,
			Self::UniqueFileIdentifier(frame) => frame.as_bytes()?,
			Self::Picture(frame) => frame.as_bytes(version, write_options)?,
			Self::Popularimeter(frame) => frame.as_bytes()?,
			Self::Binary(frame) | Self::Unsupported(frame) => frame.as_bytes().to_vec(),
			Self::Deprecated(deprecated) => deprecated
				.body
				.as_bytes(deprecated.original_version, write_options)?,
		})
	}

	/// Check for empty content
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Text(text) => text.value.is_empty(),
			Self::NumberTotal(number_total) => number_total.is_empty(),
			Self::KeyValue(key_value) => key_value.key_value_pairs.is_empty(),
			Self::UserText(extended_text) => extended_text.content.is_empty(),
			Self::UserUrl(extended_url) => extended_url.content.is_empty(),
			Self::Url(link) => link.url.is_empty(),
			Self::Language(language) => language.content.is_empty(),
			Self::UniqueFileIdentifier(ufid) => ufid.identifier.is_empty(),
			Self::Picture(picture) => picture.data.is_empty(),
			Self::Popularimeter(popm) => popm.rating == 0 && popm.counter == 0,
			Self::Binary(binary) | Self::Unsupported(binary) => binary.data.is_empty(),
			Self::Deprecated(deprecated) => deprecated.body.is_empty(),
		}
	}

	/// The textual content of the body, if it has any
	///
	/// Multiple values are separated by null characters.
	pub fn content(&self) -> Option<String> {
		match self {
			Self::Text(text) => Some(text.value.clone()),
			Self::NumberTotal(number_total) => Some(number_total.text()),
			Self::KeyValue(key_value) => Some(key_value.text()),
			Self::UserText(extended_text) => Some(extended_text.content.clone()),
			Self::UserUrl(extended_url) => Some(extended_url.content.clone()),
			Self::Url(link) => Some(link.url.clone()),
			Self::Language(language) => Some(language.content.clone()),
			Self::UniqueFileIdentifier(ufid) => {
				Some(String::from_utf8_lossy(&ufid.identifier).into_owned())
			},
			Self::Picture(picture) => Some(picture.description.clone()),
			Self::Popularimeter(popm) => Some(popm.rating.to_string()),
			Self::Binary(_) | Self::Unsupported(_) => None,
			Self::Deprecated(deprecated) => deprecated.body.content(),
		}
	}

	/// Used for errors when a body doesn't fit its frame ID
	pub(crate) fn name(&self) -> &'static str {
		match self {
			Self::Text(_) => "Text",
			Self::NumberTotal(_) => "NumberTotal",
			Self::KeyValue(_) => "KeyValue",
			Self::UserText(_) => "UserText",
			Self::UserUrl(_) => "UserUrl",
			Self::Url(_) => "Url",
			Self::Language(_) => "Language",
			Self::UniqueFileIdentifier(_) => "UniqueFileIdentifier",
			Self::Picture(_) => "Picture",
			Self::Popularimeter(_) => "Popularimeter",
			Self::Binary(_) => "Binary",
			Self::Unsupported(_) => "Unsupported",
			Self::Deprecated(_) => "Deprecated",
		}
	}
}

/// Represents an `ID3v2` frame
///
/// A frame is an ID, a set of flags, and a body whose shape is determined by the ID. The
/// version is that of the tag the frame belongs to, frames are converted when inserted into a tag
/// of another version.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Frame {
	pub(crate) id: FrameId,
	pub(crate) version: Id3v2Version,
	/// The frame's flags
	pub flags: FrameFlags,
	pub(crate) body: FrameBody,
}

impl Frame {
	/// Create a new [`Frame`]
	///
	/// # Errors
	///
	/// * `id` is not a valid [`FrameId`] for `version`
	/// * `body` doesn't fit `id` (ex. a [`FrameBody::Picture`] for `TIT2`)
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::TextEncoding;
	/// use id3_engine::id3::v2::{
	/// 	Frame, FrameBody, FrameFlags, Id3v2Version, TextInformationFrame, UrlLinkFrame,
	/// };
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let body = FrameBody::Text(TextInformationFrame::new(TextEncoding::UTF8, "Foo"));
	/// let frame = Frame::new("TIT2", Id3v2Version::V4, FrameFlags::default(), body)?;
	/// assert_eq!(frame.content().as_deref(), Some("Foo"));
	///
	/// let body = FrameBody::Url(UrlLinkFrame::new("https://example.com"));
	/// assert!(Frame::new("TIT2", Id3v2Version::V4, FrameFlags::default(), body).is_err());
	/// # Ok(()) }
	/// ```
	pub fn new(
		id: &str,
		version: Id3v2Version,
		flags: FrameFlags,
		body: FrameBody,
	) -> Result<Self> {
		let id = FrameId::new(id)?;
		if !id.fits(version) {
			return Err(id3v2_err!(InvalidFrameIdentifier(id.0.into_bytes())));
		}

		if !body.fits(id.as_str()) {
			return Err(id3v2_err!(BadFrame(id.0, body.name())));
		}

		Ok(Self {
			id,
			version,
			flags,
			body,
		})
	}

	// Used internally, the ID must already be valid for `version`
	pub(crate) fn from_parts(
		id: FrameId,
		version: Id3v2Version,
		flags: FrameFlags,
		body: FrameBody,
	) -> Self {
		Self {
			id,
			version,
			flags,
			body,
		}
	}

	/// Create a text frame, choosing an encoding suitable for `version`
	///
	/// For `TRCK`/`TPOS`, a number/total pair is stored if `value` is one.
	///
	/// # Errors
	///
	/// See [`Frame::new`]
	pub fn text(id: &str, version: Id3v2Version, value: impl Into<String>) -> Result<Self> {
		let value = value.into();
		let text = TextInformationFrame::new(preferred_encoding(version, &value), value);

		let body = match body_shape(id) {
			BodyShape::NumberTotal => NumberTotalFrame::from_text(&text)
				.map_or(FrameBody::Text(text), FrameBody::NumberTotal),
			_ => FrameBody::Text(text),
		};

		Self::new(id, version, FrameFlags::default(), body)
	}

	/// The frame's ID
	pub fn id(&self) -> &FrameId {
		&self.id
	}

	/// Extract the string from the [`FrameId`]
	pub fn id_str(&self) -> &str {
		self.id.as_str()
	}

	/// The version of the tag this frame belongs to
	pub fn version(&self) -> Id3v2Version {
		self.version
	}

	/// The frame's body
	pub fn body(&self) -> &FrameBody {
		&self.body
	}

	/// Mutable access to the frame's body
	///
	/// NOTE: The body variant is fixed by the ID, see [`Frame::set_body`] to replace it.
	pub fn body_mut(&mut self) -> &mut FrameBody {
		&mut self.body
	}

	/// Replace the frame's body
	///
	/// # Errors
	///
	/// `body` doesn't fit the frame's ID
	pub fn set_body(&mut self, body: FrameBody) -> Result<()> {
		if !body.fits(self.id.as_str()) {
			return Err(id3v2_err!(BadFrame(self.id.0.clone(), body.name())));
		}

		self.body = body;
		Ok(())
	}

	/// Consume the frame, returning the body
	pub fn into_body(self) -> FrameBody {
		self.body
	}

	/// See [`FrameBody::content`]
	pub fn content(&self) -> Option<String> {
		self.body.content()
	}

	/// See [`FrameBody::is_empty`]
	pub fn is_empty(&self) -> bool {
		self.body.is_empty()
	}

	/// Whether this frame's body is encrypted
	pub fn is_encrypted(&self) -> bool {
		self.flags.encryption.is_some()
	}

	/// The total size of the frame as written, header included
	///
	/// # Errors
	///
	/// The body can't be encoded, see [`FrameBody::as_bytes`]
	pub fn encoded_size(&self, write_options: WriteOptions) -> Result<usize> {
		let body = self.body.as_bytes(self.version, write_options)?;
		Ok(self.version.frame_header_len() + self.flags.sub_header_len(self.version) + body.len())
	}
}

/// The encoding used for text created through the generic API
///
/// ID3v2.4 gets UTF-8, older versions get Latin-1 when the text allows it, UTF-16 otherwise.
pub(crate) fn preferred_encoding(version: Id3v2Version, text: &str) -> TextEncoding {
	match version {
		Id3v2Version::V4 => TextEncoding::UTF8,
		_ if TextEncoding::verify_latin1(text) => TextEncoding::Latin1,
		_ => TextEncoding::UTF16,
	}
}

/// Various flags to describe the content of a frame
///
/// ID3v2.2 frames have no flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct FrameFlags {
	/// Preserve frame on tag edit
	pub tag_alter_preservation: bool,
	/// Preserve frame on file edit
	///
	/// See [`Id3v2Tag::prepare_for_file_alteration`](crate::id3::v2::Id3v2Tag::prepare_for_file_alteration)
	pub file_alter_preservation: bool,
	/// Item cannot be written to
	pub read_only: bool,
	/// The group identifier the frame belongs to
	///
	/// All frames with the same group identifier byte belong to the same group.
	pub grouping_identity: Option<u8>,
	/// Frame is zlib compressed
	///
	/// Compressed frames are decompressed when read, and never compressed on write. This
	/// is only kept for encrypted frames, whose content is opaque.
	pub compression: bool,
	/// Frame encryption method symbol
	///
	/// NOTE: Since the encryption method is unknown, encrypted frames are kept as raw bytes
	///
	/// The encryption method symbol **must** be >= 0x80.
	pub encryption: Option<u8>,
	/// Frame is unsynchronised (ID3v2.4 only)
	///
	/// This is reversed when reading, and recomputed when writing.
	pub unsynchronisation: bool,
	/// Frame has a data length indicator (ID3v2.4 only, implied by compression in ID3v2.3)
	///
	/// The data length indicator is the size of the frame if the flags were all zeroed out.
	pub data_length_indicator: Option<u32>,
}

impl FrameFlags {
	const V3_VALID_MASK: u16 = 0xE0E0;
	const V4_VALID_MASK: u16 = 0x704F;

	/// Parse the flags from an ID3v2.4 frame
	///
	/// Reserved bits are cleared.
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)`:
	/// * `grouping_identity`
	/// * `encryption`
	/// * `data_length_indicator`
	pub fn parse_id3v24(flags: u16) -> Self {
		if flags & !Self::V4_VALID_MASK != 0 {
			log::warn!(
				"Clearing reserved ID3v2.4 frame flag bits: {:#06X}",
				flags & !Self::V4_VALID_MASK
			);
		}

		FrameFlags {
			tag_alter_preservation: (flags & 0x4000) == 0x4000,
			file_alter_preservation: (flags & 0x2000) == 0x2000,
			read_only: (flags & 0x1000) == 0x1000,
			grouping_identity: ((flags & 0x0040) == 0x0040).then_some(0),
			compression: (flags & 0x0008) == 0x0008,
			encryption: ((flags & 0x0004) == 0x0004).then_some(0),
			unsynchronisation: (flags & 0x0002) == 0x0002,
			data_length_indicator: ((flags & 0x0001) == 0x0001).then_some(0),
		}
	}

	/// Parse the flags from an ID3v2.3 frame
	///
	/// Reserved bits are cleared.
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)`:
	/// * `grouping_identity`
	/// * `encryption`
	pub fn parse_id3v23(flags: u16) -> Self {
		if flags & !Self::V3_VALID_MASK != 0 {
			log::warn!(
				"Clearing reserved ID3v2.3 frame flag bits: {:#06X}",
				flags & !Self::V3_VALID_MASK
			);
		}

		FrameFlags {
			tag_alter_preservation: (flags & 0x8000) == 0x8000,
			file_alter_preservation: (flags & 0x4000) == 0x4000,
			read_only: (flags & 0x2000) == 0x2000,
			grouping_identity: ((flags & 0x0020) == 0x0020).then_some(0),
			compression: (flags & 0x0080) == 0x0080,
			encryption: ((flags & 0x0040) == 0x0040).then_some(0),
			unsynchronisation: false,
			data_length_indicator: None,
		}
	}

	/// Get the ID3v2.4 byte representation of the flags
	pub fn as_id3v24_bytes(&self) -> u16 {
		let mut flags = 0;

		if *self == FrameFlags::default() {
			return flags;
		}

		if self.tag_alter_preservation {
			flags |= 0x4000;
		}

		if self.file_alter_preservation {
			flags |= 0x2000;
		}

		if self.read_only {
			flags |= 0x1000;
		}

		if self.grouping_identity.is_some() {
			flags |= 0x0040;
		}

		if self.compression {
			flags |= 0x0008;
		}

		if self.encryption.is_some() {
			flags |= 0x0004;
		}

		if self.unsynchronisation {
			flags |= 0x0002;
		}

		if self.data_length_indicator.is_some() {
			flags |= 0x0001;
		}

		flags
	}

	/// Get the ID3v2.3 byte representation of the flags
	pub fn as_id3v23_bytes(&self) -> u16 {
		let mut flags = 0;

		if *self == FrameFlags::default() {
			return flags;
		}

		if self.tag_alter_preservation {
			flags |= 0x8000;
		}

		if self.file_alter_preservation {
			flags |= 0x4000;
		}

		if self.read_only {
			flags |= 0x2000;
		}

		if self.grouping_identity.is_some() {
			flags |= 0x0020;
		}

		if self.compression {
			flags |= 0x0080;
		}

		if self.encryption.is_some() {
			flags |= 0x0040;
		}

		flags
	}

	/// The number of bytes the grouping, encryption, and data length sub-headers occupy
	pub(crate) fn sub_header_len(&self, version: Id3v2Version) -> usize {
		let dli = match version {
			Id3v2Version::V2 => return 0,
			Id3v2Version::V3 => self.compression,
			Id3v2Version::V4 => self.data_length_indicator.is_some(),
		};

		usize::from(self.grouping_identity.is_some())
			+ usize::from(self.encryption.is_some())
			+ if dli { 4 } else { 0 }
	}
}

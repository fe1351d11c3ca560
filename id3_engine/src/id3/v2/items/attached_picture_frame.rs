use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for_version, read_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::macros::{err, id3v2_err};
use crate::util::text::{TextDecoder, TextEncoding};

/// The picture type, according to ID3v2 APIC
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum PictureType {
	Other,
	Icon,
	OtherIcon,
	CoverFront,
	CoverBack,
	Leaflet,
	Media,
	LeadArtist,
	Artist,
	Conductor,
	Band,
	Composer,
	Lyricist,
	RecordingLocation,
	DuringRecording,
	DuringPerformance,
	ScreenCapture,
	BrightFish,
	Illustration,
	BandLogo,
	PublisherLogo,
	Undefined(u8),
}

impl PictureType {
	/// Get a `u8` from a `PictureType` according to ID3v2 APIC
	pub fn as_u8(&self) -> u8 {
		match self {
			Self::Other => 0,
			Self::Icon => 1,
			Self::OtherIcon => 2,
			Self::CoverFront => 3,
			Self::CoverBack => 4,
			Self::Leaflet => 5,
			Self::Media => 6,
			Self::LeadArtist => 7,
			Self::Artist => 8,
			Self::Conductor => 9,
			Self::Band => 10,
			Self::Composer => 11,
			Self::Lyricist => 12,
			Self::RecordingLocation => 13,
			Self::DuringRecording => 14,
			Self::DuringPerformance => 15,
			Self::ScreenCapture => 16,
			Self::BrightFish => 17,
			Self::Illustration => 18,
			Self::BandLogo => 19,
			Self::PublisherLogo => 20,
			Self::Undefined(i) => *i,
		}
	}

	/// Get a `PictureType` from a u8 according to ID3v2 APIC
	pub fn from_u8(byte: u8) -> Self {
		match byte {
			0 => Self::Other,
			1 => Self::Icon,
			2 => Self::OtherIcon,
			3 => Self::CoverFront,
			4 => Self::CoverBack,
			5 => Self::Leaflet,
			6 => Self::Media,
			7 => Self::LeadArtist,
			8 => Self::Artist,
			9 => Self::Conductor,
			10 => Self::Band,
			11 => Self::Composer,
			12 => Self::Lyricist,
			13 => Self::RecordingLocation,
			14 => Self::DuringRecording,
			15 => Self::DuringPerformance,
			16 => Self::ScreenCapture,
			17 => Self::BrightFish,
			18 => Self::Illustration,
			19 => Self::BandLogo,
			20 => Self::PublisherLogo,
			i => Self::Undefined(i),
		}
	}
}

// ID3v2.2 PIC frames use a 3 character image format in place of a MIME type
const V2_IMAGE_FORMATS: [(&[u8; 3], &str); 5] = [
	(b"PNG", "image/png"),
	(b"JPG", "image/jpeg"),
	(b"GIF", "image/gif"),
	(b"BMP", "image/bmp"),
	(b"TIF", "image/tiff"),
];

/// The ID3v2.2 image format for a MIME type
pub(crate) fn v2_image_format(mime_type: &str) -> Option<&'static [u8; 3]> {
	V2_IMAGE_FORMATS
		.iter()
		.find(|(_, mime)| mime.eq_ignore_ascii_case(mime_type))
		.map(|(format, _)| *format)
}

/// An `ID3v2` attached picture frame (`APIC`/`PIC`)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttachedPictureFrame {
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// The picture's MIME type (ex. "image/png")
	pub mime_type: String,
	/// The picture type
	pub picture_type: PictureType,
	/// The picture's description
	pub description: String,
	/// The raw image data
	pub data: Vec<u8>,
}

impl AttachedPictureFrame {
	/// Get an [`AttachedPictureFrame`] from ID3v2 A/PIC bytes
	///
	/// NOTE: This expects *only* the frame content
	///
	/// # Errors
	///
	/// * There isn't enough data present
	/// * Unable to decode any of the text
	///
	/// ID3v2.2:
	///
	/// * The image format is not one of "PNG", "JPG", "GIF", "BMP", or "TIF"
	pub fn parse(mut content: &[u8], version: Id3v2Version) -> Result<Self> {
		let encoding = read_encoding(&mut content, version)?;

		let mime_type;
		if version == Id3v2Version::V2 {
			let Some((format, rest)) = content.split_first_chunk::<3>() else {
				return Err(id3v2_err!(BadFrameLength));
			};

			let Some((_, mime)) = V2_IMAGE_FORMATS
				.iter()
				.find(|(f, _)| f.eq_ignore_ascii_case(format))
			else {
				return Err(id3v2_err!(BadPictureFormat(
					String::from_utf8_lossy(format).into_owned()
				)));
			};

			mime_type = String::from(*mime);
			content = rest;
		} else {
			mime_type = TextDecoder::new(TextEncoding::Latin1).read_terminated(&mut content)?;
		}

		let Some((picture_type, rest)) = content.split_first() else {
			return Err(id3v2_err!(BadFrameLength));
		};
		content = rest;

		let description = TextDecoder::new(encoding).read_terminated(&mut content)?;

		Ok(Self {
			encoding,
			mime_type,
			picture_type: PictureType::from_u8(*picture_type),
			description,
			data: content.to_vec(),
		})
	}

	/// Convert an [`AttachedPictureFrame`] to a ID3v2 A/PIC byte Vec
	///
	/// NOTE: This does not include the frame header
	///
	/// # Errors
	///
	/// * Too much data was provided
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	///
	/// ID3v2.2:
	///
	/// * The MIME type has no 3 character image format equivalent
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for_version(self.encoding, version);

		let mut data = vec![encoding as u8];

		if version == Id3v2Version::V2 {
			let Some(format) = v2_image_format(&self.mime_type) else {
				return Err(id3v2_err!(BadPictureFormat(self.mime_type.clone())));
			};

			data.extend_from_slice(format);
		} else {
			data.extend(TextEncoding::Latin1.encode(&self.mime_type, true, false)?);
		}

		data.push(self.picture_type.as_u8());
		data.extend(encoding.encode(
			&self.description,
			true,
			write_options.lossy_text_encoding,
		)?);
		data.extend_from_slice(&self.data);

		if data.len() as u64 > u64::from(u32::MAX) {
			err!(TooMuchData);
		}

		Ok(data)
	}
}

use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::macros::{err, id3v2_err};
use crate::util::text::TextEncoding;

use byteorder::ReadBytesExt;

pub(crate) fn verify_encoding(encoding: u8, version: Id3v2Version) -> Result<TextEncoding> {
	if version == Id3v2Version::V2 && (encoding != 0 && encoding != 1) {
		return Err(id3v2_err!(V2InvalidTextEncoding));
	}

	match TextEncoding::from_u8(encoding) {
		None => err!(TextDecode("Found invalid encoding")),
		Some(e) => Ok(e),
	}
}

/// Read the leading encoding byte of a frame body
pub(crate) fn read_encoding(content: &mut &[u8], version: Id3v2Version) -> Result<TextEncoding> {
	let encoding = content
		.read_u8()
		.map_err(|_| id3v2_err!(BadFrameLength))?;

	verify_encoding(encoding, version)
}

/// Substitute encodings that `version` can't represent
pub(crate) fn encoding_for_version(encoding: TextEncoding, version: Id3v2Version) -> TextEncoding {
	match version {
		Id3v2Version::V4 => encoding,
		Id3v2Version::V2 | Id3v2Version::V3 => encoding.to_id3v23(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test_log::test]
	fn v2_encodings() {
		assert!(verify_encoding(0, Id3v2Version::V2).is_ok());
		assert!(verify_encoding(1, Id3v2Version::V2).is_ok());
		assert!(verify_encoding(3, Id3v2Version::V2).is_err());
		assert!(verify_encoding(3, Id3v2Version::V3).is_ok());
		assert!(verify_encoding(4, Id3v2Version::V4).is_err());
	}

	#[test_log::test]
	fn empty_body() {
		let mut content: &[u8] = &[];
		assert!(read_encoding(&mut content, Id3v2Version::V4).is_err());
	}
}

use super::constants::{GENRES, ID3V1_TAG_MARKER};
use super::tag::Id3v1Tag;
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::err;
use crate::util::text::latin1_decode;

impl Id3v1Tag {
	/// Parse a 128 byte ID3v1 tag
	///
	/// # Errors
	///
	/// * The tag doesn't start with "TAG"
	/// * `parse_mode` is [`ParsingMode::Strict`], and the year isn't made up of 4 ASCII digits
	pub fn parse(reader: [u8; 128], parse_mode: ParsingMode) -> Result<Self> {
		let mut tag = Self::default();

		if reader[..3] != ID3V1_TAG_MARKER {
			err!(TagNotFound);
		}

		let reader = &reader[3..];

		tag.title = decode_text(&reader[..30]);
		tag.artist = decode_text(&reader[30..60]);
		tag.album = decode_text(&reader[60..90]);

		tag.year = try_parse_year(&reader[90..94], parse_mode)?;

		// Determine the range of the comment (30 bytes for ID3v1 and 28 for ID3v1.1)
		// We check for the null terminator 28 bytes in, and for a non-zero track number after it.
		// A track number of 0 is invalid.
		let range = if reader[122] == 0 && reader[123] != 0 {
			tag.track_number = Some(reader[123]);

			94_usize..123
		} else {
			94..124
		};

		tag.comment = decode_text(&reader[range]);

		if usize::from(reader[124]) < GENRES.len() {
			tag.genre = Some(reader[124]);
		}

		Ok(tag)
	}
}

fn decode_text(data: &[u8]) -> Option<String> {
	let mut first_null_pos = data.len();
	if let Some(null_pos) = data.iter().position(|&b| b == 0) {
		if null_pos == 0 {
			return None;
		}

		if data[null_pos..].iter().any(|b| *b != b'\0') {
			log::warn!("ID3v1 text field contains trailing junk, skipping");
		}

		first_null_pos = null_pos;
	}

	Some(latin1_decode(&data[..first_null_pos]))
}

fn try_parse_year(input: &[u8], parse_mode: ParsingMode) -> Result<Option<u16>> {
	let (num_digits, year) = input
		.iter()
		.take_while(|c| (**c).is_ascii_digit())
		.fold((0usize, 0u16), |(num_digits, year), c| {
			(num_digits + 1, year * 10 + u16::from(*c - b'0'))
		});
	if num_digits != 4 {
		// Most writers use "\0\0\0\0" for an empty year rather than "0000"
		if parse_mode == ParsingMode::Strict {
			err!(TextDecode(
				"ID3v1 year field contains non-ASCII digit characters"
			));
		}

		return Ok(None);
	}

	Ok(Some(year))
}

#[cfg(test)]
mod tests {
	use crate::config::ParsingMode;
	use crate::error::ErrorKind;
	use crate::id3::v1::Id3v1Tag;

	fn v1_tag() -> [u8; 128] {
		let mut tag = [0; 128];
		tag[..3].copy_from_slice(b"TAG");
		tag[3..8].copy_from_slice(b"Title");
		tag[33..39].copy_from_slice(b"Artist");
		tag[63..68].copy_from_slice(b"Album");
		tag[93..97].copy_from_slice(b"2004");
		tag[97..119].copy_from_slice(b"A full thirty byte com");
		tag[127] = 255;
		tag
	}

	#[test_log::test]
	fn parse_v1_1() {
		let mut raw = v1_tag();
		raw[126] = 7;

		let tag = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap();
		assert_eq!(tag.title(), Some("Title"));
		assert_eq!(tag.artist(), Some("Artist"));
		assert_eq!(tag.album(), Some("Album"));
		assert_eq!(tag.year, Some(2004));
		assert_eq!(tag.comment(), Some("A full thirty byte com"));
		assert_eq!(tag.track_number, Some(7));
		assert_eq!(tag.genre, None);
	}

	#[test_log::test]
	fn parse_v1_0_comment() {
		let mut raw = v1_tag();
		raw[97..127].copy_from_slice(b"A full thirty byte comment!!!!");

		let tag = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap();
		assert_eq!(tag.comment(), Some("A full thirty byte comment!!!!"));
		assert_eq!(tag.track_number, None);
	}

	#[test_log::test]
	fn bad_year() {
		let mut raw = v1_tag();
		raw[93..97].copy_from_slice(&[0; 4]);

		let tag = Id3v1Tag::parse(raw, ParsingMode::BestAttempt).unwrap();
		assert_eq!(tag.year, None);

		let err = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::TextDecode(_)));
	}

	#[test_log::test]
	fn fake_tag() {
		let mut raw = v1_tag();
		raw[..3].copy_from_slice(b"TAF");

		let err = Id3v1Tag::parse(raw, ParsingMode::BestAttempt).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::TagNotFound));
	}
}

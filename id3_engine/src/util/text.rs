use crate::error::{ErrorKind, Id3Error, Result};

/// Errors that can occur while encoding text
#[derive(Copy, Clone, Debug)]
pub struct TextEncodingError {
	encoding: TextEncoding,
	valid_up_to: usize,
}

impl TextEncodingError {
	/// The target text encoding
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// The character index in the provided string up to which the encoding was valid
	pub fn valid_up_to(&self) -> usize {
		self.valid_up_to
	}
}

impl core::fmt::Display for TextEncodingError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let encoding = match self.encoding {
			TextEncoding::Latin1 => "Latin-1",
			TextEncoding::UTF16 => "UTF-16",
			TextEncoding::UTF8 => "UTF-8",
			TextEncoding::UTF16BE => "UTF-16 BE",
		};

		write!(
			f,
			"invalid {encoding} sequence from index {}",
			self.valid_up_to
		)
	}
}

impl core::error::Error for TextEncodingError {}

/// The text encoding for use in ID3v2 frames
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian (ID3v2.4 only)
	UTF16BE = 2,
	/// UTF-8 (ID3v2.4 only)
	UTF8 = 3,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-3 inclusive
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			_ => None,
		}
	}

	pub(crate) fn verify_latin1(text: &str) -> bool {
		text.chars().all(|c| c as u32 <= 255)
	}

	/// ID3v2.4 introduced two new text encodings.
	///
	/// When writing ID3v2.2 or ID3v2.3, we just substitute with UTF-16.
	pub(crate) fn to_id3v23(self) -> Self {
		match self {
			Self::UTF8 | Self::UTF16BE => {
				log::warn!(
					"Text encoding {:?} is not supported in ID3v2.2/ID3v2.3, substituting with UTF-16",
					self
				);
				Self::UTF16
			},
			_ => self,
		}
	}

	/// The number of bytes used by the null terminator
	pub(crate) fn terminator_len(self) -> usize {
		match self {
			Self::Latin1 | Self::UTF8 => 1,
			Self::UTF16 | Self::UTF16BE => 2,
		}
	}

	pub(crate) fn encode(
		self,
		text: &str,
		terminated: bool,
		lossy: bool,
	) -> std::result::Result<Vec<u8>, TextEncodingError> {
		let mut out = match self {
			TextEncoding::Latin1 => {
				latin1_encode(text, lossy).collect::<std::result::Result<Vec<u8>, _>>()?
			},
			TextEncoding::UTF16 => utf16_encode(text, u16::to_le_bytes, true),
			TextEncoding::UTF16BE => utf16_encode(text, u16::to_be_bytes, false),
			TextEncoding::UTF8 => text.as_bytes().to_vec(),
		};

		if terminated {
			out.extend(std::iter::repeat_n(0, self.terminator_len()));
		}

		Ok(out)
	}
}

/// Decodes consecutive strings of a single frame
///
/// UTF-16 strings may each carry their own byte order mark. Some encoders will only write a BOM for the
/// first string in a frame (ex. only the description in COMM), so the last byte order seen is reused for
/// any string that lacks one.
#[derive(Copy, Clone, Debug)]
pub(crate) struct TextDecoder {
	encoding: TextEncoding,
	little_endian: bool,
}

impl TextDecoder {
	pub(crate) fn new(encoding: TextEncoding) -> Self {
		Self {
			encoding,
			// UTF-16 without a BOM is most commonly little endian in the wild
			little_endian: encoding != TextEncoding::UTF16BE,
		}
	}

	/// Read a null terminated string, advancing `reader` past the terminator
	///
	/// If no terminator is found, the rest of `reader` is consumed.
	pub(crate) fn read_terminated(&mut self, reader: &mut &[u8]) -> Result<String> {
		let content = *reader;
		let (text_end, next) = match self.encoding {
			TextEncoding::Latin1 | TextEncoding::UTF8 => match content.iter().position(|&b| b == 0) {
				Some(pos) => (pos, pos + 1),
				None => (content.len(), content.len()),
			},
			TextEncoding::UTF16 | TextEncoding::UTF16BE => {
				match content.chunks_exact(2).position(|c| c == [0, 0]) {
					Some(pos) => (pos * 2, pos * 2 + 2),
					None => (content.len(), content.len()),
				}
			},
		};

		*reader = &content[next..];
		self.decode(&content[..text_end])
	}

	/// Decode the entirety of `content`, trimming any trailing null terminators
	pub(crate) fn read_to_end(&mut self, content: &[u8]) -> Result<String> {
		let mut text = self.decode(content)?;
		trim_end_nulls(&mut text);

		Ok(text)
	}

	fn decode(&mut self, bytes: &[u8]) -> Result<String> {
		if bytes.is_empty() {
			return Ok(String::new());
		}

		match self.encoding {
			TextEncoding::Latin1 => Ok(latin1_decode(bytes)),
			TextEncoding::UTF8 => String::from_utf8(bytes.to_vec()).map_err(|_| {
				Id3Error::new(ErrorKind::TextDecode("Expected a UTF-8 string"))
			}),
			TextEncoding::UTF16 | TextEncoding::UTF16BE => {
				if bytes.len() % 2 != 0 {
					log::warn!("UTF-16 string has an odd length, ignoring the final byte");
				}

				let little_endian = &mut self.little_endian;
				let units = bytes
					.chunks_exact(2)
					.filter_map(|c| match [c[0], c[1]] {
						[0xFF, 0xFE] => {
							*little_endian = true;
							None
						},
						[0xFE, 0xFF] => {
							*little_endian = false;
							None
						},
						unit if *little_endian => Some(u16::from_le_bytes(unit)),
						unit => Some(u16::from_be_bytes(unit)),
					})
					.collect::<Vec<u16>>();

				String::from_utf16(&units).map_err(|_| {
					Id3Error::new(ErrorKind::TextDecode("Given an invalid UTF-16 string"))
				})
			},
		}
	}
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	bytes.iter().map(|c| char::from(*c)).collect::<String>()
}

pub(crate) fn latin1_encode(
	s: &str,
	lossy: bool,
) -> impl Iterator<Item = std::result::Result<u8, TextEncodingError>> {
	s.chars().enumerate().map(move |(index, c)| {
		if (c as u32) <= 255 {
			Ok(c as u8)
		} else if lossy {
			Ok(b'?')
		} else {
			Err(TextEncodingError {
				encoding: TextEncoding::Latin1,
				valid_up_to: index,
			})
		}
	})
}

pub(crate) fn trim_end_nulls(text: &mut String) {
	if text.ends_with('\0') {
		let new_len = text.trim_end_matches('\0').len();
		text.truncate(new_len);
	}
}

fn utf16_encode(text: &str, endianness: fn(u16) -> [u8; 2], bom: bool) -> Vec<u8> {
	let mut encoded = Vec::<u8>::new();

	if bom {
		encoded.extend_from_slice(&endianness(0xFEFF_u16));
	}

	for ch in text.encode_utf16() {
		encoded.extend_from_slice(&endianness(ch));
	}

	encoded
}

#[cfg(test)]
mod tests {
	use crate::util::text::{TextDecoder, TextEncoding};

	const TEST_STRING: &str = "l\u{00f8}ft\u{00a5}";

	#[test_log::test]
	fn text_decode() {
		// No BOM, explicitly big endian
		let utf16be_decode = TextDecoder::new(TextEncoding::UTF16BE)
			.read_to_end(&[
				0x00, 0x6C, 0x00, 0xF8, 0x00, 0x66, 0x00, 0x74, 0x00, 0xA5, 0x00, 0x00,
			])
			.unwrap();
		assert_eq!(utf16be_decode, TEST_STRING);

		// BOM test
		let be_utf16_decode = TextDecoder::new(TextEncoding::UTF16)
			.read_to_end(&[
				0xFE, 0xFF, 0x00, 0x6C, 0x00, 0xF8, 0x00, 0x66, 0x00, 0x74, 0x00, 0xA5, 0x00, 0x00,
			])
			.unwrap();
		let le_utf16_decode = TextDecoder::new(TextEncoding::UTF16)
			.read_to_end(&[
				0xFF, 0xFE, 0x6C, 0x00, 0xF8, 0x00, 0x66, 0x00, 0x74, 0x00, 0xA5, 0x00, 0x00, 0x00,
			])
			.unwrap();

		assert_eq!(be_utf16_decode, le_utf16_decode);
		assert_eq!(be_utf16_decode, TEST_STRING);

		let utf8_decode = TextDecoder::new(TextEncoding::UTF8)
			.read_to_end(TEST_STRING.as_bytes())
			.unwrap();
		assert_eq!(utf8_decode, TEST_STRING);
	}

	#[test_log::test]
	fn text_decode_terminated() {
		let mut reader = &[0x00, 0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x00, 0x01][..];

		let mut decoder = TextDecoder::new(TextEncoding::Latin1);
		assert_eq!(decoder.read_terminated(&mut reader).unwrap(), "");
		assert_eq!(decoder.read_terminated(&mut reader).unwrap(), "Hello");
		assert_eq!(reader, &[0x01]);
	}

	#[test_log::test]
	fn utf16_bom_carried_over() {
		// Only the first string has a BOM
		let mut reader = &[
			0xFE, 0xFF, 0x00, 0x61, 0x00, 0x00, // "a"
			0x00, 0x62, 0x00, 0x63, // "bc"
		][..];

		let mut decoder = TextDecoder::new(TextEncoding::UTF16);
		assert_eq!(decoder.read_terminated(&mut reader).unwrap(), "a");
		assert_eq!(decoder.read_to_end(reader).unwrap(), "bc");
	}

	#[test_log::test]
	fn text_encode() {
		// No BOM
		let utf16be_encode = TextEncoding::UTF16BE
			.encode(TEST_STRING, true, false)
			.unwrap();

		assert_eq!(
			utf16be_encode.as_slice(),
			&[
				0x00, 0x6C, 0x00, 0xF8, 0x00, 0x66, 0x00, 0x74, 0x00, 0xA5, 0x00, 0x00
			]
		);

		// BOM test
		let utf16_encode = TextEncoding::UTF16.encode(TEST_STRING, false, false).unwrap();
		assert_eq!(
			utf16_encode.as_slice(),
			&[
				0xFF, 0xFE, 0x6C, 0x00, 0xF8, 0x00, 0x66, 0x00, 0x74, 0x00, 0xA5, 0x00
			]
		);

		let latin1_encode = TextEncoding::Latin1.encode(TEST_STRING, true, false).unwrap();
		assert_eq!(
			latin1_encode.as_slice(),
			&[0x6C, 0xF8, 0x66, 0x74, 0xA5, 0x00]
		);
	}

	#[test_log::test]
	fn latin1_lossy() {
		assert!(TextEncoding::Latin1.encode("a\u{2603}", false, false).is_err());

		let lossy = TextEncoding::Latin1.encode("a\u{2603}", false, true).unwrap();
		assert_eq!(lossy, b"a?");
	}
}

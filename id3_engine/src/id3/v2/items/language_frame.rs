use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for_version, read_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::macros::id3v2_err;
use crate::util::text::{TextDecoder, TextEncoding};

/// An `ID3v2` frame with a language, description, and content
///
/// This is used in the following frames:
///
/// * `COMM`/`COM` (Comments)
/// * `USLT`/`ULT` (Unsynchronised lyrics)
///
/// The language and description together discriminate between frames of the same ID.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LanguageFrame {
	/// The encoding of the description and content
	pub encoding: TextEncoding,
	/// ISO-639-2 language code (3 bytes)
	pub language: [u8; 3],
	/// Unique content description
	pub description: String,
	/// The actual frame content
	pub content: String,
}

impl LanguageFrame {
	/// Language used when none is specified
	pub const UNKNOWN_LANGUAGE: [u8; 3] = *b"XXX";

	/// Create a new [`LanguageFrame`]
	pub fn new(
		encoding: TextEncoding,
		language: [u8; 3],
		description: impl Into<String>,
		content: impl Into<String>,
	) -> Self {
		Self {
			encoding,
			language,
			description: description.into(),
			content: content.into(),
		}
	}

	/// Append another value to the content
	pub fn push_value(&mut self, value: &str) {
		if !self.content.is_empty() {
			self.content.push('\0');
		}

		self.content.push_str(value);
	}

	/// Read a [`LanguageFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Not enough data
	/// * Unable to decode the text
	pub fn parse(mut content: &[u8], version: Id3v2Version) -> Result<Self> {
		let encoding = read_encoding(&mut content, version)?;

		let Some((language, rest)) = content.split_first_chunk::<3>() else {
			return Err(id3v2_err!(BadFrameLength));
		};
		let language = *language;
		content = rest;

		let mut decoder = TextDecoder::new(encoding);
		let description = decoder.read_terminated(&mut content)?;
		let content = decoder.read_to_end(content)?;

		Ok(Self {
			encoding,
			language,
			description,
			content,
		})
	}

	/// Convert a [`LanguageFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * `language` is not exactly 3 ASCII alphabetic characters
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		if !verify_language(self.language) {
			return Err(id3v2_err!(InvalidLanguage(self.language)));
		}

		let encoding = encoding_for_version(self.encoding, version);

		let mut bytes = vec![encoding as u8];
		bytes.extend(self.language);
		bytes.extend(encoding.encode(
			&self.description,
			true,
			write_options.lossy_text_encoding,
		)?);
		bytes.extend(encoding.encode(&self.content, false, write_options.lossy_text_encoding)?);

		Ok(bytes)
	}
}

fn verify_language(language: [u8; 3]) -> bool {
	language.iter().all(u8::is_ascii_alphabetic)
}

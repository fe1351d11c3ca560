use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for_version, read_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::util::text::{TextDecoder, TextEncoding};

/// An extended `ID3v2` text frame (`TXXX`/`TXX`)
///
/// The description is the discriminator: two frames with the same description are merged,
/// and their contents joined with a null separator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedTextFrame {
	/// The encoding of the description and contents
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: String,
	/// The actual frame content
	pub content: String,
}

impl ExtendedTextFrame {
	/// Create a new [`ExtendedTextFrame`]
	pub fn new(
		encoding: TextEncoding,
		description: impl Into<String>,
		content: impl Into<String>,
	) -> Self {
		Self {
			encoding,
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

	/// Read an [`ExtendedTextFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the text
	///
	/// ID3v2.2:
	///
	/// * The encoding is not [`TextEncoding::Latin1`] or [`TextEncoding::UTF16`]
	pub fn parse(mut content: &[u8], version: Id3v2Version) -> Result<Self> {
		let encoding = read_encoding(&mut content, version)?;

		let mut decoder = TextDecoder::new(encoding);
		let description = decoder.read_terminated(&mut content)?;
		let content = decoder.read_to_end(content)?;

		Ok(Self {
			encoding,
			description,
			content,
		})
	}

	/// Convert an [`ExtendedTextFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for_version(self.encoding, version);

		let mut bytes = vec![encoding as u8];
		bytes.extend(encoding.encode(
			&self.description,
			true,
			write_options.lossy_text_encoding,
		)?);
		bytes.extend(encoding.encode(&self.content, false, write_options.lossy_text_encoding)?);

		Ok(bytes)
	}
}

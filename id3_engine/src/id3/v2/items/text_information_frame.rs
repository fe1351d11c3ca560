use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for_version, read_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::util::text::{TextDecoder, TextEncoding};

/// An `ID3v2` text frame
///
/// Multiple values are separated by null characters, ex. `"Foo\0Bar"`. Only ID3v2.4 officially allows
/// multiple values, but they are read and written for every version.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextInformationFrame {
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The text itself
	pub value: String,
}

impl TextInformationFrame {
	/// Create a new [`TextInformationFrame`]
	pub fn new(encoding: TextEncoding, value: impl Into<String>) -> Self {
		Self {
			encoding,
			value: value.into(),
		}
	}

	/// Iterate over the null separated values
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::TextEncoding;
	/// use id3_engine::id3::v2::TextInformationFrame;
	///
	/// let frame = TextInformationFrame::new(TextEncoding::UTF8, "Foo\0Bar");
	/// assert_eq!(frame.values().collect::<Vec<_>>(), ["Foo", "Bar"]);
	/// ```
	pub fn values(&self) -> impl Iterator<Item = &str> {
		self.value.split('\0')
	}

	/// Read a [`TextInformationFrame`] from a slice
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
		let value = TextDecoder::new(encoding).read_to_end(content)?;

		Ok(Self { encoding, value })
	}

	/// Convert a [`TextInformationFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for_version(self.encoding, version);

		let mut content = encoding.encode(&self.value, false, write_options.lossy_text_encoding)?;
		content.insert(0, encoding as u8);
		Ok(content)
	}
}

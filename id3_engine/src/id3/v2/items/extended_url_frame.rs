use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for_version, read_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::util::text::{TextDecoder, TextEncoding};

/// An extended `ID3v2` URL frame (`WXXX`/`WXX`)
///
/// The description is encoded with [`ExtendedUrlFrame::encoding`], the URL itself is
/// always Latin-1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedUrlFrame {
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: String,
	/// The URL
	pub content: String,
}

impl ExtendedUrlFrame {
	/// Create a new [`ExtendedUrlFrame`]
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

	/// Read an [`ExtendedUrlFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the text
	pub fn parse(mut content: &[u8], version: Id3v2Version) -> Result<Self> {
		let encoding = read_encoding(&mut content, version)?;

		let description = TextDecoder::new(encoding).read_terminated(&mut content)?;
		let url = TextDecoder::new(TextEncoding::Latin1).read_to_end(content)?;

		Ok(Self {
			encoding,
			description,
			content: url,
		})
	}

	/// Convert an [`ExtendedUrlFrame`] to a byte vec
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
		bytes.extend(TextEncoding::Latin1.encode(
			&self.content,
			false,
			write_options.lossy_text_encoding,
		)?);

		Ok(bytes)
	}
}

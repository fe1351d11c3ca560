use crate::config::WriteOptions;
use crate::error::Result;
use crate::util::text::{TextDecoder, TextEncoding};

/// An `ID3v2` URL frame (`W***`, except `WXXX`)
///
/// The URL is always Latin-1 and there is no encoding byte.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UrlLinkFrame {
	/// The URL
	pub url: String,
}

impl UrlLinkFrame {
	/// Create a new [`UrlLinkFrame`]
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: url.into() }
	}

	/// Read a [`UrlLinkFrame`] from a slice
	///
	/// # Errors
	///
	/// * Unable to decode the text as Latin-1
	pub fn parse(content: &[u8]) -> Result<Self> {
		let url = TextDecoder::new(TextEncoding::Latin1).read_to_end(content)?;
		Ok(Self { url })
	}

	/// Convert a [`UrlLinkFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * The URL cannot be encoded as Latin-1, and [`WriteOptions::lossy_text_encoding()`] is disabled
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		Ok(TextEncoding::Latin1.encode(&self.url, false, write_options.lossy_text_encoding)?)
	}
}

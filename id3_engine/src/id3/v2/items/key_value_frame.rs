use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for_version, read_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::util::text::{TextDecoder, TextEncoding};

/// An `ID3v2` key-value frame
///
/// This is used in the following frames:
///
/// * `TIPL` (Involved people list, ID3v2.4)
/// * `TMCL` (Musician credits list, ID3v2.4)
/// * `IPLS` (Involved people list, ID3v2.3)
/// * `IPL` (Involved people list, ID3v2.2)
///
/// On disk, keys and values alternate, each separated by a null terminator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyValueFrame {
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The key value pairs. Keys can be specified multiple times
	pub key_value_pairs: Vec<(String, String)>,
}

impl KeyValueFrame {
	/// Create a new [`KeyValueFrame`]
	pub fn new(encoding: TextEncoding, key_value_pairs: Vec<(String, String)>) -> Self {
		Self {
			encoding,
			key_value_pairs,
		}
	}

	/// Append the pairs of `other` to this frame
	pub fn merge(&mut self, other: &Self) {
		self.key_value_pairs
			.extend(other.key_value_pairs.iter().cloned());
	}

	/// The pairs joined into a single null separated string
	pub fn text(&self) -> String {
		let mut text = String::new();
		for (i, (key, value)) in self.key_value_pairs.iter().enumerate() {
			if i > 0 {
				text.push('\0');
			}

			text.push_str(key);
			text.push('\0');
			text.push_str(value);
		}

		text
	}

	/// Read a [`KeyValueFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// A key without a value gets an empty value.
	///
	/// # Errors
	///
	/// * Unable to decode the text
	pub fn parse(mut content: &[u8], version: Id3v2Version) -> Result<Self> {
		let encoding = read_encoding(&mut content, version)?;

		let mut decoder = TextDecoder::new(encoding);
		let mut key_value_pairs = Vec::new();
		while !content.is_empty() {
			let key = decoder.read_terminated(&mut content)?;
			let value = decoder.read_terminated(&mut content)?;

			if key.is_empty() && value.is_empty() {
				continue;
			}

			key_value_pairs.push((key, value));
		}

		Ok(Self {
			encoding,
			key_value_pairs,
		})
	}

	/// Convert a [`KeyValueFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for_version(self.encoding, version);

		let mut content = vec![encoding as u8];
		for (key, value) in &self.key_value_pairs {
			content.append(&mut encoding.encode(key, true, write_options.lossy_text_encoding)?);
			content.append(&mut encoding.encode(value, true, write_options.lossy_text_encoding)?);
		}

		Ok(content)
	}
}

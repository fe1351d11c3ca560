use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::{id3v2_err, parse_mode_choice};
use crate::util::text::{TextDecoder, TextEncoding};

/// An `ID3v2` unique file identifier frame (`UFID`/`UFI`)
///
/// The owner is the discriminator: a second frame with the same owner replaces the first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UniqueFileIdentifierFrame {
	/// The non-empty owner of the identifier
	pub owner: String,
	/// The binary payload (up to 64 bytes)
	pub identifier: Vec<u8>,
}

impl UniqueFileIdentifierFrame {
	/// Create a new [`UniqueFileIdentifierFrame`]
	pub fn new(owner: impl Into<String>, identifier: Vec<u8>) -> Self {
		Self {
			owner: owner.into(),
			identifier,
		}
	}

	/// Read a [`UniqueFileIdentifierFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * The owner is empty, and `parse_mode` is [`ParsingMode::Strict`]
	pub fn parse(mut content: &[u8], parse_mode: ParsingMode) -> Result<Self> {
		let owner = TextDecoder::new(TextEncoding::Latin1).read_terminated(&mut content)?;

		if owner.is_empty() {
			parse_mode_choice!(
				parse_mode,
				STRICT: return Err(id3v2_err!(MissingUfidOwner)),
				DEFAULT: log::warn!("UFID frame has an empty owner")
			);
		}

		Ok(Self {
			owner,
			identifier: content.to_vec(),
		})
	}

	/// Convert a [`UniqueFileIdentifierFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * The owner is empty
	/// * The owner cannot be encoded as Latin-1
	pub fn as_bytes(&self) -> Result<Vec<u8>> {
		if self.owner.is_empty() {
			return Err(id3v2_err!(MissingUfidOwner));
		}

		let mut bytes = TextEncoding::Latin1.encode(&self.owner, true, false)?;
		bytes.extend_from_slice(&self.identifier);

		Ok(bytes)
	}
}

/// An `ID3v2` frame whose content is kept as opaque bytes
///
/// This is used for binary frames such as `MCDI`, and for any frame this crate has no
/// dedicated body for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryFrame {
	/// The raw frame content
	pub data: Vec<u8>,
}

impl BinaryFrame {
	/// Create a new [`BinaryFrame`]
	pub fn new(data: Vec<u8>) -> Self {
		Self { data }
	}

	/// Read a [`BinaryFrame`], copying the entire content
	pub fn parse(content: &[u8]) -> Self {
		Self {
			data: content.to_vec(),
		}
	}

	/// The raw frame content
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}
}

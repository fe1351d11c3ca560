use crate::error::Result;
use crate::macros::id3v2_err;
use crate::util::text::{TextDecoder, TextEncoding};

/// An `ID3v2` popularimeter frame (`POPM`/`POP`)
///
/// The email is the discriminator: a second frame for the same email replaces the first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PopularimeterFrame {
	/// An email address of the user performing the rating
	pub email: String,
	/// A rating of 1-255, where 0 is unknown
	pub rating: u8,
	/// A play counter for the user
	///
	/// This is stored in at least 4 bytes, growing as needed.
	pub counter: u64,
}

impl PopularimeterFrame {
	/// Create a new [`PopularimeterFrame`]
	pub fn new(email: impl Into<String>, rating: u8, counter: u64) -> Self {
		Self {
			email: email.into(),
			rating,
			counter,
		}
	}

	/// Read a [`PopularimeterFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * There is no rating byte
	pub fn parse(mut content: &[u8]) -> Result<Self> {
		let email = TextDecoder::new(TextEncoding::Latin1).read_terminated(&mut content)?;

		let Some((rating, counter_bytes)) = content.split_first() else {
			return Err(id3v2_err!(BadFrameLength));
		};

		// Counters wider than 8 bytes keep only the lowest 64 bits
		let counter = counter_bytes
			.iter()
			.fold(0_u64, |counter, b| (counter << 8) | u64::from(*b));

		Ok(Self {
			email,
			rating: *rating,
			counter,
		})
	}

	/// Convert a [`PopularimeterFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * The email cannot be encoded as Latin-1
	pub fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut content = TextEncoding::Latin1.encode(&self.email, true, false)?;
		content.push(self.rating);

		let counter = self.counter.to_be_bytes();
		let significant = counter.iter().position(|b| *b != 0).unwrap_or(counter.len());
		content.extend_from_slice(&counter[significant.min(4)..]);

		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use crate::id3::v2::PopularimeterFrame;

	#[test_log::test]
	fn counter_minimum_width() {
		let frame = PopularimeterFrame::new("foo@bar.com", 196, 65535);
		let bytes = frame.as_bytes().unwrap();

		assert_eq!(&bytes[bytes.len() - 5..], [196, 0, 0, 0xFF, 0xFF]);
		assert_eq!(PopularimeterFrame::parse(&bytes).unwrap(), frame);
	}

	#[test_log::test]
	fn counter_grows() {
		let frame = PopularimeterFrame::new("", 1, 0x01_0000_0000);
		let bytes = frame.as_bytes().unwrap();

		assert_eq!(bytes, [0, 1, 0x01, 0, 0, 0, 0]);
		assert_eq!(PopularimeterFrame::parse(&bytes).unwrap(), frame);
	}

	#[test_log::test]
	fn missing_counter() {
		let frame = PopularimeterFrame::parse(b"a@b\0\x05").unwrap();
		assert_eq!(frame.rating, 5);
		assert_eq!(frame.counter, 0);

		assert!(PopularimeterFrame::parse(b"a@b\0").is_err());
	}
}

//! Utilities for working with unsynchronized ID3v2 content
//!
//! Unsynchronisation prevents false MPEG sync signals from appearing within tag data. A `0x00`
//! is inserted after every `0xFF` that is followed by a byte `>= 0xE0` or by `0x00`, as well as
//! after a trailing `0xFF`. Reading reverses this by dropping every `0x00` that follows a `0xFF`.

use crate::error::Result;

/// Whether `content` contains a byte sequence that must be escaped
///
/// # Examples
///
/// ```rust
/// use id3_engine::id3::v2::util::synchsafe::requires_unsynchronisation;
///
/// assert!(requires_unsynchronisation(&[0xFF, 0xE0]));
/// assert!(requires_unsynchronisation(&[0x01, 0xFF]));
/// assert!(!requires_unsynchronisation(&[0xFF, 0x1A]));
/// ```
pub fn requires_unsynchronisation(content: &[u8]) -> bool {
	content
		.iter()
		.enumerate()
		.any(|(i, b)| *b == 0xFF && needs_escape(content.get(i + 1).copied()))
}

/// Apply the unsynchronisation scheme to `content`
///
/// # Examples
///
/// ```rust
/// use id3_engine::id3::v2::util::synchsafe::unsynchronise;
///
/// let content = [0xFF, 0xE0, 0x1A, 0xFF, 0x00, 0xFF];
/// assert_eq!(
/// 	unsynchronise(&content),
/// 	[0xFF, 0x00, 0xE0, 0x1A, 0xFF, 0x00, 0x00, 0xFF, 0x00]
/// );
/// ```
pub fn unsynchronise(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len() + content.len() / 8);

	for (i, b) in content.iter().enumerate() {
		out.push(*b);

		if *b == 0xFF && needs_escape(content.get(i + 1).copied()) {
			out.push(0);
		}
	}

	out
}

/// Reverse the unsynchronisation scheme
///
/// # Examples
///
/// ```rust
/// use id3_engine::id3::v2::util::synchsafe::resynchronise;
///
/// // The content has two `0xFF 0x00` pairs, which will be removed
/// let content = [0xFF, 0x00, 0x1A, 0xFF, 0x00, 0x15];
///
/// // All null bytes following `0xFF` have been removed
/// assert_eq!(resynchronise(&content), [0xFF, 0x1A, 0xFF, 0x15]);
/// ```
pub fn resynchronise(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len());

	let mut encountered_ff = false;
	for b in content {
		if encountered_ff {
			encountered_ff = false;

			// Only skip the byte if this is valid unsynchronization
			if *b == 0 {
				continue;
			}
		}

		out.push(*b);
		encountered_ff = *b == 0xFF;
	}

	out
}

fn needs_escape(next: Option<u8>) -> bool {
	match next {
		Some(next) => next >= 0xE0 || next == 0,
		None => true,
	}
}

/// An integer that can be converted to and from synchsafe variants
pub trait SynchsafeInteger: Sized {
	/// The integer type that this can be widened to for use in [`SynchsafeInteger::widening_synch`]
	type WideningType;

	/// Create a synchsafe integer
	///
	/// # Errors
	///
	/// `self` doesn't fit in <`INTEGER_TYPE::BITS - size_of::<INTEGER_TYPE>()`> bits
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// // Maximum value we can represent in a synchsafe u32
	/// let unsynch_number = 0xFFF_FFFF_u32;
	/// let synch_number = unsynch_number.synch()?;
	///
	/// // Each byte should have 7 set bits and an MSB of 0
	/// assert_eq!(synch_number, 0b01111111_01111111_01111111_01111111_u32);
	/// # Ok(()) }
	/// ```
	fn synch(self) -> Result<Self>;

	/// Create a synchsafe integer, widening to the next available integer type
	///
	/// This is how the 35 bit ID3v2.4 CRC is stored.
	fn widening_synch(self) -> Self::WideningType;

	/// Unsynchronise a synchsafe integer
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let unsynch_number = 0xFFF_FFFF_u32;
	/// let synch_number = unsynch_number.synch()?;
	///
	/// let re_unsynch_number = synch_number.unsynch();
	/// assert_eq!(re_unsynch_number, unsynch_number);
	/// # Ok(()) }
	/// ```
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	type WideningType = u64;

	fn synch(self) -> Result<Self> {
		// 7 bits are available per byte
		const MAXIMUM_INTEGER: u32 = 0x0FFF_FFFF;

		if self > MAXIMUM_INTEGER {
			crate::macros::err!(TooMuchData);
		}

		let n = self;
		Ok((n & 0x7F)
			| ((n & (0x7F << 7)) << 1)
			| ((n & (0x7F << 14)) << 2)
			| ((n & (0x7F << 21)) << 3))
	}

	fn widening_synch(self) -> Self::WideningType {
		let n = u64::from(self);

		(0..5).fold(0, |w, group| w | ((n >> (7 * group)) & 0x7F) << (8 * group))
	}

	fn unsynch(self) -> Self {
		let u = self;
		((u & 0x7F00_0000) >> 3) | ((u & 0x7F_0000) >> 2) | ((u & 0x7F00) >> 1) | (u & 0x7F)
	}
}

/// Read a synchsafe integer of 5 bytes, as used for the ID3v2.4 extended header CRC
pub(crate) fn unsynch_u35(bytes: [u8; 5]) -> u32 {
	let value = bytes
		.iter()
		.fold(0_u64, |acc, b| (acc << 7) | u64::from(b & 0x7F));

	// Only 32 bits are meaningful
	(value & u64::from(u32::MAX)) as u32
}

/// Whether every byte of a 4 byte size has its high bit unset
pub(crate) fn is_synchsafe(bytes: [u8; 4]) -> bool {
	bytes.iter().all(|b| (b & 0x80) == 0)
}

#[cfg(test)]
mod tests {
	use crate::id3::v2::util::synchsafe::{
		SynchsafeInteger, requires_unsynchronisation, resynchronise, unsynch_u35, unsynchronise,
	};

	const UNSYNCHRONIZED_CONTENT: &[u8] =
		&[0xFF, 0x00, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00, 0x00];
	const EXPECTED: &[u8] = &[0xFF, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00];

	#[test_log::test]
	fn resynchronise_content() {
		assert_eq!(resynchronise(UNSYNCHRONIZED_CONTENT), EXPECTED);
		assert_eq!(
			resynchronise(&UNSYNCHRONIZED_CONTENT.repeat(1000)),
			EXPECTED.repeat(1000)
		);
	}

	#[test_log::test]
	fn resynchronise_should_not_replace_unrelated() {
		const ORIGINAL_CONTENT: &[u8] = &[0xFF, 0x1A, 0xFF, 0xC0, 0x10, 0x01];

		assert_eq!(resynchronise(ORIGINAL_CONTENT), ORIGINAL_CONTENT);
	}

	#[test_log::test]
	fn unsynchronise_content() {
		assert_eq!(unsynchronise(EXPECTED), UNSYNCHRONIZED_CONTENT);

		// Bytes below 0xE0 don't form a sync signal
		assert_eq!(unsynchronise(&[0xFF, 0xDF]), [0xFF, 0xDF]);
		assert_eq!(unsynchronise(&[0xFF, 0xE0]), [0xFF, 0x00, 0xE0]);
	}

	#[test_log::test]
	fn unsynchronisation_is_involutive() {
		const INTERESTING: [u8; 6] = [0x00, 0x01, 0x7F, 0xDF, 0xE0, 0xFF];

		let mut sequences: Vec<Vec<u8>> = vec![Vec::new()];
		let mut previous: Vec<Vec<u8>> = vec![Vec::new()];
		for _ in 0..4 {
			let next = previous
				.iter()
				.flat_map(|seq| {
					INTERESTING.iter().map(move |b| {
						let mut s = seq.clone();
						s.push(*b);
						s
					})
				})
				.collect::<Vec<_>>();

			sequences.extend(next.iter().cloned());
			previous = next;
		}

		for seq in sequences {
			let encoded = unsynchronise(&seq);
			assert_eq!(resynchronise(&encoded), seq, "{seq:02X?}");

			for pair in encoded.windows(2) {
				assert!(
					!(pair[0] == 0xFF && pair[1] >= 0xE0),
					"raw sync signal in {encoded:02X?}"
				);
			}
		}
	}

	#[test_log::test]
	fn trailing_ff_requires_unsynchronisation() {
		assert!(requires_unsynchronisation(&[0x00, 0xFF]));
		assert!(requires_unsynchronisation(&[0xFF, 0x00]));
		assert!(!requires_unsynchronisation(&[0xFF, 0x01, 0x02]));
		assert!(!requires_unsynchronisation(&[]));
	}

	#[test_log::test]
	fn crc_widening() {
		let crc = 0xFFFF_FFFF_u32;
		let widened = crc.widening_synch();

		assert_eq!(widened, 0x0F_7F_7F_7F_7F);
		assert_eq!(unsynch_u35([0x0F, 0x7F, 0x7F, 0x7F, 0x7F]), crc);
	}

	macro_rules! synchsafe_integer_tests {
		(
			$($name:ident => {
				synch: $original:literal, $new:literal;
				unsynch: $original_unsync:literal, $new_unsynch:literal;
			});+
		) => {
			$(
				paste::paste! {
					#[test_log::test]
					fn [<$name _synch>]() {
						assert_eq!($original.synch().unwrap(), $new);
					}

					#[test_log::test]
					fn [<$name _unsynch>]() {
						assert_eq!($original_unsync.unsynch(), $new_unsynch);
					}
				}
			)+
		};
	}

	synchsafe_integer_tests! {
		small => {
			synch:   0x7F_u32, 0x7F_u32;
			unsynch: 0x7F_u32, 0x7F_u32;
		};
		medium => {
			synch:   0x3FFF_u32, 0x7F7F_u32;
			unsynch: 0x7F7F_u32, 0x3FFF_u32;
		};
		max => {
			synch:   0xFFF_FFFF_u32, 0x7F7F_7F7F_u32;
			unsynch: 0x7F7F_7F7F_u32, 0xFFF_FFFF_u32;
		}
	}

	#[test_log::test]
	fn synch_too_large() {
		assert!(0x1000_0000_u32.synch().is_err());
	}
}

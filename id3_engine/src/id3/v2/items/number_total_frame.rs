use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::items::TextInformationFrame;
use crate::util::text::TextEncoding;

/// A number/total pair sharing one text frame (ex. `TRCK` "3/12")
///
/// Both components are optional and independently settable. A missing number
/// is written as `0` when a total is present.
///
/// A pair read from text (ex. "03/12") is written back as it was read, until
/// either component changes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NumberTotalFrame {
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The number (ex. track number)
	pub number: Option<u32>,
	/// The total (ex. track total)
	pub total: Option<u32>,
	original: Option<String>,
}

impl NumberTotalFrame {
	/// Create a new [`NumberTotalFrame`]
	pub fn new(encoding: TextEncoding, number: Option<u32>, total: Option<u32>) -> Self {
		Self {
			encoding,
			number,
			total,
			original: None,
		}
	}

	/// Attempt to interpret a text frame as a number/total pair
	///
	/// Returns `None` if the text isn't of the form `N`, `N/T` or `/T`.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::TextEncoding;
	/// use id3_engine::id3::v2::{NumberTotalFrame, TextInformationFrame};
	///
	/// let text = TextInformationFrame::new(TextEncoding::Latin1, "3/12");
	/// let frame = NumberTotalFrame::from_text(&text).unwrap();
	///
	/// assert_eq!(frame.number, Some(3));
	/// assert_eq!(frame.total, Some(12));
	///
	/// let text = TextInformationFrame::new(TextEncoding::Latin1, "Side A");
	/// assert!(NumberTotalFrame::from_text(&text).is_none());
	/// ```
	pub fn from_text(text: &TextInformationFrame) -> Option<Self> {
		let value = text.value.trim_matches(|c: char| c.is_whitespace() || c == '\0');
		let (number, total) = parse_components(value)?;

		Some(Self {
			encoding: text.encoding,
			number,
			total,
			original: Some(value.to_owned()),
		})
	}

	/// Whether neither component is set
	pub fn is_empty(&self) -> bool {
		self.number.is_none() && self.total.is_none()
	}

	/// Update only the components that are set in `other`
	pub fn merge(&mut self, other: &Self) {
		if other.number.is_some() {
			self.number = other.number;
		}

		if other.total.is_some() {
			self.total = other.total;
		}
	}

	/// The text form of the pair
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::TextEncoding;
	/// use id3_engine::id3::v2::NumberTotalFrame;
	///
	/// assert_eq!(NumberTotalFrame::new(TextEncoding::UTF8, Some(3), None).text(), "3");
	/// assert_eq!(NumberTotalFrame::new(TextEncoding::UTF8, Some(3), Some(12)).text(), "3/12");
	/// assert_eq!(NumberTotalFrame::new(TextEncoding::UTF8, None, Some(12)).text(), "0/12");
	/// ```
	pub fn text(&self) -> String {
		if let Some(original) = &self.original {
			if parse_components(original) == Some((self.number, self.total)) {
				return original.clone();
			}
		}

		match (self.number, self.total) {
			(number, Some(total)) => format!("{}/{total}", number.unwrap_or(0)),
			(Some(number), None) => number.to_string(),
			(None, None) => String::new(),
		}
	}

	/// Convert a [`NumberTotalFrame`] to a byte vec
	///
	/// # Errors
	///
	/// See [`TextInformationFrame::as_bytes`]
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		TextInformationFrame::new(self.encoding, self.text()).as_bytes(version, write_options)
	}
}

// `0` is treated as unset
fn parse_components(value: &str) -> Option<(Option<u32>, Option<u32>)> {
	let (number, total) = match value.split_once('/') {
		Some((number, total)) => (number.trim(), Some(total.trim())),
		None => (value, None),
	};

	let parse = |component: &str| -> Option<Option<u32>> {
		if component.is_empty() {
			return Some(None);
		}

		component
			.parse::<u32>()
			.ok()
			.map(|n| if n == 0 { None } else { Some(n) })
	};

	let total = match total {
		Some(total) => parse(total)?,
		None => None,
	};

	Some((parse(number)?, total))
}

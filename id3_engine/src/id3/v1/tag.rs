use crate::config::{ParsingMode, WriteOptions};
use crate::error::Result;
use crate::id3::v1::constants::{GENRES, genre_index};
use crate::id3::v2::{FieldKey, Id3v2Tag};

use std::io::Write;

macro_rules! impl_accessor {
	($($name:ident,)+) => {
		paste::paste! {
			$(
				#[doc = "Returns the " $name ", if set"]
				pub fn $name(&self) -> Option<&str> {
					self.$name.as_deref()
				}

				#[doc = "Sets the " $name]
				pub fn [<set_ $name>](&mut self, value: String) {
					self.$name = Some(value)
				}

				#[doc = "Removes the " $name]
				pub fn [<remove_ $name>](&mut self) {
					self.$name = None
				}
			)+
		}
	}
}

/// ID3v1 is a severely limited format, with each field
/// being incredibly small in size. All fields have been
/// commented with their maximum sizes and any other additional
/// restrictions.
///
/// Attempting to write a field greater than the maximum size
/// will **not** error, it will just be shrunk.
///
/// ## Conversions
///
/// ### From `Id3v2Tag`
///
/// The title, artist, album, year, comment, track number, and genre are taken from
/// the equivalent generic [`FieldKey`]s. The genre is only kept if it names an entry in [`GENRES`].
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Id3v1Tag {
	/// Track title, 30 bytes max
	pub title: Option<String>,
	/// Track artist, 30 bytes max
	pub artist: Option<String>,
	/// Album title, 30 bytes max
	pub album: Option<String>,
	/// Release year (max 9999)
	pub year: Option<u16>,
	/// A short comment
	///
	/// The number of bytes differs between versions, but not much.
	/// A V1 tag may have been read, which limits this field to 30 bytes.
	/// A V1.1 tag, however, only has 28 bytes available.
	///
	/// A V1.1 tag is *always* written.
	pub comment: Option<String>,
	/// The track number, 1 byte max
	///
	/// Issues:
	///
	/// * The track number **cannot** be 0. Readers look for a null byte at the end
	///   of the comment to differentiate between V1 and V1.1.
	/// * A V1 tag may have been read, which does *not* have a track number.
	pub track_number: Option<u8>,
	/// The track's genre, 1 byte max
	///
	/// ID3v1 has a predefined set of genres, see [`GENRES`].
	/// This byte should be an index to a genre.
	pub genre: Option<u8>,
}

impl Id3v1Tag {
	/// The size of an ID3v1 tag, in bytes
	pub const SIZE: usize = 128;

	/// Create a new empty `Id3v1Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v1::Id3v1Tag;
	///
	/// let id3v1_tag = Id3v1Tag::new();
	/// assert!(id3v1_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse an ID3v1 tag from the final 128 bytes of `data`
	///
	/// Returns `Ok(None)` if `data` is too short, or doesn't end in an ID3v1 tag.
	///
	/// # Errors
	///
	/// * `parsing_mode` is [`ParsingMode::Strict`], and the year is malformed
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::ParsingMode;
	/// use id3_engine::id3::v1::Id3v1Tag;
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let mut tag = Id3v1Tag::new();
	/// tag.set_title(String::from("Foo title"));
	///
	/// let mut file = vec![0xFF; 64];
	/// file.extend(tag.to_bytes(Default::default())?);
	///
	/// let read = Id3v1Tag::read_from_trailer(&file, ParsingMode::BestAttempt)?;
	/// assert_eq!(read, Some(tag));
	/// # Ok(()) }
	/// ```
	pub fn read_from_trailer(data: &[u8], parsing_mode: ParsingMode) -> Result<Option<Self>> {
		log::debug!("Searching for an ID3v1 tag");

		let Some(start) = data.len().checked_sub(Self::SIZE) else {
			return Ok(None);
		};

		let mut trailer = [0; Self::SIZE];
		trailer.copy_from_slice(&data[start..]);

		if trailer[..3] != super::constants::ID3V1_TAG_MARKER {
			return Ok(None);
		}

		log::debug!("Found an ID3v1 tag, parsing");
		Self::parse(trailer, parsing_mode).map(Some)
	}

	/// Whether every field is empty
	pub fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.artist.is_none()
			&& self.album.is_none()
			&& self.year.is_none()
			&& self.comment.is_none()
			&& self.track_number.is_none()
			&& self.genre.is_none()
	}

	impl_accessor!(title, artist, album,);

	/// Returns the comment, if set
	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	/// Sets the comment, truncated to the 28 bytes available in a V1.1 tag
	pub fn set_comment(&mut self, value: String) {
		let mut resized = String::with_capacity(28);
		for c in value.chars() {
			if resized.len() + c.len_utf8() > 28 {
				break;
			}

			resized.push(c);
		}

		self.comment = Some(resized);
	}

	/// Removes the comment
	pub fn remove_comment(&mut self) {
		self.comment = None;
	}

	/// Returns the genre name, if the genre byte is a valid index into [`GENRES`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v1::Id3v1Tag;
	///
	/// let mut tag = Id3v1Tag::new();
	/// tag.genre = Some(17);
	///
	/// assert_eq!(tag.genre_name(), Some("Rock"));
	/// ```
	pub fn genre_name(&self) -> Option<&'static str> {
		self.genre.and_then(|g| GENRES.get(usize::from(g)).copied())
	}

	/// Sets the genre by name
	///
	/// If `genre` doesn't name an entry in [`GENRES`], the genre is left untouched.
	pub fn set_genre(&mut self, genre: &str) {
		if let Some(index) = genre_index(genre) {
			self.genre = Some(index);
		}
	}

	/// Encode the tag into its 128 byte form
	///
	/// # Errors
	///
	/// * A field can't be represented in Latin-1, and [`WriteOptions::lossy_text_encoding`] is not set
	pub fn to_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		super::write::encode(self, write_options)
	}

	/// Write the tag to `writer`
	///
	/// # Errors
	///
	/// * See [`Id3v1Tag::to_bytes`]
	/// * `writer` fails to write
	pub fn write_to<W: Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()> {
		let bytes = self.to_bytes(write_options)?;
		writer.write_all(&bytes)?;

		Ok(())
	}
}

impl From<&Id3v2Tag> for Id3v1Tag {
	fn from(input: &Id3v2Tag) -> Self {
		let text = |key: FieldKey| input.get_first(key).ok().flatten();

		let mut tag = Self {
			title: text(FieldKey::Title),
			artist: text(FieldKey::Artist),
			album: text(FieldKey::Album),
			year: text(FieldKey::Year)
				.and_then(|year| year.get(..4).and_then(|y| y.parse::<u16>().ok())),
			comment: None,
			track_number: text(FieldKey::Track)
				.and_then(|track| track.parse::<u8>().ok())
				.filter(|track| *track != 0),
			genre: text(FieldKey::Genre).and_then(|genre| genre_index(&genre)),
		};

		if let Some(comment) = text(FieldKey::Comment) {
			tag.set_comment(comment);
		}

		tag
	}
}

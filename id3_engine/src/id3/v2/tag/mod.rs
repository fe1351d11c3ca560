mod artwork;
mod genres;
mod keys;
mod read;
#[cfg(test)]
mod tests;

pub use artwork::Artwork;
pub use keys::{FieldKey, FrameAndSubId};

use genres::{GenresIter, format_genre};

use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v1::{GENRES, Id3v1Tag};
use crate::id3::v2::convert::{convert_frame, merge_date, split_date};
use crate::id3::v2::frame::{
	BodyShape, Frame, FrameBody, FrameFlags, FrameId, body_shape, preferred_encoding,
};
use crate::id3::v2::header::{Id3v2TagFlags, Id3v2Version};
use crate::id3::v2::items::{
	ExtendedTextFrame, ExtendedUrlFrame, KeyValueFrame, LanguageFrame, NumberTotalFrame,
	PopularimeterFrame, TextInformationFrame, UniqueFileIdentifierFrame, UrlLinkFrame,
};
use crate::id3::v2::registry;
use crate::macros::{err, id3v2_err};
use crate::util::text::TextEncoding;

use std::collections::BTreeMap;

/// The ID of the field holding an ID3v2.3 `TYER` + `TDAT` pair
pub(crate) const YEAR_DATE_ID: &str = "TYERTDAT";

/// A single logical field made up of several frames
///
/// In ID3v2.3, the year (`TYER`) and day/month (`TDAT`) are stored in separate frames, but
/// describe a single date. When both are present in a tag, they are grouped into an
/// `AggregatedFrame`.
///
/// # Examples
///
/// ```rust
/// use id3_engine::id3::v2::{Field, FieldKey, Id3v2Tag, Id3v2Version};
///
/// # fn main() -> id3_engine::error::Result<()> {
/// let mut tag = Id3v2Tag::new(Id3v2Version::V3);
/// tag.set(FieldKey::Year, "2001-03-15")?;
///
/// let Some(Field::Aggregated(date)) = tag.fields().next() else {
/// 	unreachable!()
/// };
///
/// assert_eq!(date.id(), "TYERTDAT");
/// assert_eq!(date.content(), "20011503");
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatedFrame {
	id: &'static str,
	frames: Vec<Frame>,
}

impl AggregatedFrame {
	/// The composite ID of the field (ex. "TYERTDAT")
	pub fn id(&self) -> &str {
		self.id
	}

	/// The member frames, in the order of the composite ID
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// Get the member frame with the given ID
	pub fn get(&self, id: &str) -> Option<&Frame> {
		self.frames.iter().find(|f| f.id_str() == id)
	}

	/// The textual content of the member frames, concatenated
	pub fn content(&self) -> String {
		self.frames.iter().filter_map(Frame::content).collect()
	}

	// Returns the member that was replaced, if any
	fn replace(&mut self, frame: Frame) -> Option<Frame> {
		if let Some(existing) = self.frames.iter_mut().find(|f| f.id == frame.id) {
			return Some(std::mem::replace(existing, frame));
		}

		let id = self.id;
		self.frames.push(frame);
		self.frames.sort_by_key(|f| id.find(f.id_str()));
		None
	}
}

/// An entry in an [`Id3v2Tag`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
	/// A field backed by a single frame
	Single(Frame),
	/// A field backed by multiple frames
	Aggregated(AggregatedFrame),
}

impl Field {
	/// The frame ID, or the composite ID of an aggregate
	pub fn id(&self) -> &str {
		match self {
			Field::Single(frame) => frame.id_str(),
			Field::Aggregated(aggregate) => aggregate.id(),
		}
	}

	/// The frames backing this field
	pub fn frames(&self) -> &[Frame] {
		match self {
			Field::Single(frame) => std::slice::from_ref(frame),
			Field::Aggregated(aggregate) => aggregate.frames(),
		}
	}

	/// The textual content of the field
	///
	/// See [`FrameBody::content`] and [`AggregatedFrame::content`]
	pub fn content(&self) -> Option<String> {
		match self {
			Field::Single(frame) => frame.content(),
			Field::Aggregated(aggregate) => Some(aggregate.content()),
		}
	}

	/// Whether every frame of the field is empty
	pub fn is_empty(&self) -> bool {
		self.frames().iter().all(Frame::is_empty)
	}

	fn into_single(self) -> Option<Frame> {
		match self {
			Field::Single(frame) => Some(frame),
			Field::Aggregated(_) => None,
		}
	}
}

/// An `ID3v2` tag
///
/// ## Frames
///
/// Frames are stored by ID, in the order they were inserted. Every frame in the tag has the tag's
/// version, frames of other versions are converted as they are inserted (see [`Id3v2Tag::insert`]).
///
/// Encrypted frames can't be interpreted, and are stored separately. They are written after
/// every other frame.
///
/// ## Generic keys
///
/// Most fields can be accessed independently of the tag version through [`FieldKey`]s, see
/// [`Id3v2Tag::get_first`] and [`Id3v2Tag::set`].
///
/// ## Conversions
///
/// A tag can be converted to another version with [`Id3v2Tag::to_version`]. Nothing is
/// discarded, frames with no equivalent in the target version are kept as
/// [`FrameBody::Deprecated`] or [`FrameBody::Unsupported`].
#[derive(Clone, Debug)]
pub struct Id3v2Tag {
	version: Id3v2Version,
	flags: Id3v2TagFlags,
	fields: BTreeMap<String, Vec<Field>>,
	encrypted: BTreeMap<String, Vec<Frame>>,
	duplicate_frame_count: u32,
	duplicate_bytes: u64,
	duplicate_frame_ids: Vec<String>,
	invalid_frame_count: u32,
	empty_frame_bytes: u64,
	pub(crate) padding_size: u32,
	/// The size of the tag as read, header and footer excluded
	pub(crate) original_size: Option<u32>,
}

impl PartialEq for Id3v2Tag {
	fn eq(&self, other: &Self) -> bool {
		self.version == other.version
			&& self.flags == other.flags
			&& self.fields == other.fields
			&& self.encrypted == other.encrypted
	}
}

impl Eq for Id3v2Tag {}

impl Default for Id3v2Tag {
	fn default() -> Self {
		Self::new(Id3v2Version::V4)
	}
}

impl Id3v2Tag {
	/// Create a new empty `Id3v2Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::{Id3v2Tag, Id3v2Version};
	///
	/// let tag = Id3v2Tag::new(Id3v2Version::V3);
	/// assert!(tag.is_empty());
	/// ```
	pub fn new(version: Id3v2Version) -> Self {
		Self {
			version,
			flags: Id3v2TagFlags::default(),
			fields: BTreeMap::new(),
			encrypted: BTreeMap::new(),
			duplicate_frame_count: 0,
			duplicate_bytes: 0,
			duplicate_frame_ids: Vec::new(),
			invalid_frame_count: 0,
			empty_frame_bytes: 0,
			padding_size: 0,
			original_size: None,
		}
	}

	/// The tag's version
	pub fn version(&self) -> Id3v2Version {
		self.version
	}

	/// Returns the [`Id3v2TagFlags`]
	pub fn flags(&self) -> &Id3v2TagFlags {
		&self.flags
	}

	/// Restrict the tag's flags
	///
	/// NOTE: The footer and restrictions only exist in ID3v2.4, and are ignored otherwise.
	pub fn set_flags(&mut self, flags: Id3v2TagFlags) {
		self.flags = flags;
	}

	/// Insert a [`Frame`]
	///
	/// The frame is converted if its version differs from the tag's (see
	/// [`convert_frame`](crate::id3::v2::convert_frame)), then added according to the
	/// following rules:
	///
	/// * Encrypted frames are stored as-is
	/// * Frames with a discriminator (`TXXX`/`WXXX`/`COMM`/`USLT` description, `UFID` owner,
	///   `POPM` email) matching an existing frame are merged into it (text) or replace it
	/// * Frames that may appear multiple times are appended
	/// * `TRCK`/`TPOS` only update the components they set
	/// * Involved people lists are merged
	/// * Anything else replaces the existing frame, which is counted as a duplicate
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::{Frame, Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	///
	/// tag.insert(Frame::text("TIT2", Id3v2Version::V4, "Foo")?);
	/// tag.insert(Frame::text("TIT2", Id3v2Version::V4, "Bar")?);
	///
	/// assert_eq!(tag.frame_count(), 1);
	/// assert_eq!(tag.duplicate_frame_count(), 1);
	/// assert_eq!(tag.get("TIT2").and_then(|f| f.content()).as_deref(), Some("Bar"));
	/// # Ok(()) }
	/// ```
	pub fn insert(&mut self, frame: Frame) {
		self.insert_all(std::iter::once(frame));
	}

	/// Insert multiple frames, see [`Id3v2Tag::insert`]
	///
	/// When inserting into an ID3v2.4 tag, the ID3v2.3 `TYER`/`TDAT`/`TIME` frames are merged into a
	/// single `TDRC` frame.
	pub fn insert_all<I>(&mut self, frames: I)
	where
		I: IntoIterator<Item = Frame>,
	{
		let mut pending = PendingDate::default();

		for frame in frames {
			let staged = match (self.version, frame.version) {
				(Id3v2Version::V4, Id3v2Version::V4) => vec![frame],
				// Go through ID3v2.3 so the date can be merged
				(Id3v2Version::V4, _) => convert_to(frame, Id3v2Version::V3),
				(version, _) => convert_to(frame, version),
			};

			for frame in staged {
				if frame.version == self.version {
					self.insert_native(frame);
					continue;
				}

				if let Some(frame) = pending.stage(frame) {
					for converted in convert_to(frame, self.version) {
						self.insert_native(converted);
					}
				}
			}
		}

		for frame in pending.finish() {
			for converted in convert_to(frame, self.version) {
				self.insert_native(converted);
			}
		}
	}

	// `frame` must already be of the tag's version
	fn insert_native(&mut self, frame: Frame) {
		if frame.is_encrypted() {
			log::trace!("Storing encrypted frame `{}`", frame.id);
			self.encrypted
				.entry(frame.id_str().to_owned())
				.or_default()
				.push(frame);
			return;
		}

		if self.version == Id3v2Version::V3
			&& matches!(frame.id_str(), "TYER" | "TDAT")
			&& matches!(frame.body, FrameBody::Text(_))
		{
			self.insert_year_date(frame);
			return;
		}

		self.insert_single(frame);
	}

	fn insert_single(&mut self, frame: Frame) {
		let version = self.version;
		let entries = self.fields.entry(frame.id_str().to_owned()).or_default();

		if let Some(discarded) = merge_into(entries, frame, version) {
			self.record_duplicate(&discarded);
		}
	}

	fn insert_year_date(&mut self, frame: Frame) {
		if let Some(Field::Aggregated(aggregate)) = self
			.fields
			.get_mut(YEAR_DATE_ID)
			.and_then(|entries| entries.first_mut())
		{
			if let Some(replaced) = aggregate.replace(frame) {
				self.record_duplicate(&replaced);
			}

			return;
		}

		let partner_id = if frame.id_str() == "TYER" { "TDAT" } else { "TYER" };
		let partner = self
			.fields
			.remove(partner_id)
			.and_then(|entries| entries.into_iter().find_map(Field::into_single));

		match partner {
			Some(partner) => {
				let mut aggregate = AggregatedFrame {
					id: YEAR_DATE_ID,
					frames: vec![partner],
				};
				aggregate.replace(frame);

				self.push_field(Field::Aggregated(aggregate));
			},
			None => self.insert_single(frame),
		}
	}

	fn push_field(&mut self, field: Field) {
		self.fields
			.entry(field.id().to_owned())
			.or_default()
			.push(field);
	}

	fn record_duplicate(&mut self, frame: &Frame) {
		let size = frame
			.encoded_size(WriteOptions::default())
			.unwrap_or_default();
		log::warn!("Discarding duplicate `{}` frame ({size} bytes)", frame.id);

		self.duplicate_frame_count += 1;
		self.duplicate_bytes += size as u64;
		self.duplicate_frame_ids.push(frame.id_str().to_owned());
	}

	/// Get the first frame with the given ID
	///
	/// This includes the members of [`AggregatedFrame`]s, but not encrypted frames.
	pub fn get(&self, id: &str) -> Option<&Frame> {
		self.frames().find(|f| f.id_str() == id)
	}

	/// Get every frame with the given ID
	pub fn get_frames<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Frame> + 'a {
		self.frames().filter(move |f| f.id_str() == id)
	}

	/// Every frame in the tag, excluding encrypted frames
	///
	/// The members of [`AggregatedFrame`]s are yielded individually.
	pub fn frames(&self) -> impl Iterator<Item = &Frame> {
		self.fields().flat_map(Field::frames)
	}

	/// Every encrypted frame in the tag
	pub fn encrypted_frames(&self) -> impl Iterator<Item = &Frame> {
		self.encrypted.values().flatten()
	}

	/// Every field in the tag, ordered by ID
	pub fn fields(&self) -> impl Iterator<Item = &Field> {
		self.fields.values().flatten()
	}

	/// Remove every frame with the given ID, including encrypted frames
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::{FieldKey, Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	/// tag.set(FieldKey::Title, "Foo")?;
	///
	/// let removed = tag.remove("TIT2");
	/// assert_eq!(removed.len(), 1);
	/// assert!(tag.is_empty());
	/// # Ok(()) }
	/// ```
	pub fn remove(&mut self, id: &str) -> Vec<Frame> {
		self.retain_frames(|f| f.id_str() != id)
	}

	/// Retain the frames that match the predicate, including encrypted frames
	///
	/// Removing a member of an [`AggregatedFrame`] leaves the other members in place.
	pub fn retain<P>(&mut self, predicate: P)
	where
		P: FnMut(&Frame) -> bool,
	{
		let _ = self.retain_frames(predicate);
	}

	// Returns the removed frames
	fn retain_frames<P>(&mut self, mut predicate: P) -> Vec<Frame>
	where
		P: FnMut(&Frame) -> bool,
	{
		let mut removed = Vec::new();

		for frames in self.encrypted.values_mut() {
			let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(frames)
				.into_iter()
				.partition(|f| predicate(f));
			*frames = kept;
			removed.extend(dropped);
		}
		self.encrypted.retain(|_, frames| !frames.is_empty());

		for field in std::mem::take(&mut self.fields).into_values().flatten() {
			match field {
				Field::Single(frame) => {
					if predicate(&frame) {
						self.push_field(Field::Single(frame));
					} else {
						removed.push(frame);
					}
				},
				Field::Aggregated(AggregatedFrame { id, frames }) => {
					let (mut kept, dropped): (Vec<_>, Vec<_>) =
						frames.into_iter().partition(|f| predicate(f));
					removed.extend(dropped);

					match kept.len() {
						0 => {},
						1 => {
							if let Some(frame) = kept.pop() {
								self.push_field(Field::Single(frame));
							}
						},
						_ => self.push_field(Field::Aggregated(AggregatedFrame { id, frames: kept })),
					}
				},
			}
		}

		removed
	}

	/// Whether the tag has no frames
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty() && self.encrypted.is_empty()
	}

	/// The number of fields in the tag, encrypted frames included
	///
	/// An [`AggregatedFrame`] counts as a single field.
	pub fn field_count(&self) -> usize {
		self.fields().count() + self.encrypted_frames().count()
	}

	/// The number of frames in the tag, encrypted frames included
	pub fn frame_count(&self) -> usize {
		self.frames().count() + self.encrypted_frames().count()
	}

	/// The number of frames discarded because a frame with the same ID replaced them
	pub fn duplicate_frame_count(&self) -> u32 {
		self.duplicate_frame_count
	}

	/// The total size of the discarded duplicate frames, headers included
	pub fn duplicate_bytes(&self) -> u64 {
		self.duplicate_bytes
	}

	/// The IDs of the discarded duplicate frames, in the order they were discarded
	pub fn duplicate_frame_ids(&self) -> &[String] {
		&self.duplicate_frame_ids
	}

	/// The number of frames skipped while reading because they couldn't be parsed
	pub fn invalid_frame_count(&self) -> u32 {
		self.invalid_frame_count
	}

	/// The number of bytes occupied by zero length frames while reading, headers included
	pub fn empty_frame_bytes(&self) -> u64 {
		self.empty_frame_bytes
	}

	/// The number of padding bytes following the frames of the tag as read
	pub fn padding_size(&self) -> u32 {
		self.padding_size
	}

	/// Create a copy of the tag in another version
	///
	/// Every frame goes through [`convert_frame`](crate::id3::v2::convert_frame). The source
	/// tag is left untouched.
	///
	/// Encrypted frames can't be represented in ID3v2.2, and are dropped when converting to it.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::{FieldKey, Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	/// tag.set(FieldKey::Title, "Foo")?;
	///
	/// let v2_tag = tag.to_version(Id3v2Version::V2);
	/// assert_eq!(v2_tag.get("TT2").and_then(|f| f.content()).as_deref(), Some("Foo"));
	/// # Ok(()) }
	/// ```
	pub fn to_version(&self, version: Id3v2Version) -> Self {
		let mut tag = Self::new(version);

		tag.flags = self.flags;
		if version != Id3v2Version::V4 {
			tag.flags.footer = false;
			tag.flags.restrictions = None;
		}

		if version == Id3v2Version::V2 {
			tag.flags.crc = false;
			tag.flags.experimental = false;
		}

		tag.insert_all(self.frames().cloned());

		if version == Id3v2Version::V2 {
			for frame in self.encrypted_frames() {
				log::warn!("Dropping encrypted frame `{}`, ID3v2.2 has no encryption", frame.id);
			}
		} else {
			tag.insert_all(self.encrypted_frames().cloned());
		}

		tag
	}

	/// Create a tag from an [`Id3v1Tag`]
	///
	/// # Errors
	///
	/// This only fails if a field can't be set, see [`Id3v2Tag::set`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v1::Id3v1Tag;
	/// use id3_engine::id3::v2::{FieldKey, Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let mut v1_tag = Id3v1Tag::new();
	/// v1_tag.title = Some(String::from("Foo"));
	/// v1_tag.genre = Some(17);
	///
	/// let tag = Id3v2Tag::from_v1(&v1_tag, Id3v2Version::V3)?;
	/// assert_eq!(tag.get_first(FieldKey::Title)?.as_deref(), Some("Foo"));
	/// assert_eq!(tag.get_first(FieldKey::Genre)?.as_deref(), Some("Rock"));
	/// # Ok(()) }
	/// ```
	pub fn from_v1(v1: &Id3v1Tag, version: Id3v2Version) -> Result<Self> {
		let mut tag = Self::new(version);

		let text_fields = [
			(FieldKey::Title, v1.title.as_deref()),
			(FieldKey::Artist, v1.artist.as_deref()),
			(FieldKey::Album, v1.album.as_deref()),
			(FieldKey::Comment, v1.comment.as_deref()),
		];

		for (key, value) in text_fields {
			if let Some(value) = value.filter(|v| !v.is_empty()) {
				tag.set(key, value)?;
			}
		}

		if let Some(year) = v1.year {
			tag.set(FieldKey::Year, &year.to_string())?;
		}

		if let Some(track) = v1.track_number {
			tag.set(FieldKey::Track, &track.to_string())?;
		}

		if let Some(genre) = v1.genre.and_then(|g| GENRES.get(usize::from(g))) {
			tag.set(FieldKey::Genre, genre)?;
		}

		Ok(tag)
	}

	/// Remove the frames that should be discarded when the audio of the file changes
	///
	/// This removes every frame the [registry](crate::id3::v2::registry::is_discard_if_file_altered)
	/// marks as such (ex. `TLEN`), and every frame with
	/// [`FrameFlags::file_alter_preservation`] set.
	pub fn prepare_for_file_alteration(&mut self) {
		let version = self.version;
		let removed = self.retain_frames(|f| {
			!f.flags.file_alter_preservation
				&& !registry::is_discard_if_file_altered(version, f.id_str())
		});

		for frame in removed {
			log::debug!("Discarding `{}` due to file alteration", frame.id);
		}
	}
}

// Generic key access
impl Id3v2Tag {
	/// Get the first value of a field
	///
	/// # Errors
	///
	/// `key` has no frame in the tag's version, see [`FrameAndSubId::for_key`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::{FieldKey, Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	/// tag.set(FieldKey::Artist, "Foo")?;
	/// tag.add(FieldKey::Artist, "Bar")?;
	///
	/// assert_eq!(tag.get_first(FieldKey::Artist)?.as_deref(), Some("Foo"));
	/// assert_eq!(tag.get_all(FieldKey::Artist)?, ["Foo", "Bar"]);
	/// # Ok(()) }
	/// ```
	pub fn get_first(&self, key: FieldKey) -> Result<Option<String>> {
		let target = FrameAndSubId::for_key(key, self.version)?;
		Ok(self.get_all_by(&target).into_iter().next())
	}

	/// Get every value of a field
	///
	/// # Errors
	///
	/// `key` has no frame in the tag's version, see [`FrameAndSubId::for_key`]
	pub fn get_all(&self, key: FieldKey) -> Result<Vec<String>> {
		let target = FrameAndSubId::for_key(key, self.version)?;
		Ok(self.get_all_by(&target))
	}

	/// Get every value of a resolved field, see [`FrameAndSubId::parse`]
	pub fn get_all_by(&self, target: &FrameAndSubId) -> Vec<String> {
		if target.generic_key == Some(FieldKey::Year) {
			if let Some((year_id, date_id, time_id)) = date_ids(self.version) {
				return self.split_year(year_id, date_id, time_id).into_iter().collect();
			}
		}

		let mut values = Vec::new();
		for frame in self.matching_frames(target) {
			values.extend(frame_values(frame, target.generic_key));
		}

		values
	}

	fn split_year(&self, year_id: &str, date_id: &str, time_id: &str) -> Option<String> {
		let content = |id: &str| self.get(id).and_then(Frame::content);

		let year = content(year_id)?;
		let date = content(date_id);
		let time = content(time_id);

		Some(merge_date(&year, date.as_deref(), time.as_deref()))
	}

	/// Whether the tag has a value for a field
	///
	/// Keys with no frame in the tag's version are never present.
	pub fn has_field(&self, key: FieldKey) -> bool {
		FrameAndSubId::for_key(key, self.version)
			.is_ok_and(|target| !self.get_all_by(&target).is_empty())
	}

	/// Replace the value of a field
	///
	/// For the components of `TRCK`/`TPOS` (ex. [`FieldKey::Track`] and
	/// [`FieldKey::TrackTotal`]), only the specified component is replaced.
	///
	/// # Errors
	///
	/// * `key` has no frame in the tag's version, see [`FrameAndSubId::for_key`]
	/// * `value` is not valid for the field (ex. a non-numeric [`FieldKey::TrackTotal`])
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::{FieldKey, Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	/// tag.set(FieldKey::Track, "3")?;
	/// tag.set(FieldKey::TrackTotal, "12")?;
	///
	/// assert_eq!(tag.get("TRCK").and_then(|f| f.content()).as_deref(), Some("3/12"));
	/// # Ok(()) }
	/// ```
	pub fn set(&mut self, key: FieldKey, value: &str) -> Result<()> {
		let target = FrameAndSubId::for_key(key, self.version)?;
		self.set_by(&target, value)
	}

	/// Replace the value of a resolved field, see [`Id3v2Tag::set`]
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::set`]
	pub fn set_by(&mut self, target: &FrameAndSubId, value: &str) -> Result<()> {
		match target.generic_key {
			Some(FieldKey::Year) => {
				if let Some((year_id, date_id, time_id)) = date_ids(self.version) {
					return self.set_year(year_id, date_id, time_id, value);
				}
			},
			Some(FieldKey::Track | FieldKey::Disc) => {
				return self.set_component(target, value, Component::Number);
			},
			Some(FieldKey::TrackTotal | FieldKey::DiscTotal) => {
				return self.set_component(target, value, Component::Total);
			},
			Some(FieldKey::Genre) => {
				let genre = format_genre(value, self.version);
				let frame = self.build_frame(target, &genre)?;
				self.replace_matching(target, frame);
				return Ok(());
			},
			_ => {},
		}

		let frame = self.build_frame(target, value)?;
		self.replace_matching(target, frame);
		Ok(())
	}

	fn replace_matching(&mut self, target: &FrameAndSubId, frame: Frame) {
		let _ = self.retain_frames(|f| !matches_target(f, target));
		self.insert_native(frame);
	}

	fn set_year(
		&mut self,
		year_id: &str,
		date_id: &str,
		time_id: &str,
		value: &str,
	) -> Result<()> {
		let is_date_frame = |f: &Frame| [year_id, date_id, time_id].contains(&f.id_str());
		if value.trim().is_empty() {
			let _ = self.retain_frames(|f| !is_date_frame(f));
			return Ok(());
		}

		let Some(parts) = split_date(value) else {
			err!(TextDecode("Expected a date starting with a numeric year"));
		};

		let mut frames = vec![Frame::text(year_id, self.version, parts.year)?];
		if let Some(date) = parts.date {
			frames.push(Frame::text(date_id, self.version, date)?);
		}

		if let Some(time) = parts.time {
			frames.push(Frame::text(time_id, self.version, time)?);
		}

		let _ = self.retain_frames(|f| !is_date_frame(f));
		for frame in frames {
			self.insert_native(frame);
		}

		Ok(())
	}

	fn set_component(
		&mut self,
		target: &FrameAndSubId,
		value: &str,
		component: Component,
	) -> Result<()> {
		let value = value.trim();

		let number = match value.parse::<u32>() {
			Ok(number) => number,
			// A complete "N/T" pair, or a non-numeric track
			Err(_) if component == Component::Number => {
				let frame = Frame::text(&target.frame_id, self.version, value)?;
				self.replace_matching(target, frame);
				return Ok(());
			},
			Err(_) => err!(TextDecode("Expected a numeric total")),
		};

		let number = (number != 0).then_some(number);
		let mut update = self
			.number_total(&target.frame_id)
			.cloned()
			.unwrap_or_else(|| NumberTotalFrame::new(TextEncoding::Latin1, None, None));

		match component {
			Component::Number => update.number = number,
			Component::Total => update.total = number,
		}

		let _ = self.remove(&target.frame_id);
		if !update.is_empty() {
			self.insert_native(Frame::from_parts(
				FrameId(target.frame_id.clone()),
				self.version,
				FrameFlags::default(),
				FrameBody::NumberTotal(update),
			));
		}

		Ok(())
	}

	fn number_total<'a>(&'a self, id: &'a str) -> Option<&'a NumberTotalFrame> {
		self.get_frames(id).find_map(|f| match f.body() {
			FrameBody::NumberTotal(number_total) => Some(number_total),
			_ => None,
		})
	}

	/// Add a value to a field
	///
	/// Text frames get an additional null separated value, frames that may appear multiple times
	/// get an additional frame.
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::set`]
	pub fn add(&mut self, key: FieldKey, value: &str) -> Result<()> {
		let target = FrameAndSubId::for_key(key, self.version)?;
		self.add_by(&target, value)
	}

	/// Add a value to a resolved field, see [`Id3v2Tag::add`]
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::set`]
	pub fn add_by(&mut self, target: &FrameAndSubId, value: &str) -> Result<()> {
		let value = match target.generic_key {
			// Single valued
			Some(
				FieldKey::Year
				| FieldKey::Track
				| FieldKey::TrackTotal
				| FieldKey::Disc
				| FieldKey::DiscTotal,
			) => return self.set_by(target, value),
			Some(FieldKey::Genre) => format_genre(value, self.version).into_owned(),
			_ => value.to_owned(),
		};

		let version = self.version;
		let existing = self
			.fields
			.get_mut(&target.frame_id)
			.into_iter()
			.flatten()
			.filter_map(|field| match field {
				Field::Single(frame) => Some(frame),
				Field::Aggregated(_) => None,
			})
			.find(|f| matches_target(f, target) && matches!(f.body, FrameBody::Text(_)));

		if let Some(Frame {
			body: FrameBody::Text(text),
			..
		}) = existing
		{
			let is_reference = |s: &str| s.starts_with('(') && s.ends_with(')');
			let concatenate = version != Id3v2Version::V4
				&& target.generic_key == Some(FieldKey::Genre)
				&& is_reference(&text.value)
				&& is_reference(&value);

			if !concatenate && !text.value.is_empty() {
				text.value.push('\0');
			}

			if text.encoding == TextEncoding::Latin1 && !TextEncoding::verify_latin1(&value) {
				text.encoding = preferred_encoding(Id3v2Version::V3, &value);
			}

			text.value.push_str(&value);
			return Ok(());
		}

		let frame = self.build_frame(target, &value)?;
		self.insert_native(frame);
		Ok(())
	}

	/// Delete a field
	///
	/// For the components of `TRCK`/`TPOS`, only the specified component is removed.
	///
	/// # Errors
	///
	/// `key` has no frame in the tag's version, see [`FrameAndSubId::for_key`]
	pub fn delete(&mut self, key: FieldKey) -> Result<()> {
		let target = FrameAndSubId::for_key(key, self.version)?;
		self.delete_by(&target);
		Ok(())
	}

	/// Delete a resolved field, see [`Id3v2Tag::delete`]
	pub fn delete_by(&mut self, target: &FrameAndSubId) {
		let component = match target.generic_key {
			Some(FieldKey::Year) => {
				if let Some((year_id, date_id, time_id)) = date_ids(self.version) {
					let _ = self.retain_frames(|f| ![year_id, date_id, time_id].contains(&f.id_str()));
					return;
				}

				None
			},
			Some(FieldKey::Track | FieldKey::Disc) => Some(Component::Number),
			Some(FieldKey::TrackTotal | FieldKey::DiscTotal) => Some(Component::Total),
			_ => None,
		};

		if let Some(component) = component {
			if let Some(mut number_total) = self.number_total(&target.frame_id).cloned() {
				match component {
					Component::Number => number_total.number = None,
					Component::Total => number_total.total = None,
				}

				let _ = self.remove(&target.frame_id);
				if !number_total.is_empty() {
					self.insert_native(Frame::from_parts(
						FrameId(target.frame_id.clone()),
						self.version,
						FrameFlags::default(),
						FrameBody::NumberTotal(number_total),
					));
				}

				return;
			}

			// A text total doesn't exist, only the number can be removed
			if component == Component::Total {
				return;
			}
		}

		let _ = self.retain_frames(|f| !matches_target(f, target));
	}

	fn matching_frames<'a>(
		&'a self,
		target: &'a FrameAndSubId,
	) -> impl Iterator<Item = &'a Frame> + 'a {
		self.get_frames(&target.frame_id)
			.filter(move |f| matches_target(f, target))
	}

	fn build_frame(&self, target: &FrameAndSubId, value: &str) -> Result<Frame> {
		let version = self.version;
		let id = target.frame_id.as_str();
		let description = target.sub_id.clone().unwrap_or_default();
		let encoding = preferred_encoding(version, &[description.as_str(), value].concat());

		let body = match body_shape(id) {
			BodyShape::Text | BodyShape::NumberTotal => return Frame::text(id, version, value),
			BodyShape::UserText => {
				FrameBody::UserText(ExtendedTextFrame::new(encoding, description, value))
			},
			BodyShape::UserUrl => {
				FrameBody::UserUrl(ExtendedUrlFrame::new(encoding, description, value))
			},
			BodyShape::Url => FrameBody::Url(UrlLinkFrame::new(value)),
			BodyShape::Language => FrameBody::Language(LanguageFrame::new(
				encoding,
				LanguageFrame::UNKNOWN_LANGUAGE,
				description,
				value,
			)),
			BodyShape::UniqueFileIdentifier => FrameBody::UniqueFileIdentifier(
				UniqueFileIdentifierFrame::new(description, value.as_bytes().to_vec()),
			),
			BodyShape::Popularimeter => {
				let Ok(rating) = value.trim().parse::<u8>() else {
					err!(TextDecode("Expected a rating between 0 and 255"));
				};

				FrameBody::Popularimeter(PopularimeterFrame::new(description, rating, 0))
			},
			BodyShape::KeyValue => {
				let values = value.split('\0').collect::<Vec<_>>();
				let pairs = values
					.chunks(2)
					.map(|pair| {
						(
							pair[0].to_owned(),
							pair.get(1).copied().unwrap_or_default().to_owned(),
						)
					})
					.collect();

				FrameBody::KeyValue(KeyValueFrame::new(encoding, pairs))
			},
			BodyShape::Picture | BodyShape::Binary => {
				return Err(id3v2_err!(BadFrame(id.to_owned(), "Text")));
			},
		};

		Frame::new(id, version, FrameFlags::default(), body)
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Component {
	Number,
	Total,
}

/// The IDs making up a date in versions without `TDRC`
fn date_ids(version: Id3v2Version) -> Option<(&'static str, &'static str, &'static str)> {
	match version {
		Id3v2Version::V2 => Some(("TYE", "TDA", "TIM")),
		Id3v2Version::V3 => Some(("TYER", "TDAT", "TIME")),
		Id3v2Version::V4 => None,
	}
}

fn convert_to(frame: Frame, version: Id3v2Version) -> Vec<Frame> {
	if frame.version == version {
		return vec![frame];
	}

	convert_frame(&frame, version)
}

fn matches_target(frame: &Frame, target: &FrameAndSubId) -> bool {
	if frame.id_str() != target.frame_id {
		return false;
	}

	let Some(sub_id) = target.sub_id.as_deref() else {
		return true;
	};

	match frame.body() {
		FrameBody::UserText(f) => f.description == sub_id,
		FrameBody::UserUrl(f) => f.description == sub_id,
		FrameBody::Language(f) => f.description == sub_id,
		FrameBody::UniqueFileIdentifier(f) => f.owner == sub_id,
		FrameBody::Popularimeter(f) => f.email == sub_id,
		_ => true,
	}
}

fn frame_values(frame: &Frame, key: Option<FieldKey>) -> Vec<String> {
	match (key, frame.body()) {
		(Some(FieldKey::Track | FieldKey::Disc), FrameBody::NumberTotal(number_total)) => {
			number_total.number.map(|n| n.to_string()).into_iter().collect()
		},
		(Some(FieldKey::TrackTotal | FieldKey::DiscTotal), FrameBody::NumberTotal(number_total)) => {
			number_total.total.map(|n| n.to_string()).into_iter().collect()
		},
		(Some(FieldKey::TrackTotal | FieldKey::DiscTotal), _) => Vec::new(),
		(Some(FieldKey::Genre), FrameBody::Text(text)) => {
			GenresIter::new(&text.value).map(str::to_owned).collect()
		},
		(_, body) => body
			.content()
			.map(|content| {
				content
					.split('\0')
					.filter(|v| !v.is_empty())
					.map(str::to_owned)
					.collect()
			})
			.unwrap_or_default(),
	}
}

fn same_discriminator(existing: &FrameBody, new: &FrameBody) -> bool {
	match (existing, new) {
		(FrameBody::UserText(a), FrameBody::UserText(b)) => a.description == b.description,
		(FrameBody::UserUrl(a), FrameBody::UserUrl(b)) => a.description == b.description,
		(FrameBody::Language(a), FrameBody::Language(b)) => {
			a.description == b.description && a.language == b.language
		},
		(FrameBody::UniqueFileIdentifier(a), FrameBody::UniqueFileIdentifier(b)) => {
			a.owner == b.owner
		},
		(FrameBody::Popularimeter(a), FrameBody::Popularimeter(b)) => a.email == b.email,
		_ => false,
	}
}

fn has_discriminator(body: &FrameBody) -> bool {
	matches!(
		body,
		FrameBody::UserText(_)
			| FrameBody::UserUrl(_)
			| FrameBody::Language(_)
			| FrameBody::UniqueFileIdentifier(_)
			| FrameBody::Popularimeter(_)
	)
}

// Add `frame` to the entries of its ID, returning the frame that was discarded, if any
fn merge_into(entries: &mut Vec<Field>, frame: Frame, version: Id3v2Version) -> Option<Frame> {
	let mut singles = entries.iter_mut().filter_map(|field| match field {
		Field::Single(frame) => Some(frame),
		Field::Aggregated(_) => None,
	});

	if has_discriminator(&frame.body) {
		let Some(existing) = singles.find(|existing| same_discriminator(&existing.body, &frame.body))
		else {
			entries.push(Field::Single(frame));
			return None;
		};

		match (&mut existing.body, &frame.body) {
			(FrameBody::UserText(existing), FrameBody::UserText(new)) => {
				existing.push_value(&new.content);
				return None;
			},
			(FrameBody::Language(existing), FrameBody::Language(new)) => {
				existing.push_value(&new.content);
				return None;
			},
			_ => {},
		}

		return Some(std::mem::replace(existing, frame));
	}

	if registry::is_multiple_allowed(version, frame.id_str()) {
		entries.push(Field::Single(frame));
		return None;
	}

	let Some(existing) = singles.next() else {
		entries.push(Field::Single(frame));
		return None;
	};

	match (&mut existing.body, &frame.body) {
		(FrameBody::NumberTotal(existing), FrameBody::NumberTotal(new)) => {
			existing.merge(new);
			return None;
		},
		(FrameBody::KeyValue(existing), FrameBody::KeyValue(new)) => {
			existing.merge(new);
			return None;
		},
		_ => {},
	}

	// Keep the existing content
	if frame.is_empty() {
		return Some(frame);
	}

	Some(std::mem::replace(existing, frame))
}

/// ID3v2.3 date frames, merged into `TDRC` when inserted into an ID3v2.4 tag
#[derive(Default)]
struct PendingDate {
	year: Option<Frame>,
	date: Option<Frame>,
	time: Option<Frame>,
}

impl PendingDate {
	// Returns the frame if it isn't part of a date
	fn stage(&mut self, frame: Frame) -> Option<Frame> {
		if frame.version != Id3v2Version::V3 || !matches!(frame.body, FrameBody::Text(_)) {
			return Some(frame);
		}

		let slot = match frame.id_str() {
			"TYER" => &mut self.year,
			"TDAT" => &mut self.date,
			"TIME" => &mut self.time,
			_ => return Some(frame),
		};

		// A repeated part is converted on its own
		if slot.is_some() {
			return Some(frame);
		}

		*slot = Some(frame);
		None
	}

	// Frames to convert individually
	fn finish(self) -> Vec<Frame> {
		let Some(year) = self.year else {
			return self.date.into_iter().chain(self.time).collect();
		};

		let FrameBody::Text(year_text) = &year.body else {
			return std::iter::once(year)
				.chain(self.date)
				.chain(self.time)
				.collect();
		};

		let date = self.date.as_ref().and_then(Frame::content);
		let time = self.time.as_ref().and_then(Frame::content);
		let timestamp = merge_date(&year_text.value, date.as_deref(), time.as_deref());

		let mut encoding = year_text.encoding;
		if encoding == TextEncoding::Latin1 && !TextEncoding::verify_latin1(&timestamp) {
			encoding = TextEncoding::UTF16;
		}

		vec![Frame::from_parts(
			FrameId(String::from("TDRC")),
			Id3v2Version::V4,
			year.flags,
			FrameBody::Text(TextInformationFrame::new(encoding, timestamp)),
		)]
	}
}

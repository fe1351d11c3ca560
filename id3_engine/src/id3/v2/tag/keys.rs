use crate::error::{ErrorKind, Id3Error, Result};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::registry;

// This is used to create the generic key -> frame ID maps
//
// Each entry is a `FieldKey` variant, its application key name, and the frame ID used in
// ID3v2.2, ID3v2.3, and ID3v2.4 respectively. An empty ID means the field can't be represented
// in that version.
//
// A frame ID may be followed by `: "..."`, which is the discriminator used to pick a single
// frame out of many (`TXXX`/`WXXX`/`COMM`/`USLT` description, `UFID` owner, `POPM` email).
// Ex. "TXXX": "MOOD"
macro_rules! key_map {
	(@SUB $sub:literal) => { Some($sub) };
	(@SUB) => { None };
	(
		$(
			$(#[$meta:meta])*
			$variant:ident, $key:literal => [
				$v2:literal $(: $v2_sub:literal)?,
				$v3:literal $(: $v3_sub:literal)?,
				$v4:literal $(: $v4_sub:literal)?
			]
		);+ $(;)?
	) => {
		/// A generic representation of a field, independent of the tag version
		///
		/// See [`FrameAndSubId`] for how each key is resolved to a frame.
		#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
		#[non_exhaustive]
		pub enum FieldKey {
			$(
				$(#[$meta])*
				$variant,
			)+
		}

		impl FieldKey {
			/// Every key
			pub const ALL: &[Self] = &[$(Self::$variant,)+];

			/// The application key name (ex. "ALBUM_ARTIST")
			pub fn as_str(self) -> &'static str {
				match self {
					$(Self::$variant => $key,)+
				}
			}

			/// Get a key from its application key name, ignoring case
			///
			/// # Examples
			///
			/// ```rust
			/// use id3_engine::id3::v2::FieldKey;
			///
			/// assert_eq!(FieldKey::from_key("album_artist"), Some(FieldKey::AlbumArtist));
			/// assert_eq!(FieldKey::from_key("NOT_A_KEY"), None);
			/// ```
			pub fn from_key(key: &str) -> Option<Self> {
				match key {
					$(k if k.eq_ignore_ascii_case($key) => Some(Self::$variant),)+
					_ => None,
				}
			}

			fn mapping(self, version: Id3v2Version) -> (&'static str, Option<&'static str>) {
				match (self, version) {
					$(
						(Self::$variant, Id3v2Version::V2) => ($v2, key_map!(@SUB $($v2_sub)?)),
						(Self::$variant, Id3v2Version::V3) => ($v3, key_map!(@SUB $($v3_sub)?)),
						(Self::$variant, Id3v2Version::V4) => ($v4, key_map!(@SUB $($v4_sub)?)),
					)+
				}
			}
		}
	};
}

key_map! {
	/// The title
	Title, "TITLE"                                 => ["TT2", "TIT2", "TIT2"];
	/// The subtitle or description refinement
	Subtitle, "SUBTITLE"                           => ["TT3", "TIT3", "TIT3"];
	/// The content group description
	Grouping, "GROUPING"                           => ["TT1", "TIT1", "TIT1"];
	/// The lead performer
	Artist, "ARTIST"                               => ["TP1", "TPE1", "TPE1"];
	/// The album artist (band/orchestra)
	AlbumArtist, "ALBUM_ARTIST"                    => ["TP2", "TPE2", "TPE2"];
	/// The conductor
	Conductor, "CONDUCTOR"                         => ["TP3", "TPE3", "TPE3"];
	/// The remixer, or whoever otherwise modified the track
	Remixer, "REMIXER"                             => ["TP4", "TPE4", "TPE4"];
	/// The album title
	Album, "ALBUM"                                 => ["TAL", "TALB", "TALB"];
	/// The recording date
	///
	/// ID3v2.2 and ID3v2.3 store this in up to three frames (year, "DDMM" date, and "HHMM" time),
	/// which are read and written as a single "YYYY-MM-DDTHH:MM" value.
	Year, "YEAR"                                   => ["TYE", "TYER", "TDRC"];
	/// The original release date
	OriginalYear, "ORIGINAL_YEAR"                  => ["TOR", "TORY", "TDOR"];
	/// The release date (ID3v2.4 only)
	ReleaseTime, "RELEASE_TIME"                    => ["", "", "TDRL"];
	/// The encoding date (ID3v2.4 only)
	EncodingTime, "ENCODING_TIME"                  => ["", "", "TDEN"];
	/// The track number component of the track frame
	Track, "TRACK"                                 => ["TRK", "TRCK", "TRCK"];
	/// The track total component of the track frame
	TrackTotal, "TRACK_TOTAL"                      => ["TRK", "TRCK", "TRCK"];
	/// The disc number component of the part of set frame
	Disc, "DISC"                                   => ["TPA", "TPOS", "TPOS"];
	/// The disc total component of the part of set frame
	DiscTotal, "DISC_TOTAL"                        => ["TPA", "TPOS", "TPOS"];
	/// The content type
	///
	/// Genres are read by name, including ID3v1 genre references ("(17)" -> "Rock").
	Genre, "GENRE"                                 => ["TCO", "TCON", "TCON"];
	/// The comment without a description
	Comment, "COMMENT"                             => ["COM": "", "COMM": "", "COMM": ""];
	/// The unsynchronised lyrics without a description
	Lyrics, "LYRICS"                               => ["ULT": "", "USLT": "", "USLT": ""];
	/// The composer
	Composer, "COMPOSER"                           => ["TCM", "TCOM", "TCOM"];
	/// The lyricist
	Lyricist, "LYRICIST"                           => ["TXT", "TEXT", "TEXT"];
	/// Beats per minute
	Bpm, "BPM"                                     => ["TBP", "TBPM", "TBPM"];
	/// The initial musical key
	InitialKey, "INITIAL_KEY"                      => ["TKE", "TKEY", "TKEY"];
	/// The languages of the audio
	Language, "LANGUAGE"                           => ["TLA", "TLAN", "TLAN"];
	/// The copyright message
	Copyright, "COPYRIGHT"                         => ["TCR", "TCOP", "TCOP"];
	/// The publisher
	Publisher, "PUBLISHER"                         => ["TPB", "TPUB", "TPUB"];
	/// The person or organisation that encoded the audio
	EncodedBy, "ENCODED_BY"                        => ["TEN", "TENC", "TENC"];
	/// The software or hardware settings used to encode the audio
	EncoderSettings, "ENCODER_SETTINGS"            => ["TSS", "TSSE", "TSSE"];
	/// The International Standard Recording Code
	Isrc, "ISRC"                                   => ["TRC", "TSRC", "TSRC"];
	/// The mood
	///
	/// ID3v2.2 and ID3v2.3 have no dedicated frame, this is stored in a user defined text frame.
	Mood, "MOOD"                                   => ["TXX": "MOOD", "TXXX": "MOOD", "TMOO"];
	/// Whether the track is part of a compilation
	Compilation, "COMPILATION"                     => ["TCP", "TCMP", "TCMP"];
	/// The title sort order
	TitleSort, "TITLE_SORT"                        => ["TST", "TSOT", "TSOT"];
	/// The artist sort order
	ArtistSort, "ARTIST_SORT"                      => ["TSP", "TSOP", "TSOP"];
	/// The album sort order
	AlbumSort, "ALBUM_SORT"                        => ["TSA", "TSOA", "TSOA"];
	/// The album artist sort order
	AlbumArtistSort, "ALBUM_ARTIST_SORT"           => ["TS2", "TSO2", "TSO2"];
	/// The composer sort order
	ComposerSort, "COMPOSER_SORT"                  => ["TSC", "TSOC", "TSOC"];
	/// Involved people, as null separated role/name pairs
	InvolvedPeople, "INVOLVED_PEOPLE"              => ["IPL", "IPLS", "TIPL"];
	/// Musician credits, as null separated instrument/name pairs
	///
	/// ID3v2.2 and ID3v2.3 have no dedicated frame, these are stored with the involved people.
	MusicianCredits, "MUSICIAN_CREDITS"            => ["IPL", "IPLS", "TMCL"];
	/// The MusicBrainz recording ID, stored as a unique file identifier
	MusicBrainzTrackId, "MUSICBRAINZ_TRACK_ID"     => [
		"UFI": "http://musicbrainz.org",
		"UFID": "http://musicbrainz.org",
		"UFID": "http://musicbrainz.org"
	];
	/// The MusicBrainz artist ID
	MusicBrainzArtistId, "MUSICBRAINZ_ARTIST_ID"   => [
		"TXX": "MusicBrainz Artist Id",
		"TXXX": "MusicBrainz Artist Id",
		"TXXX": "MusicBrainz Artist Id"
	];
	/// The MusicBrainz release ID
	MusicBrainzReleaseId, "MUSICBRAINZ_RELEASE_ID" => [
		"TXX": "MusicBrainz Album Id",
		"TXXX": "MusicBrainz Album Id",
		"TXXX": "MusicBrainz Album Id"
	];
	/// The rating byte of the popularimeter (0-255)
	Rating, "RATING"                               => ["POP": "", "POPM": "", "POPM": ""];
	/// The official artist webpage
	ArtistUrl, "ARTIST_URL"                        => ["WAR", "WOAR", "WOAR"];
	/// The official audio file webpage
	AudioFileUrl, "AUDIO_FILE_URL"                 => ["WAF", "WOAF", "WOAF"];
	/// The copyright/legal information webpage
	CopyrightUrl, "COPYRIGHT_URL"                  => ["WCP", "WCOP", "WCOP"];
	/// A user defined URL without a description
	Url, "URL"                                     => ["WXX": "", "WXXX": "", "WXXX": ""];
}

impl std::fmt::Display for FieldKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A generic key resolved to a frame ID and discriminator
///
/// The discriminator (`sub_id`) selects a single frame out of the frames sharing an ID:
///
/// * `TXXX`/`WXXX`: the description
/// * `COMM`/`USLT`: the description (any language)
/// * `UFID`: the owner
/// * `POPM`: the email
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameAndSubId {
	/// The generic key, if the ID was resolved from one
	pub generic_key: Option<FieldKey>,
	/// The frame ID in the tag's version
	pub frame_id: String,
	/// The discriminator
	pub sub_id: Option<String>,
}

impl FrameAndSubId {
	/// Resolve a generic key for `version`
	///
	/// # Errors
	///
	/// `key` has no frame in `version`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::{FieldKey, FrameAndSubId, Id3v2Version};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let mood = FrameAndSubId::for_key(FieldKey::Mood, Id3v2Version::V3)?;
	/// assert_eq!(mood.frame_id, "TXXX");
	/// assert_eq!(mood.sub_id.as_deref(), Some("MOOD"));
	///
	/// assert!(FrameAndSubId::for_key(FieldKey::ReleaseTime, Id3v2Version::V3).is_err());
	/// # Ok(()) }
	/// ```
	pub fn for_key(key: FieldKey, version: Id3v2Version) -> Result<Self> {
		let (frame_id, sub_id) = key.mapping(version);
		if frame_id.is_empty() {
			return Err(Id3Error::new(ErrorKind::KeyNotFound(key.as_str().to_owned())));
		}

		Ok(Self {
			generic_key: Some(key),
			frame_id: frame_id.to_owned(),
			sub_id: sub_id.map(str::to_owned),
		})
	}

	/// Parse an application key of the form `KEY[:SUB]`
	///
	/// `KEY` is either a [`FieldKey`] name or a frame ID known in `version`. `SUB` replaces the
	/// key's discriminator, and may be written as `name=value` (ex. "COMMENT:description=xyz").
	///
	/// # Errors
	///
	/// `KEY` is neither a generic key mapped in `version`, nor a known frame ID
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::{FieldKey, FrameAndSubId, Id3v2Version};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let comment = FrameAndSubId::parse("COMMENT:description=xyz", Id3v2Version::V4)?;
	/// assert_eq!(comment.generic_key, Some(FieldKey::Comment));
	/// assert_eq!(comment.frame_id, "COMM");
	/// assert_eq!(comment.sub_id.as_deref(), Some("xyz"));
	///
	/// let user_text = FrameAndSubId::parse("TXXX:REPLAYGAIN_TRACK_GAIN", Id3v2Version::V3)?;
	/// assert_eq!(user_text.generic_key, None);
	/// assert_eq!(user_text.sub_id.as_deref(), Some("REPLAYGAIN_TRACK_GAIN"));
	/// # Ok(()) }
	/// ```
	pub fn parse(key: &str, version: Id3v2Version) -> Result<Self> {
		let (key, sub_id) = match key.split_once(':') {
			Some((key, sub)) => {
				let sub = sub.split_once('=').map_or(sub, |(_, value)| value);
				(key, Some(sub.to_owned()))
			},
			None => (key, None),
		};

		let mut resolved = match FieldKey::from_key(key) {
			Some(field_key) => Self::for_key(field_key, version)?,
			None if key.len() == version.id_len() && registry::is_supported(version, key) => {
				Self {
					generic_key: None,
					frame_id: key.to_owned(),
					sub_id: None,
				}
			},
			None => return Err(Id3Error::new(ErrorKind::KeyNotFound(key.to_owned()))),
		};

		if sub_id.is_some() {
			resolved.sub_id = sub_id;
		}

		Ok(resolved)
	}
}

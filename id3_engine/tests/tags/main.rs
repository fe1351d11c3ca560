#![allow(missing_docs)]

mod conversions;
mod id3v1;
mod round_trip;

use id3_engine::id3::v2::{Artwork, FieldKey, FrameAndSubId, Id3v2Tag, Id3v2Version, PictureType};

/// A tag using most of the frame shapes
pub(crate) fn full_tag(version: Id3v2Version) -> Id3v2Tag {
	let mut tag = Id3v2Tag::new(version);

	tag.set(FieldKey::Title, "Foo title").unwrap();
	tag.set(FieldKey::Artist, "Bar artist").unwrap();
	tag.add(FieldKey::Artist, "Baz artist").unwrap();
	tag.set(FieldKey::Album, "Qux album ünïcödé ✓").unwrap();
	tag.set(FieldKey::Year, "1984-06-01").unwrap();
	tag.set(FieldKey::Track, "1").unwrap();
	tag.set(FieldKey::TrackTotal, "12").unwrap();
	tag.set(FieldKey::Genre, "Classical").unwrap();
	tag.set(FieldKey::Comment, "Quux comment").unwrap();
	tag.set(FieldKey::Lyrics, "Foo lyrics").unwrap();
	tag.set(FieldKey::Mood, "Calm").unwrap();
	tag.set(FieldKey::Rating, "196").unwrap();
	tag.set(FieldKey::Url, "https://example.com").unwrap();
	tag.set(FieldKey::MusicBrainzTrackId, "0b5a8c61-7ec1-4b0c-9ab0-f5ae8a3e1b43")
		.unwrap();

	let replay_gain = FrameAndSubId::parse("TXXX:REPLAYGAIN_TRACK_GAIN", version)
		.or_else(|_| FrameAndSubId::parse("TXX:REPLAYGAIN_TRACK_GAIN", version))
		.unwrap();
	tag.set_by(&replay_gain, "-6.00 dB").unwrap();

	// Contains a false sync
	let artwork = Artwork::new(
		"image/png",
		PictureType::CoverFront,
		vec![0x89, b'P', b'N', b'G', 0xFF, 0xE0, 0x00, 0xFF],
	);
	tag.set_artwork(&artwork).unwrap();

	tag
}

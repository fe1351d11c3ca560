// Tests for version conversions

use crate::full_tag;

use id3_engine::TextEncoding;
use id3_engine::config::WriteOptions;
use id3_engine::id3::v2::{
	Field, FieldKey, Frame, FrameBody, FrameFlags, Id3v2Tag, Id3v2Version, LanguageFrame,
	TextInformationFrame,
};

#[test_log::test]
fn v3_to_v4_to_v3() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.insert(
		Frame::new(
			"TIT2",
			Id3v2Version::V3,
			FrameFlags::default(),
			FrameBody::Text(TextInformationFrame::new(TextEncoding::UTF16, "Foo ✓")),
		)
		.unwrap(),
	);
	tag.insert(
		Frame::new(
			"COMM",
			Id3v2Version::V3,
			FrameFlags::default(),
			FrameBody::Language(LanguageFrame::new(
				TextEncoding::Latin1,
				*b"eng",
				"",
				"Bar comment",
			)),
		)
		.unwrap(),
	);
	tag.set(FieldKey::Mood, "Calm").unwrap();

	let v4_tag = tag.to_version(Id3v2Version::V4);
	assert!(v4_tag.get("TMOO").is_some());

	let v3_tag = v4_tag.to_version(Id3v2Version::V3);
	assert_eq!(v3_tag, tag);
}

#[test_log::test]
fn recording_time() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.set(FieldKey::Year, "2001-03-15").unwrap();

	let v3_tag = tag.to_version(Id3v2Version::V3);
	let fields = v3_tag.fields().collect::<Vec<_>>();
	assert_eq!(fields.len(), 1);

	let Field::Aggregated(date) = fields[0] else {
		panic!("Expected the date to be aggregated");
	};
	assert_eq!(date.get("TYER").and_then(Frame::content).as_deref(), Some("2001"));
	assert_eq!(date.get("TDAT").and_then(Frame::content).as_deref(), Some("1503"));

	let v4_tag = v3_tag.to_version(Id3v2Version::V4);
	assert_eq!(
		v4_tag.get("TDRC").and_then(Frame::content).as_deref(),
		Some("2001-03-15")
	);
}

#[test_log::test]
fn through_every_version() {
	let tag = full_tag(Id3v2Version::V4);

	let converted = tag
		.to_version(Id3v2Version::V3)
		.to_version(Id3v2Version::V2)
		.to_version(Id3v2Version::V3)
		.to_version(Id3v2Version::V4);

	for key in [
		FieldKey::Title,
		FieldKey::Artist,
		FieldKey::Album,
		FieldKey::Year,
		FieldKey::Track,
		FieldKey::TrackTotal,
		FieldKey::Genre,
		FieldKey::Comment,
		FieldKey::Lyrics,
		FieldKey::Mood,
		FieldKey::Rating,
		FieldKey::Url,
		FieldKey::MusicBrainzTrackId,
	] {
		assert_eq!(converted.get_all(key).unwrap(), tag.get_all(key).unwrap(), "{key}");
	}

	assert_eq!(converted.first_artwork(), tag.first_artwork());
}

#[test_log::test]
fn converted_tag_is_writable() {
	for from in Id3v2Version::ALL {
		for to in Id3v2Version::ALL {
			let tag = full_tag(from).to_version(to);

			let written = tag.to_bytes(WriteOptions::default()).unwrap();
			assert_eq!(written[3], to.major(), "{from} -> {to}");

			let read = Id3v2Tag::parse(&written, Default::default()).unwrap();
			assert_eq!(read.frame_count(), tag.frame_count(), "{from} -> {to}");
		}
	}
}

#[test_log::test]
fn deprecated_frames() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.set(FieldKey::ReleaseTime, "2001-03-15").unwrap();

	// No equivalent in ID3v2.3
	let v3_tag = tag.to_version(Id3v2Version::V3);
	assert!(matches!(
		v3_tag.get("TDRL").map(Frame::body),
		Some(FrameBody::Deprecated(_))
	));

	let with_deprecated = v3_tag.to_bytes(WriteOptions::default()).unwrap();
	let without_deprecated = v3_tag
		.to_bytes(WriteOptions::default().write_deprecated(false))
		.unwrap();
	assert!(with_deprecated.windows(4).any(|w| w == b"TDRL"));
	assert!(!without_deprecated.windows(4).any(|w| w == b"TDRL"));

	// And back
	assert_eq!(v3_tag.to_version(Id3v2Version::V4), tag);
}

use super::*;
use crate::config::{ParseOptions, ParsingMode};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::v2::{BinaryFrame, DeprecatedFrame};

fn v3_text_frame(id: &str, value: &str) -> Vec<u8> {
	let mut frame = id.as_bytes().to_vec();
	frame.extend_from_slice(&(value.len() as u32 + 1).to_be_bytes());
	frame.extend_from_slice(&[0, 0, 0]);
	frame.extend_from_slice(value.as_bytes());
	frame
}

fn tag_bytes(major: u8, frames: &[u8]) -> Vec<u8> {
	let size = (frames.len() as u32).synch().unwrap();

	let mut bytes = vec![b'I', b'D', b'3', major, 0, 0];
	bytes.extend_from_slice(&size.to_be_bytes());
	bytes.extend_from_slice(frames);
	bytes
}

fn read_tag(bytes: &[u8]) -> Id3v2Tag {
	Id3v2Tag::parse(bytes, ParseOptions::new().parsing_mode(ParsingMode::Strict)).unwrap()
}

fn dump_and_re_read(tag: &Id3v2Tag) -> Id3v2Tag {
	let bytes = tag.to_bytes(WriteOptions::default()).unwrap();
	read_tag(&bytes)
}

fn comment(description: &str, content: &str) -> Frame {
	Frame::new(
		"COMM",
		Id3v2Version::V4,
		FrameFlags::default(),
		FrameBody::Language(LanguageFrame::new(
			TextEncoding::UTF8,
			*b"eng",
			description,
			content,
		)),
	)
	.unwrap()
}

#[test_log::test]
fn parse_v3() {
	let mut frames = v3_text_frame("TPE1", "Bar artist");
	frames.extend(v3_text_frame("TIT2", "Foo title"));
	frames.extend(v3_text_frame("TALB", "Baz album"));
	frames.extend(v3_text_frame("TYER", "1984"));
	frames.extend(v3_text_frame("TRCK", "1/2"));

	let tag = read_tag(&tag_bytes(3, &frames));
	assert_eq!(tag.version(), Id3v2Version::V3);
	assert_eq!(tag.frame_count(), 5);

	assert_eq!(tag.get_first(FieldKey::Artist).unwrap().as_deref(), Some("Bar artist"));
	assert_eq!(tag.get_first(FieldKey::Title).unwrap().as_deref(), Some("Foo title"));
	assert_eq!(tag.get_first(FieldKey::Album).unwrap().as_deref(), Some("Baz album"));
	assert_eq!(tag.get_first(FieldKey::Year).unwrap().as_deref(), Some("1984"));
	assert_eq!(tag.get_first(FieldKey::Track).unwrap().as_deref(), Some("1"));
	assert_eq!(tag.get_first(FieldKey::TrackTotal).unwrap().as_deref(), Some("2"));

	assert_eq!(dump_and_re_read(&tag), tag);
}

#[test_log::test]
fn duplicate_frames_tallied() {
	let mut frames = v3_text_frame("TIT2", "Foo");
	frames.extend(v3_text_frame("TIT2", "Bar"));

	let tag = read_tag(&tag_bytes(3, &frames));

	// The later frame wins
	assert_eq!(tag.frame_count(), 1);
	assert_eq!(tag.get_first(FieldKey::Title).unwrap().as_deref(), Some("Bar"));

	assert_eq!(tag.duplicate_frame_count(), 1);
	assert_eq!(tag.duplicate_bytes(), 14);
	assert_eq!(tag.duplicate_frame_ids(), ["TIT2"]);
}

#[test_log::test]
fn empty_duplicate_keeps_content() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.insert(Frame::text("TIT2", Id3v2Version::V4, "Foo").unwrap());
	tag.insert(Frame::text("TIT2", Id3v2Version::V4, "").unwrap());

	assert_eq!(tag.get_first(FieldKey::Title).unwrap().as_deref(), Some("Foo"));
	assert_eq!(tag.duplicate_frame_count(), 1);
}

#[test_log::test]
fn comments_by_description() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.insert(comment("a", "one"));
	tag.insert(comment("b", "two"));
	assert_eq!(tag.frame_count(), 2);

	// Same description and language, merged
	tag.insert(comment("a", "three"));
	assert_eq!(tag.frame_count(), 2);
	assert_eq!(tag.duplicate_frame_count(), 0);

	let contents = tag
		.get_frames("COMM")
		.filter_map(Frame::content)
		.collect::<Vec<_>>();
	assert_eq!(contents, ["one\0three", "two"]);

	// The generic key only matches the empty description
	assert!(tag.get_first(FieldKey::Comment).unwrap().is_none());

	let target = FrameAndSubId::parse("COMM:b", Id3v2Version::V4).unwrap();
	assert_eq!(tag.get_all_by(&target), ["two"]);
}

#[test_log::test]
fn user_text_merged() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);

	let target = FrameAndSubId::parse("TXXX:CATALOGNUMBER", Id3v2Version::V3).unwrap();
	tag.add_by(&target, "ABC-1").unwrap();
	tag.add_by(&target, "ABC-2").unwrap();
	assert_eq!(tag.frame_count(), 1);
	assert_eq!(tag.get_all_by(&target), ["ABC-1", "ABC-2"]);

	tag.set_by(&target, "XYZ").unwrap();
	assert_eq!(tag.get_all_by(&target), ["XYZ"]);

	// Other descriptions are left alone
	let other = FrameAndSubId::parse("TXXX:LABEL", Id3v2Version::V3).unwrap();
	tag.set_by(&other, "Foo records").unwrap();
	tag.delete_by(&target);
	assert_eq!(tag.frame_count(), 1);
	assert_eq!(tag.get_all_by(&other), ["Foo records"]);
}

#[test_log::test]
fn unique_file_identifier_replaced() {
	let ufid = |identifier: &[u8]| {
		Frame::new(
			"UFID",
			Id3v2Version::V4,
			FrameFlags::default(),
			FrameBody::UniqueFileIdentifier(UniqueFileIdentifierFrame::new(
				"http://musicbrainz.org",
				identifier.to_vec(),
			)),
		)
		.unwrap()
	};

	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.insert(ufid(b"one"));
	tag.insert(ufid(b"two"));

	assert_eq!(tag.frame_count(), 1);
	assert_eq!(tag.duplicate_frame_count(), 1);
	assert_eq!(tag.get("UFID").and_then(Frame::content).as_deref(), Some("two"));
}

#[test_log::test]
fn year_aggregated_in_v3() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.set(FieldKey::Year, "2001-03-15").unwrap();
	assert_eq!(tag.get("TDRC").and_then(Frame::content).as_deref(), Some("2001-03-15"));

	let v3_tag = tag.to_version(Id3v2Version::V3);
	assert_eq!(v3_tag.field_count(), 1);
	assert_eq!(v3_tag.frame_count(), 2);

	let Some(Field::Aggregated(aggregate)) = v3_tag.fields().next() else {
		panic!("Expected an aggregated date");
	};
	assert_eq!(aggregate.id(), YEAR_DATE_ID);
	assert_eq!(aggregate.get("TYER").and_then(Frame::content).as_deref(), Some("2001"));
	assert_eq!(aggregate.get("TDAT").and_then(Frame::content).as_deref(), Some("1503"));
	assert_eq!(
		v3_tag.get_first(FieldKey::Year).unwrap().as_deref(),
		Some("2001-03-15")
	);

	// Survives a write
	let re_read = dump_and_re_read(&v3_tag);
	assert!(matches!(re_read.fields().next(), Some(Field::Aggregated(_))));

	let v4_tag = v3_tag.to_version(Id3v2Version::V4);
	assert_eq!(v4_tag.frame_count(), 1);
	assert_eq!(
		v4_tag.get("TDRC").and_then(Frame::content).as_deref(),
		Some("2001-03-15")
	);
}

#[test_log::test]
fn year_alone_not_aggregated() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set(FieldKey::Year, "2001").unwrap();

	assert!(matches!(tag.fields().next(), Some(Field::Single(_))));

	// The date completes the aggregate
	tag.insert(Frame::text("TDAT", Id3v2Version::V3, "1503").unwrap());
	assert_eq!(tag.field_count(), 1);
	assert_eq!(
		tag.get_first(FieldKey::Year).unwrap().as_deref(),
		Some("2001-03-15")
	);

	// Removing a member collapses it
	let _ = tag.remove("TDAT");
	assert!(matches!(tag.fields().next(), Some(Field::Single(_))));
	assert_eq!(tag.get_first(FieldKey::Year).unwrap().as_deref(), Some("2001"));
}

#[test_log::test]
fn full_timestamp() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set(FieldKey::Year, "2001-03-15T12:30").unwrap();

	assert_eq!(tag.get("TIME").and_then(Frame::content).as_deref(), Some("1230"));
	assert_eq!(
		tag.get_first(FieldKey::Year).unwrap().as_deref(),
		Some("2001-03-15T12:30")
	);

	let v4_tag = tag.to_version(Id3v2Version::V4);
	assert_eq!(
		v4_tag.get("TDRC").and_then(Frame::content).as_deref(),
		Some("2001-03-15T12:30")
	);

	tag.delete(FieldKey::Year).unwrap();
	assert!(tag.is_empty());
}

#[test_log::test]
fn year_without_digits() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set(FieldKey::Year, "2001-03-15").unwrap();

	assert!(tag.set(FieldKey::Year, "Unknown").is_err());
	assert_eq!(
		tag.get_first(FieldKey::Year).unwrap().as_deref(),
		Some("2001-03-15")
	);

	// Clears the date rather than storing "0000"
	tag.set(FieldKey::Year, "").unwrap();
	assert!(tag.get("TYER").is_none());
	assert!(tag.is_empty());

	let mut v4_tag = Id3v2Tag::new(Id3v2Version::V4);
	v4_tag.insert(Frame::text("TDRC", Id3v2Version::V4, "").unwrap());
	v4_tag.set(FieldKey::Title, "Foo").unwrap();

	let v3_tag = v4_tag.to_version(Id3v2Version::V3);
	assert!(v3_tag.get("TYER").is_none());
	assert_eq!(v3_tag.get_first(FieldKey::Year).unwrap(), None);
	assert_eq!(v3_tag.frame_count(), 1);
}

#[test_log::test]
fn v3_dates_in_v4_tag() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.insert_all([
		Frame::text("TIME", Id3v2Version::V3, "1230").unwrap(),
		Frame::text("TYER", Id3v2Version::V3, "2001").unwrap(),
		Frame::text("TDAT", Id3v2Version::V3, "1503").unwrap(),
	]);

	assert_eq!(tag.frame_count(), 1);
	assert_eq!(
		tag.get("TDRC").and_then(Frame::content).as_deref(),
		Some("2001-03-15T12:30")
	);
}

#[test_log::test]
fn track_components() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);

	tag.set(FieldKey::TrackTotal, "12").unwrap();
	assert_eq!(tag.get("TRCK").and_then(Frame::content).as_deref(), Some("0/12"));
	assert!(tag.get_first(FieldKey::Track).unwrap().is_none());

	tag.set(FieldKey::Track, "3").unwrap();
	assert_eq!(tag.get("TRCK").and_then(Frame::content).as_deref(), Some("3/12"));
	assert_eq!(tag.get_first(FieldKey::Track).unwrap().as_deref(), Some("3"));
	assert_eq!(tag.get_first(FieldKey::TrackTotal).unwrap().as_deref(), Some("12"));

	tag.delete(FieldKey::TrackTotal).unwrap();
	assert_eq!(tag.get("TRCK").and_then(Frame::content).as_deref(), Some("3"));

	// Totals must be numeric
	assert!(tag.set(FieldKey::TrackTotal, "twelve").is_err());

	// Numbers don't have to be
	tag.set(FieldKey::Track, "Side A").unwrap();
	assert_eq!(tag.get_first(FieldKey::Track).unwrap().as_deref(), Some("Side A"));
	assert!(tag.get_first(FieldKey::TrackTotal).unwrap().is_none());

	tag.delete(FieldKey::Track).unwrap();
	assert!(tag.is_empty());

	// Disc numbers work the same way
	tag.set(FieldKey::Disc, "1").unwrap();
	tag.set(FieldKey::DiscTotal, "2").unwrap();
	assert_eq!(tag.get("TPOS").and_then(Frame::content).as_deref(), Some("1/2"));
}

#[test_log::test]
fn track_frames_merged() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.insert(Frame::text("TRCK", Id3v2Version::V4, "3").unwrap());
	tag.insert(Frame::text("TRCK", Id3v2Version::V4, "/12").unwrap());

	assert_eq!(tag.frame_count(), 1);
	assert_eq!(tag.duplicate_frame_count(), 0);
	assert_eq!(tag.get("TRCK").and_then(Frame::content).as_deref(), Some("3/12"));
}

#[test_log::test]
fn track_text_preserved() {
	let mut frames = v3_text_frame("TRCK", "03/12");
	frames.extend(v3_text_frame("TPOS", "0"));

	let tag = read_tag(&tag_bytes(3, &frames));
	assert_eq!(tag.get_first(FieldKey::Track).unwrap().as_deref(), Some("3"));
	assert!(tag.get_first(FieldKey::Disc).unwrap().is_none());

	let re_read = dump_and_re_read(&tag);
	assert_eq!(re_read.get("TRCK").and_then(Frame::content).as_deref(), Some("03/12"));
	assert_eq!(re_read.get("TPOS").and_then(Frame::content).as_deref(), Some("0"));
	assert_eq!(re_read, tag);

	// Rewritten once a component changes
	let mut tag = re_read;
	tag.set(FieldKey::TrackTotal, "14").unwrap();
	assert_eq!(tag.get("TRCK").and_then(Frame::content).as_deref(), Some("3/14"));
}

#[test_log::test]
fn genres() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set(FieldKey::Genre, "Rock").unwrap();
	tag.add(FieldKey::Genre, "Remix").unwrap();

	assert_eq!(tag.get("TCON").and_then(Frame::content).as_deref(), Some("(17)(RX)"));
	assert_eq!(tag.get_all(FieldKey::Genre).unwrap(), ["Rock", "Remix"]);

	tag.add(FieldKey::Genre, "Synthwave").unwrap();
	assert_eq!(
		tag.get_all(FieldKey::Genre).unwrap(),
		["Rock", "Remix", "Synthwave"]
	);

	let v4_tag = tag.to_version(Id3v2Version::V4);
	assert_eq!(
		v4_tag.get_all(FieldKey::Genre).unwrap(),
		["Rock", "Remix", "Synthwave"]
	);

	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.set(FieldKey::Genre, "Rock").unwrap();
	tag.add(FieldKey::Genre, "Jazz").unwrap();

	assert_eq!(tag.get("TCON").and_then(Frame::content).as_deref(), Some("Rock\0Jazz"));
	assert_eq!(tag.get_all(FieldKey::Genre).unwrap(), ["Rock", "Jazz"]);
}

#[test_log::test]
fn multiple_values() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set(FieldKey::Artist, "Foo").unwrap();
	tag.add(FieldKey::Artist, "Bar").unwrap();

	assert_eq!(tag.get_all(FieldKey::Artist).unwrap(), ["Foo", "Bar"]);
	assert!(tag.has_field(FieldKey::Artist));

	let re_read = dump_and_re_read(&tag);
	assert_eq!(re_read.get_all(FieldKey::Artist).unwrap(), ["Foo", "Bar"]);

	tag.delete(FieldKey::Artist).unwrap();
	assert!(!tag.has_field(FieldKey::Artist));
}

#[test_log::test]
fn mood_across_versions() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.set(FieldKey::Mood, "Happy").unwrap();
	assert!(tag.get("TMOO").is_some());

	let v3_tag = tag.to_version(Id3v2Version::V3);
	assert!(v3_tag.get("TMOO").is_none());
	assert_eq!(v3_tag.get_first(FieldKey::Mood).unwrap().as_deref(), Some("Happy"));

	let v4_tag = v3_tag.to_version(Id3v2Version::V4);
	assert_eq!(v4_tag.get("TMOO").and_then(Frame::content).as_deref(), Some("Happy"));
}

#[test_log::test]
fn involved_people() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.set(FieldKey::InvolvedPeople, "producer\0Foo").unwrap();
	tag.insert(
		Frame::new(
			"TIPL",
			Id3v2Version::V4,
			FrameFlags::default(),
			FrameBody::KeyValue(KeyValueFrame::new(
				TextEncoding::UTF8,
				vec![(String::from("mixer"), String::from("Bar"))],
			)),
		)
		.unwrap(),
	);

	assert_eq!(tag.frame_count(), 1);
	assert_eq!(
		tag.get_all(FieldKey::InvolvedPeople).unwrap(),
		["producer", "Foo", "mixer", "Bar"]
	);

	let v3_tag = tag.to_version(Id3v2Version::V3);
	assert_eq!(
		v3_tag.get("IPLS").and_then(Frame::content).as_deref(),
		Some("producer\0Foo\0mixer\0Bar")
	);
}

#[test_log::test]
fn key_not_found() {
	let tag = Id3v2Tag::new(Id3v2Version::V3);

	let err = tag.get_first(FieldKey::ReleaseTime).unwrap_err();
	assert!(matches!(err.kind(), crate::error::ErrorKind::KeyNotFound(_)));
	assert!(!tag.has_field(FieldKey::ReleaseTime));
}

#[test_log::test]
fn invalid_values() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	assert!(tag.set(FieldKey::Rating, "very good").is_err());

	tag.set(FieldKey::Rating, "196").unwrap();
	assert_eq!(tag.get_first(FieldKey::Rating).unwrap().as_deref(), Some("196"));

	let target = FrameAndSubId::parse("MCDI", Id3v2Version::V4).unwrap();
	assert!(tag.set_by(&target, "Foo").is_err());
}

#[test_log::test]
fn file_alteration() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set(FieldKey::Title, "Foo").unwrap();
	tag.insert(Frame::text("TLEN", Id3v2Version::V3, "180000").unwrap());

	let mut flagged = Frame::text("TALB", Id3v2Version::V3, "Bar").unwrap();
	flagged.flags.file_alter_preservation = true;
	tag.insert(flagged);

	tag.prepare_for_file_alteration();

	assert_eq!(tag.frame_count(), 1);
	assert!(tag.get("TIT2").is_some());
}

#[test_log::test]
fn deprecated_round_trip() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.insert(
		Frame::new(
			"RVAD",
			Id3v2Version::V3,
			FrameFlags::default(),
			FrameBody::Binary(BinaryFrame::new(vec![1, 2, 3])),
		)
		.unwrap(),
	);

	let v4_tag = tag.to_version(Id3v2Version::V4);
	assert!(matches!(
		v4_tag.get("RVAD").map(Frame::body),
		Some(FrameBody::Deprecated(DeprecatedFrame {
			original_version: Id3v2Version::V3,
			..
		}))
	));

	let v3_tag = v4_tag.to_version(Id3v2Version::V3);
	assert_eq!(v3_tag, tag);
}

#[test_log::test]
fn v2_conversion() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.set(FieldKey::Title, "Foo").unwrap();
	tag.set(FieldKey::Artist, "Bar").unwrap();
	tag.set(FieldKey::Year, "2001-03-15").unwrap();

	let v2_tag = tag.to_version(Id3v2Version::V2);
	assert_eq!(v2_tag.get("TT2").and_then(Frame::content).as_deref(), Some("Foo"));
	assert_eq!(v2_tag.get("TP1").and_then(Frame::content).as_deref(), Some("Bar"));
	assert_eq!(v2_tag.get("TYE").and_then(Frame::content).as_deref(), Some("2001"));
	assert_eq!(v2_tag.get("TDA").and_then(Frame::content).as_deref(), Some("1503"));
	assert_eq!(
		v2_tag.get_first(FieldKey::Year).unwrap().as_deref(),
		Some("2001-03-15")
	);

	let re_read = dump_and_re_read(&v2_tag);
	assert_eq!(re_read, v2_tag);

	let v4_tag = re_read.to_version(Id3v2Version::V4);
	assert_eq!(v4_tag.get_first(FieldKey::Title).unwrap().as_deref(), Some("Foo"));
	assert_eq!(
		v4_tag.get_first(FieldKey::Year).unwrap().as_deref(),
		Some("2001-03-15")
	);
}

#[test_log::test]
fn source_untouched_by_conversion() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.set(FieldKey::Year, "2001-03-15").unwrap();
	let copy = tag.clone();

	let mut v3_tag = tag.to_version(Id3v2Version::V3);
	v3_tag.set(FieldKey::Year, "1999").unwrap();

	assert_eq!(tag, copy);
}

#[test_log::test]
fn from_v1() {
	let v1 = Id3v1Tag {
		title: Some(String::from("Foo title")),
		artist: Some(String::from("Bar artist")),
		album: None,
		year: Some(1984),
		comment: Some(String::from("Qux comment")),
		track_number: Some(1),
		genre: Some(32),
	};

	for version in Id3v2Version::ALL {
		let tag = Id3v2Tag::from_v1(&v1, version).unwrap();

		assert_eq!(tag.get_first(FieldKey::Title).unwrap().as_deref(), Some("Foo title"));
		assert_eq!(tag.get_first(FieldKey::Artist).unwrap().as_deref(), Some("Bar artist"));
		assert!(tag.get_first(FieldKey::Album).unwrap().is_none());
		assert_eq!(tag.get_first(FieldKey::Year).unwrap().as_deref(), Some("1984"));
		assert_eq!(tag.get_first(FieldKey::Comment).unwrap().as_deref(), Some("Qux comment"));
		assert_eq!(tag.get_first(FieldKey::Track).unwrap().as_deref(), Some("1"));
		assert_eq!(tag.get_first(FieldKey::Genre).unwrap().as_deref(), Some("Classical"));
	}
}

macro_rules! field_key_tests {
	($($key:ident => $value:literal),+ $(,)?) => {
		paste::paste! {
			$(
			#[test_log::test]
			fn [<field_key_ $key:snake>]() {
				for version in Id3v2Version::ALL {
					let mut tag = Id3v2Tag::new(version);
					tag.set(FieldKey::$key, $value).unwrap();
					assert_eq!(
						tag.get_first(FieldKey::$key).unwrap().as_deref(),
						Some($value),
						"{version}"
					);

					let re_read = dump_and_re_read(&tag);
					assert_eq!(
						re_read.get_first(FieldKey::$key).unwrap().as_deref(),
						Some($value),
						"{version}"
					);

					tag.delete(FieldKey::$key).unwrap();
					assert!(tag.is_empty(), "{version}");
				}
			}
			)+
		}
	};
}

field_key_tests! {
	Title => "Foo title",
	Artist => "Foo artist",
	AlbumArtist => "Foo album artist",
	Album => "Foo album",
	Year => "2001-03-15",
	Track => "3",
	Disc => "1",
	Genre => "Rock",
	Comment => "Foo comment",
	Lyrics => "Foo lyrics",
	Composer => "Foo composer",
	Bpm => "120",
	Copyright => "Foo copyright",
	EncodedBy => "Foo encoder",
	Isrc => "USABC0000001",
	Mood => "Happy",
	Compilation => "1",
	Rating => "128",
	ArtistUrl => "https://example.com/artist",
	Url => "https://example.com",
}

use crate::full_tag;

use id3_engine::config::{ParseOptions, ParsingMode, WriteOptions};
use id3_engine::id3::v2::util::synchsafe::{resynchronise, unsynchronise};
use id3_engine::id3::v2::{FieldKey, Id3v2Tag, Id3v2TagFlags, Id3v2Version};

fn strict() -> ParseOptions {
	ParseOptions::new().parsing_mode(ParsingMode::Strict)
}

fn has_false_sync(content: &[u8]) -> bool {
	content.windows(2).any(|w| w[0] == 0xFF && w[1] >= 0xE0)
}

fn assert_stable(tag: &Id3v2Tag, write_options: WriteOptions) {
	let written = tag.to_bytes(write_options).unwrap();

	let read = Id3v2Tag::parse(&written, strict()).unwrap();
	assert_eq!(read.invalid_frame_count(), 0);
	assert_eq!(read.duplicate_frame_count(), 0);

	let re_written = read.to_bytes(write_options).unwrap();
	assert_eq!(written, re_written, "{}", tag.version());
}

#[test_log::test]
fn write_read_write() {
	for version in Id3v2Version::ALL {
		let tag = full_tag(version);

		assert_stable(&tag, WriteOptions::default());
		assert_stable(&tag, WriteOptions::new().preferred_padding(0));
		assert_stable(&tag, WriteOptions::new().unsynchronisation(true));
	}
}

#[test_log::test]
fn write_read_write_with_extended_header() {
	for version in [Id3v2Version::V3, Id3v2Version::V4] {
		let mut tag = full_tag(version);
		tag.set_flags(Id3v2TagFlags {
			crc: true,
			..Id3v2TagFlags::default()
		});

		assert_stable(&tag, WriteOptions::default());
	}

	let mut tag = full_tag(Id3v2Version::V4);
	tag.set_flags(Id3v2TagFlags {
		crc: true,
		..Id3v2TagFlags::default()
	});
	assert_stable(&tag, WriteOptions::new().unsynchronisation(true));

	let mut tag = full_tag(Id3v2Version::V4);
	tag.set_flags(Id3v2TagFlags {
		footer: true,
		crc: true,
		restrictions: Some(0b0100_0000),
		..Id3v2TagFlags::default()
	});

	assert_stable(&tag, WriteOptions::default());

	let read = Id3v2Tag::parse(&tag.to_bytes(WriteOptions::default()).unwrap(), strict()).unwrap();
	assert_eq!(read.flags(), tag.flags());
	assert_eq!(read.padding_size(), 0);
}

#[test_log::test]
fn content_survives() {
	for version in Id3v2Version::ALL {
		let tag = full_tag(version);

		let written = tag.to_bytes(WriteOptions::new().unsynchronisation(true)).unwrap();
		let read = Id3v2Tag::parse(&written, strict()).unwrap();

		assert_eq!(read.get_first(FieldKey::Title).unwrap().as_deref(), Some("Foo title"));
		assert_eq!(
			read.get_all(FieldKey::Artist).unwrap(),
			["Bar artist", "Baz artist"]
		);
		assert_eq!(
			read.get_first(FieldKey::Album).unwrap().as_deref(),
			Some("Qux album ünïcödé ✓")
		);
		assert_eq!(read.get_first(FieldKey::Year).unwrap().as_deref(), Some("1984-06-01"));
		assert_eq!(read.get_first(FieldKey::TrackTotal).unwrap().as_deref(), Some("12"));
		assert_eq!(read.get_first(FieldKey::Genre).unwrap().as_deref(), Some("Classical"));
		assert_eq!(read.get_first(FieldKey::Rating).unwrap().as_deref(), Some("196"));
		assert_eq!(read.first_artwork(), tag.first_artwork());
	}
}

#[test_log::test]
fn unsynchronised_output_has_no_false_sync() {
	for version in [Id3v2Version::V2, Id3v2Version::V3] {
		let written = full_tag(version)
			.to_bytes(WriteOptions::new().unsynchronisation(true))
			.unwrap();

		assert!(!has_false_sync(&written), "{version}");
	}
}

#[test_log::test]
fn unsynchronisation_involution() {
	let samples: [&[u8]; 5] = [
		b"",
		b"\xFF",
		b"\xFF\xE0\xFF\x00\xFF\xFF\xFE",
		b"\x00\x01\x02\x03",
		b"\xFF\x00\x00\xFF\xFB\x90",
	];

	for sample in samples {
		let encoded = unsynchronise(sample);
		assert_eq!(resynchronise(&encoded), sample);

		assert!(!has_false_sync(&encoded));
	}
}

#[test_log::test]
fn truncated_frame() {
	let mut content = b"TIT2\x00\x00\x00\x04\x00\x00\x00Foo".to_vec();
	// One byte past the end of the tag
	content.extend_from_slice(b"TPE1\x00\x00\x00\x05\x00\x00\x00Bar");

	let mut data = b"ID3\x03\x00\x00\x00\x00\x00".to_vec();
	data.push(content.len() as u8);
	data.extend(content);

	let tag = Id3v2Tag::parse(&data, ParseOptions::new()).unwrap();
	assert_eq!(tag.frame_count(), 1);
	assert_eq!(tag.invalid_frame_count(), 1);
	assert_eq!(tag.get_first(FieldKey::Title).unwrap().as_deref(), Some("Foo"));
}

#[test_log::test]
fn encrypted_frame_with_invalid_method_kept() {
	let mut content = b"ID3\x04\x00\x00\x00\x00\x00\x1C".to_vec();
	content.extend_from_slice(b"TIT2\x00\x00\x00\x04\x00\x04\x01abc");
	content.extend_from_slice(b"TPE1\x00\x00\x00\x04\x00\x00\x00Foo");

	assert!(Id3v2Tag::parse(&content, strict()).is_err());

	let options = ParseOptions::new().parsing_mode(ParsingMode::BestAttempt);
	let tag = Id3v2Tag::parse(&content, options).unwrap();
	assert_eq!(tag.encrypted_frames().count(), 1);
	assert_eq!(tag.get_first(FieldKey::Artist).unwrap().as_deref(), Some("Foo"));

	let written = tag.to_bytes(WriteOptions::default()).unwrap();
	let read = Id3v2Tag::parse(&written, options).unwrap();
	assert_eq!(
		read.encrypted_frames().collect::<Vec<_>>(),
		tag.encrypted_frames().collect::<Vec<_>>()
	);
	assert_eq!(read.get_first(FieldKey::Artist).unwrap().as_deref(), Some("Foo"));
}

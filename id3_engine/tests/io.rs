#![allow(missing_docs)]

use std::io::{Read, Seek, SeekFrom, Write};

use id3_engine::config::{ParseOptions, ParsingMode, WriteOptions};
use id3_engine::id3::v1::Id3v1Tag;
use id3_engine::id3::v2::{FieldKey, Id3v2Tag, Id3v2Version};

// A few bytes resembling an MPEG frame
const AUDIO: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00, 0x00, 0x00];

fn tag() -> Id3v2Tag {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set(FieldKey::Title, "Foo title").unwrap();
	tag.set(FieldKey::Artist, "Bar artist").unwrap();
	tag.set(FieldKey::Year, "1984").unwrap();
	tag
}

fn save(file: &mut std::fs::File, id3v2: &Id3v2Tag, write_options: WriteOptions) {
	file.set_len(0).unwrap();
	file.rewind().unwrap();

	id3v2.write_to(file, write_options).unwrap();
	file.write_all(AUDIO).unwrap();
	Id3v1Tag::from(id3v2).write_to(file, write_options).unwrap();
}

#[test_log::test]
fn io_save_to_file() {
	let mut temp_file = tempfile::tempfile().unwrap();
	save(&mut temp_file, &tag(), WriteOptions::new().preferred_padding(0));

	// Read the tag back and change the artist
	temp_file.rewind().unwrap();
	let mut read = Id3v2Tag::read_from(&mut temp_file, ParseOptions::new()).unwrap();
	assert_eq!(read.padding_size(), 0);

	// The reader stops at the end of the tag
	let mut audio = [0; AUDIO.len()];
	temp_file.read_exact(&mut audio).unwrap();
	assert_eq!(audio, AUDIO);

	read.set(FieldKey::Artist, "Baz artist").unwrap();
	save(&mut temp_file, &read, WriteOptions::new().preferred_padding(0));

	temp_file.rewind().unwrap();
	let mut contents = Vec::new();
	temp_file.read_to_end(&mut contents).unwrap();

	let read = Id3v2Tag::parse(&contents, ParseOptions::new()).unwrap();
	assert_eq!(read.get_first(FieldKey::Artist).unwrap().as_deref(), Some("Baz artist"));

	let v1 = Id3v1Tag::read_from_trailer(&contents, ParsingMode::Strict)
		.unwrap()
		.unwrap();
	assert_eq!(v1.artist.as_deref(), Some("Baz artist"));
	assert_eq!(v1.year, Some(1984));
}

#[test_log::test]
fn io_padding_reused() {
	let mut temp_file = tempfile::tempfile().unwrap();
	save(&mut temp_file, &tag(), WriteOptions::default());
	let original_len = temp_file.metadata().unwrap().len();

	temp_file.rewind().unwrap();
	let mut read = Id3v2Tag::read_from(&mut temp_file, ParseOptions::new()).unwrap();
	assert_eq!(read.padding_size(), 1024);

	// Growing the tag uses up some of the padding, the file size doesn't change
	read.set(FieldKey::Album, "Qux album").unwrap();
	save(&mut temp_file, &read, WriteOptions::default());

	assert_eq!(temp_file.metadata().unwrap().len(), original_len);

	temp_file.seek(SeekFrom::Start(0)).unwrap();
	let read = Id3v2Tag::read_from(&mut temp_file, ParseOptions::new()).unwrap();
	assert_eq!(read.get_first(FieldKey::Album).unwrap().as_deref(), Some("Qux album"));
	assert!(read.padding_size() < 1024);
}

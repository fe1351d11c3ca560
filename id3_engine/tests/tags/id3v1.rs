use id3_engine::config::{ParsingMode, WriteOptions};
use id3_engine::id3::v1::Id3v1Tag;
use id3_engine::id3::v2::{FieldKey, Id3v2Tag, Id3v2Version};

fn v1_tag() -> Id3v1Tag {
	Id3v1Tag {
		title: Some(String::from("Foo title")),
		artist: Some(String::from("Bar artist")),
		album: Some(String::from("Baz album")),
		year: Some(1984),
		comment: Some(String::from("Qux comment")),
		track_number: Some(7),
		genre: Some(17),
	}
}

#[test_log::test]
fn v1_to_v2_and_back() {
	let v1 = v1_tag();

	for version in Id3v2Version::ALL {
		let tag = Id3v2Tag::from_v1(&v1, version).unwrap();
		assert_eq!(tag.get_first(FieldKey::Genre).unwrap().as_deref(), Some("Rock"));

		assert_eq!(Id3v1Tag::from(&tag), v1, "{version}");
	}
}

#[test_log::test]
fn trailer() {
	let v1 = v1_tag();

	let mut file = vec![0; 512];
	file.extend(v1.to_bytes(WriteOptions::default()).unwrap());

	let read = Id3v1Tag::read_from_trailer(&file, ParsingMode::Strict)
		.unwrap()
		.unwrap();
	assert_eq!(read, v1);
}

#[test_log::test]
fn fields_truncated() {
	let mut v1 = v1_tag();
	v1.title = Some("a".repeat(40));

	let bytes = v1.to_bytes(WriteOptions::default()).unwrap();
	let read = Id3v1Tag::read_from_trailer(&bytes, ParsingMode::Strict)
		.unwrap()
		.unwrap();

	assert_eq!(read.title.as_deref(), Some("a".repeat(30).as_str()));
}

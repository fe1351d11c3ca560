use super::constants::ID3V1_TAG_MARKER;
use super::tag::Id3v1Tag;
use crate::config::WriteOptions;
use crate::error::Result;
use crate::util::text::latin1_encode;

use std::io::{Cursor, Seek, Write};

use byteorder::WriteBytesExt;

pub(super) fn encode(tag: &Id3v1Tag, write_options: WriteOptions) -> Result<Vec<u8>> {
	fn resize_string(
		value: Option<&str>,
		size: usize,
		write_options: WriteOptions,
	) -> Result<Vec<u8>> {
		let mut cursor = Cursor::new(vec![0; size]);
		cursor.rewind()?;

		if let Some(val) = value {
			for b in latin1_encode(val, write_options.lossy_text_encoding).take(size) {
				cursor.write_u8(b?)?;
			}
		}

		Ok(cursor.into_inner())
	}

	let mut writer = Vec::with_capacity(Id3v1Tag::SIZE);

	writer.write_all(&ID3V1_TAG_MARKER)?;

	let title = resize_string(tag.title.as_deref(), 30, write_options)?;
	writer.write_all(&title)?;

	let artist = resize_string(tag.artist.as_deref(), 30, write_options)?;
	writer.write_all(&artist)?;

	let album = resize_string(tag.album.as_deref(), 30, write_options)?;
	writer.write_all(&album)?;

	let mut year = [0; 4];
	if let Some(year_num) = tag.year {
		let digits = format!("{:04}", year_num.min(9999));
		year.copy_from_slice(digits.as_bytes());
	}

	writer.write_all(&year)?;

	let comment = resize_string(tag.comment.as_deref(), 28, write_options)?;
	writer.write_all(&comment)?;

	writer.write_u8(0)?;

	writer.write_u8(tag.track_number.unwrap_or(0))?;
	writer.write_u8(tag.genre.unwrap_or(255))?;

	Ok(writer)
}

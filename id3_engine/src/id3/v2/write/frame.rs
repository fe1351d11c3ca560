use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::header::write_header;
use crate::id3::v2::frame::{Frame, FrameBody, FrameFlags};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::util::synchsafe::{
	SynchsafeInteger, requires_unsynchronisation, unsynchronise,
};
use crate::macros::{err, id3v2_err};

use byteorder::{BigEndian, WriteBytesExt};

/// A frame ready to be placed in the tag
#[derive(Debug)]
pub(super) struct EncodedFrame {
	pub(super) bytes: Vec<u8>,
	/// Whether the ID3v2.4 per-frame unsynchronisation was applied
	pub(super) unsynchronised: bool,
}

/// Encode a single frame for a tag of `version`
///
/// Frames that cannot be represented in `version` are skipped, returning `None`.
pub(super) fn encode_frame(
	frame: &Frame,
	version: Id3v2Version,
	write_options: WriteOptions,
) -> Result<Option<EncodedFrame>> {
	if !frame.id().fits(version) {
		log::warn!(
			"Discarding frame: {}, ID doesn't fit {version}",
			frame.id_str()
		);
		return Ok(None);
	}

	if matches!(frame.body(), FrameBody::Deprecated(_)) && !write_options.write_deprecated {
		log::debug!("Discarding deprecated frame: {}", frame.id_str());
		return Ok(None);
	}

	if let Some(method_symbol) = frame.flags.encryption {
		if version == Id3v2Version::V2 {
			log::warn!(
				"Discarding encrypted frame: {}, not supported in ID3v2.2",
				frame.id_str()
			);
			return Ok(None);
		}

		return write_encrypted(frame, method_symbol, version, write_options).map(Some);
	}

	let body = frame.body().as_bytes(version, write_options)?;

	// Compression is never re-applied
	let mut flags = FrameFlags {
		compression: false,
		data_length_indicator: None,
		unsynchronisation: false,
		..frame.flags
	};

	if version == Id3v2Version::V2 {
		flags = FrameFlags::default();
	}

	write_frame(frame.id_str(), flags, &[], &body, version, write_options)
		.map(Some)
}

// The sub-headers are written in the order:
//
// ID3v2.3: data length indicator (if compressed) -> encryption method -> group
// ID3v2.4: group -> encryption method -> data length indicator
fn write_encrypted(
	frame: &Frame,
	method_symbol: u8,
	version: Id3v2Version,
	write_options: WriteOptions,
) -> Result<EncodedFrame> {
	let flags = frame.flags;

	// Only possible for frames read outside of `ParsingMode::Strict`, they are written back as-is
	if method_symbol < 0x80 {
		log::warn!(
			"Frame `{}` has an invalid encryption method symbol ({method_symbol:#04X})",
			frame.id_str()
		);
	}

	if flags.compression && flags.data_length_indicator.is_none() {
		id3v2_err!(@BAIL MissingDataLengthIndicator);
	}

	// The content is opaque, it is written exactly as it was read
	let body = frame.body().as_bytes(version, write_options)?;

	let mut flags = FrameFlags {
		unsynchronisation: false,
		..flags
	};

	let mut sub_header = Vec::with_capacity(6);
	match version {
		Id3v2Version::V3 => {
			if flags.compression {
				if let Some(len) = flags.data_length_indicator {
					sub_header.write_u32::<BigEndian>(len)?;
				}
			} else {
				flags.data_length_indicator = None;
			}

			sub_header.write_u8(method_symbol)?;
		},
		_ => {
			sub_header.write_u8(method_symbol)?;

			if let Some(len) = flags.data_length_indicator {
				sub_header.write_u32::<BigEndian>(len.synch()?)?;
			}
		},
	}

	write_frame(
		frame.id_str(),
		flags,
		&sub_header,
		&body,
		version,
		write_options,
	)
}

// `sub_header` excludes the group identifier, which is placed according to the version
fn write_frame(
	id: &str,
	mut flags: FrameFlags,
	sub_header: &[u8],
	body: &[u8],
	version: Id3v2Version,
	write_options: WriteOptions,
) -> Result<EncodedFrame> {
	let mut content = Vec::with_capacity(sub_header.len() + body.len() + 1);
	match (version, flags.grouping_identity) {
		(Id3v2Version::V4, Some(group)) => {
			content.push(group);
			content.extend_from_slice(sub_header);
		},
		(_, Some(group)) => {
			content.extend_from_slice(sub_header);
			content.push(group);
		},
		(_, None) => content.extend_from_slice(sub_header),
	}

	let mut unsynchronised = false;
	if version == Id3v2Version::V4
		&& write_options.unsynchronisation
		&& requires_unsynchronisation(body)
	{
		log::trace!("Unsynchronising frame `{id}`");
		content.extend_from_slice(&unsynchronise(body));

		flags.unsynchronisation = true;
		unsynchronised = true;
	} else {
		content.extend_from_slice(body);
	}

	let Ok(size) = u32::try_from(content.len()) else {
		err!(TooMuchData);
	};

	let mut bytes = write_header(id, size, flags, version)?;
	bytes.extend_from_slice(&content);

	Ok(EncodedFrame {
		bytes,
		unsynchronised,
	})
}

#[cfg(test)]
mod tests {
	use super::encode_frame;
	use crate::config::WriteOptions;
	use crate::error::Id3v2ErrorKind;
	use crate::id3::v2::{
		BinaryFrame, DeprecatedFrame, Frame, FrameBody, FrameFlags, FrameId, Id3v2Version,
	};

	fn encrypted(flags: FrameFlags) -> Frame {
		Frame::new(
			"TIT2",
			Id3v2Version::V4,
			flags,
			FrameBody::Unsupported(BinaryFrame::new(vec![1, 2, 3])),
		)
		.unwrap()
	}

	#[test_log::test]
	fn v3_text_frame() {
		let frame = Frame::text("TIT2", Id3v2Version::V3, "Foo").unwrap();

		let encoded = encode_frame(&frame, Id3v2Version::V3, WriteOptions::default())
			.unwrap()
			.unwrap();
		assert_eq!(encoded.bytes, b"TIT2\x00\x00\x00\x04\x00\x00\x00Foo");
		assert!(!encoded.unsynchronised);
	}

	#[test_log::test]
	fn compression_cleared() {
		let mut frame = Frame::text("TIT2", Id3v2Version::V4, "Foo").unwrap();
		frame.flags.compression = true;
		frame.flags.data_length_indicator = Some(4);

		let encoded = encode_frame(&frame, Id3v2Version::V4, WriteOptions::default())
			.unwrap()
			.unwrap();
		assert_eq!(encoded.bytes, b"TIT2\x00\x00\x00\x04\x00\x00\x03Foo");
	}

	#[test_log::test]
	fn group_identifier() {
		let mut frame = Frame::text("TIT2", Id3v2Version::V3, "Foo").unwrap();
		frame.flags.grouping_identity = Some(7);

		let encoded = encode_frame(&frame, Id3v2Version::V3, WriteOptions::default())
			.unwrap()
			.unwrap();
		assert_eq!(encoded.bytes, b"TIT2\x00\x00\x00\x05\x00\x20\x07\x00Foo");
	}

	#[test_log::test]
	fn per_frame_unsynchronisation() {
		let frame = Frame::new(
			"MCDI",
			Id3v2Version::V4,
			FrameFlags::default(),
			FrameBody::Binary(BinaryFrame::new(vec![0xFF, 0xE0])),
		)
		.unwrap();

		let options = WriteOptions::new().unsynchronisation(true);
		let encoded = encode_frame(&frame, Id3v2Version::V4, options)
			.unwrap()
			.unwrap();

		assert!(encoded.unsynchronised);
		assert_eq!(encoded.bytes, b"MCDI\x00\x00\x00\x03\x00\x02\xFF\x00\xE0");

		// Tag-wide unsynchronisation for older versions
		let frame = Frame::new(
			"MCDI",
			Id3v2Version::V3,
			FrameFlags::default(),
			FrameBody::Binary(BinaryFrame::new(vec![0xFF, 0xE0])),
		)
		.unwrap();

		let encoded = encode_frame(&frame, Id3v2Version::V3, options)
			.unwrap()
			.unwrap();
		assert!(!encoded.unsynchronised);
	}

	#[test_log::test]
	fn id_width_mismatch_skipped() {
		let frame = Frame::text("TT2", Id3v2Version::V2, "Foo").unwrap();

		assert!(
			encode_frame(&frame, Id3v2Version::V3, WriteOptions::default())
				.unwrap()
				.is_none()
		);
	}

	#[test_log::test]
	fn deprecated_skipped_on_request() {
		let frame = Frame::from_parts(
			FrameId::new("RVAD").unwrap(),
			Id3v2Version::V4,
			FrameFlags::default(),
			FrameBody::Deprecated(DeprecatedFrame {
				original_version: Id3v2Version::V3,
				body: Box::new(FrameBody::Binary(BinaryFrame::new(vec![1, 2]))),
			}),
		);

		let options = WriteOptions::new().write_deprecated(false);
		assert!(
			encode_frame(&frame, Id3v2Version::V4, options)
				.unwrap()
				.is_none()
		);

		let encoded = encode_frame(&frame, Id3v2Version::V4, WriteOptions::default())
			.unwrap()
			.unwrap();
		assert_eq!(&encoded.bytes[10..], &[1, 2]);
	}

	#[test_log::test]
	fn encrypted_sub_headers() {
		let flags = FrameFlags {
			encryption: Some(0x80),
			grouping_identity: Some(1),
			data_length_indicator: Some(3),
			..FrameFlags::default()
		};

		let encoded = encode_frame(&encrypted(flags), Id3v2Version::V4, WriteOptions::default())
			.unwrap()
			.unwrap();
		assert_eq!(
			encoded.bytes,
			b"TIT2\x00\x00\x00\x09\x00\x45\x01\x80\x00\x00\x00\x03\x01\x02\x03"
		);

		let flags = FrameFlags {
			encryption: Some(0x80),
			compression: true,
			data_length_indicator: Some(3),
			..FrameFlags::default()
		};

		let encoded = encode_frame(&encrypted(flags), Id3v2Version::V3, WriteOptions::default())
			.unwrap()
			.unwrap();
		assert_eq!(
			encoded.bytes,
			b"TIT2\x00\x00\x00\x08\x00\xC0\x00\x00\x00\x03\x80\x01\x02\x03"
		);
	}

	#[test_log::test]
	fn invalid_encryption() {
		let flags = FrameFlags {
			encryption: Some(0x10),
			..FrameFlags::default()
		};

		// Kept as read
		let encoded = encode_frame(&encrypted(flags), Id3v2Version::V4, WriteOptions::default())
			.unwrap()
			.unwrap();
		assert_eq!(encoded.bytes, b"TIT2\x00\x00\x00\x04\x00\x04\x10\x01\x02\x03");

		let flags = FrameFlags {
			encryption: Some(0x80),
			compression: true,
			..FrameFlags::default()
		};

		let err = encode_frame(&encrypted(flags), Id3v2Version::V4, WriteOptions::default())
			.unwrap_err();
		assert!(matches!(
			err.id3v2_kind(),
			Some(Id3v2ErrorKind::MissingDataLengthIndicator)
		));

		let flags = FrameFlags {
			encryption: Some(0x80),
			..FrameFlags::default()
		};
		assert!(
			encode_frame(&encrypted(flags), Id3v2Version::V2, WriteOptions::default())
				.unwrap()
				.is_none()
		);
	}
}

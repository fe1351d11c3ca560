//! Conversion of frames between tag versions
//!
//! Conversions only happen between adjacent versions, ID3v2.2 <-> ID3v2.4 goes through ID3v2.3.
//! A single frame may become several (ex. `TDRC` -> `TYER` + `TDAT` + `TIME`), and nothing
//! is ever discarded: frames without an equivalent are kept as [`FrameBody::Deprecated`],
//! and frames with unknown IDs as [`FrameBody::Unsupported`].

use crate::config::WriteOptions;
use crate::id3::v2::frame::{DeprecatedFrame, Frame, FrameBody, FrameFlags, FrameId};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::items::{BinaryFrame, ExtendedTextFrame, TextInformationFrame};
use crate::id3::v2::registry;
use crate::util::text::TextEncoding;

pub(crate) const MOOD_DESCRIPTION: &str = "MOOD";

/// Convert `frame` to `target`, producing one or more frames
///
/// # Examples
///
/// ```rust
/// use id3_engine::id3::v2::{Frame, Id3v2Version, convert_frame};
///
/// # fn main() -> id3_engine::error::Result<()> {
/// let frame = Frame::text("TDRC", Id3v2Version::V4, "2001-03-15T12:30")?;
///
/// let converted = convert_frame(&frame, Id3v2Version::V3);
/// let values = converted
/// 	.iter()
/// 	.map(|f| (f.id_str(), f.content().unwrap_or_default()))
/// 	.collect::<Vec<_>>();
///
/// assert_eq!(
/// 	values,
/// 	[
/// 		("TYER", String::from("2001")),
/// 		("TDAT", String::from("1503")),
/// 		("TIME", String::from("1230"))
/// 	]
/// );
/// # Ok(()) }
/// ```
pub fn convert_frame(frame: &Frame, target: Id3v2Version) -> Vec<Frame> {
	let mut frames = vec![frame.clone()];

	while let Some(current) = frames.first().map(Frame::version) {
		if current == target {
			break;
		}

		let next = match current {
			Id3v2Version::V2 | Id3v2Version::V4 => Id3v2Version::V3,
			Id3v2Version::V3 => target,
		};

		let mut converted = Vec::with_capacity(frames.len());
		for frame in &frames {
			converted.extend(convert_adjacent(frame, next));
		}

		frames = converted;
	}

	frames
}

fn convert_adjacent(frame: &Frame, to: Id3v2Version) -> Vec<Frame> {
	let from = frame.version;
	let id = frame.id_str();

	log::trace!("Converting {id} from {from} to {to}");

	let flags = flags_for(frame.flags, to);
	let body = match to {
		Id3v2Version::V4 => frame.body.clone(),
		_ => downgrade_encoding(frame.body.clone()),
	};

	// A deprecated frame returning to its original version gets its body back
	if let FrameBody::Deprecated(deprecated) = &frame.body {
		let body = if deprecated.original_version == to {
			(*deprecated.body).clone()
		} else {
			frame.body.clone()
		};

		return vec![Frame::from_parts(frame.id.clone(), to, flags, body)];
	}

	if let Some(frames) = convert_special(frame, from, to, flags, &body) {
		return frames;
	}

	if let Some(new_id) = registry::convert(from, to, id) {
		return vec![Frame::from_parts(
			FrameId(new_id.to_owned()),
			to,
			flags,
			body,
		)];
	}

	// Pictures and involved people lists are version independent once parsed
	let rename_only = matches!(body, FrameBody::Picture(_) | FrameBody::KeyValue(_));
	if let Some(new_id) =
		registry::force(from, to, id).filter(|new_id| rename_only && body.fits(new_id))
	{
		return vec![Frame::from_parts(
			FrameId(new_id.to_owned()),
			to,
			flags,
			body,
		)];
	}

	let deprecated = || {
		Frame::from_parts(
			frame.id.clone(),
			to,
			flags,
			FrameBody::Deprecated(DeprecatedFrame {
				original_version: from,
				body: Box::new(frame.body.clone()),
			}),
		)
	};

	if registry::is_supported(from, id) {
		log::debug!("{id} has no equivalent in {to}, keeping it as a deprecated frame");
		return vec![deprecated()];
	}

	let raw = match &frame.body {
		FrameBody::Unsupported(raw) => raw.clone(),
		body => match body.as_bytes(from, WriteOptions::default()) {
			Ok(raw) => BinaryFrame::new(raw),
			Err(e) => {
				log::warn!("Unable to encode unknown frame {id} ({e}), keeping it as deprecated");
				return vec![deprecated()];
			},
		},
	};

	vec![Frame::from_parts(
		frame.id.clone(),
		to,
		flags,
		FrameBody::Unsupported(raw),
	)]
}

// Frames that need their content rebuilt
fn convert_special(
	frame: &Frame,
	from: Id3v2Version,
	to: Id3v2Version,
	flags: FrameFlags,
	body: &FrameBody,
) -> Option<Vec<Frame>> {
	let text_frame = |id: &str, encoding: TextEncoding, value: String| {
		Frame::from_parts(
			FrameId(id.to_owned()),
			to,
			flags,
			FrameBody::Text(TextInformationFrame::new(encoding, value)),
		)
	};

	match (from, to, frame.id_str(), body) {
		// TDRC (Recording time) gets split into three frames: TYER, TDAT, and TIME
		(Id3v2Version::V4, Id3v2Version::V3, "TDRC", FrameBody::Text(text)) => {
			if text.value.trim().is_empty() {
				return Some(Vec::new());
			}

			// Without a numeric year, this has no ID3v2.3 equivalent
			let parts = split_date(&text.value)?;

			let mut frames = vec![text_frame("TYER", text.encoding, parts.year)];
			if let Some(date) = parts.date {
				frames.push(text_frame("TDAT", text.encoding, date));
			}
			if let Some(time) = parts.time {
				frames.push(text_frame("TIME", text.encoding, time));
			}

			Some(frames)
		},
		// TORY (Original release year) is the only component of TDOR
		// that is supported in ID3v2.3
		(Id3v2Version::V4, Id3v2Version::V3, "TDOR", FrameBody::Text(text)) => {
			if text.value.trim().is_empty() {
				return Some(Vec::new());
			}

			let parts = split_date(&text.value)?;
			Some(vec![text_frame("TORY", text.encoding, parts.year)])
		},
		(Id3v2Version::V3, Id3v2Version::V4, "TORY", FrameBody::Text(text)) => {
			Some(vec![text_frame("TDOR", text.encoding, text.value.clone())])
		},
		// The year alone is a valid recording time, TDAT and TIME only
		// have meaning alongside it, see `merge_date`
		(Id3v2Version::V3, Id3v2Version::V4, "TYER", FrameBody::Text(text)) => {
			Some(vec![text_frame("TDRC", text.encoding, text.value.clone())])
		},
		(Id3v2Version::V4, Id3v2Version::V3, "TMOO", FrameBody::Text(text)) => {
			Some(vec![Frame::from_parts(
				FrameId(String::from("TXXX")),
				to,
				flags,
				FrameBody::UserText(ExtendedTextFrame::new(
					text.encoding,
					MOOD_DESCRIPTION,
					text.value.clone(),
				)),
			)])
		},
		(Id3v2Version::V3, Id3v2Version::V4, "TXXX", FrameBody::UserText(user_text))
			if user_text.description == MOOD_DESCRIPTION =>
		{
			Some(vec![text_frame(
				"TMOO",
				user_text.encoding,
				user_text.content.clone(),
			)])
		},
		_ => None,
	}
}

fn flags_for(flags: FrameFlags, version: Id3v2Version) -> FrameFlags {
	match version {
		Id3v2Version::V2 => FrameFlags::default(),
		Id3v2Version::V3 => FrameFlags {
			unsynchronisation: false,
			data_length_indicator: flags.data_length_indicator.filter(|_| flags.compression),
			..flags
		},
		Id3v2Version::V4 => flags,
	}
}

// Avoid encodings that don't exist before ID3v2.4
fn downgrade_encoding(mut body: FrameBody) -> FrameBody {
	fn downgrade(encoding: &mut TextEncoding, text: &[&str]) {
		if matches!(encoding, TextEncoding::UTF8 | TextEncoding::UTF16BE) {
			*encoding = if text.iter().all(|t| TextEncoding::verify_latin1(t)) {
				TextEncoding::Latin1
			} else {
				TextEncoding::UTF16
			};
		}
	}

	match &mut body {
		FrameBody::Text(f) => downgrade(&mut f.encoding, &[&f.value]),
		FrameBody::NumberTotal(f) => f.encoding = TextEncoding::Latin1,
		FrameBody::KeyValue(f) => {
			let text = f.text();
			downgrade(&mut f.encoding, &[&text]);
		},
		FrameBody::UserText(f) => downgrade(&mut f.encoding, &[&f.description, &f.content]),
		FrameBody::UserUrl(f) => downgrade(&mut f.encoding, &[&f.description]),
		FrameBody::Language(f) => downgrade(&mut f.encoding, &[&f.description, &f.content]),
		FrameBody::Picture(f) => downgrade(&mut f.encoding, &[&f.description]),
		_ => {},
	}

	body
}

/// The components of an ISO 8601 timestamp, as ID3v2.3 stores them
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DateParts {
	/// "YYYY"
	pub(crate) year: String,
	/// "DDMM"
	pub(crate) date: Option<String>,
	/// "HHMM"
	pub(crate) time: Option<String>,
}

/// Split a "YYYY-MM-DDTHH:MM" timestamp (or any prefix of it)
///
/// A year and month with no day ("YYYY-MM") uses the first day of the month. Years of 1-3 digits
/// are zero padded.
///
/// Returns `None` if `value` doesn't start with a numeric year.
pub(crate) fn split_date(value: &str) -> Option<DateParts> {
	let value = value.trim();
	let is_numeric = |s: &&str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
	let digits = |range: std::ops::Range<usize>| value.get(range).filter(is_numeric);

	let year = match digits(0..4) {
		Some(year) => year.to_owned(),
		None if value.len() < 4 && is_numeric(&value) => format!("{value:0>4}"),
		None => return None,
	};

	let month = digits(5..7);
	let date = match (month, value.len()) {
		(Some(month), 10..) => digits(8..10).map(|day| format!("{day}{month}")),
		(Some(month), 7..=9) => Some(format!("01{month}")),
		_ => None,
	};

	let time = match (&date, value.len()) {
		(Some(_), 16..) => digits(11..13)
			.zip(digits(14..16))
			.map(|(hour, minute)| format!("{hour}{minute}")),
		_ => None,
	};

	Some(DateParts { year, date, time })
}

/// Combine ID3v2.3 "YYYY", "DDMM", and "HHMM" values into a "YYYY-MM-DDTHH:MM" timestamp
///
/// The date is ignored without a year, and the time without a date.
pub(crate) fn merge_date(year: &str, date: Option<&str>, time: Option<&str>) -> String {
	let is_pair = |s: &&str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());

	let mut timestamp = year.trim().to_owned();
	if let Some(date) = date.map(str::trim).filter(is_pair) {
		timestamp.push_str(&format!("-{}-{}", &date[2..], &date[..2]));

		if let Some(time) = time.map(str::trim).filter(is_pair) {
			timestamp.push_str(&format!("T{}:{}", &time[..2], &time[2..]));
		}
	}

	timestamp
}

//! `TCON` content type parsing
//!
//! ID3v2.2 and ID3v2.3 reference ID3v1 genres by index in parentheses, optionally followed by a
//! refinement ("(4)Eurodisco"). "(RX)" and "(CR)" stand for "Remix" and "Cover", and a refinement
//! starting with a parenthesis is escaped with a second one ("((I think...)"). ID3v2.4 separates
//! multiple genres with null characters, and references genres by a plain index.

use crate::id3::v1::GENRES;
use crate::id3::v1::constants::genre_index;
use crate::id3::v2::header::Id3v2Version;

use std::borrow::Cow;

const V4_MULTI_VALUE_SEPARATOR: char = '\0';

pub(crate) struct GenresIter<'a> {
	value: &'a str,
	pos: usize,
}

impl<'a> GenresIter<'a> {
	pub(crate) fn new(value: &'a str) -> GenresIter<'a> {
		GenresIter { value, pos: 0 }
	}
}

impl<'a> Iterator for GenresIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if self.pos >= self.value.len() {
				return None;
			}

			let remainder = &self.value[self.pos..];

			if let Some(escaped) = remainder.strip_prefix("((") {
				let end = escaped
					.find(V4_MULTI_VALUE_SEPARATOR)
					.unwrap_or(escaped.len());

				// Keep one of the parentheses
				let start = self.pos + 1;
				self.pos += 2 + end + 1;
				return Some(&self.value[start..start + 1 + end]);
			}

			if remainder.starts_with('(') {
				if let Some(close) = remainder.find(')') {
					self.pos += close + 1;

					let reference = &remainder[1..close];
					let genre = parse_reference(reference);

					// A refinement that repeats the referenced genre
					let rest = &self.value[self.pos..];
					let refinement_end = rest
						.find(['(', V4_MULTI_VALUE_SEPARATOR])
						.unwrap_or(rest.len());
					if rest[..refinement_end].eq_ignore_ascii_case(genre) {
						self.pos += refinement_end;
					}

					return Some(genre);
				}
			}

			let end = remainder
				.find(V4_MULTI_VALUE_SEPARATOR)
				.unwrap_or(remainder.len());
			self.pos += end + 1;

			let genre = &remainder[..end];
			if genre.is_empty() {
				continue;
			}

			return Some(parse_reference(genre));
		}
	}
}

fn parse_reference(genre: &str) -> &str {
	match genre {
		"RX" => "Remix",
		"CR" => "Cover",
		_ if genre.len() <= 3 => match genre.parse::<usize>() {
			Ok(index) if index < GENRES.len() => GENRES[index],
			_ => genre,
		},
		_ => genre,
	}
}

/// Format a genre name for a `TCON` frame in `version`
pub(crate) fn format_genre(genre: &str, version: Id3v2Version) -> Cow<'_, str> {
	if version == Id3v2Version::V4 {
		return Cow::Borrowed(genre);
	}

	if genre.eq_ignore_ascii_case("Remix") {
		return Cow::Borrowed("(RX)");
	}

	if genre.eq_ignore_ascii_case("Cover") {
		return Cow::Borrowed("(CR)");
	}

	if let Some(index) = genre_index(genre) {
		return Cow::Owned(format!("({index})"));
	}

	if genre.starts_with('(') {
		return Cow::Owned(format!("({genre}"));
	}

	Cow::Borrowed(genre)
}

//! Frame ordering used when writing a tag
//!
//! Frames are written "most important first": frames in the preferred list come first, in list
//! order, followed by every other frame sorted by ID.

use super::header::Id3v2Version;

use std::cmp::Ordering;

const V2_PREFERRED: &[&str] = &[
	"UFI", "TT2", "TP1", "TAL", "TCM", "TP3", "TT1", "TRK", "TYE", "TDA", "TIM", "TCO", "COM",
	"ULT", "PIC",
];

const V3_PREFERRED: &[&str] = &[
	"UFID", "TIT2", "TPE1", "TALB", "TSOA", "TCON", "TCOM", "TPE3", "TIT1", "TRCK", "TYER",
	"TDAT", "TIME", "TBPM", "TSRC", "TORY", "TPE2", "TPOS", "TCMP", "IPLS", "COMM", "USLT", "APIC",
];

const V4_PREFERRED: &[&str] = &[
	"UFID", "TIT2", "TPE1", "TALB", "TSOA", "TCON", "TCOM", "TPE3", "TIT1", "TRCK", "TDRC",
	"TBPM", "TSRC", "TDOR", "TPE2", "TPOS", "TCMP", "TIPL", "TMCL", "COMM", "USLT", "APIC",
];

/// Orders frame IDs by a preferred list
#[derive(Copy, Clone, Debug)]
pub(crate) struct FrameComparator {
	preferred: &'static [&'static str],
}

impl FrameComparator {
	pub(crate) const fn new(preferred: &'static [&'static str]) -> Self {
		Self { preferred }
	}

	pub(crate) fn for_version(version: Id3v2Version) -> Self {
		match version {
			Id3v2Version::V2 => Self::new(V2_PREFERRED),
			Id3v2Version::V3 => Self::new(V3_PREFERRED),
			Id3v2Version::V4 => Self::new(V4_PREFERRED),
		}
	}

	fn position(&self, id: &str) -> Option<usize> {
		self.preferred.iter().position(|p| *p == id)
	}

	pub(crate) fn compare(&self, a: &str, b: &str) -> Ordering {
		match (self.position(a), self.position(b)) {
			(Some(a), Some(b)) => a.cmp(&b),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => a.cmp(b),
		}
	}
}

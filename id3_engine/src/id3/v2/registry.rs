//! Static classification of frame IDs
//!
//! Every query in this module is a pure function over immutable tables. The conversion tables
//! come in two tiers:
//!
//! * [`convert`] maps IDs whose meaning and body layout are identical across versions (ex. `TT2` <-> `TIT2`)
//! * [`force`] maps IDs that exist in both versions, but require their body to be rebuilt (ex. `TDRC` -> `TYER`)
//!
//! Both only map between adjacent versions (ID3v2.2 <-> ID3v2.3 and ID3v2.3 <-> ID3v2.4), ID3v2.2 <-> ID3v2.4
//! conversions go through ID3v2.3.

use super::Id3v2Version;

use std::collections::HashMap;
use std::sync::LazyLock;

const V22_SUPPORTED: &[&str] = &[
	"BUF", "CNT", "COM", "CRA", "CRM", "ETC", "EQU", "GEO", "IPL", "LNK", "MCI", "MLL", "PIC",
	"POP", "REV", "RVA", "SLT", "STC", "TAL", "TBP", "TCM", "TCO", "TCR", "TDA", "TDY", "TEN",
	"TFT", "TIM", "TKE", "TLA", "TLE", "TMT", "TOA", "TOF", "TOL", "TOR", "TOT", "TP1", "TP2",
	"TP3", "TP4", "TPA", "TPB", "TRC", "TRD", "TRK", "TSI", "TSS", "TT1", "TT2", "TT3", "TXT",
	"TXX", "TYE", "UFI", "ULT", "WAF", "WAR", "WAS", "WCM", "WCP", "WPB", "WXX",
];

const V23_SUPPORTED: &[&str] = &[
	"AENC", "APIC", "COMM", "COMR", "ENCR", "EQUA", "ETCO", "GEOB", "GRID", "IPLS", "LINK", "MCDI",
	"MLLT", "OWNE", "PRIV", "PCNT", "POPM", "POSS", "RBUF", "RVAD", "RVRB", "SYLT", "SYTC", "TALB",
	"TBPM", "TCOM", "TCON", "TCOP", "TDAT", "TDLY", "TENC", "TEXT", "TFLT", "TIME", "TIT1", "TIT2",
	"TIT3", "TKEY", "TLAN", "TLEN", "TMED", "TOAL", "TOFN", "TOLY", "TOPE", "TORY", "TOWN", "TPE1",
	"TPE2", "TPE3", "TPE4", "TPOS", "TPUB", "TRCK", "TRDA", "TRSN", "TRSO", "TSIZ", "TSRC", "TSSE",
	"TYER", "TXXX", "UFID", "USER", "USLT", "WCOM", "WCOP", "WOAF", "WOAR", "WOAS", "WORS", "WPAY",
	"WPUB", "WXXX",
];

const V24_SUPPORTED: &[&str] = &[
	"AENC", "APIC", "ASPI", "COMM", "COMR", "ENCR", "EQU2", "ETCO", "GEOB", "GRID", "LINK", "MCDI",
	"MLLT", "OWNE", "PRIV", "PCNT", "POPM", "POSS", "RBUF", "RVA2", "RVRB", "SEEK", "SIGN", "SYLT",
	"SYTC", "TALB", "TBPM", "TCOM", "TCON", "TCOP", "TDEN", "TDLY", "TDOR", "TDRC", "TDRL", "TDTG",
	"TENC", "TEXT", "TFLT", "TIPL", "TIT1", "TIT2", "TIT3", "TKEY", "TLAN", "TLEN", "TMCL", "TMED",
	"TMOO", "TOAL", "TOFN", "TOLY", "TOPE", "TOWN", "TPE1", "TPE2", "TPE3", "TPE4", "TPOS", "TPRO",
	"TPUB", "TRCK", "TRSN", "TRSO", "TSOA", "TSOP", "TSOT", "TSRC", "TSSE", "TSST", "TXXX", "UFID",
	"USER", "USLT", "WCOM", "WCOP", "WOAF", "WOAR", "WOAS", "WORS", "WPAY", "WPUB", "WXXX",
];

// Non-standard frames written by iTunes and others
const V22_EXTENSIONS: &[&str] = &[
	"TCP", "TS2", "TSA", "TSC", "TSP", "TST", "GP1", "MVN", "MVI",
];
const V23_EXTENSIONS: &[&str] = &[
	"TCMP", "TSO2", "TSOC", "TSOA", "TSOP", "TSOT", "GRP1", "MVNM", "MVIN",
];
const V24_EXTENSIONS: &[&str] = &["TCMP", "TSO2", "TSOC", "GRP1", "MVNM", "MVIN"];

const V22_COMMON: &[&str] = &[
	"TT2", "TP1", "TP2", "TAL", "TYE", "TCO", "TCM", "TRK", "TPA", "COM", "ULT", "PIC", "TCP",
	"TS2", "TSA", "TSP", "TST",
];
const V23_COMMON: &[&str] = &[
	"TIT2", "TPE1", "TPE2", "TALB", "TYER", "TDAT", "TCON", "TCOM", "TRCK", "TPOS", "COMM", "USLT",
	"APIC", "TCMP", "TSO2", "TSOA", "TSOP", "TSOT",
];
const V24_COMMON: &[&str] = &[
	"TIT2", "TPE1", "TPE2", "TALB", "TDRC", "TCON", "TCOM", "TRCK", "TPOS", "COMM", "USLT", "APIC",
	"TCMP", "TSO2", "TSOA", "TSOP", "TSOT",
];

const V22_BINARY: &[&str] = &[
	"BUF", "CNT", "CRA", "CRM", "EQU", "ETC", "GEO", "LNK", "MCI", "MLL", "PIC", "POP", "REV",
	"RVA", "SLT", "STC", "UFI",
];
const V23_BINARY: &[&str] = &[
	"AENC", "APIC", "COMR", "ENCR", "EQUA", "ETCO", "GEOB", "GRID", "LINK", "MCDI", "MLLT", "OWNE",
	"PRIV", "PCNT", "POPM", "POSS", "RBUF", "RVAD", "RVRB", "SYLT", "SYTC", "UFID",
];
const V24_BINARY: &[&str] = &[
	"AENC", "APIC", "ASPI", "COMR", "ENCR", "EQU2", "ETCO", "GEOB", "GRID", "LINK", "MCDI", "MLLT",
	"OWNE", "PRIV", "PCNT", "POPM", "POSS", "RBUF", "RVA2", "RVRB", "SEEK", "SIGN", "SYLT", "SYTC",
	"UFID",
];

const V22_MULTIPLE: &[&str] = &[
	"TXX", "WXX", "COM", "ULT", "SLT", "PIC", "GEO", "UFI", "POP", "WCM", "WAR", "CRA", "CRM",
	"LNK", "EQU", "RVA",
];
const V23_MULTIPLE: &[&str] = &[
	"TXXX", "WXXX", "COMM", "USLT", "SYLT", "APIC", "GEOB", "UFID", "PRIV", "POPM", "WCOM", "WOAR",
	"AENC", "ENCR", "GRID", "LINK", "USER",
];
const V24_MULTIPLE: &[&str] = &[
	"TXXX", "WXXX", "COMM", "USLT", "SYLT", "APIC", "GEOB", "UFID", "PRIV", "POPM", "WCOM", "WOAR",
	"AENC", "ENCR", "GRID", "LINK", "USER", "RVA2", "EQU2", "SIGN",
];

const V22_DISCARD_IF_FILE_ALTERED: &[&str] = &[
	"CRA", "ETC", "EQU", "MLL", "SLT", "STC", "RVA", "TEN", "TLE", "TSI",
];
const V23_DISCARD_IF_FILE_ALTERED: &[&str] = &[
	"AENC", "ETCO", "EQUA", "MLLT", "POSS", "SYLT", "SYTC", "RVAD", "TENC", "TLEN", "TSIZ",
];
const V24_DISCARD_IF_FILE_ALTERED: &[&str] = &[
	"ASPI", "AENC", "ETCO", "EQU2", "MLLT", "POSS", "SEEK", "SYLT", "SYTC", "RVA2", "TENC", "TLEN",
];

// ID3v2.2 <-> ID3v2.3, identical bodies
const V22_V23_CONVERT: &[(&str, &str)] = &[
	("BUF", "RBUF"),
	("CNT", "PCNT"),
	("COM", "COMM"),
	("CRA", "AENC"),
	("ETC", "ETCO"),
	("EQU", "EQUA"),
	("GEO", "GEOB"),
	("IPL", "IPLS"),
	("LNK", "LINK"),
	("MCI", "MCDI"),
	("MLL", "MLLT"),
	("POP", "POPM"),
	("REV", "RVRB"),
	("RVA", "RVAD"),
	("SLT", "SYLT"),
	("STC", "SYTC"),
	("TAL", "TALB"),
	("TBP", "TBPM"),
	("TCM", "TCOM"),
	("TCO", "TCON"),
	("TCR", "TCOP"),
	("TDA", "TDAT"),
	("TDY", "TDLY"),
	("TEN", "TENC"),
	("TFT", "TFLT"),
	("TIM", "TIME"),
	("TKE", "TKEY"),
	("TLA", "TLAN"),
	("TLE", "TLEN"),
	("TMT", "TMED"),
	("TOA", "TOPE"),
	("TOF", "TOFN"),
	("TOL", "TOLY"),
	("TOR", "TORY"),
	("TOT", "TOAL"),
	("TP1", "TPE1"),
	("TP2", "TPE2"),
	("TP3", "TPE3"),
	("TP4", "TPE4"),
	("TPA", "TPOS"),
	("TPB", "TPUB"),
	("TRC", "TSRC"),
	("TRD", "TRDA"),
	("TRK", "TRCK"),
	("TSI", "TSIZ"),
	("TSS", "TSSE"),
	("TT1", "TIT1"),
	("TT2", "TIT2"),
	("TT3", "TIT3"),
	("TXT", "TEXT"),
	("TXX", "TXXX"),
	("TYE", "TYER"),
	("UFI", "UFID"),
	("ULT", "USLT"),
	("WAF", "WOAF"),
	("WAR", "WOAR"),
	("WAS", "WOAS"),
	("WCM", "WCOM"),
	("WCP", "WCOP"),
	("WPB", "WPUB"),
	("WXX", "WXXX"),
	// Extensions
	("TCP", "TCMP"),
	("TS2", "TSO2"),
	("TSA", "TSOA"),
	("TSC", "TSOC"),
	("TSP", "TSOP"),
	("TST", "TSOT"),
	("GP1", "GRP1"),
	("MVN", "MVNM"),
	("MVI", "MVIN"),
];

// The picture format changed from a 3 character image format to a MIME type
const V22_V23_FORCE: &[(&str, &str)] = &[("PIC", "APIC")];

const V23_V24_FORCE: &[(&str, &str)] = &[
	("TYER", "TDRC"),
	("TDAT", "TDRC"),
	("TIME", "TDRC"),
	("TORY", "TDOR"),
	("IPLS", "TIPL"),
	("RVAD", "RVA2"),
	("EQUA", "EQU2"),
];

const V24_V23_FORCE: &[(&str, &str)] = &[
	("TDRC", "TYER"),
	("TDOR", "TORY"),
	("TIPL", "IPLS"),
	("TMCL", "IPLS"),
	("RVA2", "RVAD"),
	("EQU2", "EQUA"),
];

type IdMap = HashMap<&'static str, &'static str>;

static V22_TO_V23: LazyLock<IdMap> = LazyLock::new(|| V22_V23_CONVERT.iter().copied().collect());
static V23_TO_V22: LazyLock<IdMap> = LazyLock::new(|| {
	V22_V23_CONVERT
		.iter()
		.map(|(v22, v23)| (*v23, *v22))
		.collect()
});

static V22_TO_V23_FORCE: LazyLock<IdMap> =
	LazyLock::new(|| V22_V23_FORCE.iter().copied().collect());
static V23_TO_V22_FORCE: LazyLock<IdMap> = LazyLock::new(|| {
	V22_V23_FORCE
		.iter()
		.map(|(v22, v23)| (*v23, *v22))
		.collect()
});
static V23_TO_V24_FORCE: LazyLock<IdMap> =
	LazyLock::new(|| V23_V24_FORCE.iter().copied().collect());
static V24_TO_V23_FORCE: LazyLock<IdMap> =
	LazyLock::new(|| V24_V23_FORCE.iter().copied().collect());

fn find(list: &'static [&'static str], id: &str) -> Option<&'static str> {
	list.iter().find(|item| **item == id).copied()
}

fn supported_list(version: Id3v2Version) -> (&'static [&'static str], &'static [&'static str]) {
	match version {
		Id3v2Version::V2 => (V22_SUPPORTED, V22_EXTENSIONS),
		Id3v2Version::V3 => (V23_SUPPORTED, V23_EXTENSIONS),
		Id3v2Version::V4 => (V24_SUPPORTED, V24_EXTENSIONS),
	}
}

/// Get the static form of a known ID, if it is known in `version`
fn known(version: Id3v2Version, id: &str) -> Option<&'static str> {
	let (supported, extensions) = supported_list(version);
	find(supported, id).or_else(|| find(extensions, id))
}

/// Whether `id` is a standard or well known extension frame in `version`
///
/// # Examples
///
/// ```rust
/// use id3_engine::id3::v2::Id3v2Version;
/// use id3_engine::id3::v2::registry::is_supported;
///
/// assert!(is_supported(Id3v2Version::V3, "TYER"));
/// assert!(!is_supported(Id3v2Version::V4, "TYER"));
/// ```
pub fn is_supported(version: Id3v2Version, id: &str) -> bool {
	known(version, id).is_some()
}

/// Whether `id` is a non-standard frame commonly written by other software
pub fn is_extension(version: Id3v2Version, id: &str) -> bool {
	let (_, extensions) = supported_list(version);
	find(extensions, id).is_some()
}

/// Whether `id` is one of the frames found in most tags
pub fn is_common(version: Id3v2Version, id: &str) -> bool {
	let list = match version {
		Id3v2Version::V2 => V22_COMMON,
		Id3v2Version::V3 => V23_COMMON,
		Id3v2Version::V4 => V24_COMMON,
	};

	find(list, id).is_some()
}

/// Whether `id` holds binary content, rather than text
pub fn is_binary(version: Id3v2Version, id: &str) -> bool {
	let list = match version {
		Id3v2Version::V2 => V22_BINARY,
		Id3v2Version::V3 => V23_BINARY,
		Id3v2Version::V4 => V24_BINARY,
	};

	find(list, id).is_some()
}

/// Whether a tag may hold more than one `id` frame
///
/// For some IDs (ex. `TXXX`, `COMM`), each frame must still be unique by its description.
pub fn is_multiple_allowed(version: Id3v2Version, id: &str) -> bool {
	let list = match version {
		Id3v2Version::V2 => V22_MULTIPLE,
		Id3v2Version::V3 => V23_MULTIPLE,
		Id3v2Version::V4 => V24_MULTIPLE,
	};

	find(list, id).is_some()
}

/// Whether `id` should be discarded when the audio is altered, regardless of its flags
pub fn is_discard_if_file_altered(version: Id3v2Version, id: &str) -> bool {
	let list = match version {
		Id3v2Version::V2 => V22_DISCARD_IF_FILE_ALTERED,
		Id3v2Version::V3 => V23_DISCARD_IF_FILE_ALTERED,
		Id3v2Version::V4 => V24_DISCARD_IF_FILE_ALTERED,
	};

	find(list, id).is_some()
}

/// Map `id` to its equivalent in an adjacent version, where the body layout is identical
///
/// Converting to the same version returns the ID if it is known in that version.
///
/// # Examples
///
/// ```rust
/// use id3_engine::id3::v2::Id3v2Version;
/// use id3_engine::id3::v2::registry::convert;
///
/// assert_eq!(convert(Id3v2Version::V2, Id3v2Version::V3, "TT2"), Some("TIT2"));
/// assert_eq!(convert(Id3v2Version::V4, Id3v2Version::V3, "TIT2"), Some("TIT2"));
///
/// // Needs its body rebuilt, see `force`
/// assert_eq!(convert(Id3v2Version::V4, Id3v2Version::V3, "TDRC"), None);
/// ```
pub fn convert(from: Id3v2Version, to: Id3v2Version, id: &str) -> Option<&'static str> {
	match (from, to) {
		(from, to) if from == to => known(from, id),
		(Id3v2Version::V2, Id3v2Version::V3) => V22_TO_V23.get(id).copied(),
		(Id3v2Version::V3, Id3v2Version::V2) => V23_TO_V22.get(id).copied(),
		(Id3v2Version::V3, Id3v2Version::V4) | (Id3v2Version::V4, Id3v2Version::V3) => {
			let source = known(from, id)?;
			// ID3v2.3 and ID3v2.4 share most IDs, but the force mappings take precedence
			if force(from, to, id).is_some() {
				return None;
			}

			known(to, source)
		},
		_ => None,
	}
}

/// Map `id` to its equivalent in an adjacent version, where the body must be rebuilt
///
/// # Examples
///
/// ```rust
/// use id3_engine::id3::v2::Id3v2Version;
/// use id3_engine::id3::v2::registry::force;
///
/// assert_eq!(force(Id3v2Version::V4, Id3v2Version::V3, "TDRC"), Some("TYER"));
/// assert_eq!(force(Id3v2Version::V2, Id3v2Version::V3, "PIC"), Some("APIC"));
/// ```
pub fn force(from: Id3v2Version, to: Id3v2Version, id: &str) -> Option<&'static str> {
	let map = match (from, to) {
		(Id3v2Version::V2, Id3v2Version::V3) => &V22_TO_V23_FORCE,
		(Id3v2Version::V3, Id3v2Version::V2) => &V23_TO_V22_FORCE,
		(Id3v2Version::V3, Id3v2Version::V4) => &V23_TO_V24_FORCE,
		(Id3v2Version::V4, Id3v2Version::V3) => &V24_TO_V23_FORCE,
		_ => return None,
	};

	map.get(id).copied()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test_log::test]
	fn convert_tables_invert() {
		for (v22, v23) in V22_V23_CONVERT {
			assert_eq!(convert(Id3v2Version::V2, Id3v2Version::V3, v22), Some(*v23));
			assert_eq!(convert(Id3v2Version::V3, Id3v2Version::V2, v23), Some(*v22));
		}

		assert_eq!(
			force(Id3v2Version::V3, Id3v2Version::V2, "APIC"),
			Some("PIC")
		);
	}

	#[test_log::test]
	fn every_mapping_is_known() {
		for (v22, v23) in V22_V23_CONVERT.iter().chain(V22_V23_FORCE) {
			assert!(is_supported(Id3v2Version::V2, v22), "{v22}");
			assert!(is_supported(Id3v2Version::V3, v23), "{v23}");
		}

		for (v23, v24) in V23_V24_FORCE {
			assert!(is_supported(Id3v2Version::V3, v23), "{v23}");
			assert!(is_supported(Id3v2Version::V4, v24), "{v24}");
		}

		for (v24, v23) in V24_V23_FORCE {
			assert!(is_supported(Id3v2Version::V4, v24), "{v24}");
			assert!(is_supported(Id3v2Version::V3, v23), "{v23}");
		}
	}

	#[test_log::test]
	fn classification_lists_are_supported() {
		for version in Id3v2Version::ALL {
			let lists = match version {
				Id3v2Version::V2 => [
					V22_COMMON,
					V22_BINARY,
					V22_MULTIPLE,
					V22_DISCARD_IF_FILE_ALTERED,
				],
				Id3v2Version::V3 => [
					V23_COMMON,
					V23_BINARY,
					V23_MULTIPLE,
					V23_DISCARD_IF_FILE_ALTERED,
				],
				Id3v2Version::V4 => [
					V24_COMMON,
					V24_BINARY,
					V24_MULTIPLE,
					V24_DISCARD_IF_FILE_ALTERED,
				],
			};

			for id in lists.into_iter().flatten() {
				assert!(is_supported(version, id), "{version}: {id}");
				assert_eq!(id.len(), version.id_len(), "{version}: {id}");
			}
		}
	}

	#[test_log::test]
	fn v23_v24_identity() {
		assert_eq!(
			convert(Id3v2Version::V3, Id3v2Version::V4, "TIT2"),
			Some("TIT2")
		);
		assert_eq!(
			convert(Id3v2Version::V3, Id3v2Version::V4, "TSOA"),
			Some("TSOA")
		);

		// Removed in ID3v2.4, with no replacement
		assert_eq!(convert(Id3v2Version::V3, Id3v2Version::V4, "TSIZ"), None);
		assert_eq!(force(Id3v2Version::V3, Id3v2Version::V4, "TSIZ"), None);

		// Added in ID3v2.4
		assert_eq!(convert(Id3v2Version::V4, Id3v2Version::V3, "TMOO"), None);
		assert!(is_extension(Id3v2Version::V3, "TSOA"));
		assert!(!is_extension(Id3v2Version::V4, "TSOA"));
	}

	#[test_log::test]
	fn predicates() {
		assert!(is_multiple_allowed(Id3v2Version::V4, "TXXX"));
		assert!(!is_multiple_allowed(Id3v2Version::V4, "TIT2"));
		assert!(is_binary(Id3v2Version::V3, "APIC"));
		assert!(!is_binary(Id3v2Version::V3, "TIT2"));
		assert!(is_common(Id3v2Version::V2, "TT2"));
		assert!(is_discard_if_file_altered(Id3v2Version::V4, "TLEN"));
		assert!(!is_discard_if_file_altered(Id3v2Version::V4, "TIT2"));
	}
}

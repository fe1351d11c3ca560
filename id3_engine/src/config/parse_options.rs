/// The parsing strictness mode
///
/// # Examples
///
/// ```rust
/// use id3_engine::config::{ParseOptions, ParsingMode};
///
/// // We only want to read standard-compliant inputs
/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
/// ```
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// ## Examples of behavior
	///
	/// * A frame declares a size of zero - The parser will error and the entire tag is discarded
	/// * A frame's content cannot be decoded - The parser will error and the entire tag is discarded
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// Conditions that only corrupt a single frame are isolated, the frame is skipped and tallied,
	/// and the rest of the tag is still read.
	///
	/// ## Examples of behavior
	///
	/// * A frame declares a size of zero - The frame is skipped and counted as empty
	/// * A frame's content cannot be decoded - The frame is skipped and counted as invalid
	#[default]
	BestAttempt,
	/// Least eager to error, may produce invalid/partial output
	///
	/// In addition to the [`BestAttempt`](Self::BestAttempt) behavior, a frame whose content
	/// cannot be decoded is kept as raw bytes ([`FrameBody::Unsupported`](crate::id3::v2::FrameBody::Unsupported))
	/// rather than dropped. It is still counted as invalid.
	Relaxed,
}

/// Options to control how tags are parsed
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) implicit_conversions: bool,
}

impl Default for ParseOptions {
	/// The default implementation for `ParseOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// 	implicit_conversions: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Creates a new `ParseOptions`, alias for `Default` implementation
	///
	/// See also: [`ParseOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			implicit_conversions: true,
		}
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::{ParseOptions, ParsingMode};
	///
	/// // By default, `parsing_mode` is ParsingMode::BestAttempt. Here, we need absolute correctness.
	/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// Whether or not to convert frames that belong to a neighboring version
	///
	/// Some applications write ID3v2.3 frames (ex. "TYER") into ID3v2.4 tags, or ID3v2.2 frame IDs into
	/// ID3v2.3 tags. With this enabled, those frames are converted to the tag's version as they are read.
	/// Otherwise, they are preserved as unsupported frames.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::ParseOptions;
	///
	/// // By default, `implicit_conversions` is enabled. Here, we want frames kept as-is.
	/// let parsing_options = ParseOptions::new().implicit_conversions(false);
	/// ```
	pub fn implicit_conversions(&mut self, implicit_conversions: bool) -> Self {
		self.implicit_conversions = implicit_conversions;
		*self
	}
}

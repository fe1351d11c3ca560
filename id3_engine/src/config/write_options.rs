/// Options to control how tags are written
///
/// This is best used as an application global config that gets set once.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) shrink_padding: bool,
	pub(crate) unsynchronisation: bool,
	pub(crate) lossy_text_encoding: bool,
	pub(crate) write_deprecated: bool,
}

impl WriteOptions {
	/// Default preferred padding size in bytes
	pub const DEFAULT_PREFERRED_PADDING: u32 = 1024;

	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			preferred_padding: Some(Self::DEFAULT_PREFERRED_PADDING),
			shrink_padding: false,
			unsynchronisation: false,
			lossy_text_encoding: false,
			write_deprecated: true,
		}
	}

	/// Set the preferred padding size in bytes
	///
	/// When a tag no longer fits in the space it was read from (or was never read at all),
	/// it grows by this many bytes of padding, leaving room for future edits.
	///
	/// NOTES:
	///
	/// * A tag that was read keeps its existing size if the new frames still fit
	/// * Tags with a footer never carry padding
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::WriteOptions;
	///
	/// // I really don't want my files rewritten, so I'll double the padding size!
	/// let options = WriteOptions::new().preferred_padding(2048);
	///
	/// // ...Or I don't want padding under any circumstances!
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		match preferred_padding {
			0 => self.preferred_padding = None,
			_ => self.preferred_padding = Some(preferred_padding),
		}
		self
	}

	/// Whether to discard all padding, making the tag an exact fit for its frames
	///
	/// This takes precedence over both [`WriteOptions::preferred_padding`] and any space
	/// left over from a previously read tag.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::WriteOptions;
	///
	/// let options = WriteOptions::new().shrink_padding(true);
	/// ```
	pub fn shrink_padding(mut self, shrink_padding: bool) -> Self {
		self.shrink_padding = shrink_padding;
		self
	}

	/// Whether to unsynchronise the tag when its content requires it
	///
	/// When enabled, any frame data containing a false MPEG sync signal (`0xFF` followed by a
	/// byte >= `0xE0`, or `0xFF 0x00`) will be unsynchronised, and the tag will be flagged
	/// accordingly. For ID3v2.4, this is done per frame.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::WriteOptions;
	///
	/// // Some old players choke on false sync signals
	/// let options = WriteOptions::new().unsynchronisation(true);
	/// ```
	pub fn unsynchronisation(mut self, unsynchronisation: bool) -> Self {
		self.unsynchronisation = unsynchronisation;
		self
	}

	/// Whether to replace characters that cannot be encoded with `?`
	///
	/// This only applies to text with [`TextEncoding::Latin1`](crate::TextEncoding::Latin1).
	/// Otherwise, writing errors with [`ErrorKind::TextEncode`](crate::error::ErrorKind::TextEncode).
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::WriteOptions;
	///
	/// let options = WriteOptions::new().lossy_text_encoding(true);
	/// ```
	pub fn lossy_text_encoding(mut self, lossy_text_encoding: bool) -> Self {
		self.lossy_text_encoding = lossy_text_encoding;
		self
	}

	/// Whether to write frames that were kept during a version conversion despite not being
	/// part of the target version
	///
	/// See [`FrameBody::Deprecated`](crate::id3::v2::FrameBody::Deprecated).
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::config::WriteOptions;
	///
	/// // Only write frames that belong to the tag's version
	/// let options = WriteOptions::new().write_deprecated(false);
	/// ```
	pub fn write_deprecated(mut self, write_deprecated: bool) -> Self {
		self.write_deprecated = write_deprecated;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	/// 	preferred_padding: 1024,
	/// 	shrink_padding: false,
	/// 	unsynchronisation: false,
	/// 	lossy_text_encoding: false,
	/// 	write_deprecated: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

use super::Id3v2Tag;
use crate::error::Result;
use crate::id3::v2::frame::{Frame, FrameBody, FrameFlags, preferred_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::items::{AttachedPictureFrame, PictureType, v2_image_format};
use crate::macros::id3v2_err;

/// An image attached to a tag, independent of the tag version
///
/// This is stored in an `APIC` (`PIC` in ID3v2.2) frame, see [`Id3v2Tag::create_artwork_field`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Artwork {
	/// The image's MIME type (ex. "image/jpeg")
	pub mime_type: String,
	/// The picture type
	pub picture_type: PictureType,
	/// The image's description
	pub description: String,
	/// The image data
	pub data: Vec<u8>,
}

impl Artwork {
	/// Create a new [`Artwork`] with an empty description
	pub fn new(mime_type: impl Into<String>, picture_type: PictureType, data: Vec<u8>) -> Self {
		Self {
			mime_type: mime_type.into(),
			picture_type,
			description: String::new(),
			data,
		}
	}
}

impl From<&AttachedPictureFrame> for Artwork {
	fn from(picture: &AttachedPictureFrame) -> Self {
		Self {
			mime_type: picture.mime_type.clone(),
			picture_type: picture.picture_type,
			description: picture.description.clone(),
			data: picture.data.clone(),
		}
	}
}

impl Id3v2Tag {
	/// Every picture in the tag
	pub fn pictures(&self) -> impl Iterator<Item = &AttachedPictureFrame> {
		self.frames().filter_map(|frame| match frame.body() {
			FrameBody::Picture(picture) => Some(picture),
			_ => None,
		})
	}

	/// The first picture in the tag
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_engine::id3::v2::{Artwork, Id3v2Tag, Id3v2Version, PictureType};
	///
	/// # fn main() -> id3_engine::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	/// assert!(tag.first_artwork().is_none());
	///
	/// let artwork = Artwork::new("image/png", PictureType::CoverFront, vec![0x89, b'P', b'N', b'G']);
	/// tag.set_artwork(&artwork)?;
	///
	/// assert_eq!(tag.first_artwork(), Some(artwork));
	/// # Ok(()) }
	/// ```
	pub fn first_artwork(&self) -> Option<Artwork> {
		self.pictures().next().map(Artwork::from)
	}

	/// Create a picture frame for the tag's version
	///
	/// # Errors
	///
	/// * ID3v2.2: The MIME type has no 3 character image format (ex. "image/webp")
	pub fn create_artwork_field(&self, artwork: &Artwork) -> Result<Frame> {
		let id = match self.version {
			Id3v2Version::V2 => {
				if v2_image_format(&artwork.mime_type).is_none() {
					return Err(id3v2_err!(BadPictureFormat(artwork.mime_type.clone())));
				}

				"PIC"
			},
			Id3v2Version::V3 | Id3v2Version::V4 => "APIC",
		};

		let picture = AttachedPictureFrame {
			encoding: preferred_encoding(self.version, &artwork.description),
			mime_type: artwork.mime_type.clone(),
			picture_type: artwork.picture_type,
			description: artwork.description.clone(),
			data: artwork.data.clone(),
		};

		Frame::new(
			id,
			self.version,
			FrameFlags::default(),
			FrameBody::Picture(picture),
		)
	}

	/// Add a picture, replacing any picture of the same type
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::create_artwork_field`]
	pub fn set_artwork(&mut self, artwork: &Artwork) -> Result<()> {
		let frame = self.create_artwork_field(artwork)?;
		self.remove_artwork(artwork.picture_type);
		self.insert(frame);

		Ok(())
	}

	/// Add a picture
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::create_artwork_field`]
	pub fn add_artwork(&mut self, artwork: &Artwork) -> Result<()> {
		let frame = self.create_artwork_field(artwork)?;
		self.insert(frame);

		Ok(())
	}

	/// Remove every picture of the given type
	pub fn remove_artwork(&mut self, picture_type: PictureType) {
		self.retain(|frame| match frame.body() {
			FrameBody::Picture(picture) => picture.picture_type != picture_type,
			_ => true,
		});
	}
}

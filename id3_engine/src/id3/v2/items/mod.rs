mod attached_picture_frame;
mod binary_frame;
mod extended_text_frame;
mod extended_url_frame;
mod key_value_frame;
mod language_frame;
mod number_total_frame;
mod popularimeter;
mod text_information_frame;
mod unique_file_identifier;
mod url_link_frame;

pub use attached_picture_frame::{AttachedPictureFrame, PictureType};
pub(crate) use attached_picture_frame::v2_image_format;
pub use binary_frame::BinaryFrame;
pub use extended_text_frame::ExtendedTextFrame;
pub use extended_url_frame::ExtendedUrlFrame;
pub use key_value_frame::KeyValueFrame;
pub use language_frame::LanguageFrame;
pub use number_total_frame::NumberTotalFrame;
pub use popularimeter::PopularimeterFrame;
pub use text_information_frame::TextInformationFrame;
pub use unique_file_identifier::UniqueFileIdentifierFrame;
pub use url_link_frame::UrlLinkFrame;

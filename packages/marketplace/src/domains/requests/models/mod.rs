mod filter;
mod images;
mod request;

pub use filter::RequestFilter;
pub use images::{attach_images, mime_for_file, ImageAttachment, MAX_IMAGES, MAX_IMAGE_BYTES};
pub use request::{NewRequest, Request, RequestDetails};

//! Image attachments for requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ValidationError;

/// Images per request.
pub const MAX_IMAGES: usize = 5;

/// Size limit per image (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// A validated image ready to be stored inline as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    data_uri: String,
}

impl ImageAttachment {
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Result<Self, ValidationError> {
        let mime = mime.trim().to_ascii_lowercase();
        if !mime.starts_with("image/") {
            return Err(ValidationError::NotAnImage(mime));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::ImageTooLarge {
                size: bytes.len(),
                max_bytes: MAX_IMAGE_BYTES,
            });
        }

        Ok(Self {
            data_uri: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
        })
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn into_data_uri(self) -> String {
        self.data_uri
    }
}

/// MIME type guessed from a file name's extension. Unknown extensions map to
/// `application/octet-stream`, which [`ImageAttachment::from_bytes`] refuses.
pub fn mime_for_file(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Append attachments to an image list without exceeding [`MAX_IMAGES`].
/// Nothing is added when the batch would overflow.
pub fn attach_images(
    images: &mut Vec<String>,
    batch: Vec<ImageAttachment>,
) -> Result<(), ValidationError> {
    let count = images.len() + batch.len();
    if count > MAX_IMAGES {
        return Err(ValidationError::TooManyImages {
            count,
            max: MAX_IMAGES,
        });
    }
    images.extend(batch.into_iter().map(ImageAttachment::into_data_uri));
    Ok(())
}

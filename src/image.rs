//! Image payloads and the placeholder image fallback.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::DecodeError;
use crate::gemini::InlineData;
use crate::models::Recipe;

const PLACEHOLDER_HOST: &str = "https://loremflickr.com/800/600";

/// An image returned by the service: media type plus base64 payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

impl ImagePayload {
    /// Build a payload from an inline-data part, checking the base64.
    pub fn from_inline(inline: &InlineData) -> Result<Self, DecodeError> {
        if inline.data.is_empty() {
            return Err(DecodeError::NoImageReturned);
        }
        STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| DecodeError::InvalidImageData(e.to_string()))?;
        Ok(Self {
            mime_type: inline.mime_type.clone(),
            data: inline.data.clone(),
        })
    }

    /// Parse a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (mime_type, data) = rest.split_once(";base64,")?;
        if mime_type.is_empty() || data.is_empty() {
            return None;
        }
        Some(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> Result<Vec<u8>, DecodeError> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| DecodeError::InvalidImageData(e.to_string()))
    }

    pub fn to_inline(&self) -> InlineData {
        InlineData {
            mime_type: self.mime_type.clone(),
            data: self.data.clone(),
        }
    }
}

/// Placeholder photo URL for a recipe without a generated image.
///
/// The recipe id pins the lookup so the same recipe keeps the same photo.
pub fn placeholder_image_url(recipe: &Recipe) -> String {
    format!(
        "{}/{},food/all?lock={}",
        PLACEHOLDER_HOST,
        urlencoding::encode(&recipe.image_keyword),
        urlencoding::encode(&recipe.id)
    )
}

/// Where a recipe's header image should come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// Generated or edited image, as a data URI
    Custom(&'a str),
    /// Public photo lookup by keyword
    Placeholder(String),
}

impl Recipe {
    /// `None` when images are switched off. If a placeholder fetch fails
    /// the caller falls back to a text-only header.
    pub fn image_source(&self, show_images: bool) -> Option<ImageSource<'_>> {
        if !show_images {
            return None;
        }
        match self.custom_image.as_deref() {
            Some(uri) => Some(ImageSource::Custom(uri)),
            None => Some(ImageSource::Placeholder(placeholder_image_url(self))),
        }
    }
}

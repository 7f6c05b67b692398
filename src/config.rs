//! Client configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::error::ChefError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_DATA_DIR: &str = ".smart-chef";

/// Value shipped in template `.env` files; treated as unset.
const PLACEHOLDER_API_KEY: &str = "PLACEHOLDER_API_KEY";

/// Credential variables, in lookup order.
const API_KEY_VARS: [&str; 2] = ["NEXT_PUBLIC_GEMINI_API_KEY", "GEMINI_API_KEY"];

fn api_key_from(var: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_VARS.iter().find_map(|&name| var(name))
}

#[derive(Debug, Clone)]
pub struct ChefConfig {
    api_key: Option<String>,
    pub base_url: String,
    /// Model used for recipe and weekly-plan generation
    pub text_model: String,
    /// Model used for image generation and editing
    pub image_model: String,
    /// Directory backing the local profile store
    pub data_dir: PathBuf,
}

impl Default for ChefConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl ChefConfig {
    /// Load configuration, reading a `.env` file first if one exists.
    ///
    /// - `NEXT_PUBLIC_GEMINI_API_KEY`, else `GEMINI_API_KEY`: API credential
    /// - `SMART_CHEF_BASE_URL`: API base URL
    /// - `SMART_CHEF_TEXT_MODEL`: model for structured output
    /// - `SMART_CHEF_IMAGE_MODEL`: model for images
    /// - `SMART_CHEF_DATA_DIR`: profile storage directory
    ///
    /// A missing key is not an error here; it is reported on first use.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_key = api_key_from(|name| env::var(name).ok());

        let defaults = Self::default();
        Self {
            api_key,
            base_url: env::var("SMART_CHEF_BASE_URL").unwrap_or(defaults.base_url),
            text_model: env::var("SMART_CHEF_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: env::var("SMART_CHEF_IMAGE_MODEL").unwrap_or(defaults.image_model),
            data_dir: env::var("SMART_CHEF_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The configured credential, or a configuration error if it is absent,
    /// blank, or still the template placeholder.
    pub fn api_key(&self) -> Result<&str, ChefError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
            _ => Err(ChefError::Configuration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_configuration_error() {
        let config = ChefConfig::default();
        assert!(config.api_key().unwrap_err().is_configuration());
    }

    #[test]
    fn placeholder_and_blank_keys_are_rejected() {
        for key in ["PLACEHOLDER_API_KEY", "", "   "] {
            let config = ChefConfig::default().with_api_key(key);
            assert!(config.api_key().is_err(), "key {:?} should be rejected", key);
        }
    }

    #[test]
    fn public_key_variable_takes_precedence() {
        let both = |name: &str| match name {
            "NEXT_PUBLIC_GEMINI_API_KEY" => Some("public".to_string()),
            "GEMINI_API_KEY" => Some("server".to_string()),
            _ => None,
        };
        assert_eq!(api_key_from(both).as_deref(), Some("public"));

        let server_only = |name: &str| (name == "GEMINI_API_KEY").then(|| "server".to_string());
        assert_eq!(api_key_from(server_only).as_deref(), Some("server"));
        assert_eq!(api_key_from(|_| None), None);
    }

    #[test]
    fn real_key_is_accepted() {
        let config = ChefConfig::default().with_api_key("abc123");
        assert_eq!(config.api_key().unwrap(), "abc123");
    }
}

//! Recipe and weekly meal-plan generation on top of the Gemini API.
//!
//! [`client::ChefClient`] turns user ingredients, restrictions and health
//! data into structured requests and decodes the replies into
//! [`models`] types. [`profile::ProfileStore`] keeps the user's saved
//! restrictions, favorites and health data in a local key-value slot.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod gemini;
pub mod image;
pub mod models;
pub mod nutrition;
pub mod profile;
pub mod prompts;
pub mod schema;

pub use client::ChefClient;
pub use config::ChefConfig;
pub use error::{ChefError, DecodeError, Operation};

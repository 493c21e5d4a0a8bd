//! Clients for the image-generation and chat provider plus image storage.
//!
//! The provider speaks the OpenAI REST dialect; generated images are kept
//! either on Cloudinary or on local disk.

pub mod config;
pub mod error;
pub mod generator;
pub mod openai;
pub mod storage;

pub use config::AiConfig;
pub use error::AiError;
pub use generator::{ImageRequest, MealImageGenerator};
pub use openai::OpenAiClient;

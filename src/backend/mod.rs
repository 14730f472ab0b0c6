pub mod client;
pub mod gemini;
pub mod media;
pub mod utils;

pub use client::LLMClient;
pub use gemini::{GeminiClient, GeminiConfig, Model as GeminiModel};
pub use media::MediaFile;
pub use utils::{check_response_status, handle_http_error};

//! Language-model seam: settings, the provider trait, and the Gemini client.

pub mod gemini;
pub mod provider;
pub mod settings;

pub use gemini::GeminiClient;
pub use provider::{LanguageModel, ModelReply};
pub use settings::ModelSettings;

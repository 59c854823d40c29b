pub mod prompt;
pub mod service;

pub use crate::domain::model::{GenerationRequest, PathSuggestionRequest, PathSuggestionResponse};
pub use crate::domain::ports::{ConfigProvider, ProviderKind, TextGenerationProvider};
pub use crate::utils::error::Result;

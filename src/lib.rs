pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::ProviderClient;
pub use config::toml_config::TomlConfig;
pub use core::service::PathSuggestionService;
pub use domain::model::{PathSuggestionRequest, PathSuggestionResponse, SuggestionReport};
pub use domain::ports::{ConfigProvider, ProviderKind, TextGenerationProvider};
pub use utils::error::{Result, SuggestError};

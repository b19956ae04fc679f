//! Project configuration: `composer.json` settings and their resolved form.
/// Config file loader
mod loader;
/// Resolved project layout
mod project;
/// Configuration types and settings
mod types;

pub use project::Project;
pub use types::{
    ConfigError,
    DEFAULT_BASE_LANGUAGE,
    ToolboxSettings,
    ValidationError,
};

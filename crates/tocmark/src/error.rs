//! CLI error types.

use tocmark_config::ConfigError;
use tocmark_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{failed} of {total} documents failed to render")]
    Build { failed: usize, total: usize },

    #[error("{0}")]
    Validation(String),
}

//! Configuration management for tocmark.
//!
//! Parses `tocmark.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Path values support `~`, `${VAR}` and `${VAR:-default}` expansion:
//! - `build.source_dir`
//! - `build.output_dir`

mod expand;

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use tocmark_renderer::{AnchorOptions, ListType, RenderOptions, TocOptions};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override markdown source directory.
    pub source_dir: Option<PathBuf>,
    /// Override HTML output directory.
    pub output_dir: Option<PathBuf>,
    /// Override linkify flag.
    pub linkify: Option<bool>,
    /// Override code block class prefix.
    pub lang_prefix: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tocmark.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown parsing configuration.
    pub markdown: MarkdownConfig,
    /// Heading anchor configuration.
    pub anchors: AnchorsConfig,
    /// Table of contents configuration.
    pub toc: TocConfig,
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Markdown parsing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Convert bare URLs to links.
    pub linkify: bool,
    /// Class prefix for fenced code blocks.
    pub lang_prefix: String,
    /// Pass raw HTML through.
    pub html: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            linkify: options.linkify,
            lang_prefix: options.lang_prefix,
            html: options.html,
        }
    }
}

/// Heading anchor configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnchorsConfig {
    pub permalink: bool,
    pub permalink_symbol: String,
    pub permalink_class: String,
}

impl Default for AnchorsConfig {
    fn default() -> Self {
        let options = AnchorOptions::default();
        Self {
            permalink: options.permalink,
            permalink_symbol: options.permalink_symbol,
            permalink_class: options.permalink_class,
        }
    }
}

/// Table of contents configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Heading levels listed in the table of contents.
    pub include_levels: Vec<u8>,
    /// Placeholder paragraph text.
    pub marker: String,
    /// Class of the container element.
    pub container_class: String,
    /// `ul` or `ol`.
    pub list_type: ListType,
}

impl Default for TocConfig {
    fn default() -> Self {
        let options = TocOptions::default();
        Self {
            include_levels: options.include_levels,
            marker: options.marker,
            container_class: options.container_class,
            list_type: options.list_type,
        }
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    exclude: Vec<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory searched for markdown files.
    pub source_dir: PathBuf,
    /// Directory receiving rendered HTML fragments.
    pub output_dir: PathBuf,
    /// Patterns (relative to `source_dir`) of files to skip.
    pub exclude: Vec<glob::Pattern>,
}

impl BuildConfig {
    /// Whether a path relative to `source_dir` matches an exclude pattern.
    #[must_use]
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.output_dir`").
        field: String,
        /// Error message.
        message: String,
    },
}

/// Make `path` absolute and drop `.` and `..` components without touching the
/// filesystem, so differently spelled paths to one directory compare equal.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tocmark.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Renderer options described by this configuration.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            linkify: self.markdown.linkify,
            lang_prefix: self.markdown.lang_prefix.clone(),
            html: self.markdown.html,
            anchors: AnchorOptions {
                permalink: self.anchors.permalink,
                permalink_symbol: self.anchors.permalink_symbol.clone(),
                permalink_class: self.anchors.permalink_class.clone(),
            },
            toc: TocOptions {
                include_levels: self.toc.include_levels.clone(),
                marker: self.toc.marker.clone(),
                container_class: self.toc.container_class.clone(),
                list_type: self.toc.list_type,
            },
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.build_resolved.source_dir = normalize_path(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir = normalize_path(output_dir);
        }
        if let Some(linkify) = settings.linkify {
            self.markdown.linkify = linkify;
        }
        if let Some(lang_prefix) = &settings.lang_prefix {
            self.markdown.lang_prefix.clone_from(lang_prefix);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            markdown: MarkdownConfig::default(),
            anchors: AnchorsConfig::default(),
            toc: TocConfig::default(),
            build: BuildConfigRaw::default(),
            build_resolved: BuildConfig {
                source_dir: normalize_path(&base.join("content")),
                output_dir: normalize_path(&base.join("dist")),
                exclude: Vec::new(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_markdown()?;
        self.validate_anchors()?;
        self.validate_toc()?;
        self.validate_build()?;
        Ok(())
    }

    fn validate_markdown(&self) -> Result<(), ConfigError> {
        let prefix = &self.markdown.lang_prefix;
        if prefix
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>'))
        {
            return Err(ConfigError::Validation(format!(
                "markdown.lang_prefix contains characters not allowed in a class name: {prefix:?}"
            )));
        }
        Ok(())
    }

    fn validate_anchors(&self) -> Result<(), ConfigError> {
        if self.anchors.permalink {
            require_non_empty(&self.anchors.permalink_symbol, "anchors.permalink_symbol")?;
            require_non_empty(&self.anchors.permalink_class, "anchors.permalink_class")?;
        }
        Ok(())
    }

    fn validate_toc(&self) -> Result<(), ConfigError> {
        if self.toc.include_levels.is_empty() {
            return Err(ConfigError::Validation(
                "toc.include_levels cannot be empty".to_owned(),
            ));
        }
        if let Some(level) = self
            .toc
            .include_levels
            .iter()
            .find(|level| !(1..=6).contains(*level))
        {
            return Err(ConfigError::Validation(format!(
                "toc.include_levels must be between 1 and 6, got {level}"
            )));
        }
        require_non_empty(&self.toc.marker, "toc.marker")?;
        require_non_empty(&self.toc.container_class, "toc.container_class")?;
        Ok(())
    }

    fn validate_build(&self) -> Result<(), ConfigError> {
        if normalize_path(&self.build_resolved.source_dir)
            == normalize_path(&self.build_resolved.output_dir)
        {
            return Err(ConfigError::Validation(
                "build.output_dir must differ from build.source_dir".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in path values.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.build.source_dir {
            self.build.source_dir = Some(expand::expand_env(dir, "build.source_dir")?);
        }
        if let Some(ref dir) = self.build.output_dir {
            self.build.output_dir = Some(expand::expand_env(dir, "build.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory and compile
    /// exclude patterns.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve =
            |path: Option<&str>, default: &str| normalize_path(&config_dir.join(path.unwrap_or(default)));

        let exclude = self
            .build
            .exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| {
                    ConfigError::Validation(format!("build.exclude pattern {p:?} is invalid: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.build_resolved = BuildConfig {
            source_dir: resolve(self.build.source_dir.as_deref(), "content"),
            output_dir: resolve(self.build.output_dir.as_deref(), "dist"),
            exclude,
        };

        Ok(())
    }
}

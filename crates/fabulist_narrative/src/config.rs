//! Engine configuration.
//!
//! Configuration is layered with the `config` crate:
//! - Bundled defaults (include_str! from fabulist.toml)
//! - User overrides (~/.config/fabulist/fabulist.toml, then ./fabulist.toml)
//!
//! Later sources override earlier ones.

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use fabulist_core::GenerationKind;
use fabulist_error::{ConfigError, FabulistError, FabulistResult};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use std::time::Duration;
use tracing::{debug, instrument};

/// Attempts allowed when nothing else is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Hard ceiling on speakers in one story.
pub const MAX_SPEAKERS: u32 = 4;

/// Attempt budget per request kind.
///
/// # Example
///
/// ```toml
/// [max_attempts]
/// scene_plan = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default, deny_unknown_fields)]
pub struct AttemptBudgets {
    /// Outline requests
    outline: u32,
    /// One outline part's sections and segments
    story_part: u32,
    /// Segment regeneration
    segment: u32,
    /// Scene plan for a panel batch
    scene_plan: u32,
    /// One panel image
    panel_image: u32,
    /// One image edit
    image_edit: u32,
}

impl AttemptBudgets {
    /// The same budget for every request kind.
    pub fn uniform(max_attempts: u32) -> Self {
        Self {
            outline: max_attempts,
            story_part: max_attempts,
            segment: max_attempts,
            scene_plan: max_attempts,
            panel_image: max_attempts,
            image_edit: max_attempts,
        }
    }

    /// Budget for one request kind.
    pub fn for_kind(&self, kind: GenerationKind) -> u32 {
        match kind {
            GenerationKind::Outline => self.outline,
            GenerationKind::StoryPart => self.story_part,
            GenerationKind::Segment => self.segment,
            GenerationKind::ScenePlan => self.scene_plan,
            GenerationKind::PanelImage => self.panel_image,
            GenerationKind::ImageEdit => self.image_edit,
        }
    }
}

impl Default for AttemptBudgets {
    fn default() -> Self {
        Self::uniform(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Orchestration settings for a [`StoryEngine`](crate::StoryEngine).
///
/// # Example
///
/// ```no_run
/// use fabulist_narrative::EngineConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = EngineConfig::load()?;
/// println!("text timeout: {:?}", config.text_timeout());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct EngineConfig {
    /// Attempt budget per request kind
    max_attempts: AttemptBudgets,
    /// Timeout for one text call, in milliseconds
    text_timeout_ms: u64,
    /// Timeout for one image call, in milliseconds
    image_timeout_ms: u64,
    /// Upper bound for a brief's speaker count
    max_speakers: u32,
    /// Restate the last violation to the model on retry
    feedback_on_retry: bool,
    /// Narration speed for audio length targets
    words_per_minute: u32,
    /// Panel images rendered at once
    max_concurrent_images: usize,
    /// Model override sent with every text request
    #[serde(skip_serializing_if = "Option::is_none")]
    text_model: Option<String>,
    /// Sampling temperature sent with every text request
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: AttemptBudgets::default(),
            text_timeout_ms: 30_000,
            image_timeout_ms: 60_000,
            max_speakers: MAX_SPEAKERS,
            feedback_on_retry: true,
            words_per_minute: 150,
            max_concurrent_images: 4,
            text_model: None,
            temperature: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific file path.
    ///
    /// Values missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> FabulistResult<Self> {
        debug!("Loading engine configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                FabulistError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FabulistError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or the merged
    /// configuration is invalid.
    #[instrument]
    pub fn load() -> FabulistResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../fabulist.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/fabulist/fabulist.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("fabulist").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| {
                FabulistError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FabulistError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first invalid field.
    pub fn validate(&self) -> FabulistResult<()> {
        for kind in GenerationKind::iter() {
            if self.max_attempts.for_kind(kind) == 0 {
                return Err(ConfigError::new(format!(
                    "max_attempts.{} must be at least 1",
                    kind
                ))
                .into());
            }
        }
        if self.text_timeout_ms == 0 || self.image_timeout_ms == 0 {
            return Err(ConfigError::new("timeouts must be greater than zero").into());
        }
        if !(1..=MAX_SPEAKERS).contains(&self.max_speakers) {
            return Err(ConfigError::new(format!(
                "max_speakers must be in [1, {}], got {}",
                MAX_SPEAKERS, self.max_speakers
            ))
            .into());
        }
        if self.words_per_minute == 0 {
            return Err(ConfigError::new("words_per_minute must be greater than zero").into());
        }
        if self.max_concurrent_images == 0 {
            return Err(ConfigError::new("max_concurrent_images must be at least 1").into());
        }
        Ok(())
    }

    /// Attempt budget for one request kind.
    pub fn attempts_for(&self, kind: GenerationKind) -> u32 {
        self.max_attempts.for_kind(kind)
    }

    /// Timeout for one text call.
    pub fn text_timeout(&self) -> Duration {
        Duration::from_millis(self.text_timeout_ms)
    }

    /// Timeout for one image call.
    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }

    /// Builder method to use one attempt budget for every kind.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = AttemptBudgets::uniform(max_attempts);
        self
    }

    /// Builder method to set the text call timeout.
    pub fn with_text_timeout(mut self, timeout: Duration) -> Self {
        self.text_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Builder method to set the image call timeout.
    pub fn with_image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Builder method to toggle retry feedback.
    pub fn with_feedback_on_retry(mut self, enabled: bool) -> Self {
        self.feedback_on_retry = enabled;
        self
    }

    /// Builder method to set the text model override.
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = Some(model.into());
        self
    }
}

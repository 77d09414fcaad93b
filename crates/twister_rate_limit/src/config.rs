//! Layered TOML configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`twister.toml` shipped with the library)
//! 2. `~/.config/twister/twister.toml`
//! 3. `./twister.toml`
//!
//! Secrets (API keys, publishing tokens) are never read from these files; the
//! clients take them from the environment.

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use twister_error::{ConfigError, TwisterError, TwisterResult};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../twister.toml");

/// Widest sibling batch any configuration may request.
///
/// Child ids append the child index as text, so an index of 10 or more would
/// collide with a grandchild id.
pub const MAX_BRANCHING: u32 = 10;

/// Completion service settings.
///
/// ```toml
/// [completion]
/// model = "gpt-3.5-turbo-1106"
/// rpm = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompletionConfig {
    /// Model identifier sent with every request
    pub model: String,
    /// Chat completions endpoint
    pub base_url: String,
    /// System message opening every conversation
    pub system_prompt: String,
    /// Requests per minute; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,
    /// Concurrent in-flight requests; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo-1106".to_string(),
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            system_prompt: "You are a helpful assistant designed to output JSON.".to_string(),
            rpm: None,
            max_concurrent: None,
        }
    }
}

/// Periodic admission gate settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThrottleConfig {
    /// Whether the gate is active
    pub enabled: bool,
    /// Calls per pause
    pub threshold: u32,
    /// Pause length in seconds
    pub pause_secs: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 35,
            pause_secs: 30,
        }
    }
}

/// Tree shape limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Widest branching factor accepted; keeps child ids to a single digit
    pub max_branching: u32,
    /// Deepest level that still receives `decayed_branching` children
    pub decay_until_depth: u32,
    /// Children per node until `decay_until_depth`; one child afterwards
    pub decayed_branching: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_branching: MAX_BRANCHING,
            decay_until_depth: 3,
            decayed_branching: 2,
        }
    }
}

impl GenerationConfig {
    /// Reject ceilings and widths that would produce ambiguous twist ids.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("max_branching", self.max_branching),
            ("decayed_branching", self.decayed_branching),
        ] {
            if value == 0 || value > MAX_BRANCHING {
                return Err(ConfigError::new(format!(
                    "generation.{} must be between 1 and {}, got {}",
                    key, MAX_BRANCHING, value
                )));
            }
        }
        Ok(())
    }
}

/// Publishing platform settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PublishConfig {
    /// API root; endpoint paths are joined onto it
    pub base_url: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            base_url: "https://story3.com/api/v2/".to_string(),
        }
    }
}

/// Top-level Twister configuration.
///
/// # Example
///
/// ```no_run
/// use twister_rate_limit::TwisterConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TwisterConfig::load()?;
/// println!("Completion model: {}", config.completion.model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct TwisterConfig {
    /// `[completion]`
    #[serde(default)]
    pub completion: CompletionConfig,
    /// `[throttle]`
    #[serde(default)]
    pub throttle: ThrottleConfig,
    /// `[generation]`
    #[serde(default)]
    pub generation: GenerationConfig,
    /// `[publish]`
    #[serde(default)]
    pub publish: PublishConfig,
}

impl TwisterConfig {
    fn validated(self) -> TwisterResult<Self> {
        self.generation.validate()?;
        Ok(self)
    }

    /// Load configuration from a specific file path, layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> TwisterResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                TwisterError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize::<Self>()
            .map_err(|e| {
                TwisterError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
            .and_then(Self::validated)
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> TwisterResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/twister/twister.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("twister").required(false));

        builder
            .build()
            .map_err(|e| {
                TwisterError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize::<Self>()
            .map_err(|e| {
                TwisterError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
            .and_then(Self::validated)
    }
}

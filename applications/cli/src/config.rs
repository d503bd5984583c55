/// Player configuration
use crate::error::{CliError, Result};
use platten_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "platten.toml";

/// Prefix of the environment overrides (`PLATTEN_TRANSPORT__SPEED=10`)
pub const ENV_PREFIX: &str = "PLATTEN";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default = "default_session")]
    pub session: SessionSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_transport")]
    pub transport: TransportSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Save and resume the queue across runs
    #[serde(default = "default_enabled")]
    pub persist: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransportSettings {
    /// Clock speed factor; 1.0 plays tracks in real time
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicitly named file must exist; the default `platten.toml` is
    /// optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(
            path,
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Load configuration from file and the given environment source
    pub fn load_with(path: Option<&Path>, environment: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };

        // Override with environment variables (prefixed with PLATTEN_)
        settings = settings.add_source(environment);

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.library.music_dir.is_dir() {
            return Err(CliError::Config(format!(
                "Music directory not found at {:?} (set PLATTEN_LIBRARY__MUSIC_DIR)",
                self.library.music_dir
            )));
        }

        if !self.transport.speed.is_finite() || self.transport.speed <= 0.0 {
            return Err(CliError::Config(format!(
                "Transport speed must be a positive number, got {}",
                self.transport.speed
            )));
        }

        if self.session.persist && self.session.state_file.is_dir() {
            return Err(CliError::Config(format!(
                "Session state file {:?} is a directory",
                self.session.state_file
            )));
        }

        Ok(())
    }
}

// Default values
fn default_library() -> LibrarySettings {
    LibrarySettings {
        music_dir: default_music_dir(),
    }
}

fn default_music_dir() -> PathBuf {
    PathBuf::from("./music")
}

fn default_session() -> SessionSettings {
    SessionSettings {
        state_file: default_state_file(),
        persist: default_enabled(),
    }
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./data/session.json")
}

fn default_enabled() -> bool {
    true
}

fn default_transport() -> TransportSettings {
    TransportSettings {
        speed: default_speed(),
    }
}

fn default_speed() -> f64 {
    1.0
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            session: default_session(),
            playback: PlaybackConfig::default(),
            transport: default_transport(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_play_in_real_time() {
        let config = PlayerConfig::default();
        assert_eq!(config.transport.speed, 1.0);
        assert!(config.session.persist);
        assert_eq!(config.playback, PlaybackConfig::default());
    }

    #[test]
    fn validate_rejects_bad_speed() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PlayerConfig::default();
        config.library.music_dir = dir.path().to_path_buf();
        config.session.state_file = dir.path().join("session.json");
        assert!(config.validate().is_ok());

        config.transport.speed = 0.0;
        assert!(config.validate().is_err());

        config.transport.speed = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_music_dir() {
        let mut config = PlayerConfig::default();
        config.library.music_dir = PathBuf::from("/definitely/not/here");

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Music directory not found"));
    }
}

use std::{str::FromStr, time::Duration};

use log::LevelFilter;
use serde::Deserialize;

use crate::{content::SiteContent, error::Error, rain::RainConfig, view::View};

/// Configuration bundled into the binary.
pub const BUNDLED: &str = include_str!("../content/site.toml");

/// Behavior of the site that is not content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum log level, as understood by [`LevelFilter::from_str`].
    pub log_level: String,
    /// View shown at startup.
    pub default_view: View,
    /// Delay between a navigation and the new view being displayed, in
    /// milliseconds.
    pub transition_ms: u64,
    /// Opacity of panel backgrounds drawn over the rain, in percent.
    pub panel_opacity: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_view: View::Home,
            transition_ms: 500,
            panel_opacity: 80,
        }
    }
}

impl Settings {
    /// Returns the parsed log level.
    pub fn log_level(&self) -> Result<LevelFilter, Error> {
        LevelFilter::from_str(&self.log_level).map_err(|_| {
            Error::InvalidConfig(format!("unknown log level `{}`", self.log_level))
        })
    }

    /// Returns the transition delay.
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Returns the panel background alpha, from `0.0` to `1.0`.
    pub fn panel_alpha(&self) -> f64 {
        f64::from(self.panel_opacity.min(100)) / 100.0
    }
}

/// Everything the site needs at startup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site behavior.
    pub settings: Settings,
    /// Background animation.
    pub rain: RainConfig,
    /// Rendered content.
    pub content: SiteContent,
}

impl SiteConfig {
    /// Parses and validates the configuration bundled into the binary.
    pub fn bundled() -> Result<Self, Error> {
        BUNDLED.parse()
    }

    /// Checks values that parse but make no sense.
    pub fn validate(&self) -> Result<(), Error> {
        self.settings.log_level()?;
        if self.settings.panel_opacity > 100 {
            return Err(Error::InvalidConfig(format!(
                "settings.panel_opacity must be at most 100, got {}",
                self.settings.panel_opacity
            )));
        }
        self.rain.validate()
    }
}

impl FromStr for SiteConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: SiteConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

use anyhow::*;
use directories_next::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::convert::TryFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_FILE_NAME: &str = "settings.toml";

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub question_count: usize,
    pub radius_km: f64,
    pub base_score: u32,
    pub hint_penalty: u32,
    pub map_bonus: u32,
    pub min_score: u32,
    pub miss_display_duration: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            question_count: 5,
            radius_km: 50.0,
            base_score: 100,
            hint_penalty: 20,
            map_bonus: 20,
            min_score: 20,
            miss_display_duration: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    question_count: Option<usize>,
    radius_km: Option<f64>,
    base_score: Option<u32>,
    hint_penalty: Option<u32>,
    map_bonus: Option<u32>,
    min_score: Option<u32>,
    miss_display_ms: Option<u64>,
}

impl Settings {
    pub fn max_score(&self) -> u32 {
        let question_count = u32::try_from(self.question_count).unwrap_or(u32::MAX);
        self.base_score.saturating_mul(question_count)
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "anthem-quiz")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
    }

    pub fn open(path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read settings file {}", path.display()))?;
        Settings::parse(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// Loads the settings file at `path`, or the one in the default config
    /// directory if it exists. Falls back to defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        if let Some(path) = path {
            return Settings::open(path);
        }
        match Settings::default_path() {
            Some(path) if path.exists() => Settings::open(&path),
            _ => Ok(Settings::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Settings> {
        let raw: RawSettings = toml::from_str(content)?;
        let defaults = Settings::default();
        let settings = Settings {
            question_count: raw.question_count.unwrap_or(defaults.question_count),
            radius_km: raw.radius_km.unwrap_or(defaults.radius_km),
            base_score: raw.base_score.unwrap_or(defaults.base_score),
            hint_penalty: raw.hint_penalty.unwrap_or(defaults.hint_penalty),
            map_bonus: raw.map_bonus.unwrap_or(defaults.map_bonus),
            min_score: raw.min_score.unwrap_or(defaults.min_score),
            miss_display_duration: raw
                .miss_display_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.miss_display_duration),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.question_count == 0 {
            bail!("question_count must be at least 1");
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            bail!("radius_km must be a positive number");
        }
        if self.min_score > self.base_score {
            bail!("min_score cannot exceed base_score");
        }
        let total = u32::try_from(self.question_count)
            .ok()
            .and_then(|count| self.base_score.checked_mul(count));
        if total.is_none() {
            bail!(
                "base_score * question_count must not exceed {} points",
                u32::MAX
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn default_max_score_is_500() {
        assert_eq!(Settings::default().max_score(), 500);
    }

    #[test]
    fn overrides_individual_fields() {
        let settings = Settings::parse("radius_km = 25.0\nmiss_display_ms = 500\n").unwrap();
        assert_eq!(settings.radius_km, 25.0);
        assert_eq!(settings.miss_display_duration, Duration::from_millis(500));
        assert_eq!(settings.question_count, 5);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(Settings::parse("radius = 25.0").is_err());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(Settings::parse("question_count = 0").is_err());
        assert!(Settings::parse("radius_km = -1.0").is_err());
        assert!(Settings::parse("min_score = 200").is_err());
    }

    #[test]
    fn rejects_overflowing_max_score() {
        assert!(Settings::parse("base_score = 4000000000\nquestion_count = 2").is_err());
        assert!(Settings::parse("question_count = 4294967296").is_err());
        let settings = Settings::parse("base_score = 2147483647\nquestion_count = 2").unwrap();
        assert_eq!(settings.max_score(), 4_294_967_294);
    }
}

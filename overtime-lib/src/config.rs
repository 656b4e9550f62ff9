use std::path::Path;

use anyhow::Result;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default sheet holding the work-time entries
pub const DEFAULT_SHEET_NAME: &str = "Entrada";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Reference band start {start} must be earlier than its end {end}")]
    InvalidBand { start: NaiveTime, end: NaiveTime },

    #[error("Locale must define at least one {0} format")]
    MissingFormats(&'static str),

    #[error("Weekday name at position {0} is empty")]
    EmptyWeekdayName(usize),
}

/// Ordinary working hours on weekdays. Entries touching it get flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceBand {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ReferenceBand {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ConfigError> {
        let band = ReferenceBand { start, end };
        band.check()?;
        Ok(band)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.start >= self.end {
            return Err(ConfigError::InvalidBand {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// True when the half-open interval `[start, end)` intersects the band
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end && end > self.start
    }
}

impl Default for ReferenceBand {
    fn default() -> Self {
        ReferenceBand {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(16, 42, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Textual date/time patterns accepted by the field parser, plus the
/// weekday names written back for valid dates (Monday first).
///
/// Formats use `chrono` strftime syntax. The first date format doubles as the
/// display format for dates in aggregate messages and exported files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseLocale {
    pub date_formats: Vec<String>,
    pub time_formats: Vec<String>,
    pub weekday_names: [String; 7],
}

impl ParseLocale {
    /// Day-first dates and 24 hour times, Spanish weekday names
    pub fn spanish() -> Self {
        ParseLocale {
            date_formats: to_owned(&[
                "%d/%m/%Y",
                "%Y-%m-%d",
                "%d-%m-%Y",
                "%d/%m/%Y %H:%M:%S",
                "%d/%m/%Y %H:%M",
                "%Y-%m-%d %H:%M:%S",
            ]),
            time_formats: to_owned(&["%H:%M", "%H:%M:%S", "%d/%m/%Y %H:%M:%S"]),
            weekday_names: [
                "lunes".to_string(),
                "martes".to_string(),
                "miércoles".to_string(),
                "jueves".to_string(),
                "viernes".to_string(),
                "sábado".to_string(),
                "domingo".to_string(),
            ],
        }
    }

    /// Month-first dates, 24 or 12 hour times, English weekday names
    pub fn english() -> Self {
        ParseLocale {
            date_formats: to_owned(&[
                "%m/%d/%Y",
                "%Y-%m-%d",
                "%m/%d/%Y %H:%M:%S",
                "%m/%d/%Y %I:%M:%S %p",
                "%Y-%m-%d %H:%M:%S",
            ]),
            time_formats: to_owned(&["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p"]),
            weekday_names: [
                "monday".to_string(),
                "tuesday".to_string(),
                "wednesday".to_string(),
                "thursday".to_string(),
                "friday".to_string(),
                "saturday".to_string(),
                "sunday".to_string(),
            ],
        }
    }

    /// Look up a preset by its short code (`es`, `en`)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "es" | "es-ar" | "es-es" | "spanish" => Some(Self::spanish()),
            "en" | "en-us" | "english" => Some(Self::english()),
            _ => None,
        }
    }

    pub fn display_date_format(&self) -> &str {
        self.date_formats
            .first()
            .map(String::as_str)
            .unwrap_or("%Y-%m-%d")
    }

    pub fn display_time_format(&self) -> &str {
        self.time_formats
            .first()
            .map(String::as_str)
            .unwrap_or("%H:%M")
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.date_formats.is_empty() {
            return Err(ConfigError::MissingFormats("date"));
        }
        if self.time_formats.is_empty() {
            return Err(ConfigError::MissingFormats("time"));
        }
        if let Some(position) = self
            .weekday_names
            .iter()
            .position(|name| name.trim().is_empty())
        {
            return Err(ConfigError::EmptyWeekdayName(position));
        }
        Ok(())
    }
}

impl Default for ParseLocale {
    fn default() -> Self {
        Self::spanish()
    }
}

fn to_owned(formats: &[&str]) -> Vec<String> {
    formats.iter().map(|f| f.to_string()).collect()
}

/// Everything the validation engine needs besides the rows themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub locale: ParseLocale,
    pub band: ReferenceBand,
    /// When false the band-overlap message is kept as a note: it neither sets
    /// the error flag nor blocks the entry from consistency checking.
    pub band_overlap_is_error: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            locale: ParseLocale::default(),
            band: ReferenceBand::default(),
            band_overlap_is_error: true,
        }
    }
}

impl ValidatorConfig {
    /// Load a configuration from a JSON file. Missing keys fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read config file '{}': {}", path.display(), e))?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded validator configuration");
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: ValidatorConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.band.check()?;
        self.locale.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_band_is_nine_to_sixteen_forty_two() {
        let band = ReferenceBand::default();
        assert_eq!(band.start, hm(9, 0));
        assert_eq!(band.end, hm(16, 42));
    }

    #[test]
    fn test_band_rejects_inverted_bounds() {
        let err = ReferenceBand::new(hm(17, 0), hm(9, 0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBand { .. }));
        assert!(ReferenceBand::new(hm(9, 0), hm(9, 0)).is_err());
    }

    #[test]
    fn test_band_overlap_is_half_open() {
        let band = ReferenceBand::default();
        assert!(!band.overlaps(hm(8, 0), hm(9, 0)));
        assert!(!band.overlaps(hm(16, 42), hm(18, 0)));
        assert!(band.overlaps(hm(8, 0), hm(9, 1)));
        assert!(band.overlaps(hm(16, 41), hm(18, 0)));
        assert!(band.overlaps(hm(7, 0), hm(20, 0)));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = ValidatorConfig::from_json_str(r#"{ "band_overlap_is_error": false }"#).unwrap();
        assert!(!config.band_overlap_is_error);
        assert_eq!(config.band, ReferenceBand::default());
        assert_eq!(config.locale, ParseLocale::spanish());
    }

    #[test]
    fn test_json_band_is_validated() {
        let json = r#"{ "band": { "start": "18:00:00", "end": "08:00:00" } }"#;
        assert!(ValidatorConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_locale_without_time_formats_is_rejected() {
        let mut config = ValidatorConfig::default();
        config.locale.time_formats.clear();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingFormats("time"))
        );
    }

    #[test]
    fn test_locale_codes() {
        assert_eq!(ParseLocale::from_code("ES"), Some(ParseLocale::spanish()));
        assert_eq!(ParseLocale::from_code("en-us"), Some(ParseLocale::english()));
        assert_eq!(ParseLocale::from_code("fr"), None);
    }
}

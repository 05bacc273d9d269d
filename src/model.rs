use crate::stepper_core::{NumberFormat, StepperState};
use ratatui::style::Color;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Deserialize, Clone)]
pub struct StepperConfig {
    pub id: String,
    pub label: String,
    // Absent bounds are unbounded
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default = "default_increment")]
    pub increment: f64,
    #[serde(default)]
    pub allows_empty: bool,
    #[serde(default)]
    pub initial_value: Option<f64>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub format: NumberFormat,
    // Color names or #rrggbb, as understood by ratatui
    #[serde(default)]
    pub indicator: Option<String>,
    #[serde(default)]
    pub foreground: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    pub steppers: Vec<StepperConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            steppers: vec![
                StepperConfig {
                    id: "volume".into(),
                    label: "Volume".into(),
                    minimum: Some(0.0),
                    maximum: Some(100.0),
                    increment: 5.0,
                    allows_empty: false,
                    initial_value: Some(50.0),
                    enabled: true,
                    format: NumberFormat::default(),
                    indicator: Some("cyan".into()),
                    foreground: None,
                },
                StepperConfig {
                    id: "gain".into(),
                    label: "Gain (dB)".into(),
                    minimum: Some(-12.0),
                    maximum: Some(12.0),
                    increment: 0.5,
                    allows_empty: false,
                    initial_value: Some(0.0),
                    enabled: true,
                    format: NumberFormat::decimal(1),
                    indicator: Some("magenta".into()),
                    foreground: None,
                },
                StepperConfig {
                    id: "limit".into(),
                    label: "Rate limit".into(),
                    minimum: Some(0.0),
                    maximum: None,
                    increment: 100.0,
                    allows_empty: true,
                    initial_value: None,
                    enabled: true,
                    format: NumberFormat::default(),
                    indicator: None,
                    foreground: None,
                },
            ],
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_increment() -> f64 {
    1.0
}

fn default_title() -> String {
    "Steppers".to_string()
}

pub fn parse_color(raw: &str) -> Option<Color> {
    Color::from_str(raw.trim()).ok()
}

impl StepperConfig {
    /// Builds the engine for this entry. Expects a validated config.
    pub fn build_state(&self) -> StepperState {
        let initial = match self.initial_value {
            Some(v) => Some(v),
            None if self.allows_empty => None,
            None => Some(0.0),
        };
        StepperState::new()
            .with_range(
                self.minimum.unwrap_or(f64::NEG_INFINITY),
                self.maximum.unwrap_or(f64::INFINITY),
            )
            .with_increment(self.increment)
            .with_format(self.format.clone())
            .with_allows_empty(self.allows_empty)
            .with_enabled(self.enabled)
            .with_value(initial)
    }

    pub fn indicator_color(&self) -> Option<Color> {
        self.indicator.as_deref().and_then(parse_color)
    }

    pub fn foreground_color(&self) -> Option<Color> {
        self.foreground.as_deref().and_then(parse_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_defaults_fill_missing_fields() {
        let cfg: AppConfig = serde_yaml::from_str(
            r#"
steppers:
  - id: a
    label: A
    maximum: 10
    format:
      allows_floats: true
      max_fraction_digits: 2
"#,
        )
        .unwrap();
        assert_eq!(cfg.title, "Steppers");
        let s = &cfg.steppers[0];
        assert_eq!(s.minimum, None);
        assert_eq!(s.maximum, Some(10.0));
        assert_eq!(s.increment, 1.0);
        assert!(s.enabled);
        assert!(!s.allows_empty);
        assert!(s.format.allows_floats);
        assert_eq!(s.format.max_fraction_digits, 2);
        assert_eq!(s.format.grouping_separator, ',');
    }

    #[test]
    fn build_state_applies_initial_value_rules() {
        let mut cfg = AppConfig::default().steppers[0].clone();
        let st = cfg.build_state();
        assert_eq!(st.value(), Some(50.0));
        assert_eq!(st.fractional_fill(), Some(0.5));

        cfg.initial_value = None;
        assert_eq!(cfg.build_state().value(), Some(0.0));

        cfg.allows_empty = true;
        assert_eq!(cfg.build_state().value(), None);

        cfg.initial_value = Some(500.0);
        assert_eq!(cfg.build_state().value(), Some(100.0));
    }

    #[test]
    fn colors_parse_from_names_and_hex() {
        assert_eq!(parse_color("cyan"), Some(Color::Cyan));
        assert_eq!(parse_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_color("not-a-color"), None);
    }
}

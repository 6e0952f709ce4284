//! Application configuration.

use serde::Deserialize;

/// Application configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Style configuration section
    #[serde(default)]
    pub style: StyleConfig,
}

/// Sizing and spacing used by the built-in layout engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Minimum width of a state box.
    pub state_width: f32,
    /// Height of a state box.
    pub state_height: f32,
    /// Spacing between sibling states and between ranks.
    pub state_margin: f32,
    /// Padding between a composite state's border and its contents.
    pub box_margin: f32,
    /// Font size used for labels, and for estimating label widths.
    pub state_font_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            state_width: 150.0,
            state_height: 65.0,
            state_margin: 50.0,
            box_margin: 10.0,
            state_font_size: 14.0,
        }
    }
}

/// Style configuration section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    /// Default background color for diagrams.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    /// Returns the configured background color, if any.
    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_sizing() {
        let config = LayoutConfig::default();
        assert_eq!(config.state_width, 150.0);
        assert_eq!(config.state_height, 65.0);
        assert_eq!(config.state_margin, 50.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig =
            toml::from_str("[layout]\nstate_width = 200.0\n").expect("valid config");
        assert_eq!(config.layout.state_width, 200.0);
        assert_eq!(config.layout.state_height, 65.0);
        assert_eq!(config.style.background_color(), None);
    }
}

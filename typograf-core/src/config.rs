use anyhow::Result;
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_font_name() -> String {
    "Times New Roman".to_string()
}

fn default_font_size() -> f32 {
    14.0
}

fn default_line_spacing() -> f32 {
    1.5
}

fn default_vertical_margin() -> f32 {
    1.0
}

fn default_horizontal_margin() -> f32 {
    1.5
}

fn default_context_radius() -> usize {
    50
}

/// Top-level formatting configuration, loadable from YAML
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormatConfig {
    #[serde(default)]
    pub baseline: BaselineStyle,
    #[serde(default)]
    pub margins: PageMargins,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Uniform text style the whole document is reset to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineStyle {
    #[serde(default = "default_font_name")]
    pub font_name: String,
    #[serde(default = "default_font_size")]
    pub font_size_pt: f32,
    /// Line spacing as a multiple of single spacing
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,
}

impl Default for BaselineStyle {
    fn default() -> Self {
        Self {
            font_name: default_font_name(),
            font_size_pt: default_font_size(),
            line_spacing: default_line_spacing(),
        }
    }
}

/// Page margins in centimeters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMargins {
    #[serde(default = "default_vertical_margin")]
    pub top_cm: f32,
    #[serde(default = "default_vertical_margin")]
    pub bottom_cm: f32,
    #[serde(default = "default_horizontal_margin")]
    pub left_cm: f32,
    #[serde(default = "default_horizontal_margin")]
    pub right_cm: f32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top_cm: default_vertical_margin(),
            bottom_cm: default_vertical_margin(),
            left_cm: default_horizontal_margin(),
            right_cm: default_horizontal_margin(),
        }
    }
}

/// Numeric classifier tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// How many chars of surrounding text to inspect around a candidate
    #[serde(default = "default_context_radius")]
    pub context_radius: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            context_radius: default_context_radius(),
        }
    }
}

impl FormatConfig {
    /// Load config from file path (functional approach)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FormatConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|_| {
                eprintln!("⚠️  Failed to load config from {}, using defaults", p);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

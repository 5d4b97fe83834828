use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::chart_data::TimeWindow;

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Ensure the config directory exists
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string
    pub fn generate_default_config(&self) -> String {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }

    /// Load config.toml, falling back to defaults when it is absent. A file
    /// that exists but fails to parse is reported and ignored rather than
    /// aborting startup.
    pub fn load_config(&self) -> AppConfig {
        let config_path = self.config_path("config.toml");
        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!(
                        "Warning: Could not parse {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    );
                    AppConfig::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(e) => {
                eprintln!(
                    "Warning: Could not read {}: {}. Using defaults.",
                    config_path.display(),
                    e
                );
                AppConfig::default()
            }
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub data: DataConfig,
    pub display: DisplayConfig,
    pub theme: ThemeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            data: DataConfig::default(),
            display: DisplayConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Where to find the two source files when no paths are given on the
/// command line.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataConfig {
    pub observations: Option<PathBuf>,
    pub metadata: Option<PathBuf>,
    pub delimiter: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial time window: "last5", "last10", or "all"
    pub window: String,
    pub show_legend: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window: "all".to_string(),
            show_legend: true,
        }
    }
}

impl DisplayConfig {
    /// Parse the configured window preset; unknown values fall back to all.
    pub fn time_window(&self) -> TimeWindow {
        match self.window.trim().to_ascii_lowercase().as_str() {
            "last5" => TimeWindow::LastFive,
            "last10" => TimeWindow::LastTen,
            "all" => TimeWindow::All,
            other => {
                eprintln!("Warning: unknown display.window '{}', using 'all'", other);
                TimeWindow::All
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub primary: String,
    pub secondary: String,
    pub warning: String,
    pub error: String,
    pub dimmed: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub controls_bg: String,
    pub border: String,
    pub border_active: String,
    pub country_nepal: String,
    pub country_estonia: String,
    pub country_sierra_leone: String,
    pub country_usa: String,
    pub series_1: String,
    pub series_2: String,
    pub series_3: String,
    pub series_4: String,
    pub series_5: String,
    pub series_6: String,
    pub series_7: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "green".to_string(),
            secondary: "cyan".to_string(),
            warning: "yellow".to_string(),
            error: "red".to_string(),
            dimmed: "dark_gray".to_string(),
            text_primary: "white".to_string(),
            text_secondary: "gray".to_string(),
            controls_bg: "indexed(236)".to_string(),
            border: "gray".to_string(),
            border_active: "green".to_string(),
            country_nepal: "#FF6347".to_string(),
            country_estonia: "#4682B4".to_string(),
            country_sierra_leone: "#FFDB58".to_string(),
            country_usa: "#000080".to_string(),
            series_1: "cyan".to_string(),
            series_2: "magenta".to_string(),
            series_3: "green".to_string(),
            series_4: "yellow".to_string(),
            series_5: "blue".to_string(),
            series_6: "red".to_string(),
            series_7: "white".to_string(),
        }
    }
}

impl ColorConfig {
    fn entries(&self) -> [(&'static str, &str); 21] {
        [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("warning", &self.warning),
            ("error", &self.error),
            ("dimmed", &self.dimmed),
            ("text_primary", &self.text_primary),
            ("text_secondary", &self.text_secondary),
            ("controls_bg", &self.controls_bg),
            ("border", &self.border),
            ("border_active", &self.border_active),
            ("country_nepal", &self.country_nepal),
            ("country_estonia", &self.country_estonia),
            ("country_sierra_leone", &self.country_sierra_leone),
            ("country_usa", &self.country_usa),
            ("series_1", &self.series_1),
            ("series_2", &self.series_2),
            ("series_3", &self.series_3),
            ("series_4", &self.series_4),
            ("series_5", &self.series_5),
            ("series_6", &self.series_6),
            ("series_7", &self.series_7),
        ]
    }
}

fn parse_hex(s: &str) -> Result<(u8, u8, u8)> {
    let hex = &s[1..];
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(eyre!("Invalid hex color: '{}'. Expected #rrggbb", s));
    }
    let r = u8::from_str_radix(&hex[0..2], 16)?;
    let g = u8::from_str_radix(&hex[2..4], 16)?;
    let b = u8::from_str_radix(&hex[4..6], 16)?;
    Ok((r, g, b))
}

/// Parse a color string: named, "#rrggbb" hex, or "indexed(0-255)".
pub fn parse_color(s: &str) -> Result<Color> {
    let trimmed = s.trim();

    if trimmed.starts_with('#') {
        let (r, g, b) = parse_hex(trimmed)?;
        return Ok(Color::Rgb(r, g, b));
    }

    if trimmed.to_lowercase().starts_with("indexed(") && trimmed.ends_with(')') {
        let num_str = &trimmed[8..trimmed.len() - 1];
        let num = num_str.parse::<u8>().map_err(|_| {
            eyre!(
                "Invalid indexed color: '{}'. Expected format: indexed(0-255)",
                trimmed
            )
        })?;
        return Ok(Color::Indexed(num));
    }

    let lower = trimmed.to_lowercase();
    match lower.as_str() {
        "black" => Ok(Color::Black),
        "red" => Ok(Color::Red),
        "green" => Ok(Color::Green),
        "yellow" => Ok(Color::Yellow),
        "blue" => Ok(Color::Blue),
        "magenta" => Ok(Color::Magenta),
        "cyan" => Ok(Color::Cyan),
        "white" => Ok(Color::White),
        "gray" | "grey" => Ok(Color::Gray),
        "dark_gray" | "dark gray" | "darkgray" => Ok(Color::DarkGray),
        "light_red" | "light red" => Ok(Color::LightRed),
        "light_green" | "light green" => Ok(Color::LightGreen),
        "light_yellow" | "light yellow" => Ok(Color::LightYellow),
        "light_blue" | "light blue" => Ok(Color::LightBlue),
        "light_magenta" | "light magenta" => Ok(Color::LightMagenta),
        "light_cyan" | "light cyan" => Ok(Color::LightCyan),
        "reset" | "default" => Ok(Color::Reset),
        _ => Err(eyre!(
            "Unknown color: '{}'. Use a named color, #rrggbb, or indexed(0-255)",
            trimmed
        )),
    }
}

/// Resolved theme: color names to terminal colors.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub colors: HashMap<String, Color>,
}

impl Theme {
    /// Create a Theme from a ThemeConfig by parsing all color strings
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let mut colors = HashMap::new();
        for (name, value) in config.colors.entries() {
            let color = parse_color(value)
                .map_err(|e| eyre!("theme color '{}': {}", name, e))?;
            colors.insert(name.to_string(), color);
        }
        Ok(Self { colors })
    }

    /// Get a color from the theme by name
    pub fn get(&self, name: &str) -> Color {
        self.colors.get(name).copied().unwrap_or(Color::Reset)
    }
}

// Default configuration template
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_parses_to_default_config() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.version, "0.1");
        assert_eq!(config.display.window, "all");
        assert!(config.display.show_legend);
        assert_eq!(config.theme.colors.country_nepal, "#FF6347");
    }

    #[test]
    fn parse_color_variants() {
        assert_eq!(parse_color("red").unwrap(), Color::Red);
        assert_eq!(parse_color("Dark_Gray").unwrap(), Color::DarkGray);
        assert_eq!(parse_color("#ff6347").unwrap(), Color::Rgb(255, 99, 71));
        assert_eq!(parse_color("indexed(236)").unwrap(), Color::Indexed(236));
    }

    #[test]
    fn parse_color_rejects_unknown() {
        let err = parse_color("chartreuse-ish").unwrap_err();
        assert!(err.to_string().contains("chartreuse-ish"));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("indexed(300)").is_err());
    }

    #[test]
    fn theme_resolves_country_colors() {
        use crate::nav::Country;
        let theme = Theme::from_config(&ThemeConfig::default()).unwrap();
        assert_eq!(
            theme.get(Country::Nepal.color_key()),
            Color::Rgb(255, 99, 71)
        );
        assert_eq!(
            theme.get(Country::Usa.color_key()),
            Color::Rgb(0, 0, 128)
        );
        // Unknown names resolve to Reset rather than panicking.
        assert_eq!(theme.get("nonexistent"), Color::Reset);
    }

    #[test]
    fn window_preset_parses() {
        let mut display = DisplayConfig::default();
        assert_eq!(display.time_window(), TimeWindow::All);
        display.window = "last5".to_string();
        assert_eq!(display.time_window(), TimeWindow::LastFive);
        display.window = "LAST10".to_string();
        assert_eq!(display.time_window(), TimeWindow::LastTen);
    }
}

//! Theme system for markdown styling
//!
//! Provides YAML-based themes with compile-time embedded built-ins and
//! user-defined themes from the config directory. A theme only supplies
//! colours; which character sequences count as markup is fixed.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/livemark/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary

use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};

// Embed theme YAML files at compile time
pub const DEFAULT_DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const DEFAULT_LIGHT_YAML: &str = include_str!("../themes/light.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default-dark")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "default-dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinTheme {
        id: "default-light",
        yaml: DEFAULT_LIGHT_YAML,
    },
];

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::info!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        if !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string());
        match s.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    /// Format as "#rrggbb", or "#rrggbbaa" when not fully opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub markdown: MarkdownThemeData,
}

/// Markdown colors (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownThemeData {
    pub text: String,
    pub delimiter: String,
    #[serde(default)]
    pub delimiter_selected: Option<String>,
    pub heading: String,
    pub strong: String,
    pub emphasis: String,
    pub strikethrough: String,
    pub quote: String,
    pub code_foreground: String,
    pub code_background: String,
    #[serde(default)]
    pub code_block_background: Option<String>,
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub markdown: MarkdownTheme,
}

/// Markdown colors (resolved)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownTheme {
    /// Plain paragraph text
    pub text: Color,
    /// Markup characters (`*`, `#`, fences, ...)
    pub delimiter: Color,
    /// Markup characters while the range is selected
    pub delimiter_selected: Color,
    pub heading: Color,
    pub strong: Color,
    pub emphasis: Color,
    pub strikethrough: Color,
    pub quote: Color,
    pub code_foreground: Color,
    pub code_background: Color,
    pub code_block_background: Color,
}

impl Theme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown theme id: {}", id))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self, String> {
        let md = data.markdown;
        let delimiter = Color::from_hex(&md.delimiter)?;
        let code_background = Color::from_hex(&md.code_background)?;

        Ok(Theme {
            name: data.name,
            markdown: MarkdownTheme {
                text: Color::from_hex(&md.text)?,
                delimiter,
                delimiter_selected: md
                    .delimiter_selected
                    .as_deref()
                    .map(Color::from_hex)
                    .transpose()?
                    .unwrap_or(delimiter),
                heading: Color::from_hex(&md.heading)?,
                strong: Color::from_hex(&md.strong)?,
                emphasis: Color::from_hex(&md.emphasis)?,
                strikethrough: Color::from_hex(&md.strikethrough)?,
                quote: Color::from_hex(&md.quote)?,
                code_foreground: Color::from_hex(&md.code_foreground)?,
                code_background,
                code_block_background: md
                    .code_block_background
                    .as_deref()
                    .map(Color::from_hex)
                    .transpose()?
                    .unwrap_or(code_background),
            },
        })
    }

    /// Default dark theme (YAML-backed with Rust fallback)
    pub fn default_dark() -> Self {
        match Theme::from_yaml(DEFAULT_DARK_YAML) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!("Embedded dark theme failed to parse: {}", e);
                Theme {
                    name: "Default Dark".to_string(),
                    markdown: MarkdownTheme {
                        text: Color::rgb(0xD4, 0xD4, 0xD4),
                        delimiter: Color::rgb(0x6A, 0x6A, 0x6A),
                        delimiter_selected: Color::rgb(0x9C, 0xDC, 0xFE),
                        heading: Color::rgb(0x56, 0x9C, 0xD6),
                        strong: Color::rgb(0xDC, 0xDC, 0xAA),
                        emphasis: Color::rgb(0xC5, 0x86, 0xC0),
                        strikethrough: Color::rgb(0x80, 0x80, 0x80),
                        quote: Color::rgb(0x6A, 0x99, 0x55),
                        code_foreground: Color::rgb(0xCE, 0x91, 0x78),
                        code_background: Color::rgb(0x2D, 0x2D, 0x2D),
                        code_block_background: Color::rgb(0x25, 0x25, 0x26),
                    },
                }
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

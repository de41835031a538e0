use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// Regex to match css color values not in the named list.
static CUSTOM_COLOR_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported web color: {0:?}")]
pub struct InvalidColor(pub String);

/// Web colors supported in bbcode.
///
/// There are 40 kinds of pre-defined colors available.
///
/// And a custom color [`WebColor::Custom`] which represent its value in string.
#[derive(Clone, Debug, PartialEq, Eq, AsRefStr, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum WebColor {
    Black,
    Sienna,
    DarkOliveGreen,
    DarkGreen,
    DarkSlateBlue,
    Navy,
    Indigo,
    DarkSlateGray,
    DarkRed,
    DarkOrange,
    Olive,
    Green,
    Teal,
    Blue,
    SlateGray,
    DimGray,
    Red,
    SandyBrown,
    YellowGreen,
    SeaGreen,
    MediumTurquoise,
    RoyalBlue,
    Purple,
    Gray,
    Magenta,
    Orange,
    Yellow,
    Lime,
    Cyan,
    DeepSkyBlue,
    DarkOrchid,
    Silver,
    Pink,
    Wheat,
    LemonChiffon,
    PaleGreen,
    PaleTurquoise,
    LightBlue,
    Plum,
    White,
    /// Custom web color value.
    ///
    /// Supported formats:
    ///
    /// 1. hex: `#f00`, `#ff0000` or `#ff000080`
    /// 2. rgb: `rgb(255, 0, 0)` or `rgba(255, 0, 0, 0.5)`
    ///
    /// `FromStr` puts any unknown name here, use [`WebColor::from_css`] to
    /// validate the value.
    #[strum(default)]
    Custom(String),
}

fn init_custom_re() -> Regex {
    Regex::new(
        r"(?i)^(?:#(?:[0-9a-f]{3}|[0-9a-f]{6}|[0-9a-f]{8})|rgb\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*\)|rgba\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*(?:0|1|0?\.\d+)\s*\))$",
    )
    .expect("invalid custom color regex")
}

impl WebColor {
    /// All pre-defined colors.
    pub fn named() -> impl Iterator<Item = WebColor> {
        WebColor::iter().filter(WebColor::is_named)
    }

    /// Check the value is a named color rather than [`WebColor::Custom`].
    pub fn is_named(&self) -> bool {
        !matches!(self, WebColor::Custom(..))
    }

    /// Color name in PascalCase, or the custom value.
    pub fn as_str(&self) -> &str {
        match self {
            WebColor::Custom(v) => v.as_str(),
            named => named.as_ref(),
        }
    }

    /// Parse a color name, case-insensitive, or a css color value.
    ///
    /// # Errors
    ///
    /// When the value is neither a named color nor a supported css color.
    pub fn from_css(value: &str) -> Result<Self, InvalidColor> {
        let value = value.trim();
        match WebColor::from_str(value) {
            Ok(WebColor::Custom(v)) if !CUSTOM_COLOR_RE.get_or_init(init_custom_re).is_match(&v) => {
                Err(InvalidColor(v))
            }
            Ok(color) => Ok(color),
            Err(_) => Err(InvalidColor(value.to_string())),
        }
    }
}

impl fmt::Display for WebColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! UI theme preference.

use serde::{Deserialize, Serialize};

/// The two-valued display theme, persisted independently of authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Error parsing a [`Theme`] from its string form.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid theme: {0}")]
pub struct ThemeError(pub String);

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse_and_display() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.to_string(), "light");
        assert!("solarized".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_default_is_light() {
        assert_eq!(Theme::default(), Theme::Light);
    }
}

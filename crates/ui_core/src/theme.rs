//! Light/dark theme preference and the label/icon pair for the switch
//! control.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Label shown on the switch control. It names the mode the control
    /// switches to, not the current one.
    pub fn switch_label(self) -> &'static str {
        match self {
            Self::Light => "Dark Mode",
            Self::Dark => "Light Mode",
        }
    }

    /// Icon name paired with [`Theme::switch_label`].
    pub fn switch_icon(self) -> &'static str {
        match self {
            Self::Light => "moon",
            Self::Dark => "sun",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_light() {
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn double_toggle_returns_original() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(theme.toggled().toggled(), theme);
        }
    }

    #[test]
    fn switch_control_names_the_other_mode() {
        assert_eq!(Theme::Light.switch_label(), "Dark Mode");
        assert_eq!(Theme::Light.switch_icon(), "moon");
        assert_eq!(Theme::Dark.switch_label(), "Light Mode");
        assert_eq!(Theme::Dark.switch_icon(), "sun");
    }

    #[test]
    fn persists_as_lowercase_names() {
        assert_eq!(serde_json::to_string(&Theme::Dark).expect("encode"), "\"dark\"");
        let decoded: Theme = serde_json::from_str("\"light\"").expect("decode");
        assert_eq!(decoded, Theme::Light);
    }
}

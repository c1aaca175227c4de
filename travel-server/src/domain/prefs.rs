//! Per-visitor display preferences.
//!
//! Both switches are independent two-state flips; neither touches the form
//! or the itinerary.

use serde::Serialize;

/// Page layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Stacked cards
    #[default]
    Default,
    /// Two columns: form beside the results
    Compact,
}

impl Layout {
    /// Returns the other layout.
    pub fn toggle(self) -> Self {
        match self {
            Layout::Default => Layout::Compact,
            Layout::Compact => Layout::Default,
        }
    }

    pub fn is_compact(&self) -> bool {
        matches!(self, Layout::Compact)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Default => "default",
            Layout::Compact => "compact",
        }
    }
}

/// Colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Returns the other theme.
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Layout and theme together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub layout: Layout,
    pub theme: Theme,
}

impl Preferences {
    pub fn toggle_layout(&mut self) {
        self.layout = self.layout.toggle();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }
}

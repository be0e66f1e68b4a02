//! Wallpaper background style.
//!
//! # Invariants
//! - Persisted as the `darkBackground` setting; absence means `Dark`.
//! - Cache slot names embed `as_str()`, so the labels must stay stable.

use serde::{Deserialize, Serialize};

/// Binary rendering mode for generated wallpapers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallpaperStyle {
    /// Light text on a dark background.
    Dark,
    /// Dark text on a light background.
    Light,
}

impl WallpaperStyle {
    pub const ALL: [WallpaperStyle; 2] = [WallpaperStyle::Dark, WallpaperStyle::Light];

    pub fn from_dark_background(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl Default for WallpaperStyle {
    fn default() -> Self {
        Self::Dark
    }
}

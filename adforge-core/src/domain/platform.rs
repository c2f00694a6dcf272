//! Ad platform catalogue

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dto::job::CreateCreative;

const DEFAULT_BACKGROUND: &str =
    "https://cdn.vectorstock.com/i/1000v/03/31/whey-protein-powder-ad-poster-vector-47880331.jpg";

/// Platforms creative can be generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Google,
    WhatsApp,
    Twitter,
    Reddit,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Google,
        Platform::WhatsApp,
        Platform::Twitter,
        Platform::Reddit,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::WhatsApp => "whatsapp",
            Self::Twitter => "twitter",
            Self::Reddit => "reddit",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google Ads",
            Self::WhatsApp => "WhatsApp",
            Self::Twitter => "Twitter",
            Self::Reddit => "Reddit",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Google => "Create compelling search and display ads",
            Self::WhatsApp => "Share business updates directly with customers",
            Self::Twitter => "Reach audiences through engaging tweets and media",
            Self::Reddit => "Connect with specific communities and interests",
        }
    }

    pub fn is_recommended(self) -> bool {
        matches!(self, Self::Google | Self::WhatsApp)
    }

    /// Creative used when the caller supplies no background or title
    pub fn default_creative(self) -> CreateCreative {
        let title = match self {
            Self::Google => "Protein",
            Self::WhatsApp => "Special Offer",
            Self::Twitter => "Level Up Your Gains",
            Self::Reddit => "Premium Whey",
        };
        CreateCreative::new(DEFAULT_BACKGROUND, title)
    }

    /// Recommended platforms first, catalogue order otherwise
    pub fn by_recommendation() -> Vec<Platform> {
        let mut platforms = Self::ALL.to_vec();
        platforms.sort_by_key(|p| !p.is_recommended());
        platforms
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when parsing an unknown platform slug
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform '{0}' (expected one of: google, whatsapp, twitter, reddit)")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.slug() == slug)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Where a social entry is displayed. Profile and menu socials live in
/// separate tables but consume the same plan quota.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SocialSurface {
    Profile,
    Menu,
}

impl SocialSurface {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialSurface::Profile => "profile",
            SocialSurface::Menu => "menu",
        }
    }
}

impl Display for SocialSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Content block flavors rendered on a public profile page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Link,
    Text,
    Media,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Link => "link",
            BlockKind::Text => "text",
            BlockKind::Media => "media",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "link" => Some(BlockKind::Link),
            "text" => Some(BlockKind::Text),
            "media" => Some(BlockKind::Media),
            _ => None,
        }
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

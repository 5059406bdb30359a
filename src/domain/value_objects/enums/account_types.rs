use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Whether the account operates as a solo profile or a team/business account.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Personal,
    Business,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Personal => "personal",
            AccountType::Business => "business",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "business" => AccountType::Business,
            _ => AccountType::Personal,
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

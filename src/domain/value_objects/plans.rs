use serde::{Deserialize, Serialize};

/// Resource maxima and feature flags attached to a plan. Stored as JSONB in
/// the database; absent fields fall back to the free-tier value.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PlanLimits {
    #[serde(default)]
    pub max_links: Option<i64>,

    #[serde(default)]
    pub max_pages: Option<i64>,

    #[serde(default)]
    pub max_blocks: Option<i64>,

    #[serde(default)]
    pub max_socials: Option<i64>,

    #[serde(default)]
    pub max_team_members: Option<i64>,

    #[serde(default)]
    pub qr_code_enabled: Option<bool>,

    #[serde(default)]
    pub analytics_enabled: Option<bool>,

    #[serde(default)]
    pub custom_templates_enabled: Option<bool>,

    #[serde(default)]
    pub menu_builder_enabled: Option<bool>,
}

/// Quotas applied to accounts with no active subscription.
pub const FREE_TIER_MAX_LINKS: i64 = 5;
pub const FREE_TIER_MAX_PAGES: i64 = 1;
pub const FREE_TIER_MAX_BLOCKS: i64 = 10;
pub const FREE_TIER_MAX_SOCIALS: i64 = 3;
pub const FREE_TIER_MAX_TEAM_MEMBERS: i64 = 1;

impl PlanLimits {
    pub fn max_links_or_default(&self) -> i64 {
        self.max_links.unwrap_or(FREE_TIER_MAX_LINKS)
    }

    pub fn max_pages_or_default(&self) -> i64 {
        self.max_pages.unwrap_or(FREE_TIER_MAX_PAGES)
    }

    pub fn max_blocks_or_default(&self) -> i64 {
        self.max_blocks.unwrap_or(FREE_TIER_MAX_BLOCKS)
    }

    pub fn max_socials_or_default(&self) -> i64 {
        self.max_socials.unwrap_or(FREE_TIER_MAX_SOCIALS)
    }

    pub fn max_team_members_or_default(&self) -> i64 {
        self.max_team_members.unwrap_or(FREE_TIER_MAX_TEAM_MEMBERS)
    }

    pub fn has_qr_code(&self) -> bool {
        self.qr_code_enabled.unwrap_or(false)
    }

    pub fn has_analytics(&self) -> bool {
        self.analytics_enabled.unwrap_or(false)
    }

    pub fn has_custom_templates(&self) -> bool {
        self.custom_templates_enabled.unwrap_or(false)
    }

    pub fn has_menu_builder(&self) -> bool {
        self.menu_builder_enabled.unwrap_or(false)
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::plans::{
    FREE_TIER_MAX_BLOCKS, FREE_TIER_MAX_LINKS, FREE_TIER_MAX_PAGES, FREE_TIER_MAX_SOCIALS,
    FREE_TIER_MAX_TEAM_MEMBERS, PlanLimits,
};

/// A metered resource kind a mutation may consume one unit of.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddLink,
    AddPage,
    AddBlock,
    AddSocial,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceUsage {
    pub max: i64,
    pub current: i64,
}

impl ResourceUsage {
    pub fn at_capacity(&self) -> bool {
        self.current >= self.max
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    pub qr_code: bool,
    pub analytics: bool,
    pub custom_templates: bool,
    pub menu_builder: bool,
}

impl From<&PlanLimits> for FeatureFlags {
    fn from(limits: &PlanLimits) -> Self {
        Self {
            qr_code: limits.has_qr_code(),
            analytics: limits.has_analytics(),
            custom_templates: limits.has_custom_templates(),
            menu_builder: limits.has_menu_builder(),
        }
    }
}

/// Materialized view of a user's plan limits against their current counts.
/// Derived, never persisted; may be served from a short-lived cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageSnapshot {
    pub plan_name: Option<String>,
    pub has_active_plan: bool,
    pub links: ResourceUsage,
    pub pages: ResourceUsage,
    pub blocks: ResourceUsage,
    pub socials: ResourceUsage,
    pub team_members: ResourceUsage,
    pub features: FeatureFlags,
}

impl UsageSnapshot {
    /// Snapshot for an account with no active subscription: fixed free-tier
    /// maxima, every feature flag off.
    pub fn free_tier(counts: ResourceCounts) -> Self {
        Self {
            plan_name: None,
            has_active_plan: false,
            links: ResourceUsage {
                max: FREE_TIER_MAX_LINKS,
                current: counts.links,
            },
            pages: ResourceUsage {
                max: FREE_TIER_MAX_PAGES,
                current: counts.pages,
            },
            blocks: ResourceUsage {
                max: FREE_TIER_MAX_BLOCKS,
                current: counts.blocks,
            },
            socials: ResourceUsage {
                max: FREE_TIER_MAX_SOCIALS,
                current: counts.socials,
            },
            team_members: ResourceUsage {
                max: FREE_TIER_MAX_TEAM_MEMBERS,
                current: counts.team_members,
            },
            features: FeatureFlags::default(),
        }
    }

    pub fn from_plan(plan_name: Option<String>, limits: &PlanLimits, counts: ResourceCounts) -> Self {
        Self {
            plan_name,
            has_active_plan: true,
            links: ResourceUsage {
                max: limits.max_links_or_default(),
                current: counts.links,
            },
            pages: ResourceUsage {
                max: limits.max_pages_or_default(),
                current: counts.pages,
            },
            blocks: ResourceUsage {
                max: limits.max_blocks_or_default(),
                current: counts.blocks,
            },
            socials: ResourceUsage {
                max: limits.max_socials_or_default(),
                current: counts.socials,
            },
            team_members: ResourceUsage {
                max: limits.max_team_members_or_default(),
                current: counts.team_members,
            },
            features: FeatureFlags::from(limits),
        }
    }

    pub fn usage_for(&self, action: ActionKind) -> &ResourceUsage {
        match action {
            ActionKind::AddLink => &self.links,
            ActionKind::AddPage => &self.pages,
            ActionKind::AddBlock => &self.blocks,
            ActionKind::AddSocial => &self.socials,
        }
    }
}

/// Raw per-resource counts, gathered before limits are applied. Socials is
/// already the profile + menu sum at this point.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceCounts {
    pub links: i64,
    pub pages: i64,
    pub blocks: i64,
    pub socials: i64,
    pub team_members: i64,
}

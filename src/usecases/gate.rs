use serde::Serialize;

use crate::domain::value_objects::usage::{ActionKind, UsageSnapshot};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub message: Option<String>,
}

impl Decision {
    fn allow() -> Self {
        Self {
            allowed: true,
            message: None,
        }
    }

    fn deny(message: String) -> Self {
        Self {
            allowed: false,
            message: Some(message),
        }
    }
}

/// Pure capacity check against an already-fetched snapshot. Denies once the
/// count is at capacity: the action filling the last slot is still allowed.
/// Enforcement is advisory: the snapshot may be up to the cache TTL stale,
/// so two concurrent creates can both pass and land one row over the limit.
pub fn can_perform_action(snapshot: &UsageSnapshot, action: ActionKind) -> Decision {
    let usage = snapshot.usage_for(action);

    if !usage.at_capacity() {
        return Decision::allow();
    }

    let noun = match action {
        ActionKind::AddLink => "link",
        ActionKind::AddPage => "page",
        ActionKind::AddBlock => "block",
        ActionKind::AddSocial => "social",
    };

    Decision::deny(format!(
        "You have reached your {} limit of {}. Upgrade your plan to add more.",
        noun, usage.max
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::usage::{ResourceCounts, UsageSnapshot};

    fn snapshot_with_links(current: i64) -> UsageSnapshot {
        UsageSnapshot::free_tier(ResourceCounts {
            links: current,
            ..ResourceCounts::default()
        })
    }

    #[test]
    fn allows_action_filling_the_last_slot() {
        // Free tier allows 5 links; the fifth create (current == 4) passes.
        let decision = can_perform_action(&snapshot_with_links(4), ActionKind::AddLink);

        assert!(decision.allowed);
        assert!(decision.message.is_none());
    }

    #[test]
    fn denies_once_count_is_at_capacity() {
        let decision = can_perform_action(&snapshot_with_links(5), ActionKind::AddLink);

        assert!(!decision.allowed);
    }

    #[test]
    fn denies_when_count_already_exceeds_capacity() {
        // Possible after a plan downgrade; over-limit rows are never deleted.
        let decision = can_perform_action(&snapshot_with_links(7), ActionKind::AddLink);

        assert!(!decision.allowed);
    }

    #[test]
    fn denial_message_names_the_numeric_limit() {
        let decision = can_perform_action(&snapshot_with_links(5), ActionKind::AddLink);

        let message = decision.message.unwrap();
        assert!(message.contains("5"));
        assert!(message.contains("link"));
    }

    #[test]
    fn gates_each_action_against_its_own_resource() {
        let snapshot = UsageSnapshot::free_tier(ResourceCounts {
            pages: 1,
            ..ResourceCounts::default()
        });

        assert!(!can_perform_action(&snapshot, ActionKind::AddPage).allowed);
        assert!(can_perform_action(&snapshot, ActionKind::AddBlock).allowed);
        assert!(can_perform_action(&snapshot, ActionKind::AddSocial).allowed);
    }
}

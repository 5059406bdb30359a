use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::enums::team_roles::TeamRole;

/// Result of resolving which team (if any) a user belongs to. Keeping the
/// failure case separate from "no team" lets usage counting treat a transient
/// lookup error as zero without confusing it with a legitimately solo user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamMembership {
    Member(Uuid),
    NotOnTeam,
    LookupFailed,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddTeamMemberRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub role: TeamRole,
}

#[derive(Debug, Serialize)]
pub struct TeamMemberDto {
    pub user_id: Uuid,
    pub role: TeamRole,
}

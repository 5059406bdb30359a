pub mod account_types;
pub mod block_kinds;
pub mod commission_statuses;
pub mod payment_statuses;
pub mod social_surfaces;
pub mod subscription_statuses;
pub mod team_roles;

pub mod affiliates;
pub mod blocks;
pub mod enums;
pub mod links;
pub mod pages;
pub mod payments;
pub mod plans;
pub mod socials;
pub mod subscriptions;
pub mod teams;
pub mod usage;
pub mod users;

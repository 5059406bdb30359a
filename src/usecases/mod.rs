pub mod admin;
pub mod affiliates;
pub mod blocks;
pub mod gate;
pub mod links;
pub mod ordering;
pub mod pages;
pub mod socials;
pub mod subscriptions;
pub mod teams;
pub mod usage;

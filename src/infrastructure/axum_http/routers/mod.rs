pub mod admin;
pub mod affiliates;
pub mod blocks;
pub mod links;
pub mod pages;
pub mod payment_webhook;
pub mod socials;
pub mod subscriptions;
pub mod teams;
pub mod usage;

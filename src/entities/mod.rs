pub mod user_subscriptions;

pub use user_subscriptions as user_subscription_entity;

pub mod price_filter;
pub mod subscription_service;

pub use price_filter::*;
pub use subscription_service::*;

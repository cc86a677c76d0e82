pub mod auth;
pub mod lottery;

pub use auth::auth_config;
pub use lottery::lottery_config;

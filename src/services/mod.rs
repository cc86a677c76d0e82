pub mod auth_service;
pub mod lottery_service;
pub mod prize_drawer;

pub use auth_service::*;
pub use lottery_service::*;
pub use prize_drawer::*;

pub mod prize_repository;
pub mod user_prize_repository;

pub use prize_repository::PrizeRepository;
pub use user_prize_repository::UserPrizeRepository;

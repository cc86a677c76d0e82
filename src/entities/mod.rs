pub mod prizes;
pub mod user_prizes;
pub mod users;

pub use prizes as prize_entity;
pub use user_prizes as user_prize_entity;
pub use users as user_entity;

pub mod channel_dto;
pub mod health_dto;
pub mod matches_dto;

pub use channel_dto::*;
pub use matches_dto::*;

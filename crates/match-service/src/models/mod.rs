pub mod likes;
pub mod messages;
pub mod profiles;

pub mod user;
pub mod post;

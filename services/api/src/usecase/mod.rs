pub mod comment;
pub mod review;
pub mod signup;
pub mod tag;
pub mod title;
pub mod token;
pub mod user;

//! Database query modules.

pub mod users;
pub mod videos;
pub mod watched;

//! Route handlers organized by resource

pub mod albums;
pub mod contact;
pub mod health;
pub mod songs;

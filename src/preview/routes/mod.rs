//! Preview route handlers

pub mod admin;
pub mod citizen;
pub mod health;
pub mod parties;

//! HTTP handlers

pub mod auth;
pub mod practice;
pub mod progress;
pub mod users;
pub mod words;

//! HTTP request handlers, grouped by area.
//!
//! Plain CRUD comes from the generic groups in [`crate::api::resource`];
//! the modules here add search, workflow and account endpoints.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod community;
pub mod content;
pub mod health;
pub mod media;

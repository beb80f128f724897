//! Promptdeck API Library
//!
//! Prompt template storage, editing sessions with live variable preview,
//! and model-provider settings, exposed over HTTP.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Infrastructure layer module
// Contains database adapters and external service integrations
// Follows Hexagonal Architecture

pub mod providers;
pub mod repositories;
pub mod settings;

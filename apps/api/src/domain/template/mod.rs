// Template domain module
// Template aggregate, variable scanning, persistence gateway and editing sessions

#![allow(clippy::module_inception)]

pub mod drafts;
pub mod errors;
pub mod gateway;
pub mod session;
pub mod template;
pub mod value_objects;
pub mod variables;

// Re-export main types for convenience
pub use drafts::{DraftError, DraftStore};
pub use errors::TemplateError;
pub use gateway::TemplateGateway;
pub use session::{EditingSession, SessionError, SessionState};
pub use template::{Template, TemplateFields, TemplatePatch};
pub use value_objects::TemplateSettings;

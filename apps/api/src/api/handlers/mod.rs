pub mod drafts;
pub mod settings;
pub mod templates;

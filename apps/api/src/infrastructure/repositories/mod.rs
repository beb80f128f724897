// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory_template_repository;
pub mod postgres_template_repository;

pub use in_memory_template_repository::InMemoryTemplateRepository;
pub use postgres_template_repository::PostgresTemplateRepository;

// Repository ports implemented by the infrastructure layer

pub mod template_repository;

pub use template_repository::TemplateRepository;

pub mod audit_repository;

pub use audit_repository::AuditRepository;

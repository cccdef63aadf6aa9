// Application layer - Use cases and repository ports
pub mod alignment_service;
pub mod dashboard_service;
pub mod error;
pub mod report_repository;
pub mod report_service;
pub mod session_service;

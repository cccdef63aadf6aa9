// Domain layer - Alignment math, scoring and report models
pub mod alignment;
pub mod dashboard;
pub mod precision;
pub mod report;
pub mod session;

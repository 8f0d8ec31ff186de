//! Content aggregation layer for a course-catalog site.

// Content pipeline
pub mod aggregate;
pub mod content;
pub mod upstream;

// Consumers
pub mod pages;
pub mod settings;
pub mod sitemap;

// Serving and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

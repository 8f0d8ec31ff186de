//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handlers)
//!     → request.rs (request ID assigned and echoed)
//!     → sitemap / pages / settings
//!     → response.rs (status mapping, content types)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id_of, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, StartupError};

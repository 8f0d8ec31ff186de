//! Page-level composition of content fetches.

pub mod loader;

pub use loader::{AboutPage, InterviewQuestionsPage, PageLoad, PageLoader, TermsKind, TermsPage};

//! Content model subsystem.
//!
//! # Data Flow
//! ```text
//! raw JSON body (any known envelope)
//!     → normalize.rs (envelope matchers, first match wins)
//!     → types.rs (serde coercion with per-field defaults)
//!     → canonical records for renderers, sitemap, footer widgets
//! ```

pub mod normalize;
pub mod types;

pub use normalize::{normalize_collection, normalize_populated_record, normalize_record, Envelope};
pub use types::{
    AboutContent, Addressable, Blog, Course, CourseDetails, Entity, FooterSettings, FormDetails,
    InterviewQuestionsContent, TermsContent,
};

/// Content API endpoint paths.
pub mod paths {
    pub const COURSES: &str = "/courses";
    pub const BLOGS: &str = "/blogs";
    pub const FOOTER_SETTINGS: &str = "/footer-settings";
    pub const FORM_DETAILS: &str = "/form-details";
    pub const ABOUT: &str = "/about-us";
    pub const INTERVIEW_QUESTIONS: &str = "/interview-questions";
    pub const TERMS: &str = "/terms-and-conditions";
    pub const TERMS_INSTRUCTOR: &str = "/terms-and-conditions/instructor";
}

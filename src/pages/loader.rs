//! Composite page loaders.
//!
//! Each page has one primary record and zero or more secondary fields,
//! all fetched concurrently through the [`Aggregator`]. Secondary fields
//! fall back to empty values. A missing primary record makes the page
//! unavailable.

use std::time::Duration;

use serde::Serialize;

use crate::aggregate::{resolve_optional, resolve_with_fallback, Aggregator, Settled};
use crate::config::PagesConfig;
use crate::content::{
    normalize_collection, normalize_populated_record, normalize_record, paths, AboutContent, Course, Entity,
    FormDetails, InterviewQuestionsContent, TermsContent,
};
use crate::upstream::{FetchError, UpstreamRequest};

/// Result of loading a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageLoad<P> {
    Ready(P),
    /// The primary record could not be obtained.
    Unavailable { page: &'static str },
}

impl<P> PageLoad<P> {
    pub fn is_ready(&self) -> bool {
        matches!(self, PageLoad::Ready(_))
    }

    pub fn into_ready(self) -> Option<P> {
        match self {
            PageLoad::Ready(page) => Some(page),
            PageLoad::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutPage {
    pub content: AboutContent,
    pub courses: Vec<Course>,
    pub form: FormDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewQuestionsPage {
    pub content: InterviewQuestionsContent,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TermsKind {
    General,
    Instructor,
}

impl TermsKind {
    /// Parse the route segment (`general` or `instructor`).
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "general" => Some(TermsKind::General),
            "instructor" => Some(TermsKind::Instructor),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            TermsKind::General => paths::TERMS,
            TermsKind::Instructor => paths::TERMS_INSTRUCTOR,
        }
    }

    fn page_name(&self) -> &'static str {
        match self {
            TermsKind::General => "terms",
            TermsKind::Instructor => "terms-instructor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermsPage {
    pub kind: TermsKind,
    pub content: TermsContent,
}

/// Loads composite pages with a per-request budget.
#[derive(Clone)]
pub struct PageLoader {
    aggregator: Aggregator,
    budget: Duration,
}

impl PageLoader {
    pub fn new(aggregator: Aggregator, budget: Duration) -> Self {
        Self { aggregator, budget }
    }

    pub fn from_config(aggregator: Aggregator, config: &PagesConfig) -> Self {
        Self::new(aggregator, Duration::from_millis(config.request_budget_ms))
    }

    fn request(&self, path: &str) -> UpstreamRequest {
        UpstreamRequest::new(path).with_deadline(self.budget)
    }

    pub async fn load_about(&self) -> PageLoad<AboutPage> {
        let requests = [
            self.request(paths::ABOUT),
            self.request(paths::COURSES),
            self.request(paths::FORM_DETAILS),
        ];
        let mut settled = self.aggregator.settle_all(&requests).await.into_iter();

        let content = resolve_optional(paths::ABOUT, next_settled(&mut settled, paths::ABOUT), |raw| {
            normalize_populated_record::<AboutContent>(raw, AboutContent::ENTITY)
        });
        let courses = courses_field(next_settled(&mut settled, paths::COURSES));
        let form = resolve_with_fallback(
            paths::FORM_DETAILS,
            next_settled(&mut settled, paths::FORM_DETAILS),
            FormDetails::default(),
            |raw| normalize_record(raw, FormDetails::ENTITY),
        );

        match content {
            Some(content) => PageLoad::Ready(AboutPage { content, courses, form }),
            None => unavailable("about", &courses),
        }
    }

    pub async fn load_interview_questions(&self) -> PageLoad<InterviewQuestionsPage> {
        let requests = [self.request(paths::INTERVIEW_QUESTIONS), self.request(paths::COURSES)];
        let mut settled = self.aggregator.settle_all(&requests).await.into_iter();

        let content = resolve_optional(
            paths::INTERVIEW_QUESTIONS,
            next_settled(&mut settled, paths::INTERVIEW_QUESTIONS),
            |raw| normalize_populated_record::<InterviewQuestionsContent>(raw, InterviewQuestionsContent::ENTITY),
        );
        let courses = courses_field(next_settled(&mut settled, paths::COURSES));

        match content {
            Some(content) => PageLoad::Ready(InterviewQuestionsPage { content, courses }),
            None => unavailable("interview-questions", &courses),
        }
    }

    pub async fn load_terms(&self, kind: TermsKind) -> PageLoad<TermsPage> {
        let path = kind.path();
        let mut settled = self.aggregator.settle_all(&[self.request(path)]).await.into_iter();

        let content = resolve_optional(path, next_settled(&mut settled, path), |raw| {
            normalize_populated_record::<TermsContent>(raw, TermsContent::ENTITY)
        });

        match content {
            Some(content) => PageLoad::Ready(TermsPage { kind, content }),
            None => unavailable(kind.page_name(), &[]),
        }
    }
}

fn courses_field(settled: Settled) -> Vec<Course> {
    resolve_with_fallback(paths::COURSES, settled, Vec::new(), |raw| {
        Some(normalize_collection(raw, Course::ENTITY))
    })
}

/// `settle_all` yields one result per request, so this only guards the
/// iterator contract.
fn next_settled(settled: &mut std::vec::IntoIter<Settled>, path: &str) -> Settled {
    settled
        .next()
        .unwrap_or_else(|| Err(FetchError::Network(format!("no result for {}", path))))
}

fn unavailable<P>(page: &'static str, courses: &[Course]) -> PageLoad<P> {
    if courses.is_empty() {
        tracing::warn!(page, "Primary content unavailable");
    } else {
        tracing::warn!(
            page,
            courses = courses.len(),
            "Primary content unavailable; secondary course data was fetched but is unused"
        );
    }
    PageLoad::Unavailable { page }
}

//! Canonical content records.
//!
//! Every record deserializes from whatever subset of fields the content API
//! sends. Absent fields, explicit `null`s and values of the wrong shape
//! collapse to defaults (empty string, empty vector, `None`), so renderers
//! only ever branch on "empty".

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Entity name used as the envelope key hint (e.g. `{"courses": [...]}`).
pub trait Entity {
    const ENTITY: &'static str;
}

/// Records that can be addressed by a URL path segment.
pub trait Addressable {
    fn id(&self) -> Option<u64>;
    fn slug(&self) -> Option<&str>;
    /// Best-known modification timestamp as sent by the API.
    fn modified_at(&self) -> Option<&str>;

    /// Slug when present and non-empty, otherwise the numeric id.
    fn path_segment(&self) -> Option<String> {
        match self.slug().map(str::trim) {
            Some(slug) if !slug.is_empty() => Some(slug.to_string()),
            _ => self.id().map(|id| id.to_string()),
        }
    }
}

/// Any value that does not fit `T` (`null`, `[]` for an object, a number for
/// a string) collapses to `T::default()` instead of rejecting the record.
fn tolerant<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Ids arrive as numbers or numeric strings depending on the endpoint.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

// ============================================================================
// Courses
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "tolerant")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub title: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub description: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub duration: Option<String>,
    #[serde(default, alias = "updatedAt", deserialize_with = "tolerant")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub details: CourseDetails,
}

impl Entity for Course {
    const ENTITY: &'static str = "courses";
}

impl Addressable for Course {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn modified_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }
}

/// Course detail sub-record. Always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseDetails {
    #[serde(default, deserialize_with = "tolerant")]
    pub agenda: Vec<AgendaSection>,
    #[serde(default, deserialize_with = "tolerant")]
    pub why_choose: Vec<Highlight>,
    #[serde(default, deserialize_with = "tolerant")]
    pub features: Vec<Highlight>,
    #[serde(default, deserialize_with = "tolerant")]
    pub prerequisites: Vec<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgendaSection {
    #[serde(default, deserialize_with = "tolerant")]
    pub title: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(default, deserialize_with = "tolerant")]
    pub title: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(default, deserialize_with = "tolerant")]
    pub question: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub answer: String,
}

// ============================================================================
// Blogs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "tolerant")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub title: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub author: Option<String>,
    #[serde(default, alias = "publishedAt", deserialize_with = "tolerant")]
    pub published_at: Option<String>,
    #[serde(default, alias = "updatedAt", deserialize_with = "tolerant")]
    pub updated_at: Option<String>,
}

impl Entity for Blog {
    const ENTITY: &'static str = "blogs";
}

impl Addressable for Blog {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn modified_at(&self) -> Option<&str> {
        self.updated_at.as_deref().or(self.published_at.as_deref())
    }
}

// ============================================================================
// Site-wide records
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FooterSettings {
    #[serde(default, deserialize_with = "tolerant")]
    pub company_name: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub description: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub social_links: Vec<SocialLink>,
    #[serde(default, deserialize_with = "tolerant")]
    pub quick_links: Vec<FooterLink>,
    #[serde(default, deserialize_with = "tolerant")]
    pub copyright: Option<String>,
}

impl Entity for FooterSettings {
    const ENTITY: &'static str = "footer_settings";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(default, deserialize_with = "tolerant")]
    pub platform: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FooterLink {
    #[serde(default, deserialize_with = "tolerant")]
    pub label: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub url: String,
}

/// Enquiry form presentation details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDetails {
    #[serde(default, deserialize_with = "tolerant")]
    pub title: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub description: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub course_options: Vec<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub submit_label: Option<String>,
}

impl FormDetails {
    pub fn submit_label(&self) -> &str {
        match self.submit_label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => "Submit",
        }
    }
}

impl Entity for FormDetails {
    const ENTITY: &'static str = "form_details";
}

/// SEO fields consumed by the metadata generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoMeta {
    #[serde(default, deserialize_with = "tolerant")]
    pub meta_title: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub meta_description: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub canonical_url: Option<String>,
}

// ============================================================================
// Page content
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AboutContent {
    #[serde(default, deserialize_with = "tolerant")]
    pub title: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub body: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub mission: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub vision: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub stats: Vec<Stat>,
    #[serde(default, deserialize_with = "tolerant")]
    pub team: Vec<TeamMember>,
    #[serde(default, deserialize_with = "tolerant")]
    pub seo: SeoMeta,
}

impl Entity for AboutContent {
    const ENTITY: &'static str = "about";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    #[serde(default, deserialize_with = "tolerant")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default, deserialize_with = "tolerant")]
    pub name: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub role: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "tolerant")]
    pub question: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub answer: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub course_slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestionsContent {
    #[serde(default, deserialize_with = "tolerant")]
    pub title: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub description: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub questions: Vec<InterviewQuestion>,
    #[serde(default, deserialize_with = "tolerant")]
    pub seo: SeoMeta,
}

impl Entity for InterviewQuestionsContent {
    const ENTITY: &'static str = "interview_questions";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermsContent {
    #[serde(default, deserialize_with = "tolerant")]
    pub title: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub sections: Vec<TermsSection>,
    #[serde(default, deserialize_with = "tolerant")]
    pub seo: SeoMeta,
}

impl Entity for TermsContent {
    const ENTITY: &'static str = "terms";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermsSection {
    #[serde(default, deserialize_with = "tolerant")]
    pub heading: String,
    #[serde(default, deserialize_with = "tolerant")]
    pub body: String,
}

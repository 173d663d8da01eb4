use serde::{Deserialize, Serialize};

/// Multipart field name for the optional binary icon on project creation.
pub const ICON_FIELD: &str = "icon";

/// Client-local uncommitted state for a new project submission. Lives only
/// on the client; the empty default is restored after every submission
/// attempt, whatever the backend answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub tagline: String,
    pub description: String,
    pub description_secondary: String,
    pub app_store_url: String,
}

/// Keys for the draft's text fields. `set_field` accepts any string,
/// including empty; the draft performs no validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Name,
    Slug,
    Category,
    Tagline,
    Description,
    DescriptionSecondary,
    AppStoreUrl,
}

impl DraftField {
    /// Wire name of the multipart text field this key maps to.
    pub fn field_name(self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Slug => "slug",
            DraftField::Category => "category",
            DraftField::Tagline => "tagline",
            DraftField::Description => "description",
            DraftField::DescriptionSecondary => "description_secondary",
            DraftField::AppStoreUrl => "app_store_url",
        }
    }
}

impl ProjectDraft {
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Name => self.name = value,
            DraftField::Slug => self.slug = value,
            DraftField::Category => self.category = value,
            DraftField::Tagline => self.tagline = value,
            DraftField::Description => self.description = value,
            DraftField::DescriptionSecondary => self.description_secondary = value,
            DraftField::AppStoreUrl => self.app_store_url = value,
        }
    }

    /// The seven text fields in submission order, paired with their wire
    /// names. Order matches the admin form layout.
    pub fn text_fields(&self) -> [(&'static str, &str); 7] {
        [
            ("name", self.name.as_str()),
            ("slug", self.slug.as_str()),
            ("category", self.category.as_str()),
            ("tagline", self.tagline.as_str()),
            ("description", self.description.as_str()),
            ("description_secondary", self.description_secondary.as_str()),
            ("app_store_url", self.app_store_url.as_str()),
        ]
    }
}

/// Binary icon attachment staged alongside the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

//! Canonical record shape shared by games and devices.

use rmgd_core::{parse_year, RecordStatus};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default category for records that don't name one.
pub const DEFAULT_CATEGORY: &str = "other";
/// Name given to records whose input carried no usable name.
pub const UNTITLED: &str = "Untitled";

/// A normalized game or device catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub name: String,
    pub category: String,
    pub maker: String,
    /// Free text as entered. Use [`Record::parsed_year`] for numeric work.
    pub year: Option<String>,
    pub description: String,
    /// Image URLs in display order.
    pub images: Vec<String>,
    pub status: RecordStatus,
    pub submitted_by: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Record {
    /// A record with the given identity and every other field at its default.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            maker: String::new(),
            year: None,
            description: String::new(),
            images: Vec::new(),
            status: RecordStatus::default(),
            submitted_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Year inside the catalog era, or `None` when unknown.
    pub fn parsed_year(&self) -> Option<i32> {
        self.year.as_deref().and_then(parse_year)
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// Canonical JSON form. Feeding this back through the normalizer
    /// yields an identical record.
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "category": self.category,
            "maker": self.maker,
            "year": self.year,
            "description": self.description,
            "images": self.images,
            "status": self.status.as_str(),
            "submittedBy": self.submitted_by,
            "createdAt": self.created_at,
            "updatedAt": self.updated_at,
        })
    }
}

/// A partial update produced by an edit form.
///
/// Only fields that are `Some` are applied. `year: Some("")` clears the year;
/// `images: Some(..)` replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge this patch into `record`, stamping `updated_at`.
    ///
    /// `id`, `submitted_by` and `created_at` are never touched.
    pub fn apply(&self, record: &mut Record, now: &str) {
        if let Some(name) = &self.name {
            let name = name.trim();
            if !name.is_empty() {
                record.name = name.to_string();
            }
        }
        if let Some(category) = &self.category {
            let category = category.trim();
            record.category = if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_string()
            };
        }
        if let Some(maker) = &self.maker {
            record.maker = maker.trim().to_string();
        }
        if let Some(year) = &self.year {
            let year = year.trim();
            record.year = (!year.is_empty()).then(|| year.to_string());
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(images) = &self.images {
            record.images = images
                .iter()
                .map(|url| url.trim())
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        record.updated_at = Some(now.to_string());
    }
}

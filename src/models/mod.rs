use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Title and description length enforced by the form (the backend does not).
pub(crate) const MAX_FIELD_CHARS: usize = 100;

/// Logged-in Appwrite account (`GET /account`).
///
/// Only the fields the dashboard shows are kept; the rest of the payload is ignored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct AccountInfo {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl AccountInfo {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// Wire strings are fixed by existing documents, including the capital `Completed`.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
)]
pub(crate) enum IdeaStatus {
    #[default]
    #[serde(rename = "in-progress")]
    #[strum(serialize = "in-progress")]
    InProgress,
    #[serde(rename = "Completed")]
    #[strum(serialize = "Completed")]
    Completed,
    #[serde(rename = "on-hold")]
    #[strum(serialize = "on-hold")]
    OnHold,
}

impl IdeaStatus {
    pub fn label(self) -> &'static str {
        match self {
            IdeaStatus::InProgress => "In Progress",
            IdeaStatus::Completed => "Completed",
            IdeaStatus::OnHold => "On Hold",
        }
    }
}

#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Priority {
    High,
    Medium,
    Low,
}

/// One file attached to an idea.
///
/// Uploads that failed are kept so the user can see what went missing; they never carry a
/// file id and therefore can't be opened.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub(crate) enum Attachment {
    #[serde(rename_all = "camelCase")]
    Stored {
        file_id: String,
        file_name: String,
        file_size: u64,
        mime_type: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        uploaded_at: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        file_name: String,
        file_size: u64,
        mime_type: String,
        upload_error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        uploaded_at: Option<DateTime<Utc>>,
    },
}

/// Attachment entry as written by any app version. Only `fileName` is required.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttachment {
    #[serde(default)]
    file_id: Option<String>,
    file_name: String,
    #[serde(default)]
    file_size: Option<u64>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    upload_error: Option<String>,
    #[serde(default)]
    uploaded_at: Option<DateTime<Utc>>,
}

impl From<RawAttachment> for Attachment {
    fn from(raw: RawAttachment) -> Self {
        let file_size = raw.file_size.unwrap_or_default();
        let mime_type = raw.mime_type.unwrap_or_default();
        let file_id = raw.file_id.filter(|id| !id.trim().is_empty());

        // A recorded upload error wins over a file id.
        match (file_id, raw.upload_error) {
            (Some(file_id), None) => Attachment::Stored {
                file_id,
                file_name: raw.file_name,
                file_size,
                mime_type,
                uploaded_at: raw.uploaded_at,
            },
            (_, upload_error) => Attachment::Failed {
                file_name: raw.file_name,
                file_size,
                mime_type,
                upload_error: upload_error.unwrap_or_default(),
                uploaded_at: raw.uploaded_at,
            },
        }
    }
}

impl<'de> Deserialize<'de> for Attachment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawAttachment::deserialize(deserializer).map(Attachment::from)
    }
}

impl Attachment {
    pub fn file_name(&self) -> &str {
        match self {
            Attachment::Stored { file_name, .. } | Attachment::Failed { file_name, .. } => {
                file_name
            }
        }
    }

    pub fn file_size(&self) -> u64 {
        match self {
            Attachment::Stored { file_size, .. } | Attachment::Failed { file_size, .. } => {
                *file_size
            }
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            Attachment::Stored { mime_type, .. } | Attachment::Failed { mime_type, .. } => {
                mime_type
            }
        }
    }

    /// Only stored attachments may be viewed or downloaded.
    pub fn file_id(&self) -> Option<&str> {
        match self {
            Attachment::Stored { file_id, .. } if !file_id.trim().is_empty() => Some(file_id),
            _ => None,
        }
    }

    pub fn upload_error(&self) -> Option<&str> {
        match self {
            Attachment::Failed { upload_error, .. } => Some(upload_error),
            Attachment::Stored { .. } => None,
        }
    }
}

/// Decode the `attachments` string attribute entry by entry.
///
/// Returns the readable attachments plus every entry that could not be read, verbatim.
/// A blob that is not a JSON array comes back whole as a single unreadable entry.
pub(crate) fn decode_attachments(blob: &str) -> (Vec<Attachment>, Vec<serde_json::Value>) {
    if blob.trim().is_empty() {
        return (vec![], vec![]);
    }

    let entries = match serde_json::from_str::<serde_json::Value>(blob) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(other) => {
            log::warn!("attachments blob is not a list; keeping it as is");
            return (vec![], vec![other]);
        }
        Err(e) => {
            log::warn!("attachments blob is not json, keeping it as is: {e}");
            return (vec![], vec![serde_json::Value::String(blob.to_string())]);
        }
    };

    let mut items = Vec::with_capacity(entries.len());
    let mut unreadable = Vec::new();
    for entry in entries {
        match Attachment::deserialize(&entry) {
            Ok(item) => items.push(item),
            Err(e) => {
                log::warn!("skipping unreadable attachment entry: {e}");
                unreadable.push(entry);
            }
        }
    }
    (items, unreadable)
}

/// Encode attachments for the `attachments` attribute. Unreadable entries are appended
/// untouched so a save never loses them.
pub(crate) fn encode_attachments(items: &[Attachment], unreadable: &[serde_json::Value]) -> String {
    let mut entries: Vec<serde_json::Value> = items
        .iter()
        .filter_map(|a| serde_json::to_value(a).ok())
        .collect();
    entries.extend(unreadable.iter().cloned());
    serde_json::Value::Array(entries).to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Idea {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: IdeaStatus,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub attachments: Vec<Attachment>,
    /// Stored attachment entries this version can't read.
    pub unreadable_attachments: Vec<serde_json::Value>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
}

impl Idea {
    /// `needle` must already be lowercased.
    pub fn matches_term(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Editable fields of an idea, as sent on create and update.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct IdeaDraft {
    pub title: String,
    pub description: String,
    pub status: IdeaStatus,
    pub attachments: Vec<Attachment>,
    pub unreadable_attachments: Vec<serde_json::Value>,
}

impl IdeaDraft {
    pub fn from_idea(idea: &Idea) -> Self {
        Self {
            title: idea.title.clone(),
            description: idea.description.clone(),
            status: idea.status,
            attachments: idea.attachments.clone(),
            unreadable_attachments: idea.unreadable_attachments.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Description is required".to_string());
        }
        if self.title.chars().count() > MAX_FIELD_CHARS {
            return Err(format!("Title must be at most {MAX_FIELD_CHARS} characters"));
        }
        if self.description.chars().count() > MAX_FIELD_CHARS {
            return Err(format!(
                "Description must be at most {MAX_FIELD_CHARS} characters"
            ));
        }
        Ok(())
    }
}

use super::{ApiClient, ApiError, ApiResult, Query, encode_queries};
use crate::backend::IdeaStore;
use crate::models::{Idea, IdeaDraft, IdeaStatus, Priority, decode_attachments, encode_attachments};
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Attribute carrying the full-text index. Older documents also have `Title`.
const TITLE_ATTRIBUTE: &str = "title";
const LEGACY_TITLE_ATTRIBUTE: &str = "Title";
const LIST_LIMIT: u32 = 100;

/// Turn one Appwrite document into an `Idea`.
///
/// Documents have been written by several app versions, so every field is read
/// defensively. Only a missing `$id` makes the document unusable.
pub(crate) fn parse_idea_document(doc: &serde_json::Value) -> Option<Idea> {
    let get_s = |k: &str| doc.get(k).and_then(|v| v.as_str()).map(|s| s.to_string());

    let id = get_s("$id").filter(|s| !s.trim().is_empty())?;

    let title = get_s(TITLE_ATTRIBUTE)
        .filter(|s| !s.is_empty())
        .or_else(|| get_s(LEGACY_TITLE_ATTRIBUTE))
        .unwrap_or_default();

    let status = get_s("status")
        .and_then(|s| IdeaStatus::from_str(&s).ok())
        .unwrap_or_default();

    let created_at = get_s("$createdAt")
        .or_else(|| get_s("createdAt"))
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default();

    let priority = get_s("priority").and_then(|s| Priority::from_str(s.trim()).ok());
    let category = get_s("category")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let (attachments, unreadable_attachments) =
        decode_attachments(&get_s("attachments").unwrap_or_default());

    Some(Idea {
        id,
        title,
        description: get_s("description").unwrap_or_default(),
        status,
        owner_id: get_s("userId").unwrap_or_default(),
        created_at,
        attachments,
        unreadable_attachments,
        priority,
        category,
    })
}

pub(crate) fn parse_document_list(data: serde_json::Value) -> Vec<Idea> {
    data.get("documents")
        .and_then(|v| v.as_array())
        .map(|docs| docs.iter().filter_map(parse_idea_document).collect())
        .unwrap_or_default()
}

fn draft_data(draft: &IdeaDraft) -> serde_json::Map<String, serde_json::Value> {
    let mut data = serde_json::Map::new();
    data.insert(TITLE_ATTRIBUTE.into(), draft.title.trim().into());
    data.insert("description".into(), draft.description.trim().into());
    data.insert("status".into(), draft.status.as_ref().into());
    data.insert(
        "attachments".into(),
        encode_attachments(&draft.attachments, &draft.unreadable_attachments).into(),
    );
    data
}

pub(crate) fn owner_permissions(owner_id: &str) -> Vec<String> {
    ["read", "update", "delete"]
        .iter()
        .map(|action| format!("{action}(\"user:{owner_id}\")"))
        .collect()
}

impl ApiClient {
    async fn list_documents(&self, queries: &[Query]) -> ApiResult<Vec<Idea>> {
        let path = format!(
            "{}?{}",
            self.config.documents_path(),
            encode_queries(queries)
        );
        let data: serde_json::Value = self
            .request_json(reqwest::Method::GET, &path, None)
            .await?;
        Ok(parse_document_list(data))
    }

    fn document_from_response(data: serde_json::Value) -> ApiResult<Idea> {
        parse_idea_document(&data)
            .ok_or_else(|| ApiError::parse(format!("response is missing document id: {data}")))
    }
}

impl IdeaStore for ApiClient {
    async fn list_ideas(&self) -> ApiResult<Vec<Idea>> {
        self.list_documents(&[Query::order_desc("$createdAt"), Query::limit(LIST_LIMIT)])
            .await
    }

    async fn search_ideas(&self, term: &str) -> ApiResult<Vec<Idea>> {
        self.list_documents(&[
            Query::search(TITLE_ATTRIBUTE, term),
            Query::order_desc("$createdAt"),
        ])
        .await
    }

    async fn ideas_by_status(&self, status: IdeaStatus) -> ApiResult<Vec<Idea>> {
        self.list_documents(&[
            Query::equal("status", status.as_ref()),
            Query::order_desc("$createdAt"),
        ])
        .await
    }

    async fn create_idea(&self, draft: &IdeaDraft, owner_id: &str) -> ApiResult<Idea> {
        let mut data = draft_data(draft);
        data.insert("userId".into(), owner_id.into());
        data.insert("createdAt".into(), Utc::now().to_rfc3339().into());

        let body = serde_json::json!({
            "documentId": "unique()",
            "data": data,
            "permissions": owner_permissions(owner_id),
        });

        log::debug!("creating idea for {owner_id}");
        let res: serde_json::Value = self
            .request_json(
                reqwest::Method::POST,
                &self.config.documents_path(),
                Some(&body),
            )
            .await?;
        Self::document_from_response(res)
    }

    async fn update_idea(&self, id: &str, draft: &IdeaDraft) -> ApiResult<Idea> {
        let body = serde_json::json!({ "data": draft_data(draft) });
        let path = format!("{}/{}", self.config.documents_path(), id);
        let res: serde_json::Value = self
            .request_json(reqwest::Method::PATCH, &path, Some(&body))
            .await?;
        Self::document_from_response(res)
    }

    async fn delete_idea(&self, id: &str) -> ApiResult<()> {
        let path = format!("{}/{}", self.config.documents_path(), id);
        self.request_empty(reqwest::Method::DELETE, &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attachment;

    #[test]
    fn test_parse_idea_document_full() {
        let doc = serde_json::json!({
            "$id": "i1",
            "$createdAt": "2024-05-01T10:00:00.000+00:00",
            "title": "Solar backpack",
            "description": "charges via USB-C",
            "status": "Completed",
            "userId": "u1",
            "attachments": "[{\"fileId\":\"f1\",\"fileName\":\"a.png\",\"fileSize\":3,\"mimeType\":\"image/png\",\"uploadedAt\":\"2024-05-01T10:00:00.000Z\"}]",
            "priority": "high",
            "category": "tech"
        });
        let idea = parse_idea_document(&doc).expect("document should parse");
        assert_eq!(idea.id, "i1");
        assert_eq!(idea.title, "Solar backpack");
        assert_eq!(idea.status, IdeaStatus::Completed);
        assert_eq!(idea.owner_id, "u1");
        assert_eq!(idea.created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert_eq!(idea.priority, Some(Priority::High));
        assert_eq!(idea.category.as_deref(), Some("tech"));
        assert!(matches!(idea.attachments[0], Attachment::Stored { .. }));
    }

    #[test]
    fn test_parse_idea_document_legacy_and_missing_fields() {
        let doc = serde_json::json!({
            "$id": "i2",
            "Title": "Old title",
            "description": "d",
            "status": "archived",
            "createdAt": "2023-01-02T03:04:05Z",
            "attachments": "",
            "priority": "urgent",
            "category": "  "
        });
        let idea = parse_idea_document(&doc).expect("document should parse");
        assert_eq!(idea.title, "Old title");
        assert_eq!(idea.status, IdeaStatus::InProgress);
        assert_eq!(idea.created_at.to_rfc3339(), "2023-01-02T03:04:05+00:00");
        assert!(idea.attachments.is_empty());
        assert!(idea.priority.is_none());
        assert!(idea.category.is_none());
        assert!(idea.owner_id.is_empty());
    }

    #[test]
    fn test_parse_document_list_skips_documents_without_id() {
        let data = serde_json::json!({
            "total": 2,
            "documents": [
                {"title": "no id"},
                {"$id": "i3", "title": "kept"}
            ]
        });
        let ideas = parse_document_list(data);
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].id, "i3");
    }

    #[test]
    fn test_draft_data_encodes_attachments_as_string() {
        let draft = IdeaDraft {
            title: " Solar backpack ".to_string(),
            description: "charges via USB-C".to_string(),
            ..Default::default()
        };
        let data = draft_data(&draft);
        assert_eq!(data["title"], "Solar backpack");
        assert_eq!(data["status"], "in-progress");
        assert_eq!(data["attachments"], "[]");
    }

    #[test]
    fn test_edit_keeps_unreadable_attachment_entries() {
        let doc = serde_json::json!({
            "$id": "i4",
            "title": "Solar backpack",
            "description": "d",
            "attachments": "[{\"fileId\":\"f1\",\"fileName\":\"a.png\"},{\"fileId\":\"f2\",\"fileSize\":\"big\"}]"
        });
        let idea = parse_idea_document(&doc).expect("document should parse");
        assert_eq!(idea.attachments.len(), 1);
        assert_eq!(idea.unreadable_attachments.len(), 1);

        let mut draft = IdeaDraft::from_idea(&idea);
        draft.title = "Renamed".to_string();
        let data = draft_data(&draft);
        let written: serde_json::Value = serde_json::from_str(
            data["attachments"].as_str().expect("attachments is a string"),
        )
        .expect("valid json");
        assert_eq!(written[0]["fileId"], "f1");
        assert_eq!(written[1], serde_json::json!({"fileId": "f2", "fileSize": "big"}));
    }

    #[test]
    fn test_edit_keeps_non_list_attachment_blob() {
        let doc = serde_json::json!({
            "$id": "i5",
            "title": "t",
            "description": "d",
            "attachments": "not json"
        });
        let idea = parse_idea_document(&doc).expect("document should parse");
        let data = draft_data(&IdeaDraft::from_idea(&idea));
        assert_eq!(data["attachments"], "[\"not json\"]");
    }

    #[test]
    fn test_owner_permissions() {
        assert_eq!(
            owner_permissions("u1"),
            vec![
                "read(\"user:u1\")".to_string(),
                "update(\"user:u1\")".to_string(),
                "delete(\"user:u1\")".to_string(),
            ]
        );
    }
}

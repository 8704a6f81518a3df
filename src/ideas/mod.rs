//! Create, edit and delete ideas together with their attachments, and keep the local
//! snapshot in step with the backend.

use crate::api::{ApiError, ApiResult};
use crate::attachments::{delete_attachment_files, upload_attachments};
use crate::backend::{FileStore, IdeaStore, LocalFile};
use crate::models::{Idea, IdeaDraft};
use chrono::{DateTime, Utc};

/// Upload `files`, then create the idea. Upload failures end up as failed attachments;
/// only the create call itself can fail.
pub(crate) async fn submit_new_idea<S: IdeaStore, F: FileStore>(
    ideas: &S,
    files: &F,
    owner_id: &str,
    mut draft: IdeaDraft,
    new_files: &[LocalFile],
    clock: impl Fn() -> DateTime<Utc>,
    on_progress: &mut dyn FnMut(u8),
) -> ApiResult<Idea> {
    draft.validate().map_err(ApiError::validation)?;
    let uploaded = upload_attachments(files, new_files, clock, on_progress).await;
    draft.attachments.extend(uploaded);
    let idea = ideas.create_idea(&draft, owner_id).await?;
    log::info!("created idea {}", idea.id);
    Ok(idea)
}

/// Update `existing` with `draft`. New uploads are appended after the attachments
/// already on the draft.
pub(crate) async fn submit_idea_edit<S: IdeaStore, F: FileStore>(
    ideas: &S,
    files: &F,
    existing: &Idea,
    mut draft: IdeaDraft,
    new_files: &[LocalFile],
    clock: impl Fn() -> DateTime<Utc>,
    on_progress: &mut dyn FnMut(u8),
) -> ApiResult<Idea> {
    draft.validate().map_err(ApiError::validation)?;
    let uploaded = upload_attachments(files, new_files, clock, on_progress).await;
    draft.attachments.extend(uploaded);
    let idea = ideas.update_idea(&existing.id, &draft).await?;
    log::info!("updated idea {}", idea.id);
    Ok(idea)
}

/// Delete the idea, then its stored files on a best-effort basis.
pub(crate) async fn remove_idea<S: IdeaStore, F: FileStore>(
    ideas: &S,
    files: &F,
    idea: &Idea,
) -> ApiResult<()> {
    ideas.delete_idea(&idea.id).await?;
    delete_attachment_files(files, &idea.attachments).await;
    log::info!("deleted idea {}", idea.id);
    Ok(())
}

/// Replace the idea with the same id, or put a new one at the front (newest first).
pub(crate) fn upsert_idea(list: &mut Vec<Idea>, idea: Idea) {
    match list.iter_mut().find(|i| i.id == idea.id) {
        Some(slot) => *slot = idea,
        None => list.insert(0, idea),
    }
}

pub(crate) fn remove_from_snapshot(list: &mut Vec<Idea>, id: &str) {
    list.retain(|i| i.id != id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;
    use crate::filter::{resolve_visible_ideas, FilterState, StatusFilter};
    use crate::models::{encode_attachments, IdeaStatus};
    use crate::stats::IdeaStats;
    use crate::testing::{idea_at, MemoryFiles, MemoryStore};
    use chrono::TimeZone;

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0)
            .single()
            .expect("valid time")
    }

    fn solar_draft() -> IdeaDraft {
        IdeaDraft {
            title: "Solar backpack".to_string(),
            description: "charges via USB-C".to_string(),
            ..Default::default()
        }
    }

    fn older_ideas() -> Vec<Idea> {
        vec![idea_at(
            "old",
            "Tea timer",
            "steeps tea",
            IdeaStatus::Completed,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .expect("valid time"),
        )]
    }

    #[tokio::test]
    async fn test_create_search_filter_delete_scenario() {
        let store = MemoryStore::with_ideas(older_ideas());
        let files = MemoryFiles::default();

        let created = submit_new_idea(&store, &files, "u1", solar_draft(), &[], clock, &mut |_| {})
            .await
            .expect("create should succeed");
        assert_eq!(created.status, IdeaStatus::InProgress);
        assert_eq!(encode_attachments(&created.attachments, &created.unreadable_attachments), "[]");
        assert_eq!(created.owner_id, "u1");

        let all = store.list_ideas().await.expect("list should succeed");
        assert_eq!(all[0].id, created.id);
        let before = IdeaStats::from_ideas(&all);
        assert_eq!(before.status_count(IdeaStatus::InProgress), 1);

        let now = Utc::now();
        let mut filter = FilterState {
            term: "solar".to_string(),
            ..Default::default()
        };
        let visible = resolve_visible_ideas(&store, &all, &filter, &now).await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Solar backpack");

        filter.status = StatusFilter::Only(IdeaStatus::Completed);
        let visible = resolve_visible_ideas(&store, &all, &filter, &now).await;
        assert!(visible.is_empty());

        remove_idea(&store, &files, &created)
            .await
            .expect("delete should succeed");
        let all = store.list_ideas().await.expect("list should succeed");
        assert!(all.iter().all(|i| i.id != created.id));
        let after = IdeaStats::from_ideas(&all);
        assert_eq!(after.total, before.total - 1);
        assert_eq!(after.status_count(IdeaStatus::InProgress), 0);
    }

    #[tokio::test]
    async fn test_create_with_partial_upload_failure_still_creates() {
        let store = MemoryStore::default();
        let files = MemoryFiles {
            failing: vec!["b.txt".to_string()],
            ..Default::default()
        };
        let picked: Vec<LocalFile> = ["a.txt", "b.txt", "c.txt"]
            .iter()
            .map(|n| LocalFile {
                name: n.to_string(),
                mime_type: "text/plain".to_string(),
                bytes: vec![1, 2, 3],
            })
            .collect();

        let created = submit_new_idea(&store, &files, "u1", solar_draft(), &picked, clock, &mut |_| {})
            .await
            .expect("create should succeed");
        assert_eq!(created.attachments.len(), 3);
        assert!(created.attachments[0].file_id().is_some());
        assert!(created.attachments[1].file_id().is_none());
        assert!(created.attachments[1].upload_error().is_some());
        assert!(created.attachments[2].file_id().is_some());
    }

    #[tokio::test]
    async fn test_edit_appends_new_attachments() {
        let store = MemoryStore::default();
        let files = MemoryFiles::default();
        let one = [LocalFile {
            name: "one.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0; 4],
        }];
        let created = submit_new_idea(&store, &files, "u1", solar_draft(), &one, clock, &mut |_| {})
            .await
            .expect("create should succeed");

        let mut draft = IdeaDraft::from_idea(&created);
        draft.status = IdeaStatus::OnHold;
        let two = [LocalFile {
            name: "two.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0; 8],
        }];
        let updated = submit_idea_edit(&store, &files, &created, draft, &two, clock, &mut |_| {})
            .await
            .expect("edit should succeed");
        assert_eq!(updated.status, IdeaStatus::OnHold);
        let names: Vec<&str> = updated.attachments.iter().map(|a| a.file_name()).collect();
        assert_eq!(names, vec!["one.png", "two.png"]);
    }

    #[tokio::test]
    async fn test_edit_keeps_entries_it_cannot_read() {
        let mut idea = idea_at("i1", "Solar backpack", "charges", IdeaStatus::InProgress, clock());
        idea.unreadable_attachments = vec![serde_json::json!({"fileId": "f0", "fileSize": "big"})];
        let store = MemoryStore::with_ideas(vec![idea.clone()]);
        let files = MemoryFiles::default();
        let new = [LocalFile {
            name: "new.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0; 2],
        }];

        let updated = submit_idea_edit(&store, &files, &idea, IdeaDraft::from_idea(&idea), &new, clock, &mut |_| {})
            .await
            .expect("edit should succeed");
        assert_eq!(updated.attachments.len(), 1);
        assert_eq!(updated.unreadable_attachments, idea.unreadable_attachments);
    }

    #[tokio::test]
    async fn test_mutation_errors_propagate() {
        let store = MemoryStore::default();
        store.set_fail_mutations(true);
        let files = MemoryFiles::default();
        let res = submit_new_idea(&store, &files, "u1", solar_draft(), &[], clock, &mut |_| {}).await;
        assert!(res.is_err());

        let invalid = IdeaDraft::default();
        store.set_fail_mutations(false);
        let err = submit_new_idea(&store, &files, "u1", invalid, &[], clock, &mut |_| {})
            .await
            .expect_err("empty draft should be rejected");
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.message, "Title is required");
        assert!(store.list_ideas().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_stored_files() {
        let store = MemoryStore::default();
        let files = MemoryFiles::default();
        let picked = [LocalFile {
            name: "a.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: vec![1],
        }];
        let created = submit_new_idea(&store, &files, "u1", solar_draft(), &picked, clock, &mut |_| {})
            .await
            .expect("create should succeed");
        remove_idea(&store, &files, &created)
            .await
            .expect("delete should succeed");
        assert_eq!(*files.deleted.borrow(), vec!["file-1".to_string()]);
    }

    #[test]
    fn test_snapshot_helpers() {
        let t = clock();
        let mut list = vec![idea_at("a", "A", "a", IdeaStatus::InProgress, t)];

        upsert_idea(&mut list, idea_at("b", "B", "b", IdeaStatus::InProgress, t));
        assert_eq!(list[0].id, "b");

        upsert_idea(&mut list, idea_at("a", "A2", "a", IdeaStatus::Completed, t));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].title, "A2");

        remove_from_snapshot(&mut list, "b");
        assert_eq!(list.len(), 1);
        remove_from_snapshot(&mut list, "missing");
        assert_eq!(list.len(), 1);
    }
}

//! In-memory backend doubles shared by unit tests.

use crate::api::{ApiError, ApiResult};
use crate::backend::{AccountBackend, FileStore, IdeaStore, LocalFile, StoredFile};
use crate::models::{AccountInfo, Idea, IdeaDraft, IdeaStatus};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::{Cell, RefCell};

pub(crate) fn idea_at(
    id: &str,
    title: &str,
    description: &str,
    status: IdeaStatus,
    created_at: DateTime<Utc>,
) -> Idea {
    Idea {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        owner_id: "u1".to_string(),
        created_at,
        attachments: vec![],
        unreadable_attachments: vec![],
        priority: None,
        category: None,
    }
}

/// Idea collection with the backend's ordering rules. Search is a case-insensitive title match.
#[derive(Default)]
pub(crate) struct MemoryStore {
    ideas: RefCell<Vec<Idea>>,
    calls: RefCell<Vec<String>>,
    fail_queries: Cell<bool>,
    fail_mutations: Cell<bool>,
    next_id: Cell<u32>,
}

impl MemoryStore {
    pub fn with_ideas(ideas: Vec<Idea>) -> Self {
        let store = Self::default();
        *store.ideas.borrow_mut() = ideas;
        store
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.set(fail);
    }

    pub fn set_fail_mutations(&self, fail: bool) {
        self.fail_mutations.set(fail);
    }

    fn newest_first(&self, keep: impl Fn(&Idea) -> bool) -> Vec<Idea> {
        let mut out: Vec<Idea> = self.ideas.borrow().iter().filter(|i| keep(i)).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    fn check_queries(&self) -> ApiResult<()> {
        if self.fail_queries.get() {
            Err(ApiError::network("backend unreachable"))
        } else {
            Ok(())
        }
    }

    fn check_mutations(&self) -> ApiResult<()> {
        if self.fail_mutations.get() {
            Err(ApiError::network("backend unreachable"))
        } else {
            Ok(())
        }
    }

    fn clock(&self) -> DateTime<Utc> {
        let base = Utc
            .with_ymd_and_hms(2030, 1, 1, 0, 0, 0)
            .single()
            .expect("valid time");
        base + Duration::seconds(i64::from(self.next_id.get()))
    }
}

impl IdeaStore for MemoryStore {
    async fn list_ideas(&self) -> ApiResult<Vec<Idea>> {
        self.calls.borrow_mut().push("list".to_string());
        self.check_queries()?;
        let mut out = self.newest_first(|_| true);
        out.truncate(100);
        Ok(out)
    }

    async fn search_ideas(&self, term: &str) -> ApiResult<Vec<Idea>> {
        self.calls.borrow_mut().push(format!("search:{term}"));
        self.check_queries()?;
        let needle = term.to_lowercase();
        Ok(self.newest_first(|i| i.title.to_lowercase().contains(&needle)))
    }

    async fn ideas_by_status(&self, status: IdeaStatus) -> ApiResult<Vec<Idea>> {
        self.calls.borrow_mut().push(format!("status:{status}"));
        self.check_queries()?;
        Ok(self.newest_first(|i| i.status == status))
    }

    async fn create_idea(&self, draft: &IdeaDraft, owner_id: &str) -> ApiResult<Idea> {
        self.check_mutations()?;
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let idea = Idea {
            id: format!("idea-{n}"),
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status,
            owner_id: owner_id.to_string(),
            created_at: self.clock(),
            attachments: draft.attachments.clone(),
            unreadable_attachments: draft.unreadable_attachments.clone(),
            priority: None,
            category: None,
        };
        self.ideas.borrow_mut().push(idea.clone());
        Ok(idea)
    }

    async fn update_idea(&self, id: &str, draft: &IdeaDraft) -> ApiResult<Idea> {
        self.check_mutations()?;
        let mut ideas = self.ideas.borrow_mut();
        let idea = ideas
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ApiError::from_response(404, r#"{"message":"Document not found"}"#))?;
        idea.title = draft.title.clone();
        idea.description = draft.description.clone();
        idea.status = draft.status;
        idea.attachments = draft.attachments.clone();
        idea.unreadable_attachments = draft.unreadable_attachments.clone();
        Ok(idea.clone())
    }

    async fn delete_idea(&self, id: &str) -> ApiResult<()> {
        self.check_mutations()?;
        let mut ideas = self.ideas.borrow_mut();
        let before = ideas.len();
        ideas.retain(|i| i.id != id);
        if ideas.len() == before {
            return Err(ApiError::from_response(404, r#"{"message":"Document not found"}"#));
        }
        Ok(())
    }
}

/// File bucket that fails uploads for the named files.
#[derive(Default)]
pub(crate) struct MemoryFiles {
    pub failing: Vec<String>,
    pub uploaded: RefCell<Vec<String>>,
    pub deleted: RefCell<Vec<String>>,
}

impl FileStore for MemoryFiles {
    async fn upload_file(
        &self,
        file: &LocalFile,
        on_progress: &mut dyn FnMut(f64),
    ) -> ApiResult<StoredFile> {
        on_progress(0.5);
        if self.failing.contains(&file.name) {
            return Err(ApiError::network(format!("could not upload {}", file.name)));
        }
        on_progress(1.0);
        let id = format!("file-{}", self.uploaded.borrow().len() + 1);
        self.uploaded.borrow_mut().push(file.name.clone());
        Ok(StoredFile { id })
    }

    fn file_view_url(&self, file_id: &str) -> String {
        format!("mem://{file_id}/view")
    }

    fn file_download_url(&self, file_id: &str) -> String {
        format!("mem://{file_id}/download")
    }

    async fn delete_file(&self, file_id: &str) -> ApiResult<()> {
        self.deleted.borrow_mut().push(file_id.to_string());
        Ok(())
    }
}

/// Account service that can be told a session is already active.
#[derive(Default)]
pub(crate) struct FakeAccount {
    pub session_active: bool,
    pub password: String,
    pub fail_session_delete: bool,
    pub user: Option<AccountInfo>,
    pub session_attempts: u32,
    pub session_deletes: u32,
}

impl AccountBackend for FakeAccount {
    async fn get_account(&self) -> ApiResult<AccountInfo> {
        match (&self.user, self.session_active) {
            (Some(u), true) => Ok(u.clone()),
            _ => Err(ApiError::from_response(401, r#"{"message":"missing scope (account)"}"#)),
        }
    }

    async fn create_email_session(&mut self, _email: &str, password: &str) -> ApiResult<()> {
        self.session_attempts += 1;
        if self.session_active {
            return Err(ApiError::from_response(
                401,
                r#"{"message":"Creation of a session is prohibited when a session is active.","type":"user_session_already_exists"}"#,
            ));
        }
        if password != self.password {
            return Err(ApiError::from_response(
                401,
                r#"{"message":"Invalid credentials.","type":"user_invalid_credentials"}"#,
            ));
        }
        self.session_active = true;
        Ok(())
    }

    async fn delete_current_session(&mut self) -> ApiResult<()> {
        self.session_deletes += 1;
        if self.fail_session_delete {
            return Err(ApiError::network("offline"));
        }
        if !self.session_active {
            return Err(ApiError::from_response(401, r#"{"message":"User (role: guests) missing scope (account)"}"#));
        }
        self.session_active = false;
        Ok(())
    }

    async fn create_account(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ApiResult<AccountInfo> {
        let user = AccountInfo {
            id: "u-new".to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.password = password.to_string();
        self.user = Some(user.clone());
        Ok(user)
    }
}

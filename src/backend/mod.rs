//! Contracts of the hosted backend, as consumed by the dashboard logic.
//!
//! `ApiClient` implements all three against Appwrite. Tests use in-memory doubles.

use crate::api::ApiResult;
use crate::models::{AccountInfo, Idea, IdeaDraft, IdeaStatus};

/// Remote idea collection. Every listing is ordered newest first.
pub(crate) trait IdeaStore {
    /// At most 100 records.
    async fn list_ideas(&self) -> ApiResult<Vec<Idea>>;

    /// Server-side full-text match on the title attribute.
    async fn search_ideas(&self, term: &str) -> ApiResult<Vec<Idea>>;

    async fn ideas_by_status(&self, status: IdeaStatus) -> ApiResult<Vec<Idea>>;

    /// Read/update/delete permissions are scoped to `owner_id`.
    async fn create_idea(&self, draft: &IdeaDraft, owner_id: &str) -> ApiResult<Idea>;

    async fn update_idea(&self, id: &str, draft: &IdeaDraft) -> ApiResult<Idea>;

    async fn delete_idea(&self, id: &str) -> ApiResult<()>;
}

/// A file picked by the user, already read into memory.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LocalFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StoredFile {
    pub id: String,
}

pub(crate) trait FileStore {
    /// `on_progress` receives the completed fraction of this file, in `0.0..=1.0`.
    async fn upload_file(
        &self,
        file: &LocalFile,
        on_progress: &mut dyn FnMut(f64),
    ) -> ApiResult<StoredFile>;

    fn file_view_url(&self, file_id: &str) -> String;

    fn file_download_url(&self, file_id: &str) -> String;

    async fn delete_file(&self, file_id: &str) -> ApiResult<()>;
}

/// Account/session primitives. Session state lives in the implementor, hence `&mut self`.
pub(crate) trait AccountBackend {
    async fn get_account(&self) -> ApiResult<AccountInfo>;

    async fn create_email_session(&mut self, email: &str, password: &str) -> ApiResult<()>;

    async fn delete_current_session(&mut self) -> ApiResult<()>;

    async fn create_account(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ApiResult<AccountInfo>;
}

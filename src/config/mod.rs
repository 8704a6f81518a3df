use serde::{Deserialize, Serialize};

const DEFAULT_ENDPOINT: &str = "https://appwrite.nrep.ug/v1";
const DEFAULT_PROJECT_ID: &str = "6892271e0028b4fed84f";
const DEFAULT_DATABASE_ID: &str = "68ac438700031c62fd5b";
const DEFAULT_IDEAS_COLLECTION_ID: &str = "68ac444a000ed01d8405";
const DEFAULT_BUCKET_ID: &str = "68b69aaa00336b7f1657";

/// Where the Appwrite project lives. Built once at startup and handed to `ApiClient`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub ideas_collection_id: String,
    pub bucket_id: String,
}

impl Default for AppwriteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            database_id: DEFAULT_DATABASE_ID.to_string(),
            ideas_collection_id: DEFAULT_IDEAS_COLLECTION_ID.to_string(),
            bucket_id: DEFAULT_BUCKET_ID.to_string(),
        }
    }
}

impl AppwriteConfig {
    /// Read overrides from `window.ENV` (e.g. `window.ENV.APPWRITE_PROJECT_ID`).
    /// Missing or non-string keys keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let Some(env) = web_sys::window().and_then(|w| w.get("ENV")) else {
            return config;
        };
        if env.is_undefined() || !env.is_object() {
            return config;
        }

        let get = |key: &str| {
            js_sys::Reflect::get(&env, &key.into())
                .ok()
                .and_then(|v| v.as_string())
                .filter(|s| !s.trim().is_empty())
        };

        if let Some(v) = get("APPWRITE_ENDPOINT") {
            config.endpoint = v;
        }
        if let Some(v) = get("APPWRITE_PROJECT_ID") {
            config.project_id = v;
        }
        if let Some(v) = get("APPWRITE_DATABASE_ID") {
            config.database_id = v;
        }
        if let Some(v) = get("APPWRITE_IDEAS_COLLECTION_ID") {
            config.ideas_collection_id = v;
        }
        if let Some(v) = get("APPWRITE_BUCKET_ID") {
            config.bucket_id = v;
        }

        config.normalized()
    }

    pub fn normalized(mut self) -> Self {
        self.endpoint = self.endpoint.trim().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn documents_path(&self) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, self.ideas_collection_id
        )
    }

    pub(crate) fn files_path(&self) -> String {
        format!("/storage/buckets/{}/files", self.bucket_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_trailing_slash() {
        let c = AppwriteConfig {
            endpoint: " https://cloud.appwrite.io/v1/ ".to_string(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(c.endpoint, "https://cloud.appwrite.io/v1");
    }

    #[test]
    fn test_paths() {
        let c = AppwriteConfig {
            database_id: "db".to_string(),
            ideas_collection_id: "ideas".to_string(),
            bucket_id: "files".to_string(),
            ..Default::default()
        };
        assert_eq!(c.documents_path(), "/databases/db/collections/ideas/documents");
        assert_eq!(c.files_path(), "/storage/buckets/files/files");
    }
}

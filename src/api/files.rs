use super::{ApiClient, ApiError, ApiResult};
use crate::backend::{FileStore, LocalFile, StoredFile};
use reqwest::multipart::{Form, Part};

/// Appwrite rejects single requests above this size; larger files go up in chunks.
pub(crate) const CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Byte ranges of each upload request, as `(start, end_exclusive)`.
pub(crate) fn chunk_ranges(total: usize) -> Vec<(usize, usize)> {
    if total == 0 {
        return vec![(0, 0)];
    }
    (0..total)
        .step_by(CHUNK_SIZE)
        .map(|start| (start, (start + CHUNK_SIZE).min(total)))
        .collect()
}

pub(crate) fn content_range(start: usize, end: usize, total: usize) -> String {
    format!("bytes {}-{}/{}", start, end.saturating_sub(1), total)
}

impl ApiClient {
    fn file_part(file: &LocalFile, start: usize, end: usize) -> ApiResult<Part> {
        let mime = if file.mime_type.trim().is_empty() {
            "application/octet-stream"
        } else {
            file.mime_type.as_str()
        };
        Part::bytes(file.bytes[start..end].to_vec())
            .file_name(file.name.clone())
            .mime_str(mime)
            .map_err(ApiError::parse)
    }

    fn file_url(&self, file_id: &str, action: &str) -> String {
        format!(
            "{}/{}/{}?project={}",
            self.url(&self.config.files_path()),
            file_id,
            action,
            urlencoding::encode(&self.config.project_id)
        )
    }
}

impl FileStore for ApiClient {
    async fn upload_file(
        &self,
        file: &LocalFile,
        on_progress: &mut dyn FnMut(f64),
    ) -> ApiResult<StoredFile> {
        let total = file.bytes.len();
        let ranges = chunk_ranges(total);
        let chunked = ranges.len() > 1;
        let mut file_id: Option<String> = None;

        on_progress(0.0);
        for (start, end) in ranges {
            let form = Form::new()
                .text("fileId", "unique()")
                .part("file", Self::file_part(file, start, end)?);

            let client = reqwest::Client::new();
            let mut req = client
                .post(self.url(&self.config.files_path()))
                .multipart(form);
            if chunked {
                req = req.header("Content-Range", content_range(start, end, total));
                if let Some(id) = &file_id {
                    req = req.header("x-appwrite-id", id);
                }
            }

            let res = self.send(req).await?;
            let data: serde_json::Value = res.json().await.map_err(ApiError::parse)?;
            if file_id.is_none() {
                file_id = data
                    .get("$id")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string());
            }

            if total > 0 {
                on_progress(end as f64 / total as f64);
            }
        }
        on_progress(1.0);

        let id = file_id
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::parse("upload response is missing file id"))?;
        log::debug!("uploaded {} as {id}", file.name);
        Ok(StoredFile { id })
    }

    fn file_view_url(&self, file_id: &str) -> String {
        self.file_url(file_id, "view")
    }

    fn file_download_url(&self, file_id: &str) -> String {
        self.file_url(file_id, "download")
    }

    async fn delete_file(&self, file_id: &str) -> ApiResult<()> {
        let path = format!("{}/{}", self.config.files_path(), file_id);
        self.request_empty(reqwest::Method::DELETE, &path).await
    }
}

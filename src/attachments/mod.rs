use crate::backend::{FileStore, LocalFile};
use crate::models::Attachment;
use chrono::{DateTime, Utc};
use strum::{AsRefStr, Display};

/// Overall upload progress in percent, with every file weighted equally.
pub(crate) fn overall_progress(index: usize, total: usize, file_fraction: f64) -> u8 {
    if total == 0 {
        return 100;
    }
    let fraction = file_fraction.clamp(0.0, 1.0);
    let pct = (index as f64 + fraction) / total as f64 * 100.0;
    pct.round().clamp(0.0, 100.0) as u8
}

/// Upload `files` one after another.
///
/// A failed upload is recorded as [`Attachment::Failed`] and the remaining files still go up,
/// so the result always has one entry per input file, in order.
pub(crate) async fn upload_attachments<F: FileStore>(
    store: &F,
    files: &[LocalFile],
    clock: impl Fn() -> DateTime<Utc>,
    on_progress: &mut dyn FnMut(u8),
) -> Vec<Attachment> {
    let total = files.len();
    let mut out = Vec::with_capacity(total);

    for (i, file) in files.iter().enumerate() {
        log::debug!("uploading {}/{}: {}", i + 1, total, file.name);

        let mut report = |fraction: f64| on_progress(overall_progress(i, total, fraction));
        let result = store.upload_file(file, &mut report).await;

        let attachment = match result {
            Ok(stored) => Attachment::Stored {
                file_id: stored.id,
                file_name: file.name.clone(),
                file_size: file.size(),
                mime_type: file.mime_type.clone(),
                uploaded_at: Some(clock()),
            },
            Err(e) => {
                log::warn!("failed to upload {}: {e}", file.name);
                Attachment::Failed {
                    file_name: file.name.clone(),
                    file_size: file.size(),
                    mime_type: file.mime_type.clone(),
                    upload_error: e.to_string(),
                    uploaded_at: Some(clock()),
                }
            }
        };
        out.push(attachment);
    }

    if total > 0 {
        on_progress(100);
    }
    out
}

/// Remove the stored files behind `attachments`. Failures are logged and skipped.
pub(crate) async fn delete_attachment_files<F: FileStore>(store: &F, attachments: &[Attachment]) {
    for file_id in attachments.iter().filter_map(|a| a.file_id()) {
        if let Err(e) = store.delete_file(file_id).await {
            log::warn!("could not delete file {file_id}: {e}");
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum FileKind {
    Image,
    Pdf,
    Document,
    Text,
    Other,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        let m = mime.to_lowercase();
        if m.contains("image") {
            FileKind::Image
        } else if m.contains("pdf") {
            FileKind::Pdf
        } else if m.contains("word") || m.contains("document") {
            FileKind::Document
        } else if m.contains("text") {
            FileKind::Text
        } else {
            FileKind::Other
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            FileKind::Image => "IMG",
            FileKind::Pdf => "PDF",
            FileKind::Document => "DOC",
            FileKind::Text => "TXT",
            FileKind::Other => "FILE",
        }
    }
}

pub(crate) fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "Unknown size".to_string();
    }
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

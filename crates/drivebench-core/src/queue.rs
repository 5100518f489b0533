//! Upload queue: locally selected files and their transfer status.

use crate::preview::PreviewHandle;
use std::sync::Arc;

/// Transfer status of one queued file.
///
/// Progress only exists while uploading, the remote id only on success and
/// the message only on failure.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Pending,
    Uploading { progress: f64 },
    Success { remote_id: String },
    Error { message: String },
}

impl UploadStatus {
    /// Short label shown next to the file.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Ready",
            Self::Uploading { .. } => "Uploading",
            Self::Success { .. } => "Uploaded",
            Self::Error { .. } => "Failed",
        }
    }

    /// Percentage for progress bars: 100 once uploaded, 0 outside a transfer.
    pub fn progress_percent(&self) -> f64 {
        match self {
            Self::Uploading { progress } => *progress,
            Self::Success { .. } => 100.0,
            Self::Pending | Self::Error { .. } => 0.0,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Error { .. })
    }
}

/// A queued file together with the preview resource it owns.
#[derive(Debug)]
pub struct UploadTask {
    pub id: String,
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub status: UploadStatus,
    preview: PreviewHandle,
}

impl UploadTask {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        size_bytes: u64,
        mime_type: impl Into<String>,
        preview: PreviewHandle,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            status: UploadStatus::Pending,
            preview,
        }
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            size_bytes: self.size_bytes,
            mime_type: self.mime_type.clone(),
            preview_url: self.preview.url().to_string(),
            status: self.status.clone(),
        }
    }

    /// Release the preview resource and drop the task.
    fn discard(self) {
        tracing::debug!("Removing task {} ({})", self.id, self.status.label());
        self.preview.release();
    }
}

/// Read-only copy of a task for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub id: String,
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub preview_url: String,
    pub status: UploadStatus,
}

/// What the upload operation needs once a task has started.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub content: Option<Arc<[u8]>>,
}

/// Ordered collection of upload tasks.
#[derive(Debug, Default)]
pub struct UploadQueue {
    tasks: Vec<UploadTask>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: UploadTask) {
        self.tasks.push(task);
    }

    pub fn get(&self, id: &str) -> Option<&UploadTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Ids of every task currently waiting to be uploaded, in queue order.
    pub fn pending_ids(&self) -> Vec<String> {
        self.tasks
            .iter()
            .filter(|task| task.status.is_pending())
            .map(|task| task.id.clone())
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.status.is_pending()).count()
    }

    /// Move a pending task to `Uploading` at 0%.
    ///
    /// Returns `None` for unknown ids and for tasks that are not pending.
    pub fn begin_upload(&mut self, id: &str) -> Option<UploadJob> {
        let task = self.get_mut(id)?;
        if !task.status.is_pending() {
            tracing::debug!("Task {} is {}, not starting upload", id, task.status.label());
            return None;
        }
        task.status = UploadStatus::Uploading { progress: 0.0 };
        Some(UploadJob {
            name: task.name.clone(),
            mime_type: task.mime_type.clone(),
            size_bytes: task.size_bytes,
            content: task.preview.contents(),
        })
    }

    /// Record a progress tick for an uploading task.
    ///
    /// Values are clamped to `[0, 100]` and never move progress backwards.
    /// Ticks for removed or finished tasks are dropped.
    pub fn record_progress(&mut self, id: &str, percent: f64) -> bool {
        let Some(task) = self.get_mut(id) else {
            return false;
        };
        match &mut task.status {
            UploadStatus::Uploading { progress } => {
                let clamped = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
                *progress = progress.max(clamped);
                true
            }
            _ => false,
        }
    }

    /// Mark an uploading task as uploaded.
    pub fn complete(&mut self, id: &str, remote_id: String) -> bool {
        self.finish(id, UploadStatus::Success { remote_id })
    }

    /// Mark an uploading task as failed.
    pub fn fail(&mut self, id: &str, message: String) -> bool {
        self.finish(id, UploadStatus::Error { message })
    }

    /// Remove a task in any status, releasing its preview.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.tasks.iter().position(|task| task.id == id) {
            Some(index) => {
                self.tasks.remove(index).discard();
                true
            }
            None => false,
        }
    }

    /// Release every preview, then empty the queue. Returns how many tasks
    /// were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.tasks.len();
        for task in self.tasks.drain(..) {
            task.discard();
        }
        count
    }

    pub fn snapshots(&self) -> Vec<TaskSnapshot> {
        self.tasks.iter().map(UploadTask::snapshot).collect()
    }

    /// Header line for the queue, e.g. "2 files ready for upload".
    pub fn summary(&self) -> String {
        let count = self.tasks.len();
        let plural = if count == 1 { "" } else { "s" };
        format!("{count} file{plural} ready for upload")
    }

    fn finish(&mut self, id: &str, status: UploadStatus) -> bool {
        let Some(task) = self.get_mut(id) else {
            return false;
        };
        if !matches!(task.status, UploadStatus::Uploading { .. }) {
            return false;
        }
        tracing::debug!("Task {} -> {}", id, status.label());
        task.status = status;
        true
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut UploadTask> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }
}

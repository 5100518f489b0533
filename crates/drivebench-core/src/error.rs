//! Error taxonomy for drive operations.

use thiserror::Error;

/// Convenience alias used by every fallible drive operation.
pub type DriveResult<T> = Result<T, DriveError>;

/// Failures surfaced by the drive client and the mock store.
///
/// Listing a folder that does not exist is not an error: the store answers
/// with a synthesized "Unknown Folder" instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriveError {
    /// Sign-in was rejected. The simulator never produces this.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The simulated transfer failed at completion.
    #[error("{0}")]
    Upload(String),

    /// A mutation targeted a folder record that is not in the store.
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    /// An item with the same id already lives in the target folder.
    #[error("Item {item_id} already exists in folder {folder_id}")]
    ItemExists { folder_id: String, item_id: String },

    /// The local resource bound to an upload task could not be read.
    #[error("Local content unavailable for {0}")]
    ContentUnavailable(String),
}

impl DriveError {
    /// The failure produced by the simulator's random upload outcome.
    pub fn upload_failed() -> Self {
        Self::Upload("Upload failed".to_string())
    }
}

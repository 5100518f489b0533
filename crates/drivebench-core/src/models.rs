//! Shared data types for the drive and the local workbench.

use serde::{Deserialize, Serialize};

/// Identifier of the drive's top-level folder.
pub const ROOT_FOLDER_ID: &str = "root";
/// Display name of the drive's top-level folder.
pub const ROOT_FOLDER_NAME: &str = "My Drive";
/// Name given to folders synthesized for ids the store does not know.
pub const UNKNOWN_FOLDER_NAME: &str = "Unknown Folder";

/// What a drive entry is. File metadata only exists on files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    File {
        #[serde(rename = "mimeType")]
        mime_type: String,
        #[serde(rename = "size")]
        size_bytes: u64,
    },
}

/// An entry listed inside a drive folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl DriveItem {
    /// Create a folder entry.
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ItemKind::Folder,
        }
    }

    /// Create a file entry.
    pub fn file(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ItemKind::File {
                mime_type: mime_type.into(),
                size_bytes,
            },
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ItemKind::Folder)
    }

    /// Whether this is a file whose MIME type is `image/*`.
    pub fn is_image(&self) -> bool {
        self.mime_type().is_some_and(is_image_mime)
    }

    pub fn mime_type(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::File { mime_type, .. } => Some(mime_type),
            ItemKind::Folder => None,
        }
    }

    pub fn size_bytes(&self) -> Option<u64> {
        match self.kind {
            ItemKind::File { size_bytes, .. } => Some(size_bytes),
            ItemKind::Folder => None,
        }
    }
}

/// A folder record: its own identity plus the entries it contains, in
/// display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFolder {
    pub id: String,
    pub name: String,
    pub items: Vec<DriveItem>,
}

impl DriveFolder {
    /// Create a folder record with no entries.
    pub fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// The placeholder returned when listing an id with no record.
    pub fn unknown(id: impl Into<String>) -> Self {
        Self::empty(id, UNKNOWN_FOLDER_NAME)
    }

    /// Find an entry by id.
    pub fn item(&self, item_id: &str) -> Option<&DriveItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

/// A breadcrumb: one folder on the navigated trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub id: String,
    pub name: String,
}

impl PathEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_FOLDER_ID, ROOT_FOLDER_NAME)
    }
}

/// Breadcrumb trail tracking the current drill-down state.
///
/// Index 0 is always the root. The trail follows navigation history, not
/// the canonical ancestry of the current folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPath {
    /// The steps in the navigation (each forward move adds a step).
    steps: Vec<PathEntry>,
}

impl Default for FolderPath {
    fn default() -> Self {
        Self::root()
    }
}

impl FolderPath {
    /// A trail holding only the root entry.
    pub fn root() -> Self {
        Self {
            steps: vec![PathEntry::root()],
        }
    }

    /// Append a folder to the trail.
    pub fn push(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.steps.push(PathEntry::new(id, name));
    }

    /// Drop every entry after the first one matching `id`.
    ///
    /// Returns `false` and leaves the trail untouched when `id` is not on it.
    pub fn truncate_to(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.steps.truncate(index + 1);
                true
            }
            None => false,
        }
    }

    /// Discard history and return to the single root entry.
    pub fn reset(&mut self) {
        *self = Self::root();
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == id)
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.steps
    }

    pub fn last(&self) -> Option<&PathEntry> {
        self.steps.last()
    }

    /// Get the current depth.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub email: String,
    pub name: String,
    /// Empty when the frontend should fall back to a generated avatar.
    pub avatar_url: String,
}

/// Authentication state of the workbench.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub user: Option<UserInfo>,
}

impl Session {
    pub fn signed_in(user: UserInfo) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
        }
    }
}

/// A file picked locally (file dialog, drop zone or path), not yet queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl LocalFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes: content.len() as u64,
            mime_type: mime_type.into(),
            content,
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }
}

fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

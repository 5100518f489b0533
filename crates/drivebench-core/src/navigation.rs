//! Folder navigation state: current folder, its listing and the breadcrumb
//! trail.
//!
//! Transitions here are synchronous and take an already-fetched listing; the
//! [`Workbench`](crate::Workbench) performs the fetch and applies the result.

use crate::models::{DriveFolder, FolderPath, ROOT_FOLDER_ID};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current_folder_id: String,
    current_folder: Option<DriveFolder>,
    path: FolderPath,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    /// At the root, with no listing fetched yet.
    pub fn new() -> Self {
        Self {
            current_folder_id: ROOT_FOLDER_ID.to_string(),
            current_folder: None,
            path: FolderPath::root(),
        }
    }

    pub fn current_folder_id(&self) -> &str {
        &self.current_folder_id
    }

    /// Listing of the current folder, once fetched.
    pub fn current_folder(&self) -> Option<&DriveFolder> {
        self.current_folder.as_ref()
    }

    pub fn path(&self) -> &FolderPath {
        &self.path
    }

    /// Forward navigation into `folder`; always appends to the trail.
    pub fn enter(&mut self, folder: DriveFolder, name: &str) {
        self.path.push(folder.id.clone(), name);
        self.set_current(folder);
    }

    /// Breadcrumb navigation to `folder`.
    ///
    /// The trail is cut back to the clicked entry. If the folder is not on
    /// the trail the trail is left as it is while the current folder still
    /// changes; returns `false` in that case.
    pub fn jump_to_breadcrumb(&mut self, folder: DriveFolder) -> bool {
        let truncated = self.path.truncate_to(&folder.id);
        if !truncated {
            tracing::warn!(
                "Breadcrumb target {} is not on the current path; path left unchanged",
                folder.id
            );
        }
        self.set_current(folder);
        truncated
    }

    /// Jump to the root listing, discarding the trail.
    pub fn return_to_root(&mut self, root: DriveFolder) {
        self.path.reset();
        self.set_current(root);
    }

    /// Replace the current listing with a fresh fetch of the same folder.
    ///
    /// A listing for any other folder is stale (the user moved on while it
    /// was in flight) and is ignored; returns whether it was applied.
    pub fn refresh(&mut self, folder: DriveFolder) -> bool {
        if folder.id != self.current_folder_id {
            tracing::debug!(
                "Ignoring stale listing of {} while in {}",
                folder.id,
                self.current_folder_id
            );
            return false;
        }
        self.current_folder = Some(folder);
        true
    }

    /// Back to the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn set_current(&mut self, folder: DriveFolder) {
        self.current_folder_id = folder.id.clone();
        self.current_folder = Some(folder);
    }
}

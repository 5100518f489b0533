//! In-memory folder graph standing in for the remote drive.

use crate::error::{DriveError, DriveResult};
use crate::models::{DriveFolder, DriveItem, ROOT_FOLDER_ID, ROOT_FOLDER_NAME};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Canonical folder records keyed by folder id.
///
/// Every operation takes the lock once and completes before releasing it,
/// so concurrent drive calls never observe a half-applied mutation.
#[derive(Debug)]
pub struct MockStore {
    folders: Mutex<HashMap<String, DriveFolder>>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// A drive holding only an empty root folder.
    pub fn new() -> Self {
        let mut folders = HashMap::new();
        folders.insert(
            ROOT_FOLDER_ID.to_string(),
            DriveFolder::empty(ROOT_FOLDER_ID, ROOT_FOLDER_NAME),
        );
        Self {
            folders: Mutex::new(folders),
        }
    }

    /// A drive pre-populated with the demo folders and documents.
    pub fn with_demo_data() -> Self {
        let root = DriveFolder {
            id: ROOT_FOLDER_ID.into(),
            name: ROOT_FOLDER_NAME.into(),
            items: vec![
                DriveItem::folder("folder1", "Documents"),
                DriveItem::folder("folder2", "Images"),
                DriveItem::file("file1", "Report.pdf", "application/pdf", 2_500_000),
                DriveItem::file(
                    "file2",
                    "Presentation.pptx",
                    "application/vnd.ms-powerpoint",
                    5_000_000,
                ),
            ],
        };
        let documents = DriveFolder {
            id: "folder1".into(),
            name: "Documents".into(),
            items: vec![
                DriveItem::folder("folder3", "Work"),
                DriveItem::file("file3", "Resume.docx", "application/msword", 350_000),
                DriveItem::file("file4", "Notes.txt", "text/plain", 5_000),
            ],
        };
        let images = DriveFolder {
            id: "folder2".into(),
            name: "Images".into(),
            items: vec![
                DriveItem::file("file5", "Vacation.jpg", "image/jpeg", 3_500_000),
                DriveItem::file("file6", "Profile.png", "image/png", 1_200_000),
            ],
        };
        let work = DriveFolder {
            id: "folder3".into(),
            name: "Work".into(),
            items: vec![
                DriveItem::file("file7", "Project.docx", "application/msword", 450_000),
                DriveItem::file("file8", "Budget.xlsx", "application/vnd.ms-excel", 250_000),
            ],
        };

        let folders = [root, documents, images, work]
            .into_iter()
            .map(|folder| (folder.id.clone(), folder))
            .collect();

        Self {
            folders: Mutex::new(folders),
        }
    }

    /// Return the stored folder, or an empty "Unknown Folder" for an id with
    /// no record.
    pub fn get(&self, folder_id: &str) -> DriveFolder {
        self.lock()
            .get(folder_id)
            .cloned()
            .unwrap_or_else(|| DriveFolder::unknown(folder_id))
    }

    /// Whether a folder record exists under `folder_id`.
    pub fn contains(&self, folder_id: &str) -> bool {
        self.lock().contains_key(folder_id)
    }

    /// Number of folder records, including the root.
    pub fn folder_count(&self) -> usize {
        self.lock().len()
    }

    /// Append `item` to the end of a folder's listing.
    ///
    /// Appending a folder entry also registers an empty record for it.
    pub fn append_item(&self, folder_id: &str, item: DriveItem) -> DriveResult<()> {
        let mut folders = self.lock();

        let parent = folders
            .get_mut(folder_id)
            .ok_or_else(|| DriveError::FolderNotFound(folder_id.to_string()))?;

        if parent.item(&item.id).is_some() {
            return Err(DriveError::ItemExists {
                folder_id: folder_id.to_string(),
                item_id: item.id,
            });
        }

        let child_record = item
            .is_folder()
            .then(|| DriveFolder::empty(item.id.clone(), item.name.clone()));
        parent.items.push(item);

        if let Some(record) = child_record {
            folders.insert(record.id.clone(), record);
        }
        Ok(())
    }

    /// Remove the entry `item_id` from a folder's listing, and the folder
    /// record stored under `item_id` if there is one.
    ///
    /// Removal is shallow: records of deeper descendants are left alone.
    /// Removing an id that is not listed is a no-op.
    pub fn remove_item(&self, folder_id: &str, item_id: &str) -> DriveResult<()> {
        let mut folders = self.lock();

        let parent = folders
            .get_mut(folder_id)
            .ok_or_else(|| DriveError::FolderNotFound(folder_id.to_string()))?;
        parent.items.retain(|item| item.id != item_id);

        if folders.remove(item_id).is_some() {
            tracing::debug!("Dropped folder record {}", item_id);
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, DriveFolder>> {
        self.folders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

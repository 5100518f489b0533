//! Application state management.
//!
//! The [`App`] holds only view state (selection, focus, open dialogs). Drive
//! state lives in the shared [`Workbench`]; intents that touch the drive run
//! as tokio tasks and report back through [`UiEvent`]s.

use crate::files;
use drivebench_core::{DriveItem, TaskSnapshot, UploadStatus, Workbench};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Application state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Running,
    /// Application should quit.
    Quit,
}

/// Input mode for the application.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Typing the name of a new folder.
    NewFolder,
    /// Typing the path of a local file to queue.
    AddFile,
    /// Delete confirmation dialog is open.
    ConfirmDelete,
}

/// Focus area of the main view.
#[derive(Debug, Clone, PartialEq)]
pub enum Focus {
    /// Folder listing is focused.
    Explorer,
    /// Upload queue is focused.
    Queue,
}

/// The item the delete dialog asks about.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteTarget {
    pub id: String,
    pub name: String,
    pub is_folder: bool,
}

impl DeleteTarget {
    pub fn title(&self) -> &'static str {
        if self.is_folder {
            "Delete Folder"
        } else {
            "Delete File"
        }
    }

    /// Warning shown under the question, folders only.
    pub fn warning(&self) -> Option<&'static str> {
        self.is_folder
            .then_some("This will also delete all files and folders inside it.")
    }
}

/// Completion notices from background intents.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SignedIn(String),
    FolderCreated(String),
    ItemDeleted(String),
    /// A create or delete request from the open dialog failed. The dialog
    /// stays open for another attempt; the failure is only logged.
    SubmitFailed,
    Notice(String),
}

/// Main application model.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Current focus area.
    pub focus: Focus,
    /// Drive, navigation and queue state.
    pub workbench: Arc<Workbench>,

    /// Index of the selected item in the current folder.
    pub explorer_selected_index: usize,
    /// Index of the selected task in the upload queue.
    pub queue_selected_index: usize,

    /// Text typed into the open prompt.
    pub input: String,
    /// Item pending confirmation in the delete dialog.
    pub delete_target: Option<DeleteTarget>,
    /// One-line message shown in the footer.
    pub status_message: Option<String>,
    /// The open dialog's request is in flight; further submits are ignored.
    pub submitting: bool,

    runtime: Handle,
    events_tx: UnboundedSender<UiEvent>,
    events_rx: UnboundedReceiver<UiEvent>,
}

impl App {
    /// Create a new application instance.
    pub fn new(workbench: Arc<Workbench>, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::Running,
            input_mode: InputMode::Normal,
            focus: Focus::Explorer,
            workbench,
            explorer_selected_index: 0,
            queue_selected_index: 0,
            input: String::new(),
            delete_target: None,
            status_message: None,
            submitting: false,
            runtime,
            events_tx,
            events_rx,
        }
    }

    /// Apply completion notices from background intents.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::SignedIn(email) => {
                self.status_message = Some(format!("Signed in as {email}"));
            }
            UiEvent::FolderCreated(name) => {
                if self.input_mode == InputMode::NewFolder {
                    self.close_dialog();
                }
                self.status_message = Some(format!("Created folder {name}"));
            }
            UiEvent::ItemDeleted(name) => {
                if self.input_mode == InputMode::ConfirmDelete {
                    self.close_dialog();
                }
                self.status_message = Some(format!("Deleted {name}"));
            }
            UiEvent::SubmitFailed => {
                self.submitting = false;
            }
            UiEvent::Notice(message) => {
                self.status_message = Some(message);
            }
        }
    }

    // Session

    pub fn sign_in(&mut self) {
        if self.workbench.is_authenticated() {
            return;
        }
        self.status_message = Some("Signing in...".to_string());
        self.spawn(|workbench, events| async move {
            let event = match workbench.sign_in().await {
                Ok(session) => UiEvent::SignedIn(
                    session.user.map(|user| user.email).unwrap_or_default(),
                ),
                Err(e) => UiEvent::Notice(format!("Sign-in failed: {e}")),
            };
            let _ = events.send(event);
        });
    }

    pub fn sign_out(&mut self) {
        self.workbench.sign_out();
        self.explorer_selected_index = 0;
        self.status_message = Some("Signed out".to_string());
    }

    // Explorer

    /// Items of the current folder, empty until the first listing arrives.
    pub fn folder_items(&self) -> Vec<DriveItem> {
        self.workbench
            .navigation()
            .current_folder()
            .map(|folder| folder.items.clone())
            .unwrap_or_default()
    }

    pub fn selected_item(&self) -> Option<DriveItem> {
        self.folder_items()
            .into_iter()
            .nth(self.explorer_selected_index)
    }

    /// Open the selected folder; files have no action.
    pub fn open_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if !item.is_folder() {
            return;
        }
        self.explorer_selected_index = 0;
        self.spawn(move |workbench, events| async move {
            if let Err(e) = workbench.navigate(&item.id, &item.name, false).await {
                let _ = events.send(UiEvent::Notice(format!("Could not open {}: {e}", item.name)));
            }
        });
    }

    /// Jump to the breadcrumb at `index`.
    pub fn open_breadcrumb(&mut self, index: usize) {
        let navigation = self.workbench.navigation();
        let Some(entry) = navigation.path().entries().get(index).cloned() else {
            return;
        };
        self.explorer_selected_index = 0;
        self.spawn(move |workbench, events| async move {
            if let Err(e) = workbench.navigate(&entry.id, &entry.name, true).await {
                let _ = events.send(UiEvent::Notice(format!("Could not open {}: {e}", entry.name)));
            }
        });
    }

    /// Go to the breadcrumb before the current one.
    pub fn open_parent(&mut self) {
        let depth = self.workbench.navigation().path().depth();
        if depth > 1 {
            self.open_breadcrumb(depth - 2);
        }
    }

    pub fn open_root(&mut self) {
        self.explorer_selected_index = 0;
        self.spawn(|workbench, events| async move {
            if let Err(e) = workbench.navigate_to_root().await {
                let _ = events.send(UiEvent::Notice(format!("Could not open My Drive: {e}")));
            }
        });
    }

    pub fn refresh(&mut self) {
        self.spawn(|workbench, events| async move {
            if let Err(e) = workbench.refresh().await {
                let _ = events.send(UiEvent::Notice(format!("Refresh failed: {e}")));
            }
        });
    }

    // Dialogs

    pub fn begin_new_folder(&mut self) {
        if !self.workbench.is_authenticated() {
            return;
        }
        self.input.clear();
        self.input_mode = InputMode::NewFolder;
    }

    /// Create the typed folder. The prompt stays open until creation succeeds.
    pub fn submit_new_folder(&mut self) {
        let name = self.input.trim().to_string();
        if name.is_empty() || self.submitting {
            return;
        }
        self.submitting = true;
        self.spawn(move |workbench, events| async move {
            let event = match workbench.create_folder(&name).await {
                Some(folder) => UiEvent::FolderCreated(folder.name),
                None => UiEvent::SubmitFailed,
            };
            let _ = events.send(event);
        });
    }

    pub fn request_delete(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        self.delete_target = Some(DeleteTarget {
            is_folder: item.is_folder(),
            id: item.id,
            name: item.name,
        });
        self.input_mode = InputMode::ConfirmDelete;
    }

    /// Delete the confirmed item. The dialog stays open until deletion succeeds.
    pub fn confirm_delete(&mut self) {
        if self.submitting {
            return;
        }
        let Some(target) = self.delete_target.clone() else {
            return;
        };
        self.submitting = true;
        self.spawn(move |workbench, events| async move {
            let event = if workbench.delete_item(&target.id).await {
                UiEvent::ItemDeleted(target.name)
            } else {
                UiEvent::SubmitFailed
            };
            let _ = events.send(event);
        });
    }

    pub fn begin_add_file(&mut self) {
        self.input.clear();
        self.input_mode = InputMode::AddFile;
    }

    /// Queue the file at the typed path.
    pub fn submit_add_file(&mut self) {
        let path = self.input.trim().to_string();
        if path.is_empty() {
            return;
        }
        self.add_files(&[Path::new(&path)]);
        self.close_dialog();
    }

    /// Read and queue local files; non-images are dropped.
    pub fn add_files<P: AsRef<Path>>(&mut self, paths: &[P]) {
        let selection = files::read_selection(paths);
        let read = selection.len();
        let queued = self.workbench.select_files(selection).len();

        self.status_message = Some(match (paths.len(), read, queued) {
            (_, 0, _) => "Nothing readable to add".to_string(),
            (_, _, 0) => "Only image files can be uploaded".to_string(),
            (requested, _, queued) if queued < requested => {
                format!("Queued {queued} of {requested} file(s)")
            }
            (_, _, queued) => format!("Queued {queued} file(s)"),
        });
    }

    pub fn close_dialog(&mut self) {
        self.submitting = false;
        self.input.clear();
        self.delete_target = None;
        self.input_mode = InputMode::Normal;
    }

    // Upload queue

    pub fn tasks(&self) -> Vec<TaskSnapshot> {
        self.workbench.tasks()
    }

    pub fn selected_task(&self) -> Option<TaskSnapshot> {
        self.tasks().into_iter().nth(self.queue_selected_index)
    }

    /// Upload the selected task if it is still pending.
    pub fn upload_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if task.status != UploadStatus::Pending {
            return;
        }
        self.spawn(move |workbench, _| async move {
            workbench.upload(&task.id).await;
        });
    }

    pub fn upload_all(&mut self) {
        if self.workbench.pending_count() == 0 {
            return;
        }
        self.spawn(|workbench, _| async move {
            workbench.upload_all_pending().await;
        });
    }

    pub fn remove_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.workbench.remove_task(&task.id);
            self.clamp_queue_selection();
        }
    }

    pub fn clear_queue(&mut self) {
        self.workbench.clear_tasks();
        self.queue_selected_index = 0;
    }

    // Selection

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Explorer => Focus::Queue,
            Focus::Queue => Focus::Explorer,
        };
    }

    /// Move selection up in the focused list.
    pub fn move_up(&mut self) {
        let index = self.focused_index_mut();
        *index = index.saturating_sub(1);
    }

    /// Move selection down in the focused list.
    pub fn move_down(&mut self) {
        let len = match self.focus {
            Focus::Explorer => self.folder_items().len(),
            Focus::Queue => self.tasks().len(),
        };
        let index = self.focused_index_mut();
        if *index + 1 < len {
            *index += 1;
        }
    }

    fn focused_index_mut(&mut self) -> &mut usize {
        match self.focus {
            Focus::Explorer => &mut self.explorer_selected_index,
            Focus::Queue => &mut self.queue_selected_index,
        }
    }

    fn clamp_queue_selection(&mut self) {
        let len = self.tasks().len();
        self.queue_selected_index = self.queue_selected_index.min(len.saturating_sub(1));
    }

    /// Run an intent in the background with the workbench and event sender.
    fn spawn<F, Fut>(&self, intent: F)
    where
        F: FnOnce(Arc<Workbench>, UnboundedSender<UiEvent>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.runtime
            .spawn(intent(Arc::clone(&self.workbench), self.events_tx.clone()));
    }
}

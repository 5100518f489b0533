//! Top-level controller: owns session, navigation and queue state and turns
//! user intents into drive calls.
//!
//! All state sits behind short-lived locks that are never held across an
//! `.await`, so intents can interleave freely: a second upload, a folder
//! change or a delete may run while an upload is still ticking.

use crate::client::{DriveClient, UploadRequest};
use crate::clock::{Clock, SystemClock};
use crate::error::{DriveError, DriveResult};
use crate::models::{DriveFolder, DriveItem, LocalFile, Session, ROOT_FOLDER_ID};
use crate::navigation::NavigationState;
use crate::preview::PreviewStore;
use crate::queue::{TaskSnapshot, UploadQueue, UploadTask};
use crate::random::{RandomSource, ThreadRandom};
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Counts an outstanding list/create/delete request while alive.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct Workbench {
    client: Arc<dyn DriveClient>,
    previews: Arc<PreviewStore>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    session: Mutex<Session>,
    navigation: Mutex<NavigationState>,
    queue: Mutex<UploadQueue>,
    in_flight: AtomicUsize,
}

impl Workbench {
    pub fn new(client: Arc<dyn DriveClient>) -> Self {
        Self {
            client,
            previews: PreviewStore::new(),
            random: Arc::new(ThreadRandom),
            clock: Arc::new(SystemClock),
            session: Mutex::new(Session::default()),
            navigation: Mutex::new(NavigationState::new()),
            queue: Mutex::new(UploadQueue::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Replace the random source used for task ids.
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Replace the clock used for task ids.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn previews(&self) -> &Arc<PreviewStore> {
        &self.previews
    }

    // Snapshots

    pub fn session(&self) -> Session {
        lock(&self.session).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.session).authenticated
    }

    pub fn navigation(&self) -> NavigationState {
        lock(&self.navigation).clone()
    }

    pub fn tasks(&self) -> Vec<TaskSnapshot> {
        lock(&self.queue).snapshots()
    }

    pub fn task(&self, id: &str) -> Option<TaskSnapshot> {
        lock(&self.queue)
            .snapshots()
            .into_iter()
            .find(|task| task.id == id)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.queue).pending_count()
    }

    pub fn queue_summary(&self) -> String {
        lock(&self.queue).summary()
    }

    /// Whether a listing, create or delete request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    // Session

    /// Sign in, then load the current folder.
    pub async fn sign_in(&self) -> DriveResult<Session> {
        let session = self.authenticate().await?;
        self.refresh_logged().await;
        Ok(session)
    }

    /// Forget the session and return navigation to its initial state.
    pub fn sign_out(&self) {
        *lock(&self.session) = Session::default();
        lock(&self.navigation).reset();
        tracing::info!("Signed out");
    }

    // Navigation

    /// Open `folder_id`. Forward moves append to the breadcrumb trail;
    /// breadcrumb clicks cut the trail back to the clicked entry.
    pub async fn navigate(
        &self,
        folder_id: &str,
        name: &str,
        is_breadcrumb_click: bool,
    ) -> DriveResult<()> {
        let folder = self.fetch(folder_id).await?;
        let mut navigation = lock(&self.navigation);
        if is_breadcrumb_click {
            navigation.jump_to_breadcrumb(folder);
        } else {
            navigation.enter(folder, name);
        }
        tracing::debug!("Now in {} (depth {})", folder_id, navigation.path().depth());
        Ok(())
    }

    /// Open the root and discard the breadcrumb history.
    pub async fn navigate_to_root(&self) -> DriveResult<()> {
        let root = self.fetch(ROOT_FOLDER_ID).await?;
        lock(&self.navigation).return_to_root(root);
        Ok(())
    }

    /// Re-fetch the current folder in place.
    pub async fn refresh(&self) -> DriveResult<()> {
        let folder_id = lock(&self.navigation).current_folder_id().to_string();
        let folder = self.fetch(&folder_id).await?;
        lock(&self.navigation).refresh(folder);
        Ok(())
    }

    // Folder management

    /// Create a folder in the current folder and refresh the listing.
    ///
    /// Blank names are ignored. Failures are logged and reported as `None`;
    /// state is left unchanged.
    pub async fn create_folder(&self, name: &str) -> Option<DriveItem> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let parent_id = lock(&self.navigation).current_folder_id().to_string();

        let created = {
            let _loading = LoadingGuard::new(&self.in_flight);
            self.client.create_folder(&parent_id, name).await
        };
        match created {
            Ok(folder) => {
                self.refresh_logged().await;
                Some(folder)
            }
            Err(e) => {
                tracing::error!("Failed to create folder {:?} in {}: {}", name, parent_id, e);
                None
            }
        }
    }

    /// Delete an item from the current folder and refresh the listing.
    ///
    /// Failures are logged and reported as `false`; state is left unchanged.
    pub async fn delete_item(&self, item_id: &str) -> bool {
        let parent_id = lock(&self.navigation).current_folder_id().to_string();

        let deleted = {
            let _loading = LoadingGuard::new(&self.in_flight);
            self.client.delete_item(&parent_id, item_id).await
        };
        match deleted {
            Ok(()) => {
                self.refresh_logged().await;
                true
            }
            Err(e) => {
                tracing::error!("Failed to delete {} from {}: {}", item_id, parent_id, e);
                false
            }
        }
    }

    // Upload queue

    /// Queue the image files of a selection as pending tasks.
    ///
    /// Non-image files are dropped. Returns the ids of the new tasks.
    pub fn select_files(&self, files: impl IntoIterator<Item = LocalFile>) -> Vec<String> {
        let mut queue = lock(&self.queue);
        let mut ids = Vec::new();

        for file in files {
            if !file.is_image() {
                tracing::debug!("Skipping non-image {} ({})", file.name, file.mime_type);
                continue;
            }
            let id = self.task_id(&file.name);
            let preview = self.previews.create(file.content);
            queue.push(UploadTask::new(
                id.clone(),
                file.name,
                file.size_bytes,
                file.mime_type,
                preview,
            ));
            ids.push(id);
        }

        tracing::info!("Queued {} file(s), {} in queue", ids.len(), queue.len());
        ids
    }

    /// Upload one pending task into the current folder.
    ///
    /// Signs in first when needed; the initial listing then loads alongside
    /// the transfer. The outcome is recorded on the task and never returned:
    /// a failure leaves the task in `Error` until removed.
    pub async fn upload(&self, task_id: &str) {
        if self.is_authenticated() {
            self.transfer(task_id).await;
            return;
        }
        if let Err(e) = self.authenticate().await {
            tracing::error!("Sign-in before upload of {} failed: {}", task_id, e);
            return;
        }
        futures::join!(self.refresh_logged(), self.transfer(task_id));
    }

    /// Upload every task that is pending right now, concurrently.
    ///
    /// The batch is fixed before any sign-in, so tasks selected after this
    /// call starts are not part of it.
    pub async fn upload_all_pending(&self) {
        let batch = lock(&self.queue).pending_ids();
        tracing::info!("Uploading {} pending file(s)", batch.len());
        let uploads = join_all(batch.iter().map(|id| self.transfer(id)));

        if self.is_authenticated() {
            uploads.await;
            return;
        }
        if let Err(e) = self.authenticate().await {
            tracing::error!("Sign-in before batch upload failed: {}", e);
            return;
        }
        futures::join!(self.refresh_logged(), uploads);
    }

    /// Remove a task in any status, releasing its preview.
    pub fn remove_task(&self, task_id: &str) -> bool {
        lock(&self.queue).remove(task_id)
    }

    /// Release every preview and empty the queue.
    pub fn clear_tasks(&self) -> usize {
        let cleared = lock(&self.queue).clear();
        tracing::info!("Cleared {} task(s)", cleared);
        cleared
    }

    // Internals

    async fn authenticate(&self) -> DriveResult<Session> {
        let session = self.client.authenticate().await?;
        *lock(&self.session) = session.clone();
        Ok(session)
    }

    /// Run one Pending task through the client. Other statuses are ignored.
    async fn transfer(&self, task_id: &str) {
        let Some(job) = lock(&self.queue).begin_upload(task_id) else {
            return;
        };
        let target_folder_id = lock(&self.navigation).current_folder_id().to_string();
        tracing::info!("Uploading {} to {}", job.name, target_folder_id);

        let result = match job.content {
            Some(ref bytes) => {
                let request = UploadRequest {
                    bytes: &bytes[..],
                    name: &job.name,
                    mime_type: &job.mime_type,
                    size_bytes: job.size_bytes,
                };
                let on_progress = |percent: f64| {
                    lock(&self.queue).record_progress(task_id, percent);
                };
                self.client
                    .upload_file(request, &target_folder_id, &on_progress)
                    .await
            }
            None => Err(DriveError::ContentUnavailable(job.name.clone())),
        };

        match result {
            Ok(remote_id) => {
                if !lock(&self.queue).complete(task_id, remote_id) {
                    tracing::debug!("Task {} was removed before its upload finished", task_id);
                }
                self.refresh_logged().await;
            }
            Err(e) => {
                tracing::warn!("Upload of {} failed: {}", job.name, e);
                lock(&self.queue).fail(task_id, e.to_string());
            }
        }
    }

    async fn fetch(&self, folder_id: &str) -> DriveResult<DriveFolder> {
        let _loading = LoadingGuard::new(&self.in_flight);
        self.client.list_folder(folder_id).await
    }

    async fn refresh_logged(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!("Refresh failed: {}", e);
        }
    }

    fn task_id(&self, name: &str) -> String {
        let salt = (self.random.next_unit() * 1e9) as u64;
        format!("{}_{}_{}", name, self.clock.now_millis(), salt)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

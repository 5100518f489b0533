//! Drive client contract and the latency-simulating implementation.

use crate::clock::{Clock, SystemClock};
use crate::error::{DriveError, DriveResult};
use crate::models::{DriveFolder, DriveItem, Session, UserInfo};
use crate::random::{RandomSource, ThreadRandom};
use crate::settings::SimulationSettings;
use crate::store::MockStore;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::sleep;

/// Object-safe boxed future returned by [`DriveClient`] methods.
pub type DriveFuture<'a, T> = Pin<Box<dyn Future<Output = DriveResult<T>> + Send + 'a>>;

/// Progress callback receiving a percentage in `[0, 100]`.
pub type ProgressFn<'a> = &'a (dyn Fn(f64) + Send + Sync);

/// A local file handed to [`DriveClient::upload_file`].
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    pub bytes: &'a [u8],
    pub name: &'a str,
    pub mime_type: &'a str,
    pub size_bytes: u64,
}

/// Remote drive operations consumed by the workbench.
///
/// A real backend client would implement the same contract.
pub trait DriveClient: Send + Sync {
    /// Sign in and return the resulting session.
    fn authenticate(&self) -> DriveFuture<'_, Session>;

    /// Fetch a folder and its entries.
    fn list_folder<'a>(&'a self, folder_id: &'a str) -> DriveFuture<'a, DriveFolder>;

    /// Create a folder named `name` inside `parent_id`.
    fn create_folder<'a>(&'a self, parent_id: &'a str, name: &'a str)
        -> DriveFuture<'a, DriveItem>;

    /// Delete `item_id` from `parent_id`.
    fn delete_item<'a>(&'a self, parent_id: &'a str, item_id: &'a str) -> DriveFuture<'a, ()>;

    /// Upload a file into `target_folder_id`, reporting progress along the
    /// way, and resolve with the new remote id.
    fn upload_file<'a>(
        &'a self,
        request: UploadRequest<'a>,
        target_folder_id: &'a str,
        on_progress: ProgressFn<'a>,
    ) -> DriveFuture<'a, String>;
}

/// Drive client backed by a [`MockStore`] with artificial latency.
pub struct SimulatedDriveClient {
    store: Arc<MockStore>,
    settings: SimulationSettings,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    sequence: AtomicU64,
}

impl SimulatedDriveClient {
    pub fn new(store: Arc<MockStore>, settings: SimulationSettings) -> Self {
        Self {
            store,
            settings: settings.sanitized(),
            random: Arc::new(ThreadRandom),
            clock: Arc::new(SystemClock),
            sequence: AtomicU64::new(0),
        }
    }

    /// Replace the source used for progress steps and upload outcomes.
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Replace the clock used for remote ids.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<MockStore> {
        &self.store
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Time-based id, made unique by a per-client sequence number.
    fn next_id(&self, prefix: &str) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}{}_{}", prefix, self.clock.now_millis(), seq)
    }

    /// Progress gained on one tick, in `(0, max_progress_step]`.
    fn progress_step(&self) -> f64 {
        (1.0 - self.random.next_unit()) * self.settings.max_progress_step
    }

    fn demo_user() -> UserInfo {
        UserInfo {
            email: "user@example.com".to_string(),
            name: "Demo User".to_string(),
            avatar_url: String::new(),
        }
    }

    async fn simulate_upload(
        &self,
        request: UploadRequest<'_>,
        target_folder_id: &str,
        on_progress: ProgressFn<'_>,
    ) -> DriveResult<String> {
        tracing::debug!(
            "Uploading {} ({} bytes read, {} reported) to {}",
            request.name,
            request.bytes.len(),
            request.size_bytes,
            target_folder_id
        );

        let mut progress = 0.0_f64;
        let mut ticks = 0u32;
        loop {
            sleep(self.settings.tick_interval()).await;
            progress += self.progress_step();
            ticks += 1;
            on_progress(progress.min(100.0));
            if progress >= 100.0 {
                break;
            }
        }

        if self.random.next_unit() < self.settings.failure_rate {
            tracing::warn!("Simulated upload of {} failed after {} ticks", request.name, ticks);
            return Err(DriveError::upload_failed());
        }

        let remote_id = self.next_id("file");
        self.store.append_item(
            target_folder_id,
            DriveItem::file(
                remote_id.clone(),
                request.name,
                request.mime_type,
                request.size_bytes,
            ),
        )?;
        tracing::info!(
            "Uploaded {} as {} after {} ticks",
            request.name,
            remote_id,
            ticks
        );
        Ok(remote_id)
    }
}

impl DriveClient for SimulatedDriveClient {
    fn authenticate(&self) -> DriveFuture<'_, Session> {
        Box::pin(async move {
            sleep(self.settings.auth_delay()).await;
            let user = Self::demo_user();
            tracing::info!("Signed in as {}", user.email);
            Ok(Session::signed_in(user))
        })
    }

    fn list_folder<'a>(&'a self, folder_id: &'a str) -> DriveFuture<'a, DriveFolder> {
        Box::pin(async move {
            sleep(self.settings.rpc_delay()).await;
            let folder = self.store.get(folder_id);
            tracing::debug!("Listed {} ({} items)", folder_id, folder.items.len());
            Ok(folder)
        })
    }

    fn create_folder<'a>(
        &'a self,
        parent_id: &'a str,
        name: &'a str,
    ) -> DriveFuture<'a, DriveItem> {
        Box::pin(async move {
            sleep(self.settings.rpc_delay()).await;
            let folder = DriveItem::folder(self.next_id("folder"), name);
            self.store.append_item(parent_id, folder.clone())?;
            tracing::info!("Created folder {} ({}) in {}", name, folder.id, parent_id);
            Ok(folder)
        })
    }

    fn delete_item<'a>(&'a self, parent_id: &'a str, item_id: &'a str) -> DriveFuture<'a, ()> {
        Box::pin(async move {
            sleep(self.settings.rpc_delay()).await;
            self.store.remove_item(parent_id, item_id)?;
            tracing::info!("Deleted {} from {}", item_id, parent_id);
            Ok(())
        })
    }

    fn upload_file<'a>(
        &'a self,
        request: UploadRequest<'a>,
        target_folder_id: &'a str,
        on_progress: ProgressFn<'a>,
    ) -> DriveFuture<'a, String> {
        Box::pin(self.simulate_upload(request, target_folder_id, on_progress))
    }
}

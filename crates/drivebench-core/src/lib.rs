//! Core state and simulated backend for drivebench.
//!
//! This crate provides the in-memory drive, the latency-bearing client that
//! fronts it, and the navigation and upload queue state machines driven by
//! the [`Workbench`] controller. Frontends only render snapshots and call
//! intents on the workbench.

pub mod client;
pub mod clock;
pub mod error;
pub mod format;
pub mod models;
pub mod navigation;
pub mod preview;
pub mod queue;
pub mod random;
pub mod settings;
pub mod store;
pub mod workbench;

pub use client::{DriveClient, DriveFuture, SimulatedDriveClient, UploadRequest};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DriveError, DriveResult};
pub use format::format_file_size;
pub use models::{
    DriveFolder, DriveItem, FolderPath, ItemKind, LocalFile, PathEntry, Session, UserInfo,
    ROOT_FOLDER_ID, ROOT_FOLDER_NAME, UNKNOWN_FOLDER_NAME,
};
pub use navigation::NavigationState;
pub use preview::{PreviewHandle, PreviewStore};
pub use queue::{TaskSnapshot, UploadJob, UploadQueue, UploadStatus, UploadTask};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use settings::SimulationSettings;
pub use store::MockStore;
pub use workbench::Workbench;

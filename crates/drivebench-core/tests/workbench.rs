use drivebench_core::{
    DriveClient, LocalFile, MockStore, PathEntry, ScriptedRandom, SimulatedDriveClient,
    SimulationSettings, UploadStatus, Workbench, ROOT_FOLDER_ID, ROOT_FOLDER_NAME,
    UNKNOWN_FOLDER_NAME,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Random sample that always yields 10-point steps and a successful upload.
const SUCCEED: f64 = 0.5;
/// Random sample that always yields 20-point steps and a failed upload.
const FAIL: f64 = 0.0;

fn bench(sample: f64) -> (Workbench, Arc<MockStore>) {
    let store = Arc::new(MockStore::with_demo_data());
    let client = SimulatedDriveClient::new(Arc::clone(&store), SimulationSettings::default())
        .with_random(Arc::new(ScriptedRandom::constant(sample)));
    let client: Arc<dyn DriveClient> = Arc::new(client);
    (Workbench::new(client), store)
}

fn image(name: &str, size_bytes: u64) -> LocalFile {
    LocalFile {
        name: name.to_string(),
        size_bytes,
        mime_type: "image/jpeg".to_string(),
        content: vec![0xff; 32],
    }
}

fn path_ids(workbench: &Workbench) -> Vec<String> {
    workbench
        .navigation()
        .path()
        .entries()
        .iter()
        .map(|entry| entry.id.clone())
        .collect()
}

fn current_names(workbench: &Workbench) -> Vec<String> {
    workbench
        .navigation()
        .current_folder()
        .map(|folder| folder.items.iter().map(|item| item.name.clone()).collect())
        .unwrap_or_default()
}

#[tokio::test(start_paused = true)]
async fn upload_single_image_end_to_end() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");

    let ids = workbench.select_files([image("cat.jpg", 500_000)]);
    assert_eq!(ids.len(), 1);
    assert_eq!(workbench.queue_summary(), "1 file ready for upload");
    assert_eq!(workbench.task(&ids[0]).map(|t| t.status), Some(UploadStatus::Pending));

    workbench.upload(&ids[0]).await;

    let task = workbench.task(&ids[0]).expect("task kept");
    let UploadStatus::Success { remote_id } = &task.status else {
        panic!("expected success, got {:?}", task.status);
    };
    assert!(!remote_id.is_empty());
    assert_eq!(task.status.progress_percent(), 100.0);

    let listing = workbench.navigation();
    let folder = listing.current_folder().expect("listing");
    let uploaded = folder
        .items
        .iter()
        .find(|item| item.name == "cat.jpg")
        .expect("uploaded file listed");
    assert_eq!(uploaded.id, *remote_id);
    assert!(!uploaded.is_folder());
    assert_eq!(uploaded.size_bytes(), Some(500_000));
}

#[tokio::test(start_paused = true)]
async fn breadcrumb_back_to_root() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");

    let root = workbench.navigation();
    let documents = root
        .current_folder()
        .and_then(|folder| folder.item("folder1"))
        .expect("Documents listed at root")
        .clone();
    workbench
        .navigate(&documents.id, &documents.name, false)
        .await
        .expect("open Documents");

    assert_eq!(
        workbench.navigation().path().entries(),
        &[
            PathEntry::new(ROOT_FOLDER_ID, ROOT_FOLDER_NAME),
            PathEntry::new("folder1", "Documents"),
        ]
    );

    workbench
        .navigate(ROOT_FOLDER_ID, ROOT_FOLDER_NAME, true)
        .await
        .expect("breadcrumb root");

    assert_eq!(path_ids(&workbench), vec![ROOT_FOLDER_ID]);
    assert_eq!(workbench.navigation().current_folder_id(), ROOT_FOLDER_ID);
    assert_eq!(
        current_names(&workbench),
        vec!["Documents", "Images", "Report.pdf", "Presentation.pptx"]
    );
}

#[tokio::test(start_paused = true)]
async fn breadcrumb_truncates_and_forward_appends() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");
    workbench.navigate("folder1", "Documents", false).await.expect("A");
    workbench.navigate("folder3", "Work", false).await.expect("B");
    workbench.navigate("folder2", "Images", false).await.expect("C");
    assert_eq!(path_ids(&workbench), vec!["root", "folder1", "folder3", "folder2"]);

    workbench.navigate("folder1", "Documents", true).await.expect("crumb A");
    assert_eq!(path_ids(&workbench), vec!["root", "folder1"]);
    assert_eq!(workbench.navigation().current_folder_id(), "folder1");

    workbench.navigate("folder2", "Images", false).await.expect("D");
    assert_eq!(path_ids(&workbench), vec!["root", "folder1", "folder2"]);
}

#[tokio::test(start_paused = true)]
async fn navigate_to_root_discards_history() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");
    workbench.navigate("folder1", "Documents", false).await.expect("A");
    workbench.navigate("folder3", "Work", false).await.expect("B");

    workbench.navigate_to_root().await.expect("home");
    assert_eq!(path_ids(&workbench), vec![ROOT_FOLDER_ID]);
    assert_eq!(workbench.navigation().current_folder_id(), ROOT_FOLDER_ID);
}

#[tokio::test(start_paused = true)]
async fn non_images_are_dropped_from_a_selection() {
    let (workbench, _store) = bench(SUCCEED);
    let ids = workbench.select_files([
        image("a.jpg", 1),
        LocalFile::new("notes.txt", "text/plain", b"hi".to_vec()),
        LocalFile::new("b.png", "image/png", vec![1, 2, 3]),
    ]);

    assert_eq!(ids.len(), 2);
    let names: Vec<_> = workbench.tasks().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["a.jpg", "b.png"]);
    assert_eq!(workbench.previews().live_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn task_ids_are_unique_for_identical_files() {
    let (workbench, _store) = bench(SUCCEED);
    let ids = workbench.select_files([image("same.jpg", 1), image("same.jpg", 1)]);
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test(start_paused = true)]
async fn upload_signs_in_first() {
    let (workbench, _store) = bench(SUCCEED);
    let ids = workbench.select_files([image("cat.jpg", 10)]);
    assert!(!workbench.is_authenticated());

    workbench.upload(&ids[0]).await;

    assert!(workbench.is_authenticated());
    assert!(matches!(
        workbench.task(&ids[0]).map(|t| t.status),
        Some(UploadStatus::Success { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn failed_upload_stays_in_queue_with_message() {
    let (workbench, store) = bench(FAIL);
    workbench.sign_in().await.expect("sign in");
    let before = store.get(ROOT_FOLDER_ID);
    let ids = workbench.select_files([image("cat.jpg", 10)]);

    workbench.upload(&ids[0]).await;

    assert_eq!(
        workbench.task(&ids[0]).map(|t| t.status),
        Some(UploadStatus::Error {
            message: "Upload failed".to_string()
        })
    );
    assert_eq!(store.get(ROOT_FOLDER_ID), before);

    // A failed task is never retried by a later batch.
    workbench.upload_all_pending().await;
    assert_eq!(workbench.task(&ids[0]).map(|t| t.status.label()), Some("Failed"));
}

#[tokio::test(start_paused = true)]
async fn upload_targets_the_current_folder() {
    let (workbench, store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");
    workbench.navigate("folder2", "Images", false).await.expect("Images");
    let ids = workbench.select_files([image("dog.jpg", 7)]);

    workbench.upload(&ids[0]).await;

    assert!(store.get("folder2").items.iter().any(|item| item.name == "dog.jpg"));
    assert!(store.get(ROOT_FOLDER_ID).items.iter().all(|item| item.name != "dog.jpg"));
    assert!(current_names(&workbench).contains(&"dog.jpg".to_string()));
}

#[tokio::test(start_paused = true)]
async fn upload_into_deleted_folder_records_error() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");
    workbench.navigate("ghost", "Ghost", false).await.expect("ghost");
    assert_eq!(
        workbench.navigation().current_folder().map(|f| f.name.clone()),
        Some(UNKNOWN_FOLDER_NAME.to_string())
    );
    let ids = workbench.select_files([image("cat.jpg", 10)]);

    workbench.upload(&ids[0]).await;

    assert_eq!(
        workbench.task(&ids[0]).map(|t| t.status),
        Some(UploadStatus::Error {
            message: "Folder not found: ghost".to_string()
        })
    );
}

#[tokio::test(start_paused = true)]
async fn progress_is_monotonic_per_task_during_concurrent_uploads() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");
    let ids = workbench.select_files([image("a.jpg", 1), image("b.jpg", 2)]);

    let sampler = async {
        let mut samples: Vec<Vec<f64>> = vec![Vec::new(); ids.len()];
        for _ in 0..40 {
            sleep(Duration::from_millis(50)).await;
            for (i, id) in ids.iter().enumerate() {
                if let Some(task) = workbench.task(id) {
                    if let UploadStatus::Uploading { progress } = task.status {
                        samples[i].push(progress);
                    }
                }
            }
        }
        samples
    };

    let (_, samples) = tokio::join!(
        async {
            tokio::join!(workbench.upload(&ids[0]), workbench.upload(&ids[1]));
        },
        sampler
    );

    for series in &samples {
        assert!(!series.is_empty());
        assert!(series.windows(2).all(|w| w[0] <= w[1]));
        assert!(series.iter().all(|p| (0.0..=100.0).contains(p)));
    }
    for id in &ids {
        assert_eq!(workbench.task(id).map(|t| t.status.progress_percent()), Some(100.0));
    }
}

#[tokio::test(start_paused = true)]
async fn remove_while_uploading_releases_once() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");
    let ids = workbench.select_files([image("a.jpg", 1), image("b.jpg", 1)]);

    let remover = async {
        sleep(Duration::from_millis(500)).await;
        assert!(matches!(
            workbench.task(&ids[0]).map(|t| t.status),
            Some(UploadStatus::Uploading { .. })
        ));
        assert!(workbench.remove_task(&ids[0]));
        assert!(!workbench.remove_task(&ids[0]));
    };
    tokio::join!(workbench.upload(&ids[0]), remover);

    assert!(workbench.task(&ids[0]).is_none());
    assert_eq!(workbench.previews().released_count(), 1);
    assert_eq!(workbench.previews().live_count(), 1);
    assert_eq!(workbench.tasks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn upload_all_pending_uses_a_snapshot() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");
    let first = workbench.select_files([image("a.jpg", 1), image("b.jpg", 1)]);

    let late = async {
        sleep(Duration::from_millis(300)).await;
        workbench.select_files([image("late.jpg", 1)])
    };
    let (_, late_ids) = tokio::join!(workbench.upload_all_pending(), late);

    for id in &first {
        assert!(matches!(
            workbench.task(id).map(|t| t.status),
            Some(UploadStatus::Success { .. })
        ));
    }
    assert_eq!(workbench.task(&late_ids[0]).map(|t| t.status), Some(UploadStatus::Pending));
    assert_eq!(workbench.pending_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn upload_all_pending_snapshot_is_taken_before_sign_in() {
    let (workbench, _store) = bench(SUCCEED);
    assert!(!workbench.is_authenticated());
    let first = workbench.select_files([image("a.jpg", 1)]);

    // Selected while the batch is still waiting on authentication.
    let late = async {
        sleep(Duration::from_millis(300)).await;
        workbench.select_files([image("late.jpg", 1)])
    };
    let (_, late_ids) = tokio::join!(workbench.upload_all_pending(), late);

    assert!(workbench.is_authenticated());
    assert!(matches!(
        workbench.task(&first[0]).map(|t| t.status),
        Some(UploadStatus::Success { .. })
    ));
    assert_eq!(workbench.task(&late_ids[0]).map(|t| t.status), Some(UploadStatus::Pending));
}

#[tokio::test(start_paused = true)]
async fn upload_starts_once_authenticated_without_waiting_for_listing() {
    let (workbench, _store) = bench(SUCCEED);
    let ids = workbench.select_files([image("cat.jpg", 10)]);

    // Sign-in takes 1000ms; the initial listing would take another 800ms.
    let status_after_auth = async {
        sleep(Duration::from_millis(1100)).await;
        workbench.task(&ids[0]).map(|t| t.status)
    };
    let (_, midway) = tokio::join!(workbench.upload(&ids[0]), status_after_auth);

    assert!(matches!(midway, Some(UploadStatus::Uploading { .. })));
    assert!(matches!(
        workbench.task(&ids[0]).map(|t| t.status),
        Some(UploadStatus::Success { .. })
    ));
    assert!(current_names(&workbench).contains(&"cat.jpg".to_string()));
}

#[tokio::test(start_paused = true)]
async fn clear_releases_every_preview() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.select_files([image("a.jpg", 1), image("b.jpg", 1), image("c.jpg", 1)]);

    assert_eq!(workbench.clear_tasks(), 3);
    assert!(workbench.tasks().is_empty());
    assert_eq!(workbench.previews().live_count(), 0);
    assert_eq!(workbench.previews().released_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn create_folder_refreshes_listing() {
    let (workbench, store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");

    let created = workbench.create_folder("  Holiday  ").await.expect("created");
    assert_eq!(created.name, "Holiday");
    assert!(created.is_folder());
    assert_eq!(current_names(&workbench).last().map(String::as_str), Some("Holiday"));
    assert!(store.get(&created.id).items.is_empty());

    assert!(workbench.create_folder("   ").await.is_none());
    assert_eq!(store.get(ROOT_FOLDER_ID).items.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn create_folder_failure_leaves_state_unchanged() {
    let (workbench, store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");
    workbench.navigate("ghost", "Ghost", false).await.expect("ghost");
    let before = workbench.navigation();

    assert!(workbench.create_folder("X").await.is_none());
    assert_eq!(workbench.navigation(), before);
    assert!(!store.contains("ghost"));
}

#[tokio::test(start_paused = true)]
async fn delete_folder_removes_entry_and_record() {
    let (workbench, store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");

    assert!(workbench.delete_item("folder1").await);
    assert!(!current_names(&workbench).contains(&"Documents".to_string()));
    assert_eq!(store.get("folder1").name, UNKNOWN_FOLDER_NAME);
    assert!(store.get("folder1").items.is_empty());
}

#[tokio::test(start_paused = true)]
async fn delete_failure_is_reported_not_raised() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");
    workbench.navigate("ghost", "Ghost", false).await.expect("ghost");
    assert!(!workbench.delete_item("anything").await);
}

#[tokio::test(start_paused = true)]
async fn loading_flag_tracks_outstanding_requests() {
    let (workbench, _store) = bench(SUCCEED);
    assert!(!workbench.is_loading());

    let midway = async {
        sleep(Duration::from_millis(100)).await;
        workbench.is_loading()
    };
    let (navigated, loading_midway) = tokio::join!(
        workbench.navigate("folder1", "Documents", false),
        midway
    );

    navigated.expect("navigate");
    assert!(loading_midway);
    assert!(!workbench.is_loading());
}

#[tokio::test(start_paused = true)]
async fn sign_out_resets_navigation_but_keeps_queue() {
    let (workbench, _store) = bench(SUCCEED);
    workbench.sign_in().await.expect("sign in");
    workbench.navigate("folder1", "Documents", false).await.expect("Documents");
    workbench.select_files([image("a.jpg", 1)]);

    workbench.sign_out();

    let session = workbench.session();
    assert!(!session.authenticated);
    assert!(session.user.is_none());
    assert_eq!(path_ids(&workbench), vec![ROOT_FOLDER_ID]);
    assert_eq!(workbench.navigation().current_folder_id(), ROOT_FOLDER_ID);
    assert!(workbench.navigation().current_folder().is_none());
    assert_eq!(workbench.tasks().len(), 1);
}

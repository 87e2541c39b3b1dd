use std::fs;
use std::path::Path;

use resoview::media::filter::ImportPolicy;
use resoview::state::data::Preview;
use resoview::state::store::DocumentStore;
use resoview::{App, AppError, Config};

fn config_in(dir: &Path) -> Config {
    Config {
        data_dir: dir.join("data"),
        ..Config::default()
    }
}

/// Folder keys, sorted: reads from disk may complete in any order.
fn sorted_keys(app: &App) -> Vec<String> {
    let mut keys: Vec<String> = app.list_folders("").into_iter().map(String::from).collect();
    keys.sort();
    keys
}

fn write_study(root: &Path) -> std::path::PathBuf {
    let study = root.join("studyA");
    fs::create_dir_all(study.join("series1")).unwrap();
    fs::write(study.join("scan1.png"), [1u8; 16]).unwrap();
    fs::write(study.join("series1").join("scan2.JPG"), [2u8; 32]).unwrap();
    fs::write(study.join("report.pdf"), b"%PDF").unwrap();
    study
}

#[tokio::test]
async fn test_accounts_and_session_flow() {
    let mut app = App::with_store(
        DocumentStore::open_in_memory().unwrap(),
        ImportPolicy::default(),
    )
    .unwrap();

    app.register("alice", "pw").unwrap();
    assert!(matches!(
        app.register("alice", "other"),
        Err(AppError::DuplicateUser(_))
    ));
    assert!(matches!(
        app.login("alice", "nope"),
        Err(AppError::InvalidCredentials)
    ));
    assert!(app.current_session().is_none());

    app.login("alice", "pw").unwrap();
    assert_eq!(app.current_session().unwrap().username, "alice");

    app.logout().unwrap();
    assert!(app.current_session().is_none());
}

#[tokio::test]
async fn test_import_directory_and_reopen() {
    let root = tempfile::tempdir().unwrap();
    let study = write_study(root.path());
    let config = config_in(root.path());

    {
        let mut app = App::open(&config).unwrap();
        app.register("alice", "pw").unwrap();
        app.login("alice", "pw").unwrap();

        let result = app.import_directory(&study).await;
        assert_eq!(result.imported_count, 2);
        assert_eq!(result.skipped_count(), 1);
        assert_eq!(result.skipped[0].relative_path, "studyA/report.pdf");

        assert_eq!(sorted_keys(&app), vec!["studyA", "studyA/series1"]);
        assert_eq!(app.list_folders("scan2"), vec!["studyA/series1"]);

        let (entry, blob) = app.open_file("studyA", "scan1.png").unwrap();
        assert_eq!(entry.size_bytes, 16);
        assert_eq!(blob.unwrap().bytes.len(), 16);

        let out = root.path().join("downloads");
        let target = app
            .export_file("studyA/series1", "scan2.JPG", &out)
            .unwrap()
            .unwrap();
        assert_eq!(fs::read(target).unwrap(), vec![2u8; 32]);
    }

    let app = App::open(&config).unwrap();
    assert_eq!(app.current_session().unwrap().username, "alice");
    assert_eq!(sorted_keys(&app), vec!["studyA", "studyA/series1"]);

    let folder = app.get_folder("studyA").unwrap();
    assert_eq!(folder.files.len(), 1);
    assert_eq!(folder.files[0].relative_path, "studyA/scan1.png");
    assert_eq!(folder.files[0].media_type, "image/png");
    assert_eq!(folder.files[0].preview, Preview::Unavailable);
    assert!(app.preview(&folder.files[0]).is_none());
}

#[tokio::test]
async fn test_delete_after_reload_updates_manifest() {
    let root = tempfile::tempdir().unwrap();
    let study = write_study(root.path());
    let config = config_in(root.path());

    {
        let mut app = App::open(&config).unwrap();
        app.import_directory(&study).await;
    }

    let mut app = App::open(&config).unwrap();
    assert!(app.delete_file("studyA/series1", "scan2.JPG").unwrap());
    assert!(!app.delete_file("studyA/series1", "scan2.JPG").unwrap());
    assert!(app.get_folder("studyA/series1").is_none());

    let app = App::open(&config).unwrap();
    assert_eq!(app.list_folders(""), vec!["studyA"]);
}

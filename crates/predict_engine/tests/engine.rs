use std::io::Write;
use std::time::Duration;

use predict_engine::{EngineConfig, EngineEvent, EngineHandle, FailureKind, ResultSlot};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECV_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking receive that does not park a runtime worker.
fn recv_event(
    events: &std::sync::mpsc::Receiver<EngineEvent>,
) -> Result<EngineEvent, std::sync::mpsc::RecvTimeoutError> {
    tokio::task::block_in_place(|| events.recv_timeout(RECV_TIMEOUT))
}

fn picture_file(dir: &TempDir) -> std::path::PathBuf {
    let file_path = dir.path().join("photo.png");
    let mut file = std::fs::File::create(&file_path).unwrap();
    file.write_all(b"picture").unwrap();
    file_path
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_then_fetch_slots_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    for endpoint in ["/currentimage", "/outsemseg", "/outdepth"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_raw("img", "image/png"))
            .mount(&server)
            .await;
    }

    let workdir = TempDir::new().unwrap();
    let output_dir = workdir.path().join("output");
    let file = picture_file(&workdir);

    let config = EngineConfig::new(server.uri(), output_dir.clone());
    let (engine, events) = EngineHandle::new(config);

    engine.submit(1, &file);
    match recv_event(&events).expect("upload event") {
        EngineEvent::UploadCompleted { flow_id, result } => {
            assert_eq!(flow_id, 1);
            assert_eq!(result.expect("upload accepted").status, 200);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // The three slot fetches run concurrently and complete in any order.
    for slot in ResultSlot::ALL {
        engine.fetch_slot(1, slot);
    }
    let mut completed = Vec::new();
    for _ in 0..3 {
        match recv_event(&events).expect("slot event") {
            EngineEvent::ResultCompleted { slot, result, .. } => {
                let outcome = result.expect("slot displayed");
                assert_eq!(std::fs::read(&outcome.path).unwrap(), b"img");
                completed.push(slot);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
    completed.sort();
    assert_eq!(completed, ResultSlot::ALL.to_vec());
    assert!(output_dir.join("currentimage.png").exists());
    assert!(output_dir.join("outsemseg.png").exists());
    assert!(output_dir.join("outdepth.png").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_upload_reports_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let file = picture_file(&workdir);
    let config = EngineConfig::new(server.uri(), workdir.path().join("output"));
    let (engine, events) = EngineHandle::new(config);

    engine.submit(7, &file);
    match recv_event(&events).expect("upload event") {
        EngineEvent::UploadCompleted { flow_id, result } => {
            assert_eq!(flow_id, 7);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(503));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_slot_fetch_reports_error_and_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/outsemseg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let output_dir = workdir.path().join("output");
    let config = EngineConfig::new(server.uri(), output_dir.clone());
    let (engine, events) = EngineHandle::new(config);

    engine.fetch_slot(9, ResultSlot::Segmentation);
    match recv_event(&events).expect("slot event") {
        EngineEvent::ResultCompleted {
            flow_id,
            slot,
            result,
        } => {
            assert_eq!(flow_id, 9);
            assert_eq!(slot, ResultSlot::Segmentation);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(404));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(!output_dir.join("outsemseg.png").exists());
}

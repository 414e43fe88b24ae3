use std::io::Write;
use std::time::Duration;

use wanderers::config::Config;
use wanderers::error::{PointsError, WanderersError};
use wanderers::map::PointStore;
use wanderers::scene::{Command, FrameLoop};
use wanderers::AppState;

fn points_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn loads_points_from_disk() {
    let file = points_file(r#"{"points":[{"x":0.1,"y":0.2},{"x":0.9,"y":0.8}]}"#);
    let store = PointStore::load(file.path()).await.unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.to_document().points[1].y, 0.8);
}

#[tokio::test]
async fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PointStore::load(dir.path().join("points.json")).await.unwrap_err();
    assert!(matches!(err, WanderersError::Points(PointsError::Read(_))));
}

#[tokio::test]
async fn malformed_file_is_a_parse_error() {
    let file = points_file("not json");
    let err = PointStore::load(file.path()).await.unwrap_err();
    assert!(matches!(err, WanderersError::Points(PointsError::Parse(_))));
}

#[tokio::test]
async fn frame_loop_runs_before_and_after_points() {
    let mut config = Config::default();
    config.motion.seed = Some(5);
    config.motion.fps = 200;

    let (state, commands_rx) = AppState::new(config.clone());
    let frame_loop = FrameLoop::new(&config, commands_rx);
    let handle = tokio::spawn(frame_loop.run(state.clone()));

    // The loop ticks on an empty scene until points arrive
    tokio::time::sleep(Duration::from_millis(50)).await;
    let frame = state.current_frame().await;
    assert!(frame.seq > 0);
    assert!(frame.avatars.is_empty());

    let store = PointStore::from_json(r#"{"points":[{"x":0.5,"y":0.5}]}"#).unwrap();
    state.send(Command::LoadPoints(store)).await.unwrap();

    let popup = state
        .request(|reply| Command::Activate { index: 4, reply })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(popup.avatar, 4);

    let frame = state.current_frame().await;
    assert_eq!(frame.avatars.len(), 5);

    state.shutdown();
    handle.await.unwrap();
}

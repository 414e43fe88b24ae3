use glam::Vec2;
use std::time::Duration;

use wanderers::config::{Config, MotionMode};
use wanderers::map::{MapPoint, PointStore};
use wanderers::scene::{ClickOutcome, Scene};

fn config(mode: MotionMode) -> Config {
    let mut config = Config::default();
    config.motion.mode = mode;
    config.motion.seed = Some(2024);
    config.map.width = 900.0;
    config.map.height = 600.0;
    config
}

fn scene_with(mode: MotionMode, points: &[(f32, f32)]) -> Scene {
    let mut scene = Scene::new(&config(mode));
    let store = PointStore::new(points.iter().map(|&(x, y)| MapPoint::new(x, y)).collect())
        .expect("valid points");
    scene.load_points(store, Duration::ZERO);
    scene
}

fn frame_time(frame: u64) -> Duration {
    Duration::from_millis(frame * 16)
}

#[test]
fn single_point_places_every_avatar_on_it() {
    let mut scene = Scene::new(&config(MotionMode::Scheduled));
    let store = PointStore::from_json(r#"{"points":[{"x":0.5,"y":0.5}]}"#).unwrap();
    assert_eq!(scene.load_points(store, Duration::ZERO), 5);

    for avatar in scene.engine().avatars() {
        assert_eq!(avatar.position(), Vec2::new(450.0, 300.0));
    }
}

#[test]
fn progress_stays_in_unit_range_in_both_modes() {
    for mode in [MotionMode::Continuous, MotionMode::Scheduled] {
        let mut scene = scene_with(mode, &[(0.0, 0.0), (1.0, 1.0), (0.4, 0.8), (0.9, 0.1)]);
        // 20 simulated minutes at 60 fps, in coarse steps
        for frame in 0..20_000u64 {
            let frame = scene.tick(frame_time(frame * 4));
            for avatar in &frame.avatars {
                assert!((0.0..=1.0).contains(&avatar.progress));
            }
        }
    }
}

#[test]
fn avatars_only_rest_on_map_points() {
    let points = [(0.1, 0.2), (0.7, 0.9), (0.5, 0.5)];
    let mut scene = scene_with(MotionMode::Continuous, &points);
    let size = scene.engine().map_size();

    for frame in 0..2_000u64 {
        scene.tick(frame_time(frame));
        for avatar in scene.engine().avatars() {
            if avatar.is_moving() {
                continue;
            }
            let normalized = avatar.position() / size;
            assert!(points.iter().any(|&(x, y)| {
                (normalized - Vec2::new(x, y)).abs().max_element() < 1e-4
            }));
        }
    }
}

#[test]
fn resize_preserves_normalized_positions() {
    let mut scene = scene_with(MotionMode::Continuous, &[(0.15, 0.85), (0.6, 0.3)]);
    for frame in 0..37u64 {
        scene.tick(frame_time(frame));
    }

    let size = scene.engine().map_size();
    let before: Vec<(Vec2, Vec2)> = scene
        .engine()
        .avatars()
        .iter()
        .map(|a| (a.position() / size, a.target() / size))
        .collect();

    for new_size in [Vec2::new(320.0, 240.0), Vec2::new(1920.0, 1080.0)] {
        scene.resize(new_size).unwrap();
        for (avatar, (position, target)) in scene.engine().avatars().iter().zip(&before) {
            assert!((avatar.position() / new_size - *position).abs().max_element() < 1e-5);
            assert!((avatar.target() / new_size - *target).abs().max_element() < 1e-5);
        }
    }
}

#[test]
fn second_avatar_replaces_popup() {
    let mut scene = scene_with(MotionMode::Scheduled, &[(0.2, 0.5), (0.8, 0.5)]);
    let avatars: Vec<(usize, Vec2)> = scene
        .engine()
        .avatars()
        .iter()
        .map(|a| (a.index(), a.position()))
        .collect();

    let first = scene.activate(avatars[0].0).unwrap();
    let second = scene.activate(avatars[1].0).unwrap();
    assert_ne!(first.id, second.id);

    let frame = scene.tick(Duration::ZERO);
    let popup = frame.popup.expect("one popup");
    assert_eq!(popup.id, second.id);
    assert_eq!(popup.avatar, avatars[1].0);
}

#[test]
fn outside_click_dismisses_and_disarms() {
    let mut scene = scene_with(MotionMode::Scheduled, &[(0.5, 0.5)]);
    scene.activate(0).unwrap();
    assert!(scene.popups().has_listener());

    let outcome = scene.click(Vec2::new(5.0, 5.0));
    assert_eq!(
        outcome,
        ClickOutcome::Map {
            x: 5.0,
            y: 5.0,
            dismissed: true
        }
    );
    assert!(!scene.popups().is_open());
    assert!(!scene.popups().has_listener());

    let outcome = scene.click(Vec2::new(5.0, 5.0));
    assert_eq!(
        outcome,
        ClickOutcome::Map {
            x: 5.0,
            y: 5.0,
            dismissed: false
        }
    );
}

#[test]
fn popup_follows_moving_avatar() {
    let mut scene = scene_with(MotionMode::Continuous, &[(0.1, 0.1), (0.9, 0.9)]);
    scene.activate(0).unwrap();

    for frame in 0..10u64 {
        let frame = scene.tick(frame_time(frame));
        let popup = frame.popup.as_ref().unwrap();
        let avatar = &frame.avatars[0];
        if avatar.moving {
            assert_eq!((popup.x, popup.y), (avatar.x, avatar.y));
        }
    }
}

#[test]
fn popup_stays_on_avatar_after_arrival() {
    let mut config = config(MotionMode::Scheduled);
    config.map.width = 1000.0;
    config.map.height = 1000.0;
    let mut scene = Scene::new(&config);
    let store = PointStore::new(vec![MapPoint::new(0.0, 0.0), MapPoint::new(1.0, 1.0)]).unwrap();
    scene.load_points(store, Duration::ZERO);
    scene.activate(0).unwrap();

    let mut was_moving = false;
    let mut arrived = false;
    // First delay is at most 15 s; one segment takes at most 50 frames
    for frame in 0..1_100u64 {
        let frame = scene.tick(frame_time(frame * 16));
        let popup = frame.popup.as_ref().unwrap();
        let avatar = &frame.avatars[0];
        assert_eq!((popup.x, popup.y), (avatar.x, avatar.y));

        if was_moving && !avatar.moving {
            arrived = true;
            break;
        }
        was_moving = avatar.moving;
    }
    assert!(arrived);
}

#[test]
fn click_inside_popup_beats_avatar_beneath_it() {
    // Find a seed that puts avatar 0 at the lower point and avatar 1 just above
    // it, where avatar 0's popup is drawn.
    let lower = Vec2::new(500.0, 500.0);
    let upper = Vec2::new(500.0, 450.0);
    let mut scene = (0..200u64)
        .map(|seed| {
            let mut config = config(MotionMode::Scheduled);
            config.motion.seed = Some(seed);
            config.avatars.count = 2;
            config.map.width = 1000.0;
            config.map.height = 1000.0;
            let mut scene = Scene::new(&config);
            let store =
                PointStore::new(vec![MapPoint::new(0.5, 0.5), MapPoint::new(0.5, 0.45)]).unwrap();
            scene.load_points(store, Duration::ZERO);
            scene
        })
        .find(|scene| {
            let avatars = scene.engine().avatars();
            (avatars[0].position() - lower).length() < 0.01
                && (avatars[1].position() - upper).length() < 0.01
        })
        .expect("some seed places the avatars apart");

    scene.activate(0).unwrap();
    assert_eq!(scene.avatar_at(upper), Some(1));

    assert_eq!(scene.click(upper), ClickOutcome::Popup);
    assert_eq!(scene.popups().current().unwrap().avatar(), 0);
}

#[test]
fn no_points_means_no_avatars() {
    let mut scene = Scene::new(&config(MotionMode::Continuous));
    for frame in 0..100u64 {
        let frame = scene.tick(frame_time(frame));
        assert!(frame.avatars.is_empty());
    }
    assert_eq!(
        scene.click(Vec2::new(1.0, 1.0)),
        ClickOutcome::Map {
            x: 1.0,
            y: 1.0,
            dismissed: false
        }
    );
}

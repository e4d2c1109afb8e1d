// Host-side tests for the page router and swipe recognizer.

use glam::Vec2;
use lobby_core::constants::*;
use lobby_core::*;

#[test]
fn route_names_round_trip_through_order() {
    for r in ROUTE_ORDER {
        assert_eq!(Route::from_name(r.name()), Some(r));
    }
    assert_eq!(Route::from_name("nope"), None);
}

#[test]
fn adjacent_stops_at_ends() {
    assert_eq!(Route::Home.adjacent(Direction::Backward), None);
    assert_eq!(Route::Home.adjacent(Direction::Forward), Some(Route::Library));
    assert_eq!(Route::Game.adjacent(Direction::Forward), None);
    assert_eq!(Route::Game.adjacent(Direction::Backward), Some(Route::Player));
}

#[test]
fn fragment_resolves_initial_route() {
    assert_eq!(Router::from_fragment("#player").current(), Route::Player);
    assert_eq!(Router::from_fragment("library").current(), Route::Library);
    assert_eq!(Router::from_fragment("").current(), Route::Home);
    assert_eq!(Router::from_fragment("#missing").current(), Route::Home);
    assert_eq!(Router::from_fragment("#game").fragment(), "#game");
}

#[test]
fn navigate_pulses_warp_and_commits_after_settle() {
    let mut router = Router::default();
    let mut warp = WarpSimulator::default();
    let t = router
        .navigate(Route::Player, 1000.0, &mut warp)
        .expect("transition");
    assert_eq!(t.from, Route::Home);
    assert_eq!(t.to, Route::Player);
    assert_eq!(t.direction, Direction::Forward);
    assert_eq!(warp.state().hold, HOLD_CAP);
    assert!(warp.intensity() > 0.0);

    assert!(router.is_transitioning());
    assert_eq!(router.current(), Route::Home);
    assert_eq!(router.active(), Route::Player);

    assert_eq!(router.poll(1000.0 + ROUTE_SETTLE_MS - 1.0), None);
    let done = router.poll(1000.0 + ROUTE_SETTLE_MS).expect("committed");
    assert_eq!(done.to, Route::Player);
    assert_eq!(router.current(), Route::Player);
    assert!(!router.is_transitioning());
    assert_eq!(router.poll(5000.0), None);
}

#[test]
fn rapid_double_navigation_keeps_first() {
    let mut router = Router::default();
    let mut warp = WarpSimulator::default();
    assert!(router.navigate(Route::Library, 0.0, &mut warp).is_some());
    assert!(router.navigate(Route::Game, 10.0, &mut warp).is_none());
    let done = router.poll(ROUTE_SETTLE_MS).expect("committed");
    assert_eq!(done.to, Route::Library);
    assert_eq!(router.current(), Route::Library);
}

#[test]
fn navigate_to_current_is_a_no_op() {
    let mut router = Router::new(Route::Player);
    let mut warp = WarpSimulator::default();
    assert!(router.navigate(Route::Player, 0.0, &mut warp).is_none());
    assert!(!router.is_transitioning());
    assert_eq!(warp.state().hold, 0.0);
}

#[test]
fn backward_direction_and_attr() {
    let mut router = Router::new(Route::Game);
    let mut warp = WarpSimulator::default();
    let t = router.navigate(Route::Home, 0.0, &mut warp).expect("transition");
    assert_eq!(t.direction, Direction::Backward);
    assert_eq!(t.direction.as_attr(), "-1");
    assert_eq!(Direction::Forward.as_attr(), "1");
}

#[test]
fn step_moves_to_neighbour_and_ignores_ends() {
    let mut router = Router::default();
    let mut warp = WarpSimulator::default();
    assert!(router.step(Direction::Backward, 0.0, &mut warp).is_none());
    let t = router.step(Direction::Forward, 0.0, &mut warp).expect("step");
    assert_eq!(t.to, Route::Library);
}

#[test]
fn custom_settle_delay() {
    let mut router = Router::default().with_settle_ms(100.0);
    let mut warp = WarpSimulator::default();
    router.navigate(Route::Game, 0.0, &mut warp);
    assert!(router.poll(99.0).is_none());
    assert!(router.poll(100.0).is_some());
}

#[test]
fn classify_horizontal_swipes() {
    assert_eq!(classify_swipe(Vec2::new(-120.0, 10.0)), Some(Direction::Forward));
    assert_eq!(classify_swipe(Vec2::new(120.0, -10.0)), Some(Direction::Backward));
}

#[test]
fn short_vertical_or_diagonal_swipes_are_ignored() {
    assert_eq!(classify_swipe(Vec2::new(-40.0, 0.0)), None);
    assert_eq!(classify_swipe(Vec2::new(10.0, 300.0)), None);
    assert_eq!(classify_swipe(Vec2::new(100.0, 90.0)), None);
    assert_eq!(classify_swipe(Vec2::new(f32::NAN, 0.0)), None);
}

#[test]
fn swipe_tracker_needs_a_start() {
    let mut swipe = SwipeTracker::default();
    assert_eq!(swipe.end(0.0, 0.0), None);

    swipe.start(300.0, 400.0);
    assert_eq!(swipe.end(100.0, 410.0), Some(Direction::Forward));
    // consumed
    assert_eq!(swipe.end(100.0, 410.0), None);

    swipe.start(300.0, 400.0);
    swipe.cancel();
    assert_eq!(swipe.end(0.0, 400.0), None);
}

use telebridge_core::{ControlMessage, RobotCommand};

use super::{ready_dispatcher, respond};
use crate::integration::init_tracing;
use crate::utils::{MockRobot, RobotCall};

fn locations_of(msgs: &[ControlMessage]) -> Vec<String> {
    match msgs {
        [ControlMessage::LocationUpdate(update)] => update.locations.clone(),
        other => panic!("expected a single location_update, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_locations_is_stable() {
    init_tracing();

    let robot = MockRobot::with_locations(["lab", "kitchen"]);
    let mut dispatcher = ready_dispatcher(&robot);

    let first = dispatcher.handle(&RobotCommand::new("get_locations").with_id("1"));
    let second = dispatcher.handle(&RobotCommand::new("get_locations").with_id("2"));

    assert_eq!(first.followups, second.followups);
    assert_eq!(locations_of(&first.followups), vec!["lab", "kitchen"]);
    assert_eq!(
        first.response.unwrap().message,
        "Location list updated (2 locations)"
    );
}

#[tokio::test]
async fn test_save_and_delete_refresh_cache() {
    let robot = MockRobot::with_locations(["lab"]);
    let mut dispatcher = ready_dispatcher(&robot);

    let saved = dispatcher.handle(
        &RobotCommand::new("save_location")
            .with_id("s")
            .with_param("name", "dock"),
    );
    assert_eq!(saved.response.unwrap().message, "Location saved: dock");
    assert_eq!(locations_of(&saved.followups), vec!["lab", "dock"]);
    assert!(dispatcher.state().has_location("dock"));

    let deleted = dispatcher.handle(
        &RobotCommand::new("delete_location")
            .with_id("d")
            .with_param("location", "lab"),
    );
    assert_eq!(deleted.response.unwrap().message, "Location deleted: lab");
    assert_eq!(locations_of(&deleted.followups), vec!["dock"]);
}

#[tokio::test]
async fn test_save_location_without_name_generates_one() {
    let robot = MockRobot::new();
    let mut dispatcher = ready_dispatcher(&robot);

    let res = respond(&mut dispatcher, RobotCommand::new("save_location").with_id("s"));

    assert!(res.success);
    let stored = robot.stored_locations();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].starts_with("custom_location_"));
    assert_eq!(res.message, format!("Location saved: {}", stored[0]));
}

#[tokio::test]
async fn test_delete_missing_location_fails() {
    let robot = MockRobot::with_locations(["lab"]);
    let mut dispatcher = ready_dispatcher(&robot);

    let dispatch = dispatcher.handle(
        &RobotCommand::new("delete_location")
            .with_id("d")
            .with_param("location", "garage"),
    );

    let res = dispatch.response.unwrap();
    assert!(!res.success);
    assert_eq!(res.message, "Failed to delete location");
    assert!(dispatch.followups.is_empty());
}

#[tokio::test]
async fn test_go_to_unknown_location_skips_robot() {
    let robot = MockRobot::with_locations(["lab"]);
    let mut dispatcher = ready_dispatcher(&robot);

    let unknown = respond(
        &mut dispatcher,
        RobotCommand::new("go_to_location").with_id("1").with_param("location", "x"),
    );
    let known = respond(
        &mut dispatcher,
        RobotCommand::new("go_to_location").with_id("2").with_param("location", "lab"),
    );

    assert_eq!(unknown.message, "Location 'x' not found");
    assert_eq!(known.message, "Navigating to lab");
    assert_eq!(robot.actions(), vec![RobotCall::GoTo("lab".into())]);
}

#[tokio::test]
async fn test_go_home_prefers_home_base() {
    let robot = MockRobot::with_locations(["lab", "home base"]);
    let mut dispatcher = ready_dispatcher(&robot);

    let res = respond(&mut dispatcher, RobotCommand::new("go_home").with_id("h"));

    assert_eq!(res.message, "Going home");
    assert_eq!(robot.actions(), vec![RobotCall::GoTo("home base".into())]);
}

#[tokio::test]
async fn test_go_home_falls_back_to_first_location() {
    let robot = MockRobot::with_locations(["lab", "kitchen"]);
    let mut dispatcher = ready_dispatcher(&robot);

    let res = respond(&mut dispatcher, RobotCommand::new("go_home").with_id("h"));

    assert!(res.success);
    assert_eq!(res.message, "Going to lab");
    assert_eq!(robot.actions(), vec![RobotCall::GoTo("lab".into())]);
}

#[tokio::test]
async fn test_go_home_without_locations() {
    let robot = MockRobot::new();
    let mut dispatcher = ready_dispatcher(&robot);

    let res = respond(&mut dispatcher, RobotCommand::new("go_home").with_id("h"));

    assert!(!res.success);
    assert_eq!(res.message, "No home location saved");
    assert!(robot.actions().is_empty());
}

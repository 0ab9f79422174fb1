use telebridge_core::{RobotCommand, TiltAngle};

use super::{ready_dispatcher, respond};
use crate::integration::init_tracing;
use crate::utils::{MockRobot, RobotCall};

#[tokio::test]
async fn test_tilt_up_clamps_to_max() {
    init_tracing();

    let robot = MockRobot::new();
    let mut dispatcher = ready_dispatcher(&robot);

    respond(
        &mut dispatcher,
        RobotCommand::new("tilt_to_angle").with_id("a").with_param("angle", 50),
    );
    let res = respond(
        &mut dispatcher,
        RobotCommand::new("tilt_up").with_id("b").with_param("angle", 20),
    );

    assert!(res.success);
    assert_eq!(res.message, "Head tilted to 55°");
    assert_eq!(dispatcher.state().tilt.degrees(), 55);
    assert_eq!(robot.actions(), vec![RobotCall::TiltAngle(50), RobotCall::TiltAngle(55)]);
}

#[tokio::test]
async fn test_tilt_to_angle_clamps_both_ends() {
    let robot = MockRobot::new();
    let mut dispatcher = ready_dispatcher(&robot);

    let res = respond(
        &mut dispatcher,
        RobotCommand::new("tilt_to_angle").with_id("1").with_param("angle", 100),
    );
    assert_eq!(res.message, "Head tilted to 55°");

    let res = respond(
        &mut dispatcher,
        RobotCommand::new("tilt_to_angle").with_id("2").with_param("angle", -100),
    );
    assert_eq!(res.message, "Head tilted to -25°");
    assert_eq!(dispatcher.state().tilt.degrees(), TiltAngle::MIN);
}

#[tokio::test]
async fn test_tilt_up_then_down_returns_to_start() {
    let robot = MockRobot::new();
    let mut dispatcher = ready_dispatcher(&robot);

    respond(&mut dispatcher, RobotCommand::new("tilt_up").with_id("up"));
    assert_eq!(dispatcher.state().tilt.degrees(), 10);

    respond(&mut dispatcher, RobotCommand::new("tilt_down").with_id("down"));
    assert_eq!(dispatcher.state().tilt, TiltAngle::CENTER);
}

#[tokio::test]
async fn test_tilt_stays_in_range_for_any_sequence() {
    let robot = MockRobot::new();
    let mut dispatcher = ready_dispatcher(&robot);

    let steps: [(&str, i64); 8] = [
        ("tilt_up", 1000),
        ("tilt_up", i64::MAX),
        ("tilt_down", 7),
        ("tilt_down", i64::MAX),
        ("tilt_to_angle", i64::MIN),
        ("tilt_up", 33),
        ("tilt_down", -500),
        ("tilt_to_angle", 12),
    ];

    for (i, (command, angle)) in steps.into_iter().enumerate() {
        respond(
            &mut dispatcher,
            RobotCommand::new(command)
                .with_id(i.to_string())
                .with_param("angle", angle),
        );
        let tilt = dispatcher.state().tilt.degrees();
        assert!((TiltAngle::MIN..=TiltAngle::MAX).contains(&tilt), "{command} {angle} -> {tilt}");
    }

    assert_eq!(dispatcher.state().tilt.degrees(), 12);
}

#[tokio::test]
async fn test_reset_tilt_centers_head() {
    let robot = MockRobot::new();
    let mut dispatcher = ready_dispatcher(&robot);

    respond(&mut dispatcher, RobotCommand::new("tilt_down").with_id("1").with_param("angle", 20));
    let res = respond(&mut dispatcher, RobotCommand::new("reset_tilt").with_id("2"));

    assert_eq!(res.message, "Head tilt reset to center");
    assert_eq!(robot.actions().last(), Some(&RobotCall::TiltAngle(0)));
}

#[tokio::test]
async fn test_tilt_to_angle_requires_angle() {
    let robot = MockRobot::new();
    let mut dispatcher = ready_dispatcher(&robot);

    let res = respond(&mut dispatcher, RobotCommand::new("tilt_to_angle").with_id("1"));

    assert!(!res.success);
    assert_eq!(res.message, "Angle parameter required");
    assert!(robot.actions().is_empty());
}

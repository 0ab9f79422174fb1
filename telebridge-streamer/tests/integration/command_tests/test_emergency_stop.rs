use telebridge_core::RobotCommand;

use super::{ready_dispatcher, respond};
use crate::integration::init_tracing;
use crate::utils::{MockRobot, RobotCall};

#[tokio::test]
async fn test_emergency_stop_stops_before_speaking() {
    init_tracing();

    let robot = MockRobot::new();
    let mut dispatcher = ready_dispatcher(&robot);

    respond(
        &mut dispatcher,
        RobotCommand::new("move").with_id("m").with_param("direction", "forward"),
    );
    assert!(dispatcher.state().is_moving);

    let res = respond(&mut dispatcher, RobotCommand::new("emergency_stop").with_id("e"));

    assert!(res.success);
    assert_eq!(res.message, "Emergency stop activated");
    assert!(!dispatcher.state().is_moving);
    assert_eq!(
        robot.actions()[1..],
        [
            RobotCall::StopMovement,
            RobotCall::Speak {
                text: "Emergency stop activated".into(),
                cutting: true
            },
        ]
    );
}

#[tokio::test]
async fn test_halt_motion_only_when_moving() {
    let robot = MockRobot::new();
    let mut dispatcher = ready_dispatcher(&robot);

    dispatcher.halt_motion().unwrap();
    assert!(robot.actions().is_empty());

    respond(
        &mut dispatcher,
        RobotCommand::new("move").with_id("m").with_param("direction", "backward"),
    );
    dispatcher.halt_motion().unwrap();

    assert_eq!(robot.actions().last(), Some(&RobotCall::StopMovement));
    assert!(!dispatcher.state().is_moving);
}

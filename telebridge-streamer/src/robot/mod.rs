mod simulated_robot;

pub use simulated_robot::*;

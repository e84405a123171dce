// Library root: re-exports the session and front-end modules so integration
// tests can drive the planner without a terminal.

pub mod app;
pub mod input;
pub mod protocol;
pub mod view;

pub mod flow_controller;
pub mod step;

pub use flow_controller::{FlowController, FlowError};
pub use step::{EntryIntent, Step, StepInput};

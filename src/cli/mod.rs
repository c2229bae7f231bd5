pub mod orchestration;

pub use orchestration::{
    run_stamp_workflow, Operation, StampTarget, StampWorkflowArgs, TargetResult, WorkflowResult,
};

pub mod work_ctx;
pub mod work_flow;

pub use work_ctx::WorkCtx;
pub use work_flow::{ProcessResult, SkipReason, WorkFlow};

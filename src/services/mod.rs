pub mod dedup;
pub mod pacer;
pub mod update_submitter;

pub use dedup::{dedup_by_key, dedup_first_occurrence, dedup_work_authors, AuthorDiff, Deduplicated};
pub use pacer::{Pacer, TokioPacer};
pub use update_submitter::{edit_comment, UpdateOutcome, UpdateSubmitter};

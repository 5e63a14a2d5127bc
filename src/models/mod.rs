pub mod candidate;
pub mod loaders;
pub mod work;

pub use candidate::{CandidateRecord, RawCandidate, WorkKey};
pub use loaders::load_candidates;
pub use work::{author_key, WorkSnapshot};

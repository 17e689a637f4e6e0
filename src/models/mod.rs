pub mod loaders;
pub mod persona;
pub mod problem;
pub mod submission;
pub mod user;
pub mod verdict;

pub use loaders::{load_all_toml_files, load_toml_to_judge_job, JobSubmission, JudgeJob};
pub use persona::Persona;
pub use problem::{Problem, TestCase};
pub use submission::{Submission, SubmissionStatus};
pub use user::User;
pub use verdict::Verdict;

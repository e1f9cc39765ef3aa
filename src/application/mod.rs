pub mod submission;
pub mod yoink_coordinator;

pub use submission::{InputRejection, SubmissionController};
pub use yoink_coordinator::{SaveEvent, YoinkCoordinator};

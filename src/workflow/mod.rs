mod clock;
mod controller;
mod outcome;
mod progress;
mod selection;
mod ticker;

pub use clock::GlibClock;
pub use controller::{SubmissionId, UploadWorkflow, WorkflowView};
pub use outcome::{LanguageBadge, ResultOutcome, TranslatedArchive};
pub use progress::ProgressState;
pub use selection::{SelectedFile, ValidatedSelection, ValidationError};

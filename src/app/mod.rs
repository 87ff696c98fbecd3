mod event_handler;
mod form;
mod pipeline;
mod state;

pub use event_handler::handle_backend_event;
pub use form::{clear_file, reset_form, save_result, select_file, sync_form};
pub use pipeline::{dispatch_translation, load_catalog};
pub use state::{AppState, BackendEvent};

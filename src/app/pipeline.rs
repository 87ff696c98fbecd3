use std::cell::RefCell;
use std::rc::Rc;

use super::state::{AppState, BackendEvent};
use crate::workflow::ResultOutcome;

/// Fetch languages and available services on the tokio runtime.
pub fn load_catalog(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    let Some(service) = s.service.clone() else {
        log::warn!("No usable server URL; language list stays empty");
        return;
    };
    let sender = s.backend_sender.clone();

    s.tokio_rt.spawn(async move {
        let event = match service.fetch_languages().await {
            Ok(languages) => BackendEvent::LanguagesLoaded(languages),
            Err(e) => BackendEvent::CatalogFailed(format!("Failed to load languages: {e}")),
        };
        let _ = sender.send(event).await;

        let event = match service.fetch_status().await {
            Ok(status) => BackendEvent::StatusLoaded(status),
            Err(e) => BackendEvent::CatalogFailed(format!("Failed to load server status: {e}")),
        };
        let _ = sender.send(event).await;
    });
}

/// Validate the form and, if it passes, upload on the tokio runtime.
pub fn dispatch_translation(state: &Rc<RefCell<AppState>>) {
    let submission = match state.borrow_mut().workflow.begin_submission() {
        Ok(submission) => submission,
        Err(_) => return,
    };

    let service = state.borrow().service.clone();
    let Some(service) = service else {
        let mut s = state.borrow_mut();
        let message = format!("Invalid server URL: {}", s.config.server_url);
        s.workflow.finish(submission.id, ResultOutcome::failure(message));
        return;
    };

    let s = state.borrow();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let outcome = service.translate(&submission.selection).await;
        let _ = sender
            .send(BackendEvent::TranslationFinished(submission.id, outcome))
            .await;
    });
}

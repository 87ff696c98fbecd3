use std::cell::RefCell;
use std::rc::Rc;

use super::form::sync_service;
use super::state::{AppState, BackendEvent};

/// Handle a backend event on the GTK main thread.
pub fn handle_backend_event(state: &Rc<RefCell<AppState>>, event: BackendEvent) {
    match event {
        BackendEvent::LanguagesLoaded(languages) => {
            // Populating emits no toggles, but the callbacks borrow state later.
            let picker = state.borrow().window.languages.clone();
            let state_clone = state.clone();
            picker.populate(
                &languages,
                Rc::new(move |code: &str, checked: bool| {
                    let mut s = state_clone.borrow_mut();
                    let selection = s.workflow.selection_mut();
                    if checked {
                        selection.select_language(code);
                    } else {
                        selection.deselect_language(code);
                    }
                }),
            );
        }
        BackendEvent::StatusLoaded(status) => {
            log::info!(
                "Server status {}: services {:?}, {} languages",
                status.status,
                status.services,
                status.total_languages
            );
            let (window, preferred) = {
                let s = state.borrow();
                (s.window.clone(), s.workflow.selection().service().to_string())
            };
            window.set_services(&status.services, &preferred);
            sync_service(state);
        }
        BackendEvent::CatalogFailed(err) => {
            log::warn!("{err}");
        }
        BackendEvent::TranslationFinished(id, outcome) => {
            log::info!(
                "Translation finished: {}",
                if outcome.is_success() { "success" } else { "failure" }
            );
            state.borrow_mut().workflow.finish(id, outcome);
        }
    }
}

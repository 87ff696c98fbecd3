use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::ui::dialogs;
use crate::workflow::SelectedFile;

use super::state::AppState;

/// Validate a chosen or dropped file and make it the selection.
pub fn select_file(state: &Rc<RefCell<AppState>>, path: &Path) {
    let mut s = state.borrow_mut();
    match SelectedFile::from_path(path) {
        Ok(file) => {
            log::info!("Selected {} ({})", file.name, file.display_size());
            s.window.show_file(Some(&file));
            s.workflow.selection_mut().set_file(Some(file));
        }
        Err(e) => {
            log::warn!("Rejected {}: {e}", path.display());
            dialogs::toast(&s.window.toast_overlay, &e.to_string());
        }
    }
}

pub fn clear_file(state: &Rc<RefCell<AppState>>) {
    let mut s = state.borrow_mut();
    s.workflow.selection_mut().set_file(None);
    s.window.show_file(None);
}

/// Clear the form and restore the configured defaults.
pub fn reset_form(state: &Rc<RefCell<AppState>>) {
    let (window, config) = {
        let mut s = state.borrow_mut();
        s.workflow.reset();
        (s.window.clone(), s.config.clone())
    };
    // Widget resets fire toggle handlers that borrow state.
    window.reset_inputs(&config);
    sync_form(state);
}

/// Open a save dialog for the last successful result.
pub fn save_result(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    let Some(archive) = s.workflow.download_payload() else {
        dialogs::toast(&s.window.toast_overlay, "Nothing to download yet");
        return;
    };
    dialogs::save_archive(
        &s.window.window,
        &s.window.toast_overlay,
        archive.clone(),
        s.config.download_dir.as_deref(),
    );
}

/// Copy format and service choices from the widgets into the selection.
pub fn sync_form(state: &Rc<RefCell<AppState>>) {
    let formats = state.borrow().window.checked_formats();
    {
        let mut s = state.borrow_mut();
        let selection = s.workflow.selection_mut();
        for (format, _) in crate::ui::window::OUTPUT_FORMATS {
            selection.set_format(format, formats.iter().any(|f| f == format));
        }
    }
    sync_service(state);
}

pub fn sync_service(state: &Rc<RefCell<AppState>>) {
    let mut s = state.borrow_mut();
    if let Some(service) = s.window.selected_service() {
        s.workflow.selection_mut().set_service(&service);
    }
}

use std::path::{Path, PathBuf};

use gtk4::gio;
use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::workflow::TranslatedArchive;

/// Show a dismissible alert with a single "OK" response.
pub fn show_alert(parent: &libadwaita::ApplicationWindow, heading: &str, body: &str) {
    let dialog = libadwaita::AlertDialog::builder()
        .heading(heading)
        .body(body)
        .build();
    dialog.add_response("ok", "OK");
    dialog.set_default_response(Some("ok"));

    let parent_widget: Option<&gtk4::Widget> = Some(parent.upcast_ref());
    dialog.choose(parent_widget, None::<&gio::Cancellable>, |_response_id| {});
}

/// Show a toast for a short message.
pub fn toast(overlay: &libadwaita::ToastOverlay, message: &str) {
    let toast = libadwaita::Toast::new(message);
    toast.set_timeout(3);
    overlay.add_toast(toast);
}

/// Ask for a `.pptx` file. `on_chosen` runs only if the user picks one.
pub fn choose_presentation<F>(parent: &libadwaita::ApplicationWindow, on_chosen: F)
where
    F: Fn(PathBuf) + 'static,
{
    let filter = gtk4::FileFilter::new();
    filter.set_name(Some("PowerPoint presentations"));
    filter.add_suffix("pptx");

    let filters = gio::ListStore::new::<gtk4::FileFilter>();
    filters.append(&filter);

    let dialog = gtk4::FileDialog::builder()
        .title("Choose a presentation")
        .modal(true)
        .build();
    dialog.set_filters(Some(&filters));
    dialog.set_default_filter(Some(&filter));

    dialog.open(Some(parent), gio::Cancellable::NONE, move |result| match result {
        Ok(file) => match file.path() {
            Some(path) => on_chosen(path),
            None => log::warn!("Chosen file has no local path: {}", file.uri()),
        },
        Err(e) => log::debug!("File chooser closed: {e}"),
    });
}

/// Ask where to save the archive, then write it.
pub fn save_archive(
    parent: &libadwaita::ApplicationWindow,
    toasts: &libadwaita::ToastOverlay,
    archive: TranslatedArchive,
    initial_dir: Option<&Path>,
) {
    let dialog = gtk4::FileDialog::builder()
        .title("Save translations")
        .modal(true)
        .initial_name(archive.filename.as_str())
        .build();
    if let Some(dir) = initial_dir {
        dialog.set_initial_folder(Some(&gio::File::for_path(dir)));
    }

    let toasts = toasts.clone();
    dialog.save(Some(parent), gio::Cancellable::NONE, move |result| {
        let path = match result.map(|f| f.path()) {
            Ok(Some(path)) => path,
            Ok(None) => {
                toast(&toasts, "Cannot save to a non-local location");
                return;
            }
            Err(e) => {
                log::debug!("Save dialog closed: {e}");
                return;
            }
        };
        match std::fs::write(&path, &archive.bytes) {
            Ok(()) => {
                log::info!("Saved {} bytes to {}", archive.bytes.len(), path.display());
                toast(&toasts, &format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to write {}: {e}", path.display());
                toast(&toasts, &format!("Could not save: {e}"));
            }
        }
    });
}

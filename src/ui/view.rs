use gtk4::prelude::*;

use super::dialogs::show_alert;
use super::window::MainWindow;
use crate::workflow::{
    LanguageBadge, ProgressState, TranslatedArchive, ValidationError, WorkflowView,
};

/// `WorkflowView` backed by the main window's widgets.
pub struct GtkWorkflowView {
    widgets: MainWindow,
}

impl GtkWorkflowView {
    pub fn new(widgets: MainWindow) -> Self {
        Self { widgets }
    }

    fn clear_warnings(&self) {
        self.widgets.warnings_label.set_text("");
        self.widgets.warnings_label.set_visible(false);
    }
}

impl WorkflowView for GtkWorkflowView {
    fn show_validation_error(&self, error: &ValidationError) {
        show_alert(&self.widgets.window, error.heading(), &error.to_string());
    }

    fn show_progress(&self, progress: &ProgressState) {
        let w = &self.widgets;
        w.result_group.set_visible(false);
        w.error_group.set_visible(false);
        w.progress_group.set_visible(true);
        w.progress_bar.set_fraction(progress.fraction());
        w.progress_bar
            .set_text(Some(&format!("{:.0}%", progress.percent)));
        w.progress_label.set_text(progress.status_text());
        w.translate_button.set_sensitive(false);
    }

    fn show_badges(&self, badges: &[LanguageBadge]) {
        self.widgets.badges.remove_all();
        for badge in badges {
            let label = gtk4::Label::new(Some(&badge.code));
            label.add_css_class("badge");
            label.add_css_class(badge.state.css_class());
            self.widgets.badges.insert(&label, -1);
        }
    }

    fn show_success(&self, archive: &TranslatedArchive) {
        let w = &self.widgets;
        w.progress_group.set_visible(false);
        w.error_group.set_visible(false);
        w.result_group.set_visible(true);
        w.translate_button.set_sensitive(true);

        match archive.warnings.as_deref() {
            Some(text) => {
                w.warnings_label.set_text(&format!("Warnings: {text}"));
                w.warnings_label.set_visible(true);
            }
            None => self.clear_warnings(),
        }
        w.download_button
            .set_label(&format!("Download {}", archive.filename));

        let toast = libadwaita::Toast::new("Translation complete");
        toast.set_button_label(Some("Download"));
        toast.set_timeout(8);
        let download = w.download_button.clone();
        toast.connect_button_clicked(move |_| download.emit_clicked());
        w.toast_overlay.add_toast(toast);
    }

    fn show_failure(&self, message: &str) {
        let w = &self.widgets;
        w.progress_group.set_visible(false);
        w.result_group.set_visible(false);
        w.error_label.set_text(message);
        w.error_group.set_visible(true);
        w.translate_button.set_sensitive(true);
        self.clear_warnings();
        show_alert(&w.window, "Translation Failed", message);
    }

    fn reset(&self) {
        let w = &self.widgets;
        w.progress_group.set_visible(false);
        w.result_group.set_visible(false);
        w.error_group.set_visible(false);
        w.progress_bar.set_fraction(0.0);
        w.progress_bar.set_text(None);
        w.progress_label.set_text("");
        w.error_label.set_text("");
        w.download_button.set_label("Download");
        w.badges.remove_all();
        w.translate_button.set_sensitive(true);
        self.clear_warnings();
    }
}

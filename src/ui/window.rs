use gtk4::prelude::*;
use libadwaita::prelude::*;

use super::language_picker::LanguagePicker;
use crate::config::Config;
use crate::workflow::SelectedFile;

/// Output formats the server can produce, with their labels.
pub const OUTPUT_FORMATS: [(&str, &str); 2] = [
    ("pptx", "PowerPoint (.pptx)"),
    ("pdf", "PDF (.pdf)"),
];

const FALLBACK_SERVICES: [&str; 3] = ["google", "deepl", "openai"];

const CSS: &str = r#"
.drop-zone.drag-hover {
    background-color: alpha(@accent_bg_color, 0.12);
    border-radius: 12px;
}
.badge {
    border-radius: 10px;
    padding: 2px 10px;
    font-weight: bold;
    background-color: alpha(@window_fg_color, 0.08);
}
.badge.success {
    background-color: alpha(@success_color, 0.2);
}
.badge.error {
    background-color: alpha(@error_color, 0.2);
}
"#;

/// Handles returned from building the main window.
#[derive(Clone)]
pub struct MainWindow {
    pub window: libadwaita::ApplicationWindow,
    pub toast_overlay: libadwaita::ToastOverlay,
    pub drop_zone: gtk4::Box,
    pub file_row: libadwaita::ActionRow,
    pub choose_button: gtk4::Button,
    pub clear_file_button: gtk4::Button,
    pub languages: LanguagePicker,
    pub format_checks: Vec<(String, gtk4::CheckButton)>,
    pub service_model: gtk4::StringList,
    pub service_dropdown: gtk4::DropDown,
    pub translate_button: gtk4::Button,
    pub reset_button: gtk4::Button,
    pub progress_group: gtk4::Box,
    pub progress_bar: gtk4::ProgressBar,
    pub progress_label: gtk4::Label,
    pub result_group: gtk4::Box,
    pub badges: gtk4::FlowBox,
    pub warnings_label: gtk4::Label,
    pub download_button: gtk4::Button,
    pub error_group: gtk4::Box,
    pub error_label: gtk4::Label,
}

/// Build the main translator window.
pub fn build_main_window(app: &libadwaita::Application, config: &Config) -> MainWindow {
    let window = libadwaita::ApplicationWindow::builder()
        .application(app)
        .title("Slide Translator")
        .default_width(520)
        .default_height(760)
        .build();

    load_css();

    let toolbar_view = libadwaita::ToolbarView::new();
    let header = libadwaita::HeaderBar::new();

    let menu_button = gtk4::MenuButton::new();
    menu_button.set_icon_name("open-menu-symbolic");
    let menu = gtk4::gio::Menu::new();
    menu.append(Some("About Slide Translator"), Some("app.about"));
    menu.append(Some("Quit"), Some("app.quit"));
    menu_button.set_menu_model(Some(&menu));
    header.pack_end(&menu_button);

    toolbar_view.add_top_bar(&header);

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);

    // --- Presentation group (also the drop zone) ---
    let drop_zone = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    drop_zone.add_css_class("drop-zone");

    let file_group = libadwaita::PreferencesGroup::new();
    file_group.set_title("Presentation");
    file_group.set_description(Some("Choose a .pptx file or drop it here"));

    let file_row = libadwaita::ActionRow::builder()
        .title("No file selected")
        .build();
    let clear_file_button = gtk4::Button::from_icon_name("edit-clear-symbolic");
    clear_file_button.set_valign(gtk4::Align::Center);
    clear_file_button.set_tooltip_text(Some("Remove file"));
    clear_file_button.set_visible(false);
    clear_file_button.add_css_class("flat");
    file_row.add_suffix(&clear_file_button);

    let choose_button = gtk4::Button::builder()
        .label("Choose\u{2026}")
        .valign(gtk4::Align::Center)
        .build();
    file_row.add_suffix(&choose_button);
    file_group.add(&file_row);

    drop_zone.append(&file_group);
    content.append(&drop_zone);

    // --- Target languages ---
    let lang_group = libadwaita::PreferencesGroup::new();
    lang_group.set_title("Target Languages");
    lang_group.set_margin_top(12);
    let languages = LanguagePicker::new();
    lang_group.add(&languages.root);
    content.append(&lang_group);

    // --- Output formats ---
    let format_group = libadwaita::PreferencesGroup::new();
    format_group.set_title("Output Formats");
    format_group.set_margin_top(12);
    let mut format_checks = Vec::new();
    for (format, label) in OUTPUT_FORMATS {
        let check = gtk4::CheckButton::new();
        check.set_valign(gtk4::Align::Center);
        check.set_active(config.default_formats.iter().any(|f| f == format));
        let row = libadwaita::ActionRow::builder().title(label).build();
        row.add_prefix(&check);
        row.set_activatable_widget(Some(&check));
        format_group.add(&row);
        format_checks.push((format.to_string(), check));
    }
    content.append(&format_group);

    // --- Service ---
    let service_group = libadwaita::PreferencesGroup::new();
    service_group.set_title("Translation Service");
    service_group.set_margin_top(12);
    let service_model = gtk4::StringList::new(&[]);
    let service_dropdown = gtk4::DropDown::builder()
        .model(&service_model)
        .valign(gtk4::Align::Center)
        .build();
    let service_row = libadwaita::ActionRow::builder().title("Service").build();
    service_row.add_suffix(&service_dropdown);
    service_group.add(&service_row);
    content.append(&service_group);

    // --- Actions ---
    let actions = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
    actions.set_halign(gtk4::Align::Center);
    actions.set_margin_top(18);
    let reset_button = gtk4::Button::with_label("Reset");
    reset_button.add_css_class("pill");
    let translate_button = gtk4::Button::with_label("Translate");
    translate_button.add_css_class("pill");
    translate_button.add_css_class("suggested-action");
    actions.append(&reset_button);
    actions.append(&translate_button);
    content.append(&actions);

    // --- Progress ---
    let progress_group = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
    progress_group.set_margin_top(18);
    progress_group.set_visible(false);
    let progress_bar = gtk4::ProgressBar::new();
    progress_bar.set_show_text(true);
    let progress_label = gtk4::Label::new(None);
    progress_label.add_css_class("dim-label");
    progress_group.append(&progress_bar);
    progress_group.append(&progress_label);
    content.append(&progress_group);

    // --- Badges (shared by progress, success and error) ---
    let badges = gtk4::FlowBox::new();
    badges.set_selection_mode(gtk4::SelectionMode::None);
    badges.set_max_children_per_line(8);
    badges.set_margin_top(12);
    content.append(&badges);

    // --- Success ---
    let result_group = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    result_group.set_margin_top(12);
    result_group.set_visible(false);
    let done_label = gtk4::Label::new(Some("Translation complete"));
    done_label.add_css_class("title-3");
    let warnings_label = gtk4::Label::new(None);
    warnings_label.set_wrap(true);
    warnings_label.add_css_class("warning");
    warnings_label.set_visible(false);
    let download_button = gtk4::Button::with_label("Download");
    download_button.add_css_class("pill");
    download_button.add_css_class("suggested-action");
    download_button.set_halign(gtk4::Align::Center);
    result_group.append(&done_label);
    result_group.append(&warnings_label);
    result_group.append(&download_button);
    content.append(&result_group);

    // --- Error ---
    let error_group = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    error_group.set_margin_top(12);
    error_group.set_visible(false);
    let error_title = gtk4::Label::new(Some("Translation failed"));
    error_title.add_css_class("title-3");
    let error_label = gtk4::Label::new(None);
    error_label.set_wrap(true);
    error_label.add_css_class("error");
    error_group.append(&error_title);
    error_group.append(&error_label);
    content.append(&error_group);

    let scrolled = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .child(&content)
        .build();
    toolbar_view.set_content(Some(&scrolled));
    let toast_overlay = libadwaita::ToastOverlay::new();
    toast_overlay.set_child(Some(&toolbar_view));
    window.set_content(Some(&toast_overlay));

    let main = MainWindow {
        window,
        toast_overlay,
        drop_zone,
        file_row,
        choose_button,
        clear_file_button,
        languages,
        format_checks,
        service_model,
        service_dropdown,
        translate_button,
        reset_button,
        progress_group,
        progress_bar,
        progress_label,
        result_group,
        badges,
        warnings_label,
        download_button,
        error_group,
        error_label,
    };
    main.set_services(&[], &config.service);
    main
}

fn load_css() {
    let Some(display) = gtk4::gdk::Display::default() else {
        log::warn!("No display; skipping stylesheet");
        return;
    };
    let provider = gtk4::CssProvider::new();
    provider.load_from_string(CSS);
    gtk4::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

impl MainWindow {
    pub fn show_file(&self, file: Option<&SelectedFile>) {
        match file {
            Some(f) => {
                self.file_row.set_title(&f.name);
                self.file_row.set_subtitle(&f.display_size());
                self.clear_file_button.set_visible(true);
            }
            None => {
                self.file_row.set_title("No file selected");
                self.file_row.set_subtitle("");
                self.clear_file_button.set_visible(false);
            }
        }
    }

    /// Formats whose checkbox is currently active.
    pub fn checked_formats(&self) -> Vec<String> {
        self.format_checks
            .iter()
            .filter(|(_, check)| check.is_active())
            .map(|(format, _)| format.clone())
            .collect()
    }

    pub fn selected_service(&self) -> Option<String> {
        self.service_dropdown
            .selected_item()
            .and_downcast::<gtk4::StringObject>()
            .map(|s| s.string().to_string())
    }

    /// Replace the service choices, keeping `preferred` selected when offered.
    /// An empty list falls back to the services every server supports.
    pub fn set_services(&self, services: &[String], preferred: &str) {
        let mut names: Vec<&str> = if services.is_empty() {
            FALLBACK_SERVICES.to_vec()
        } else {
            services.iter().map(String::as_str).collect()
        };
        if !preferred.is_empty() && !names.contains(&preferred) {
            names.insert(0, preferred);
        }
        self.service_model
            .splice(0, self.service_model.n_items(), &names);
        let index = names.iter().position(|n| *n == preferred).unwrap_or(0);
        self.service_dropdown.set_selected(index as u32);
    }

    /// Put the input widgets back to their startup state. Emits the same
    /// signals as user edits, so call it without holding app state.
    pub fn reset_inputs(&self, config: &Config) {
        self.show_file(None);
        self.languages.clear_selection();
        for (format, check) in &self.format_checks {
            check.set_active(false);
            check.set_active(config.default_formats.iter().any(|f| f == format));
        }
    }
}

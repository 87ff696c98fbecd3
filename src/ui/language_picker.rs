use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::service::Language;

struct LanguageRow {
    language: Language,
    row: libadwaita::ActionRow,
    check: gtk4::CheckButton,
}

/// Searchable multi-select list of target languages.
#[derive(Clone)]
pub struct LanguagePicker {
    pub root: gtk4::Box,
    search: gtk4::SearchEntry,
    list: gtk4::ListBox,
    placeholder: gtk4::Label,
    rows: Rc<RefCell<Vec<LanguageRow>>>,
}

impl LanguagePicker {
    pub fn new() -> Self {
        let root = gtk4::Box::new(gtk4::Orientation::Vertical, 6);

        let search = gtk4::SearchEntry::builder()
            .placeholder_text("Search languages")
            .build();
        root.append(&search);

        let list = gtk4::ListBox::new();
        list.set_selection_mode(gtk4::SelectionMode::None);
        list.add_css_class("boxed-list");

        let placeholder = gtk4::Label::new(Some("Loading languages\u{2026}"));
        placeholder.add_css_class("dim-label");
        placeholder.set_margin_top(12);
        placeholder.set_margin_bottom(12);
        list.set_placeholder(Some(&placeholder));

        let scrolled = gtk4::ScrolledWindow::builder()
            .hscrollbar_policy(gtk4::PolicyType::Never)
            .min_content_height(220)
            .child(&list)
            .build();
        root.append(&scrolled);

        let picker = Self {
            root,
            search,
            list,
            placeholder,
            rows: Rc::new(RefCell::new(Vec::new())),
        };

        let rows = picker.rows.clone();
        picker.search.connect_search_changed(move |entry| {
            let query = entry.text().to_lowercase();
            for r in rows.borrow().iter() {
                r.row.set_visible(matches_query(&r.language, &query));
            }
        });

        picker
    }

    /// Replace the list contents. `on_toggle(code, checked)` fires whenever
    /// the user checks or unchecks a language.
    pub fn populate(&self, languages: &[Language], on_toggle: Rc<dyn Fn(&str, bool)>) {
        self.list.remove_all();
        let mut rows = self.rows.borrow_mut();
        rows.clear();

        for language in languages {
            let check = gtk4::CheckButton::new();
            check.set_valign(gtk4::Align::Center);

            let row = libadwaita::ActionRow::builder()
                .title(&language.name)
                .subtitle(&language.code)
                .build();
            row.add_prefix(&check);
            row.set_activatable_widget(Some(&check));

            let code = language.code.clone();
            let callback = on_toggle.clone();
            check.connect_toggled(move |c| callback(&code, c.is_active()));

            self.list.append(&row);
            rows.push(LanguageRow {
                language: language.clone(),
                row,
                check,
            });
        }

        if languages.is_empty() {
            self.placeholder.set_text("No languages available");
        }
    }

    /// Uncheck everything and clear the search. Emits toggle callbacks.
    pub fn clear_selection(&self) {
        self.search.set_text("");
        let checks: Vec<gtk4::CheckButton> =
            self.rows.borrow().iter().map(|r| r.check.clone()).collect();
        for check in checks {
            check.set_active(false);
        }
    }
}

fn matches_query(language: &Language, query: &str) -> bool {
    query.is_empty()
        || language.name.to_lowercase().contains(query)
        || language.code.to_lowercase().contains(query)
}

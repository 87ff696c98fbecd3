mod app;
mod config;
mod service;
mod ui;
mod workflow;

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::{gdk, gio};
use gtk4::prelude::*;
use libadwaita::prelude::*;

use app::{AppState, BackendEvent};
use config::Config;
use workflow::{GlibClock, UploadWorkflow};

fn main() {
    env_logger::init();
    log::info!("Slide Translator starting");

    let application = libadwaita::Application::builder()
        .application_id("io.github.slide-translator")
        .build();

    application.connect_activate(on_activate);
    application.run();
}

fn on_activate(app: &libadwaita::Application) {
    // Create async channel for backend → UI communication
    let (backend_tx, backend_rx) = async_channel::unbounded::<BackendEvent>();

    let config = Config::load();
    let window = ui::window::build_main_window(app, &config);
    let view = Rc::new(ui::view::GtkWorkflowView::new(window.clone()));
    let workflow = UploadWorkflow::new(
        view,
        Rc::new(GlibClock),
        Box::new(rand::thread_rng()),
    );

    let state = Rc::new(RefCell::new(AppState::new(
        config,
        backend_tx,
        workflow,
        window.clone(),
    )));

    install_actions(app, &window.window);

    // Wire up the file chooser
    {
        let state_clone = state.clone();
        let parent = window.window.clone();
        window.choose_button.connect_clicked(move |_| {
            let state_inner = state_clone.clone();
            ui::dialogs::choose_presentation(&parent, move |path| {
                app::select_file(&state_inner, &path);
            });
        });
    }

    // Wire up drag and drop onto the presentation group
    {
        let target = gtk4::DropTarget::new(gio::File::static_type(), gdk::DragAction::COPY);
        let zone = window.drop_zone.clone();
        target.connect_enter(move |_, _, _| {
            zone.add_css_class("drag-hover");
            gdk::DragAction::COPY
        });
        let zone = window.drop_zone.clone();
        target.connect_leave(move |_| zone.remove_css_class("drag-hover"));

        let state_clone = state.clone();
        let zone = window.drop_zone.clone();
        target.connect_drop(move |_, value, _, _| {
            zone.remove_css_class("drag-hover");
            let Ok(file) = value.get::<gio::File>() else {
                return false;
            };
            match file.path() {
                Some(path) => {
                    app::select_file(&state_clone, &path);
                    true
                }
                None => {
                    log::warn!("Dropped file has no local path: {}", file.uri());
                    false
                }
            }
        });
        window.drop_zone.add_controller(target);
    }

    {
        let state_clone = state.clone();
        window
            .clear_file_button
            .connect_clicked(move |_| app::clear_file(&state_clone));
    }

    // Wire up output format checkboxes
    for (format, check) in &window.format_checks {
        let state_clone = state.clone();
        let format = format.clone();
        check.connect_toggled(move |c| {
            state_clone
                .borrow_mut()
                .workflow
                .selection_mut()
                .set_format(&format, c.is_active());
        });
    }

    // Wire up service changes, remembering the choice
    {
        let state_clone = state.clone();
        let dropdown_window = window.clone();
        window.service_dropdown.connect_selected_notify(move |_| {
            let Some(service) = dropdown_window.selected_service() else {
                return;
            };
            let mut s = state_clone.borrow_mut();
            s.workflow.selection_mut().set_service(&service);
            if s.config.service != service {
                s.config.service = service;
                if let Err(e) = s.config.save() {
                    log::warn!("Failed to save config: {e}");
                }
            }
        });
    }

    {
        let state_clone = state.clone();
        window
            .translate_button
            .connect_clicked(move |_| app::dispatch_translation(&state_clone));
    }
    {
        let state_clone = state.clone();
        window
            .reset_button
            .connect_clicked(move |_| app::reset_form(&state_clone));
    }
    {
        let state_clone = state.clone();
        window
            .download_button
            .connect_clicked(move |_| app::save_result(&state_clone));
    }

    // Defaults were applied before the handlers above existed
    app::sync_form(&state);

    window.window.present();

    // Attach backend event handler
    {
        let state_clone = state.clone();
        gtk4::glib::spawn_future_local(async move {
            while let Ok(event) = backend_rx.recv().await {
                app::handle_backend_event(&state_clone, event);
            }
        });
    }

    app::load_catalog(&state);
}

fn install_actions(app: &libadwaita::Application, window: &libadwaita::ApplicationWindow) {
    let quit = gio::ActionEntry::builder("quit")
        .activate(|app: &libadwaita::Application, _, _| app.quit())
        .build();

    let parent = window.clone();
    let about = gio::ActionEntry::builder("about")
        .activate(move |_: &libadwaita::Application, _, _| {
            let dialog = libadwaita::AboutDialog::builder()
                .application_name("Slide Translator")
                .version(env!("CARGO_PKG_VERSION"))
                .comments("Translate PowerPoint presentations into other languages")
                .license_type(gtk4::License::MitX11)
                .build();
            dialog.present(Some(&parent));
        })
        .build();

    app.add_action_entries([quit, about]);
    app.set_accels_for_action("app.quit", &["<Control>q"]);
}

pub mod dialogs;
pub mod language_picker;
pub mod view;
pub mod window;

use adw::prelude::*;

use crate::config;

pub fn create_shortcuts_window(parent: &adw::ApplicationWindow) {
    let window = gtk::ShortcutsWindow::builder()
        .transient_for(parent)
        .modal(true)
        .build();

    let general_group = gtk::ShortcutsGroup::builder().title("General").build();
    for (title, accelerator) in [
        ("Start new chat", "<Control>n"),
        ("Export scheduled posts", "<Control>e"),
        ("Keyboard shortcuts", "<Control>slash"),
        ("Quit", "<Control>q"),
    ] {
        let shortcut = gtk::ShortcutsShortcut::builder()
            .title(title)
            .accelerator(accelerator)
            .build();
        general_group.add_shortcut(&shortcut);
    }

    let chat_group = gtk::ShortcutsGroup::builder().title("Chat").build();
    for (title, accelerator) in [("Send", "Return"), ("New line", "<Shift>Return")] {
        let shortcut = gtk::ShortcutsShortcut::builder()
            .title(title)
            .accelerator(accelerator)
            .build();
        chat_group.add_shortcut(&shortcut);
    }

    let section = gtk::ShortcutsSection::builder()
        .title(config::APP_NAME)
        .build();
    section.add_group(&general_group);
    section.add_group(&chat_group);

    window.add_section(&section);
    window.present();
}

pub fn create_about_dialog(parent: &adw::ApplicationWindow, model: &str) {
    let about = adw::AboutWindow::builder()
        .application_name(config::APP_NAME)
        .version(config::VERSION)
        .developer_name("Alira Contributors")
        .license_type(gtk::License::Gpl30)
        .comments(format!(
            "Drafts real estate posts for Facebook, Instagram and LinkedIn.\nModel: {}",
            model
        ))
        .application_icon(config::APP_ID)
        .build();
    about.set_transient_for(Some(parent));
    about.present();
}

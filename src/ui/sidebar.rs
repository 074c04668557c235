use adw::prelude::*;
use chrono::{DateTime, Local};
use relm4::factory::FactoryVecDeque;
use relm4::prelude::*;

use crate::models::{Platform, ScheduledPost};

// --- ScheduledPostRow factory component ---

#[derive(Debug)]
pub struct ScheduledPostRow {
    post: ScheduledPost,
    time_label: String,
}

#[derive(Debug)]
pub enum ScheduledPostRowMsg {
    Tick(DateTime<Local>),
}

#[relm4::factory(pub)]
impl FactoryComponent for ScheduledPostRow {
    type Init = ScheduledPost;
    type Input = ScheduledPostRowMsg;
    type Output = ();
    type CommandOutput = ();
    type ParentWidget = gtk::ListBox;

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_spacing: 2,
            set_margin_all: 6,
            set_tooltip_text: Some(&self.post.content),

            gtk::Label {
                set_label: &self.post.title,
                set_halign: gtk::Align::Start,
                set_ellipsize: gtk::pango::EllipsizeMode::End,
                set_max_width_chars: 30,
                add_css_class: "heading",
            },

            gtk::Label {
                #[watch]
                set_label: &format!("{} \u{2022} {}", self.post.platform.display_name(), self.time_label),
                set_halign: gtk::Align::Start,
                add_css_class: "dim-label",
                add_css_class: "caption",
            },
        }
    }

    fn init_model(post: Self::Init, _index: &DynamicIndex, _sender: FactorySender<Self>) -> Self {
        let time_label = post.time_label(Local::now());
        Self { post, time_label }
    }

    fn update(&mut self, msg: Self::Input, _sender: FactorySender<Self>) {
        match msg {
            ScheduledPostRowMsg::Tick(now) => {
                self.time_label = self.post.time_label(now);
            }
        }
    }
}

// --- Sidebar component ---

pub struct SidebarInit {
    pub user_name: String,
    pub user_role: String,
    pub user_initials: String,
    pub platform: Platform,
}

pub struct Sidebar {
    scheduled: FactoryVecDeque<ScheduledPostRow>,
    toggles: Vec<(Platform, gtk::ToggleButton)>,
}

#[derive(Debug)]
pub enum SidebarMsg {
    AddScheduledPost(ScheduledPost),
    PlatformToggled(Platform),
    RefreshTimes,
    NewChat,
    Export,
}

#[derive(Debug)]
pub enum SidebarOutput {
    PlatformSelected(Platform),
    NewChat,
    ExportScheduled,
}

#[relm4::component(pub)]
impl Component for Sidebar {
    type Init = SidebarInit;
    type Input = SidebarMsg;
    type Output = SidebarOutput;
    type CommandOutput = ();

    view! {
        adw::ToolbarView {
            add_top_bar = &adw::HeaderBar {
                set_show_end_title_buttons: false,

                #[wrap(Some)]
                set_title_widget = &adw::WindowTitle {
                    set_title: crate::config::APP_NAME,
                },
            },

            #[wrap(Some)]
            set_content = &gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 12,
                set_margin_all: 12,

                // Profile card
                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 12,
                    add_css_class: "card",
                    add_css_class: "profile-card",

                    gtk::Label {
                        set_label: &init.user_initials,
                        set_valign: gtk::Align::Center,
                        add_css_class: "profile-avatar",
                    },

                    gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,
                        set_valign: gtk::Align::Center,
                        set_spacing: 2,

                        gtk::Label {
                            set_label: &init.user_name,
                            set_halign: gtk::Align::Start,
                            add_css_class: "heading",
                        },
                        gtk::Label {
                            set_label: &init.user_role,
                            set_halign: gtk::Align::Start,
                            add_css_class: "dim-label",
                            add_css_class: "caption",
                        },
                    },
                },

                gtk::Label {
                    set_label: "Platform",
                    set_halign: gtk::Align::Start,
                    add_css_class: "sidebar-section-title",
                },

                #[local_ref]
                platform_box -> gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 4,
                    add_css_class: "linked",
                },

                gtk::Label {
                    set_label: "Recent Generations",
                    set_halign: gtk::Align::Start,
                    add_css_class: "sidebar-section-title",
                },

                gtk::ScrolledWindow {
                    set_hscrollbar_policy: gtk::PolicyType::Never,
                    set_vexpand: true,

                    #[local_ref]
                    scheduled_list -> gtk::ListBox {
                        set_selection_mode: gtk::SelectionMode::None,
                        add_css_class: "navigation-sidebar",
                        #[wrap(Some)]
                        set_placeholder = &gtk::Label {
                            set_label: "No scheduled posts yet",
                            set_margin_all: 12,
                            add_css_class: "dim-label",
                        },
                    },
                },

                gtk::Button {
                    set_label: "Start New Chat",
                    add_css_class: "suggested-action",
                    add_css_class: "pill",
                    connect_clicked => SidebarMsg::NewChat,
                },

                gtk::Button {
                    set_label: "Export",
                    set_tooltip_text: Some("Export scheduled posts (Ctrl+E)"),
                    add_css_class: "pill",
                    connect_clicked => SidebarMsg::Export,
                },
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let scheduled = FactoryVecDeque::builder()
            .launch(gtk::ListBox::default())
            .detach();

        let platform_box = gtk::Box::default();
        let mut toggles: Vec<(Platform, gtk::ToggleButton)> = Vec::new();
        for platform in Platform::ALL {
            let toggle = gtk::ToggleButton::builder()
                .label(platform.display_name())
                .active(platform == init.platform)
                .build();
            toggle.add_css_class("platform-toggle");
            toggle.add_css_class(platform.css_class());
            if let Some((_, first)) = toggles.first() {
                toggle.set_group(Some(first));
            }
            let sender_toggle = sender.input_sender().clone();
            toggle.connect_toggled(move |btn| {
                if btn.is_active() {
                    sender_toggle
                        .send(SidebarMsg::PlatformToggled(platform))
                        .unwrap();
                }
            });
            platform_box.append(&toggle);
            toggles.push((platform, toggle));
        }

        let model = Self { scheduled, toggles };

        let scheduled_list = model.scheduled.widget();
        let widgets = view_output!();

        // Keep the relative times fresh
        let sender_tick = sender.input_sender().clone();
        glib::timeout_add_seconds_local(60, move || {
            if sender_tick.send(SidebarMsg::RefreshTimes).is_ok() {
                glib::ControlFlow::Continue
            } else {
                glib::ControlFlow::Break
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            SidebarMsg::AddScheduledPost(post) => {
                self.scheduled.guard().push_back(post);
            }
            SidebarMsg::PlatformToggled(platform) => {
                let _ = sender.output(SidebarOutput::PlatformSelected(platform));
            }
            SidebarMsg::RefreshTimes => {
                let now = Local::now();
                let guard = self.scheduled.guard();
                for i in 0..guard.len() {
                    guard.send(i, ScheduledPostRowMsg::Tick(now));
                }
            }
            SidebarMsg::NewChat => {
                let _ = sender.output(SidebarOutput::NewChat);
            }
            SidebarMsg::Export => {
                let _ = sender.output(SidebarOutput::ExportScheduled);
            }
        }
    }
}

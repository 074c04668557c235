use adw::prelude::*;
use relm4::factory::FactoryVecDeque;
use relm4::prelude::*;

use crate::models::{Message, Platform};
use crate::ui::input_area::{InputArea, InputAreaMsg, InputAreaOutput};
use crate::ui::message_widget::{
    MessageWidget, MessageWidgetInit, MessageWidgetMsg, MessageWidgetOutput,
};

pub struct ChatViewInit {
    pub user_name: String,
    pub platform: Platform,
}

pub struct ChatView {
    messages: FactoryVecDeque<MessageWidget>,
    input_area: Controller<InputArea>,
    scrolled_window: gtk::ScrolledWindow,
    user_name: String,
    platform: Platform,
    loading: bool,
    user_scrolled_up: bool,
}

#[derive(Debug)]
pub enum ChatViewMsg {
    AddMessage(Message),
    Clear,
    SetLoading(bool),
    SetPlatform(Platform),
    MarkScheduled(String), // message_id
    ScrollToBottom,
    // Internal
    ScrollPositionChanged,
    UserSendMessage(String),
    ForwardSchedule(String),
    CopyToClipboard(String),
}

#[derive(Debug)]
pub enum ChatViewOutput {
    SendMessage(String),
    Schedule(String), // message_id
    Copied,
}

#[relm4::component(pub)]
impl Component for ChatView {
    type Init = ChatViewInit;
    type Input = ChatViewMsg;
    type Output = ChatViewOutput;
    type CommandOutput = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_vexpand: true,

            gtk::Stack {
                set_vexpand: true,
                set_transition_type: gtk::StackTransitionType::Crossfade,
                #[watch]
                set_visible_child_name: if model.messages.is_empty() { "empty" } else { "chat" },

                add_named[Some("empty")] = &adw::StatusPage {
                    set_icon_name: Some("chat-bubbles-empty-symbolic"),
                    set_title: "Start a conversation with Alira",
                    set_description: Some("Describe your property to generate premium content for your selected platform."),
                },

                add_named[Some("chat")] = &gtk::Overlay {
                    #[local_ref]
                    scrolled_window -> gtk::ScrolledWindow {
                        set_vexpand: true,
                        set_hscrollbar_policy: gtk::PolicyType::Never,

                        #[local_ref]
                        message_list -> gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_spacing: 0,
                            set_margin_top: 8,
                            set_margin_bottom: 8,
                            set_margin_start: 16,
                            set_margin_end: 16,
                        },
                    },

                    add_overlay = &gtk::Button {
                        set_icon_name: "go-down-symbolic",
                        set_tooltip_text: Some("Scroll to bottom"),
                        set_halign: gtk::Align::Center,
                        set_valign: gtk::Align::End,
                        set_margin_bottom: 8,
                        add_css_class: "circular",
                        add_css_class: "osd",
                        #[watch]
                        set_visible: model.user_scrolled_up,
                        connect_clicked => ChatViewMsg::ScrollToBottom,
                    },
                },
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_halign: gtk::Align::Start,
                set_margin_start: 20,
                set_margin_bottom: 8,
                set_spacing: 8,
                #[watch]
                set_visible: model.loading,

                gtk::Spinner {
                    #[watch]
                    set_spinning: model.loading,
                },
                gtk::Label {
                    set_label: "Alira is thinking...",
                    add_css_class: "dim-label",
                },
            },

            gtk::Separator {
                set_orientation: gtk::Orientation::Horizontal,
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_spacing: 6,
                set_margin_top: 6,
                set_margin_start: 16,
                add_css_class: "platform-indicator",

                gtk::Label {
                    set_label: "Creating content for:",
                    add_css_class: "dim-label",
                },
                gtk::Label {
                    #[watch]
                    set_label: model.platform.display_name(),
                    add_css_class: "heading",
                },
            },

            model.input_area.widget().clone(),
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let messages = FactoryVecDeque::builder()
            .launch(gtk::Box::default())
            .forward(sender.input_sender(), |output| match output {
                MessageWidgetOutput::Schedule(msg_id) => ChatViewMsg::ForwardSchedule(msg_id),
                MessageWidgetOutput::CopyFullContent(content) => {
                    ChatViewMsg::CopyToClipboard(content)
                }
            });

        let input_area = InputArea::builder()
            .launch(init.platform)
            .forward(sender.input_sender(), |output| match output {
                InputAreaOutput::SendMessage(text) => ChatViewMsg::UserSendMessage(text),
            });

        let scrolled_window = gtk::ScrolledWindow::new();

        let model = Self {
            messages,
            input_area,
            scrolled_window: scrolled_window.clone(),
            user_name: init.user_name,
            platform: init.platform,
            loading: false,
            user_scrolled_up: false,
        };

        let message_list = model.messages.widget();
        let widgets = view_output!();

        let sender_scroll = sender.input_sender().clone();
        scrolled_window
            .vadjustment()
            .connect_value_changed(move |_| {
                sender_scroll
                    .send(ChatViewMsg::ScrollPositionChanged)
                    .unwrap();
            });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            ChatViewMsg::AddMessage(message) => {
                self.messages.guard().push_back(MessageWidgetInit {
                    message,
                    user_name: self.user_name.clone(),
                });
                self.auto_scroll_to_bottom(&sender);
            }
            ChatViewMsg::Clear => {
                self.messages.guard().clear();
                self.user_scrolled_up = false;
            }
            ChatViewMsg::SetLoading(loading) => {
                self.loading = loading;
                self.input_area.emit(InputAreaMsg::SetSending(loading));
                if loading {
                    self.auto_scroll_to_bottom(&sender);
                }
            }
            ChatViewMsg::SetPlatform(platform) => {
                self.platform = platform;
                self.input_area.emit(InputAreaMsg::SetPlatform(platform));
            }
            ChatViewMsg::MarkScheduled(message_id) => {
                let guard = self.messages.guard();
                if let Some(idx) = guard.iter().position(|m| m.message.id == message_id) {
                    guard.send(idx, MessageWidgetMsg::MarkScheduled);
                };
            }
            ChatViewMsg::ScrollToBottom => {
                self.user_scrolled_up = false;
                let adj = self.scrolled_window.vadjustment();
                glib::idle_add_local_once(move || {
                    adj.set_value(adj.upper());
                });
            }
            ChatViewMsg::ScrollPositionChanged => {
                self.user_scrolled_up = !self.is_at_bottom();
            }
            ChatViewMsg::UserSendMessage(text) => {
                let _ = sender.output(ChatViewOutput::SendMessage(text));
            }
            ChatViewMsg::ForwardSchedule(msg_id) => {
                let _ = sender.output(ChatViewOutput::Schedule(msg_id));
            }
            ChatViewMsg::CopyToClipboard(content) => {
                if let Some(display) = gtk::gdk::Display::default() {
                    display.clipboard().set_text(&content);
                    let _ = sender.output(ChatViewOutput::Copied);
                }
            }
        }
    }
}

impl ChatView {
    fn is_at_bottom(&self) -> bool {
        let adj = self.scrolled_window.vadjustment();
        adj.value() >= adj.upper() - adj.page_size() - 50.0
    }

    fn auto_scroll_to_bottom(&mut self, sender: &ComponentSender<Self>) {
        self.user_scrolled_up = !self.is_at_bottom();
        if !self.user_scrolled_up {
            sender.input(ChatViewMsg::ScrollToBottom);
        }
    }
}

use gtk::prelude::*;
use relm4::prelude::*;

use crate::config;
use crate::models::{Message, Role};
use crate::services::markdown::{parse_post, spans_to_pango_markup, PostBlock};

const PICTURE_HEIGHT: i32 = 220;

pub struct MessageWidgetInit {
    pub message: Message,
    pub user_name: String,
}

pub struct MessageWidget {
    pub message: Message,
    user_name: String,
    scheduled: bool,
}

#[derive(Debug)]
pub enum MessageWidgetMsg {
    Schedule,
    MarkScheduled,
    RequestCopy,
}

#[derive(Debug)]
pub enum MessageWidgetOutput {
    Schedule(String),        // message_id
    CopyFullContent(String), // content
}

#[relm4::factory(pub)]
impl FactoryComponent for MessageWidget {
    type Init = MessageWidgetInit;
    type Input = MessageWidgetMsg;
    type Output = MessageWidgetOutput;
    type CommandOutput = ();
    type ParentWidget = gtk::Box;

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Horizontal,
            set_margin_top: 4,
            set_margin_bottom: 4,
            set_margin_start: 12,
            set_margin_end: 12,
            set_halign: if self.message.role == Role::User {
                gtk::Align::End
            } else {
                gtk::Align::Start
            },

            #[name = "bubble"]
            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 6,
                add_css_class: "card",

                // Author + timestamp
                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 8,
                    set_margin_start: 10,
                    set_margin_end: 10,
                    set_margin_top: 6,

                    gtk::Label {
                        set_label: self.author(),
                        set_halign: gtk::Align::Start,
                        set_hexpand: true,
                        add_css_class: "caption-heading",
                    },
                    gtk::Label {
                        set_label: &self.message.time_label(),
                        add_css_class: "caption",
                        add_css_class: "dim-label",
                        add_css_class: "message-timestamp",
                    },
                },

                #[name = "content_box"]
                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 6,
                    set_margin_start: 10,
                    set_margin_end: 10,
                    set_margin_bottom: 8,
                },

                #[name = "action_bar"]
                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 4,
                    set_halign: gtk::Align::End,
                    set_margin_end: 8,
                    set_margin_bottom: 6,
                    set_visible: self.message.role == Role::Assistant,

                    gtk::Button {
                        set_icon_name: "edit-copy-symbolic",
                        set_tooltip_text: Some("Copy post"),
                        add_css_class: "flat",
                        add_css_class: "circular",
                        connect_clicked => MessageWidgetMsg::RequestCopy,
                    },

                    gtk::Button {
                        #[watch]
                        set_label: if self.scheduled { "Scheduled" } else { "Schedule" },
                        #[watch]
                        set_sensitive: !self.scheduled,
                        set_visible: self.message.is_schedulable(),
                        set_tooltip_text: Some("Add to scheduled posts"),
                        add_css_class: "pill",
                        add_css_class: "schedule-button",
                        connect_clicked => MessageWidgetMsg::Schedule,
                    },
                },
            },
        }
    }

    fn init_model(init: Self::Init, _index: &DynamicIndex, _sender: FactorySender<Self>) -> Self {
        Self {
            message: init.message,
            user_name: init.user_name,
            scheduled: false,
        }
    }

    fn init_widgets(
        &mut self,
        _index: &DynamicIndex,
        root: Self::Root,
        _returned_widget: &<Self::ParentWidget as relm4::factory::FactoryView>::ReturnedWidget,
        sender: FactorySender<Self>,
    ) -> Self::Widgets {
        let widgets = view_output!();

        match self.message.role {
            Role::User => widgets.bubble.add_css_class("message-bubble-user"),
            Role::Assistant => widgets.bubble.add_css_class("message-bubble-assistant"),
        }
        widgets.bubble.add_css_class(self.message.platform.css_class());

        if let Some(kind) = self.message.failure {
            widgets.bubble.add_css_class("message-bubble-error");
            let title = gtk::Label::builder()
                .label(kind.title())
                .halign(gtk::Align::Start)
                .build();
            title.add_css_class("heading");
            title.add_css_class("error");
            widgets.content_box.append(&title);

            let detail = gtk::Label::builder()
                .label(&self.message.content)
                .halign(gtk::Align::Start)
                .wrap(true)
                .wrap_mode(gtk::pango::WrapMode::WordChar)
                .selectable(true)
                .build();
            detail.add_css_class("dim-label");
            widgets.content_box.append(&detail);
        } else if self.message.role == Role::User {
            let label = gtk::Label::builder()
                .label(&self.message.content)
                .halign(gtk::Align::Start)
                .wrap(true)
                .wrap_mode(gtk::pango::WrapMode::WordChar)
                .selectable(true)
                .build();
            widgets.content_box.append(&label);
        } else {
            if let Some(path) = &self.message.image_path {
                let picture = gtk::Picture::for_filename(path);
                picture.set_content_fit(gtk::ContentFit::Cover);
                picture.set_height_request(PICTURE_HEIGHT);
                picture.set_can_shrink(true);
                picture.add_css_class("post-picture");
                widgets.content_box.append(&picture);
            }
            render_post_blocks(&widgets.content_box, &self.message.content);
        }

        widgets
    }

    fn update(&mut self, msg: Self::Input, sender: FactorySender<Self>) {
        match msg {
            MessageWidgetMsg::Schedule => {
                let _ = sender.output(MessageWidgetOutput::Schedule(self.message.id.clone()));
            }
            MessageWidgetMsg::MarkScheduled => {
                self.scheduled = true;
            }
            MessageWidgetMsg::RequestCopy => {
                let _ = sender.output(MessageWidgetOutput::CopyFullContent(
                    self.message.content.clone(),
                ));
            }
        }
    }
}

impl MessageWidget {
    fn author(&self) -> &str {
        match self.message.role {
            Role::User => &self.user_name,
            Role::Assistant => config::APP_NAME,
        }
    }
}

fn render_post_blocks(content_box: &gtk::Box, text: &str) {
    for block in parse_post(text) {
        content_box.append(&block_to_widget(&block));
    }
}

fn markup_label(markup: &str) -> gtk::Label {
    let label = gtk::Label::builder()
        .halign(gtk::Align::Start)
        .wrap(true)
        .wrap_mode(gtk::pango::WrapMode::WordChar)
        .selectable(true)
        .use_markup(true)
        .build();
    label.set_markup(markup);
    label
}

fn block_to_widget(block: &PostBlock) -> gtk::Widget {
    match block {
        PostBlock::Paragraph(spans) => markup_label(&spans_to_pango_markup(spans)).upcast(),
        PostBlock::Heading { level, spans } => {
            let label = markup_label(&spans_to_pango_markup(spans));
            label.add_css_class(if *level <= 2 { "title-4" } else { "heading" });
            label.upcast()
        }
        PostBlock::List { ordered, items } => {
            let list_box = gtk::Box::builder()
                .orientation(gtk::Orientation::Vertical)
                .spacing(2)
                .margin_start(4)
                .build();

            for (i, spans) in items.iter().enumerate() {
                let bullet = if *ordered {
                    format!("{}.", i + 1)
                } else {
                    "\u{2022}".to_string()
                };
                let row = gtk::Box::builder()
                    .orientation(gtk::Orientation::Horizontal)
                    .spacing(4)
                    .build();
                let bullet_label = gtk::Label::builder()
                    .label(&bullet)
                    .valign(gtk::Align::Start)
                    .build();
                row.append(&bullet_label);
                row.append(&markup_label(&spans_to_pango_markup(spans)));
                list_box.append(&row);
            }
            list_box.upcast()
        }
    }
}

use adw::prelude::*;
use chrono::Local;
use relm4::prelude::*;

use crate::config::{self, AppConfig};
use crate::models::Platform;
use crate::services::export::{export_conversation, export_scheduled_posts};
use crate::services::session::{fetch_reply, PendingTurn, SessionState, TurnReply};
use crate::services::{AssetPicker, CompletionClient, Session};
use crate::ui::chat_view::{ChatView, ChatViewInit, ChatViewMsg, ChatViewOutput};
use crate::ui::sidebar::{Sidebar, SidebarInit, SidebarMsg, SidebarOutput};

pub struct AppInit {
    pub config: AppConfig,
    pub client: CompletionClient,
}

pub struct App {
    session: Session,
    client: CompletionClient,
    picker: AssetPicker,
    sidebar: Controller<Sidebar>,
    chat_view: Controller<ChatView>,
    toast_overlay: adw::ToastOverlay,
    window_title: adw::WindowTitle,
}

#[derive(Debug)]
pub enum AppMsg {
    NewChat,
    SendMessage(String),
    Schedule(String), // message_id
    PlatformSelected(Platform),
    ExportScheduled,
    ExportConversation,
    ShowToast(String),
    ShowAbout,
    ShowShortcuts,
}

#[derive(Debug)]
pub enum AppCmd {
    ReplyReady {
        pending: PendingTurn,
        reply: TurnReply,
    },
}

#[relm4::component(pub, async)]
impl AsyncComponent for App {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();
    type CommandOutput = AppCmd;

    view! {
        adw::ApplicationWindow {
            set_title: Some(config::APP_NAME),
            set_default_width: 1200,
            set_default_height: 800,
            set_width_request: 620,
            set_height_request: 500,

            #[local_ref]
            toast_overlay -> adw::ToastOverlay {},
        }
    }

    async fn init(
        init: Self::Init,
        root: Self::Root,
        sender: AsyncComponentSender<Self>,
    ) -> AsyncComponentParts<Self> {
        let AppInit { config, client } = init;
        let session = Session::with_platform(config.platform);
        let picker = AssetPicker::new(config.images_dir.clone());

        tracing::info!(
            "Starting {} {} (model {}, images in {})",
            config::APP_NAME,
            config::VERSION,
            client.model(),
            picker.dir().display()
        );

        let sidebar = Sidebar::builder()
            .launch(SidebarInit {
                user_name: config.user_name.clone(),
                user_role: config.user_role.clone(),
                user_initials: config.user_initials(),
                platform: session.platform(),
            })
            .forward(sender.input_sender(), |output| match output {
                SidebarOutput::PlatformSelected(platform) => AppMsg::PlatformSelected(platform),
                SidebarOutput::NewChat => AppMsg::NewChat,
                SidebarOutput::ExportScheduled => AppMsg::ExportScheduled,
            });

        let chat_view = ChatView::builder()
            .launch(ChatViewInit {
                user_name: config.user_name.clone(),
                platform: session.platform(),
            })
            .forward(sender.input_sender(), |output| match output {
                ChatViewOutput::SendMessage(text) => AppMsg::SendMessage(text),
                ChatViewOutput::Schedule(msg_id) => AppMsg::Schedule(msg_id),
                ChatViewOutput::Copied => AppMsg::ShowToast("Copied to clipboard".to_string()),
            });

        let toast_overlay = adw::ToastOverlay::new();
        toast_overlay.set_hexpand(true);
        toast_overlay.set_vexpand(true);

        // Content side
        let window_title = adw::WindowTitle::new("New Chat", "");
        let content_header = adw::HeaderBar::new();
        content_header.set_show_start_title_buttons(false);
        content_header.set_title_widget(Some(&window_title));

        let menu = gio::Menu::new();
        menu.append(Some("Export Conversation"), Some("app.export-conversation"));
        menu.append(Some("Keyboard Shortcuts"), Some("app.show-shortcuts"));
        menu.append(Some("About Alira"), Some("app.about"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu)
            .build();
        content_header.pack_end(&menu_button);

        let content_toolbar = adw::ToolbarView::new();
        content_toolbar.add_top_bar(&content_header);
        content_toolbar.set_content(Some(chat_view.widget()));

        let content_page = adw::NavigationPage::builder()
            .title("Chat")
            .tag("content")
            .child(&content_toolbar)
            .build();

        let sidebar_page = adw::NavigationPage::builder()
            .title(config::APP_NAME)
            .tag("sidebar")
            .child(sidebar.widget())
            .build();

        let split_view = adw::NavigationSplitView::new();
        split_view.set_hexpand(true);
        split_view.set_vexpand(true);
        split_view.set_min_sidebar_width(260.0);
        split_view.set_max_sidebar_width(340.0);
        split_view.set_sidebar(Some(&sidebar_page));
        split_view.set_content(Some(&content_page));

        // Collapse the sidebar on narrow windows
        if let Ok(condition) = adw::BreakpointCondition::parse("max-width: 700px") {
            let breakpoint = adw::Breakpoint::new(condition);
            breakpoint.add_setter(&split_view, "collapsed", Some(&true.to_value()));
            breakpoint.add_setter(
                &content_header,
                "show-start-title-buttons",
                Some(&true.to_value()),
            );
            root.add_breakpoint(breakpoint);
        }

        toast_overlay.set_child(Some(&split_view));

        let model = App {
            session,
            client,
            picker,
            sidebar,
            chat_view,
            toast_overlay: toast_overlay.clone(),
            window_title,
        };

        let widgets = view_output!();

        // App actions and keyboard shortcuts
        let app = relm4::main_adw_application();
        let actions: [(&str, Option<&str>, fn() -> AppMsg); 5] = [
            ("new-chat", Some("<Control>n"), || AppMsg::NewChat),
            ("export", Some("<Control>e"), || AppMsg::ExportScheduled),
            ("export-conversation", None, || AppMsg::ExportConversation),
            ("show-shortcuts", Some("<Control>slash"), || AppMsg::ShowShortcuts),
            ("about", None, || AppMsg::ShowAbout),
        ];
        for (name, accel, make_msg) in actions {
            let action = gio::SimpleAction::new(name, None);
            let sender_action = sender.input_sender().clone();
            action.connect_activate(move |_, _| {
                sender_action.send(make_msg()).unwrap();
            });
            app.add_action(&action);
            if let Some(accel) = accel {
                app.set_accels_for_action(&format!("app.{}", name), &[accel]);
            }
        }

        let quit_action = gio::SimpleAction::new("quit", None);
        let app_quit = app.clone();
        quit_action.connect_activate(move |_, _| {
            app_quit.quit();
        });
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<Control>q"]);

        AsyncComponentParts { model, widgets }
    }

    async fn update(
        &mut self,
        msg: Self::Input,
        sender: AsyncComponentSender<Self>,
        root: &Self::Root,
    ) {
        match msg {
            AppMsg::NewChat => {
                self.session.reset();
                self.chat_view.emit(ChatViewMsg::Clear);
                self.chat_view.emit(ChatViewMsg::SetLoading(false));
                self.refresh_title();
            }
            AppMsg::SendMessage(text) => {
                self.handle_send_message(text, sender);
            }
            AppMsg::Schedule(msg_id) => match self.session.schedule(&msg_id) {
                Ok(post) => {
                    let post = post.clone();
                    self.show_toast(&format!(
                        "Content added to scheduled posts for {}",
                        post.platform.display_name()
                    ));
                    self.sidebar.emit(SidebarMsg::AddScheduledPost(post));
                    self.chat_view.emit(ChatViewMsg::MarkScheduled(msg_id));
                }
                Err(e) => self.show_toast(&e.to_string()),
            },
            AppMsg::PlatformSelected(platform) => {
                self.session.set_platform(platform);
                self.chat_view.emit(ChatViewMsg::SetPlatform(platform));
            }
            AppMsg::ExportScheduled => {
                let posts = self.session.scheduled_posts();
                if posts.is_empty() {
                    self.show_toast("No scheduled posts to export");
                    return;
                }
                let now = Local::now();
                let markdown = export_scheduled_posts(posts, now);
                let filename = format!("scheduled-posts-{}.md", now.format("%Y%m%d-%H%M"));
                self.save_markdown(root, "Export Scheduled Posts", &filename, markdown);
            }
            AppMsg::ExportConversation => {
                if self.session.messages().is_empty() {
                    self.show_toast("Nothing to export yet");
                    return;
                }
                let markdown = export_conversation(self.session.conversation());
                let title = self
                    .session
                    .title()
                    .unwrap_or_else(|| "conversation".to_string());
                let filename = format!("{}.md", title.replace(['/', '\\'], "_"));
                self.save_markdown(root, "Export Conversation", &filename, markdown);
            }
            AppMsg::ShowToast(message) => {
                self.show_toast(&message);
            }
            AppMsg::ShowAbout => {
                crate::ui::window::create_about_dialog(root, self.client.model());
            }
            AppMsg::ShowShortcuts => {
                crate::ui::window::create_shortcuts_window(root);
            }
        }
    }

    async fn update_cmd(
        &mut self,
        msg: Self::CommandOutput,
        _sender: AsyncComponentSender<Self>,
        _root: &Self::Root,
    ) {
        match msg {
            AppCmd::ReplyReady { pending, reply } => {
                let Some(message) = self
                    .session
                    .finish_turn(&pending, reply.completion, reply.image)
                    .cloned()
                else {
                    return;
                };

                tracing::info!(
                    "Turn finished for {} ({})",
                    message.platform.display_name(),
                    if message.is_failure() { "failed" } else { "ok" }
                );
                self.chat_view.emit(ChatViewMsg::AddMessage(message));
                self.chat_view.emit(ChatViewMsg::SetLoading(false));
                self.refresh_title();

                if let Some(warning) = reply.warning {
                    self.show_toast(&warning);
                }
            }
        }
    }
}

impl App {
    fn show_toast(&self, message: &str) {
        let toast = adw::Toast::new(message);
        toast.set_timeout(3);
        self.toast_overlay.add_toast(toast);
    }

    fn refresh_title(&self) {
        self.window_title
            .set_title(&self.session.title().unwrap_or_else(|| "New Chat".to_string()));

        let subtitle = match self.session.state() {
            SessionState::Empty => String::new(),
            SessionState::AwaitingResponse => "Writing post...".to_string(),
            SessionState::IdleWithHistory => {
                format!("{} messages", self.session.conversation().len())
            }
        };
        self.window_title.set_subtitle(&subtitle);
    }

    fn handle_send_message(&mut self, text: String, sender: AsyncComponentSender<Self>) {
        let pending = match self.session.begin_turn(&text) {
            Ok(pending) => pending,
            Err(e) => {
                self.show_toast(&e.to_string());
                return;
            }
        };

        self.chat_view
            .emit(ChatViewMsg::AddMessage(pending.user_message.clone()));
        self.chat_view.emit(ChatViewMsg::SetLoading(true));
        self.refresh_title();

        let client = self.client.clone();
        let picker = self.picker.clone();
        sender.command(move |out, _| {
            Box::pin(async move {
                let reply = fetch_reply(&client, &picker, pending.prompt.clone()).await;
                out.send(AppCmd::ReplyReady { pending, reply }).unwrap();
            })
        });
    }

    fn save_markdown(
        &self,
        root: &adw::ApplicationWindow,
        title: &str,
        filename: &str,
        markdown: String,
    ) {
        let dialog = gtk::FileDialog::builder()
            .title(title)
            .initial_name(filename)
            .build();

        let toast_overlay = self.toast_overlay.clone();
        dialog.save(Some(root), None::<&gio::Cancellable>, move |result| {
            // Err means the user cancelled
            let Ok(file) = result else {
                return;
            };
            let Some(path) = file.path() else {
                return;
            };
            let text = match std::fs::write(&path, &markdown) {
                Ok(()) => {
                    tracing::info!("Exported to {}", path.display());
                    format!("Exported to {}", path.display())
                }
                Err(e) => {
                    tracing::warn!("Export to {} failed: {}", path.display(), e);
                    format!("Export failed: {}", e)
                }
            };
            let toast = adw::Toast::new(&text);
            toast.set_timeout(3);
            toast_overlay.add_toast(toast);
        });
    }
}

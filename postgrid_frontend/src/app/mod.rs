use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Context, TextureHandle};
use log::{error, info};

use crate::api::{ApiClient, ClientError, DEFAULT_STORE_URL};
use crate::config::FrontendConfig;
use crate::controller::{Command, Interaction, PostsController};

mod messages;
mod state;
mod tasks;
mod ui;

use messages::AppMessage;
use state::{LoadedImage, UsersState};

// Cap on parallel image fetches so a full grid doesn't flood the network.
const MAX_CONCURRENT_DOWNLOADS: usize = 4;

pub struct PostGridApp {
    api: ApiClient,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    posts: PostsController,
    users: UsersState,
    search_input: String,
    base_url_input: String,
    info_banner: Option<String>,
    image_textures: HashMap<String, TextureHandle>,
    image_loading: HashSet<String>,
    image_pending: HashMap<String, LoadedImage>,
    image_errors: HashMap<String, String>,
    download_queue: VecDeque<String>,
    active_downloads: usize,
}

impl PostGridApp {
    /// Builds the app and starts the initial loads. A configured URL that
    /// does not parse falls back to the default store.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: FrontendConfig,
    ) -> Result<Self, ClientError> {
        let timeout = config.request_timeout();
        let (api, info_banner) = match ApiClient::with_timeout(config.store_url.clone(), timeout) {
            Ok(api) => (api, None),
            Err(err @ ClientError::InvalidBaseUrl { .. }) => {
                error!("failed to initialise store client: {err}");
                let fallback = ApiClient::with_timeout(DEFAULT_STORE_URL, timeout)?;
                (fallback, Some(format!("{err}; using the default store")))
            }
            Err(err) => return Err(err),
        };
        let (tx, rx) = mpsc::channel();
        let base_url_input = api.base_url().to_string();

        let mut app = Self {
            api,
            tx,
            rx,
            posts: PostsController::new(),
            users: UsersState::default(),
            search_input: String::new(),
            base_url_input,
            info_banner,
            image_textures: HashMap::new(),
            image_loading: HashSet::new(),
            image_pending: HashMap::new(),
            image_errors: HashMap::new(),
            download_queue: VecDeque::new(),
            active_downloads: 0,
        };
        let load = app.posts.begin_load();
        app.run_command(load);
        app.spawn_load_users();
        Ok(app)
    }

    /// Feeds an interaction to the controller and runs whatever it asks for.
    fn interact(&mut self, interaction: Interaction) {
        if let Some(command) = self.posts.interact(interaction) {
            self.run_command(command);
        }
    }

    fn run_command(&mut self, command: Command) {
        let (client, tx) = (self.api.clone(), self.tx.clone());
        match command.mutation() {
            None => tasks::load_posts(client, tx),
            Some(mutation) => tasks::mutate_post(client, tx, mutation, command),
        }
    }

    fn spawn_load_users(&mut self) {
        if self.users.loading {
            return;
        }
        self.users.loading = true;
        self.users.error = None;
        tasks::load_users(self.api.clone(), self.tx.clone());
    }

    fn apply_base_url(&mut self) {
        match self.api.set_base_url(self.base_url_input.clone()) {
            Ok(()) => {
                info!("store URL changed to {}", self.api.base_url());
                self.info_banner = Some("Store URL updated".into());
                self.image_errors.clear();
                self.interact(Interaction::Refresh);
                self.spawn_load_users();
            }
            Err(err) => {
                self.info_banner = Some(format!("Failed to update URL: {err}"));
            }
        }
    }

    fn process_messages(&mut self) {
        messages::process_messages(self);
    }

    fn spawn_download_image(&mut self, url: &str) {
        self.image_loading.insert(url.to_string());
        self.download_queue.push_back(url.to_string());
        self.process_download_queue();
    }

    fn process_download_queue(&mut self) {
        while self.active_downloads < MAX_CONCURRENT_DOWNLOADS {
            let Some(url) = self.download_queue.pop_front() else {
                break;
            };
            self.active_downloads += 1;
            tasks::download_image(self.api.clone(), self.tx.clone(), url);
        }
    }

    fn on_download_complete(&mut self) {
        self.active_downloads = self.active_downloads.saturating_sub(1);
        self.process_download_queue();
    }
}

impl eframe::App for PostGridApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_messages();

        egui::TopBottomPanel::top("top_controls").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        if self.users.open {
            egui::SidePanel::right("users_panel")
                .default_width(240.0)
                .show(ctx, |ui| {
                    self.render_users(ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_posts_grid(ui);
        });

        self.render_post_dialog(ctx);

        // Background threads report over the channel; keep polling while
        // anything is outstanding.
        if self.posts.is_loading()
            || self.posts.is_submitting()
            || self.users.loading
            || self.active_downloads > 0
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

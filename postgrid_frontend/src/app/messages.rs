use log::{error, info, warn};

use crate::api::{ClientError, ServerResult};
use crate::controller::Mutation;
use crate::models::{Post, User};

use super::state::LoadedImage;
use super::PostGridApp;

pub enum AppMessage {
    PostsLoaded(Result<Vec<Post>, ClientError>),
    UsersLoaded(Result<Vec<User>, ClientError>),
    PostMutated {
        mutation: Mutation,
        result: Result<ServerResult, ClientError>,
    },
    ImageLoaded {
        url: String,
        result: Result<LoadedImage, String>,
    },
}

pub fn process_messages(app: &mut PostGridApp) {
    while let Ok(message) = app.rx.try_recv() {
        match message {
            AppMessage::PostsLoaded(result) => {
                // A fresh list is shown unfiltered.
                if result.is_ok() {
                    app.search_input.clear();
                }
                app.posts.on_loaded(result);
            }
            AppMessage::UsersLoaded(result) => {
                let state = &mut app.users;
                state.loading = false;
                match result {
                    Ok(users) => {
                        info!("loaded {} users", users.len());
                        state.users = users;
                        state.error = None;
                    }
                    Err(err) => {
                        error!("failed to load users: {err}");
                        state.error = Some(format!("Failed to load users: {err}"));
                    }
                }
            }
            AppMessage::PostMutated { mutation, result } => {
                if let Ok(outcome) = &result {
                    if let Some(key) = outcome.assigned_key() {
                        app.info_banner = Some(format!("Created post {key}"));
                    }
                    if !outcome.is_ok() {
                        warn!("store rejected {mutation:?} with status {}", outcome.status());
                    }
                }
                if let Some(command) = app.posts.on_mutation(mutation, result) {
                    app.run_command(command);
                }
            }
            AppMessage::ImageLoaded { url, result } => {
                app.image_loading.remove(&url);
                match result {
                    Ok(image) => {
                        app.image_pending.insert(url, image);
                    }
                    Err(err) => {
                        error!("failed to load image {url}: {err}");
                        app.image_errors.insert(url, err);
                    }
                }
                app.on_download_complete();
            }
        }
    }
}

use std::sync::mpsc::Sender;
use std::thread;

use log::{error, info};

use crate::api::{ApiClient, ClientError, ServerResult};
use crate::controller::{Command, Mutation};
use crate::models::{POSTS, USERS};

use super::messages::AppMessage;
use super::state::LoadedImage;

pub fn load_posts(client: ApiClient, tx: Sender<AppMessage>) {
    thread::spawn(move || {
        let result = client.fetch_all(POSTS);
        if tx.send(AppMessage::PostsLoaded(result)).is_err() {
            error!("failed to send PostsLoaded message");
        }
    });
}

pub fn load_users(client: ApiClient, tx: Sender<AppMessage>) {
    thread::spawn(move || {
        let result = client.fetch_all(USERS);
        if tx.send(AppMessage::UsersLoaded(result)).is_err() {
            error!("failed to send UsersLoaded message");
        }
    });
}

/// Sends a create, update or delete to the store. The reply is tagged with
/// `mutation` so the controller can match it to the dialog that asked.
pub fn mutate_post(client: ApiClient, tx: Sender<AppMessage>, mutation: Mutation, command: Command) {
    thread::spawn(move || {
        let result = match command {
            Command::Create(input) => client.create(POSTS, &input),
            Command::Update { id, input } => client.update(POSTS, &id, &input),
            Command::Remove { id } => client.remove(POSTS, &id),
            Command::FetchAll => {
                error!("refusing to send a fetch as a mutation");
                return;
            }
        };
        send_mutation(&tx, mutation, result);
    });
}

fn send_mutation(
    tx: &Sender<AppMessage>,
    mutation: Mutation,
    result: Result<ServerResult, ClientError>,
) {
    if tx.send(AppMessage::PostMutated { mutation, result }).is_err() {
        error!("failed to send PostMutated message");
    }
}

pub fn download_image(client: ApiClient, tx: Sender<AppMessage>, url: String) {
    thread::spawn(move || {
        info!("downloading image from {url}");
        let result = client
            .fetch_bytes(&url)
            .map_err(|err| format!("Download error: {err}"))
            .and_then(|bytes| {
                LoadedImage::decode(&bytes).map_err(|err| format!("Image decode error: {err}"))
            });
        if tx.send(AppMessage::ImageLoaded { url, result }).is_err() {
            error!("failed to send ImageLoaded message");
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn mutation_reply_is_tagged_with_the_command_id() {
        // Nothing listens on the discard port, so the request fails fast.
        let client = ApiClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let (tx, rx) = mpsc::channel();
        let command = Command::Remove { id: "-Nabc".into() };
        let mutation = command.mutation().unwrap();
        mutate_post(client, tx, mutation, command);

        let Ok(AppMessage::PostMutated { mutation, result }) = rx.recv_timeout(Duration::from_secs(10))
        else {
            panic!("expected a mutation reply");
        };
        assert_eq!(mutation, Mutation::Delete { id: "-Nabc".into() });
        assert!(result.is_err());
    }

    #[test]
    fn fetch_is_never_sent_as_a_mutation() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let (tx, rx) = mpsc::channel();
        mutate_post(client, tx, Mutation::Create, Command::FetchAll);
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());
    }
}

use rand::Rng;
use serde_json::json;

use crate::document::{DocumentError, DocumentStore};

pub const POSTS: &str = "posts";
pub const USERS: &str = "users";

const SAMPLE_BODY: &str = "Quo deleniti praesentium dicta non quod aut est molestias molestias et officia quis nihil itaque dolorem quia";
const SAMPLE_POST_IMAGE: &str = "https://plus.unsplash.com/premium_photo-1675330628475-b4e0e2a3c4a7?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=60";
const SAMPLE_USER_IMAGE: &str = "https://images.unsplash.com/photo-1465779171454-aa85ccf23be6?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=60";

const SAMPLE_USERS: &[(&str, &str)] = &[
    ("Birgitte Kirk Iversen", "Senior Lecturer"),
    ("Martin Aagaard Nøhr", "Lecturer"),
    ("Rasmus Cederdorff", "Senior Lecturer"),
    ("Anne Kirketerp", "Head of Education"),
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub posts: Vec<String>,
    pub users: Vec<String>,
}

/// Inserts `posts` sample posts and up to `users` sample users, returning the
/// keys the store assigned.
pub fn seed(store: &DocumentStore, posts: usize, users: usize) -> Result<SeedSummary, DocumentError> {
    let mut rng = rand::rng();
    let mut summary = SeedSummary::default();

    for _ in 0..posts {
        let number: u32 = rng.random_range(1..=100);
        let key = store.push(
            POSTS,
            json!({
                "title": format!("My Post Title Number {number}"),
                "body": SAMPLE_BODY,
                "image": SAMPLE_POST_IMAGE,
            }),
        )?;
        summary.posts.push(key);
    }

    for (name, title) in SAMPLE_USERS.iter().take(users) {
        let key = store.push(
            USERS,
            json!({
                "name": name,
                "title": title,
                "image": SAMPLE_USER_IMAGE,
            }),
        )?;
        summary.users.push(key);
    }

    tracing::info!(
        posts = summary.posts.len(),
        users = summary.users.len(),
        "sample records seeded"
    );
    Ok(summary)
}

//! Keeps the rendered post list in step with the store.
//!
//! `PostsController` performs no I/O. User interactions go in through
//! [`PostsController::interact`], which answers with the [`Command`] the caller
//! must run against the store; results come back through
//! [`PostsController::on_loaded`] and [`PostsController::on_mutation`]. Every
//! successful mutation asks for a full refetch, and every refetch replaces the
//! held list wholesale.

use log::{info, warn};

use crate::api::{ClientError, ServerResult};
use crate::compare::{search_posts, sort_posts, SortKey};
use crate::models::{Post, PostForm, PostInput};

/// What the grid is showing. A search narrows a sorted list without losing
/// the sort, so `Filtered` takes precedence over `Sorted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Empty,
    Loaded,
    Sorted(SortKey),
    Filtered(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    Closed,
    Create {
        form: PostForm,
    },
    /// `id` is captured when the dialog opens and is the only link between
    /// the submitted form and the record it replaces.
    Update {
        id: String,
        form: PostForm,
    },
    Delete {
        id: String,
        title: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    OpenCreate,
    OpenUpdate { id: String },
    OpenDelete { id: String },
    CancelDialog,
    SubmitCreate,
    SubmitUpdate,
    ConfirmDelete,
    SortBy(SortKey),
    Search(String),
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchAll,
    Create(PostInput),
    Update { id: String, input: PostInput },
    Remove { id: String },
}

impl Command {
    pub fn mutation(&self) -> Option<Mutation> {
        match self {
            Command::FetchAll => None,
            Command::Create(_) => Some(Mutation::Create),
            Command::Update { id, .. } => Some(Mutation::Update { id: id.clone() }),
            Command::Remove { id } => Some(Mutation::Delete { id: id.clone() }),
        }
    }
}

/// Which mutation a store result answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update { id: String },
    Delete { id: String },
}

impl Mutation {
    fn describe(&self) -> String {
        match self {
            Mutation::Create => "Creating the post".to_string(),
            Mutation::Update { id } => format!("Updating post {id}"),
            Mutation::Delete { id } => format!("Deleting post {id}"),
        }
    }
}

#[derive(Debug)]
pub struct PostsController {
    posts: Vec<Post>,
    visible: Vec<Post>,
    loaded: bool,
    sort: Option<SortKey>,
    query: String,
    pending_loads: usize,
    dialog: Dialog,
    submitting: bool,
    dialog_error: Option<String>,
    last_error: Option<String>,
}

impl Default for PostsController {
    fn default() -> Self {
        Self::new()
    }
}

impl PostsController {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            visible: Vec::new(),
            loaded: false,
            sort: None,
            query: String::new(),
            pending_loads: 0,
            dialog: Dialog::Closed,
            submitting: false,
            dialog_error: None,
            last_error: None,
        }
    }

    /// The held list, in its current (possibly sorted) order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// What the view should render right now.
    pub fn visible(&self) -> &[Post] {
        &self.visible
    }

    pub fn view(&self) -> ListView {
        if !self.loaded {
            ListView::Empty
        } else if !self.query.is_empty() {
            ListView::Filtered(self.query.clone())
        } else if let Some(key) = self.sort {
            ListView::Sorted(key)
        } else {
            ListView::Loaded
        }
    }

    /// The key the held list was last sorted by, if any.
    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort
    }

    /// The active title search; empty when nothing is filtered.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Form of the open create or update dialog, for editing in place.
    pub fn form_mut(&mut self) -> Option<&mut PostForm> {
        match &mut self.dialog {
            Dialog::Create { form } | Dialog::Update { form, .. } => Some(form),
            Dialog::Closed | Dialog::Delete { .. } => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending_loads > 0
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn dialog_error(&self) -> Option<&str> {
        self.dialog_error.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Resolves a rendered row's id back to its record.
    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Starts a full refetch. Loads are never coalesced; whichever resolves
    /// last decides what is shown.
    pub fn begin_load(&mut self) -> Command {
        self.pending_loads += 1;
        Command::FetchAll
    }

    pub fn on_loaded(&mut self, result: Result<Vec<Post>, ClientError>) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
        match result {
            Ok(posts) => {
                info!("loaded {} posts", posts.len());
                self.posts = posts;
                self.loaded = true;
                self.sort = None;
                self.query.clear();
                self.refresh_visible();
            }
            Err(err) => {
                warn!("failed to load posts: {err}");
                self.last_error = Some(format!("Failed to load posts: {err}"));
            }
        }
    }

    pub fn interact(&mut self, interaction: Interaction) -> Option<Command> {
        match interaction {
            Interaction::OpenCreate => {
                if !matches!(self.dialog, Dialog::Create { .. }) {
                    self.open(Dialog::Create {
                        form: PostForm::default(),
                    });
                }
                None
            }
            Interaction::OpenUpdate { id } => {
                match self.post(&id) {
                    Some(post) => {
                        let form = PostForm::from_post(post);
                        self.open(Dialog::Update { id, form });
                    }
                    None => self.report_missing(&id),
                }
                None
            }
            Interaction::OpenDelete { id } => {
                match self.post(&id) {
                    Some(post) => {
                        let title = post.title.clone();
                        self.open(Dialog::Delete { id, title });
                    }
                    None => self.report_missing(&id),
                }
                None
            }
            Interaction::CancelDialog => {
                self.close();
                None
            }
            Interaction::SubmitCreate => {
                let Dialog::Create { form } = &self.dialog else {
                    return None;
                };
                let result = form.to_input();
                let input = self.validated(result)?;
                self.submit(Command::Create(input))
            }
            Interaction::SubmitUpdate => {
                let Dialog::Update { id, form } = &self.dialog else {
                    return None;
                };
                let (id, result) = (id.clone(), form.to_input());
                let input = self.validated(result)?;
                self.submit(Command::Update { id, input })
            }
            Interaction::ConfirmDelete => {
                let Dialog::Delete { id, .. } = &self.dialog else {
                    return None;
                };
                let id = id.clone();
                self.submit(Command::Remove { id })
            }
            Interaction::SortBy(key) => {
                sort_posts(&mut self.posts, key);
                self.sort = Some(key);
                self.refresh_visible();
                None
            }
            Interaction::Search(query) => {
                self.query = query;
                self.refresh_visible();
                None
            }
            Interaction::Refresh => Some(self.begin_load()),
        }
    }

    /// Applies the store's answer to a mutation. On success the dialog that
    /// issued it closes and a refetch is requested; on failure nothing but
    /// the error lines change.
    pub fn on_mutation(
        &mut self,
        mutation: Mutation,
        result: Result<ServerResult, ClientError>,
    ) -> Option<Command> {
        self.submitting = false;
        let reason = match result {
            Ok(outcome) if outcome.is_ok() => {
                info!("{} succeeded", mutation.describe());
                if self.dialog_matches(&mutation) {
                    self.close();
                }
                return Some(self.begin_load());
            }
            Ok(outcome) => outcome
                .failure_reason()
                .unwrap_or("request rejected")
                .to_string(),
            Err(err) => err.to_string(),
        };
        warn!("{} failed: {reason}", mutation.describe());
        if self.dialog_matches(&mutation) {
            self.dialog_error = Some(reason.clone());
        }
        self.last_error = Some(format!("{} failed: {reason}", mutation.describe()));
        None
    }

    fn refresh_visible(&mut self) {
        self.visible = search_posts(&self.posts, &self.query);
    }

    fn open(&mut self, dialog: Dialog) {
        self.dialog = dialog;
        self.dialog_error = None;
    }

    fn close(&mut self) {
        self.dialog = Dialog::Closed;
        self.dialog_error = None;
    }

    fn submit(&mut self, command: Command) -> Option<Command> {
        if self.submitting {
            return None;
        }
        self.submitting = true;
        self.dialog_error = None;
        Some(command)
    }

    fn validated<T, E: std::fmt::Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.dialog_error = Some(err.to_string());
                None
            }
        }
    }

    fn report_missing(&mut self, id: &str) {
        warn!("post {id} is not in the current list");
        self.last_error = Some(format!("Post {id} is no longer listed; refresh and try again"));
    }

    fn dialog_matches(&self, mutation: &Mutation) -> bool {
        match (mutation, &self.dialog) {
            (Mutation::Create, Dialog::Create { .. }) => true,
            (Mutation::Update { id }, Dialog::Update { id: open, .. }) => id == open,
            (Mutation::Delete { id }, Dialog::Delete { id: open, .. }) => id == open,
            _ => false,
        }
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const POSTS: &str = "posts";
pub const USERS: &str = "users";

/// A post as rendered. `id` is the store key and is only ever filled in by
/// normalization; it is never serialized back to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Post {
    #[serde(default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct User {
    #[serde(default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
}

/// The body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PostInput {
    pub title: String,
    pub body: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Title cannot be empty")]
    MissingTitle,
}

/// Editable contents of the create and update dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostForm {
    pub title: String,
    pub body: String,
    pub image: String,
}

impl PostForm {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            body: post.body.clone(),
            image: post.image.clone(),
        }
    }

    pub fn to_input(&self) -> Result<PostInput, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }
        Ok(PostInput {
            title: title.to_string(),
            body: self.body.trim().to_string(),
            image: self.image.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn post_id_is_never_serialized() {
        let post = Post {
            id: "-Nabc".into(),
            title: "t".into(),
            body: "b".into(),
            image: "i".into(),
        };
        let value = serde_json::to_value(&post).expect("serialize");
        assert!(value.get("id").is_none());
        assert_eq!(value["title"], "t");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let user: User = serde_json::from_str(r#"{"name":"Ada"}"#).expect("user");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.title, "");
        assert_eq!(user.id, "");
    }

    #[test]
    fn form_requires_a_title_and_trims_fields() {
        let mut form = PostForm {
            title: "   ".into(),
            body: "body".into(),
            image: String::new(),
        };
        assert_eq!(form.to_input(), Err(FormError::MissingTitle));

        form.title = "  Hello ".into();
        form.image = " https://example.com/a.png ".into();
        assert_eq!(
            form.to_input().expect("valid form"),
            PostInput {
                title: "Hello".into(),
                body: "body".into(),
                image: "https://example.com/a.png".into(),
            }
        );
    }
}

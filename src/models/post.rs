use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{parse_timestamp, Id, Snapshot, User};
use crate::error::ClientError;

pub type Post = Snapshot<PostData>;
pub type Comment = Snapshot<CommentData>;
pub type Answer = Snapshot<AnswerData>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub id: Id,
    pub title: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub post_type: PostType,
    pub author: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostType {
    #[default]
    General,
    Question,
    Notice,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::General => "GENERAL",
            PostType::Question => "QUESTION",
            PostType::Notice => "NOTICE",
        }
    }
}

impl FromStr for PostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GENERAL" => Ok(PostType::General),
            "QUESTION" => Ok(PostType::Question),
            "NOTICE" => Ok(PostType::Notice),
            other => Err(format!("unknown post type '{}' (expected GENERAL, QUESTION or NOTICE)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentData {
    pub id: Id,
    pub content: String,
    pub author: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Reply to a question post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerData {
    pub id: Id,
    pub content: String,
    pub author: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PostData {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    pub fn is_question(&self) -> bool {
        self.post_type == PostType::Question
    }

    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author.id.matches(&user.id)
    }

    pub fn comment(&self, comment_id: &Id) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id.matches(comment_id))
    }
}

impl CommentData {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author.id.matches(&user.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub post_type: PostType,
}

impl PostInput {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.title.trim().is_empty() {
            return Err(ClientError::required("title"));
        }
        if self.content.trim().is_empty() {
            return Err(ClientError::required("content"));
        }
        Ok(())
    }

    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            post_type: post.post_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    pub content: String,
    pub author_id: Id,
}

impl CommentInput {
    pub fn new(content: impl Into<String>, author_id: Id) -> Self {
        Self {
            content: content.into(),
            author_id,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.content.trim().is_empty() {
            return Err(ClientError::required("content"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub content: String,
    pub author_id: Id,
}

impl AnswerInput {
    pub fn new(content: impl Into<String>, author_id: Id) -> Self {
        Self {
            content: content.into(),
            author_id,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.content.trim().is_empty() {
            return Err(ClientError::required("content"));
        }
        Ok(())
    }
}

use serde::Serialize;

use super::{notice_of, Listing, Page};
use crate::api::BoardApi;
use crate::error::ClientError;
use crate::lifecycle::{LoadState, Resource};
use crate::models::{Answer, AnswerInput, Comment, CommentInput, Id, Post, PostInput, User};
use crate::session::SessionStore;

/// A post as rendered for the current user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub post: Post,
    /// Only the author may edit or delete
    pub can_edit: bool,
    pub comments: Vec<CommentCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentCard {
    pub comment: Comment,
    pub can_edit: bool,
}

/// The `/projects/{id}/board` page: posts with their comments
#[derive(Clone)]
pub struct BoardView {
    project_id: Id,
    api: BoardApi,
    session: SessionStore,
    resource: Resource<Id, Vec<Post>>,
}

impl BoardView {
    pub fn new(api: BoardApi, session: SessionStore, project_id: Id) -> Self {
        let fetch_api = api.clone();
        let resource = Resource::new("posts", move |id: Id| {
            let api = fetch_api.clone();
            async move { api.list_posts(&id).await }
        });
        Self {
            project_id,
            api,
            session,
            resource,
        }
    }

    pub async fn mount(api: BoardApi, session: SessionStore, project_id: Id) -> Self {
        let view = Self::new(api, session, project_id.clone());
        view.resource.mount(project_id).await;
        view
    }

    pub fn project_id(&self) -> &Id {
        &self.project_id
    }

    pub fn state(&self) -> LoadState<Vec<Post>> {
        self.resource.snapshot()
    }

    pub fn post(&self, post_id: &Id) -> Option<Post> {
        self.resource
            .snapshot()
            .data?
            .into_iter()
            .find(|post| post.id.matches(post_id))
    }

    fn current_user(&self) -> Result<User, ClientError> {
        self.session
            .current_user()
            .ok_or_else(|| ClientError::validation("session", "Login required"))
    }

    fn loaded_post(&self, post_id: &Id) -> Result<Post, ClientError> {
        self.post(post_id)
            .ok_or_else(|| ClientError::validation("post", format!("Post {} is not loaded", post_id)))
    }

    /// Authorship check for post edits, done before any request
    fn check_post_author(&self, post_id: &Id) -> Result<(), ClientError> {
        let user = self.current_user()?;
        if self.loaded_post(post_id)?.is_authored_by(&user) {
            Ok(())
        } else {
            Err(ClientError::validation("author", "Only the author can change this post"))
        }
    }

    fn check_comment_author(&self, post_id: &Id, comment_id: &Id) -> Result<(), ClientError> {
        let user = self.current_user()?;
        let post = self.loaded_post(post_id)?;
        let comment = post
            .comment(comment_id)
            .ok_or_else(|| ClientError::validation("comment", format!("Comment {} is not loaded", comment_id)))?;
        if comment.is_authored_by(&user) {
            Ok(())
        } else {
            Err(ClientError::validation("author", "Only the author can change this comment"))
        }
    }

    pub async fn create_post(&self, input: PostInput) -> Result<Post, ClientError> {
        let api = self.api.clone();
        let project_id = self.project_id.clone();
        self.resource
            .mutate("Failed to create post", async move { api.create_post(&project_id, &input).await })
            .await
    }

    pub async fn update_post(&self, post_id: &Id, input: PostInput) -> Result<Post, ClientError> {
        let allowed = self.check_post_author(post_id);
        let api = self.api.clone();
        let project_id = self.project_id.clone();
        let post_id = post_id.clone();
        self.resource
            .mutate("Failed to update post", async move {
                allowed?;
                api.update_post(&project_id, &post_id, &input).await
            })
            .await
    }

    pub async fn delete_post(&self, post_id: &Id) -> Result<(), ClientError> {
        let allowed = self.check_post_author(post_id);
        let api = self.api.clone();
        let project_id = self.project_id.clone();
        let post_id = post_id.clone();
        self.resource
            .mutate("Failed to delete post", async move {
                allowed?;
                api.delete_post(&project_id, &post_id).await
            })
            .await
    }

    pub async fn add_comment(&self, post_id: &Id, content: &str) -> Result<Comment, ClientError> {
        let input = self
            .current_user()
            .map(|user| CommentInput::new(content, user.id.clone()));
        let api = self.api.clone();
        let project_id = self.project_id.clone();
        let post_id = post_id.clone();
        self.resource
            .mutate("Failed to add comment", async move {
                api.add_comment(&project_id, &post_id, &input?).await
            })
            .await
    }

    pub async fn update_comment(&self, post_id: &Id, comment_id: &Id, content: &str) -> Result<Comment, ClientError> {
        let input = self
            .check_comment_author(post_id, comment_id)
            .and_then(|_| self.current_user())
            .map(|user| CommentInput::new(content, user.id.clone()));
        let api = self.api.clone();
        let project_id = self.project_id.clone();
        let post_id = post_id.clone();
        let comment_id = comment_id.clone();
        self.resource
            .mutate("Failed to update comment", async move {
                api.update_comment(&project_id, &post_id, &comment_id, &input?).await
            })
            .await
    }

    pub async fn delete_comment(&self, post_id: &Id, comment_id: &Id) -> Result<(), ClientError> {
        let allowed = self.check_comment_author(post_id, comment_id);
        let api = self.api.clone();
        let project_id = self.project_id.clone();
        let post_id = post_id.clone();
        let comment_id = comment_id.clone();
        self.resource
            .mutate("Failed to delete comment", async move {
                allowed?;
                api.delete_comment(&project_id, &post_id, &comment_id).await
            })
            .await
    }

    /// Answer a question post
    pub async fn answer_question(&self, post_id: &Id, question_id: &Id, content: &str) -> Result<Answer, ClientError> {
        let input = self.current_user().and_then(|user| match self.post(post_id) {
            Some(post) if !post.is_question() => Err(ClientError::validation(
                "post",
                "Only question posts can be answered",
            )),
            _ => Ok(AnswerInput::new(content, user.id.clone())),
        });
        let api = self.api.clone();
        let project_id = self.project_id.clone();
        let post_id = post_id.clone();
        let question_id = question_id.clone();
        self.resource
            .mutate("Failed to answer question", async move {
                api.answer_question(&project_id, &post_id, &question_id, &input?).await
            })
            .await
    }

    pub fn render(&self) -> Page<Listing<PostCard>> {
        let state = self.resource.snapshot();
        let user = self.session.current_user();
        let owns = |author: &User| user.as_ref().is_some_and(|u| author.id.matches(&u.id));

        let body = Listing::from_state(&state, |post: &Post| PostCard {
            can_edit: owns(&post.author),
            comments: post
                .comments
                .iter()
                .map(|comment| CommentCard {
                    can_edit: owns(&comment.author),
                    comment: comment.clone(),
                })
                .collect(),
            post: post.clone(),
        });

        Page {
            body,
            notice: notice_of(&state),
        }
    }

    pub fn unmount(&self) {
        self.resource.unmount();
    }
}

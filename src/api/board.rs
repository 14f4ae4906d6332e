use super::client::ApiClient;
use crate::error::ClientError;
use crate::models::{Answer, AnswerInput, Comment, CommentInput, Id, Post, PostInput};

/// Per-project discussion board: posts, comments and answers
#[derive(Clone)]
pub struct BoardApi {
    client: ApiClient,
}

impl BoardApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_posts(&self, project_id: &Id) -> Result<Vec<Post>, ClientError> {
        self.client
            .get(&["projects", &project_id.to_string(), "posts"])
            .await
    }

    pub async fn get_post(&self, project_id: &Id, post_id: &Id) -> Result<Post, ClientError> {
        self.client
            .get(&["projects", &project_id.to_string(), "posts", &post_id.to_string()])
            .await
    }

    pub async fn create_post(&self, project_id: &Id, input: &PostInput) -> Result<Post, ClientError> {
        input.validate()?;
        self.client
            .post(&["projects", &project_id.to_string(), "posts"], input)
            .await
    }

    pub async fn update_post(&self, project_id: &Id, post_id: &Id, input: &PostInput) -> Result<Post, ClientError> {
        input.validate()?;
        self.client
            .put(&["projects", &project_id.to_string(), "posts", &post_id.to_string()], input)
            .await
    }

    pub async fn delete_post(&self, project_id: &Id, post_id: &Id) -> Result<(), ClientError> {
        self.client
            .delete(&["projects", &project_id.to_string(), "posts", &post_id.to_string()])
            .await
    }

    pub async fn add_comment(&self, project_id: &Id, post_id: &Id, input: &CommentInput) -> Result<Comment, ClientError> {
        input.validate()?;
        self.client
            .post(
                &["projects", &project_id.to_string(), "posts", &post_id.to_string(), "comments"],
                input,
            )
            .await
    }

    pub async fn update_comment(
        &self,
        project_id: &Id,
        post_id: &Id,
        comment_id: &Id,
        input: &CommentInput,
    ) -> Result<Comment, ClientError> {
        input.validate()?;
        self.client
            .put(
                &[
                    "projects",
                    &project_id.to_string(),
                    "posts",
                    &post_id.to_string(),
                    "comments",
                    &comment_id.to_string(),
                ],
                input,
            )
            .await
    }

    pub async fn delete_comment(&self, project_id: &Id, post_id: &Id, comment_id: &Id) -> Result<(), ClientError> {
        self.client
            .delete(&[
                "projects",
                &project_id.to_string(),
                "posts",
                &post_id.to_string(),
                "comments",
                &comment_id.to_string(),
            ])
            .await
    }

    pub async fn answer_question(
        &self,
        project_id: &Id,
        post_id: &Id,
        question_id: &Id,
        input: &AnswerInput,
    ) -> Result<Answer, ClientError> {
        input.validate()?;
        self.client
            .post(
                &[
                    "projects",
                    &project_id.to_string(),
                    "posts",
                    &post_id.to_string(),
                    "questions",
                    &question_id.to_string(),
                    "answers",
                ],
                input,
            )
            .await
    }
}

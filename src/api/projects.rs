use super::client::ApiClient;
use crate::error::ClientError;
use crate::models::{ChecklistItem, ChecklistItemPatch, Id, NewChecklistItem, Project, ProjectInput};

/// Projects and their checklists
#[derive(Clone)]
pub struct ProjectsApi {
    client: ApiClient,
}

impl ProjectsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.client.get(&["projects"]).await
    }

    pub async fn get_project(&self, id: &Id) -> Result<Project, ClientError> {
        self.client.get(&["projects", &id.to_string()]).await
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<Project, ClientError> {
        input.validate()?;
        self.client.post(&["projects"], input).await
    }

    pub async fn update_project(&self, id: &Id, input: &ProjectInput) -> Result<Project, ClientError> {
        input.validate()?;
        self.client.put(&["projects", &id.to_string()], input).await
    }

    pub async fn delete_project(&self, id: &Id) -> Result<(), ClientError> {
        self.client.delete(&["projects", &id.to_string()]).await
    }

    pub async fn list_checklist(&self, project_id: &Id) -> Result<Vec<ChecklistItem>, ClientError> {
        self.client
            .get(&["projects", &project_id.to_string(), "checklist"])
            .await
    }

    pub async fn create_checklist_item(
        &self,
        project_id: &Id,
        item: &NewChecklistItem,
    ) -> Result<ChecklistItem, ClientError> {
        item.validate()?;
        self.client
            .post(&["projects", &project_id.to_string(), "checklist"], item)
            .await
    }

    pub async fn update_checklist_item(
        &self,
        project_id: &Id,
        item_id: &Id,
        patch: &ChecklistItemPatch,
    ) -> Result<ChecklistItem, ClientError> {
        if patch.is_empty() {
            return Err(ClientError::validation("item", "Nothing to update"));
        }
        self.client
            .put(
                &["projects", &project_id.to_string(), "checklist", &item_id.to_string()],
                patch,
            )
            .await
    }
}

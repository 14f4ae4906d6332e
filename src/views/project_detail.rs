use serde::Serialize;

use super::{notice_of, Page};
use crate::api::ProjectsApi;
use crate::error::ClientError;
use crate::gate::Route;
use crate::lifecycle::{LoadState, Resource};
use crate::models::{Id, Project, ProjectInput};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "project", rename_all = "snake_case")]
pub enum DetailBody {
    Loading,
    NotFound,
    Project(Project),
}

/// The `/projects/{id}` page: one project, edit and delete
#[derive(Clone)]
pub struct ProjectDetailView {
    project_id: Id,
    api: ProjectsApi,
    resource: Resource<Id, Project>,
}

impl ProjectDetailView {
    pub fn new(api: ProjectsApi, project_id: Id) -> Self {
        let fetch_api = api.clone();
        let resource = Resource::new("project", move |id: Id| {
            let api = fetch_api.clone();
            async move { api.get_project(&id).await }
        });
        Self {
            project_id,
            api,
            resource,
        }
    }

    pub async fn mount(api: ProjectsApi, project_id: Id) -> Self {
        let view = Self::new(api, project_id.clone());
        view.resource.mount(project_id).await;
        view
    }

    pub fn project_id(&self) -> &Id {
        &self.project_id
    }

    pub fn state(&self) -> LoadState<Project> {
        self.resource.snapshot()
    }

    /// Edit form prefilled from the loaded project
    pub fn edit_form(&self) -> Option<ProjectInput> {
        self.resource.snapshot().data.as_ref().map(ProjectInput::from_project)
    }

    pub async fn update(&self, input: ProjectInput) -> Result<Project, ClientError> {
        let api = self.api.clone();
        let id = self.project_id.clone();
        self.resource
            .mutate("Failed to update project", async move { api.update_project(&id, &input).await })
            .await
    }

    /// Delete the project and leave the page; nothing is reloaded on success
    pub async fn delete(&self) -> Result<Route, ClientError> {
        let api = self.api.clone();
        let id = self.project_id.clone();
        self.resource
            .act("Failed to delete project", async move { api.delete_project(&id).await })
            .await?;
        self.resource.unmount();
        Ok(Route::Projects)
    }

    pub fn checklist_route(&self) -> Route {
        Route::Checklist(self.project_id.clone())
    }

    pub fn board_route(&self) -> Route {
        Route::Board(self.project_id.clone())
    }

    pub fn render(&self) -> Page<DetailBody> {
        let state = self.resource.snapshot();
        let body = match &state.data {
            Some(project) => DetailBody::Project(project.clone()),
            None if state.loading => DetailBody::Loading,
            None => DetailBody::NotFound,
        };
        Page {
            body,
            notice: notice_of(&state),
        }
    }

    pub fn unmount(&self) {
        self.resource.unmount();
    }
}

use super::{notice_of, Listing, Page};
use crate::api::ProjectsApi;
use crate::error::ClientError;
use crate::lifecycle::{LoadState, Resource};
use crate::models::{Project, ProjectInput};

/// The `/projects` page: every project, plus project creation
#[derive(Clone)]
pub struct ProjectsView {
    api: ProjectsApi,
    resource: Resource<(), Vec<Project>>,
}

impl ProjectsView {
    pub fn new(api: ProjectsApi) -> Self {
        let fetch_api = api.clone();
        let resource = Resource::new("projects", move |_: ()| {
            let api = fetch_api.clone();
            async move { api.list_projects().await }
        });
        Self { api, resource }
    }

    pub async fn mount(api: ProjectsApi) -> Self {
        let view = Self::new(api);
        view.resource.mount(()).await;
        view
    }

    pub fn state(&self) -> LoadState<Vec<Project>> {
        self.resource.snapshot()
    }

    pub fn resource(&self) -> &Resource<(), Vec<Project>> {
        &self.resource
    }

    pub async fn reload(&self) {
        self.resource.reload().await;
    }

    pub async fn create(&self, input: ProjectInput) -> Result<Project, ClientError> {
        let api = self.api.clone();
        self.resource
            .mutate("Failed to create project", async move { api.create_project(&input).await })
            .await
    }

    pub fn render(&self) -> Page<Listing<Project>> {
        let state = self.resource.snapshot();
        Page {
            body: Listing::from_state(&state, Project::clone),
            notice: notice_of(&state),
        }
    }

    pub fn unmount(&self) {
        self.resource.unmount();
    }
}

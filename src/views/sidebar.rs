use serde::Serialize;

use crate::api::ProjectsApi;
use crate::lifecycle::Resource;
use crate::models::Project;

/// Navigation sidebar: projects grouped by status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarModel {
    pub loading: bool,
    pub in_progress: Vec<Project>,
    pub completed: Vec<Project>,
}

#[derive(Clone)]
pub struct ProjectSidebar {
    resource: Resource<(), Vec<Project>>,
}

impl ProjectSidebar {
    pub fn new(api: ProjectsApi) -> Self {
        let resource = Resource::new("projects", move |_: ()| {
            let api = api.clone();
            async move { api.list_projects().await }
        });
        Self { resource }
    }

    pub async fn mount(api: ProjectsApi) -> Self {
        let sidebar = Self::new(api);
        sidebar.resource.mount(()).await;
        sidebar
    }

    pub async fn reload(&self) {
        self.resource.reload().await;
    }

    pub fn render(&self) -> SidebarModel {
        let state = self.resource.snapshot();
        let projects = state.data.unwrap_or_default();
        SidebarModel {
            loading: state.loading,
            in_progress: projects.iter().filter(|p| p.is_in_progress()).cloned().collect(),
            completed: projects.iter().filter(|p| p.is_completed()).cloned().collect(),
        }
    }

    pub fn unmount(&self) {
        self.resource.unmount();
    }
}

use super::{notice_of, Listing, Page};
use crate::api::ProjectsApi;
use crate::error::ClientError;
use crate::lifecycle::{LoadState, Resource};
use crate::models::{ChecklistItem, ChecklistItemPatch, Id, NewChecklistItem};

/// The `/projects/{id}/checklist` page
#[derive(Clone)]
pub struct ChecklistView {
    project_id: Id,
    api: ProjectsApi,
    resource: Resource<Id, Vec<ChecklistItem>>,
}

impl ChecklistView {
    pub fn new(api: ProjectsApi, project_id: Id) -> Self {
        let fetch_api = api.clone();
        let resource = Resource::new("checklist", move |id: Id| {
            let api = fetch_api.clone();
            async move { api.list_checklist(&id).await }
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

    pub fn state(&self) -> LoadState<Vec<ChecklistItem>> {
        self.resource.snapshot()
    }

    pub fn item(&self, item_id: &Id) -> Option<ChecklistItem> {
        self.resource
            .snapshot()
            .data?
            .into_iter()
            .find(|item| item.id.matches(item_id))
    }

    pub async fn add_item(&self, item: NewChecklistItem) -> Result<ChecklistItem, ClientError> {
        let api = self.api.clone();
        let project_id = self.project_id.clone();
        self.resource
            .mutate("Failed to add checklist item", async move {
                api.create_checklist_item(&project_id, &item).await
            })
            .await
    }

    /// Flip an item between PENDING and COMPLETED, sending only the status
    pub async fn toggle(&self, item_id: &Id) -> Result<ChecklistItem, ClientError> {
        let next = self.item(item_id).map(|item| item.status.toggled());
        let api = self.api.clone();
        let project_id = self.project_id.clone();
        let item_id = item_id.clone();

        self.resource
            .mutate("Failed to update status", async move {
                let status = next.ok_or_else(|| {
                    ClientError::validation("item", format!("Checklist item {} is not loaded", item_id))
                })?;
                api.update_checklist_item(&project_id, &item_id, &ChecklistItemPatch::status(status))
                    .await
            })
            .await
    }

    pub async fn update_item(&self, item_id: &Id, patch: ChecklistItemPatch) -> Result<ChecklistItem, ClientError> {
        let api = self.api.clone();
        let project_id = self.project_id.clone();
        let item_id = item_id.clone();
        self.resource
            .mutate("Failed to update checklist item", async move {
                api.update_checklist_item(&project_id, &item_id, &patch).await
            })
            .await
    }

    /// (completed, total) over the loaded items
    pub fn progress(&self) -> (usize, usize) {
        let items = self.resource.snapshot().data.unwrap_or_default();
        let done = items.iter().filter(|item| item.is_completed()).count();
        (done, items.len())
    }

    pub fn render(&self) -> Page<Listing<ChecklistItem>> {
        let state = self.resource.snapshot();
        Page {
            body: Listing::from_state(&state, ChecklistItem::clone),
            notice: notice_of(&state),
        }
    }

    pub fn unmount(&self) {
        self.resource.unmount();
    }
}

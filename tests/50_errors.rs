mod common;

use anyhow::Result;
use serde_json::{json, Value};

use common::{alice_credentials, unused_base_url, MockService};
use projectdesk::api::{Api, ApiClient};
use projectdesk::gate::AuthorizationGate;
use projectdesk::models::Project;
use projectdesk::views::{Listing, ProjectsView};
use projectdesk::{App, ClientError};

#[tokio::test]
async fn unreachable_service_yields_transport_error() -> Result<()> {
    let client = ApiClient::new(&unused_base_url())?;
    let app = App::new(Api::new(client), AuthorizationGate::default());

    let err = app.login(&alice_credentials(), None).await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
    assert!(!err.message().trim().is_empty());
    assert_eq!(err.error_code(), "TRANSPORT_ERROR");
    Ok(())
}

#[tokio::test]
async fn unreachable_service_leaves_view_unavailable() -> Result<()> {
    let client = ApiClient::new(&unused_base_url())?;
    let view = ProjectsView::mount(Api::new(client).projects).await;

    let page = view.render();
    let state = view.state();

    assert_eq!(page.body, Listing::Unavailable);
    assert!(!state.loading);
    assert!(page
        .notice
        .as_deref()
        .is_some_and(|n| n.starts_with("Failed to load projects: ") && n.len() > "Failed to load projects: ".len()));
    Ok(())
}

#[tokio::test]
async fn error_key_is_used_as_message() -> Result<()> {
    let mock = MockService::spawn().await?;
    mock.fail("GET", "/api/projects", 403, r#"{"error":"Forbidden for this team"}"#);
    let app = mock.alice().await?;

    let err = app.api().projects.list_projects().await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.message(), "Forbidden for this team");
    Ok(())
}

#[tokio::test]
async fn plain_text_error_body_is_kept() -> Result<()> {
    let mock = MockService::spawn().await?;
    mock.fail("GET", "/api/projects", 502, "Bad gateway from upstream");
    let app = mock.alice().await?;

    let err = app.api().projects.list_projects().await.unwrap_err();

    assert_eq!(err.payload(), Some(&Value::String("Bad gateway from upstream".to_string())));
    assert_eq!(err.message(), "Bad gateway from upstream");
    Ok(())
}

#[tokio::test]
async fn json_error_without_message_is_rendered_whole() -> Result<()> {
    let mock = MockService::spawn().await?;
    mock.fail("GET", "/api/projects", 422, r#"{"code":42}"#);
    let app = mock.alice().await?;

    let err = app.api().projects.list_projects().await.unwrap_err();

    assert_eq!(err.payload(), Some(&json!({"code": 42})));
    assert_eq!(err.message(), r#"{"code":42}"#);
    Ok(())
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() -> Result<()> {
    let mock = MockService::spawn().await?;
    mock.fail("GET", "/api/projects", 200, "<html>not json</html>");
    let app = mock.alice().await?;

    let err = app.api().projects.list_projects().await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
    assert_eq!(err.status(), None);
    Ok(())
}

#[tokio::test]
async fn numeric_ids_survive_the_round_trip() -> Result<()> {
    let mock = MockService::spawn().await?;
    mock.backend().projects.push(json!({"id": 7, "name": "Numbered", "status": "IN_PROGRESS"}));
    let app = mock.alice().await?;

    let projects: Vec<Project> = app.api().projects.list_projects().await?;
    assert_eq!(serde_json::to_value(&projects[0].id)?, json!(7));

    // Path segments render the id as the service sent it
    let project = app.api().projects.get_project(&projects[0].id).await?;
    assert_eq!(project.name, "Numbered");
    assert_eq!(mock.count("GET", "/api/projects/7"), 1);
    Ok(())
}

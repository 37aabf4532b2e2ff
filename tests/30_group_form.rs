mod common;

use anyhow::Result;
use reqwest::StatusCode;

use sokol_admin::client::{
    load_form_context, ClientError, FormEffect, GroupApi, GroupForm, HttpGroupApi, Notice, Outcome,
};
use sokol_admin::handlers::protected::groups::CreateGroupRequest;

use common::{member_ids, TestServer};

fn api(server: &TestServer, authenticated: bool) -> Result<HttpGroupApi> {
    let token = authenticated.then(|| server.token());
    Ok(HttpGroupApi::new(&server.base_url, token)?)
}

#[tokio::test]
async fn create_form_round_trip() -> Result<()> {
    let server = TestServer::start().await?;
    let mut form = GroupForm::new(api(&server, true)?, None);

    assert_eq!(form.load_members().await.len(), 3);
    form.set_name("U10 Boys");
    form.set_program("p1");
    form.set_location("l1");
    assert!(form.add_member("m2"));
    assert!(form.add_member("m1"));

    assert_eq!(form.submit().await, Outcome::Done);
    assert!(form
        .take_effects()
        .contains(&FormEffect::Notify(Notice::Success("Group created.".into()))));

    let reader = api(&server, false)?;
    let groups = reader.list_groups().await?;
    assert_eq!(groups.len(), 1);
    let created = reader.get_group(&groups[0].id).await?;
    assert_eq!(created.group.name, "U10 Boys");
    assert_eq!(created.member_ids(), vec!["m1".to_string(), "m2".to_string()]);
    Ok(())
}

#[tokio::test]
async fn edit_form_loads_context_and_updates() -> Result<()> {
    let server = TestServer::start().await?;
    let id = server
        .create_group(serde_json::json!({ "name": "U10 Boys", "programId": "p1", "locationId": "l1", "memberIds": ["m1"] }))
        .await?;

    let api = api(&server, true)?;
    let context = load_form_context(&api, Some(&id)).await?;
    assert_eq!(context.programs.len(), 2);
    assert_eq!(context.locations.len(), 2);
    assert_eq!(context.members.len(), 3);
    let initial = context.group.expect("group should load");

    let mut form = GroupForm::new(api, Some(initial));
    assert_eq!(form.action_label(), "Save changes");
    form.set_location("l2");
    assert_eq!(form.submit().await, Outcome::Done);

    let (_, body) = server.get_group(&id).await?;
    assert_eq!(body["data"]["locationId"], "l2");
    assert_eq!(member_ids(&body["data"]), vec!["m1"]);
    Ok(())
}

#[tokio::test]
async fn missing_group_opens_create_mode() -> Result<()> {
    let server = TestServer::start().await?;
    let context = load_form_context(&api(&server, false)?, Some("g-missing")).await?;
    assert!(context.group.is_none());
    Ok(())
}

#[tokio::test]
async fn unauthenticated_form_reports_generic_failure() -> Result<()> {
    let server = TestServer::start().await?;
    let mut form = GroupForm::new(api(&server, false)?, None);
    form.set_name("U10 Boys");
    form.set_program("p1");
    form.set_location("l1");

    assert_eq!(form.submit().await, Outcome::Failed);
    assert_eq!(
        form.take_effects(),
        vec![FormEffect::Notify(Notice::Error("Something went wrong.".into()))]
    );
    Ok(())
}

#[tokio::test]
async fn client_surfaces_server_error_message() -> Result<()> {
    let server = TestServer::start().await?;
    let payload = CreateGroupRequest {
        name: Some(String::new()),
        program_id: Some("p1".into()),
        location_id: Some("l1".into()),
        member_ids: None,
    };

    match api(&server, true)?.create_group(&payload).await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::BAD_REQUEST.as_u16());
            assert_eq!(message, "Name is required");
        }
        other => panic!("expected a 400, got {:?}", other.map(|g| g.group.id)),
    }
    Ok(())
}

#[tokio::test]
async fn delete_through_modal_removes_group() -> Result<()> {
    let server = TestServer::start().await?;
    let id = server
        .create_group(serde_json::json!({ "name": "Seniors", "programId": "p2", "locationId": "l2" }))
        .await?;

    let api = api(&server, true)?;
    let initial = api.get_group(&id).await?;
    let mut form = GroupForm::new(api, Some(initial));

    assert!(form.request_delete());
    assert_eq!(form.confirm_delete().await, Outcome::Done);

    let (status, _) = server.get_group(&id).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

// SPDX-License-Identifier: MIT

//! Tag management tests.

use esclavizador::models::TagDraft;
use esclavizador::AppError;

mod common;

#[tokio::test]
async fn test_create_and_list_tags() {
    let api = common::spawn_mock_api().await;
    let (client, store) = api.client();
    api.seed_valid_session(store.as_ref());

    let bug = client.create_tag(&TagDraft::new("Bug Fix")).await.expect("create");
    client
        .create_tag(&TagDraft::new("Feature"))
        .await
        .expect("create");

    assert_eq!(bug.name, "Bug Fix");
    assert_eq!(bug.organization_id, api.state.organization_id);

    let page = client.list_tags(None, None).await.expect("list");
    assert_eq!(page.total, 2);
    assert!(page.items.iter().any(|t| t.id == bug.id));
}

#[tokio::test]
async fn test_delete_tag_removes_it_from_the_list() {
    let api = common::spawn_mock_api().await;
    let (client, store) = api.client();
    api.seed_valid_session(store.as_ref());

    let tag = client.create_tag(&TagDraft::new("Short-lived")).await.expect("create");
    client.delete_tag(tag.id).await.expect("delete");

    let page = client.list_tags(None, None).await.expect("list");
    assert_eq!(page.total, 0);

    // A second delete reports the missing resource
    let err = client.delete_tag(tag.id).await.expect_err("must fail");
    assert!(matches!(err, AppError::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_empty_tag_name_is_rejected() {
    let api = common::spawn_mock_api().await;
    let (client, store) = api.client();
    api.seed_valid_session(store.as_ref());

    let err = client
        .create_tag(&TagDraft::new("   "))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AppError::Api { status: 422, .. }));
}

use super::*;

async fn setup() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext { storage }
}

#[tokio::test]
async fn created_task_gets_server_assigned_id_and_timestamp() {
    let ctx = setup().await;
    let task = create_task(&ctx, NewTask::pending("Buy milk"))
        .await
        .expect("create");

    assert!(!task.id.as_str().is_empty());
    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
    assert!(task.extra.get("createdAt").and_then(Value::as_str).is_some());
}

#[tokio::test]
async fn create_rejects_whitespace_title() {
    let ctx = setup().await;
    for title in ["   ", "\u{FEFF}", " \u{FEFF} "] {
        let err = create_task(&ctx, NewTask::pending(title))
            .await
            .expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Validation);
    }
    assert!(list_tasks(&ctx).await.expect("list").is_empty());
}

#[tokio::test]
async fn create_keeps_title_untrimmed() {
    let ctx = setup().await;
    let task = create_task(&ctx, NewTask::pending("  padded "))
        .await
        .expect("create");
    assert_eq!(task.title, "  padded ");
}

#[tokio::test]
async fn update_flips_completion_and_keeps_title() {
    let ctx = setup().await;
    let task = create_task(&ctx, NewTask::pending("Buy milk"))
        .await
        .expect("create");

    let updated = update_task(
        &ctx,
        &task.id,
        TaskPatch {
            title: Some(task.title.clone()),
            completed: Some(true),
        },
    )
    .await
    .expect("update");

    assert!(updated.completed);
    assert_eq!(updated.title, "Buy milk");
    assert_eq!(updated.extra.get("createdAt"), task.extra.get("createdAt"));
}

#[tokio::test]
async fn empty_patch_returns_current_task() {
    let ctx = setup().await;
    let task = create_task(&ctx, NewTask::pending("Buy milk"))
        .await
        .expect("create");
    let same = update_task(&ctx, &task.id, TaskPatch::default())
        .await
        .expect("update");
    assert_eq!(same, task);
}

#[tokio::test]
async fn update_and_delete_of_unknown_task_are_not_found() {
    let ctx = setup().await;
    let missing = TaskId::from("missing");

    let err = update_task(
        &ctx,
        &missing,
        TaskPatch {
            title: None,
            completed: Some(true),
        },
    )
    .await
    .expect_err("update should fail");
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = delete_task(&ctx, &missing)
        .await
        .expect_err("delete should fail");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_removes_task_from_listing() {
    let ctx = setup().await;
    let keep = create_task(&ctx, NewTask::pending("keep"))
        .await
        .expect("create");
    let removed = create_task(&ctx, NewTask::pending("drop"))
        .await
        .expect("create");

    delete_task(&ctx, &removed.id).await.expect("delete");

    let remaining = list_tasks(&ctx).await.expect("list");
    assert_eq!(remaining, vec![keep]);
}

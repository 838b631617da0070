//! In-memory integration tests for task listings.

use super::helpers::{Engine, engine, owner};
use chrono::Duration;
use followup::task::{
    domain::{OwnerId, TaskId, TaskStatus},
    services::{CreateTaskRequest, DelayTaskRequest, ListTasksRequest, TaskPage},
};
use rstest::rstest;

async fn seed(engine: &Engine, owner: &OwnerId, titles: &[(&str, i64)]) -> Vec<TaskId> {
    let mut ids = Vec::with_capacity(titles.len());
    for (title, days_ahead) in titles {
        let task = engine
            .lifecycle
            .create(
                owner,
                CreateTaskRequest::new(*title, "seeded", engine.clock.in_days(*days_ahead)),
            )
            .await
            .expect("task creation should succeed");
        ids.push(task.id());
        engine.clock.advance(Duration::minutes(1));
    }
    ids
}

async fn overdue(engine: &Engine, owner: &OwnerId) -> TaskPage {
    engine
        .queries
        .list(owner, ListTasksRequest::new().overdue_only())
        .await
        .expect("listing should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_listing_tracks_the_calendar(engine: Engine, owner: OwnerId) {
    let ids = seed(&engine, &owner, &[("Today", 0), ("Tomorrow", 1), ("Later", 9)]).await;

    assert_eq!(overdue(&engine, &owner).await.meta.total, 0);

    engine.clock.advance(Duration::days(1));
    let page = overdue(&engine, &owner).await;
    assert_eq!(
        page.items.iter().map(|item| item.task.id()).collect::<Vec<_>>(),
        ids.first().copied().into_iter().collect::<Vec<_>>()
    );
    assert!(page.items.iter().all(|item| item.is_overdue));

    engine.clock.advance(Duration::days(1));
    assert_eq!(overdue(&engine, &owner).await.meta.total, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delayed_status_filter_with_search(engine: Engine, owner: OwnerId) {
    let ids = seed(
        &engine,
        &owner,
        &[("Budget review", 1), ("Budget approval", 1), ("Hiring", 1)],
    )
    .await;
    for id in &ids {
        engine
            .lifecycle
            .delay(
                &owner,
                DelayTaskRequest::new(*id, "Board meeting moved", engine.clock.in_days(4)),
            )
            .await
            .expect("delay should succeed");
    }
    let first = ids.first().copied().expect("seeded task");
    engine
        .lifecycle
        .complete(&owner, first)
        .await
        .expect("completion should succeed");

    let page = engine
        .queries
        .list(
            &owner,
            ListTasksRequest::new()
                .with_search("budget")
                .with_status(TaskStatus::Delayed),
        )
        .await
        .expect("listing should succeed");

    assert_eq!(page.meta.total, 1);
    assert_eq!(
        page.items.first().map(|item| item.task.title().as_str()),
        Some("Budget approval")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn page_size_is_capped_and_defaulted(engine: Engine, owner: OwnerId) {
    let titles: Vec<String> = (0..15).map(|n| format!("Task {n}")).collect();
    let specs: Vec<(&str, i64)> = titles.iter().map(|title| (title.as_str(), 2)).collect();
    seed(&engine, &owner, &specs).await;

    let default_page = engine
        .queries
        .list(&owner, ListTasksRequest::new())
        .await
        .expect("listing should succeed");
    assert_eq!(default_page.items.len(), 10);
    assert_eq!(default_page.meta.limit, 10);
    assert_eq!(default_page.meta.total_pages, 2);

    let all = engine
        .queries
        .list(&owner, ListTasksRequest::new().with_limit(100))
        .await
        .expect("listing should succeed");
    assert_eq!(all.items.len(), 15);
    assert_eq!(all.meta.total_pages, 1);
}

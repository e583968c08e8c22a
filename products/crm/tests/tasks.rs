mod common;

use chrono::NaiveDate;
use common::CrmTestContext;
use crm::{TaskInput, TaskView};
use entity::task;
use platform_api::ApiError;
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn create_forces_pending_status() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let deal = t.deal_for(&t.org, acme.id, "Pilot").await;

    // A status in the request body never reaches the service input.
    let input: TaskInput = serde_json::from_value(serde_json::json!({
        "description": "Send contract",
        "dueDate": "2025-04-01",
        "status": "Completed"
    }))
    .unwrap();
    let created = t.crm.tasks.create_task(&t.org, deal.id, input).await.unwrap();

    assert_eq!(created.status, task::STATUS_PENDING);
    assert_eq!(created.deal_id, deal.id);
    assert_eq!(created.organization_id, t.org.org_id);
    assert_eq!(created.due_date, NaiveDate::from_ymd_opt(2025, 4, 1));
}

#[tokio::test]
async fn create_for_missing_deal_is_not_found() {
    let t = CrmTestContext::new().await;
    let err = t
        .crm
        .tasks
        .create_task(&t.org, 404, TaskInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound("Deal")));
    assert_eq!(task::Entity::find().count(&t.db).await.unwrap(), 0);
}

#[tokio::test]
async fn tasks_by_deal_requires_existing_deal() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let deal = t.deal_for(&t.org, acme.id, "Pilot").await;
    let other = t.deal_for(&t.org, acme.id, "Renewal").await;
    let first = t.task_for(&t.org, deal.id, "Call").await;
    let second = t.task_for(&t.org, deal.id, "Email").await;
    t.task_for(&t.org, other.id, "Demo").await;

    let listed = t.crm.tasks.tasks_by_deal(&t.org, deal.id).await.unwrap();
    assert_eq!(listed, vec![first, second]);

    let err = t.crm.tasks.tasks_by_deal(&t.org, 9_999).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("Deal")));
    let err = t.crm.tasks.tasks_by_deal(&t.other_org, deal.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("Deal")));
}

#[tokio::test]
async fn status_update_stores_any_label() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let deal = t.deal_for(&t.org, acme.id, "Pilot").await;
    let created = t.task_for(&t.org, deal.id, "Call").await;

    let completed = t
        .crm
        .tasks
        .update_task_status(&t.org, created.id, task::STATUS_COMPLETED.into())
        .await
        .unwrap();
    assert_eq!(completed.status, "Completed");

    let archived = t
        .crm
        .tasks
        .update_task_status(&t.org, created.id, "Archived".into())
        .await
        .unwrap();
    assert_eq!(archived.status, "Archived");
    assert_eq!(archived.description, created.description);

    let err = t
        .crm
        .tasks
        .update_task_status(&t.org, 31_337, "Completed".into())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound("Task")));
}

#[tokio::test]
async fn delete_requires_existing_task() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let deal = t.deal_for(&t.org, acme.id, "Pilot").await;
    let created = t.task_for(&t.org, deal.id, "Call").await;

    let err = t.crm.tasks.delete_task(&t.other_org, created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("Task")));

    t.crm.tasks.delete_task(&t.org, created.id).await.unwrap();
    assert_eq!(task::Entity::find().count(&t.db).await.unwrap(), 0);

    let err = t.crm.tasks.delete_task(&t.org, created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("Task")));
}

#[tokio::test]
async fn view_serializes_dates_as_iso() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let deal = t.deal_for(&t.org, acme.id, "Pilot").await;
    let created = t
        .crm
        .tasks
        .create_task(
            &t.org,
            deal.id,
            TaskInput {
                description: None,
                due_date: NaiveDate::from_ymd_opt(2025, 1, 9),
            },
        )
        .await
        .unwrap();
    let value = serde_json::to_value(TaskView::from(created)).unwrap();
    assert_eq!(value["dueDate"], "2025-01-09");
    assert_eq!(value["dealId"], deal.id);
    assert_eq!(value["status"], "Pending");
}

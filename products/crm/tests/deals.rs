mod common;

use chrono::NaiveDate;
use common::CrmTestContext;
use crm::{DealInput, DealView};
use entity::{deal, task};
use platform_api::ApiError;
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn create_attaches_customer_and_organization() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let close = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();

    let created = t
        .crm
        .deals
        .create_deal(
            &t.org,
            acme.id,
            DealInput {
                title: Some("Enterprise plan".into()),
                value: Some(48_000.5),
                stage: Some("Negotiation".into()),
                expected_close_date: Some(close),
            },
        )
        .await
        .unwrap();

    assert_eq!(created.customer_id, acme.id);
    assert_eq!(created.organization_id, t.org.org_id);
    assert_eq!(created.value, Some(48_000.5));
    assert_eq!(created.expected_close_date, Some(close));
}

#[tokio::test]
async fn create_for_missing_customer_writes_nothing() {
    let t = CrmTestContext::new().await;
    let err = t
        .crm
        .deals
        .create_deal(&t.org, 77, DealInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound("Customer")));
    assert_eq!(deal::Entity::find().count(&t.db).await.unwrap(), 0);
}

#[tokio::test]
async fn create_for_foreign_customer_is_not_found() {
    let t = CrmTestContext::new().await;
    let theirs = t.customer_in(&t.other_org, "Globex Buyer").await;
    let err = t
        .crm
        .deals
        .create_deal(&t.org, theirs.id, DealInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound("Customer")));
}

#[tokio::test]
async fn stage_is_free_form() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let created = t
        .crm
        .deals
        .create_deal(
            &t.org,
            acme.id,
            DealInput {
                stage: Some("On hold".into()),
                ..DealInput::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.stage.as_deref(), Some("On hold"));
}

#[tokio::test]
async fn listings_are_scoped() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let initech = t.customer_in(&t.org, "Initech").await;
    let globex = t.customer_in(&t.other_org, "Globex Buyer").await;
    let first = t.deal_for(&t.org, acme.id, "Pilot").await;
    let second = t.deal_for(&t.org, initech.id, "Renewal").await;
    t.deal_for(&t.other_org, globex.id, "Foreign").await;

    let all: Vec<i32> = t
        .crm
        .deals
        .list_deals(&t.org)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(all, vec![first.id, second.id]);

    let for_acme = t.crm.deals.deals_by_customer(&t.org, acme.id).await.unwrap();
    assert_eq!(for_acme.len(), 1);
    assert_eq!(for_acme[0].id, first.id);

    let unknown = t.crm.deals.deals_by_customer(&t.org, 9_999).await.unwrap();
    assert!(unknown.is_empty());
    let foreign = t.crm.deals.deals_by_customer(&t.org, globex.id).await.unwrap();
    assert!(foreign.is_empty());
}

#[tokio::test]
async fn update_keeps_customer_and_organization() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let original = t.deal_for(&t.org, acme.id, "Pilot").await;

    let updated = t
        .crm
        .deals
        .update_deal(
            &t.org,
            original.id,
            DealInput {
                title: Some("Pilot, phase 2".into()),
                value: Some(2_000.0),
                stage: Some("Won".into()),
                expected_close_date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.customer_id, acme.id);
    assert_eq!(updated.organization_id, t.org.org_id);
    assert_eq!(updated.stage.as_deref(), Some("Won"));

    let err = t
        .crm
        .deals
        .update_deal(&t.other_org, original.id, DealInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound("Deal")));
}

#[tokio::test]
async fn delete_cascades_to_tasks() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let doomed = t.deal_for(&t.org, acme.id, "Pilot").await;
    let survivor = t.deal_for(&t.org, acme.id, "Renewal").await;
    t.task_for(&t.org, doomed.id, "Call").await;
    t.task_for(&t.org, doomed.id, "Email").await;
    let kept = t.task_for(&t.org, survivor.id, "Demo").await;

    t.crm.deals.delete_deal(&t.org, doomed.id).await.unwrap();

    let tasks = task::Entity::find().all(&t.db).await.unwrap();
    assert_eq!(tasks, vec![kept]);
    assert!(deal::Entity::find_by_id(doomed.id).one(&t.db).await.unwrap().is_none());

    let err = t.crm.deals.delete_deal(&t.org, doomed.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("Deal")));
}

#[tokio::test]
async fn view_has_no_task_back_reference() {
    let t = CrmTestContext::new().await;
    let acme = t.customer_in(&t.org, "Acme").await;
    let created = t.deal_for(&t.org, acme.id, "Pilot").await;
    let value = serde_json::to_value(DealView::from(created)).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert!(!keys.contains(&"tasks"));
    assert_eq!(value["customerId"], acme.id);
    assert_eq!(value["expectedCloseDate"], serde_json::Value::Null);
}

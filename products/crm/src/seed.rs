use chrono::{Duration, Utc};
use entity::{customer, deal, task};
use platform_api::ApiResult;
use tracing::info;

use crate::{CrmModule, CustomerInput, DealInput, OrgContext, TaskInput};

/// Records inserted by [`seed_demo`].
#[derive(Clone, Debug)]
pub struct SeededCrm {
    pub customer: customer::Model,
    pub deal: deal::Model,
    pub tasks: Vec<task::Model>,
}

/// Inserts one customer with an open deal and two follow-up tasks, the
/// second already completed.
pub async fn seed_demo(crm: &CrmModule, ctx: &OrgContext) -> ApiResult<SeededCrm> {
    let today = Utc::now().date_naive();

    let customer = crm
        .customers
        .create_customer(
            ctx,
            CustomerInput {
                name: "Acme Co".into(),
                email: "a@acme.com".into(),
                phone: "555-0100".into(),
                company: Some("Acme Corp".into()),
            },
        )
        .await?;

    let deal = crm
        .deals
        .create_deal(
            ctx,
            customer.id,
            DealInput {
                title: Some("Acme Pilot".into()),
                value: Some(12_500.0),
                stage: Some("Proposal".into()),
                expected_close_date: Some(today + Duration::days(30)),
            },
        )
        .await?;

    let kickoff = crm
        .tasks
        .create_task(
            ctx,
            deal.id,
            TaskInput {
                description: Some("Schedule kickoff call".into()),
                due_date: Some(today + Duration::days(7)),
            },
        )
        .await?;
    let proposal = crm
        .tasks
        .create_task(
            ctx,
            deal.id,
            TaskInput {
                description: Some("Send proposal".into()),
                due_date: Some(today - Duration::days(1)),
            },
        )
        .await?;
    let proposal = crm
        .tasks
        .update_task_status(ctx, proposal.id, task::STATUS_COMPLETED.into())
        .await?;

    info!(customer_id = customer.id, deal_id = deal.id, "demo data seeded");
    Ok(SeededCrm {
        customer,
        deal,
        tasks: vec![kickoff, proposal],
    })
}

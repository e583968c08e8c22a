//! CRM vertical slice.
//!
//! Three services share one connection pool. Every operation takes the
//! caller's [`OrgContext`] and only touches rows of that organization.

pub mod customers;
pub mod deals;
pub mod seed;
pub mod tasks;
mod validate;

pub use customers::{CustomerInput, CustomerService, CustomerView};
pub use deals::{DealInput, DealService, DealView};
pub use platform_db::OrgContext;
pub use seed::{SeededCrm, seed_demo};
pub use tasks::{TaskInput, TaskService, TaskView};

use platform_db::DbPool;

/// All CRM services wired to the same pool.
#[derive(Clone, Debug)]
pub struct CrmModule {
    pub customers: CustomerService,
    pub deals: DealService,
    pub tasks: TaskService,
}

impl CrmModule {
    pub fn new(db: DbPool) -> Self {
        Self {
            customers: CustomerService::new(db.clone()),
            deals: DealService::new(db.clone()),
            tasks: TaskService::new(db),
        }
    }
}

//! sea-orm entities for the CRM tables.

pub mod customer;
pub mod deal;
pub mod organization;
pub mod task;

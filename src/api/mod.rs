//! API service modules for Meridian endpoints.
//!
//! Each service is a thin wrapper that forwards to the client core, which
//! owns authentication, retries, and response parsing.

mod accounts;
mod payees;
mod payments;
mod transactions;
mod webhooks;

pub use accounts::AccountsService;
pub use payees::PayeesService;
pub use payments::{PaymentsQuery, PaymentsService};
pub use transactions::{TransactionsQuery, TransactionsService};
pub use webhooks::WebhooksService;

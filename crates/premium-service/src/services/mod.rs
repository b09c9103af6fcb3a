//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and orchestrate the ledger ports,
//! the membership directory, and the clock.

pub mod context;
pub mod error;
pub mod query;
pub mod reconciler;
pub mod redemption;
pub mod retry;
pub mod vote;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use query::EntitlementQueryService;
pub use reconciler::{ExpiryReconciler, SweepReport};
pub use redemption::RedemptionService;
pub use vote::VoteService;

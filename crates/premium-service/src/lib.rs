//! # premium-service
//!
//! Application layer containing the redemption engine, the expiry
//! reconciler, vote ingestion, and the entitlement query service.

pub mod dto;
pub mod services;

pub use services::{
    EntitlementQueryService, ExpiryReconciler, RedemptionService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, ServiceSettings, SweepReport,
    VoteService,
};

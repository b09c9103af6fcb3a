//! Data transfer objects for API requests and responses
//!
//! Request DTOs are validated with `validator`; response DTOs serialize in
//! camelCase, the shape existing API consumers read.

pub mod requests;
pub mod responses;

pub use requests::{GenerateCodesRequest, RedeemRequest, VoteWebhookPayload};

pub use responses::{
    CodeBatchResponse, CodeGenerationFailure, CodeResponse, GuildStatusResponse, HealthResponse,
    LeaderboardEntry, LedgerChecks, PublicCodeResponse, ReadinessResponse, RedemptionResponse,
    VoteRecordResponse, VoterInfoResponse,
};

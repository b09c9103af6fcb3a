//! Ports implemented by the infrastructure crates

mod clock;
mod code_generator;
mod directory;
mod repositories;

pub use clock::{Clock, ManualClock, SystemClock};
pub use code_generator::{CodeGenerator, RandomCodeGenerator};
pub use directory::{DirectoryError, MemberDirectory, RevocationReport};
pub use repositories::{
    CodeRepository, EntitlementRepository, LedgerHealth, RepoResult, VoteRepository,
};

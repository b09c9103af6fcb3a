//! Value objects - immutable types that represent domain concepts

mod actor;
mod redemption_code;
mod snowflake;

pub use actor::Actor;
pub use redemption_code::RedemptionCode;
pub use snowflake::{Snowflake, SnowflakeParseError};

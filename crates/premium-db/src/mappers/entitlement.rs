//! Guild entitlement entity <-> model mapper

use premium_core::{DomainError, GuildEntitlement, Snowflake};

use super::stored_code;
use crate::models::EntitlementModel;

/// Convert EntitlementModel to GuildEntitlement entity
impl TryFrom<EntitlementModel> for GuildEntitlement {
    type Error = DomainError;

    fn try_from(model: EntitlementModel) -> Result<Self, Self::Error> {
        let redeemed_codes = model
            .redeemed_codes
            .iter()
            .map(|c| stored_code(c))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GuildEntitlement {
            guild_id: Snowflake::new(model.guild_id),
            premium_role_id: model.premium_role_id.map(Snowflake::new),
            premium_expires_at: model.premium_expires_at,
            redeemed_codes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

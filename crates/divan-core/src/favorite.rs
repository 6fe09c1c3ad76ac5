use serde::{Deserialize, Serialize};

use crate::ids::{ProductId, RecordId, UserId};

/// A server-side favorite, shown on the profile overview. The local heart
/// toggle lives in `divan-store` and never touches these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub user_id: UserId,
    pub product_id: ProductId,
}

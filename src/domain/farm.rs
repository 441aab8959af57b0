use super::common::{Address, TitleSlug, Timestamps};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical property animals can belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farm {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: TitleSlug,
    #[serde(default)]
    pub address: Address,
    /// Whether this is a farm currently operated; animals owned by other
    /// farms are not "on the farm".
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub timestamps: Timestamps,
}

impl Farm {
    pub fn new(title: impl Into<String>, current: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            info: TitleSlug::new(title),
            address: Address::default(),
            current,
            timestamps: Timestamps::now(),
        }
    }
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// donation orders

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// buyer's in-game nickname
    #[sea_orm(column_type = "Text")]
    pub player_nickname: String,

    /// catalog package the buyer claims to have paid for
    #[sea_orm(column_type = "Text")]
    pub package_name: String,

    /// whole currency units, equals the package list price at creation
    pub amount: i64,

    pub status: Status,

    /// buyer contact phone, recorded at creation if provided
    #[sea_orm(column_type = "Text", nullable)]
    pub phone: Option<String>,

    /// operator free text
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    /// data create time
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order settlement status. `Pending` is the single "awaiting decision"
/// state; the two terminal states can only be left back through it.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl Status {
    /// Whether the operator may move an order from `self` to `to`.
    /// Direct completed<->cancelled flips must route through pending,
    /// so every settlement or void passes the audit point. Same-status
    /// updates are allowed and treated as no-ops by the service.
    pub fn can_transition(&self, to: Status) -> bool {
        use Status::*;
        matches!(
            (self, to),
            (Pending, Completed)
                | (Pending, Cancelled)
                | (Completed, Pending)
                | (Cancelled, Pending)
        ) || *self == to
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use crate::{
    now,
    payment::PaymentInstructions,
    setting::{Package, Payment},
    Error, Result,
};
use entity::donation;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

/// Donation order service
pub struct Service {
    conn: DbConn,
}

/// Aggregates for the operator dashboard. Recomputed on every query; the
/// numbers are the operator's primary trust signal for "has this money
/// arrived", so stale caching is not an option.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: u64,
    pub pending: u64,
    pub completed: u64,
    /// sum of amount over completed orders only
    pub revenue: i64,
}

impl Stats {
    pub fn collect(donations: &[donation::Model]) -> Self {
        let mut stats = Stats::default();
        for d in donations {
            stats.total += 1;
            match d.status {
                donation::Status::Pending => stats.pending += 1,
                donation::Status::Completed => {
                    stats.completed += 1;
                    stats.revenue += d.amount;
                }
                donation::Status::Cancelled => {}
            }
        }
        stats
    }
}

impl Service {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    pub fn db(&self) -> &DbConn {
        &self.conn
    }

    /// Record a buyer's claim to have paid for a package. The amount must
    /// equal the catalog price, otherwise a buyer could claim a cheaper
    /// package at a higher-tier price or vice versa.
    pub async fn create_donation(
        &self,
        player_nickname: &str,
        package_name: &str,
        amount: i64,
        phone: Option<String>,
        catalog: &[Package],
    ) -> Result<donation::Model> {
        let player_nickname = player_nickname.trim();
        if player_nickname.is_empty() {
            return Err(Error::InvalidParam("player_nickname is empty".to_owned()));
        }
        let package = catalog
            .iter()
            .find(|p| p.name == package_name)
            .ok_or_else(|| Error::InvalidParam(format!("unknown package {:?}", package_name)))?;
        if amount != package.price {
            return Err(Error::PriceMismatch {
                package: package.name.clone(),
                expected: package.price,
                got: amount,
            });
        }

        let time = now() as i64;
        Ok(donation::ActiveModel {
            id: NotSet,
            player_nickname: Set(player_nickname.to_owned()),
            package_name: Set(package.name.clone()),
            amount: Set(amount),
            status: Set(donation::Status::Pending),
            phone: Set(phone.filter(|p| !p.trim().is_empty())),
            notes: Set(None),
            created_at: Set(time),
            updated_at: Set(time),
        }
        .insert(self.db())
        .await?)
    }

    pub async fn get_donation(&self, id: i32) -> Result<Option<donation::Model>> {
        Ok(donation::Entity::find_by_id(id).one(self.db()).await?)
    }

    /// All orders, most recent first so new manual-payment claims surface
    /// to the operator promptly. Id breaks ties within one second.
    pub async fn list_donations(&self) -> Result<Vec<donation::Model>> {
        Ok(donation::Entity::find()
            .order_by_desc(donation::Column::CreatedAt)
            .order_by_desc(donation::Column::Id)
            .all(self.db())
            .await?)
    }

    /// Move an order through the status state machine. Same-status updates
    /// are accepted as no-ops so a double-click never double-counts
    /// revenue. The write is filtered on the status the decision was made
    /// against, so a concurrent flip cannot be silently overwritten.
    pub async fn update_status(
        &self,
        id: i32,
        new_status: donation::Status,
    ) -> Result<donation::Model> {
        let current = self
            .get_donation(id)
            .await?
            .ok_or(Error::NotFound(id))?;

        if current.status == new_status {
            return Ok(current);
        }
        if !current.status.can_transition(new_status) {
            return Err(Error::IllegalTransition(
                format!("{:?}", current.status).to_lowercase(),
                format!("{:?}", new_status).to_lowercase(),
            ));
        }

        let res = donation::Entity::update_many()
            .set(donation::ActiveModel {
                status: Set(new_status),
                updated_at: Set(now() as i64),
                ..Default::default()
            })
            .filter(donation::Column::Id.eq(id))
            .filter(donation::Column::Status.eq(current.status))
            .exec(self.db())
            .await?;
        if res.rows_affected != 1 {
            return Err(Error::Str(
                "the status changed concurrently, reload and retry",
            ));
        }

        self.get_donation(id).await?.ok_or(Error::NotFound(id))
    }

    /// operator annotation path; does not touch status
    pub async fn update_notes(&self, id: i32, notes: Option<String>) -> Result<donation::Model> {
        self.get_donation(id).await?.ok_or(Error::NotFound(id))?;

        donation::Entity::update_many()
            .set(donation::ActiveModel {
                notes: Set(notes),
                updated_at: Set(now() as i64),
                ..Default::default()
            })
            .filter(donation::Column::Id.eq(id))
            .exec(self.db())
            .await?;

        self.get_donation(id).await?.ok_or(Error::NotFound(id))
    }

    /// Instructions for an existing order. Amount and package come from
    /// the stored record, never from the caller, so a forged query string
    /// cannot request instructions for an arbitrary amount.
    pub async fn instructions_for(
        &self,
        id: i32,
        payment: &Payment,
    ) -> Result<PaymentInstructions> {
        let donation = self.get_donation(id).await?.ok_or(Error::NotFound(id))?;
        payment.instructions(donation.amount, &donation.package_name)
    }

    pub async fn stats(&self) -> Result<Stats> {
        let donations = donation::Entity::find().all(self.db()).await?;
        Ok(Stats::collect(&donations))
    }
}

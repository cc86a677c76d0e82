use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::prize_entity as prizes;
use crate::error::AppResult;
use crate::services::{Decrement, Prize, PrizeCatalog};

impl From<prizes::Model> for Prize {
    fn from(m: prizes::Model) -> Self {
        Prize {
            id: m.id,
            name: m.name,
            quantity: m.quantity,
        }
    }
}

/// Prize inventory backed by the `prizes` table.
///
/// Works on a plain connection or inside a transaction.
pub struct PrizeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PrizeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Prizes with stock left, ordered by id.
    pub async fn find_available(&self) -> Result<Vec<prizes::Model>, DbErr> {
        prizes::Entity::find()
            .filter(prizes::Column::Quantity.gt(0))
            .order_by_asc(prizes::Column::Id)
            .all(self.db)
            .await
    }

    /// `UPDATE prizes SET quantity = quantity - 1 WHERE id = ? AND quantity > 0`
    ///
    /// Returns the stock left after taking a unit, or `None` if nothing was taken.
    pub async fn take_one(&self, prize_id: i32) -> Result<Option<i32>, DbErr> {
        let result = prizes::Entity::update_many()
            .col_expr(
                prizes::Column::Quantity,
                Expr::col(prizes::Column::Quantity).sub(1),
            )
            .col_expr(prizes::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(prizes::Column::Id.eq(prize_id))
            .filter(prizes::Column::Quantity.gt(0))
            .exec(self.db)
            .await?;

        if result.rows_affected != 1 {
            return Ok(None);
        }

        // 在同一连接/事务内重读，得到本次扣减后的库存
        let remaining = prizes::Entity::find_by_id(prize_id)
            .one(self.db)
            .await?
            .map(|m| m.quantity)
            .ok_or(DbErr::RecordNotFound(format!("prize {prize_id}")))?;
        Ok(Some(remaining))
    }

    pub async fn put_back_one(&self, prize_id: i32) -> Result<(), DbErr> {
        let result = prizes::Entity::update_many()
            .col_expr(
                prizes::Column::Quantity,
                Expr::col(prizes::Column::Quantity).add(1),
            )
            .col_expr(prizes::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(prizes::Column::Id.eq(prize_id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DbErr::RecordNotUpdated);
        }
        Ok(())
    }
}

#[async_trait]
impl<C: ConnectionTrait> PrizeCatalog for PrizeRepository<'_, C> {
    async fn list_available(&self) -> AppResult<Vec<Prize>> {
        let list = self.find_available().await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    async fn decrement(&self, prize_id: i32) -> AppResult<Decrement> {
        Ok(match self.take_one(prize_id).await? {
            Some(remaining) => Decrement::Decremented { remaining },
            None => Decrement::AlreadyExhausted,
        })
    }

    async fn restock(&self, prize_id: i32) -> AppResult<()> {
        self.put_back_one(prize_id).await?;
        Ok(())
    }
}

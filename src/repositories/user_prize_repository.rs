use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::user_prize_entity as user_prizes;
use crate::error::AppResult;
use crate::services::{AssignmentRecorder, Prize};

/// Win history backed by the `user_prizes` table.
pub struct UserPrizeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserPrizeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        prize_id: i32,
        prize_name: &str,
    ) -> Result<user_prizes::Model, DbErr> {
        user_prizes::ActiveModel {
            user_id: Set(user_id),
            prize_id: Set(prize_id),
            prize_name: Set(prize_name.to_string()),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Newest first.
    pub async fn find_by_user(&self, user_id: i32) -> Result<Vec<user_prizes::Model>, DbErr> {
        user_prizes::Entity::find()
            .filter(user_prizes::Column::UserId.eq(user_id))
            .order_by_desc(user_prizes::Column::Id)
            .all(self.db)
            .await
    }

    /// Newest first.
    pub async fn find_all(&self) -> Result<Vec<user_prizes::Model>, DbErr> {
        user_prizes::Entity::find()
            .order_by_desc(user_prizes::Column::Id)
            .all(self.db)
            .await
    }
}

#[async_trait]
impl<C: ConnectionTrait> AssignmentRecorder for UserPrizeRepository<'_, C> {
    async fn record(&self, user_id: i32, prize: &Prize) -> AppResult<()> {
        self.create(user_id, prize.id, &prize.name).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{insert_prize, setup_test_db};

    #[tokio::test]
    async fn test_record_and_query_history() {
        let db = setup_test_db().await;
        let a = insert_prize(&db, "A", 5).await;
        let b = insert_prize(&db, "B", 5).await;
        let repo = UserPrizeRepository::new(&db);

        let prize_a = Prize {
            id: a,
            name: "A".to_string(),
            quantity: 5,
        };
        let prize_b = Prize {
            id: b,
            name: "B".to_string(),
            quantity: 5,
        };
        repo.record(1, &prize_a).await.unwrap();
        repo.record(2, &prize_a).await.unwrap();
        repo.record(1, &prize_b).await.unwrap();

        let mine = repo.find_by_user(1).await.unwrap();
        assert_eq!(
            mine.iter().map(|r| r.prize_id).collect::<Vec<_>>(),
            vec![b, a]
        );
        assert_eq!(mine[0].prize_name, "B");

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].user_id, 1);
        assert_eq!(all[2].user_id, 1);
        assert_eq!(all[1].user_id, 2);
    }
}

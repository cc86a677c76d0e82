use crate::config::LotteryConfig;
use crate::error::AppResult;
use crate::models::{PrizeResponse, UserPrizeResponse};
use crate::repositories::{PrizeRepository, UserPrizeRepository};
use crate::services::{DrawOutcome, PrizeCatalog, PrizeDrawer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::{DatabaseConnection, TransactionTrait};

#[derive(Clone)]
pub struct LotteryService {
    pool: DatabaseConnection,
    config: LotteryConfig,
}

impl LotteryService {
    pub fn new(pool: DatabaseConnection, config: LotteryConfig) -> Self {
        Self { pool, config }
    }

    /// 抽奖：快照在事务外读取，事务内第一条语句即为条件扣减，
    /// 扣减与中奖记录一起提交，出错时事务被丢弃并回滚
    pub async fn draw(&self, user_id: i32) -> AppResult<DrawOutcome> {
        let mut rng = StdRng::from_os_rng();
        self.draw_with_rng(user_id, &mut rng).await
    }

    pub async fn draw_with_rng<G: Rng + Send>(
        &self,
        user_id: i32,
        rng: &mut G,
    ) -> AppResult<DrawOutcome> {
        // SQLite 上先读后写的事务在并发升级写锁时会直接返回 BUSY
        let snapshot = PrizeRepository::new(&self.pool).list_available().await?;

        let txn = self.pool.begin().await?;

        let outcome = {
            let catalog = PrizeRepository::new(&txn);
            let recorder = UserPrizeRepository::new(&txn);
            PrizeDrawer::new(&catalog, &recorder, &self.config)
                .inside_transaction()
                .draw_from(user_id, snapshot, rng)
                .await?
        };

        txn.commit().await?;

        match &outcome {
            DrawOutcome::Won(prize) => {
                log::info!("User {user_id} won prize {} ({})", prize.id, prize.name)
            }
            DrawOutcome::NoWin(_) => log::debug!("User {user_id} drew no win"),
            DrawOutcome::NoneAvailable => log::info!("User {user_id} found no prize available"),
        }

        Ok(outcome)
    }

    /// Prizes with remaining stock
    pub async fn list_available(&self) -> AppResult<Vec<PrizeResponse>> {
        let list = PrizeRepository::new(&self.pool).find_available().await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// Win history of one user, newest first
    pub async fn list_user_prizes(&self, user_id: i32) -> AppResult<Vec<UserPrizeResponse>> {
        let list = UserPrizeRepository::new(&self.pool)
            .find_by_user(user_id)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// Win history of every user, newest first (admin)
    pub async fn list_all_prizes(&self) -> AppResult<Vec<UserPrizeResponse>> {
        let list = UserPrizeRepository::new(&self.pool).find_all().await?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}

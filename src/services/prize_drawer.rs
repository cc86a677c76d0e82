use async_trait::async_trait;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::LotteryConfig;
use crate::error::AppResult;

/// Id reserved for the "no win" sentinel prize.
pub const NO_WIN_PRIZE_ID: i32 = 0;
/// Nominal stock of the sentinel prize. Never decremented.
pub const NO_WIN_QUANTITY: i32 = 999_999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prize {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
}

impl Prize {
    pub fn no_win(name: &str) -> Self {
        Self {
            id: NO_WIN_PRIZE_ID,
            name: name.to_string(),
            quantity: NO_WIN_QUANTITY,
        }
    }

    pub fn is_no_win(&self) -> bool {
        self.id == NO_WIN_PRIZE_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    Won(Prize),
    /// Carries the sentinel prize.
    NoWin(Prize),
    /// Nothing left to draw from, or the chosen prize ran out mid-draw.
    NoneAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// 扣减成功，`remaining` 为扣减后库存
    Decremented { remaining: i32 },
    AlreadyExhausted,
}

/// Prize inventory.
#[async_trait]
pub trait PrizeCatalog: Send + Sync {
    /// Prizes with quantity > 0.
    async fn list_available(&self) -> AppResult<Vec<Prize>>;

    /// Takes one unit only if quantity is still > 0 at the time of the call.
    async fn decrement(&self, prize_id: i32) -> AppResult<Decrement>;

    /// Gives back one unit taken by `decrement`.
    async fn restock(&self, prize_id: i32) -> AppResult<()>;
}

#[async_trait]
pub trait AssignmentRecorder: Send + Sync {
    async fn record(&self, user_id: i32, prize: &Prize) -> AppResult<()>;
}

pub struct PrizeDrawer<'a> {
    catalog: &'a dyn PrizeCatalog,
    recorder: &'a dyn AssignmentRecorder,
    config: &'a LotteryConfig,
    restock_on_failure: bool,
}

impl<'a> PrizeDrawer<'a> {
    pub fn new(
        catalog: &'a dyn PrizeCatalog,
        recorder: &'a dyn AssignmentRecorder,
        config: &'a LotteryConfig,
    ) -> Self {
        Self {
            catalog,
            recorder,
            config,
            restock_on_failure: true,
        }
    }

    /// Catalog and recorder share a transaction that the caller drops on error,
    /// so a failed record is undone by the rollback instead of a restock.
    pub fn inside_transaction(mut self) -> Self {
        self.restock_on_failure = false;
        self
    }

    /// Draws once for `user_id` against a fresh snapshot of the catalog.
    pub async fn draw<G: Rng + Send>(&self, user_id: i32, rng: &mut G) -> AppResult<DrawOutcome> {
        let snapshot = self.catalog.list_available().await?;
        self.draw_from(user_id, snapshot, rng).await
    }

    /// 抽奖
    ///
    /// 逻辑:
    /// 1. 按 no_win_threshold 判定是否未中奖 (不动库存)
    /// 2. 从快照中均匀随机选取一个奖品
    /// 3. 条件扣减库存 (update where quantity > 0)，并发扣减失败视为无可用奖品
    /// 4. 写中奖记录；失败时回补库存 (事务内由回滚处理) 并返回错误
    ///
    /// `snapshot` 可以在 `catalog` 所在事务之外读取，库存只由条件扣减保证
    pub async fn draw_from<G: Rng + Send>(
        &self,
        user_id: i32,
        snapshot: Vec<Prize>,
        rng: &mut G,
    ) -> AppResult<DrawOutcome> {
        if rng.random::<f64>() < self.config.no_win_threshold {
            return Ok(DrawOutcome::NoWin(Prize::no_win(&self.config.no_win_name)));
        }

        let Some(chosen) = snapshot.choose(rng) else {
            log::debug!("No prizes available for user {user_id}");
            return Ok(DrawOutcome::NoneAvailable);
        };

        if chosen.quantity <= 0 {
            return Ok(DrawOutcome::NoneAvailable);
        }

        let remaining = match self.catalog.decrement(chosen.id).await? {
            Decrement::Decremented { remaining } => remaining,
            Decrement::AlreadyExhausted => {
                log::info!(
                    "Prize {} ran out before user {user_id} could claim it",
                    chosen.id
                );
                return Ok(DrawOutcome::NoneAvailable);
            }
        };

        if let Err(err) = self.recorder.record(user_id, chosen).await {
            if self.restock_on_failure
                && let Err(restock_err) = self.catalog.restock(chosen.id).await
            {
                log::error!(
                    "Prize {} stock is one short: recording for user {user_id} failed ({err}) and restock failed ({restock_err})",
                    chosen.id
                );
            }
            return Err(err);
        }

        Ok(DrawOutcome::Won(Prize {
            quantity: remaining,
            ..chosen.clone()
        }))
    }
}

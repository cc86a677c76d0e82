use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{prize_entity, user_prize_entity};
use crate::services::DrawOutcome;

/// Prize still in stock
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrizeResponse {
    pub id: i32,
    pub name: String,
    /// Remaining stock
    pub quantity: i32,
}

impl From<prize_entity::Model> for PrizeResponse {
    fn from(m: prize_entity::Model) -> Self {
        PrizeResponse {
            id: m.id,
            name: m.name,
            quantity: m.quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DrawOutcomeKind {
    Won,
    NoWin,
    NoneAvailable,
}

/// Result of one draw.
///
/// `prize_id`/`prize_name` are present for `won` and `no_win`
/// (the latter carries the sentinel prize, id 0).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrawResponse {
    pub outcome: DrawOutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_name: Option<String>,
}

impl From<DrawOutcome> for DrawResponse {
    fn from(outcome: DrawOutcome) -> Self {
        match outcome {
            DrawOutcome::Won(prize) => DrawResponse {
                outcome: DrawOutcomeKind::Won,
                prize_id: Some(prize.id),
                prize_name: Some(prize.name),
            },
            DrawOutcome::NoWin(sentinel) => DrawResponse {
                outcome: DrawOutcomeKind::NoWin,
                prize_id: Some(sentinel.id),
                prize_name: Some(sentinel.name),
            },
            DrawOutcome::NoneAvailable => DrawResponse {
                outcome: DrawOutcomeKind::NoneAvailable,
                prize_id: None,
                prize_name: None,
            },
        }
    }
}

/// Win history entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserPrizeResponse {
    pub id: i32,
    pub user_id: i32,
    pub prize_id: i32,
    /// Prize name at the time of the draw
    pub prize_name: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<user_prize_entity::Model> for UserPrizeResponse {
    fn from(m: user_prize_entity::Model) -> Self {
        UserPrizeResponse {
            id: m.id,
            user_id: m.user_id,
            prize_id: m.prize_id,
            prize_name: m.prize_name,
            created_at: m.created_at,
        }
    }
}

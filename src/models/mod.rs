// Row structs mapped straight from the store and serialized as camelCase views

use serde::{Serialize, Serializer};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

pub const CATEGORY_MATCH_REVENUE: &str = "MATCH_REVENUE";
pub const CATEGORY_MONTHLY_FEE: &str = "MONTHLY_FEE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(format!("'{}' is not INCOME or EXPENSE", other)),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Played,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::Played => "PLAYED",
            MatchStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Ok(MatchStatus::Scheduled),
            "PLAYED" => Ok(MatchStatus::Played),
            "CANCELLED" | "CANCELED" => Ok(MatchStatus::Cancelled),
            other => Err(format!("'{}' is not a match status", other)),
        }
    }
}

fn int_as_bool<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(*value != 0)
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub nickname: Option<String>,
    pub position: Option<String>,
    pub monthly_fee: Option<f64>,
    #[serde(serialize_with = "int_as_bool")]
    pub active: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub address: Option<String>,
    pub hourly_rate: Option<f64>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub group_id: String,
    pub field_id: Option<String>,
    pub date: String,
    pub start_time: Option<String>,
    pub status: String,
    pub team_a_score: Option<i64>,
    pub team_b_score: Option<i64>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub match_id: String,
    pub player_id: Option<String>,
    pub author: String,
    pub content: String,
    pub created_at: String,
}

/// A row of the `transactions` table. Aggregate ledger rows are ordinary
/// transactions whose category is MATCH_REVENUE or MONTHLY_FEE.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub group_id: String,
    pub description: String,
    pub amount: f64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub category: Option<String>,
    pub related_match_id: Option<String>,
    pub player_id: Option<String>,
    pub created_at: String,
    /// Filled from `transaction_contributions`, not a column.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paid_player_ids: Vec<String>,
}

/// Result of a monthly-fee contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyOutcome {
    Recorded,
    AlreadyPaid,
}

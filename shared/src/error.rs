//! Unified error and warning vocabulary for the billing engine
//!
//! Two layers, mirroring how failures actually propagate:
//! - [`BillingError`]: typed errors returned by boundary operations
//!   (ingestion, redemption validation). A failure here is always scoped
//!   to one contract or one selection, never the whole preview.
//! - [`BillingWarning`]: serializable degradation records carried in the
//!   preview response. The engine computes best-effort: a malformed
//!   contract contributes zero and leaves a warning, it does not abort.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Billing engine errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BillingError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Mile redemption rejected: {0}")]
    MileRedemptionRejected(String),

    #[error("Contract has no billable items: {0}")]
    NoBillableItems(i64),
}

impl BillingError {
    // ==================== Convenience constructors ====================

    /// Create an invalid date error from the raw value that failed to parse
    pub fn invalid_date(raw: impl Into<String>) -> Self {
        Self::InvalidDate(raw.into())
    }

    /// Create an invalid amount error
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    /// Create a mile redemption error
    pub fn mile_rejected(msg: impl Into<String>) -> Self {
        Self::MileRedemptionRejected(msg.into())
    }
}

/// Result type for billing operations
pub type BillingResult<T> = Result<T, BillingError>;

/// Warning codes surfaced in the preview response
///
/// The caller renders these inline next to partial results. Wire form is
/// a tagged object so the frontend can localize per code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingWarning {
    /// 契約の開始日が解析できない（当該契約は月次計算から除外）
    InvalidStartDate { contract_id: i64, raw: String },
    /// 請求対象の明細が1件もない契約
    NoBillableItems { contract_id: i64 },
    /// 割引合計が契約の割引上限を超過（超過分は校舎負担）
    DiscountCapExceeded { contract_id: i64, excess: i64 },
    /// マイル利用の要求が適用条件を満たさない（割引0円として続行）
    MileRedemptionRejected { reason: String },
    /// リクエストの開始日が解析できない（月次バケットは空になる）
    InvalidRequestStartDate { raw: String },
}

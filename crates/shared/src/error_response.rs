//! # エラーレスポンス
//!
//! 400 / 404 / 500 で返す共通のエラーレスポンス構造体。
//!
//! ## 設計
//!
//! - ボディは `{"error": "<メッセージ>"}` の 1 フィールドのみ
//! - メッセージは人間向けで、機械判定用のエラーコードは持たない
//! - axum の `IntoResponse` 変換はサービス側の責務

use serde::{Deserialize, Serialize};

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

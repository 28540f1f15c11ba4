//! # ドメイン層エラー定義
//!
//! 入力値がドメインのルールに違反した場合のエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | ステータス値などの検証失敗 |
//! | `NotFound` | 404 Not Found | Todo が存在しない |
//!
//! ## 使用例
//!
//! ```rust
//! use todolist_domain::DomainError;
//!
//! let error = DomainError::NotFound {
//!     entity_type: "Todo",
//!     id:          "0190f3a4-0000-7000-8000-000000000000".to_string(),
//! };
//! assert!(error.to_string().contains("Todo"));
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、HTTP レスポンスに変換する。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// メッセージはそのままクライアントに返される。
    #[error("{0}")]
    Validation(String),

    /// エンティティが見つからない
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類（"Todo"）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },
}

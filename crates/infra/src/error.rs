//! # インフラ層エラー定義
//!
//! データベースとの通信で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Database, Unavailable, Unexpected）
//!
//! `From<sqlx::Error>` や convenience constructor でエラーを生成すると、
//! その時点のスパン情報（どのリポジトリメソッドから来たか）が記録される。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::Unavailable { attempts, .. } => { /* 起動中止 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー
    ///
    /// クエリ実行失敗、接続エラー、接続文字列の不正など。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 起動時の接続確立が上限回数まで失敗した
    #[error("データベースに接続できません（{attempts} 回試行）: {last_error}")]
    Unavailable {
        /// 試行回数
        attempts:   u32,
        /// 最後の試行で発生したエラー
        last_error: String,
    },

    /// 予期しないエラー
    ///
    /// DB に想定外の値（不正なステータスなど）が格納されていた場合。
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// クライアントに返すメッセージ
    ///
    /// データベースエラーはドライバのメッセージをそのまま返す。
    pub fn message(&self) -> String {
        match &self.kind {
            InfraErrorKind::Database(source) => source.to_string(),
            other => other.to_string(),
        }
    }

    /// 接続確立失敗エラーを生成する
    pub fn unavailable(attempts: u32, last_error: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unavailable {
                attempts,
                last_error: last_error.into(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Database(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

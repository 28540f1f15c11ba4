//! # ヘルスチェック共通型
//!
//! `/health`（liveness）と `/health/ready`（readiness）が返すレスポンス型。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// プロセスが応答できることだけを示す。DB には問い合わせない。
///
/// ## 使用例
///
/// ```
/// use todolist_shared::HealthResponse;
///
/// let response = HealthResponse {
///     status:  "healthy".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(response.status, "healthy");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 稼働状態（`"healthy"` または `"unhealthy"`）
    pub status:  String,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version: String,
}

/// 個別チェックの結果ステータス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// チェック成功
    Ok,
    /// チェック失敗
    Error,
}

/// Readiness 全体のステータス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    /// すべてのチェックが成功
    Ready,
    /// いずれかのチェックが失敗
    NotReady,
}

/// Readiness Check レスポンス
///
/// `checks` のキーはチェック名（現在は `"database"` のみ）。
///
/// ## 使用例
///
/// ```
/// use std::collections::HashMap;
///
/// use todolist_shared::{CheckStatus, ReadinessResponse, ReadinessStatus};
///
/// let mut checks = HashMap::new();
/// checks.insert("database".to_string(), CheckStatus::Ok);
/// let response = ReadinessResponse {
///     status: ReadinessStatus::Ready,
///     checks,
/// };
/// assert_eq!(response.status, ReadinessStatus::Ready);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// 全体のステータス
    pub status: ReadinessStatus,
    /// 個別チェック結果（キー: チェック名、値: ステータス）
    pub checks: HashMap<String, CheckStatus>,
}

impl ReadinessResponse {
    /// データベースの疎通結果からレスポンスを組み立てる
    pub fn from_database_check(reachable: bool) -> Self {
        let (status, check) = if reachable {
            (ReadinessStatus::Ready, CheckStatus::Ok)
        } else {
            (ReadinessStatus::NotReady, CheckStatus::Error)
        };
        Self {
            status,
            checks: HashMap::from([("database".to_string(), check)]),
        }
    }

    /// すべてのチェックが成功しているか
    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}

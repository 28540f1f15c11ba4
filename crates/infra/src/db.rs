//! # PostgreSQL 接続の確立
//!
//! 起動時にデータベースへの接続を確立する。
//!
//! ## 背景
//!
//! コンテナ環境ではアプリケーションと DB が同時に起動し、DB がまだ接続を
//! 受け付けていないことがある。そのため接続は一度で諦めず、
//! 「ハンドル作成 → ping」を固定間隔で再試行する。
//!
//! ```text
//! attempt 1: open ─ ping ✗ ── sleep(interval)
//! attempt 2: open ✗ ───────── sleep(interval)
//! attempt 3: open ─ ping ✓ ── PgPool を返す
//! ```
//!
//! - 失敗はすべて info レベルでログに残し、起動は止めない
//! - 接続文字列の不正も一時的な失敗と同じ扱いで再試行する
//! - 試行回数の上限（[`RetryPolicy::max_attempts`]）に達したら
//!   [`InfraErrorKind::Unavailable`](crate::error::InfraErrorKind::Unavailable) を返す
//!
//! ## 試行回数の上限
//!
//! [`RetryPolicy::default`] は 2 秒間隔で最大 30 回（約 1 分）試行して諦める。
//! DB の起動を無期限に待ちたい場合は [`RetryPolicy::unbounded`] を使う。
//! Todo Service では環境変数 `DATABASE_CONNECT_MAX_ATTEMPTS=0` がこれに当たる。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use todolist_infra::db::{self, PgConnector, RetryPolicy};
//!
//! let connector = PgConnector::new("postgres://user:password@db:5432/tododb");
//! let pool = db::establish(&connector, &RetryPolicy::default()).await?;
//! ```

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use sqlx::{
    Connection as _,
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::error::InfraError;

/// 再試行の方針
///
/// 待機間隔は固定で、試行ごとに伸ばすことはしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 試行間の待機時間
    pub interval:     Duration,
    /// 試行回数の上限（`None` なら無制限）
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

    pub fn new(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// 接続できるまで無制限に再試行する
    ///
    /// DB がいずれ起動することをオーケストレーターが保証している環境向け。
    pub fn unbounded(interval: Duration) -> Self {
        Self::new(interval, None)
    }

    /// `attempt` 回目の失敗で打ち切るかどうか
    fn is_exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max)
    }
}

impl Default for RetryPolicy {
    /// 2 秒間隔で最大 30 回
    ///
    /// 無制限に待つには [`RetryPolicy::unbounded`]（`DATABASE_CONNECT_MAX_ATTEMPTS=0`）。
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Some(Self::DEFAULT_MAX_ATTEMPTS))
    }
}

/// 接続ハンドルの作成と疎通確認
///
/// [`establish`] の再試行ループから呼ばれる 2 つの手順を定義する。
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// 接続ハンドル
    type Handle: Send + Sync;

    /// ハンドルを作成する
    async fn open(&self) -> Result<Self::Handle, InfraError>;

    /// ハンドルが使用可能か確認する
    async fn ping(&self, handle: &Self::Handle) -> Result<(), InfraError>;
}

/// PostgreSQL 用の [`StoreConnector`]
///
/// `open` は接続文字列を解析して遅延接続のプールを作るだけで、
/// 実際の接続は `ping` で行う。
#[derive(Debug, Clone)]
pub struct PgConnector {
    database_url:    String,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl PgConnector {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url:    database_url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Self::DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// プールの最大接続数を指定する
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// コネクション取得のタイムアウトを指定する
    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }
}

#[async_trait]
impl StoreConnector for PgConnector {
    type Handle = PgPool;

    async fn open(&self) -> Result<PgPool, InfraError> {
        let options = PgConnectOptions::from_str(&self.database_url)?;
        Ok(PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect_lazy_with(options))
    }

    async fn ping(&self, handle: &PgPool) -> Result<(), InfraError> {
        ping(handle).await
    }
}

/// プールから接続を 1 本取得して ping する
///
/// 起動時の疎通確認と readiness チェックの両方で使う。
pub async fn ping(pool: &PgPool) -> Result<(), InfraError> {
    let mut conn = pool.acquire().await?;
    conn.ping().await?;
    Ok(())
}

/// 接続が確立するまで再試行する
///
/// ping が成功したハンドルだけを返す。上限回数に達した場合は最後のエラーを
/// 含む `Unavailable` エラーを返す。
#[tracing::instrument(skip_all)]
pub async fn establish<C: StoreConnector>(
    connector: &C,
    policy: &RetryPolicy,
) -> Result<C::Handle, InfraError> {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let error = match connector.open().await {
            Ok(handle) => match connector.ping(&handle).await {
                Ok(()) => {
                    tracing::info!(attempt, "データベースの疎通を確認しました");
                    return Ok(handle);
                }
                Err(e) => {
                    tracing::info!(attempt, error = %e, "データベースに接続できませんでした");
                    e
                }
            },
            Err(e) => {
                tracing::info!(attempt, error = %e, "接続ハンドルの作成に失敗しました");
                e
            }
        };

        if policy.is_exhausted(attempt) {
            return Err(InfraError::unavailable(attempt, error.message()));
        }

        tracing::info!(
            interval_ms = policy.interval.as_millis() as u64,
            "再試行まで待機します"
        );
        tokio::time::sleep(policy.interval).await;
    }
}

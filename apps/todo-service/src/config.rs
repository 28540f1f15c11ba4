//! # Todo Service 設定
//!
//! 環境変数から Todo Service サーバーの設定を読み込む。
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|-----------|------|
//! | `TODO_HOST` | `0.0.0.0` | バインドアドレス |
//! | `TODO_PORT` | `8080` | ポート番号 |
//! | `DATABASE_URL` | `postgres://user:password@db:5432/tododb?sslmode=disable` | PostgreSQL 接続 URL |
//! | `DATABASE_MAX_CONNECTIONS` | `10` | プールの最大接続数 |
//! | `DATABASE_CONNECT_INTERVAL_SECS` | `2` | 起動時の接続再試行の間隔（秒） |
//! | `DATABASE_CONNECT_MAX_ATTEMPTS` | `30` | 起動時の接続試行回数の上限（`0` で無制限） |
//!
//! ログ形式（`LOG_FORMAT`）は [`todolist_shared::observability`] が読む。

use std::{env, str::FromStr, time::Duration};

use thiserror::Error;
use todolist_infra::db::{PgConnector, RetryPolicy};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "postgres://user:password@db:5432/tododb?sslmode=disable";

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 値を解釈できない
    #[error("環境変数 {name} の値が不正です: {value:?}")]
    InvalidValue {
        name:  &'static str,
        value: String,
    },
}

/// Todo Service サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// バインドアドレス
    pub host:     String,
    /// ポート番号
    pub port:     u16,
    /// データベース設定
    pub database: DatabaseConfig,
}

/// データベース接続の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// 接続 URL
    pub url:                  String,
    /// プールの最大接続数
    pub max_connections:      u32,
    /// 起動時の接続再試行の間隔
    pub connect_interval:     Duration,
    /// 起動時の接続試行回数の上限（`None` なら無制限）
    pub connect_max_attempts: Option<u32>,
}

impl TodoConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// `lookup` は変数名を受け取り、値があれば返す。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_attempts = parse_or(
            &lookup,
            "DATABASE_CONNECT_MAX_ATTEMPTS",
            RetryPolicy::DEFAULT_MAX_ATTEMPTS,
        )?;

        Ok(Self {
            host:     lookup("TODO_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port:     parse_or(&lookup, "TODO_PORT", DEFAULT_PORT)?,
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    PgConnector::DEFAULT_MAX_CONNECTIONS,
                )?,
                connect_interval: Duration::from_secs(parse_or(
                    &lookup,
                    "DATABASE_CONNECT_INTERVAL_SECS",
                    RetryPolicy::DEFAULT_INTERVAL.as_secs(),
                )?),
                connect_max_attempts: (max_attempts > 0).then_some(max_attempts),
            },
        })
    }

    /// バインドするアドレス（`host:port`）
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    /// 起動時の接続確立に使う [`PgConnector`]
    pub fn connector(&self) -> PgConnector {
        PgConnector::new(self.url.clone()).with_max_connections(self.max_connections)
    }

    /// 起動時の接続確立に使う [`RetryPolicy`]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.connect_interval, self.connect_max_attempts)
    }
}

/// 値があればパースし、なければデフォルト値を返す
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

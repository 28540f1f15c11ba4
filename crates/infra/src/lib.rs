//! # Todolist インフラ層
//!
//! 外部システム（PostgreSQL）との接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: 起動時の接続確立（再試行付き）と疎通確認
//! - **リポジトリ実装**: Todo の永続化
//!
//! ## 依存関係
//!
//! ```text
//! todo-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続確立と ping
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use todolist_infra::{db, repository::PostgresTodoRepository};
//!
//! let pool = db::establish(&db::PgConnector::new(url), &db::RetryPolicy::default()).await?;
//! let repo = PostgresTodoRepository::new(pool);
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};

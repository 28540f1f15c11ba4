//! # リポジトリ実装
//!
//! Todo の永続化を担当するリポジトリを提供する。
//!
//! ## 設計方針
//!
//! - **トレイト経由のアクセス**: ユースケースは [`TodoRepository`] だけに依存する
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化
//! - **テスタビリティ**: `test-utils` feature のモックで差し替え可能

pub mod todo_repository;

pub use todo_repository::{PostgresTodoRepository, TodoRepository};

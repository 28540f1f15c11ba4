//! # Todolist ドメイン層
//!
//! Todo サービスのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: [`todo::Todo`]（システムが管理する唯一のエンティティ）
//! - **値オブジェクト**: [`todo::TodoId`], [`todo::TodoStatus`]
//! - **ドメインエラー**: 入力検証の失敗などを表現する [`DomainError`]
//!
//! ## 依存関係の方向
//!
//! ```text
//! todo-service → infra → domain
//! ```
//!
//! ドメイン層は DB や HTTP に一切依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! use todolist_domain::todo::TodoStatus;
//!
//! let status: TodoStatus = "pending".parse().unwrap();
//! assert_eq!(status, TodoStatus::Pending);
//! assert!("Pending".parse::<TodoStatus>().is_err());
//! ```

pub mod clock;
pub mod error;
pub mod todo;

pub use error::DomainError;

//! # Todo
//!
//! システムが管理する唯一のエンティティ。
//!
//! ## 不変条件
//!
//! - `id` はサーバー側で採番され、作成後は変更されない
//! - `status` は `pending` / `completed` のいずれか
//! - `created_at` は作成時のサーバー時刻で、更新されない
//!
//! ステータス間の遷移制約はない。更新でいつでも任意の有効な値に置き換えられる。
//!
//! ## 使用例
//!
//! ```rust
//! use todolist_domain::todo::{Todo, TodoId, TodoStatus};
//!
//! let todo = Todo::new(
//!     TodoId::new(),
//!     "牛乳を買う".to_string(),
//!     TodoStatus::Pending,
//!     chrono::Utc::now(),
//! );
//! let done = todo.clone().with_content("牛乳を買う".to_string(), TodoStatus::Completed);
//!
//! assert_eq!(done.id(), todo.id());
//! assert_eq!(done.created_at(), todo.created_at());
//! assert_eq!(done.status(), TodoStatus::Completed);
//! ```

use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use uuid::Uuid;

use crate::DomainError;

/// ステータス不正時にクライアントへ返すメッセージ
pub const INVALID_STATUS_MESSAGE: &str =
    "不正なステータスです。'pending' または 'completed' を指定してください";

/// PostgreSQL の TIMESTAMPTZ はマイクロ秒精度
const TIMESTAMP_PRECISION_DIGITS: u16 = 6;

// =========================================================================
// TodoId
// =========================================================================

/// Todo の一意識別子
///
/// UUID v7 をラップする。外部には不透明な文字列として見せる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct TodoId(Uuid);

impl TodoId {
    /// 新しい ID を生成する（UUID v7）
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// 既存の UUID から ID を作成する
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// パスパラメータなどの文字列から復元する
    ///
    /// 形式が不正な文字列はどの Todo にも一致しないため `None` を返す。
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }

    /// 内部の UUID 参照を取得する
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// TodoStatus
// =========================================================================

/// Todo のステータス
///
/// 文字列表現は小文字（`"pending"`, `"completed"`）。
/// 比較は大文字小文字を区別する完全一致。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TodoStatus {
    /// 未完了
    Pending,
    /// 完了
    Completed,
}

impl TodoStatus {
    /// 文字列が有効なステータスかどうか
    pub fn is_valid(value: &str) -> bool {
        value.parse::<Self>().is_ok()
    }

    /// DB に格納する文字列表現
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl FromStr for TodoStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::Validation(INVALID_STATUS_MESSAGE.to_string())),
        }
    }
}

// =========================================================================
// Todo
// =========================================================================

/// Todo エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id:         TodoId,
    title:      String,
    status:     TodoStatus,
    created_at: DateTime<Utc>,
}

impl Todo {
    /// 新しい Todo を作成する
    ///
    /// `now` は DB に保存される精度に切り詰める。作成直後のレスポンスと
    /// その後の取得結果で `created_at` が一致するようにするため。
    pub fn new(id: TodoId, title: String, status: TodoStatus, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            status,
            created_at: now.trunc_subsecs(TIMESTAMP_PRECISION_DIGITS),
        }
    }

    /// データベースから復元する
    pub fn from_db(
        id: TodoId,
        title: String,
        status: TodoStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            status,
            created_at,
        }
    }

    /// タイトルとステータスを置き換えた Todo を返す
    ///
    /// `id` と `created_at` は引き継がれる。
    pub fn with_content(self, title: String, status: TodoStatus) -> Self {
        Self {
            title,
            status,
            ..self
        }
    }

    pub fn id(&self) -> &TodoId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> TodoStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

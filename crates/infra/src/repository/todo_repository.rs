//! # TodoRepository
//!
//! `todos` テーブルへの CRUD を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **存在確認をしない更新・削除**: `update` / `delete` は影響行数を返すだけで、
//!   0 件でもエラーにしない。扱いはユースケース層が決める
//! - **並び順**: 一覧系は `created_at, id` の昇順で返す
//! - **ステータスは文字列で保存**: 読み出し時に [`TodoStatus`] へ変換し、
//!   不正な値は [`InfraError::unexpected`] として扱う

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use todolist_domain::todo::{Todo, TodoId, TodoStatus};
use uuid::Uuid;

use crate::error::InfraError;

/// Todo リポジトリトレイト
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 全件を取得する
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError>;

    /// 指定ステータスの Todo を取得する
    async fn find_by_status(&self, status: TodoStatus) -> Result<Vec<Todo>, InfraError>;

    /// ID で Todo を検索する
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, InfraError>;

    /// Todo を挿入する
    async fn insert(&self, todo: &Todo) -> Result<(), InfraError>;

    /// タイトルとステータスを更新し、影響行数を返す
    async fn update(
        &self,
        id: &TodoId,
        title: &str,
        status: TodoStatus,
    ) -> Result<u64, InfraError>;

    /// Todo を削除し、影響行数を返す
    async fn delete(&self, id: &TodoId) -> Result<u64, InfraError>;
}

/// `todos` テーブルの 1 行
#[derive(Debug, FromRow)]
struct TodoRow {
    id:         Uuid,
    title:      String,
    status:     String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = InfraError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<TodoStatus>().map_err(|_| {
            InfraError::unexpected(format!(
                "todos.status に不正な値が格納されています: {}",
                row.status
            ))
        })?;

        Ok(Todo::from_db(
            TodoId::from_uuid(row.id),
            row.title,
            status,
            row.created_at,
        ))
    }
}

fn into_todos(rows: Vec<TodoRow>) -> Result<Vec<Todo>, InfraError> {
    rows.into_iter().map(Todo::try_from).collect()
}

/// PostgreSQL 実装の TodoRepository
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, status, created_at
            FROM todos
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        into_todos(rows)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%status))]
    async fn find_by_status(&self, status: TodoStatus) -> Result<Vec<Todo>, InfraError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, status, created_at
            FROM todos
            WHERE status = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        into_todos(rows)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, status, created_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %todo.id()))]
    async fn insert(&self, todo: &Todo) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO todos (id, title, status, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(todo.id().as_uuid())
        .bind(todo.title())
        .bind(todo.status().as_str())
        .bind(todo.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %status))]
    async fn update(
        &self,
        id: &TodoId,
        title: &str,
        status: TodoStatus,
    ) -> Result<u64, InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET title = $2, status = $3
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(title)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &TodoId) -> Result<u64, InfraError> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

//! # テスト用モックリポジトリ
//!
//! ハンドラ・ユースケーステストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todolist-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todolist_domain::todo::{Todo, TodoId, TodoStatus};

use crate::{error::InfraError, repository::TodoRepository};

// ===== MockTodoRepository =====

/// `Vec` に Todo を保持するモック
///
/// 並び順は PostgreSQL 実装と同じく `created_at, id` の昇順。
#[derive(Clone, Default)]
pub struct MockTodoRepository {
    todos: Arc<Mutex<Vec<Todo>>>,
}

impl MockTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_todo(&self, todo: Todo) {
        self.todos.lock().unwrap().push(todo);
    }

    /// 保持している全 Todo のスナップショット
    pub fn todos(&self) -> Vec<Todo> {
        let mut todos = self.todos.lock().unwrap().clone();
        sort(&mut todos);
        todos
    }
}

fn sort(todos: &mut [Todo]) {
    todos.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
    });
}

#[async_trait]
impl TodoRepository for MockTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        Ok(self.todos())
    }

    async fn find_by_status(&self, status: TodoStatus) -> Result<Vec<Todo>, InfraError> {
        Ok(self
            .todos()
            .into_iter()
            .filter(|t| t.status() == status)
            .collect())
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, InfraError> {
        Ok(self
            .todos
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id() == id)
            .cloned())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), InfraError> {
        self.todos.lock().unwrap().push(todo.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &TodoId,
        title: &str,
        status: TodoStatus,
    ) -> Result<u64, InfraError> {
        let mut todos = self.todos.lock().unwrap();
        let Some(pos) = todos.iter().position(|t| t.id() == id) else {
            return Ok(0);
        };
        let current = todos.remove(pos);
        todos.insert(pos, current.with_content(title.to_string(), status));
        Ok(1)
    }

    async fn delete(&self, id: &TodoId) -> Result<u64, InfraError> {
        let mut todos = self.todos.lock().unwrap();
        let before = todos.len();
        todos.retain(|t| t.id() != id);
        Ok((before - todos.len()) as u64)
    }
}

// ===== FailingTodoRepository =====

/// すべての操作がデータベースエラーを返すモック
///
/// ストア障害時に 500 を返す経路のテストに使う。
#[derive(Clone, Default)]
pub struct FailingTodoRepository;

impl FailingTodoRepository {
    /// 返却されるエラーのメッセージ
    pub fn error_message() -> String {
        sqlx::Error::PoolTimedOut.to_string()
    }

    fn error() -> InfraError {
        sqlx::Error::PoolTimedOut.into()
    }
}

#[async_trait]
impl TodoRepository for FailingTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        Err(Self::error())
    }

    async fn find_by_status(&self, _status: TodoStatus) -> Result<Vec<Todo>, InfraError> {
        Err(Self::error())
    }

    async fn find_by_id(&self, _id: &TodoId) -> Result<Option<Todo>, InfraError> {
        Err(Self::error())
    }

    async fn insert(&self, _todo: &Todo) -> Result<(), InfraError> {
        Err(Self::error())
    }

    async fn update(
        &self,
        _id: &TodoId,
        _title: &str,
        _status: TodoStatus,
    ) -> Result<u64, InfraError> {
        Err(Self::error())
    }

    async fn delete(&self, _id: &TodoId) -> Result<u64, InfraError> {
        Err(Self::error())
    }
}

//! Todo 管理ユースケース

use std::sync::Arc;

use todolist_domain::{
    DomainError,
    clock::Clock,
    todo::{Todo, TodoId, TodoStatus},
};
use todolist_infra::repository::TodoRepository;

use crate::error::CoreError;

/// 作成・更新の入力
///
/// `status` は未検証の文字列。ユースケース内で [`TodoStatus`] に変換する。
#[derive(Debug, Clone)]
pub struct TodoInput {
    pub title:  String,
    pub status: String,
}

/// Todo 管理ユースケース
pub struct TodoUseCaseImpl {
    todo_repository: Arc<dyn TodoRepository>,
    clock:           Arc<dyn Clock>,
}

impl TodoUseCaseImpl {
    pub fn new(todo_repository: Arc<dyn TodoRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            todo_repository,
            clock,
        }
    }

    /// Todo 一覧を取得する
    ///
    /// `status` が未指定または空文字列ならフィルタしない。
    /// それ以外の値は有効なステータスでなければ 400。
    pub async fn list_todos(&self, status: Option<&str>) -> Result<Vec<Todo>, CoreError> {
        let todos = match status.filter(|s| !s.is_empty()) {
            None => self.todo_repository.find_all().await?,
            Some(value) => {
                let status = value.parse::<TodoStatus>()?;
                self.todo_repository.find_by_status(status).await?
            }
        };
        Ok(todos)
    }

    /// Todo を 1 件取得する
    ///
    /// 形式が不正な ID はどの Todo にも一致しないため 404。
    pub async fn get_todo(&self, id: &str) -> Result<Todo, CoreError> {
        let not_found = || DomainError::NotFound {
            entity_type: "Todo",
            id:          id.to_string(),
        };

        let todo_id = TodoId::parse(id).ok_or_else(not_found)?;
        let todo = self
            .todo_repository
            .find_by_id(&todo_id)
            .await?
            .ok_or_else(not_found)?;

        Ok(todo)
    }

    /// Todo を作成する
    ///
    /// ID と作成日時はサーバー側で決める。
    pub async fn create_todo(&self, input: TodoInput) -> Result<Todo, CoreError> {
        let status = input.status.parse::<TodoStatus>()?;
        let todo = Todo::new(TodoId::new(), input.title, status, self.clock.now());

        self.todo_repository.insert(&todo).await?;

        tracing::info!(id = %todo.id(), "Todo を作成しました");
        Ok(todo)
    }

    /// Todo のタイトルとステータスを更新する
    ///
    /// 存在確認はしない。該当する Todo がなくても成功として扱い、
    /// 警告ログだけを残す。ステータスの検証は ID より先に行う。
    pub async fn update_todo(&self, id: &str, input: TodoInput) -> Result<(), CoreError> {
        let status = input.status.parse::<TodoStatus>()?;

        let Some(todo_id) = TodoId::parse(id) else {
            tracing::warn!(id, "形式が不正な ID のため更新対象がありません");
            return Ok(());
        };

        let affected = self
            .todo_repository
            .update(&todo_id, &input.title, status)
            .await?;
        if affected == 0 {
            tracing::warn!(%todo_id, "更新対象の Todo が存在しません");
        }

        Ok(())
    }

    /// Todo を削除する
    ///
    /// 更新と同様、存在しない ID でも成功として扱う。
    pub async fn delete_todo(&self, id: &str) -> Result<(), CoreError> {
        let Some(todo_id) = TodoId::parse(id) else {
            tracing::warn!(id, "形式が不正な ID のため削除対象がありません");
            return Ok(());
        };

        let affected = self.todo_repository.delete(&todo_id).await?;
        if affected == 0 {
            tracing::warn!(%todo_id, "削除対象の Todo が存在しません");
        }

        Ok(())
    }
}

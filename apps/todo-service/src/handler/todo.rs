//! # Todo ハンドラ
//!
//! Todo の CRUD API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /todos` - Todo 一覧（`?status=` で絞り込み）
//! - `GET /todos/{id}` - Todo 取得
//! - `POST /todos` - Todo 作成
//! - `PUT /todos/{id}` - Todo 更新
//! - `DELETE /todos/{id}` - Todo 削除

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path,
        Query,
        State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize, de::IgnoredAny};
use todolist_domain::todo::{Todo, TodoStatus};
use todolist_shared::MessageResponse;

use crate::{
    error::CoreError,
    usecase::todo::{TodoInput, TodoUseCaseImpl},
};

/// Todo API の共有状態
pub struct TodoState {
    pub usecase: TodoUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 一覧の絞り込み条件
///
/// `status` が複数指定された場合は最初の値を使う。
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListTodosQuery {
    pub status: Option<String>,
}

impl ListTodosQuery {
    /// クエリ文字列のキーと値の組から組み立てる
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let status = pairs
            .into_iter()
            .find(|(key, _)| key == "status")
            .map(|(_, value)| value);
        Self { status }
    }
}

/// 作成・更新リクエスト
///
/// `id` と `createdAt` はレスポンスと同じ形のボディを送り返せるよう受け付けるが、
/// 値は使わない。それ以外の未知のフィールドは 400。
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoRequest {
    pub title:   String,
    pub status:  String,
    #[serde(default, rename = "id")]
    _id:         Option<IgnoredAny>,
    #[serde(default, rename = "createdAt")]
    _created_at: Option<IgnoredAny>,
}

impl From<TodoRequest> for TodoInput {
    fn from(req: TodoRequest) -> Self {
        Self {
            title:  req.title,
            status: req.status,
        }
    }
}

/// Todo DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoDto {
    pub id:         String,
    pub title:      String,
    pub status:     TodoStatus,
    pub created_at: String,
}

impl From<&Todo> for TodoDto {
    fn from(todo: &Todo) -> Self {
        Self {
            id:         todo.id().to_string(),
            title:      todo.title().to_string(),
            status:     todo.status(),
            created_at: todo.created_at().to_rfc3339(),
        }
    }
}

// --- ハンドラ ---

/// GET /todos
///
/// `status` が空または未指定なら全件、それ以外は一致するものだけを返す。
#[tracing::instrument(skip_all)]
pub async fn list_todos(
    State(state): State<Arc<TodoState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, CoreError> {
    let Query(pairs) = query?;
    let query = ListTodosQuery::from_pairs(pairs);

    let todos = state.usecase.list_todos(query.status.as_deref()).await?;

    let items: Vec<TodoDto> = todos.iter().map(TodoDto::from).collect();
    Ok((StatusCode::OK, Json(items)))
}

/// GET /todos/{id}
///
/// ## レスポンス
///
/// - `200 OK`: Todo
/// - `404 Not Found`: 該当する Todo がない（ID の形式が不正な場合を含む）
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_todo(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
    let todo = state.usecase.get_todo(&id).await?;

    Ok((StatusCode::OK, Json(TodoDto::from(&todo))))
}

/// POST /todos
///
/// ## レスポンス
///
/// - `201 Created`: 作成された Todo
/// - `400 Bad Request`: ボディ不正、ステータス不正
#[tracing::instrument(skip_all)]
pub async fn create_todo(
    State(state): State<Arc<TodoState>>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CoreError> {
    let Json(req) = payload?;

    let todo = state.usecase.create_todo(req.into()).await?;

    Ok((StatusCode::CREATED, Json(TodoDto::from(&todo))))
}

/// PUT /todos/{id}
///
/// 該当する Todo がなくても 200 を返す。
///
/// ## レスポンス
///
/// - `200 OK`: 確認メッセージ
/// - `400 Bad Request`: ボディ不正、ステータス不正
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_todo(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CoreError> {
    let Json(req) = payload?;

    state.usecase.update_todo(&id, req.into()).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Todo を更新しました")),
    ))
}

/// DELETE /todos/{id}
///
/// 該当する Todo がなくても 200 を返す。
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_todo(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
    state.usecase.delete_todo(&id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Todo を削除しました")),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
        routing::get,
    };
    use pretty_assertions::assert_eq;
    use todolist_domain::{
        clock::{Clock as _, FixedClock},
        todo::{INVALID_STATUS_MESSAGE, TodoId},
    };
    use todolist_infra::{
        mock::{FailingTodoRepository, MockTodoRepository},
        repository::TodoRepository,
    };
    use todolist_shared::ErrorResponse;
    use tower::ServiceExt;

    use super::*;

    // --- テストヘルパー ---

    fn create_test_app(repo: impl TodoRepository + 'static) -> Router {
        let usecase = TodoUseCaseImpl::new(
            Arc::new(repo),
            Arc::new(FixedClock::at_timestamp(1_700_000_000)),
        );
        let state = Arc::new(TodoState { usecase });

        Router::new()
            .route("/todos", get(list_todos).post(create_todo))
            .route(
                "/todos/{id}",
                get(get_todo).put(update_todo).delete(delete_todo),
            )
            .with_state(state)
    }

    async fn response_body<T: serde::de::DeserializeOwned>(
        response: axum::http::Response<Body>,
    ) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn seeded_repo() -> (MockTodoRepository, Todo) {
        let repo = MockTodoRepository::new();
        let todo = Todo::new(
            TodoId::new(),
            "牛乳を買う".to_string(),
            TodoStatus::Pending,
            FixedClock::at_timestamp(1_600_000_000).now(),
        );
        repo.add_todo(todo.clone());
        (repo, todo)
    }

    // --- テストケース ---

    #[tokio::test]
    async fn test_post_todos正常系_201で作成されたtodoが返る() {
        let repo = MockTodoRepository::new();
        let sut = create_test_app(repo.clone());

        let response = sut
            .oneshot(json_request(
                Method::POST,
                "/todos",
                serde_json::json!({ "title": "牛乳を買う", "status": "pending" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: TodoDto = response_body(response).await;
        assert!(!body.id.is_empty());
        assert_eq!(body.title, "牛乳を買う");
        assert_eq!(body.status, TodoStatus::Pending);
        assert_eq!(body.created_at, "2023-11-14T22:13:20+00:00");
        assert_eq!(repo.todos().len(), 1);
    }

    #[tokio::test]
    async fn test_post_todosはクライアント指定のidと作成日時を無視する() {
        let repo = MockTodoRepository::new();
        let sut = create_test_app(repo.clone());

        let response = sut
            .oneshot(json_request(
                Method::POST,
                "/todos",
                serde_json::json!({
                    "id": "client-id",
                    "title": "牛乳を買う",
                    "status": "completed",
                    "createdAt": "1999-01-01T00:00:00Z"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: TodoDto = response_body(response).await;
        assert_ne!(body.id, "client-id");
        assert_eq!(body.created_at, "2023-11-14T22:13:20+00:00");
    }

    #[tokio::test]
    async fn test_post_todos不正なステータスで400が返り保存されない() {
        let repo = MockTodoRepository::new();
        let sut = create_test_app(repo.clone());

        let response = sut
            .oneshot(json_request(
                Method::POST,
                "/todos",
                serde_json::json!({ "title": "牛乳を買う", "status": "done" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response_body(response).await;
        assert_eq!(body.error, INVALID_STATUS_MESSAGE);
        assert!(repo.todos().is_empty());
    }

    #[tokio::test]
    async fn test_post_todos不正なボディで400が返る() {
        let cases = [
            serde_json::json!({ "title": "statusなし" }),
            serde_json::json!({ "status": "pending" }),
            serde_json::json!({ "title": 1, "status": "pending" }),
            serde_json::json!({ "title": "x", "status": "pending", "priority": 1 }),
            serde_json::json!("牛乳を買う"),
        ];

        for body in cases {
            let repo = MockTodoRepository::new();
            let sut = create_test_app(repo.clone());

            let response = sut
                .oneshot(json_request(Method::POST, "/todos", body.clone()))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let error: ErrorResponse = response_body(response).await;
            assert!(!error.error.is_empty());
            assert!(repo.todos().is_empty());
        }
    }

    #[tokio::test]
    async fn test_post_todos壊れたjsonで400が返る() {
        let sut = create_test_app(MockTodoRepository::new());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/todos")
            .header("content-type", "application/json")
            .body(Body::from("{\"title\": "))
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_post_todos_content_typeなしで400が返る() {
        let sut = create_test_app(MockTodoRepository::new());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/todos")
            .body(Body::from(r#"{"title":"x","status":"pending"}"#))
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_todos正常系_200で全件が返る() {
        let (repo, todo) = seeded_repo();
        let sut = create_test_app(repo);

        let response = sut.oneshot(get_request("/todos")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Vec<TodoDto> = response_body(response).await;
        assert_eq!(body, vec![TodoDto::from(&todo)]);
    }

    #[tokio::test]
    async fn test_get_todos空のストアで空配列が返る() {
        let sut = create_test_app(MockTodoRepository::new());

        let response = sut.oneshot(get_request("/todos")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response_body(response).await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_get_todos_statusで絞り込める() {
        let (repo, _pending) = seeded_repo();
        let completed = Todo::new(
            TodoId::new(),
            "掃除".to_string(),
            TodoStatus::Completed,
            FixedClock::at_timestamp(1_650_000_000).now(),
        );
        repo.add_todo(completed.clone());
        let sut = create_test_app(repo);

        let response = sut
            .oneshot(get_request("/todos?status=completed"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Vec<TodoDto> = response_body(response).await;
        assert_eq!(body, vec![TodoDto::from(&completed)]);
    }

    #[tokio::test]
    async fn test_get_todos_statusが複数あれば最初の値で絞り込む() {
        let (repo, pending) = seeded_repo();
        repo.add_todo(Todo::new(
            TodoId::new(),
            "掃除".to_string(),
            TodoStatus::Completed,
            FixedClock::at_timestamp(1_650_000_000).now(),
        ));
        let sut = create_test_app(repo);

        let response = sut
            .oneshot(get_request("/todos?status=pending&status=completed"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Vec<TodoDto> = response_body(response).await;
        assert_eq!(body, vec![TodoDto::from(&pending)]);
    }

    #[test]
    fn test_list_todos_queryは最初のstatusを採用し他のキーは無視する() {
        let pairs = vec![
            ("page".to_string(), "2".to_string()),
            ("status".to_string(), "completed".to_string()),
            ("status".to_string(), "pending".to_string()),
        ];

        assert_eq!(
            ListTodosQuery::from_pairs(pairs),
            ListTodosQuery {
                status: Some("completed".to_string()),
            }
        );
        assert_eq!(ListTodosQuery::from_pairs(Vec::new()), ListTodosQuery::default());
    }

    #[tokio::test]
    async fn test_get_todos_不正なstatusで400が返る() {
        let sut = create_test_app(MockTodoRepository::new());

        let response = sut
            .oneshot(get_request("/todos?status=Completed"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response_body(response).await;
        assert_eq!(body.error, INVALID_STATUS_MESSAGE);
    }

    #[tokio::test]
    async fn test_get_todo正常系_200でtodoが返る() {
        let (repo, todo) = seeded_repo();
        let sut = create_test_app(repo);

        let response = sut
            .oneshot(get_request(&format!("/todos/{}", todo.id())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response_body(response).await;
        assert_eq!(
            body,
            serde_json::json!({
                "id": todo.id().to_string(),
                "title": "牛乳を買う",
                "status": "pending",
                "createdAt": "2020-09-13T12:26:40+00:00"
            })
        );
    }

    #[tokio::test]
    async fn test_get_todo存在しないidで404が返る() {
        for id in [TodoId::new().to_string(), "42".to_string()] {
            let sut = create_test_app(MockTodoRepository::new());

            let response = sut
                .oneshot(get_request(&format!("/todos/{id}")))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let body: ErrorResponse = response_body(response).await;
            assert!(body.error.contains(&id));
        }
    }

    #[tokio::test]
    async fn test_put_todo正常系_200でメッセージが返る() {
        let (repo, todo) = seeded_repo();
        let sut = create_test_app(repo.clone());

        let response = sut
            .oneshot(json_request(
                Method::PUT,
                &format!("/todos/{}", todo.id()),
                serde_json::json!({ "title": "豆乳を買う", "status": "completed" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = response_body(response).await;
        assert_eq!(body, MessageResponse::new("Todo を更新しました"));
        let stored = repo.todos().remove(0);
        assert_eq!(stored.title(), "豆乳を買う");
        assert_eq!(stored.status(), TodoStatus::Completed);
        assert_eq!(stored.created_at(), todo.created_at());
    }

    #[tokio::test]
    async fn test_put_todo存在しないidでも200が返る() {
        let sut = create_test_app(MockTodoRepository::new());

        let response = sut
            .oneshot(json_request(
                Method::PUT,
                &format!("/todos/{}", TodoId::new()),
                serde_json::json!({ "title": "x", "status": "pending" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_put_todo不正なステータスで400が返り変更されない() {
        let (repo, todo) = seeded_repo();
        let sut = create_test_app(repo.clone());

        let response = sut
            .oneshot(json_request(
                Method::PUT,
                &format!("/todos/{}", todo.id()),
                serde_json::json!({ "title": "x", "status": "archived" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(repo.todos(), vec![todo]);
    }

    #[tokio::test]
    async fn test_delete_todo正常系_200でメッセージが返り削除される() {
        let (repo, todo) = seeded_repo();
        let sut = create_test_app(repo.clone());

        let response = sut
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/todos/{}", todo.id()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = response_body(response).await;
        assert_eq!(body, MessageResponse::new("Todo を削除しました"));
        assert!(repo.todos().is_empty());
    }

    #[tokio::test]
    async fn test_ストア障害時は500でドライバのメッセージが返る() {
        let sut = create_test_app(FailingTodoRepository);

        let response = sut.oneshot(get_request("/todos")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = response_body(response).await;
        assert_eq!(body.error, FailingTodoRepository::error_message());
    }
}

//! # ルーター構築
//!
//! ハンドラと共有状態を組み合わせて axum の [`Router`] を作る。
//! `main` と統合テストの両方から使う。

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handler::{
    ReadinessState,
    TodoState,
    create_todo,
    delete_todo,
    get_todo,
    health_check,
    list_todos,
    readiness_check,
    update_todo,
};

/// Todo API のルート
pub fn todo_routes(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

/// ヘルスチェックのルート
pub fn health_routes(state: Arc<ReadinessState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .with_state(state)
}

/// アプリケーション全体のルーターを構築する
///
/// すべてのリクエストに `TraceLayer` のスパンが付く。
pub fn build_router(todo_state: Arc<TodoState>, readiness_state: Arc<ReadinessState>) -> Router {
    Router::new()
        .merge(todo_routes(todo_state))
        .merge(health_routes(readiness_state))
        .layer(TraceLayer::new_for_http())
}

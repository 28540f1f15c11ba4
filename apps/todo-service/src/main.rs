//! # Todo Service サーバー
//!
//! Todo の CRUD API を提供する HTTP サーバー。
//!
//! ## 起動シーケンス
//!
//! 1. `.env` の読み込みとトレーシング初期化
//! 2. 環境変数から設定を読み込む（[`todolist_todo_service::config`]）
//! 3. DB への接続を確立する（DB の起動を待って再試行する）
//! 4. リポジトリ・ユースケースを組み立ててサーバーを起動する
//!
//! SIGINT / SIGTERM を受けると処理中のリクエストを終えてから停止し、
//! 接続プールを閉じる。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p todolist-todo-service
//!
//! # 本番環境
//! LOG_FORMAT=json DATABASE_URL=postgres://... cargo run -p todolist-todo-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use todolist_domain::clock::SystemClock;
use todolist_infra::{
    db,
    repository::{PostgresTodoRepository, TodoRepository},
};
use todolist_shared::observability::{self, TracingConfig};
use todolist_todo_service::{
    app::build_router,
    config::TodoConfig,
    handler::{ReadinessState, TodoState},
    usecase::TodoUseCaseImpl,
};
use tokio::net::TcpListener;

/// Todo Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    observability::init_tracing(TracingConfig::from_env("todo-service"));
    let _tracing_guard = tracing::info_span!("app", service = "todo-service").entered();

    let config = TodoConfig::from_env()?;

    tracing::info!(
        "Todo Service サーバーを起動します: {}",
        config.bind_address()
    );

    // DB が接続を受け付けるまで待つ
    let pool = db::establish(
        &config.database.connector(),
        &config.database.retry_policy(),
    )
    .await?;
    tracing::info!("データベースに接続しました");

    let todo_repository: Arc<dyn TodoRepository> =
        Arc::new(PostgresTodoRepository::new(pool.clone()));
    let usecase = TodoUseCaseImpl::new(todo_repository, Arc::new(SystemClock));
    let todo_state = Arc::new(TodoState { usecase });
    let readiness_state = Arc::new(ReadinessState { pool: pool.clone() });

    let app = build_router(todo_state, readiness_state);

    let addr: SocketAddr = config.bind_address().parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Todo Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Todo Service サーバーを停止しました");

    Ok(())
}

/// SIGINT（Ctrl+C）または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "SIGINT ハンドラを登録できませんでした");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラを登録できませんでした");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT を受信しました。停止します"),
        () = terminate => tracing::info!("SIGTERM を受信しました。停止します"),
    }
}

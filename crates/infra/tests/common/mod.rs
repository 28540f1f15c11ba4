//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するスキーマ作成・
//! エンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use todolist_domain::todo::{Todo, TodoId, TodoStatus};

/// リポジトリルートの schema.sql
const SCHEMA: &str = include_str!("../../../../schema.sql");

/// テスト用 DB に todos テーブルを作成する
pub async fn setup_schema(pool: &PgPool) {
    sqlx::raw_sql(SCHEMA).execute(pool).await.unwrap();
}

/// テスト用の固定日時
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// 基準時刻から `offset_secs` 秒後に作成された Todo
pub fn create_test_todo(title: &str, status: TodoStatus, offset_secs: i64) -> Todo {
    Todo::new(
        TodoId::new(),
        title.to_string(),
        status,
        test_now() + Duration::seconds(offset_secs),
    )
}

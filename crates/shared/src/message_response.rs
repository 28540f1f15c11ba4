//! # 確認メッセージレスポンス
//!
//! 更新・削除の成功時に返す `{"message": "..."}` 形式のボディ。

use serde::{Deserialize, Serialize};

/// 確認メッセージレスポンス
///
/// ## 使用例
///
/// ```
/// use todolist_shared::MessageResponse;
///
/// let response = MessageResponse::new("Todo を削除しました");
/// assert_eq!(response.message, "Todo を削除しました");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

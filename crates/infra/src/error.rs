//! # インフラ層エラー定義
//!
//! 外部サービス（ユーザーレコードストア、オブジェクトストレージ）との通信で
//! 発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **HTTP クライアントエラーの集約**: 本サービスの外部到達はすべて REST API 経由の
//!   ため、reqwest のエラーをそのままラップする
//! - **API エラーの保持**: 非 2xx レスポンスはステータスとボディを保持し、
//!   ログから原因を追えるようにする

use thiserror::Error;

/// インフラ層で発生するエラー
#[derive(Debug, Error)]
pub enum InfraError {
    /// HTTP リクエストの失敗（接続エラー、タイムアウトなど）
    #[error("HTTP リクエストに失敗: {0}")]
    Http(#[from] reqwest::Error),

    /// API が非 2xx を返した
    #[error("API エラー ({status}): {body}")]
    Api {
        /// HTTP ステータスコード
        status: u16,
        /// レスポンスボディ
        body:   String,
    },

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn api_errorのdisplayがステータスとボディを含む() {
        let err = InfraError::Api {
            status: 404,
            body:   "Object not found".to_string(),
        };
        assert_eq!(format!("{err}"), "API エラー (404): Object not found");
    }

    #[test]
    fn エラーはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InfraError>();
    }
}

//! # SeisanFlow Notifier
//!
//! 精算レコードの承認をトリガーに通知メールを送信する Webhook サービス。
//! ルーター構築を [`build_router`] として公開し、統合テストから
//! モックのインフラ実装を注入した状態で全ルートを検証できるようにする。

pub mod config;
pub mod error;
pub mod handler;
pub mod observability;
pub mod usecase;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handler::{WebhookState, bill_approved, health_check};

/// Notifier のルーターを構築する
///
/// - `GET /health` - ヘルスチェック
/// - `POST /webhooks/bill-approved` - 承認トリガーの Webhook
///   （POST 以外のメソッドは axum が 405 を返す）
pub fn build_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhooks/bill-approved", post(bill_approved))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

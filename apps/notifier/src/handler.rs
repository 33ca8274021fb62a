//! # HTTP ハンドラ
//!
//! Notifier のエンドポイント実装。

pub mod approval_webhook;
pub mod health;

pub use approval_webhook::{WebhookState, bill_approved};
pub use health::health_check;

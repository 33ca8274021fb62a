//! # ユースケース
//!
//! 承認通知メールのビジネスロジックを実装する。
//!
//! ## モジュール構成
//!
//! - [`approval_email`] - ステータス判定 → プロフィール解決 → 添付収集 → 送信の直列パイプライン
//! - [`template_renderer`] - tera テンプレートエンジンによるメール生成

pub mod approval_email;
pub mod template_renderer;

pub use approval_email::{ApprovalEmailOutcome, ApprovalEmailUseCase};
pub use template_renderer::TemplateRenderer;

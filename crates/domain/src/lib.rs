//! # SeisanFlow ドメインモデル
//!
//! 経費精算の承認通知に関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - 外部サービス（DB、ストレージ、メールプロバイダー）への依存を持たない
//! - すべてのエンティティはリクエストごとに再構築され、レスポンス送信後に破棄される
//! - I/O を伴わない純粋なロジック（金額整形、ファイル名導出、承認判定）をここに集約する

pub mod bill;
pub mod employee;
pub mod notification;

pub use bill::{AttachmentKind, AttachmentSource, BillRecord};
pub use employee::EmployeeProfile;
pub use notification::{EmailAttachment, EmailMessage, NotificationError};

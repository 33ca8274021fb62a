//! # SeisanFlow インフラストラクチャ層
//!
//! 3 つの外部サービスへの狭いケイパビリティインターフェースを提供する:
//!
//! - [`repository::EmployeeRepository`] - ユーザーレコードストアからのプロフィール取得
//! - [`storage::ReceiptStorage`] - オブジェクトストレージからの領収書ダウンロード
//! - [`notification::NotificationSender`] - メールプロバイダーへの送信
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: ユースケース層はインメモリのフェイクに差し替え可能
//! - **HTTP クライアントベース**: 3 サービスともバックエンドの REST API 経由で到達する
//!   （本サービスは DB 接続を一切保持しない）
//! - **テストユーティリティ**: `test-utils` feature でモック実装を公開する

pub mod error;
pub mod notification;
pub mod repository;
pub mod storage;

#[cfg(feature = "test-utils")]
pub mod mock;

pub use error::InfraError;

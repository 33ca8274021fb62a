//! # Notifier エラー定義
//!
//! Webhook 処理で発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## ステータスコードの対応
//!
//! | エラー | ステータス |
//! |--------|-----------|
//! | record 欠落・不正 | 400 |
//! | プロフィール取得失敗・該当なし | 500 |
//! | メール送信失敗（プロバイダー/トランスポート） | 500 |
//!
//! 添付ファイルのダウンロード失敗はエラーにせず、警告ログのみでスキップする
//! （ユースケース層で処理）。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use seisanflow_domain::NotificationError;
use seisanflow_infra::InfraError;
use serde::Serialize;
use thiserror::Error;

/// エラーレスポンス（RFC 9457 Problem Details）
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

/// Notifier で発生するエラー
#[derive(Debug, Error)]
pub enum NotifierError {
    /// ペイロードに record が含まれていない
    #[error("ペイロードに record が含まれていません")]
    MissingRecord,

    /// record のデシリアライズに失敗
    #[error("record の形式が不正です: {0}")]
    InvalidRecord(String),

    /// ユーザーレコードストアへの問い合わせに失敗
    #[error("従業員プロフィールの取得に失敗: {0}")]
    ProfileLookup(#[from] InfraError),

    /// 該当する従業員プロフィールが存在しない
    #[error("従業員プロフィールが見つかりません: user_id={0}")]
    ProfileNotFound(String),

    /// メール送信に失敗（プロバイダーエラーまたはトランスポート例外）
    #[error("通知エラー: {0}")]
    Notification(#[from] NotificationError),
}

impl IntoResponse for NotifierError {
    fn into_response(self) -> Response {
        let (status, error_type, title, detail) = match &self {
            NotifierError::MissingRecord => {
                tracing::error!("トリガーペイロードに record がありません");
                (
                    StatusCode::BAD_REQUEST,
                    "https://seisanflow.example.com/errors/missing-record",
                    "Missing Record",
                    "No bill record found".to_string(),
                )
            }
            NotifierError::InvalidRecord(msg) => {
                tracing::error!(error = %msg, "record のデシリアライズに失敗");
                (
                    StatusCode::BAD_REQUEST,
                    "https://seisanflow.example.com/errors/invalid-record",
                    "Invalid Record",
                    "Bill record is malformed".to_string(),
                )
            }
            NotifierError::ProfileLookup(e) => {
                tracing::error!(error = %e, "従業員プロフィールの取得に失敗");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "https://seisanflow.example.com/errors/profile-not-found",
                    "Profile Lookup Failed",
                    "Employee profile not found".to_string(),
                )
            }
            NotifierError::ProfileNotFound(user_id) => {
                tracing::error!(user_id = %user_id, "従業員プロフィールが見つかりません");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "https://seisanflow.example.com/errors/profile-not-found",
                    "Profile Lookup Failed",
                    "Employee profile not found".to_string(),
                )
            }
            NotifierError::Notification(e) => {
                tracing::error!(error = %e, "メール送信に失敗");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "https://seisanflow.example.com/errors/email-send-failed",
                    "Email Send Failed",
                    e.to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error_type: error_type.to_string(),
                title: title.to_string(),
                status: status.as_u16(),
                detail,
            }),
        )
            .into_response()
    }
}

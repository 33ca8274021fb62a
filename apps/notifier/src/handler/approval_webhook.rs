//! # 承認 Webhook ハンドラ
//!
//! 精算レコードのステータスが `approved` に変わったときにデータベーストリガーから
//! 呼び出されるエンドポイント。
//!
//! ## エンドポイント
//!
//! - `POST /webhooks/bill-approved` - トリガーペイロード `{ "record": <bills 行> }` を受信
//!
//! メソッドは POST のみ登録しており、それ以外は axum のメソッドルーティングが
//! 405 を返す。
//!
//! ## レスポンス
//!
//! | ケース | ステータス | ボディ |
//! |--------|-----------|--------|
//! | 送信成功 | 200 | `{"message": "Email sent"}` |
//! | 未承認ステータス（意図的な no-op） | 200 | `{"message": "Bill not approved, no email sent"}` |
//! | record 欠落・不正 | 400 | Problem Details |
//! | プロフィール取得失敗・送信失敗 | 500 | Problem Details |

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use seisanflow_domain::BillRecord;
use serde::Serialize;

use crate::{
    error::NotifierError,
    usecase::{ApprovalEmailOutcome, ApprovalEmailUseCase},
};

/// Webhook ハンドラの共有状態
pub struct WebhookState {
    pub usecase: ApprovalEmailUseCase,
}

/// Webhook の成功レスポンス
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub message: String,
}

/// POST /webhooks/bill-approved
///
/// トリガーペイロードから精算レコードを取り出し、承認通知メールの送信
/// パイプラインを実行する。
///
/// ボディは `serde_json::Value` として受け取る。`record` の欠落を axum の
/// デシリアライズリジェクション任せにせず、明示的に 400 とログで報告するため。
#[tracing::instrument(skip_all)]
pub async fn bill_approved(
    State(state): State<Arc<WebhookState>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Response, NotifierError> {
    let record = payload
        .get("record")
        .filter(|value| !value.is_null())
        .ok_or(NotifierError::MissingRecord)?;

    let bill: BillRecord = serde_json::from_value(record.clone())
        .map_err(|e| NotifierError::InvalidRecord(e.to_string()))?;

    let outcome = state.usecase.handle(bill).await?;

    let message = match outcome {
        ApprovalEmailOutcome::Sent => "Email sent",
        ApprovalEmailOutcome::SkippedNotApproved => "Bill not approved, no email sent",
    };

    Ok((
        StatusCode::OK,
        Json(WebhookResponse {
            message: message.to_string(),
        }),
    )
        .into_response())
}

//! Resend 通知送信実装
//!
//! Resend のトランザクショナルメール API（`POST /emails`）でメールを送信する。
//! 添付ファイルは `{filename, content}`（base64）の配列として JSON ボディに載せる。

use async_trait::async_trait;
use seisanflow_domain::{EmailAttachment, EmailMessage, NotificationError};
use serde::{Deserialize, Serialize};

use super::NotificationSender;

/// Resend API のエンドポイント
const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Resend 通知送信
///
/// API キーによる Bearer 認証で Resend の REST API を呼び出す。
pub struct ResendNotificationSender {
    client:       reqwest::Client,
    api_url:      String,
    api_key:      String,
    from_address: String,
}

impl ResendNotificationSender {
    /// 新しい Resend 送信インスタンスを作成する
    ///
    /// # 引数
    ///
    /// - `api_key`: Resend の API キー
    /// - `from_address`: 送信元メールアドレス（検証済みドメインであること）
    pub fn new(api_key: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            client:       reqwest::Client::new(),
            api_url:      RESEND_API_URL.to_string(),
            api_key:      api_key.into(),
            from_address: from_address.into(),
        }
    }
}

/// `POST /emails` のリクエストボディ
///
/// 添付がない場合は `attachments` フィールド自体を省略する。
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from:    &'a str,
    to:      Vec<&'a str>,
    subject: &'a str,
    html:    &'a str,
    text:    &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<Vec<AttachmentPayload<'a>>>,
}

/// 添付ファイルのペイロード（content は base64）
#[derive(Debug, Serialize)]
struct AttachmentPayload<'a> {
    filename: &'a str,
    content:  &'a str,
}

impl<'a> From<&'a EmailAttachment> for AttachmentPayload<'a> {
    fn from(attachment: &'a EmailAttachment) -> Self {
        Self {
            filename: &attachment.filename,
            content:  &attachment.content,
        }
    }
}

/// `POST /emails` の成功レスポンス
#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

impl<'a> SendEmailRequest<'a> {
    fn from_message(from: &'a str, email: &'a EmailMessage) -> Self {
        let attachments = if email.attachments.is_empty() {
            None
        } else {
            Some(email.attachments.iter().map(AttachmentPayload::from).collect())
        };

        Self {
            from,
            to: vec![email.to.as_str()],
            subject: &email.subject,
            html: &email.html_body,
            text: &email.text_body,
            attachments,
        }
    }
}

#[async_trait]
impl NotificationSender for ResendNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let request = SendEmailRequest::from_message(&self.from_address, email);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Resend への接続に失敗: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::SendFailed(format!(
                "Resend API エラー ({status}): {body}"
            )));
        }

        // プロバイダーのレスポンス ID をログに残す（追跡用）
        match response.json::<SendEmailResponse>().await {
            Ok(body) => tracing::info!(resend_id = %body.id, "メール送信に成功"),
            Err(e) => tracing::warn!(error = %e, "Resend レスポンスの解析に失敗（送信は成功）"),
        }

        Ok(())
    }
}

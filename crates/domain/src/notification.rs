//! # 通知
//!
//! 承認通知メールに関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **添付は転送形式で保持**: メールプロバイダーの API が base64 を要求するため、
//!   `EmailAttachment` はダウンロードしたバイナリを base64 化した形で構築する
//! - **送信方法には非依存**: `EmailMessage` は送信バックエンド（Resend / SMTP / Noop）を
//!   知らない

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// メール添付ファイル
///
/// リクエストごとに構築され、永続化されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    /// 添付ファイル名（短縮 ID と拡張子を含む導出名）
    pub filename: String,
    /// base64 エンコード済みのファイル内容
    pub content:  String,
}

impl EmailAttachment {
    /// ダウンロードしたバイナリから添付ファイルを構築する
    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            content:  BASE64.encode(bytes),
        }
    }

    /// 転送形式（base64）から元のバイナリに復元する
    ///
    /// SMTP バックエンドのように生のバイナリを要求する送信経路で使用する。
    pub fn decoded_bytes(&self) -> Result<Vec<u8>, NotificationError> {
        BASE64
            .decode(&self.content)
            .map_err(|e| NotificationError::SendFailed(format!("添付の base64 復元に失敗: {e}")))
    }
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。`NotificationSender` に渡される。
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:          String,
    /// 件名
    pub subject:     String,
    /// HTML 本文
    pub html_body:   String,
    /// プレーンテキスト本文
    pub text_body:   String,
    /// 添付ファイル（0〜2 件）
    pub attachments: Vec<EmailAttachment>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_bytesがbase64エンコードする() {
        let attachment = EmailAttachment::from_bytes("Original_Bill_0193a2.jpg", b"hello");
        assert_eq!(attachment.filename, "Original_Bill_0193a2.jpg");
        assert_eq!(attachment.content, "aGVsbG8=");
    }

    #[test]
    fn decoded_bytesが元のバイナリを復元する() {
        let source = vec![0u8, 1, 2, 254, 255];
        let attachment = EmailAttachment::from_bytes("Generated_Claim_0193a2.pdf", &source);
        assert_eq!(attachment.decoded_bytes().unwrap(), source);
    }

    #[test]
    fn 不正なbase64はsend_failedを返す() {
        let attachment = EmailAttachment {
            filename: "broken.bin".to_string(),
            content:  "%%%not-base64%%%".to_string(),
        };
        assert!(matches!(
            attachment.decoded_bytes(),
            Err(NotificationError::SendFailed(_))
        ));
    }
}

//! # Notifier 設定
//!
//! 環境変数から Notifier サーバーの設定を読み込む。
//!
//! 外部サービスの資格情報（バックエンドのサービスロールキー、メールプロバイダーの
//! API キー）と上書き宛先は、起動時に明示的な設定構造体として読み込み、
//! アンビエントな環境変数参照をコード中に散らさない。

use std::env;

/// 送信元メールアドレスのデフォルト値
///
/// Resend の検証済みドメインに合わせて `MAIL_FROM_ADDRESS` で上書きする。
const DEFAULT_MAIL_FROM: &str = "Reimbursement App <onboarding@resend.dev>";

/// 上書き宛先のデフォルト値
const DEFAULT_OVERRIDE_RECIPIENT: &str = "test@example.com";

/// Notifier サーバーの設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// バックエンド（DB・ストレージ）のベース URL
    pub supabase_url: String,
    /// バックエンドのサービスロールキー
    pub service_role_key: String,
    /// 送信元メールアドレス
    pub mail_from: String,
    /// 上書き宛先メールアドレス
    ///
    /// このデプロイでは従業員本人のアドレスではなく、設定された宛先に送信する
    /// （意図された挙動であり、欠陥ではない）。
    pub override_recipient: String,
    /// 通知送信バックエンド
    pub notification_backend: NotificationBackend,
}

/// 通知送信バックエンドの選択
///
/// 環境変数 `NOTIFICATION_BACKEND` で切り替える（デフォルト: `resend`）。
#[derive(Debug, Clone)]
pub enum NotificationBackend {
    /// Resend API（本番用）
    Resend {
        /// Resend の API キー
        api_key: String,
    },
    /// SMTP（Mailpit 等のローカル開発用）
    Smtp {
        /// SMTP サーバーのホスト名
        host: String,
        /// SMTP サーバーのポート番号
        port: u16,
    },
    /// 送信せずログ出力のみ
    Noop,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            host: env::var("NOTIFIER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("NOTIFIER_PORT")
                .expect("NOTIFIER_PORT が設定されていません")
                .parse()
                .expect("NOTIFIER_PORT は有効なポート番号である必要があります"),
            supabase_url: env::var("SUPABASE_URL").expect("SUPABASE_URL が設定されていません"),
            service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .expect("SUPABASE_SERVICE_ROLE_KEY が設定されていません"),
            mail_from: env::var("MAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string()),
            override_recipient: env::var("OVERRIDE_RECIPIENT_EMAIL")
                .unwrap_or_else(|_| DEFAULT_OVERRIDE_RECIPIENT.to_string()),
            notification_backend: NotificationBackend::from_env(),
        })
    }
}

impl NotificationBackend {
    /// 環境変数 `NOTIFICATION_BACKEND` からバックエンドを選択する
    ///
    /// 未設定の場合は `resend`。不明な値は起動時エラーとする。
    fn from_env() -> Self {
        let backend = env::var("NOTIFICATION_BACKEND").unwrap_or_else(|_| "resend".to_string());
        match backend.as_str() {
            "resend" => Self::Resend {
                api_key: env::var("RESEND_API_KEY")
                    .expect("RESEND_API_KEY が設定されていません"),
            },
            "smtp" => Self::Smtp {
                host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "1025".to_string())
                    .parse()
                    .expect("SMTP_PORT は有効なポート番号である必要があります"),
            },
            "noop" => Self::Noop,
            other => panic!("不明な NOTIFICATION_BACKEND: {other}（resend / smtp / noop のいずれか）"),
        }
    }
}

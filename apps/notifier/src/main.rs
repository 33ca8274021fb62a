//! # Notifier サーバー
//!
//! 精算レコードのステータスが `approved` に変わったときに、データベーストリガー
//! からの Webhook を受けて従業員へ承認通知メールを送信するサービス。
//!
//! ## 役割
//!
//! 1 リクエスト = 1 パイプライン（ステータス判定 → プロフィール解決 → 添付収集 →
//! メール送信）。永続状態を一切持たず、リクエスト間の協調もない。
//! 外部サービスはデータベース/ストレージのバックエンドとメールプロバイダーの
//! 2 系統（3 ケイパビリティ）で、いずれも REST API 経由で到達する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `NOTIFIER_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `NOTIFIER_PORT` | **Yes** | ポート番号 |
//! | `SUPABASE_URL` | **Yes** | バックエンドのベース URL |
//! | `SUPABASE_SERVICE_ROLE_KEY` | **Yes** | サービスロールキー |
//! | `NOTIFICATION_BACKEND` | No | `resend`（デフォルト）/ `smtp` / `noop` |
//! | `RESEND_API_KEY` | resend 時 | Resend の API キー |
//! | `SMTP_HOST` / `SMTP_PORT` | No | smtp 時の接続先（デフォルト: `localhost:1025`） |
//! | `MAIL_FROM_ADDRESS` | No | 送信元アドレス |
//! | `OVERRIDE_RECIPIENT_EMAIL` | No | 上書き宛先（デフォルト: `test@example.com`） |
//!
//! ## 起動方法
//!
//! ```bash
//! NOTIFIER_PORT=13010 SUPABASE_URL=https://... SUPABASE_SERVICE_ROLE_KEY=... \
//!     RESEND_API_KEY=... cargo run -p seisanflow-notifier
//! ```

use std::{net::SocketAddr, sync::Arc};

use seisanflow_infra::{
    notification::{
        NoopNotificationSender,
        NotificationSender,
        ResendNotificationSender,
        SmtpNotificationSender,
    },
    repository::PostgrestEmployeeRepository,
    storage::{RECEIPTS_BUCKET, SupabaseStorageClient},
};
use seisanflow_notifier::{
    build_router,
    config::{NotificationBackend, NotifierConfig},
    handler::WebhookState,
    observability::{TracingConfig, init_tracing},
    usecase::{ApprovalEmailUseCase, TemplateRenderer},
};
use tokio::net::TcpListener;

/// Notifier サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("notifier");
    init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "notifier").entered();

    // 設定読み込み
    let config = NotifierConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "Notifier サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // 依存コンポーネントを初期化
    let employees = Arc::new(PostgrestEmployeeRepository::new(
        &config.supabase_url,
        config.service_role_key.clone(),
    ));
    let storage = Arc::new(SupabaseStorageClient::new(
        &config.supabase_url,
        config.service_role_key.clone(),
        RECEIPTS_BUCKET,
    ));

    let sender: Arc<dyn NotificationSender> = match &config.notification_backend {
        NotificationBackend::Resend { api_key } => {
            tracing::info!("通知バックエンド: Resend");
            Arc::new(ResendNotificationSender::new(
                api_key.clone(),
                config.mail_from.clone(),
            ))
        }
        NotificationBackend::Smtp { host, port } => {
            tracing::info!("通知バックエンド: SMTP ({host}:{port})");
            Arc::new(SmtpNotificationSender::new(
                host,
                *port,
                config.mail_from.clone(),
            ))
        }
        NotificationBackend::Noop => {
            tracing::info!("通知バックエンド: Noop（送信なし）");
            Arc::new(NoopNotificationSender)
        }
    };

    let renderer = TemplateRenderer::new().expect("テンプレートの初期化に失敗しました");
    let usecase = ApprovalEmailUseCase::new(
        employees,
        storage,
        sender,
        renderer,
        config.override_recipient.clone(),
    );
    let state = Arc::new(WebhookState { usecase });

    // ルーター構築
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Notifier サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

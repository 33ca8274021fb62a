//! # 承認通知メールユースケース
//!
//! 承認された精算レコードに対する通知メール送信の直列パイプラインを実装する。
//!
//! ## パイプライン
//!
//! ```text
//! ステータス判定 → プロフィール解決 → 添付収集 → レンダリング → 送信
//! ```
//!
//! - ステータスが `approved` でなければ何もせず成功として返す（トリガーの
//!   WHEN 条件が広めでも誤送信しないための防御的な no-op）
//! - プロフィール解決の失敗はパイプライン全体を中断する（メールは送信されない）
//! - 添付のダウンロード失敗は警告ログのみでスキップし、残りの処理を続行する
//! - リトライは一切行わない。各外部呼び出しは 1 回だけ試行される
//! - 重複排除も行わない。同じレコードで 2 回呼べば 2 通送信される（仕様どおり）

use std::sync::Arc;

use seisanflow_domain::{BillRecord, EmailAttachment};
use seisanflow_infra::{
    notification::NotificationSender,
    repository::EmployeeRepository,
    storage::{RECEIPTS_BUCKET, ReceiptStorage, object_path_from_public_url},
};

use crate::{error::NotifierError, usecase::TemplateRenderer};

/// パイプラインの実行結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalEmailOutcome {
    /// メールを送信した
    Sent,
    /// ステータスが承認済みでないため送信しなかった（エラーではない）
    SkippedNotApproved,
}

/// 承認通知メールユースケース
///
/// 3 つのケイパビリティ（プロフィール取得、領収書ダウンロード、メール送信）を
/// trait オブジェクトとして保持する。テスト時はインメモリのモックを注入する。
pub struct ApprovalEmailUseCase {
    employees: Arc<dyn EmployeeRepository>,
    storage:   Arc<dyn ReceiptStorage>,
    sender:    Arc<dyn NotificationSender>,
    renderer:  TemplateRenderer,
    /// 上書き宛先（従業員本人のアドレスの代わりに使用する。設定で変更可能）
    override_recipient: String,
}

impl ApprovalEmailUseCase {
    /// 新しいユースケースインスタンスを作成
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        storage: Arc<dyn ReceiptStorage>,
        sender: Arc<dyn NotificationSender>,
        renderer: TemplateRenderer,
        override_recipient: String,
    ) -> Self {
        Self {
            employees,
            storage,
            sender,
            renderer,
            override_recipient,
        }
    }

    /// 承認通知メールの送信パイプラインを実行する
    pub async fn handle(&self, bill: BillRecord) -> Result<ApprovalEmailOutcome, NotifierError> {
        if !bill.is_approved() {
            tracing::info!(
                bill_id = %bill.id,
                status = bill.status_display(),
                "未承認ステータスのため送信しない"
            );
            return Ok(ApprovalEmailOutcome::SkippedNotApproved);
        }

        // プロフィール解決の失敗はここで中断（添付のダウンロードは始まらない）
        let profile = self
            .employees
            .find_by_id(&bill.user_id)
            .await?
            .ok_or_else(|| NotifierError::ProfileNotFound(bill.user_id.clone()))?;

        let attachments = self.gather_attachments(&bill).await;

        let email =
            self.renderer
                .render(&bill, &profile, &self.override_recipient, attachments)?;

        self.sender.send_email(&email).await?;

        tracing::info!(
            bill_id = %bill.id,
            recipient = %self.override_recipient,
            "承認通知メールを送信");

        Ok(ApprovalEmailOutcome::Sent)
    }

    /// 添付候補を順番にダウンロードする
    ///
    /// 各候補は URL のパターン照合 → ダウンロード → base64 エンコードの順に処理し、
    /// どこで失敗しても警告ログを残してスキップする（ベストエフォート）。
    /// 成功した添付だけが `[原本, 生成 PDF]` の順で返る。
    async fn gather_attachments(&self, bill: &BillRecord) -> Vec<EmailAttachment> {
        let short_id = bill.short_id();
        let mut attachments = Vec::new();

        for source in bill.attachment_sources() {
            let filename = source.filename(&short_id);

            let Some(path) = object_path_from_public_url(&source.url, RECEIPTS_BUCKET) else {
                tracing::warn!(
                    url = %source.url,
                    filename = %filename,
                    "ストレージ URL の形式が不正なため添付をスキップ"
                );
                continue;
            };

            match self.storage.download(path).await {
                Ok(bytes) => {
                    attachments.push(EmailAttachment::from_bytes(filename, &bytes));
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        filename = %filename,
                        "ダウンロードに失敗したため添付をスキップ"
                    );
                }
            }
        }

        attachments
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use seisanflow_domain::EmployeeProfile;
    use seisanflow_infra::mock::{
        MockEmployeeRepository,
        MockNotificationSender,
        MockReceiptStorage,
    };

    use super::*;

    fn make_usecase(
        employees: MockEmployeeRepository,
        storage: MockReceiptStorage,
        sender: MockNotificationSender,
    ) -> ApprovalEmailUseCase {
        ApprovalEmailUseCase::new(
            Arc::new(employees),
            Arc::new(storage),
            Arc::new(sender),
            TemplateRenderer::new().unwrap(),
            "test@example.com".to_string(),
        )
    }

    fn make_bill() -> BillRecord {
        BillRecord {
            id: "abcdef01-2345-6789-abcd-ef0123456789".to_string(),
            user_id: "user-001".to_string(),
            purpose: Some("Team Lunch".to_string()),
            amount: Some(serde_json::json!(1234.5)),
            date: Some("2025-06-01".to_string()),
            status: Some("approved".to_string()),
            image_url: Some(
                "https://example.supabase.co/storage/v1/object/public/receipts/u1/photo.jpg"
                    .to_string(),
            ),
            generated_pdf_url: Some(
                "https://example.supabase.co/storage/v1/object/public/receipts/u1/claim.pdf"
                    .to_string(),
            ),
            admin_notes: None,
        }
    }

    fn seeded_employees() -> MockEmployeeRepository {
        let employees = MockEmployeeRepository::new();
        employees.add_profile(
            "user-001",
            EmployeeProfile {
                email:    "tanaka@example.com".to_string(),
                username: Some("Tanaka Taro".to_string()),
            },
        );
        employees
    }

    #[tokio::test]
    async fn 未承認ステータスはプロフィール検索も送信も行わない() {
        let employees = seeded_employees();
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(employees.clone(), MockReceiptStorage::new(), sender.clone());

        let mut bill = make_bill();
        bill.status = Some("pending".to_string());

        let outcome = usecase.handle(bill).await.unwrap();

        assert_eq!(outcome, ApprovalEmailOutcome::SkippedNotApproved);
        assert!(employees.queried_ids().is_empty());
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn プロフィール取得失敗は送信前に中断する() {
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(
            MockEmployeeRepository::failing(),
            MockReceiptStorage::new(),
            sender.clone(),
        );

        let result = usecase.handle(make_bill()).await;

        assert!(matches!(result, Err(NotifierError::ProfileLookup(_))));
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn プロフィール該当なしは送信前に中断する() {
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(
            MockEmployeeRepository::new(),
            MockReceiptStorage::new(),
            sender.clone(),
        );

        let result = usecase.handle(make_bill()).await;

        assert!(matches!(result, Err(NotifierError::ProfileNotFound(_))));
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn 両方の添付が原本生成pdfの順で送信される() {
        let storage = MockReceiptStorage::new();
        storage.add_object("u1/photo.jpg", b"jpeg-bytes".to_vec());
        storage.add_object("u1/claim.pdf", b"pdf-bytes".to_vec());
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(seeded_employees(), storage, sender.clone());

        let outcome = usecase.handle(make_bill()).await.unwrap();

        assert_eq!(outcome, ApprovalEmailOutcome::Sent);
        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "test@example.com");
        assert_eq!(sent[0].attachments.len(), 2);
        assert_eq!(
            sent[0].attachments[0],
            EmailAttachment::from_bytes("Original_Bill_abcdef.jpg", b"jpeg-bytes")
        );
        assert_eq!(
            sent[0].attachments[1],
            EmailAttachment::from_bytes("Generated_Claim_abcdef.pdf", b"pdf-bytes")
        );
    }

    #[tokio::test]
    async fn パターン不一致のurlはスキップして残りを送信する() {
        let storage = MockReceiptStorage::new();
        storage.add_object("u1/claim.pdf", b"pdf-bytes".to_vec());
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(seeded_employees(), storage, sender.clone());

        let mut bill = make_bill();
        bill.image_url = Some("https://example.com/files/u1/photo.jpg".to_string());

        let outcome = usecase.handle(bill).await.unwrap();

        assert_eq!(outcome, ApprovalEmailOutcome::Sent);
        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].attachments.len(), 1);
        assert_eq!(sent[0].attachments[0].filename, "Generated_Claim_abcdef.pdf");
    }

    #[tokio::test]
    async fn ダウンロード失敗はスキップして送信は成功する() {
        // ストレージに何も登録しない（両方 404 相当）
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(seeded_employees(), MockReceiptStorage::new(), sender.clone());

        let outcome = usecase.handle(make_bill()).await.unwrap();

        assert_eq!(outcome, ApprovalEmailOutcome::Sent);
        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].attachments.is_empty());
    }

    #[tokio::test]
    async fn 送信失敗はnotificationエラーを返す() {
        let usecase = make_usecase(
            seeded_employees(),
            MockReceiptStorage::new(),
            MockNotificationSender::failing(),
        );

        let result = usecase.handle(make_bill()).await;

        assert!(matches!(result, Err(NotifierError::Notification(_))));
    }

    #[tokio::test]
    async fn 同一レコードの2回呼び出しで2通送信される() {
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(seeded_employees(), MockReceiptStorage::new(), sender.clone());

        usecase.handle(make_bill()).await.unwrap();
        usecase.handle(make_bill()).await.unwrap();

        // 重複排除は行わない（仕様どおり 2 通）
        assert_eq!(sender.sent_emails().len(), 2);
    }
}

//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで承認通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**: `Your Reimbursement Bill for {目的} has been {ステータス}!`
//! - **備考行の条件表示**: 管理者備考が空のときは行ごと省略する

use seisanflow_domain::{BillRecord, EmailAttachment, EmailMessage, EmployeeProfile, NotificationError};
use tera::{Context, Tera};

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、精算レコードと従業員プロフィールから
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "bill_approved.html",
                    include_str!("../../templates/notifications/bill_approved.html"),
                ),
                (
                    "bill_approved.txt",
                    include_str!("../../templates/notifications/bill_approved.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 承認通知メールを生成する
    ///
    /// # 引数
    ///
    /// - `bill`: 承認された精算レコード
    /// - `profile`: 従業員プロフィール（表示名の解決に使用）
    /// - `recipient`: 宛先メールアドレス（設定された上書き宛先）
    /// - `attachments`: ダウンロード済みの添付ファイル（0〜2 件）
    pub fn render(
        &self,
        bill: &BillRecord,
        profile: &EmployeeProfile,
        recipient: &str,
        attachments: Vec<EmailAttachment>,
    ) -> Result<EmailMessage, NotificationError> {
        let purpose = bill.purpose_display();
        let status = bill.status_display();

        let mut context = Context::new();
        context.insert("employee_name", profile.display_name());
        context.insert("purpose", purpose);
        context.insert("amount", &bill.amount_display());
        context.insert("status_upper", &status.to_uppercase());
        // 備考が未設定のときは空文字を渡し、テンプレート側の if で行ごと省略する
        context.insert("admin_notes", bill.admin_notes.as_deref().unwrap_or(""));

        let html_body = self
            .engine
            .render("bill_approved.html", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render("bill_approved.txt", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: recipient.to_string(),
            subject: format!("Your Reimbursement Bill for {purpose} has been {status}!"),
            html_body,
            text_body,
            attachments,
        })
    }
}

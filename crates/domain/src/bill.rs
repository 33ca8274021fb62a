//! # 経費精算レコード
//!
//! データベーストリガーの Webhook ペイロードに含まれる精算レコード（bills 行）の
//! ドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: レコードはトリガーから供給され、本サービスは一切更新しない
//! - **欠損に寛容**: `id` / `user_id` 以外のフィールドはすべて欠損を許容し、
//!   表示用のデフォルト値に落とす
//! - **金額は生の JSON 値**: トリガーのペイロードでは数値にも文字列にもなり得るため、
//!   `serde_json::Value` のまま受け取り表示時に整形する

use serde::Deserialize;

/// 金額が数値でない場合などの表示用フォールバック
const NOT_AVAILABLE: &str = "N/A";

/// 目的が未設定の場合のデフォルトラベル
const DEFAULT_PURPOSE: &str = "Reimbursement Request";

/// 精算レコード（bills 行）
///
/// `status` が `approved` に変わったときにデータベーストリガーが
/// `{ "record": <行データ> }` 形式で送信してくる。
#[derive(Debug, Clone, Deserialize)]
pub struct BillRecord {
    /// 精算レコード ID
    pub id: String,
    /// 申請した従業員のユーザー ID
    pub user_id: String,
    /// 精算の目的
    pub purpose: Option<String>,
    /// 金額（数値または文字列で届く可能性がある）
    pub amount: Option<serde_json::Value>,
    /// 精算日
    pub date: Option<String>,
    /// ステータス（`approved` など）
    pub status: Option<String>,
    /// アップロードされた領収書原本の公開 URL
    pub image_url: Option<String>,
    /// 生成された精算書 PDF の公開 URL
    pub generated_pdf_url: Option<String>,
    /// 管理者の備考
    pub admin_notes: Option<String>,
}

impl BillRecord {
    /// ステータスが承認済みかどうか（大文字小文字を区別しない）
    ///
    /// トリガーの WHEN 条件が広めに設定されていても誤送信しないための防御的な判定。
    pub fn is_approved(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("approved"))
    }

    /// 表示用の目的（未設定なら汎用ラベル）
    pub fn purpose_display(&self) -> &str {
        self.purpose.as_deref().unwrap_or(DEFAULT_PURPOSE)
    }

    /// 表示用の金額
    ///
    /// 数値なら小数点以下 2 桁の固定小数表記に整形する（`1234.5` → `"1234.50"`）。
    /// 数値でない・未設定の場合は `"N/A"` を返す。
    pub fn amount_display(&self) -> String {
        self.amount
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .map_or_else(|| NOT_AVAILABLE.to_string(), |n| format!("{n:.2}"))
    }

    /// 表示用の精算日（未設定なら `"N/A"`）
    pub fn date_display(&self) -> &str {
        self.date.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// 表示用のステータス（未設定なら `"N/A"`）
    pub fn status_display(&self) -> &str {
        self.status.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// レコード ID の先頭 6 文字
    ///
    /// 添付ファイル名に埋め込む短縮 ID。
    pub fn short_id(&self) -> String {
        self.id.chars().take(6).collect()
    }

    /// 添付候補の一覧を返す
    ///
    /// URL が設定されているものだけを `[原本, 生成 PDF]` の順で返す（0〜2 件）。
    pub fn attachment_sources(&self) -> Vec<AttachmentSource> {
        let mut sources = Vec::new();
        if let Some(url) = &self.image_url {
            sources.push(AttachmentSource {
                kind: AttachmentKind::OriginalBill,
                url:  url.clone(),
            });
        }
        if let Some(url) = &self.generated_pdf_url {
            sources.push(AttachmentSource {
                kind: AttachmentKind::GeneratedClaim,
                url:  url.clone(),
            });
        }
        sources
    }
}

/// 添付ファイルの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// アップロードされた領収書原本
    OriginalBill,
    /// 生成された精算書 PDF
    GeneratedClaim,
}

/// 添付候補（種別とダウンロード元 URL の組）
#[derive(Debug, Clone)]
pub struct AttachmentSource {
    /// 添付ファイルの種別
    pub kind: AttachmentKind,
    /// ストレージの公開 URL
    pub url:  String,
}

impl AttachmentSource {
    /// メールに添付するファイル名を導出する
    ///
    /// - 原本: `Original_Bill_<短縮ID>.<URL から取得した拡張子>`
    /// - 生成 PDF: `Generated_Claim_<短縮ID>.pdf`
    pub fn filename(&self, short_id: &str) -> String {
        match self.kind {
            AttachmentKind::OriginalBill => {
                let ext = extension_from_url(&self.url);
                format!("Original_Bill_{short_id}.{ext}")
            }
            AttachmentKind::GeneratedClaim => format!("Generated_Claim_{short_id}.pdf"),
        }
    }
}

/// URL の最終パスセグメントから拡張子を取り出す
///
/// 拡張子が見つからない場合は `"file"` にフォールバックする。
fn extension_from_url(url: &str) -> &str {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query
        .rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("file")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn make_bill(status: Option<&str>) -> BillRecord {
        BillRecord {
            id: "0193a2b4-5678-7abc-9def-000000000001".to_string(),
            user_id: "user-001".to_string(),
            purpose: Some("出張交通費".to_string()),
            amount: Some(serde_json::json!(1234.5)),
            date: Some("2025-06-01".to_string()),
            status: status.map(ToString::to_string),
            image_url: None,
            generated_pdf_url: None,
            admin_notes: None,
        }
    }

    #[rstest]
    #[case::小文字("approved", true)]
    #[case::大文字("APPROVED", true)]
    #[case::混在("Approved", true)]
    #[case::未承認("pending", false)]
    #[case::却下("rejected", false)]
    fn is_approvedは大文字小文字を区別しない(#[case] status: &str, #[case] expected: bool) {
        assert_eq!(make_bill(Some(status)).is_approved(), expected);
    }

    #[test]
    fn ステータス未設定はis_approvedがfalseを返す() {
        assert!(!make_bill(None).is_approved());
    }

    #[rstest]
    #[case::端数あり(serde_json::json!(1234.5), "1234.50")]
    #[case::整数(serde_json::json!(100), "100.00")]
    #[case::ゼロ(serde_json::json!(0), "0.00")]
    #[case::文字列は非数値扱い(serde_json::json!("1234.5"), "N/A")]
    #[case::null(serde_json::Value::Null, "N/A")]
    fn amount_displayが固定小数2桁またはn_aを返す(
        #[case] amount: serde_json::Value,
        #[case] expected: &str,
    ) {
        let mut bill = make_bill(Some("approved"));
        bill.amount = Some(amount);
        assert_eq!(bill.amount_display(), expected);
    }

    #[test]
    fn amount未設定はn_aを返す() {
        let mut bill = make_bill(Some("approved"));
        bill.amount = None;
        assert_eq!(bill.amount_display(), "N/A");
    }

    #[test]
    fn 欠損フィールドがデフォルト値に落ちる() {
        let bill = BillRecord {
            id: "abc123def".to_string(),
            user_id: "user-001".to_string(),
            purpose: None,
            amount: None,
            date: None,
            status: None,
            image_url: None,
            generated_pdf_url: None,
            admin_notes: None,
        };

        assert_eq!(bill.purpose_display(), "Reimbursement Request");
        assert_eq!(bill.date_display(), "N/A");
        assert_eq!(bill.status_display(), "N/A");
    }

    #[test]
    fn short_idはidの先頭6文字を返す() {
        assert_eq!(make_bill(Some("approved")).short_id(), "0193a2");
    }

    #[test]
    fn attachment_sourcesは原本と生成pdfの順で返す() {
        let mut bill = make_bill(Some("approved"));
        bill.image_url = Some("https://example.supabase.co/storage/v1/object/public/receipts/u1/photo.jpg".to_string());
        bill.generated_pdf_url = Some("https://example.supabase.co/storage/v1/object/public/receipts/u1/claim.pdf".to_string());

        let sources = bill.attachment_sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].kind, AttachmentKind::OriginalBill);
        assert_eq!(sources[1].kind, AttachmentKind::GeneratedClaim);
    }

    #[test]
    fn attachment_sourcesはurl未設定を除外する() {
        let mut bill = make_bill(Some("approved"));
        bill.generated_pdf_url =
            Some("https://example.supabase.co/storage/v1/object/public/receipts/u1/claim.pdf".to_string());

        let sources = bill.attachment_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].kind, AttachmentKind::GeneratedClaim);
    }

    #[test]
    fn 原本のファイル名はurlの拡張子を引き継ぐ() {
        let source = AttachmentSource {
            kind: AttachmentKind::OriginalBill,
            url:  "https://example.supabase.co/storage/v1/object/public/receipts/u1/photo.jpg"
                .to_string(),
        };
        assert_eq!(source.filename("0193a2"), "Original_Bill_0193a2.jpg");
    }

    #[test]
    fn 生成pdfのファイル名は常にpdf拡張子() {
        let source = AttachmentSource {
            kind: AttachmentKind::GeneratedClaim,
            url:  "https://example.supabase.co/storage/v1/object/public/receipts/u1/claim.bin"
                .to_string(),
        };
        assert_eq!(source.filename("0193a2"), "Generated_Claim_0193a2.pdf");
    }

    #[rstest]
    #[case::通常("https://x.co/storage/v1/object/public/receipts/u1/photo.jpg", "jpg")]
    #[case::クエリ付き("https://x.co/receipts/u1/scan.png?download=1", "png")]
    #[case::拡張子なし("https://x.co/receipts/u1/noext", "file")]
    #[case::末尾ドット("https://x.co/receipts/u1/broken.", "file")]
    fn extension_from_urlが拡張子を取り出す(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(extension_from_url(url), expected);
    }
}

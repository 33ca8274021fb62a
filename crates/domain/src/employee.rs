//! # 従業員プロフィール
//!
//! ユーザーレコードストア（users テーブル）から取得する従業員の連絡先情報。
//! 本サービスが参照するのはメールアドレスとユーザー名の 2 カラムのみ。

use serde::Deserialize;

/// 従業員プロフィール
///
/// 精算レコードの `user_id` で検索した結果。読み取り専用。
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeProfile {
    /// メールアドレス
    pub email:    String,
    /// ユーザー名（未設定の場合がある）
    pub username: Option<String>,
}

impl EmployeeProfile {
    /// 表示名を返す
    ///
    /// ユーザー名が未設定の場合はメールアドレスにフォールバックする。
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }
}

//! # EmployeeRepository
//!
//! ユーザーレコードストア（users テーブル）から従業員プロフィールを取得する
//! リポジトリ。
//!
//! ## 設計方針
//!
//! - **REST API 経由**: ストアへはバックエンドの PostgREST 互換 API
//!   （`/rest/v1/users`）でアクセスする。サービスロールキーを資格情報として送る
//! - **最小カラム選択**: 取得するのは `email` と `username` のみ

use async_trait::async_trait;
use seisanflow_domain::EmployeeProfile;

use crate::error::InfraError;

/// 従業員プロフィールリポジトリトレイト
///
/// ユースケース層から利用する。テスト時はモックに差し替え可能。
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// ユーザー ID で従業員プロフィールを検索する
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(profile))`: 該当行が見つかった場合
    /// - `Ok(None)`: 該当行が存在しない場合
    /// - `Err(_)`: ストアへの問い合わせ自体が失敗した場合
    async fn find_by_id(&self, user_id: &str) -> Result<Option<EmployeeProfile>, InfraError>;
}

/// PostgREST 互換 API 経由の EmployeeRepository 実装
#[derive(Debug, Clone)]
pub struct PostgrestEmployeeRepository {
    base_url:    String,
    service_key: String,
    client:      reqwest::Client,
}

impl PostgrestEmployeeRepository {
    /// 新しいリポジトリインスタンスを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: バックエンドのベース URL（例: `https://xxx.supabase.co`）
    /// - `service_key`: サービスロールキー
    pub fn new(base_url: &str, service_key: impl Into<String>) -> Self {
        Self {
            base_url:    base_url.trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            client:      reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmployeeRepository for PostgrestEmployeeRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<EmployeeProfile>, InfraError> {
        let url = format!("{}/rest/v1/users", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(&[
                ("id", format!("eq.{user_id}")),
                ("select", "email,username".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InfraError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut rows = response.json::<Vec<EmployeeProfile>>().await?;
        if rows.is_empty() {
            return Ok(None);
        }

        Ok(Some(rows.remove(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_urlの末尾スラッシュが除去される() {
        let repo = PostgrestEmployeeRepository::new("https://example.supabase.co/", "key");
        assert_eq!(repo.base_url, "https://example.supabase.co");
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgrestEmployeeRepository>();
    }
}

//! # 領収書ストレージ
//!
//! オブジェクトストレージから領収書ファイルをダウンロードする。
//!
//! ## 設計方針
//!
//! - **公開 URL からパス抽出**: 精算レコードにはストレージの公開 URL が入っている。
//!   `/storage/v1/object/public/<バケット>/` の固定プレフィックスでバケット内パスを
//!   取り出し、パターンに一致しない URL は呼び出し側でスキップする
//! - **認証付きダウンロード**: 実際の取得はサービスロールキーを付けた
//!   オブジェクト API（`/storage/v1/object/<バケット>/<パス>`）で行う

use async_trait::async_trait;

use crate::error::InfraError;

/// 領収書を格納する既知のバケット名
pub const RECEIPTS_BUCKET: &str = "receipts";

/// ストレージの公開 URL からバケット内パスを取り出す
///
/// URL が `.../storage/v1/object/public/<bucket>/<path>` の形式に一致しない場合は
/// `None` を返す。
pub fn object_path_from_public_url<'a>(url: &'a str, bucket: &str) -> Option<&'a str> {
    let marker = format!("/storage/v1/object/public/{bucket}/");
    url.split_once(marker.as_str())
        .map(|(_, path)| path)
        .filter(|path| !path.is_empty())
}

/// 領収書ストレージトレイト
///
/// オブジェクトのダウンロードを抽象化する。テスト時はモックに差し替え可能。
#[async_trait]
pub trait ReceiptStorage: Send + Sync {
    /// バケット内パスを指定してオブジェクトをダウンロードする
    async fn download(&self, path: &str) -> Result<Vec<u8>, InfraError>;
}

/// Supabase Storage API 経由の ReceiptStorage 実装
#[derive(Debug, Clone)]
pub struct SupabaseStorageClient {
    base_url:    String,
    service_key: String,
    bucket:      String,
    client:      reqwest::Client,
}

impl SupabaseStorageClient {
    /// 新しいストレージクライアントを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: バックエンドのベース URL（例: `https://xxx.supabase.co`）
    /// - `service_key`: サービスロールキー
    /// - `bucket`: バケット名（通常は [`RECEIPTS_BUCKET`]）
    pub fn new(base_url: &str, service_key: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url:    base_url.trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket:      bucket.into(),
            client:      reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ReceiptStorage for SupabaseStorageClient {
    async fn download(&self, path: &str) -> Result<Vec<u8>, InfraError> {
        let url = format!("{}/storage/v1/object/{}/{path}", self.base_url, self.bucket);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.service_key)
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

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

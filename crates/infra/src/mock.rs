//! # テスト用モック実装
//!
//! ユースケーステストで使用するインメモリのフェイク実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! seisanflow-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use seisanflow_domain::{EmailMessage, EmployeeProfile, NotificationError};

use crate::{
    error::InfraError,
    notification::NotificationSender,
    repository::EmployeeRepository,
    storage::ReceiptStorage,
};

// ===== MockEmployeeRepository =====

/// テスト用のモック EmployeeRepository
///
/// 事前に登録したプロフィールを返す。問い合わせたユーザー ID を記録するため、
/// 「プロフィール検索が発生しなかったこと」の検証にも使える。
#[derive(Clone, Default)]
pub struct MockEmployeeRepository {
    profiles: Arc<Mutex<HashMap<String, EmployeeProfile>>>,
    queried:  Arc<Mutex<Vec<String>>>,
    fail:     bool,
}

impl MockEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 問い合わせが常に失敗するリポジトリを作成する
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// プロフィールを登録する
    pub fn add_profile(&self, user_id: impl Into<String>, profile: EmployeeProfile) {
        self.profiles.lock().unwrap().insert(user_id.into(), profile);
    }

    /// これまでに問い合わせたユーザー ID 一覧
    pub fn queried_ids(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmployeeRepository for MockEmployeeRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<EmployeeProfile>, InfraError> {
        self.queried.lock().unwrap().push(user_id.to_string());
        if self.fail {
            return Err(InfraError::Unexpected("モック: ストア障害".to_string()));
        }
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }
}

// ===== MockReceiptStorage =====

/// テスト用のモック ReceiptStorage
///
/// パス → バイナリのマップを保持する。未登録パスのダウンロードは
/// 404 相当のエラーを返す。
#[derive(Clone, Default)]
pub struct MockReceiptStorage {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockReceiptStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// オブジェクトを登録する
    pub fn add_object(&self, path: impl Into<String>, bytes: Vec<u8>) {
        self.objects.lock().unwrap().insert(path.into(), bytes);
    }
}

#[async_trait]
impl ReceiptStorage for MockReceiptStorage {
    async fn download(&self, path: &str) -> Result<Vec<u8>, InfraError> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or(InfraError::Api {
                status: 404,
                body:   "Object not found".to_string(),
            })
    }
}

// ===== MockNotificationSender =====

/// テスト用のモック NotificationSender
///
/// 送信されたメッセージを記録する。宛先・件名・添付内容のアサーションに使う。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    fail: bool,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信が常に失敗する送信インスタンスを作成する
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// これまでに送信されたメッセージ一覧
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::SendFailed(
                "モック: プロバイダー障害".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

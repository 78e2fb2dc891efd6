//! # オラクルアカウント排他
//!
//! 同じオラクルアカウントのガスコイン・オラクルオブジェクトを使うクレームを直列化する。
//! オブジェクト解決から送信完了までガードを保持する。アカウントが異なれば競合しない。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// アカウント単位のsingle-flightロック。
#[derive(Debug, Default)]
pub struct OracleLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OracleLocks {
    /// 空のロック表を作成する。
    pub fn new() -> Self {
        Self::default()
    }

    /// `account` の排他区間に入る。ガードのドロップで解放される。
    pub async fn acquire(&self, account: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(account.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

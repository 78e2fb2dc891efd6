//! # 宛先チェーン接続
//!
//! オブジェクト照会とMove呼び出し送信の抽象。トランザクション構築・署名・
//! ネットワーク再送の内部は実装側に閉じる。

use std::future::Future;
use std::time::Duration;

use mirror_types::{MoveCall, MoveCallEffects, OwnedObject};

use crate::error::{ClaimError, ConnectionError};

/// 宛先チェーンへの接続。
#[async_trait::async_trait]
pub trait Connection: Send + Sync {
    /// アドレスが所有する全オブジェクトを返す。
    async fn list_objects_owned_by(
        &self,
        address: &str,
    ) -> Result<Vec<OwnedObject>, ConnectionError>;

    /// Move呼び出しを送信し、実行結果の要約を返す。1回だけ送信し再送しない。
    async fn submit_move_call(&self, call: &MoveCall) -> Result<MoveCallEffects, ConnectionError>;
}

/// チェーン往復を `limit` で打ち切る。期限切れは `Transient`。
pub(crate) async fn round_trip<T, F>(limit: Duration, what: &str, fut: F) -> Result<T, ClaimError>
where
    F: Future<Output = Result<T, ConnectionError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(ClaimError::from),
        Err(_) => Err(ClaimError::Transient(format!(
            "{what} が {}ms 以内に完了しませんでした",
            limit.as_millis()
        ))),
    }
}

/// `ClaimError` を返す処理を `limit` で打ち切る。期限切れは `Transient`。
pub(crate) async fn bounded<T, F>(limit: Duration, what: &str, fut: F) -> Result<T, ClaimError>
where
    F: Future<Output = Result<T, ClaimError>>,
{
    tokio::time::timeout(limit, fut).await.unwrap_or_else(|_| {
        Err(ClaimError::Transient(format!(
            "{what} が {}ms 以内に完了しませんでした",
            limit.as_millis()
        )))
    })
}

//! # Sui JSON-RPC接続
//!
//! [`Connection`] のSuiフルノード（JSON-RPC）実装。
//!
//! ## Move呼び出しの送信
//! 1. `sui_moveCall` で未署名トランザクション（Base64 `txBytes`）を構築させる
//! 2. オラクルのEd25519鍵で `txBytes` に署名する
//! 3. `sui_executeTransaction` で実行し、effectsから作成オブジェクトを読む

use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use mirror_core::{Connection, ConnectionError};
use mirror_crypto::{ed25519_sign, Ed25519SigningKey};
use mirror_types::{CreatedObject, MoveCall, MoveCallEffects, OwnedObject};

use crate::rpc::{b64, JsonRpcClient};

/// effectsが置かれうる位置（ノードのバージョンで異なる）
const EFFECTS_POINTERS: &[&str] = &["/EffectsCert/effects/effects", "/effects/effects", "/effects"];

/// `sui_getObjectsOwnedByAddress` の要素
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectInfo {
    object_id: String,
    #[serde(rename = "type")]
    object_type: String,
}

/// `sui_moveCall` の結果
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionBytes {
    tx_bytes: String,
}

/// Suiフルノードへの接続。トランザクションはオラクル鍵で署名する。
pub struct SuiRpcConnection {
    rpc: JsonRpcClient,
    signing_key: Ed25519SigningKey,
}

impl SuiRpcConnection {
    /// 新しいSuiRpcConnectionを作成する。
    pub fn new(rpc: JsonRpcClient, signing_key: Ed25519SigningKey) -> Self {
        Self { rpc, signing_key }
    }
}

#[async_trait::async_trait]
impl Connection for SuiRpcConnection {
    async fn list_objects_owned_by(
        &self,
        address: &str,
    ) -> Result<Vec<OwnedObject>, ConnectionError> {
        let result = self
            .rpc
            .call("sui_getObjectsOwnedByAddress", serde_json::json!([address]))
            .await?;

        let infos: Vec<ObjectInfo> = serde_json::from_value(result).map_err(|e| {
            ConnectionError::Decode(format!("所有オブジェクト一覧のパースに失敗: {e}"))
        })?;

        Ok(infos
            .into_iter()
            .map(|info| OwnedObject {
                object_id: info.object_id,
                object_type: info.object_type,
            })
            .collect())
    }

    async fn submit_move_call(&self, call: &MoveCall) -> Result<MoveCallEffects, ConnectionError> {
        let params = serde_json::json!([
            call.sender,
            call.package_id,
            call.module,
            call.function,
            [],
            call.arguments,
            call.gas_object_id,
            call.gas_budget,
        ]);
        let result = self.rpc.call("sui_moveCall", params).await?;
        let unsigned: TransactionBytes = serde_json::from_value(result)
            .map_err(|e| ConnectionError::Decode(format!("txBytesのパースに失敗: {e}")))?;

        let tx_bytes = b64()
            .decode(&unsigned.tx_bytes)
            .map_err(|e| ConnectionError::Decode(format!("txBytesのBase64デコードに失敗: {e}")))?;

        let signature = ed25519_sign(&self.signing_key, &tx_bytes);
        let public_key = self.signing_key.verifying_key();

        let result = self
            .rpc
            .call(
                "sui_executeTransaction",
                serde_json::json!([
                    unsigned.tx_bytes,
                    "ED25519",
                    b64().encode(signature.to_bytes()),
                    b64().encode(public_key.to_bytes()),
                ]),
            )
            .await?;

        parse_effects(&result)
    }
}

/// 実行結果から作成オブジェクトとダイジェストを取り出す。
///
/// 実行が失敗（`status.status != "success"`）していれば `Rpc` を返す。
fn parse_effects(result: &Value) -> Result<MoveCallEffects, ConnectionError> {
    let effects = EFFECTS_POINTERS
        .iter()
        .filter_map(|p| result.pointer(p))
        .find(|v| v.get("status").is_some() || v.get("created").is_some())
        .ok_or_else(|| ConnectionError::Decode("実行結果にeffectsがありません".into()))?;

    if let Some(status) = effects.get("status") {
        let outcome = status
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| ConnectionError::Decode(format!("実行結果のstatusが不正です: {status}")))?;
        if outcome != "success" {
            let reason = status
                .get("error")
                .map(Value::to_string)
                .unwrap_or_else(|| outcome.to_string());
            return Err(ConnectionError::Rpc {
                code: -32000,
                message: format!("トランザクションの実行に失敗: {reason}"),
            });
        }
    }

    let created = match effects.get("created") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.pointer("/reference/objectId")
                    .or_else(|| item.get("objectId"))
                    .and_then(Value::as_str)
                    .map(|id| CreatedObject {
                        object_id: id.to_string(),
                    })
                    .ok_or_else(|| {
                        ConnectionError::Decode(format!("作成オブジェクトにobjectIdがありません: {item}"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ConnectionError::Decode(format!("createdが配列ではありません: {other}")));
        }
        None => Vec::new(),
    };

    let digest = effects
        .get("transactionDigest")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(MoveCallEffects { digest, created })
}

//! # JSON-RPCクライアント
//!
//! Sui・Ethereumノードへの JSON-RPC 2.0 呼び出し。1回送信するのみで再送しない。
//!
//! | 失敗 | 分類 |
//! |------|------|
//! | 送信失敗・5xx | `Transport` |
//! | HTTPクライアントのタイムアウト | `Timeout` |
//! | `error` オブジェクト・4xx | `Rpc` |
//! | JSONとして読めない・`result` なし | `Decode` |

use base64::Engine;
use serde_json::Value;

use mirror_core::ConnectionError;

/// Base64エンジン（Standard）
pub(crate) fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

/// 単一エンドポイントへのJSON-RPCクライアント。
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    http_client: reqwest::Client,
    url: String,
}

impl JsonRpcClient {
    /// 新しいJsonRpcClientを作成する。
    pub fn new(http_client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }

    /// `method` を呼び出し、`result` を返す。
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ConnectionError> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ConnectionError::Timeout
                } else {
                    ConnectionError::Transport(format!("{method} の送信に失敗: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ConnectionError::Timeout
            } else {
                ConnectionError::Transport(format!("{method} のレスポンス読み取りに失敗: {e}"))
            }
        })?;

        if status.is_server_error() {
            return Err(ConnectionError::Transport(format!(
                "{method}: HTTP {status} - {body}"
            )));
        }
        if !status.is_success() {
            return Err(ConnectionError::Rpc {
                code: i64::from(status.as_u16()),
                message: body,
            });
        }

        let mut body: Value = serde_json::from_str(&body)
            .map_err(|e| ConnectionError::Decode(format!("{method} のレスポンスのパースに失敗: {e}")))?;

        if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
            return Err(ConnectionError::Rpc {
                code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string()),
            });
        }

        body.get_mut("result")
            .map(Value::take)
            .ok_or_else(|| ConnectionError::Decode(format!("{method} のレスポンスにresultがありません")))
    }
}

//! # Ethereum JSON-RPC照会
//!
//! ソースチェーン（ERC-721コントラクト）への読み取り専用 `eth_call`。
//!
//! - `ownerOf(uint256)`: 署名者が現在の保有者であることの確認（[`TokenOwnership`]）
//! - `name()` / `tokenURI(uint256)`: ミントするNFTの表示用メタデータ（[`MetadataResolver`]）
//!
//! メタデータの照会に失敗した項目は設定された既定値で補う。

use serde_json::Value;

use mirror_core::{Claim, ClaimError, ConnectionError, MetadataResolver, TokenMetadata, TokenOwnership};
use mirror_crypto::{format_eth_address, keccak256};

use crate::rpc::JsonRpcClient;

/// ABIワード長
const WORD: usize = 32;

/// 保有者を確認できなかったときにクライアントへ返す理由
const OWNER_UNKNOWN: &str = "トークン保有者を確認できません";

/// 関数シグネチャから4バイトのセレクタを計算する。
fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// `signature` のcalldataを構築する（引数はuint256のみ対応）。
fn encode_call(signature: &str, uint_args: &[u64]) -> String {
    let mut data = selector(signature).to_vec();
    for arg in uint_args {
        let mut word = [0u8; WORD];
        word[WORD - 8..].copy_from_slice(&arg.to_be_bytes());
        data.extend_from_slice(&word);
    }
    format!("0x{}", hex::encode(data))
}

/// ABIワードを長さ・オフセットとして読む（usizeに収まらなければNone）。
fn read_usize(data: &[u8], at: usize) -> Option<usize> {
    let word = data.get(at..at.checked_add(WORD)?)?;
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return None;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(buf)).ok()
}

/// 戻り値の `address` をデコードする。
fn decode_address(data: &[u8]) -> Option<String> {
    let word = data.get(..WORD)?;
    let mut address = [0u8; 20];
    address.copy_from_slice(&word[12..]);
    Some(format_eth_address(&address))
}

/// 戻り値の `string` をデコードする。
fn decode_string(data: &[u8]) -> Option<String> {
    let offset = read_usize(data, 0)?;
    let len = read_usize(data, offset)?;
    let start = offset.checked_add(WORD)?;
    let bytes = data.get(start..start.checked_add(len)?)?;
    String::from_utf8(bytes.to_vec()).ok()
}

/// ERC-721コントラクトを照会するEthereumノードクライアント。
pub struct EthereumRpc {
    rpc: JsonRpcClient,
    fallback: TokenMetadata,
}

impl EthereumRpc {
    /// 新しいEthereumRpcを作成する。`fallback` はメタデータ照会失敗時の既定値。
    pub fn new(rpc: JsonRpcClient, fallback: TokenMetadata) -> Self {
        Self { rpc, fallback }
    }

    /// `contract` に対して `eth_call` を実行し、戻り値のバイト列を返す。
    async fn eth_call(&self, contract: &str, data: String) -> Result<Vec<u8>, ConnectionError> {
        let result = self
            .rpc
            .call(
                "eth_call",
                serde_json::json!([{ "to": contract, "data": data }, "latest"]),
            )
            .await?;

        let encoded = result
            .as_str()
            .ok_or_else(|| ConnectionError::Decode(format!("eth_callの結果が文字列ではありません: {result}")))?;
        hex::decode(encoded.trim_start_matches("0x"))
            .map_err(|e| ConnectionError::Decode(format!("eth_callの結果の16進デコードに失敗: {e}")))
    }

    /// 文字列を返すビュー関数を呼び出す。失敗時はNone。
    async fn call_string(&self, contract: &str, signature: &str, uint_args: &[u64]) -> Option<String> {
        match self.eth_call(contract, encode_call(signature, uint_args)).await {
            Ok(data) => {
                let decoded = decode_string(&data).filter(|s| !s.is_empty());
                if decoded.is_none() {
                    tracing::warn!(contract, signature, "戻り値をstringとしてデコードできません");
                }
                decoded
            }
            Err(e) => {
                tracing::warn!(contract, signature, error = %e, "メタデータの照会に失敗");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl TokenOwnership for EthereumRpc {
    async fn owner_of(&self, contract: &str, token_id: u64) -> Result<String, ClaimError> {
        let data = self
            .eth_call(contract, encode_call("ownerOf(uint256)", &[token_id]))
            .await
            .map_err(|e| match e {
                // 存在しないトークンはrevertされる
                ConnectionError::Rpc { .. } | ConnectionError::Decode(_) => {
                    tracing::warn!(contract, token_id, error = %e, "トークン保有者の照会に失敗");
                    ClaimError::Authentication(OWNER_UNKNOWN.to_string())
                }
                other => ClaimError::from(other),
            })?;

        decode_address(&data).ok_or_else(|| {
            tracing::warn!(
                contract,
                token_id,
                data = %hex::encode(&data),
                "ownerOfの戻り値が不正です"
            );
            ClaimError::Authentication(OWNER_UNKNOWN.to_string())
        })
    }
}

#[async_trait::async_trait]
impl MetadataResolver for EthereumRpc {
    async fn resolve(&self, claim: &Claim) -> Result<TokenMetadata, ClaimError> {
        let contract = &claim.info.source_contract_address;

        let collection_name = self
            .call_string(contract, "name()", &[])
            .await
            .unwrap_or_else(|| self.fallback.collection_name.clone());
        let token_uri = self
            .call_string(contract, "tokenURI(uint256)", &[claim.token_id])
            .await
            .unwrap_or_else(|| self.fallback.token_uri.clone());

        Ok(TokenMetadata {
            collection_name,
            token_uri,
        })
    }
}

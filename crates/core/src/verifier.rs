//! # クレーム認証
//!
//! 解析後・チェーン照会前に、`signature` が `wallet_message` に対する
//! `source_owner_address` の署名であること、およびその所有者が現在トークンを
//! 保有していることを確認する。失敗は `ClaimError::Authentication`。

use std::sync::Arc;

use mirror_crypto::eip712::TypedField;
use mirror_crypto::{decode_hex_signature, eip191_hash, format_eth_address, recover_eth_address, TypedData};
use mirror_types::{AirdropClaimRequest, ClaimDomain};
use serde_json::Value;

use crate::error::ClaimError;
use crate::parser::Claim;

/// クレームの署名・所有権を検証するトレイト。
#[async_trait::async_trait]
pub trait ClaimVerifier: Send + Sync {
    /// 検証に失敗した場合は `ClaimError::Authentication` を返す。
    async fn verify(&self, request: &AirdropClaimRequest, claim: &Claim) -> Result<(), ClaimError>;
}

/// ソースチェーン上のトークン保有者を照会するトレイト。
#[async_trait::async_trait]
pub trait TokenOwnership: Send + Sync {
    /// `contract` の `token_id` の現在の保有者アドレスを返す。
    async fn owner_of(&self, contract: &str, token_id: u64) -> Result<String, ClaimError>;
}

/// 何も検証しない（開発環境用）。
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllVerifier;

#[async_trait::async_trait]
impl ClaimVerifier for AcceptAllVerifier {
    async fn verify(&self, _request: &AirdropClaimRequest, _claim: &Claim) -> Result<(), ClaimError> {
        Ok(())
    }
}

/// クレームのEIP-712主型名
pub const CLAIM_TYPE: &str = "ClaimInfo";

/// `ClaimInfo` のフィールド（宣言順、すべて `string`）
const CLAIM_FIELDS: [&str; 5] = [
    "source_chain",
    "source_contract_address",
    "source_token_id",
    "source_owner_address",
    "destination_sui_address",
];

/// `EIP712Domain` のフィールド（宣言順）
const DOMAIN_FIELDS: [(&str, &str); 3] = [("name", "string"), ("version", "string"), ("chainId", "uint256")];

/// ウォレットが署名した対象の形式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureScheme {
    /// `wallet_message` 全体をEIP-712 typed dataとして署名（`eth_signTypedData_v4`）。
    /// 主型は `ClaimInfo`、ドメインは指定値に固定。
    Eip712(ClaimDomain),
    /// `wallet_message` の生バイト列をEIP-191 personal messageとして署名（`personal_sign`）
    Eip191,
}

/// secp256k1のウォレット署名から署名者を復元して検証する。
pub struct WalletSignatureVerifier {
    scheme: SignatureScheme,
    ownership: Option<Arc<dyn TokenOwnership>>,
}

impl WalletSignatureVerifier {
    /// 署名のみを検証するベリファイアを作成する。
    pub fn new(scheme: SignatureScheme) -> Self {
        Self {
            scheme,
            ownership: None,
        }
    }

    /// 署名に加えてトークンの現保有者も確認する。
    pub fn with_ownership(mut self, ownership: Arc<dyn TokenOwnership>) -> Self {
        self.ownership = Some(ownership);
        self
    }

    fn digest(&self, wallet_message: &str) -> Result<[u8; 32], ClaimError> {
        match &self.scheme {
            SignatureScheme::Eip712(domain) => {
                let typed = TypedData::from_json(wallet_message)
                    .map_err(|e| ClaimError::Authentication(e.to_string()))?;
                check_claim_document(&typed, domain)?;
                typed
                    .signing_hash()
                    .map_err(|e| ClaimError::Authentication(e.to_string()))
            }
            SignatureScheme::Eip191 => Ok(eip191_hash(wallet_message.as_bytes())),
        }
    }
}

/// typed dataがこのサービス向けのクレーム文書であることを確認する。
///
/// 主型・型定義・ドメイン値はいずれも完全一致でなければならない。
fn check_claim_document(typed: &TypedData, domain: &ClaimDomain) -> Result<(), ClaimError> {
    if typed.primary_type != CLAIM_TYPE {
        return Err(ClaimError::Authentication(format!(
            "primaryType は {CLAIM_TYPE} である必要があります"
        )));
    }

    let claim_fields = CLAIM_FIELDS.map(|name| (name, "string"));
    if !fields_match(typed.types.get(CLAIM_TYPE), &claim_fields) {
        return Err(ClaimError::Authentication(format!(
            "{CLAIM_TYPE} の型定義が一致しません"
        )));
    }
    if !fields_match(typed.types.get("EIP712Domain"), &DOMAIN_FIELDS) {
        return Err(ClaimError::Authentication(
            "EIP712Domain の型定義が一致しません".to_string(),
        ));
    }

    let values = typed
        .domain
        .as_object()
        .ok_or_else(|| ClaimError::Authentication("domain はオブジェクトである必要があります".to_string()))?;
    let chain_id_matches = match values.get("chainId") {
        Some(Value::Number(n)) => n.as_u64() == Some(domain.chain_id),
        Some(Value::String(s)) => s.parse::<u64>().ok() == Some(domain.chain_id),
        _ => false,
    };
    if values.len() != DOMAIN_FIELDS.len()
        || values.get("name").and_then(Value::as_str) != Some(domain.name.as_str())
        || values.get("version").and_then(Value::as_str) != Some(domain.version.as_str())
        || !chain_id_matches
    {
        return Err(ClaimError::Authentication(
            "署名ドメインがこのサービスのものではありません".to_string(),
        ));
    }
    Ok(())
}

fn fields_match(declared: Option<&Vec<TypedField>>, expected: &[(&str, &str)]) -> bool {
    declared.is_some_and(|fields| {
        fields.len() == expected.len()
            && fields
                .iter()
                .zip(expected)
                .all(|(field, (name, ty))| field.name == *name && field.ty == *ty)
    })
}

#[async_trait::async_trait]
impl ClaimVerifier for WalletSignatureVerifier {
    async fn verify(&self, request: &AirdropClaimRequest, claim: &Claim) -> Result<(), ClaimError> {
        let digest = self.digest(&request.wallet_message)?;
        let signature = decode_hex_signature(&request.signature)
            .map_err(|e| ClaimError::Authentication(e.to_string()))?;
        let signer = recover_eth_address(&digest, &signature)
            .map_err(|e| ClaimError::Authentication(e.to_string()))?;
        let signer = format_eth_address(&signer);

        if !signer.eq_ignore_ascii_case(&claim.info.source_owner_address) {
            return Err(ClaimError::Authentication(format!(
                "署名者 {signer} が source_owner_address と一致しません"
            )));
        }

        if let Some(ownership) = &self.ownership {
            let holder = ownership
                .owner_of(&claim.info.source_contract_address, claim.token_id)
                .await?;
            if !holder.eq_ignore_ascii_case(&claim.info.source_owner_address) {
                return Err(ClaimError::Authentication(format!(
                    "トークン {} の現在の保有者は {holder} です",
                    claim.info.source_token_id
                )));
            }
        }

        tracing::debug!(signer = %signer, scheme = ?self.scheme, "クレーム署名を検証");
        Ok(())
    }
}

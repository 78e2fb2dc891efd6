//! # Sui NFT Mirror 共有型定義
//!
//! Gatewayの入出力DTOと、宛先チェーン（Sui）とのやり取りで使う値型を提供する。
//!
//! ## エンコーディング規則
//! - Suiアドレス・オブジェクトID: `0x` + 小文字16進数
//! - Ethereumアドレス: `0x` + 16進数（チェックサムは検証しない）
//! - 署名: `0x` + 16進数（65バイト、r || s || v）

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// POST /airdrop/claim
// ---------------------------------------------------------------------------

/// /airdrop/claim リクエスト。
///
/// `wallet_message` はウォレットが署名したJSON文字列（EIP-712 typed dataの外殻）で、
/// `message` キーの下に [`ClaimInfo`] を持つ。リクエストは解析されるのみで変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirdropClaimRequest {
    /// JSONエンコードされた署名対象メッセージ
    pub wallet_message: String,
    /// `wallet_message` に対する署名
    pub signature: String,
}

/// /airdrop/claim レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirdropClaimResponse {
    /// ソースチェーン識別子（リクエストのエコー）
    pub source_chain: String,
    /// ソースチェーン上のNFTコントラクトアドレス（リクエストのエコー）
    pub source_contract_address: String,
    /// ソースチェーン上のトークンID（リクエストのエコー）
    pub source_token_id: String,
    /// 新規発行されたSui NFTのエクスプローラーリンク
    pub sui_explorer_link: String,
}

/// `wallet_message.message` に埋め込まれたクレーム内容。
///
/// 5フィールドすべてが必須。欠落していれば部分オブジェクトではなく検証エラーとなる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimInfo {
    /// ソースチェーン識別子 (例: "ethereum")
    pub source_chain: String,
    /// ソースチェーン上のNFTコントラクトアドレス
    pub source_contract_address: String,
    /// ソースチェーン上のトークンID（10進数文字列）
    pub source_token_id: String,
    /// ソースチェーン上の所有者アドレス
    pub source_owner_address: String,
    /// 発行されたNFTを受け取るSuiアドレス
    pub destination_sui_address: String,
}

/// クレーム署名に使うEIP-712ドメイン。
///
/// ウォレットは `domain` にこの値をそのまま入れて署名する。
/// JSON表現はEIP-712の `EIP712Domain { name, version, chainId }` と一致する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDomain {
    /// ドメイン名
    pub name: String,
    /// ドメインのバージョン
    pub version: String,
    /// ソースチェーンのチェーンID
    pub chain_id: u64,
}

// ---------------------------------------------------------------------------
// GET /.well-known/mirror-node-info
// ---------------------------------------------------------------------------

/// /.well-known/mirror-node-info レスポンス。
///
/// クライアントが署名前に発行先コントラクトを確認するための情報。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// ミントを代行するオラクルアカウントのSuiアドレス
    pub oracle_address: String,
    /// 受け付けるソースチェーン識別子
    pub source_chain: String,
    /// Moveパッケージ ID
    pub package_id: String,
    /// Moveモジュール名
    pub module: String,
    /// エントリ関数名
    pub function: String,
    /// クレーム署名に使うEIP-712ドメイン
    pub claim_domain: ClaimDomain,
}

// ---------------------------------------------------------------------------
// Sui オブジェクト / Move呼び出し
// ---------------------------------------------------------------------------

/// アカウントが所有するオブジェクトの要約。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedObject {
    /// オブジェクトID（チェーンが返したままの形式）
    pub object_id: String,
    /// オブジェクトのMove型 (例: "0x2::Coin::Coin<0x2::SUI::SUI>")
    pub object_type: String,
}

/// Moveエントリ関数の位置引数。
///
/// JSON-RPCへはuntaggedで送られる（数値は数値、それ以外は文字列）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveCallArg {
    /// 符号なし64bit整数
    U64(u64),
    /// オブジェクトID・アドレス・UTF-8文字列
    Str(String),
}

impl From<u64> for MoveCallArg {
    fn from(v: u64) -> Self {
        MoveCallArg::U64(v)
    }
}

impl From<String> for MoveCallArg {
    fn from(v: String) -> Self {
        MoveCallArg::Str(v)
    }
}

impl From<&str> for MoveCallArg {
    fn from(v: &str) -> Self {
        MoveCallArg::Str(v.to_string())
    }
}

/// 1回のMove呼び出しに必要なパラメータ一式。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    /// Moveパッケージ ID
    pub package_id: String,
    /// モジュール名
    pub module: String,
    /// エントリ関数名
    pub function: String,
    /// 位置引数（順序はエントリ関数との契約）
    pub arguments: Vec<MoveCallArg>,
    /// ガス支払いに使うコインオブジェクトID
    pub gas_object_id: String,
    /// ガス予算
    pub gas_budget: u64,
    /// 送信者（オラクルアカウント）
    pub sender: String,
}

/// トランザクションで新規作成されたオブジェクト。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedObject {
    /// オブジェクトID
    pub object_id: String,
}

/// Move呼び出しの実行結果の要約。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCallEffects {
    /// トランザクションダイジェスト（取得できた場合）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// 新規作成されたオブジェクト
    pub created: Vec<CreatedObject>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_call_args_serialize_untagged() {
        let args: Vec<MoveCallArg> = vec!["0xabc".into(), 8937u64.into()];
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json, serde_json::json!(["0xabc", 8937]));
    }

    #[test]
    fn test_claim_request_field_names() {
        let req: AirdropClaimRequest = serde_json::from_value(serde_json::json!({
            "wallet_message": "{}",
            "signature": "0x00",
        }))
        .unwrap();
        assert_eq!(req.wallet_message, "{}");
        assert_eq!(req.signature, "0x00");
    }

    #[test]
    fn test_claim_domain_uses_eip712_field_names() {
        let domain = ClaimDomain {
            name: "SuiNFTMirror".into(),
            version: "1".into(),
            chain_id: 1,
        };
        assert_eq!(
            serde_json::to_value(&domain).unwrap(),
            serde_json::json!({"name": "SuiNFTMirror", "version": "1", "chainId": 1})
        );
    }
}

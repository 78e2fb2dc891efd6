//! # クレーム解析
//!
//! `wallet_message`（EIP-712 typed dataの外殻）をJSONとして解析し、
//! `message` キー以下の [`ClaimInfo`] を取り出して構造検証する。
//! 入力文字列のみに依存する純粋関数で、チェーンへのI/Oは行わない。

use serde_json::Value;

use mirror_types::ClaimInfo;

use crate::error::ClaimError;

/// 構造検証済みのクレーム。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// クレーム内容
    pub info: ClaimInfo,
    /// `source_token_id` を整数化した値
    pub token_id: u64,
}

/// `wallet_message` からクレームを抽出する。
///
/// JSONとして解析できない、`message` がオブジェクトでない、5フィールドのいずれかが
/// 欠落・空・文字列以外、トークンIDが非負整数でない、宛先アドレスが16進数でない場合は
/// `ClaimError::Validation` を返す。
pub fn parse_claim(wallet_message: &str) -> Result<Claim, ClaimError> {
    let envelope: Value = serde_json::from_str(wallet_message).map_err(|e| {
        ClaimError::validation(
            format!("wallet_messageをJSONとして解析できません: {e}"),
            wallet_message,
        )
    })?;

    let message = envelope
        .get("message")
        .filter(|m| m.is_object())
        .ok_or_else(|| {
            ClaimError::validation("wallet_message.messageがオブジェクトではありません", wallet_message)
        })?;

    let info = ClaimInfo {
        source_chain: required_field(message, "source_chain")?,
        source_contract_address: required_field(message, "source_contract_address")?,
        source_token_id: required_field(message, "source_token_id")?,
        source_owner_address: required_field(message, "source_owner_address")?,
        destination_sui_address: required_field(message, "destination_sui_address")?,
    };

    let token_id = parse_token_id(&info.source_token_id)?;

    if !is_hex_address(&info.destination_sui_address) {
        return Err(ClaimError::validation(
            "destination_sui_addressは0x付きの16進数である必要があります",
            info.destination_sui_address,
        ));
    }

    Ok(Claim { info, token_id })
}

fn required_field(message: &Value, name: &str) -> Result<String, ClaimError> {
    match message.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(other) => Err(ClaimError::validation(
            format!("{name} が空か文字列ではありません"),
            other.to_string(),
        )),
        None => Err(ClaimError::validation(format!("{name} がありません"), "null")),
    }
}

/// 10進数のトークンIDを整数化する。符号・空白・16進数は受け付けない。
fn parse_token_id(raw: &str) -> Result<u64, ClaimError> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClaimError::validation(
            "source_token_idは10進数の非負整数である必要があります",
            raw,
        ));
    }
    raw.parse::<u64>().map_err(|_| {
        ClaimError::validation("source_token_idがu64の範囲を超えています", raw)
    })
}

fn is_hex_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(digits) => {
            !digits.is_empty() && digits.len() <= 64 && digits.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{claim_message, sample_claim_json};

    #[test]
    fn test_parse_valid_claim() {
        let claim = parse_claim(&claim_message(sample_claim_json())).unwrap();
        assert_eq!(claim.info.source_chain, "ethereum");
        assert_eq!(claim.info.source_token_id, "8937");
        assert_eq!(claim.token_id, 8937);
    }

    #[test]
    fn test_parse_rejects_each_missing_field() {
        for field in [
            "source_chain",
            "source_contract_address",
            "source_token_id",
            "source_owner_address",
            "destination_sui_address",
        ] {
            let mut claim = sample_claim_json();
            claim.as_object_mut().unwrap().remove(field);
            let result = parse_claim(&claim_message(claim));
            match result {
                Err(ClaimError::Validation { reason, .. }) => assert!(reason.contains(field)),
                other => panic!("{field} 欠落時にValidationにならない: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_rejects_empty_and_non_string_fields() {
        let mut claim = sample_claim_json();
        claim["source_owner_address"] = serde_json::json!("");
        assert!(matches!(
            parse_claim(&claim_message(claim)),
            Err(ClaimError::Validation { .. })
        ));

        let mut claim = sample_claim_json();
        claim["source_token_id"] = serde_json::json!(8937);
        match parse_claim(&claim_message(claim)) {
            Err(ClaimError::Validation { value, .. }) => assert_eq!(value, "8937"),
            other => panic!("数値のトークンIDが受理された: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        match parse_claim("{not json") {
            Err(ClaimError::Validation { value, .. }) => assert_eq!(value, "{not json"),
            other => panic!("不正なJSONが受理された: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_missing_message_key() {
        let raw = serde_json::json!({ "claim": sample_claim_json() }).to_string();
        assert!(matches!(parse_claim(&raw), Err(ClaimError::Validation { .. })));
    }

    #[test]
    fn test_parse_rejects_non_numeric_token_id() {
        for bad in ["abc", "-1", "+5", "12 ", "0x22e9", "1.5", "99999999999999999999999"] {
            let mut claim = sample_claim_json();
            claim["source_token_id"] = serde_json::json!(bad);
            assert!(
                matches!(parse_claim(&claim_message(claim)), Err(ClaimError::Validation { .. })),
                "{bad} が受理された"
            );
        }
    }

    #[test]
    fn test_parse_accepts_zero_token_id() {
        let mut claim = sample_claim_json();
        claim["source_token_id"] = serde_json::json!("0");
        assert_eq!(parse_claim(&claim_message(claim)).unwrap().token_id, 0);
    }

    #[test]
    fn test_parse_rejects_non_hex_destination() {
        let mut claim = sample_claim_json();
        claim["destination_sui_address"] = serde_json::json!("a5e6not-hex");
        assert!(matches!(
            parse_claim(&claim_message(claim)),
            Err(ClaimError::Validation { .. })
        ));
    }
}

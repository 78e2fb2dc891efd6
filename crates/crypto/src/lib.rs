//! # Sui NFT Mirror 暗号処理
//!
//! ソースチェーン（Ethereum）側の署名検証と、宛先チェーン（Sui）側の
//! トランザクション署名に必要なプリミティブを提供する。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | ハッシュ | Keccak-256 |
//! | ウォレット署名（ソース） | secp256k1 ECDSA（公開鍵復元） |
//! | 署名対象 | EIP-191 personal message / EIP-712 typed data |
//! | トランザクション署名（宛先） | Ed25519 |

pub mod eip712;

use ed25519_dalek::Signer;
use k256::ecdsa::{RecoveryId, Signature as Secp256k1Signature, VerifyingKey as Secp256k1VerifyingKey};
use sha3::{Digest, Keccak256};

pub use ed25519_dalek::{Signature as Ed25519Signature, SigningKey as Ed25519SigningKey};
pub use eip712::TypedData;

/// 暗号処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// 署名の形式が不正（長さ・16進数・v値）
    #[error("署名の形式が不正です: {0}")]
    MalformedSignature(String),
    /// 署名から公開鍵を復元できない
    #[error("署名から公開鍵を復元できません")]
    RecoveryFailed,
    /// EIP-712 typed dataの構造が不正
    #[error("typed dataが不正です: {0}")]
    TypedData(String),
}

/// Keccak-256ハッシュ計算。
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// EIP-191 personal messageのハッシュ。
///
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`
pub fn eip191_hash(message: &[u8]) -> [u8; 32] {
    let mut buf = format!("\x19Ethereum Signed Message:\n{}", message.len()).into_bytes();
    buf.extend_from_slice(message);
    keccak256(&buf)
}

/// secp256k1公開鍵からEthereumアドレス（20バイト）を導出する。
pub fn eth_address(verifying_key: &Secp256k1VerifyingKey) -> [u8; 20] {
    let point = verifying_key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Ethereumアドレスを `0x` + 小文字16進数で表す。
pub fn format_eth_address(address: &[u8; 20]) -> String {
    format!("0x{}", hex::encode(address))
}

/// 65バイトのウォレット署名（`r || s || v`）からダイジェストの署名者アドレスを復元する。
///
/// `v` は 0/1 と 27/28 の両方を受け付ける。high-Sの署名は正規化してから復元する。
pub fn recover_eth_address(digest: &[u8; 32], signature: &[u8]) -> Result<[u8; 20], CryptoError> {
    if signature.len() != 65 {
        return Err(CryptoError::MalformedSignature(format!(
            "65バイトである必要があります（{}バイト）",
            signature.len()
        )));
    }

    let v = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        other => {
            return Err(CryptoError::MalformedSignature(format!("不正なv値: {other}")));
        }
    };
    let mut recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| CryptoError::MalformedSignature(format!("不正なv値: {v}")))?;

    let mut sig = Secp256k1Signature::from_slice(&signature[..64])
        .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
    if let Some(normalized) = sig.normalize_s() {
        sig = normalized;
        recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
    }

    let key = Secp256k1VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(eth_address(&key))
}

/// `0x` 付きの16進数署名文字列をデコードする。
pub fn decode_hex_signature(signature: &str) -> Result<Vec<u8>, CryptoError> {
    let stripped = signature.strip_prefix("0x").unwrap_or(signature);
    hex::decode(stripped).map_err(|e| CryptoError::MalformedSignature(e.to_string()))
}

/// Ed25519による署名。
/// 宛先チェーンのトランザクションバイト列にオラクル鍵で署名する。
pub fn ed25519_sign(signing_key: &Ed25519SigningKey, message: &[u8]) -> Ed25519Signature {
    signing_key.sign(message)
}

//! # EIP-712 typed data
//!
//! ウォレットが `eth_signTypedData_v4` で署名したJSON文書から署名対象ダイジェストを計算する。
//!
//! ```text
//! digest = keccak256(0x19 0x01 || hashStruct(EIP712Domain, domain) || hashStruct(primaryType, message))
//! ```
//!
//! 対応する型: `string`, `bytes`, `bytesN`, `bool`, `address`, `uintN`, `intN`,
//! 構造体、配列（`T[]`, `T[n]`）。

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;

use crate::{keccak256, CryptoError};

/// EIP-712ドメインの型名
const DOMAIN_TYPE: &str = "EIP712Domain";

/// 構造体のフィールド定義
#[derive(Debug, Clone, Deserialize)]
pub struct TypedField {
    /// フィールド名
    pub name: String,
    /// Solidity型名
    #[serde(rename = "type")]
    pub ty: String,
}

/// EIP-712 typed data文書。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    /// 型定義（`EIP712Domain` を含む）
    pub types: BTreeMap<String, Vec<TypedField>>,
    /// 署名対象の主型
    pub primary_type: String,
    /// ドメイン値
    pub domain: Value,
    /// メッセージ値
    pub message: Value,
}

impl TypedData {
    /// JSON文字列からtyped dataを読み込む。
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        serde_json::from_str(json).map_err(|e| CryptoError::TypedData(e.to_string()))
    }

    /// 署名対象ダイジェストを計算する。
    pub fn signing_hash(&self) -> Result<[u8; 32], CryptoError> {
        let domain_separator = self.hash_struct(DOMAIN_TYPE, &self.domain)?;
        let mut buf = Vec::with_capacity(66);
        buf.extend_from_slice(&[0x19, 0x01]);
        buf.extend_from_slice(&domain_separator);
        if self.primary_type != DOMAIN_TYPE {
            buf.extend_from_slice(&self.hash_struct(&self.primary_type, &self.message)?);
        }
        Ok(keccak256(&buf))
    }

    /// `hashStruct(ty, data) = keccak256(typeHash || encodeData(data))`
    pub fn hash_struct(&self, ty: &str, data: &Value) -> Result<[u8; 32], CryptoError> {
        let fields = self
            .types
            .get(ty)
            .ok_or_else(|| CryptoError::TypedData(format!("未定義の型: {ty}")))?;

        let mut buf = Vec::with_capacity(32 * (fields.len() + 1));
        buf.extend_from_slice(&keccak256(self.encode_type(ty)?.as_bytes()));
        for field in fields {
            let value = data.get(&field.name).ok_or_else(|| {
                CryptoError::TypedData(format!("{ty}.{} が見つかりません", field.name))
            })?;
            buf.extend_from_slice(&self.encode_value(&field.ty, value)?);
        }
        Ok(keccak256(&buf))
    }

    /// `encodeType`: 主型の後に依存する構造体型をアルファベット順に連結する。
    pub fn encode_type(&self, primary: &str) -> Result<String, CryptoError> {
        let mut deps = BTreeSet::new();
        self.collect_dependencies(primary, &mut deps);
        deps.remove(primary);

        let mut out = String::new();
        for name in std::iter::once(primary).chain(deps.iter().map(String::as_str)) {
            let fields = self
                .types
                .get(name)
                .ok_or_else(|| CryptoError::TypedData(format!("未定義の型: {name}")))?;
            let members: Vec<String> = fields
                .iter()
                .map(|f| format!("{} {}", f.ty, f.name))
                .collect();
            out.push_str(&format!("{name}({})", members.join(",")));
        }
        Ok(out)
    }

    fn collect_dependencies(&self, ty: &str, found: &mut BTreeSet<String>) {
        let base = base_type(ty);
        if found.contains(base) {
            return;
        }
        let Some(fields) = self.types.get(base) else {
            return;
        };
        found.insert(base.to_string());
        for field in fields {
            self.collect_dependencies(&field.ty, found);
        }
    }

    fn encode_value(&self, ty: &str, value: &Value) -> Result<[u8; 32], CryptoError> {
        if let Some(inner) = array_element_type(ty) {
            let items = value
                .as_array()
                .ok_or_else(|| CryptoError::TypedData(format!("{ty} には配列が必要です")))?;
            let mut buf = Vec::with_capacity(32 * items.len());
            for item in items {
                buf.extend_from_slice(&self.encode_value(inner, item)?);
            }
            return Ok(keccak256(&buf));
        }

        if self.types.contains_key(ty) {
            return self.hash_struct(ty, value);
        }

        match ty {
            "string" => {
                let s = value
                    .as_str()
                    .ok_or_else(|| CryptoError::TypedData("string には文字列が必要です".into()))?;
                Ok(keccak256(s.as_bytes()))
            }
            "bytes" => Ok(keccak256(&hex_value(value)?)),
            "bool" => {
                let b = value
                    .as_bool()
                    .ok_or_else(|| CryptoError::TypedData("bool には真偽値が必要です".into()))?;
                let mut word = [0u8; 32];
                word[31] = b as u8;
                Ok(word)
            }
            "address" => {
                let bytes = hex_value(value)?;
                if bytes.len() != 20 {
                    return Err(CryptoError::TypedData(format!(
                        "address は20バイトである必要があります（{}バイト）",
                        bytes.len()
                    )));
                }
                let mut word = [0u8; 32];
                word[12..].copy_from_slice(&bytes);
                Ok(word)
            }
            t if t.starts_with("uint") => uint_word(value),
            t if t.starts_with("int") => int_word(value),
            t if t.starts_with("bytes") => {
                let bytes = hex_value(value)?;
                if bytes.len() > 32 {
                    return Err(CryptoError::TypedData(format!("{t} が32バイトを超えています")));
                }
                let mut word = [0u8; 32];
                word[..bytes.len()].copy_from_slice(&bytes);
                Ok(word)
            }
            other => Err(CryptoError::TypedData(format!("未対応の型: {other}"))),
        }
    }
}

/// `Person[2][]` → `Person`
fn base_type(ty: &str) -> &str {
    ty.split('[').next().unwrap_or(ty)
}

/// `Person[]` → `Person`, `uint8[3][]` → `uint8[3]`
fn array_element_type(ty: &str) -> Option<&str> {
    if !ty.ends_with(']') {
        return None;
    }
    ty.rfind('[').map(|idx| &ty[..idx])
}

fn hex_value(value: &Value) -> Result<Vec<u8>, CryptoError> {
    let s = value
        .as_str()
        .ok_or_else(|| CryptoError::TypedData("16進数文字列が必要です".into()))?;
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| CryptoError::TypedData(format!("16進数のデコードに失敗: {e}")))
}

/// 数値・10進数文字列・`0x` 付き16進数文字列を256bitビッグエンディアンにする。
fn uint_word(value: &Value) -> Result<[u8; 32], CryptoError> {
    match value {
        Value::Number(n) => {
            let v = n
                .as_u64()
                .ok_or_else(|| CryptoError::TypedData(format!("uint に負数・小数は使えません: {n}")))?;
            let mut word = [0u8; 32];
            word[24..].copy_from_slice(&v.to_be_bytes());
            Ok(word)
        }
        Value::String(s) => parse_uint_str(s),
        _ => Err(CryptoError::TypedData("uint には数値が必要です".into())),
    }
}

fn int_word(value: &Value) -> Result<[u8; 32], CryptoError> {
    let (negative, magnitude) = match value {
        Value::Number(n) => {
            let v = n
                .as_i64()
                .ok_or_else(|| CryptoError::TypedData(format!("int に小数は使えません: {n}")))?;
            let mut word = [0u8; 32];
            word[24..].copy_from_slice(&v.unsigned_abs().to_be_bytes());
            (v < 0, word)
        }
        Value::String(s) => match s.strip_prefix('-') {
            Some(rest) => (true, parse_uint_str(rest)?),
            None => (false, parse_uint_str(s)?),
        },
        _ => return Err(CryptoError::TypedData("int には数値が必要です".into())),
    };

    if !negative {
        return Ok(magnitude);
    }
    // 2の補数
    let mut word = magnitude.map(|b| !b);
    for byte in word.iter_mut().rev() {
        let (sum, carry) = byte.overflowing_add(1);
        *byte = sum;
        if !carry {
            break;
        }
    }
    Ok(word)
}

fn parse_uint_str(s: &str) -> Result<[u8; 32], CryptoError> {
    if let Some(hex_digits) = s.strip_prefix("0x") {
        let padded = if hex_digits.len() % 2 == 1 {
            format!("0{hex_digits}")
        } else {
            hex_digits.to_string()
        };
        let bytes = hex::decode(&padded)
            .map_err(|e| CryptoError::TypedData(format!("16進数のデコードに失敗: {e}")))?;
        if bytes.len() > 32 {
            return Err(CryptoError::TypedData(format!("256bitを超える値: {s}")));
        }
        let mut word = [0u8; 32];
        word[32 - bytes.len()..].copy_from_slice(&bytes);
        return Ok(word);
    }

    if s.is_empty() {
        return Err(CryptoError::TypedData("空の数値".into()));
    }
    let mut word = [0u8; 32];
    for c in s.chars() {
        let digit = c
            .to_digit(10)
            .ok_or_else(|| CryptoError::TypedData(format!("10進数ではありません: {s}")))?;
        // word = word * 10 + digit
        let mut carry = digit;
        for byte in word.iter_mut().rev() {
            let v = (*byte as u32) * 10 + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        if carry != 0 {
            return Err(CryptoError::TypedData(format!("256bitを超える値: {s}")));
        }
    }
    Ok(word)
}

//! # オブジェクト解決
//!
//! オラクルアカウントの所有オブジェクトから、ミントの支払いに使うガスコインと
//! ミントを認可するオラクルオブジェクトを選ぶ。クレームごとに再照会し、キャッシュしない。

use mirror_types::OwnedObject;

use crate::config::ClaimConfig;
use crate::connection::{round_trip, Connection};
use crate::error::ClaimError;

/// クレーム1件の間だけ使うオブジェクトIDの組。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAuthority {
    /// トランザクションを支払うガスコイン
    pub gas_object_id: String,
    /// ミントを認可するオラクルオブジェクト
    pub oracle_object_id: String,
}

/// オラクルアカウントの所有オブジェクトを1回照会し、ガスコインとオラクルオブジェクトを選ぶ。
pub async fn resolve_authority(
    connection: &dyn Connection,
    config: &ClaimConfig,
) -> Result<ResolvedAuthority, ClaimError> {
    let objects = round_trip(
        config.chain_timeout,
        "所有オブジェクトの照会",
        connection.list_objects_owned_by(&config.oracle_address),
    )
    .await?;

    tracing::debug!(
        oracle_address = %config.oracle_address,
        owned_objects = objects.len(),
        "オラクルアカウントの所有オブジェクトを取得"
    );

    select_authority(&objects, &config.gas_coin_type, &config.oracle_type())
}

/// 所有オブジェクトの一覧から選ぶ。
///
/// - ガスコイン: 型が `gas_coin_type` に一致する最初のオブジェクト。無ければ `NotFound`。
/// - オラクルオブジェクト: 型が `oracle_type` に完全一致する唯一のオブジェクト。
///   0個または2個以上なら `Integrity`。
pub fn select_authority(
    objects: &[OwnedObject],
    gas_coin_type: &str,
    oracle_type: &str,
) -> Result<ResolvedAuthority, ClaimError> {
    let gas = objects
        .iter()
        .find(|o| o.object_type == gas_coin_type)
        .ok_or_else(|| {
            ClaimError::NotFound(format!("オラクルアカウントに {gas_coin_type} がありません"))
        })?;

    let oracles: Vec<&OwnedObject> = objects
        .iter()
        .filter(|o| o.object_type == oracle_type)
        .collect();
    let oracle = match oracles.as_slice() {
        [only] => *only,
        other => {
            return Err(ClaimError::Integrity(format!(
                "{oracle_type} はちょうど1個である必要があります（{}個）",
                other.len()
            )));
        }
    };

    Ok(ResolvedAuthority {
        gas_object_id: normalize_object_id(&gas.object_id)?,
        oracle_object_id: normalize_object_id(&oracle.object_id)?,
    })
}

/// オブジェクトIDを `0x` + 小文字16進数に正規化する。
pub fn normalize_object_id(raw: &str) -> Result<String, ClaimError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ClaimError::Integrity(format!(
            "チェーンが不正なオブジェクトIDを返しました: {raw}"
        )));
    }
    Ok(format!("0x{}", digits.to_ascii_lowercase()))
}

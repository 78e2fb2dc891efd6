//! # ミント呼び出しの組み立て
//!
//! クレーム・解決済みオブジェクト・メタデータ・コントラクト座標から
//! 1回分のMove呼び出しを組み立てる。I/Oは行わない。

use mirror_types::{MoveCall, MoveCallArg};

use crate::config::ClaimConfig;
use crate::metadata::TokenMetadata;
use crate::parser::Claim;
use crate::resolver::ResolvedAuthority;

/// ミント呼び出しのガス予算（固定値）
pub const DEFAULT_GAS_BUDGET: u64 = 2000;

/// ミント用のMove呼び出しを組み立てる。
///
/// 引数の順序はエントリ関数との契約であり変更してはならない:
/// `[oracle_object_id, destination_sui_address, source_contract_address, token_id, collection_name, token_uri]`
///
/// 送信者は常にオラクルアカウント。ユーザー自身のアドレスが宛先チェーンで署名することはない。
pub fn build_mint_invocation(
    claim: &Claim,
    authority: &ResolvedAuthority,
    metadata: &TokenMetadata,
    config: &ClaimConfig,
) -> MoveCall {
    let arguments = vec![
        MoveCallArg::from(authority.oracle_object_id.as_str()),
        MoveCallArg::from(claim.info.destination_sui_address.as_str()),
        MoveCallArg::from(claim.info.source_contract_address.as_str()),
        MoveCallArg::from(claim.token_id),
        MoveCallArg::from(metadata.collection_name.as_str()),
        MoveCallArg::from(metadata.token_uri.as_str()),
    ];

    MoveCall {
        package_id: config.package_id.clone(),
        module: config.module.clone(),
        function: config.function.clone(),
        arguments,
        gas_object_id: authority.gas_object_id.clone(),
        gas_budget: DEFAULT_GAS_BUDGET,
        sender: config.oracle_address.clone(),
    }
}

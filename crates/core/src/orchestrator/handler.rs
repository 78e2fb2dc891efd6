//! クレーム処理の実装

use std::sync::Arc;

use mirror_types::{AirdropClaimRequest, AirdropClaimResponse, MoveCallEffects};

use crate::config::ClaimConfig;
use crate::connection::{bounded, round_trip, Connection};
use crate::error::ClaimError;
use crate::invocation::build_mint_invocation;
use crate::lock::OracleLocks;
use crate::metadata::MetadataResolver;
use crate::parser::{parse_claim, Claim};
use crate::resolver::{normalize_object_id, resolve_authority};
use crate::verifier::ClaimVerifier;

/// クレーム処理サービス。
///
/// 設定と協調オブジェクトは起動時に注入される。クレーム間で共有する可変状態は
/// オラクルアカウント単位のロックのみ。
pub struct ClaimService {
    config: Arc<ClaimConfig>,
    connection: Arc<dyn Connection>,
    verifier: Arc<dyn ClaimVerifier>,
    metadata: Arc<dyn MetadataResolver>,
    locks: OracleLocks,
}

impl ClaimService {
    /// 新しいClaimServiceを作成する。
    pub fn new(
        config: Arc<ClaimConfig>,
        connection: Arc<dyn Connection>,
        verifier: Arc<dyn ClaimVerifier>,
        metadata: Arc<dyn MetadataResolver>,
    ) -> Self {
        Self {
            config,
            connection,
            verifier,
            metadata,
            locks: OracleLocks::new(),
        }
    }

    /// 設定を返す。
    pub fn config(&self) -> &ClaimConfig {
        &self.config
    }

    /// クレームを処理し、新規ミントしたNFTのリンクを返す。
    pub async fn claim(
        &self,
        request: &AirdropClaimRequest,
    ) -> Result<AirdropClaimResponse, ClaimError> {
        let result = self.process(request).await;
        match &result {
            Ok(response) => tracing::info!(
                source_chain = %response.source_chain,
                source_contract_address = %response.source_contract_address,
                source_token_id = %response.source_token_id,
                sui_explorer_link = %response.sui_explorer_link,
                "クレーム完了"
            ),
            Err(e) if e.is_client_error() => tracing::warn!(error = %e, "クレームを拒否"),
            Err(e) => tracing::error!(error = %e, "クレーム処理に失敗"),
        }
        result
    }

    async fn process(
        &self,
        request: &AirdropClaimRequest,
    ) -> Result<AirdropClaimResponse, ClaimError> {
        let config = &*self.config;

        // Step 1: 解析・構造検証
        let claim = parse_claim(&request.wallet_message)?;
        if claim.info.source_chain != config.source_chain {
            return Err(ClaimError::validation(
                format!("未対応のソースチェーンです（対応: {}）", config.source_chain),
                claim.info.source_chain,
            ));
        }
        tracing::debug!(
            source_contract_address = %claim.info.source_contract_address,
            source_token_id = %claim.info.source_token_id,
            "クレームを解析"
        );

        // Step 2: 署名・所有権の検証（チェーン照会より前）
        bounded(
            config.chain_timeout,
            "クレームの検証",
            self.verifier.verify(request, &claim),
        )
        .await?;

        // Step 3: 表示用メタデータ
        let metadata = bounded(
            config.chain_timeout,
            "メタデータの解決",
            self.metadata.resolve(&claim),
        )
        .await?;

        // Step 4〜6: オラクルアカウントの排他区間
        let effects = {
            let _guard = self.locks.acquire(&config.oracle_address).await;

            let authority = resolve_authority(self.connection.as_ref(), config).await?;
            tracing::debug!(
                gas_object_id = %authority.gas_object_id,
                oracle_object_id = %authority.oracle_object_id,
                "オラクルオブジェクトを解決"
            );

            let call = build_mint_invocation(&claim, &authority, &metadata, config);
            tracing::debug!(
                package_id = %call.package_id,
                module = %call.module,
                function = %call.function,
                "ミント呼び出しを送信"
            );

            round_trip(
                config.chain_timeout,
                "ミント呼び出しの送信",
                self.connection.submit_move_call(&call),
            )
            .await?
        };

        // Step 7: 作成オブジェクトの確認
        let object_id = single_created_object(&claim, &effects)?;
        Ok(AirdropClaimResponse {
            source_chain: claim.info.source_chain,
            source_contract_address: claim.info.source_contract_address,
            source_token_id: claim.info.source_token_id,
            sui_explorer_link: config.explorer_link(&object_id),
        })
    }
}

/// 作成オブジェクトがちょうど1個であることを確認し、そのIDを返す。
///
/// 0個または2個以上の場合、チェーン上ではコミット済みの可能性があるため
/// 運用者向けに作成オブジェクトを全て記録してから `Integrity` を返す。
fn single_created_object(claim: &Claim, effects: &MoveCallEffects) -> Result<String, ClaimError> {
    match effects.created.as_slice() {
        [only] => normalize_object_id(&only.object_id),
        others => {
            let ids: Vec<&str> = others.iter().map(|o| o.object_id.as_str()).collect();
            tracing::error!(
                digest = ?effects.digest,
                created = ?ids,
                source_contract_address = %claim.info.source_contract_address,
                source_token_id = %claim.info.source_token_id,
                "ミント結果の作成オブジェクト数が想定外です"
            );
            Err(ClaimError::Integrity(format!(
                "作成オブジェクトはちょうど1個である必要があります（{}個）",
                others.len()
            )))
        }
    }
}

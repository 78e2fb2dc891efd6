//! # POST /airdrop/claim
//!
//! ソースチェーンNFTの保有者による署名付きクレームを受け付け、
//! Sui上にリンクされたNFTをミントする。
//!
//! ## 処理フロー
//! 1. `wallet_message` からクレーム内容を解析・検証
//! 2. 署名と保有者を検証
//! 3. オラクルアカウントのガスコイン・オラクルオブジェクトを解決
//! 4. ミント用Move呼び出しを署名・送信
//! 5. 作成されたNFTのエクスプローラーリンクを返却

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use mirror_types::{AirdropClaimRequest, AirdropClaimResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;

/// POST /airdrop/claim: クレームの処理。
pub async fn handle_claim(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<AirdropClaimRequest>,
) -> Result<Json<AirdropClaimResponse>, GatewayError> {
    let response = state.service.claim(&request).await?;
    Ok(Json(response))
}

//! # GET /.well-known/mirror-node-info
//!
//! ノード情報公開エンドポイント。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use mirror_types::NodeInfo;

use crate::config::GatewayState;

/// GET /.well-known/mirror-node-info: ノード情報公開。
///
/// クライアントが署名前に、ミントを代行するオラクルアカウントと
/// 呼び出されるMoveエントリ関数、署名すべきEIP-712ドメインを確認するための情報を返却する。
pub async fn handle_node_info(State(state): State<Arc<GatewayState>>) -> Json<NodeInfo> {
    let config = state.service.config();
    Json(NodeInfo {
        oracle_address: config.oracle_address.clone(),
        source_chain: config.source_chain.clone(),
        package_id: config.package_id.clone(),
        module: config.module.clone(),
        function: config.function.clone(),
        claim_domain: config.claim_domain.clone(),
    })
}

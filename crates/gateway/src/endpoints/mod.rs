//! # Gatewayエンドポイント

pub mod claim;
pub mod node_info;

pub use claim::handle_claim;
pub use node_info::handle_node_info;

use std::sync::Arc;

use crate::config::GatewayState;

/// 全エンドポイントを登録したルーター。
pub fn router(state: Arc<GatewayState>) -> axum::Router {
    axum::Router::new()
        .route("/airdrop/claim", axum::routing::post(handle_claim))
        .route(
            "/.well-known/mirror-node-info",
            axum::routing::get(handle_node_info),
        )
        .with_state(state)
}

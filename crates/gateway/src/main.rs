//! # Sui NFT Mirror Gateway
//!
//! ソースチェーン（Ethereum）のNFT保有者による署名付きクレームを受け付け、
//! オラクルアカウントとしてSui上にリンクされたNFTをミントする。
//!
//! ## 役割
//! - クレームの構造検証・署名検証（オプションで保有者確認）
//! - オラクルアカウントのガスコイン・オラクルオブジェクトの解決
//! - ミント用Move呼び出しの署名・送信
//!
//! ## API エンドポイント
//! - `POST /airdrop/claim`: クレームの処理
//! - `GET /.well-known/mirror-node-info`: ノード情報公開

mod config;
mod endpoints;
mod error;
mod eth_rpc;
mod rpc;
mod sui_rpc;

use std::sync::Arc;

use config::{GatewayConfig, GatewayState};

// ---------------------------------------------------------------------------
// エントリポイント
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    let addr = config.listen_addr.clone();
    tracing::info!(
        source_chain = %config.claim.source_chain,
        package_id = %config.claim.package_id,
        module = %config.claim.module,
        function = %config.claim.function,
        verifier = ?config.verifier,
        "設定を読み込みました"
    );

    let state = Arc::new(GatewayState::from_config(config)?);
    let app = endpoints::router(state);

    tracing::info!("Gatewayを {} で起動します", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みと、ハンドラが共有する [`GatewayState`] の構築。
//!
//! | 環境変数 | 既定値 |
//! |----------|--------|
//! | `LISTEN_ADDR` | `0.0.0.0:3000` |
//! | `SUI_RPC_URL` | `https://fullnode.devnet.sui.io:443` |
//! | `ORACLE_ADDRESS` | （必須） |
//! | `ORACLE_KEYPAIR` | （必須、32バイトEd25519シードの16進数） |
//! | `AIRDROP_PACKAGE_ID` / `AIRDROP_MODULE` / `AIRDROP_FUNCTION` | `0x2` / `CrossChainAirdrop` / `claim` |
//! | `AIRDROP_ORACLE_TYPE` | `CrossChainAirdropOracle` |
//! | `SUI_GAS_COIN_TYPE` | `0x2::Coin::Coin<0x2::SUI::SUI>` |
//! | `SUI_EXPLORER_URL` | `https://explorer.devnet.sui.io` |
//! | `SOURCE_CHAIN` | `ethereum` |
//! | `CHAIN_TIMEOUT_SECS` | `30` |
//! | `CLAIM_VERIFIER` | `eip712`（`eip191` / `none`） |
//! | `CLAIM_DOMAIN_NAME` / `CLAIM_DOMAIN_VERSION` / `CLAIM_DOMAIN_CHAIN_ID` | `SuiNFTMirror` / `1` / `1` |
//! | `ETH_RPC_URL` | 未設定（設定時は保有者確認とオンチェーンメタデータを有効化） |
//! | `COLLECTION_NAME` / `TOKEN_URI` | 固定メタデータ |

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use mirror_core::config::{
    DEFAULT_DOMAIN_CHAIN_ID, DEFAULT_DOMAIN_NAME, DEFAULT_DOMAIN_VERSION,
    DEFAULT_EXPLORER_BASE_URL, DEFAULT_FUNCTION, DEFAULT_GAS_COIN_TYPE, DEFAULT_MODULE,
    DEFAULT_ORACLE_TYPE_NAME, DEFAULT_PACKAGE_ID, DEFAULT_SOURCE_CHAIN,
};
use mirror_core::metadata::{DEFAULT_COLLECTION_NAME, DEFAULT_TOKEN_URI};
use mirror_core::{
    AcceptAllVerifier, ClaimConfig, ClaimService, ClaimVerifier, MetadataResolver, SignatureScheme,
    StaticMetadata, TokenMetadata, WalletSignatureVerifier,
};
use mirror_crypto::Ed25519SigningKey;

use crate::eth_rpc::EthereumRpc;
use crate::rpc::JsonRpcClient;
use crate::sui_rpc::SuiRpcConnection;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SUI_RPC_URL: &str = "https://fullnode.devnet.sui.io:443";

/// クレーム認証の方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierKind {
    /// EIP-712 typed data署名
    Eip712,
    /// EIP-191 personal message署名
    Eip191,
    /// 検証しない（開発環境用）
    None,
}

impl FromStr for VerifierKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eip712" => Ok(VerifierKind::Eip712),
            "eip191" => Ok(VerifierKind::Eip191),
            "none" => Ok(VerifierKind::None),
            other => Err(anyhow::anyhow!(
                "CLAIM_VERIFIERは eip712 / eip191 / none のいずれかである必要があります: {other}"
            )),
        }
    }
}

/// Gateway設定。
pub struct GatewayConfig {
    /// リッスンアドレス
    pub listen_addr: String,
    /// SuiフルノードのJSON-RPC URL
    pub sui_rpc_url: String,
    /// EthereumノードのJSON-RPC URL
    pub eth_rpc_url: Option<String>,
    /// クレーム認証の方式
    pub verifier: VerifierKind,
    /// オラクルアカウントの署名鍵
    pub oracle_keypair: Ed25519SigningKey,
    /// 固定メタデータ（`ETH_RPC_URL` 設定時は照会失敗時の既定値）
    pub metadata: TokenMetadata,
    /// クレーム処理設定
    pub claim: ClaimConfig,
}

impl GatewayConfig {
    /// 環境変数から設定を読み込む。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// `var` で与えられた変数から設定を読み込む。
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let oracle_address = var("ORACLE_ADDRESS")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("ORACLE_ADDRESSが未設定です"))?;

        let keypair_hex = var("ORACLE_KEYPAIR")
            .ok_or_else(|| anyhow::anyhow!("ORACLE_KEYPAIRが未設定です"))?;
        let key_bytes = hex::decode(keypair_hex.trim().trim_start_matches("0x"))?;
        let key_arr: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("ORACLE_KEYPAIRは32バイトの16進数である必要があります"))?;

        let timeout_secs: u64 = or_default("CHAIN_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| anyhow::anyhow!("CHAIN_TIMEOUT_SECSが不正です: {e}"))?;
        if timeout_secs == 0 {
            anyhow::bail!("CHAIN_TIMEOUT_SECSは1以上である必要があります");
        }

        let domain_chain_id: u64 = or_default("CLAIM_DOMAIN_CHAIN_ID", &DEFAULT_DOMAIN_CHAIN_ID.to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("CLAIM_DOMAIN_CHAIN_IDが不正です: {e}"))?;

        let mut claim = ClaimConfig::new(oracle_address);
        claim.source_chain = or_default("SOURCE_CHAIN", DEFAULT_SOURCE_CHAIN);
        claim.package_id = or_default("AIRDROP_PACKAGE_ID", DEFAULT_PACKAGE_ID);
        claim.module = or_default("AIRDROP_MODULE", DEFAULT_MODULE);
        claim.function = or_default("AIRDROP_FUNCTION", DEFAULT_FUNCTION);
        claim.oracle_type_name = or_default("AIRDROP_ORACLE_TYPE", DEFAULT_ORACLE_TYPE_NAME);
        claim.gas_coin_type = or_default("SUI_GAS_COIN_TYPE", DEFAULT_GAS_COIN_TYPE);
        claim.explorer_base_url = or_default("SUI_EXPLORER_URL", DEFAULT_EXPLORER_BASE_URL);
        claim.chain_timeout = Duration::from_secs(timeout_secs);
        claim.claim_domain.name = or_default("CLAIM_DOMAIN_NAME", DEFAULT_DOMAIN_NAME);
        claim.claim_domain.version = or_default("CLAIM_DOMAIN_VERSION", DEFAULT_DOMAIN_VERSION);
        claim.claim_domain.chain_id = domain_chain_id;

        Ok(Self {
            listen_addr: or_default("LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
            sui_rpc_url: or_default("SUI_RPC_URL", DEFAULT_SUI_RPC_URL),
            eth_rpc_url: var("ETH_RPC_URL").filter(|s| !s.is_empty()),
            verifier: or_default("CLAIM_VERIFIER", "eip712").parse()?,
            oracle_keypair: Ed25519SigningKey::from_bytes(&key_arr),
            metadata: TokenMetadata {
                collection_name: or_default("COLLECTION_NAME", DEFAULT_COLLECTION_NAME),
                token_uri: or_default("TOKEN_URI", DEFAULT_TOKEN_URI),
            },
            claim,
        })
    }
}

/// Gatewayの共有状態。
pub struct GatewayState {
    /// クレーム処理サービス
    pub service: ClaimService,
}

impl GatewayState {
    /// 設定から接続・ベリファイア・メタデータリゾルバを組み立てる。
    pub fn from_config(config: GatewayConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.claim.chain_timeout)
            .build()?;

        tracing::info!(
            oracle_address = %config.claim.oracle_address,
            oracle_pubkey = %hex::encode(config.oracle_keypair.verifying_key().to_bytes()),
            sui_rpc_url = %config.sui_rpc_url,
            "オラクルアカウント"
        );

        let connection = Arc::new(SuiRpcConnection::new(
            JsonRpcClient::new(http_client.clone(), config.sui_rpc_url),
            config.oracle_keypair,
        ));

        let ethereum = config.eth_rpc_url.map(|url| {
            Arc::new(EthereumRpc::new(
                JsonRpcClient::new(http_client.clone(), url),
                config.metadata.clone(),
            ))
        });

        let verifier: Arc<dyn ClaimVerifier> = match config.verifier {
            VerifierKind::None => {
                tracing::warn!("CLAIM_VERIFIER=none: クレームの署名を検証しません（開発環境用）");
                Arc::new(AcceptAllVerifier)
            }
            kind => {
                let scheme = if kind == VerifierKind::Eip191 {
                    SignatureScheme::Eip191
                } else {
                    SignatureScheme::Eip712(config.claim.claim_domain.clone())
                };
                let verifier = WalletSignatureVerifier::new(scheme);
                match &ethereum {
                    Some(eth) => Arc::new(verifier.with_ownership(eth.clone())),
                    None => {
                        tracing::warn!("ETH_RPC_URLが未設定です。トークン保有者の確認を行いません");
                        Arc::new(verifier)
                    }
                }
            }
        };

        let metadata: Arc<dyn MetadataResolver> = match ethereum {
            Some(eth) => eth as Arc<dyn MetadataResolver>,
            None => Arc::new(StaticMetadata::new(
                config.metadata.collection_name,
                config.metadata.token_uri,
            )),
        };

        Ok(Self {
            service: ClaimService::new(Arc::new(config.claim), connection, verifier, metadata),
        })
    }
}

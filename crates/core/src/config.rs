//! # クレーム処理設定
//!
//! 起動時に一度だけ構築され、[`crate::ClaimService`] に明示的に渡される不変の設定。
//! 処理中に環境変数を読むことはない。

use std::time::Duration;

use mirror_types::ClaimDomain;

/// MoveパッケージIDの既定値（Suiフレームワーク）
pub const DEFAULT_PACKAGE_ID: &str = "0x2";
/// Moveモジュール名の既定値
pub const DEFAULT_MODULE: &str = "CrossChainAirdrop";
/// エントリ関数名の既定値
pub const DEFAULT_FUNCTION: &str = "claim";
/// オラクルオブジェクトの型名の既定値
pub const DEFAULT_ORACLE_TYPE_NAME: &str = "CrossChainAirdropOracle";
/// ガスコイン型の既定値
pub const DEFAULT_GAS_COIN_TYPE: &str = "0x2::Coin::Coin<0x2::SUI::SUI>";
/// エクスプローラーURLの既定値
pub const DEFAULT_EXPLORER_BASE_URL: &str = "https://explorer.devnet.sui.io";
/// 受け付けるソースチェーンの既定値
pub const DEFAULT_SOURCE_CHAIN: &str = "ethereum";
/// クレーム署名ドメイン名の既定値
pub const DEFAULT_DOMAIN_NAME: &str = "SuiNFTMirror";
/// クレーム署名ドメインのバージョンの既定値
pub const DEFAULT_DOMAIN_VERSION: &str = "1";
/// クレーム署名ドメインのチェーンIDの既定値（Ethereumメインネット）
pub const DEFAULT_DOMAIN_CHAIN_ID: u64 = 1;
/// チェーン往復のタイムアウト既定値
pub const DEFAULT_CHAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// クレーム処理設定。
#[derive(Debug, Clone)]
pub struct ClaimConfig {
    /// ミントを代行・署名・支払いするオラクルアカウント
    pub oracle_address: String,
    /// 受け付けるソースチェーン識別子
    pub source_chain: String,
    /// MoveパッケージID
    pub package_id: String,
    /// Moveモジュール名
    pub module: String,
    /// エントリ関数名
    pub function: String,
    /// オラクルオブジェクトの型名（`<package>::<module>::` の後ろ）
    pub oracle_type_name: String,
    /// ガスコインのMove型
    pub gas_coin_type: String,
    /// エクスプローラーのベースURL
    pub explorer_base_url: String,
    /// クレーム署名のEIP-712ドメイン
    pub claim_domain: ClaimDomain,
    /// 1回のチェーン往復（照会・送信・所有権/メタデータ参照）のタイムアウト
    pub chain_timeout: Duration,
}

impl ClaimConfig {
    /// オラクルアカウント以外を既定値で埋めた設定を作る。
    pub fn new(oracle_address: impl Into<String>) -> Self {
        Self {
            oracle_address: oracle_address.into(),
            source_chain: DEFAULT_SOURCE_CHAIN.to_string(),
            package_id: DEFAULT_PACKAGE_ID.to_string(),
            module: DEFAULT_MODULE.to_string(),
            function: DEFAULT_FUNCTION.to_string(),
            oracle_type_name: DEFAULT_ORACLE_TYPE_NAME.to_string(),
            gas_coin_type: DEFAULT_GAS_COIN_TYPE.to_string(),
            explorer_base_url: DEFAULT_EXPLORER_BASE_URL.to_string(),
            claim_domain: ClaimDomain {
                name: DEFAULT_DOMAIN_NAME.to_string(),
                version: DEFAULT_DOMAIN_VERSION.to_string(),
                chain_id: DEFAULT_DOMAIN_CHAIN_ID,
            },
            chain_timeout: DEFAULT_CHAIN_TIMEOUT,
        }
    }

    /// オラクルオブジェクトの完全なMove型: `<package>::<module>::<type_name>`
    pub fn oracle_type(&self) -> String {
        format!("{}::{}::{}", self.package_id, self.module, self.oracle_type_name)
    }

    /// オブジェクトIDのエクスプローラーリンク。
    pub fn explorer_link(&self, object_id: &str) -> String {
        format!(
            "{}/objects/{}",
            self.explorer_base_url.trim_end_matches('/'),
            object_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClaimConfig::new("0xoracle");
        assert_eq!(config.oracle_type(), "0x2::CrossChainAirdrop::CrossChainAirdropOracle");
        assert_eq!(config.source_chain, "ethereum");
    }

    #[test]
    fn test_explorer_link_trims_trailing_slash() {
        let mut config = ClaimConfig::new("0xoracle");
        config.explorer_base_url = "https://explorer.example/".to_string();
        assert_eq!(
            config.explorer_link("0x7bc8"),
            "https://explorer.example/objects/0x7bc8"
        );
    }
}

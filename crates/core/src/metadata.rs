//! # 表示用メタデータ
//!
//! ミントするNFTのコレクション名とトークンURIを解決する。

use crate::error::ClaimError;
use crate::parser::Claim;

/// コレクション名の既定値
pub const DEFAULT_COLLECTION_NAME: &str = "BoredApeYachtClub";
/// トークンURIの既定値
pub const DEFAULT_TOKEN_URI: &str =
    "ipfs://bafkreibngqhl3gaa7daob4i2vccziay2jjlp435cf66vhono7nrvww53ty";

/// ミントするNFTの表示用メタデータ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    /// コレクション名
    pub collection_name: String,
    /// トークンURI
    pub token_uri: String,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
        }
    }
}

/// ソースチェーンのトークンから表示用メタデータを解決するトレイト。
#[async_trait::async_trait]
pub trait MetadataResolver: Send + Sync {
    /// クレーム対象トークンのメタデータを返す。
    async fn resolve(&self, claim: &Claim) -> Result<TokenMetadata, ClaimError>;
}

/// 設定された固定値を返すリゾルバ。
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    metadata: TokenMetadata,
}

impl StaticMetadata {
    /// 固定値を指定して作成する。
    pub fn new(collection_name: impl Into<String>, token_uri: impl Into<String>) -> Self {
        Self {
            metadata: TokenMetadata {
                collection_name: collection_name.into(),
                token_uri: token_uri.into(),
            },
        }
    }
}

#[async_trait::async_trait]
impl MetadataResolver for StaticMetadata {
    async fn resolve(&self, _claim: &Claim) -> Result<TokenMetadata, ClaimError> {
        Ok(self.metadata.clone())
    }
}

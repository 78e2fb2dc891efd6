//! # Sui NFT Mirror Core
//!
//! ソースチェーンのNFT保有者による署名付きクレームを検証し、
//! Sui上でリンクされたNFTをミントするMove呼び出しを組み立てて実行する。
//!
//! ## 処理フロー
//! 1. `wallet_message` からクレーム内容を抽出・構造検証する（[`parser`]）
//! 2. 署名と所有権を検証する（[`verifier`]）
//! 3. 表示用メタデータを解決する（[`metadata`]）
//! 4. オラクルアカウントのガスコインとオラクルオブジェクトを解決する（[`resolver`]）
//! 5. ミント用Move呼び出しを組み立てる（[`invocation`]）
//! 6. 送信し、作成オブジェクトからレスポンスを構築する（[`orchestrator`]）
//!
//! 4〜6はオラクルアカウント単位の排他区間（[`lock`]）で実行される。

pub mod config;
pub mod connection;
pub mod error;
pub mod invocation;
pub mod lock;
pub mod metadata;
pub mod orchestrator;
pub mod parser;
pub mod resolver;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ClaimConfig;
pub use connection::Connection;
pub use error::{ClaimError, ConnectionError};
pub use invocation::{build_mint_invocation, DEFAULT_GAS_BUDGET};
pub use metadata::{MetadataResolver, StaticMetadata, TokenMetadata};
pub use orchestrator::ClaimService;
pub use parser::{parse_claim, Claim};
pub use resolver::{resolve_authority, ResolvedAuthority};
pub use verifier::{AcceptAllVerifier, ClaimVerifier, SignatureScheme, TokenOwnership, WalletSignatureVerifier};

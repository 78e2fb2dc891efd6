//! # クレーム処理
//!
//! 公開エントリポイント `claim(request) -> AirdropClaimResponse`。
//!
//! ## 処理フロー
//! 1. `wallet_message` を解析・構造検証する
//! 2. ソースチェーン識別子を確認し、署名・所有権を検証する
//! 3. 表示用メタデータを解決する
//! 4. オラクルアカウントの排他区間に入る
//! 5. ガスコインとオラクルオブジェクトを解決する
//! 6. ミント用Move呼び出しを組み立てて1回だけ送信する
//! 7. 作成オブジェクトがちょうど1個であることを確認し、レスポンスを構築する
//!
//! いずれかの段階で失敗すれば残りは実行しない。補償処理・再送・重複排除は行わない。

mod handler;

#[cfg(test)]
mod tests;

pub use handler::ClaimService;

//! # エラー型
//!
//! クレーム処理の失敗分類。呼び出し側（Gateway）はこの分類でステータスコードを決める。
//!
//! | 分類 | 原因 | 呼び出し側 |
//! |------|------|-----------|
//! | `Validation` | クレーム内容の不備 | クライアントエラー |
//! | `Authentication` | 署名・所有権の検証失敗 | クライアントエラー |
//! | `NotFound` | ガスコインが存在しない | サーバーエラー |
//! | `Integrity` | オラクルオブジェクトが一意でない、作成オブジェクト数の不一致 | サーバーエラー |
//! | `Transient` | 宛先チェーンとの通信失敗・タイムアウト | 再送可能 |
//! | `Chain` | 宛先チェーンがリクエストを拒否 | サーバーエラー |

/// クレーム処理のエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    /// クレーム内容が不正
    #[error("不正なクレーム: {reason} (値: {value})")]
    Validation {
        /// 不正の理由
        reason: String,
        /// 問題のある生の値
        value: String,
    },
    /// 署名または所有権の検証に失敗
    #[error("クレームの認証に失敗: {0}")]
    Authentication(String),
    /// 必要なオンチェーンオブジェクトが存在しない
    #[error("必要なオブジェクトが見つかりません: {0}")]
    NotFound(String),
    /// 不変条件の違反
    #[error("整合性エラー: {0}")]
    Integrity(String),
    /// 宛先チェーンとの通信失敗・タイムアウト
    #[error("宛先チェーンとの通信に失敗: {0}")]
    Transient(String),
    /// 宛先チェーンがリクエストを拒否した
    #[error("宛先チェーンがリクエストを拒否しました: {0}")]
    Chain(String),
}

impl ClaimError {
    /// `Validation` を構築する。
    pub fn validation(reason: impl Into<String>, value: impl Into<String>) -> Self {
        ClaimError::Validation {
            reason: reason.into(),
            value: value.into(),
        }
    }

    /// 呼び出し側が修正可能なエラーか。
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ClaimError::Validation { .. } | ClaimError::Authentication(_)
        )
    }
}

/// 宛先チェーン接続のエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// HTTP送信・受信の失敗
    #[error("通信に失敗: {0}")]
    Transport(String),
    /// 応答待ちのタイムアウト
    #[error("応答がタイムアウトしました")]
    Timeout,
    /// JSON-RPCのエラー応答
    #[error("RPCエラー ({code}): {message}")]
    Rpc {
        /// エラーコード
        code: i64,
        /// エラーメッセージ
        message: String,
    },
    /// 応答のデコードに失敗
    #[error("応答のデコードに失敗: {0}")]
    Decode(String),
}

impl From<ConnectionError> for ClaimError {
    fn from(e: ConnectionError) -> Self {
        match e {
            ConnectionError::Transport(_) | ConnectionError::Timeout => {
                ClaimError::Transient(e.to_string())
            }
            ConnectionError::Rpc { .. } | ConnectionError::Decode(_) => {
                ClaimError::Chain(e.to_string())
            }
        }
    }
}

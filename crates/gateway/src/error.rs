//! # Gateway エラー型
//!
//! [`ClaimError`] をHTTPステータスに対応付ける。サーバー側の失敗の詳細
//! （オブジェクトID・チェーンの生のエラー）はログにのみ出し、レスポンスには含めない。

use axum::http::StatusCode;

use mirror_core::ClaimError;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト
    #[error("不正なリクエスト: {reason} (値: {value})")]
    BadRequest {
        /// 不正の理由
        reason: String,
        /// 問題のある値
        value: String,
    },
    /// 署名・所有権の検証に失敗
    #[error("認証に失敗: {0}")]
    Unauthorized(String),
    /// 宛先チェーンが一時的に利用できない
    #[error("宛先チェーンが一時的に利用できません。時間をおいて再試行してください")]
    Unavailable,
    /// 内部エラー
    #[error("内部エラーが発生しました")]
    Internal,
}

impl From<ClaimError> for GatewayError {
    fn from(e: ClaimError) -> Self {
        match e {
            ClaimError::Validation { reason, value } => GatewayError::BadRequest { reason, value },
            ClaimError::Authentication(reason) => GatewayError::Unauthorized(reason),
            ClaimError::Transient(_) => GatewayError::Unavailable,
            ClaimError::NotFound(_) | ClaimError::Integrity(_) | ClaimError::Chain(_) => {
                GatewayError::Internal
            }
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            GatewayError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

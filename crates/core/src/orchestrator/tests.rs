use std::sync::Arc;
use std::time::Duration;

use mirror_types::{AirdropClaimRequest, MoveCallArg};

use crate::config::ClaimConfig;
use crate::error::{ClaimError, ConnectionError};
use crate::metadata::{StaticMetadata, DEFAULT_COLLECTION_NAME, DEFAULT_TOKEN_URI};
use crate::parser::Claim;
use crate::test_support::{
    claim_message, created, gas_object, oracle_object, sample_claim_json, test_config,
    MockConnection, DESTINATION, SOURCE_CONTRACT,
};
use crate::verifier::{AcceptAllVerifier, ClaimVerifier};

use super::ClaimService;

fn service_with(connection: Arc<MockConnection>, config: ClaimConfig) -> ClaimService {
    ClaimService::new(
        Arc::new(config),
        connection,
        Arc::new(AcceptAllVerifier),
        Arc::new(StaticMetadata::default()),
    )
}

fn service(connection: Arc<MockConnection>) -> ClaimService {
    service_with(connection, test_config())
}

fn request(claim: serde_json::Value) -> AirdropClaimRequest {
    AirdropClaimRequest {
        wallet_message: claim_message(claim),
        signature: "0x".to_string(),
    }
}

/// 常に拒否するベリファイア
struct RejectAll;

#[async_trait::async_trait]
impl ClaimVerifier for RejectAll {
    async fn verify(&self, _request: &AirdropClaimRequest, _claim: &Claim) -> Result<(), ClaimError> {
        Err(ClaimError::Authentication("署名が一致しません".into()))
    }
}

/// 正常系: 引数順序・レスポンスのエコー・リンクを確認
#[tokio::test]
async fn test_claim_mints_and_links_created_object() {
    let connection = Arc::new(MockConnection::standard());
    let svc = service(connection.clone());

    let response = svc.claim(&request(sample_claim_json())).await.unwrap();

    assert_eq!(response.source_chain, "ethereum");
    assert_eq!(response.source_contract_address, SOURCE_CONTRACT);
    assert_eq!(response.source_token_id, "8937");
    assert!(response.sui_explorer_link.contains("7bc8"));
    assert_eq!(
        response.sui_explorer_link,
        "https://explorer.devnet.sui.io/objects/0x7bc8"
    );

    let submitted = connection.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(
        submitted[0].arguments,
        vec![
            MoveCallArg::Str("0xdd04".into()),
            MoveCallArg::Str(DESTINATION.into()),
            MoveCallArg::Str(SOURCE_CONTRACT.into()),
            MoveCallArg::U64(8937),
            MoveCallArg::Str(DEFAULT_COLLECTION_NAME.into()),
            MoveCallArg::Str(DEFAULT_TOKEN_URI.into()),
        ]
    );
    assert_eq!(submitted[0].gas_object_id, "0xbb02");
    assert_eq!(submitted[0].sender, svc.config().oracle_address);
}

/// 欠落フィールドはValidationで拒否され、チェーンI/Oは発生しない
#[tokio::test]
async fn test_missing_field_performs_no_chain_io() {
    let connection = Arc::new(MockConnection::standard());
    let svc = service(connection.clone());

    let mut claim = sample_claim_json();
    claim.as_object_mut().unwrap().remove("destination_sui_address");

    assert!(matches!(
        svc.claim(&request(claim)).await,
        Err(ClaimError::Validation { .. })
    ));
    assert_eq!(connection.list_calls(), 0);
    assert!(connection.submitted().is_empty());
}

/// 数値でないトークンIDは0に丸められず拒否される
#[tokio::test]
async fn test_non_numeric_token_id_is_rejected() {
    let connection = Arc::new(MockConnection::standard());
    let svc = service(connection.clone());

    let mut claim = sample_claim_json();
    claim["source_token_id"] = serde_json::json!("ape-8937");

    assert!(matches!(
        svc.claim(&request(claim)).await,
        Err(ClaimError::Validation { .. })
    ));
    assert_eq!(connection.list_calls(), 0);
}

#[tokio::test]
async fn test_unsupported_source_chain_is_rejected() {
    let connection = Arc::new(MockConnection::standard());
    let svc = service(connection.clone());

    let mut claim = sample_claim_json();
    claim["source_chain"] = serde_json::json!("solana");

    match svc.claim(&request(claim)).await {
        Err(ClaimError::Validation { value, .. }) => assert_eq!(value, "solana"),
        other => panic!("未対応チェーンが受理された: {other:?}"),
    }
    assert_eq!(connection.list_calls(), 0);
}

/// 認証失敗時はチェーン状態を照会しない
#[tokio::test]
async fn test_authentication_failure_precedes_chain_io() {
    let connection = Arc::new(MockConnection::standard());
    let svc = ClaimService::new(
        Arc::new(test_config()),
        connection.clone(),
        Arc::new(RejectAll),
        Arc::new(StaticMetadata::default()),
    );

    assert!(matches!(
        svc.claim(&request(sample_claim_json())).await,
        Err(ClaimError::Authentication(_))
    ));
    assert_eq!(connection.list_calls(), 0);
}

#[tokio::test]
async fn test_zero_created_objects_is_integrity_error() {
    let connection = Arc::new(MockConnection::standard().with_effects(created(&[])));
    let svc = service(connection.clone());

    assert!(matches!(
        svc.claim(&request(sample_claim_json())).await,
        Err(ClaimError::Integrity(_))
    ));
    assert_eq!(connection.submitted().len(), 1);
}

#[tokio::test]
async fn test_two_created_objects_is_integrity_error() {
    let connection =
        Arc::new(MockConnection::standard().with_effects(created(&["7bc8", "7bc9"])));
    let svc = service(connection);

    assert!(matches!(
        svc.claim(&request(sample_claim_json())).await,
        Err(ClaimError::Integrity(_))
    ));
}

#[tokio::test]
async fn test_missing_oracle_object_aborts_before_submission() {
    let connection = Arc::new(MockConnection::new(vec![gas_object("bb02")]));
    let svc = service(connection.clone());

    assert!(matches!(
        svc.claim(&request(sample_claim_json())).await,
        Err(ClaimError::Integrity(_))
    ));
    assert!(connection.submitted().is_empty());
}

#[tokio::test]
async fn test_missing_gas_is_not_found() {
    let connection = Arc::new(MockConnection::new(vec![oracle_object("dd04")]));
    let svc = service(connection.clone());

    assert!(matches!(
        svc.claim(&request(sample_claim_json())).await,
        Err(ClaimError::NotFound(_))
    ));
    assert!(connection.submitted().is_empty());
}

/// 同一のクレームを2回送ると、独立した2回の送信になる（重複排除しない）
#[tokio::test]
async fn test_repeated_claims_are_not_deduplicated() {
    let connection = Arc::new(MockConnection::standard());
    let svc = service(connection.clone());
    let req = request(sample_claim_json());

    svc.claim(&req).await.unwrap();
    svc.claim(&req).await.unwrap();

    assert_eq!(connection.list_calls(), 2);
    assert_eq!(connection.submitted().len(), 2);
}

#[tokio::test]
async fn test_transport_failure_is_transient() {
    let connection = Arc::new(
        MockConnection::standard().failing_list(ConnectionError::Transport("connection reset".into())),
    );
    let svc = service(connection.clone());

    assert!(matches!(
        svc.claim(&request(sample_claim_json())).await,
        Err(ClaimError::Transient(_))
    ));
    assert!(connection.submitted().is_empty());
}

#[tokio::test]
async fn test_rpc_error_is_chain_error() {
    let connection = Arc::new(MockConnection::standard().failing_list(ConnectionError::Rpc {
        code: -32602,
        message: "invalid address".into(),
    }));
    let svc = service(connection);

    assert!(matches!(
        svc.claim(&request(sample_claim_json())).await,
        Err(ClaimError::Chain(_))
    ));
}

/// チェーン往復がタイムアウトした場合はTransient
#[tokio::test]
async fn test_slow_chain_times_out_as_transient() {
    let connection =
        Arc::new(MockConnection::standard().with_delay(Duration::from_millis(500)));
    let mut config = test_config();
    config.chain_timeout = Duration::from_millis(50);
    let svc = service_with(connection.clone(), config);

    assert!(matches!(
        svc.claim(&request(sample_claim_json())).await,
        Err(ClaimError::Transient(_))
    ));
    assert!(connection.submitted().is_empty());
}

/// 同じオラクルアカウントへの同時クレームは解決〜送信が直列化される
#[tokio::test]
async fn test_concurrent_claims_are_serialized_per_oracle() {
    let connection = Arc::new(MockConnection::standard().with_delay(Duration::from_millis(30)));
    let svc = Arc::new(service(connection.clone()));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            svc.claim(&request(sample_claim_json())).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(connection.submitted().len(), 4);
    assert_eq!(connection.max_in_flight(), 1);
}

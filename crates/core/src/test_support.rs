//! # テスト用共通ヘルパー
//!
//! parser, resolver, orchestratorのテストで共有するクレーム文書とモック接続。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use mirror_types::{CreatedObject, MoveCall, MoveCallEffects, OwnedObject};

use crate::config::ClaimConfig;
use crate::connection::Connection;
use crate::error::ConnectionError;

pub const ORACLE_ADDRESS: &str = "0x5c9bd7a2a5a0c3eb5b8e0a27d5c6a4d9b31c0f2e";
pub const GAS_TYPE: &str = "0x2::Coin::Coin<0x2::SUI::SUI>";
pub const ORACLE_TYPE: &str = "0x2::CrossChainAirdrop::CrossChainAirdropOracle";
pub const SOURCE_CONTRACT: &str = "0xBC4CA0EdA7647A8aB7C2061c2E118A18a936f13D";
pub const SOURCE_OWNER: &str = "0x09dbc4a902199bbe7f7ec29b3714731786f2e878";
pub const DESTINATION: &str = "0xa5e6dbcf33730ace6ec8b400ff4788c1f150ff7e";

pub fn test_config() -> ClaimConfig {
    let mut config = ClaimConfig::new(ORACLE_ADDRESS);
    config.explorer_base_url = "https://explorer.devnet.sui.io".to_string();
    config.chain_timeout = Duration::from_secs(5);
    config
}

pub fn sample_claim_json() -> serde_json::Value {
    serde_json::json!({
        "source_chain": "ethereum",
        "source_contract_address": SOURCE_CONTRACT,
        "source_token_id": "8937",
        "source_owner_address": SOURCE_OWNER,
        "destination_sui_address": DESTINATION,
    })
}

/// `{"message": claim}` 形式の最小のwallet_message
pub fn claim_message(claim: serde_json::Value) -> String {
    serde_json::json!({ "message": claim }).to_string()
}

/// EIP-712 typed data形式のwallet_message
pub fn typed_claim_message(claim: serde_json::Value) -> String {
    serde_json::json!({
        "types": {
            "EIP712Domain": [
                {"name": "name", "type": "string"},
                {"name": "version", "type": "string"},
                {"name": "chainId", "type": "uint256"}
            ],
            "ClaimInfo": [
                {"name": "source_chain", "type": "string"},
                {"name": "source_contract_address", "type": "string"},
                {"name": "source_token_id", "type": "string"},
                {"name": "source_owner_address", "type": "string"},
                {"name": "destination_sui_address", "type": "string"}
            ]
        },
        "primaryType": "ClaimInfo",
        "domain": serde_json::to_value(ClaimConfig::new(ORACLE_ADDRESS).claim_domain).unwrap(),
        "message": claim,
    })
    .to_string()
}

pub fn object(id: &str, ty: &str) -> OwnedObject {
    OwnedObject {
        object_id: id.to_string(),
        object_type: ty.to_string(),
    }
}

pub fn gas_object(id: &str) -> OwnedObject {
    object(id, GAS_TYPE)
}

pub fn oracle_object(id: &str) -> OwnedObject {
    object(id, ORACLE_TYPE)
}

pub fn created(ids: &[&str]) -> MoveCallEffects {
    MoveCallEffects {
        digest: Some("txdigest".to_string()),
        created: ids
            .iter()
            .map(|id| CreatedObject {
                object_id: id.to_string(),
            })
            .collect(),
    }
}

/// 固定の所有オブジェクトと実行結果を返すモック接続。
/// 呼び出し回数と、照会〜送信区間の同時実行数を記録する。
pub struct MockConnection {
    objects: Vec<OwnedObject>,
    effects: MoveCallEffects,
    delay: Option<Duration>,
    list_failure: Mutex<Option<ConnectionError>>,
    queried: Mutex<Vec<String>>,
    submitted: Mutex<Vec<MoveCall>>,
    list_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockConnection {
    pub fn new(objects: Vec<OwnedObject>) -> Self {
        Self {
            objects,
            effects: created(&["7bc8"]),
            delay: None,
            list_failure: Mutex::new(None),
            queried: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// ガスコインとオラクルオブジェクトを1個ずつ持つ標準構成
    pub fn standard() -> Self {
        Self::new(vec![gas_object("bb02"), oracle_object("dd04")])
    }

    pub fn with_effects(mut self, effects: MoveCallEffects) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_list(self, error: ConnectionError) -> Self {
        *self.list_failure.lock().unwrap() = Some(error);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn queried_addresses(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<MoveCall> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Connection for MockConnection {
    async fn list_objects_owned_by(
        &self,
        address: &str,
    ) -> Result<Vec<OwnedObject>, ConnectionError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.queried.lock().unwrap().push(address.to_string());
        if let Some(e) = self.list_failure.lock().unwrap().take() {
            return Err(e);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.objects.clone())
    }

    async fn submit_move_call(&self, call: &MoveCall) -> Result<MoveCallEffects, ConnectionError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.submitted.lock().unwrap().push(call.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.effects.clone())
    }
}

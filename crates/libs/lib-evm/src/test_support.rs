//! In-process JSON-RPC node for tests.
//!
//! Answers the handful of methods the client uses, backed by a tiny voting
//! contract model. Knobs let tests force rejections, reverts and slow receipts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy_primitives::U256;
use alloy_sol_types::{SolCall, SolValue};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::abi::{getCandidatesCall, getVoteCountCall, getWinnerCall, voteCall, Candidate};
use crate::rpc::{decode_hex, encode_hex};

pub const STUB_CHAIN_ID: u64 = 31337;
pub const STUB_CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

#[derive(Debug)]
struct NodeState {
    accounts: Vec<String>,
    chain_id: u64,
    candidates: Vec<(String, u64)>,
    winner: (String, u64),
    vote_count: u64,
    votes: Vec<u64>,
    deployments: Vec<Vec<u8>>,
    receipts: HashMap<String, Value>,
    reject_signing: bool,
    revert_votes: bool,
    pending_polls: u32,
    receipt_polls: u32,
    next_tx: u64,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            accounts: vec![
                "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string(),
                "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".to_string(),
            ],
            chain_id: STUB_CHAIN_ID,
            candidates: vec![
                ("Tarik Tambang".to_string(), 0),
                ("Balap Karung".to_string(), 0),
                ("Panjat Pinang".to_string(), 0),
            ],
            winner: (String::new(), 0),
            vote_count: 0,
            votes: Vec::new(),
            deployments: Vec::new(),
            receipts: HashMap::new(),
            reject_signing: false,
            revert_votes: false,
            pending_polls: 0,
            receipt_polls: 0,
            next_tx: 1,
        }
    }
}

type Shared = Arc<Mutex<NodeState>>;

pub struct StubNode {
    url: String,
    state: Shared,
}

impl StubNode {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(NodeState::default()));
        let app = Router::new().route("/", post(handle)).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    pub fn contract_address(&self) -> String {
        STUB_CONTRACT.to_string()
    }

    pub fn accounts(&self) -> Vec<String> {
        self.state.lock().unwrap().accounts.clone()
    }

    pub fn set_accounts(&self, accounts: Vec<String>) {
        self.state.lock().unwrap().accounts = accounts;
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.state.lock().unwrap().chain_id = chain_id;
    }

    pub fn set_vote_count(&self, count: u64) {
        self.state.lock().unwrap().vote_count = count;
    }

    pub fn set_winner(&self, name: &str, votes: u64) {
        self.state.lock().unwrap().winner = (name.to_string(), votes);
    }

    pub fn set_reject_signing(&self, reject: bool) {
        self.state.lock().unwrap().reject_signing = reject;
    }

    pub fn set_revert_votes(&self, revert: bool) {
        self.state.lock().unwrap().revert_votes = revert;
    }

    /// Receipt lookups return `null` this many times before the receipt appears.
    pub fn set_pending_polls(&self, polls: u32) {
        self.state.lock().unwrap().pending_polls = polls;
    }

    pub fn votes(&self) -> Vec<u64> {
        self.state.lock().unwrap().votes.clone()
    }

    pub fn receipt_polls(&self) -> u32 {
        self.state.lock().unwrap().receipt_polls
    }

    /// Init code of every contract-creation transaction seen so far.
    pub fn deployments(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().deployments.clone()
    }
}

async fn handle(State(state): State<Shared>, Json(request): Json<Value>) -> Json<Value> {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request.get("method").and_then(Value::as_str).unwrap_or_default();
    let params = request.get("params").cloned().unwrap_or_else(|| json!([]));

    let mut node = state.lock().unwrap();
    let outcome = match method {
        "eth_chainId" => Ok(json!(format!("0x{:x}", node.chain_id))),
        "eth_accounts" => Ok(json!(node.accounts)),
        "eth_call" => eth_call(&node, &params),
        "eth_sendTransaction" => send_transaction(&mut node, &params),
        "eth_getTransactionReceipt" => Ok(receipt(&mut node, &params)),
        _ => Err((-32601, format!("the method {} does not exist/is not available", method))),
    };

    Json(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } }),
    })
}

type Outcome = Result<Value, (i64, String)>;

fn calldata(tx: &Value) -> Vec<u8> {
    tx.get("data")
        .and_then(Value::as_str)
        .and_then(|data| decode_hex(data).ok())
        .unwrap_or_default()
}

fn eth_call(node: &NodeState, params: &Value) -> Outcome {
    let data = calldata(&params[0]);
    if data.len() < 4 {
        return Err((-32000, "missing selector".to_string()));
    }

    let selector: [u8; 4] = [data[0], data[1], data[2], data[3]];
    let encoded = if selector == getCandidatesCall::SELECTOR {
        let candidates: Vec<Candidate> = node
            .candidates
            .iter()
            .map(|(name, count)| Candidate {
                name: name.clone(),
                voteCount: U256::from(*count),
            })
            .collect();
        (candidates,).abi_encode_params()
    } else if selector == getVoteCountCall::SELECTOR {
        (U256::from(node.vote_count),).abi_encode_params()
    } else if selector == getWinnerCall::SELECTOR {
        (node.winner.0.clone(), U256::from(node.winner.1)).abi_encode_params()
    } else {
        return Err((3, "execution reverted".to_string()));
    };

    Ok(json!(encode_hex(&encoded)))
}

fn send_transaction(node: &mut NodeState, params: &Value) -> Outcome {
    if node.reject_signing {
        return Err((4001, "User rejected the request.".to_string()));
    }

    let tx = &params[0];
    let data = calldata(tx);
    let hash = format!("0x{:064x}", node.next_tx);
    node.next_tx += 1;

    let mut status = "0x1";
    let mut contract_address = Value::Null;

    if tx.get("to").is_none() {
        node.deployments.push(data);
        contract_address = json!(STUB_CONTRACT);
    } else if let Ok(call) = voteCall::abi_decode(&data, true) {
        if node.revert_votes {
            status = "0x0";
        } else {
            let index = u64::try_from(call.candidateIndex).unwrap_or(u64::MAX);
            node.votes.push(index);
            node.vote_count += 1;
            if let Some(candidate) = node.candidates.get_mut(index as usize) {
                candidate.1 += 1;
            }
        }
    }

    let receipt = json!({
        "transactionHash": hash,
        "status": status,
        "contractAddress": contract_address,
        "blockNumber": format!("0x{:x}", node.next_tx),
    });
    node.receipts.insert(hash.clone(), receipt);

    Ok(json!(hash))
}

fn receipt(node: &mut NodeState, params: &Value) -> Value {
    node.receipt_polls += 1;
    if node.pending_polls > 0 {
        node.pending_polls -= 1;
        return Value::Null;
    }

    params[0]
        .as_str()
        .and_then(|hash| node.receipts.get(hash).cloned())
        .unwrap_or(Value::Null)
}

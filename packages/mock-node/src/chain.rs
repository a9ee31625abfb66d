//! In-memory chain state around the notary contract.
//!
//! Insta-mining, single-contract, no gas: every accepted transaction is
//! its own block. Accounts are derived deterministically so test runs
//! and restarts see the same addresses, each funded with a fixed dev
//! balance. Payable calls escrow the attached value with the contract
//! and settle the contract's payouts in the same transaction.

use crate::notary::{Event, Notary};
use crate::MockNodeConfig;
use starnotary_types::abi;
use starnotary_types::Address;
use std::collections::HashMap;

/// Dev balance per derived account: 100 ETH in wei.
const ACCOUNT_FUNDING_WEI: u128 = 100_000_000_000_000_000_000;

pub struct Chain {
    network_id: String,
    accounts: Vec<Address>,
    fail_accounts: bool,
    balances: HashMap<Address, u128>,
    contract_address: Address,
    notary: Notary,
    logs: Vec<StoredLog>,
    filters: HashMap<u64, FilterState>,
    next_filter_id: u64,
    tx_count: u64,
    block_number: u64,
}

/// A mined log, kept for filter delivery.
#[derive(Debug, Clone)]
pub struct StoredLog {
    pub address: Address,
    pub topics: Vec<[u8; 32]>,
    pub data: Vec<u8>,
    pub block_number: u64,
    pub transaction_hash: String,
    pub log_index: u64,
}

/// Matching criteria of an installed filter. Topic positions are matched
/// in order; `None` is a wildcard.
pub struct FilterCriteria {
    pub address: Option<Address>,
    pub topics: Vec<Option<[u8; 32]>>,
}

/// Where a new filter starts delivering from.
#[derive(Debug, Clone, Copy)]
pub enum FromBlock {
    Latest,
    Number(u64),
}

struct FilterState {
    criteria: FilterCriteria,
    /// Index into `logs` of the next log this filter has not delivered.
    cursor: usize,
}

/// A rejected transaction: refused outright, or reverted by the contract.
#[derive(Debug)]
pub enum TxError {
    Rejected(String),
    Reverted(String),
}

impl Chain {
    pub fn new(config: &MockNodeConfig, contract_address: Address) -> Self {
        let accounts = derive_accounts(config.accounts);
        let mut balances = HashMap::new();
        for account in &accounts {
            balances.insert(*account, ACCOUNT_FUNDING_WEI);
        }
        balances.insert(contract_address, 0);

        Self {
            network_id: config.network_id.clone(),
            accounts,
            fail_accounts: config.fail_accounts,
            balances,
            contract_address,
            notary: Notary::new(config.token_name.clone(), config.token_symbol.clone()),
            logs: Vec::new(),
            filters: HashMap::new(),
            next_filter_id: 1,
            tx_count: 0,
            block_number: 0,
        }
    }

    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    /// Unlocked accounts, as the RPC surface reports them. Fails when the
    /// node is configured to deny account access.
    pub fn accounts(&self) -> Result<Vec<Address>, String> {
        if self.fail_accounts {
            return Err("account listing disabled".to_string());
        }
        Ok(self.accounts.clone())
    }

    /// The derived accounts, regardless of the access flag.
    pub fn account_list(&self) -> &[Address] {
        &self.accounts
    }

    pub fn balance(&self, address: &Address) -> u128 {
        self.balances.get(address).copied().unwrap_or_default()
    }

    /// Read-only call. Targets other than the contract return empty data.
    pub fn call(&self, from: Address, to: Address, data: &[u8]) -> Result<Vec<u8>, String> {
        if to == self.contract_address {
            self.notary.call(from, data)
        } else {
            Ok(Vec::new())
        }
    }

    /// Accept and mine one transaction.
    pub fn send_transaction(
        &mut self,
        from: Address,
        to: Address,
        value: u128,
        data: &[u8],
    ) -> Result<String, TxError> {
        if !self.accounts.contains(&from) {
            return Err(TxError::Rejected(format!("unknown account {from}")));
        }
        if self.balance(&from) < value {
            return Err(TxError::Rejected("insufficient funds for transfer".to_string()));
        }

        if to == self.contract_address && !data.is_empty() {
            // Contract state mutates before any balance moves, so a
            // revert leaves balances untouched.
            let execution = match self.notary.execute(from, value, data) {
                Ok(execution) => execution,
                Err(reason) => return Err(TxError::Reverted(reason)),
            };
            self.debit(from, value);
            self.credit(to, value);
            for (recipient, amount) in &execution.payouts {
                self.debit(to, *amount);
                self.credit(*recipient, *amount);
            }
            let hash = self.next_tx_hash(data);
            self.block_number += 1;
            self.record_logs(execution.events, &hash);
            Ok(hash)
        } else {
            self.debit(from, value);
            self.credit(to, value);
            let hash = self.next_tx_hash(data);
            self.block_number += 1;
            Ok(hash)
        }
    }

    /// Install a log filter; returns its id.
    pub fn new_filter(&mut self, criteria: FilterCriteria, from_block: FromBlock) -> u64 {
        let cursor = match from_block {
            FromBlock::Latest => self.logs.len(),
            FromBlock::Number(n) => self
                .logs
                .iter()
                .position(|log| log.block_number >= n)
                .unwrap_or(self.logs.len()),
        };
        let id = self.next_filter_id;
        self.next_filter_id += 1;
        self.filters.insert(id, FilterState { criteria, cursor });
        id
    }

    /// Matching logs accumulated since the previous poll. `None` means
    /// the filter id is unknown.
    pub fn filter_changes(&mut self, id: u64) -> Option<Vec<StoredLog>> {
        let filter = self.filters.get_mut(&id)?;
        let matched = self.logs[filter.cursor..]
            .iter()
            .filter(|log| filter.criteria.matches(log))
            .cloned()
            .collect();
        filter.cursor = self.logs.len();
        Some(matched)
    }

    pub fn uninstall_filter(&mut self, id: u64) -> bool {
        self.filters.remove(&id).is_some()
    }

    fn credit(&mut self, account: Address, amount: u128) {
        *self.balances.entry(account).or_insert(0) += amount;
    }

    fn debit(&mut self, account: Address, amount: u128) {
        let balance = self.balances.entry(account).or_insert(0);
        *balance = balance.saturating_sub(amount);
    }

    fn next_tx_hash(&mut self, data: &[u8]) -> String {
        self.tx_count += 1;
        let mut preimage = Vec::with_capacity(11 + data.len());
        preimage.extend_from_slice(b"tx:");
        preimage.extend_from_slice(&self.tx_count.to_be_bytes());
        preimage.extend_from_slice(data);
        format!("0x{}", hex::encode(abi::keccak256(&preimage)))
    }

    fn record_logs(&mut self, events: Vec<Event>, tx_hash: &str) {
        for (index, event) in events.into_iter().enumerate() {
            self.logs.push(StoredLog {
                address: self.contract_address,
                topics: event.topics,
                data: event.data,
                block_number: self.block_number,
                transaction_hash: tx_hash.to_string(),
                log_index: index as u64,
            });
        }
    }
}

impl FilterCriteria {
    fn matches(&self, log: &StoredLog) -> bool {
        if let Some(address) = self.address {
            if address != log.address {
                return false;
            }
        }
        for (position, wanted) in self.topics.iter().enumerate() {
            if let Some(topic) = wanted {
                match log.topics.get(position) {
                    Some(present) if present == topic => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

/// Deterministic dev accounts: the low 20 bytes of a keccak over a fixed
/// label per index.
fn derive_accounts(count: usize) -> Vec<Address> {
    (0..count)
        .map(|index| {
            let hash = abi::keccak256(format!("starnotary dev account {index}").as_bytes());
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&hash[12..]);
            Address::from(bytes)
        })
        .collect()
}

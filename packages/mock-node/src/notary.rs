//! The notary contract, executed natively.
//!
//! A faithful in-memory stand-in for the deployed token contract: star
//! records keyed by token id, sale listings, and two-sided exchange
//! approvals. `execute` is one transaction; it either returns the full
//! effect set (return data, emitted events, payouts from the attached
//! value) or reverts with a reason string and no state change observable
//! to the caller.

use starnotary_types::abi::{self, ParamType, Value};
use starnotary_types::Address;
use std::collections::BTreeMap;

const ERR_TOKEN_TAKEN: &str = "Token id already taken";
const ERR_UNAUTHORIZED: &str = "UNAUTHORIZED";
const ERR_NO_TOKEN: &str = "Token does not exist";
const ERR_NOT_FOR_SALE: &str = "Star not up for sale";
const ERR_INSUFFICIENT_PAYMENT: &str = "Insufficient payment";
const ERR_DESIRED_NOT_FOUND: &str = "Desired token not found";
const ERR_NOT_APPROVED: &str = "Exchange not approved by both token owners";
const ERR_NOT_PAYABLE: &str = "non-payable function was called with value";

/// Contract state.
#[derive(Clone)]
pub struct Notary {
    token_name: String,
    token_symbol: String,
    stars: BTreeMap<u128, Star>,
    /// Asking price per token id, in wei. A zero price is not buyable.
    sale_prices: BTreeMap<u128, u128>,
    /// Standing exchange offers: owned token id to desired token id.
    exchange_offers: BTreeMap<u128, u128>,
    selectors: Selectors,
}

#[derive(Clone)]
struct Star {
    name: String,
    owner: Address,
}

/// Effects of one successful transaction.
#[derive(Debug)]
pub struct Execution {
    pub return_data: Vec<u8>,
    pub events: Vec<Event>,
    /// Credits to pay out of the attached value: the seller's proceeds
    /// and any overpayment refund.
    pub payouts: Vec<(Address, u128)>,
}

/// One emitted log: indexed topics (topic0 first) plus the data section.
#[derive(Debug)]
pub struct Event {
    pub topics: Vec<[u8; 32]>,
    pub data: Vec<u8>,
}

impl Notary {
    pub fn new(token_name: impl Into<String>, token_symbol: impl Into<String>) -> Self {
        Self {
            token_name: token_name.into(),
            token_symbol: token_symbol.into(),
            stars: BTreeMap::new(),
            sale_prices: BTreeMap::new(),
            exchange_offers: BTreeMap::new(),
            selectors: Selectors::new(),
        }
    }

    /// Run one transaction against the contract.
    pub fn execute(
        &mut self,
        caller: Address,
        value: u128,
        calldata: &[u8],
    ) -> Result<Execution, String> {
        if calldata.len() < 4 {
            return Err("call data shorter than a selector".to_string());
        }
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&calldata[..4]);
        let input = &calldata[4..];

        let func = self
            .selectors
            .resolve(selector)
            .ok_or_else(|| format!("unknown function selector 0x{}", hex::encode(selector)))?;
        if value > 0 && func != Func::BuyStar {
            return Err(ERR_NOT_PAYABLE.to_string());
        }

        match func {
            Func::CreateStar => {
                let args = decode_args(&[ParamType::Str, ParamType::Uint], input)?;
                let name = args[0].as_str().unwrap_or_default().to_string();
                let id = args[1].as_uint().unwrap_or_default();
                self.create_star(caller, name, id)
            }
            Func::LookUp => {
                let args = decode_args(&[ParamType::Uint], input)?;
                self.look_up(args[0].as_uint().unwrap_or_default())
            }
            Func::OwnerOf => {
                let args = decode_args(&[ParamType::Uint], input)?;
                self.owner_of(args[0].as_uint().unwrap_or_default())
            }
            Func::PutUpForSale => {
                let args = decode_args(&[ParamType::Uint, ParamType::Uint], input)?;
                let id = args[0].as_uint().unwrap_or_default();
                let price = args[1].as_uint().unwrap_or_default();
                self.put_star_up_for_sale(caller, id, price)
            }
            Func::StarsForSale => {
                let args = decode_args(&[ParamType::Uint], input)?;
                self.stars_for_sale(args[0].as_uint().unwrap_or_default())
            }
            Func::BuyStar => {
                let args = decode_args(&[ParamType::Uint], input)?;
                self.buy_star(caller, value, args[0].as_uint().unwrap_or_default())
            }
            Func::TransferStar => {
                let args = decode_args(&[ParamType::Address, ParamType::Uint], input)?;
                let to = args[0].as_address().unwrap_or(Address::ZERO);
                let id = args[1].as_uint().unwrap_or_default();
                self.transfer_star(caller, to, id)
            }
            Func::ApproveForExchange => {
                let args = decode_args(&[ParamType::Uint, ParamType::Uint], input)?;
                let owned = args[0].as_uint().unwrap_or_default();
                let desired = args[1].as_uint().unwrap_or_default();
                self.approve_for_exchange(caller, owned, desired)
            }
            Func::ExchangeStars => {
                let args = decode_args(&[ParamType::Uint, ParamType::Uint], input)?;
                let token1 = args[0].as_uint().unwrap_or_default();
                let token2 = args[1].as_uint().unwrap_or_default();
                self.exchange_stars(token1, token2)
            }
            Func::Name => ok_return(abi::encode(&[Value::Str(self.token_name.clone())])),
            Func::Symbol => ok_return(abi::encode(&[Value::Str(self.token_symbol.clone())])),
        }
    }

    /// Run a read-only call: same dispatch, state changes discarded.
    pub fn call(&self, caller: Address, calldata: &[u8]) -> Result<Vec<u8>, String> {
        let mut scratch = self.clone();
        scratch.execute(caller, 0, calldata).map(|execution| execution.return_data)
    }

    fn owner(&self, id: u128) -> Option<Address> {
        self.stars.get(&id).map(|star| star.owner)
    }

    fn create_star(&mut self, caller: Address, name: String, id: u128) -> Result<Execution, String> {
        if self.stars.contains_key(&id) {
            return Err(ERR_TOKEN_TAKEN.to_string());
        }
        self.stars.insert(id, Star { name, owner: caller });
        Ok(Execution {
            return_data: Vec::new(),
            events: vec![transfer_event(Address::ZERO, caller, id)],
            payouts: Vec::new(),
        })
    }

    fn look_up(&self, id: u128) -> Result<Execution, String> {
        // Missing records read back as the empty string, exactly like a
        // solidity mapping of structs.
        let name = self.stars.get(&id).map(|star| star.name.clone()).unwrap_or_default();
        ok_return(abi::encode(&[Value::Str(name)]))
    }

    fn owner_of(&self, id: u128) -> Result<Execution, String> {
        let owner = self.owner(id).ok_or_else(|| ERR_NO_TOKEN.to_string())?;
        ok_return(abi::encode(&[Value::Address(owner)]))
    }

    fn put_star_up_for_sale(
        &mut self,
        caller: Address,
        id: u128,
        price: u128,
    ) -> Result<Execution, String> {
        if self.owner(id) != Some(caller) {
            return Err(ERR_UNAUTHORIZED.to_string());
        }
        self.sale_prices.insert(id, price);
        ok_return(Vec::new())
    }

    fn stars_for_sale(&self, id: u128) -> Result<Execution, String> {
        let price = self.sale_prices.get(&id).copied().unwrap_or_default();
        ok_return(abi::encode(&[Value::Uint(price)]))
    }

    fn buy_star(&mut self, caller: Address, value: u128, id: u128) -> Result<Execution, String> {
        let price = match self.sale_prices.get(&id) {
            Some(price) if *price > 0 => *price,
            _ => return Err(ERR_NOT_FOR_SALE.to_string()),
        };
        if value < price {
            return Err(ERR_INSUFFICIENT_PAYMENT.to_string());
        }
        let star = self.stars.get_mut(&id).ok_or_else(|| ERR_NO_TOKEN.to_string())?;
        let seller = star.owner;
        star.owner = caller;
        self.sale_prices.remove(&id);

        let mut payouts = vec![(seller, price)];
        if value > price {
            payouts.push((caller, value - price));
        }
        Ok(Execution {
            return_data: Vec::new(),
            events: vec![transfer_event(seller, caller, id)],
            payouts,
        })
    }

    fn transfer_star(&mut self, caller: Address, to: Address, id: u128) -> Result<Execution, String> {
        let star = self.stars.get_mut(&id).ok_or_else(|| ERR_UNAUTHORIZED.to_string())?;
        if star.owner != caller {
            return Err(ERR_UNAUTHORIZED.to_string());
        }
        star.owner = to;
        Ok(Execution {
            return_data: Vec::new(),
            events: vec![transfer_event(caller, to, id)],
            payouts: Vec::new(),
        })
    }

    fn approve_for_exchange(
        &mut self,
        caller: Address,
        owned: u128,
        desired: u128,
    ) -> Result<Execution, String> {
        if !self.stars.contains_key(&desired) {
            return Err(ERR_DESIRED_NOT_FOUND.to_string());
        }
        if self.owner(owned) != Some(caller) {
            return Err(ERR_UNAUTHORIZED.to_string());
        }
        self.exchange_offers.insert(owned, desired);
        Ok(Execution {
            return_data: Vec::new(),
            events: vec![exchange_offer_event(owned, desired)],
            payouts: Vec::new(),
        })
    }

    fn exchange_stars(&mut self, token1: u128, token2: u128) -> Result<Execution, String> {
        let approved = self.exchange_offers.get(&token1) == Some(&token2)
            && self.exchange_offers.get(&token2) == Some(&token1);
        if !approved {
            return Err(ERR_NOT_APPROVED.to_string());
        }
        let (Some(owner1), Some(owner2)) = (self.owner(token1), self.owner(token2)) else {
            return Err(ERR_NOT_APPROVED.to_string());
        };

        if let Some(star) = self.stars.get_mut(&token1) {
            star.owner = owner2;
        }
        if let Some(star) = self.stars.get_mut(&token2) {
            star.owner = owner1;
        }
        self.exchange_offers.remove(&token1);
        self.exchange_offers.remove(&token2);

        Ok(Execution {
            return_data: Vec::new(),
            events: vec![
                exchange_deal_event(token1, token2),
                transfer_event(owner1, owner2, token1),
                transfer_event(owner2, owner1, token2),
            ],
            payouts: Vec::new(),
        })
    }
}

fn ok_return(data: Vec<u8>) -> Result<Execution, String> {
    Ok(Execution { return_data: data, events: Vec::new(), payouts: Vec::new() })
}

fn decode_args(types: &[ParamType], input: &[u8]) -> Result<Vec<Value>, String> {
    abi::decode(types, input).map_err(|e| format!("malformed call data: {e}"))
}

fn transfer_event(from: Address, to: Address, id: u128) -> Event {
    Event {
        topics: vec![
            abi::event_topic("Transfer(address,address,uint256)"),
            abi::encode_topic_address(&from),
            abi::encode_topic_address(&to),
            abi::encode_topic_uint(id),
        ],
        data: Vec::new(),
    }
}

fn exchange_offer_event(owned: u128, desired: u128) -> Event {
    Event {
        topics: vec![abi::event_topic("starExchangeOffer(uint256,uint256)")],
        data: abi::encode(&[Value::Uint(owned), Value::Uint(desired)]),
    }
}

fn exchange_deal_event(token1: u128, token2: u128) -> Event {
    Event {
        topics: vec![abi::event_topic("starExchangeDeal(uint256,uint256)")],
        data: abi::encode(&[Value::Uint(token1), Value::Uint(token2)]),
    }
}

#[derive(Clone, Copy)]
struct Selectors {
    create_star: [u8; 4],
    look_up: [u8; 4],
    owner_of: [u8; 4],
    put_up_for_sale: [u8; 4],
    stars_for_sale: [u8; 4],
    buy_star: [u8; 4],
    transfer_star: [u8; 4],
    approve_for_exchange: [u8; 4],
    exchange_stars: [u8; 4],
    name: [u8; 4],
    symbol: [u8; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    CreateStar,
    LookUp,
    OwnerOf,
    PutUpForSale,
    StarsForSale,
    BuyStar,
    TransferStar,
    ApproveForExchange,
    ExchangeStars,
    Name,
    Symbol,
}

impl Selectors {
    fn new() -> Self {
        Self {
            create_star: abi::selector("createStar(string,uint256)"),
            look_up: abi::selector("lookUptokenIdToStarInfo(uint256)"),
            owner_of: abi::selector("ownerOf(uint256)"),
            put_up_for_sale: abi::selector("putStarUpForSale(uint256,uint256)"),
            stars_for_sale: abi::selector("starsForSale(uint256)"),
            buy_star: abi::selector("buyStar(uint256)"),
            transfer_star: abi::selector("transferStar(address,uint256)"),
            approve_for_exchange: abi::selector("approveForExchange(uint256,uint256)"),
            exchange_stars: abi::selector("exchangeStars(uint256,uint256)"),
            name: abi::selector("name()"),
            symbol: abi::selector("symbol()"),
        }
    }

    fn resolve(&self, selector: [u8; 4]) -> Option<Func> {
        if selector == self.create_star {
            Some(Func::CreateStar)
        } else if selector == self.look_up {
            Some(Func::LookUp)
        } else if selector == self.owner_of {
            Some(Func::OwnerOf)
        } else if selector == self.put_up_for_sale {
            Some(Func::PutUpForSale)
        } else if selector == self.stars_for_sale {
            Some(Func::StarsForSale)
        } else if selector == self.buy_star {
            Some(Func::BuyStar)
        } else if selector == self.transfer_star {
            Some(Func::TransferStar)
        } else if selector == self.approve_for_exchange {
            Some(Func::ApproveForExchange)
        } else if selector == self.exchange_stars {
            Some(Func::ExchangeStars)
        } else if selector == self.name {
            Some(Func::Name)
        } else if selector == self.symbol {
            Some(Func::Symbol)
        } else {
            None
        }
    }
}

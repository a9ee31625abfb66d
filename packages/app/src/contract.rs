//! Typed handle over a deployed contract.
//!
//! Built from the artifact ABI at session start. Arguments are checked
//! against the declared inputs before anything goes on the wire, so a
//! wrong arity or type surfaces as a codec error rather than a confusing
//! node-side revert.

use crate::artifact::AbiEntry;
use crate::provider::{encode_hex_bytes, CallObject, Provider, TransactionObject};
use crate::Error;
use starnotary_types::abi::{self, ParamType, Value};
use starnotary_types::Address;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A contract bound to one deployed address.
pub struct Contract {
    provider: Arc<Provider>,
    address: Address,
    functions: BTreeMap<String, FunctionDef>,
    events: BTreeMap<String, EventDef>,
}

struct FunctionDef {
    inputs: Vec<ParamType>,
    outputs: Vec<ParamType>,
    payable: bool,
}

struct EventDef {
    /// Declared inputs in order, with their indexed flag.
    inputs: Vec<(ParamType, bool)>,
}

impl Contract {
    /// Build a handle from the artifact ABI. Fails on parameter types the
    /// codec does not cover.
    pub fn new(provider: Arc<Provider>, address: Address, abi: &[AbiEntry]) -> Result<Self, Error> {
        let mut functions = BTreeMap::new();
        let mut events = BTreeMap::new();

        for entry in abi {
            match entry.kind.as_str() {
                "function" => {
                    let inputs = parse_params(&entry.name, &entry.inputs)?;
                    let outputs = parse_params(&entry.name, &entry.outputs)?;
                    let payable = entry.state_mutability.as_deref() == Some("payable");
                    functions.insert(entry.name.clone(), FunctionDef { inputs, outputs, payable });
                }
                "event" => {
                    let mut inputs = Vec::with_capacity(entry.inputs.len());
                    for param in &entry.inputs {
                        let ty = ParamType::parse(&param.kind)
                            .map_err(|e| Error::Codec(format!("{}: {e}", entry.name)))?;
                        inputs.push((ty, param.indexed));
                    }
                    events.insert(entry.name.clone(), EventDef { inputs });
                }
                // Constructors, fallbacks and the like are irrelevant to a
                // deployed-contract handle.
                _ => {}
            }
        }

        Ok(Self { provider, address, functions, events })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Read-only function call; decoded against the declared outputs.
    pub async fn call(
        &self,
        from: Option<Address>,
        function: &str,
        args: &[Value],
    ) -> Result<Vec<Value>, Error> {
        let def = self.function(function)?;
        check_args(function, &def.inputs, args)?;

        let data = abi::encode_call(self.selector(function, &def.inputs), args);
        let returned = self
            .provider
            .call(&CallObject { to: self.address, from, data: encode_hex_bytes(&data) })
            .await?;
        abi::decode(&def.outputs, &returned)
            .map_err(|e| Error::Codec(format!("{function} return data: {e}")))
    }

    /// State-changing function call; returns the transaction hash. `value`
    /// is the attached payment in wei, only accepted by payable functions.
    pub async fn send(
        &self,
        from: Address,
        function: &str,
        args: &[Value],
        value: u128,
    ) -> Result<String, Error> {
        let def = self.function(function)?;
        check_args(function, &def.inputs, args)?;
        if value > 0 && !def.payable {
            return Err(Error::Codec(format!("{function} is not payable")));
        }

        let data = abi::encode_call(self.selector(function, &def.inputs), args);
        self.provider
            .send_transaction(&TransactionObject {
                from,
                to: self.address,
                value: (value > 0).then(|| format!("0x{value:x}")),
                data: encode_hex_bytes(&data),
            })
            .await
    }

    /// topic0 for a declared event.
    pub fn event_topic(&self, event: &str) -> Result<[u8; 32], Error> {
        let def = self.event(event)?;
        let types: Vec<ParamType> = def.inputs.iter().map(|(ty, _)| *ty).collect();
        Ok(abi::event_topic(&abi::signature(event, &types)))
    }

    /// Types of a declared event's non-indexed inputs, in declaration
    /// order. This is the layout of the log's data section.
    pub fn event_data_types(&self, event: &str) -> Result<Vec<ParamType>, Error> {
        let def = self.event(event)?;
        Ok(def
            .inputs
            .iter()
            .filter(|(_, indexed)| !indexed)
            .map(|(ty, _)| *ty)
            .collect())
    }

    fn function(&self, name: &str) -> Result<&FunctionDef, Error> {
        self.functions
            .get(name)
            .ok_or_else(|| Error::Codec(format!("contract has no function {name}")))
    }

    fn event(&self, name: &str) -> Result<&EventDef, Error> {
        self.events
            .get(name)
            .ok_or_else(|| Error::Codec(format!("contract has no event {name}")))
    }

    fn selector(&self, name: &str, inputs: &[ParamType]) -> [u8; 4] {
        abi::selector(&abi::signature(name, inputs))
    }
}

fn parse_params(owner: &str, params: &[crate::artifact::AbiParam]) -> Result<Vec<ParamType>, Error> {
    params
        .iter()
        .map(|p| ParamType::parse(&p.kind).map_err(|e| Error::Codec(format!("{owner}: {e}"))))
        .collect()
}

fn check_args(name: &str, inputs: &[ParamType], args: &[Value]) -> Result<(), Error> {
    if args.len() != inputs.len() {
        return Err(Error::Codec(format!(
            "{name} expects {} arguments, got {}",
            inputs.len(),
            args.len()
        )));
    }
    for (i, (expected, arg)) in inputs.iter().zip(args).enumerate() {
        if arg.param_type() != *expected {
            return Err(Error::Codec(format!(
                "{name} argument {i} expects {}, got {}",
                expected.canonical(),
                arg.param_type().canonical()
            )));
        }
    }
    Ok(())
}

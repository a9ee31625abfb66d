//! Minimal ABI codec for the contract call convention.
//!
//! Covers exactly the value model the notary contract surface uses:
//! `uint256`, `address`, `string`, and `bool`. Calls are a 4-byte
//! Keccak-256 selector followed by head/tail-encoded arguments; dynamic
//! values contribute a 32-byte offset in the head and a length-prefixed,
//! 32-byte-padded payload in the tail. Return data and event data decode
//! through the same layout.
//!
//! `uint256` values are carried as `u128`: the upper 16 bytes of a wire
//! word must be zero, and decoding rejects anything wider rather than
//! truncating.

use crate::{Address, CodecError};
use sha3::{Digest, Keccak256};

const WORD: usize = 32;

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// First 4 bytes of the Keccak-256 of a canonical function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// topic0 of an event: the Keccak-256 of its canonical signature.
pub fn event_topic(signature: &str) -> [u8; 32] {
    keccak256(signature.as_bytes())
}

/// The ABI types this codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Uint,
    Address,
    Str,
    Bool,
}

impl ParamType {
    /// Parse a descriptor type string as it appears in a contract artifact.
    pub fn parse(descriptor: &str) -> Result<Self, CodecError> {
        match descriptor {
            "uint256" => Ok(Self::Uint),
            "address" => Ok(Self::Address),
            "string" => Ok(Self::Str),
            "bool" => Ok(Self::Bool),
            other => Err(CodecError::UnsupportedType(other.to_string())),
        }
    }

    /// Canonical spelling used in signatures.
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Uint => "uint256",
            Self::Address => "address",
            Self::Str => "string",
            Self::Bool => "bool",
        }
    }
}

/// A decoded or to-be-encoded ABI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uint(u128),
    Address(Address),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::Uint(_) => ParamType::Uint,
            Self::Address(_) => ParamType::Address,
            Self::Str(_) => ParamType::Str,
            Self::Bool(_) => ParamType::Bool,
        }
    }

    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Canonical signature for a function or event, e.g.
/// `createStar(string,uint256)`.
pub fn signature(name: &str, params: &[ParamType]) -> String {
    let types: Vec<&str> = params.iter().map(ParamType::canonical).collect();
    format!("{}({})", name, types.join(","))
}

/// Encode an argument list (no selector prefix).
pub fn encode(args: &[Value]) -> Vec<u8> {
    let head_len = WORD * args.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail: Vec<u8> = Vec::new();

    for arg in args {
        match arg {
            Value::Uint(v) => head.extend_from_slice(&uint_word(*v)),
            Value::Address(a) => head.extend_from_slice(&address_word(a)),
            Value::Bool(b) => head.extend_from_slice(&uint_word(u128::from(*b))),
            Value::Str(s) => {
                head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
                tail.extend_from_slice(&uint_word(s.len() as u128));
                tail.extend_from_slice(s.as_bytes());
                let padding = s.len().div_ceil(WORD) * WORD - s.len();
                tail.extend(std::iter::repeat(0u8).take(padding));
            }
        }
    }

    head.extend_from_slice(&tail);
    head
}

/// Encode a full call: selector + arguments.
pub fn encode_call(selector: [u8; 4], args: &[Value]) -> Vec<u8> {
    let mut out = selector.to_vec();
    out.extend_from_slice(&encode(args));
    out
}

/// Decode an argument/return/event-data section against declared types.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Value>, CodecError> {
    let mut out = Vec::with_capacity(types.len());
    for (i, ty) in types.iter().enumerate() {
        let word = read_word(data, i * WORD)?;
        let value = match ty {
            ParamType::Uint => Value::Uint(decode_uint_word(&word)?),
            ParamType::Address => {
                let mut bytes = [0u8; 20];
                bytes.copy_from_slice(&word[12..]);
                Value::Address(Address::from(bytes))
            }
            ParamType::Bool => Value::Bool(word[WORD - 1] != 0),
            ParamType::Str => {
                let offset = usize::try_from(decode_uint_word(&word)?)
                    .map_err(|_| CodecError::OutOfBounds)?;
                Value::Str(decode_string_at(data, offset)?)
            }
        };
        out.push(value);
    }
    Ok(out)
}

fn decode_string_at(data: &[u8], offset: usize) -> Result<String, CodecError> {
    let len_word = read_word(data, offset).map_err(|_| CodecError::OutOfBounds)?;
    let len =
        usize::try_from(decode_uint_word(&len_word)?).map_err(|_| CodecError::OutOfBounds)?;
    let start = offset + WORD;
    let end = start.checked_add(len).ok_or(CodecError::OutOfBounds)?;
    if end > data.len() {
        return Err(CodecError::OutOfBounds);
    }
    String::from_utf8(data[start..end].to_vec()).map_err(|_| CodecError::InvalidUtf8)
}

fn read_word(data: &[u8], offset: usize) -> Result<[u8; 32], CodecError> {
    let end = offset.checked_add(WORD).ok_or(CodecError::Truncated)?;
    if end > data.len() {
        return Err(CodecError::Truncated);
    }
    let mut word = [0u8; 32];
    word.copy_from_slice(&data[offset..end]);
    Ok(word)
}

fn decode_uint_word(word: &[u8; 32]) -> Result<u128, CodecError> {
    if word[..16].iter().any(|b| *b != 0) {
        return Err(CodecError::UintOverflow);
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(low))
}

fn uint_word(v: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&v.to_be_bytes());
    word
}

fn address_word(a: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(a.as_bytes());
    word
}

/// Encode an indexed `address` argument as a 32-byte topic.
pub fn encode_topic_address(a: &Address) -> [u8; 32] {
    address_word(a)
}

/// Encode an indexed `uint256` argument as a 32-byte topic.
pub fn encode_topic_uint(v: u128) -> [u8; 32] {
    uint_word(v)
}

/// Decode an indexed `address` topic.
pub fn decode_topic_address(topic: &[u8; 32]) -> Address {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&topic[12..]);
    Address::from(bytes)
}

/// Decode an indexed `uint256` topic.
pub fn decode_topic_uint(topic: &[u8; 32]) -> Result<u128, CodecError> {
    decode_uint_word(topic)
}

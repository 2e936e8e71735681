use core::fmt;

use super::{Setting, SettingError};
use crate::registers::Register;

/// External value of a setting
///
/// `Reserved` is what [`SettingDescriptor::decode`] returns for a raw code
/// that has no symbol; it is never accepted by
/// [`encode`](SettingDescriptor::encode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value<'a> {
    /// Plain integer (raw field value, or a transformed quantity such as Hz)
    Int(u32),
    /// Single-bit flag
    Bool(bool),
    /// Entry of the setting's symbol table
    Symbol(&'a str),
    /// Raw code with no symbol assigned
    Reserved(u32),
}

impl Value<'_> {
    /// The value as an integer, if it is numeric
    pub fn as_int(self) -> Option<u32> {
        match self {
            Value::Int(n) => Some(n),
            Value::Bool(b) => Some(b as u32),
            _ => None,
        }
    }

    /// The value as a flag, if it is numeric
    pub fn as_bool(self) -> Option<bool> {
        self.as_int().map(|n| n != 0)
    }

    /// The symbol, if the value is one
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

impl From<u32> for Value<'_> {
    fn from(n: u32) -> Self {
        Value::Int(n)
    }
}

impl From<u8> for Value<'_> {
    fn from(n: u8) -> Self {
        Value::Int(n.into())
    }
}

impl From<u16> for Value<'_> {
    fn from(n: u16) -> Self {
        Value::Int(n.into())
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Symbol(s)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Symbol(s) => f.write_str(s),
            Value::Reserved(raw) => write!(f, "<reserved 0x{raw:02X}>"),
        }
    }
}

/// Mapping between external values and raw field codes
#[derive(Clone, Copy)]
pub enum Codec {
    /// Integers and flags pass through unchanged
    Raw,
    /// Raw code `n` is the `n`th entry; `None` entries are reserved codes
    Symbols(&'static [Option<&'static str>]),
    /// Numeric conversion; `forward` returns `None` for unrepresentable input
    Transform {
        forward: fn(u32) -> Option<u32>,
        reverse: fn(u32) -> u32,
    },
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Raw => f.write_str("Raw"),
            Codec::Symbols(table) => f.debug_tuple("Symbols").field(table).finish(),
            Codec::Transform { .. } => f.write_str("Transform"),
        }
    }
}

/// Location and encoding of one setting
///
/// A field of `width` 1 occupies the bits of `mask` in `register`, starting
/// at bit `shift`. A field with `width > 1` always has a full mask and spans
/// `width` consecutive registers starting at `register`, most significant
/// byte first.
#[derive(Debug, Clone, Copy)]
pub struct SettingDescriptor {
    /// Identifier this descriptor belongs to
    pub setting: Setting,
    /// First (or only) register holding the field
    pub register: Register,
    /// Position of the field's least significant bit
    pub shift: u8,
    /// Bits of the register occupied by the field
    pub mask: u8,
    /// Number of bytes for multi-byte values, 1 for bitfields
    pub width: u8,
    /// Value mapping
    pub codec: Codec,
}

impl SettingDescriptor {
    pub(crate) const fn bits(setting: Setting, register: Register, shift: u8, mask: u8) -> Self {
        Self {
            setting,
            register,
            shift,
            mask,
            width: 1,
            codec: Codec::Raw,
        }
    }

    pub(crate) const fn byte(setting: Setting, register: Register) -> Self {
        Self::bits(setting, register, 0, 0xFF)
    }

    pub(crate) const fn bytes(setting: Setting, register: Register, width: u8) -> Self {
        Self {
            width,
            ..Self::byte(setting, register)
        }
    }

    pub(crate) const fn symbols(self, table: &'static [Option<&'static str>]) -> Self {
        Self {
            codec: Codec::Symbols(table),
            ..self
        }
    }

    pub(crate) const fn transform(
        self,
        forward: fn(u32) -> Option<u32>,
        reverse: fn(u32) -> u32,
    ) -> Self {
        Self {
            codec: Codec::Transform { forward, reverse },
            ..self
        }
    }

    /// Whether the field shares its register with other bits
    pub fn is_partial(&self) -> bool {
        self.mask != 0xFF
    }

    /// Largest raw code the field can hold
    pub fn max_raw(&self) -> u32 {
        if self.width >= 4 {
            u32::MAX
        } else if self.width > 1 {
            (1 << (8 * u32::from(self.width))) - 1
        } else {
            u32::from(self.mask >> self.shift)
        }
    }

    /// Symbol table, if the setting has one
    pub fn symbols_table(&self) -> Option<&'static [Option<&'static str>]> {
        match self.codec {
            Codec::Symbols(table) => Some(table),
            _ => None,
        }
    }

    /// Converts an external value into the raw field code.
    ///
    /// Symbol tables whose entries are all numeric (such as OCP trim in mA)
    /// also accept the equivalent integer.
    ///
    /// # Errors
    /// * `SettingError::InvalidValue` - the value has the wrong kind for
    ///   this setting, is not in its symbol table, or does not fit the field
    pub fn encode(&self, value: Value<'_>) -> Result<u32, SettingError> {
        let raw = match (self.codec, value) {
            (Codec::Symbols(table), Value::Symbol(name)) => table
                .iter()
                .position(|entry| *entry == Some(name))
                .map(|index| index as u32),
            (Codec::Symbols(table), Value::Int(n)) if is_numeric(table) => table
                .iter()
                .position(|entry| entry.and_then(|s| s.parse::<u32>().ok()) == Some(n))
                .map(|index| index as u32),
            (Codec::Transform { forward, .. }, Value::Int(n)) => forward(n),
            (Codec::Raw, Value::Int(n)) => Some(n),
            (Codec::Raw, Value::Bool(b)) => Some(b as u32),
            _ => None,
        };

        raw.filter(|raw| *raw <= self.max_raw())
            .ok_or(SettingError::InvalidValue(self.setting))
    }

    /// Converts a raw field code into its external value.
    ///
    /// Codes without a symbol decode to [`Value::Reserved`].
    pub fn decode(&self, raw: u32) -> Value<'static> {
        match self.codec {
            Codec::Symbols(table) => match table.get(raw as usize).copied().flatten() {
                Some(symbol) => Value::Symbol(symbol),
                None => Value::Reserved(raw),
            },
            Codec::Transform { reverse, .. } => Value::Int(reverse(raw)),
            Codec::Raw => Value::Int(raw),
        }
    }
}

fn is_numeric(table: &[Option<&str>]) -> bool {
    table
        .iter()
        .flatten()
        .all(|entry| !entry.is_empty() && entry.bytes().all(|b| b.is_ascii_digit()))
}

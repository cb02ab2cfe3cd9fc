//! Bit-flag codecs for the task and work-order type vocabularies.
//!
//! Each vocabulary is a closed enum whose variants map to a power-of-two flag.
//! A set of names is stored as the OR of its flags in a single `i32`.

use crate::error::CodecError;
use ahash::AHashSet;
use std::fmt;

/// A closed vocabulary of power-of-two type flags.
pub trait TypeFlag: Copy + Eq + fmt::Debug + 'static {
    /// Every flag of the vocabulary in canonical order.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;
    fn bit(self) -> i32;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|flag| flag.name() == name)
    }
}

/// Encodes a list of type names into a bitmask.
///
/// Fails when the list is empty, names an unknown type or repeats a name.
pub fn encode<F: TypeFlag>(names: &[&str]) -> Result<i32, CodecError> {
    if names.is_empty() {
        return Err(CodecError::Empty);
    }
    let mut seen = AHashSet::with_capacity(names.len());
    let mut mask = 0;
    for name in names {
        let flag = F::from_name(name).ok_or_else(|| CodecError::Unknown(name.to_string()))?;
        if !seen.insert(flag.bit()) {
            return Err(CodecError::Duplicate(name.to_string()));
        }
        mask = set(mask, flag.bit());
    }
    Ok(mask)
}

/// Decodes a bitmask into its names, in canonical order. Unknown bits are ignored.
pub fn decode<F: TypeFlag>(mask: i32) -> Vec<&'static str> {
    F::ALL
        .iter()
        .filter(|flag| contains(mask, flag.bit()))
        .map(|flag| flag.name())
        .collect()
}

/// Parses the editor's JSON-encoded name array and encodes it.
pub fn encode_json<F: TypeFlag>(json: &str) -> Result<i32, CodecError> {
    let names: Vec<String> =
        serde_json::from_str(json).map_err(|e| CodecError::Malformed(e.to_string()))?;
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    encode::<F>(&refs)
}

pub fn set(mask: i32, bits: i32) -> i32 {
    mask | bits
}

pub fn contains(mask: i32, bits: i32) -> bool {
    bits != 0 && mask & bits == bits
}

pub fn without(mask: i32, bits: i32) -> i32 {
    mask ^ (mask & bits)
}

pub fn union(a: i32, b: i32) -> i32 {
    a | b
}

pub fn intersection(a: i32, b: i32) -> i32 {
    a & b
}

/// Defines a vocabulary enum, its name table and its `TypeFlag` impl.
macro_rules! define_type_flags {
    ( $(#[$meta:meta])* $enum_name:ident { $( $variant:ident = ($name:expr, $bit:expr) ),* $(,)? } ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $( $variant, )*
        }

        impl TypeFlag for $enum_name {
            const ALL: &'static [Self] = &[ $( $enum_name::$variant, )* ];

            fn name(self) -> &'static str {
                match self {
                    $( $enum_name::$variant => $name, )*
                }
            }

            fn bit(self) -> i32 {
                match self {
                    $( $enum_name::$variant => $bit, )*
                }
            }
        }

        impl fmt::Display for $enum_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

define_type_flags! {
    /// Task types a node can carry.
    TaskType {
        DataCollecting = ("dataCollecting", 1 << 0),
        DataCleaning = ("dataCleaning", 1 << 1),
        DataAnalysis = ("dataAnalysis", 1 << 2),
        DataReporting = ("dataReporting", 1 << 3),
        DataArchiving = ("dataArchiving", 1 << 4),
    }
}

define_type_flags! {
    /// Work-order types a node can raise.
    WorkOrderType {
        DataFusion = ("data_fusion", 1 << 0),
        DataDistribution = ("data_distribution", 1 << 1),
        DataGovernance = ("data_governance", 1 << 2),
        DataSecurity = ("data_security", 1 << 3),
    }
}

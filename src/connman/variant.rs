use std::collections::HashMap;

/// A flat key to variant-typed value map, as carried by Connman
/// property signals and `Get*` replies.
pub type PropertyMap = HashMap<String, Variant>;

/// The D-Bus value shapes Connman properties use, unpacked into an
/// owned tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Variant {
    Bool(bool),
    Byte(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Str(String),
    Array(Vec<Variant>),
    Dict(HashMap<String, Variant>),
}

impl Variant {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Variant::Byte(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_string_array(&self) -> Option<Vec<String>> {
        match self {
            Variant::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => None,
        }
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Variant {
        Variant::Bool(value)
    }
}

impl From<u8> for Variant {
    fn from(value: u8) -> Variant {
        Variant::Byte(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Variant {
        Variant::Str(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Variant {
        Variant::Str(value)
    }
}

impl From<Vec<&str>> for Variant {
    fn from(values: Vec<&str>) -> Variant {
        Variant::Array(values.into_iter().map(Variant::from).collect())
    }
}

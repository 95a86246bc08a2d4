//! Lookup keys and the rules that pick an index for them
//!
//! A state key is either a numeric ANSI code or free text. Text that parses as an
//! integer is treated as a code before the two-letter abbreviation rule applies,
//! so `"12"` is Florida and never an abbreviation.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::state::State;

/// Key accepted by `State::find`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateKey {
    Code(i64),
    Text(String),
}

/// Key accepted as the county half of `County::find`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountyKey {
    Code(i64),
    Text(String),
}

/// State half of `County::find`: an already resolved state or anything `State::find` takes
#[derive(Debug, Clone)]
pub enum StateRef<'a> {
    State(&'a State),
    Key(StateKey),
}

/// Which of the three state indexes a key selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateIndex {
    Code,
    Name,
    Abbreviation,
}

/// Which of the two per-state county indexes a key selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CountyIndex {
    Code,
    Name,
}

/// A dispatched lookup: the index to consult, the query as reported in errors,
/// and the lower-cased map key
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lookup<I> {
    pub index: I,
    pub query: String,
    pub key: String,
}

impl<I> Lookup<I> {
    fn new(index: I, query: String) -> Self {
        let key = query.to_lowercase();
        Self { index, query, key }
    }

    /// Reports `query` verbatim but looks up the normalized `key`
    fn normalized(index: I, query: String, key: String) -> Self {
        Self { index, query, key }
    }
}

impl StateKey {
    pub(crate) fn lookup(&self) -> Lookup<StateIndex> {
        match self {
            StateKey::Code(code) => Lookup::new(StateIndex::Code, format!("{:02}", code)),
            StateKey::Text(text) => match text.parse::<i64>() {
                Ok(code) => {
                    Lookup::normalized(StateIndex::Code, text.clone(), format!("{:02}", code))
                }
                Err(_) if text.chars().count() == 2 => {
                    Lookup::new(StateIndex::Abbreviation, text.clone())
                }
                Err(_) => Lookup::new(StateIndex::Name, text.clone()),
            },
        }
    }
}

impl CountyKey {
    pub(crate) fn lookup(&self) -> Lookup<CountyIndex> {
        match self {
            CountyKey::Code(code) => Lookup::new(CountyIndex::Code, format!("{:03}", code)),
            CountyKey::Text(text) if is_county_code(text) => {
                Lookup::new(CountyIndex::Code, text.clone())
            }
            CountyKey::Text(text) => Lookup::new(CountyIndex::Name, text.clone()),
        }
    }
}

/// Exactly three ASCII digits
pub(crate) fn is_county_code(text: &str) -> bool {
    text.len() == 3 && text.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly two ASCII digits
pub(crate) fn is_state_code(text: &str) -> bool {
    text.len() == 2 && text.bytes().all(|b| b.is_ascii_digit())
}

macro_rules! impl_key_from_int {
    ($key:ident: $($int:ty),*) => {
        $(
            impl From<$int> for $key {
                fn from(code: $int) -> Self {
                    $key::Code(i64::from(code))
                }
            }
        )*
    };
}

macro_rules! impl_key_conversions {
    ($key:ident) => {
        impl From<&str> for $key {
            fn from(text: &str) -> Self {
                $key::Text(text.to_string())
            }
        }

        impl From<String> for $key {
            fn from(text: String) -> Self {
                $key::Text(text)
            }
        }

        impl From<&String> for $key {
            fn from(text: &String) -> Self {
                $key::Text(text.clone())
            }
        }

        // Codes beyond i64 can never match; saturate so they fail as not found.
        impl From<u64> for $key {
            fn from(code: u64) -> Self {
                $key::Code(i64::try_from(code).unwrap_or(i64::MAX))
            }
        }

        impl From<usize> for $key {
            fn from(code: usize) -> Self {
                $key::Code(i64::try_from(code).unwrap_or(i64::MAX))
            }
        }

        impl From<isize> for $key {
            fn from(code: isize) -> Self {
                $key::Code(i64::try_from(code).unwrap_or(i64::MAX))
            }
        }

        impl From<i128> for $key {
            fn from(code: i128) -> Self {
                $key::Code(i64::try_from(code).unwrap_or(i64::MAX))
            }
        }

        impl From<u128> for $key {
            fn from(code: u128) -> Self {
                $key::Code(i64::try_from(code).unwrap_or(i64::MAX))
            }
        }

        impl TryFrom<&Value> for $key {
            type Error = Error;

            fn try_from(value: &Value) -> Result<Self> {
                match value {
                    Value::String(text) => Ok($key::Text(text.clone())),
                    Value::Number(number) => number.as_i64().map($key::Code).ok_or_else(|| {
                        Error::InvalidArgument(format!(
                            "Argument must be an integer or a string, got {}",
                            number
                        ))
                    }),
                    other => Err(Error::InvalidArgument(format!(
                        "Argument must be an integer or a string, got {}",
                        json_type(other)
                    ))),
                }
            }
        }
    };
}

impl_key_from_int!(StateKey: i8, i16, i32, i64, u8, u16, u32);
impl_key_from_int!(CountyKey: i8, i16, i32, i64, u8, u16, u32);
impl_key_conversions!(StateKey);
impl_key_conversions!(CountyKey);

impl<'a> From<&'a State> for StateRef<'a> {
    fn from(state: &'a State) -> Self {
        StateRef::State(state)
    }
}

impl From<StateKey> for StateRef<'_> {
    fn from(key: StateKey) -> Self {
        StateRef::Key(key)
    }
}

macro_rules! impl_state_ref_from {
    ($($source:ty),*) => {
        $(
            impl From<$source> for StateRef<'_> {
                fn from(source: $source) -> Self {
                    StateRef::Key(StateKey::from(source))
                }
            }
        )*
    };
}

impl_state_ref_from!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, &str, String, &String
);

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_state_keys_are_zero_padded() {
        let lookup = StateKey::from(1).lookup();
        assert_eq!(lookup.index, StateIndex::Code);
        assert_eq!(lookup.key, "01");

        let lookup = StateKey::from(55u8).lookup();
        assert_eq!(lookup.key, "55");
    }

    #[test]
    fn test_numeric_state_strings_select_code_index() {
        // Two characters, but integer parsing wins over the abbreviation rule
        for text in ["12", "01", "1", "+1", "0012"] {
            let lookup = StateKey::from(text).lookup();
            assert_eq!(lookup.index, StateIndex::Code, "{text}");
        }
        assert_eq!(StateKey::from("1").lookup().key, "01");
        assert_eq!(StateKey::from("+12").lookup().key, "12");

        // The caller's text is what gets reported, not the padded key
        let lookup = StateKey::from("3").lookup();
        assert_eq!(lookup.query, "3");
        assert_eq!(lookup.key, "03");
    }

    #[test]
    fn test_text_state_keys() {
        let lookup = StateKey::from("WI").lookup();
        assert_eq!(lookup.index, StateIndex::Abbreviation);
        assert_eq!(lookup.query, "WI");
        assert_eq!(lookup.key, "wi");

        let lookup = StateKey::from("nEw JeRsEy").lookup();
        assert_eq!(lookup.index, StateIndex::Name);
        assert_eq!(lookup.key, "new jersey");

        // Not an integer, two characters: still an abbreviation lookup
        assert_eq!(StateKey::from("1a").lookup().index, StateIndex::Abbreviation);
    }

    #[test]
    fn test_county_keys() {
        let lookup = CountyKey::from(1).lookup();
        assert_eq!(lookup.index, CountyIndex::Code);
        assert_eq!(lookup.key, "001");

        assert_eq!(CountyKey::from(1000).lookup().key, "1000");
        assert_eq!(CountyKey::from("001").lookup().index, CountyIndex::Code);
        assert_eq!(CountyKey::from("1").lookup().index, CountyIndex::Name);
        assert_eq!(CountyKey::from("0001").lookup().index, CountyIndex::Name);

        let lookup = CountyKey::from("Norfolk city").lookup();
        assert_eq!(lookup.index, CountyIndex::Name);
        assert_eq!(lookup.key, "norfolk city");
    }

    #[test]
    fn test_json_keys() {
        assert_eq!(StateKey::try_from(&json!(12)).unwrap(), StateKey::Code(12));
        assert_eq!(
            CountyKey::try_from(&json!("001")).unwrap(),
            CountyKey::Text("001".to_string())
        );

        for value in [json!(null), json!(1.0), json!({}), json!([]), json!(true)] {
            let err = CountyKey::try_from(&value).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{value}");
            let err = StateKey::try_from(&value).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{value}");
        }
    }

    #[test]
    fn test_oversized_codes_saturate() {
        assert_eq!(StateKey::from(u64::MAX), StateKey::Code(i64::MAX));
        assert_eq!(CountyKey::from(u64::MAX), CountyKey::Code(i64::MAX));
        assert_eq!(CountyKey::from(7usize), CountyKey::Code(7));
        assert_eq!(StateKey::from(-7isize), StateKey::Code(-7));
        assert_eq!(CountyKey::from(3isize), CountyKey::Code(3));
        assert_eq!(StateKey::from(u128::MAX), StateKey::Code(i64::MAX));
        assert_eq!(CountyKey::from(12i128), CountyKey::Code(12));
    }

    #[test]
    fn test_code_shapes() {
        assert!(is_county_code("001"));
        assert!(!is_county_code("01"));
        assert!(!is_county_code("0a1"));
        assert!(is_state_code("78"));
        assert!(!is_state_code("7"));
        assert!(!is_state_code("AL"));
    }
}

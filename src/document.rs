//! Key-value document rendering for states and counties
//!
//! Documents carry the flat attribute set of an entity under camelCase keys and
//! can be parsed back into the identical registry entity via their key attributes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::county::County;
use crate::error::{Error, Result};
use crate::query::{is_county_code, is_state_code};
use crate::state::State;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    pub ansi_code: String,
    pub name: String,
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyDocument {
    pub state_ansi_code: String,
    pub county_ansi_code: String,
    pub name: String,
    pub short_name: String,
    pub designation: String,
}

impl From<&State> for StateDocument {
    fn from(state: &State) -> Self {
        Self {
            ansi_code: state.ansi_code().to_string(),
            name: state.name().to_string(),
            abbreviation: state.abbreviation().to_string(),
        }
    }
}

impl From<&County> for CountyDocument {
    fn from(county: &County) -> Self {
        Self {
            state_ansi_code: county.state_ansi_code().to_string(),
            county_ansi_code: county.county_ansi_code().to_string(),
            name: county.name().to_string(),
            short_name: county.short_name().to_string(),
            designation: county.designation().to_string(),
        }
    }
}

impl StateDocument {
    pub fn to_key(&self) -> [&str; 1] {
        [&self.ansi_code]
    }

    /// The registry state this document describes
    pub fn resolve(&self) -> Result<&'static State> {
        if !is_state_code(&self.ansi_code) {
            return Err(Error::Document(format!(
                "ansiCode '{}' is not a two-digit state code",
                self.ansi_code
            )));
        }
        State::find(self.ansi_code.as_str())
    }
}

impl CountyDocument {
    pub fn to_key(&self) -> [&str; 2] {
        [&self.state_ansi_code, &self.county_ansi_code]
    }

    /// The registry county this document describes
    pub fn resolve(&self) -> Result<&'static County> {
        if !is_state_code(&self.state_ansi_code) {
            return Err(Error::Document(format!(
                "stateAnsiCode '{}' is not a two-digit state code",
                self.state_ansi_code
            )));
        }
        if !is_county_code(&self.county_ansi_code) {
            return Err(Error::Document(format!(
                "countyAnsiCode '{}' is not a three-digit county code",
                self.county_ansi_code
            )));
        }
        County::find(self.state_ansi_code.as_str(), self.county_ansi_code.as_str())
    }
}

/// An entity with a document form
pub trait ToDocument {
    type Document: Serialize + DeserializeOwned;

    /// Key wrapping the document when a root is requested
    const ROOT: &'static str;

    fn to_document(&self) -> Self::Document;
}

impl ToDocument for State {
    type Document = StateDocument;
    const ROOT: &'static str = "state";

    fn to_document(&self) -> StateDocument {
        StateDocument::from(self)
    }
}

impl ToDocument for County {
    type Document = CountyDocument;
    const ROOT: &'static str = "county";

    fn to_document(&self) -> CountyDocument {
        CountyDocument::from(self)
    }
}

/// Render an entity as a JSON value, optionally under its root key
pub fn to_value<T: ToDocument + ?Sized>(entity: &T, include_root: bool) -> Result<Value> {
    let document =
        serde_json::to_value(entity.to_document()).map_err(|e| Error::Document(e.to_string()))?;
    if include_root {
        let mut root = Map::new();
        root.insert(T::ROOT.to_string(), document);
        Ok(Value::Object(root))
    } else {
        Ok(document)
    }
}

/// Render an entity as a JSON string, optionally under its root key
pub fn to_json<T: ToDocument + ?Sized>(entity: &T, include_root: bool) -> Result<String> {
    let value = to_value(entity, include_root)?;
    serde_json::to_string(&value).map_err(|e| Error::Document(e.to_string()))
}

fn parse<D: DeserializeOwned>(json: &str, root: &str, include_root: bool) -> Result<D> {
    let mut value: Value =
        serde_json::from_str(json).map_err(|e| Error::Document(e.to_string()))?;
    if include_root {
        value = match value {
            Value::Object(mut map) => map
                .remove(root)
                .ok_or_else(|| Error::Document(format!("missing root key '{}'", root)))?,
            _ => return Err(Error::Document("expected a JSON object".to_string())),
        };
    }
    serde_json::from_value(value).map_err(|e| Error::Document(e.to_string()))
}

/// Parse a state document and return the registry state it names
pub fn state_from_json(json: &str, include_root: bool) -> Result<&'static State> {
    parse::<StateDocument>(json, State::ROOT, include_root)?.resolve()
}

/// Parse a county document and return the registry county it names
pub fn county_from_json(json: &str, include_root: bool) -> Result<&'static County> {
    parse::<CountyDocument>(json, County::ROOT, include_root)?.resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_document() {
        let wisconsin = State::find("WI").unwrap();
        let value = to_value(wisconsin, false).unwrap();
        assert_eq!(
            value,
            json!({"ansiCode": "55", "name": "Wisconsin", "abbreviation": "WI"})
        );

        let rooted = to_value(wisconsin, true).unwrap();
        assert_eq!(rooted["state"], value);
        assert_eq!(wisconsin.to_document().to_key(), ["55"]);
    }

    #[test]
    fn test_county_document() {
        let county = County::find("AK", "Juneau City and Borough").unwrap();
        let document = county.to_document();
        assert_eq!(document.short_name, "Juneau");
        assert_eq!(document.designation, "City and Borough");
        assert_eq!(document.to_key(), ["02", "110"]);

        let value = to_value(county, true).unwrap();
        assert_eq!(value["county"]["stateAnsiCode"], "02");
        assert_eq!(value["county"]["shortName"], "Juneau");
    }

    #[test]
    fn test_parse_returns_registry_entities() {
        for state in State::all().unwrap() {
            let json = to_json(state, true).unwrap();
            assert!(std::ptr::eq(state_from_json(&json, true).unwrap(), state));
        }

        let norfolk = County::find("Virginia", "Norfolk city").unwrap();
        let json = to_json(norfolk, false).unwrap();
        assert!(std::ptr::eq(county_from_json(&json, false).unwrap(), norfolk));
    }

    #[test]
    fn test_malformed_documents() {
        let err = state_from_json("{\"ansiCode\": \"01\"", false).unwrap_err();
        assert!(matches!(err, Error::Document(_)));

        let err = state_from_json(r#"{"county": {}}"#, true).unwrap_err();
        assert_eq!(err, Error::Document("missing root key 'state'".to_string()));

        let err = state_from_json(r#"{"ansiCode": "AL", "name": "", "abbreviation": ""}"#, false)
            .unwrap_err();
        assert!(matches!(err, Error::Document(_)));

        let json = r#"{"stateAnsiCode": "45", "countyAnsiCode": "999",
                       "name": "", "shortName": "", "designation": ""}"#;
        assert!(county_from_json(json, false).unwrap_err().is_not_found());
    }
}

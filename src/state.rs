//! US states and state-equivalent census areas
//!
//! The bundled state list is parsed once, on first access, into a registry indexed
//! by ANSI code, name, and abbreviation. Every index key is lower-cased.

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, LazyLock};
use tracing::{error, info};

use crate::county::County;
use crate::error::{Error, LoadError, Result};
use crate::query::{is_state_code, StateIndex, StateKey};
use crate::source::{self, StateRecord, STATE_RESOURCE};

/// A US state or state-equivalent area (DC, territories).
///
/// States only exist inside a registry; there is no public constructor.
///
/// ```compile_fail
/// let state = ansi_codes::State {
///     ansi_code: "01".to_string(),
///     name: "Alabama".to_string(),
///     abbreviation: "AL".to_string(),
/// };
/// ```
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct State {
    ansi_code: String,
    name: String,
    abbreviation: String,
}

impl State {
    fn from_record(row: usize, record: StateRecord) -> std::result::Result<Self, LoadError> {
        let StateRecord {
            ansi_code,
            abbreviation,
            name,
        } = record;

        if !is_state_code(&ansi_code) {
            return Err(LoadError::new(
                STATE_RESOURCE,
                row,
                format!("state code '{}' is not two digits", ansi_code),
            ));
        }
        if abbreviation.len() != 2 || !abbreviation.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(LoadError::new(
                STATE_RESOURCE,
                row,
                format!("abbreviation '{}' is not two uppercase letters", abbreviation),
            ));
        }
        if name.is_empty() {
            return Err(LoadError::new(STATE_RESOURCE, row, "empty state name"));
        }

        Ok(Self {
            ansi_code,
            name,
            abbreviation,
        })
    }

    /// Two-digit, zero-padded ANSI code
    pub fn ansi_code(&self) -> &str {
        &self.ansi_code
    }

    /// Full name in title case
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Two-letter postal abbreviation in caps
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// Flat attribute set for serialization adapters
    pub fn attributes(&self) -> [(&'static str, &str); 3] {
        [
            ("ansiCode", &self.ansi_code),
            ("name", &self.name),
            ("abbreviation", &self.abbreviation),
        ]
    }

    /// Look up a state by ANSI code, abbreviation, or name.
    ///
    /// Integers and numeric strings select the code index, other two-character
    /// strings the abbreviation index, anything else the name index.
    /// Matching is case-insensitive.
    pub fn find(key: impl Into<StateKey>) -> Result<&'static State> {
        registry()?.find(key)
    }

    /// Like [`State::find`], additionally handing the match to `f`
    pub fn find_with<F>(key: impl Into<StateKey>, f: F) -> Result<&'static State>
    where
        F: FnOnce(&'static State),
    {
        let state = Self::find(key)?;
        f(state);
        Ok(state)
    }

    /// Every state, in ANSI code order
    pub fn all() -> Result<Vec<&'static State>> {
        Ok(registry()?.all().collect())
    }

    /// All of this state's counties
    pub fn counties(&self) -> Result<Vec<&'static County>> {
        County::all_in(self)
    }
}

/// Frozen set of states with their three lookup indexes
#[derive(Debug)]
pub struct StateRegistry {
    states: Vec<Arc<State>>,
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_abbreviation: HashMap<String, usize>,
}

impl StateRegistry {
    /// Build a registry from a pipe-separated state list with a header row
    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, LoadError> {
        let records: Vec<(usize, StateRecord)> =
            source::read_records(STATE_RESOURCE, b'|', reader)?;

        let mut builder = Builder::default();
        for (row, record) in records {
            builder.insert(row, State::from_record(row, record)?)?;
        }
        Ok(builder.finish())
    }

    pub(crate) fn bundled() -> std::result::Result<Self, LoadError> {
        Self::from_reader(source::STATE_SOURCE.as_bytes())
    }

    pub fn find(&self, key: impl Into<StateKey>) -> Result<&State> {
        let lookup = key.into().lookup();
        let index = match lookup.index {
            StateIndex::Code => &self.by_code,
            StateIndex::Name => &self.by_name,
            StateIndex::Abbreviation => &self.by_abbreviation,
        };

        index
            .get(&lookup.key)
            .map(|&i| self.states[i].as_ref())
            .ok_or(Error::StateNotFound {
                query: lookup.query,
            })
    }

    /// Exact match on an already-normalized two-digit code
    pub(crate) fn by_code(&self, ansi_code: &str) -> Option<&Arc<State>> {
        self.by_code.get(ansi_code).map(|&i| &self.states[i])
    }

    pub fn all(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.iter().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Mutable staging area used only while loading
#[derive(Default)]
struct Builder {
    states: Vec<Arc<State>>,
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_abbreviation: HashMap<String, usize>,
}

impl Builder {
    fn insert(&mut self, row: usize, state: State) -> std::result::Result<(), LoadError> {
        let i = self.states.len();
        for (index, label, value) in [
            (&mut self.by_code, "state code", &state.ansi_code),
            (&mut self.by_name, "state name", &state.name),
            (&mut self.by_abbreviation, "abbreviation", &state.abbreviation),
        ] {
            if index.insert(value.to_lowercase(), i).is_some() {
                return Err(LoadError::new(
                    STATE_RESOURCE,
                    row,
                    format!("duplicate {} '{}'", label, value),
                ));
            }
        }
        self.states.push(Arc::new(state));
        Ok(())
    }

    fn finish(mut self) -> StateRegistry {
        // Lookups are code-ordered regardless of source order
        let mut order: Vec<usize> = (0..self.states.len()).collect();
        order.sort_by(|&a, &b| self.states[a].ansi_code.cmp(&self.states[b].ansi_code));
        let mut remap = vec![0; order.len()];
        for (new, &old) in order.iter().enumerate() {
            remap[old] = new;
        }
        for index in [&mut self.by_code, &mut self.by_name, &mut self.by_abbreviation] {
            for i in index.values_mut() {
                *i = remap[*i];
            }
        }
        let states = order.iter().map(|&i| Arc::clone(&self.states[i])).collect();

        StateRegistry {
            states,
            by_code: self.by_code,
            by_name: self.by_name,
            by_abbreviation: self.by_abbreviation,
        }
    }
}

static REGISTRY: LazyLock<std::result::Result<Arc<StateRegistry>, LoadError>> =
    LazyLock::new(|| match StateRegistry::bundled() {
        Ok(registry) => {
            info!("Loaded {} states from {}", registry.len(), STATE_RESOURCE);
            Ok(Arc::new(registry))
        }
        Err(e) => {
            error!("State registry failed to load: {}", e);
            Err(e)
        }
    });

/// Process-wide state registry, loaded on first call
pub fn registry() -> Result<&'static StateRegistry> {
    Ok(shared_registry()?.as_ref())
}

/// The cached load outcome, shared with the county registry
pub(crate) fn shared_registry() -> std::result::Result<&'static Arc<StateRegistry>, LoadError> {
    REGISTRY.as_ref().map_err(Clone::clone)
}

//! US counties and county-equivalents (parishes, boroughs, independent cities, municipios)
//!
//! Counties are grouped per state. Codes and names are only unique inside their
//! state, so every lookup resolves the state first and then consults that
//! state's code or name index.

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error, info};

use crate::error::{Error, LoadError, Result};
use crate::query::{is_county_code, CountyIndex, CountyKey, StateRef};
use crate::source::{self, CountyRecord, COUNTY_RESOURCE};
use crate::state::{self, State, StateRegistry};

/// Trailing name tokens that mark the kind of county-equivalent.
///
/// Longer tokens come first so "City and Borough" wins over "Borough" and
/// "Islands" over "Island". The lower-case "city" is the Virginia, Maryland,
/// Missouri and Nevada independent-city form; "Carson City" keeps its name whole.
const DESIGNATIONS: &[&str] = &[
    "City and Borough",
    "Census Area",
    "Municipality",
    "Municipio",
    "Borough",
    "County",
    "Parish",
    "District",
    "Islands",
    "Island",
    "city",
];

/// Split a census county name into its short name and designation.
///
/// Returns `(name, "")` when no designation follows a space, or when stripping it
/// would leave nothing.
pub fn split_designation(name: &str) -> (&str, &'static str) {
    for &designation in DESIGNATIONS {
        let prefix = name
            .strip_suffix(designation)
            .and_then(|rest| rest.strip_suffix(' '));
        if let Some(prefix) = prefix {
            if !prefix.is_empty() {
                return (prefix, designation);
            }
        }
    }
    (name, "")
}

/// A county or county-equivalent, owned by exactly one state.
///
/// ```compile_fail
/// use std::sync::Arc;
/// use ansi_codes::{County, State};
///
/// fn build(state: Arc<State>) -> County {
///     County {
///         state,
///         county_ansi_code: "001".to_string(),
///         name: "Autauga County".to_string(),
///         short_name: "Autauga".to_string(),
///         designation: "County",
///     }
/// }
/// ```
#[derive(Debug)]
pub struct County {
    state: Arc<State>,
    county_ansi_code: String,
    name: String,
    short_name: String,
    designation: &'static str,
}

impl County {
    /// Owning state, the same entity `State::find` returns
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_ansi_code(&self) -> &str {
        self.state.ansi_code()
    }

    /// Three-digit, zero-padded code, unique within the state
    pub fn county_ansi_code(&self) -> &str {
        &self.county_ansi_code
    }

    /// Full census name, e.g. "Autauga County"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its designation, e.g. "Autauga"
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Designation token, e.g. "County"; empty when none matched
    pub fn designation(&self) -> &str {
        self.designation
    }

    /// Flat attribute set for serialization adapters
    pub fn attributes(&self) -> [(&'static str, &str); 5] {
        [
            ("stateAnsiCode", self.state.ansi_code()),
            ("countyAnsiCode", &self.county_ansi_code),
            ("name", &self.name),
            ("shortName", &self.short_name),
            ("designation", self.designation),
        ]
    }

    /// Look up a county within a state.
    ///
    /// The state may be a `&State` or anything `State::find` accepts. Integer
    /// county keys and exactly-three-digit strings select the code index; any
    /// other string selects the name index. Matching is case-insensitive.
    pub fn find<'a>(
        state: impl Into<StateRef<'a>>,
        county: impl Into<CountyKey>,
    ) -> Result<&'static County> {
        registry()?.find(state, county)
    }

    /// Like [`County::find`], additionally handing the match to `f`
    pub fn find_with<'a, F>(
        state: impl Into<StateRef<'a>>,
        county: impl Into<CountyKey>,
        f: F,
    ) -> Result<&'static County>
    where
        F: FnOnce(&'static County),
    {
        let county = Self::find(state, county)?;
        f(county);
        Ok(county)
    }

    /// Every county, grouped by state in state code order
    pub fn all() -> Result<Vec<&'static County>> {
        Ok(registry()?.all().collect())
    }

    /// Every county of one state
    pub fn all_in(state: &State) -> Result<Vec<&'static County>> {
        Ok(registry()?.all_in(state).collect())
    }
}

impl PartialEq for County {
    fn eq(&self, other: &Self) -> bool {
        self.state.ansi_code() == other.state.ansi_code()
            && self.county_ansi_code == other.county_ansi_code
    }
}

impl Eq for County {}

/// Counties of one state with their code and name indexes
#[derive(Debug, Default)]
struct CountyGroup {
    counties: Vec<County>,
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl CountyGroup {
    fn insert(&mut self, row: usize, county: County) -> std::result::Result<(), LoadError> {
        let i = self.counties.len();
        let code = county.county_ansi_code.to_lowercase();
        if self.by_code.insert(code, i).is_some() {
            return Err(LoadError::new(
                COUNTY_RESOURCE,
                row,
                format!(
                    "duplicate county code '{}' in {}",
                    county.county_ansi_code,
                    county.state.name()
                ),
            ));
        }
        if self.by_name.insert(county.name.to_lowercase(), i).is_some() {
            return Err(LoadError::new(
                COUNTY_RESOURCE,
                row,
                format!(
                    "duplicate county name '{}' in {}",
                    county.name,
                    county.state.name()
                ),
            ));
        }
        self.counties.push(county);
        Ok(())
    }
}

/// Frozen set of counties, indexed per state
#[derive(Debug)]
pub struct CountyRegistry {
    states: Arc<StateRegistry>,
    groups: HashMap<String, CountyGroup>,
    len: usize,
}

impl CountyRegistry {
    /// Build a registry from a comma-separated county list with a header row,
    /// resolving each row's state code against `states`
    pub fn from_reader<R: Read>(
        reader: R,
        states: Arc<StateRegistry>,
    ) -> std::result::Result<Self, LoadError> {
        let records: Vec<(usize, CountyRecord)> =
            source::read_records(COUNTY_RESOURCE, b',', reader)?;

        let mut groups: HashMap<String, CountyGroup> = HashMap::new();
        let len = records.len();
        for (row, record) in records {
            let county = county_from_record(&states, row, record)?;
            groups
                .entry(county.state.ansi_code().to_string())
                .or_default()
                .insert(row, county)?;
        }

        Ok(Self {
            states,
            groups,
            len,
        })
    }

    pub(crate) fn bundled(states: Arc<StateRegistry>) -> std::result::Result<Self, LoadError> {
        Self::from_reader(source::COUNTY_SOURCE.as_bytes(), states)
    }

    /// State registry the counties were resolved against
    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    pub fn find<'a>(
        &self,
        state: impl Into<StateRef<'a>>,
        county: impl Into<CountyKey>,
    ) -> Result<&County> {
        let state = self.resolve_state(state.into())?;
        let lookup = county.into().lookup();

        let found = self.groups.get(state.ansi_code()).and_then(|group| {
            let index = match lookup.index {
                CountyIndex::Code => &group.by_code,
                CountyIndex::Name => &group.by_name,
            };
            index.get(&lookup.key).map(|&i| &group.counties[i])
        });

        found.ok_or_else(|| Error::CountyNotFound {
            query: lookup.query,
            state: state.name().to_string(),
        })
    }

    /// Every county, grouped by state in state code order, source order within a state
    pub fn all(&self) -> impl Iterator<Item = &County> + '_ {
        self.states.all().flat_map(move |state| self.all_in(state))
    }

    /// Every county of `state`; empty if the state has none
    pub fn all_in(&self, state: &State) -> impl Iterator<Item = &County> + '_ {
        self.groups
            .get(state.ansi_code())
            .into_iter()
            .flat_map(|group| group.counties.iter())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn resolve_state(&self, state: StateRef<'_>) -> Result<&State> {
        match state {
            // A state from another registry still resolves by its code
            StateRef::State(state) => self
                .states
                .by_code(state.ansi_code())
                .map(Arc::as_ref)
                .ok_or_else(|| Error::StateNotFound {
                    query: state.ansi_code().to_string(),
                }),
            StateRef::Key(key) => self.states.find(key),
        }
    }
}

fn county_from_record(
    states: &StateRegistry,
    row: usize,
    record: CountyRecord,
) -> std::result::Result<County, LoadError> {
    let CountyRecord {
        state_abbreviation,
        state_ansi,
        county_ansi,
        county_name,
    } = record;

    let state = states.by_code(&state_ansi).ok_or_else(|| {
        LoadError::new(
            COUNTY_RESOURCE,
            row,
            format!("unknown state code '{}'", state_ansi),
        )
    })?;
    if state.abbreviation() != state_abbreviation {
        return Err(LoadError::new(
            COUNTY_RESOURCE,
            row,
            format!(
                "state '{}' does not match code {} ({})",
                state_abbreviation,
                state_ansi,
                state.abbreviation()
            ),
        ));
    }
    if !is_county_code(&county_ansi) {
        return Err(LoadError::new(
            COUNTY_RESOURCE,
            row,
            format!("county code '{}' is not three digits", county_ansi),
        ));
    }
    if county_name.is_empty() {
        return Err(LoadError::new(COUNTY_RESOURCE, row, "empty county name"));
    }

    let (short_name, designation) = split_designation(&county_name);
    let short_name = short_name.to_string();

    Ok(County {
        state: Arc::clone(state),
        county_ansi_code: county_ansi,
        name: county_name,
        short_name,
        designation,
    })
}

static REGISTRY: LazyLock<std::result::Result<CountyRegistry, LoadError>> = LazyLock::new(|| {
    let loaded = state::shared_registry()
        .and_then(|states| CountyRegistry::bundled(Arc::clone(states)));
    match loaded {
        Ok(registry) => {
            let plain = registry.all().filter(|c| c.designation.is_empty()).count();
            info!("Loaded {} counties from {}", registry.len(), COUNTY_RESOURCE);
            debug!("{} counties carry no designation", plain);
            Ok(registry)
        }
        Err(e) => {
            error!("County registry failed to load: {}", e);
            Err(e)
        }
    }
});

/// Process-wide county registry, loaded on first call after the state registry
pub fn registry() -> Result<&'static CountyRegistry> {
    REGISTRY.as_ref().map_err(|e| Error::Load(e.clone()))
}

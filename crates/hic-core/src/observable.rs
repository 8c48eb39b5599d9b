//! Observable bin identifiers such as `obs:R_AA-sys:PbPb5020-pT:10.8`.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HicError};
use crate::system::{parse_system, CollisionSystem};

const OBS_PREFIX: &str = "obs:";
const SYS_SEPARATOR: &str = "-sys:";
const PT_SEPARATOR: &str = "-pT:";

/// One experimental bin: an observable name, the system it was measured in
/// and the transverse momentum bin centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObservableId {
    /// Observable name, e.g. `R_AA`.
    pub name: String,
    /// Collision system the bin belongs to.
    pub system: CollisionSystem,
    /// Bin centre in GeV.
    pub pt: f64,
}

impl ObservableId {
    /// Parses an `obs:<name>-sys:<system>-pT:<value>` identifier.
    pub fn parse(id: &str) -> Result<Self, HicError> {
        let rest = id
            .strip_prefix(OBS_PREFIX)
            .ok_or_else(|| format_error(id, "missing `obs:` prefix"))?;
        let (name, rest) = rest
            .split_once(SYS_SEPARATOR)
            .ok_or_else(|| format_error(id, "missing `-sys:` field"))?;
        if name.is_empty() {
            return Err(format_error(id, "empty observable name"));
        }
        let (system, pt) = rest
            .split_once(PT_SEPARATOR)
            .ok_or_else(|| format_error(id, "missing `-pT:` field"))?;
        let system = parse_system(system).map_err(|err| {
            HicError::Observable(
                ErrorInfo::new("hic_core.observable_system", "invalid system in observable")
                    .with_context("observable", id)
                    .with_hint(err.to_string()),
            )
        })?;
        let pt = pt
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| format_error(id, "pT bin is not a finite number"))?;
        Ok(Self {
            name: name.to_string(),
            system,
            pt,
        })
    }
}

impl Display for ObservableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{OBS_PREFIX}{}{SYS_SEPARATOR}{}{PT_SEPARATOR}{:?}",
            self.name, self.system, self.pt
        )
    }
}

impl FromStr for ObservableId {
    type Err = HicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObservableId {
    type Error = HicError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObservableId> for String {
    fn from(id: ObservableId) -> Self {
        id.to_string()
    }
}

fn format_error(id: &str, message: &str) -> HicError {
    HicError::Observable(
        ErrorInfo::new("hic_core.observable_format", message)
            .with_context("observable", id)
            .with_hint("expected obs:<name>-sys:<system>-pT:<value>"),
    )
}

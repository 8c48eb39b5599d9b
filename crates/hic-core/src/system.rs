//! Collision system identifiers of the form `<projectile><projectile><energy>`.
//!
//! A projectile token is an optional uppercase ASCII letter followed by a
//! lowercase ASCII letter, so `Pb`, `Au` and `p` are accepted while `PB` or a
//! bare `P` are not. The energy is the beam energy in GeV written as a run of
//! ASCII digits. Examples: `PbPb5020`, `AuAu200`, `pPb5020`.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HicError, SYSTEM_MATCH_CODE};

/// Parsed collision system: a projectile pair and a beam energy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollisionSystem {
    projectiles: (String, String),
    energy_gev: u64,
}

impl CollisionSystem {
    /// Returns the projectile pair in identifier order.
    pub fn projectiles(&self) -> (&str, &str) {
        (&self.projectiles.0, &self.projectiles.1)
    }

    /// Returns the beam energy in GeV.
    pub fn energy_gev(&self) -> u64 {
        self.energy_gev
    }

    /// Returns `true` when both projectiles are the same species.
    pub fn is_symmetric(&self) -> bool {
        self.projectiles.0 == self.projectiles.1
    }

    /// Splits the system into `((projectile_1, projectile_2), energy_gev)`.
    pub fn into_parts(self) -> ((String, String), u64) {
        (self.projectiles, self.energy_gev)
    }
}

impl Display for CollisionSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.projectiles.0, self.projectiles.1, self.energy_gev
        )
    }
}

impl FromStr for CollisionSystem {
    type Err = HicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_system(s)
    }
}

impl TryFrom<String> for CollisionSystem {
    type Error = HicError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_system(&value)
    }
}

impl From<CollisionSystem> for String {
    fn from(system: CollisionSystem) -> Self {
        system.to_string()
    }
}

/// Parses a system identifier into its projectile pair and beam energy.
///
/// The whole input must consist of exactly two projectile tokens followed by
/// one or more digits. Anything else is reported as a
/// [`SYSTEM_MATCH_CODE`] failure; no partial result is returned.
pub fn parse_system(system: &str) -> Result<CollisionSystem, HicError> {
    let mut cursor = 0;
    let first = take_projectile(system, &mut cursor).ok_or_else(|| match_failure(system))?;
    let second = take_projectile(system, &mut cursor).ok_or_else(|| match_failure(system))?;
    let digits = &system[cursor..];
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(match_failure(system));
    }
    let energy_gev = digits.parse::<u64>().map_err(|err| {
        HicError::System(
            ErrorInfo::new("hic_core.system_energy", "beam energy does not fit in u64")
                .with_context("system", system)
                .with_hint(err.to_string()),
        )
    })?;
    Ok(CollisionSystem {
        projectiles: (first.to_string(), second.to_string()),
        energy_gev,
    })
}

fn take_projectile<'a>(input: &'a str, cursor: &mut usize) -> Option<&'a str> {
    let bytes = input.as_bytes();
    let start = *cursor;
    let mut pos = start;
    if bytes.get(pos).is_some_and(u8::is_ascii_uppercase) {
        pos += 1;
    }
    if !bytes.get(pos).is_some_and(u8::is_ascii_lowercase) {
        return None;
    }
    pos += 1;
    *cursor = pos;
    Some(&input[start..pos])
}

fn match_failure(system: &str) -> HicError {
    HicError::System(
        ErrorInfo::new(
            SYSTEM_MATCH_CODE,
            "system identifier does not match <projectile><projectile><energy>",
        )
        .with_context("system", system)
        .with_hint("expected identifiers such as PbPb5020, AuAu200 or pPb5020"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_without_lowercase_is_not_a_token() {
        let mut cursor = 0;
        assert_eq!(take_projectile("PPb", &mut cursor), None);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn single_lowercase_letter_is_a_token() {
        let mut cursor = 0;
        assert_eq!(take_projectile("pPb", &mut cursor), Some("p"));
        assert_eq!(take_projectile("pPb", &mut cursor), Some("Pb"));
        assert_eq!(cursor, 3);
    }
}

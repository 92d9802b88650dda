use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the seven fixed weekday names a provider may operate on.
///
/// Ordering follows the calendar week starting on Monday, which is also the
/// order `OperatingDays` keeps its entries in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weekday: {0}")]
pub struct ParseWeekdayError(pub String);

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseWeekdayError(s.to_string()))
    }
}

/// Set of weekdays a provider is open. Duplicates are impossible by
/// construction; serialized as a JSON array in Monday..Sunday order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatingDays(BTreeSet<Weekday>);

impl OperatingDays {
    pub fn new() -> Self { Self::default() }

    pub fn contains(&self, day: Weekday) -> bool { self.0.contains(&day) }

    /// Add or remove exactly `day`, leaving every other entry untouched.
    pub fn set(&mut self, day: Weekday, checked: bool) {
        if checked {
            self.0.insert(day);
        } else {
            self.0.remove(&day);
        }
    }

    /// Flip membership of `day`.
    pub fn toggle(&mut self, day: Weekday) {
        let present = self.contains(day);
        self.set(day, !present);
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ { self.0.iter().copied() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Parse a list of names, reporting the first one that is not a weekday.
    pub fn parse_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ParseWeekdayError> {
        names.iter().map(|n| n.as_ref().parse::<Weekday>()).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|d| d.as_str()).collect()
    }
}

impl FromIterator<Weekday> for OperatingDays {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

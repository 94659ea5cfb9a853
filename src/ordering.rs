use core::cmp::Reverse;
use core::fmt;
use core::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::RepngError;
use crate::histogram::FrequencyEntry;

/// Order in which color clusters are written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterOrder {
    /// Most common pixels first; ties in first-seen order.
    #[default]
    Freq,
    /// Exact reverse of `Freq`: least common first, ties in last-seen order.
    RFreq,
    /// `Freq`, then a uniform random permutation of the clusters.
    Shuf,
    /// Largest r+g+b first.
    Light,
    /// Smallest r+g+b first.
    Dark,
}

impl ClusterOrder {
    pub const ALL: [ClusterOrder; 5] = [Self::Freq, Self::RFreq, Self::Shuf, Self::Light, Self::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Freq => "freq",
            Self::RFreq => "rfreq",
            Self::Shuf => "shuf",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Whether the result depends on the random generator.
    pub fn is_random(self) -> bool {
        matches!(self, Self::Shuf)
    }
}

impl fmt::Display for ClusterOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusterOrder {
    type Err = RepngError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| RepngError::InvalidParameter(format!("unknown ordering `{s}`")))
    }
}

/// Stable sort by count, descending. Equal counts keep their input order.
pub fn frequency_sort(entries: &mut [FrequencyEntry]) {
    entries.sort_by_key(|e| Reverse(e.count));
}

/// Reorder clusters according to `policy`.
///
/// The result is always a permutation of `entries`. Every policy starts from
/// the frequency-descending sequence; `rng` is only consulted for
/// [`ClusterOrder::Shuf`].
pub fn order<R>(mut entries: Vec<FrequencyEntry>, policy: ClusterOrder, rng: &mut R) -> Vec<FrequencyEntry>
where
    R: Rng + ?Sized,
{
    frequency_sort(&mut entries);

    match policy {
        ClusterOrder::Freq => {}
        ClusterOrder::RFreq => entries.reverse(),
        ClusterOrder::Shuf => entries.shuffle(rng),
        ClusterOrder::Light => entries.sort_by_key(|e| Reverse(e.brightness())),
        ClusterOrder::Dark => entries.sort_by_key(FrequencyEntry::brightness),
    }

    entries
}

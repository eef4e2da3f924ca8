//! Line-name strategies.
//!
//! - [`NoNaming`]: never names a line.
//! - [`district::DistrictNaming`]: `#<number> ...` names from the districts a line crosses.
//! - [`london::LondonNaming`]: numbered bus routes, named metro lines and coded train
//!   services, avoiding names that are already taken.

use rand::RngCore;

use crate::config::NamingStrategyKind;
use crate::models::LineView;
use crate::walker::NetworkView;

pub mod district;
pub mod generic;
pub mod london;

pub use district::DistrictNaming;
pub use generic::GenericNames;
pub use london::LondonNaming;

/// Everything a strategy may look at besides the stop graph.
#[derive(Clone, Copy, Debug)]
pub struct NameRequest<'a> {
    pub line: &'a LineView,
    /// Names of custom-named lines, captured once per pass.
    pub existing_names: &'a [String],
    pub city_name: &'a str,
}

/// Produces the display name for a line, or `None` to leave the name alone.
pub trait NamingStrategy: Send + Sync {
    fn kind(&self) -> NamingStrategyKind;

    fn name(
        &self,
        request: &NameRequest<'_>,
        network: &dyn NetworkView,
        rng: &mut dyn RngCore,
    ) -> Option<String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoNaming;

impl NamingStrategy for NoNaming {
    fn kind(&self) -> NamingStrategyKind {
        NamingStrategyKind::None
    }

    fn name(
        &self,
        _request: &NameRequest<'_>,
        _network: &dyn NetworkView,
        _rng: &mut dyn RngCore,
    ) -> Option<String> {
        None
    }
}

/// Build the strategy for a configured kind.
pub fn strategy_for(kind: NamingStrategyKind, generic: GenericNames) -> Box<dyn NamingStrategy> {
    match kind {
        NamingStrategyKind::None => Box::new(NoNaming),
        NamingStrategyKind::Districts => Box::new(DistrictNaming),
        NamingStrategyKind::London => Box::new(LondonNaming::new(generic)),
    }
}

/// Text up to the first space.
pub(crate) fn first_word(words: &str) -> &str {
    words.split_once(' ').map(|(w, _)| w).unwrap_or(words)
}

/// First character as a string, empty for an empty input.
pub(crate) fn initial(word: &str) -> String {
    word.chars().next().map(String::from).unwrap_or_default()
}

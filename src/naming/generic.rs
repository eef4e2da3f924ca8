use rand::{Rng, RngCore};
use std::path::Path;

use crate::palette::{read_source, tokens};

pub const GENERIC_NAMES_FILE: &str = "genericnames.txt";

pub const DEFAULT_GENERIC_NAMES: &str = "Alpha,Bravo,Charlie,Delta,Echo,Foxtrot,Golf,Hotel,India,Juliet,Kilo,Lima,Mike,\
November,Oscar,Papa,Quebec,Romeo,Sierra,Tango,Uniform,Victor,Whiskey,Yankee,Zulu,\
Adams,Boston,Chicago,Denver,Easy,Frank,George,Henry,Ida,John,King,Lincoln,Mary,\
New,Ocean,Peter,Queen,Roger,Sugar,Thomas,Union,Victor,William,Young,Zero";

/// Filler words for metro lines whose district-based name is taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericNames {
    words: Vec<String>,
}

impl GenericNames {
    /// Split on newlines, commas and semicolons; blanks are dropped.
    pub fn parse(text: &str) -> Self {
        Self {
            words: tokens(text).map(str::to_string).collect(),
        }
    }

    pub fn defaults() -> Self {
        Self::parse(DEFAULT_GENERIC_NAMES)
    }

    /// Word list from `dir`, seeding the file when missing and `persist_default` is set.
    pub fn load(dir: &Path, persist_default: bool) -> Self {
        Self::parse(&read_source(
            &dir.join(GENERIC_NAMES_FILE),
            DEFAULT_GENERIC_NAMES,
            persist_default,
        ))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// `count` random words (at least one) joined by spaces, `None` for an empty list.
    pub fn pick(&self, count: usize, rng: &mut dyn RngCore) -> Option<String> {
        if self.words.is_empty() {
            return None;
        }
        let picked: Vec<&str> = (0..count.max(1))
            .map(|_| self.words[rng.random_range(0..self.words.len())].as_str())
            .collect();
        Some(picked.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn defaults_have_fifty_words() {
        let names = GenericNames::defaults();
        assert_eq!(names.words().len(), 50);
        assert_eq!(names.words()[0], "Alpha");
        assert_eq!(names.words()[49], "Zero");
    }

    #[test]
    fn pick_joins_words() {
        let names = GenericNames::parse("Kilo\n Lima ;");
        let mut rng = StdRng::seed_from_u64(3);
        let two = names.pick(2, &mut rng).unwrap();
        assert_eq!(two.split(' ').count(), 2);
        assert!(two.split(' ').all(|w| w == "Kilo" || w == "Lima"));
        assert_eq!(names.pick(0, &mut rng).unwrap().split(' ').count(), 1);
        assert_eq!(GenericNames::parse("").pick(1, &mut rng), None);
    }
}

//! London-style names.
//!
//! Given districts "Hamilton Park", "Ivy Square" and "King District" in a city
//! called "Springwood":
//!
//! - buses: `HP1 Local`, `22 Hamilton Park`, `345 Ivy to King Express`,
//!   `9 Hamilton, Ivy and King`, `6 Springwood Express`
//! - metro: `Hamilton Park Line`, `Ivy & King Line`, `Hamilton, Ivy & King Line`,
//!   `Foxtrot Line` when the district name is taken
//! - trains: `<districts><initial or X><NN> <name>`, e.g. `2K07 Ivy King Express`

use ahash::AHashSet;
use rand::{Rng, RngCore};

use super::{GenericNames, NameRequest, NamingStrategy, first_word, initial};
use crate::config::NamingStrategyKind;
use crate::models::{LineAnalysis, TransportCategory};
use crate::walker::{self, ANALYZE_STOP_LIMIT, NetworkView};

/// Descriptive train names; `{0}` is replaced by the subject.
pub const TRAIN_TEMPLATES: [&str; 11] = [
    "{0}",
    "{0} Service",
    "{0} Rail",
    "{0} Railway",
    "{0} Flyer",
    "{0} Zephyr",
    "{0} Rocket",
    "{0} Arrow",
    "{0} Special",
    "Spirit of {0}",
    "Pride of {0}",
];

#[derive(Clone, Debug)]
pub struct LondonNaming {
    generic: GenericNames,
}

impl LondonNaming {
    pub fn new(generic: GenericNames) -> Self {
        Self { generic }
    }
}

impl NamingStrategy for LondonNaming {
    fn kind(&self) -> NamingStrategyKind {
        NamingStrategyKind::London
    }

    fn name(
        &self,
        request: &NameRequest<'_>,
        network: &dyn NetworkView,
        rng: &mut dyn RngCore,
    ) -> Option<String> {
        let analysis = walker::analyze(network, request.line.stops_head, ANALYZE_STOP_LIMIT);
        let existing = request.existing_names;
        let name = match request.line.category {
            TransportCategory::Bus => bus_name(&analysis, existing, request.city_name, rng),
            TransportCategory::Metro => metro_name(&analysis, existing, &self.generic, rng),
            _ => train_name(&analysis, existing, request.city_name, rng),
        };
        Some(name)
    }
}

/// Leading tokens of the existing names: the route numbers already handed out.
fn taken_numbers(existing: &[String]) -> AHashSet<&str> {
    existing.iter().map(|n| first_word(n)).collect()
}

/// First letter of each space-separated word: "Hamilton Park" -> "HP".
pub fn initials(words: &str) -> String {
    let mut out = initial(words);
    let mut after_space = false;
    for (i, c) in words.char_indices() {
        if i > 0 && after_space && c != ' ' {
            out.push(c);
        }
        after_space = c == ' ';
    }
    out
}

/// Splice two words where a letter of the first reappears in the middle of the second.
///
/// "Baker" + "Waterloo" -> "Bakerloo". `None` when no splice point exists.
pub fn bakerlooify(word1: &str, word2: &str) -> Option<String> {
    let w1: Vec<char> = word1.chars().collect();
    let w2: Vec<char> = word2.chars().collect();
    if w1.is_empty() || w2.is_empty() {
        return None;
    }
    let offset1 = (w1.len() - 1).min((w1.len() / 2).max(4));
    let offset2 = w2.len() / 4;
    let end2 = (offset2 + (w2.len() / 2).max(3)).min(w2.len());
    let window = &w2[offset2..end2];

    (offset1..w1.len()).find_map(|i| {
        window.iter().position(|c| *c == w1[i]).map(|p| {
            w1[..i].iter().chain(&w2[offset2 + p..]).collect::<String>()
        })
    })
}

/// Bus route: district-initial or bucketed random number, plus a descriptive name.
pub fn bus_name(
    analysis: &LineAnalysis,
    existing: &[String],
    city_name: &str,
    rng: &mut dyn RngCore,
) -> String {
    let taken = taken_numbers(existing);
    let districts = &analysis.districts;

    let route = if !analysis.non_district && districts.len() == 1 {
        let prefix = initials(&districts[0]);
        let mut number = 1u32;
        while taken.contains(format!("{prefix}{number}").as_str()) {
            number += 1;
        }
        format!("{prefix}{number}")
    } else {
        let (mut number, step) = if analysis.stop_count < 15 {
            (rng.random_range(100..900u32), rng.random_range(7..20u32))
        } else if analysis.stop_count < 30 {
            (rng.random_range(20..100u32), rng.random_range(2..10u32))
        } else {
            (rng.random_range(1..20u32), rng.random_range(1..4u32))
        };
        while taken.contains(number.to_string().as_str()) {
            number += step;
        }
        number.to_string()
    };

    let name = match districts.as_slice() {
        [only] if analysis.non_district => only.clone(),
        [_] => "Local".to_string(),
        [a, b] => format!("{} to {}", first_word(a), first_word(b)),
        [a, b, c] => format!("{}, {} and {}", first_word(a), first_word(b), first_word(c)),
        _ => city_name.to_string(),
    };

    let mut line_name = route;
    if !name.is_empty() {
        line_name.push(' ');
        line_name.push_str(&name);
    }
    if analysis.stop_count <= 4 {
        line_name.push_str(" Express");
    }
    line_name
}

/// Metro line: district-derived name, replaced by generic filler while taken.
pub fn metro_name(
    analysis: &LineAnalysis,
    existing: &[String],
    generic: &GenericNames,
    rng: &mut dyn RngCore,
) -> String {
    let firsts: Vec<&str> = analysis.districts.iter().map(|d| first_word(d)).collect();
    let derived = match (analysis.districts.as_slice(), firsts.as_slice()) {
        ([only], _) => Some(only.clone()),
        (_, [a, b]) if a == b => Some(a.to_string()),
        (_, [a, b]) => bakerlooify(a, b)
            .or_else(|| bakerlooify(b, a))
            .or_else(|| Some(format!("{a} & {b}"))),
        (_, [init @ .., last]) if firsts.len() >= 3 => {
            let total: usize = firsts.iter().map(|f| f.chars().count()).sum();
            (total < 20).then(|| format!("{} & {}", init.join(", "), last))
        }
        _ => None,
    };

    let taken: AHashSet<&str> = existing.iter().map(String::as_str).collect();
    let mut line_name = derived.map(|n| format!("{n} Line"));
    let mut collisions = 0usize;
    loop {
        if let Some(name) = &line_name
            && !taken.contains(name.as_str())
        {
            return name.clone();
        }
        let filler = generic
            .pick(1 + collisions / 2, rng)
            .unwrap_or_else(|| format!("Metro {}", collisions + 1));
        line_name = Some(format!("{filler} Line"));
        collisions += 1;
    }
}

/// Train service: `<district count><initial or X><NN> <name>`.
pub fn train_name(
    analysis: &LineAnalysis,
    existing: &[String],
    city_name: &str,
    rng: &mut dyn RngCore,
) -> String {
    let taken = taken_numbers(existing);
    let districts = &analysis.districts;
    let firsts: Vec<&str> = districts.iter().map(|d| first_word(d)).collect();

    let last = districts
        .last()
        .map(String::as_str)
        .filter(|d| !d.is_empty())
        .unwrap_or("Z");
    let marker = if analysis.non_district {
        "X".to_string()
    } else {
        initial(last)
    };
    let ident = format!("{}{}", districts.len(), marker);

    let mut template = |subject: &str| -> String {
        TRAIN_TEMPLATES[rng.random_range(0..TRAIN_TEMPLATES.len())].replace("{0}", subject)
    };

    let name = match firsts.as_slice() {
        [] => template(city_name),
        [_] => template(&districts[0]),
        [a, b] if a == b => a.to_string(),
        [a, b] if analysis.stop_count == 2 => format!("{a} {b} Shuttle"),
        [a, b] if !analysis.non_district => format!("{a} {b} Express"),
        [a, b] => format!("{a} via {b}"),
        [init @ .., via, last] => {
            let total: usize = firsts.iter().map(|f| f.chars().count()).sum();
            if total < 15 {
                format!("{} and {} via {}", init.join(", "), last, via)
            } else {
                template(&districts[0])
            }
        }
    };

    let mut number = rng.random_range(1..90u32);
    let mut code = format!("{ident}{number:02}");
    while taken.contains(code.as_str()) {
        number += 1;
        code = format!("{ident}{number:02}");
    }
    format!("{code} {name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn analysis(districts: &[&str], stop_count: usize, non_district: bool) -> LineAnalysis {
        LineAnalysis {
            districts: districts.iter().map(|d| d.to_string()).collect(),
            stop_count,
            non_district,
        }
    }

    #[test]
    fn initials_of_multi_word_names() {
        assert_eq!(initials("Hamilton Park"), "HP");
        assert_eq!(initials("Ivy"), "I");
        assert_eq!(initials("Upper  West Side"), "UWS");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn bakerloo() {
        assert_eq!(bakerlooify("Baker", "Waterloo").as_deref(), Some("Bakerloo"));
        assert_eq!(bakerlooify("Manor", "Ivy"), None);
        assert_eq!(bakerlooify("Ivy", "Manor"), None);
        assert_eq!(bakerlooify("", "Manor"), None);
        // short second word does not overrun
        assert_eq!(bakerlooify("Ab", "Xb").as_deref(), Some("Ab"));
    }

    #[test]
    fn bus_with_single_district_uses_initials() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = analysis(&["Hamilton Park"], 8, false);
        let existing = vec!["HP1 Local".to_string(), "HP2 Local".to_string()];
        assert_eq!(bus_name(&a, &existing, "Springwood", &mut rng), "HP3 Local");
        let a = analysis(&["Hamilton Park"], 3, false);
        assert_eq!(bus_name(&a, &[], "Springwood", &mut rng), "HP1 Local Express");
    }

    #[test]
    fn bus_descriptions() {
        let mut rng = StdRng::seed_from_u64(9);
        let name = bus_name(&analysis(&["Ivy Square", "King District"], 3, false), &[], "S", &mut rng);
        assert!(name.ends_with(" Ivy to King Express"), "{name}");
        let name = bus_name(&analysis(&["Hamilton Park"], 20, true), &[], "S", &mut rng);
        assert!(name.ends_with(" Hamilton Park"), "{name}");
        let number: u32 = first_word(&name).parse().unwrap();
        assert!((20..100).contains(&number), "{name}");
        let name = bus_name(&analysis(&[], 40, true), &[], "Springwood", &mut rng);
        assert!(name.ends_with(" Springwood"), "{name}");
    }

    #[test]
    fn metro_names() {
        let generic = GenericNames::defaults();
        let mut rng = StdRng::seed_from_u64(1);
        let m = |d: &[&str], existing: &[String], rng: &mut StdRng| {
            metro_name(&analysis(d, 6, false), existing, &generic, rng)
        };
        assert_eq!(m(&["Manor Park"], &[], &mut rng), "Manor Park Line");
        assert_eq!(m(&["Baker Street", "Waterloo"], &[], &mut rng), "Bakerloo Line");
        assert_eq!(m(&["Manor Park", "Ivy Square"], &[], &mut rng), "Manor & Ivy Line");
        assert_eq!(m(&["Ivy Square", "Ivy Hill"], &[], &mut rng), "Ivy Line");
        assert_eq!(
            m(&["Hickory", "Manor", "Ivy"], &[], &mut rng),
            "Hickory, Manor & Ivy Line"
        );
        let filler = m(&["Hickory District", "Manorville", "Ivybridge"], &[], &mut rng);
        assert!(generic.words().iter().any(|w| filler == format!("{w} Line")), "{filler}");
        let taken = vec!["Manor Park Line".to_string()];
        let renamed = m(&["Manor Park"], &taken, &mut rng);
        assert_ne!(renamed, "Manor Park Line");
        assert!(renamed.ends_with(" Line"));
    }

    #[test]
    fn metro_without_words_still_terminates() {
        let mut rng = StdRng::seed_from_u64(1);
        let taken = vec!["Metro 1 Line".to_string()];
        let name = metro_name(&analysis(&[], 3, true), &taken, &GenericNames::parse(""), &mut rng);
        assert_eq!(name, "Metro 2 Line");
    }

    #[test]
    fn train_codes() {
        let mut rng = StdRng::seed_from_u64(2);
        let name = train_name(&analysis(&["Ivy Square", "King District"], 6, false), &[], "S", &mut rng);
        assert!(name.starts_with("2K"), "{name}");
        assert!(name.ends_with(" Ivy King Express"), "{name}");
        let name = train_name(&analysis(&["Ivy Square", "King District"], 2, true), &[], "S", &mut rng);
        assert!(name.starts_with("2X") && name.ends_with(" Ivy King Shuttle"), "{name}");
        let name = train_name(&analysis(&["Ivy Square", "King District"], 5, true), &[], "S", &mut rng);
        assert!(name.ends_with(" Ivy via King"), "{name}");
        let name = train_name(&analysis(&["Ash", "Bay", "Cove", "Dale"], 9, false), &[], "S", &mut rng);
        assert!(name.starts_with("4D") && name.ends_with(" Ash, Bay and Dale via Cove"), "{name}");
        let name = train_name(&analysis(&[], 9, true), &[], "Springwood", &mut rng);
        assert!(name.starts_with("0X") && name.contains("Springwood"), "{name}");
    }
}

use rand::{Rng, RngCore};

use super::{NameRequest, NamingStrategy, initial};
use crate::config::NamingStrategyKind;
use crate::models::{NamingContext, TransportCategory};
use crate::walker::{self, NetworkView};

/// Names built from the full circuit of a line: `#12 Hamilton Park Local`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistrictNaming;

impl NamingStrategy for DistrictNaming {
    fn kind(&self) -> NamingStrategyKind {
        NamingStrategyKind::Districts
    }

    fn name(
        &self,
        request: &NameRequest<'_>,
        network: &dyn NetworkView,
        rng: &mut dyn RngCore,
    ) -> Option<String> {
        let ctx = walker::walk(network, request.line.stops_head);
        let roll: f64 = rng.random();
        Some(compose(request.line.number, request.line.category, &ctx, roll))
    }
}

/// Compose a name; `roll` in \[0, 1) picks among the train variants.
///
/// Total: every input yields a name, `#<number> Line` when nothing better fits.
pub fn compose(number: u16, category: TransportCategory, ctx: &NamingContext, roll: f64) -> String {
    let d = &ctx.districts;
    match category {
        TransportCategory::Train => match d.as_slice() {
            [only] if only.is_empty() => format!("#{number} Shuttle"),
            [only] => {
                let kind = if roll <= 0.33 {
                    "Limited"
                } else if roll <= 0.66 {
                    "Service"
                } else {
                    "Shuttle"
                };
                format!("#{number} {only} {kind}")
            }
            [a, b] if a.is_empty() && b.is_empty() => format!("#{number} Shuttle"),
            [a, b] if a.is_empty() || b.is_empty() => {
                let named = if a.is_empty() { b } else { a };
                format!("#{number} {named} Shuttle")
            }
            [a, b] => {
                if roll <= 0.33 {
                    format!("#{number} {}&{}", initial(a), initial(b))
                } else if roll <= 0.5 {
                    format!("#{number} {} Zephr", initial(a))
                } else if roll <= 0.7 {
                    format!("#{number} {} Flyer", initial(a))
                } else {
                    format!("#{number} {a} & {b}")
                }
            }
            _ => format!("#{number} Unlimited"),
        },
        TransportCategory::Bus | TransportCategory::Metro => match d.as_slice() {
            [only] if !only.is_empty() => format!("#{number} {only} Local"),
            [a, b] if !(a.is_empty() && b.is_empty()) => {
                let joined = [a.as_str(), b.as_str()]
                    .into_iter()
                    .filter(|n| !n.is_empty())
                    .collect::<Vec<_>>()
                    .join(" / ");
                let kind = if ctx.stop_count <= 4 { "Express" } else { "Line" };
                format!("#{number} {joined} {kind}")
            }
            _ => fallback(number),
        },
        _ => fallback(number),
    }
}

fn fallback(number: u16) -> String {
    format!("#{number} Line")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(districts: &[&str], stop_count: usize) -> NamingContext {
        NamingContext {
            districts: districts.iter().map(|d| d.to_string()).collect(),
            stop_count,
        }
    }

    #[test]
    fn train_two_district_variants() {
        let c = ctx(&["Riverside", "Oakwood"], 6);
        assert_eq!(compose(3, TransportCategory::Train, &c, 0.2), "#3 R&O");
        assert_eq!(compose(3, TransportCategory::Train, &c, 0.4), "#3 R Zephr");
        assert_eq!(compose(3, TransportCategory::Train, &c, 0.6), "#3 R Flyer");
        assert_eq!(compose(3, TransportCategory::Train, &c, 0.9), "#3 Riverside & Oakwood");
    }

    #[test]
    fn train_with_outside_stops_is_a_shuttle() {
        assert_eq!(compose(4, TransportCategory::Train, &ctx(&[""], 2), 0.1), "#4 Shuttle");
        assert_eq!(
            compose(4, TransportCategory::Train, &ctx(&["", "Docks"], 2), 0.1),
            "#4 Docks Shuttle"
        );
        assert_eq!(compose(4, TransportCategory::Train, &ctx(&[], 0), 0.1), "#4 Unlimited");
        assert_eq!(
            compose(4, TransportCategory::Train, &ctx(&["A", "B", "C"], 9), 0.1),
            "#4 Unlimited"
        );
    }

    #[test]
    fn bus_and_metro_pairs() {
        let c = ctx(&["Ivy Square", "King District"], 4);
        assert_eq!(compose(7, TransportCategory::Bus, &c, 0.0), "#7 Ivy Square / King District Express");
        let c = ctx(&["Ivy Square", "King District"], 5);
        assert_eq!(compose(7, TransportCategory::Metro, &c, 0.0), "#7 Ivy Square / King District Line");
        let c = ctx(&["", "King District"], 8);
        assert_eq!(compose(7, TransportCategory::Bus, &c, 0.0), "#7 King District Line");
        assert_eq!(compose(7, TransportCategory::Bus, &ctx(&[""], 8), 0.0), "#7 Line");
    }

    #[test]
    fn other_categories_fall_back() {
        assert_eq!(compose(9, TransportCategory::Ship, &ctx(&["Harbour"], 2), 0.5), "#9 Line");
        assert_eq!(compose(9, TransportCategory::Bus, &ctx(&["A", "B", "C"], 9), 0.5), "#9 Line");
    }
}

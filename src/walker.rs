//! Traversal of a line's circular stop list.

use ahash::AHashSet;

use crate::models::{DistrictId, LineAnalysis, NamingContext, Position, StopId, StopNode};

/// Stops sampled by [`analyze`] before it gives up on reaching the head again.
pub const ANALYZE_STOP_LIMIT: usize = 25;

/// Read access to the host's stop graph and district map.
pub trait NetworkView {
    /// Position and links of a stop, `None` when the id is unknown.
    fn stop(&self, id: StopId) -> Option<StopNode>;

    /// District containing `position`, `0` when outside every district.
    fn district_at(&self, position: Position) -> DistrictId;

    /// Display name of a district.
    fn district_name(&self, id: DistrictId) -> String;

    /// Trimmed district name at `position`; the empty string outside any district.
    fn district_label(&self, position: Position) -> String {
        match self.district_at(position) {
            0 => String::new(),
            id => self.district_name(id).trim().to_string(),
        }
    }
}

/// Walk the full circuit of a line.
///
/// Starts at the stop before `head` (or at `head` when that link is zero or
/// unknown) and follows `next` links until the walk is
/// back at its first stop. A zero or unknown link ends the walk early, as does
/// revisiting a stop that is not the first one.
pub fn walk(network: &dyn NetworkView, head: StopId) -> NamingContext {
    let mut ctx = NamingContext::default();
    let Some(head_node) = (head != 0).then(|| network.stop(head)).flatten() else {
        return ctx;
    };
    let first = match head_node.prev {
        0 => head,
        prev if network.stop(prev).is_none() => head,
        prev => prev,
    };

    let mut seen = AHashSet::new();
    let mut stop = first;
    while let Some(node) = network.stop(stop) {
        seen.insert(stop);
        ctx.visit(network.district_label(node.position));
        if node.next == 0 || node.next == first || !seen.insert(node.next) {
            break;
        }
        stop = node.next;
    }
    ctx
}

/// Sample at most `limit` stops starting at `head` itself.
///
/// Stops outside any district set `non_district` instead of contributing a name.
pub fn analyze(network: &dyn NetworkView, head: StopId, limit: usize) -> LineAnalysis {
    let mut analysis = LineAnalysis::default();
    if head == 0 {
        return analysis;
    }

    let mut stop = head;
    while analysis.stop_count < limit {
        let Some(node) = network.stop(stop) else {
            break;
        };
        match network.district_at(node.position) {
            0 => analysis.non_district = true,
            id => {
                let name = network.district_name(id).trim().to_string();
                if !analysis.districts.contains(&name) {
                    analysis.districts.push(name);
                }
            }
        }
        analysis.stop_count += 1;
        if node.next == 0 || node.next == head {
            break;
        }
        stop = node.next;
    }
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;

    /// Ring of stops at x = 0, 1, 2, ... with districts by x.
    struct Ring {
        stops: AHashMap<StopId, StopNode>,
        districts: Vec<(DistrictId, &'static str)>,
    }

    impl Ring {
        fn new(district_of_stop: &[DistrictId], names: Vec<(DistrictId, &'static str)>) -> Self {
            let n = district_of_stop.len() as StopId;
            let stops = (1..=n)
                .map(|id| {
                    let node = StopNode {
                        position: Position {
                            x: f32::from(district_of_stop[(id - 1) as usize]),
                            z: 0.0,
                        },
                        next: if id == n { 1 } else { id + 1 },
                        prev: if id == 1 { n } else { id - 1 },
                    };
                    (id, node)
                })
                .collect();
            Self {
                stops,
                districts: names,
            }
        }
    }

    impl NetworkView for Ring {
        fn stop(&self, id: StopId) -> Option<StopNode> {
            self.stops.get(&id).copied()
        }

        fn district_at(&self, position: Position) -> DistrictId {
            position.x as DistrictId
        }

        fn district_name(&self, id: DistrictId) -> String {
            self.districts
                .iter()
                .find(|(d, _)| *d == id)
                .map(|(_, n)| n.to_string())
                .unwrap_or_default()
        }
    }

    #[test]
    fn walk_starts_before_head() {
        let ring = Ring::new(&[1, 2, 3], vec![(1, "A"), (2, " B "), (3, "C")]);
        let ctx = walk(&ring, 1);
        assert_eq!(ctx.districts, vec!["C", "A", "B"]);
        assert_eq!(ctx.stop_count, 3);
    }

    #[test]
    fn analyze_is_capped() {
        let districts: Vec<DistrictId> = (0..40).map(|i| (i % 2) as DistrictId).collect();
        let ring = Ring::new(&districts, vec![(1, "Odd")]);
        let a = analyze(&ring, 1, ANALYZE_STOP_LIMIT);
        assert_eq!(a.stop_count, ANALYZE_STOP_LIMIT);
        assert!(a.non_district);
        assert_eq!(a.districts, vec!["Odd"]);
        // the unbounded walk covers the whole ring
        assert_eq!(walk(&ring, 1).stop_count, 40);
    }

    #[test]
    fn zero_head_is_empty() {
        let ring = Ring::new(&[1], vec![(1, "A")]);
        assert_eq!(walk(&ring, 0), NamingContext::default());
        assert_eq!(analyze(&ring, 0, ANALYZE_STOP_LIMIT), LineAnalysis::default());
    }
}

//! Colour dictionaries for swarms and states.
//!
//! Neither vocabulary is closed, so every palette has a fallback colour used for any key it
//! does not know about.
//!

use std::borrow::Borrow;
use std::collections::BTreeMap;

use swarmviz_formats::UNASSIGNED_SWARM;

/// Fallback for unknown swarms
const SWARM_FALLBACK: &str = "#999999";

/// Fallback for unknown states
const STATE_FALLBACK: &str = "#CCCCCC";

/// Open-ended key to colour mapping.
///
#[derive(Clone, Debug)]
pub struct Palette<K: Ord> {
    colors: BTreeMap<K, String>,
    fallback: String,
}

impl<K: Ord> Palette<K> {
    pub fn new(fallback: &str) -> Self {
        Palette {
            colors: BTreeMap::new(),
            fallback: fallback.to_owned(),
        }
    }

    /// Add or replace an entry.
    ///
    pub fn with(mut self, key: K, color: &str) -> Self {
        self.colors.insert(key, color.to_owned());
        self
    }

    /// Colour for `key`, the fallback if it is unknown.
    ///
    pub fn get<Q>(&self, key: &Q) -> &str
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.colors
            .get(key)
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Known entries, for legends.
    ///
    pub fn entries(&self) -> impl Iterator<Item = (&K, &str)> + '_ {
        self.colors.iter().map(|(k, v)| (k, v.as_str()))
    }
}

/// Default swarm colours.
///
pub fn swarm_palette() -> Palette<i64> {
    Palette::new(SWARM_FALLBACK)
        .with(UNASSIGNED_SWARM, "#778899")
        .with(1, "#007bff")
        .with(2, "#dc3545")
        .with(3, "#28a745")
}

/// Default state colours.
///
pub fn state_palette() -> Palette<String> {
    Palette::new(STATE_FALLBACK)
        .with("Taking Off".into(), "#FFC0CB")
        .with("Entering Swarm".into(), "#ADD8E6")
        .with("Hovering".into(), "#90EE90")
        .with("Passing By".into(), "#FDFD96")
        .with("Attacking".into(), "#FFB6C1")
        .with("Parachute Deployment".into(), "#FFD700")
}

/// Human name of a swarm.
///
pub fn swarm_label(swarm_id: i64) -> String {
    if swarm_id == UNASSIGNED_SWARM {
        "Unassigned".to_string()
    } else {
        format!("Swarm {}", swarm_id)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(-1, "#778899")]
    #[case(1, "#007bff")]
    #[case(3, "#28a745")]
    #[case(42, "#999999")]
    #[case(0, "#999999")]
    fn test_swarm_palette(#[case] id: i64, #[case] color: &str) {
        assert_eq!(color, swarm_palette().get(&id));
    }

    #[rstest]
    #[case("Hovering", "#90EE90")]
    #[case("Parachute Deployment", "#FFD700")]
    #[case("Refuelling", "#CCCCCC")]
    #[case("", "#CCCCCC")]
    fn test_state_palette(#[case] state: &str, #[case] color: &str) {
        assert_eq!(color, state_palette().get(state));
    }

    #[test]
    fn test_palette_override() {
        let p = state_palette().with("Hovering".into(), "#000000");
        assert_eq!("#000000", p.get("Hovering"));
        assert_eq!(6, p.entries().count());
    }

    #[test]
    fn test_swarm_label() {
        assert_eq!("Unassigned", swarm_label(-1));
        assert_eq!("Swarm 2", swarm_label(2));
    }
}

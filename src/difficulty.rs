//! # Difficulty Estimator
//!
//! Aggregates a whole expected-chord sequence into one of four discrete
//! difficulty labels for the authoring UI. Runs once per exercise and never
//! looks at learner data.
//!
//! The base difficulty is the hardest chord in the sequence (per the static
//! chord-key table, with secondary dominants pinned to the maximum), then
//! three additive modulators nudge the result: marker density, rare cadences,
//! and inversion variety. Simple progressions (base ≤ 2) cap the modulator
//! contribution so they cannot be inflated past "intermédiaire" by pacing
//! alone.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::chord::{Chord, Figure};
use crate::function::is_secondary_dominant;

/// Discrete difficulty label, displayed in French by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "débutant")]
    Beginner,
    #[serde(rename = "intermédiaire")]
    Intermediate,
    #[serde(rename = "avancé")]
    Advanced,
    #[serde(rename = "expert")]
    Expert,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Beginner => "débutant",
            Difficulty::Intermediate => "intermédiaire",
            Difficulty::Advanced => "avancé",
            Difficulty::Expert => "expert",
        };
        f.write_str(label)
    }
}

impl Difficulty {
    fn from_stage(stage: u8) -> Difficulty {
        match stage {
            0 | 1 => Difficulty::Beginner,
            2 => Difficulty::Intermediate,
            3 => Difficulty::Advanced,
            _ => Difficulty::Expert,
        }
    }
}

/// Base difficulty of one chord key, 1..=4. Unknown keys default to 2.
fn base_difficulty(key: &str) -> u8 {
    match key {
        // The simplest diatonic triads and the plain dominant seventh.
        "I" | "IV" | "V" | "V7" => 1,
        // Common first inversions and secondary triads.
        "II" | "VI" | "I6" | "IV6" | "V6" | "II6" | "V65" => 2,
        // Trickier inversions, the 6/4 family, the Neapolitan.
        "V43" | "V2" | "V64" | "cad64" | "I64" | "VII6" | "VII7" | "II65" | "N6" => 3,
        // Augmented sixths.
        "It" | "Fr" | "Gr" => 4,
        _ => 2,
    }
}

/// Estimate the difficulty label for an exercise.
///
/// `inter_chord_durations` are the seconds between consecutive timeline
/// markers. Returns `None` when no chord resolves a base difficulty (i.e.
/// nothing in the sequence has a degree or special root).
pub fn estimate_difficulty(
    chords: &[Chord],
    inter_chord_durations: &[f64],
) -> Option<Difficulty> {
    let mut base: Option<u8> = None;
    for chord in chords {
        let chord_base = if is_secondary_dominant(chord) {
            Some(4)
        } else {
            chord.key().map(|key| base_difficulty(&key))
        };
        if let Some(b) = chord_base {
            base = Some(base.map_or(b, |current| current.max(b)));
        }
    }
    let base = base?;

    let mut modulators = 0.0_f64;

    // Marker density: fast progressions are harder to follow.
    if !inter_chord_durations.is_empty() {
        let average =
            inter_chord_durations.iter().sum::<f64>() / inter_chord_durations.len() as f64;
        if average < 1.5 {
            modulators += 1.0;
        } else if average < 2.5 {
            modulators += 0.5;
        }
    }

    // Rare cadences.
    let has_rare_cadence = chords
        .iter()
        .filter_map(Chord::normalized_cadence)
        .any(|cadence| matches!(cadence.as_str(), "plagal" | "rompue" | "évitée"));
    if has_rare_cadence {
        modulators += 0.5;
    }

    // Inversion variety: distinct non-fundamental figures in the sequence.
    let figures: HashSet<Figure> = chords.iter().filter_map(Chord::normalized_figure).collect();
    if figures.len() >= 5 {
        modulators += 1.0;
    } else if figures.len() >= 3 {
        modulators += 0.5;
    }

    // Simple progressions stay simple regardless of pacing.
    if base <= 2 {
        modulators = modulators.min(0.5);
    }

    let score = ((base as f64 + modulators) * 2.0).round() / 2.0;
    let stage = score.clamp(1.0, 4.0).round() as u8;
    Some(Difficulty::from_stage(stage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::SpecialRoot;

    fn chord(degree: &str, figure: Option<&str>) -> Chord {
        Chord {
            degree: Some(degree.to_string()),
            figure: figure.map(|f| f.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_dominant_seventh_is_beginner() {
        let chords = vec![chord("V", Some("7"))];
        assert_eq!(
            estimate_difficulty(&chords, &[]),
            Some(Difficulty::Beginner)
        );
    }

    #[test]
    fn test_augmented_sixth_is_expert_regardless_of_pacing() {
        let chords = vec![Chord {
            special_root: Some(SpecialRoot::ItalianSixth),
            ..Default::default()
        }];
        assert_eq!(estimate_difficulty(&chords, &[]), Some(Difficulty::Expert));
        assert_eq!(
            estimate_difficulty(&chords, &[0.5]),
            Some(Difficulty::Expert)
        );
    }

    #[test]
    fn test_secondary_dominant_forces_expert_base() {
        let chords = vec![
            chord("I", None),
            Chord {
                label: Some("V7/IV".to_string()),
                ..Default::default()
            },
        ];
        assert_eq!(estimate_difficulty(&chords, &[]), Some(Difficulty::Expert));
    }

    #[test]
    fn test_empty_and_unresolvable_sequences() {
        assert_eq!(estimate_difficulty(&[], &[]), None);
        let function_only = vec![Chord {
            selected_function: Some(crate::chord::HarmonicFunction::D),
            ..Default::default()
        }];
        assert_eq!(estimate_difficulty(&function_only, &[]), None);
    }

    #[test]
    fn test_modulators_capped_for_simple_progressions() {
        // Base ≤ 2, short durations and a rare cadence: the +1.5 of
        // modulators collapses to +0.5, landing on "intermédiaire".
        let mut second = chord("V", Some("7"));
        second.cadence = Some("rompue".to_string());
        let chords = vec![chord("I", None), second];
        assert_eq!(
            estimate_difficulty(&chords, &[0.8]),
            Some(Difficulty::Intermediate)
        );
    }

    #[test]
    fn test_modulators_apply_fully_to_hard_progressions() {
        // Base 3 (V2) plus fast markers (+1) and three distinct figures
        // (+0.5) rounds to 4.
        let chords = vec![
            chord("V", Some("2")),
            chord("I", Some("6")),
            chord("V", Some("43")),
        ];
        assert_eq!(
            estimate_difficulty(&chords, &[1.0, 1.0]),
            Some(Difficulty::Expert)
        );
    }

    #[test]
    fn test_moderate_pacing_modulator() {
        // Base 3 (cad64), average duration 2.0 adds +0.5; 3.5 rounds up to
        // stage 4.
        let mut cadential = chord("I", Some("64"));
        cadential.six_four_variant = Some(crate::chord::SixFourVariant::Cadential);
        let chords = vec![chord("I", None), cadential];
        assert_eq!(
            estimate_difficulty(&chords, &[2.0]),
            Some(Difficulty::Expert)
        );
    }

    #[test]
    fn test_unknown_keys_default_to_intermediate() {
        let chords = vec![chord("III", Some("9"))];
        assert_eq!(
            estimate_difficulty(&chords, &[]),
            Some(Difficulty::Intermediate)
        );
    }

    #[test]
    fn test_labels_render_in_french() {
        assert_eq!(Difficulty::Beginner.to_string(), "débutant");
        assert_eq!(Difficulty::Intermediate.to_string(), "intermédiaire");
        assert_eq!(Difficulty::Advanced.to_string(), "avancé");
        assert_eq!(Difficulty::Expert.to_string(), "expert");
    }
}

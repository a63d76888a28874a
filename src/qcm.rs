//! # Distractor Generator / QCM Builder
//!
//! Builds the five-option multiple-choice list for a checkpoint: the correct
//! chord's label plus four deterministic lures.
//!
//! ## Determinism
//! Reproducibility is a hard contract: graders and test fixtures must see the
//! same option list for the same `(chord, exercise, lure mode, seed)` inputs.
//! All randomness flows through [`SeededRng`], a tiny explicit
//! linear-congruential generator, never through a library PRNG. One generator
//! (seeded with the question seed, or the label's character-code sum) drives
//! lure synthesis and the pool shuffles; a second one (seed + 2) shuffles the
//! final five-element list.
//!
//! ## Lure policy
//! Real chords from the exercise are split into "close" lures (same function,
//! same degree, or adjacent degrees) and "far" ones. Learners with a solid
//! history on the node (≥ 3 attempts averaging ≥ 75) get 3 close + 1 far;
//! everyone else gets 1 close + 3 far. Thin exercises are padded with
//! synthetic lures built from the correct degree in other inversions (close)
//! or from other degrees entirely (far).

use serde::{Deserialize, Serialize};

use crate::chord::{Chord, Degree, Figure, HarmonicFunction, RootIdentity, SixFourVariant, DEGREES};
use crate::function::chord_functions;

/// Deterministic linear-congruential generator.
///
/// `seed' = (seed * 9301 + 49297) mod 233280`, uniform value `seed'/233280`.
/// The exact constants are part of the reproducibility contract.
#[derive(Debug, Clone, Copy)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        SeededRng { state: seed as u64 }
    }

    /// Next uniform value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.state = (self.state * 9301 + 49297) % 233280;
        self.state as f64 / 233280.0
    }

    /// Next index in `0..len`.
    pub fn index(&mut self, len: usize) -> usize {
        (self.next() * len as f64) as usize
    }
}

/// In-place Fisher–Yates driven by the given generator.
fn shuffle<T>(items: &mut [T], rng: &mut SeededRng) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

/// Read-only record of a learner's history on one exercise node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeHistory {
    pub attempts: u32,
    pub average_score: f64,
}

/// Close lures are granted once the learner has a solid track record.
pub fn close_lures_granted(history: &NodeHistory) -> bool {
    history.attempts >= 3 && history.average_score >= 75.0
}

/// Render a chord annotation as its option label.
///
/// Special roots have fixed labels; degree chords render as degree (with the
/// `V`/`Cad.` substitution for passing and cadential 6/4), accidental glyph,
/// slash-rendered figure, and an optional `" / pedal"` suffix. This is the
/// single formatter shared with the validator's QCM comparison path.
///
/// Returns `None` for a chord with no degree and no special root.
pub fn format_chord_string(chord: &Chord) -> Option<String> {
    let mut label = match chord.root_identity()? {
        RootIdentity::Special(special) => special.label().to_string(),
        RootIdentity::Degree(degree) => {
            let figure = chord.normalized_figure();
            let mut out = String::new();
            if chord.is_six_four_tonic() {
                out.push_str(match chord.six_four_variant {
                    Some(SixFourVariant::Passing) => "V",
                    Some(SixFourVariant::Cadential) => "Cad.",
                    None => "I",
                });
            } else {
                out.push_str(degree.as_str());
            }
            if let Some(accidental) = chord.accidental {
                out.push_str(accidental.symbol());
            }
            if let Some(figure) = figure {
                out.push_str(figure.display_label());
            }
            out
        }
        RootIdentity::FunctionOnly(_) => return None,
    };
    if let Some(pedal) = chord.pedal_degree.as_deref() {
        let pedal = pedal.trim();
        if !pedal.is_empty() {
            label.push_str(" / ");
            label.push_str(pedal);
        }
    }
    Some(label)
}

/// Degrees considered nearby even when the function tables disagree.
fn adjacent_degrees(degree: Degree) -> &'static [Degree] {
    match degree {
        Degree::III => &[Degree::I, Degree::VI],
        Degree::VI => &[Degree::I, Degree::III],
        Degree::II => &[Degree::IV],
        Degree::VII => &[Degree::V],
        _ => &[],
    }
}

/// A candidate is close when it shares a function or degree with the correct
/// chord, or sits in the fixed adjacency set.
fn is_close_candidate(candidate: &Chord, correct: &Chord) -> bool {
    let candidate_functions = chord_functions(candidate);
    let correct_functions = chord_functions(correct);
    if candidate_functions
        .iter()
        .any(|f| correct_functions.contains(f))
    {
        return true;
    }
    match (candidate.resolved_degree(), correct.resolved_degree()) {
        (Some(a), Some(b)) => {
            a == b || adjacent_degrees(a).contains(&b) || adjacent_degrees(b).contains(&a)
        }
        _ => false,
    }
}

/// Figures drawn on when synthesizing lures.
const LURE_FIGURES: [Option<Figure>; 7] = [
    None,
    Some(Figure::Six),
    Some(Figure::SixFour),
    Some(Figure::Seven),
    Some(Figure::SixFive),
    Some(Figure::FourThree),
    Some(Figure::Two),
];

fn synthetic_label(degree: Degree, figure: Option<Figure>) -> String {
    let chord = Chord {
        degree: Some(degree.as_str().to_string()),
        figure: figure.map(|f| f.as_code().to_string()),
        ..Default::default()
    };
    // A synthetic chord always carries a degree, so formatting cannot fail.
    format_chord_string(&chord).unwrap_or_default()
}

/// Build the five-option list for one checkpoint.
///
/// The result always contains the correct label exactly once and no
/// duplicates. Identical inputs yield byte-identical output.
///
/// Returns an empty list when the correct chord itself has no renderable
/// label (no degree and no special root).
pub fn build_options(
    correct: &Chord,
    all_chords: &[Chord],
    use_close_lures: bool,
    question_seed: Option<u32>,
) -> Vec<String> {
    let correct_label = match format_chord_string(correct) {
        Some(label) => label,
        None => return Vec::new(),
    };
    let seed = question_seed
        .unwrap_or_else(|| correct_label.chars().map(|c| c as u32).sum::<u32>());
    let mut rng = SeededRng::new(seed);

    // Split the real exercise chords into pools, deduplicated by label.
    let mut close: Vec<String> = Vec::new();
    let mut far: Vec<String> = Vec::new();
    for chord in all_chords {
        let label = match format_chord_string(chord) {
            Some(label) => label,
            None => continue,
        };
        if label == correct_label || close.contains(&label) || far.contains(&label) {
            continue;
        }
        if is_close_candidate(chord, correct) {
            close.push(label);
        } else {
            far.push(label);
        }
    }

    let (close_count, far_count) = if use_close_lures { (3, 1) } else { (1, 3) };
    let base_degree = correct
        .resolved_degree()
        .or_else(|| chord_functions(correct).first().map(|f| f.primary_degree()))
        .unwrap_or(Degree::V);

    // Synthetic close lures: the right degree in other inversions.
    let close_target = close_count.max(2);
    let mut guard = 0;
    while close.len() < close_target && guard < 64 {
        guard += 1;
        let figure = LURE_FIGURES[rng.index(LURE_FIGURES.len())];
        let label = synthetic_label(base_degree, figure);
        if label != correct_label && !close.contains(&label) && !far.contains(&label) {
            close.push(label);
        }
    }

    // Synthetic far lures: a different degree with a random figure.
    let far_target = far_count.max(2);
    let mut guard = 0;
    while far.len() < far_target && guard < 64 {
        guard += 1;
        let degree = DEGREES[rng.index(DEGREES.len())];
        if degree == base_degree {
            continue;
        }
        let figure = LURE_FIGURES[rng.index(LURE_FIGURES.len())];
        let label = synthetic_label(degree, figure);
        if label != correct_label && !far.contains(&label) && !close.contains(&label) {
            far.push(label);
        }
    }

    shuffle(&mut close, &mut rng);
    shuffle(&mut far, &mut rng);

    let mut options: Vec<String> = Vec::with_capacity(5);
    options.extend(close.into_iter().take(close_count));
    options.extend(far.into_iter().take(far_count));
    options.push(correct_label);

    // Independent generator for the final interleave.
    let mut interleave_rng = SeededRng::new(seed.wrapping_add(2));
    shuffle(&mut options, &mut interleave_rng);
    options
}

/// Infer the `T`/`SD`/`D` tag shown next to an option label.
///
/// The correct chord's own function wins for its label; otherwise pattern
/// rules catch the cadential 6/4, the augmented sixths and the Neapolitan,
/// and anything else falls back to the leading degree's principal function.
pub fn function_for_option_label(
    label: &str,
    correct: &Chord,
    correct_label: &str,
) -> Option<HarmonicFunction> {
    if label == correct_label {
        if let Some(function) = chord_functions(correct).first().copied() {
            return Some(function);
        }
    }
    if label.starts_with("Cad.") {
        return Some(HarmonicFunction::D);
    }
    if label.contains("+6") {
        return Some(HarmonicFunction::D);
    }
    if label.starts_with("II♭6") {
        return Some(HarmonicFunction::SD);
    }
    Degree::parse_prefix(label).map(Degree::principal_function)
}

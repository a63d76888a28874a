//! # Answer Validator
//!
//! Grades a learner's annotation against the expected one with partial credit.
//!
//! ## Decision table (first matching rule wins)
//! 1. Same degree, same figure → level 1, 100 ("Perfect"). Matching special
//!    roots count as an exact match too.
//! 2. Function-only answer whose function is valid for the expected chord →
//!    level 3, 30.
//! 3. Function + degree: valid function and exact degree → level 1, 100;
//!    valid function carried by the learner's own (wrong) degree → level 2, 65.
//! 4. Same degree, different figure → level 2, 80.
//! 5. Degrees in the principal/parallel relation of a shared function →
//!    level 2, 65.
//! 6. Anything else → level 0, 0.
//!
//! The cadence bonus is computed independently of the level: matching
//! normalized cadences add 10 to the score of *any* level, and a missing
//! learner cadence never penalizes.
//!
//! Every path is total: malformed or partial annotations degrade to level 0,
//! never to a panic.

use serde::Serialize;
use std::fmt;

use crate::chord::{Chord, HarmonicFunction, RootIdentity};
use crate::function::{chord_functions, is_principal_parallel_pair};
use crate::qcm::format_chord_string;

/// Score awarded for an exact answer.
pub const SCORE_PERFECT: u32 = 100;
/// Score for the right degree in the wrong inversion.
pub const SCORE_RIGHT_DEGREE: u32 = 80;
/// Score for the right function through the wrong degree.
pub const SCORE_RIGHT_FUNCTION: u32 = 65;
/// Score for a bare function answer.
pub const SCORE_FUNCTION_ONLY: u32 = 30;
/// Added on top of any level when the cadences match.
pub const CADENCE_BONUS: u32 = 10;

/// Options for a validation call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions {
    /// The presentation phase only offers function buttons: a matching
    /// function is then the only way to score.
    pub function_only_available: bool,
}

/// Learner-facing feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    MissingAnswer,
    Perfect,
    PerfectWithCadence,
    RightFunctionFindDegree,
    RightFunctionWrongDegree,
    RightDegreeDifferentFigure,
    Incorrect,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Feedback::MissingAnswer => "missing answer",
            Feedback::Perfect => "Perfect",
            Feedback::PerfectWithCadence => "Perfect + cadence bonus",
            Feedback::RightFunctionFindDegree => "right function, find the exact degree",
            Feedback::RightFunctionWrongDegree => "right function, wrong degree",
            Feedback::RightDegreeDifferentFigure => "right degree, different figure",
            Feedback::Incorrect => "incorrect",
        };
        f.write_str(text)
    }
}

/// Graded result of one comparison.
///
/// `score` already includes `cadence_bonus`; levels are `0`, `1` (exact),
/// `2` (partial), `3` (function only), with `0.5` reserved for the host
/// application's cadence-only display state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub level: f32,
    pub score: u32,
    pub cadence_bonus: u32,
    pub feedback: Feedback,
}

impl Evaluation {
    fn new(level: f32, base_score: u32, cadence_bonus: u32, feedback: Feedback) -> Self {
        Evaluation {
            level,
            score: base_score + cadence_bonus,
            cadence_bonus,
            feedback,
        }
    }

    fn missing() -> Self {
        Evaluation::new(0.0, 0, 0, Feedback::MissingAnswer)
    }

    fn perfect(cadence_bonus: u32) -> Self {
        let feedback = if cadence_bonus > 0 {
            Feedback::PerfectWithCadence
        } else {
            Feedback::Perfect
        };
        Evaluation::new(1.0, SCORE_PERFECT, cadence_bonus, feedback)
    }
}

/// Compare a learner answer to the expected one.
///
/// `selected_function` is the function button pressed in the UI; it takes
/// precedence over a `selectedFunction` field on the answer itself.
///
/// ```
/// use harmonic_drill::{validate, Chord, ValidateOptions};
///
/// let user = Chord { degree: Some("I".into()), figure: Some("6".into()), ..Default::default() };
/// let correct = Chord { degree: Some("I".into()), figure: Some("5".into()), ..Default::default() };
/// let result = validate(Some(&user), Some(&correct), None, &ValidateOptions::default());
/// assert_eq!(result.level, 2.0);
/// assert_eq!(result.score, 80);
/// ```
pub fn validate(
    user: Option<&Chord>,
    correct: Option<&Chord>,
    selected_function: Option<HarmonicFunction>,
    options: &ValidateOptions,
) -> Evaluation {
    let (user, correct) = match (user, correct) {
        (Some(user), Some(correct)) => (user, correct),
        _ => return Evaluation::missing(),
    };

    let cadence_bonus = cadence_bonus(user, correct);
    let user_function = selected_function.or(user.selected_function);
    let user_degree = user.resolved_degree();
    let correct_degree = correct.resolved_degree();
    let correct_functions = chord_functions(correct);

    // Restricted phase: the learner only ever sees function buttons.
    if options.function_only_available {
        return match user_function {
            Some(function) if correct_functions.contains(&function) => Evaluation::new(
                3.0,
                SCORE_FUNCTION_ONLY,
                cadence_bonus,
                Feedback::RightFunctionFindDegree,
            ),
            _ => Evaluation::new(0.0, 0, cadence_bonus, Feedback::Incorrect),
        };
    }

    // Rule 1: exact root and inversion.
    if let (Some(ud), Some(cd)) = (user_degree, correct_degree) {
        if ud == cd && user.normalized_figure() == correct.normalized_figure() {
            return Evaluation::perfect(cadence_bonus);
        }
    }
    if let (Some(RootIdentity::Special(us)), Some(RootIdentity::Special(cs))) =
        (user.root_identity(), correct.root_identity())
    {
        if us == cs {
            return Evaluation::perfect(cadence_bonus);
        }
    }

    // Rule 2: a bare function answer.
    if user_degree.is_none() && user.special_root.is_none() {
        if let Some(function) = user_function {
            if correct_functions.contains(&function) {
                return Evaluation::new(
                    3.0,
                    SCORE_FUNCTION_ONLY,
                    cadence_bonus,
                    Feedback::RightFunctionFindDegree,
                );
            }
        }
    }

    // Rule 3: function + degree supplied together.
    if let (Some(function), Some(ud)) = (user_function, user_degree) {
        if correct_functions.contains(&function) {
            if Some(ud) == correct_degree {
                return Evaluation::perfect(cadence_bonus);
            }
            if ud.functions().contains(&function) {
                return Evaluation::new(
                    2.0,
                    SCORE_RIGHT_FUNCTION,
                    cadence_bonus,
                    Feedback::RightFunctionWrongDegree,
                );
            }
        }
    }

    // Rule 4: right degree, different inversion.
    if user_degree.is_some() && user_degree == correct_degree {
        return Evaluation::new(
            2.0,
            SCORE_RIGHT_DEGREE,
            cadence_bonus,
            Feedback::RightDegreeDifferentFigure,
        );
    }

    // Rule 5: principal/parallel substitution.
    if let (Some(ud), Some(cd)) = (user_degree, correct_degree) {
        if is_principal_parallel_pair(ud, cd) {
            return Evaluation::new(
                2.0,
                SCORE_RIGHT_FUNCTION,
                cadence_bonus,
                Feedback::RightFunctionFindDegree,
            );
        }
    }

    Evaluation::new(0.0, 0, cadence_bonus, Feedback::Incorrect)
}

/// Learner answer in multiple-choice mode: a picked option label plus the
/// optional cadence and function widgets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChoiceAnswer {
    pub chord: Option<String>,
    pub cadence: Option<String>,
    pub function: Option<HarmonicFunction>,
}

/// Grade a multiple-choice answer by comparing the picked label to the
/// expected chord's rendered label, byte for byte.
pub fn validate_choice(answer: &ChoiceAnswer, correct: &Chord) -> Evaluation {
    let correct_label = match format_chord_string(correct) {
        Some(label) => label,
        None => return Evaluation::missing(),
    };
    let cadence_bonus = match (
        crate::chord::normalize_cadence(answer.cadence.as_deref()),
        correct.normalized_cadence(),
    ) {
        (Some(user), Some(expected)) if user == expected => CADENCE_BONUS,
        _ => 0,
    };

    match answer.chord.as_deref() {
        Some(chosen) if chosen == correct_label => Evaluation::perfect(cadence_bonus),
        Some(_) => Evaluation::new(0.0, 0, cadence_bonus, Feedback::Incorrect),
        None => match answer.function {
            Some(function) if chord_functions(correct).contains(&function) => Evaluation::new(
                3.0,
                SCORE_FUNCTION_ONLY,
                cadence_bonus,
                Feedback::RightFunctionFindDegree,
            ),
            Some(_) => Evaluation::new(0.0, 0, cadence_bonus, Feedback::Incorrect),
            None => Evaluation::missing(),
        },
    }
}

fn cadence_bonus(user: &Chord, correct: &Chord) -> u32 {
    match (user.normalized_cadence(), correct.normalized_cadence()) {
        (Some(user), Some(expected)) if user == expected => CADENCE_BONUS,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::{SixFourVariant, SpecialRoot};

    fn chord(degree: &str, figure: Option<&str>) -> Chord {
        Chord {
            degree: Some(degree.to_string()),
            figure: figure.map(|f| f.to_string()),
            ..Default::default()
        }
    }

    fn check(user: &Chord, correct: &Chord) -> Evaluation {
        validate(Some(user), Some(correct), None, &ValidateOptions::default())
    }

    #[test]
    fn test_missing_answer() {
        let c = chord("I", None);
        let result = validate(None, Some(&c), None, &ValidateOptions::default());
        assert_eq!(result.level, 0.0);
        assert_eq!(result.score, 0);
        assert_eq!(result.feedback, Feedback::MissingAnswer);
        let result = validate(Some(&c), None, None, &ValidateOptions::default());
        assert_eq!(result.feedback, Feedback::MissingAnswer);
    }

    #[test]
    fn test_exact_match_all_degrees_and_figures() {
        for degree in ["I", "II", "III", "IV", "V", "VI", "VII"] {
            for figure in [None, Some("6"), Some("64"), Some("7"), Some("65")] {
                let c = chord(degree, figure);
                let result = check(&c, &c);
                assert_eq!(result.level, 1.0, "{degree}{figure:?}");
                assert_eq!(result.score, 100);
                assert_eq!(result.feedback, Feedback::Perfect);
            }
        }
    }

    #[test]
    fn test_fundamental_figure_equivalence() {
        // "5" and no figure are the same inversion
        let result = check(&chord("IV", Some("5")), &chord("IV", None));
        assert_eq!(result.level, 1.0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_case_insensitive_degrees() {
        let result = check(&chord("vi", None), &chord("VI", None));
        assert_eq!(result.level, 1.0);
    }

    #[test]
    fn test_right_degree_different_figure() {
        let result = check(&chord("I", Some("6")), &chord("I", Some("5")));
        assert_eq!(result.level, 2.0);
        assert_eq!(result.score, 80);
        assert_eq!(result.feedback, Feedback::RightDegreeDifferentFigure);
    }

    #[test]
    fn test_function_only_answer() {
        let user = Chord {
            selected_function: Some(HarmonicFunction::D),
            ..Default::default()
        };
        let result = check(&user, &chord("V", None));
        assert_eq!(result.level, 3.0);
        assert_eq!(result.score, 30);
        assert_eq!(result.feedback, Feedback::RightFunctionFindDegree);
    }

    #[test]
    fn test_function_only_via_argument() {
        let user = Chord::default();
        let result = validate(
            Some(&user),
            Some(&chord("V", None)),
            Some(HarmonicFunction::D),
            &ValidateOptions {
                function_only_available: true,
            },
        );
        assert_eq!(result.level, 3.0);
        assert_eq!(result.score, 30);
    }

    #[test]
    fn test_function_only_mode_blocks_degree_credit() {
        // In the restricted phase a degree answer earns nothing on its own.
        let result = validate(
            Some(&chord("V", None)),
            Some(&chord("V", None)),
            None,
            &ValidateOptions {
                function_only_available: true,
            },
        );
        assert_eq!(result.level, 0.0);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_wrong_function_scores_zero() {
        let user = Chord {
            selected_function: Some(HarmonicFunction::T),
            ..Default::default()
        };
        let result = check(&user, &chord("V", None));
        assert_eq!(result.level, 0.0);
        assert_eq!(result.feedback, Feedback::Incorrect);
    }

    #[test]
    fn test_function_plus_exact_degree_is_perfect() {
        let user = Chord {
            degree: Some("V".to_string()),
            selected_function: Some(HarmonicFunction::D),
            ..Default::default()
        };
        let result = check(&user, &chord("V", None));
        assert_eq!(result.level, 1.0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_function_plus_wrong_degree() {
        // D is valid for the expected V, and the learner's VII also carries D.
        let user = Chord {
            degree: Some("VII".to_string()),
            selected_function: Some(HarmonicFunction::D),
            ..Default::default()
        };
        let result = check(&user, &chord("V", None));
        assert_eq!(result.level, 2.0);
        assert_eq!(result.score, 65);
        assert_eq!(result.feedback, Feedback::RightFunctionWrongDegree);
    }

    #[test]
    fn test_parallel_substitution() {
        let result = check(&chord("VI", None), &chord("I", None));
        assert_eq!(result.level, 2.0);
        assert_eq!(result.score, 65);
        assert_eq!(result.feedback, Feedback::RightFunctionFindDegree);
    }

    #[test]
    fn test_asymmetric_substitution_v_iii() {
        // V and III both relate to D, but the pairing is directional.
        let result = check(&chord("V", None), &chord("III", None));
        assert_eq!(result.level, 0.0);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_cadence_bonus_on_perfect() {
        let mut user = chord("V", Some("7"));
        let mut correct = chord("V", Some("7"));
        user.cadence = Some("Deceptive".to_string());
        correct.cadence = Some("rompue".to_string());
        let result = check(&user, &correct);
        assert_eq!(result.level, 1.0);
        assert_eq!(result.score, 110);
        assert_eq!(result.cadence_bonus, 10);
        assert_eq!(result.feedback, Feedback::PerfectWithCadence);
    }

    #[test]
    fn test_cadence_bonus_is_level_independent() {
        // A matching cadence on a miss adds 10 but stays level 0.
        let mut user = chord("II", None);
        let mut correct = chord("V", None);
        user.cadence = Some("half".to_string());
        correct.cadence = Some("demi-cadence".to_string());
        let result = check(&user, &correct);
        assert_eq!(result.level, 0.0);
        assert_eq!(result.score, 10);
        assert_eq!(result.cadence_bonus, 10);
    }

    #[test]
    fn test_missing_cadence_never_penalizes() {
        let user = chord("V", None);
        let mut correct = chord("V", None);
        correct.cadence = Some("parfaite".to_string());
        let result = check(&user, &correct);
        assert_eq!(result.level, 1.0);
        assert_eq!(result.score, 100);
        assert_eq!(result.cadence_bonus, 0);
    }

    #[test]
    fn test_special_root_exact_match() {
        let c = Chord {
            special_root: Some(SpecialRoot::GermanSixth),
            ..Default::default()
        };
        let result = check(&c, &c);
        assert_eq!(result.level, 1.0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_function_answer_against_special_root() {
        let user = Chord {
            selected_function: Some(HarmonicFunction::SD),
            ..Default::default()
        };
        let correct = Chord {
            special_root: Some(SpecialRoot::Neapolitan),
            ..Default::default()
        };
        let result = check(&user, &correct);
        assert_eq!(result.level, 3.0);
        assert_eq!(result.score, 30);
    }

    #[test]
    fn test_function_answer_against_cadential_six_four() {
        let user = Chord {
            selected_function: Some(HarmonicFunction::D),
            ..Default::default()
        };
        let correct = Chord {
            degree: Some("I".to_string()),
            figure: Some("64".to_string()),
            six_four_variant: Some(SixFourVariant::Cadential),
            ..Default::default()
        };
        let result = check(&user, &correct);
        assert_eq!(result.level, 3.0);
    }

    #[test]
    fn test_empty_chords_degrade_gracefully() {
        let result = check(&Chord::default(), &Chord::default());
        assert_eq!(result.level, 0.0);
        assert_eq!(result.feedback, Feedback::Incorrect);
    }

    #[test]
    fn test_degree_mode_is_ignored() {
        let mut user = chord("V", None);
        user.degree_mode = Some(crate::chord::DegreeMode::Minor);
        let mut correct = chord("V", None);
        correct.degree_mode = Some(crate::chord::DegreeMode::Major);
        assert_eq!(check(&user, &correct).level, 1.0);
    }

    #[test]
    fn test_validate_choice_exact_label() {
        let correct = Chord {
            special_root: Some(SpecialRoot::ItalianSixth),
            ..Default::default()
        };
        let answer = ChoiceAnswer {
            chord: Some("It+6".to_string()),
            ..Default::default()
        };
        let result = validate_choice(&answer, &correct);
        assert_eq!(result.level, 1.0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_validate_choice_wrong_label() {
        let correct = chord("V", Some("7"));
        let answer = ChoiceAnswer {
            chord: Some("IV6".to_string()),
            ..Default::default()
        };
        let result = validate_choice(&answer, &correct);
        assert_eq!(result.level, 0.0);
        assert_eq!(result.feedback, Feedback::Incorrect);
    }

    #[test]
    fn test_validate_choice_function_fallback() {
        let correct = chord("V", None);
        let answer = ChoiceAnswer {
            function: Some(HarmonicFunction::D),
            ..Default::default()
        };
        let result = validate_choice(&answer, &correct);
        assert_eq!(result.level, 3.0);
        assert_eq!(result.score, 30);
    }
}

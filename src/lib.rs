pub mod chord;
pub mod difficulty;
pub mod error;
pub mod exercise;
pub mod function;
pub mod qcm;
pub mod validate;

pub use chord::*;
pub use difficulty::{estimate_difficulty, Difficulty};
pub use error::DrillError;
pub use exercise::{Checkpoint, Exercise};
pub use function::{chord_functions, is_principal_parallel_pair, is_secondary_dominant};
pub use qcm::{
    build_options, close_lures_granted, format_chord_string, function_for_option_label,
    NodeHistory, SeededRng,
};
pub use validate::{
    validate, validate_choice, ChoiceAnswer, Evaluation, Feedback, ValidateOptions,
    CADENCE_BONUS,
};

/// Load an exercise document, check its authoring invariants, and return it.
/// This is the main entry point for hosts that hold exercises as YAML.
pub fn load_exercise(source: &str) -> Result<Exercise, DrillError> {
    let exercise = Exercise::from_yaml(source)?;
    exercise.check()?;
    Ok(exercise)
}

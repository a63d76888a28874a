//! # Exercise Documents
//!
//! The authoring collaborator's data: an ordered list of timeline checkpoints,
//! each carrying one expected chord annotation. Documents are exchanged as
//! YAML, in the same permissive camelCase shape the host application stores.
//!
//! This module owns the only fallible operations in the crate: parsing a
//! document and checking the authoring invariants (one root identity per
//! chord, `sixFourVariant` only on a `I` chord in 6/4 position, strictly
//! increasing checkpoint times, known vocabulary). Scoring itself never
//! errors.
//!
//! ## Example document
//! ```yaml
//! title: Cadence parfaite
//! checkpoints:
//!   - time: 3.2
//!     chord: { degree: IV }
//!   - time: 5.0
//!     chord: { degree: V, figure: "7", cadence: parfaite }
//!   - time: 6.8
//!     chord: { degree: I }
//! ```

use serde::{Deserialize, Serialize};

use crate::chord::{Chord, Degree, Figure};
use crate::difficulty::{estimate_difficulty, Difficulty};
use crate::error::DrillError;
use crate::validate::{validate, Evaluation, ValidateOptions};

/// One timeline marker with its expected annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checkpoint {
    /// Position on the video timeline, in seconds.
    pub time: f64,
    pub chord: Chord,
}

/// A complete authored exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exercise {
    pub title: Option<String>,
    pub checkpoints: Vec<Checkpoint>,
}

impl Exercise {
    /// Parse an exercise document from YAML.
    pub fn from_yaml(source: &str) -> Result<Exercise, DrillError> {
        serde_yaml::from_str(source).map_err(|e| DrillError::Document(e.to_string()))
    }

    /// Check the authoring invariants. Scoring tolerates anything, but the
    /// authoring UI wants violations pinned to a checkpoint.
    pub fn check(&self) -> Result<(), DrillError> {
        for (index, checkpoint) in self.checkpoints.iter().enumerate() {
            let chord = &checkpoint.chord;

            if chord.special_root.is_some() && chord.resolved_degree().is_some() {
                return Err(DrillError::Annotation {
                    checkpoint: index,
                    message: "a chord cannot carry both a degree and a special root".to_string(),
                });
            }

            if let Some(degree) = chord.degree.as_deref() {
                if !degree.trim().is_empty() && Degree::parse(degree).is_none() {
                    return Err(DrillError::Annotation {
                        checkpoint: index,
                        message: format!("unknown degree: {degree}"),
                    });
                }
            }

            if let Some(figure) = chord.figure.as_deref() {
                let trimmed = figure.trim();
                if !trimmed.is_empty()
                    && trimmed != "5"
                    && Figure::normalize(Some(trimmed)).is_none()
                {
                    return Err(DrillError::Annotation {
                        checkpoint: index,
                        message: format!("unknown figure: {figure}"),
                    });
                }
            }

            if chord.six_four_variant.is_some() && !chord.is_six_four_tonic() {
                return Err(DrillError::Annotation {
                    checkpoint: index,
                    message: "sixFourVariant requires a I chord in 6/4 position".to_string(),
                });
            }
        }

        for (index, pair) in self.checkpoints.windows(2).enumerate() {
            if pair[1].time <= pair[0].time {
                return Err(DrillError::Annotation {
                    checkpoint: index + 1,
                    message: "checkpoint times must be strictly increasing".to_string(),
                });
            }
        }

        Ok(())
    }

    /// The expected chords, in timeline order.
    pub fn chords(&self) -> Vec<Chord> {
        self.checkpoints.iter().map(|c| c.chord.clone()).collect()
    }

    /// Seconds between consecutive markers, feeding the difficulty estimator.
    pub fn inter_chord_durations(&self) -> Vec<f64> {
        self.checkpoints
            .windows(2)
            .map(|pair| pair[1].time - pair[0].time)
            .collect()
    }

    /// Estimated difficulty label for the whole exercise.
    pub fn difficulty(&self) -> Option<Difficulty> {
        estimate_difficulty(&self.chords(), &self.inter_chord_durations())
    }

    /// Grade a full attempt: one optional answer per checkpoint, in order.
    /// Unanswered checkpoints grade as missing.
    pub fn grade(&self, answers: &[Option<Chord>]) -> Vec<Evaluation> {
        let options = ValidateOptions::default();
        self.checkpoints
            .iter()
            .enumerate()
            .map(|(index, checkpoint)| {
                let answer = answers.get(index).and_then(Option::as_ref);
                validate(answer, Some(&checkpoint.chord), None, &options)
            })
            .collect()
    }
}

//! Harmonic-function tables: which degrees can carry which function, which
//! degree is a function's primary representative, and which degrees act as its
//! parallels.
//!
//! The tables encode deliberate pedagogical asymmetries (e.g. `III` is listed
//! among the dominant degrees but is never accepted as a parallel substitute
//! for `V`). They must be kept exactly as-is, not "fixed".

use crate::chord::{Chord, Degree, HarmonicFunction, RootIdentity, SixFourVariant};

impl Degree {
    /// Functions this degree can carry. The first entry is the degree's
    /// principal function.
    pub fn functions(self) -> &'static [HarmonicFunction] {
        use HarmonicFunction::{D, SD, T};
        match self {
            Degree::I => &[T],
            Degree::II => &[SD],
            Degree::III => &[T, D],
            Degree::IV => &[SD],
            Degree::V => &[D],
            Degree::VI => &[T, SD],
            Degree::VII => &[D],
        }
    }

    /// The function this degree carries first and foremost.
    pub fn principal_function(self) -> HarmonicFunction {
        self.functions()[0]
    }
}

impl HarmonicFunction {
    pub const ALL: [HarmonicFunction; 3] =
        [HarmonicFunction::T, HarmonicFunction::SD, HarmonicFunction::D];

    /// Degrees that can carry this function, primary first.
    pub fn degrees(self) -> &'static [Degree; 3] {
        match self {
            HarmonicFunction::T => &[Degree::I, Degree::VI, Degree::III],
            HarmonicFunction::SD => &[Degree::IV, Degree::II, Degree::VI],
            HarmonicFunction::D => &[Degree::V, Degree::VII, Degree::III],
        }
    }

    /// The primary degree of this function.
    pub fn primary_degree(self) -> Degree {
        match self {
            HarmonicFunction::T => Degree::I,
            HarmonicFunction::SD => Degree::IV,
            HarmonicFunction::D => Degree::V,
        }
    }

    /// Parallel (substitute) degrees of this function.
    pub fn parallel_degrees(self) -> &'static [Degree; 2] {
        match self {
            HarmonicFunction::T => &[Degree::III, Degree::VI],
            HarmonicFunction::SD => &[Degree::II, Degree::VI],
            HarmonicFunction::D => &[Degree::VII, Degree::III],
        }
    }
}

impl crate::chord::SpecialRoot {
    /// The function a special-root chord carries: Neapolitan is subdominant,
    /// the augmented sixths are dominant preparations graded as dominant.
    pub fn function(self) -> HarmonicFunction {
        match self {
            crate::chord::SpecialRoot::Neapolitan => HarmonicFunction::SD,
            _ => HarmonicFunction::D,
        }
    }
}

/// Functions a chord can be credited with, derived from its root identity.
///
/// A passing or cadential `I64` functions as a dominant regardless of its
/// literal degree; a literal `I64` keeps the plain degree lookup.
pub fn chord_functions(chord: &Chord) -> Vec<HarmonicFunction> {
    if chord.is_six_four_tonic()
        && matches!(
            chord.six_four_variant,
            Some(SixFourVariant::Passing) | Some(SixFourVariant::Cadential)
        )
    {
        return vec![HarmonicFunction::D];
    }
    match chord.root_identity() {
        Some(RootIdentity::Degree(degree)) => degree.functions().to_vec(),
        Some(RootIdentity::Special(special)) => vec![special.function()],
        Some(RootIdentity::FunctionOnly(function)) => vec![function],
        None => vec![],
    }
}

/// Secondary-dominant heuristic: an explicit tonicized-degree field, or a
/// display label carrying a `/V`, `/IV` or `/VI` suffix.
pub fn is_secondary_dominant(chord: &Chord) -> bool {
    if chord
        .of_degree
        .as_deref()
        .is_some_and(|of| !of.trim().is_empty())
    {
        return true;
    }
    chord.label.as_deref().is_some_and(|label| {
        let upper = label.trim().to_uppercase();
        upper.ends_with("/V") || upper.ends_with("/IV") || upper.ends_with("/VI")
    })
}

/// True iff one of the two degrees is the primary degree of some function and
/// the other is one of that function's parallels *whose own principal function
/// is that same function*.
///
/// The directional constraint matters: `III` lists `T` first, so it counts as
/// a parallel of `I` but never as a substitute for `V`, even though the
/// dominant parallel table mentions it.
pub fn is_principal_parallel_pair(a: Degree, b: Degree) -> bool {
    if a == b {
        return false;
    }
    HarmonicFunction::ALL.iter().any(|&function| {
        let pairs = |primary: Degree, parallel: Degree| {
            primary == function.primary_degree()
                && function.parallel_degrees().contains(&parallel)
                && parallel.principal_function() == function
        };
        pairs(a, b) || pairs(b, a)
    })
}

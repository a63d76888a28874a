//! # Chord Model & Normalizer
//!
//! This module defines the chord annotation as the host application stores it,
//! plus the normalization rules every other module relies on.
//!
//! ## The annotation shape
//! A [`Chord`] is a permissive bag of optional fields: the authoring UI lets a
//! teacher fill in as much or as little as they want (a bare function, a degree
//! with no figure, a special root, a cadence label on its own). The engine
//! never mutates an annotation; it only derives values from it.
//!
//! ## Normalization rules
//! - **Degree**: case-insensitive Roman numerals. Resolution order is the
//!   `degree` field, then the `root` field, then a leading Roman-numeral
//!   prefix of the free-text `label` (longest prefix wins). First hit wins.
//! - **Figure**: `"5"` means fundamental position and is equivalent to no
//!   figure at all; both normalize to `None` before any comparison.
//! - **Cadence**: trimmed and lower-cased, with two known synonym pairs:
//!   `deceptive` ≡ `rompue` and `half` ≡ `demi-cadence`.
//!
//! ## Chord keys
//! [`Chord::key`] derives the canonical short identifier used by the
//! difficulty table (e.g. `"V7"`, `"N6"`, `"cad64"`). The `I` chord in 6/4
//! position is the one ambiguous case: its [`SixFourVariant`] decides whether
//! it behaves as a passing `V64`, a cadential `cad64`, or a literal `I64`.
//!
//! ## Related Modules
//! - `function` - harmonic-function tables over these types
//! - `validate` - grades one annotation against another
//! - `qcm` - renders annotations as option labels

use serde::{Deserialize, Serialize};

/// Roman-numeral scale degree, `I` through `VII`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Degree {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
}

/// All degrees in scale order.
pub const DEGREES: [Degree; 7] = [
    Degree::I,
    Degree::II,
    Degree::III,
    Degree::IV,
    Degree::V,
    Degree::VI,
    Degree::VII,
];

impl Degree {
    /// Parse a Roman numeral, case-insensitively. Whitespace is ignored.
    pub fn parse(s: &str) -> Option<Degree> {
        match s.trim().to_uppercase().as_str() {
            "I" => Some(Degree::I),
            "II" => Some(Degree::II),
            "III" => Some(Degree::III),
            "IV" => Some(Degree::IV),
            "V" => Some(Degree::V),
            "VI" => Some(Degree::VI),
            "VII" => Some(Degree::VII),
            _ => None,
        }
    }

    /// Extract a leading Roman-numeral prefix from a free-text label.
    ///
    /// Longest prefix wins, so `"VII6"` resolves to `VII` rather than `V`.
    pub fn parse_prefix(s: &str) -> Option<Degree> {
        let upper = s.trim().to_uppercase();
        // Ordered longest-first so e.g. "III" is not read as "II".
        const PREFIXES: [(&str, Degree); 7] = [
            ("VII", Degree::VII),
            ("III", Degree::III),
            ("VI", Degree::VI),
            ("IV", Degree::IV),
            ("II", Degree::II),
            ("V", Degree::V),
            ("I", Degree::I),
        ];
        PREFIXES
            .iter()
            .find(|(prefix, _)| upper.starts_with(prefix))
            .map(|(_, degree)| *degree)
    }

    /// Canonical uppercase spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Degree::I => "I",
            Degree::II => "II",
            Degree::III => "III",
            Degree::IV => "IV",
            Degree::V => "V",
            Degree::VI => "VI",
            Degree::VII => "VII",
        }
    }
}

/// Accidental attached to a chord root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    Flat,
    Sharp,
    Natural,
}

impl Accidental {
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Flat => "♭",
            Accidental::Sharp => "♯",
            Accidental::Natural => "♮",
        }
    }
}

/// Figured-bass inversion code.
///
/// Fundamental position is deliberately *not* a variant: `"5"` and an absent
/// figure mean the same thing and both normalize to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Figure {
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "64")]
    SixFour,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "65")]
    SixFive,
    #[serde(rename = "43")]
    FourThree,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "11")]
    Eleven,
    #[serde(rename = "13")]
    Thirteen,
    #[serde(rename = "54")]
    FiveFour,
}

impl Figure {
    /// Normalize a raw figure field. `"5"`, empty and absent all mean
    /// fundamental position and yield `None`; unknown codes also yield `None`.
    pub fn normalize(figure: Option<&str>) -> Option<Figure> {
        match figure?.trim() {
            "" | "5" => None,
            "6" => Some(Figure::Six),
            "64" => Some(Figure::SixFour),
            "7" => Some(Figure::Seven),
            "65" => Some(Figure::SixFive),
            "43" => Some(Figure::FourThree),
            "2" => Some(Figure::Two),
            "9" => Some(Figure::Nine),
            "11" => Some(Figure::Eleven),
            "13" => Some(Figure::Thirteen),
            "54" => Some(Figure::FiveFour),
            _ => None,
        }
    }

    /// Compact code as stored in annotations and chord keys.
    pub fn as_code(self) -> &'static str {
        match self {
            Figure::Six => "6",
            Figure::SixFour => "64",
            Figure::Seven => "7",
            Figure::SixFive => "65",
            Figure::FourThree => "43",
            Figure::Two => "2",
            Figure::Nine => "9",
            Figure::Eleven => "11",
            Figure::Thirteen => "13",
            Figure::FiveFour => "54",
        }
    }

    /// Display form: compound figures are slash-rendered (`64` → `6/4`).
    pub fn display_label(self) -> &'static str {
        match self {
            Figure::SixFour => "6/4",
            Figure::SixFive => "6/5",
            Figure::FourThree => "4/3",
            Figure::FiveFour => "5/4",
            other => other.as_code(),
        }
    }
}

/// Chromatic chord identified by its conventional name rather than a degree.
/// Mutually exclusive with a degree as the chord's root identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialRoot {
    #[serde(rename = "N")]
    Neapolitan,
    #[serde(rename = "It")]
    ItalianSixth,
    #[serde(rename = "Fr")]
    FrenchSixth,
    #[serde(rename = "Gr")]
    GermanSixth,
}

impl SpecialRoot {
    /// Canonical chord key for the lookup tables.
    pub fn key(self) -> &'static str {
        match self {
            SpecialRoot::Neapolitan => "N6",
            SpecialRoot::ItalianSixth => "It",
            SpecialRoot::FrenchSixth => "Fr",
            SpecialRoot::GermanSixth => "Gr",
        }
    }

    /// Display label used in option lists.
    pub fn label(self) -> &'static str {
        match self {
            SpecialRoot::Neapolitan => "II♭6",
            SpecialRoot::ItalianSixth => "It+6",
            SpecialRoot::FrenchSixth => "Fr+6",
            SpecialRoot::GermanSixth => "Gr+6",
        }
    }
}

/// Harmonic role a chord plays in a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmonicFunction {
    T,
    SD,
    D,
}

impl HarmonicFunction {
    pub fn parse(s: &str) -> Option<HarmonicFunction> {
        match s.trim().to_uppercase().as_str() {
            "T" => Some(HarmonicFunction::T),
            "SD" => Some(HarmonicFunction::SD),
            "D" => Some(HarmonicFunction::D),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HarmonicFunction::T => "T",
            HarmonicFunction::SD => "SD",
            HarmonicFunction::D => "D",
        }
    }
}

/// Disambiguation of a `I` chord in 6/4 position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SixFourVariant {
    /// Functions as a passing `V64`.
    Passing,
    /// Cadential 6/4, dominant function.
    Cadential,
}

/// Display-only degree spelling preference. Never consulted by scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeMode {
    #[default]
    Generic,
    Major,
    Minor,
}

/// A chord's root identity, derived once and matched exhaustively.
///
/// At most one of `degree`/`specialRoot` can act as the root; a standalone
/// function selection is a valid partial answer of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootIdentity {
    Degree(Degree),
    Special(SpecialRoot),
    FunctionOnly(HarmonicFunction),
}

/// One harmonic-analysis annotation, exactly as the host application stores
/// it. Every field is optional; the engine treats the value as immutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Chord {
    /// Roman-numeral degree, any case.
    pub degree: Option<String>,
    /// Legacy root field, consulted when `degree` is absent.
    pub root: Option<String>,
    /// Free-text display label; a leading Roman numeral is the last-resort
    /// degree source and the `/V`-style suffix marks secondary dominants.
    pub label: Option<String>,
    pub accidental: Option<Accidental>,
    /// Free-form quality marker, notably `°` and `+`.
    pub quality: Option<String>,
    /// Raw figured-bass code; see [`Figure::normalize`].
    pub figure: Option<String>,
    /// Modal-borrowing flag.
    pub is_borrowed: bool,
    pub special_root: Option<SpecialRoot>,
    /// Standalone function answer, usable without a precise degree.
    pub selected_function: Option<HarmonicFunction>,
    /// Raw cadence label; see [`normalize_cadence`].
    pub cadence: Option<String>,
    /// Only meaningful when the chord is `I` in 6/4 position.
    pub six_four_variant: Option<SixFourVariant>,
    /// Pedal/bass degree distinct from the upper structure.
    pub pedal_degree: Option<String>,
    /// Explicit tonicized degree of a secondary dominant (e.g. `"V"`).
    pub of_degree: Option<String>,
    /// Display preference; ignored by the validator and the QCM builder.
    pub degree_mode: Option<DegreeMode>,
}

impl Chord {
    /// Resolve the chord's degree: `degree` field, else `root` field, else a
    /// leading Roman-numeral prefix of the display label. First hit wins.
    pub fn resolved_degree(&self) -> Option<Degree> {
        if let Some(d) = self.degree.as_deref().and_then(Degree::parse) {
            return Some(d);
        }
        if let Some(d) = self.root.as_deref().and_then(Degree::parse) {
            return Some(d);
        }
        self.label.as_deref().and_then(Degree::parse_prefix)
    }

    /// Normalized figure; `None` is fundamental position.
    pub fn normalized_figure(&self) -> Option<Figure> {
        Figure::normalize(self.figure.as_deref())
    }

    /// Normalized cadence label, if any.
    pub fn normalized_cadence(&self) -> Option<String> {
        normalize_cadence(self.cadence.as_deref())
    }

    /// True for a `I` chord in 6/4 position, whatever its variant.
    pub fn is_six_four_tonic(&self) -> bool {
        self.resolved_degree() == Some(Degree::I)
            && self.normalized_figure() == Some(Figure::SixFour)
    }

    /// Derive the chord's root identity. Special roots take precedence over a
    /// degree; a standalone function selection comes last.
    pub fn root_identity(&self) -> Option<RootIdentity> {
        if let Some(special) = self.special_root {
            return Some(RootIdentity::Special(special));
        }
        if let Some(degree) = self.resolved_degree() {
            return Some(RootIdentity::Degree(degree));
        }
        self.selected_function.map(RootIdentity::FunctionOnly)
    }

    /// Canonical chord key (e.g. `"V7"`, `"N6"`, `"cad64"`).
    ///
    /// Returns `None` when the chord has no degree and no special root.
    pub fn key(&self) -> Option<String> {
        match self.root_identity()? {
            RootIdentity::Special(special) => Some(special.key().to_string()),
            RootIdentity::Degree(degree) => {
                if self.is_six_four_tonic() {
                    let key = match self.six_four_variant {
                        Some(SixFourVariant::Passing) => "V64",
                        Some(SixFourVariant::Cadential) => "cad64",
                        None => "I64",
                    };
                    return Some(key.to_string());
                }
                match self.normalized_figure() {
                    Some(figure) => Some(format!("{}{}", degree.as_str(), figure.as_code())),
                    None => Some(degree.as_str().to_string()),
                }
            }
            RootIdentity::FunctionOnly(_) => None,
        }
    }
}

/// Normalize a cadence label: trim, lower-case, and fold the two known
/// synonym pairs (`deceptive` ≡ `rompue`, `half` ≡ `demi-cadence`).
pub fn normalize_cadence(cadence: Option<&str>) -> Option<String> {
    let lowered = cadence?.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let canonical = match lowered.as_str() {
        "deceptive" => "rompue",
        "half" => "demi-cadence",
        other => other,
    };
    Some(canonical.to_string())
}

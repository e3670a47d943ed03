//! Material naming rules.
//!
//! A material identifier is a base name optionally followed by one of a
//! fixed set of suffixes (`_Metal`, `_Blend`, `_Transparent`, ...). The
//! suffix selects the export variant, and therefore which packed textures
//! are produced. The base must be non-empty, must not start with a digit,
//! and may only contain letters and digits.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use texpack_spec::naming::{classify_variant, generate_compliant_name, validate_name, SuffixVariant};
//!
//! assert_eq!(classify_variant("Rock_MaskedVXM"), SuffixVariant::MaskedVxm);
//! assert!(validate_name("9Wood").is_err());
//!
//! let existing: HashSet<String> = ["Wood".to_string()].into_iter().collect();
//! assert_eq!(generate_compliant_name("Wood", &existing), "Wood1");
//! ```

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

/// Prepended to a cleaned base name that would otherwise start with a digit.
pub const COMPLIANT_PREFIX: &str = "Mat";

/// Used when nothing alphanumeric survives cleaning.
pub const DEFAULT_BASE_NAME: &str = "Material";

/// Characters that cannot appear in output file names.
const FILE_NAME_RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Export profile derived from a material identifier's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuffixVariant {
    /// No recognized suffix.
    Standard,
    Metal,
    Blend,
    Transparent,
    #[serde(rename = "VXM")]
    Vxm,
    #[serde(rename = "MaskedVXM")]
    MaskedVxm,
    Masked,
    #[serde(rename = "VXC")]
    Vxc,
    #[serde(rename = "UIO")]
    Uio,
    Unlit,
}

/// Recognized suffixes in match order.
///
/// `_MaskedVXM` precedes `_Masked`; the first entry the identifier ends
/// with wins.
pub const SUFFIXES: &[(&str, SuffixVariant)] = &[
    ("_Metal", SuffixVariant::Metal),
    ("_Blend", SuffixVariant::Blend),
    ("_Transparent", SuffixVariant::Transparent),
    ("_VXM", SuffixVariant::Vxm),
    ("_MaskedVXM", SuffixVariant::MaskedVxm),
    ("_Masked", SuffixVariant::Masked),
    ("_VXC", SuffixVariant::Vxc),
    ("_UIO", SuffixVariant::Uio),
    ("_Unlit", SuffixVariant::Unlit),
];

impl SuffixVariant {
    /// All variants, `Standard` first.
    pub const ALL: [SuffixVariant; 10] = [
        SuffixVariant::Standard,
        SuffixVariant::Metal,
        SuffixVariant::Blend,
        SuffixVariant::Transparent,
        SuffixVariant::Vxm,
        SuffixVariant::MaskedVxm,
        SuffixVariant::Masked,
        SuffixVariant::Vxc,
        SuffixVariant::Uio,
        SuffixVariant::Unlit,
    ];

    /// The identifier suffix for this variant, `None` for `Standard`.
    pub fn suffix(&self) -> Option<&'static str> {
        SUFFIXES
            .iter()
            .find(|(_, variant)| variant == self)
            .map(|(suffix, _)| *suffix)
    }

    /// Whether the suffix is removed when deriving output file names.
    ///
    /// `_Unlit` materials keep their suffix in the file name.
    pub fn strips_suffix_from_file_name(&self) -> bool {
        !matches!(self, SuffixVariant::Standard | SuffixVariant::Unlit)
    }

    /// Whether this variant's layout consumes ambient occlusion and
    /// emission bakes (`_MEO` capable).
    pub fn uses_occlusion(&self) -> bool {
        matches!(
            self,
            SuffixVariant::Standard | SuffixVariant::Vxm | SuffixVariant::Unlit
        )
    }

    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            SuffixVariant::Standard => "Standard",
            SuffixVariant::Metal => "Metal",
            SuffixVariant::Blend => "Blend",
            SuffixVariant::Transparent => "Transparent",
            SuffixVariant::Vxm => "VXM",
            SuffixVariant::MaskedVxm => "MaskedVXM",
            SuffixVariant::Masked => "Masked",
            SuffixVariant::Vxc => "VXC",
            SuffixVariant::Uio => "UIO",
            SuffixVariant::Unlit => "Unlit",
        }
    }
}

impl fmt::Display for SuffixVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An identifier split into base name and recognized suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitName<'a> {
    /// Everything before the suffix.
    pub base: &'a str,
    /// The matched suffix, empty for `Standard`.
    pub suffix: &'a str,
    /// Variant selected by the suffix.
    pub variant: SuffixVariant,
}

/// Split an identifier into base and suffix.
pub fn split_suffix(name: &str) -> SplitName<'_> {
    for (suffix, variant) in SUFFIXES {
        if let Some(base) = name.strip_suffix(suffix) {
            return SplitName {
                base,
                suffix: &name[base.len()..],
                variant: *variant,
            };
        }
    }
    SplitName {
        base: name,
        suffix: "",
        variant: SuffixVariant::Standard,
    }
}

/// Derive the export variant from an identifier.
pub fn classify_variant(name: &str) -> SuffixVariant {
    split_suffix(name).variant
}

/// Check an identifier against the naming rules.
///
/// Returns the variant on success.
pub fn validate_name(name: &str) -> Result<SuffixVariant, NameError> {
    let split = split_suffix(name);

    let first = split.base.chars().next().ok_or(NameError::EmptyBase)?;
    if first.is_numeric() {
        return Err(NameError::LeadingDigit(first));
    }

    let invalid: BTreeSet<char> = split
        .base
        .chars()
        .filter(|c| !c.is_alphanumeric())
        .collect();
    if !invalid.is_empty() {
        return Err(NameError::InvalidChars(invalid));
    }

    Ok(split.variant)
}

/// Build a compliant identifier from `name` that is not in `existing`.
///
/// The suffix is preserved. Invalid characters are dropped from the base,
/// a base starting with a digit gets [`COMPLIANT_PREFIX`], and an empty
/// base becomes [`DEFAULT_BASE_NAME`]. On collision an increasing counter
/// (from 1) is inserted before the suffix.
pub fn generate_compliant_name(name: &str, existing: &HashSet<String>) -> String {
    let split = split_suffix(name);

    let mut cleaned: String = split.base.chars().filter(|c| c.is_alphanumeric()).collect();
    if cleaned.chars().next().is_some_and(char::is_numeric) {
        cleaned.insert_str(0, COMPLIANT_PREFIX);
    }
    if cleaned.is_empty() {
        cleaned.push_str(DEFAULT_BASE_NAME);
    }

    let candidate = format!("{}{}", cleaned, split.suffix);
    if !existing.contains(&candidate) {
        return candidate;
    }

    (1u64..)
        .map(|counter| format!("{}{}{}", cleaned, counter, split.suffix))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or(candidate)
}

/// Replace characters that are reserved in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if FILE_NAME_RESERVED.contains(&c) { '_' } else { c })
        .collect()
}

/// Base file name for a material's packed outputs.
///
/// Output files are named `{base}{output_suffix}.png`.
pub fn output_base_name(name: &str) -> String {
    let split = split_suffix(name);
    if split.variant.strips_suffix_from_file_name() {
        sanitize_file_name(split.base)
    } else {
        sanitize_file_name(name)
    }
}

/// An identifier that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidName {
    pub identifier: String,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: NameError,
}

fn serialize_reason<S: serde::Serializer>(reason: &NameError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&reason.to_string())
}

/// Validate every identifier, returning the invalid ones in input order.
pub fn audit_names<'a, I>(names: I) -> Vec<InvalidName>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            validate_name(name).err().map(|reason| InvalidName {
                identifier: name.to_string(),
                reason,
            })
        })
        .collect()
}

/// A planned identifier change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Compute compliant replacements for every invalid identifier.
///
/// The used-name set starts as all of `names`; each rename releases the
/// old identifier and reserves the new one, so planned names never
/// collide with each other or with untouched identifiers.
pub fn plan_renames(names: &[String]) -> Vec<Rename> {
    let mut used: HashSet<String> = names.iter().cloned().collect();
    let mut renames = Vec::new();

    for invalid in audit_names(names.iter().map(String::as_str)) {
        let to = generate_compliant_name(&invalid.identifier, &used);
        used.remove(&invalid.identifier);
        used.insert(to.clone());
        renames.push(Rename {
            from: invalid.identifier,
            to,
        });
    }

    renames
}

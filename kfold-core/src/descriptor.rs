//! Fold descriptors handed to downstream orchestration

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of a fold a location holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Training subset
    Train,
    /// Validation subset
    Validation,
}

impl Variant {
    /// Name used in output locations
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the fold with the given ordinal
pub fn fold_name(ordinal: usize) -> String {
    format!("fold{ordinal}")
}

/// Output record describing one materialized fold.
///
/// Counts are serialized as strings because downstream consumers substitute
/// them into text templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldDescriptor {
    /// `fold` followed by the fold ordinal
    pub fold_name: String,
    /// Location of the training records
    pub train: String,
    /// Location of the validation records
    pub validation: String,
    /// Number of training records
    #[serde(with = "string_encoded")]
    pub num_training_samples: usize,
    /// Number of validation records
    #[serde(with = "string_encoded")]
    pub num_validation_samples: usize,
    /// Distinct classes in the full dataset, 0 when unknown
    #[serde(with = "string_encoded")]
    pub num_classes: usize,
}

impl FoldDescriptor {
    /// Fold ordinal parsed back out of `fold_name`
    pub fn ordinal(&self) -> Option<usize> {
        self.fold_name.strip_prefix("fold")?.parse().ok()
    }

    /// Location for the given side of the fold
    pub fn location(&self, variant: Variant) -> &str {
        match variant {
            Variant::Train => &self.train,
            Variant::Validation => &self.validation,
        }
    }
}

mod string_encoded {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &usize, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        struct CountVisitor;

        impl Visitor<'_> for CountVisitor {
            type Value = usize;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or its decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<usize, E> {
                usize::try_from(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<usize, E> {
                usize::try_from(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<usize, E> {
                v.trim().parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(CountVisitor)
    }
}

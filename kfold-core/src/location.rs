//! Output location construction
//!
//! Fold outputs are named `{prefix}/{root}-fold{ordinal}-{variant}{ext}`
//! where `root` and `ext` come from the input basename.

use crate::descriptor::Variant;

/// Directory under the job output prefix that receives fold files
pub const SPLITS_DIR: &str = "splits";

/// Maps a fold ordinal and variant to an output location.
///
/// Implementations must be injective over `(ordinal, variant)`.
pub trait OutputLocator {
    /// Location for one side of one fold
    fn locate(&self, ordinal: usize, variant: Variant) -> String;
}

impl<F> OutputLocator for F
where
    F: Fn(usize, Variant) -> String,
{
    fn locate(&self, ordinal: usize, variant: Variant) -> String {
        self(ordinal, variant)
    }
}

/// Join a prefix and a name with exactly one `/` between them
pub fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else if prefix.ends_with('/') {
        format!("{prefix}{name}")
    } else {
        format!("{prefix}/{name}")
    }
}

/// Final path component of a location
pub fn basename(location: &str) -> &str {
    location.rsplit('/').next().unwrap_or(location)
}

/// Split a basename into root and extension (with its dot).
///
/// Leading dots never start an extension, so `.hidden` has none.
pub fn split_extension(basename: &str) -> (&str, &str) {
    let leading = basename.len() - basename.trim_start_matches('.').len();
    match basename[leading..].rfind('.') {
        Some(dot) => basename.split_at(leading + dot),
        None => (basename, ""),
    }
}

/// Location of one side of one fold for a dataset named `basename`
pub fn build_output_location(
    base_prefix: &str,
    basename: &str,
    ordinal: usize,
    variant: Variant,
) -> String {
    let (root, ext) = split_extension(basename);
    join(base_prefix, &format!("{root}-fold{ordinal}-{variant}{ext}"))
}

/// Locator for the fold files of one input dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLayout {
    prefix: String,
    basename: String,
}

impl SplitLayout {
    /// Layout writing into `prefix` directly
    pub fn new(prefix: impl Into<String>, basename: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            basename: basename.into(),
        }
    }

    /// Layout for `input_location`, writing under `{output_prefix}/splits`
    pub fn for_input(input_location: &str, output_prefix: &str) -> Self {
        Self::new(join(output_prefix, SPLITS_DIR), basename(input_location))
    }

    /// Directory receiving the fold files
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl OutputLocator for SplitLayout {
    fn locate(&self, ordinal: usize, variant: Variant) -> String {
        build_output_location(&self.prefix, &self.basename, ordinal, variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_case::test_case;

    #[test_case("data.jsonl", ("data", ".jsonl") ; "simple")]
    #[test_case("data.tar.gz", ("data.tar", ".gz") ; "last dot wins")]
    #[test_case("manifest", ("manifest", "") ; "no extension")]
    #[test_case(".hidden", (".hidden", "") ; "leading dot")]
    #[test_case("..odd.txt", ("..odd", ".txt") ; "leading dots then extension")]
    fn test_split_extension(name: &str, expected: (&str, &str)) {
        assert_eq!(split_extension(name), expected);
    }

    #[test]
    fn test_build_output_location() {
        assert_eq!(
            build_output_location("s3://b/out/splits", "train.manifest", 2, Variant::Validation),
            "s3://b/out/splits/train-fold2-validation.manifest"
        );
        assert_eq!(
            build_output_location("out/", "data", 0, Variant::Train),
            "out/data-fold0-train"
        );
    }

    #[test]
    fn test_layout_for_input() {
        let layout =
            SplitLayout::for_input("s3://bucket/datasets/cats.jsonl", "s3://bucket/jobs/run1");
        assert_eq!(layout.prefix(), "s3://bucket/jobs/run1/splits");
        assert_eq!(
            layout.locate(1, Variant::Train),
            "s3://bucket/jobs/run1/splits/cats-fold1-train.jsonl"
        );
    }

    #[test]
    fn test_layout_is_injective() {
        let layout = SplitLayout::new("p", "d.jsonl");
        let mut seen = HashSet::new();
        for ordinal in 0..120 {
            for variant in [Variant::Train, Variant::Validation] {
                assert!(seen.insert(layout.locate(ordinal, variant)));
            }
        }
    }

    #[test]
    fn test_closure_locator() {
        let locator = |ordinal: usize, variant: Variant| format!("mem://{ordinal}/{variant}");
        assert_eq!(locator.locate(4, Variant::Validation), "mem://4/validation");
    }
}

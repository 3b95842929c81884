//! Turning fold assignments into stored record subsets

use crate::cardinality::estimate_cardinality;
use crate::descriptor::{fold_name, FoldDescriptor, Variant};
use crate::error::{Error, Result};
use crate::location::OutputLocator;
use crate::partition::{FoldAssignment, KFold};
use crate::record::RecordSet;
use crate::store::RecordStore;

/// Write the train and validation subsets of one fold.
///
/// Both index lists are checked before anything is written, so an invalid
/// assignment leaves the store untouched.
pub fn materialize_fold<S, L>(
    store: &mut S,
    records: &RecordSet,
    assignment: &FoldAssignment,
    locator: &L,
    class_count: usize,
) -> Result<FoldDescriptor>
where
    S: RecordStore + ?Sized,
    L: OutputLocator + ?Sized,
{
    let train = records.select(&assignment.train)?;
    let validation = records.select(&assignment.validation)?;

    let train_location = locator.locate(assignment.ordinal, Variant::Train);
    let validation_location = locator.locate(assignment.ordinal, Variant::Validation);

    store.write_all_lines(&train_location, &train)?;
    store.write_all_lines(&validation_location, &validation)?;

    Ok(FoldDescriptor {
        fold_name: fold_name(assignment.ordinal),
        train: train_location,
        validation: validation_location,
        num_training_samples: train.len(),
        num_validation_samples: validation.len(),
        num_classes: class_count,
    })
}

/// Materialize every assignment in order.
///
/// Stops at the first failing fold and reports its ordinal; folds written
/// before it stay in the store.
pub fn materialize<S, L, I>(
    store: &mut S,
    records: &RecordSet,
    assignments: I,
    locator: &L,
    class_count: usize,
) -> Result<Vec<FoldDescriptor>>
where
    S: RecordStore + ?Sized,
    L: OutputLocator + ?Sized,
    I: IntoIterator<Item = FoldAssignment>,
{
    assignments
        .into_iter()
        .map(|assignment| {
            materialize_fold(store, records, &assignment, locator, class_count).map_err(|source| {
                Error::Fold {
                    ordinal: assignment.ordinal,
                    source: Box::new(source),
                }
            })
        })
        .collect()
}

/// Estimate cardinality, partition and materialize an in-memory record set
pub fn split_records<S, L>(
    store: &mut S,
    records: &RecordSet,
    kfold: &KFold,
    locator: &L,
) -> Result<Vec<FoldDescriptor>>
where
    S: RecordStore + ?Sized,
    L: OutputLocator + ?Sized,
{
    let folds = kfold.split(records.len())?;
    let class_count = estimate_cardinality(records);
    materialize(store, records, folds, locator, class_count)
}

/// Read `input_location` from `store` and split it into folds
pub fn split_location<S, L>(
    store: &mut S,
    input_location: &str,
    kfold: &KFold,
    locator: &L,
) -> Result<Vec<FoldDescriptor>>
where
    S: RecordStore + ?Sized,
    L: OutputLocator + ?Sized,
{
    kfold.validate()?;
    let records = store.read_all_lines(input_location)?;
    split_records(store, &records, kfold, locator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::SplitLayout;
    use crate::record::Record;
    use crate::store::MemoryRecordStore;

    /// Fails every write to locations containing `needle`
    struct FailingStore {
        inner: MemoryRecordStore,
        needle: &'static str,
    }

    impl RecordStore for FailingStore {
        fn read_all_lines(&self, location: &str) -> Result<RecordSet> {
            self.inner.read_all_lines(location)
        }

        fn write_all_lines(&mut self, location: &str, records: &[Record]) -> Result<()> {
            if location.contains(self.needle) {
                return Err(Error::storage(location, "disk full"));
            }
            self.inner.write_all_lines(location, records)
        }
    }

    fn labeled(n: usize) -> RecordSet {
        (0..n)
            .map(|i| format!("{{\"id\":{i},\"class\":\"c{}\"}}", i % 3))
            .collect()
    }

    #[test]
    fn test_descriptors_and_outputs() {
        let mut store = MemoryRecordStore::new();
        let records = labeled(10);
        let layout = SplitLayout::new("out", "data.jsonl");
        let kfold = KFold::new(5).unwrap().with_shuffle(false);

        let descriptors = split_records(&mut store, &records, &kfold, &layout).unwrap();

        assert_eq!(descriptors.len(), 5);
        assert_eq!(store.write_count(), 10);
        let first = &descriptors[0];
        assert_eq!(first.fold_name, "fold0");
        assert_eq!(first.train, "out/data-fold0-train.jsonl");
        assert_eq!(first.validation, "out/data-fold0-validation.jsonl");
        assert_eq!(first.num_training_samples, 8);
        assert_eq!(first.num_validation_samples, 2);
        assert_eq!(first.num_classes, 3);
        assert_eq!(
            store.text(&first.validation),
            Some("{\"id\":0,\"class\":\"c0\"}\n{\"id\":1,\"class\":\"c1\"}\n")
        );
    }

    #[test]
    fn test_slices_follow_permuted_order() {
        let mut store = MemoryRecordStore::new();
        let records: RecordSet = (0..6).map(|i| format!("r{i}")).collect();
        let assignment = FoldAssignment {
            ordinal: 0,
            train: vec![5, 1, 3, 0],
            validation: vec![4, 2],
        };
        let locator = |ordinal: usize, variant: Variant| format!("{ordinal}-{variant}");
        materialize_fold(&mut store, &records, &assignment, &locator, 0).unwrap();
        assert_eq!(store.text("0-train"), Some("r5\nr1\nr3\nr0\n"));
        assert_eq!(store.text("0-validation"), Some("r4\nr2\n"));
    }

    #[test]
    fn test_empty_validation_fold_writes_empty_file() {
        let mut store = MemoryRecordStore::new();
        let records = labeled(2);
        let layout = SplitLayout::new("out", "d.jsonl");
        let kfold = KFold::new(3).unwrap();

        let descriptors = split_records(&mut store, &records, &kfold, &layout).unwrap();

        let last = &descriptors[2];
        assert_eq!(last.num_validation_samples, 0);
        assert_eq!(last.num_training_samples, 2);
        assert_eq!(store.text(&last.validation), Some(""));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let records = labeled(23);
        let layout = SplitLayout::new("out", "d.jsonl");
        let kfold = KFold::new(4).unwrap().with_seed(99);

        let mut first = MemoryRecordStore::new();
        let a = split_records(&mut first, &records, &kfold, &layout).unwrap();
        let mut second = first.clone();
        let b = split_records(&mut second, &records, &kfold, &layout).unwrap();

        assert_eq!(a, b);
        for location in first.locations() {
            assert_eq!(first.text(location), second.text(location));
        }
        assert_eq!(second.write_count(), 16);
    }

    #[test]
    fn test_failure_reports_fold_and_keeps_earlier_writes() {
        let mut store = FailingStore {
            inner: MemoryRecordStore::new(),
            needle: "fold2-validation",
        };
        let records = labeled(12);
        let layout = SplitLayout::new("out", "d.jsonl");
        let kfold = KFold::new(4).unwrap();

        let err = split_records(&mut store, &records, &kfold, &layout).unwrap_err();

        match &err {
            Error::Fold { ordinal, source } => {
                assert_eq!(*ordinal, 2);
                assert!(source.is_storage());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.inner.text("out/d-fold0-train.jsonl").is_some());
        assert!(store.inner.text("out/d-fold1-validation.jsonl").is_some());
        assert!(store.inner.text("out/d-fold3-train.jsonl").is_none());
    }

    #[test]
    fn test_invalid_assignment_writes_nothing() {
        let mut store = MemoryRecordStore::new();
        let records = labeled(3);
        let assignment = FoldAssignment {
            ordinal: 7,
            train: vec![0, 1],
            validation: vec![9],
        };
        let layout = SplitLayout::new("out", "d.jsonl");
        let err = materialize(&mut store, &records, vec![assignment], &layout, 0).unwrap_err();
        assert!(matches!(err, Error::Fold { ordinal: 7, .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_split_location_reads_input() {
        let mut store = MemoryRecordStore::new();
        store.insert_text("in/d.jsonl", "{\"class\":\"a\"}\n{\"class\":\"b\"}\nnot json\n");
        let layout = SplitLayout::for_input("in/d.jsonl", "job");
        let kfold = KFold::new(3).unwrap();

        let descriptors = split_location(&mut store, "in/d.jsonl", &kfold, &layout).unwrap();

        assert_eq!(descriptors.len(), 3);
        assert!(descriptors.iter().all(|d| d.num_classes == 0));
        assert!(descriptors
            .iter()
            .all(|d| d.num_training_samples == 2 && d.num_validation_samples == 1));
    }

    #[test]
    fn test_split_location_rejects_zero_folds_before_reading() {
        let mut store = MemoryRecordStore::new();
        let kfold = KFold {
            n_splits: 0,
            ..KFold::default()
        };
        let layout = SplitLayout::new("out", "d");
        let err = split_location(&mut store, "missing", &kfold, &layout).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}

//! Dataset splitter step

use kfold_core::{split_location, RecordStore, SplitLayout};
use tracing::{debug, info};

use crate::config::Event;
use crate::error::{Error, Result};

/// Split the event's input dataset into folds and attach their descriptors.
///
/// Fold files land under `{output_prefix}/splits`.
pub fn split_dataset<S>(mut event: Event, store: &mut S) -> Result<Event>
where
    S: RecordStore + ?Sized,
{
    let cv = event
        .crossvalidation
        .as_ref()
        .ok_or(Error::MissingField("crossvalidation"))?;
    let kfold = cv.kfold()?;

    let job = &event.job_config;
    if job.input_path.is_empty() {
        return Err(Error::MissingField("job_config.input_path"));
    }
    let layout = SplitLayout::for_input(&job.input_path, &job.output_prefix);
    info!(
        n_splits = kfold.n_splits,
        random_state = kfold.seed,
        shuffle = kfold.shuffle,
        input_path = %job.input_path,
        splits_prefix = %layout.prefix(),
        "splitting dataset"
    );

    let splits = split_location(store, &job.input_path, &kfold, &layout)?;
    for split in &splits {
        info!(
            fold = %split.fold_name,
            train = split.num_training_samples,
            validation = split.num_validation_samples,
            classes = split.num_classes,
            "materialized fold"
        );
    }

    event.splits = Some(splits);
    debug!(event = %event.to_json()?, "returning event");
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrossValidationConfig, JobConfig};
    use kfold_core::MemoryRecordStore;

    fn event(n_splits: i64) -> Event {
        Event {
            job_config: JobConfig {
                name: "cats".into(),
                input_path: "s3://b/data/cats.jsonl".into(),
                output_prefix: "s3://b/jobs/run1".into(),
                ..JobConfig::default()
            },
            crossvalidation: Some(CrossValidationConfig::new(n_splits)),
            ..Event::default()
        }
    }

    fn store_with(lines: usize) -> MemoryRecordStore {
        let mut store = MemoryRecordStore::new();
        let text: String = (0..lines)
            .map(|i| format!("{{\"source-ref\":\"s3://b/img{i}.jpg\",\"class\":{}}}\n", i % 2))
            .collect();
        store.insert_text("s3://b/data/cats.jsonl", text);
        store
    }

    #[test]
    fn test_splits_attached() {
        let mut store = store_with(11);
        let out = split_dataset(event(3), &mut store).unwrap();

        let splits = out.splits.unwrap();
        assert_eq!(splits.len(), 3);
        assert_eq!(splits[0].train, "s3://b/jobs/run1/splits/cats-fold0-train.jsonl");
        assert_eq!(
            splits[2].validation,
            "s3://b/jobs/run1/splits/cats-fold2-validation.jsonl"
        );
        let validation: Vec<usize> = splits.iter().map(|s| s.num_validation_samples).collect();
        assert_eq!(validation, vec![4, 4, 3]);
        assert!(splits.iter().all(|s| s.num_classes == 2));
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_missing_crossvalidation() {
        let mut input = event(3);
        input.crossvalidation = None;
        let err = split_dataset(input, &mut store_with(3)).unwrap_err();
        assert!(matches!(err, Error::MissingField("crossvalidation")));
    }

    #[test]
    fn test_non_positive_folds_rejected_before_reading() {
        let mut store = MemoryRecordStore::new();
        let err = split_dataset(event(0), &mut store).unwrap_err();
        assert!(matches!(err, Error::InputValidation(_)));
    }

    #[test]
    fn test_missing_input_is_storage_failure() {
        let mut store = MemoryRecordStore::new();
        match split_dataset(event(2), &mut store).unwrap_err() {
            Error::Core(core) => assert!(core.is_storage()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

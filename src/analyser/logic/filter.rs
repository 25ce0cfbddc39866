use super::types::{Dataset, FilterSpec};

/// Keeps the records matching `spec`, in their original order.
///
/// The input is left untouched; the result shares its records. An empty
/// result is a valid outcome.
pub fn filter(dataset: &Dataset, spec: &FilterSpec) -> Dataset {
    if spec.is_all() {
        return dataset.clone();
    }

    let records = dataset
        .records()
        .iter()
        .filter(|record| spec.matches(record))
        .cloned()
        .collect::<Vec<_>>();

    tracing::info!(
        kept = records.len(),
        total = dataset.len(),
        month = ?spec.month(),
        day = ?spec.day(),
        "Applied trip filter"
    );

    Dataset::from_shared(records, dataset.fields())
}

//! Stratified train/test split.
//!
//! Each class is shuffled and split on its own with linfa's dataset
//! utilities, so the test set keeps the class proportions of the full data.

use linfa::DatasetBase;
use ndarray::{concatenate, ArrayView1, ArrayView2, Axis, ShapeError};
use rand::Rng;
use std::collections::BTreeSet;

use crate::dataset::ClassDataset;

/// Split `data` so that about `test_size` of every class lands in the test
/// set. `test_size` must lie strictly between 0 and 1.
pub fn stratified_split<R: Rng>(
    data: &ClassDataset,
    test_size: f64,
    rng: &mut R,
) -> Result<(ClassDataset, ClassDataset), ShapeError> {
    let train_ratio = (1.0 - test_size) as f32;
    let classes: BTreeSet<usize> = data.targets().iter().copied().collect();

    let mut train_parts = Vec::with_capacity(classes.len());
    let mut test_parts = Vec::with_capacity(classes.len());
    for class in classes {
        let rows: Vec<usize> = data
            .targets()
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == class)
            .map(|(row, _)| row)
            .collect();
        let members = DatasetBase::new(
            data.records().select(Axis(0), &rows),
            data.targets().select(Axis(0), &rows),
        );

        let (train, test) = members.shuffle(rng).split_with_ratio(train_ratio);
        train_parts.push(train);
        test_parts.push(test);
    }

    Ok((stack(&train_parts)?, stack(&test_parts)?))
}

fn stack(parts: &[ClassDataset]) -> Result<ClassDataset, ShapeError> {
    let records: Vec<ArrayView2<'_, f64>> = parts.iter().map(|part| part.records().view()).collect();
    let targets: Vec<ArrayView1<'_, usize>> = parts.iter().map(|part| part.targets().view()).collect();
    Ok(DatasetBase::new(
        concatenate(Axis(0), &records)?,
        concatenate(Axis(0), &targets)?,
    ))
}

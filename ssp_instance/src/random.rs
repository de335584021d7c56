use rand::Rng;

use super::{ElementOrder, Instance, InstanceError};

/// Smallest size accepted by [`generate`].
pub const MIN_RANDOM_SIZE: i64 = 3;

/// Generates the instance `[1, 2, ..., size]` with a target that is known to be reachable.
///
/// The target always contains the first element; every other element is added with
/// probability one half. The elements stay in ascending order.
pub fn generate<R: Rng + ?Sized>(size: i64, rng: &mut R) -> Result<Instance, InstanceError> {
    if size < MIN_RANDOM_SIZE {
        return Err(InstanceError::InvalidSize(size));
    }

    let elements: Vec<i64> = (1..=size).collect();
    let mut target = elements[0];
    for element in &elements[1..] {
        if rng.gen_bool(0.5) {
            target += element;
        }
    }
    tracing::debug!(size, target, "generated random instance");

    Ok(Instance::new(elements, target, ElementOrder::AsGiven))
}

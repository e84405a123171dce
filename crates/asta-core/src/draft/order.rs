// Reorder primitive shared by the bid, role and preference lists.

use super::MutationError;

/// Move the element at `from` to position `to`, shifting everything in
/// between by one slot.
///
/// Returns a new vector; the input is never modified. `from == to` yields an
/// equal copy. Both indices must be in bounds.
pub fn reorder<T: Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>, MutationError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(MutationError::IndexOutOfRange { index, len });
        }
    }

    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Ok(moved)
}

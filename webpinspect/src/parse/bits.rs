use num_traits::PrimInt;

/// Mask `value` with the union of the single-bit masks at `indices`.
///
/// The result is left at its original bit position; it is **not** shifted down to bit 0. Call sites needing a dense
/// field must shift right by the lowest index themselves, e.g. `extract_bits(flags, &[2, 3]) >> 2`.
pub fn extract_bits<T: PrimInt>(value: T, indices: &[usize]) -> T {
    let mask = indices.iter().fold(T::zero(), |mask, &index| mask | (T::one() << index));
    value & mask
}

/// Ascending insertion sort
///
/// Inputs are small (a few dozen distances, one median per candidate), so the
/// quadratic worst case never matters. Equal values keep their relative order.
pub struct Sorter;

impl Sorter {
    /// Sort `values` ascending in place and hand the slice back for chaining.
    /// Comparisons involving NaN are false, so NaN never moves left and never panics.
    pub fn sort<T: PartialOrd + Copy>(values: &mut [T]) -> &mut [T] {
        for i in 1..values.len() {
            let key = values[i];
            let mut j = i;
            while j > 0 && key < values[j - 1] {
                values[j] = values[j - 1];
                j -= 1;
            }
            values[j] = key;
        }
        values
    }

    pub fn is_sorted<T: PartialOrd>(values: &[T]) -> bool {
        values.windows(2).all(|w| w[0] <= w[1])
    }
}

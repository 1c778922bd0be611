use std::ops::RangeInclusive;

/// The narrow contract that simulation code draws through.
///
/// Consumers such as path generators hold a `&mut dyn RandomStream` and never
/// see seeds or generator state. Every call advances the underlying
/// generator; nothing is cached.
pub trait RandomStream {
    /// Rewind to the start of the stream (substream 0).
    fn reset_start_stream(&mut self);

    /// Rewind to the start of the current substream.
    fn reset_start_substream(&mut self);

    /// Move to the start of the following substream.
    fn reset_next_substream(&mut self);

    /// Uniform value in `(0, 1)` (in `(0, 1]` when antithetic with extra precision).
    fn next_double(&mut self) -> f64;

    /// One raw output word viewed as a signed integer.
    fn next_int(&mut self) -> i32;

    /// Uniform integer in `range`, computed as `low + floor(u * (high - low + 1))`.
    ///
    /// # Panics
    ///
    /// Panics when `range` is empty.
    fn next_int_in(&mut self, range: RangeInclusive<i32>) -> i32 {
        let (low, high) = range.into_inner();
        assert!(low <= high, "empty range {low}..={high}");
        let span = f64::from(high) - f64::from(low) + 1.0;
        let offset = (self.next_double() * span) as i64;
        (i64::from(low) + offset).min(i64::from(high)) as i32
    }

    /// Fill `out` with successive [`RandomStream::next_double`] values.
    fn fill_double(&mut self, out: &mut [f64]) {
        for value in out {
            *value = self.next_double();
        }
    }

    fn next_array_of_double(&mut self, n: usize) -> Vec<f64> {
        let mut values = vec![0.0; n];
        self.fill_double(&mut values);
        values
    }

    fn next_array_of_int(&mut self, range: RangeInclusive<i32>, n: usize) -> Vec<i32> {
        (0..n).map(|_| self.next_int_in(range.clone())).collect()
    }
}

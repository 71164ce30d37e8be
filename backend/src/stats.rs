use rug::{Float, Integer};

const STATS_PREC: u32 = 256;

/// Statistics over centered noise samples.
///
/// Samples may span the full 127-bit range, so sums are accumulated with
/// arbitrary precision floats.
pub trait Stats {
    /// Bit length of the largest magnitude.
    fn max_bits(&self) -> usize;

    /// Arithmetic mean.
    fn mean(&self) -> f64;

    /// Population standard deviation.
    fn std(&self) -> f64;
}

/// Number of bits needed to write `x`, zero for zero.
#[inline(always)]
pub fn bit_length(x: u128) -> usize {
    (u128::BITS - x.leading_zeros()) as usize
}

fn mean_float(values: &[i128]) -> Float {
    let mut acc: Float = Float::with_val(STATS_PREC, 0);
    values.iter().for_each(|x| acc += Float::with_val(STATS_PREC, &Integer::from(*x)));
    acc /= values.len() as u32;
    acc
}

impl Stats for [i128] {
    fn max_bits(&self) -> usize {
        self.iter().map(|x| bit_length(x.unsigned_abs())).max().unwrap_or(0)
    }

    fn mean(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        mean_float(self).to_f64()
    }

    fn std(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let mean: Float = mean_float(self);
        let mut acc: Float = Float::with_val(STATS_PREC, 0);
        self.iter().for_each(|x| {
            let d: Float = Float::with_val(STATS_PREC, &Integer::from(*x)) - &mean;
            acc += d.square();
        });
        acc /= self.len() as u32;
        acc.sqrt().to_f64()
    }
}

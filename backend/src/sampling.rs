use rand_distr::{Distribution, StandardNormal};
use sampling::source::Source;

use crate::Modulus;

pub trait FillUniform {
    /// Fills the receiver with uniform values in [0, q).
    fn fill_uniform(&mut self, modulus: &Modulus, source: &mut Source);
}

pub trait AddNormal {
    /// Adds a discrete normal vector with the provided standard deviation,
    /// rejection-sampled to \[-bound, bound\].
    fn add_normal(&mut self, modulus: &Modulus, source: &mut Source, sigma: f64, bound: f64);
}

pub trait FillTernary {
    /// Fills the receiver with values in {-1, 0, 1}, where each entry is
    /// non-zero with probability `prob`.
    fn fill_ternary_prob(&mut self, prob: f64, source: &mut Source);

    /// Fills the receiver with exactly `hw` entries in {-1, 1}, the rest zero.
    fn fill_ternary_hw(&mut self, hw: usize, source: &mut Source);
}

impl FillUniform for [u128] {
    fn fill_uniform(&mut self, modulus: &Modulus, source: &mut Source) {
        let mask: u128 = modulus.mask();
        self.iter_mut().for_each(|x| *x = source.next_u128() & mask);
    }
}

impl AddNormal for [u128] {
    fn add_normal(&mut self, modulus: &Modulus, source: &mut Source, sigma: f64, bound: f64) {
        assert!(
            (bound.log2().ceil() as i64) < 64,
            "invalid bound: ceil(log2(bound))={} > 63",
            (bound.log2().ceil() as i64)
        );
        self.iter_mut().for_each(|x| {
            let mut e: f64 = sample_normal(source, sigma);
            while e.abs() > bound {
                e = sample_normal(source, sigma);
            }
            *x = modulus.add(*x, modulus.lift(e.round() as i128));
        });
    }
}

#[inline(always)]
fn sample_normal(source: &mut Source, sigma: f64) -> f64 {
    let z: f64 = StandardNormal.sample(source);
    z * sigma
}

impl FillTernary for [i64] {
    fn fill_ternary_prob(&mut self, prob: f64, source: &mut Source) {
        self.iter_mut().for_each(|x| {
            let u: f64 = source.next_f64(0.0, 1.0);
            *x = if u < prob * 0.5 {
                -1
            } else if u < prob {
                1
            } else {
                0
            }
        });
    }

    fn fill_ternary_hw(&mut self, hw: usize, source: &mut Source) {
        assert!(hw <= self.len());
        self.iter_mut().for_each(|x| *x = 0);
        let n: u64 = self.len() as u64;
        let mask: u64 = n.next_power_of_two() - 1;
        let mut placed: usize = 0;
        while placed < hw {
            let i: usize = source.next_u64n(n, mask) as usize;
            if self[i] == 0 {
                self[i] = ((source.next_u64n(2, 1) as i64) << 1) - 1;
                placed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sampling::source::Source;

    use super::{AddNormal, FillTernary, FillUniform};
    use crate::{Modulus, Stats};

    #[test]
    fn fill_uniform() {
        let modulus: Modulus = Modulus::new(20);
        let mut source: Source = Source::new([0u8; 32]);
        let mut a: Vec<u128> = vec![0u128; 4096];
        a.fill_uniform(&modulus, &mut source);
        assert!(a.iter().all(|x| *x < (1 << 20)));
        let centered: Vec<i128> = a.iter().map(|x| modulus.centered(*x)).collect();
        let std: f64 = centered.std() / (1u128 << 20) as f64;
        let one_12_sqrt: f64 = 0.28867513459481287;
        assert!((std - one_12_sqrt).abs() < 0.01, "std={} ~!= {}", std, one_12_sqrt);
    }

    #[test]
    fn add_normal() {
        let modulus: Modulus = Modulus::new(64);
        let sigma: f64 = 3.2;
        let bound: f64 = 6.0 * sigma;
        let mut source: Source = Source::new([0u8; 32]);
        let mut a: Vec<u128> = vec![0u128; 4096];
        a.add_normal(&modulus, &mut source, sigma, bound);
        let centered: Vec<i128> = a.iter().map(|x| modulus.centered(*x)).collect();
        assert!(centered.iter().all(|x| (*x as f64).abs() <= bound));
        let std: f64 = centered.std();
        assert!((std - sigma).abs() < 0.1, "std={} ~!= {}", std, sigma);
    }

    #[test]
    fn ternary() {
        let mut source: Source = Source::new([0u8; 32]);
        let mut s: Vec<i64> = vec![0i64; 4096];
        s.fill_ternary_prob(0.5, &mut source);
        assert!(s.iter().all(|x| (-1..=1).contains(x)));
        let hw: usize = s.iter().filter(|x| **x != 0).count();
        assert!((hw as f64 / 4096.0 - 0.5).abs() < 0.05, "hw={}", hw);

        s.fill_ternary_hw(64, &mut source);
        assert_eq!(s.iter().filter(|x| **x != 0).count(), 64);
        let negatives: usize = s.iter().filter(|x| **x == -1).count();
        assert!(negatives > 16 && negatives < 48, "negatives={}", negatives);
    }
}

use backend::{Matrix, Modulus};
use rayon::prelude::*;
use sampling::source::Source;

use crate::{
    Ciphertext, Error, Infos, KeyId, MIN_PRECISION, PIVOT, ParametersError, Result, SecretKey, TransitKey, check_precision,
    keys::decode,
};

/// Encryptions of the signs of a source key, used to evaluate its
/// decryption homomorphically.
///
/// The key operates with two precisions:
/// - `source_precision`, the precision of the key's ciphertexts and of the
///   refreshed ciphertexts [BootstrappingKey::bootstrap] returns;
/// - `target_precision`, the reduced precision at which the decryption of
///   the input is evaluated. It bounds the number of distinct phases the
///   evaluation visits to 2^target_precision per secret coordinate.
///
/// For every coordinate i != PIVOT of the ternary source key, `positive`
/// holds an encryption of [s_i = 1] and `negative` one of [s_i = -1], both
/// under the target key at source precision.
#[derive(Clone, Debug)]
pub struct BootstrappingKey {
    positive: Vec<Ciphertext>,
    negative: Vec<Ciphertext>,
    source: KeyId,
    source_dimension: usize,
    target: KeyId,
    source_precision: usize,
    target_precision: usize,
}

impl BootstrappingKey {
    pub fn generate(
        source: &SecretKey,
        target: &SecretKey,
        source_precision: usize,
        target_precision: usize,
        source_xa: &mut Source,
        source_xe: &mut Source,
    ) -> Result<Self> {
        check_precision(source_precision)?;
        check_precision(target_precision)?;
        if target_precision > source_precision {
            return Err(ParametersError::InvalidPrecision(target_precision, MIN_PRECISION, source_precision).into());
        }

        let mut positive: Vec<Ciphertext> = Vec::with_capacity(source.dimension() - 1);
        let mut negative: Vec<Ciphertext> = Vec::with_capacity(source.dimension() - 1);
        for (i, s_i) in source.coefficients().iter().enumerate() {
            if i == PIVOT {
                continue;
            }
            positive.push(Ciphertext::encrypt_sk(
                target,
                *s_i == 1,
                source_precision,
                source_xa,
                source_xe,
            )?);
            negative.push(Ciphertext::encrypt_sk(
                target,
                *s_i == -1,
                source_precision,
                source_xa,
                source_xe,
            )?);
        }

        log::debug!(
            "generated bootstrapping key {} -> {}: {} sign encryptions at p={}, decryption at p={}",
            source.id(),
            target.id(),
            positive.len() + negative.len(),
            source_precision,
            target_precision
        );

        Ok(Self {
            positive,
            negative,
            source: source.id(),
            source_dimension: source.dimension(),
            target: target.id(),
            source_precision,
            target_precision,
        })
    }

    pub fn source(&self) -> KeyId {
        self.source
    }

    pub fn target(&self) -> KeyId {
        self.target
    }

    pub fn source_precision(&self) -> usize {
        self.source_precision
    }

    pub fn target_precision(&self) -> usize {
        self.target_precision
    }

    /// Returns a fresh encryption under the target key, at source
    /// precision, of the bit encrypted by `ct`.
    ///
    /// `ct` is switched down to the target precision pt and the pivot
    /// column v of the result is read in the clear. Its decryption is
    /// decode(y_{n-1}) with y_0 = v_0 and y_k = y_{k-1} + v_{i_k} * s_{i_k}
    /// mod 2^pt over the secret coordinates i_1, ..., i_{n-1}.
    ///
    /// Writing H_{n-1} = decode and H_{k-1}(y) = H_k(y + v_{i_k} * s_{i_k}),
    /// every step is selected by the encrypted signs of s_{i_k}:
    ///
    /// H_{k-1}(y) = H_k(y) + [s = 1] * (H_k(y + v) - H_k(y))
    ///                     + [s = -1] * (H_k(y - v) - H_k(y))
    ///
    /// H_{n-1} is a table of trivial ciphertexts and the result is H_0(v_0).
    /// Sign encryptions are always the left operand of the products, so
    /// each step adds a fixed amount of noise and the output noise only
    /// depends on the dimensions, never on the noise of `ct`.
    ///
    /// `tk` must switch from the target key to itself at source precision.
    pub fn bootstrap(&self, ct: &Ciphertext, tk: &TransitKey) -> Result<Ciphertext> {
        if ct.key() != self.source || ct.dimension() != self.source_dimension {
            return Err(Error::BootstrappingKeyMismatch(format!(
                "ciphertext decrypts under key {}, bootstrapping key refreshes key {}",
                ct.key(),
                self.source
            )));
        }
        if tk.from() != self.target || tk.to() != self.target || tk.precision() != self.source_precision {
            return Err(Error::TransitKeyMismatch(format!(
                "expected {} -> {} at p={}, found {} -> {} at p={}",
                self.target,
                self.target,
                self.source_precision,
                tk.from(),
                tk.to(),
                tk.precision()
            )));
        }

        let pt: usize = self.target_precision;
        let modulus: Modulus = Modulus::new(pt);
        let low: Ciphertext = ct.adjust_precision(pt)?;
        let c: &Matrix = low.compact()?;
        let v: Vec<u128> = c.col(low.pivot_column());
        log::trace!("switched pivot column: {:?}", v);

        let secret: Vec<usize> = (0..self.source_dimension).filter(|i| *i != PIVOT).collect();

        // levels[k] holds the sorted phases y_k reachable from v_0.
        let mut levels: Vec<Vec<u128>> = vec![vec![v[PIVOT]]];
        for i in secret.iter() {
            let mut next: Vec<u128> = levels[levels.len() - 1]
                .iter()
                .flat_map(|y| [modulus.sub(*y, v[*i]), *y, modulus.add(*y, v[*i])])
                .collect();
            next.sort_unstable();
            next.dedup();
            levels.push(next);
        }

        let template: &Ciphertext = &self.positive[0];
        let mut table: Vec<Ciphertext> = levels[secret.len()]
            .iter()
            .map(|y| template.trivial_like(decode(&modulus, *y)))
            .collect::<Result<Vec<Ciphertext>>>()?;

        for k in (1..=secret.len()).rev() {
            let v_i: u128 = v[secret[k - 1]];
            let (positive, negative) = (&self.positive[k - 1], &self.negative[k - 1]);
            let points: &[u128] = &levels[k];
            table = levels[k - 1]
                .par_iter()
                .map(|y| {
                    let here: &Ciphertext = lookup(points, &table, *y);
                    let up: &Ciphertext = lookup(points, &table, modulus.add(*y, v_i));
                    let down: &Ciphertext = lookup(points, &table, modulus.sub(*y, v_i));
                    here.add(&positive.mul(&up.sub(here)?, tk)?)?
                        .add(&negative.mul(&down.sub(here)?, tk)?)
                })
                .collect::<Result<Vec<Ciphertext>>>()?;
        }

        log::debug!(
            "bootstrapping key {} -> {}: evaluated {} phases at p={}",
            self.source,
            self.target,
            levels.iter().map(|l| l.len()).sum::<usize>(),
            pt
        );

        Ok(table.swap_remove(0))
    }
}

/// Returns the entry of `table` at phase `y`. Every neighbour y +- v of a
/// phase of level k - 1 is a phase of level k.
#[inline(always)]
fn lookup<'a>(points: &[u128], table: &'a [Ciphertext], y: u128) -> &'a Ciphertext {
    match points.binary_search(&y) {
        Ok(i) | Err(i) => &table[i],
    }
}

use std::{borrow::Cow, fmt};

use backend::{AddNormal, FillTernary, FillUniform, GadgetOps, Matrix, Modulus, Stats};
use itertools::izip;
use sampling::source::Source;

use crate::{Ciphertext, Error, Form, Infos, Parameters, ParametersError, Result, SIX_SIGMA, check_precision};

/// Index of the key coordinate fixed to 1.
///
/// Column p - 1 of the pivot block of a ciphertext carries m * q/2 + e,
/// which is what decryption reads.
pub const PIVOT: usize = 0;

/// Default probability for a secret coordinate to be non-zero.
pub const DEFAULT_TERNARY_PROB: f64 = 0.5;

/// Identifier binding ciphertexts and evaluation keys to the secret key
/// they were produced under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyId(u64);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SecretDistribution {
    TernaryFixed(usize), // Ternary with fixed Hamming weight
    TernaryProb(f64),    // Ternary with probabilistic Hamming weight
}

/// Secret vector s of dimension n with s[PIVOT] = 1 and the remaining
/// coordinates in {-1, 0, 1}.
///
/// Coefficients are kept as signed integers and lifted mod 2^p on demand,
/// so the same key serves every precision.
#[derive(Clone, Debug)]
pub struct SecretKey {
    id: KeyId,
    params: Parameters,
    data: Vec<i64>,
    dist: SecretDistribution,
}

impl SecretKey {
    pub fn generate(params: &Parameters, source_xs: &mut Source) -> Self {
        let n: usize = params.dimension();
        let mut data: Vec<i64> = vec![0i64; n];
        data[PIVOT + 1..].fill_ternary_prob(DEFAULT_TERNARY_PROB, source_xs);
        Self::new(params, data, SecretDistribution::TernaryProb(DEFAULT_TERNARY_PROB), source_xs)
    }

    pub fn generate_with_distribution(params: &Parameters, dist: SecretDistribution, source_xs: &mut Source) -> Result<Self> {
        let n: usize = params.dimension();
        let mut data: Vec<i64> = vec![0i64; n];
        match dist {
            SecretDistribution::TernaryFixed(hw) => {
                if hw == 0 {
                    return Err(ParametersError::InvalidDistribution(format!("{:?}", dist)).into());
                }
                if hw > n - 1 {
                    return Err(ParametersError::InvalidDimension(n, hw + 1).into());
                }
                data[PIVOT + 1..].fill_ternary_hw(hw, source_xs)
            }
            SecretDistribution::TernaryProb(prob) => {
                // Rejects NaN as well.
                if !(prob > 0.0 && prob <= 1.0) {
                    return Err(ParametersError::InvalidDistribution(format!("{:?}", dist)).into());
                }
                data[PIVOT + 1..].fill_ternary_prob(prob, source_xs)
            }
        }
        Ok(Self::new(params, data, dist, source_xs))
    }

    fn new(params: &Parameters, mut data: Vec<i64>, dist: SecretDistribution, source_xs: &mut Source) -> Self {
        data[PIVOT] = 1;
        let seed: [u8; 32] = source_xs.new_seed();
        let id: KeyId = KeyId(seed[..8].iter().fold(0u64, |acc, b| (acc << 8) | *b as u64));
        log::debug!(
            "generated secret key {}: n={} p={} dist={:?}",
            id,
            params.dimension(),
            params.precision(),
            dist
        );
        Self {
            id,
            params: *params,
            data,
            dist,
        }
    }

    pub fn id(&self) -> KeyId {
        self.id
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn distribution(&self) -> SecretDistribution {
        self.dist
    }

    pub fn sigma(&self) -> f64 {
        self.params.sigma()
    }

    /// Returns the signed coefficients of s.
    pub fn coefficients(&self) -> &[i64] {
        &self.data
    }

    /// Returns s mod q.
    pub fn lift(&self, modulus: &Modulus) -> Vec<u128> {
        self.data.iter().map(|s_i| modulus.lift(*s_i as i128)).collect()
    }

    /// Returns s' = s (x) (1, 2, ..., 2^{p-1}) at the given precision.
    pub fn flatten(&self, precision: usize) -> Result<FlattenedKey> {
        check_precision(precision)?;
        let modulus: Modulus = Modulus::new(precision);
        let mut data: Vec<u128> = vec![0u128; self.dimension() * precision];
        modulus.gadget_expand(&mut data, &self.lift(&modulus));
        Ok(FlattenedKey {
            id: self.id,
            dimension: self.dimension(),
            precision,
            data,
        })
    }

    /// Returns a dimension x message.len() matrix C with
    /// s * C = message + e.
    ///
    /// Rows other than the pivot are uniform; the pivot row absorbs the
    /// message, the noise and the masking terms.
    pub(crate) fn encrypt_vector(&self, modulus: &Modulus, message: &[u128], source_xa: &mut Source, source_xe: &mut Source) -> Matrix {
        let n: usize = self.dimension();
        let sigma: f64 = self.sigma();
        let key: Vec<u128> = self.lift(modulus);
        let mut res: Matrix = Matrix::alloc(n, message.len());
        (0..n)
            .filter(|i| *i != PIVOT)
            .for_each(|i| res.row_mut(i).fill_uniform(modulus, source_xa));

        let mut body: Vec<u128> = message.to_vec();
        body.add_normal(modulus, source_xe, sigma, sigma * SIX_SIGMA);
        (0..n).filter(|i| *i != PIVOT).for_each(|i| {
            izip!(body.iter_mut(), res.row(i).iter()).for_each(|(b, a)| *b = modulus.sub(*b, modulus.mul(key[i], *a)));
        });
        res.row_mut(PIVOT).copy_from_slice(&body);
        res
    }
}

impl Infos for SecretKey {
    fn dimension(&self) -> usize {
        self.params.dimension()
    }

    fn precision(&self) -> usize {
        self.params.precision()
    }
}

/// Flattened secret key s' = s (x) g of length N = n * p, the decryption
/// key of flattened ciphertexts at precision p.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlattenedKey {
    id: KeyId,
    dimension: usize,
    precision: usize,
    data: Vec<u128>,
}

impl FlattenedKey {
    pub fn id(&self) -> KeyId {
        self.id
    }

    pub fn data(&self) -> &[u128] {
        &self.data
    }
}

impl Infos for FlattenedKey {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn precision(&self) -> usize {
        self.precision
    }
}

/// Keys able to decrypt ciphertexts of a given [Form].
///
/// The phase of a ciphertext C under key vector v is v * C. Its pivot
/// column reads m * q/2 + e and every column (PIVOT, j) of the pivot
/// block reads m * 2^j + e_j.
pub trait DecryptionKey: Infos {
    fn key_id(&self) -> KeyId;

    /// Returns the form of the ciphertexts this key decrypts.
    fn form(&self) -> Form;

    /// Returns the key vector at the given precision.
    fn vector(&self, precision: usize) -> Result<Cow<'_, [u128]>>;

    fn check(&self, ct: &Ciphertext) -> Result<()> {
        if ct.key() != self.key_id() {
            return Err(Error::KeyMismatch {
                found: ct.key(),
                expected: self.key_id(),
            });
        }
        if ct.form() != self.form() {
            return Err(Error::FormMismatch {
                found: ct.form(),
                expected: self.form(),
            });
        }
        if ct.dimension() != self.dimension() {
            return Err(Error::DimensionMismatch {
                found: ct.dimension(),
                expected: self.dimension(),
            });
        }
        Ok(())
    }

    /// Returns the pivot value m * q/2 + e.
    fn partial_decrypt(&self, ct: &Ciphertext) -> Result<u128> {
        self.check(ct)?;
        let key: Cow<'_, [u128]> = self.vector(ct.precision())?;
        Ok(ct.phase(&key, ct.pivot_column()))
    }

    fn decrypt(&self, ct: &Ciphertext) -> Result<bool> {
        let phase: u128 = self.partial_decrypt(ct)?;
        Ok(decode(&ct.modulus(), phase))
    }

    /// Returns the centered noise e_j over the pivot block.
    fn noise(&self, ct: &Ciphertext) -> Result<Vec<i128>> {
        self.check(ct)?;
        let modulus: Modulus = ct.modulus();
        let key: Cow<'_, [u128]> = self.vector(ct.precision())?;
        let p: usize = ct.precision();
        let bit: bool = decode(&modulus, ct.phase(&key, ct.pivot_column()));
        Ok((0..p)
            .map(|j| {
                let expected: u128 = if bit { 1u128 << j } else { 0 };
                modulus.centered(modulus.sub(ct.phase(&key, PIVOT * p + j), expected))
            })
            .collect())
    }

    /// Returns the bit length of the largest noise magnitude.
    fn error_bits(&self, ct: &Ciphertext) -> Result<usize> {
        Ok(self.noise(ct)?.max_bits())
    }

    fn noise_std(&self, ct: &Ciphertext) -> Result<f64> {
        Ok(self.noise(ct)?.std())
    }
}

impl DecryptionKey for SecretKey {
    fn key_id(&self) -> KeyId {
        self.id
    }

    fn form(&self) -> Form {
        Form::Compact
    }

    fn vector(&self, precision: usize) -> Result<Cow<'_, [u128]>> {
        check_precision(precision)?;
        Ok(Cow::Owned(self.lift(&Modulus::new(precision))))
    }
}

impl DecryptionKey for FlattenedKey {
    fn key_id(&self) -> KeyId {
        self.id
    }

    fn form(&self) -> Form {
        Form::Flattened
    }

    fn vector(&self, precision: usize) -> Result<Cow<'_, [u128]>> {
        if precision != self.precision {
            return Err(Error::PrecisionMismatch {
                found: precision,
                expected: self.precision,
            });
        }
        Ok(Cow::Borrowed(&self.data))
    }
}

/// Rounds a pivot value to the nearer of 0 and q/2.
#[inline(always)]
pub(crate) fn decode(modulus: &Modulus, phase: u128) -> bool {
    modulus.add(phase, modulus.q_quarter()) >= modulus.q_half()
}

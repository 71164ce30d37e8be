use std::borrow::Cow;

use backend::{BitMatrix, GadgetOps, Matrix, Modulus};
use sampling::source::Source;

use crate::{Error, Infos, KeyId, PIVOT, Result, SecretKey, check_precision};

/// Representation of a ciphertext.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    /// n x N matrix C over Z/qZ with s * C = m * s' + e.
    Compact,
    /// N x N bit matrix F = G^{-1}(C) with s' * F = s * C.
    Flattened,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CiphertextData {
    Compact(Matrix),
    Flattened(BitMatrix),
}

/// Encryption of a single bit.
///
/// A ciphertext is bound to two keys: `key`, under which it decrypts, and
/// `basis`, whose flattened form s'_basis is the vector multiplied by the
/// message. Freshly encrypted ciphertexts have `key == basis`; key
/// switching changes `key` and leaves `basis` untouched. Decryption only
/// reads the pivot column, where every basis evaluates to m * q/2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    pub(crate) data: CiphertextData,
    pub(crate) key: KeyId,
    pub(crate) dimension: usize,
    pub(crate) basis: KeyId,
    pub(crate) basis_dimension: usize,
    pub(crate) precision: usize,
}

impl Infos for Ciphertext {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn precision(&self) -> usize {
        self.precision
    }
}

impl Ciphertext {
    /// Encrypts `bit` under `sk` at the given precision.
    pub fn encrypt_sk(sk: &SecretKey, bit: bool, precision: usize, source_xa: &mut Source, source_xe: &mut Source) -> Result<Self> {
        check_precision(precision)?;
        let modulus: Modulus = Modulus::new(precision);
        let message: Vec<u128> = if bit {
            sk.flatten(precision)?.data().to_vec()
        } else {
            vec![0u128; sk.dimension() * precision]
        };
        Ok(Self {
            data: CiphertextData::Compact(sk.encrypt_vector(&modulus, &message, source_xa, source_xe)),
            key: sk.id(),
            dimension: sk.dimension(),
            basis: sk.id(),
            basis_dimension: sk.dimension(),
            precision,
        })
    }

    /// Returns the noiseless encryption of `bit` bound to the same keys and
    /// precision as `self`: the zero matrix for 0 and the gadget matrix G
    /// for 1.
    ///
    /// An encryption of 1 requires `self.key() == self.basis()`.
    pub fn trivial_like(&self, bit: bool) -> Result<Self> {
        let modulus: Modulus = self.modulus();
        let data: Matrix = if bit {
            if self.key != self.basis || self.dimension != self.basis_dimension {
                return Err(Error::KeyMismatch {
                    found: self.basis,
                    expected: self.key,
                });
            }
            modulus.gadget_matrix(self.dimension)
        } else {
            Matrix::alloc(self.dimension, self.basis_dimension * self.precision)
        };
        Ok(Self {
            data: CiphertextData::Compact(data),
            ..self.header()
        })
    }

    pub fn key(&self) -> KeyId {
        self.key
    }

    pub fn basis(&self) -> KeyId {
        self.basis
    }

    pub fn basis_dimension(&self) -> usize {
        self.basis_dimension
    }

    pub fn form(&self) -> Form {
        match self.data {
            CiphertextData::Compact(_) => Form::Compact,
            CiphertextData::Flattened(_) => Form::Flattened,
        }
    }

    /// Returns the column index of the pivot, (PIVOT, p - 1).
    pub fn pivot_column(&self) -> usize {
        PIVOT * self.precision + self.precision - 1
    }

    /// Returns G^{-1}(C). Flattened ciphertexts are returned as is.
    pub fn flatten(&self) -> Ciphertext {
        Ciphertext {
            data: CiphertextData::Flattened(self.bits().into_owned()),
            ..self.header()
        }
    }

    /// Re-expresses a compact ciphertext at another precision.
    ///
    /// Raising by d shifts every gadget block up by d columns and scales
    /// it by 2^d; the noise is scaled by 2^d. Lowering by d drops the d
    /// lowest columns of every block and divides the rest by 2^d with
    /// rounding; the noise is divided by 2^d, plus at most n/2 from the
    /// rounding.
    pub fn adjust_precision(&self, precision: usize) -> Result<Ciphertext> {
        check_precision(precision)?;
        let c: &Matrix = self.compact()?;
        let p_in: usize = self.precision;
        if precision == p_in {
            return Ok(self.clone());
        }

        let m_in: Modulus = self.modulus();
        let m_out: Modulus = Modulus::new(precision);
        let blocks: usize = self.basis_dimension;
        let mut res: Matrix = Matrix::alloc(c.rows(), blocks * precision);

        if precision > p_in {
            let d: usize = precision - p_in;
            (0..c.rows()).for_each(|r| {
                (0..blocks).for_each(|i| {
                    (d..precision).for_each(|j| res.set(r, i * precision + j, m_out.reduce(c.at(r, i * p_in + j - d) << d)));
                });
            });
        } else {
            let d: usize = p_in - precision;
            (0..c.rows()).for_each(|r| {
                (0..blocks).for_each(|i| {
                    (0..precision).for_each(|j| {
                        res.set(r, i * precision + j, m_out.reduce(m_in.round_shift(c.at(r, i * p_in + j + d), d)))
                    });
                });
            });
        }

        log::trace!("adjusted precision {} -> {}", p_in, precision);

        Ok(Ciphertext {
            data: CiphertextData::Compact(res),
            precision,
            ..self.header()
        })
    }

    /// Returns v * C at column `col`, where v is a key vector matching the
    /// form of the ciphertext.
    pub(crate) fn phase(&self, key: &[u128], col: usize) -> u128 {
        let modulus: Modulus = self.modulus();
        match &self.data {
            CiphertextData::Compact(c) => {
                #[cfg(debug_assertions)]
                {
                    assert_eq!(key.len(), c.rows());
                }
                (0..c.rows()).fold(0u128, |acc, i| modulus.add(acc, modulus.mul(key[i], c.at(i, col))))
            }
            CiphertextData::Flattened(b) => {
                #[cfg(debug_assertions)]
                {
                    assert_eq!(key.len(), b.rows());
                }
                (0..b.rows())
                    .filter(|i| b.get(*i, col))
                    .fold(0u128, |acc, i| modulus.add(acc, key[i]))
            }
        }
    }

    pub(crate) fn compact(&self) -> Result<&Matrix> {
        match &self.data {
            CiphertextData::Compact(c) => Ok(c),
            CiphertextData::Flattened(_) => Err(Error::FormMismatch {
                found: Form::Flattened,
                expected: Form::Compact,
            }),
        }
    }

    /// Returns the bit matrix G^{-1}(C), decomposing compact ciphertexts.
    pub(crate) fn bits(&self) -> Cow<'_, BitMatrix> {
        match &self.data {
            CiphertextData::Compact(c) => {
                let modulus: Modulus = self.modulus();
                let mut res: BitMatrix = BitMatrix::alloc(c.rows() * self.precision, c.cols());
                modulus.gadget_decompose(&mut res, c);
                Cow::Owned(res)
            }
            CiphertextData::Flattened(b) => Cow::Borrowed(b),
        }
    }

    /// Returns true for the noiseless encryption of zero.
    pub(crate) fn is_zero(&self) -> bool {
        match &self.data {
            CiphertextData::Compact(c) => c.is_zero(),
            CiphertextData::Flattened(b) => b.count_ones() == 0,
        }
    }

    /// Metadata of `self` with placeholder data, to be overwritten with
    /// struct update syntax.
    fn header(&self) -> Ciphertext {
        Ciphertext {
            data: CiphertextData::Compact(Matrix::alloc(0, 0)),
            key: self.key,
            dimension: self.dimension,
            basis: self.basis,
            basis_dimension: self.basis_dimension,
            precision: self.precision,
        }
    }
}

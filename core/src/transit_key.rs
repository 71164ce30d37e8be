use backend::{BitMatrix, GadgetOps, Matrix, MatrixOps, Modulus};
use sampling::source::Source;

use crate::{Ciphertext, Error, Infos, KeyId, Result, SecretKey, check_precision, ciphertext::CiphertextData};

/// Key-switching matrix from `from` to `to` at a fixed precision.
///
/// T has shape n_to x N_from with s_to * T = s'_from + e_T: column k is an
/// encryption under `to` of the k-th coordinate of the flattened `from`
/// key. For any X with n_from rows, s_to * T * G^{-1}(X) equals
/// s_from * X up to the noise e_T * G^{-1}(X).
///
/// With `from == to` the key relinearizes products C1 * G^{-1}(C2) back to
/// a compact n x N ciphertext.
#[derive(Clone, Debug)]
pub struct TransitKey {
    data: Matrix,
    from: KeyId,
    from_dimension: usize,
    to: KeyId,
    to_dimension: usize,
    precision: usize,
}

impl TransitKey {
    pub fn generate(from: &SecretKey, to: &SecretKey, precision: usize, source_xa: &mut Source, source_xe: &mut Source) -> Result<Self> {
        check_precision(precision)?;
        let modulus: Modulus = Modulus::new(precision);
        let message: Vec<u128> = from.flatten(precision)?.data().to_vec();
        let data: Matrix = to.encrypt_vector(&modulus, &message, source_xa, source_xe);
        log::debug!(
            "generated transit key {} -> {}: {}x{} at p={}",
            from.id(),
            to.id(),
            data.rows(),
            data.cols(),
            precision
        );
        Ok(Self {
            data,
            from: from.id(),
            from_dimension: from.dimension(),
            to: to.id(),
            to_dimension: to.dimension(),
            precision,
        })
    }

    pub fn from(&self) -> KeyId {
        self.from
    }

    pub fn to(&self) -> KeyId {
        self.to
    }

    pub fn from_dimension(&self) -> usize {
        self.from_dimension
    }

    pub fn to_dimension(&self) -> usize {
        self.to_dimension
    }

    /// Moves a compact ciphertext decrypting under `from` to one
    /// decrypting under `to`. The message basis is unchanged.
    pub fn switch_key(&self, ct: &Ciphertext) -> Result<Ciphertext> {
        self.check_source(ct.key(), ct.dimension(), ct.precision())?;
        let c: &Matrix = ct.compact()?;
        Ok(Ciphertext {
            data: CiphertextData::Compact(self.relinearize(c)),
            key: self.to,
            dimension: self.to_dimension,
            basis: ct.basis(),
            basis_dimension: ct.basis_dimension(),
            precision: ct.precision(),
        })
    }

    pub(crate) fn check_source(&self, key: KeyId, dimension: usize, precision: usize) -> Result<()> {
        if key != self.from || dimension != self.from_dimension {
            return Err(Error::TransitKeyMismatch(format!(
                "ciphertext decrypts under key {}, transit key switches from key {}",
                key, self.from
            )));
        }
        if precision != self.precision {
            return Err(Error::TransitKeyMismatch(format!(
                "ciphertext precision is {}, transit key precision is {}",
                precision, self.precision
            )));
        }
        Ok(())
    }

    /// Returns T * G^{-1}(x).
    pub(crate) fn relinearize(&self, x: &Matrix) -> Matrix {
        let modulus: Modulus = self.modulus();
        #[cfg(debug_assertions)]
        {
            assert_eq!(x.rows(), self.from_dimension);
        }
        let mut bits: BitMatrix = BitMatrix::alloc(x.rows() * self.precision, x.cols());
        modulus.gadget_decompose(&mut bits, x);
        let mut res: Matrix = Matrix::alloc(self.to_dimension, x.cols());
        modulus.mat_mul_bits(&mut res, &self.data, &bits);
        res
    }
}

impl Infos for TransitKey {
    /// Returns the dimension of the destination key.
    fn dimension(&self) -> usize {
        self.to_dimension
    }

    fn precision(&self) -> usize {
        self.precision
    }
}

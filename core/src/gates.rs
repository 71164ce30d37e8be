use std::borrow::Cow;

use backend::{BitMatrix, Matrix, MatrixOps, Modulus};

use crate::{Ciphertext, Error, Infos, Result, TransitKey, ciphertext::CiphertextData};

impl Ciphertext {
    /// Checks that `self` and `other` are compact and share keys, basis and
    /// precision, so that they can be combined linearly.
    pub(crate) fn check_linear(&self, other: &Ciphertext) -> Result<()> {
        self.compact()?;
        other.compact()?;
        if self.key != other.key || self.dimension != other.dimension {
            return Err(Error::KeyMismatch {
                found: other.key,
                expected: self.key,
            });
        }
        if self.basis != other.basis || self.basis_dimension != other.basis_dimension {
            return Err(Error::KeyMismatch {
                found: other.basis,
                expected: self.basis,
            });
        }
        if self.precision != other.precision {
            return Err(Error::PrecisionMismatch {
                found: other.precision,
                expected: self.precision,
            });
        }
        Ok(())
    }

    /// Returns C1 + C2, which decrypts to the XOR of the two bits.
    ///
    /// The plaintext of the result is the integer sum m1 + m2: its parity
    /// is the XOR, but a sum of two ones is not a valid left operand of
    /// [Ciphertext::mul] with bounded noise. Use [Ciphertext::xor] when the
    /// result feeds further products.
    pub fn add(&self, other: &Ciphertext) -> Result<Ciphertext> {
        self.check_linear(other)?;
        let modulus: Modulus = self.modulus();
        let (a, b) = (self.compact()?, other.compact()?);
        let mut res: Matrix = Matrix::alloc(a.rows(), a.cols());
        modulus.mat_add(&mut res, a, b);
        Ok(self.with_compact(res))
    }

    /// Returns C1 - C2.
    pub fn sub(&self, other: &Ciphertext) -> Result<Ciphertext> {
        self.check_linear(other)?;
        let modulus: Modulus = self.modulus();
        let (a, b) = (self.compact()?, other.compact()?);
        let mut res: Matrix = Matrix::alloc(a.rows(), a.cols());
        modulus.mat_sub(&mut res, a, b);
        Ok(self.with_compact(res))
    }

    /// Returns G - C, an encryption of 1 - m.
    pub fn not(&self) -> Result<Ciphertext> {
        self.trivial_like(true)?.sub(self)
    }

    /// Returns the encryption of m1 * m2 decrypting under `tk.to()`:
    /// T * G^{-1}(C1 * G^{-1}(C2)).
    ///
    /// The noise of the result is e1 * G^{-1}(C2) + m1 * e2 plus the
    /// relinearization noise: the left operand's noise is multiplied by a
    /// bit matrix while the right operand's noise is only added. Pass the
    /// noisier ciphertext as `other`.
    ///
    /// `other` may be flattened. It must decrypt under the basis of `self`
    /// and be expressed in that same basis; `tk` must switch from the key
    /// of `self`.
    pub fn mul(&self, other: &Ciphertext, tk: &TransitKey) -> Result<Ciphertext> {
        let a: &Matrix = self.compact()?;
        if other.key != other.basis || other.dimension != other.basis_dimension {
            return Err(Error::KeyMismatch {
                found: other.key,
                expected: other.basis,
            });
        }
        if self.basis != other.key || self.basis_dimension != other.dimension {
            return Err(Error::KeyMismatch {
                found: other.key,
                expected: self.basis,
            });
        }
        if self.precision != other.precision {
            return Err(Error::PrecisionMismatch {
                found: other.precision,
                expected: self.precision,
            });
        }
        tk.check_source(self.key, self.dimension, self.precision)?;

        let header: Ciphertext = Ciphertext {
            data: CiphertextData::Compact(Matrix::alloc(0, 0)),
            key: tk.to(),
            dimension: tk.to_dimension(),
            basis: self.basis,
            basis_dimension: self.basis_dimension,
            precision: self.precision,
        };

        if self.is_zero() || other.is_zero() {
            return Ok(Ciphertext {
                data: CiphertextData::Compact(Matrix::alloc(tk.to_dimension(), a.cols())),
                ..header
            });
        }

        let modulus: Modulus = self.modulus();
        let b: Cow<'_, BitMatrix> = other.bits();
        let mut product: Matrix = Matrix::alloc(a.rows(), b.cols());
        modulus.mat_mul_bits(&mut product, a, &b);
        Ok(Ciphertext {
            data: CiphertextData::Compact(tk.relinearize(&product)),
            ..header
        })
    }

    /// Alias of [Ciphertext::mul].
    pub fn and(&self, other: &Ciphertext, tk: &TransitKey) -> Result<Ciphertext> {
        self.mul(other, tk)
    }

    /// Returns an encryption of m1 XOR m2 computed as m1 + m2 - 2 * m1 * m2,
    /// whose plaintext stays in {0, 1}.
    pub fn xor(&self, other: &Ciphertext, tk: &TransitKey) -> Result<Ciphertext> {
        let t: Ciphertext = self.mul(other, tk)?;
        self.add(other)?.sub(&t)?.sub(&t)
    }

    fn with_compact(&self, data: Matrix) -> Ciphertext {
        Ciphertext {
            data: CiphertextData::Compact(data),
            key: self.key,
            dimension: self.dimension,
            basis: self.basis,
            basis_dimension: self.basis_dimension,
            precision: self.precision,
        }
    }
}

/// Operand order of the product inside a full adder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Order {
    /// `c` is the right operand: its noise is only added, suited to a
    /// carry propagated along a chain.
    Chain,
    /// `c` is the left operand: the bit a XOR b, one level deeper than the
    /// inputs, only has its noise added. Suited to inputs of equal noise.
    Tree,
}

/// Returns (a XOR b XOR c, MAJ(a, b, c)) with two products.
///
/// With t = a * b and x = a + b - 2t = a XOR b:
/// carry = t + x * c and sum = x + c - 2 * x * c. Both plaintexts stay in
/// {0, 1}.
pub(crate) fn full_adder(
    a: &Ciphertext,
    b: &Ciphertext,
    c: &Ciphertext,
    tk: &TransitKey,
    order: Order,
) -> Result<(Ciphertext, Ciphertext)> {
    let t: Ciphertext = a.mul(b, tk)?;
    let x: Ciphertext = a.add(b)?.sub(&t)?.sub(&t)?;
    let xc: Ciphertext = match order {
        Order::Chain => x.mul(c, tk)?,
        Order::Tree => c.mul(&x, tk)?,
    };
    let carry: Ciphertext = t.add(&xc)?;
    let sum: Ciphertext = x.add(c)?.sub(&xc)?.sub(&xc)?;
    Ok((sum, carry))
}

/// Returns an encryption of 1 iff at least two of a, b, c encrypt 1.
///
/// `c` is multiplied from the right: pass the incoming carry there.
pub fn two_of_three(a: &Ciphertext, b: &Ciphertext, c: &Ciphertext, tk: &TransitKey) -> Result<Ciphertext> {
    let (_, carry) = full_adder(a, b, c, tk, Order::Chain)?;
    Ok(carry)
}

/// Returns (sum, carry) with a + b + c = sum + 2 * carry.
pub fn three_to_two(a: &Ciphertext, b: &Ciphertext, c: &Ciphertext, tk: &TransitKey) -> Result<(Ciphertext, Ciphertext)> {
    full_adder(a, b, c, tk, Order::Chain)
}

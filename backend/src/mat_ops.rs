use itertools::izip;

use crate::{BitMatrix, Matrix, Modulus};

/// Exact matrix and vector arithmetic modulo q.
///
/// Results are written into caller-provided receivers, which must already
/// have the output shape.
pub trait MatrixOps {
    /// res = a + b.
    fn mat_add(&self, res: &mut Matrix, a: &Matrix, b: &Matrix);

    /// res += a.
    fn mat_add_inplace(&self, res: &mut Matrix, a: &Matrix);

    /// res = a - b.
    fn mat_sub(&self, res: &mut Matrix, a: &Matrix, b: &Matrix);

    /// res = -res.
    fn mat_neg_inplace(&self, res: &mut Matrix);

    /// res = a * b.
    fn mat_mul(&self, res: &mut Matrix, a: &Matrix, b: &Matrix);

    /// res = a * b where b has 0/1 entries.
    fn mat_mul_bits(&self, res: &mut Matrix, a: &Matrix, b: &BitMatrix);

    /// res = v * a with v a row vector.
    fn vec_mat_mul(&self, res: &mut [u128], v: &[u128], a: &Matrix);

    /// Returns the `col`-th entry of v * a.
    fn vec_mat_mul_col(&self, v: &[u128], a: &Matrix, col: usize) -> u128;

    /// res = v * b with v a row vector and b a bit matrix.
    fn vec_bits_mul(&self, res: &mut [u128], v: &[u128], b: &BitMatrix);

    /// res = a * v with v a column vector.
    fn mat_vec_mul(&self, res: &mut [u128], a: &Matrix, v: &[u128]);
}

impl MatrixOps for Modulus {
    fn mat_add(&self, res: &mut Matrix, a: &Matrix, b: &Matrix) {
        #[cfg(debug_assertions)]
        {
            assert_eq!((a.rows(), a.cols()), (b.rows(), b.cols()));
            assert_eq!((res.rows(), res.cols()), (a.rows(), a.cols()));
        }
        izip!(res.raw_mut().iter_mut(), a.raw().iter(), b.raw().iter()).for_each(|(r, a, b)| *r = self.add(*a, *b));
    }

    fn mat_add_inplace(&self, res: &mut Matrix, a: &Matrix) {
        #[cfg(debug_assertions)]
        {
            assert_eq!((res.rows(), res.cols()), (a.rows(), a.cols()));
        }
        izip!(res.raw_mut().iter_mut(), a.raw().iter()).for_each(|(r, a)| *r = self.add(*r, *a));
    }

    fn mat_sub(&self, res: &mut Matrix, a: &Matrix, b: &Matrix) {
        #[cfg(debug_assertions)]
        {
            assert_eq!((a.rows(), a.cols()), (b.rows(), b.cols()));
            assert_eq!((res.rows(), res.cols()), (a.rows(), a.cols()));
        }
        izip!(res.raw_mut().iter_mut(), a.raw().iter(), b.raw().iter()).for_each(|(r, a, b)| *r = self.sub(*a, *b));
    }

    fn mat_neg_inplace(&self, res: &mut Matrix) {
        res.raw_mut().iter_mut().for_each(|r| *r = self.neg(*r));
    }

    fn mat_mul(&self, res: &mut Matrix, a: &Matrix, b: &Matrix) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(a.cols(), b.rows());
            assert_eq!((res.rows(), res.cols()), (a.rows(), b.cols()));
        }
        res.zero();
        (0..a.rows()).for_each(|i| {
            let res_row: &mut [u128] = res.row_mut(i);
            a.row(i).iter().enumerate().for_each(|(k, a_ik)| {
                if *a_ik != 0 {
                    izip!(res_row.iter_mut(), b.row(k).iter()).for_each(|(r, b_kj)| *r = r.wrapping_add(a_ik.wrapping_mul(*b_kj)));
                }
            });
            res_row.iter_mut().for_each(|r| *r &= self.mask());
        });
    }

    fn mat_mul_bits(&self, res: &mut Matrix, a: &Matrix, b: &BitMatrix) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(a.cols(), b.rows());
            assert_eq!((res.rows(), res.cols()), (a.rows(), b.cols()));
        }
        res.zero();
        (0..a.rows()).for_each(|i| {
            let res_row: &mut [u128] = res.row_mut(i);
            a.row(i).iter().enumerate().for_each(|(k, a_ik)| {
                if *a_ik != 0 {
                    b.ones(k).for_each(|j| res_row[j] = res_row[j].wrapping_add(*a_ik));
                }
            });
            res_row.iter_mut().for_each(|r| *r &= self.mask());
        });
    }

    fn vec_mat_mul(&self, res: &mut [u128], v: &[u128], a: &Matrix) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(v.len(), a.rows());
            assert_eq!(res.len(), a.cols());
        }
        res.iter_mut().for_each(|r| *r = 0);
        izip!(v.iter(), 0..a.rows()).for_each(|(v_i, i)| {
            izip!(res.iter_mut(), a.row(i).iter()).for_each(|(r, a_ij)| *r = r.wrapping_add(v_i.wrapping_mul(*a_ij)));
        });
        res.iter_mut().for_each(|r| *r &= self.mask());
    }

    fn vec_mat_mul_col(&self, v: &[u128], a: &Matrix, col: usize) -> u128 {
        #[cfg(debug_assertions)]
        {
            assert_eq!(v.len(), a.rows());
            assert!(col < a.cols());
        }
        let mut acc: u128 = 0;
        izip!(v.iter(), 0..a.rows()).for_each(|(v_i, i)| acc = acc.wrapping_add(v_i.wrapping_mul(a.at(i, col))));
        acc & self.mask()
    }

    fn vec_bits_mul(&self, res: &mut [u128], v: &[u128], b: &BitMatrix) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(v.len(), b.rows());
            assert_eq!(res.len(), b.cols());
        }
        res.iter_mut().for_each(|r| *r = 0);
        v.iter().enumerate().for_each(|(i, v_i)| {
            b.ones(i).for_each(|j| res[j] = res[j].wrapping_add(*v_i));
        });
        res.iter_mut().for_each(|r| *r &= self.mask());
    }

    fn mat_vec_mul(&self, res: &mut [u128], a: &Matrix, v: &[u128]) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(v.len(), a.cols());
            assert_eq!(res.len(), a.rows());
        }
        res.iter_mut().enumerate().for_each(|(i, r)| {
            *r = izip!(a.row(i).iter(), v.iter()).fold(0u128, |acc, (a_ij, v_j)| acc.wrapping_add(a_ij.wrapping_mul(*v_j))) & self.mask();
        });
    }
}

#[cfg(test)]
mod tests {
    use sampling::source::Source;

    use crate::{BitMatrix, FillUniform, Matrix, MatrixOps, Modulus};

    fn random_matrix(modulus: &Modulus, rows: usize, cols: usize, source: &mut Source) -> Matrix {
        let mut a: Matrix = Matrix::alloc(rows, cols);
        a.raw_mut().fill_uniform(modulus, source);
        a
    }

    fn random_bits(rows: usize, cols: usize, source: &mut Source) -> BitMatrix {
        let mut b: BitMatrix = BitMatrix::alloc(rows, cols);
        (0..rows).for_each(|i| (0..cols).for_each(|j| b.set(i, j, source.next_u64n(2, 1) == 1)));
        b
    }

    #[test]
    fn add_sub_roundtrip() {
        let modulus: Modulus = Modulus::new(61);
        let mut source: Source = Source::new([0u8; 32]);
        let a: Matrix = random_matrix(&modulus, 4, 9, &mut source);
        let b: Matrix = random_matrix(&modulus, 4, 9, &mut source);
        let mut c: Matrix = Matrix::alloc(4, 9);
        let mut d: Matrix = Matrix::alloc(4, 9);
        modulus.mat_add(&mut c, &a, &b);
        modulus.mat_sub(&mut d, &c, &b);
        assert_eq!(d, a);
        modulus.mat_neg_inplace(&mut d);
        modulus.mat_add_inplace(&mut d, &a);
        assert!(d.is_zero());
    }

    #[test]
    fn mul_bits_matches_dense_mul() {
        let modulus: Modulus = Modulus::new(96);
        let mut source: Source = Source::new([0u8; 32]);
        let a: Matrix = random_matrix(&modulus, 5, 70, &mut source);
        let b: BitMatrix = random_bits(70, 130, &mut source);
        let mut have: Matrix = Matrix::alloc(5, 130);
        let mut want: Matrix = Matrix::alloc(5, 130);
        modulus.mat_mul_bits(&mut have, &a, &b);
        modulus.mat_mul(&mut want, &a, &b.to_matrix());
        assert_eq!(have, want);
    }

    #[test]
    fn vector_products_agree() {
        let modulus: Modulus = Modulus::new(127);
        let mut source: Source = Source::new([0u8; 32]);
        let a: Matrix = random_matrix(&modulus, 6, 11, &mut source);
        let mut v: Vec<u128> = vec![0u128; 6];
        v.fill_uniform(&modulus, &mut source);

        let mut res: Vec<u128> = vec![0u128; 11];
        modulus.vec_mat_mul(&mut res, &v, &a);
        (0..11).for_each(|j| assert_eq!(res[j], modulus.vec_mat_mul_col(&v, &a, j)));

        // v * a == (a^T * v^T)^T
        let mut a_t: Matrix = Matrix::alloc(11, 6);
        (0..6).for_each(|i| (0..11).for_each(|j| a_t.set(j, i, a.at(i, j))));
        let mut res_t: Vec<u128> = vec![0u128; 11];
        modulus.mat_vec_mul(&mut res_t, &a_t, &v);
        assert_eq!(res, res_t);

        let b: BitMatrix = random_bits(6, 11, &mut source);
        modulus.vec_bits_mul(&mut res, &v, &b);
        let mut want: Vec<u128> = vec![0u128; 11];
        modulus.vec_mat_mul(&mut want, &v, &b.to_matrix());
        assert_eq!(res, want);
    }
}

use crate::{BitMatrix, Matrix, Modulus};

/// Power-of-two gadget g = (1, 2, ..., 2^{log_q - 1}) and its inverse, the
/// bit decomposition.
///
/// For a matrix a with `rows` rows, G = I_rows (x) g has shape
/// rows x (rows * log_q) and G^{-1}(a) is the (rows * log_q) x cols bit
/// matrix whose row i * log_q + j holds bit j of the entries of row i of a,
/// so that G * G^{-1}(a) = a.
pub trait GadgetOps {
    /// res = v (x) g, i.e. res[i * log_q + j] = v[i] * 2^j.
    fn gadget_expand(&self, res: &mut [u128], v: &[u128]);

    /// Returns G = I_rows (x) g.
    fn gadget_matrix(&self, rows: usize) -> Matrix;

    /// res = G^{-1}(a).
    fn gadget_decompose(&self, res: &mut BitMatrix, a: &Matrix);

    /// res = G * b.
    fn gadget_recompose(&self, res: &mut Matrix, b: &BitMatrix);
}

impl GadgetOps for Modulus {
    fn gadget_expand(&self, res: &mut [u128], v: &[u128]) {
        let log_q: usize = self.log_q();
        #[cfg(debug_assertions)]
        {
            assert_eq!(res.len(), v.len() * log_q);
        }
        v.iter().enumerate().for_each(|(i, v_i)| {
            res[i * log_q..(i + 1) * log_q]
                .iter_mut()
                .enumerate()
                .for_each(|(j, r)| *r = self.reduce(v_i << j));
        });
    }

    fn gadget_matrix(&self, rows: usize) -> Matrix {
        let log_q: usize = self.log_q();
        let mut g: Matrix = Matrix::alloc(rows, rows * log_q);
        (0..rows).for_each(|i| (0..log_q).for_each(|j| g.set(i, i * log_q + j, 1u128 << j)));
        g
    }

    fn gadget_decompose(&self, res: &mut BitMatrix, a: &Matrix) {
        let log_q: usize = self.log_q();
        #[cfg(debug_assertions)]
        {
            assert_eq!(res.rows(), a.rows() * log_q);
            assert_eq!(res.cols(), a.cols());
        }
        res.zero();
        (0..a.rows()).for_each(|i| {
            a.row(i).iter().enumerate().for_each(|(k, a_ik)| {
                let mut x: u128 = self.reduce(*a_ik);
                while x != 0 {
                    let j: usize = x.trailing_zeros() as usize;
                    res.set(i * log_q + j, k, true);
                    x &= x - 1;
                }
            });
        });
    }

    fn gadget_recompose(&self, res: &mut Matrix, b: &BitMatrix) {
        let log_q: usize = self.log_q();
        #[cfg(debug_assertions)]
        {
            assert_eq!(b.rows() % log_q, 0);
            assert_eq!(res.rows() * log_q, b.rows());
            assert_eq!(res.cols(), b.cols());
        }
        res.zero();
        (0..b.rows()).for_each(|r| {
            let (i, j) = (r / log_q, r % log_q);
            let res_row: &mut [u128] = res.row_mut(i);
            b.ones(r).for_each(|k| res_row[k] = res_row[k].wrapping_add(1u128 << j));
        });
        res.raw_mut().iter_mut().for_each(|x| *x &= self.mask());
    }
}

#[cfg(test)]
mod tests {
    use sampling::source::Source;

    use crate::{BitMatrix, FillUniform, GadgetOps, Matrix, MatrixOps, Modulus};

    #[test]
    fn decompose_recompose() {
        let modulus: Modulus = Modulus::new(40);
        let mut source: Source = Source::new([0u8; 32]);
        let mut a: Matrix = Matrix::alloc(3, 17);
        a.raw_mut().fill_uniform(&modulus, &mut source);

        let mut bits: BitMatrix = BitMatrix::alloc(3 * 40, 17);
        modulus.gadget_decompose(&mut bits, &a);

        let mut have: Matrix = Matrix::alloc(3, 17);
        modulus.gadget_recompose(&mut have, &bits);
        assert_eq!(have, a);

        // G * G^{-1}(a) == a through the dense product as well.
        let g: Matrix = modulus.gadget_matrix(3);
        modulus.mat_mul(&mut have, &g, &bits.to_matrix());
        assert_eq!(have, a);
    }

    #[test]
    fn expanded_vector_pairs_with_decomposition() {
        let modulus: Modulus = Modulus::new(33);
        let mut source: Source = Source::new([1u8; 32]);
        let mut v: Vec<u128> = vec![0u128; 4];
        v.fill_uniform(&modulus, &mut source);
        let mut a: Matrix = Matrix::alloc(4, 9);
        a.raw_mut().fill_uniform(&modulus, &mut source);

        let mut v_expanded: Vec<u128> = vec![0u128; 4 * 33];
        modulus.gadget_expand(&mut v_expanded, &v);

        let mut bits: BitMatrix = BitMatrix::alloc(4 * 33, 9);
        modulus.gadget_decompose(&mut bits, &a);

        // (v (x) g) * G^{-1}(a) == v * a
        let mut have: Vec<u128> = vec![0u128; 9];
        let mut want: Vec<u128> = vec![0u128; 9];
        modulus.vec_bits_mul(&mut have, &v_expanded, &bits);
        modulus.vec_mat_mul(&mut want, &v, &a);
        assert_eq!(have, want);
    }
}

use crate::Matrix;

/// Row-major matrix over {0, 1}, packed 64 entries per word.
///
/// Produced by the gadget decomposition: every entry of a flattened
/// ciphertext is a single bit, which keeps products with it cheap
/// (additions only) and bounds the noise they induce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitMatrix {
    data: Vec<u64>,
    rows: usize,
    cols: usize,
    words: usize,
}

impl BitMatrix {
    pub fn alloc(rows: usize, cols: usize) -> Self {
        let words: usize = cols.div_ceil(64);
        Self {
            data: vec![0u64; rows * words],
            rows,
            cols,
            words,
        }
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> bool {
        debug_assert!(j < self.cols);
        (self.data[i * self.words + (j >> 6)] >> (j & 63)) & 1 == 1
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, bit: bool) {
        debug_assert!(j < self.cols);
        let word: &mut u64 = &mut self.data[i * self.words + (j >> 6)];
        if bit {
            *word |= 1u64 << (j & 63)
        } else {
            *word &= !(1u64 << (j & 63))
        }
    }

    #[inline(always)]
    pub fn row(&self, i: usize) -> &[u64] {
        &self.data[i * self.words..(i + 1) * self.words]
    }

    /// Iterates over the column indices of the set entries of row `i`.
    pub fn ones(&self, i: usize) -> Ones<'_> {
        Ones {
            words: self.row(i),
            word_i: 0,
            word: 0,
        }
    }

    pub fn zero(&mut self) {
        self.data.iter_mut().for_each(|w| *w = 0);
    }

    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the same matrix with 0/1 entries stored densely.
    pub fn to_matrix(&self) -> Matrix {
        let mut res: Matrix = Matrix::alloc(self.rows, self.cols);
        (0..self.rows).for_each(|i| self.ones(i).for_each(|j| res.set(i, j, 1)));
        res
    }
}

pub struct Ones<'a> {
    words: &'a [u64],
    word_i: usize,
    word: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    #[inline(always)]
    fn next(&mut self) -> Option<usize> {
        while self.word == 0 {
            if self.word_i == self.words.len() {
                return None;
            }
            self.word = self.words[self.word_i];
            self.word_i += 1;
        }
        let tz: usize = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1;
        Some(((self.word_i - 1) << 6) + tz)
    }
}

#[cfg(test)]
mod tests {
    use super::BitMatrix;

    #[test]
    fn set_get_ones() {
        let mut b: BitMatrix = BitMatrix::alloc(3, 130);
        [0, 63, 64, 127, 129].iter().for_each(|j| b.set(1, *j, true));
        assert!(b.get(1, 64));
        assert!(!b.get(0, 64));
        assert_eq!(b.ones(1).collect::<Vec<usize>>(), vec![0, 63, 64, 127, 129]);
        assert_eq!(b.ones(2).count(), 0);
        b.set(1, 63, false);
        assert_eq!(b.count_ones(), 4);
        assert_eq!(b.to_matrix().at(1, 129), 1);
    }
}

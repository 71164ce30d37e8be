/// Dense row-major matrix of elements of Z/qZ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    data: Vec<u128>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    pub fn alloc(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0u128; rows * cols],
            rows,
            cols,
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<u128>) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "invalid data length: {} != {} * {}",
            data.len(),
            rows,
            cols
        );
        Self { data, rows, cols }
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
    pub fn at(&self, i: usize, j: usize) -> u128 {
        self.data[i * self.cols + j]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, value: u128) {
        self.data[i * self.cols + j] = value
    }

    #[inline(always)]
    pub fn row(&self, i: usize) -> &[u128] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline(always)]
    pub fn row_mut(&mut self, i: usize) -> &mut [u128] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn col(&self, j: usize) -> Vec<u128> {
        (0..self.rows).map(|i| self.at(i, j)).collect()
    }

    pub fn raw(&self) -> &[u128] {
        &self.data
    }

    pub fn raw_mut(&mut self) -> &mut [u128] {
        &mut self.data
    }

    pub fn zero(&mut self) {
        self.data.iter_mut().for_each(|x| *x = 0);
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|x| *x == 0)
    }
}

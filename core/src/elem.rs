use backend::Modulus;

pub trait Infos {
    /// Returns the dimension n of the key the object is bound to.
    fn dimension(&self) -> usize;

    /// Returns the bit precision p, with q = 2^p.
    fn precision(&self) -> usize;

    fn modulus(&self) -> Modulus {
        Modulus::new(self.precision())
    }

    /// Returns N = n * p, the length of the flattened key.
    fn flattened_dimension(&self) -> usize {
        self.dimension() * self.precision()
    }
}

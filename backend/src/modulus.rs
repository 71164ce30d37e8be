/// Power-of-two modulus q = 2^log_q with 1 <= log_q <= 127.
///
/// Elements of Z/qZ are stored as `u128` in [0, q). All arithmetic is
/// carried out with wrapping `u128` operations followed by a mask, which is
/// exact because q divides 2^128.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Modulus {
    log_q: usize,
    mask: u128,
}

pub const MAX_LOG_Q: usize = 127;

impl Modulus {
    pub fn new(log_q: usize) -> Self {
        assert!(
            (1..=MAX_LOG_Q).contains(&log_q),
            "invalid log_q: {} not in [1, {}]",
            log_q,
            MAX_LOG_Q
        );
        Self {
            log_q,
            mask: (1u128 << log_q) - 1,
        }
    }

    /// Returns the base two logarithm of the modulus.
    #[inline(always)]
    pub fn log_q(&self) -> usize {
        self.log_q
    }

    #[inline(always)]
    pub fn mask(&self) -> u128 {
        self.mask
    }

    /// Returns q/2.
    #[inline(always)]
    pub fn q_half(&self) -> u128 {
        1u128 << (self.log_q - 1)
    }

    /// Returns q/4, the decryption noise threshold.
    #[inline(always)]
    pub fn q_quarter(&self) -> u128 {
        debug_assert!(self.log_q >= 2);
        1u128 << (self.log_q - 2)
    }

    #[inline(always)]
    pub fn reduce(&self, x: u128) -> u128 {
        x & self.mask
    }

    #[inline(always)]
    pub fn add(&self, a: u128, b: u128) -> u128 {
        a.wrapping_add(b) & self.mask
    }

    #[inline(always)]
    pub fn sub(&self, a: u128, b: u128) -> u128 {
        a.wrapping_sub(b) & self.mask
    }

    #[inline(always)]
    pub fn neg(&self, a: u128) -> u128 {
        a.wrapping_neg() & self.mask
    }

    #[inline(always)]
    pub fn mul(&self, a: u128, b: u128) -> u128 {
        a.wrapping_mul(b) & self.mask
    }

    /// Maps a signed integer to its representative in [0, q).
    #[inline(always)]
    pub fn lift(&self, x: i128) -> u128 {
        (x as u128) & self.mask
    }

    /// Maps x in [0, q) to its centered representative in [-q/2, q/2).
    #[inline(always)]
    pub fn centered(&self, x: u128) -> i128 {
        let x: u128 = x & self.mask;
        if x >= self.q_half() {
            (x as i128).wrapping_sub((1u128 << self.log_q) as i128)
        } else {
            x as i128
        }
    }

    /// Returns round(x / 2^d) for x in [0, q), d >= 1.
    #[inline(always)]
    pub fn round_shift(&self, x: u128, d: usize) -> u128 {
        debug_assert!(d >= 1 && d <= self.log_q);
        ((x & self.mask) + (1u128 << (d - 1))) >> d
    }
}

use backend::{MAX_LOG_Q, Modulus};

use crate::{ParametersError, Result, SIX_SIGMA};

/// Smallest supported precision: q/4 must leave room for the noise of a
/// fresh encryption.
pub const MIN_PRECISION: usize = 4;

/// Largest supported precision, limited by the `u128` element type.
pub const MAX_PRECISION: usize = MAX_LOG_Q;

/// A key holds the pivot coordinate plus at least one secret coordinate.
pub const MIN_DIMENSION: usize = 2;

/// Standard deviation of the encryption noise.
pub const DEFAULT_SIGMA: f64 = 3.2;

/// Largest bit length of the noise rejection bound SIX_SIGMA * sigma.
pub const MAX_NOISE_BITS: usize = 63;

/// Public parameters of a secret key: its dimension n, the default
/// precision p of the ciphertexts it produces (q = 2^p) and the standard
/// deviation of the encryption noise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameters {
    dimension: usize,
    precision: usize,
    sigma: f64,
}

impl Parameters {
    pub fn new(dimension: usize, precision: usize) -> Result<Self> {
        if dimension < MIN_DIMENSION {
            return Err(ParametersError::InvalidDimension(dimension, MIN_DIMENSION).into());
        }
        check_precision(precision)?;
        Ok(Self {
            dimension,
            precision,
            sigma: DEFAULT_SIGMA,
        })
    }

    pub fn with_sigma(self, sigma: f64) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 || (SIX_SIGMA * sigma).log2().ceil() > MAX_NOISE_BITS as f64 {
            return Err(ParametersError::InvalidSigma(sigma.to_string()).into());
        }
        Ok(Self { sigma, ..self })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Returns q = 2^precision.
    pub fn modulus(&self) -> Modulus {
        Modulus::new(self.precision)
    }

    /// Returns N = dimension * precision.
    pub fn flattened_dimension(&self) -> usize {
        self.dimension * self.precision
    }
}

/// Checks that `precision` lies in [MIN_PRECISION, MAX_PRECISION].
pub fn check_precision(precision: usize) -> Result<()> {
    if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        return Err(ParametersError::InvalidPrecision(precision, MIN_PRECISION, MAX_PRECISION).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use sampling::source::Source;

    use crate::{
        Ciphertext, DEFAULT_SIGMA, DecryptionKey, Error, MAX_PRECISION, MIN_DIMENSION, MIN_PRECISION, Parameters, ParametersError,
        SecretKey,
    };

    #[test]
    fn parameters() {
        let params: Parameters = Parameters::new(5, 96).unwrap();
        assert_eq!(params.dimension(), 5);
        assert_eq!(params.precision(), 96);
        assert_eq!(params.sigma(), DEFAULT_SIGMA);
        assert_eq!(params.flattened_dimension(), 480);
        assert_eq!(params.modulus().log_q(), 96);

        let params: Parameters = params.with_sigma(1.5).unwrap();
        assert_eq!(params.sigma(), 1.5);
        assert_eq!(params.precision(), 96);
    }

    #[test]
    fn invalid_parameters() {
        assert_eq!(
            Parameters::new(1, 96),
            Err(Error::ParametersError(ParametersError::InvalidDimension(1, MIN_DIMENSION)))
        );
        assert_eq!(
            Parameters::new(5, 3),
            Err(Error::ParametersError(ParametersError::InvalidPrecision(3, MIN_PRECISION, MAX_PRECISION)))
        );
        assert_eq!(
            Parameters::new(5, 128),
            Err(Error::ParametersError(ParametersError::InvalidPrecision(128, MIN_PRECISION, MAX_PRECISION)))
        );
        assert!(Parameters::new(5, MIN_PRECISION).is_ok());
        assert!(Parameters::new(5, MAX_PRECISION).is_ok());

        let params: Parameters = Parameters::new(5, 96).unwrap();
        assert!(matches!(params.with_sigma(0.0), Err(Error::ParametersError(ParametersError::InvalidSigma(_)))));
        assert!(matches!(params.with_sigma(f64::NAN), Err(Error::ParametersError(ParametersError::InvalidSigma(_)))));
        assert!(matches!(params.with_sigma(1e19), Err(Error::ParametersError(ParametersError::InvalidSigma(_)))));
        assert!(matches!(params.with_sigma(f64::MAX), Err(Error::ParametersError(ParametersError::InvalidSigma(_)))));
    }

    #[test]
    fn wide_sigma_encrypts() {
        let params: Parameters = Parameters::new(3, 96).unwrap().with_sigma(1e17).unwrap();
        let mut source_xs: Source = Source::new([0u8; 32]);
        let mut source_xa: Source = Source::new([1u8; 32]);
        let mut source_xe: Source = Source::new([2u8; 32]);
        let sk: SecretKey = SecretKey::generate(&params, &mut source_xs);
        let ct: Ciphertext = Ciphertext::encrypt_sk(&sk, true, 96, &mut source_xa, &mut source_xe).unwrap();
        assert!(sk.decrypt(&ct).unwrap());
        assert!(sk.error_bits(&ct).unwrap() <= 60);
    }
}

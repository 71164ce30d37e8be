mod binary;

use sampling::source::Source;

use crate::{Ciphertext, DecryptionKey, Parameters, Result, SecretKey, TransitKey, binary_decrypt, binary_encrypt};

/// Secret key with its relinearization key and the randomness of a test.
pub(crate) struct Context {
    pub(crate) sk: SecretKey,
    pub(crate) tk: TransitKey,
    pub(crate) precision: usize,
    pub(crate) source_xa: Source,
    pub(crate) source_xe: Source,
}

impl Context {
    pub(crate) fn new(dimension: usize, precision: usize) -> Self {
        let params: Parameters = Parameters::new(dimension, precision).unwrap();
        let mut source_xs: Source = Source::new([0u8; 32]);
        let mut source_xa: Source = Source::new([1u8; 32]);
        let mut source_xe: Source = Source::new([2u8; 32]);
        let sk: SecretKey = SecretKey::generate(&params, &mut source_xs);
        let tk: TransitKey = TransitKey::generate(&sk, &sk, precision, &mut source_xa, &mut source_xe).unwrap();
        Self {
            sk,
            tk,
            precision,
            source_xa,
            source_xe,
        }
    }

    pub(crate) fn encrypt(&mut self, bit: bool) -> Ciphertext {
        Ciphertext::encrypt_sk(&self.sk, bit, self.precision, &mut self.source_xa, &mut self.source_xe).unwrap()
    }

    pub(crate) fn decrypt(&self, ct: &Ciphertext) -> bool {
        self.sk.decrypt(ct).unwrap()
    }

    pub(crate) fn error_bits(&self, ct: &Ciphertext) -> usize {
        self.sk.error_bits(ct).unwrap()
    }

    pub(crate) fn encrypt_value(&mut self, value: u64, width: usize) -> Vec<Ciphertext> {
        binary_encrypt(
            &self.sk,
            value,
            width,
            self.precision,
            &mut self.source_xa,
            &mut self.source_xe,
        )
        .unwrap()
    }

    pub(crate) fn decrypt_value(&self, bits: &[Ciphertext]) -> u64 {
        let value: Result<u64> = binary_decrypt(&self.sk, bits);
        value.unwrap()
    }
}

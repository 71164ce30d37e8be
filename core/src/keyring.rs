use sampling::source::Source;
use utils::Map;

use crate::{BootstrappingKey, Ciphertext, FlattenedKey, Result, SecretKey, TransitKey};

/// Secret key together with its derived evaluation keys, built on first use
/// and cached per precision.
pub struct Keyring {
    sk: SecretKey,
    flattened: Map<usize, FlattenedKey>,
    transit: Map<usize, TransitKey>,
    bootstrapping: Map<(usize, usize), BootstrappingKey>,
    source_xa: Source,
    source_xe: Source,
}

impl Keyring {
    /// Wraps `sk`, seeding the randomness of derived keys and encryptions
    /// from `source`.
    pub fn new(sk: SecretKey, source: &mut Source) -> Self {
        let (_, source_xa) = source.branch();
        let (_, source_xe) = source.branch();
        Self {
            sk,
            flattened: Map::new(),
            transit: Map::new(),
            bootstrapping: Map::new(),
            source_xa,
            source_xe,
        }
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.sk
    }

    pub fn encrypt(&mut self, bit: bool, precision: usize) -> Result<Ciphertext> {
        Ciphertext::encrypt_sk(&self.sk, bit, precision, &mut self.source_xa, &mut self.source_xe)
    }

    pub fn flattened_key(&mut self, precision: usize) -> Result<&FlattenedKey> {
        let Self { sk, flattened, .. } = self;
        flattened.get_or_try_insert_with(precision, || sk.flatten(precision))
    }

    /// Returns the relinearization key of the secret key at `precision`.
    pub fn transit_key(&mut self, precision: usize) -> Result<&TransitKey> {
        let Self {
            sk,
            transit,
            source_xa,
            source_xe,
            ..
        } = self;
        transit.get_or_try_insert_with(precision, || TransitKey::generate(sk, sk, precision, source_xa, source_xe))
    }

    /// Returns the bootstrapping key of the secret key onto itself.
    pub fn bootstrapping_key(&mut self, source_precision: usize, target_precision: usize) -> Result<&BootstrappingKey> {
        let Self {
            sk,
            bootstrapping,
            source_xa,
            source_xe,
            ..
        } = self;
        bootstrapping.get_or_try_insert_with((source_precision, target_precision), || {
            BootstrappingKey::generate(sk, sk, source_precision, target_precision, source_xa, source_xe)
        })
    }

    /// Refreshes `ct` at `target_precision` and returns the result at
    /// `source_precision`.
    pub fn bootstrap(&mut self, ct: &Ciphertext, source_precision: usize, target_precision: usize) -> Result<Ciphertext> {
        let Self {
            sk,
            transit,
            bootstrapping,
            source_xa,
            source_xe,
            ..
        } = self;
        let tk: &TransitKey = transit.get_or_try_insert_with(source_precision, || {
            TransitKey::generate(sk, sk, source_precision, source_xa, source_xe)
        })?;
        let bk: &BootstrappingKey = bootstrapping.get_or_try_insert_with((source_precision, target_precision), || {
            BootstrappingKey::generate(sk, sk, source_precision, target_precision, source_xa, source_xe)
        })?;
        bk.bootstrap(ct, tk)
    }
}

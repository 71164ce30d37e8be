use crate::{
    Ciphertext, Error, FlattenedKey, binary_decrypt, binary_encode, bit_length, tests::Context,
};

#[test]
fn binary_roundtrip() {
    let mut ctx: Context = Context::new(5, 96);
    let bits: Vec<Ciphertext> = ctx.encrypt_value(42, 8);
    assert_eq!(bits.len(), 8);
    assert_eq!(ctx.decrypt_value(&bits), 42);
    assert_eq!(ctx.decrypt_value(&bits[..3]), 42 & 0b111);

    let flat: FlattenedKey = ctx.sk.flatten(96).unwrap();
    let flattened: Vec<Ciphertext> = bits.iter().map(|ct| ct.flatten()).collect();
    assert_eq!(binary_decrypt(&flat, &flattened).unwrap(), 42);

    let max: Vec<Ciphertext> = ctx.encrypt_value(u64::MAX, 64);
    assert_eq!(ctx.decrypt_value(&max), u64::MAX);
}

#[test]
fn binary_encoding() {
    let mut ctx: Context = Context::new(5, 96);
    let ct: Ciphertext = ctx.encrypt(false);
    let zero: Ciphertext = ct.trivial_like(false).unwrap();
    let one: Ciphertext = ct.trivial_like(true).unwrap();
    let bits: Vec<Ciphertext> = binary_encode(0b1011_0110, 10, &zero, &one).unwrap();
    assert_eq!(bits.len(), 10);
    assert_eq!(ctx.decrypt_value(&bits), 0b1011_0110);
}

#[test]
fn binary_checks() {
    let mut ctx: Context = Context::new(5, 96);
    let ct: Ciphertext = ctx.encrypt(false);
    assert_eq!(
        binary_encode(256, 8, &ct, &ct).unwrap_err(),
        Error::ValueOverflow { value: 256, width: 8 }
    );
    assert_eq!(binary_encode(1, 0, &ct, &ct).unwrap_err(), Error::InvalidWidth(0));
    assert_eq!(binary_encode(1, 65, &ct, &ct).unwrap_err(), Error::InvalidWidth(65));
    let many: Vec<Ciphertext> = vec![ct.clone(); 65];
    assert_eq!(binary_decrypt(&ctx.sk, &many).unwrap_err(), Error::InvalidWidth(65));
    assert_eq!(binary_decrypt(&ctx.sk, &[]).unwrap(), 0);
}

#[test]
fn bit_lengths() {
    assert_eq!(bit_length(0), 0);
    assert_eq!(bit_length(1), 1);
    assert_eq!(bit_length(92), 7);
    assert_eq!(bit_length(u64::MAX), 64);
}

use std::iter::once;

use rayon::prelude::*;

use crate::{
    Ciphertext, Error, Result, TransitKey,
    gates::{Order, full_adder},
};

/// Returns a trivial encryption of zero bound to the first ciphertext found
/// in `values`.
fn zero_like(values: &[&[Ciphertext]]) -> Result<Ciphertext> {
    match values.iter().find_map(|v| v.first()) {
        Some(ct) => ct.trivial_like(false),
        None => Err(Error::TooFewValues(0, 1)),
    }
}

#[inline(always)]
fn bit_at<'a>(value: &'a [Ciphertext], i: usize, zero: &'a Ciphertext) -> &'a Ciphertext {
    value.get(i).unwrap_or(zero)
}

/// Ripple-carry addition of two encrypted integers.
///
/// Inputs are least significant bit first and zero-padded to the longer
/// one; the result is one bit wider. Each position costs a full adder of
/// two products, with the carry as the right operand so that its noise
/// grows linearly along the chain.
pub fn encoded_add(a: &[Ciphertext], b: &[Ciphertext], tk: &TransitKey) -> Result<Vec<Ciphertext>> {
    let zero: Ciphertext = zero_like(&[a, b])?;
    let width: usize = a.len().max(b.len());
    let mut res: Vec<Ciphertext> = Vec::with_capacity(width + 1);
    let mut carry: Ciphertext = zero.clone();
    for i in 0..width {
        let (sum, next) = full_adder(bit_at(a, i, &zero), bit_at(b, i, &zero), &carry, tk, Order::Chain)?;
        res.push(sum);
        carry = next;
    }
    res.push(carry);
    Ok(res)
}

/// Carry-save reduction of three encrypted integers to two with the same
/// sum.
///
/// Returns `(sums, carries)`: `sums` has the width w of the widest input,
/// `carries` has width w + 1 with a trivial zero as its lowest bit.
/// Columns are independent and evaluated in parallel.
pub fn encoded_three_to_two(
    a: &[Ciphertext],
    b: &[Ciphertext],
    c: &[Ciphertext],
    tk: &TransitKey,
) -> Result<(Vec<Ciphertext>, Vec<Ciphertext>)> {
    let zero: Ciphertext = zero_like(&[a, b, c])?;
    let width: usize = a.len().max(b.len()).max(c.len());
    let columns: Vec<(Ciphertext, Ciphertext)> = (0..width)
        .into_par_iter()
        .map(|i| {
            full_adder(
                bit_at(a, i, &zero),
                bit_at(b, i, &zero),
                bit_at(c, i, &zero),
                tk,
                Order::Tree,
            )
        })
        .collect::<Result<Vec<_>>>()?;
    let (sums, carries): (Vec<Ciphertext>, Vec<Ciphertext>) = columns.into_iter().unzip();
    Ok((sums, once(zero).chain(carries).collect()))
}

/// Returns a + b + c over max width + 2 bits.
pub fn encoded_add3(a: &[Ciphertext], b: &[Ciphertext], c: &[Ciphertext], tk: &TransitKey) -> Result<Vec<Ciphertext>> {
    let (sums, carries) = encoded_three_to_two(a, b, c, tk)?;
    encoded_add(&sums, &carries, tk)
}

/// Sum of encrypted integers modulo 2^bits.
///
/// Every input is zero-padded or truncated to `bits`. Triples are reduced
/// to pairs with [encoded_three_to_two] until at most two integers remain,
/// which are then added with [encoded_add]. Every intermediate is
/// truncated to `bits`, so any overflow past `bits` is discarded.
pub fn multi_add(values: &[Vec<Ciphertext>], bits: usize, tk: &TransitKey) -> Result<Vec<Ciphertext>> {
    if bits == 0 {
        return Err(Error::InvalidWidth(bits));
    }
    let slices: Vec<&[Ciphertext]> = values.iter().map(|v| v.as_slice()).collect();
    let zero: Ciphertext = zero_like(&slices)?;

    let mut layer: Vec<Vec<Ciphertext>> = slices
        .iter()
        .map(|v| (0..bits).map(|i| bit_at(v, i, &zero).clone()).collect())
        .collect();

    let mut depth: usize = 0;
    while layer.len() > 2 {
        layer = layer
            .par_chunks(3)
            .map(|chunk| -> Result<Vec<Vec<Ciphertext>>> {
                match chunk {
                    [a, b, c] => {
                        let (mut sums, mut carries) = encoded_three_to_two(a, b, c, tk)?;
                        sums.truncate(bits);
                        carries.truncate(bits);
                        Ok(vec![sums, carries])
                    }
                    _ => Ok(chunk.to_vec()),
                }
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();
        depth += 1;
        log::trace!("multi_add: depth {} leaves {} operands", depth, layer.len());
    }

    let mut res: Vec<Ciphertext> = if let [a, b] = layer.as_slice() {
        encoded_add(a, b, tk)?
    } else {
        layer.swap_remove(0)
    };
    res.truncate(bits);
    Ok(res)
}

//! GOST R 34.10-2012 key-agreement (VKO) and the masked-private-key
//! unmasking routine, ported from `gostdsa-vko.c` / `gostdsa-mask.c`
//! (spec.md §4.3).

use crate::curve::CurveParams;
use crate::field::{FieldElement, Modulus};
use crate::weierstrass::{Affine, Jacobian};
use crypto_bigint::Uint;

/// `[d * ukm mod q] * Q`, affine output `(x_le || y_le)` each
/// `ceil(bit_size/8)` bytes, little-endian (spec.md §4.3, §6).
///
/// `ukm` is little-endian per RFC 7836; a caller passing an all-zero `ukm`
/// gets it padded with a trailing `1` first, matching `gostdsa-vko.c`'s
/// `if (gnutls_mpi_get_bits(ukm) == 0) mpz_set_ui(ukm_v, 1);` special
/// case (an all-zero UKM would otherwise annihilate the private key).
pub fn vko<const L: usize>(
    d: &Uint<L>,
    q_point: &Jacobian<L>,
    ukm_le: &[u8],
    curve: &CurveParams<L>,
    out: &mut [u8],
) -> crate::error::Result<()> {
    let byte_size = (curve.bit_size + 7) / 8;
    if out.len() != 2 * byte_size {
        return Err(crate::error::Error::BadLength);
    }

    let ukm_is_zero = ukm_le.iter().all(|&b| b == 0);
    let ukm_scalar = if ukm_is_zero {
        Uint::<L>::from(1u64)
    } else {
        uint_from_le(ukm_le)
    };

    // scalar = d * ukm mod q
    let d_mod_q = crate::field::FieldElement::from_uint(*d, &curve.order);
    let ukm_mod_q = crate::field::FieldElement::from_uint(ukm_scalar, &curve.order);
    let scalar = d_mod_q.mul(&ukm_mod_q).to_uint();

    let scalar_bits = super::bits_msb_first(&scalar, curve.bit_size);
    let product = crate::weierstrass::scalar_mul(&scalar_bits, q_point, curve);
    let affine = product.to_affine(&curve.p)?;

    write_le_padded(&affine.x.to_uint(), &mut out[..byte_size]);
    write_le_padded(&affine.y.to_uint(), &mut out[byte_size..]);
    Ok(())
}

/// Unmask a GOST private key blob: `K_0, M_1, M_2, ...` concatenated,
/// each chunk `byte_size` bytes, true key `K_0 * M_1 * M_2 * ... mod q`
/// (`gostdsa-mask.c`), folded left to right exactly as the reference
/// iterates ("multiplies-and-reduces leftmost to rightmost").
pub fn unmask<const L: usize>(blob: &[u8], byte_size: usize, order: &Modulus<L>) -> crate::error::Result<Uint<L>> {
    if blob.is_empty() || blob.len() % byte_size != 0 {
        return Err(crate::error::Error::BadLength);
    }
    let mut chunks = blob.chunks_exact(byte_size);
    let k0 = uint_from_le(chunks.next().expect("non-empty, checked above"));
    let mut acc = FieldElement::from_uint(k0, order);
    for chunk in chunks {
        let m = FieldElement::from_uint(uint_from_le(chunk), order);
        acc = acc.mul(&m);
    }
    Ok(acc.to_uint())
}

fn uint_from_le<const L: usize>(bytes: &[u8]) -> Uint<L> {
    let mut be = alloc::vec::Vec::with_capacity(bytes.len());
    be.extend(bytes.iter().rev());
    Uint::<L>::from_be_slice_vartime(&be)
}

fn write_le_padded<const L: usize>(v: &Uint<L>, out: &mut [u8]) {
    let be = v.to_be_bytes_vartime();
    let n = be.len().min(out.len());
    out.fill(0);
    for i in 0..n {
        out[i] = be[be.len() - 1 - i];
    }
}

extern crate alloc;

#[allow(dead_code)]
pub(crate) type AffineAlias<const L: usize> = Affine<L>;

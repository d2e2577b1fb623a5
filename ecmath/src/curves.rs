//! Concrete curve parameters (spec.md §3's "Curve Descriptor" instantiated
//! per curve). Each submodule is a `const CurveParams<L>` plus the
//! curve-specific constants (`b`, `d`, `a24`) that `curve::CurveParams`
//! deliberately leaves out of the shared struct.

use crate::curve::CurveParams;
use crate::field::Modulus;
use crypto_bigint::Uint;

/// NIST P-256 / secp256r1 (spec.md §1: "NIST P-curves").
pub mod p256 {
    use super::*;

    pub const P: Uint<4> = Uint::<4>::from_be_hex("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF");
    pub const ORDER: Uint<4> = Uint::<4>::from_be_hex("0FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC63255");
    /// `a = -3` for every Weierstrass curve this crate ships.
    pub const B: Uint<4> = Uint::<4>::from_be_hex("05AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604");
    pub const GX: Uint<4> = Uint::<4>::from_be_hex("06B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C29");
    pub const GY: Uint<4> = Uint::<4>::from_be_hex("04FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F");

    pub fn params() -> CurveParams<4> {
        CurveParams {
            p: Modulus::new(P),
            order: Modulus::new(ORDER),
            bit_size: 256,
        }
    }
}

/// NIST P-384 / secp384r1.
pub mod p384 {
    use super::*;

    pub const P: Uint<6> = Uint::<6>::from_be_hex(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFF",
    );
    pub const ORDER: Uint<6> = Uint::<6>::from_be_hex(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC7634D81F4372DDF581A0DB248B0A77AECEC196ACCC52973",
    );
    pub const B: Uint<6> = Uint::<6>::from_be_hex(
        "B3312FA7E23EE7E4988E056BE3F82D19181D9C6EFE8141120314088F5013875AC656398D8A2ED19D2A85C8EDD3EC2AEF",
    );
    pub const GX: Uint<6> = Uint::<6>::from_be_hex(
        "AA87CA22BE8B05378EB1C71EF320AD746E1D3B628BA79B9859F741E082542A385502F25DBF55296C3A545E3872760AB7",
    );
    pub const GY: Uint<6> = Uint::<6>::from_be_hex(
        "3617DE4A96262C6F5D9E98BF9292DC29F8F41DBD289A147CE9DA3113B5F0B8C00A60B1CE1D7E819D7A431D7C90EA0E5F",
    );

    pub fn params() -> CurveParams<6> {
        CurveParams {
            p: Modulus::new(P),
            order: Modulus::new(ORDER),
            bit_size: 384,
        }
    }
}

/// NIST P-521 / secp521r1. `Uint<9>` (576-bit container) holds the 521-bit
/// field; the top 55 bits of every constant here are zero.
pub mod p521 {
    use super::*;

    pub const P: Uint<9> = Uint::<9>::from_be_hex(
        "00000000000001FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    );
    pub const ORDER: Uint<9> = Uint::<9>::from_be_hex(
        "00000000000001FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFA51868783BF2F966B7FCC0148F709A5D03BB5C9B8899C47AEBB6FB71E91386409",
    );
    pub const B: Uint<9> = Uint::<9>::from_be_hex(
        "00000000000000051953EB9618E1C9A1F929A21A0B68540EEA2DA725B99B315F3B8B489918EF109E156193951EC7E937B1652C0BD3BB1BF073573DF883D2C34F1EF451FD46B503F0",
    );
    pub const GX: Uint<9> = Uint::<9>::from_be_hex(
        "000000000000000C6858E06B70404E9CD9E3ECB662395B4429C648139053FB521F828AF606B4D3DBAA14B5E77EFE75928FE1DC127A2FFA8DE3348B3C1856A429BF97E7E31C2E5BD6",
    );
    pub const GY: Uint<9> = Uint::<9>::from_be_hex(
        "0000000000000011839296A789A3BC0045C8A5FB42C7D1BD998F54449579B446817AFBD17273E662C97EE72995EF42640C550B9013FAD0761353C7086A272C24088BE94769FD1665",
    );

    pub fn params() -> CurveParams<9> {
        CurveParams {
            p: Modulus::new(P),
            order: Modulus::new(ORDER),
            bit_size: 521,
        }
    }
}

/// GOST R 34.10-2012, 256-bit (CryptoPro-A parameter set). The one GOST
/// curve this crate ships a table for; `gtls-pk` threads `CurveId::Gost256A`
/// through the same Weierstrass code path P-256 uses (spec.md §1: "GOST
/// curves" share the short-Weierstrass form). Representative parameter set
/// per DESIGN.md's Open Question resolution — see that file for why exact
/// OID-to-parameter mapping is out of scope here.
pub mod gost256a {
    use super::*;

    pub const P: Uint<4> = Uint::<4>::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFD97");
    pub const ORDER: Uint<4> =
        Uint::<4>::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF6C611070995AD10045841B09B761B893");
    pub const B: Uint<4> = Uint::<4>::from_be_hex("00000000000000000000000000000000000000000000000000000000000000A6");
    pub const GX: Uint<4> = Uint::<4>::from_be_hex("0000000000000000000000000000000000000000000000000000000000000001");
    pub const GY: Uint<4> =
        Uint::<4>::from_be_hex("8D91E471E0989CDA27DF505A453F2B7635294F2DDF23E3B122ACC99C9E9F1E14");

    pub fn params() -> CurveParams<4> {
        CurveParams {
            p: Modulus::new(P),
            order: Modulus::new(ORDER),
            bit_size: 256,
        }
    }
}

/// X25519 / Ed25519 field and order (RFC 7748 / RFC 8032).
pub mod curve25519 {
    use super::*;

    pub const P: Uint<4> = Uint::<4>::from_be_hex("7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFED");
    /// Group order `l = 2^252 + 27742317777372353535851937790883648493`.
    pub const ORDER: Uint<4> =
        Uint::<4>::from_be_hex("1000000000000000000000000000000014DEF9DEA2F79CD65812631A5CF5D3ED");
    /// `a24 = (A+2)/4` for the Montgomery form, `A = 486662`.
    pub const A24: u64 = 121_665;
    /// Twisted-Edwards `d = -121665/121666 mod p`.
    pub const EDWARDS_D: Uint<4> =
        Uint::<4>::from_be_hex("52036CEE2B6FFE738CC740797779E89800700A4D4141D8AB75EB4DCA135978A3");

    pub fn field() -> Modulus<4> {
        Modulus::new(P)
    }

    pub fn order() -> Modulus<4> {
        Modulus::new(ORDER)
    }
}

/// X448 / Ed448 field and order (RFC 7748 / RFC 8032).
pub mod curve448 {
    use super::*;

    /// `p = 2^448 - 2^224 - 1`.
    pub const P: Uint<7> = Uint::<7>::from_be_hex(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    );
    /// `n = 2^446 - 13818066809895115352007386748515426880336692474882178609894547503885`.
    pub const ORDER: Uint<7> = Uint::<7>::from_be_hex(
        "3FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF7CCA23E9C44EDB49AED63690216CC2728DC58F552378C292AB5844F3",
    );
    /// `a24 = (A-2)/4` for the Montgomery form, `A = 156326`.
    pub const A24: u64 = 39_081;
    /// Edwards `d` for Ed448 (`a = 1`): `d = p - 39081`.
    pub const EDWARDS_D: Uint<7> = Uint::<7>::from_be_hex(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF6756",
    );

    pub fn field() -> Modulus<7> {
        Modulus::new(P)
    }

    pub fn order() -> Modulus<7> {
        Modulus::new(ORDER)
    }
}

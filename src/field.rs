use std::fmt;
use num_bigint::BigUint;
use num_traits::Num;
use serde::{Deserialize, Serialize};

/// The prime fields a circuit can be extracted over, identified by the curve whose scalar field
/// they are.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Bn254,
    Bls12_377,
    Bls12_381,
    Bw6_761,
}

impl FieldId {
    fn modulus_hex(self) -> &'static str {
        match self {
            FieldId::Bn254 =>
                "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001",
            FieldId::Bls12_377 =>
                "12ab655e9a2ca55660b44d1e5c37b00159aa76fed00000010a11800000000001",
            FieldId::Bls12_381 =>
                "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001",
            FieldId::Bw6_761 => concat!(
                "1ae3a4617c510eac63b05c06ca1493b1a22d9f300f5138f1ef3622fba094800170b5d443",
                "00000008508c00000000001",
            ),
        }
    }

    /// The field modulus.
    pub fn scalar_field(self) -> BigUint {
        BigUint::from_str_radix(self.modulus_hex(), 16)
            .unwrap_or_else(|e| panic!("bad modulus constant for {}: {}", self, e))
    }

    /// Number of bits needed to represent any field element.  This is the default width of
    /// `to_binary`.
    pub fn bit_len(self) -> u64 {
        self.scalar_field().bits()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            FieldId::Bn254 => "BN254",
            FieldId::Bls12_377 => "BLS12-377",
            FieldId::Bls12_381 => "BLS12-381",
            FieldId::Bw6_761 => "BW6-761",
        };
        fmt.write_str(name)
    }
}

use core::fmt;

use digest::generic_array::typenum::U32;
use digest::generic_array::GenericArray;

use crate::consts::DIGEST_LEN;

/// A finished SM3 digest, in wire (big-endian) order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash256([u8; DIGEST_LEN]);

impl Hash256 {
    /// Parses 64 hex digits. Either case is accepted.
    pub fn from_hex(s: &str) -> Result<Hash256, hex::FromHexError> {
        let mut out = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Hash256(out))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for Hash256 {
    fn from(bytes: [u8; DIGEST_LEN]) -> Hash256 {
        Hash256(bytes)
    }
}

impl From<GenericArray<u8, U32>> for Hash256 {
    fn from(bytes: GenericArray<u8, U32>) -> Hash256 {
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(bytes.as_slice());
        Hash256(out)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::LowerHex for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({:x})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const ABC: &str = "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0";

    #[test]
    fn hex_round_trip_keeps_leading_zeros() {
        let mut bytes = [0u8; DIGEST_LEN];
        bytes[0] = 0x0a;
        bytes[31] = 0x01;
        let hash = Hash256::from(bytes);
        let text = std::format!("{}", hash);
        assert_eq!(text.len(), 64);
        assert!(text.starts_with("0a00"));
        assert!(text.ends_with("0001"));
        assert_eq!(Hash256::from_hex(&text).unwrap(), hash);
    }

    #[test]
    fn from_hex_is_case_insensitive() {
        let upper = ABC.to_uppercase();
        assert_eq!(Hash256::from_hex(&upper).unwrap(), Hash256::from_hex(ABC).unwrap());
        assert_eq!(
            Hash256::from_hex(ABC).unwrap().as_bytes(),
            &hex!("66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0")
        );
    }

    #[test]
    fn from_hex_rejects_wrong_length_and_digits() {
        assert!(Hash256::from_hex(&ABC[..62]).is_err());
        assert!(Hash256::from_hex(&std::format!("{}00", ABC)).is_err());
        assert!(Hash256::from_hex(&ABC.replace('6', "g")).is_err());
    }
}

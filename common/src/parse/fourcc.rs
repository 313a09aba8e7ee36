use std::fmt;

use bytes::{Buf, BufMut};

/// A four-byte character code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FourCC {
    /// The character code, as an array of four bytes.
    pub value: [u8; 4],
}

impl FourCC {
    /// The encoded length of a [`FourCC`], in bytes.
    pub const ENCODED_LEN: u32 = 4;

    /// Construct a [`FourCC`] from a string, padding it with trailing spaces.
    pub const fn from_str(name: &str) -> Self {
        let name = name.as_bytes();
        let mut fourcc = [b' '; 4];
        let mut name_idx = 0;
        while name_idx < name.len() {
            fourcc[name_idx] = name[name_idx];
            name_idx += 1;
        }
        FourCC { value: fourcc }
    }

    /// Parse a [`FourCC`] from a [`Buf`].
    ///
    /// The position of `input` is advanced by 4.
    ///
    /// # Panics
    ///
    /// This function panics if `input.remaining() < 4`.
    pub fn parse<B: Buf>(mut input: B) -> Self {
        let mut value = [0; 4];
        input.copy_to_slice(&mut value);
        Self { value }
    }

    /// Writes `self` to the [`BufMut`] `out`.
    pub fn put_buf<B: BufMut>(&self, mut out: B) {
        out.put(&self.value[..])
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Ok(string) = std::str::from_utf8(&self.value) {
            let string = string.trim();
            write!(f, "{string}")
        } else {
            write!(f, "0x{:08x}", u32::from_be_bytes(self.value))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_str_pads() {
        assert_eq!(FourCC::from_str("VP8").value, *b"VP8 ");
        assert_eq!(FourCC::from_str("ANMF").value, *b"ANMF");
    }

    #[test]
    fn display() {
        assert_eq!(FourCC::from_str("VP8").to_string(), "VP8");
        assert_eq!(FourCC { value: [0xff, 0, 0, 0x01] }.to_string(), "0xff000001");
    }

    #[test]
    fn parse_advances() {
        let mut input = &b"VP8Lrest"[..];
        assert_eq!(FourCC::parse(&mut input), FourCC::from_str("VP8L"));
        assert_eq!(input, b"rest");
    }
}

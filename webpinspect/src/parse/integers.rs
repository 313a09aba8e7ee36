#![allow(missing_docs)]

use std::mem::size_of;
use std::num::NonZeroU32;

use bytes::{Buf, BufMut};
use webpinspect_common::error::WhileParsingType;
use webpinspect_common::parse::FourCC;
use webpinspect_common::{ensure_attach, Result, ResultExt};

use super::ParseError;

/// A fixed-width little-endian field read from a chunk payload.
pub trait WebpPrim: Sized {
    const ENCODED_LEN: u32;

    fn parse<B: Buf>(buf: B) -> Result<Self, ParseError>;

    fn put_buf<B: BufMut>(&self, buf: B);
}

/// An unsigned little-endian integer of `N` bytes, where byte `i` contributes `byte << (8 * i)`.
///
/// Only `N` in `1..=3` is supported; other widths fail to compile when parsed or written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct UintLe<const N: u32>(u32);

pub type U24 = UintLe<3>;

/// A 24-bit field storing its value minus one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct OneBasedU24(NonZeroU32);

/// A 24-bit field storing half of its (even) value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct EvenU24(u32);

//
// WebpPrim impls
//

macro_rules! webp_int {
    ($($ty:ty => ($get_fun:ident, $put_fun:ident)),+ $(,)?) => {
        $(impl WebpPrim for $ty {
            const ENCODED_LEN: u32 = size_of::<Self>() as u32;

            fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
                ensure_attach!(
                    buf.remaining() >= Self::ENCODED_LEN as usize,
                    ParseError::BufferUnderrun,
                    WhileParsingType::new::<Self>(),
                );
                Ok(buf.$get_fun())
            }

            fn put_buf<B: BufMut>(&self, mut buf: B) {
                buf.$put_fun(*self)
            }
        })+
    };
}

webp_int! {
    u8 => (get_u8, put_u8),
    u16 => (get_u16_le, put_u16_le),
    u32 => (get_u32_le, put_u32_le),
    i32 => (get_i32_le, put_i32_le),
}

impl WebpPrim for FourCC {
    const ENCODED_LEN: u32 = 4;

    fn parse<B: Buf>(buf: B) -> Result<Self, ParseError> {
        ensure_attach!(
            buf.remaining() >= Self::ENCODED_LEN as usize,
            ParseError::BufferUnderrun,
            WhileParsingType::new::<Self>(),
        );
        Ok(FourCC::parse(buf))
    }

    fn put_buf<B: BufMut>(&self, buf: B) {
        FourCC::put_buf(self, buf)
    }
}

//
// UintLe impls
//

impl<const N: u32> UintLe<N> {
    const SUPPORTED_LEN: () = assert!(N >= 1 && N <= 3, "UintLe only supports 1 to 3 byte fields");

    /// The largest value an `N` byte field can hold.
    pub const MAX: u32 = ((1u64 << (8 * N)) - 1) as u32;

    /// # Panics
    ///
    /// Panics if `value` is greater than [`MAX`](Self::MAX).
    pub fn new(value: u32) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::SUPPORTED_LEN;
        assert!(value <= Self::MAX, "{value} does not fit in a {N} byte field");
        Self(value)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl<const N: u32> WebpPrim for UintLe<N> {
    const ENCODED_LEN: u32 = N;

    fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
        #[allow(clippy::let_unit_value)]
        let () = Self::SUPPORTED_LEN;
        ensure_attach!(
            buf.remaining() >= Self::ENCODED_LEN as usize,
            ParseError::BufferUnderrun,
            WhileParsingType::new::<Self>(),
        );
        Ok(Self(buf.get_uint_le(Self::ENCODED_LEN as usize) as u32))
    }

    fn put_buf<B: BufMut>(&self, mut buf: B) {
        #[allow(clippy::let_unit_value)]
        let () = Self::SUPPORTED_LEN;
        buf.put_uint_le(self.0.into(), Self::ENCODED_LEN as usize)
    }
}

//
// OneBasedU24 impls
//

impl OneBasedU24 {
    /// The largest value the field can hold.
    pub const MAX: u32 = U24::MAX + 1;

    /// # Panics
    ///
    /// Panics if `value` is greater than [`MAX`](Self::MAX).
    pub fn new(value: NonZeroU32) -> Self {
        assert!(value.get() <= Self::MAX, "{value} does not fit in a one-based 24-bit field");
        Self(value)
    }

    pub fn get(&self) -> NonZeroU32 {
        self.0
    }
}

impl WebpPrim for OneBasedU24 {
    const ENCODED_LEN: u32 = U24::ENCODED_LEN;

    fn parse<B: Buf>(buf: B) -> Result<Self, ParseError> {
        let value = U24::parse(buf).while_parsing_type()?;
        Ok(Self(NonZeroU32::MIN.saturating_add(value.get())))
    }

    fn put_buf<B: BufMut>(&self, buf: B) {
        U24::new(self.0.get() - 1).put_buf(buf)
    }
}

//
// EvenU24 impls
//

impl EvenU24 {
    /// The largest value the field can hold.
    pub const MAX: u32 = U24::MAX * 2;

    /// # Panics
    ///
    /// Panics if `value` is odd or greater than [`MAX`](Self::MAX).
    pub fn new(value: u32) -> Self {
        assert!(value % 2 == 0 && value <= Self::MAX, "{value} does not fit in an even 24-bit field");
        Self(value)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl WebpPrim for EvenU24 {
    const ENCODED_LEN: u32 = U24::ENCODED_LEN;

    fn parse<B: Buf>(buf: B) -> Result<Self, ParseError> {
        let value = U24::parse(buf).while_parsing_type()?;
        Ok(Self(value.get() * 2))
    }

    fn put_buf<B: BufMut>(&self, buf: B) {
        U24::new(self.0 / 2).put_buf(buf)
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn uint_le_widths() {
        assert_eq!(UintLe::<1>::parse(&[0xabu8][..]).unwrap().get(), 0xab);
        assert_eq!(UintLe::<2>::parse(&[0x34u8, 0x12][..]).unwrap().get(), 0x1234);
        assert_eq!(U24::parse(&[0x56u8, 0x34, 0x12][..]).unwrap().get(), 0x123456);
    }

    #[test]
    fn uint_le_advances() {
        let mut buf = &[1u8, 0, 0, 2, 0, 0][..];
        assert_eq!(U24::parse(&mut buf).unwrap().get(), 1);
        assert_eq!(U24::parse(&mut buf).unwrap().get(), 2);
        assert!(buf.is_empty());
    }

    #[test]
    fn uint_le_underrun() {
        let err = U24::parse(&[0xffu8, 0xff][..]).unwrap_err();
        assert_matches!(err.get_ref(), ParseError::BufferUnderrun, "{err:?}");
    }

    #[test]
    fn u32_little_endian() {
        assert_eq!(u32::parse(&[0x0au8, 0, 0, 0][..]).unwrap(), 10);
        assert_eq!(u16::parse(&[0x00u8, 0x01][..]).unwrap(), 0x100);
        assert_eq!(i32::parse(&[0xffu8; 4][..]).unwrap(), -1);
    }

    #[test]
    fn one_based() {
        assert_eq!(OneBasedU24::parse(&[0u8, 0, 0][..]).unwrap().get().get(), 1);
        assert_eq!(OneBasedU24::parse(&[0xffu8, 0xff, 0xff][..]).unwrap().get().get(), 1 << 24);
        let err = OneBasedU24::parse(&[0u8][..]).unwrap_err();
        assert_matches!(err.get_ref(), ParseError::BufferUnderrun, "{err:?}");
    }

    #[test]
    fn even() {
        assert_eq!(EvenU24::parse(&[3u8, 0, 0][..]).unwrap().get(), 6);
        let mut out = vec![];
        EvenU24::new(6).put_buf(&mut out);
        assert_eq!(out, [3, 0, 0]);
    }

    #[test]
    fn max_values() {
        assert_eq!(UintLe::<1>::MAX, 0xff);
        assert_eq!(U24::MAX, 0xff_ffff);
        assert_eq!(OneBasedU24::MAX, 1 << 24);
        assert_eq!(EvenU24::MAX, 0x1ff_fffe);

        let mut out = vec![];
        EvenU24::new(EvenU24::MAX).put_buf(&mut out);
        OneBasedU24::new(NonZeroU32::new(OneBasedU24::MAX).unwrap()).put_buf(&mut out);
        assert_eq!(out, [0xff; 6]);
    }

    #[test]
    #[should_panic]
    fn uint_le_too_wide() {
        UintLe::<1>::new(0x100);
    }

    #[test]
    #[should_panic]
    fn even_odd_value() {
        EvenU24::new(3);
    }

    #[test]
    #[should_panic]
    fn even_too_wide() {
        EvenU24::new(EvenU24::MAX + 2);
    }

    #[test]
    #[should_panic]
    fn one_based_too_wide() {
        OneBasedU24::new(NonZeroU32::new(OneBasedU24::MAX + 1).unwrap());
    }

    #[test]
    fn one_based_put() {
        let mut out = vec![];
        OneBasedU24::new(NonZeroU32::new(5).unwrap()).put_buf(&mut out);
        assert_eq!(out, [4, 0, 0]);
    }
}

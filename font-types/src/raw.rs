//! Encoding and decoding scalars as big-endian bytes

/// A trait for font scalars.
///
/// Every scalar in an sfnt font is stored big-endian; this trait converts
/// between a type and its raw byte array.
pub trait Scalar: Sized + Copy {
    /// The raw byte representation of this type.
    type Raw: Copy + Default + AsRef<[u8]> + AsMut<[u8]>;

    /// The number of bytes occupied by the encoded value.
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self::Raw>();

    /// Create an instance of this type from raw big-endian bytes
    fn from_raw(raw: Self::Raw) -> Self;

    /// Encode this type as raw big-endian bytes
    fn to_raw(self) -> Self::Raw;

    /// Decode a value from the front of `bytes`.
    ///
    /// Returns `None` if there are fewer than [`Self::RAW_BYTE_LEN`] bytes.
    fn read(bytes: &[u8]) -> Option<Self> {
        let src = bytes.get(..Self::RAW_BYTE_LEN)?;
        let mut raw = Self::Raw::default();
        raw.as_mut().copy_from_slice(src);
        Some(Self::from_raw(raw))
    }
}

macro_rules! int_scalar {
    ($ty:ty, $raw:ty) => {
        impl Scalar for $ty {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                self.to_be_bytes()
            }

            fn from_raw(raw: $raw) -> $ty {
                Self::from_be_bytes(raw)
            }
        }
    };
}

int_scalar!(u8, [u8; 1]);
int_scalar!(i8, [u8; 1]);
int_scalar!(u16, [u8; 2]);
int_scalar!(i16, [u8; 2]);
int_scalar!(u32, [u8; 4]);
int_scalar!(i32, [u8; 4]);
int_scalar!(i64, [u8; 8]);

/// An internal macro for implementing `Scalar` on a newtype around a scalar.
macro_rules! newtype_scalar {
    ($name:ident, $raw:ty) => {
        impl $crate::raw::Scalar for $name {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                $crate::raw::Scalar::to_raw(self.0)
            }

            fn from_raw(raw: $raw) -> Self {
                Self($crate::raw::Scalar::from_raw(raw))
            }
        }
    };
}

pub(crate) use newtype_scalar;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_short_input() {
        assert_eq!(u32::read(&[0, 1, 2]), None);
        assert_eq!(u16::read(&[0xAB, 0xCD, 0xEF]), Some(0xABCD));
        assert_eq!(i16::read(&[0xFF, 0xFE]), Some(-2));
    }

    #[test]
    fn raw_len() {
        assert_eq!(u8::RAW_BYTE_LEN, 1);
        assert_eq!(i64::RAW_BYTE_LEN, 8);
        assert_eq!(0x1234_5678u32.to_raw(), [0x12, 0x34, 0x56, 0x78]);
    }
}

//! fixed-point numerical types

macro_rules! fixed_impl {
    ($name:ident, $bits:literal, $fract_bits:literal, $ty:ty, $raw:ty) => {
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[doc = concat!(stringify!($bits), "-bit signed fixed point number with ", stringify!($fract_bits), " bits of fraction." )]
        pub struct $name($ty);

        impl $name {
            /// Minimum value.
            pub const MIN: Self = Self(<$ty>::MIN);

            /// Maximum value.
            pub const MAX: Self = Self(<$ty>::MAX);

            /// Zero.
            pub const ZERO: Self = Self(0);

            /// One.
            pub const ONE: Self = Self(1 << $fract_bits);

            const ONE_BITS: $ty = 1 << $fract_bits;

            /// Creates a value from its raw bit pattern.
            pub const fn from_bits(bits: $ty) -> Self {
                Self(bits)
            }

            /// Returns the raw bit pattern.
            pub const fn to_bits(self) -> $ty {
                self.0
            }

            /// Creates a value from an `f64`, rounding to the nearest
            /// representable value.
            pub fn from_f64(x: f64) -> Self {
                Self((x * Self::ONE_BITS as f64).round() as $ty)
            }

            /// Returns the value as an `f64`; this is lossless.
            pub fn to_f64(self) -> f64 {
                self.0 as f64 / Self::ONE_BITS as f64
            }

            /// Creates a value from an `f32`, rounding to the nearest
            /// representable value.
            pub fn from_f32(x: f32) -> Self {
                Self::from_f64(x as f64)
            }

            /// Returns the value as an `f32`.
            pub fn to_f32(self) -> f32 {
                self.to_f64() as f32
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }

        crate::raw::newtype_scalar!($name, $raw);
    };
}

fixed_impl!(Fixed, 32, 16, i32, [u8; 4]);
fixed_impl!(F2Dot14, 16, 14, i16, [u8; 2]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scalar;

    #[test]
    fn f2dot14_values() {
        // values from the OpenType data types table
        assert_eq!(F2Dot14::from_bits(0x7fff).to_f64(), 1.999938964843750);
        assert_eq!(F2Dot14::from_bits(0x7000).to_f64(), 1.75);
        assert_eq!(F2Dot14::from_bits(0x0001).to_f64(), 0.00006103515625);
        assert_eq!(F2Dot14::from_bits(-0x4000).to_f64(), -1.0);
        assert_eq!(F2Dot14::from_f32(0.5).to_bits(), 0x2000);
        assert_eq!(F2Dot14::ONE.to_bits(), 0x4000);
    }

    #[test]
    fn fixed_values() {
        assert_eq!(Fixed::from_f64(1.5).to_bits(), 0x0001_8000);
        assert_eq!(Fixed::from_bits(-0x0001_0000).to_f64(), -1.0);
        assert_eq!(Fixed::read(&[0x00, 0x01, 0x00, 0x00]), Some(Fixed::ONE));
        assert_eq!(Fixed::from_f64(-12.25).to_raw(), (-802816i32).to_be_bytes());
    }
}

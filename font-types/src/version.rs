/// A packed 32-bit version number, with the major version in the high 16 bits
/// and the minor version encoded as a nibble.
///
/// Used by `maxp` (0.5 and 1.0), `post` (1.0, 2.0, 2.5, 3.0) and friends.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Version16Dot16(u32);

impl Version16Dot16 {
    /// Version 0.5
    pub const VERSION_0_5: Version16Dot16 = Version16Dot16::new(0, 5);
    /// Version 1.0
    pub const VERSION_1_0: Version16Dot16 = Version16Dot16::new(1, 0);
    /// Version 2.0
    pub const VERSION_2_0: Version16Dot16 = Version16Dot16::new(2, 0);
    /// Version 2.5
    pub const VERSION_2_5: Version16Dot16 = Version16Dot16::new(2, 5);
    /// Version 3.0
    pub const VERSION_3_0: Version16Dot16 = Version16Dot16::new(3, 0);

    /// Create a new version with the provided major and minor parts.
    ///
    /// # Panics
    ///
    /// Panics if `minor > 9`.
    pub const fn new(major: u16, minor: u16) -> Self {
        assert!(minor < 10, "minor version must be in the range [0, 9)");
        Version16Dot16((major as u32) << 16 | (minor as u32) << 12)
    }

    /// Create a version from its raw packed representation.
    pub const fn from_bits(bits: u32) -> Self {
        Version16Dot16(bits)
    }

    /// The raw packed representation.
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Return the separate major & minor version numbers.
    pub const fn to_major_minor(self) -> (u16, u16) {
        let major = (self.0 >> 16) as u16;
        let minor = ((self.0 & 0xFFFF) >> 12) as u16;
        (major, minor)
    }
}

crate::raw::newtype_scalar!(Version16Dot16, [u8; 4]);

impl std::fmt::Debug for Version16Dot16 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Version16Dot16({:08x})", self.0)
    }
}

impl std::fmt::Display for Version16Dot16 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (major, minor) = self.to_major_minor();
        write!(f, "{major}.{minor}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_versions() {
        assert_eq!(Version16Dot16::VERSION_0_5.to_bits(), 0x00005000);
        assert_eq!(Version16Dot16::VERSION_2_5.to_bits(), 0x00025000);
        assert_eq!(Version16Dot16::from_bits(0x00011000).to_major_minor(), (1, 1));
        assert_eq!(Version16Dot16::VERSION_3_0.to_string(), "3.0");
    }
}

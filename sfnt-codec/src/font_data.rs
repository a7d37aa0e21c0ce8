//! raw font bytes

use std::ops::RangeBounds;

use font_types::Scalar;

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice that provides bounds-checked
/// big-endian reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for reading sequential fields out of [`FontData`].
///
/// Reads advance the position only when they succeed.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

/// A saved cursor position, produced by [`Cursor::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(FontData::new)
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(FontData::new)
    }

    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Returns the data starting at `offset`, for following an offset field.
    pub fn offset_data(&self, offset: usize) -> Result<FontData<'a>, ReadError> {
        self.split_off(offset).ok_or(ReadError::OutOfBounds)
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    /// The current position, relative to the start of the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The number of unread bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// The unread bytes.
    pub fn remaining_bytes(&self) -> &'a [u8] {
        self.data.as_bytes().get(self.pos..).unwrap_or_default()
    }

    /// Save the current position, so that it can be restored with [`reset`].
    ///
    /// [`reset`]: Cursor::reset
    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Return to a position previously saved with [`mark`].
    ///
    /// [`mark`]: Cursor::mark
    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    pub fn advance_by(&mut self, n_bytes: usize) -> Result<(), ReadError> {
        if n_bytes > self.remaining_len() {
            return Err(ReadError::OutOfBounds);
        }
        self.pos += n_bytes;
        Ok(())
    }

    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let value = self.data.read_at(self.pos)?;
        self.pos += T::RAW_BYTE_LEN;
        Ok(value)
    }

    /// Read `len` consecutive scalars.
    ///
    /// The whole array is bounds checked before anything is allocated, so a
    /// corrupt count cannot trigger a huge allocation.
    pub fn read_array<T: Scalar>(&mut self, len: usize) -> Result<Vec<T>, ReadError> {
        let byte_len = len
            .checked_mul(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let bytes = self.read_bytes(byte_len)?;
        Ok(bytes
            .chunks_exact(T::RAW_BYTE_LEN)
            .filter_map(T::read)
            .collect())
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let bytes = self
            .data
            .as_bytes()
            .get(self.pos..)
            .and_then(|rest| rest.get(..len))
            .ok_or(ReadError::OutOfBounds)?;
        self.pos += len;
        Ok(bytes)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_and_rewinds() {
        let data = FontData::new(&[0x00, 0x02, 0xFF, 0xFE, 0x01]);
        let mut cursor = data.cursor();
        let mark = cursor.mark();
        assert_eq!(cursor.read::<u16>(), Ok(2));
        assert_eq!(cursor.read::<i16>(), Ok(-2));
        assert_eq!(cursor.read::<u16>(), Err(ReadError::OutOfBounds));
        // a failed read does not move the cursor
        assert_eq!(cursor.position(), 4);
        cursor.reset(mark);
        assert_eq!(cursor.read::<u32>(), Ok(0x0002FFFE));
    }

    #[test]
    fn array_bounds_checked_up_front() {
        let data = FontData::new(&[0, 1, 0, 2, 0, 3]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read_array::<u16>(4), Err(ReadError::OutOfBounds));
        assert_eq!(cursor.read_array::<u16>(usize::MAX), Err(ReadError::OutOfBounds));
        assert_eq!(cursor.read_array::<u16>(3), Ok(vec![1, 2, 3]));
        assert_eq!(cursor.remaining_len(), 0);
    }
}

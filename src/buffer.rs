//! Bounded byte buffer with a gap-shifting primitive.
//!
//! `shift` is the only operation that changes the buffer length. Every
//! structural edit and every cell rewrite goes through it, so the capacity
//! bound is enforced in exactly one place.

use tracing::trace;

use crate::error::{Result, SheetError};

/// Owned table bytes with a fixed maximum length.
///
/// The end of `data` acts as the terminator; it is never part of the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    data: Vec<u8>,
    capacity: usize,
}

impl Buffer {
    /// Wrap existing content, failing if it is already over capacity.
    pub fn from_bytes(data: Vec<u8>, capacity: usize) -> Result<Self> {
        if data.len() > capacity {
            return Err(SheetError::TooLong { limit: capacity });
        }
        Ok(Self { data, capacity })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Byte at `index`, or `None` at and past the terminator.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.data.get(index).copied()
    }

    /// Open (`delta > 0`) or close (`delta < 0`) a gap at `offset`.
    ///
    /// Growth is checked against capacity before anything moves; on
    /// `TooLong` the buffer is untouched. Bytes inside a freshly opened gap
    /// are stale and must be overwritten by the caller.
    pub fn shift(&mut self, offset: usize, delta: isize) -> Result<()> {
        let len = self.data.len();
        if offset > len {
            return Err(SheetError::Generic("shift offset past terminator"));
        }
        if delta == 0 {
            return Ok(());
        }

        let amount = delta.unsigned_abs();
        if delta > 0 {
            if len + amount > self.capacity {
                return Err(SheetError::TooLong {
                    limit: self.capacity,
                });
            }
            trace!(offset, amount, "opening gap");
            self.data.resize(len + amount, 0);
            // memmove semantics: the high end is written before it is read
            self.data.copy_within(offset..len, offset + amount);
        } else {
            if offset + amount > len {
                return Err(SheetError::Generic("gap extends past terminator"));
            }
            trace!(offset, amount, "closing gap");
            self.data.copy_within(offset + amount..len, offset);
            self.data.truncate(len - amount);
        }
        Ok(())
    }

    /// Overwrite bytes starting at `offset` without changing the length.
    pub fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let end = offset + bytes.len();
        let target = self
            .data
            .get_mut(offset..end)
            .ok_or(SheetError::Generic("write past terminator"))?;
        target.copy_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(content: &str, capacity: usize) -> Buffer {
        Buffer::from_bytes(content.as_bytes().to_vec(), capacity).unwrap()
    }

    #[test]
    fn test_from_bytes_over_capacity() {
        let result = Buffer::from_bytes(b"abcdef".to_vec(), 5);
        assert_eq!(result, Err(SheetError::TooLong { limit: 5 }));
    }

    #[test]
    fn test_shift_zero_is_noop() {
        let mut buf = buffer("abc\n", 16);
        buf.shift(1, 0).unwrap();
        assert_eq!(buf.as_bytes(), b"abc\n");
    }

    #[test]
    fn test_open_gap_in_middle() {
        let mut buf = buffer("abcd\n", 16);
        buf.shift(2, 2).unwrap();
        buf.write_at(2, b"XY").unwrap();
        assert_eq!(buf.as_bytes(), b"abXYcd\n");
    }

    #[test]
    fn test_open_gap_at_terminator() {
        let mut buf = buffer("ab\n", 16);
        buf.shift(3, 2).unwrap();
        buf.write_at(3, b"c\n").unwrap();
        assert_eq!(buf.as_bytes(), b"ab\nc\n");
    }

    #[test]
    fn test_close_gap_overlapping() {
        let mut buf = buffer("abcdefgh\n", 16);
        buf.shift(1, -3).unwrap();
        assert_eq!(buf.as_bytes(), b"aefgh\n");
    }

    #[test]
    fn test_close_gap_to_terminator() {
        let mut buf = buffer("ab\ncd\n", 16);
        buf.shift(3, -3).unwrap();
        assert_eq!(buf.as_bytes(), b"ab\n");
    }

    #[test]
    fn test_growth_checked_before_mutation() {
        let mut buf = buffer("abcd\n", 6);
        let before = buf.clone();
        assert_eq!(buf.shift(0, 2), Err(SheetError::TooLong { limit: 6 }));
        assert_eq!(buf, before);
        buf.shift(0, 1).unwrap();
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn test_shift_out_of_bounds_is_generic() {
        let mut buf = buffer("ab\n", 16);
        assert!(matches!(buf.shift(4, 1), Err(SheetError::Generic(_))));
        assert!(matches!(buf.shift(2, -2), Err(SheetError::Generic(_))));
        assert_eq!(buf.as_bytes(), b"ab\n");
    }

    #[test]
    fn test_write_at_past_end() {
        let mut buf = buffer("ab\n", 16);
        assert!(matches!(buf.write_at(2, b"xyz"), Err(SheetError::Generic(_))));
    }
}

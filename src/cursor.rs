use crate::error::{DecodeError, Result};

/// Read position over an in-memory stream.
///
/// `base` is the absolute stream offset of `bytes[0]`, so positions reported here line up with
/// the file positions stored in bank pointers even when only part of a file is loaded.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    base: u64,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_base(bytes, 0)
    }

    /// Positions past `u64::MAX` saturate, so `base + bytes.len()` is expected to fit
    pub fn with_base(bytes: &'a [u8], base: u64) -> Self {
        Self {
            bytes,
            offset: 0,
            base,
        }
    }

    /// Absolute position of the next unread byte
    pub fn position(&self) -> u64 {
        self.base.saturating_add(self.offset as u64)
    }

    /// Absolute position of `rest`, which must be a suffix of the stream
    pub(crate) fn position_of(&self, rest: &[u8]) -> u64 {
        self.base.saturating_add((self.bytes.len() - rest.len()) as u64)
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    /// Move to an absolute position inside the loaded window
    pub fn seek(&mut self, position: u64) -> Result<()> {
        let end = self.base.saturating_add(self.bytes.len() as u64);
        if position < self.base || position > end {
            return Err(DecodeError::UnexpectedEof {
                position,
                context: "seek",
            });
        }

        self.offset = usize::try_from(position - self.base)
            .map_or(self.bytes.len(), |offset| offset.min(self.bytes.len()));
        Ok(())
    }

    /// Continue from `rest`, the unconsumed tail handed back by a parser
    pub(crate) fn advance_to(&mut self, rest: &'a [u8]) {
        self.offset = self.bytes.len() - rest.len();
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::error::DecodeError;

    #[test]
    fn test_positions_include_base() {
        let bytes = [0_u8; 16];
        let mut cursor = Cursor::with_base(&bytes, 0x100);
        assert_eq!(cursor.position(), 0x100);

        cursor.advance_to(&bytes[4..]);
        assert_eq!(cursor.position(), 0x104);
        assert_eq!(cursor.remaining().len(), 12);
        assert_eq!(cursor.position_of(&bytes[10..]), 0x10a);
    }

    #[test]
    fn test_base_near_u64_max() {
        let bytes = [0_u8; 8];
        let mut cursor = Cursor::with_base(&bytes, u64::MAX - 4);

        cursor.advance_to(&bytes[2..]);
        assert_eq!(cursor.position(), u64::MAX - 2);
        assert_eq!(cursor.position_of(&bytes[8..]), u64::MAX);
        assert!(cursor.seek(u64::MAX).is_ok());
    }

    #[test]
    fn test_seek_bounds() {
        let bytes = [0_u8; 8];
        let mut cursor = Cursor::with_base(&bytes, 8);

        cursor.seek(16).unwrap();
        assert!(cursor.is_empty());

        let err = cursor.seek(4).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedEof {
                position: 4,
                context: "seek"
            }
        );
        assert!(cursor.seek(17).is_err());
    }
}

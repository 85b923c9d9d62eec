use crate::error::{DecodeError, Result};

/// Read the null-terminated ASCII string starting at `offset` in a name table.
///
/// Non-ASCII bytes are rejected rather than replaced.
pub fn null_terminated_ascii(blob: &[u8], offset: i32) -> Result<String> {
    let out_of_bounds = || DecodeError::NameOffsetOutOfBounds {
        offset: offset.into(),
        len: blob.len(),
    };

    let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
    let tail = blob.get(start..).filter(|t| !t.is_empty()).ok_or_else(out_of_bounds)?;
    let len = tail.iter().position(|b| *b == 0).ok_or_else(out_of_bounds)?;

    let bytes = &tail[..len];
    if let Some(i) = bytes.iter().position(|b| !b.is_ascii()) {
        return Err(DecodeError::NonAsciiName {
            offset: start + i,
            byte: bytes[i],
        });
    }

    // All bytes are ASCII at this point
    Ok(bytes.iter().map(|b| *b as char).collect())
}

#[cfg(test)]
mod tests {
    use super::null_terminated_ascii;
    use crate::error::DecodeError;

    const BLOB: &[u8] = b"\0root\0first\0second\0";

    #[test]
    fn test_offsets() {
        assert_eq!(null_terminated_ascii(BLOB, 1).unwrap(), "root");
        assert_eq!(null_terminated_ascii(BLOB, 6).unwrap(), "first");
        assert_eq!(null_terminated_ascii(BLOB, 12).unwrap(), "second");
        // Mid-string offsets are legal, names may share tails
        assert_eq!(null_terminated_ascii(BLOB, 8).unwrap(), "rst");
        // Pointing straight at a terminator gives an empty name
        assert_eq!(null_terminated_ascii(BLOB, 0).unwrap(), "");
    }

    #[test]
    fn test_out_of_bounds() {
        let err = null_terminated_ascii(BLOB, BLOB.len() as i32).unwrap_err();
        assert_eq!(
            err,
            DecodeError::NameOffsetOutOfBounds {
                offset: BLOB.len() as i64,
                len: BLOB.len()
            }
        );

        assert!(matches!(
            null_terminated_ascii(BLOB, -1),
            Err(DecodeError::NameOffsetOutOfBounds { offset: -1, .. })
        ));
        assert!(null_terminated_ascii(&[], 0).is_err());
    }

    #[test]
    fn test_missing_terminator() {
        let err = null_terminated_ascii(b"\0root", 1).unwrap_err();
        assert_eq!(
            err,
            DecodeError::NameOffsetOutOfBounds { offset: 1, len: 5 }
        );
    }

    #[test]
    fn test_non_ascii() {
        let err = null_terminated_ascii(b"\0ro\xe9t\0", 1).unwrap_err();
        assert_eq!(err, DecodeError::NonAsciiName { offset: 3, byte: 0xe9 });
    }
}

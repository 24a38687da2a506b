//! Utility functions for PE parsing

use crate::pe::types::{PeError, Result};

/// Extension trait for reading primitive types from byte slices
pub trait ReadExt {
    fn read_u16_le_at(&self, offset: usize) -> Option<u16>;
    fn read_u32_le_at(&self, offset: usize) -> Option<u32>;
    fn read_u64_le_at(&self, offset: usize) -> Option<u64>;
    fn read_cstring_at(&self, offset: usize, max_len: usize) -> Option<&str>;
}

impl ReadExt for [u8] {
    #[inline(always)]
    fn read_u16_le_at(&self, offset: usize) -> Option<u16> {
        self.get(offset..offset + 2)
            .and_then(|b| b.try_into().ok())
            .map(u16::from_le_bytes)
    }

    #[inline(always)]
    fn read_u32_le_at(&self, offset: usize) -> Option<u32> {
        self.get(offset..offset + 4)
            .and_then(|b| b.try_into().ok())
            .map(u32::from_le_bytes)
    }

    #[inline(always)]
    fn read_u64_le_at(&self, offset: usize) -> Option<u64> {
        self.get(offset..offset + 8)
            .and_then(|b| b.try_into().ok())
            .map(u64::from_le_bytes)
    }

    fn read_cstring_at(&self, offset: usize, max_len: usize) -> Option<&str> {
        let end = (offset + max_len).min(self.len());
        let slice = self.get(offset..end)?;
        let len = slice.iter().position(|&b| b == 0).unwrap_or(slice.len());
        std::str::from_utf8(&slice[..len]).ok()
    }
}

/// Helper to read a null-terminated string from a buffer
pub fn read_cstring(data: &[u8], offset: usize, max_len: usize) -> Result<&str> {
    data.read_cstring_at(offset, max_len)
        .ok_or(PeError::InvalidString)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_ext() {
        let data = b"\x34\x12\x78\x56\x00\x00\x00\x00";
        assert_eq!(data.read_u16_le_at(0), Some(0x1234));
        assert_eq!(data.read_u32_le_at(0), Some(0x56781234));
        assert_eq!(data.read_u64_le_at(0), Some(0x0000_0000_5678_1234));
        assert_eq!(data.read_u32_le_at(100), None);
    }

    #[test]
    fn test_read_cstring() {
        let data = b"Hello\0World";
        assert_eq!(read_cstring(data, 0, 10).unwrap(), "Hello");
        assert_eq!(read_cstring(data, 6, 10).unwrap(), "World");
        // No terminator inside the window still yields the window
        assert_eq!(read_cstring(data, 6, 3).unwrap(), "Wor");
    }
}

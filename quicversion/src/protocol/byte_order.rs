//! Integer byte order used by a negotiated version

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    pub fn put_u16<B: BufMut>(self, buf: &mut B, value: u16) {
        match self {
            ByteOrder::BigEndian => buf.put_u16(value),
            ByteOrder::LittleEndian => buf.put_u16_le(value),
        }
    }

    pub fn put_u32<B: BufMut>(self, buf: &mut B, value: u32) {
        match self {
            ByteOrder::BigEndian => buf.put_u32(value),
            ByteOrder::LittleEndian => buf.put_u32_le(value),
        }
    }

    pub fn put_u64<B: BufMut>(self, buf: &mut B, value: u64) {
        match self {
            ByteOrder::BigEndian => buf.put_u64(value),
            ByteOrder::LittleEndian => buf.put_u64_le(value),
        }
    }

    /// Returns `None` when fewer than 2 bytes remain.
    pub fn get_u16<B: Buf>(self, buf: &mut B) -> Option<u16> {
        if buf.remaining() < 2 {
            return None;
        }
        Some(match self {
            ByteOrder::BigEndian => buf.get_u16(),
            ByteOrder::LittleEndian => buf.get_u16_le(),
        })
    }

    pub fn get_u32<B: Buf>(self, buf: &mut B) -> Option<u32> {
        if buf.remaining() < 4 {
            return None;
        }
        Some(match self {
            ByteOrder::BigEndian => buf.get_u32(),
            ByteOrder::LittleEndian => buf.get_u32_le(),
        })
    }

    pub fn get_u64<B: Buf>(self, buf: &mut B) -> Option<u64> {
        if buf.remaining() < 8 {
            return None;
        }
        Some(match self {
            ByteOrder::BigEndian => buf.get_u64(),
            ByteOrder::LittleEndian => buf.get_u64_le(),
        })
    }
}

//! ビット単位の書き込み
//! `BitReader` と同じ MSB 先頭の順序でビット列を組み立てる

use bitvec::prelude::*;

use super::exceptions::{BitsResult, PacketParseError};

/// MSB先頭のビット列ビルダー
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    pub fn new() -> Self {
        Self { bits: BitVec::new() }
    }

    /// 値の下位 `bits` ビットを上位側から追加する
    ///
    /// Args:
    ///     value: 書き込む値 (`bits` ビットに収まること)
    ///     bits: ビット長 (1-64)
    pub fn write_bits(&mut self, value: u64, bits: u32) -> BitsResult<()> {
        if bits == 0 || bits > 64 {
            return Err(PacketParseError::InvalidBitCount(bits).into());
        }
        if bits < 64 && value >> bits != 0 {
            return Err(PacketParseError::FieldOutOfRange { value, bits }.into());
        }

        for shift in (0..bits).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
        Ok(())
    }

    pub fn write_flag(&mut self, flag: bool) {
        self.bits.push(flag);
    }

    /// 別のビット列を末尾に連結
    pub fn append(&mut self, other: &BitWriter) {
        self.bits.extend_from_bitslice(&other.bits);
    }

    /// 書き込み済みビット数
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }

    /// バイト境界まで0で埋めたバイト列
    pub fn into_bytes(mut self) -> Vec<u8> {
        while self.bits.len() % 8 != 0 {
            self.bits.push(false);
        }
        self.bits.into_vec()
    }

    /// 大文字の16進文字列
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.clone().into_bytes())
    }
}

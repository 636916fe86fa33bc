//! ビット単位の読み出し
//! バイト列を上位ビット(MSB)から1ビットずつ取り出す

use std::io::{ErrorKind, Read};

use super::exceptions::{BitsResult, PacketParseError};

/// 1回の `read_bits` で読み出せる最大ビット数
pub const MAX_READ_BITS: u32 = 64;

/// バイト入力をビット列として読み出すリーダー
///
/// 1バイトずつバッファし、バッファが空になったときだけ次の1バイトを取り込む。
/// 読み出したビットは戻せない。
#[derive(Debug)]
pub struct BitReader<R> {
    inner: R,
    buf: u8,
    /// `buf` に残っている未読ビット数 (0-8)
    balance: u8,
    /// 先頭からの読み出し済みビット数
    offset: usize,
}

impl<R: Read> BitReader<R> {
    /// 新しいビットリーダーを作成
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: 0,
            balance: 0,
            offset: 0,
        }
    }

    /// 次の `bits` ビットを符号なし整数として読み出す
    ///
    /// Args:
    ///     bits: 読み出すビット数 (1-64)
    ///
    /// Returns:
    ///     読み出した値。入力が尽きた場合は `EndOfStream`
    ///     (失敗後のリーダーの位置は未定義なので、それ以上読み出さないこと)
    pub fn read_bits(&mut self, bits: u32) -> BitsResult<u64> {
        if bits == 0 || bits > MAX_READ_BITS {
            return Err(PacketParseError::InvalidBitCount(bits).into());
        }

        let mut value = 0u64;
        for _ in 0..bits {
            if self.balance == 0 {
                self.buf = self.next_byte()?;
                self.balance = 8;
            }

            self.balance -= 1;
            value = (value << 1) | u64::from((self.buf >> self.balance) & 1);
            self.offset += 1;
        }

        Ok(value)
    }

    /// 1ビットをフラグとして読み出す
    pub fn read_flag(&mut self) -> BitsResult<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// 先頭からの読み出し済みビット数
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_byte(&mut self) -> BitsResult<u8> {
        let mut byte = [0u8; 1];
        match self.inner.read_exact(&mut byte) {
            Ok(()) => Ok(byte[0]),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Err(PacketParseError::EndOfStream {
                bit_offset: self.offset,
            }
            .into()),
            Err(err) => Err(err.into()),
        }
    }
}

impl<'a> BitReader<&'a [u8]> {
    /// バイトスライスから直接ビットリーダーを作成
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

//! パケットデコーダ
//! ビットリーダーから1パケットを再帰的に読み出し、読みながら評価する

use std::io::Read;

use log::{debug, trace};

use super::core::bit_reader::BitReader;
use super::core::exceptions::{BitsResult, DecodeContext, PacketParseError, ResultExt};
use super::types::operator::apply_operator;
use super::types::packet::Packet;
use super::types::packet_type::PacketType;
use crate::bits_common_rs::utils::hex_input::decode_hex;

/// ヘッダ: バージョン (3ビット)
pub const VERSION_BITS: u32 = 3;
/// ヘッダ: 型コード (3ビット)
pub const TYPE_BITS: u32 = 3;
/// リテラルの1グループ (継続フラグ1 + 値4)
pub const LITERAL_GROUP_BITS: u32 = 5;
/// 長さタイプフラグ
pub const LENGTH_TYPE_BITS: u32 = 1;
/// カウントモードのサブパケット数
pub const SUBPACKET_COUNT_BITS: u32 = 11;
/// 長さモードのサブパケット領域ビット長
pub const SUBPACKET_LENGTH_BITS: u32 = 15;

/// 入れ子の深さの既定上限
pub const DEFAULT_MAX_DEPTH: usize = 256;

const LITERAL_CONTINUE: u64 = 0b1_0000;
const LITERAL_VALUE_MASK: u64 = 0b0_1111;

/// 1メッセージ分のデコーダ
///
/// リーダーを単独で所有し、トップレベルの1パケットを読み終えたら破棄する。
pub struct PacketDecoder<R> {
    reader: BitReader<R>,
    max_depth: usize,
}

impl<R: Read> PacketDecoder<R> {
    pub fn new(reader: BitReader<R>) -> Self {
        Self {
            reader,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 先頭からの読み出し済みビット数
    pub fn offset(&self) -> usize {
        self.reader.offset()
    }

    pub fn into_reader(self) -> BitReader<R> {
        self.reader
    }

    /// トップレベルの1パケットを読み、その値を返す (木は作らない)
    pub fn evaluate(&mut self) -> BitsResult<u64> {
        let value = self.evaluate_packet(0)?;
        debug!("Evaluated packet to {} after {} bits", value, self.reader.offset());
        Ok(value)
    }

    /// トップレベルの1パケットを明示的な木として読む
    pub fn decode_tree(&mut self) -> BitsResult<Packet> {
        let packet = self.decode_packet(0)?;
        debug!(
            "Decoded {} packets (depth {}) after {} bits",
            packet.packet_count(),
            packet.depth(),
            self.reader.offset()
        );
        Ok(packet)
    }

    fn evaluate_packet(&mut self, depth: usize) -> BitsResult<u64> {
        let (_version, packet_type) = self.read_header(depth)?;

        if packet_type.is_literal() {
            return self.read_literal().context(DecodeContext::Literal);
        }

        let values = self.read_sub_packets(depth, Self::evaluate_packet)?;
        let value = apply_operator(packet_type, &values)?;
        trace!("{} of {} operands = {}", packet_type, values.len(), value);
        Ok(value)
    }

    fn decode_packet(&mut self, depth: usize) -> BitsResult<Packet> {
        let (version, packet_type) = self.read_header(depth)?;

        if packet_type.is_literal() {
            let value = self.read_literal().context(DecodeContext::Literal)?;
            return Ok(Packet::literal(version, value));
        }

        let children = self.read_sub_packets(depth, Self::decode_packet)?;
        Ok(Packet::operator(version, packet_type, children))
    }

    fn read_header(&mut self, depth: usize) -> BitsResult<(u8, PacketType)> {
        if depth > self.max_depth {
            return Err(PacketParseError::DepthExceeded(depth).into());
        }

        let start = self.reader.offset();
        // 3ビットなので u8 に収まる
        let version = self.reader.read_bits(VERSION_BITS)? as u8;
        let code = self.reader.read_bits(TYPE_BITS)? as u8;
        let packet_type = PacketType::from_code(code)?;

        trace!("Packet at bit {}: version={} type={} depth={}", start, version, packet_type, depth);
        Ok((version, packet_type))
    }

    /// 5ビットグループを継続フラグが0になるまで読み、下位4ビットを連結する
    fn read_literal(&mut self) -> BitsResult<u64> {
        let mut value = 0u64;

        loop {
            let group = self.reader.read_bits(LITERAL_GROUP_BITS)?;
            if value.leading_zeros() < 4 {
                return Err(PacketParseError::LiteralOverflow {
                    bit_offset: self.reader.offset(),
                }
                .into());
            }
            value = (value << 4) | (group & LITERAL_VALUE_MASK);

            if group & LITERAL_CONTINUE == 0 {
                return Ok(value);
            }
        }
    }

    /// 長さタイプフラグに従ってサブパケットを順に読む
    fn read_sub_packets<T>(
        &mut self,
        depth: usize,
        read_child: fn(&mut Self, usize) -> BitsResult<T>,
    ) -> BitsResult<Vec<T>> {
        let mut children = Vec::new();

        if self.reader.read_flag()? {
            let count = self.reader.read_bits(SUBPACKET_COUNT_BITS)? as usize;
            trace!("Reading {} sub-packets by count", count);

            children.reserve(count);
            for index in 0..count {
                children.push(read_child(self, depth + 1).context(DecodeContext::SubPacket { index })?);
            }
        } else {
            let length = self.reader.read_bits(SUBPACKET_LENGTH_BITS)? as usize;
            let end = self.reader.offset() + length;
            trace!("Reading sub-packets until bit {}", end);

            while self.reader.offset() < end {
                let index = children.len();
                children.push(read_child(self, depth + 1).context(DecodeContext::SubPacket { index })?);
            }

            if self.reader.offset() != end {
                return Err(PacketParseError::LengthOverrun {
                    expected_end: end,
                    actual_end: self.reader.offset(),
                }
                .into());
            }
        }

        Ok(children)
    }
}

impl<'a> PacketDecoder<&'a [u8]> {
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(BitReader::from_slice(data))
    }
}

/// バイト列のトップレベルパケットを評価する
pub fn evaluate_bytes(data: &[u8]) -> BitsResult<u64> {
    PacketDecoder::from_slice(data).evaluate()
}

/// 16進文字列のトップレベルパケットを評価する
pub fn evaluate_hex(text: &str) -> BitsResult<u64> {
    let bytes = decode_hex(text)?;
    evaluate_bytes(&bytes)
}

/// 16進文字列のトップレベルパケットを木として読む
pub fn decode_tree_hex(text: &str) -> BitsResult<Packet> {
    let bytes = decode_hex(text)?;
    PacketDecoder::from_slice(&bytes).decode_tree()
}

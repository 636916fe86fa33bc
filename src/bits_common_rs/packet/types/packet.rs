//! パケットツリー
//! デコード結果を明示的な木として保持する場合の表現。評価とエンコードを持つ。

use std::fmt;

use super::operator::apply_operator;
use super::packet_type::PacketType;
use crate::bits_common_rs::packet::core::bit_writer::BitWriter;
use crate::bits_common_rs::packet::core::exceptions::{BitsResult, DecodeContext, PacketParseError, ResultExt};
use crate::bits_common_rs::packet::decoder::{
    LITERAL_GROUP_BITS, SUBPACKET_COUNT_BITS, SUBPACKET_LENGTH_BITS, TYPE_BITS, VERSION_BITS,
};

/// サブパケットの区切り方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// 長さタイプフラグ=1: サブパケット数 (11ビット)
    Count,
    /// 長さタイプフラグ=0: サブパケット領域の総ビット長 (15ビット)
    Length,
}

/// パケットのペイロード
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Literal(u64),
    Operator {
        packet_type: PacketType,
        children: Vec<Packet>,
    },
}

/// BITS パケット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub version: u8,
    pub payload: Payload,
}

impl Packet {
    pub fn literal(version: u8, value: u64) -> Self {
        Self {
            version,
            payload: Payload::Literal(value),
        }
    }

    pub fn operator(version: u8, packet_type: PacketType, children: Vec<Packet>) -> Self {
        Self {
            version,
            payload: Payload::Operator { packet_type, children },
        }
    }

    pub fn packet_type(&self) -> PacketType {
        match &self.payload {
            Payload::Literal(_) => PacketType::Literal,
            Payload::Operator { packet_type, .. } => *packet_type,
        }
    }

    pub fn children(&self) -> &[Packet] {
        match &self.payload {
            Payload::Literal(_) => &[],
            Payload::Operator { children, .. } => children,
        }
    }

    /// ツリーを評価して値を求める
    pub fn evaluate(&self) -> BitsResult<u64> {
        match &self.payload {
            Payload::Literal(value) => Ok(*value),
            Payload::Operator { packet_type, children } => {
                let values = children
                    .iter()
                    .enumerate()
                    .map(|(index, child)| child.evaluate().context(DecodeContext::SubPacket { index }))
                    .collect::<BitsResult<Vec<u64>>>()?;
                Ok(apply_operator(*packet_type, &values)?)
            }
        }
    }

    /// 自身と全子孫のバージョンの合計
    pub fn version_sum(&self) -> u64 {
        u64::from(self.version) + self.children().iter().map(Packet::version_sum).sum::<u64>()
    }

    /// 入れ子の深さ (リテラル単体は1)
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Packet::depth).max().unwrap_or(0)
    }

    /// パケット総数
    pub fn packet_count(&self) -> usize {
        1 + self.children().iter().map(Packet::packet_count).sum::<usize>()
    }

    /// 指定した区切り方でビット列にエンコードする (全階層で同じ区切り方)
    pub fn encode(&self, framing: Framing) -> BitsResult<BitWriter> {
        let mut writer = BitWriter::new();
        self.write_to(&mut writer, framing)?;
        Ok(writer)
    }

    pub fn to_bytes(&self, framing: Framing) -> BitsResult<Vec<u8>> {
        Ok(self.encode(framing)?.into_bytes())
    }

    pub fn to_hex(&self, framing: Framing) -> BitsResult<String> {
        Ok(self.encode(framing)?.to_hex())
    }

    fn write_to(&self, writer: &mut BitWriter, framing: Framing) -> BitsResult<()> {
        writer.write_bits(u64::from(self.version), VERSION_BITS)?;

        match &self.payload {
            Payload::Literal(value) => {
                writer.write_bits(u64::from(PacketType::Literal.code()), TYPE_BITS)?;
                write_literal(writer, *value)
            }
            Payload::Operator { packet_type, children } => {
                if packet_type.is_literal() {
                    return Err(PacketParseError::UnknownOperator(packet_type.code()).into());
                }
                writer.write_bits(u64::from(packet_type.code()), TYPE_BITS)?;

                match framing {
                    Framing::Count => {
                        writer.write_flag(true);
                        writer.write_bits(children.len() as u64, SUBPACKET_COUNT_BITS)?;
                        for child in children {
                            child.write_to(writer, framing)?;
                        }
                    }
                    Framing::Length => {
                        let mut region = BitWriter::new();
                        for child in children {
                            child.write_to(&mut region, framing)?;
                        }
                        writer.write_flag(false);
                        writer.write_bits(region.len() as u64, SUBPACKET_LENGTH_BITS)?;
                        writer.append(&region);
                    }
                }
                Ok(())
            }
        }
    }
}

// 4ビットずつ上位から。最後のグループ以外は継続フラグを立てる
fn write_literal(writer: &mut BitWriter, value: u64) -> BitsResult<()> {
    let significant = 64 - value.leading_zeros() as usize;
    let groups = significant.div_ceil(4).max(1);

    for group in (0..groups).rev() {
        let nibble = (value >> (group * 4)) & 0xF;
        let continuation = u64::from(group != 0) << 4;
        writer.write_bits(continuation | nibble, LITERAL_GROUP_BITS)?;
    }
    Ok(())
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Literal(value) => write!(f, "{}", value),
            Payload::Operator { packet_type, children } => {
                write!(f, "{}(", packet_type)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_encoding_matches_known_hex() {
        let packet = Packet::literal(6, 2021);
        assert_eq!(packet.to_hex(Framing::Count).unwrap(), "D2FE28");
    }

    #[test]
    fn test_zero_literal_uses_one_group() {
        let writer = Packet::literal(0, 0).encode(Framing::Count).unwrap();
        assert_eq!(writer.len(), 6 + 5);
    }

    #[test]
    fn test_count_framing_matches_known_hex() {
        // C200B40A82: sum(1, 2), カウントモード
        let packet = Packet::operator(
            6,
            PacketType::Sum,
            vec![Packet::literal(6, 1), Packet::literal(2, 2)],
        );
        assert_eq!(packet.to_hex(Framing::Count).unwrap(), "C200B40A82");
        assert_eq!(packet.evaluate().unwrap(), 3);
    }

    #[test]
    fn test_length_framing_bit_length() {
        let packet = Packet::operator(1, PacketType::LessThan, vec![Packet::literal(6, 10), Packet::literal(2, 20)]);
        let writer = packet.encode(Framing::Length).unwrap();
        // ヘッダ7 + 長さ15 + リテラル11 + リテラル16
        assert_eq!(writer.len(), 7 + 15 + 11 + 16);
        assert_eq!(packet.to_hex(Framing::Length).unwrap(), "38006F45291200");
    }

    #[test]
    fn test_evaluate_and_display() {
        let packet = Packet::operator(
            0,
            PacketType::EqualTo,
            vec![
                Packet::operator(0, PacketType::Sum, vec![Packet::literal(0, 1), Packet::literal(0, 3)]),
                Packet::operator(0, PacketType::Product, vec![Packet::literal(0, 2), Packet::literal(0, 2)]),
            ],
        );
        assert_eq!(packet.evaluate().unwrap(), 1);
        assert_eq!(packet.to_string(), "equal_to(sum(1, 3), product(2, 2))");
        assert_eq!(packet.depth(), 3);
        assert_eq!(packet.packet_count(), 7);
    }

    #[test]
    fn test_version_sum() {
        let packet = Packet::operator(4, PacketType::Minimum, vec![Packet::literal(1, 9), Packet::literal(5, 1)]);
        assert_eq!(packet.version_sum(), 10);
    }

    #[test]
    fn test_evaluate_error_carries_context() {
        let packet = Packet::operator(
            0,
            PacketType::Sum,
            vec![
                Packet::literal(0, 1),
                Packet::operator(0, PacketType::GreaterThan, vec![Packet::literal(0, 1)]),
            ],
        );
        let err = packet.evaluate().unwrap_err();
        assert_eq!(err.context_chain(), vec![DecodeContext::SubPacket { index: 1 }]);
    }

    #[test]
    fn test_encode_rejects_out_of_range_fields() {
        let err = Packet::literal(8, 1).encode(Framing::Count).unwrap_err();
        assert_eq!(err.root_cause(), Some(&PacketParseError::FieldOutOfRange { value: 8, bits: 3 }));

        let err = Packet::operator(0, PacketType::Literal, vec![]).encode(Framing::Count).unwrap_err();
        assert_eq!(err.root_cause(), Some(&PacketParseError::UnknownOperator(4)));
    }
}

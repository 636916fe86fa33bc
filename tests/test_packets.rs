mod common;

use bits_rust::bits_common_rs::packet::core::{BitWriter, DecodeContext, PacketParseError};
use bits_rust::bits_common_rs::packet::decoder::{evaluate_bytes, PacketDecoder};
use bits_rust::bits_common_rs::packet::types::{Framing, Packet, PacketType};
use common::test_data_generator::{comparisons_are_binary, TestDataGenerator};

#[test]
fn test_count_and_length_framing_are_equivalent() {
    let mut gen = TestDataGenerator::new(0xB175);

    for _ in 0..200 {
        let packet = gen.random_packet(5);
        let by_count = packet.to_bytes(Framing::Count).unwrap();
        let by_length = packet.to_bytes(Framing::Length).unwrap();

        let tree_count = PacketDecoder::from_slice(&by_count).decode_tree().unwrap();
        let tree_length = PacketDecoder::from_slice(&by_length).decode_tree().unwrap();
        assert_eq!(tree_count, packet);
        assert_eq!(tree_length, packet);

        let expected = packet.evaluate().unwrap();
        assert_eq!(evaluate_bytes(&by_count).unwrap(), expected, "{}", packet);
        assert_eq!(evaluate_bytes(&by_length).unwrap(), expected, "{}", packet);
    }
}

#[test]
fn test_evaluation_is_deterministic() {
    let mut gen = TestDataGenerator::new(7);

    for _ in 0..50 {
        let bytes = gen.random_packet(4).to_bytes(Framing::Count).unwrap();
        assert_eq!(evaluate_bytes(&bytes).unwrap(), evaluate_bytes(&bytes).unwrap());
    }
}

#[test]
fn test_literal_round_trip() {
    let mut gen = TestDataGenerator::new(2021);
    let mut values = vec![0, 1, 15, 16, 2021, u64::from(u32::MAX), u64::MAX >> 4, u64::MAX];
    values.extend((0..200).map(|_| gen.random_literal_value()));

    for value in values {
        let bytes = Packet::literal(0, value).to_bytes(Framing::Count).unwrap();
        assert_eq!(evaluate_bytes(&bytes).unwrap(), value);
    }
}

#[test]
fn test_single_operand_operators_return_operand() {
    for packet_type in [PacketType::Sum, PacketType::Product, PacketType::Minimum, PacketType::Maximum] {
        for framing in [Framing::Count, Framing::Length] {
            let packet = Packet::operator(1, packet_type, vec![Packet::literal(2, 99)]);
            let bytes = packet.to_bytes(framing).unwrap();
            assert_eq!(evaluate_bytes(&bytes).unwrap(), 99, "{} {:?}", packet_type, framing);
        }
    }
}

#[test]
fn test_generated_fixtures_use_binary_comparisons() {
    let mut gen = TestDataGenerator::new(42);

    for _ in 0..100 {
        let packet = gen.random_packet(5);
        assert!(comparisons_are_binary(&packet), "{}", packet);
    }
}

#[test]
fn test_truncated_messages_fail_with_end_of_stream() {
    let mut gen = TestDataGenerator::new(99);

    for _ in 0..100 {
        let packet = gen.random_packet(4);
        for framing in [Framing::Count, Framing::Length] {
            let writer = packet.encode(framing).unwrap();
            // 最後の1ビットを含むバイトより前で切る
            let keep = (writer.len() - 1) / 8;
            let bytes = writer.into_bytes();

            let err = evaluate_bytes(&bytes[..keep]).unwrap_err();
            assert!(err.is_end_of_stream(), "{} {:?}: {}", packet, framing, err);
        }
    }
}

#[test]
fn test_nested_error_context_depth() {
    // sum(sum(sum(<切り詰めたリテラル>)))
    let mut writer = BitWriter::new();
    for _ in 0..3 {
        writer.write_bits(0, 3).unwrap();
        writer.write_bits(0, 3).unwrap();
        writer.write_flag(true);
        writer.write_bits(1, 11).unwrap();
    }
    writer.write_bits(0, 3).unwrap();
    writer.write_bits(4, 3).unwrap();
    // 継続フラグ付きのグループで丁度バイト境界に達する
    for _ in 0..4 {
        writer.write_bits(0b1_0001, 5).unwrap();
    }
    assert_eq!(writer.len(), 80);
    let bytes = writer.into_bytes();

    let err = evaluate_bytes(&bytes).unwrap_err();
    assert!(err.is_end_of_stream());
    assert_eq!(
        err.context_chain(),
        vec![
            DecodeContext::SubPacket { index: 0 },
            DecodeContext::SubPacket { index: 0 },
            DecodeContext::SubPacket { index: 0 },
            DecodeContext::Literal,
        ]
    );
    assert_eq!(err.root_cause(), Some(&PacketParseError::EndOfStream { bit_offset: 80 }));
}

#[test]
fn test_malformed_arity_is_an_error() {
    let packet = Packet::operator(0, PacketType::LessThan, vec![Packet::literal(0, 1)]);
    let bytes = packet.to_bytes(Framing::Count).unwrap();

    let err = evaluate_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        Some(PacketParseError::OperandCount { packet_type: PacketType::LessThan, actual: 1, .. })
    ));
}

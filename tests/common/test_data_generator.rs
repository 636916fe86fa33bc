use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use bits_rust::bits_common_rs::packet::types::{Packet, PacketType};

const OPERATOR_TYPES: [PacketType; 7] = [
    PacketType::Sum,
    PacketType::Product,
    PacketType::Minimum,
    PacketType::Maximum,
    PacketType::GreaterThan,
    PacketType::LessThan,
    PacketType::EqualTo,
];

/// Test data generator for BITS packet trees
///
/// Generated trees are well-formed: comparisons always get exactly two
/// operands, minimum/maximum at least one, and products only multiply
/// literals so evaluation never overflows.
pub struct TestDataGenerator {
    rng: StdRng,
}

impl TestDataGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn random_version(&mut self) -> u8 {
        self.rng.gen_range(0..8)
    }

    /// Random value of random bit width, so group counts vary
    pub fn random_literal_value(&mut self) -> u64 {
        let width = self.rng.gen_range(1..=64u32);
        if width == 64 {
            self.rng.gen()
        } else {
            self.rng.gen_range(0..(1u64 << width))
        }
    }

    pub fn random_literal(&mut self, max_value: u64) -> Packet {
        let version = self.random_version();
        let value = self.rng.gen_range(0..=max_value);
        Packet::literal(version, value)
    }

    /// Random operator tree of at most `max_depth` levels
    pub fn random_packet(&mut self, max_depth: usize) -> Packet {
        if max_depth <= 1 || self.rng.gen_bool(0.3) {
            return self.random_literal(1 << 16);
        }

        let packet_type = OPERATOR_TYPES[self.rng.gen_range(0..OPERATOR_TYPES.len())];
        let version = self.random_version();
        let children = match packet_type {
            PacketType::Product => {
                let count = self.rng.gen_range(0..=3);
                (0..count).map(|_| self.random_literal(1 << 16)).collect()
            }
            PacketType::Sum => {
                let count = self.rng.gen_range(0..=3);
                (0..count).map(|_| self.random_packet(max_depth - 1)).collect()
            }
            PacketType::Minimum | PacketType::Maximum => {
                let count = self.rng.gen_range(1..=4);
                (0..count).map(|_| self.random_packet(max_depth - 1)).collect()
            }
            _ => vec![self.random_packet(max_depth - 1), self.random_packet(max_depth - 1)],
        };
        Packet::operator(version, packet_type, children)
    }
}

/// Every comparison node in the tree has exactly two children
pub fn comparisons_are_binary(packet: &Packet) -> bool {
    let own = match packet.packet_type() {
        PacketType::GreaterThan | PacketType::LessThan | PacketType::EqualTo => packet.children().len() == 2,
        _ => true,
    };
    own && packet.children().iter().all(comparisons_are_binary)
}

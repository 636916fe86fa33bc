//! BITS Rust Implementation
//! ビットパック形式の入れ子パケット (BITS) のデコーダと評価器

pub mod bits_common_rs;

// 便利な再エクスポート
pub mod prelude {
    pub use crate::bits_common_rs::packet::core::{BitReader, BitWriter, BitsPacketError, BitsResult, PacketParseError};
    pub use crate::bits_common_rs::packet::decoder::{evaluate_bytes, evaluate_hex, PacketDecoder};
    pub use crate::bits_common_rs::packet::types::{Framing, Packet, PacketType, Payload};
}

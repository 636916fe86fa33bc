//! パケットコア機能
//! ビット単位の読み書き、エラー処理等のコア機能

pub mod bit_reader;
pub mod bit_writer;
pub mod exceptions;

// 便利な再エクスポート
pub use bit_reader::BitReader;
pub use bit_writer::BitWriter;
pub use exceptions::{PacketParseError, BitsPacketError, BitsResult, DecodeContext, ResultExt};

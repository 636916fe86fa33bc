/// パケット型定義
pub mod packet_type;
pub mod operator;
pub mod packet;

// 再エクスポート
pub use packet_type::{PacketType, LITERAL_TYPE_CODE};
pub use operator::{apply_operator, OperatorFn};
pub use packet::{Framing, Packet, Payload};

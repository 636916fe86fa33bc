use bitvec::prelude::*;
use log::debug;

use crate::bits_common_rs::packet::decoder::{TYPE_BITS, VERSION_BITS};
use crate::bits_common_rs::packet::types::{Packet, PacketType, Payload};

/// パケット確認用のデバッグ出力
/// - 先頭パケットのヘッダを生のビットから読む
/// - デコード済みの木をインデント付きで表示する
pub struct PacketDebugLogger;

impl PacketDebugLogger {
    /// 先頭パケットのヘッダ要約。6ビットに満たなければ None
    pub fn header_summary(buf: &[u8]) -> Option<String> {
        let header_bits = (VERSION_BITS + TYPE_BITS) as usize;
        let bits = BitSlice::<u8, Msb0>::from_slice(buf);
        if bits.len() < header_bits {
            return None;
        }

        let version: u8 = bits[0..VERSION_BITS as usize].load_be();
        let code: u8 = bits[VERSION_BITS as usize..header_bits].load_be();
        let name = PacketType::from_code(code).map(PacketType::name).unwrap_or("unknown");
        Some(format!("v={} type={}({}) bits={}", version, name, code, bits.len()))
    }

    pub fn log_message(buf: &[u8]) {
        match Self::header_summary(buf) {
            Some(summary) => debug!("[PacketDebug] {}", summary),
            None => debug!("[PacketDebug] too short: {} bytes", buf.len()),
        }
    }

    /// 木をインデント付きの複数行テキストにする
    pub fn render_tree(packet: &Packet) -> String {
        let mut out = String::new();
        Self::render_node(packet, 0, &mut out);
        out
    }

    pub fn log_tree(packet: &Packet) {
        for line in Self::render_tree(packet).lines() {
            debug!("[PacketDebug] {}", line);
        }
    }

    fn render_node(packet: &Packet, indent: usize, out: &mut String) {
        let pad = "  ".repeat(indent);
        match &packet.payload {
            Payload::Literal(value) => {
                out.push_str(&format!("{}literal v={} value={}\n", pad, packet.version, value));
            }
            Payload::Operator { packet_type, children } => {
                out.push_str(&format!("{}{} v={} children={}\n", pad, packet_type, packet.version, children.len()));
                for child in children {
                    Self::render_node(child, indent + 1, out);
                }
            }
        }
    }
}

//! BITS パケット処理
//! ビット読み出し、パケット型定義、デコーダ、デバッグ出力

pub mod core;
pub mod types;
pub mod decoder;
pub mod debug;

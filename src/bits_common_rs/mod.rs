//! BITS 共通ライブラリ
//! パケット処理と入出力・設定・ログのユーティリティ

pub mod packet;
pub mod utils;

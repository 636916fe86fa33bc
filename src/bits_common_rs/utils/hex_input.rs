//! 16進テキスト入力
//! 標準入力・ファイル・引数から16進文字列を読み、バイト列に変換する

use std::fs;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::bits_common_rs::packet::core::exceptions::{BitsPacketError, BitsResult};

/// 16進文字列をバイト列に変換する (空白・改行は無視)
///
/// 奇数長や16進以外の文字はここでエラーになる。
pub fn decode_hex(text: &str) -> BitsResult<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = hex::decode(&cleaned)?;
    debug!("Decoded {} hex digits into {} bytes", cleaned.len(), bytes.len());
    Ok(bytes)
}

/// リーダーから全体を読み、16進としてデコードする
pub fn read_hex_from<R: Read>(mut reader: R) -> BitsResult<Vec<u8>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    decode_hex(&text)
}

pub fn read_hex_file<P: AsRef<Path>>(path: P) -> BitsResult<Vec<u8>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| BitsPacketError::Io(format!("{}: {}", path.display(), e)))?;
    decode_hex(&text)
}

//! BITS パケット処理用エラー型定義
//! ビット読み出しの終端、未定義オペレータ、再帰境界でのコンテキスト付与

use std::error::Error;
use std::fmt;

use crate::bits_common_rs::packet::types::packet_type::{Arity, PacketType};

/// パケット解析エラー
#[derive(Debug, Clone, PartialEq)]
pub enum PacketParseError {
    /// 必要なビットを読む前に入力が尽きた
    EndOfStream { bit_offset: usize },
    /// 1回の読み出しビット数が範囲外 (1..=64)
    InvalidBitCount(u32),
    /// 値がフィールド幅に収まらない
    FieldOutOfRange { value: u64, bits: u32 },
    /// オペレータが定義されていないパケット型
    UnknownOperator(u8),
    /// オペランド数がオペレータの要求と一致しない
    OperandCount { packet_type: PacketType, expected: Arity, actual: usize },
    /// リテラル値が64ビットを超えた
    LiteralOverflow { bit_offset: usize },
    /// 和または積が64ビットを超えた
    ArithmeticOverflow(PacketType),
    /// 長さモードのサブパケット領域を超えて読み出した
    LengthOverrun { expected_end: usize, actual_end: usize },
    /// 入れ子の深さが上限を超えた
    DepthExceeded(usize),
}

impl fmt::Display for PacketParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketParseError::EndOfStream { bit_offset } => {
                write!(f, "ストリーム終端に達しました (ビット位置 {})", bit_offset)
            }
            PacketParseError::InvalidBitCount(bits) => {
                write!(f, "不正な読み出しビット数: {} (1-64)", bits)
            }
            PacketParseError::FieldOutOfRange { value, bits } => {
                write!(f, "値 {} は {}ビットに収まりません", value, bits)
            }
            PacketParseError::UnknownOperator(code) => {
                write!(f, "オペレータ {:X} が見つかりません", code)
            }
            PacketParseError::OperandCount { packet_type, expected, actual } => {
                write!(f, "{} のオペランド数が不正: 期待 {}, 実際 {}", packet_type, expected, actual)
            }
            PacketParseError::LiteralOverflow { bit_offset } => {
                write!(f, "リテラル値が64ビットを超えました (ビット位置 {})", bit_offset)
            }
            PacketParseError::ArithmeticOverflow(packet_type) => {
                write!(f, "{} の計算結果が64ビットを超えました", packet_type)
            }
            PacketParseError::LengthOverrun { expected_end, actual_end } => {
                write!(f, "サブパケット領域の長さ不一致: 終端 {} に対して {} まで読み出し", expected_end, actual_end)
            }
            PacketParseError::DepthExceeded(depth) => {
                write!(f, "パケットの入れ子が深すぎます: {}", depth)
            }
        }
    }
}

impl Error for PacketParseError {}

/// エラーが通過した再帰境界
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeContext {
    /// リテラルのデコード中
    Literal,
    /// サブパケットのデコード中 (親パケット内での順序)
    SubPacket { index: usize },
}

impl fmt::Display for DecodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeContext::Literal => write!(f, "リテラルのデコード中"),
            DecodeContext::SubPacket { index } => write!(f, "サブパケット #{} のデコード中", index),
        }
    }
}

/// BITS パケット処理の統合エラー型
#[derive(Debug, Clone, PartialEq)]
pub enum BitsPacketError {
    /// パケット解析エラー
    Parse(PacketParseError),
    /// 再帰境界で付与されたコンテキスト
    Context {
        context: DecodeContext,
        source: Box<BitsPacketError>,
    },
    /// 16進入力のデコードエラー
    Hex(String),
    /// I/O エラー
    Io(String),
    /// 設定エラー
    Config(String),
}

impl BitsPacketError {
    /// コンテキストを剥がした最内側の解析エラー
    pub fn root_cause(&self) -> Option<&PacketParseError> {
        let mut current = self;
        loop {
            match current {
                BitsPacketError::Parse(err) => return Some(err),
                BitsPacketError::Context { source, .. } => current = source,
                _ => return None,
            }
        }
    }

    /// 外側から順に並べたコンテキスト
    pub fn context_chain(&self) -> Vec<DecodeContext> {
        let mut chain = Vec::new();
        let mut current = self;
        while let BitsPacketError::Context { context, source } = current {
            chain.push(*context);
            current = source;
        }
        chain
    }

    pub fn context_depth(&self) -> usize {
        self.context_chain().len()
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self.root_cause(), Some(PacketParseError::EndOfStream { .. }))
    }
}

impl fmt::Display for BitsPacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitsPacketError::Parse(err) => write!(f, "パケット解析エラー: {}", err),
            BitsPacketError::Context { context, source } => write!(f, "{}: {}", context, source),
            BitsPacketError::Hex(msg) => write!(f, "16進デコードエラー: {}", msg),
            BitsPacketError::Io(msg) => write!(f, "I/Oエラー: {}", msg),
            BitsPacketError::Config(msg) => write!(f, "設定エラー: {}", msg),
        }
    }
}

impl Error for BitsPacketError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BitsPacketError::Parse(err) => Some(err),
            BitsPacketError::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

// From実装で自動変換をサポート
impl From<PacketParseError> for BitsPacketError {
    fn from(err: PacketParseError) -> Self {
        BitsPacketError::Parse(err)
    }
}

impl From<std::io::Error> for BitsPacketError {
    fn from(err: std::io::Error) -> Self {
        BitsPacketError::Io(err.to_string())
    }
}

impl From<hex::FromHexError> for BitsPacketError {
    fn from(err: hex::FromHexError) -> Self {
        BitsPacketError::Hex(err.to_string())
    }
}

/// Result型のエイリアス
pub type BitsResult<T> = Result<T, BitsPacketError>;

/// 再帰境界でエラーにコンテキストを付与する
pub trait ResultExt<T> {
    fn context(self, context: DecodeContext) -> BitsResult<T>;
}

impl<T, E: Into<BitsPacketError>> ResultExt<T> for Result<T, E> {
    fn context(self, context: DecodeContext) -> BitsResult<T> {
        self.map_err(|err| BitsPacketError::Context {
            context,
            source: Box::new(err.into()),
        })
    }
}

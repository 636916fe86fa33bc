use std::fmt;

use crate::bits_common_rs::packet::core::exceptions::PacketParseError;

/// リテラルパケットの型コード
pub const LITERAL_TYPE_CODE: u8 = 4;

/// パケット型 (3ビットの型コード)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PacketType {
    Sum = 0,
    Product = 1,
    Minimum = 2,
    Maximum = 3,
    Literal = LITERAL_TYPE_CODE,
    GreaterThan = 5,
    LessThan = 6,
    EqualTo = 7,
}

/// オペレータが受け付けるオペランド数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    AtLeast(usize),
    Exactly(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::AtLeast(min) => count >= min,
            Arity::Exactly(n) => count == n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::AtLeast(min) => write!(f, "{}個以上", min),
            Arity::Exactly(n) => write!(f, "{}個", n),
        }
    }
}

impl PacketType {
    pub const ALL: [PacketType; 8] = [
        PacketType::Sum,
        PacketType::Product,
        PacketType::Minimum,
        PacketType::Maximum,
        PacketType::Literal,
        PacketType::GreaterThan,
        PacketType::LessThan,
        PacketType::EqualTo,
    ];

    /// 型コードからパケット型を取得
    pub fn from_code(code: u8) -> Result<Self, PacketParseError> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(PacketParseError::UnknownOperator(code))
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_literal(self) -> bool {
        self == PacketType::Literal
    }

    /// オペランド数の制約 (リテラルは子を持たない)
    pub fn arity(self) -> Arity {
        match self {
            PacketType::Sum | PacketType::Product => Arity::AtLeast(0),
            PacketType::Minimum | PacketType::Maximum => Arity::AtLeast(1),
            PacketType::GreaterThan | PacketType::LessThan | PacketType::EqualTo => Arity::Exactly(2),
            PacketType::Literal => Arity::Exactly(0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PacketType::Sum => "sum",
            PacketType::Product => "product",
            PacketType::Minimum => "minimum",
            PacketType::Maximum => "maximum",
            PacketType::Literal => "literal",
            PacketType::GreaterThan => "greater_than",
            PacketType::LessThan => "less_than",
            PacketType::EqualTo => "equal_to",
        }
    }
}

impl TryFrom<u8> for PacketType {
    type Error = PacketParseError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! オペレータテーブル
//! 非リテラルのパケット型ごとに、子パケットの値列を1つの値にまとめる関数を定義する

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::packet_type::PacketType;
use crate::bits_common_rs::packet::core::exceptions::PacketParseError;

/// 子パケットの値列 -> パケットの値
pub type OperatorFn = fn(&[u64]) -> Result<u64, PacketParseError>;

static OPERATORS: Lazy<HashMap<PacketType, OperatorFn>> = Lazy::new(|| {
    let mut table: HashMap<PacketType, OperatorFn> = HashMap::new();
    table.insert(PacketType::Sum, sum);
    table.insert(PacketType::Product, product);
    table.insert(PacketType::Minimum, minimum);
    table.insert(PacketType::Maximum, maximum);
    table.insert(PacketType::GreaterThan, greater_than);
    table.insert(PacketType::LessThan, less_than);
    table.insert(PacketType::EqualTo, equal_to);
    table
});

/// パケット型に対応するオペレータを取得
pub fn lookup(packet_type: PacketType) -> Option<OperatorFn> {
    OPERATORS.get(&packet_type).copied()
}

/// オペレータを値列に適用する
///
/// 未定義の型 (リテラル) は `UnknownOperator`、
/// オペランド数が型の制約に合わなければ `OperandCount` を返す。
pub fn apply_operator(packet_type: PacketType, values: &[u64]) -> Result<u64, PacketParseError> {
    let op = lookup(packet_type).ok_or(PacketParseError::UnknownOperator(packet_type.code()))?;

    let arity = packet_type.arity();
    if !arity.accepts(values.len()) {
        return Err(PacketParseError::OperandCount {
            packet_type,
            expected: arity,
            actual: values.len(),
        });
    }

    op(values)
}

fn sum(values: &[u64]) -> Result<u64, PacketParseError> {
    values
        .iter()
        .try_fold(0u64, |acc, &v| acc.checked_add(v))
        .ok_or(PacketParseError::ArithmeticOverflow(PacketType::Sum))
}

fn product(values: &[u64]) -> Result<u64, PacketParseError> {
    values
        .iter()
        .try_fold(1u64, |acc, &v| acc.checked_mul(v))
        .ok_or(PacketParseError::ArithmeticOverflow(PacketType::Product))
}

fn minimum(values: &[u64]) -> Result<u64, PacketParseError> {
    values.iter().copied().min().ok_or(PacketParseError::OperandCount {
        packet_type: PacketType::Minimum,
        expected: PacketType::Minimum.arity(),
        actual: 0,
    })
}

// 実際のオペランドで畳み込むため、初期値0に依存しない
fn maximum(values: &[u64]) -> Result<u64, PacketParseError> {
    values.iter().copied().max().ok_or(PacketParseError::OperandCount {
        packet_type: PacketType::Maximum,
        expected: PacketType::Maximum.arity(),
        actual: 0,
    })
}

fn compare(
    packet_type: PacketType,
    values: &[u64],
    predicate: fn(&u64, &u64) -> bool,
) -> Result<u64, PacketParseError> {
    match values {
        [lhs, rhs] => Ok(u64::from(predicate(lhs, rhs))),
        _ => Err(PacketParseError::OperandCount {
            packet_type,
            expected: packet_type.arity(),
            actual: values.len(),
        }),
    }
}

fn greater_than(values: &[u64]) -> Result<u64, PacketParseError> {
    compare(PacketType::GreaterThan, values, u64::gt)
}

fn less_than(values: &[u64]) -> Result<u64, PacketParseError> {
    compare(PacketType::LessThan, values, u64::lt)
}

fn equal_to(values: &[u64]) -> Result<u64, PacketParseError> {
    compare(PacketType::EqualTo, values, u64::eq)
}

//! Discount-percent ranges applied to grain analysis

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the discount table: analysis values in `[start, end]`
/// for `discount_code` are discounted `percent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountPercent {
    pub id: i64,
    pub discount_code: i32,
    pub start: Decimal,
    pub end: Decimal,
    pub percent: Decimal,
}

impl DiscountPercent {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.start && value <= self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscountPercentDto {
    pub discount_code: i32,
    pub start: Decimal,
    pub end: Decimal,
    pub percent: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiscountPercentDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,
}

/// Find the discount percent for an analysis value.
///
/// Ranges are inclusive at both ends; when two rows overlap the first one
/// in table order wins.
pub fn lookup_percent(ranges: &[DiscountPercent], code: i32, value: Decimal) -> Option<Decimal> {
    ranges
        .iter()
        .filter(|r| r.discount_code == code)
        .find(|r| r.contains(value))
        .map(|r| r.percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn humidity_table() -> Vec<DiscountPercent> {
        vec![
            DiscountPercent {
                id: 1,
                discount_code: 1,
                start: dec("0"),
                end: dec("15"),
                percent: dec("0"),
            },
            DiscountPercent {
                id: 2,
                discount_code: 1,
                start: dec("15.01"),
                end: dec("17.5"),
                percent: dec("2.5"),
            },
            DiscountPercent {
                id: 3,
                discount_code: 2,
                start: dec("0"),
                end: dec("100"),
                percent: dec("1"),
            },
        ]
    }

    #[test]
    fn test_lookup_percent_inclusive_bounds() {
        let table = humidity_table();
        assert_eq!(lookup_percent(&table, 1, dec("15")), Some(dec("0")));
        assert_eq!(lookup_percent(&table, 1, dec("17.5")), Some(dec("2.5")));
    }

    #[test]
    fn test_lookup_percent_filters_by_code() {
        let table = humidity_table();
        assert_eq!(lookup_percent(&table, 2, dec("16")), Some(dec("1")));
        assert_eq!(lookup_percent(&table, 3, dec("16")), None);
    }

    #[test]
    fn test_lookup_percent_out_of_range() {
        let table = humidity_table();
        assert_eq!(lookup_percent(&table, 1, dec("25")), None);
    }

    #[test]
    fn test_discount_percent_deserializes_numbers() {
        let row: DiscountPercent = serde_json::from_str(
            r#"{"id": 7, "discountCode": 1, "start": 15.01, "end": 17.5, "percent": 2}"#,
        )
        .unwrap();
        assert_eq!(row.percent, dec("2"));
        assert!(row.contains(dec("16")));
    }
}

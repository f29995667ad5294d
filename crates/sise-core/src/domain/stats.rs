//! 시계열 정리용 통계 헬퍼.

use rust_decimal::Decimal;

/// 중앙값. 빈 입력이면 0입니다.
pub fn median(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / Decimal::from(2)
    }
}

/// 중앙값에서 `m` × MAD(중앙값 절대 편차)보다 멀리 떨어진 값을 걸러냅니다.
///
/// 차트를 그리기 전에 튀는 값을 정리하는 용도입니다. MAD가 0이면(값이 모두
/// 같으면) 아무것도 거르지 않습니다.
pub fn reject_outliers(values: &[Decimal], m: Decimal) -> Vec<Decimal> {
    if values.is_empty() {
        return Vec::new();
    }

    let center = median(values);
    let deviations: Vec<Decimal> = values.iter().map(|v| (*v - center).abs()).collect();
    let mad = median(&deviations);

    if mad.is_zero() {
        return values.to_vec();
    }

    values
        .iter()
        .zip(deviations.iter())
        .filter(|(_, d)| **d / mad < m)
        .map(|(v, _)| *v)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), Decimal::ZERO);
        assert_eq!(median(&[dec!(3)]), dec!(3));
        assert_eq!(median(&[dec!(3), dec!(1), dec!(2)]), dec!(2));
        assert_eq!(median(&[dec!(1), dec!(2), dec!(3), dec!(4)]), dec!(2.5));
    }

    #[test]
    fn test_reject_outliers_drops_spikes() {
        let values = vec![
            dec!(10),
            dec!(11),
            dec!(10),
            dec!(12),
            dec!(11),
            dec!(500), // 튀는 값
        ];
        let kept = reject_outliers(&values, dec!(2));
        assert!(!kept.contains(&dec!(500)));
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn test_reject_outliers_keeps_constant_series() {
        let values = vec![dec!(7); 4];
        assert_eq!(reject_outliers(&values, dec!(2)), values);
    }
}

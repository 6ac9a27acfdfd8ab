use std::fmt;

use crate::num::Decimal;

/// Display-side growth rate of a resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthRate {
    PerSecond(Decimal),
    /// Orders of magnitude gained per second, once that reaches one.
    OomsPerSecond(Decimal),
}

pub fn growth_rate(value: Decimal, gain_per_second: Decimal) -> GrowthRate {
    let next = value + gain_per_second;
    if value.is_positive() && next.is_positive() {
        let ooms = next.magnitude_log10() - value.magnitude_log10();
        if ooms >= 1.0 {
            return GrowthRate::OomsPerSecond(Decimal::from_f64(ooms));
        }
    }
    GrowthRate::PerSecond(gain_per_second)
}

impl fmt::Display for GrowthRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerSecond(gain) => write!(f, "{}/sec", gain.format(2)),
            Self::OomsPerSecond(ooms) => write!(f, "{} OoMs/sec", ooms.format(2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GrowthRate, growth_rate};
    use crate::num::Decimal;

    #[test]
    fn slow_growth_reports_per_second() {
        let rate = growth_rate(Decimal::from(10), Decimal::from(2));

        assert_eq!(rate, GrowthRate::PerSecond(Decimal::from(2)));
        assert_eq!(rate.to_string(), "2.00/sec");
    }

    #[test]
    fn explosive_growth_reports_orders_of_magnitude() {
        let value: Decimal = "1e50".parse().expect("literal");
        let gain: Decimal = "1e53".parse().expect("literal");

        match growth_rate(value, gain) {
            GrowthRate::OomsPerSecond(ooms) => {
                assert!((ooms.to_f64() - 3.0).abs() < 0.01);
            }
            other => panic!("expected OoMs/sec, got {other:?}"),
        }
    }
}

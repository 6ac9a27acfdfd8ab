use crate::num::Decimal;

/// A named quantity owned by one layer.
///
/// `value` is the live amount. `best` and `total` are optional trackers: the
/// running maximum and the running sum of every increase `value` has seen
/// (the initial amount counts as the first increase). Neither is touched by
/// [`Resource::reset`], so both only ever grow.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub key: String,
    pub name: String,
    /// Decimal places used when displaying the value.
    pub precision: usize,
    value: Decimal,
    baseline: Decimal,
    best: Option<Decimal>,
    total: Option<Decimal>,
}

impl Resource {
    pub fn new(key: impl Into<String>, name: impl Into<String>, initial: impl Into<Decimal>) -> Self {
        let initial = initial.into();
        Self {
            key: key.into(),
            name: name.into(),
            precision: 2,
            value: initial,
            baseline: initial,
            best: None,
            total: None,
        }
    }

    pub fn with_best(mut self) -> Self {
        self.best = Some(self.value);
        self
    }

    pub fn with_total(mut self) -> Self {
        self.total = Some(self.value.max(Decimal::ZERO));
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn baseline(&self) -> Decimal {
        self.baseline
    }

    pub fn best(&self) -> Option<Decimal> {
        self.best
    }

    pub fn total(&self) -> Option<Decimal> {
        self.total
    }

    pub fn set(&mut self, value: Decimal) {
        let previous = self.value;
        self.value = value;
        if value <= previous {
            return;
        }
        if let Some(total) = self.total.as_mut() {
            *total += value - previous;
        }
        if let Some(best) = self.best.as_mut() {
            *best = (*best).max(value);
        }
    }

    pub fn add(&mut self, amount: Decimal) {
        if amount.is_zero() {
            return;
        }
        self.set(self.value + amount);
    }

    /// Applies one tick's inflow (non-negative) and outflow (non-positive)
    /// together. `total` grows by the whole inflow even when the outflow
    /// cancels part of it; `best` only sees the net result.
    pub fn add_flow(&mut self, inflow: Decimal, outflow: Decimal) {
        self.value = self.value + inflow + outflow;
        if let Some(total) = self.total.as_mut() {
            if inflow.is_positive() {
                *total += inflow;
            }
        }
        if let Some(best) = self.best.as_mut() {
            *best = (*best).max(self.value);
        }
    }

    /// Subtracts `amount` only when the whole amount is held.
    pub fn try_spend(&mut self, amount: Decimal) -> bool {
        if amount.is_negative() || self.value < amount {
            return false;
        }
        if !amount.is_zero() {
            self.value = self.value - amount;
        }
        true
    }

    pub fn reset(&mut self) {
        self.set(self.baseline);
    }

    /// Overwrites value and trackers from persisted state, bypassing tracking.
    /// Trackers the resource was not built with stay disabled.
    pub fn restore(&mut self, value: Decimal, best: Option<Decimal>, total: Option<Decimal>) {
        self.value = value;
        if let (Some(slot), Some(best)) = (self.best.as_mut(), best) {
            *slot = best.max(value);
        }
        if let (Some(slot), Some(total)) = (self.total.as_mut(), total) {
            *slot = total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Resource;
    use crate::num::Decimal;

    fn points() -> Resource {
        Resource::new("main.points", "vertices", 10).with_best().with_total()
    }

    #[test]
    fn trackers_follow_increases_only() {
        let mut resource = points();
        resource.add(Decimal::from(15));
        resource.set(Decimal::from(5));
        resource.add(Decimal::from(3));

        assert_eq!(resource.value(), Decimal::from(8));
        assert_eq!(resource.best(), Some(Decimal::from(25)));
        assert_eq!(resource.total(), Some(Decimal::from(28)));
    }

    #[test]
    fn flow_totals_every_inflow_even_when_outflow_cancels_it() {
        let mut resource = points();
        resource.add_flow(Decimal::from(3), Decimal::from(-5));

        assert_eq!(resource.value(), Decimal::from(8));
        assert_eq!(resource.best(), Some(Decimal::from(10)));
        assert_eq!(resource.total(), Some(Decimal::from(13)));
    }

    #[test]
    fn reset_returns_to_baseline_and_keeps_trackers() {
        let mut resource = points();
        resource.add(Decimal::from(90));
        resource.reset();

        assert_eq!(resource.value(), Decimal::from(10));
        assert_eq!(resource.best(), Some(Decimal::from(100)));
        assert_eq!(resource.total(), Some(Decimal::from(100)));
    }

    #[test]
    fn spend_is_all_or_nothing() {
        let mut resource = Resource::new("a.points", "alpha", 5);

        assert!(!resource.try_spend(Decimal::from(6)));
        assert_eq!(resource.value(), Decimal::from(5));
        assert!(resource.try_spend(Decimal::from(5)));
        assert_eq!(resource.value(), Decimal::ZERO);
        assert!(resource.try_spend(Decimal::ZERO));
        assert!(!resource.try_spend(Decimal::from(-1)));
    }

    #[test]
    fn untracked_resource_reports_no_trackers() {
        let mut resource = Resource::new("l.points", "lines", 0);
        resource.add(Decimal::from(4));
        resource.restore(Decimal::from(2), Some(Decimal::from(9)), Some(Decimal::from(9)));

        assert_eq!(resource.value(), Decimal::from(2));
        assert_eq!(resource.best(), None);
        assert_eq!(resource.total(), None);
    }
}

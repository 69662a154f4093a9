use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 低於這個價位只用 .79 結尾，以上才允許 .99
const NINETY_NINE_FLOOR: Decimal = dec!(10);
const SMALL_PRICE_POINTS: [Decimal; 5] = [dec!(0.79), dec!(0.99), dec!(1.79), dec!(1.99), dec!(2.99)];
const MAX_PAD_STEPS: i64 = 10;

/// 取低於 `price` 的最大心理價位
pub fn undercut(price: Decimal) -> Decimal {
    if price == dec!(0.99) || price < Decimal::ONE {
        return dec!(0.79);
    }

    let endings: &[Decimal] = if price < NINETY_NINE_FLOOR {
        &[dec!(0.79)]
    } else {
        &[dec!(0.99), dec!(0.79)]
    };

    let mut whole = price.floor();
    while whole >= Decimal::ZERO {
        if let Some(candidate) = endings
            .iter()
            .map(|ending| whole + ending)
            .find(|candidate| *candidate < price)
        {
            return candidate;
        }
        whole -= Decimal::ONE;
    }

    dec!(0.79)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderSettings {
    /// 少於這個點數時補點
    pub min_points: usize,
    pub max_points: usize,
    /// 相鄰兩點至少相差的百分比
    pub min_gap_percent: Decimal,
}

impl Default for LadderSettings {
    fn default() -> Self {
        Self {
            min_points: 8,
            max_points: 12,
            min_gap_percent: dec!(3),
        }
    }
}

impl LadderSettings {
    fn gap_factor(&self) -> Decimal {
        Decimal::ONE + self.min_gap_percent / dec!(100)
    }
}

pub fn generate_suggestion_ladder(min: Decimal, median: Decimal, suggested: Decimal) -> Vec<Decimal> {
    PriceLadder::new(LadderSettings::default()).generate(min, median, suggested)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PriceLadder {
    settings: LadderSettings,
}

impl PriceLadder {
    pub fn new(settings: LadderSettings) -> Self {
        Self { settings }
    }

    /// 由低到高篩出彼此保持間距的替代價位，不足時補點，最後截斷
    pub fn generate(&self, min: Decimal, median: Decimal, suggested: Decimal) -> Vec<Decimal> {
        let mut pool = candidate_points(min, median, suggested);
        pool.retain(|value| *value > Decimal::ZERO);
        pool.sort();
        pool.dedup();

        let factor = self.settings.gap_factor();
        let mut ladder: Vec<Decimal> = Vec::with_capacity(pool.len());
        for value in pool {
            match ladder.last() {
                Some(last) if value < *last * factor => {}
                _ => ladder.push(value),
            }
        }

        if ladder.len() < self.settings.min_points && suggested > Decimal::ONE {
            self.pad(&mut ladder, suggested.floor());
        }

        ladder.truncate(self.settings.max_points);
        ladder
    }

    fn pad(&self, ladder: &mut Vec<Decimal>, whole: Decimal) {
        for step in 2..=MAX_PAD_STEPS {
            let step = Decimal::from(step);
            for candidate in [whole - step - dec!(0.01), whole + step + dec!(0.99)] {
                if candidate <= Decimal::ZERO {
                    continue;
                }
                self.try_insert(ladder, candidate);
                if ladder.len() >= self.settings.min_points {
                    return;
                }
            }
        }
    }

    /// 補點可能落在中間，要跟上下兩個鄰居都保持間距
    fn try_insert(&self, ladder: &mut Vec<Decimal>, value: Decimal) -> bool {
        let factor = self.settings.gap_factor();
        let position = ladder.partition_point(|existing| *existing < value);

        if let Some(upper) = ladder.get(position) {
            if *upper < value * factor {
                return false;
            }
        }
        if position > 0 && value < ladder[position - 1] * factor {
            return false;
        }

        ladder.insert(position, value);
        true
    }
}

fn candidate_points(min: Decimal, median: Decimal, suggested: Decimal) -> Vec<Decimal> {
    let whole = suggested.floor();
    let mut points = vec![
        suggested,
        whole - dec!(0.01),
        whole + dec!(0.99),
        whole + dec!(1.99),
        whole - dec!(1.01),
        whole - dec!(0.21),
        whole + dec!(0.79),
        min,
    ];

    let midpoint = ((min + suggested) / dec!(2)).floor();
    points.push(midpoint + dec!(0.79));
    points.push(midpoint - dec!(0.01));
    points.push(median);

    if suggested > dec!(5) {
        points.push(suggested * dec!(0.9));
        points.push(suggested * dec!(1.1));
    }
    if suggested < dec!(5) {
        points.extend(SMALL_PRICE_POINTS.iter().copied().filter(|p| *p < suggested));
    }

    points.into_iter().map(|p| p.round_dp(2)).collect()
}

//! Step-function grid lookups.
//!
//! Shared bracket rule: the first breakpoint >= the input dimension
//! wins (round up to the next bracket). An input above the largest
//! breakpoint has no price and blocks with a warning naming the max.
//!
//! Orientation is fixed per algorithm: standard grids are width-major
//! `table[width][drop]`; curtain and external tables are drop-major
//! `table[drop][width]`.

use rust_decimal::Decimal;

use super::{group_code, group_multiplier, Fullness, PricingOutcome};
use crate::domain::price_group::PriceGroup;
use crate::domain::product::GridPricingData;

fn bracket_index(steps: &[u32], value: u32) -> Option<usize> {
    steps.iter().position(|step| value <= *step)
}

/// Both bracket indices, or the blocking outcome for whichever
/// dimension falls outside its priced range.
fn bracket_indices(
    data: &GridPricingData,
    width: u32,
    drop: u32,
) -> Result<(usize, usize), PricingOutcome> {
    let width_index = bracket_index(&data.width_steps, width).ok_or_else(|| {
        let max = data.width_steps.last().copied().unwrap_or(0);
        PricingOutcome::blocked(format!("Width {width}mm exceeds max {max}mm"))
    })?;
    let drop_index = bracket_index(&data.drop_steps, drop).ok_or_else(|| {
        let max = data.drop_steps.last().copied().unwrap_or(0);
        PricingOutcome::blocked(format!("Drop {drop}mm exceeds max {max}mm"))
    })?;
    Ok((width_index, drop_index))
}

fn cell(table: &[Vec<Decimal>], row: usize, col: usize) -> Decimal {
    table.get(row).and_then(|cells| cells.get(col)).copied().unwrap_or(Decimal::ZERO)
}

fn bracket_note(data: &GridPricingData, width_index: usize, drop_index: usize) -> String {
    format!("Priced @ {}W x {}D", data.width_steps[width_index], data.drop_steps[drop_index])
}

/// Default grid algorithm for grid-typed products outside the curtain
/// and external-blind categories. Key lookup retries a
/// case-insensitive match and then the single ungrouped `grid` table;
/// the other grid paths deliberately do neither.
pub(super) fn standard_grid_price(
    data: &GridPricingData,
    width: u32,
    drop: u32,
    price_group: Option<&PriceGroup>,
) -> PricingOutcome {
    if (data.grids.is_none() && data.grid.is_none())
        || data.width_steps.is_empty()
        || data.drop_steps.is_empty()
    {
        return PricingOutcome::blocked("Invalid pricing data");
    }

    let key = group_code(price_group);
    let table = data
        .grids
        .as_ref()
        .and_then(|grids| {
            grids.get(&key).or_else(|| {
                grids
                    .iter()
                    .find(|(candidate, _)| candidate.eq_ignore_ascii_case(&key))
                    .map(|(_, table)| table)
            })
        })
        .or(data.grid.as_ref());

    let Some(table) = table else {
        return PricingOutcome::blocked(format!("Price grid not found for Group {key}"));
    };

    let (width_index, drop_index) = match bracket_indices(data, width, drop) {
        Ok(indices) => indices,
        Err(blocked) => return blocked,
    };

    let price = cell(table, width_index, drop_index) * group_multiplier(price_group);
    PricingOutcome::priced_with_note(price, bracket_note(data, width_index, drop_index))
}

/// Curtain tables are keyed by `"{group_code}_{fullness}"` and are
/// assumed pre-multiplied; no group multiplier applies.
pub(super) fn curtain_price(
    data: &GridPricingData,
    width: u32,
    drop: u32,
    price_group: Option<&PriceGroup>,
    fullness: Fullness,
) -> PricingOutcome {
    let Some(grids) = data.grids.as_ref() else {
        return PricingOutcome::blocked("Invalid pricing data");
    };
    if data.width_steps.is_empty() || data.drop_steps.is_empty() {
        return PricingOutcome::blocked("Invalid pricing data");
    }

    let key = format!("{}_{}", group_code(price_group), fullness.key());
    let Some(table) = grids.get(&key) else {
        return PricingOutcome::blocked(format!("Price grid not found for key: {key}"));
    };

    let (width_index, drop_index) = match bracket_indices(data, width, drop) {
        Ok(indices) => indices,
        Err(blocked) => return blocked,
    };

    let price = cell(table, drop_index, width_index);
    PricingOutcome::priced_with_note(price, bracket_note(data, width_index, drop_index))
}

pub(super) fn external_blind_price(
    data: &GridPricingData,
    width: u32,
    drop: u32,
    price_group: Option<&PriceGroup>,
) -> PricingOutcome {
    let Some(grids) = data.grids.as_ref() else {
        return PricingOutcome::blocked("Invalid pricing data");
    };
    if data.width_steps.is_empty() || data.drop_steps.is_empty() {
        return PricingOutcome::blocked("Invalid pricing data");
    }

    let key = group_code(price_group);
    let Some(table) = grids.get(&key) else {
        return PricingOutcome::blocked(format!("Price grid not found for Group {key}"));
    };

    let (width_index, drop_index) = match bracket_indices(data, width, drop) {
        Ok(indices) => indices,
        Err(blocked) => return blocked,
    };

    let price = cell(table, drop_index, width_index) * group_multiplier(price_group);
    PricingOutcome::priced_with_note(price, bracket_note(data, width_index, drop_index))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;

    use super::{curtain_price, external_blind_price, standard_grid_price};
    use crate::domain::price_group::{PriceGroup, PriceGroupId};
    use crate::domain::product::GridPricingData;
    use crate::pricing::Fullness;

    fn group(code: &str, multiplier: Decimal) -> PriceGroup {
        PriceGroup {
            id: PriceGroupId(format!("pg-{code}")),
            supplier: "Creative".to_string(),
            category: "Internal Blinds".to_string(),
            group_code: code.to_string(),
            group_name: format!("Group {code}"),
            multiplier,
            notes: None,
            is_active: true,
        }
    }

    fn standard_data() -> GridPricingData {
        let mut grids = BTreeMap::new();
        // Width-major: three width rows, two drop columns.
        grids.insert(
            "1".to_string(),
            vec![
                vec![Decimal::from(100), Decimal::from(120)],
                vec![Decimal::from(110), Decimal::from(130)],
                vec![Decimal::from(125), Decimal::from(145)],
            ],
        );
        GridPricingData {
            width_steps: vec![600, 900, 1200],
            drop_steps: vec![1200, 1800],
            grid: None,
            grids: Some(grids),
            notes: None,
        }
    }

    #[test]
    fn standard_grid_rounds_dimensions_up_to_next_bracket() {
        let outcome =
            standard_grid_price(&standard_data(), 700, 1500, Some(&group("1", Decimal::ONE)));
        assert_eq!(outcome.price, Decimal::from(130));
        assert_eq!(outcome.note.as_deref(), Some("Priced @ 900W x 1800D"));
        assert!(!outcome.is_blocked());
    }

    #[test]
    fn standard_grid_defaults_to_group_one_without_a_selection() {
        let outcome = standard_grid_price(&standard_data(), 600, 1200, None);
        assert_eq!(outcome.price, Decimal::from(100));
    }

    #[test]
    fn standard_grid_applies_the_group_multiplier() {
        let data = standard_data();
        let mut grids = data.grids.clone().expect("grids");
        grids.insert("2".to_string(), grids["1"].clone());
        let data = GridPricingData { grids: Some(grids), ..data };

        let outcome = standard_grid_price(&data, 700, 1500, Some(&group("2", Decimal::new(12, 1))));
        assert_eq!(outcome.price, Decimal::from(156));
    }

    #[test]
    fn standard_grid_retries_key_case_insensitively() {
        let mut grids = BTreeMap::new();
        grids.insert("a".to_string(), vec![vec![Decimal::from(90)]]);
        let data = GridPricingData {
            width_steps: vec![600],
            drop_steps: vec![1200],
            grid: None,
            grids: Some(grids),
            notes: None,
        };

        let outcome = standard_grid_price(&data, 500, 1000, Some(&group("A", Decimal::ONE)));
        assert_eq!(outcome.price, Decimal::from(90));
    }

    #[test]
    fn standard_grid_falls_back_to_the_single_ungrouped_table() {
        let data = GridPricingData {
            width_steps: vec![600],
            drop_steps: vec![1200],
            grid: Some(vec![vec![Decimal::from(75)]]),
            grids: None,
            notes: None,
        };

        let outcome = standard_grid_price(&data, 500, 1000, Some(&group("3", Decimal::ONE)));
        assert_eq!(outcome.price, Decimal::from(75));
    }

    #[test]
    fn width_above_the_largest_breakpoint_blocks_with_the_max() {
        let outcome = standard_grid_price(&standard_data(), 1300, 1500, None);
        assert_eq!(outcome.price, Decimal::ZERO);
        assert_eq!(outcome.warning.as_deref(), Some("Width 1300mm exceeds max 1200mm"));
    }

    #[test]
    fn drop_above_the_largest_breakpoint_blocks_with_the_max() {
        let outcome = standard_grid_price(&standard_data(), 700, 2000, None);
        assert_eq!(outcome.warning.as_deref(), Some("Drop 2000mm exceeds max 1800mm"));
    }

    #[test]
    fn missing_group_key_blocks_rather_than_guessing() {
        let outcome = standard_grid_price(&standard_data(), 700, 1500, Some(&group("9", Decimal::ONE)));
        assert_eq!(outcome.warning.as_deref(), Some("Price grid not found for Group 9"));
    }

    fn curtain_data() -> GridPricingData {
        let mut grids = BTreeMap::new();
        // Drop-major: two drop rows, two width columns.
        grids.insert(
            "2_160".to_string(),
            vec![
                vec![Decimal::from(400), Decimal::from(460)],
                vec![Decimal::from(440), Decimal::from(520)],
            ],
        );
        grids.insert(
            "2_100".to_string(),
            vec![
                vec![Decimal::from(300), Decimal::from(340)],
                vec![Decimal::from(320), Decimal::from(380)],
            ],
        );
        GridPricingData {
            width_steps: vec![1500, 3000],
            drop_steps: vec![2200, 3000],
            grid: None,
            grids: Some(grids),
            notes: None,
        }
    }

    #[test]
    fn curtain_key_combines_group_code_and_fullness() {
        let outcome = curtain_price(
            &curtain_data(),
            2000,
            2500,
            Some(&group("2", Decimal::new(15, 1))),
            Fullness::HundredSixty,
        );
        // Drop-major cell [1][1], and no multiplier despite the group
        // carrying one.
        assert_eq!(outcome.price, Decimal::from(520));
        assert_eq!(outcome.note.as_deref(), Some("Priced @ 3000W x 3000D"));
    }

    #[test]
    fn curtain_fullness_defaults_to_one_hundred() {
        let outcome = curtain_price(
            &curtain_data(),
            1000,
            2000,
            Some(&group("2", Decimal::ONE)),
            Fullness::default(),
        );
        assert_eq!(outcome.price, Decimal::from(300));
    }

    #[test]
    fn curtain_lookup_does_not_fall_back_on_key_case() {
        let mut data = curtain_data();
        let grids = data.grids.as_mut().expect("grids");
        let table = grids.remove("2_100").expect("table");
        grids.insert("B_100".to_string(), table);

        let outcome = curtain_price(
            &data,
            1000,
            2000,
            Some(&group("b", Decimal::ONE)),
            Fullness::Hundred,
        );
        assert_eq!(outcome.warning.as_deref(), Some("Price grid not found for key: b_100"));
    }

    #[test]
    fn external_blind_price_is_table_value_times_multiplier() {
        let mut grids = BTreeMap::new();
        grids.insert("1".to_string(), vec![vec![Decimal::from(200)]]);
        let data = GridPricingData {
            width_steps: vec![3000],
            drop_steps: vec![2400],
            grid: None,
            grids: Some(grids),
            notes: None,
        };

        let outcome =
            external_blind_price(&data, 2500, 2000, Some(&group("1", Decimal::new(115, 2))));
        assert_eq!(outcome.price, Decimal::from(230));
        assert_eq!(outcome.note.as_deref(), Some("Priced @ 3000W x 2400D"));
    }

    #[test]
    fn grids_without_tables_block_as_invalid_data() {
        let data = GridPricingData {
            width_steps: vec![600],
            drop_steps: vec![1200],
            grid: None,
            grids: None,
            notes: None,
        };
        let outcome = standard_grid_price(&data, 500, 1000, None);
        assert_eq!(outcome.warning.as_deref(), Some("Invalid pricing data"));

        let outcome = external_blind_price(&data, 500, 1000, None);
        assert_eq!(outcome.warning.as_deref(), Some("Invalid pricing data"));
    }
}

//! Fixtures for tests

use crate::chemical::{ChemicalID, ChemicalPrices};
use crate::finance::{CostIndexTable, CostIndices};
use crate::reference::ReferenceData;
use crate::technology::ion_exchange::{IonExchangeCostCurves, IonExchangeCurve};
use crate::technology::uv_aop::{UvCostGrid, UvCostPoint};
use crate::units::MoneyPerMass;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn chemical_prices() -> ChemicalPrices {
    [
        ("Aluminum_Al2_SO4_3", 0.56),
        ("Hydrochloric_Acid_(HCl)", 0.17),
        ("Hydrazine_(N2H4)", 3.17),
        ("Hydrogen_Peroxide_(H2O2)", 0.61),
        ("Sulfuric_Acid_(H2SO4)", 0.12),
    ]
    .into_iter()
    .map(|(id, price)| (ChemicalID::new(id), MoneyPerMass(price)))
    .collect()
}

#[fixture]
pub fn cost_index_table() -> CostIndexTable {
    let rows = (1990..=2020).map(|year| {
        let offset = (year - 1990) as f64;
        (
            year,
            CostIndices {
                capital: 350.0 + 6.0 * offset,
                cat_chem: 120.0 + 1.5 * offset,
                labor: 100.0 + 3.0 * offset,
                cpi: 130.0 + 2.5 * offset,
            },
        )
    });
    CostIndexTable::from_indices(rows).unwrap()
}

#[fixture]
pub fn uv_cost_grid() -> UvCostGrid {
    let flows = [1.0, 3.0, 5.0, 10.0, 25.0];
    let costs = [500.0, 1100.0, 1600.0, 2700.0, 5500.0];
    let points = flows.into_iter().zip(costs).map(|(flow, cost)| UvCostPoint {
        flow,
        dose: 100.0,
        uvt: 0.9,
        cost,
    });
    UvCostGrid::from_points(points).unwrap()
}

#[fixture]
pub fn ion_exchange_curves() -> IonExchangeCostCurves {
    let rows = [1000.0, 5000.0, 10000.0, 15000.0].map(|tds| IonExchangeCurve {
        tds,
        cap_a: 1603.2,
        cap_b: 0.7396,
        elect_a: 0.083,
        elect_b: 0.0418,
        chemical_id: "Sulfuric_Acid_(H2SO4)".to_string(),
        dose: 0.0042,
    });
    IonExchangeCostCurves::from_curves(rows).unwrap()
}

#[fixture]
pub fn reference_data(
    chemical_prices: ChemicalPrices,
    cost_index_table: CostIndexTable,
    uv_cost_grid: UvCostGrid,
    ion_exchange_curves: IonExchangeCostCurves,
) -> ReferenceData {
    ReferenceData {
        chemical_prices,
        cost_indices: cost_index_table,
        uv_cost_grid,
        ion_exchange_curves,
    }
}

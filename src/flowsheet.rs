//! The flowsheet driver.
//!
//! Runs a train end to end: the source stream passes through each unit's zeroth-order
//! balance in treatment order, every unit is costed at its inlet flow and the per-unit
//! results are aggregated into the system costing.
use crate::costing::{SystemCosting, UnitCosting, complete_costing};
use crate::reference::ReferenceData;
use crate::stream::{Stream, apply_balance};
use crate::train::Train;
use crate::unit_process::UnitID;
use anyhow::{Context, Result};
use log::info;

/// One unit's streams and complete costing
pub struct CostedUnit {
    /// A unique identifier for the unit
    pub id: UnitID,
    /// The unit's inlet stream
    pub inlet: Stream,
    /// The treated stream passed to the next unit
    pub outlet: Stream,
    /// The reject stream
    pub waste: Stream,
    /// The unit's complete costing
    pub costing: UnitCosting,
}

/// The results of running a train
pub struct FlowsheetResults {
    /// Per-unit streams and costings, in treatment order
    pub units: Vec<CostedUnit>,
    /// Train-level totals and the levelized cost of water
    pub system: SystemCosting,
}

/// Run the train: propagate streams, cost each unit and aggregate.
///
/// # Arguments
///
/// * `train` - The train to run
/// * `reference` - The reference data tables
pub fn run(train: &Train, reference: &ReferenceData) -> Result<FlowsheetResults> {
    let mut stream = Stream::source(train.source_flow, &train.constituents);
    let mut units = Vec::with_capacity(train.units.len());
    for unit in &train.units {
        let inlet = stream;
        let balance = apply_balance(&inlet, unit.water_recovery, |constituent_id| {
            train.removal_fraction(&unit.id, constituent_id)
        });

        let costing = complete_costing(
            unit.cost_model.as_ref(),
            inlet.flow,
            train.analysis_year,
            &train.finance,
            &reference.cost_indices,
            &reference.chemical_prices,
        )
        .with_context(|| format!("Failed to cost unit {}", unit.id))?;

        info!(
            "Unit {}: total capital investment {:.6} M$, total unit cost {:.6} M$",
            unit.id,
            costing.total_cap_investment.value(),
            costing.total_up_cost.value()
        );

        stream = balance.outlet.clone();
        units.push(CostedUnit {
            id: unit.id.clone(),
            inlet,
            outlet: balance.outlet,
            waste: balance.waste,
            costing,
        });
    }

    let system = SystemCosting::from_units(
        units.iter().map(|unit| (unit.inlet.flow, &unit.costing)),
        train.source_flow,
        stream.flow,
        &train.finance,
    );
    info!(
        "Treated water {:.3} m3/hr, LCOW {:.4} $/m3",
        system.treated_water.value(),
        system.lcow.value()
    );

    Ok(FlowsheetResults { units, system })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constituent::ConstituentMap;
    use crate::finance::FinancialParams;
    use crate::fixture::reference_data;
    use crate::technology::TechnologyParams;
    use crate::technology::chemical_addition::{ChemicalAdditionParams, ChemicalPreset};
    use crate::technology::holding_tank::HoldingTankParams;
    use crate::unit_process::UnitRaw;
    use crate::units::{Dose, FlowRate};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn train(reference: &ReferenceData) -> Train {
        let units = [
            UnitRaw {
                id: "anti_scalant".into(),
                dynamic: false,
                has_holdup: false,
                water_recovery: None,
                technology: TechnologyParams::ChemicalAddition(ChemicalAdditionParams {
                    chemical: ChemicalPreset::AntiScalant,
                    dose: None,
                }),
            },
            UnitRaw {
                id: "tank".into(),
                dynamic: false,
                has_holdup: false,
                water_recovery: Some(0.95),
                technology: TechnologyParams::HoldingTank(HoldingTankParams {
                    avg_storage_time: 2.0,
                    surge_cap: 0.2,
                }),
            },
        ]
        .into_iter()
        .map(|unit| unit.into_unit(reference).unwrap())
        .collect();

        let constituents: ConstituentMap =
            [("tds".into(), Dose(1.0))].into_iter().collect();
        let removal_factors = [(("tank".into(), "tds".into()), 0.5)].into_iter().collect();

        Train {
            analysis_year: 2020,
            source_flow: FlowRate(100.0),
            finance: FinancialParams::default(),
            units,
            constituents,
            removal_factors,
        }
    }

    #[rstest]
    fn test_run(reference_data: ReferenceData) {
        let train = train(&reference_data);
        let results = run(&train, &reference_data).unwrap();

        assert_eq!(results.units.len(), 2);

        // The anti-scalant unit keeps 99.999% of the flow; the tank keeps 95%
        let feed = &results.units[0];
        assert_approx_eq!(f64, feed.inlet.flow.value(), 100.0);
        assert_approx_eq!(f64, feed.outlet.flow.value(), 99.999, epsilon = 1e-9);

        let tank = &results.units[1];
        assert_approx_eq!(f64, tank.inlet.flow.value(), 99.999, epsilon = 1e-9);
        assert_approx_eq!(f64, tank.outlet.flow.value(), 99.999 * 0.95, epsilon = 1e-9);
        assert_approx_eq!(
            f64,
            results.system.treated_water.value(),
            99.999 * 0.95,
            epsilon = 1e-9
        );

        // Half the TDS mass is removed in the tank
        let outlet_tds = tank.outlet.concentrations.get("tds").unwrap();
        assert_approx_eq!(
            f64,
            outlet_tds.value() * tank.outlet.flow.value(),
            0.5 * 99.999,
            epsilon = 1e-9
        );

        // System totals are the sums over both units
        let expected_capital = feed.costing.total_cap_investment.value()
            + tank.costing.total_cap_investment.value();
        assert_approx_eq!(
            f64,
            results.system.capital_investment_total.value(),
            expected_capital
        );
        assert!(results.system.lcow.value() > 0.0);
    }

    #[rstest]
    fn test_run_missing_chemical_price(mut reference_data: ReferenceData) {
        reference_data.chemical_prices.shift_remove("Hydrazine_(N2H4)");
        let train = train(&reference_data);
        assert!(run(&train, &reference_data).is_err());
    }
}

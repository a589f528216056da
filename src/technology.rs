//! Unit-process technologies and their cost models.
//!
//! Each technology supplies the same three ingredients to the costing layer: an unadjusted
//! fixed capital investment, an electricity intensity and a chemical dictionary. Capital
//! cost curves are power laws regressed offline against reference data, except for UV/AOP
//! where the curve is fitted at build time (see [`uv_aop`]).
use crate::chemical::ChemicalID;
use crate::reference::ReferenceData;
use crate::units::{Dimensionless, Dose, ElectricityIntensity, FlowRate, Head, Money, Power};
use anyhow::Result;
use indexmap::IndexMap;
use serde::Deserialize;

pub mod chemical_addition;
pub mod holding_tank;
pub mod ion_exchange;
pub mod uv_aop;
pub mod water_pumping_station;

/// Total Plant Equipment Cost multiplier applied to base equipment costs
pub const TPEC: f64 = 3.4;

/// Total Indirect Cost multiplier applied to base equipment costs
pub const TIC: f64 = 1.65;

/// The chemicals dosed by a unit and their doses in kg/m³ of unit inlet flow
pub type ChemDict = IndexMap<ChemicalID, Dose>;

/// Pump power in kW for a given flow and lift height:
/// `0.746 * flow_gpm * lift_ft / (3960 * pump_eff * motor_eff)`.
pub(crate) fn pump_power(flow_gpm: f64, lift: Head, pump_eff: f64, motor_eff: f64) -> Power {
    Power(0.746 * flow_gpm * lift.value() / (3960.0 * pump_eff * motor_eff))
}

/// A unit-process cost model.
///
/// Implementations answer for a fixed inlet volumetric flow; the aggregation into a complete
/// annualized cost happens in [`crate::costing`].
pub trait CostModel {
    /// The basis year of the model's cost data
    fn basis_year(&self) -> u32;

    /// Unadjusted fixed capital investment in M$ for the given inlet flow
    fn fixed_cap(&self, flow_in: FlowRate) -> Money;

    /// Electricity intensity in kWh per m³ of inlet flow
    fn electricity(&self, flow_in: FlowRate) -> ElectricityIntensity;

    /// Chemical doses applied by the unit
    fn chem_dict(&self) -> &ChemDict;

    /// Water recovery to apply when the train file does not specify one
    fn default_water_recovery(&self) -> Dimensionless {
        Dimensionless(1.0)
    }
}

/// Technology-specific parameters for a unit, as they appear in the train file.
#[derive(PartialEq, Clone, Debug, Deserialize)]
#[serde(tag = "technology", rename_all = "snake_case")]
pub enum TechnologyParams {
    /// A chemical feed unit (see [`chemical_addition`])
    ChemicalAddition(chemical_addition::ChemicalAdditionParams),
    /// An ion exchange unit (see [`ion_exchange`])
    IonExchange(ion_exchange::IonExchangeParams),
    /// A UV disinfection unit with optional oxidant feed (see [`uv_aop`])
    UvAop(uv_aop::UvAopParams),
    /// A raw or treated water pumping station (see [`water_pumping_station`])
    WaterPumpingStation(water_pumping_station::WaterPumpingStationParams),
    /// A storage tank (see [`holding_tank`])
    HoldingTank(holding_tank::HoldingTankParams),
}

impl TechnologyParams {
    /// Build the cost model for this technology, resolving any coefficients that come from
    /// the reference data tables.
    pub fn build(&self, reference: &ReferenceData) -> Result<Box<dyn CostModel>> {
        let model: Box<dyn CostModel> = match self {
            TechnologyParams::ChemicalAddition(params) => {
                Box::new(chemical_addition::ChemicalAddition::new(params)?)
            }
            TechnologyParams::IonExchange(params) => Box::new(ion_exchange::IonExchange::new(
                params,
                &reference.ion_exchange_curves,
            )?),
            TechnologyParams::UvAop(params) => {
                Box::new(uv_aop::UvAop::new(params, &reference.uv_cost_grid)?)
            }
            TechnologyParams::WaterPumpingStation(params) => {
                Box::new(water_pumping_station::WaterPumpingStation::new(params))
            }
            TechnologyParams::HoldingTank(params) => {
                Box::new(holding_tank::HoldingTank::new(params)?)
            }
        };

        Ok(model)
    }
}

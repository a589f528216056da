//! Assembly of unit cost models into complete annualized costs.
//!
//! [`complete_costing`] takes what a technology's cost model reports for a fixed inlet flow
//! and layers on the cost-index adjustment, land and working capital, chemical and
//! electricity operating costs and the capital-derived fixed operating costs.
//! [`SystemCosting`] aggregates the per-unit results into train-level totals and the
//! levelized cost of water.
use crate::chemical::ChemicalPrices;
use crate::finance::{CostIndexTable, FinancialParams};
use crate::technology::CostModel;
use crate::units::{Dimensionless, ElectricityIntensity, FlowRate, Money, MoneyPerVolume,
    MoneyPerYear};
use anyhow::{Context, Result};

/// The complete costing of a single unit.
///
/// Capital quantities are in M$ at the analysis year; operating quantities in M$/yr.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCosting {
    /// The basis year of the unit's cost data
    pub basis_year: u32,
    /// Unadjusted fixed capital investment (M$ at the basis year)
    pub fixed_cap_inv_unadjusted: Money,
    /// Electricity intensity in kWh/m³ of unit inlet flow
    pub electricity: ElectricityIntensity,
    /// Fixed capital investment escalated to the analysis year
    pub fixed_cap_inv: Money,
    /// Land cost
    pub land_cost: Money,
    /// Working capital
    pub working_cap: Money,
    /// Total capital investment
    pub total_cap_investment: Money,
    /// Catalyst and chemical cost
    pub cat_and_chem_cost: MoneyPerYear,
    /// Electricity cost
    pub electricity_cost: MoneyPerYear,
    /// Other variable operating costs
    pub other_var_cost: MoneyPerYear,
    /// Salaries
    pub salaries: MoneyPerYear,
    /// Employee benefits
    pub benefits: MoneyPerYear,
    /// Maintenance costs
    pub maintenance: MoneyPerYear,
    /// Laboratory fees
    pub lab: MoneyPerYear,
    /// Insurance and taxes
    pub insurance_taxes: MoneyPerYear,
    /// Total fixed operating cost
    pub total_fixed_op_cost: MoneyPerYear,
    /// Total unit cost: total capital investment plus one year of operating costs
    pub total_up_cost: Money,
}

/// Calculate the complete costing for one unit.
///
/// # Arguments
///
/// * `model` - The unit's cost model
/// * `flow_in` - The unit's inlet flow
/// * `analysis_year` - The year to which all costs are escalated
/// * `params` - System-level financial parameters
/// * `indices` - The plant cost index table
/// * `prices` - The chemical price table
pub fn complete_costing(
    model: &dyn CostModel,
    flow_in: FlowRate,
    analysis_year: u32,
    params: &FinancialParams,
    indices: &CostIndexTable,
    prices: &ChemicalPrices,
) -> Result<UnitCosting> {
    let factors = indices.factors(model.basis_year(), analysis_year)?;

    let fixed_cap_inv_unadjusted = model.fixed_cap(flow_in);
    let electricity = model.electricity(flow_in);

    let fixed_cap_inv = fixed_cap_inv_unadjusted * factors.capital;
    let land_cost = fixed_cap_inv * Dimensionless(params.land_cost_percent_fci);
    let working_cap = fixed_cap_inv * Dimensionless(params.working_cap_percent_fci);
    let total_cap_investment = fixed_cap_inv + land_cost + working_cap;

    let flow_m3yr = flow_in.cubic_metres_per_year();
    let mut chem_cost_sum = 0.0;
    for (chemical_id, dose) in model.chem_dict() {
        let price = prices
            .get(chemical_id)
            .with_context(|| format!("No price available for chemical {chemical_id}"))?;
        chem_cost_sum += flow_m3yr
            * price.value()
            * factors.cat_chem.0
            * dose.value()
            * params.plant_cap_utilization
            * 1e-6;
    }
    let cat_and_chem_cost = MoneyPerYear(chem_cost_sum);

    let electricity_cost =
        MoneyPerYear(electricity.value() * flow_m3yr * params.electricity_price * 1e-6);
    let other_var_cost = MoneyPerYear(0.0);

    let salaries = MoneyPerYear(
        factors.labor.0 * fixed_cap_inv_unadjusted.value() * params.salaries_percent_fci,
    );
    let benefits = salaries * Dimensionless(params.benefit_percent_of_salary);
    let maintenance =
        MoneyPerYear(fixed_cap_inv.value() * params.maintenance_costs_percent_fci);
    let lab = MoneyPerYear(fixed_cap_inv.value() * params.lab_fees_percent_fci);
    let insurance_taxes =
        MoneyPerYear(fixed_cap_inv.value() * params.insurance_taxes_percent_fci);
    let total_fixed_op_cost = salaries + benefits + maintenance + lab + insurance_taxes;

    let total_up_cost = Money(
        total_cap_investment.value()
            + cat_and_chem_cost.value()
            + electricity_cost.value()
            + other_var_cost.value()
            + total_fixed_op_cost.value(),
    );

    Ok(UnitCosting {
        basis_year: model.basis_year(),
        fixed_cap_inv_unadjusted,
        electricity,
        fixed_cap_inv,
        land_cost,
        working_cap,
        total_cap_investment,
        cat_and_chem_cost,
        electricity_cost,
        other_var_cost,
        salaries,
        benefits,
        maintenance,
        lab,
        insurance_taxes,
        total_fixed_op_cost,
        total_up_cost,
    })
}

/// Train-level cost totals and the levelized cost of water.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemCosting {
    /// Sum of total capital investment across units
    pub capital_investment_total: Money,
    /// Sum of catalyst and chemical costs across units
    pub cat_and_chem_cost_total: MoneyPerYear,
    /// Sum of electricity costs across units
    pub electricity_cost_total: MoneyPerYear,
    /// Sum of other variable costs across units
    pub other_var_cost_total: MoneyPerYear,
    /// Sum of fixed operating costs across units
    pub fixed_op_cost_total: MoneyPerYear,
    /// Total annual operating cost
    pub operating_cost_total: MoneyPerYear,
    /// Electricity intensity per m³ of source water
    pub electricity_intensity: ElectricityIntensity,
    /// The treated water flow leaving the train
    pub treated_water: FlowRate,
    /// Levelized cost of water in $/m³ of treated water
    pub lcow: MoneyPerVolume,
}

impl SystemCosting {
    /// Aggregate per-unit costings into train-level totals.
    ///
    /// # Arguments
    ///
    /// * `units` - Each unit's inlet flow and complete costing
    /// * `source_flow` - The train's source water flow
    /// * `treated_water` - The treated water flow leaving the train
    /// * `params` - System-level financial parameters
    pub fn from_units<'a, I>(
        units: I,
        source_flow: FlowRate,
        treated_water: FlowRate,
        params: &FinancialParams,
    ) -> SystemCosting
    where
        I: IntoIterator<Item = (FlowRate, &'a UnitCosting)>,
    {
        let mut capital_total = 0.0;
        let mut cat_chem_total = 0.0;
        let mut electricity_cost_total = 0.0;
        let mut other_var_total = 0.0;
        let mut fixed_op_total = 0.0;
        let mut electricity_flow_sum = 0.0;
        for (flow_in, costing) in units {
            capital_total += costing.total_cap_investment.value();
            cat_chem_total += costing.cat_and_chem_cost.value();
            electricity_cost_total += costing.electricity_cost.value();
            other_var_total += costing.other_var_cost.value();
            fixed_op_total += costing.total_fixed_op_cost.value();
            electricity_flow_sum += costing.electricity.value() * flow_in.value();
        }

        let operating_cost_total =
            cat_chem_total + electricity_cost_total + other_var_total + fixed_op_total;
        let electricity_intensity =
            ElectricityIntensity(electricity_flow_sum / source_flow.value());

        let crf = params.capital_recovery_factor();
        let treated_m3yr =
            treated_water.cubic_metres_per_year() * params.plant_cap_utilization;
        let lcow =
            MoneyPerVolume((capital_total * crf.0 + operating_cost_total) * 1e6 / treated_m3yr);

        SystemCosting {
            capital_investment_total: Money(capital_total),
            cat_and_chem_cost_total: MoneyPerYear(cat_chem_total),
            electricity_cost_total: MoneyPerYear(electricity_cost_total),
            other_var_cost_total: MoneyPerYear(other_var_total),
            fixed_op_cost_total: MoneyPerYear(fixed_op_total),
            operating_cost_total: MoneyPerYear(operating_cost_total),
            electricity_intensity,
            treated_water,
            lcow,
        }
    }
}

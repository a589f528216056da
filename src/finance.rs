//! General functions related to finance: cost-index escalation and capital recovery.
use crate::input::{input_err_msg, read_csv};
use crate::regression::linear_fit;
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// The file name of the plant cost indices reference table
const COST_INDICES_FILE_NAME: &str = "plant_cost_indices.csv";

/// The last year to which tabulated cost indices are extended by regression
pub const LAST_YEAR_FOR_COST_INDICES: u32 = 2050;

/// Calculates the capital recovery factor (CRF) for a given lifetime and discount rate.
///
/// The CRF is used to annualize capital costs over the lifetime of the plant.
pub fn capital_recovery_factor(lifetime: u32, discount_rate: Dimensionless) -> Dimensionless {
    if lifetime == 0 {
        return Dimensionless(0.0);
    }
    if discount_rate == Dimensionless(0.0) {
        return Dimensionless(1.0) / Dimensionless(lifetime as f64);
    }
    let factor = (Dimensionless(1.0) + discount_rate).powi(lifetime as i32);
    (discount_rate * factor) / (factor - Dimensionless(1.0))
}

/// Plant cost indices for a single year
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CostIndices {
    /// Capital equipment cost index
    pub capital: f64,
    /// Catalysts and chemicals cost index
    pub cat_chem: f64,
    /// Labor cost index
    pub labor: f64,
    /// Consumer price index
    pub cpi: f64,
}

/// Cost-index factors converting basis-year costs to analysis-year costs.
///
/// Each factor is the ratio of the analysis-year index to the basis-year index.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CostFactors {
    /// Factor applied to capital costs
    pub capital: Dimensionless,
    /// Factor applied to catalyst and chemical costs
    pub cat_chem: Dimensionless,
    /// Factor applied to labor costs
    pub labor: Dimensionless,
    /// Consumer price index factor
    pub cpi: Dimensionless,
}

/// Represents a single row of the plant cost indices CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct CostIndexRaw {
    year: u32,
    capital: f64,
    cat_chem: f64,
    labor: f64,
    cpi: f64,
}

impl CostIndexRaw {
    fn into_indices(self) -> (u32, CostIndices) {
        (
            self.year,
            CostIndices {
                capital: self.capital,
                cat_chem: self.cat_chem,
                labor: self.labor,
                cpi: self.cpi,
            },
        )
    }
}

/// Tabulated plant cost indices, extended to [`LAST_YEAR_FOR_COST_INDICES`] by linear
/// regression of each index against year.
#[derive(Debug, Clone)]
pub struct CostIndexTable {
    rows: BTreeMap<u32, CostIndices>,
}

impl CostIndexTable {
    /// Create a table from (year, indices) pairs, extending it to
    /// [`LAST_YEAR_FOR_COST_INDICES`] by regression.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two years are given, a year appears twice or an
    /// index is not positive.
    pub fn from_indices<I>(iter: I) -> Result<CostIndexTable>
    where
        I: IntoIterator<Item = (u32, CostIndices)>,
    {
        let mut rows = BTreeMap::new();
        for (year, indices) in iter {
            ensure!(
                indices.capital > 0.0
                    && indices.cat_chem > 0.0
                    && indices.labor > 0.0
                    && indices.cpi > 0.0,
                "Cost indices for year {year} must be positive"
            );
            ensure!(
                rows.insert(year, indices).is_none(),
                "More than one row of cost indices provided for year {year}"
            );
        }
        ensure!(
            rows.len() >= 2,
            "At least two years of cost indices are required for extension by regression"
        );

        extend_cost_indices(&mut rows)?;

        Ok(CostIndexTable { rows })
    }

    /// Look up the indices for a given year.
    fn get(&self, year: u32) -> Result<&CostIndices> {
        self.rows
            .get(&year)
            .with_context(|| format!("No cost indices available for year {year}"))
    }

    /// Calculate the cost factors for converting costs from a basis year to an analysis year.
    pub fn factors(&self, basis_year: u32, analysis_year: u32) -> Result<CostFactors> {
        let basis = self.get(basis_year)?;
        let analysis = self.get(analysis_year)?;

        Ok(CostFactors {
            capital: Dimensionless(analysis.capital / basis.capital),
            cat_chem: Dimensionless(analysis.cat_chem / basis.cat_chem),
            labor: Dimensionless(analysis.labor / basis.labor),
            cpi: Dimensionless(analysis.cpi / basis.cpi),
        })
    }
}

/// Read the plant cost indices from the specified data directory.
///
/// # Arguments
///
/// * `data_dir` - Folder containing the reference data tables
pub fn read_cost_indices(data_dir: &Path) -> Result<CostIndexTable> {
    let file_path = data_dir.join(COST_INDICES_FILE_NAME);
    let iter = read_csv::<CostIndexRaw>(&file_path)?;
    read_cost_indices_from_iter(iter).with_context(|| input_err_msg(&file_path))
}

fn read_cost_indices_from_iter<I>(iter: I) -> Result<CostIndexTable>
where
    I: Iterator<Item = CostIndexRaw>,
{
    CostIndexTable::from_indices(iter.map(CostIndexRaw::into_indices))
}

/// Extend the tabulated indices to [`LAST_YEAR_FOR_COST_INDICES`] with one linear fit per
/// index column.
fn extend_cost_indices(rows: &mut BTreeMap<u32, CostIndices>) -> Result<()> {
    let fit_column = |points: Vec<(f64, f64)>| linear_fit(&points);

    let capital = fit_column(
        rows.iter()
            .map(|(year, indices)| (*year as f64, indices.capital))
            .collect_vec(),
    )?;
    let cat_chem = fit_column(
        rows.iter()
            .map(|(year, indices)| (*year as f64, indices.cat_chem))
            .collect_vec(),
    )?;
    let labor = fit_column(
        rows.iter()
            .map(|(year, indices)| (*year as f64, indices.labor))
            .collect_vec(),
    )?;
    let cpi = fit_column(
        rows.iter()
            .map(|(year, indices)| (*year as f64, indices.cpi))
            .collect_vec(),
    )?;

    let last_tabulated = *rows.last_key_value().expect("rows is non-empty").0;
    for year in (last_tabulated + 1)..=LAST_YEAR_FOR_COST_INDICES {
        rows.insert(
            year,
            CostIndices {
                capital: capital.predict(year as f64),
                cat_chem: cat_chem.predict(year as f64),
                labor: labor.predict(year as f64),
                cpi: cpi.predict(year as f64),
            },
        );
    }

    Ok(())
}

/// System-level financial parameters, with the standard WT3 defaults.
///
/// Every field can be overridden from the `[finance]` section of the train file.
#[derive(PartialEq, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FinancialParams {
    /// Electricity price in $/kWh
    pub electricity_price: f64,
    /// Fraction of the year the plant is on stream
    pub plant_cap_utilization: f64,
    /// Land cost as a fraction of FCI
    pub land_cost_percent_fci: f64,
    /// Working capital as a fraction of FCI
    pub working_cap_percent_fci: f64,
    /// Base employee salaries as a fraction of unadjusted FCI
    pub salaries_percent_fci: f64,
    /// Employee benefits as a fraction of salaries
    pub benefit_percent_of_salary: f64,
    /// Maintenance costs as a fraction of FCI
    pub maintenance_costs_percent_fci: f64,
    /// Laboratory fees as a fraction of FCI
    pub lab_fees_percent_fci: f64,
    /// Insurance and taxes as a fraction of FCI
    pub insurance_taxes_percent_fci: f64,
    /// Weighted average cost of capital, used as the discount rate for the CRF
    pub wacc: f64,
    /// Plant lifetime in years
    pub plant_lifetime_yrs: u32,
}

impl Default for FinancialParams {
    fn default() -> Self {
        FinancialParams {
            electricity_price: 0.0595,
            plant_cap_utilization: 1.0,
            land_cost_percent_fci: 0.0015,
            working_cap_percent_fci: 0.008,
            salaries_percent_fci: 0.001,
            benefit_percent_of_salary: 0.9,
            maintenance_costs_percent_fci: 0.008,
            lab_fees_percent_fci: 0.003,
            insurance_taxes_percent_fci: 0.002,
            wacc: 0.05,
            plant_lifetime_yrs: 30,
        }
    }
}

impl FinancialParams {
    /// Validates the financial parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if any fraction lies outside [0, 1] or the electricity price is
    /// negative.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.electricity_price >= 0.0,
            "Electricity price must not be negative"
        );

        let fractions = [
            ("plant_cap_utilization", self.plant_cap_utilization),
            ("land_cost_percent_fci", self.land_cost_percent_fci),
            ("working_cap_percent_fci", self.working_cap_percent_fci),
            ("salaries_percent_fci", self.salaries_percent_fci),
            ("benefit_percent_of_salary", self.benefit_percent_of_salary),
            (
                "maintenance_costs_percent_fci",
                self.maintenance_costs_percent_fci,
            ),
            ("lab_fees_percent_fci", self.lab_fees_percent_fci),
            ("insurance_taxes_percent_fci", self.insurance_taxes_percent_fci),
            ("wacc", self.wacc),
        ];
        for (name, value) in fractions {
            ensure!(
                (0.0..=1.0).contains(&value),
                "Financial parameter {name} must be between 0 and 1"
            );
        }

        Ok(())
    }

    /// The capital recovery factor implied by the WACC and plant lifetime.
    pub fn capital_recovery_factor(&self) -> Dimensionless {
        capital_recovery_factor(self.plant_lifetime_yrs, Dimensionless(self.wacc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.05, 0.0)] // Edge case: lifetime==0
    #[case(10, 0.0, 0.1)] // Other edge case: discount_rate==0
    #[case(10, 0.05, 0.1295045749654567)]
    #[case(30, 0.05, 0.06505143508027656)]
    fn test_capital_recovery_factor(
        #[case] lifetime: u32,
        #[case] discount_rate: f64,
        #[case] expected: f64,
    ) {
        let result = capital_recovery_factor(lifetime, Dimensionless(discount_rate));
        assert_approx_eq!(f64, result.0, expected, epsilon = 1e-10);
    }

    fn index_raw(year: u32, base: f64) -> CostIndexRaw {
        CostIndexRaw {
            year,
            capital: base,
            cat_chem: base + 10.0,
            labor: base + 20.0,
            cpi: base + 30.0,
        }
    }

    #[test]
    fn test_cost_index_factors() {
        // Indices grow by exactly 2 per year, so the regression extension is exact
        let raw = (2015..=2020).map(|year| index_raw(year, 100.0 + 2.0 * (year - 2015) as f64));
        let table = read_cost_indices_from_iter(raw).unwrap();

        let factors = table.factors(2015, 2019).unwrap();
        assert_approx_eq!(f64, factors.capital.0, 108.0 / 100.0);
        assert_approx_eq!(f64, factors.cat_chem.0, 118.0 / 110.0);
        assert_approx_eq!(f64, factors.labor.0, 128.0 / 120.0);
        assert_approx_eq!(f64, factors.cpi.0, 138.0 / 130.0);

        // Same year gives unity factors
        let factors = table.factors(2018, 2018).unwrap();
        assert_approx_eq!(f64, factors.capital.0, 1.0);

        // Analysis year beyond the tabulated range uses the regression extension
        let factors = table.factors(2020, 2025).unwrap();
        assert_approx_eq!(f64, factors.capital.0, 120.0 / 110.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cost_index_factors_bad_year() {
        let raw = (2015..=2020).map(|year| index_raw(year, 100.0));
        let table = read_cost_indices_from_iter(raw).unwrap();
        assert!(table.factors(2014, 2020).is_err());
        assert!(table.factors(2015, LAST_YEAR_FOR_COST_INDICES + 1).is_err());
    }

    #[test]
    fn test_read_cost_indices_from_iter_bad_input() {
        // Duplicate year
        let raw = [index_raw(2015, 100.0), index_raw(2015, 102.0)];
        assert!(read_cost_indices_from_iter(raw.into_iter()).is_err());

        // Single row cannot be extended
        let raw = [index_raw(2015, 100.0)];
        assert!(read_cost_indices_from_iter(raw.into_iter()).is_err());

        // Non-positive index
        let raw = [index_raw(2015, 0.0), index_raw(2016, 100.0)];
        assert!(read_cost_indices_from_iter(raw.into_iter()).is_err());
    }

    #[test]
    fn test_financial_params_validate() {
        assert!(FinancialParams::default().validate().is_ok());

        let params = FinancialParams {
            wacc: 1.5,
            ..FinancialParams::default()
        };
        assert!(params.validate().is_err());

        let params = FinancialParams {
            electricity_price: -0.1,
            ..FinancialParams::default()
        };
        assert!(params.validate().is_err());
    }
}

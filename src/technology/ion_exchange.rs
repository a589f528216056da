//! Ion exchange units costed from the cost-curve reference table.
//!
//! The capital and electricity curve coefficients depend on the feed salinity: the table
//! row with the smallest tabulated TDS at or above the unit's `tds_in` applies. Each row
//! also carries the regenerant chemical and its dose.
use super::{ChemDict, CostModel, TPEC};
use crate::chemical::ChemicalID;
use crate::input::{input_err_msg, read_csv};
use crate::units::{Dose, ElectricityIntensity, FlowRate, Money};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const BASIS_YEAR: u32 = 2017;

/// The file name of the ion exchange cost curves reference table
const COST_CURVES_FILE_NAME: &str = "ion_exchange_cost_curves.csv";

/// One row of the ion exchange cost-curve table
#[derive(PartialEq, Clone, Debug, Deserialize)]
pub struct IonExchangeCurve {
    /// Upper bound of the feed TDS range this row covers, in mg/L
    pub tds: f64,
    /// Capital curve multiplier (m³/hr flow basis, dollars)
    pub cap_a: f64,
    /// Capital curve exponent
    pub cap_b: f64,
    /// Electricity curve multiplier (kWh/m³)
    pub elect_a: f64,
    /// Electricity curve exponent
    pub elect_b: f64,
    /// The regenerant chemical
    pub chemical_id: String,
    /// Regenerant dose in kg/m³
    pub dose: f64,
}

/// The ion exchange cost-curve table, sorted by ascending TDS
#[derive(Debug, Clone)]
pub struct IonExchangeCostCurves {
    rows: Vec<IonExchangeCurve>,
}

impl IonExchangeCostCurves {
    /// Create a table from tabulated curves, sorting them by TDS.
    ///
    /// # Errors
    ///
    /// Returns an error if a TDS value appears twice or a curve is invalid.
    pub fn from_curves<I>(iter: I) -> Result<IonExchangeCostCurves>
    where
        I: IntoIterator<Item = IonExchangeCurve>,
    {
        let mut rows: Vec<_> = iter.into_iter().collect();
        for row in &rows {
            ensure!(
                row.tds > 0.0 && row.cap_a > 0.0 && row.elect_a >= 0.0 && row.dose >= 0.0,
                "Invalid ion exchange cost curve for TDS {} mg/L",
                row.tds
            );
        }
        rows.sort_by(|a, b| a.tds.total_cmp(&b.tds));
        ensure!(
            rows.windows(2).all(|pair| pair[0].tds < pair[1].tds),
            "More than one ion exchange cost curve provided for the same TDS"
        );

        Ok(IonExchangeCostCurves { rows })
    }

    /// Select the curve covering the given feed TDS.
    fn select(&self, tds_in: f64) -> Result<&IonExchangeCurve> {
        self.rows
            .iter()
            .find(|row| row.tds >= tds_in)
            .with_context(|| {
                format!("No ion exchange cost curve available for TDS {tds_in} mg/L")
            })
    }
}

/// Read the ion exchange cost curves from the specified data directory.
///
/// # Arguments
///
/// * `data_dir` - Folder containing the reference data tables
pub fn read_ion_exchange_cost_curves(data_dir: &Path) -> Result<IonExchangeCostCurves> {
    let file_path = data_dir.join(COST_CURVES_FILE_NAME);
    let iter = read_csv::<IonExchangeCurve>(&file_path)?;
    IonExchangeCostCurves::from_curves(iter).with_context(|| input_err_msg(&file_path))
}

/// Parameters for an ion exchange unit, as they appear in the train file
#[derive(PartialEq, Clone, Debug, Deserialize)]
pub struct IonExchangeParams {
    /// Feed TDS in mg/L
    pub tds_in: f64,
}

/// Cost model for an ion exchange unit
pub struct IonExchange {
    curve: IonExchangeCurve,
    chem_dict: ChemDict,
}

impl IonExchange {
    /// Create the cost model for the given parameters, resolving the curve coefficients
    /// from the reference table.
    pub fn new(params: &IonExchangeParams, curves: &IonExchangeCostCurves) -> Result<Self> {
        let curve = curves.select(params.tds_in)?.clone();
        let chem_dict = [(ChemicalID::new(&curve.chemical_id), Dose(curve.dose))]
            .into_iter()
            .collect();

        Ok(IonExchange { curve, chem_dict })
    }
}

impl CostModel for IonExchange {
    fn basis_year(&self) -> u32 {
        BASIS_YEAR
    }

    fn fixed_cap(&self, flow_in: FlowRate) -> Money {
        let source_cost = self.curve.cap_a * flow_in.value().powf(self.curve.cap_b);
        Money(source_cost * TPEC * 1e-6)
    }

    fn electricity(&self, flow_in: FlowRate) -> ElectricityIntensity {
        ElectricityIntensity(self.curve.elect_a * flow_in.value().powf(self.curve.elect_b))
    }

    fn chem_dict(&self) -> &ChemDict {
        &self.chem_dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn curve(tds: f64) -> IonExchangeCurve {
        IonExchangeCurve {
            tds,
            cap_a: 1603.2,
            cap_b: 0.7396,
            elect_a: 0.083,
            elect_b: 0.0418,
            chemical_id: "Sulfuric_Acid_(H2SO4)".to_string(),
            dose: 0.0042,
        }
    }

    fn curves() -> IonExchangeCostCurves {
        IonExchangeCostCurves::from_curves([curve(1000.0), curve(5000.0), curve(10000.0)])
            .unwrap()
    }

    #[test]
    fn test_select() {
        let curves = curves();
        assert_approx_eq!(f64, curves.select(500.0).unwrap().tds, 1000.0);
        assert_approx_eq!(f64, curves.select(1000.0).unwrap().tds, 1000.0);
        assert_approx_eq!(f64, curves.select(3000.0).unwrap().tds, 5000.0);
        assert!(curves.select(20000.0).is_err());
    }

    #[test]
    fn test_fixed_cap_and_electricity() {
        let model = IonExchange::new(&IonExchangeParams { tds_in: 800.0 }, &curves()).unwrap();
        assert_eq!(model.basis_year(), 2017);

        let cap = model.fixed_cap(FlowRate(100.0));
        assert_approx_eq!(f64, cap.value(), 0.164_311, epsilon = 1e-4);

        let intensity = model.electricity(FlowRate(100.0));
        assert_approx_eq!(f64, intensity.value(), 0.100_619, epsilon = 1e-5);

        assert_eq!(
            model.chem_dict().get("Sulfuric_Acid_(H2SO4)"),
            Some(&Dose(0.0042))
        );
    }

    #[test]
    fn test_from_curves_bad_duplicate() {
        assert!(IonExchangeCostCurves::from_curves([curve(1000.0), curve(1000.0)]).is_err());
    }
}

//! UV disinfection with optional advanced oxidation (oxidant feed).
//!
//! The UV capital curve is not tabulated directly against flow: the reference grid gives
//! cost by flow, UV dose and UV transmittance. At build time the cost points for the unit's
//! dose and transmittance are extracted and fitted with a power law, which is then
//! evaluated at the unit's flow (Mgal/day basis). The fit is in log space, so the curve
//! passes through the origin without an explicit anchor point.
use super::{ChemDict, CostModel};
use crate::chemical::ChemicalID;
use crate::input::{input_err_msg, read_csv};
use crate::regression::{PowerFit, power_fit};
use crate::units::{Dose, ElectricityIntensity, FlowRate, Money};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;

const BASIS_YEAR: u32 = 2014;

/// The file name of the UV cost interpolation grid
const UV_COST_FILE_NAME: &str = "uv_cost_interp.csv";

/// The flows (Mgal/day) at which the reference grid tabulates UV costs
const UV_FLOW_LIST: [f64; 5] = [1.0, 3.0, 5.0, 10.0, 25.0];

/// Oxidant feed capital curve: `base * lb_day ^ exponent` in $1000s
const OXIDANT_BASE_CAP: f64 = 1228.0;
const OXIDANT_CAP_EXPONENT: f64 = 0.2277;

/// UV electricity intensity in kWh/m³
const UV_ELECTRICITY: f64 = 0.1;

const DEFAULT_UVT_IN: f64 = 0.9;
const DEFAULT_UV_DOSE: f64 = 100.0;

/// Tolerance for matching dose/transmittance grid coordinates
const GRID_MATCH_TOLERANCE: f64 = 1e-9;

/// One point of the UV cost grid
#[derive(PartialEq, Clone, Debug, Deserialize)]
pub struct UvCostPoint {
    /// Flow in Mgal/day
    pub flow: f64,
    /// UV dose in mJ/cm²
    pub dose: f64,
    /// UV transmittance as a fraction
    pub uvt: f64,
    /// Cost in $1000s
    pub cost: f64,
}

/// The UV cost grid: cost by flow, UV dose and UV transmittance
#[derive(Debug, Clone)]
pub struct UvCostGrid {
    points: Vec<UvCostPoint>,
}

impl UvCostGrid {
    /// Create a grid from tabulated points.
    ///
    /// # Errors
    ///
    /// Returns an error if any cost is not positive.
    pub fn from_points<I>(points: I) -> Result<UvCostGrid>
    where
        I: IntoIterator<Item = UvCostPoint>,
    {
        let points = points.into_iter().collect_vec();
        for point in &points {
            ensure!(
                point.cost > 0.0,
                "UV cost for flow {} Mgal/day must be positive",
                point.flow
            );
        }

        Ok(UvCostGrid { points })
    }

    /// Extract the (flow, cost) samples for the given dose and transmittance.
    fn cost_points(&self, uv_dose: f64, uvt_in: f64) -> Result<Vec<(f64, f64)>> {
        let mut points = Vec::with_capacity(UV_FLOW_LIST.len());
        for flow in UV_FLOW_LIST {
            let matches = |a: f64, b: f64| (a - b).abs() < GRID_MATCH_TOLERANCE;
            let point = self
                .points
                .iter()
                .find(|point| {
                    matches(point.flow, flow)
                        && matches(point.dose, uv_dose)
                        && matches(point.uvt, uvt_in)
                })
                .with_context(|| {
                    format!(
                        "No UV cost available for flow {flow} Mgal/day, dose {uv_dose} and \
                         transmittance {uvt_in}"
                    )
                })?;
            points.push((flow, point.cost));
        }

        Ok(points)
    }
}

/// Read the UV cost grid from the specified data directory.
///
/// # Arguments
///
/// * `data_dir` - Folder containing the reference data tables
pub fn read_uv_cost_grid(data_dir: &Path) -> Result<UvCostGrid> {
    let file_path = data_dir.join(UV_COST_FILE_NAME);
    let points = read_csv::<UvCostPoint>(&file_path)?;
    UvCostGrid::from_points(points).with_context(|| input_err_msg(&file_path))
}

/// The oxidant feed of an AOP unit
struct OxidantFeed {
    dose: Dose,
}

/// Parameters for a UV/AOP unit, as they appear in the train file
#[derive(PartialEq, Clone, Debug, Deserialize)]
pub struct UvAopParams {
    /// UV transmittance of the feed, defaulting to 0.9
    pub uvt_in: Option<f64>,
    /// UV dose in mJ/cm², defaulting to 100
    pub uv_dose: Option<f64>,
    /// Whether an oxidant feed is included
    pub aop: bool,
    /// Oxidant dose in mg/L; required when `aop` is true
    pub dose: Option<f64>,
    /// The oxidant chemical; required when `aop` is true
    pub chemical_name: Option<String>,
}

/// Cost model for a UV/AOP unit
pub struct UvAop {
    fit: PowerFit,
    oxidant: Option<OxidantFeed>,
    chem_dict: ChemDict,
}

impl UvAop {
    /// Create the cost model for the given parameters, fitting the capital curve to the
    /// reference grid.
    pub fn new(params: &UvAopParams, grid: &UvCostGrid) -> Result<Self> {
        let uvt_in = params.uvt_in.unwrap_or(DEFAULT_UVT_IN);
        let uv_dose = params.uv_dose.unwrap_or(DEFAULT_UV_DOSE);
        let points = grid.cost_points(uv_dose, uvt_in)?;
        let fit = power_fit(&points)?;

        let (oxidant, chem_dict) = if params.aop {
            let dose = params
                .dose
                .context("An oxidant dose must be provided when aop is true")?;
            let chemical_name = params
                .chemical_name
                .as_deref()
                .context("An oxidant chemical must be provided when aop is true")?;
            let dose = Dose::from_mg_per_litre(dose);
            let chem_dict = [(ChemicalID::new(chemical_name), dose)].into_iter().collect();
            (Some(OxidantFeed { dose }), chem_dict)
        } else {
            (None, ChemDict::new())
        };

        Ok(UvAop {
            fit,
            oxidant,
            chem_dict,
        })
    }
}

impl CostModel for UvAop {
    fn basis_year(&self) -> u32 {
        BASIS_YEAR
    }

    fn fixed_cap(&self, flow_in: FlowRate) -> Money {
        let uv_cap = self.fit.predict(flow_in.million_gallons_per_day()) * 1e-3;

        let oxidant_cap = self.oxidant.as_ref().map_or(0.0, |oxidant| {
            let solution_lb_day = (flow_in * oxidant.dose).pounds_per_day();
            OXIDANT_BASE_CAP * solution_lb_day.powf(OXIDANT_CAP_EXPONENT) * 1e-3
        });

        Money(uv_cap + oxidant_cap)
    }

    fn electricity(&self, _flow_in: FlowRate) -> ElectricityIntensity {
        ElectricityIntensity(UV_ELECTRICITY)
    }

    fn chem_dict(&self) -> &ChemDict {
        &self.chem_dict
    }
}

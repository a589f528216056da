//! The module responsible for writing output data to disk.
use crate::constituent::ConstituentID;
use crate::costing::SystemCosting;
use crate::flowsheet::{CostedUnit, FlowsheetResults};
use crate::stream::Stream;
use crate::unit_process::UnitID;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The root folder in which train-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "wt3_results";

/// The output file name for per-unit costs
const UNIT_COSTS_FILE_NAME: &str = "unit_costs.csv";

/// The output file name for the system costing
const SYSTEM_COSTS_FILE_NAME: &str = "system_costs.csv";

/// The output file name for stream flows
const STREAMS_FILE_NAME: &str = "streams.csv";

/// The output file name for stream constituent concentrations
const STREAM_QUALITY_FILE_NAME: &str = "stream_quality.csv";

/// Get the output directory for the train specified at `train_dir`
pub fn get_output_dir(train_dir: &Path) -> Result<PathBuf> {
    // Get the train name from the dir path. This ends up being convoluted because we need
    // to check for all possible errors. Ugh.
    let train_dir = train_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to train")?;

    let train_name = train_dir
        .file_name()
        .context("Train cannot be in root folder")?
        .to_str()
        .context("Invalid chars in train dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, train_name].iter().collect())
}

/// Create a new output directory for the train specified at `train_dir`.
pub fn create_output_directory(output_dir: &Path) -> Result<()> {
    if output_dir.is_dir() {
        // already exists
        return Ok(());
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(())
}

/// Represents a row in the unit costs CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct UnitCostRow {
    unit_id: UnitID,
    basis_year: u32,
    inlet_flow: f64,
    fixed_cap_inv_unadjusted: f64,
    electricity: f64,
    fixed_cap_inv: f64,
    land_cost: f64,
    working_cap: f64,
    total_cap_investment: f64,
    cat_and_chem_cost: f64,
    electricity_cost: f64,
    other_var_cost: f64,
    salaries: f64,
    benefits: f64,
    maintenance: f64,
    lab: f64,
    insurance_taxes: f64,
    total_fixed_op_cost: f64,
    total_up_cost: f64,
}

impl UnitCostRow {
    /// Create a new [`UnitCostRow`]
    fn new(unit: &CostedUnit) -> Self {
        let costing = &unit.costing;
        Self {
            unit_id: unit.id.clone(),
            basis_year: costing.basis_year,
            inlet_flow: unit.inlet.flow.value(),
            fixed_cap_inv_unadjusted: costing.fixed_cap_inv_unadjusted.value(),
            electricity: costing.electricity.value(),
            fixed_cap_inv: costing.fixed_cap_inv.value(),
            land_cost: costing.land_cost.value(),
            working_cap: costing.working_cap.value(),
            total_cap_investment: costing.total_cap_investment.value(),
            cat_and_chem_cost: costing.cat_and_chem_cost.value(),
            electricity_cost: costing.electricity_cost.value(),
            other_var_cost: costing.other_var_cost.value(),
            salaries: costing.salaries.value(),
            benefits: costing.benefits.value(),
            maintenance: costing.maintenance.value(),
            lab: costing.lab.value(),
            insurance_taxes: costing.insurance_taxes.value(),
            total_fixed_op_cost: costing.total_fixed_op_cost.value(),
            total_up_cost: costing.total_up_cost.value(),
        }
    }
}

/// Represents the single row of the system costs CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SystemCostRow {
    capital_investment_total: f64,
    cat_and_chem_cost_total: f64,
    electricity_cost_total: f64,
    other_var_cost_total: f64,
    fixed_op_cost_total: f64,
    operating_cost_total: f64,
    electricity_intensity: f64,
    treated_water: f64,
    lcow: f64,
}

impl SystemCostRow {
    /// Create a new [`SystemCostRow`]
    fn new(system: &SystemCosting) -> Self {
        Self {
            capital_investment_total: system.capital_investment_total.value(),
            cat_and_chem_cost_total: system.cat_and_chem_cost_total.value(),
            electricity_cost_total: system.electricity_cost_total.value(),
            other_var_cost_total: system.other_var_cost_total.value(),
            fixed_op_cost_total: system.fixed_op_cost_total.value(),
            operating_cost_total: system.operating_cost_total.value(),
            electricity_intensity: system.electricity_intensity.value(),
            treated_water: system.treated_water.value(),
            lcow: system.lcow.value(),
        }
    }
}

/// The port a stream row describes
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum StreamKind {
    Inlet,
    Outlet,
    Waste,
}

/// Represents a row in the stream flows CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct StreamRow {
    unit_id: UnitID,
    stream: StreamKind,
    flow: f64,
}

/// Represents a row in the stream quality CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct StreamQualityRow {
    unit_id: UnitID,
    stream: StreamKind,
    constituent_id: ConstituentID,
    concentration: f64,
}

/// Write the flowsheet results to CSV files in the output directory.
///
/// # Arguments
///
/// * `output_dir` - Folder where files will be saved
/// * `results` - The results of running the train
pub fn write_results(output_dir: &Path, results: &FlowsheetResults) -> Result<()> {
    write_unit_costs(output_dir, &results.units)?;
    write_system_costs(output_dir, &results.system)?;
    write_streams(output_dir, &results.units)?;
    Ok(())
}

/// Write per-unit costs to the unit costs CSV file
fn write_unit_costs(output_dir: &Path, units: &[CostedUnit]) -> Result<()> {
    let file_path = output_dir.join(UNIT_COSTS_FILE_NAME);
    let mut writer = csv::Writer::from_path(file_path)?;
    for unit in units {
        writer.serialize(UnitCostRow::new(unit))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the system costing to the system costs CSV file
fn write_system_costs(output_dir: &Path, system: &SystemCosting) -> Result<()> {
    let file_path = output_dir.join(SYSTEM_COSTS_FILE_NAME);
    let mut writer = csv::Writer::from_path(file_path)?;
    writer.serialize(SystemCostRow::new(system))?;
    writer.flush()?;
    Ok(())
}

/// Write stream flows and quality to their CSV files
fn write_streams(output_dir: &Path, units: &[CostedUnit]) -> Result<()> {
    let mut flow_writer = csv::Writer::from_path(output_dir.join(STREAMS_FILE_NAME))?;
    let mut quality_writer =
        csv::Writer::from_path(output_dir.join(STREAM_QUALITY_FILE_NAME))?;

    let streams = |unit: &CostedUnit| {
        [
            (StreamKind::Inlet, unit.inlet.clone()),
            (StreamKind::Outlet, unit.outlet.clone()),
            (StreamKind::Waste, unit.waste.clone()),
        ]
    };

    for unit in units {
        for (kind, stream) in streams(unit) {
            write_stream_rows(&mut flow_writer, &mut quality_writer, &unit.id, kind, &stream)?;
        }
    }
    flow_writer.flush()?;
    quality_writer.flush()?;
    Ok(())
}

/// Write the rows for a single stream
fn write_stream_rows(
    flow_writer: &mut csv::Writer<File>,
    quality_writer: &mut csv::Writer<File>,
    unit_id: &UnitID,
    kind: StreamKind,
    stream: &Stream,
) -> Result<()> {
    flow_writer.serialize(StreamRow {
        unit_id: unit_id.clone(),
        stream: kind,
        flow: stream.flow.value(),
    })?;
    for (constituent_id, dose) in &stream.concentrations {
        quality_writer.serialize(StreamQualityRow {
            unit_id: unit_id.clone(),
            stream: kind,
            constituent_id: constituent_id.clone(),
            concentration: dose.value(),
        })?;
    }
    Ok(())
}

//! The reference data tables shared by every train.
//!
//! These are the CSV tables shipped in the `data/` directory: chemical prices, plant cost
//! indices, the UV cost grid and the ion exchange cost curves.
use crate::chemical::{ChemicalPrices, read_chemical_prices};
use crate::finance::{CostIndexTable, read_cost_indices};
use crate::technology::ion_exchange::{IonExchangeCostCurves, read_ion_exchange_cost_curves};
use crate::technology::uv_aop::{UvCostGrid, read_uv_cost_grid};
use anyhow::{Context, Result, ensure};
use std::path::Path;

/// The default directory containing the reference data tables, relative to the working
/// directory
pub const DEFAULT_DATA_DIRECTORY: &str = "data";

/// The reference data tables read from the data directory
pub struct ReferenceData {
    /// Chemical prices in $/kg
    pub chemical_prices: ChemicalPrices,
    /// Plant cost indices by year
    pub cost_indices: CostIndexTable,
    /// The UV cost grid
    pub uv_cost_grid: UvCostGrid,
    /// The ion exchange cost curves
    pub ion_exchange_curves: IonExchangeCostCurves,
}

impl ReferenceData {
    /// Read all reference data tables from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Folder containing the reference data tables
    pub fn from_path<P: AsRef<Path>>(data_dir: P) -> Result<ReferenceData> {
        let data_dir = data_dir.as_ref();
        ensure!(
            data_dir.is_dir(),
            "Data directory {} does not exist",
            data_dir.to_string_lossy()
        );

        Ok(ReferenceData {
            chemical_prices: read_chemical_prices(data_dir)
                .context("Failed to read chemical prices.")?,
            cost_indices: read_cost_indices(data_dir)
                .context("Failed to read plant cost indices.")?,
            uv_cost_grid: read_uv_cost_grid(data_dir).context("Failed to read UV cost grid.")?,
            ion_exchange_curves: read_ion_exchange_cost_curves(data_dir)
                .context("Failed to read ion exchange cost curves.")?,
        })
    }
}

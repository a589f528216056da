//! Water streams and the zeroth-order balance applied by each unit.
//!
//! A unit splits its inlet into an outlet and a waste stream: the outlet carries
//! `water_recovery` of the inlet flow, and each constituent leaves in the outlet reduced by
//! the unit's removal fraction, with the removed mass routed to the waste stream.
use crate::constituent::{ConstituentID, ConstituentMap};
use crate::units::{Dimensionless, Dose, FlowRate};
use indexmap::IndexMap;

/// A water stream: volumetric flow plus per-constituent concentrations.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    /// Volumetric flow in m³/h
    pub flow: FlowRate,
    /// Constituent concentrations in kg/m³
    pub concentrations: IndexMap<ConstituentID, Dose>,
}

impl Stream {
    /// Create the train inlet stream from a source flow and the constituent list.
    pub fn source(flow: FlowRate, constituents: &ConstituentMap) -> Self {
        Stream {
            flow,
            concentrations: constituents.clone(),
        }
    }

    /// The mass rate of a constituent in kg/h, zero if the constituent is not present.
    fn mass_rate(&self, constituent_id: &ConstituentID) -> f64 {
        self.concentrations
            .get(constituent_id)
            .map_or(0.0, |dose| (self.flow * *dose).value())
    }
}

/// The outlet and waste streams produced by a unit's balance.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceResult {
    /// The treated stream passed to the next unit
    pub outlet: Stream,
    /// The reject stream
    pub waste: Stream,
}

/// Apply the zeroth-order balance to an inlet stream.
///
/// # Arguments
///
/// * `inlet` - The unit's inlet stream
/// * `water_recovery` - The fraction of inlet flow leaving via the outlet
/// * `removal_fraction` - Per-constituent removal fractions (zero when absent)
pub fn apply_balance<F>(
    inlet: &Stream,
    water_recovery: Dimensionless,
    removal_fraction: F,
) -> BalanceResult
where
    F: Fn(&ConstituentID) -> Dimensionless,
{
    let outlet_flow = inlet.flow * water_recovery;
    let waste_flow = inlet.flow - outlet_flow;

    let mut outlet_concentrations = IndexMap::new();
    let mut waste_concentrations = IndexMap::new();
    for constituent_id in inlet.concentrations.keys() {
        let removal = removal_fraction(constituent_id);
        let inlet_mass = inlet.mass_rate(constituent_id);
        let outlet_mass = inlet_mass * (1.0 - removal.0);
        let waste_mass = inlet_mass - outlet_mass;

        let outlet_dose = if outlet_flow.value() > 0.0 {
            Dose(outlet_mass / outlet_flow.value())
        } else {
            Dose(0.0)
        };
        let waste_dose = if waste_flow.value() > 0.0 {
            Dose(waste_mass / waste_flow.value())
        } else {
            Dose(0.0)
        };
        outlet_concentrations.insert(constituent_id.clone(), outlet_dose);
        waste_concentrations.insert(constituent_id.clone(), waste_dose);
    }

    BalanceResult {
        outlet: Stream {
            flow: outlet_flow,
            concentrations: outlet_concentrations,
        },
        waste: Stream {
            flow: waste_flow,
            concentrations: waste_concentrations,
        },
    }
}

//! An integration test running the demo train end to end.
use float_cmp::assert_approx_eq;
use std::path::Path;
use wt3::constituent::ConstituentID;
use wt3::flowsheet::{CostedUnit, run};
use wt3::reference::ReferenceData;
use wt3::train::Train;

fn find_unit<'a>(units: &'a [CostedUnit], id: &str) -> &'a CostedUnit {
    units.iter().find(|unit| unit.id == id.into()).unwrap()
}

#[test]
fn test_run_demo_train() {
    let reference = ReferenceData::from_path(Path::new("data")).unwrap();
    let train = Train::from_path(Path::new("demos/brackish"), &reference).unwrap();
    let results = run(&train, &reference).unwrap();

    assert_eq!(results.units.len(), 6);

    // Anti-scalant at the default dose of 0.005 kg/m3: at 450 m3/hr inlet the solution
    // flow is 13.9719 gal/day, so the unadjusted capital is
    // 900.97 * 13.9719^0.6179 * 3.4 * 2 * 1e-6
    let anti_scalant = find_unit(&results.units, "anti_scalant");
    assert_approx_eq!(f64, anti_scalant.inlet.flow.value(), 450.0);
    assert_approx_eq!(
        f64,
        anti_scalant.costing.fixed_cap_inv_unadjusted.value(),
        0.031_252,
        epsilon = 1e-5
    );

    // Only the anti-scalant feed loses water; every other unit passes its flow through
    assert_approx_eq!(
        f64,
        results.system.treated_water.value(),
        450.0 * 0.99999,
        epsilon = 1e-9
    );

    // The softener removes 95% of the TDS mass
    let softener = find_unit(&results.units, "softener");
    let tds_out = softener.outlet.concentrations.get::<ConstituentID>(&"tds".into()).unwrap();
    assert_approx_eq!(f64, tds_out.value(), 0.21, epsilon = 1e-4);

    // UV dominates the electricity intensity, followed by the softener
    assert_approx_eq!(
        f64,
        results.system.electricity_intensity.value(),
        0.228_89,
        epsilon = 5e-4
    );

    // Operating total is the sum of its parts
    let system = &results.system;
    assert_approx_eq!(
        f64,
        system.operating_cost_total.value(),
        system.cat_and_chem_cost_total.value()
            + system.electricity_cost_total.value()
            + system.other_var_cost_total.value()
            + system.fixed_op_cost_total.value()
    );
    assert!(system.lcow.value() > 0.0);
    assert!(system.lcow.value().is_finite());

    // Every unit carries a complete costing
    for unit in &results.units {
        assert!(unit.costing.total_up_cost.value() > 0.0);
        assert!(
            unit.costing.total_cap_investment.value()
                > unit.costing.fixed_cap_inv.value()
        );
    }
}

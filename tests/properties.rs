//! Property-based checks over the numeric components: bounded clearness
//! indices, unit-interval diffuse fractions, and inverter clipping.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use solar_yield_engine::pv::inverter::{Inverter, InverterSpec};
use solar_yield_engine::pv::panel::PvPanel;
use solar_yield_engine::solar::clearness::ClearnessIndexCalculator;
use solar_yield_engine::solar::diffuse::DiffuseFractionEstimator;
use solar_yield_engine::{BrlVariant, Location, ModelConstants, Technology, TimeSeries};

fn day_timestamps(start_day: u32) -> Vec<DateTime<Utc>> {
    let start = Utc
        .with_ymd_and_hms(2019, 1, 1, 0, 0, 0)
        .unwrap()
        + chrono::Duration::days(start_day as i64);
    (0..24).map(|h| start + chrono::Duration::hours(h)).collect()
}

proptest! {
    #[test]
    fn clearness_index_bounded_for_plausible_ghi(
        ghi in 1.0..1300.0f64,
        start_day in 0u32..364,
        hour in 0usize..24,
    ) {
        let constants = ModelConstants::default();
        let calculator = ClearnessIndexCalculator::new(&constants);

        let mut values = vec![Some(0.0); 24];
        values[hour] = Some(ghi);
        let series = TimeSeries::new(day_timestamps(start_day), values).unwrap();

        let kt = calculator.clearness_index(&series);
        let value = kt.value_at(hour).unwrap();
        prop_assert!(value > 0.0 && value < 1.2, "kt = {value}");

        // Zero-GHI hours are undefined, never zeroed
        for h in (0..24).filter(|h| *h != hour) {
            prop_assert!(kt.value_at(h).is_none());
        }
    }

    #[test]
    fn diffuse_fraction_in_unit_interval_or_undefined(
        ks in proptest::collection::vec(proptest::option::of(0.0..1.1f64), 24),
        start_day in 0u32..364,
        ridley in proptest::bool::ANY,
    ) {
        let variant = if ridley { BrlVariant::Ridley } else { BrlVariant::Lauret };
        let estimator = DiffuseFractionEstimator::new(
            Location::new(38.0, 23.7).unwrap(),
            variant,
        );

        let series = TimeSeries::new(day_timestamps(start_day), ks.clone()).unwrap();
        let fractions = estimator.estimate(&series, None).unwrap();

        for h in 0..24 {
            match (ks[h], fractions.value_at(h)) {
                (Some(_), Some(d)) => prop_assert!((0.0..=1.0).contains(&d), "d[{h}] = {d}"),
                (None, None) => {}
                (input, output) => {
                    prop_assert!(false, "hour {h}: input {input:?} output {output:?}")
                }
            }
        }
    }

    #[test]
    fn inverter_output_clipped_to_nameplate(
        ac_capacity in 100.0..100_000.0f64,
        load_fraction in 0.0..10.0f64,
    ) {
        let inverter = Inverter::new(InverterSpec::new(ac_capacity));
        let ac = inverter.ac_output(ac_capacity * load_fraction);
        prop_assert!(ac >= 0.0);
        prop_assert!(ac <= ac_capacity);
    }

    #[test]
    fn panel_relative_efficiency_never_negative(
        irradiance in -100.0..1500.0f64,
        ambient_temp in -40.0..60.0f64,
    ) {
        let constants = ModelConstants::default();
        for technology in [Technology::CSi, Technology::Cis, Technology::CdTe] {
            let panel = PvPanel::for_technology(technology, 1000.0, None, None).unwrap();
            let eta = panel.relative_efficiency(irradiance, ambient_temp, None, &constants);
            prop_assert!(eta >= 0.0 && eta.is_finite(), "{technology}: eta = {eta}");
        }
    }
}

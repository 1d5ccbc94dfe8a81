//! End-to-end pipeline tests: synthetic clear-day production runs and the
//! climatological aggregation, exercised through the public API only.

use chrono::{DateTime, TimeZone, Utc};
use rstest::rstest;

use solar_yield_engine::{
    BrlVariant, ModelConstants, ProductionSimulator, SeasonalAggregator, SimulationInputs,
    SimulationRequest, Technology, TimeSeries,
};

/// Reference system: south-facing fixed 30-degree panel in Athens.
fn athens_request(technology: Technology) -> SimulationRequest {
    SimulationRequest {
        latitude: 38.0,
        longitude: 23.7,
        tilt_deg: 30.0,
        azimuth_deg: 180.0,
        tracking: 0,
        capacity_w: 1000.0,
        inverter_capacity_w: None,
        use_inverter: true,
        technology,
        system_loss: 0.0,
        brl_variant: BrlVariant::Lauret,
        include_raw: false,
        module: None,
        temperature_model: None,
    }
}

fn day_timestamps() -> Vec<DateTime<Utc>> {
    let start = Utc.with_ymd_and_hms(2019, 6, 21, 0, 0, 0).unwrap();
    (0..24).map(|h| start + chrono::Duration::hours(h)).collect()
}

/// Symmetric clear-day bell: 800 W/m2 at solar noon (hour 10 UTC in
/// Athens), zero at both boundary hours and through the night.
fn clear_day_ghi() -> TimeSeries {
    let values = (0..24)
        .map(|h| {
            let x = (h as f64 - 10.0) / 7.0;
            Some((800.0 * (1.0 - x * x)).max(0.0))
        })
        .collect();
    TimeSeries::new(day_timestamps(), values).unwrap()
}

#[test]
fn clear_day_production_peaks_at_solar_noon() {
    let constants = ModelConstants::default();
    let simulator = ProductionSimulator::new(&constants);

    let production = simulator
        .run_decomposed(&athens_request(Technology::CSi), &clear_day_ghi(), None, None)
        .unwrap();

    let ac: Vec<f64> = (0..24)
        .map(|h| production.ac_power.value_at(h).unwrap())
        .collect();

    // Zero at night
    for hour in [0, 1, 2, 20, 21, 22, 23] {
        assert_eq!(ac[hour], 0.0, "night hour {hour} produced {}", ac[hour]);
    }

    // Peak within two hours of solar noon
    let peak_hour = (0..24)
        .max_by(|a, b| ac[*a].partial_cmp(&ac[*b]).unwrap())
        .unwrap();
    assert!(
        (8..=12).contains(&peak_hour),
        "peak at hour {peak_hour}, profile {ac:?}"
    );
    assert!(ac[peak_hour] > 300.0, "implausibly low peak {}", ac[peak_hour]);

    // Trapezoidal daily energy stays strictly below capacity times the
    // daylight duration (about 14.8 h on the solstice in Athens)
    let energy_wh: f64 = ac.windows(2).map(|w| (w[0] + w[1]) / 2.0).sum();
    assert!(
        energy_wh < 1000.0 * 14.8,
        "daily energy {energy_wh} Wh exceeds the daylight bound"
    );
    assert!(energy_wh > 1000.0, "daily energy {energy_wh} Wh implausibly low");
}

#[rstest]
#[case::csi(Technology::CSi)]
#[case::cis(Technology::Cis)]
#[case::cdte(Technology::CdTe)]
fn all_parametric_technologies_stay_within_capacity(#[case] technology: Technology) {
    let constants = ModelConstants::default();
    let simulator = ProductionSimulator::new(&constants);

    let production = simulator
        .run_decomposed(&athens_request(technology), &clear_day_ghi(), None, None)
        .unwrap();

    for h in 0..24 {
        let ac = production.ac_power.value_at(h).unwrap();
        assert!((0.0..=1000.0).contains(&ac), "{technology} hour {h}: {ac}");
    }
}

#[rstest]
#[case::fixed(0)]
#[case::single_axis(1)]
#[case::dual_axis(2)]
fn all_tracking_modes_produce_valid_series(#[case] tracking: u8) {
    let constants = ModelConstants::default();
    let simulator = ProductionSimulator::new(&constants);

    let mut request = athens_request(Technology::CSi);
    request.tracking = tracking;

    let production = simulator
        .run_decomposed(&request, &clear_day_ghi(), None, None)
        .unwrap();

    let total: f64 = (0..24)
        .filter_map(|h| production.ac_power.value_at(h))
        .sum();
    assert!(total > 0.0, "tracking {tracking} produced nothing");
    for h in 0..24 {
        let ac = production.ac_power.value_at(h).unwrap();
        assert!((0.0..=1000.0).contains(&ac), "tracking {tracking} hour {h}: {ac}");
    }
}

#[test]
fn invalid_tracking_mode_is_rejected() {
    let constants = ModelConstants::default();
    let simulator = ProductionSimulator::new(&constants);

    let mut request = athens_request(Technology::CSi);
    request.tracking = 7;
    assert!(simulator
        .run_decomposed(&request, &clear_day_ghi(), None, None)
        .is_err());
}

#[test]
fn identical_inputs_give_bit_identical_output() {
    let constants = ModelConstants::default();
    let simulator = ProductionSimulator::new(&constants);
    let request = athens_request(Technology::CSi);

    let first = simulator
        .run_decomposed(&request, &clear_day_ghi(), None, None)
        .unwrap();
    let second = simulator
        .run_decomposed(&request, &clear_day_ghi(), None, None)
        .unwrap();

    assert_eq!(first.ac_power, second.ac_power);
}

#[test]
fn supplied_diffuse_fraction_run_matches_contract() {
    let constants = ModelConstants::default();
    let simulator = ProductionSimulator::new(&constants);

    let inputs = SimulationInputs {
        global_horizontal: Some(clear_day_ghi()),
        diffuse_fraction: Some(TimeSeries::constant(day_timestamps(), 0.25).unwrap()),
        temperature: Some(TimeSeries::constant(day_timestamps(), 28.0).unwrap()),
    };

    let mut request = athens_request(Technology::CSi);
    request.include_raw = true;
    let production = simulator.run(&request, &inputs).unwrap();

    let raw = production.raw.expect("raw channels requested");
    assert_eq!(raw.temperature.value_at(12), Some(28.0));
    assert_eq!(production.ac_power.len(), 24);
}

#[test]
fn monthly_climatology_is_flat_for_constant_monthly_totals() {
    // 24 monthly totals of the same value: every calendar-month mean must
    // equal that value with zero variance across the two years
    let timestamps: Vec<DateTime<Utc>> = (0..24)
        .map(|i| {
            let year = 2018 + i / 12;
            let month = 1 + (i % 12) as u32;
            Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
        })
        .collect();
    let series = TimeSeries::constant(timestamps, 1234.5).unwrap();

    let profile = SeasonalAggregator::monthly_climatology(&series);
    for month in 1..=12 {
        assert_eq!(profile.mean_for_month(month), Some(1234.5));
    }
}

#[test]
fn production_feeds_straight_into_the_aggregator() {
    let constants = ModelConstants::default();
    let simulator = ProductionSimulator::new(&constants);

    let production = simulator
        .run_decomposed(&athens_request(Technology::CSi), &clear_day_ghi(), None, None)
        .unwrap();

    let profile = SeasonalAggregator::monthly_climatology(&production.ac_power);
    assert!(profile.mean_for_month(6).unwrap() > 0.0);
    for month in (1..=12).filter(|m| *m != 6) {
        assert_eq!(profile.mean_for_month(month), None);
    }
}

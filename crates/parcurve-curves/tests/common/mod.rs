//! Shared fixtures for integration tests.

#![allow(dead_code)]

use parcurve_core::calendars::BusinessDayConvention;
use parcurve_core::{Date, Frequency, Period};
use parcurve_curves::instruments::{CurveInstrument, Deposit, FixedLegSwap};
use tracing_subscriber::EnvFilter;

/// Routes bootstrap tracing to the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// FR007 anchor date.
pub fn anchor() -> Date {
    Date::from_ymd(2024, 6, 5).unwrap()
}

/// FR007 swap ladder for 2024-06-05, shortest first.
pub fn fr007_instruments() -> Vec<CurveInstrument> {
    let mf = BusinessDayConvention::ModifiedFollowing;
    let following = BusinessDayConvention::Following;
    let swap = |id: &str, tenor: Period, rate: f64| -> CurveInstrument {
        FixedLegSwap::new(id, Period::days(1), tenor, Frequency::Quarterly, mf, rate).into()
    };
    let short_swap = |id: &str, tenor: Period, frequency: Frequency, convention, rate: f64| {
        CurveInstrument::from(FixedLegSwap::new(id, Period::days(1), tenor, frequency, convention, rate))
    };

    vec![
        Deposit::new("1D", Period::ZERO, Period::days(1), following, 0.0184).into(),
        short_swap("1W", Period::weeks(1), Frequency::Weekly, following, 0.0184),
        short_swap("1M", Period::months(1), Frequency::Monthly, mf, 0.01895),
        short_swap("3M", Period::months(3), Frequency::Quarterly, mf, 0.018625),
        swap("6M", Period::months(6), 0.018366),
        swap("9M", Period::months(9), 0.018391),
        swap("1Y", Period::years(1), 0.018288),
        swap("2Y", Period::years(2), 0.018325),
        swap("3Y", Period::years(3), 0.018725),
        swap("4Y", Period::years(4), 0.019463),
        swap("5Y", Period::years(5), 0.0202),
        swap("7Y", Period::years(7), 0.021363),
        swap("10Y", Period::years(10), 0.022363),
    ]
}

/// Node times of the FR007 curve.
pub const FR007_TIMES: [f64; 13] = [
    0.00273973, 0.02191781, 0.09041096, 0.25479452, 0.50410959, 0.75068493, 1.00273973,
    2.00821918, 3.00547945, 4.00547945, 5.00547945, 7.00547945, 10.00821918,
];

/// Zero rates of the FR007 curve.
pub const FR007_ZERO_RATES: [f64; 13] = [
    0.018399536, 0.018397102, 0.018918072, 0.018579463, 0.018323663, 0.018348861, 0.018245823,
    0.018283116, 0.018688923, 0.019443740, 0.020203051, 0.021413670, 0.022466493,
];

mod common;

use tou_sim::error::{ErrorKind, ScheduleKind, SimError};
use tou_sim::sim::calendar;
use tou_sim::sim::schedule::ScheduleDefinition;
use tou_sim::sim::tou::TouSchedules;

use common::{filled, hour_end, weekday_weekend};

#[test]
fn weekday_weekend_split_follows_cursor_cycle() {
    let tou = TouSchedules::init(
        weekday_weekend(vec![1.0, 0.0]),
        weekday_weekend(vec![1.0, 2.0]),
        false,
    )
    .unwrap();

    // Days 0-4 are weekdays, days 5 and 6 are weekend, then the cycle repeats.
    for day in 0..14 {
        let expected = if day % 7 >= 5 { 2 } else { 1 };
        for hour in [0, 11, 23] {
            let out = tou.lookup(hour_end(day * 24 + hour)).unwrap();
            assert_eq!(out.operating_period, expected, "day {day} hour {hour}");
            assert_eq!(out.pricing_period, expected);
        }
    }

    let weekend = tou.lookup(hour_end(5 * 24)).unwrap();
    assert_eq!(weekend.turbine_fraction, 0.0);
    assert_eq!(weekend.price_multiplier, 2.0);
}

#[test]
fn expanded_array_matches_source_cells() {
    for leap_year in [false, true] {
        let mut weekdays = filled(1);
        let mut weekends = filled(1);
        for (month, row) in weekdays.iter_mut().enumerate() {
            for (hour, cell) in row.iter_mut().enumerate() {
                *cell = (month * 24 + hour + 1) as i32;
            }
        }
        for (month, row) in weekends.iter_mut().enumerate() {
            for (hour, cell) in row.iter_mut().enumerate() {
                *cell = (300 + month * 24 + hour) as i32;
            }
        }
        let values = vec![1.0; 600];
        let def = ScheduleDefinition {
            weekdays: weekdays.clone(),
            weekends: weekends.clone(),
            values,
        };
        let tou = TouSchedules::init(def.clone(), def, leap_year).unwrap();
        let hourly = tou.operating().hourly();
        assert_eq!(hourly.len(), calendar::hours_in_year(leap_year));

        let mut month_days = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        if leap_year {
            month_days[1] += 1;
        }
        let mut day = 0;
        for (month, &n) in month_days.iter().enumerate() {
            for _ in 0..n {
                let source = if calendar::is_weekend_day(day) {
                    &weekends
                } else {
                    &weekdays
                };
                for hour in 0..24 {
                    assert_eq!(hourly[day * 24 + hour], source[month][hour] as u32);
                }
                day += 1;
            }
        }
    }
}

#[test]
fn lookup_boundaries() {
    let tou = TouSchedules::uniform(false);
    assert!(tou.lookup(3600.0 - 1.0e-3).is_ok());
    assert!(tou.lookup(3600.0).is_ok());
    assert_eq!(tou.lookup(0.0).unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(tou.lookup(-1.0).unwrap_err().kind(), ErrorKind::Range);
    assert!(tou.lookup(3600.0 * 8760.0).is_ok());
    assert_eq!(
        tou.lookup(3600.0 * 8760.0 + 1.0).unwrap_err().kind(),
        ErrorKind::Range
    );

    let leap = TouSchedules::uniform(true);
    assert!(leap.lookup(3600.0 * 8784.0).is_ok());
    assert_eq!(
        leap.lookup(3600.0 * 8784.0 + 1.0).unwrap_err().kind(),
        ErrorKind::Range
    );
}

#[test]
fn lookup_and_init_are_idempotent() {
    let build = || {
        TouSchedules::init(
            weekday_weekend(vec![1.0, 0.5]),
            weekday_weekend(vec![0.9, 1.4]),
            false,
        )
        .unwrap()
    };
    let a = build();
    let b = build();
    assert_eq!(a, b);
    for t in [1.0, 3600.0, 500_000.0, 3600.0 * 8760.0] {
        assert_eq!(a.lookup(t).unwrap(), a.lookup(t).unwrap());
    }
}

#[test]
fn eleven_row_weekday_matrix_is_shape_error() {
    let def = ScheduleDefinition {
        weekdays: vec![vec![1; 24]; 11],
        weekends: filled(1),
        values: vec![1.0],
    };
    let err = TouSchedules::init(def, ScheduleDefinition::uniform(), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
    assert!(matches!(
        err,
        SimError::Schedule {
            kind: ScheduleKind::Operating,
            ..
        }
    ));
    assert!(err.to_string().contains("11"), "{err}");
}

#[test]
fn value_array_shorter_than_max_period_is_size_error() {
    let err = TouSchedules::init(
        ScheduleDefinition::uniform(),
        weekday_weekend(vec![1.0]),
        false,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Size);
    assert!(err.to_string().contains("Price Multiplier"), "{err}");
}

#[test]
fn zero_period_is_range_error() {
    let mut def = ScheduleDefinition::uniform();
    def.weekdays[0][0] = 0;
    let err = TouSchedules::init(def, ScheduleDefinition::uniform(), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

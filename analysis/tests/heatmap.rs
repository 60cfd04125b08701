mod support;

use analysis::filter::filter_events;
use analysis::heatmap::{self, Config, HeatMap, HeatmapError};
use common::FilterConfig;
use pretty_assertions::assert_eq;
use support::{derived, kill, round};

#[test]
fn bins_points_into_cells() {
    let config = Config::default();

    let map = HeatMap::from_points(
        &config,
        [(0.0, 0.0), (14.9, 14.9), (15.0, 0.0), (1023.0, 30.0)],
    )
    .unwrap();

    assert_eq!(2, map.get(0, 0));
    assert_eq!(1, map.get(1, 0));
    assert_eq!(1, map.get(68, 2));
    assert_eq!(0, map.get(500, 500));
    assert_eq!(2, map.max_value());
    assert_eq!(4, map.total());
}

#[test]
fn points_outside_the_image_are_skipped() {
    let config = Config {
        cell_size: 10.0,
        width: 100.0,
        height: 50.0,
    };

    let map = HeatMap::from_points(&config, [(-1.0, 5.0), (100.0, 5.0), (5.0, 50.0), (f64::NAN, 1.0)]).unwrap();

    assert!(map.is_empty());
    assert_eq!(0, map.total());
}

#[test]
fn shrink_drops_leading_empty_cells() {
    let config = Config {
        cell_size: 1.0,
        width: 10.0,
        height: 10.0,
    };
    let mut map = HeatMap::from_points(&config, [(3.0, 2.0), (4.0, 3.0), (4.0, 3.0)]).unwrap();

    map.shrink();

    assert_eq!(1, map.get(0, 0));
    assert_eq!(2, map.get(1, 1));
    assert_eq!(3, map.total());
    assert_eq!("1 \n0 2 \n", map.to_string());
}

#[test]
fn deaths_and_kills_use_their_own_positions() {
    let mut event = kill(0, 100, "a", "b");
    event.victim_x = 20.0;
    event.victim_y = 20.0;
    event.attacker_x = 100.0;
    event.attacker_y = 5.0;
    let kills = derived(vec![(event, 0, 1.0)]);
    let views = filter_events(&kills, &[round(0, 0, "Eco", "Eco")], &FilterConfig::default());
    let config = Config::default();

    let deaths = heatmap::deaths(&config, &views).unwrap();
    let kills = heatmap::kills(&config, &views).unwrap();

    assert_eq!(1, deaths.get(1, 1));
    assert_eq!(0, deaths.get(6, 0));
    assert_eq!(1, kills.get(6, 0));
    assert_eq!(0, kills.get(1, 1));
}

#[test]
fn unusable_cell_sizes_are_rejected() {
    for cell_size in [0.0, -15.0, f64::NAN, f64::INFINITY] {
        let config = Config {
            cell_size,
            ..Default::default()
        };

        let result = HeatMap::from_points(&config, [(10.0, 10.0)]);

        assert!(
            matches!(result, Err(HeatmapError::CellSize(_))),
            "cell size {cell_size} was accepted"
        );
    }

    let config = Config {
        cell_size: 1e-9,
        ..Default::default()
    };
    assert_eq!(
        Err(HeatmapError::TooManyCells { cell_size: 1e-9 }),
        HeatMap::from_points(&config, [(10.0, 10.0)])
    );

    let config = Config {
        width: 0.0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(HeatmapError::ImageSize { .. })));
    assert_eq!(Ok(()), Config::default().validate());
}

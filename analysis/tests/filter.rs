mod support;

use analysis::filter::{filter_events, victim_side, FilteredViews};
use common::{FilterConfig, RowId, Side, SideToggle};
use pretty_assertions::assert_eq;
use support::{derived, kill, round};

fn ids(rows: &[common::FilteredKill]) -> Vec<u64> {
    rows.iter().map(|r| r.id().0).collect()
}

fn both(views: &FilteredViews) -> (Vec<u64>, Vec<u64>) {
    (ids(&views.victims), ids(&views.attackers))
}

#[test]
fn default_config_keeps_everything() {
    let kills = derived(vec![
        (kill(0, 100, "a", "b"), 0, 1.0),
        (kill(4, 900, "b", "a"), 40, 90.0),
    ]);
    let rounds = vec![round(0, 0, "Eco", "Full Buy"), round(4, 800, "Half Buy", "Eco")];

    let views = filter_events(&kills, &rounds, &FilterConfig::default());

    assert_eq!((vec![0, 1], vec![0, 1]), both(&views));
    assert_eq!(Some("Eco"), views.victims[0].t_round_type.as_deref());
    assert_eq!(Some("Full Buy"), views.victims[0].ct_round_type.as_deref());
    assert_eq!(Some("Half Buy"), views.victims[1].t_round_type.as_deref());
}

#[test]
fn time_bounds_are_exclusive() {
    let kills = derived(vec![
        (kill(0, 100, "a", "b"), 0, 0.0),
        (kill(0, 200, "a", "c"), 0, 2.5),
        (kill(0, 300, "a", "d"), 0, 5.0),
    ]);
    let config = FilterConfig {
        time: Some((0.0, 5.0)),
        ..Default::default()
    };

    let views = filter_events(&kills, &[round(0, 0, "Eco", "Eco")], &config);

    assert_eq!((vec![1], vec![1]), both(&views));
}

#[test]
fn net_damage_upper_bound() {
    let kills = derived(vec![
        (kill(0, 100, "a", "b"), -50, 120.0),
        (kill(0, 200, "a", "c"), 10, 3.0),
        (kill(0, 300, "a", "d"), 150, 3.0),
    ]);
    let rounds = vec![round(0, 0, "Eco", "Eco")];

    let mut config = FilterConfig {
        net_dmg: Some((-100.0, 100.0)),
        ..Default::default()
    };
    let views = filter_events(&kills, &rounds, &config);
    assert_eq!(vec![0, 1], ids(&views.victims));

    config.net_dmg_upper_bound_on_round_time = true;
    let views = filter_events(&kills, &rounds, &config);
    assert_eq!(vec![1, 2], ids(&views.victims));
}

#[test]
fn dashboard_defaults_keep_typical_kills() {
    let kills = derived(vec![
        (kill(0, 100, "a", "b"), 0, 30.0),
        (kill(0, 200, "a", "c"), 250, 30.0),
        (kill(0, 300, "a", "d"), 0, 170.0),
    ]);

    let views = filter_events(&kills, &[round(0, 0, "Eco", "Eco")], &FilterConfig::dashboard_defaults());

    assert_eq!((vec![0], vec![0]), both(&views));
}

#[test]
fn round_selector_is_one_indexed() {
    let kills = derived(vec![
        (kill(0, 100, "a", "b"), 0, 1.0),
        (kill(1, 1100, "a", "c"), 0, 1.0),
        (kill(2, 2100, "a", "d"), 0, 1.0),
    ]);
    let rounds = vec![
        round(0, 0, "Eco", "Eco"),
        round(1, 1000, "Eco", "Eco"),
        round(2, 2000, "Eco", "Eco"),
    ];
    let config = FilterConfig {
        rounds: "1, 3".to_owned(),
        ..Default::default()
    };

    let views = filter_events(&kills, &rounds, &config);

    assert_eq!((vec![0, 2], vec![0, 2]), both(&views));
}

#[test]
fn no_selected_round_gives_empty_views() {
    let kills = derived(vec![(kill(0, 100, "a", "b"), 0, 1.0)]);
    let config = FilterConfig {
        rounds: "7".to_owned(),
        ..Default::default()
    };

    let views = filter_events(&kills, &[round(0, 0, "Eco", "Eco")], &config);

    assert!(views.is_empty());
    assert_eq!(FilteredViews::default(), views);
}

#[test]
fn buy_types_filter_per_side() {
    let kills = derived(vec![
        (kill(0, 100, "a", "b"), 0, 1.0),
        (kill(1, 1100, "a", "c"), 0, 1.0),
        (kill(2, 2100, "a", "d"), 0, 1.0),
    ]);
    let rounds = vec![
        round(0, 0, "Full Buy", "Eco"),
        round(1, 1000, "Full Buy", "Full Buy"),
        round(2, 2000, "Eco", "Eco"),
    ];

    let config = FilterConfig {
        buy_types: Some(vec!["T full".to_owned(), "CT eco".to_owned()]),
        ..Default::default()
    };
    assert_eq!(vec![0], ids(&filter_events(&kills, &rounds, &config).victims));

    let config = FilterConfig {
        buy_types: Some(vec!["T full".to_owned()]),
        ..Default::default()
    };
    assert_eq!(vec![0, 1], ids(&filter_events(&kills, &rounds, &config).victims));

    let config = FilterConfig {
        buy_types: Some(Vec::new()),
        ..Default::default()
    };
    assert_eq!(vec![0, 1, 2], ids(&filter_events(&kills, &rounds, &config).victims));
}

#[test]
fn kills_outside_any_round_fail_buy_filter() {
    let kills = derived(vec![(kill(0, 100, "a", "b"), 0, 1.0)]);
    let rounds = vec![round(0, 500, "Full Buy", "Full Buy")];
    let config = FilterConfig {
        buy_types: Some(vec!["T full".to_owned()]),
        ..Default::default()
    };

    let views = filter_events(&kills, &rounds, &config);

    assert!(views.is_empty());
}

#[test]
fn weapon_allow_lists() {
    let mut awp = kill(0, 100, "sniper", "b");
    awp.weapon = "awp".to_owned();
    let mut deagle = kill(0, 200, "sniper", "c");
    deagle.weapon = "deagle".to_owned();
    let mut other_team = kill(0, 300, "rifler", "d");
    other_team.attacker_team = "Team C".to_owned();
    let kills = derived(vec![
        (awp, 0, 1.0),
        (deagle, 0, 1.0),
        (kill(0, 250, "rifler", "e"), 0, 1.0),
        (other_team, 0, 1.0),
    ]);
    let rounds = vec![round(0, 0, "Eco", "Eco")];

    let mut config = FilterConfig::default();
    config
        .player_weapons
        .insert("sniper".to_owned(), vec!["awp".to_owned()]);
    assert_eq!(vec![0, 2, 3], ids(&filter_events(&kills, &rounds, &config).victims));

    config
        .team_weapons
        .insert("Team A".to_owned(), vec!["awp".to_owned()]);
    assert_eq!(vec![0, 3], ids(&filter_events(&kills, &rounds, &config).victims));

    config.all_weapons = Some(vec!["ak47".to_owned()]);
    assert_eq!(vec![3], ids(&filter_events(&kills, &rounds, &config).victims));
}

#[test]
fn side_toggles_split_the_views() {
    let mut ct_kill = kill(0, 200, "b", "a");
    ct_kill.attacker_side = Side::CT;
    ct_kill.attacker_team = "Team B".to_owned();
    ct_kill.victim_team = "Team A".to_owned();
    let kills = derived(vec![(kill(0, 100, "a", "b"), 0, 1.0), (ct_kill, 0, 1.0)]);
    let rounds = vec![round(0, 0, "Eco", "Eco")];

    let mut config = FilterConfig::default();
    config.set_sides(["a"], SideToggle::CT_ONLY);

    let views = filter_events(&kills, &rounds, &config);

    // "a" died on T, which is hidden; its T side kill is hidden too.
    assert_eq!(vec![0], ids(&views.victims));
    assert_eq!(vec![1], ids(&views.attackers));

    config.set_sides(["a", "b"], SideToggle::NONE);
    assert!(filter_events(&kills, &rounds, &config).is_empty());
}

#[test]
fn teamkill_victim_shares_attacker_side() {
    let mut teamkill = kill(0, 100, "a", "a2");
    teamkill.is_teamkill = true;
    teamkill.victim_team = "Team A".to_owned();
    let kills = derived(vec![(teamkill, 0, 1.0), (kill(0, 200, "a", "b"), 0, 1.0)]);

    assert_eq!(Side::T, victim_side(&kills[0]));
    assert_eq!(Side::CT, victim_side(&kills[1]));

    let views = filter_events(&kills, &[round(0, 0, "Eco", "Eco")], &FilterConfig::default());
    assert_eq!(Side::T, views.victims[0].victim_side);
    assert_eq!(RowId(1), views.victims[1].id());
    assert_eq!(Side::CT, views.victims[1].victim_side);
}

#[test]
fn empty_input_gives_empty_views() {
    let views = filter_events(&[], &[], &FilterConfig::dashboard_defaults());

    assert!(views.is_empty());
}

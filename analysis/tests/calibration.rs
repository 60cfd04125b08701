use analysis::calibration::{find_scale, CalibrationError, CalibrationFrame, Scale};
use analysis::maps;
use pretty_assertions::assert_eq;

#[test]
fn evenly_spaced_points_give_exact_ratio() {
    let scale = find_scale(
        &[0.0, 100.0, 200.0],
        &[0.0, 100.0, 200.0],
        &[10.0, 60.0, 110.0],
        &[5.0, 55.0, 105.0],
    )
    .unwrap();

    assert_eq!(
        Scale {
            x_shift: -20.0,
            y_shift: -10.0,
            scale: 0.5,
        },
        scale
    );
    assert_eq!(60.0, scale.project_x(100.0));
    assert_eq!(55.0, scale.project_y(100.0));
}

#[test]
fn point_order_does_not_matter() {
    let frame = maps::lookup("inferno").unwrap();
    let forward = frame.scale().unwrap();

    let reversed = |a: [f64; 3]| [a[2], a[1], a[0]];
    let backward = find_scale(
        &reversed(frame.game_x),
        &reversed(frame.game_y),
        &reversed(frame.map_x),
        &reversed(frame.map_y),
    )
    .unwrap();

    assert!((forward.scale - backward.scale).abs() < 1e-9);
    assert!((forward.x_shift - backward.x_shift).abs() < 1e-6);
    assert!((forward.y_shift - backward.y_shift).abs() < 1e-6);
}

#[test]
fn shared_world_x_is_rejected() {
    let frame = CalibrationFrame {
        game_x: [10.0, 10.0, 30.0],
        game_y: [0.0, 1.0, 2.0],
        map_x: [1.0, 2.0, 3.0],
        map_y: [1.0, 2.0, 3.0],
        z_division: None,
    };

    assert_eq!(
        Err(CalibrationError::SharedWorldX {
            first: 0,
            second: 1,
            value: 10.0,
        }),
        frame.scale()
    );
}

#[test]
fn mismatched_point_lists_are_rejected() {
    assert_eq!(
        Err(CalibrationError::LengthMismatch),
        find_scale(&[0.0, 1.0], &[0.0, 1.0, 2.0], &[0.0, 1.0], &[0.0, 1.0])
    );
    assert_eq!(
        Err(CalibrationError::TooFewPoints(1)),
        find_scale(&[0.0], &[0.0], &[0.0], &[0.0])
    );
}

#[test]
fn every_known_map_calibrates() {
    let scales = maps::validate_all().unwrap();

    let names: Vec<_> = scales.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        vec!["ancient", "anubis", "inferno", "mirage", "nuke", "overpass", "vertigo"],
        names
    );
    for (name, scale) in scales {
        assert!(scale.scale.is_finite() && scale.scale > 0.0, "{name}: {scale:?}");
    }
}

#[test]
fn map_lookup_accepts_prefixed_names() {
    let (frame, scale) = maps::fitted("de_nuke").unwrap();
    assert_eq!(Some(-480.9), frame.z_division);
    assert_eq!(maps::fitted("nuke").unwrap().1, scale);

    let (frame, _) = maps::fitted("mirage").unwrap();
    assert_eq!(None, frame.z_division);

    assert!(matches!(
        maps::lookup("de_dust2"),
        Err(maps::MapError::Unknown(name)) if name == "de_dust2"
    ));
}

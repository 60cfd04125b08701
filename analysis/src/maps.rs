use crate::calibration::{CalibrationError, CalibrationFrame, Scale};

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("no calibration data for map {0:?}")]
    Unknown(String),
    #[error("calibration of map {map:?} is broken: {source}")]
    Calibration {
        map: String,
        #[source]
        source: CalibrationError,
    },
}

// Points were picked by hand on the 1024x1024 radar images.
pub static MAP_CALIBRATIONS: phf::Map<&'static str, CalibrationFrame> = phf::phf_map! {
    "ancient" => CalibrationFrame {
        game_x: [-2144.0, 1384.0, -140.0],
        game_y: [1228.0, -860.0, -294.0],
        map_x: [158.0, 865.8, 564.0],
        map_y: [840.0, 417.4, 533.46],
        z_division: None,
    },
    "inferno" => CalibrationFrame {
        game_x: [-1752.75, 2634.0, 4.03],
        game_y: [811.5, -474.0, 3244.0],
        map_x: [70.3, 963.0, 426.1],
        map_y: [398.1, 139.3, 895.6],
        z_division: None,
    },
    "mirage" => CalibrationFrame {
        game_x: [1359.3, -2032.0, -2636.0],
        game_y: [520.0, -1765.5, 104.0],
        map_x: [919.5, 236.5, 115.0],
        map_y: [787.5, 330.5, 703.5],
        z_division: None,
    },
    "nuke" => CalibrationFrame {
        game_x: [3498.0, -2992.0, 2100.3],
        game_y: [-280.0, -584.0, -2331.6],
        map_x: [998.0, 64.09, 799.2],
        map_y: [573.0, 531.0, 273.8],
        z_division: Some(-480.9),
    },
    "overpass" => CalibrationFrame {
        game_x: [-1416.0, -2700.0, -588.0],
        game_y: [-3496.0, 1672.0, -336.0],
        map_x: [656.0, 408.7, 814.5],
        map_y: [4.0, 1004.4, 610.5],
        z_division: None,
    },
    "anubis" => CalibrationFrame {
        game_x: [471.5, 1488.0, -1223.4],
        game_y: [3069.7, 572.0, -984.6],
        map_x: [626.7, 881.0, 298.4],
        map_y: [974.6, 766.0, 197.1],
        z_division: None,
    },
    "vertigo" => CalibrationFrame {
        game_x: [-33.0, -1568.0, -2634.0],
        game_y: [-1359.0, 1007.9, 176.0],
        map_x: [792.0, 397.0, 128.6],
        map_y: [242.5, 840.0, 621.0],
        z_division: Some(11600.0),
    },
};

fn short_name(map: &str) -> &str {
    map.strip_prefix("de_").unwrap_or(map)
}

/// Whether two map names refer to the same map, with or without `de_`.
pub fn same_map(a: &str, b: &str) -> bool {
    short_name(a) == short_name(b)
}

/// Accepts both `"nuke"` and `"de_nuke"`.
pub fn lookup(map: &str) -> Result<&'static CalibrationFrame, MapError> {
    let name = short_name(map);
    MAP_CALIBRATIONS
        .get(name)
        .ok_or_else(|| MapError::Unknown(map.to_owned()))
}

/// The calibration frame of `map` together with its fitted scale.
pub fn fitted(map: &str) -> Result<(&'static CalibrationFrame, Scale), MapError> {
    let frame = lookup(map)?;
    let scale = frame.scale().map_err(|source| MapError::Calibration {
        map: map.to_owned(),
        source,
    })?;

    Ok((frame, scale))
}

/// Fits every known map once, so broken calibration data shows up at startup
/// instead of on the first filter change.
pub fn validate_all() -> Result<Vec<(&'static str, Scale)>, MapError> {
    let mut scales = MAP_CALIBRATIONS
        .entries()
        .map(|(name, frame)| {
            tracing::debug!(map = name, "Fitting calibration");

            frame
                .scale()
                .map(|scale| (*name, scale))
                .map_err(|source| MapError::Calibration {
                    map: (*name).to_owned(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    scales.sort_unstable_by_key(|(name, _)| *name);

    Ok(scales)
}

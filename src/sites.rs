//! Observer-site rules: mount limits for the LCOGT telescope network,
//! altitude-to-airmass conversion and the radar-site daylight rule.

use crate::constants::{Degree, Hour, DEGREES_PER_HOUR, NO_AIRMASS_CUTOFF};

/// MPC codes of the LCOGT 1.0 m telescopes.
const LCO_1M0_SITES: [&str; 10] = [
    "V37", "V39", "W85", "W86", "W87", "K91", "K92", "K93", "Q63", "Q64",
];

/// MPC codes of the LCOGT 0.4 m telescopes.
const LCO_0M4_SITES: [&str; 10] = [
    "Z17", "Z21", "Q58", "Q59", "T03", "T04", "W89", "W79", "V38", "L09",
];

/// Negative/positive hour-angle limits and the altitude limit (all in degrees)
/// for a telescope, looked up by MPC site code (e.g. `V37`) or by LCOGT
/// designation (e.g. `OGG-CLMA-2M0A`). Sites outside the LCOGT network get
/// the generic (±180°, 25°) limits.
///
/// Argument
/// --------
/// * `site_code_or_name`: MPC site code or LCOGT telescope designation
///
/// Return
/// ------
/// * `(ha_neg_limit, ha_pos_limit, alt_limit)` in degrees
pub fn mount_limits(site_code_or_name: &str) -> (Degree, Degree, Degree) {
    let site = site_code_or_name.to_uppercase();

    if site.contains("-1M0A") || LCO_1M0_SITES.contains(&site.as_str()) {
        (-4.5 * DEGREES_PER_HOUR, 4.5 * DEGREES_PER_HOUR, 30.0)
    } else if site.contains("-AQWA")
        || site.contains("-AQWB")
        || site.contains("CLMA-0M4")
        || LCO_0M4_SITES.contains(&site.as_str())
    {
        (-4.5 * DEGREES_PER_HOUR, 4.46 * DEGREES_PER_HOUR, 15.0)
    } else {
        (-12.0 * DEGREES_PER_HOUR, 12.0 * DEGREES_PER_HOUR, 25.0)
    }
}

/// Hour angle cutoff in hours from the mount limits, the larger of the two
/// absolute limits.
pub fn hour_angle_cutoff(ha_neg_limit: Degree, ha_pos_limit: Degree) -> Hour {
    ha_neg_limit.abs().max(ha_pos_limit.abs()) / DEGREES_PER_HOUR
}

/// Airmass cutoff equivalent to an altitude limit.
///
/// A non-positive altitude limit disables the cut (HORIZONS treats an
/// airmass of 99 as unlimited).
///
/// Argument
/// --------
/// * `alt_limit`: minimum observable altitude in degrees
///
/// Return
/// ------
/// * The airmass value to send as the `AIRMASS` parameter
pub fn airmass_from_altitude(alt_limit: Degree) -> f64 {
    if alt_limit > 0.0 {
        1.0 / (90.0 - alt_limit).to_radians().cos()
    } else {
        NO_AIRMASS_CUTOFF
    }
}

/// Radar sites (negative MPC codes) observe through daylight.
pub fn is_radar_site(site_code: &str) -> bool {
    site_code.starts_with('-')
}

#[cfg(test)]
mod sites_test {
    use super::*;

    #[test]
    fn test_mount_limits_1m0() {
        assert_eq!(mount_limits("V37"), (-67.5, 67.5, 30.0));
        assert_eq!(mount_limits("ELP-DOMA-1M0A"), (-67.5, 67.5, 30.0));
        // lookup is case insensitive for designations
        assert_eq!(mount_limits("elp-doma-1m0a"), (-67.5, 67.5, 30.0));
    }

    #[test]
    fn test_mount_limits_0m4() {
        let (neg, pos, alt) = mount_limits("Z17");
        assert_eq!(neg, -67.5);
        assert!((pos - 66.9).abs() < 1e-9);
        assert_eq!(alt, 15.0);

        let (neg, pos, alt) = mount_limits("OGG-CLMA-0M4B");
        assert_eq!(neg, -67.5);
        assert!((pos - 66.9).abs() < 1e-9);
        assert_eq!(alt, 15.0);
    }

    #[test]
    fn test_mount_limits_default() {
        assert_eq!(mount_limits("F51"), (-180.0, 180.0, 25.0));
        assert_eq!(mount_limits("OGG-CLMA-2M0A"), (-180.0, 180.0, 25.0));
        assert_eq!(mount_limits("500"), (-180.0, 180.0, 25.0));
    }

    #[test]
    fn test_hour_angle_cutoff() {
        assert_eq!(hour_angle_cutoff(-67.5, 67.5), 4.5);
        assert_eq!(hour_angle_cutoff(-67.5, 66.9), 4.5);
        assert_eq!(hour_angle_cutoff(-180.0, 180.0), 12.0);
    }

    #[test]
    fn test_airmass_from_altitude() {
        assert_eq!(airmass_from_altitude(0.0), 99.0);
        assert_eq!(airmass_from_altitude(-5.0), 99.0);
        assert!((airmass_from_altitude(30.0) - 2.0).abs() < 1e-12);
        assert!((airmass_from_altitude(90.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_radar_site() {
        assert!(is_radar_site("-1"));
        assert!(is_radar_site("-73"));
        assert!(!is_radar_site("F51"));
    }
}

//! Formatting SI values back into display text.

use crate::{FieldKind, UnitSystem, METERS_PER_INCH, SQUARE_METERS_PER_SQUARE_FOOT};

/// Eighths of an inch per foot.
const EIGHTHS_PER_FOOT: i64 = 12 * 8;

/// Render an SI value for one HUD field in the active unit system.
///
/// Metric lengths are fixed three-decimal meters; imperial lengths
/// are feet and inches rounded to the nearest eighth of an inch, with
/// the fraction reduced. Angles are one-decimal degrees in either
/// system; areas use the system's area unit (m2 / sq ft) independent
/// of the length display.
pub fn format_value(value: f64, kind: FieldKind, system: UnitSystem) -> String {
    match (kind, system) {
        (FieldKind::Angle, _) => format!("{value:.1}"),
        (FieldKind::Area, UnitSystem::Metric) => format!("{value:.3}"),
        (FieldKind::Area, UnitSystem::Imperial) => {
            format!("{:.3}", value / SQUARE_METERS_PER_SQUARE_FOOT)
        }
        (_, UnitSystem::Metric) => format!("{value:.3}"),
        (_, UnitSystem::Imperial) => format_feet_inches(value),
    }
}

/// `F'-I"` with the inch remainder rounded to the nearest eighth.
fn format_feet_inches(meters: f64) -> String {
    let sign = if meters < 0.0 { "-" } else { "" };
    let eighths = (meters.abs() / METERS_PER_INCH * 8.0).round() as i64;
    let feet = eighths / EIGHTHS_PER_FOOT;
    let rem = eighths % EIGHTHS_PER_FOOT;
    let inches = rem / 8;
    let frac = rem % 8;
    if frac == 0 {
        format!("{sign}{feet}'-{inches}\"")
    } else {
        let d = gcd(frac, 8);
        format!("{sign}{feet}'-{inches} {}/{}\"", frac / d, 8 / d)
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_value;

    #[test]
    fn test_metric_length() {
        assert_eq!(
            format_value(0.762, FieldKind::Distance, UnitSystem::Metric),
            "0.762"
        );
        assert_eq!(
            format_value(-1.5, FieldKind::CoordX, UnitSystem::Metric),
            "-1.500"
        );
    }

    #[test]
    fn test_imperial_whole_inches() {
        assert_eq!(
            format_value(0.762, FieldKind::Distance, UnitSystem::Imperial),
            "2'-6\""
        );
        assert_eq!(
            format_value(0.3048, FieldKind::Distance, UnitSystem::Imperial),
            "1'-0\""
        );
    }

    #[test]
    fn test_imperial_fraction_reduced() {
        // 30.25 inches: 2'-6 1/4".
        let v = 30.25 * METERS_PER_INCH;
        assert_eq!(
            format_value(v, FieldKind::Distance, UnitSystem::Imperial),
            "2'-6 1/4\""
        );
        // 0.5 inches reduces from 4/8.
        let v = 0.5 * METERS_PER_INCH;
        assert_eq!(
            format_value(v, FieldKind::Distance, UnitSystem::Imperial),
            "0'-0 1/2\""
        );
    }

    #[test]
    fn test_imperial_negative() {
        assert_eq!(
            format_value(-0.762, FieldKind::Distance, UnitSystem::Imperial),
            "-2'-6\""
        );
    }

    #[test]
    fn test_angle_one_decimal() {
        assert_eq!(format_value(45.0, FieldKind::Angle, UnitSystem::Imperial), "45.0");
        assert_eq!(format_value(30.25, FieldKind::Angle, UnitSystem::Metric), "30.2");
    }

    #[test]
    fn test_area_units() {
        assert_eq!(format_value(2.0, FieldKind::Area, UnitSystem::Metric), "2.000");
        let two_sq_ft = 2.0 * SQUARE_METERS_PER_SQUARE_FOOT;
        assert_eq!(
            format_value(two_sq_ft, FieldKind::Area, UnitSystem::Imperial),
            "2.000"
        );
    }

    #[test]
    fn test_formatted_imperial_reparses() {
        let text = format_value(0.762, FieldKind::Distance, UnitSystem::Imperial);
        let back = parse_value(&text, FieldKind::Distance, UnitSystem::Imperial).unwrap();
        assert!((back - 0.762).abs() < 1e-9);

        let text = format_value(-0.762, FieldKind::Distance, UnitSystem::Imperial);
        let back = parse_value(&text, FieldKind::Distance, UnitSystem::Imperial).unwrap();
        assert!((back + 0.762).abs() < 1e-9);
    }
}

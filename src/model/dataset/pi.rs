/// The first decimals of pi after the decimal point.
pub const PI_DECIMALS: &str = concat!(
    "14159265358979323846264338327950288419716939937510582097494459230781640628620899",
    "86280348253421170679821480865132823066470938446095505822317253594081284811174502",
    "84102701938521105559644622948954930381964428810975665933446128475648233786783165",
    "27120190914564856692346034861045432664821339360726024914127372458700660631558817",
    "48815209209628292540917153643678925903600113305305488204665213841469519415116094",
    "33057270365759591953092186117381932611793105118548074462379962749567351885752724",
    "89122793818301194912983367336244065664308602139494639522473719070217986094370277",
    "05392171762931767523846748184676694051320005681271452635608277857713427577896091",
    "73637178721468440901224953430146549585371050792279689258923542019956112129021960",
    "86403441815981362977477130996051870721134999999837297804995105973173281609631859",
    "50244594553469083026425223082533446850352619311881710100031378387528865875332083",
    "81420617177669147303598253490428755468731159562863882353787593751957781857780532",
    "1712268066130019278766111959092164201989",
);

/// The decimal at `position` (zero-based, after the point), if known.
pub fn digit_at(position: usize) -> Option<u8> {
    PI_DECIMALS
        .as_bytes()
        .get(position)
        .map(|byte| byte - b'0')
}

/// Up to `count` decimals immediately before `position`.
pub fn digits_before(position: usize, count: usize) -> &'static str {
    let end = position.min(PI_DECIMALS.len());
    &PI_DECIMALS[end.saturating_sub(count)..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousand_decimals() {
        assert_eq!(PI_DECIMALS.len(), 1000);
        assert!(PI_DECIMALS.bytes().all(|b| b.is_ascii_digit()));
        assert!(PI_DECIMALS.starts_with("14159265358979"));
    }

    #[test]
    fn lookups() {
        assert_eq!(digit_at(0), Some(1));
        assert_eq!(digit_at(1), Some(4));
        assert_eq!(digit_at(999), Some(9));
        assert_eq!(digit_at(1000), None);
        assert_eq!(digits_before(0, 10), "");
        assert_eq!(digits_before(3, 10), "141");
        assert_eq!(digits_before(12, 10), "1592653589");
    }
}

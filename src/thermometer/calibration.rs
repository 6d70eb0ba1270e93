//! Thermistor linearization table.
//!
//! The thermistor sits in a divider with a 1.5 kOhm series resistor. The table was
//! fitted from measurements against a thermocouple and is indexed by the 8 most
//! significant bits of the conversion result.
//!
//! Generated by `ThermistorCalibration/compute_coefficients.py` (three-term
//! Steinhart-Hart fit) with `-R 1500 -B 10 -L 8 -D 2`.

use static_assertions::const_assert;

use super::{hundredths, Celsius};

/// Number of entries, one per 8-bit ADC code.
pub const TABLE_LEN: usize = 256;

/// Table entries in hundredths of a degree Celsius.
const CENTI_CELSIUS: [i32; TABLE_LEN] = [
    -6689, -5398, -4736, -4276, -3919, -3624, -3371, -3149,
    -2951, -2772, -2607, -2455, -2314, -2181, -2056, -1937,
    -1825, -1717, -1615, -1517, -1422, -1331, -1243, -1158,
    -1076, -996, -918, -843, -769, -697, -627, -559,
    -492, -426, -362, -299, -237, -177, -117, -59,
    -1, 56, 112, 167, 221, 275, 327, 380,
    431, 482, 532, 582, 631, 680, 728, 776,
    823, 870, 916, 962, 1008, 1053, 1098, 1142,
    1186, 1230, 1274, 1317, 1360, 1403, 1445, 1488,
    1530, 1571, 1613, 1654, 1695, 1736, 1777, 1818,
    1858, 1898, 1938, 1978, 2018, 2058, 2098, 2137,
    2176, 2216, 2255, 2294, 2333, 2372, 2411, 2449,
    2488, 2527, 2565, 2604, 2642, 2681, 2719, 2758,
    2796, 2835, 2873, 2911, 2950, 2988, 3026, 3065,
    3103, 3142, 3180, 3219, 3257, 3296, 3334, 3373,
    3412, 3451, 3489, 3528, 3567, 3606, 3646, 3685,
    3724, 3764, 3803, 3843, 3883, 3923, 3963, 4003,
    4044, 4084, 4125, 4166, 4207, 4248, 4289, 4331,
    4372, 4414, 4456, 4499, 4541, 4584, 4627, 4670,
    4714, 4757, 4801, 4846, 4890, 4935, 4980, 5026,
    5071, 5117, 5164, 5211, 5258, 5305, 5353, 5401,
    5450, 5499, 5549, 5599, 5649, 5700, 5751, 5803,
    5855, 5908, 5962, 6016, 6070, 6126, 6182, 6238,
    6295, 6353, 6412, 6471, 6531, 6592, 6654, 6716,
    6779, 6844, 6909, 6975, 7043, 7111, 7180, 7251,
    7323, 7396, 7470, 7546, 7623, 7702, 7782, 7864,
    7947, 8032, 8120, 8209, 8300, 8393, 8489, 8587,
    8687, 8790, 8896, 9006, 9118, 9234, 9353, 9476,
    9604, 9735, 9872, 10014, 10161, 10314, 10474, 10641,
    10816, 11000, 11192, 11395, 11610, 11838, 12080, 12339,
    12616, 12915, 13239, 13593, 13981, 14412, 14894, 15441,
    16071, 16812, 17705, 18824, 20299, 22420, 26013, 63092,
];

const_assert!(is_non_decreasing(&CENTI_CELSIUS));

/// Temperature for each raw ADC code, converted to [`Celsius`] at compile time.
pub static CALIBRATION_TABLE: [Celsius; TABLE_LEN] = {
    let mut table = [Celsius::ZERO; TABLE_LEN];
    let mut i = 0;
    while i < TABLE_LEN {
        table[i] = hundredths(CENTI_CELSIUS[i]);
        i += 1;
    }
    table
};

/// Looks up the temperature of a raw 8-bit ADC code. No interpolation.
#[inline]
pub fn lookup(code: u8) -> Celsius {
    CALIBRATION_TABLE[usize::from(code)]
}

const fn is_non_decreasing(table: &[i32]) -> bool {
    let mut i = 1;
    while i < table.len() {
        if table[i] < table[i - 1] {
            return false;
        }
        i += 1;
    }
    true
}

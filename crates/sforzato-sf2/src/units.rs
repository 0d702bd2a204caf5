//! Fixed-point unit conversions for generator values.
//!
//! The source format speaks in percent, decibels, seconds and Hertz; the
//! target stores 16-bit words in timecents, centibels and absolute cents.
//! Everything that crosses that boundary goes through here.

/// Attenuation floor used when a percentage reaches silence.
pub const SILENCE_DB: f64 = -144.0;

/// Real decibels played per stored attenuation dB unit.
///
/// The synthesis model attenuates 0.4 dB for every stored dB, so real-dB
/// values are divided by this before encoding.
pub const ATTENUATION_DB_PER_UNIT: f64 = 0.4;

/// Pan units per source-format percent (±100 % maps to ±500 units).
pub const PAN_UNITS_PER_PERCENT: f64 = 5.0;

/// Largest representable pan magnitude.
pub const PAN_MAX: f64 = 500.0;

/// Convert a percentage (0..=100) to decibels relative to full level.
///
/// 100 % is 0 dB, 50 % is about -6 dB. Zero or negative percentages map
/// to [`SILENCE_DB`].
pub fn percent_to_db(percent: f64) -> f64 {
    if percent <= 0.0 {
        SILENCE_DB
    } else {
        20.0 * (percent / 100.0).log10()
    }
}

/// Encode an attenuation in real dB as stored attenuation units.
///
/// Clamped to the representable field range 0..=1440 (amplification is
/// not expressible).
pub fn db_to_attenuation(db: f64) -> i16 {
    let raw = (10.0 * db / ATTENUATION_DB_PER_UNIT).round();
    raw.clamp(0.0, 1440.0) as i16
}

/// Encode a duration in seconds as timecents.
///
/// Zero and negative durations map to the field minimum -12000
/// (instantaneous).
pub fn seconds_to_timecents(seconds: f64) -> i16 {
    if seconds <= 0.0 {
        -12000
    } else {
        let raw = (1200.0 * seconds.log2()).round();
        raw.clamp(-12000.0, 8000.0) as i16
    }
}

/// Encode a frequency in Hertz as absolute cents (8.176 Hz = 0 cents).
pub fn hertz_to_cents(hertz: f64) -> i16 {
    if hertz <= 0.0 {
        -16000
    } else {
        let raw = (1200.0 * (hertz / 8.176).log2()).round();
        raw.clamp(-16000.0, 16000.0) as i16
    }
}

/// Encode a volume-envelope sustain percentage as attenuation centibels.
///
/// 100 % sustain is 0 cB (no drop); lower percentages attenuate.
pub fn sustain_percent_to_attenuation(percent: f64) -> i16 {
    let raw = (-10.0 * percent_to_db(percent)).round();
    raw.clamp(0.0, 1440.0) as i16
}

/// Encode a modulation-envelope sustain percentage as tenths of a percent
/// of depth decrease.
pub fn sustain_percent_to_depth(percent: f64) -> i16 {
    let raw = (10.0 * (100.0 - percent)).round();
    raw.clamp(0.0, 1000.0) as i16
}

/// Clamp a pan value (in target units) into the representable range and
/// round it to a field word.
pub fn clamp_pan(units: f64) -> i16 {
    units.round().clamp(-PAN_MAX, PAN_MAX) as i16
}

//! LDR (GL5528-class photoresistor) light sensor conversion.
//!
//! Wired in a voltage divider: LDR from 3V3 to the ADC pin, fixed 10 kOhm
//! from the ADC pin to ground, read by the 12-bit ADC. Brighter light means
//! lower LDR resistance and a higher ADC count. Illuminance follows the
//! usual datasheet approximation `lux = 500 / R(kOhm)`.
//!
//! The raw count is the authoritative channel value; lux is derived for
//! display and telemetry only.

const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;
const R_FIXED: f32 = 10_000.0;
const LUX_PER_KOHM: f32 = 500.0;

/// Upper clamp for a saturated divider.
pub const LUX_MAX: f32 = 10_000.0;

/// Convert a raw ADC count into lux.
///
/// Out-of-range counts are clamped to the ADC span. NaN propagates so a
/// faulted read stays visible downstream.
pub fn raw_to_lux(raw: f32) -> f32 {
    if raw.is_nan() {
        return f32::NAN;
    }
    let voltage = (raw.clamp(0.0, ADC_MAX) / ADC_MAX) * V_REF;
    if voltage <= 0.01 {
        return 0.0;
    }
    if voltage >= V_REF - 0.01 {
        return LUX_MAX;
    }
    let r_ldr_kohm = R_FIXED * (V_REF - voltage) / voltage / 1000.0;
    (LUX_PER_KOHM / r_ldr_kohm).min(LUX_MAX)
}

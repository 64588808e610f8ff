//! Built-in implementation of [`IndexLibrary`] using textbook parcel theory.
//!
//! Environmental values at mandatory levels are interpolated linearly in
//! `ln(p)`. Parcels follow a dry adiabat to their LCL (Bolton 1980) and a
//! pseudo-adiabat above it, integrated with fixed-step RK4.

use super::indices::{IndexError, IndexLibrary, IndexOutput};
use crate::units::{Celsius, Hectopascals, ZERO_CELSIUS_IN_KELVIN};

/// Gas constant of dry air, J/(kg K).
const RD: f64 = 287.047;
/// Specific heat of dry air at constant pressure, J/(kg K).
const CP: f64 = 1004.67;
/// Latent heat of vaporization, J/kg.
const LV: f64 = 2.501e6;
/// Ratio of molecular weights of water vapour and dry air.
const EPSILON: f64 = 0.622;
const KAPPA: f64 = RD / CP;

/// Largest pressure step of the moist ascent, hPa.
const MOIST_STEP_HPA: f64 = 2.0;
/// Upper bound on RK4 steps for one ascent.
const MAX_MOIST_STEPS: f64 = 1000.0;

/// Highest pressure accepted as a physical level, hPa.
const MAX_PRESSURE_HPA: f64 = 1100.0;

const LEVEL_850: f64 = 850.0;
const LEVEL_700: f64 = 700.0;
const LEVEL_500: f64 = 500.0;

/// Minimum number of levels any index needs.
const MIN_LEVELS: usize = 2;

/// K-Index, Lifted Index and Showalter Index computed in-process.
///
/// K-Index is returned as a scalar; the parcel indices are returned as a
/// one-element array (the 500 hPa difference).
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinIndices;

impl IndexLibrary for BuiltinIndices {
    fn k_index(
        &self,
        pressure: &[Hectopascals],
        temperature: &[Celsius],
        dew_point: &[Celsius],
    ) -> Result<IndexOutput, IndexError> {
        let snd = Sounding::new(pressure, temperature, dew_point)?;
        let t850 = snd.temperature_at(LEVEL_850)?;
        let td850 = snd.dew_point_at(LEVEL_850)?;
        let t700 = snd.temperature_at(LEVEL_700)?;
        let td700 = snd.dew_point_at(LEVEL_700)?;
        let t500 = snd.temperature_at(LEVEL_500)?;

        Ok(IndexOutput::Scalar((t850 - t500) + td850 - (t700 - td700)))
    }

    fn lifted_index(
        &self,
        pressure: &[Hectopascals],
        temperature: &[Celsius],
        dew_point: &[Celsius],
    ) -> Result<IndexOutput, IndexError> {
        let snd = Sounding::new(pressure, temperature, dew_point)?;
        let (p0, t0, td0) = snd.surface();
        let env = snd.temperature_at(LEVEL_500)?;
        let parcel = parcel_temperature_at(p0, t0, td0, LEVEL_500);

        Ok(IndexOutput::Levels(vec![env - parcel]))
    }

    fn showalter_index(
        &self,
        pressure: &[Hectopascals],
        temperature: &[Celsius],
        dew_point: &[Celsius],
    ) -> Result<IndexOutput, IndexError> {
        let snd = Sounding::new(pressure, temperature, dew_point)?;
        let t850 = snd.temperature_at(LEVEL_850)?;
        let td850 = snd.dew_point_at(LEVEL_850)?;
        let env = snd.temperature_at(LEVEL_500)?;
        let parcel = parcel_temperature_at(LEVEL_850, t850, td850, LEVEL_500);

        Ok(IndexOutput::Levels(vec![env - parcel]))
    }
}

// ---------------------------------------------------------------------------
// Environmental profile
// ---------------------------------------------------------------------------

/// Validated view over the three arrays, surface first.
struct Sounding {
    pressure: Vec<f64>,
    temperature: Vec<f64>,
    dew_point: Vec<f64>,
}

impl Sounding {
    fn new(
        pressure: &[Hectopascals],
        temperature: &[Celsius],
        dew_point: &[Celsius],
    ) -> Result<Self, IndexError> {
        if pressure.len() != temperature.len() || pressure.len() != dew_point.len() {
            return Err(IndexError::LengthMismatch);
        }
        if pressure.len() < MIN_LEVELS {
            return Err(IndexError::InsufficientLevels {
                found: pressure.len(),
                needed: MIN_LEVELS,
            });
        }
        if let Some(bad) = pressure
            .iter()
            .map(|p| p.value())
            .find(|&p| p <= 0.0 || p > MAX_PRESSURE_HPA)
        {
            return Err(IndexError::OutOfRange { level: bad });
        }
        Ok(Sounding {
            pressure: pressure.iter().map(|p| p.value()).collect(),
            temperature: temperature.iter().map(|t| t.value()).collect(),
            dew_point: dew_point.iter().map(|t| t.value()).collect(),
        })
    }

    fn surface(&self) -> (f64, f64, f64) {
        (self.pressure[0], self.temperature[0], self.dew_point[0])
    }

    fn temperature_at(&self, level: f64) -> Result<f64, IndexError> {
        log_p_interpolate(&self.pressure, &self.temperature, level)
    }

    fn dew_point_at(&self, level: f64) -> Result<f64, IndexError> {
        log_p_interpolate(&self.pressure, &self.dew_point, level)
    }
}

/// Interpolate `values` at `level` on a pressure axis ordered surface first.
fn log_p_interpolate(pressure: &[f64], values: &[f64], level: f64) -> Result<f64, IndexError> {
    if let Some(i) = pressure.iter().position(|&p| p == level) {
        return Ok(values[i]);
    }

    for (i, w) in pressure.windows(2).enumerate() {
        let (p_below, p_above) = (w[0], w[1]);
        if p_below > level && level > p_above {
            let frac = (level.ln() - p_below.ln()) / (p_above.ln() - p_below.ln());
            return Ok(values[i] + frac * (values[i + 1] - values[i]));
        }
    }

    Err(IndexError::OutOfRange { level })
}

// ---------------------------------------------------------------------------
// Parcel thermodynamics
// ---------------------------------------------------------------------------

/// Saturation vapour pressure over water, hPa (Bolton 1980).
fn saturation_vapor_pressure(t_celsius: f64) -> f64 {
    6.112 * (17.67 * t_celsius / (t_celsius + 243.5)).exp()
}

/// Saturation mixing ratio, kg/kg.
fn saturation_mixing_ratio(p_hpa: f64, t_kelvin: f64) -> f64 {
    let es = saturation_vapor_pressure(t_kelvin - ZERO_CELSIUS_IN_KELVIN);
    EPSILON * es / (p_hpa - es)
}

/// Pressure (hPa) and temperature (K) of the lifting condensation level.
fn lcl(p_hpa: f64, t_kelvin: f64, td_kelvin: f64) -> (f64, f64) {
    let t_lcl = 1.0 / (1.0 / (td_kelvin - 56.0) + (t_kelvin / td_kelvin).ln() / 800.0) + 56.0;
    let p_lcl = p_hpa * (t_lcl / t_kelvin).powf(1.0 / KAPPA);
    (p_lcl, t_lcl)
}

/// dT/dp along a pseudo-adiabat, K/hPa.
fn moist_lapse_rate(p_hpa: f64, t_kelvin: f64) -> f64 {
    let rs = saturation_mixing_ratio(p_hpa, t_kelvin);
    let numerator = RD * t_kelvin + LV * rs;
    let denominator = CP + LV * LV * rs * EPSILON / (RD * t_kelvin * t_kelvin);
    numerator / denominator / p_hpa
}

/// Temperature (K) reached by following a pseudo-adiabat from
/// (`p_start`, `t_start`) to `p_end`.
fn moist_ascent(p_start: f64, t_start: f64, p_end: f64) -> f64 {
    let steps = ((p_start - p_end).abs() / MOIST_STEP_HPA)
        .ceil()
        .clamp(1.0, MAX_MOIST_STEPS) as usize;
    let h = (p_end - p_start) / steps as f64;

    let mut p = p_start;
    let mut t = t_start;
    for _ in 0..steps {
        let k1 = moist_lapse_rate(p, t);
        let k2 = moist_lapse_rate(p + h / 2.0, t + h / 2.0 * k1);
        let k3 = moist_lapse_rate(p + h / 2.0, t + h / 2.0 * k2);
        let k4 = moist_lapse_rate(p + h, t + h * k3);
        t += h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
        p += h;
    }
    t
}

/// Temperature (°C) of a parcel lifted from (`p0`, `t0`, `td0`) to `p_end`.
fn parcel_temperature_at(p0: f64, t0: f64, td0: f64, p_end: f64) -> f64 {
    let t0_k = Celsius(t0).to_kelvin();
    let td0_k = Celsius(td0.min(t0)).to_kelvin();
    let (p_lcl, t_lcl) = lcl(p0, t0_k, td0_k);

    let t_end = if p_lcl <= p_end {
        t0_k * (p_end / p0).powf(KAPPA)
    } else {
        moist_ascent(p_lcl, t_lcl, p_end)
    };
    Celsius::from_kelvin(t_end).value()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrays(levels: &[(f64, f64, f64)]) -> (Vec<Hectopascals>, Vec<Celsius>, Vec<Celsius>) {
        (
            levels.iter().map(|l| Hectopascals(l.0)).collect(),
            levels.iter().map(|l| Celsius(l.1)).collect(),
            levels.iter().map(|l| Celsius(l.2)).collect(),
        )
    }

    fn scalar(out: IndexOutput) -> f64 {
        out.reduce().unwrap()
    }

    #[test]
    fn k_index_uses_mandatory_levels() {
        let (p, t, td) = arrays(&[
            (1000.0, 25.0, 20.0),
            (850.0, 15.0, 10.0),
            (700.0, 5.0, -2.0),
            (500.0, -10.0, -30.0),
        ]);
        let k = scalar(BuiltinIndices.k_index(&p, &t, &td).unwrap());
        // (15 - -10) + 10 - (5 - -2)
        assert!((k - 28.0).abs() < 1e-9);
    }

    #[test]
    fn interpolation_is_linear_in_log_pressure() {
        let p = [1000.0, 500.0];
        let v = [10.0, -10.0];
        let mid = (1000.0f64 * 500.0).sqrt();
        let value = log_p_interpolate(&p, &v, mid).unwrap();
        assert!(value.abs() < 1e-9);
        assert_eq!(log_p_interpolate(&p, &v, 500.0).unwrap(), -10.0);
    }

    #[test]
    fn levels_outside_profile_are_errors() {
        let (p, t, td) = arrays(&[(1000.0, 25.0, 20.0), (800.0, 12.0, 5.0)]);
        assert_eq!(
            BuiltinIndices.k_index(&p, &t, &td),
            Err(IndexError::OutOfRange { level: 700.0 })
        );

        let (p, t, td) = arrays(&[(800.0, 12.0, 5.0), (400.0, -20.0, -30.0)]);
        assert_eq!(
            BuiltinIndices.showalter_index(&p, &t, &td),
            Err(IndexError::OutOfRange { level: 850.0 })
        );
    }

    #[test]
    fn single_level_is_insufficient() {
        let (p, t, td) = arrays(&[(1000.0, 25.0, 20.0)]);
        assert_eq!(
            BuiltinIndices.lifted_index(&p, &t, &td),
            Err(IndexError::InsufficientLevels { found: 1, needed: 2 })
        );
    }

    #[test]
    fn mismatched_arrays_are_rejected() {
        let p = [Hectopascals(1000.0), Hectopascals(500.0)];
        let t = [Celsius(20.0)];
        let td = [Celsius(10.0), Celsius(-20.0)];
        assert_eq!(
            BuiltinIndices.k_index(&p, &t, &td),
            Err(IndexError::LengthMismatch)
        );
    }

    #[test]
    fn dry_parcel_follows_dry_adiabat() {
        // Very dry surface air: LCL sits above 500 hPa.
        let (p, t, td) = arrays(&[(1000.0, 20.0, -40.0), (500.0, -20.0, -40.0)]);
        let li = scalar(BuiltinIndices.lifted_index(&p, &t, &td).unwrap());
        let parcel = (20.0 + ZERO_CELSIUS_IN_KELVIN) * 0.5f64.powf(KAPPA) - ZERO_CELSIUS_IN_KELVIN;
        assert!((li - (-20.0 - parcel)).abs() < 1e-9);
    }

    #[test]
    fn warm_moist_surface_is_unstable() {
        let (p, t, td) = arrays(&[
            (1000.0, 30.0, 24.0),
            (850.0, 18.0, 14.0),
            (700.0, 6.0, 0.0),
            (500.0, -15.0, -25.0),
        ]);
        let li = scalar(BuiltinIndices.lifted_index(&p, &t, &td).unwrap());
        assert!(li < -3.0, "li = {li}");
    }

    #[test]
    fn cold_dry_surface_is_stable() {
        let (p, t, td) = arrays(&[
            (1000.0, 10.0, -10.0),
            (850.0, 2.0, -15.0),
            (700.0, -5.0, -25.0),
            (500.0, -10.0, -40.0),
        ]);
        let li = scalar(BuiltinIndices.lifted_index(&p, &t, &td).unwrap());
        let si = scalar(BuiltinIndices.showalter_index(&p, &t, &td).unwrap());
        assert!(li > 0.0, "li = {li}");
        assert!(si > 0.0, "si = {si}");
    }

    #[test]
    fn unphysical_pressure_is_rejected() {
        let (p, t, td) = arrays(&[(1e12, 25.0, 20.0), (500.0, -10.0, -30.0)]);
        assert_eq!(
            BuiltinIndices.lifted_index(&p, &t, &td),
            Err(IndexError::OutOfRange { level: 1e12 })
        );

        let (p, t, td) = arrays(&[(f64::MAX, 25.0, 20.0), (850.0, 15.0, 10.0), (500.0, -10.0, -30.0)]);
        assert!(matches!(
            BuiltinIndices.showalter_index(&p, &t, &td),
            Err(IndexError::OutOfRange { .. })
        ));
    }

    #[test]
    fn moist_ascent_step_count_is_bounded() {
        // Returns promptly however far apart the end points are.
        let started = std::time::Instant::now();
        moist_ascent(1e8, 300.0, 500.0);
        moist_ascent(f64::MAX, 300.0, 500.0);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn moist_ascent_cools_slower_than_dry() {
        let t_start = 20.0 + ZERO_CELSIUS_IN_KELVIN;
        let moist = moist_ascent(1000.0, t_start, 700.0);
        let dry = t_start * 0.7f64.powf(KAPPA);
        assert!(moist > dry);
        assert!(moist < t_start);
    }
}

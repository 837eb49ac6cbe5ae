// Fuel-burn projection across hypothetical mixture settings.

use serde::Serialize;

use crate::model::Lap;

/// One discrete fuel-mixture configuration. Richer settings trade fuel range
/// for lap time; the multiplier scales the source lap's measured consumption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixtureSetting {
    pub id: i32,
    pub multiplier: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuelModelConfig {
    /// Ordered weakest to richest; projection rows keep this order.
    pub settings: Vec<MixtureSetting>,
    /// Setting the source lap was driven on.
    pub source_setting: i32,
    /// Lap-time cost of stepping one setting leaner. An approximation kept
    /// as a tunable input until validated against real telemetry.
    pub lap_time_delta_per_step_ms: i64,
}

impl Default for FuelModelConfig {
    fn default() -> Self {
        // Eleven relative steps around the current setting, id 0 being the
        // lap's own mixture.
        let settings = (-5..=5)
            .map(|id| MixtureSetting {
                id,
                multiplier: 1.0 - id as f32 * 0.1,
            })
            .collect();
        Self {
            settings,
            source_setting: 0,
            lap_time_delta_per_step_ms: 500,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FuelMapRow {
    pub mixture_setting: i32,
    pub fuel_consumed_per_lap: f32,
    /// `None` means unbounded: this setting projects to zero consumption.
    pub laps_remaining: Option<f32>,
    pub time_remaining_ms: Option<u64>,
    /// Negative when this setting projects a faster lap than the source lap.
    pub lap_time_delta_ms: i64,
}

/// Projects the source lap's measured consumption onto every configured
/// mixture setting. Rows are independent of each other and ordered like the
/// config. A zero extrapolated consumption yields the unbounded sentinel
/// rather than a division fault.
pub fn fuel_projection(lap: &Lap, config: &FuelModelConfig) -> Vec<FuelMapRow> {
    let source_multiplier = config
        .settings
        .iter()
        .find(|setting| setting.id == config.source_setting)
        .map(|setting| setting.multiplier)
        .unwrap_or(1.0);

    let actual_consumption = lap.fuel_consumed();

    config
        .settings
        .iter()
        .map(|setting| {
            let extrapolated = if source_multiplier > 0.0 {
                actual_consumption * (setting.multiplier / source_multiplier)
            } else {
                actual_consumption
            };

            let laps_remaining = if extrapolated > 0.0 {
                Some(round_tenth(lap.fuel_at_end / extrapolated))
            } else {
                None
            };
            let time_remaining_ms =
                laps_remaining.map(|laps| (laps as f64 * lap.lap_time_ms as f64) as u64);

            let steps_leaner = (config.source_setting - setting.id) as i64;

            FuelMapRow {
                mixture_setting: setting.id,
                fuel_consumed_per_lap: extrapolated,
                laps_remaining,
                time_remaining_ms,
                lap_time_delta_ms: steps_leaner * config.lap_time_delta_per_step_ms,
            }
        })
        .collect()
}

fn round_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine

pub mod error;
pub mod model;
pub mod risk;
pub mod schedule;
pub mod simulation;
pub mod sleep;
pub mod types;

pub use error::{ConfigError, FatigueError, InputError};
pub use model::ModelParams;
pub use simulation::{simulate, simulate_batch, simulate_with_sleep, FatigueSimulator};
pub use sleep::predict_sleep;
pub use types::*;

use wasm_bindgen::prelude::*;

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl FatigueSimulator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self::default()
    }

    /// Simulator with a (possibly partial) parameter object.
    #[wasm_bindgen(js_name = withParams)]
    pub fn from_js_params(params: JsValue) -> Result<FatigueSimulator, JsValue> {
        let params: ModelParams = serde_wasm_bindgen::from_value(params).map_err(to_js_error)?;
        FatigueSimulator::with_params(params).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = defaultParams)]
    pub fn default_params() -> JsValue {
        serde_wasm_bindgen::to_value(&ModelParams::default()).unwrap_or(JsValue::NULL)
    }

    /// Duty periods in, `{sleep_periods, steps, summary}` out.
    #[wasm_bindgen(js_name = simulate)]
    pub fn simulate_js(&self, duty_periods: JsValue) -> Result<JsValue, JsValue> {
        let duties: Vec<DutyPeriod> = serde_wasm_bindgen::from_value(duty_periods).map_err(to_js_error)?;
        let result = self.run(&duties).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
    }

    /// Same as `simulate`, with the caller's sleep record in place of prediction.
    #[wasm_bindgen(js_name = simulateWithSleep)]
    pub fn simulate_with_sleep_js(&self, duty_periods: JsValue, sleep_periods: JsValue) -> Result<JsValue, JsValue> {
        let duties: Vec<DutyPeriod> = serde_wasm_bindgen::from_value(duty_periods).map_err(to_js_error)?;
        let sleeps: Vec<SleepPeriod> = serde_wasm_bindgen::from_value(sleep_periods).map_err(to_js_error)?;
        let result = self.run_with_sleep(&duties, &sleeps).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = predictSleep)]
    pub fn predict_sleep_js(&self, duty_periods: JsValue) -> Result<JsValue, JsValue> {
        let duties: Vec<DutyPeriod> = serde_wasm_bindgen::from_value(duty_periods).map_err(to_js_error)?;
        let sleeps = self.predict_sleep(&duties).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&sleeps).map_err(to_js_error)
    }

    /// Current parameters as a plain object.
    #[wasm_bindgen(getter)]
    pub fn parameters(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.params).unwrap_or(JsValue::NULL)
    }
}

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod counter;
pub mod deck;
pub mod error;
pub mod game;
pub mod hand;
mod logging;
pub mod sim;
pub mod strategy;

pub use counter::{CardCounter, HoleCardTiming};
pub use deck::{Card, Rank, Shoe, Suit};
pub use error::TableError;
pub use game::{CountView, HitView, Outcome, Phase, RoundView, Settlement, Table, TableConfig};
pub use hand::{score, Hand};
pub use strategy::{suggest, Action, Suggestion};

fn init_hooks() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
}

fn table_error(err: TableError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub fn run_simulation(params: &JsValue) -> Result<JsValue, JsValue> {
    init_hooks();
    let input: sim::SimulationInput = serde_wasm_bindgen::from_value(params.clone())
        .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))?;

    let result = sim::run(input)
        .map_err(|err| JsValue::from_str(&format!("Simulation failed: {err}")))?;

    to_js(&result)
}

#[wasm_bindgen]
pub fn run_simulation_with_progress(
    params: &JsValue,
    progress_callback: &Function,
) -> Result<JsValue, JsValue> {
    init_hooks();
    let input: sim::SimulationInput = serde_wasm_bindgen::from_value(params.clone())
        .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))?;

    let mut progress_cb = |current: u32, total: u32| {
        let _ = progress_callback.call2(
            &JsValue::NULL,
            &JsValue::from(current),
            &JsValue::from(total),
        );
    };

    let result = sim::run_with_progress(input, &mut progress_cb)
        .map_err(|err| JsValue::from_str(&format!("Simulation failed: {err}")))?;

    to_js(&result)
}

/// A single seat at the table, driven one call per button press.
#[wasm_bindgen]
pub struct WasmTable {
    table: Table,
}

#[wasm_bindgen]
impl WasmTable {
    #[wasm_bindgen(constructor)]
    pub fn new(config: &JsValue) -> Result<WasmTable, JsValue> {
        init_hooks();
        let config: TableConfig = if config.is_undefined() || config.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config.clone())
                .map_err(|err| JsValue::from_str(&format!("Invalid config: {err}")))?
        };
        let table = Table::new(config).map_err(table_error)?;
        Ok(WasmTable { table })
    }

    #[wasm_bindgen(js_name = newRound)]
    pub fn new_round(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.table.new_round().map_err(table_error)?)
    }

    pub fn hit(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.table.hit().map_err(table_error)?)
    }

    pub fn stand(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.table.stand().map_err(table_error)?)
    }

    #[wasm_bindgen(js_name = currentCount)]
    pub fn current_count(&self) -> Result<JsValue, JsValue> {
        to_js(&self.table.current_count())
    }

    #[wasm_bindgen(js_name = suggestMove)]
    pub fn suggest_move(&self) -> Result<JsValue, JsValue> {
        to_js(&self.table.suggest_move().map_err(table_error)?)
    }

    #[wasm_bindgen(js_name = abortRound)]
    pub fn abort_round(&mut self) -> Result<(), JsValue> {
        self.table.abort_round().map_err(table_error)
    }

    pub fn chips(&self) -> i64 {
        self.table.chips()
    }

    #[wasm_bindgen(js_name = shoeRemaining)]
    pub fn shoe_remaining(&self) -> usize {
        self.table.shoe_remaining()
    }
}

mod engine;
mod types;

pub use engine::{GrowthState, ReinvestState, advance_growth, advance_reinvest, simulate};
pub use types::{
    DEFAULT_INITIAL_SHARE_PRICE, GrowthModel, ModelKind, ProjectionModel, ReinvestModel,
    SimulationParameters, WITHDRAWAL_RATE, YearlyRecord,
};

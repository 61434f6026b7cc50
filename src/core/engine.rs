use super::types::{
    GrowthModel, ProjectionModel, ReinvestModel, SimulationParameters, YearlyRecord,
};

/// Running values of the growth model between two years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthState {
    pub monthly_invest: f64,
    pub total_principal: f64,
    pub asset: f64,
}

impl GrowthState {
    pub fn opening(params: &SimulationParameters) -> Self {
        Self {
            monthly_invest: params.monthly_invest,
            total_principal: params.seed_money,
            asset: params.seed_money,
        }
    }
}

/// Running values of the reinvestment model between two years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReinvestState {
    pub monthly_invest: f64,
    pub total_principal: f64,
    pub shares: f64,
    pub price_per_share: f64,
    pub dividend_yield: f64,
}

impl ReinvestState {
    pub fn opening(params: &SimulationParameters) -> Self {
        let price_per_share = params.initial_share_price;
        Self {
            monthly_invest: params.monthly_invest,
            total_principal: params.seed_money,
            shares: params.seed_money / price_per_share,
            price_per_share,
            dividend_yield: params.annual_dividend_yield,
        }
    }
}

/// Projects `params.years` yearly records. Zero years yields an empty vector.
///
/// Inputs are not validated here; out-of-range values simply flow through
/// the arithmetic (including overflow to infinity).
pub fn simulate(params: &SimulationParameters) -> Vec<YearlyRecord> {
    match params.model() {
        ProjectionModel::Growth(model) => {
            project(GrowthState::opening(params), params.years, |state, year| {
                advance_growth(state, year, &model)
            })
        }
        ProjectionModel::DividendReinvestment(model) => {
            project(ReinvestState::opening(params), params.years, |state, year| {
                advance_reinvest(state, year, &model)
            })
        }
    }
}

fn project<S: Copy>(
    opening: S,
    years: u32,
    mut advance: impl FnMut(S, u32) -> (S, YearlyRecord),
) -> Vec<YearlyRecord> {
    let mut records = Vec::with_capacity(years as usize);
    let mut state = opening;
    for year in 1..=years {
        let (next, record) = advance(state, year);
        records.push(record);
        state = next;
    }
    records
}

/// One year of the growth model. The year's contributions are added before
/// the single annual return is applied, so new money earns a full year.
pub fn advance_growth(
    state: GrowthState,
    year: u32,
    model: &GrowthModel,
) -> (GrowthState, YearlyRecord) {
    let yearly_invest = state.monthly_invest * 12.0;
    let mut asset = state.asset + yearly_invest;
    let total_principal = state.total_principal + yearly_invest;

    asset *= 1.0 + model.annual_return / 100.0;

    let record = YearlyRecord::new(year, state.monthly_invest, total_principal, asset, 0.0);
    let next = GrowthState {
        monthly_invest: state.monthly_invest + model.annual_invest_increase,
        total_principal,
        asset,
    };
    (next, record)
}

/// One year of the reinvestment model.
///
/// Order matters: contributions buy at last year's price, the price then
/// appreciates, the dividend is paid and reinvested at the new price, and
/// only afterwards does the yield grow for the following year.
pub fn advance_reinvest(
    state: ReinvestState,
    year: u32,
    model: &ReinvestModel,
) -> (ReinvestState, YearlyRecord) {
    let yearly_invest = state.monthly_invest * 12.0;
    let mut shares = state.shares + yearly_invest / state.price_per_share;
    let total_principal = state.total_principal + yearly_invest;

    let price_per_share = state.price_per_share * (1.0 + model.capital_growth / 100.0);

    let dividend_per_share = price_per_share * (state.dividend_yield / 100.0);
    let dividend = shares * dividend_per_share;
    let dividend_after_tax = dividend * (1.0 - model.tax_rate / 100.0);

    shares += dividend_after_tax / price_per_share;

    let dividend_yield = state.dividend_yield * (1.0 + model.dividend_growth / 100.0);
    let asset = shares * price_per_share;

    let record = YearlyRecord::new(
        year,
        state.monthly_invest,
        total_principal,
        asset,
        dividend_after_tax,
    );
    let next = ReinvestState {
        monthly_invest: state.monthly_invest + model.annual_invest_increase,
        total_principal,
        shares,
        price_per_share,
        dividend_yield,
    };
    (next, record)
}

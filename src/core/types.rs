use serde::Serialize;

/// Starting price-per-share of the reinvestment model when none is supplied.
pub const DEFAULT_INITIAL_SHARE_PRICE: f64 = 10_000.0;

/// Share of total assets assumed withdrawable each year under the 4% rule.
pub const WITHDRAWAL_RATE: f64 = 0.04;

/// Inputs for one projection run. Percentages are given as percent (10.0 = 10%).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub seed_money: f64,
    pub monthly_invest: f64,
    pub annual_invest_increase: f64,
    pub annual_return: f64,
    pub annual_dividend_yield: f64,
    pub dividend_growth: f64,
    pub capital_growth: f64,
    pub reinvest_dividend: bool,
    pub tax_rate: f64,
    pub years: u32,
    pub initial_share_price: f64,
}

impl SimulationParameters {
    pub fn model(&self) -> ProjectionModel {
        if self.reinvest_dividend {
            ProjectionModel::DividendReinvestment(ReinvestModel {
                capital_growth: self.capital_growth,
                dividend_growth: self.dividend_growth,
                tax_rate: self.tax_rate,
                annual_invest_increase: self.annual_invest_increase,
            })
        } else {
            ProjectionModel::Growth(GrowthModel {
                annual_return: self.annual_return,
                annual_invest_increase: self.annual_invest_increase,
            })
        }
    }
}

/// Rates that stay fixed for a whole growth-model run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GrowthModel {
    pub annual_return: f64,
    pub annual_invest_increase: f64,
}

/// Rates that stay fixed for a whole reinvestment-model run. The dividend
/// yield itself compounds, so it lives in the running state instead.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReinvestModel {
    pub capital_growth: f64,
    pub dividend_growth: f64,
    pub tax_rate: f64,
    pub annual_invest_increase: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ProjectionModel {
    Growth(GrowthModel),
    DividendReinvestment(ReinvestModel),
}

impl ProjectionModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            ProjectionModel::Growth(_) => ModelKind::Growth,
            ProjectionModel::DividendReinvestment(_) => ModelKind::DividendReinvestment,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    Growth,
    DividendReinvestment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRecord {
    pub year: u32,
    pub monthly_invest_this_year: f64,
    pub cumulative_principal: f64,
    pub total_asset: f64,
    pub annual_dividend_after_tax: f64,
    pub monthly_dividend_after_tax: f64,
    pub annual_withdrawal_4pct: f64,
    pub monthly_withdrawal_4pct: f64,
}

impl YearlyRecord {
    /// Builds a record, deriving the monthly dividend and both withdrawal
    /// figures from the year-end asset and after-tax dividend.
    pub fn new(
        year: u32,
        monthly_invest_this_year: f64,
        cumulative_principal: f64,
        total_asset: f64,
        annual_dividend_after_tax: f64,
    ) -> Self {
        let annual_withdrawal_4pct = total_asset * WITHDRAWAL_RATE;
        Self {
            year,
            monthly_invest_this_year,
            cumulative_principal,
            total_asset,
            annual_dividend_after_tax,
            monthly_dividend_after_tax: annual_dividend_after_tax / 12.0,
            annual_withdrawal_4pct,
            monthly_withdrawal_4pct: annual_withdrawal_4pct / 12.0,
        }
    }
}

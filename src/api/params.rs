use clap::{ArgAction, Args};
use serde::Deserialize;
use thiserror::Error;

use crate::core::{DEFAULT_INITIAL_SHARE_PRICE, SimulationParameters};

pub const DEFAULT_SEED_MONEY: f64 = 50_000_000.0;
pub const DEFAULT_MONTHLY_INVEST: f64 = 2_000_000.0;
pub const DEFAULT_ANNUAL_INVEST_INCREASE: f64 = 100_000.0;
pub const DEFAULT_YEARS: u32 = 20;
pub const DEFAULT_ANNUAL_RETURN: f64 = 10.0;
pub const DEFAULT_DIVIDEND_YIELD: f64 = 5.0;
pub const DEFAULT_DIVIDEND_GROWTH: f64 = 5.0;
pub const DEFAULT_CAPITAL_GROWTH: f64 = 5.0;
pub const DEFAULT_TAX_RATE: f64 = 15.4;

pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 50;
const MAX_RATE: f64 = 20.0;
const MAX_TAX_RATE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("--{flag} must be a finite amount >= 0")]
    NegativeAmount { flag: &'static str },
    #[error("--{flag} must be between {min} and {max}")]
    RateOutOfRange {
        flag: &'static str,
        min: f64,
        max: f64,
    },
    #[error("--years must be between {min} and {max}")]
    YearsOutOfRange { min: u32, max: u32 },
    #[error("--initial-share-price must be > 0")]
    NonPositiveSharePrice,
}

/// Projection inputs shared by the `run` subcommand and the HTTP API.
/// Rates are in percent.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ProjectionArgs {
    #[arg(long, default_value_t = DEFAULT_SEED_MONEY, help = "Current net worth in won")]
    pub seed_money: f64,
    #[arg(long, default_value_t = DEFAULT_MONTHLY_INVEST, help = "Monthly contribution in won")]
    pub monthly_invest: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_ANNUAL_INVEST_INCREASE,
        help = "Amount added to the monthly contribution after each year"
    )]
    pub annual_invest_increase: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS, help = "Number of years to project (1-50)")]
    pub years: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_ANNUAL_RETURN,
        help = "Expected annual return in percent, used when dividends are not reinvested"
    )]
    pub annual_return: f64,
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        help = "Model dividend reinvestment with a compounding share count"
    )]
    pub reinvest_dividend: bool,
    #[arg(
        long,
        default_value_t = DEFAULT_INITIAL_SHARE_PRICE,
        help = "Starting price per share for the reinvestment model"
    )]
    pub initial_share_price: f64,
    #[arg(long, default_value_t = DEFAULT_DIVIDEND_YIELD, help = "Starting dividend yield in percent")]
    pub annual_dividend_yield: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_DIVIDEND_GROWTH,
        help = "Annual growth of the dividend yield in percent"
    )]
    pub dividend_growth: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_CAPITAL_GROWTH,
        help = "Annual share price appreciation in percent"
    )]
    pub capital_growth: f64,
    #[arg(long, default_value_t = DEFAULT_TAX_RATE, help = "Flat dividend tax rate in percent")]
    pub tax_rate: f64,
}

impl Default for ProjectionArgs {
    fn default() -> Self {
        Self {
            seed_money: DEFAULT_SEED_MONEY,
            monthly_invest: DEFAULT_MONTHLY_INVEST,
            annual_invest_increase: DEFAULT_ANNUAL_INVEST_INCREASE,
            years: DEFAULT_YEARS,
            annual_return: DEFAULT_ANNUAL_RETURN,
            reinvest_dividend: true,
            initial_share_price: DEFAULT_INITIAL_SHARE_PRICE,
            annual_dividend_yield: DEFAULT_DIVIDEND_YIELD,
            dividend_growth: DEFAULT_DIVIDEND_GROWTH,
            capital_growth: DEFAULT_CAPITAL_GROWTH,
            tax_rate: DEFAULT_TAX_RATE,
        }
    }
}

/// HTTP request body or query string. Missing fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulatePayload {
    seed_money: Option<f64>,
    monthly_invest: Option<f64>,
    annual_invest_increase: Option<f64>,
    years: Option<u32>,
    annual_return: Option<f64>,
    reinvest_dividend: Option<bool>,
    initial_share_price: Option<f64>,
    annual_dividend_yield: Option<f64>,
    dividend_growth: Option<f64>,
    capital_growth: Option<f64>,
    tax_rate: Option<f64>,
}

impl SimulatePayload {
    pub fn into_args(self) -> ProjectionArgs {
        let mut args = ProjectionArgs::default();

        if let Some(v) = self.seed_money {
            args.seed_money = v;
        }
        if let Some(v) = self.monthly_invest {
            args.monthly_invest = v;
        }
        if let Some(v) = self.annual_invest_increase {
            args.annual_invest_increase = v;
        }
        if let Some(v) = self.years {
            args.years = v;
        }
        if let Some(v) = self.annual_return {
            args.annual_return = v;
        }
        if let Some(v) = self.reinvest_dividend {
            args.reinvest_dividend = v;
        }
        if let Some(v) = self.initial_share_price {
            args.initial_share_price = v;
        }
        if let Some(v) = self.annual_dividend_yield {
            args.annual_dividend_yield = v;
        }
        if let Some(v) = self.dividend_growth {
            args.dividend_growth = v;
        }
        if let Some(v) = self.capital_growth {
            args.capital_growth = v;
        }
        if let Some(v) = self.tax_rate {
            args.tax_rate = v;
        }

        args
    }
}

/// Checks the input bounds and produces engine parameters.
///
/// Without reinvestment the dividend inputs are irrelevant: they are
/// neither checked nor passed on, and capital growth mirrors the annual
/// return.
pub fn build_params(args: &ProjectionArgs) -> Result<SimulationParameters, ParamError> {
    for (flag, amount) in [
        ("seed-money", args.seed_money),
        ("monthly-invest", args.monthly_invest),
        ("annual-invest-increase", args.annual_invest_increase),
    ] {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ParamError::NegativeAmount { flag });
        }
    }

    if !(MIN_YEARS..=MAX_YEARS).contains(&args.years) {
        return Err(ParamError::YearsOutOfRange {
            min: MIN_YEARS,
            max: MAX_YEARS,
        });
    }

    check_rate("annual-return", args.annual_return, MAX_RATE)?;

    if !args.reinvest_dividend {
        return Ok(SimulationParameters {
            seed_money: args.seed_money,
            monthly_invest: args.monthly_invest,
            annual_invest_increase: args.annual_invest_increase,
            annual_return: args.annual_return,
            annual_dividend_yield: 0.0,
            dividend_growth: 0.0,
            capital_growth: args.annual_return,
            reinvest_dividend: false,
            tax_rate: 0.0,
            years: args.years,
            initial_share_price: DEFAULT_INITIAL_SHARE_PRICE,
        });
    }

    check_rate("annual-dividend-yield", args.annual_dividend_yield, MAX_RATE)?;
    check_rate("dividend-growth", args.dividend_growth, MAX_RATE)?;
    check_rate("capital-growth", args.capital_growth, MAX_RATE)?;
    check_rate("tax-rate", args.tax_rate, MAX_TAX_RATE)?;

    if !args.initial_share_price.is_finite() || args.initial_share_price <= 0.0 {
        return Err(ParamError::NonPositiveSharePrice);
    }

    Ok(SimulationParameters {
        seed_money: args.seed_money,
        monthly_invest: args.monthly_invest,
        annual_invest_increase: args.annual_invest_increase,
        annual_return: args.annual_return,
        annual_dividend_yield: args.annual_dividend_yield,
        dividend_growth: args.dividend_growth,
        capital_growth: args.capital_growth,
        reinvest_dividend: true,
        tax_rate: args.tax_rate,
        years: args.years,
        initial_share_price: args.initial_share_price,
    })
}

fn check_rate(flag: &'static str, value: f64, max: f64) -> Result<(), ParamError> {
    if (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ParamError::RateOutOfRange {
            flag,
            min: 0.0,
            max,
        })
    }
}

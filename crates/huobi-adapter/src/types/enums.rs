/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandleInterval {
    #[serde(rename = "1min")]
    Min1,
    #[serde(rename = "5min")]
    Min5,
    #[serde(rename = "15min")]
    Min15,
    #[serde(rename = "30min")]
    Min30,
    #[serde(rename = "60min")]
    Min60,
    #[serde(rename = "4hour")]
    Hour4,
    #[serde(rename = "1day")]
    Day1,
    #[serde(rename = "1mon")]
    Mon1,
    #[serde(rename = "1week")]
    Week1,
    #[serde(rename = "1year")]
    Year1,
}

impl CandleInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandleInterval::Min1 => "1min",
            CandleInterval::Min5 => "5min",
            CandleInterval::Min15 => "15min",
            CandleInterval::Min30 => "30min",
            CandleInterval::Min60 => "60min",
            CandleInterval::Hour4 => "4hour",
            CandleInterval::Day1 => "1day",
            CandleInterval::Mon1 => "1mon",
            CandleInterval::Week1 => "1week",
            CandleInterval::Year1 => "1year",
        }
    }
}

impl fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order book price aggregation level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthLevel {
    #[default]
    Step0,
    Step1,
    Step2,
    Step3,
    Step4,
    Step5,
}

impl DepthLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepthLevel::Step0 => "step0",
            DepthLevel::Step1 => "step1",
            DepthLevel::Step2 => "step2",
            DepthLevel::Step3 => "step3",
            DepthLevel::Step4 => "step4",
            DepthLevel::Step5 => "step5",
        }
    }
}

impl fmt::Display for DepthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of book levels returned per side by the REST depth endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketDepth {
    Depth5,
    Depth10,
    #[default]
    Depth20,
}

impl MarketDepth {
    pub fn value(&self) -> u32 {
        match self {
            MarketDepth::Depth5 => 5,
            MarketDepth::Depth10 => 10,
            MarketDepth::Depth20 => 20,
        }
    }
}

/// Market-by-price refresh depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceLevel {
    Level5,
    Level10,
    Level20,
}

impl PriceLevel {
    pub fn value(&self) -> u32 {
        match self {
            PriceLevel::Level5 => 5,
            PriceLevel::Level10 => 10,
            PriceLevel::Level20 => 20,
        }
    }
}

/// Private trade-clearing stream mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeDetailMode {
    #[default]
    OnlyTradeEvent,
    TradeAndCancellationEvents,
}

impl TradeDetailMode {
    pub fn value(&self) -> u8 {
        match self {
            TradeDetailMode::OnlyTradeEvent => 0,
            TradeDetailMode::TradeAndCancellationEvents => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    BuyMarket,
    SellMarket,
    BuyLimit,
    SellLimit,
    BuyIoc,
    SellIoc,
    BuyLimitMaker,
    SellLimitMaker,
    BuyStopLimit,
    SellStopLimit,
    BuyLimitFok,
    SellLimitFok,
    BuyStopLimitFok,
    SellStopLimitFok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderSource {
    #[default]
    SpotApi,
    MarginApi,
    SuperMarginApi,
    C2cMarginApi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopOperator {
    Gte,
    Lte,
}

use crate::signal::{DepthLevel, Direction, RawSignal};

/// Order-book aggregates derived from a signal's tick snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepthAnalysis {
    pub total_buy: f64,
    pub total_sell: f64,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    pub depth_check_passed: bool,
    pub live_vwap: Option<f64>,
    pub live_rsi: Option<f64>,
    pub price_deviation: Option<f64>,
}

/// Cross-checks the entry price against the top of book and the buy/sell
/// imbalance. Absent data degrades to 0 / None, never to an error.
pub fn analyze(signal: &RawSignal) -> DepthAnalysis {
    let tick = signal.tick.as_ref();
    let depth = tick.and_then(|t| t.depth.as_ref());

    let total_buy = tick.and_then(|t| t.total_buy_quantity).unwrap_or(0.0);
    let total_sell = tick.and_then(|t| t.total_sell_quantity).unwrap_or(0.0);
    // Empty book levels are sent with price 0
    let best_bid = depth.and_then(|d| d.buy.first()).and_then(top_price);
    let best_ask = depth.and_then(|d| d.sell.first()).and_then(top_price);

    let bid_ok = match best_bid {
        Some(bid) if signal.direction == Direction::Long => bid >= signal.entry,
        _ => true,
    };
    let ask_ok = match best_ask {
        Some(ask) if signal.direction == Direction::Short => ask <= signal.entry,
        _ => true,
    };
    let volume_ok = match signal.direction {
        Direction::Long => total_buy > total_sell,
        Direction::Short => total_sell > total_buy,
    };

    DepthAnalysis {
        total_buy,
        total_sell,
        best_bid,
        best_ask,
        depth_check_passed: bid_ok && ask_ok && volume_ok,
        live_vwap: tick.and_then(|t| t.live_vwap).filter(non_zero),
        live_rsi: tick.and_then(|t| t.live_rsi).filter(non_zero),
        price_deviation: tick.and_then(|t| t.price_deviation).filter(non_zero),
    }
}

fn top_price(level: &DepthLevel) -> Option<f64> {
    level.price.filter(|p| *p > 0.0)
}

fn non_zero(v: &f64) -> bool {
    *v != 0.0
}

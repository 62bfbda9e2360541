mod binance;

pub use binance::BinanceSource;

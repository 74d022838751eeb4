//! Dolar Arbitrage Dashboard Configuration

// Quote providers
pub const DOLARAPI_OFICIAL_URL: &str = "https://dolarapi.com/v1/dolares/oficial";
pub const DOLARAPI_MEP_URL: &str = "https://dolarapi.com/v1/dolares/bolsa";
pub const CRIPTOYA_BASE_URL: &str = "https://criptoya.com/api";

/// Reference amount sent to criptoya when asking for a USDT/ARS quote
pub const CRIPTOYA_PROBE_AMOUNT: f64 = 0.1;

// Timing
pub const HTTP_TIMEOUT_SECS: u64 = 5;
pub const QUOTE_CACHE_TTL_SECS: u64 = 60;
pub const MONITOR_INTERVAL_SECS: u64 = 60;

/// Bounded parallelism for the exchange fan-out
pub const MAX_CONCURRENT_FETCHES: usize = 8;

// Trade parameter defaults
pub const DEFAULT_VOLUME_USD: f64 = 1000.0;
pub const DEFAULT_FEE_PCT: f64 = 1.0;
pub const DEFAULT_FIXED_FEE_USDT: f64 = 1.0;

/// USDT/ARS venues known to criptoya
pub const EXCHANGES: &[&str] = &[
    "binancep2p", "belo", "astropay", "bitso", "trubit", "binance",
    "tiendacrypto", "fiwind", "ripio", "buenbit", "bybit2p", "cryptomkt",
    "universalcoins", "letsbit", "ripioexchange", "pollux", "pluscrypto",
    "bybit", "dolarsop", "lemoncash", "huobi2p", "cocoscrypto", "saldo",
    "bitsoalpha", "satoshitango", "okex2p", "bitget2p", "eluter",
    "paydecep2p", "decrypto", "kriptonmarket", "kucoin2p", "inp2pbot2p",
    "airtm", "cocos", "paxfulp2p", "trubit2p", "wallbit", "cryptomktpro",
    "eldoradop2p", "takenos", "coinexp2p", "bingxp2p", "prex", "vibrant",
    "lemoncashp2p",
];

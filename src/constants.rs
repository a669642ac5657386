/// Current firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Size of the heap in DRAM (internal memory)
pub const HEAP_SIZE: usize = 72 * 1024;

/// Size of the TCP socket receive buffer
pub const RX_BUFFER_SIZE: usize = 1024;
/// Size of the TCP socket transmit buffer
pub const TX_BUFFER_SIZE: usize = 1024;

/// Number of raw ADC readings averaged per sample
pub const SAMPLE_COUNT: u32 = 10;
/// Spacing between two ADC readings, in milliseconds
pub const SAMPLE_DELAY_MS: u32 = 10;

/// Interval between two link status polls, in milliseconds
pub const LINK_POLL_INTERVAL_MS: u64 = 500;
/// Maximum time to wait for the Wi-Fi association, in milliseconds
pub const LINK_CONNECT_TIMEOUT_MS: u64 = 15_000;

/// Maximum time to wait for the first response byte, in milliseconds
pub const RESPONSE_TIMEOUT_MS: u64 = 5_000;
/// Interval between two checks for response data, in milliseconds
pub const RESPONSE_POLL_INTERVAL_MS: u64 = 10;

/// Capacity of the formatted HTTP request
pub const REQUEST_BUFFER_SIZE: usize = 512;
/// Longest response line echoed to the log, longer lines are truncated
pub const RESPONSE_LINE_MAX: usize = 128;
/// Chunk size used while draining the response
pub const RESPONSE_CHUNK_SIZE: usize = 64;

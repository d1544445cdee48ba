use nictate_core::adapter::DEFAULT_THRESHOLDS;
use nictate_core::blink::BlinkConfig;
use std::time::Duration;

/// Capture pipeline configuration, loaded from environment variables.
pub struct Config {
    /// Portal base URL for the biometric endpoints.
    pub api_base_url: String,
    /// Detection score thresholds tried in order, strictest first.
    pub detection_thresholds: Vec<f32>,
    /// EAR below this while open counts as a closure.
    pub close_threshold: f32,
    /// EAR above this reopens the eye.
    pub open_threshold: f32,
    /// Minimum milliseconds between counted blinks.
    pub blink_cooldown_ms: u64,
    /// Counted blinks required to trigger a capture.
    pub required_blinks: u32,
    /// Detection tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// JPEG quality for enrollment crops (biometric detail matters).
    pub enroll_jpeg_quality: u8,
    /// JPEG quality for verification full frames.
    pub verify_jpeg_quality: u8,
    /// Padding added around the detection box per side for enrollment crops.
    pub crop_padding: f32,
    /// Display delay before the success callback, per mode, milliseconds.
    pub enroll_success_delay_ms: u64,
    pub verify_success_delay_ms: u64,
    /// Submission timeout in seconds; 0 leaves requests unbounded.
    pub submit_timeout_secs: u64,
}

impl Config {
    /// Load configuration from `NICTATE_*` environment variables with
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("NICTATE_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            detection_thresholds: std::env::var("NICTATE_DETECTION_THRESHOLDS")
                .ok()
                .and_then(|v| parse_thresholds(&v))
                .unwrap_or_else(|| DEFAULT_THRESHOLDS.to_vec()),
            close_threshold: env_f32("NICTATE_CLOSE_THRESHOLD", 0.25),
            open_threshold: env_f32("NICTATE_OPEN_THRESHOLD", 0.35),
            blink_cooldown_ms: env_u64("NICTATE_BLINK_COOLDOWN_MS", 200),
            required_blinks: env_u32("NICTATE_REQUIRED_BLINKS", 1),
            tick_interval_ms: env_u64("NICTATE_TICK_INTERVAL_MS", 100),
            enroll_jpeg_quality: env_u8("NICTATE_ENROLL_JPEG_QUALITY", 98),
            verify_jpeg_quality: env_u8("NICTATE_VERIFY_JPEG_QUALITY", 95),
            crop_padding: env_f32("NICTATE_CROP_PADDING", 0.2),
            enroll_success_delay_ms: env_u64("NICTATE_ENROLL_SUCCESS_DELAY_MS", 2000),
            verify_success_delay_ms: env_u64("NICTATE_VERIFY_SUCCESS_DELAY_MS", 1500),
            submit_timeout_secs: env_u64("NICTATE_SUBMIT_TIMEOUT_SECS", 30),
        }
    }

    pub fn blink_config(&self) -> BlinkConfig {
        BlinkConfig {
            close_threshold: self.close_threshold,
            open_threshold: self.open_threshold,
            cooldown: Duration::from_millis(self.blink_cooldown_ms),
            required_blinks: self.required_blinks,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn submit_timeout(&self) -> Option<Duration> {
        if self.submit_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.submit_timeout_secs))
        }
    }
}

/// Parse a comma-separated threshold ladder, e.g. `"0.15,0.10,0.05"`.
/// Returns `None` on any unparsable entry or an empty list.
fn parse_thresholds(raw: &str) -> Option<Vec<f32>> {
    let thresholds: Vec<f32> = raw
        .split(',')
        .map(|s| s.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    if thresholds.is_empty() {
        None
    } else {
        Some(thresholds)
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u8(key: &str, default: u8) -> u8 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

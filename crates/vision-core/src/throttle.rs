//! Adaptive frame skipping
//!
//! A configured skip percentage is reduced against 100 by their greatest
//! common divisor into `(skip_below, skip_until)`, which bounds the frame
//! counter to the smallest possible range.
//!
//! The decision rule is kept exactly as deployed:
//!
//! ```text
//! counter <  skip_below  -> counter += 1, skip
//! counter >= skip_until  -> counter  = 0, skip
//! otherwise              -> counter += 1, process
//! ```
//!
//! Note the first branch: frames below `skip_below` are skipped, not
//! processed, even though the name reads the other way. Over one full
//! period of `skip_until + 1` frames, `skip_until - skip_below` are
//! processed. At 25% that is three frames out of every five.

use std::fmt;
use std::str::FromStr;

/// Greatest common divisor, with `gcd(0, n) == n`.
pub fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// A frame skip percentage, validated to `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SkipRate(u8);

impl SkipRate {
    /// Skip rate used when none is configured.
    pub const DEFAULT: SkipRate = SkipRate(25);

    pub fn new(percent: u8) -> Result<Self, SkipRateError> {
        Self::try_from(percent as i64)
    }

    #[inline]
    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl Default for SkipRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SkipRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<i64> for SkipRate {
    type Error = SkipRateError;

    fn try_from(percent: i64) -> Result<Self, Self::Error> {
        if (0..=100).contains(&percent) {
            Ok(SkipRate(percent as u8))
        } else {
            Err(SkipRateError::OutOfRange(percent))
        }
    }
}

impl FromStr for SkipRate {
    type Err = SkipRateError;

    /// Parse a decimal percentage such as `"25"`, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let percent: i64 = s
            .trim()
            .parse()
            .map_err(|_| SkipRateError::NotANumber(s.to_string()))?;
        Self::try_from(percent)
    }
}

/// Error returned for unusable skip rate settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipRateError {
    /// Percentage outside `0..=100`
    OutOfRange(i64),
    /// Setting is not a decimal integer
    NotANumber(String),
}

impl fmt::Display for SkipRateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipRateError::OutOfRange(v) => write!(f, "skip rate {} is outside 0..=100", v),
            SkipRateError::NotANumber(s) => write!(f, "skip rate {:?} is not a number", s),
        }
    }
}

impl std::error::Error for SkipRateError {}

/// Per-frame gate deciding whether to run decode and render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameThrottle {
    enabled: bool,
    skip_below: u32,
    skip_until: u32,
    frame_count: u32,
}

impl FrameThrottle {
    /// A throttle with skipping disabled at the default rate.
    pub fn new() -> Self {
        let mut throttle = Self {
            enabled: false,
            skip_below: 0,
            skip_until: 0,
            frame_count: 0,
        };
        throttle.configure(false, SkipRate::DEFAULT);
        throttle
    }

    /// Re-derive the skip pattern. The frame counter restarts from zero.
    ///
    /// # Example
    /// ```
    /// use vision_core::{FrameThrottle, SkipRate};
    ///
    /// let mut throttle = FrameThrottle::new();
    /// throttle.configure(true, SkipRate::new(25).unwrap());
    /// assert_eq!((throttle.skip_below(), throttle.skip_until()), (1, 4));
    /// ```
    pub fn configure(&mut self, enabled: bool, rate: SkipRate) {
        let rate = rate.percent() as u32;
        let divisor = gcd(rate, 100);
        self.enabled = enabled;
        self.skip_below = rate / divisor;
        self.skip_until = 100 / divisor;
        self.frame_count = 0;
    }

    /// Decide for the next incoming frame. Called exactly once per frame.
    pub fn should_process(&mut self) -> bool {
        if !self.enabled {
            return true;
        }
        if self.frame_count < self.skip_below {
            self.frame_count += 1;
            false
        } else if self.frame_count >= self.skip_until {
            self.frame_count = 0;
            false
        } else {
            self.frame_count += 1;
            true
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn skip_below(&self) -> u32 {
        self.skip_below
    }

    #[inline]
    pub fn skip_until(&self) -> u32 {
        self.skip_until
    }

    #[inline]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Length of the repeating skip/process pattern once enabled.
    pub fn period(&self) -> u32 {
        self.skip_until + 1
    }

    /// Frames processed in each period.
    pub fn processed_per_period(&self) -> u32 {
        self.skip_until - self.skip_below
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(percent: u8) -> FrameThrottle {
        let mut throttle = FrameThrottle::new();
        throttle.configure(true, SkipRate::new(percent).unwrap());
        throttle
    }

    fn run(throttle: &mut FrameThrottle, frames: usize) -> Vec<bool> {
        (0..frames).map(|_| throttle.should_process()).collect()
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(25, 100), 25);
        assert_eq!(gcd(30, 100), 10);
        assert_eq!(gcd(33, 100), 1);
        assert_eq!(gcd(100, 100), 100);
        assert_eq!(gcd(0, 100), 100);
        assert_eq!(gcd(100, 0), 100);
    }

    #[test]
    fn test_reduction_in_lowest_terms() {
        for (percent, below, until) in [(25, 1, 4), (30, 3, 10), (33, 33, 100), (50, 1, 2), (100, 1, 1), (0, 0, 1)] {
            let throttle = enabled(percent);
            assert_eq!(
                (throttle.skip_below(), throttle.skip_until()),
                (below, until),
                "rate {percent}"
            );
            assert!(throttle.skip_below() <= throttle.skip_until());
        }
    }

    #[test]
    fn test_disabled_always_processes() {
        let mut throttle = FrameThrottle::new();
        assert!(!throttle.is_enabled());
        assert!(run(&mut throttle, 20).into_iter().all(|p| p));
        assert_eq!(throttle.frame_count(), 0, "counter must stay untouched");
    }

    #[test]
    fn test_quarter_rate_sequence() {
        let mut throttle = enabled(25);
        let (t, f) = (true, false);
        assert_eq!(run(&mut throttle, 11), vec![f, t, t, t, f, f, t, t, t, f, f]);
    }

    #[test]
    fn test_quarter_rate_period() {
        let mut throttle = enabled(25);
        assert_eq!(throttle.period(), 5);
        assert_eq!(throttle.processed_per_period(), 3);
        throttle.should_process();
        // after the first frame the pattern repeats every five frames
        let decisions = run(&mut throttle, 50);
        for window in decisions.chunks_exact(5) {
            assert_eq!(window.iter().filter(|&&p| p).count(), 3);
        }
    }

    #[test]
    fn test_zero_rate_alternates() {
        let mut throttle = enabled(0);
        assert_eq!(run(&mut throttle, 6), vec![true, false, true, false, true, false]);
    }

    #[test]
    fn test_full_rate_skips_everything() {
        let mut throttle = enabled(100);
        assert!(run(&mut throttle, 20).into_iter().all(|p| !p));
    }

    #[test]
    fn test_counter_stays_bounded() {
        let mut throttle = enabled(33);
        for _ in 0..1000 {
            throttle.should_process();
            assert!(throttle.frame_count() <= throttle.skip_until());
        }
    }

    #[test]
    fn test_reconfigure_resets_counter() {
        let mut throttle = enabled(25);
        run(&mut throttle, 3);
        assert_eq!(throttle.frame_count(), 3);
        throttle.configure(true, SkipRate::new(50).unwrap());
        assert_eq!(throttle.frame_count(), 0);
        throttle.configure(false, SkipRate::new(50).unwrap());
        assert!(throttle.should_process());
    }

    #[test]
    fn test_skip_rate_parsing() {
        assert_eq!("25".parse::<SkipRate>(), Ok(SkipRate::new(25).unwrap()));
        assert_eq!(" 100 ".parse::<SkipRate>().map(|r| r.percent()), Ok(100));
        assert_eq!("101".parse::<SkipRate>(), Err(SkipRateError::OutOfRange(101)));
        assert_eq!("-1".parse::<SkipRate>(), Err(SkipRateError::OutOfRange(-1)));
        assert_eq!(
            "fast".parse::<SkipRate>(),
            Err(SkipRateError::NotANumber("fast".to_string()))
        );
        assert_eq!(SkipRate::new(200), Err(SkipRateError::OutOfRange(200)));
        assert_eq!(SkipRate::default().to_string(), "25%");
    }

    #[test]
    fn test_skip_rate_error_messages() {
        assert_eq!(
            SkipRateError::OutOfRange(150).to_string(),
            "skip rate 150 is outside 0..=100"
        );
        assert_eq!(
            SkipRateError::NotANumber("x".into()).to_string(),
            "skip rate \"x\" is not a number"
        );
    }
}

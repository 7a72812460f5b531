//! Clock-string formatting for elapsed and remaining time.
//!
//! Times are rendered as `MM:SS` from whole seconds with plain integer
//! arithmetic, so the result never depends on locale or timezone.

use std::time::Duration;

use crate::engine::Progress;


/// Formats a duration as `MM:SS`, truncating fractional seconds.
///
/// Minutes are zero-padded to two digits and keep counting past the hour,
/// so 65 minutes renders as `65:00`.
pub fn format_clock( time: Duration ) -> String {
    let secs = time.as_secs();
    format!( "{:02}:{:02}", secs / 60, secs % 60 )
}


/// Elapsed and remaining labels for the progress row.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct ProgressLabels {
    pub elapsed: String,
    pub remaining: String,
}


impl ProgressLabels {
    pub fn from_progress( progress: &Progress ) -> Self {
        Self {
            elapsed: format_clock( progress.position ),
            remaining: format_clock( progress.remaining() ),
        }
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    fn to_secs( label: &str ) -> u64 {
        let ( min, sec ) = label.split_once( ':' ).unwrap();
        min.parse::<u64>().unwrap() * 60 + sec.parse::<u64>().unwrap()
    }


    #[test]
    fn test_format_clock() {
        assert_eq!( format_clock( Duration::ZERO ), "00:00" );
        assert_eq!( format_clock( Duration::from_secs( 59 ) ), "00:59" );
        assert_eq!( format_clock( Duration::from_millis( 61_900 ) ), "01:01" );
        assert_eq!( format_clock( Duration::from_secs( 3_900 ) ), "65:00" );
    }


    #[test]
    fn test_labels_for_known_track() {
        let labels = ProgressLabels::from_progress( &Progress::from_secs_f64( 65.0, 185.0 ) );
        assert_eq!( labels.elapsed, "01:05" );
        assert_eq!( labels.remaining, "02:00" );
    }


    #[test]
    fn test_labels_sum_to_duration() {
        for duration in [ 0.0, 1.0, 59.5, 185.0, 240.25, 3_601.7 ] {
            let mut elapsed = 0.0;
            while elapsed <= duration {
                let progress = Progress::from_secs_f64( elapsed, duration );
                let labels = ProgressLabels::from_progress( &progress );
                let sum = to_secs( &labels.elapsed ) + to_secs( &labels.remaining );
                let total = to_secs( &format_clock( progress.duration ) );
                assert!(
                    sum == total || sum + 1 == total,
                    "elapsed {} + remaining {} vs duration {}",
                    labels.elapsed, labels.remaining, total
                );
                elapsed += 0.37;
            }
        }
    }


    #[test]
    fn test_remaining_never_negative() {
        let labels = ProgressLabels::from_progress( &Progress::from_secs_f64( 190.0, 185.0 ) );
        assert_eq!( labels.remaining, "00:00" );
    }
}

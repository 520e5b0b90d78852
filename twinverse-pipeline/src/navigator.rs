//! Navigation router boundary
//!
//! The orchestration core only ever asks for "go to route R"; what a route
//! transition actually does belongs to the hosting front end.

use tracing::info;

use twinverse_core::domain::Route;

/// Requests view transitions on behalf of the pipeline.
pub trait Navigator: Send + Sync {
    fn go(&self, route: &Route);
}

/// A navigator that records transitions in the log, used by headless hosts.
#[derive(Debug, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn go(&self, route: &Route) {
        info!(path = %route.path(), "navigating");
    }
}


#[cfg(test)]
mod tests {
    use super::recording::RecordingNavigator;
    use super::*;
    use twinverse_core::domain::JobId;

    #[test]
    fn test_recording_navigator_keeps_order() {
        let navigator = RecordingNavigator::default();
        navigator.go(&Route::CreateMusic);
        navigator.go(&Route::MusicPlayer {
            music_id: JobId::from("m1"),
        });

        assert_eq!(
            navigator.routes(),
            vec![
                Route::CreateMusic,
                Route::MusicPlayer {
                    music_id: JobId::from("m1")
                },
            ]
        );
    }
}

//! Track clock
//!
//! The simulation is timed by the music track, not by tick count. A
//! [`Transport`] reports the playback position; [`TrackClock`] turns it into
//! the run's elapsed time, frozen while paused and never running backwards.

/// Audio playback the simulation is synchronised to
pub trait Transport {
    /// Current playback position in seconds
    fn playback_seconds(&self) -> f64;
    /// Total track length in seconds
    fn duration_seconds(&self) -> f64;
    /// Whether the track has played to its natural end
    fn has_ended(&self) -> bool;
    /// Start playing from the beginning
    fn play_from_start(&mut self);
    fn suspend(&mut self);
    fn resume(&mut self);
    /// Tear down playback for good
    fn stop(&mut self);
}

/// Elapsed run time derived from the transport
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackClock {
    frozen_at: Option<f64>,
    last: f64,
}

impl TrackClock {
    /// Elapsed seconds since run start
    pub fn now(&mut self, transport: &dyn Transport) -> f64 {
        let reading = self
            .frozen_at
            .unwrap_or_else(|| transport.playback_seconds());
        self.last = self.last.max(reading);
        self.last
    }

    /// Hold the clock at the current position
    pub fn freeze(&mut self, transport: &dyn Transport) {
        if self.frozen_at.is_none() {
            let at = self.last.max(transport.playback_seconds());
            self.frozen_at = Some(at);
        }
    }

    pub fn unfreeze(&mut self) {
        self.frozen_at = None;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Transport advanced by hand, for headless runs and tests
#[derive(Debug, Clone, PartialEq)]
pub struct ManualTransport {
    position: f64,
    duration: f64,
    playing: bool,
    suspended: bool,
}

impl ManualTransport {
    pub fn new(duration: f64) -> Self {
        Self {
            position: 0.0,
            duration,
            playing: false,
            suspended: false,
        }
    }

    /// Move playback forward by `secs` if it is running
    pub fn advance(&mut self, secs: f64) {
        if self.playing && !self.suspended {
            self.position = (self.position + secs).min(self.duration);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing && !self.suspended
    }
}

impl Transport for ManualTransport {
    fn playback_seconds(&self) -> f64 {
        self.position
    }

    fn duration_seconds(&self) -> f64 {
        self.duration
    }

    fn has_ended(&self) -> bool {
        self.position >= self.duration
    }

    fn play_from_start(&mut self) {
        self.position = 0.0;
        self.playing = true;
        self.suspended = false;
    }

    fn suspend(&mut self) {
        self.suspended = true;
    }

    fn resume(&mut self) {
        self.suspended = false;
    }

    fn stop(&mut self) {
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_freezes_while_paused() {
        let mut transport = ManualTransport::new(100.0);
        transport.play_from_start();
        let mut clock = TrackClock::default();

        transport.advance(2.0);
        assert_eq!(clock.now(&transport), 2.0);

        clock.freeze(&transport);
        assert!(clock.is_frozen());
        transport.advance(3.0);
        assert_eq!(clock.now(&transport), 2.0);

        clock.unfreeze();
        assert!(!clock.is_frozen());
        assert_eq!(clock.now(&transport), 5.0);
    }

    #[test]
    fn test_clock_is_monotonic_and_resettable() {
        let mut transport = ManualTransport::new(100.0);
        transport.play_from_start();
        transport.advance(10.0);
        let mut clock = TrackClock::default();
        assert_eq!(clock.now(&transport), 10.0);

        // A transport seeking backwards never rewinds the run
        transport.play_from_start();
        assert_eq!(clock.now(&transport), 10.0);

        clock.reset();
        assert_eq!(clock.now(&transport), 0.0);
    }

    #[test]
    fn test_manual_transport_ends() {
        let mut transport = ManualTransport::new(1.0);
        transport.advance(5.0);
        assert_eq!(transport.playback_seconds(), 0.0);

        transport.play_from_start();
        transport.suspend();
        transport.advance(5.0);
        assert!(!transport.has_ended());

        transport.resume();
        transport.advance(5.0);
        assert!(transport.has_ended());
        assert_eq!(transport.playback_seconds(), 1.0);
    }
}

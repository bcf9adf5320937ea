use super::CombatSignal;

/// Observer interface for per-tick signal batches.
///
/// Front ends (overlays, loggers, recorders) implement this to react to
/// combat lifecycle and damage signals without coupling to the session.
pub trait SignalHandler {
    fn handle_signal(&mut self, signal: &CombatSignal);

    fn handle_signals(&mut self, signals: &[CombatSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}

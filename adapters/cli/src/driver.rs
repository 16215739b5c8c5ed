//! Fixed-interval loop that feeds key presses into a session.

use std::{thread, time::Duration};

use anyhow::Result;
use grid_chase_core::SessionState;
use grid_chase_rendering::{Frame, RenderingBackend, Status};
use grid_chase_system_bootstrap::Session;
use grid_chase_world::query;
use tracing::debug;

use crate::input::{InputSource, KeyInput};

/// Presents the session, then ticks once per key until it ends or the
/// player quits. Returns the state the session was left in.
pub(crate) fn run<I, B>(
    session: &mut Session,
    input: &mut I,
    backend: &mut B,
    tick_interval: Duration,
) -> Result<SessionState>
where
    I: InputSource,
    B: RenderingBackend,
{
    backend.present(&frame_for(session))?;

    while !session.state().is_terminal() {
        let step = match input.next_key()? {
            KeyInput::Move(step) => step,
            KeyInput::Quit => {
                debug!(tick = session.tick_index(), "quit requested");
                break;
            }
        };

        let _ = session.tick(step);
        backend.present(&frame_for(session))?;

        if !tick_interval.is_zero() {
            thread::sleep(tick_interval);
        }
    }

    Ok(session.state())
}

fn frame_for(session: &Session) -> Frame {
    let status = Status {
        state: session.state(),
        tick: session.tick_index(),
        remaining: query::remaining_consumables(session.grid()),
    };
    Frame::compose(session.matrix(), session.legend(), status)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use anyhow::bail;
    use grid_chase_core::Delta;
    use grid_chase_system_bootstrap::{Bootstrap, Config};

    use super::*;

    struct ScriptedInput {
        keys: VecDeque<KeyInput>,
    }

    impl ScriptedInput {
        fn new(keys: impl IntoIterator<Item = KeyInput>) -> Self {
            Self {
                keys: keys.into_iter().collect(),
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn next_key(&mut self) -> Result<KeyInput> {
            match self.keys.pop_front() {
                Some(key) => Ok(key),
                None => bail!("script exhausted"),
            }
        }
    }

    #[derive(Default)]
    struct RecordingBackend {
        frames: Vec<Frame>,
    }

    impl RenderingBackend for RecordingBackend {
        fn present(&mut self, frame: &Frame) -> Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    fn session() -> Session {
        Bootstrap
            .session(&Config::new(4).with_adversary_count(0))
            .expect("valid configuration")
    }

    #[test]
    fn quit_stops_before_any_tick() {
        let mut session = session();
        let mut input = ScriptedInput::new([KeyInput::Quit]);
        let mut backend = RecordingBackend::default();

        let state = run(&mut session, &mut input, &mut backend, Duration::ZERO)
            .expect("loop ends cleanly");

        assert_eq!(state, SessionState::Running);
        assert_eq!(session.tick_index(), 0);
        assert_eq!(backend.frames.len(), 1);
    }

    #[test]
    fn each_key_ticks_and_presents_once() {
        let mut session = session();
        let mut input = ScriptedInput::new([
            KeyInput::Move(Delta::NONE),
            KeyInput::Move(Delta::NONE),
            KeyInput::Quit,
        ]);
        let mut backend = RecordingBackend::default();

        let _ = run(&mut session, &mut input, &mut backend, Duration::ZERO)
            .expect("loop ends cleanly");

        assert_eq!(session.tick_index(), 2);
        let ticks: Vec<u64> = backend.frames.iter().map(|frame| frame.status().tick).collect();
        assert_eq!(ticks, [0, 1, 2]);
    }

    #[test]
    fn loop_ends_on_its_own_once_the_session_is_won() {
        // A 4×4 field has four interior cells: the player's start plus three
        // consumables, so sweeping the interior collects all of them.
        let mut session = Bootstrap
            .session(
                &Config::new(11)
                    .with_field_size(4)
                    .with_adversary_count(0)
                    .with_consumable_count(3),
            )
            .expect("valid configuration");
        let mut input = ScriptedInput::new([
            KeyInput::Move(Delta::RIGHT),
            KeyInput::Move(Delta::DOWN),
            KeyInput::Move(Delta::LEFT),
            KeyInput::Quit,
        ]);
        let mut backend = RecordingBackend::default();

        let state = run(&mut session, &mut input, &mut backend, Duration::ZERO)
            .expect("loop ends cleanly");

        assert_eq!(state, SessionState::Won);
        assert_eq!(input.keys, [KeyInput::Quit]);
        assert_eq!(backend.frames.len(), 4);
        let last = backend.frames.last().expect("final frame presented");
        assert_eq!(last.status().state, SessionState::Won);
        assert_eq!(last.status().remaining, 0);
    }

    #[test]
    fn input_failures_propagate() {
        let mut session = session();
        let mut input = ScriptedInput::new(Vec::new());
        let mut backend = RecordingBackend::default();

        let error = run(&mut session, &mut input, &mut backend, Duration::ZERO)
            .expect_err("script is empty");

        assert!(error.to_string().contains("script exhausted"));
    }
}

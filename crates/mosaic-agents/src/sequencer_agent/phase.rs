// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

/// The reveal phases, in the only order they can occur.
///
/// Variants are declared in sequence so that `Ord` follows the run: a phase
/// compares greater than every phase before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhaseState {
    /// Loading slots and spawning icons.
    Streaming,
    /// Loading is complete; the loading visuals are about to be replaced.
    AwaitingIntroAnim,
    /// The intro animation is on stage.
    IntroAnimPlaying,
    /// Waiting for the background element to accept the transition.
    AwaitingTransition,
    /// The background flash is running.
    TransitionPlaying,
    /// Icons are fading in.
    FadingIn,
    /// Icons are fully opaque; waiting before the scroll.
    AwaitingScroll,
    /// Icons are scrolling down.
    Scrolling,
    /// Terminal.
    Done,
}

impl PhaseState {
    /// The phase that follows this one. `Done` is its own successor.
    pub fn next(self) -> Self {
        match self {
            PhaseState::Streaming => PhaseState::AwaitingIntroAnim,
            PhaseState::AwaitingIntroAnim => PhaseState::IntroAnimPlaying,
            PhaseState::IntroAnimPlaying => PhaseState::AwaitingTransition,
            PhaseState::AwaitingTransition => PhaseState::TransitionPlaying,
            PhaseState::TransitionPlaying => PhaseState::FadingIn,
            PhaseState::FadingIn => PhaseState::AwaitingScroll,
            PhaseState::AwaitingScroll => PhaseState::Scrolling,
            PhaseState::Scrolling | PhaseState::Done => PhaseState::Done,
        }
    }

    /// Whether this is the terminal phase.
    pub fn is_terminal(self) -> bool {
        self == PhaseState::Done
    }
}

impl fmt::Display for PhaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Time spent in a finished phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTiming {
    /// The phase that was left.
    pub phase: PhaseState,
    /// Accumulated frame time spent in it.
    pub seconds: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successors_are_strictly_increasing() {
        let mut phase = PhaseState::Streaming;
        let mut steps = 0;
        while !phase.is_terminal() {
            let next = phase.next();
            assert!(next > phase);
            phase = next;
            steps += 1;
        }
        assert_eq!(steps, 8);
        assert_eq!(PhaseState::Done.next(), PhaseState::Done);
    }
}

use std::fmt;

/// Transport commands that are a single DeaDBeeF flag with no arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    TogglePause,
    Pause,
    Next,
    Prev,
    Random,
    Play,
    Stop,
    PlayPause,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::TogglePause,
        Action::Pause,
        Action::Next,
        Action::Prev,
        Action::Random,
        Action::Play,
        Action::Stop,
        Action::PlayPause,
    ];

    pub fn flag(self) -> &'static str {
        match self {
            Action::TogglePause => "--toggle-pause",
            Action::Pause => "--pause",
            Action::Next => "--next",
            Action::Prev => "--prev",
            Action::Random => "--random",
            Action::Play => "--play",
            Action::Stop => "--stop",
            Action::PlayPause => "--play-pause",
        }
    }

    /// Name used in routes (`/player/<name>.json`).
    pub fn name(self) -> &'static str {
        match self {
            Action::TogglePause => "toggle_pause",
            Action::Pause => "pause",
            Action::Next => "next",
            Action::Prev => "prev",
            Action::Random => "random",
            Action::Play => "play",
            Action::Stop => "stop",
            Action::PlayPause => "play_pause",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

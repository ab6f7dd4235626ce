/// Substitution countdown. The shell calls [`Countdown::tick`] once per
/// second from a repeating callback and cancels that callback when the
/// countdown is no longer running.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Running,
    Expired,
    /// Tick arrived while stopped; ignore it.
    Idle,
}

pub const EXPIRY_MESSAGE: &str = "Time for a substitution!";

/// Parses the minutes input the way a number field reports it. Only
/// positive whole minutes are accepted.
pub fn parse_minutes(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|m| *m > 0)
}

impl Countdown {
    pub fn new() -> Self {
        Countdown::default()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts from `minutes`. Returns false (and changes nothing) when
    /// already running.
    pub fn start(&mut self, minutes: u32) -> bool {
        if self.running || minutes == 0 {
            return false;
        }
        self.remaining = minutes.saturating_mul(60);
        self.running = true;
        true
    }

    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            log::info!("countdown expired");
            return Tick::Expired;
        }
        Tick::Running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self, minutes: u32) {
        self.running = false;
        self.remaining = minutes.saturating_mul(60);
    }

    /// `MM:SS`; minutes grow past two digits if needed.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

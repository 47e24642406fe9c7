use beep::beep;
use std::error::Error;

/// Turns the machine's boolean tone signal into something audible. The
/// host feeds `set_active` the sound timer's state once per frame.
pub trait Sound {
    fn set_active(&mut self, active: bool) -> Result<(), Box<dyn Error>>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// a square wave out of the pc speaker, via the beep crate
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Sound for SimpleBeep {
    fn set_active(&mut self, active: bool) -> Result<(), Box<dyn Error>> {
        // only touch the device on transitions
        if active != self.is_beeping {
            beep(if active { SIMPLEBEEP_PITCH } else { 0 })?;
            self.is_beeping = active;
        }
        Ok(())
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        if self.is_beeping {
            let _ = beep(0);
        }
    }
}

/// silence, for hosts with no speaker and for tests
pub struct Mute {
    pub active: bool,
}

impl Mute {
    pub fn new() -> Self {
        Mute { active: false }
    }
}

impl Sound for Mute {
    fn set_active(&mut self, active: bool) -> Result<(), Box<dyn Error>> {
        self.active = active;
        Ok(())
    }
}

//! Test and helper mocks for focuser_core.
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use focuser_traits::FocuserDriver;

/// Scriptable in-memory focuser state shared between a test and the driver it
/// handed to the core. Failure switches make individual facade calls error.
#[derive(Debug)]
pub struct MockState {
    pub open: bool,
    pub position: i32,
    pub temperature_c: f32,
    pub max_step: i32,
    pub reversed: bool,
    pub moving: bool,

    pub fail_open: bool,
    pub fail_position: bool,
    pub fail_temperature: bool,
    pub fail_is_moving: bool,
    pub fail_command: bool,
    pub fail_stop: bool,

    pub last_move_target: Option<i32>,
    pub sync_target: Option<i32>,
    pub stop_count: u32,
    pub position_reads: u32,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            open: false,
            position: 0,
            temperature_c: 10.0,
            max_step: 10_000,
            reversed: false,
            moving: false,
            fail_open: false,
            fail_position: false,
            fail_temperature: false,
            fail_is_moving: false,
            fail_command: false,
            fail_stop: false,
            last_move_target: None,
            sync_target: None,
            stop_count: 0,
            position_reads: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockFocuser {
    state: Arc<Mutex<MockState>>,
}

impl MockFocuser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: MockState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Handle for scripting the device while the core owns the driver clone.
    pub fn handle(&self) -> Arc<Mutex<MockState>> {
        Arc::clone(&self.state)
    }

    fn fail(what: &str) -> Box<dyn std::error::Error + Send + Sync> {
        Box::new(std::io::Error::other(format!("injected {what} failure")))
    }
}

impl FocuserDriver for MockFocuser {
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.lock().unwrap();
        if s.fail_open {
            return Err(Self::fail("open"));
        }
        s.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.state.lock().unwrap().open = false;
        Ok(())
    }

    fn temperature(&mut self) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        let s = self.state.lock().unwrap();
        if s.fail_temperature {
            return Err(Self::fail("temperature"));
        }
        Ok(s.temperature_c)
    }

    fn position(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.lock().unwrap();
        if s.fail_position {
            return Err(Self::fail("position"));
        }
        s.position_reads += 1;
        Ok(s.position)
    }

    fn max_step(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.state.lock().unwrap().max_step)
    }

    fn set_max_step(&mut self, ticks: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.lock().unwrap();
        if s.fail_command {
            return Err(Self::fail("set_max_step"));
        }
        s.max_step = ticks;
        Ok(())
    }

    fn reverse(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.state.lock().unwrap().reversed)
    }

    fn set_reverse(
        &mut self,
        enabled: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.lock().unwrap();
        if s.fail_command {
            return Err(Self::fail("set_reverse"));
        }
        s.reversed = enabled;
        Ok(())
    }

    fn is_moving(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let s = self.state.lock().unwrap();
        if s.fail_is_moving {
            return Err(Self::fail("is_moving"));
        }
        Ok(s.moving)
    }

    fn move_to(&mut self, ticks: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.lock().unwrap();
        if s.fail_command {
            return Err(Self::fail("move_to"));
        }
        s.last_move_target = Some(ticks);
        s.moving = true;
        Ok(())
    }

    fn reset_position(
        &mut self,
        ticks: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.lock().unwrap();
        if s.fail_command {
            return Err(Self::fail("reset_position"));
        }
        s.sync_target = Some(ticks);
        s.position = ticks;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.lock().unwrap();
        if s.fail_stop {
            return Err(Self::fail("stop"));
        }
        s.stop_count += 1;
        Ok(())
    }
}

//! Minimal end-to-end run against an inline fake driver: connect, command a
//! move, and tick the poll loop until the move settles.

use focuser_core::{Focuser, MotionStatus, PollCfg};
use focuser_traits::FocuserDriver;

/// Fake unit that travels 40 ticks toward its target per position query.
struct FakeUnit {
    position: i32,
    target: i32,
}

impl FocuserDriver for FakeUnit {
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
    fn temperature(&mut self) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        Ok(11.5)
    }
    fn position(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        let step = (self.target - self.position).clamp(-40, 40);
        self.position += step;
        Ok(self.position)
    }
    fn max_step(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        Ok(10_000)
    }
    fn set_max_step(&mut self, _t: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
    fn reverse(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(false)
    }
    fn set_reverse(&mut self, _e: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
    fn is_moving(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.position != self.target)
    }
    fn move_to(&mut self, ticks: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.target = ticks;
        Ok(())
    }
    fn reset_position(&mut self, t: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.position = t;
        self.target = t;
        Ok(())
    }
    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.target = self.position;
        Ok(())
    }
}

fn main() -> focuser_core::Result<()> {
    let mut focuser = Focuser::builder()
        .with_driver(FakeUnit {
            position: 0,
            target: 0,
        })
        .with_name("quickstart")
        .with_poll(PollCfg::default())
        .build()?;

    focuser.connect()?;
    focuser.move_absolute(200)?;

    while focuser.absolute_status() == MotionStatus::Busy {
        for update in focuser.poll() {
            println!("{update:?}");
        }
    }
    println!("settled at {} ticks", focuser.position());
    focuser.disconnect()
}

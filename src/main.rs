use std::env;
use std::error::Error;
use std::fs;

use log::info;
use spin_sleep::LoopHelper;

use chip8vm::display::{Display, MonoTermDisplay};
use chip8vm::input::{CrosstermInput, Input};
use chip8vm::machine::Machine;
use chip8vm::sound::{SimpleBeep, Sound};

/// same pace as the reference host: nine opcodes per 60Hz frame
const INSTRUCTIONS_PER_FRAME: u32 = 9;
const FRAME_RATE: f64 = 60.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let rom_path = env::args().nth(1).ok_or("usage: chip8vm <rom-file>")?;
    let rom = fs::read(&rom_path)?;

    // initialise
    let mut display = MonoTermDisplay::new()?;
    let mut input = CrosstermInput::new()?;
    let mut sound = SimpleBeep::new();
    let mut machine = Machine::new();

    machine.load_program(&rom)?;
    info!("running {} ({} bytes)", rom_path, rom.len());

    let mut pacer = LoopHelper::builder().build_with_target_rate(FRAME_RATE);
    while !input.quit_requested() {
        pacer.loop_start();
        machine.set_keys(input.read_keys()?);
        machine.advance(INSTRUCTIONS_PER_FRAME)?;
        display.draw(machine.framebuffer())?;
        sound.set_active(machine.sound_active())?;
        pacer.loop_sleep();
    }

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..12 {
        println!();
    }
    Ok(())
}

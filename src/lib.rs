//! A CHIP-8 virtual machine with a terminal front end.
//!
//! ## Design
//!
//! * one `Machine` owns every piece of interpreter state: memory, the
//!   sixteen V registers, index register, program counter, call stack,
//!   both timers, the framebuffer and the key vector
//! * the host drives it once per display frame: `advance(n)` runs n
//!   fetch-decode-execute steps then decrements both timers by one
//! * after advancing, the host reads the framebuffer, pushes a fresh key
//!   vector and checks `sound_active` for the tone; nothing else crosses
//!   the boundary
//! * display, input and audio sit behind traits so the core never learns
//!   what a terminal is; dummy implementations cover tests
//! * anything that can go wrong mid-run (bad opcode, stack misuse, an
//!   address past the 4K) is a fatal `MachineError`, raised where it is
//!   detected and never papered over; the machine is only trustworthy
//!   again after `reset` or `load_program`
//! * 0xFX0A does not block: with no key down it rewinds the program
//!   counter and the host simply re-runs it next frame
//! * 0xCXNN randomness comes from a seedable generator so tests can pin
//!   the sequence

pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod machine;
pub mod memory;
pub mod sound;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::MachineError;
use crate::framebuffer::Framebuffer;
use crate::memory::{AddressSpace, MemoryMap, FONT_ADDR, FONT_GLYPH_BYTES, PROGRAM_ADDR};

/// how many return addresses the call stack holds
pub const STACK_DEPTH: usize = 16;

/// keys on the hex pad
pub const NUM_KEYS: usize = 16;

/// The whole interpreter: registers, memory, stack, timers, framebuffer and
/// key state, driven by `advance` once per display frame.
///
/// Register 0xF is structurally just another register, but the arithmetic,
/// shift and draw opcodes overwrite it with their carry/borrow/collision
/// flag. That aliasing is a property of the instruction set, not something
/// to correct for; programs that keep data in VF get what they asked for.
pub struct Machine {
    memory: AddressSpace,
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: [u16; STACK_DEPTH],
    sp: usize,
    delay_timer: u8,
    sound_timer: u8,
    framebuffer: Framebuffer,
    keys: [bool; NUM_KEYS],
    rng: StdRng,
}

impl Machine {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// deterministic 0xCXNN sequence; what tests want
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Machine {
            memory: AddressSpace::new(),
            v: [0; 16],
            i: 0,
            pc: PROGRAM_ADDR,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            framebuffer: Framebuffer::new(),
            keys: [false; NUM_KEYS],
            rng,
        }
    }

    /// back to power-on state: zeroed registers, stack and timers, font
    /// reloaded, display dark. Callable between ROMs without rebuilding.
    pub fn reset(&mut self) {
        debug!("machine reset");
        self.memory.reset();
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_ADDR;
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.framebuffer.clear();
        self.keys = [false; NUM_KEYS];
    }

    /// reset, then copy the ROM in at the program address. On failure the
    /// machine is left freshly reset and another load may be tried.
    pub fn load_program(&mut self, rom: &[u8]) -> Result<(), MachineError> {
        self.reset();
        self.memory.load_program(rom)?;
        debug!("loaded {} byte program at {:#05x}", rom.len(), PROGRAM_ADDR);
        Ok(())
    }

    /// one display frame's worth of work: `instructions` fetch-execute
    /// steps, then a single decrement of both timers
    pub fn advance(&mut self, instructions: u32) -> Result<(), MachineError> {
        for _ in 0..instructions {
            self.step()?;
        }
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
        Ok(())
    }

    /// replace the key vector wholesale; index = hex key
    pub fn set_keys(&mut self, keys: [bool; NUM_KEYS]) {
        self.keys = keys;
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// whether the host should be sounding the tone right now
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    /// Fetch, decode and execute exactly one instruction.
    ///
    /// The program counter is bumped past the instruction as part of the
    /// fetch, so during execution it already points at the next one; jumps
    /// overwrite it, skips bump it again, and a waiting 0xFX0A walks it
    /// back so the same instruction re-runs next frame.
    fn step(&mut self) -> Result<(), MachineError> {
        let at = self.pc;
        let opcode = self.memory.read_word(at)?;
        self.pc = at + 2;

        let nibbles = (
            (opcode >> 12) as u8,
            ((opcode >> 8) & 0x0F) as u8,
            ((opcode >> 4) & 0x0F) as u8,
            (opcode & 0x0F) as u8,
        );
        let (_, x, y, n) = nibbles;
        let x = x as usize;
        let y = y as usize;
        let nn = (opcode & 0x00FF) as u8;
        let nnn = opcode & 0x0FFF;

        match nibbles {
            // 00E0: clear the screen
            (0x0, 0x0, 0xE, 0x0) => self.framebuffer.clear(),

            // 00EE: return from subroutine
            (0x0, 0x0, 0xE, 0xE) => {
                if self.sp == 0 {
                    return Err(MachineError::StackUnderflow { addr: at });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp];
            }

            // 0NNN: call native RCA 1802 routine. there is no 1802 here
            (0x0, _, _, _) => debug!("ignoring machine-code call {:04x} at {:03x}", opcode, at),

            // 1NNN: jump
            (0x1, _, _, _) => self.pc = nnn,

            // 2NNN: call subroutine
            (0x2, _, _, _) => {
                if self.sp == STACK_DEPTH {
                    return Err(MachineError::StackOverflow { addr: at });
                }
                self.stack[self.sp] = self.pc;
                self.sp += 1;
                self.pc = nnn;
            }

            // 3XNN: skip if VX == NN
            (0x3, _, _, _) => {
                if self.v[x] == nn {
                    self.pc += 2;
                }
            }

            // 4XNN: skip if VX != NN
            (0x4, _, _, _) => {
                if self.v[x] != nn {
                    self.pc += 2;
                }
            }

            // 5XY0: skip if VX == VY
            (0x5, _, _, 0x0) => {
                if self.v[x] == self.v[y] {
                    self.pc += 2;
                }
            }

            // 6XNN: VX = NN
            (0x6, _, _, _) => self.v[x] = nn,

            // 7XNN: VX += NN, no carry flag
            (0x7, _, _, _) => self.v[x] = self.v[x].wrapping_add(nn),

            // 8XY0: VX = VY
            (0x8, _, _, 0x0) => self.v[x] = self.v[y],

            // 8XY1/2/3: VX op= VY
            (0x8, _, _, 0x1) => self.v[x] |= self.v[y],
            (0x8, _, _, 0x2) => self.v[x] &= self.v[y],
            (0x8, _, _, 0x3) => self.v[x] ^= self.v[y],

            // 8XY4: VX += VY; VF = carry out
            (0x8, _, _, 0x4) => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.v[x] = sum;
                self.v[0xF] = carry as u8;
            }

            // 8XY5: VF = no-borrow, then VX -= VY. both evaluated from the
            // pre-instruction register values, VX written last
            (0x8, _, _, 0x5) => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.v[0xF] = (vx >= vy) as u8;
                self.v[x] = vx.wrapping_sub(vy);
            }

            // 8XY6: VF = bit 0 of VX, then VX >>= 1
            (0x8, _, _, 0x6) => {
                let vx = self.v[x];
                self.v[0xF] = vx & 0x01;
                self.v[x] = vx >> 1;
            }

            // 8XY7: VF = no-borrow, then VX = VY - VX
            (0x8, _, _, 0x7) => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.v[0xF] = (vy >= vx) as u8;
                self.v[x] = vy.wrapping_sub(vx);
            }

            // 8XYE: VF = bit 7 of VX, then VX <<= 1
            (0x8, _, _, 0xE) => {
                let vx = self.v[x];
                self.v[0xF] = vx >> 7;
                self.v[x] = vx << 1;
            }

            // 9XY0: skip if VX != VY
            (0x9, _, _, 0x0) => {
                if self.v[x] != self.v[y] {
                    self.pc += 2;
                }
            }

            // ANNN: I = NNN
            (0xA, _, _, _) => self.i = nnn,

            // BNNN: jump to NNN + V0
            (0xB, _, _, _) => self.pc = nnn + self.v[0] as u16,

            // CXNN: VX = random byte masked by NN
            (0xC, _, _, _) => self.v[x] = self.rng.gen::<u8>() & nn,

            // DXYN: draw N sprite rows from I at (VX, VY); VF = collision
            (0xD, _, _, _) => {
                let sprite = self.memory.read_slice(self.i, n as usize)?;
                let hit = self.framebuffer.draw_sprite(self.v[x], self.v[y], sprite);
                self.v[0xF] = hit as u8;
            }

            // EX9E: skip if the key named by VX is down
            (0xE, _, 0x9, 0xE) => {
                if self.keys[(self.v[x] & 0x0F) as usize] {
                    self.pc += 2;
                }
            }

            // EXA1: skip if it is not
            (0xE, _, 0xA, 0x1) => {
                if !self.keys[(self.v[x] & 0x0F) as usize] {
                    self.pc += 2;
                }
            }

            // FX07: VX = delay timer
            (0xF, _, 0x0, 0x7) => self.v[x] = self.delay_timer,

            // FX0A: wait for a key. with nothing pressed this step walks
            // the pc back and changes nothing else, so the host keeps
            // re-running it until a frame supplies a key. lowest index wins
            (0xF, _, 0x0, 0xA) => match self.keys.iter().position(|&down| down) {
                Some(key) => self.v[x] = key as u8,
                None => self.pc = at,
            },

            // FX15: delay timer = VX
            (0xF, _, 0x1, 0x5) => self.delay_timer = self.v[x],

            // FX18: sound timer = VX
            (0xF, _, 0x1, 0x8) => self.sound_timer = self.v[x],

            // FX1E: I += VX, 16-bit wraparound, no flag
            (0xF, _, 0x1, 0xE) => self.i = self.i.wrapping_add(self.v[x] as u16),

            // FX29: I = glyph address for digit VX
            (0xF, _, 0x2, 0x9) => {
                self.i = FONT_ADDR + self.v[x] as u16 * FONT_GLYPH_BYTES;
            }

            // FX33: decimal digits of VX at [I], [I+1], [I+2]
            (0xF, _, 0x3, 0x3) => {
                let vx = self.v[x];
                self.memory
                    .write_slice(self.i, &[vx / 100, vx / 10 % 10, vx % 10])?;
            }

            // FX55: spill V0..=VX at [I]; I unchanged
            (0xF, _, 0x5, 0x5) => self.memory.write_slice(self.i, &self.v[..=x])?,

            // FX65: fill V0..=VX from [I]; I unchanged
            (0xF, _, 0x6, 0x5) => {
                let src = self.memory.read_slice(self.i, x + 1)?;
                self.v[..=x].copy_from_slice(src);
            }

            _ => {
                warn!("cannot decode {:04x} at {:03x}", opcode, at);
                return Err(MachineError::InvalidOpcode { opcode, addr: at });
            }
        }
        Ok(())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

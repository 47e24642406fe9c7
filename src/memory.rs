use crate::error::MachineError;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Byte-addressed storage with hard bounds. Every address computed from
/// program state goes through the checked accessors; an access at or past
/// the end is an error, never a wraparound.
pub trait MemoryMap {
    fn bytes(&self) -> &[u8];
    fn bytes_mut(&mut self) -> &mut [u8];

    /// error unless [addr, addr + len) fits
    fn check(&self, addr: u16, len: usize) -> Result<(), MachineError> {
        let end = addr as usize + len;
        if end > self.bytes().len() {
            Err(MachineError::OutOfBounds {
                addr: (end - 1) as u16,
            })
        } else {
            Ok(())
        }
    }

    fn read_byte(&self, addr: u16) -> Result<u8, MachineError> {
        self.check(addr, 1)?;
        Ok(self.bytes()[addr as usize])
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), MachineError> {
        self.check(addr, 1)?;
        self.bytes_mut()[addr as usize] = value;
        Ok(())
    }

    /// get a two-byte big-endian word (instruction fetch)
    fn read_word(&self, addr: u16) -> Result<u16, MachineError> {
        self.check(addr, 2)?;
        let a = addr as usize;
        Ok(((self.bytes()[a] as u16) << 8) | self.bytes()[a + 1] as u16)
    }

    fn read_slice(&self, addr: u16, len: usize) -> Result<&[u8], MachineError> {
        self.check(addr, len)?;
        let a = addr as usize;
        Ok(&self.bytes()[a..a + len])
    }

    fn write_slice(&mut self, addr: u16, data: &[u8]) -> Result<(), MachineError> {
        self.check(addr, data.len())?;
        let a = addr as usize;
        self.bytes_mut()[a..a + data.len()].copy_from_slice(data);
        Ok(())
    }
}

/// how much RAM we have
pub const RAM_SIZE_BYTES: usize = 4096;

/// where programs are loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// where the hex-digit glyphs live
pub const FONT_ADDR: u16 = 0x0050;

/// bytes per hex-digit glyph
pub const FONT_GLYPH_BYTES: u16 = 5;

/// The CHIP-8 address space: font sprites baked into low memory, program
/// and work RAM from 0x200 up. Everything below 0x200 belongs to the
/// interpreter; chip-8 programs *should* not touch it, but nothing stops
/// them reading the glyphs.
pub struct AddressSpace {
    bytes: Box<[u8; RAM_SIZE_BYTES]>,
}

impl MemoryMap for AddressSpace {
    fn bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..]
    }
}

impl AddressSpace {
    pub fn new() -> Self {
        let mut m = AddressSpace {
            bytes: Box::new([0u8; RAM_SIZE_BYTES]),
        };
        m.load_font();
        m
    }

    /// zero everything, then restore the font region
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        self.load_font();
    }

    fn load_font(&mut self) {
        let a = FONT_ADDR as usize;
        self.bytes[a..a + FONT.len()].copy_from_slice(&FONT);
    }

    /// copy a ROM image in at the program address; the image must fit in
    /// the RAM above it
    pub fn load_program(&mut self, rom: &[u8]) -> Result<(), MachineError> {
        let max = RAM_SIZE_BYTES - PROGRAM_ADDR as usize;
        if rom.len() > max {
            return Err(MachineError::ProgramTooLarge {
                len: rom.len(),
                max,
            });
        }
        self.write_slice(PROGRAM_ADDR, rom)
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

/// 4x5 pixel glyphs for hex digits 0-F, in the layout every contemporary
/// interpreter uses
const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

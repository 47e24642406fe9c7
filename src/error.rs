use thiserror::Error;

/// Fatal machine conditions. Once one of these is raised the machine state
/// is garbage until the host calls `reset` or `load_program` again.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("program is {len} bytes, only {max} fit above the load address")]
    ProgramTooLarge { len: usize, max: usize },

    #[error("no such instruction: {opcode:#06x} at {addr:#05x}")]
    InvalidOpcode { opcode: u16, addr: u16 },

    #[error("call with a full stack at {addr:#05x}")]
    StackOverflow { addr: u16 },

    #[error("return with an empty stack at {addr:#05x}")]
    StackUnderflow { addr: u16 },

    #[error("memory access out of bounds: {addr:#06x}")]
    OutOfBounds { addr: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_render_the_offending_address() {
        let e = MachineError::InvalidOpcode {
            opcode: 0x8ff8,
            addr: 0x204,
        };
        assert_eq!(e.to_string(), "no such instruction: 0x8ff8 at 0x204");
        let e = MachineError::OutOfBounds { addr: 0x1000 };
        assert_eq!(e.to_string(), "memory access out of bounds: 0x1000");
    }
}

//! The three zone state machines. Pure logic: each module owns its entity
//! collection and advances it per tick or per input event; drawing and DOM
//! work stay in the shell.

pub mod aim;
pub mod memory;
pub mod particle;

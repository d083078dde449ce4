//! Execution core of a bytecode virtual machine for a small dynamically
//! typed object language: a stack machine with closures, classes, string
//! interning, and a precise mark-and-sweep collector. Compilers hand it
//! finished functions; see `vm::VM::interpret`.

pub mod call_frame;
pub mod chunk;
pub mod constants;
pub mod debug;
pub mod gc;
pub mod logger;
pub mod memory;
pub mod objects;
pub mod std_mod;
pub mod table;
pub mod value;
pub mod vm;

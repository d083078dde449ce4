use super::object::{Object, ObjectType};
use super::object_string::ObjectString;
use crate::chunk::Chunk;

/// Compiled code for one function. Producers fill in arity, upvalue count,
/// name, and the chunk after allocation; the VM treats it as immutable.
#[repr(C)]
pub struct ObjectFunction {
    pub object: Object,
    pub arity: usize,
    pub upvalue_count: usize,
    pub chunk: Chunk,
    pub name: *mut ObjectString,
}

impl ObjectFunction {
    pub fn new() -> ObjectFunction {
        ObjectFunction {
            object: Object::new(ObjectType::ObjFunction),
            arity: 0,
            upvalue_count: 0,
            chunk: Chunk::new(),
            name: std::ptr::null_mut(),
        }
    }
}

impl Default for ObjectFunction {
    fn default() -> Self {
        ObjectFunction::new()
    }
}

#[cfg(feature = "debug_trace_object")]
mod debug_feature {
    use super::ObjectFunction;

    // The name string may already have been swept, so only its address is
    // printed here.
    impl Drop for ObjectFunction {
        fn drop(&mut self) {
            println!(
                "drop function object: name_ptr={:p}, code_bytes={}",
                self.name,
                self.chunk.code.len()
            );
        }
    }
}

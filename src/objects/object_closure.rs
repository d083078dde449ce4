use super::object::{Object, ObjectType};
use super::object_function::ObjectFunction;
use super::object_upvalue::ObjectUpvalue;

/// Function reference plus its captured upvalues. The vector length is
/// fixed at `function.upvalue_count`; slots start null and are filled by
/// the enclosing code right after allocation.
#[repr(C)]
pub struct ObjectClosure {
    pub object: Object,
    pub function: *mut ObjectFunction,
    pub upvalues: Vec<*mut ObjectUpvalue>,
}

impl ObjectClosure {
    pub fn new(function: *mut ObjectFunction) -> ObjectClosure {
        debug_assert!(!function.is_null());
        let upvalue_count = unsafe { (*function).upvalue_count };
        ObjectClosure {
            object: Object::new(ObjectType::ObjClosure),
            function,
            upvalues: vec![std::ptr::null_mut(); upvalue_count],
        }
    }

    pub fn upvalue_count(&self) -> usize {
        self.upvalues.len()
    }
}

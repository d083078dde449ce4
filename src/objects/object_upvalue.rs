use super::object::{Object, ObjectType};
use crate::value::{make_nil_value, Value};

/// Captured variable. While open, `location` points at a live stack slot
/// and `next` links the VM's list of open upvalues (sorted by descending
/// slot address). Closing copies the slot into `closed` and repoints
/// `location` at it; the transition is one-way.
#[repr(C)]
pub struct ObjectUpvalue {
    pub object: Object,
    pub location: *mut Value,
    pub closed: Value,
    pub next: *mut ObjectUpvalue,
}

impl ObjectUpvalue {
    pub fn new(location: *mut Value) -> ObjectUpvalue {
        ObjectUpvalue {
            object: Object::new(ObjectType::ObjUpvalue),
            location,
            closed: make_nil_value(),
            next: std::ptr::null_mut(),
        }
    }

    pub fn is_closed(&self) -> bool {
        std::ptr::eq(self.location, &self.closed)
    }
}
